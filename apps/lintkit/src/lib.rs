//! Lintkit core library.
//!
//! Resolves shareable ESLint/Prettier presets: which rule directives apply
//! to a given file after `extends` chains and glob-scoped overrides are
//! merged, plus the generated `@typescript-eslint/naming-convention` table.
//!
//! High-level modules:
//! - `registry`: named presets (eslintrc, flat config, Prettier options).
//! - `resolve`: last-write-wins override resolution per file path.
//! - `naming`: naming-convention rule generation and matching.
//! - `glob`: glob-to-regex compiler used for override targeting.
//! - `builtin`: the bundled preset variants.
//! - `loader`: reading preset files from disk.
//! - `config`: discovery and effective configuration resolution.
//! - `cli`, `output`, `utils`: binary support.
pub mod builtin;
pub mod cli;
pub mod config;
pub mod error;
pub mod glob;
pub mod loader;
pub mod models;
pub mod naming;
pub mod output;
pub mod registry;
pub mod resolve;
pub mod utils;

pub use error::{Error, Result};
pub use registry::{Preset, PresetKind, PresetRegistry};
pub use resolve::{CompiledPreset, EffectiveConfig, ExtendsPolicy, ResolveOptions, Resolver};

/// Initialize the tracing subscriber. Filter comes from `LINTKIT_LOG`
/// (default `lintkit=warn`); events go to stderr so JSON output stays clean.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_env("LINTKIT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("lintkit=warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
