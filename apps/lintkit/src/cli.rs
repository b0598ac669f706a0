//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lintkit",
    version,
    about = "Lintkit: resolve shareable ESLint/Prettier presets",
    long_about = "Lintkit resolves shareable lint presets: the effective rules for a file after extends chains and glob overrides, the generated naming-convention table, and Prettier options.\n\nConfiguration precedence: CLI > lintkit.toml > defaults.",
    after_help = "Examples:\n  lintkit list\n  lintkit resolve --preset flat src/App.tsx src/api/client.test.ts\n  lintkit naming --allow-pascal-case --output json\n  lintkit check-name fetchUTCOffset --kind function",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Clone, Default)]
/// Flags shared by every command.
pub struct Common {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current lintkit version.")]
    Version,
    /// List registered presets
    #[command(
        about = "List presets",
        long_about = "List built-in presets and the preset files declared under [presets] in lintkit.toml."
    )]
    List {
        #[command(flatten)]
        common: Common,
    },
    /// Resolve effective rules per file
    #[command(
        about = "Resolve effective config",
        long_about = "Merge the preset's extends chain, its own rules, and every matching override block for each file. Later layers win on colliding rules.",
        after_help = "Examples:\n  lintkit resolve --preset eslintrc src/App.tsx\n  lintkit resolve --preset flat --strict --output json src/a.ts"
    )]
    Resolve {
        #[command(flatten)]
        common: Common,
        #[arg(long, help = "Preset name (default: `preset` from lintkit.toml)")]
        preset: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Fail on extends references missing from the registry")]
        strict: bool,
        #[arg(long, help = "Directory override globs are relative to (default: repo root)")]
        base_dir: Option<String>,
        #[arg(required = true, help = "Files to resolve")]
        files: Vec<String>,
    },
    /// Print a preset
    #[command(about = "Show preset", long_about = "Print a registered preset as exported JSON.")]
    Show {
        #[command(flatten)]
        common: Common,
        #[arg(long, help = "Preset name (default: `preset` from lintkit.toml)")]
        preset: Option<String>,
    },
    /// Print the generated naming-convention rules
    #[command(
        about = "Generate naming rules",
        long_about = "Print the ordered @typescript-eslint/naming-convention selector list."
    )]
    Naming {
        #[command(flatten)]
        common: Common,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Allow PascalCase where camelCase is required (.tsx files)")]
        allow_pascal_case: bool,
        #[arg(long, help = "Rule table revision: current|legacy (default: current)")]
        revision: Option<String>,
    },
    /// Check one identifier against the naming rules
    #[command(
        about = "Check an identifier",
        long_about = "Apply the first naming rule (in declaration order) that targets the identifier. Exits 1 when the name is rejected.",
        after_help = "Examples:\n  lintkit check-name isOpen --kind variable --type boolean\n  lintkit check-name 'Retry-After' --kind objectLiteralProperty"
    )]
    CheckName {
        #[command(flatten)]
        common: Common,
        #[arg(help = "Identifier to check")]
        identifier: String,
        #[arg(long, help = "Identifier kind, e.g. variable, function, interface, typeLike")]
        kind: String,
        #[arg(long = "type", help = "Type of the identifier: boolean|string|number|function|array")]
        ty: Option<String>,
        #[arg(long = "const", action = clap::ArgAction::SetTrue, help = "The identifier is declared const")]
        is_const: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Allow PascalCase where camelCase is required (.tsx files)")]
        allow_pascal_case: bool,
        #[arg(long, help = "Rule table revision: current|legacy (default: current)")]
        revision: Option<String>,
    },
    /// Print validated Prettier options
    #[command(about = "Show Prettier options", long_about = "Validate and print a Prettier options preset.")]
    Prettier {
        #[command(flatten)]
        common: Common,
        #[arg(long, help = "Prettier preset name (default: prettier)")]
        preset: Option<String>,
    },
}
