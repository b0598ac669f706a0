//! Lintkit CLI binary entry point.
//! Resolves effective config, delegates to the library, and prints results.
//!
//! Exit codes: 0 success, 1 rejected identifier (`check-name`), 2 errors.

use clap::Parser;
use lintkit::builtin::PRETTIER_PRESET;
use lintkit::cli::{Cli, Commands, Common};
use lintkit::config::{self, CliOverrides, Effective};
use lintkit::models::{Selector, TypeFilter};
use lintkit::naming::{generate, Identifier, NamingPolicy};
use lintkit::utils;
use lintkit::{output, Error, Resolver, Result};
use std::path::{Path, PathBuf};

fn main() {
    lintkit::init_tracing();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            2
        }
    };
    std::process::exit(code);
}

fn flag(set: bool) -> Option<bool> {
    if set {
        Some(true)
    } else {
        None
    }
}

fn effective(common: &Common, extra: CliOverrides) -> Result<Effective> {
    let eff = config::resolve_effective(&CliOverrides {
        repo_root: common.repo_root.clone(),
        output: common.output.clone(),
        ..extra
    })?;
    // Friendly note if no lintkit config was found
    if eff.output != "json" && matches!(config::load_config(&eff.repo_root), Ok(None)) {
        eprintln!(
            "{} No lintkit.toml found; using defaults.",
            utils::note_prefix()
        );
    }
    Ok(eff)
}

fn run(cli: Cli) -> Result<i32> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::List { common } => {
            let eff = effective(&common, CliOverrides::default())?;
            let reg = eff.registry()?;
            if eff.output != "json" {
                for file in &eff.preset_files {
                    eprintln!(
                        "{} {} loaded from {}",
                        utils::info_prefix(),
                        file.name,
                        utils::display_relative(&file.path, &eff.repo_root)
                    );
                }
            }
            output::print_list(&reg, &eff.output);
        }
        Commands::Resolve {
            common,
            preset,
            strict,
            base_dir,
            files,
        } => {
            let eff = effective(
                &common,
                CliOverrides {
                    preset,
                    strict: flag(strict),
                    base_dir,
                    ..CliOverrides::default()
                },
            )?;
            let reg = eff.registry()?;
            let name = eff.require_preset()?;
            let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
            let mut options = eff.resolve_options();
            options.base_dir = Some(utils::absolutize(&eff.base_dir, &cwd));
            let paths: Vec<PathBuf> = files
                .iter()
                .map(|f| utils::absolutize(Path::new(f), &cwd))
                .collect();
            let results = Resolver::new(&reg, options).resolve_many(name, &paths)?;
            output::print_resolved(&results, &eff.output);
        }
        Commands::Show { common, preset } => {
            let eff = effective(
                &common,
                CliOverrides {
                    preset,
                    ..CliOverrides::default()
                },
            )?;
            let reg = eff.registry()?;
            let name = eff.require_preset()?;
            output::print_preset(name, reg.resolve(name)?, &eff.output);
        }
        Commands::Naming {
            common,
            allow_pascal_case,
            revision,
        } => {
            let eff = effective(
                &common,
                CliOverrides {
                    allow_pascal_case: flag(allow_pascal_case),
                    revision,
                    ..CliOverrides::default()
                },
            )?;
            output::print_naming(&generate(&eff.naming), &eff.output);
        }
        Commands::CheckName {
            common,
            identifier,
            kind,
            ty,
            is_const,
            allow_pascal_case,
            revision,
        } => {
            let eff = effective(
                &common,
                CliOverrides {
                    allow_pascal_case: flag(allow_pascal_case),
                    revision,
                    ..CliOverrides::default()
                },
            )?;
            let mut ident = Identifier::new(identifier, kind.parse::<Selector>()?);
            if let Some(t) = ty {
                ident = ident.with_type(t.parse::<TypeFilter>()?);
            }
            if is_const {
                ident = ident.constant();
            }
            let check = NamingPolicy::from_options(&eff.naming)?.check(&ident);
            output::print_name_check(&ident, &check, &eff.output);
            if !check.is_ok() {
                return Ok(1);
            }
        }
        Commands::Prettier { common, preset } => {
            let eff = effective(&common, CliOverrides::default())?;
            let reg = eff.registry()?;
            let name = preset.as_deref().unwrap_or(PRETTIER_PRESET);
            let opts = reg.prettier(name)?;
            opts.validate()?;
            output::print_prettier(opts, &eff.output);
        }
    }
    Ok(0)
}
