//! Configuration discovery and effective settings resolution.
//!
//! Lintkit reads `lintkit.toml|yaml|yml` from the repository root (or the
//! closest ancestor) and merges it with CLI flags to produce an
//! `Effective` config.
//! Defaults:
//! - `preset`: none (commands that need one fail without it)
//! - `output`: `human`
//! - `extends`: `passthrough`
//! - `baseDir`: the repository root
//! - `naming.allowPascalCaseVariables`: false
//! - `naming.revision`: `current`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::builtin;
use crate::error::{Error, Result};
use crate::loader;
use crate::naming::{NamingOptions, NamingRevision};
use crate::registry::{PresetKind, PresetRegistry};
use crate::resolve::{ExtendsPolicy, ResolveOptions};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILES: [&str; 3] = ["lintkit.toml", "lintkit.yaml", "lintkit.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
/// Root configuration loaded from `lintkit.toml|yaml`.
pub struct LintkitConfig {
    pub preset: Option<String>,
    pub output: Option<String>,
    /// `passthrough` or `strict`.
    pub extends: Option<String>,
    pub base_dir: Option<String>,
    #[serde(default)]
    pub presets: IndexMap<String, PresetFileCfg>, // [presets.<name>]
    pub naming: Option<NamingCfg>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct PresetFileCfg {
    pub path: String,
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NamingCfg {
    pub allow_pascal_case_variables: Option<bool>,
    pub revision: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// A preset file declared in config, path resolved against the repo root.
pub struct PresetFile {
    pub name: String,
    pub path: PathBuf,
    pub kind: Option<PresetKind>,
}

#[derive(Debug, Clone, Default)]
/// Flag values taken from the command line; `None` defers to the file.
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub preset: Option<String>,
    pub output: Option<String>,
    pub strict: Option<bool>,
    pub base_dir: Option<String>,
    pub allow_pascal_case: Option<bool>,
    pub revision: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub preset: Option<String>,
    pub output: String,
    pub extends_policy: ExtendsPolicy,
    pub base_dir: PathBuf,
    pub preset_files: Vec<PresetFile>,
    pub naming: NamingOptions,
}

impl Effective {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            base_dir: Some(self.base_dir.clone()),
            extends_policy: self.extends_policy,
        }
    }

    /// Built-in presets plus every file declared under `[presets]`.
    pub fn registry(&self) -> Result<PresetRegistry> {
        let mut reg = builtin::registry()?;
        for file in &self.preset_files {
            loader::register_file(&mut reg, &file.name, &file.path, file.kind)?;
        }
        Ok(reg)
    }

    /// The configured preset, or an error naming the missing flag.
    pub fn require_preset(&self) -> Result<&str> {
        self.preset.as_deref().ok_or_else(|| {
            Error::configuration(
                "no preset selected (pass --preset or set `preset` in lintkit.toml)",
            )
        })
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `lintkit.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `LintkitConfig` from `lintkit.toml` or `lintkit.yaml|yml` if present.
///
/// A config file that exists but cannot be read or decoded is an error.
pub fn load_config(root: &Path) -> Result<Option<LintkitConfig>> {
    let toml_path = root.join("lintkit.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).map_err(|e| Error::io(&toml_path, e))?;
        let cfg = toml::from_str(&s).map_err(|e| Error::parse(&toml_path, e))?;
        return Ok(Some(cfg));
    }
    for yml in ["lintkit.yaml", "lintkit.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).map_err(|e| Error::io(&p, e))?;
            let cfg = serde_yaml::from_str(&s).map_err(|e| Error::parse(&p, e))?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

fn parse_extends_policy(s: &str) -> Result<ExtendsPolicy> {
    match s {
        "passthrough" => Ok(ExtendsPolicy::Passthrough),
        "strict" => Ok(ExtendsPolicy::Strict),
        _ => Err(Error::configuration(format!(
            "unknown extends policy '{s}' (expected passthrough|strict)"
        ))),
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root)?.unwrap_or_default();
    tracing::debug!(root = %repo_root.display(), "resolved repository root");

    let preset = cli.preset.clone().or(cfg.preset);

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(Error::configuration(format!(
            "unknown output '{output}' (expected human|json)"
        )));
    }

    let extends_policy = match cli.strict {
        Some(true) => ExtendsPolicy::Strict,
        _ => match cfg.extends.as_deref() {
            Some(s) => parse_extends_policy(s)?,
            None => ExtendsPolicy::default(),
        },
    };

    let base_dir = match cli.base_dir.as_deref().or(cfg.base_dir.as_deref()) {
        Some(dir) => repo_root.join(dir),
        None => repo_root.clone(),
    };

    let preset_files = cfg
        .presets
        .into_iter()
        .map(|(name, file)| -> Result<PresetFile> {
            let kind = file.kind.as_deref().map(str::parse).transpose()?;
            Ok(PresetFile {
                name,
                path: repo_root.join(&file.path),
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let naming_cfg = cfg.naming.unwrap_or_default();
    let revision = match cli.revision.as_deref().or(naming_cfg.revision.as_deref()) {
        Some(r) => r.parse()?,
        None => NamingRevision::default(),
    };
    let naming = NamingOptions {
        allow_pascal_case_variables: cli
            .allow_pascal_case
            .or(naming_cfg.allow_pascal_case_variables)
            .unwrap_or(false),
        revision,
    };

    Ok(Effective {
        repo_root,
        preset,
        output,
        extends_policy,
        base_dir,
        preset_files,
        naming,
    })
}
