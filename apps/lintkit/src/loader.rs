//! Reading preset files from disk.
//!
//! Supported encodings: JSON (`.json`, `.eslintrc`, `.prettierrc`), YAML
//! (`.yaml`, `.yml`) and TOML (`.toml`). Files without a known extension
//! are tried as JSON first, then YAML.
//!
//! When the kind is not given it is inferred: a top-level array is a flat
//! config, a file named after prettier holds Prettier options, anything
//! else is an eslintrc preset.

use crate::error::{Error, Result};
use crate::models::{ConfigPreset, FlatConfig, PrettierOptions};
use crate::registry::{Preset, PresetKind, PresetRegistry};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_json::Value as Json;
use std::fs;
use std::path::Path;

fn read_value(path: &Path) -> Result<Json> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => serde_json::from_str(&text).map_err(|e| Error::parse(path, e)),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&text).map_err(|e| Error::parse(path, e))
        }
        Some("toml") => toml::from_str(&text).map_err(|e| Error::parse(path, e)),
        _ => serde_json::from_str(&text)
            .or_else(|_| serde_yaml::from_str(&text))
            .map_err(|e| Error::parse(path, e)),
    }
}

fn infer_kind(path: &Path, value: &Json) -> PresetKind {
    if value.is_array() {
        return PresetKind::Flat;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if file_name.contains("prettier") {
        PresetKind::Prettier
    } else {
        PresetKind::Eslintrc
    }
}

/// Decode an already-parsed document. Shape errors (bad directives, wrong
/// field types) are configuration errors; the file was readable.
fn decode<T: DeserializeOwned>(path: &Path, value: Json) -> Result<T> {
    serde_json::from_value(value).map_err(|e| match e.classify() {
        Category::Data => Error::configuration(format!("{}: {e}", path.display())),
        _ => Error::parse(path, e),
    })
}

/// Load one preset file. The preset's name is the file path.
pub fn load_preset(path: &Path, kind: Option<PresetKind>) -> Result<Preset> {
    let value = read_value(path)?;
    let kind = kind.unwrap_or_else(|| infer_kind(path, &value));
    tracing::debug!(path = %path.display(), %kind, "loading preset file");
    let name = path.display().to_string();
    let preset = match kind {
        PresetKind::Eslintrc => {
            let mut p: ConfigPreset = decode(path, value)?;
            p.name = name;
            Preset::Eslintrc(p)
        }
        PresetKind::Flat => {
            let mut f: FlatConfig = decode(path, value)?;
            f.name = name;
            Preset::Flat(f)
        }
        PresetKind::Prettier => {
            let opts = PrettierOptions::from_json(value)?;
            for key in opts.unrecognized_keys() {
                tracing::warn!(
                    path = %path.display(),
                    key,
                    "unrecognized prettier option passed through"
                );
            }
            Preset::Prettier(opts)
        }
    };
    Ok(preset)
}

/// Load `path` and register it under `name`.
pub fn register_file(
    registry: &mut PresetRegistry,
    name: &str,
    path: &Path,
    kind: Option<PresetKind>,
) -> Result<()> {
    let mut preset = load_preset(path, kind)?;
    match &mut preset {
        Preset::Eslintrc(p) => p.name = name.to_string(),
        Preset::Flat(f) => f.name = name.to_string(),
        Preset::Prettier(_) => {}
    }
    registry.register(name, preset)
}
