//! Preset registry.
//!
//! Holds named presets of every supported kind. Registration happens once
//! at startup; afterwards the registry is only read, so it can be shared by
//! reference across threads without locking.

use crate::error::{Error, Result};
use crate::models::{ConfigPreset, FlatConfig, PrettierOptions};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
/// A registered preset of any kind.
pub enum Preset {
    Eslintrc(ConfigPreset),
    Flat(FlatConfig),
    Prettier(PrettierOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Eslintrc,
    Flat,
    Prettier,
}

impl PresetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetKind::Eslintrc => "eslintrc",
            PresetKind::Flat => "flat",
            PresetKind::Prettier => "prettier",
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PresetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eslintrc" | "legacy" => Ok(PresetKind::Eslintrc),
            "flat" => Ok(PresetKind::Flat),
            "prettier" => Ok(PresetKind::Prettier),
            _ => Err(Error::configuration(format!(
                "unknown preset kind '{s}' (expected eslintrc|flat|prettier)"
            ))),
        }
    }
}

impl Preset {
    pub fn kind(&self) -> PresetKind {
        match self {
            Preset::Eslintrc(_) => PresetKind::Eslintrc,
            Preset::Flat(_) => PresetKind::Flat,
            Preset::Prettier(_) => PresetKind::Prettier,
        }
    }
}

impl From<ConfigPreset> for Preset {
    fn from(p: ConfigPreset) -> Self {
        Preset::Eslintrc(p)
    }
}

impl From<FlatConfig> for Preset {
    fn from(p: FlatConfig) -> Self {
        Preset::Flat(p)
    }
}

impl From<PrettierOptions> for Preset {
    fn from(p: PrettierOptions) -> Self {
        Preset::Prettier(p)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: IndexMap<String, Preset>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `preset` under `name`. Names are unique.
    pub fn register(&mut self, name: impl Into<String>, preset: impl Into<Preset>) -> Result<()> {
        let name = name.into();
        if self.presets.contains_key(&name) {
            return Err(Error::duplicate_name(name));
        }
        let mut preset = preset.into();
        match &mut preset {
            Preset::Eslintrc(p) if p.name.is_empty() => p.name = name.clone(),
            Preset::Flat(f) if f.name.is_empty() => f.name = name.clone(),
            _ => {}
        }
        tracing::debug!(preset = %name, kind = %preset.kind(), "registered preset");
        self.presets.insert(name, preset);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&Preset> {
        self.presets.get(name).ok_or_else(|| Error::not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn eslintrc(&self, name: &str) -> Result<&ConfigPreset> {
        match self.resolve(name)? {
            Preset::Eslintrc(p) => Ok(p),
            other => Err(kind_mismatch(name, PresetKind::Eslintrc, other.kind())),
        }
    }

    pub fn flat(&self, name: &str) -> Result<&FlatConfig> {
        match self.resolve(name)? {
            Preset::Flat(p) => Ok(p),
            other => Err(kind_mismatch(name, PresetKind::Flat, other.kind())),
        }
    }

    pub fn prettier(&self, name: &str) -> Result<&PrettierOptions> {
        match self.resolve(name)? {
            Preset::Prettier(p) => Ok(p),
            other => Err(kind_mismatch(name, PresetKind::Prettier, other.kind())),
        }
    }
}

fn kind_mismatch(name: &str, want: PresetKind, got: PresetKind) -> Error {
    Error::configuration(format!("preset '{name}' is a {got} preset, not {want}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_register_and_resolve() {
        let mut reg = PresetRegistry::new();
        reg.register("base", ConfigPreset::default()).unwrap();
        reg.register("fmt", PrettierOptions::default()).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["base", "fmt"]);
        assert_eq!(reg.eslintrc("base").unwrap().name, "base");
        assert!(reg.prettier("fmt").is_ok());
    }

    #[test]
    fn test_duplicate_and_missing_names() {
        let mut reg = PresetRegistry::new();
        reg.register("base", ConfigPreset::default()).unwrap();
        let err = reg.register("base", FlatConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { ref name } if name == "base"));
        assert!(matches!(reg.flat("base").unwrap_err(), Error::Configuration { .. }));
        assert!(matches!(reg.resolve("nope").unwrap_err(), Error::NotFound { .. }));
    }
}
