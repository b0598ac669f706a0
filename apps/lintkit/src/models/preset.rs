//! Preset schemas for both configuration styles found in shareable configs.
//!
//! - `ConfigPreset`: the eslintrc form (`extends` + `rules` + glob-scoped
//!   `overrides`).
//! - `FlatConfig`: the flat form, an ordered list of `ConfigLayer`s where
//!   each layer optionally targets files by glob.
//!
//! Environment flags, globals, plugins, settings, and parser options are
//! pass-through data. They are merged but never interpreted.

use super::directive::RuleMap;
use super::one_or_many;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Module type of the linted sources.
pub enum SourceType {
    Module,
    Script,
    Commonjs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Latest {
    Latest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Syntax version: a year/edition number or `"latest"`.
pub enum EcmaVersion {
    Year(u32),
    Named(Latest),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcmaFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsx: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Parser options; unknown parser-specific keys are kept in `extra`.
pub struct ParserOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<EcmaVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_features: Option<EcmaFeatures>,
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

impl ParserOptions {
    pub fn is_empty(&self) -> bool {
        self == &ParserOptions::default()
    }

    pub fn jsx(&self) -> bool {
        self.ecma_features
            .as_ref()
            .and_then(|f| f.jsx)
            .unwrap_or(false)
    }

    /// Layer `other` on top of `self`; set fields in `other` win.
    pub fn merge_from(&mut self, other: &ParserOptions) {
        if other.source_type.is_some() {
            self.source_type = other.source_type;
        }
        if other.ecma_version.is_some() {
            self.ecma_version = other.ecma_version;
        }
        if let Some(of) = other.ecma_features.as_ref() {
            let f = self.ecma_features.get_or_insert_with(EcmaFeatures::default);
            if of.jsx.is_some() {
                f.jsx = of.jsx;
            }
            deep_merge_map(&mut f.extra, &of.extra);
        }
        deep_merge_map(&mut self.extra, &other.extra);
    }
}

/// Recursively merge `src` into `dst`. Objects merge key by key; any other
/// value replaces what was there.
pub fn deep_merge_map(dst: &mut Map<String, Json>, src: &Map<String, Json>) {
    for (k, v) in src {
        match (dst.get_mut(k), v) {
            (Some(Json::Object(d)), Json::Object(s)) => deep_merge_map(d, s),
            _ => {
                dst.insert(k.clone(), v.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// eslintrc-style preset.
pub struct ConfigPreset {
    /// Registry name or source path; not part of the exported object.
    #[serde(skip)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, bool>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, Json>,
    #[serde(
        default,
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(default, skip_serializing_if = "ParserOptions::is_empty")]
    pub parser_options: ParserOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: RuleMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideBlock>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Json>,
    #[serde(
        default,
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ignore_patterns: Vec<String>,
}

impl ConfigPreset {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Rules (and optional env/settings/extends) scoped to file globs.
pub struct OverrideBlock {
    #[serde(deserialize_with = "one_or_many::deserialize")]
    pub files: Vec<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub excluded_files: Vec<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, bool>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(default, skip_serializing_if = "ParserOptions::is_empty")]
    pub parser_options: ParserOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: RuleMap,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Json>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<EcmaVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(default, skip_serializing_if = "ParserOptions::is_empty")]
    pub parser_options: ParserOptions,
}

impl LanguageOptions {
    pub fn is_empty(&self) -> bool {
        self == &LanguageOptions::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One entry of a flat configuration array.
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `None` applies the layer to every file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignores: Vec<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many::deserialize",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: RuleMap,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Json>,
    #[serde(default, skip_serializing_if = "LanguageOptions::is_empty")]
    pub language_options: LanguageOptions,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub linter_options: Map<String, Json>,
}

impl ConfigLayer {
    /// A layer holding nothing but `ignores` excludes files globally.
    pub fn is_global_ignore(&self) -> bool {
        !self.ignores.is_empty()
            && self.files.is_none()
            && self.extends.is_empty()
            && self.plugins.is_empty()
            && self.rules.is_empty()
            && self.settings.is_empty()
            && self.language_options.is_empty()
            && self.linter_options.is_empty()
    }

    /// The layer's `name`, or its position within `config`.
    pub fn label(&self, config: &str, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{config}[{index}]"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Flat configuration: layers apply in order to every file they match.
pub struct FlatConfig {
    #[serde(skip)]
    pub name: String,
    pub layers: Vec<ConfigLayer>,
}

impl FlatConfig {
    pub fn new(name: impl Into<String>, layers: Vec<ConfigLayer>) -> Self {
        Self {
            name: name.into(),
            layers,
        }
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut ConfigLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use serde_json::json;

    #[test]
    fn test_eslintrc_preset_accepts_single_string_extends_and_files() {
        let preset: ConfigPreset = serde_json::from_value(json!({
            "extends": "xo",
            "parserOptions": {"sourceType": "module", "ecmaVersion": 2021, "ecmaFeatures": {"jsx": true}, "project": "./tsconfig.json"},
            "rules": {"eqeqeq": ["warn", "smart"]},
            "overrides": [{"files": "**/*.tsx", "rules": {"eqeqeq": "off"}}]
        }))
        .unwrap();
        assert_eq!(preset.extends, vec!["xo"]);
        assert_eq!(preset.overrides[0].files, vec!["**/*.tsx"]);
        assert_eq!(preset.parser_options.source_type, Some(SourceType::Module));
        assert_eq!(preset.parser_options.ecma_version, Some(EcmaVersion::Year(2021)));
        assert!(preset.parser_options.jsx());
        assert_eq!(preset.parser_options.extra["project"], json!("./tsconfig.json"));
        assert_eq!(preset.rules["eqeqeq"].severity(), Severity::Warn);
    }

    #[test]
    fn test_parser_options_merge_is_deep() {
        let mut base: ParserOptions = serde_json::from_value(json!({
            "ecmaVersion": 2021,
            "ecmaFeatures": {"jsx": true},
            "tsconfigRootDir": ".",
            "extraFileExtensions": [".vue"]
        }))
        .unwrap();
        let top: ParserOptions = serde_json::from_value(json!({
            "ecmaVersion": "latest",
            "ecmaFeatures": {"globalReturn": false},
            "extraFileExtensions": [".svelte"]
        }))
        .unwrap();
        base.merge_from(&top);
        assert_eq!(base.ecma_version, Some(EcmaVersion::Named(Latest::Latest)));
        assert!(base.jsx());
        assert_eq!(base.extra["tsconfigRootDir"], json!("."));
        assert_eq!(base.extra["extraFileExtensions"], json!([".svelte"]));
    }

    #[test]
    fn test_flat_layers_and_global_ignores() {
        let flat: FlatConfig = serde_json::from_value(json!([
            {"ignores": ["dist/**"]},
            {"name": "base", "rules": {"no-eval": 1}},
            {"files": ["**/*.ts"], "ignores": ["**/*.d.ts"], "rules": {"no-eval": 0}}
        ]))
        .unwrap();
        assert_eq!(flat.layers.len(), 3);
        assert!(flat.layers[0].is_global_ignore());
        assert!(!flat.layers[2].is_global_ignore());
        assert_eq!(flat.layers[1].label("app", 1), "base");
        assert_eq!(flat.layers[2].label("app", 2), "app[2]");
        let back = serde_json::to_value(&flat).unwrap();
        assert!(back.is_array());
    }
}
