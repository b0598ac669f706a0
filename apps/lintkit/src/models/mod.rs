//! Data models for presets, rule directives, naming rules, and Prettier options.

pub mod directive;
pub mod naming;
pub mod preset;
pub mod prettier;

pub use directive::{RuleDirective, RuleMap, Severity};
pub use naming::{
    Format, Modifier, NameFilter, NamingConventionSelectorRule, Selector, TypeFilter,
    UnderscorePolicy,
};
pub use preset::{
    ConfigLayer, ConfigPreset, FlatConfig, LanguageOptions, OverrideBlock, ParserOptions,
};
pub use prettier::{EndOfLine, PrettierOptions, TrailingComma};

/// Serde helpers for fields written either as a single value or a list
/// (`extends: "xo"` vs `extends: ["xo"]`). Single-element lists serialize
/// back to the bare value.
pub(crate) mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn deserialize<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            One(T),
            Many(Vec<T>),
        }
        Ok(match Repr::deserialize(d)? {
            Repr::One(v) => vec![v],
            Repr::Many(v) => v,
        })
    }

    pub fn serialize<S, T>(v: &[T], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match v {
            [one] => one.serialize(s),
            many => many.serialize(s),
        }
    }
}
