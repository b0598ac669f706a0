//! Naming-convention selector rules.
//!
//! The serialized shape is the option object understood by
//! `@typescript-eslint/naming-convention`.

use super::one_or_many;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Identifier-kind tags a rule can target.
pub enum Selector {
    Variable,
    Function,
    ClassProperty,
    ObjectLiteralProperty,
    ParameterProperty,
    ClassMethod,
    ObjectLiteralMethod,
    TypeMethod,
    Accessor,
    Interface,
    TypeParameter,
    /// Group selector; also used as the kind of classes, enums, and type aliases.
    TypeLike,
}

impl Selector {
    /// Whether this selector applies to an identifier of `kind`.
    pub fn covers(&self, kind: Selector) -> bool {
        match self {
            Selector::TypeLike => matches!(
                kind,
                Selector::TypeLike | Selector::Interface | Selector::TypeParameter
            ),
            other => *other == kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "strictCamelCase")]
    StrictCamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "StrictPascalCase")]
    StrictPascalCase,
    #[serde(rename = "UPPER_CASE")]
    UpperCase,
    #[serde(rename = "snake_case")]
    SnakeCase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Const,
    RequiresQuotes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    Boolean,
    String,
    Number,
    Function,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Leading/trailing underscore policy.
pub enum UnderscorePolicy {
    Forbid,
    Require,
    RequireDouble,
    Allow,
    AllowDouble,
    AllowSingleOrDouble,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NameFilterRepr", into = "NameFilterRepr")]
/// A regular expression applied to the raw name, plus match polarity.
pub struct NameFilter {
    pub regex: String,
    pub matches: bool,
}

impl NameFilter {
    pub fn matching(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            matches: true,
        }
    }

    pub fn not_matching(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            matches: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum NameFilterRepr {
    Bare(String),
    Object {
        regex: String,
        #[serde(rename = "match")]
        matches: bool,
    },
}

impl From<NameFilterRepr> for NameFilter {
    fn from(r: NameFilterRepr) -> Self {
        match r {
            NameFilterRepr::Bare(regex) => NameFilter::matching(regex),
            NameFilterRepr::Object { regex, matches } => NameFilter { regex, matches },
        }
    }
}

impl From<NameFilter> for NameFilterRepr {
    fn from(f: NameFilter) -> Self {
        NameFilterRepr::Object {
            regex: f.regex,
            matches: f.matches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One entry of the naming-convention option list.
pub struct NamingConventionSelectorRule {
    #[serde(with = "one_or_many")]
    pub selector: Vec<Selector>,
    /// `None` (serialized as `null`) accepts any format.
    #[serde(default)]
    pub format: Option<Vec<Format>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading_underscore: Option<UnderscorePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_underscore: Option<UnderscorePolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NameFilter>,
}

impl NamingConventionSelectorRule {
    pub fn new(selector: Vec<Selector>, format: Option<Vec<Format>>) -> Self {
        Self {
            selector,
            format,
            leading_underscore: None,
            trailing_underscore: None,
            modifiers: Vec::new(),
            types: Vec::new(),
            prefix: Vec::new(),
            filter: None,
        }
    }
}

fn from_tag<T: for<'de> Deserialize<'de>>(s: &str, what: &str) -> Result<T> {
    serde_json::from_value(Json::String(s.to_string()))
        .map_err(|_| Error::configuration(format!("unknown {what} '{s}'")))
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        from_tag(s, "selector")
    }
}

impl FromStr for TypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        from_tag(s, "type")
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        from_tag(s, "format")
    }
}
