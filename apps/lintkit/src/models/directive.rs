//! Rule directives: the severity (and optional options) assigned to one rule.
//!
//! Accepted shapes mirror what lint engines read from shareable configs:
//! - `"off" | "warn" | "error"`
//! - `0 | 1 | 2`
//! - `[severity, option...]`
//!
//! Options are opaque. They are carried verbatim and replaced as a whole
//! when a later layer configures the same rule.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;
use std::str::FromStr;

/// Ordered mapping from rule identifier to directive.
pub type RuleMap = IndexMap<String, RuleDirective>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Rule severity levels.
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    pub fn as_number(&self) -> u8 {
        match self {
            Severity::Off => 0,
            Severity::Warn => 1,
            Severity::Error => 2,
        }
    }

    /// Parse either the word or the numeric form.
    pub fn from_json(value: &Json) -> Result<Self> {
        match value {
            Json::String(s) => s.parse(),
            Json::Number(n) => match n.as_u64() {
                Some(0) => Ok(Severity::Off),
                Some(1) => Ok(Severity::Warn),
                Some(2) => Ok(Severity::Error),
                _ => Err(Error::configuration(format!(
                    "invalid numeric severity {n} (expected 0, 1 or 2)"
                ))),
            },
            other => Err(Error::configuration(format!(
                "invalid severity {other} (expected off|warn|error or 0|1|2)"
            ))),
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "off" | "0" => Ok(Severity::Off),
            "warn" | "1" => Ok(Severity::Warn),
            "error" | "2" => Ok(Severity::Error),
            _ => Err(Error::configuration(format!(
                "invalid severity '{s}' (expected off|warn|error or 0|1|2)"
            ))),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Json", into = "Json")]
/// Severity plus an ordered, opaque options payload.
pub struct RuleDirective {
    severity: Severity,
    options: Vec<Json>,
}

impl RuleDirective {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with_options(severity: Severity, options: Vec<Json>) -> Self {
        Self { severity, options }
    }

    pub fn off() -> Self {
        Self::new(Severity::Off)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn options(&self) -> &[Json] {
        &self.options
    }

    pub fn is_off(&self) -> bool {
        self.severity == Severity::Off
    }

    /// Decode a directive from any JSON value.
    pub fn from_json(value: &Json) -> Result<Self> {
        match value {
            Json::Array(items) => {
                let (first, rest) = items.split_first().ok_or_else(|| {
                    Error::configuration("rule directive array must start with a severity")
                })?;
                Ok(Self {
                    severity: Severity::from_json(first)?,
                    options: rest.to_vec(),
                })
            }
            other => Ok(Self::new(Severity::from_json(other)?)),
        }
    }

    pub fn to_json(&self) -> Json {
        if self.options.is_empty() {
            return Json::String(self.severity.as_str().to_string());
        }
        let mut items = Vec::with_capacity(self.options.len() + 1);
        items.push(Json::String(self.severity.as_str().to_string()));
        items.extend(self.options.iter().cloned());
        Json::Array(items)
    }
}

impl TryFrom<Json> for RuleDirective {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        RuleDirective::from_json(&value)
    }
}

impl From<RuleDirective> for Json {
    fn from(d: RuleDirective) -> Self {
        d.to_json()
    }
}

impl From<Severity> for RuleDirective {
    fn from(s: Severity) -> Self {
        RuleDirective::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_words_numbers_and_arrays() {
        assert_eq!(
            RuleDirective::from_json(&json!("warn")).unwrap().severity(),
            Severity::Warn
        );
        assert_eq!(
            RuleDirective::from_json(&json!(0)).unwrap().severity(),
            Severity::Off
        );
        let d = RuleDirective::from_json(&json!(["error", "always", {"x": 1}])).unwrap();
        assert_eq!(d.severity(), Severity::Error);
        assert_eq!(d.options(), &[json!("always"), json!({"x": 1})]);
        let n = RuleDirective::from_json(&json!([2, {"max": 5}])).unwrap();
        assert_eq!(n.severity(), Severity::Error);
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        for bad in [json!("fatal"), json!(3), json!([]), json!({"a": 1}), json!(true)] {
            let err = RuleDirective::from_json(&bad).unwrap_err();
            assert!(err.is_configuration(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_serializes_bare_word_without_options() {
        let d: RuleDirective = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(serde_json::to_value(&d).unwrap(), json!("warn"));
        let d: RuleDirective = serde_json::from_value(json!(["warn", "smart"])).unwrap();
        assert_eq!(serde_json::to_value(&d).unwrap(), json!(["warn", "smart"]));
    }
}
