//! Prettier options object.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndOfLine {
    Auto,
    Lf,
    Crlf,
    Cr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    All,
    Es5,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Flat Prettier configuration. Keys outside the recognized set are kept
/// in `extra` and passed through untouched.
pub struct PrettierOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_line: Option<EndOfLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_quote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_comma: Option<TrailingComma>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

impl PrettierOptions {
    /// Decode and validate in one step.
    pub fn from_json(value: Json) -> Result<Self> {
        let opts: PrettierOptions = serde_json::from_value(value)
            .map_err(|e| Error::configuration(format!("invalid prettier options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.print_width == Some(0) {
            return Err(Error::configuration(
                "prettier printWidth must be a positive integer",
            ));
        }
        if let Some(p) = self.plugins.iter().find(|p| p.trim().is_empty()) {
            return Err(Error::configuration(format!(
                "prettier plugin reference '{p}' is empty"
            )));
        }
        Ok(())
    }

    /// Keys that are passed through without validation.
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recognized_keys_and_passthrough() {
        let opts = PrettierOptions::from_json(json!({
            "endOfLine": "auto",
            "printWidth": 120,
            "singleQuote": true,
            "trailingComma": "all",
            "plugins": ["prettier-plugin-curly"],
            "tabWidth": 4
        }))
        .unwrap();
        assert_eq!(opts.end_of_line, Some(EndOfLine::Auto));
        assert_eq!(opts.print_width, Some(120));
        assert_eq!(opts.trailing_comma, Some(TrailingComma::All));
        assert_eq!(opts.unrecognized_keys().collect::<Vec<_>>(), vec!["tabWidth"]);
        let back = serde_json::to_value(&opts).unwrap();
        assert_eq!(back["tabWidth"], json!(4));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PrettierOptions::from_json(json!({"printWidth": 0})).is_err());
        assert!(PrettierOptions::from_json(json!({"printWidth": -3})).is_err());
        assert!(PrettierOptions::from_json(json!({"endOfLine": "lfcr"})).is_err());
        assert!(PrettierOptions::from_json(json!({"trailingComma": "some"})).is_err());
    }
}
