//! Built-in preset variants.
//!
//! Two lint variants ship side by side and neither is the default:
//! - `eslintrc`: the `.eslintrc` preset (extends chain + glob overrides)
//! - `flat`: the flat-config layer list that replaced it
//!
//! plus the `prettier` options object. The rule data is embedded as JSON;
//! the naming-convention directives are generated at load time, with
//! PascalCase allowed only for `.tsx` files.

use crate::error::{Error, Result};
use crate::models::{ConfigPreset, FlatConfig, PrettierOptions};
use crate::naming::{
    naming_convention_directive, NamingOptions, NamingRevision, NAMING_CONVENTION_RULE,
};
use crate::registry::PresetRegistry;

pub const ESLINTRC_PRESET: &str = "eslintrc";
pub const FLAT_PRESET: &str = "flat";
pub const PRETTIER_PRESET: &str = "prettier";

const ESLINTRC_JSON: &str = include_str!("../presets/eslintrc.json");
const FLAT_JSON: &str = include_str!("../presets/flat.json");
const PRETTIER_JSON: &str = include_str!("../presets/prettier.json");

const TSX_GLOB: &str = "**/*.tsx";

fn naming(allow_pascal_case_variables: bool, revision: NamingRevision) -> NamingOptions {
    NamingOptions {
        allow_pascal_case_variables,
        revision,
    }
}

pub fn eslintrc_preset() -> Result<ConfigPreset> {
    let mut preset: ConfigPreset = serde_json::from_str(ESLINTRC_JSON)
        .map_err(|e| Error::parse("presets/eslintrc.json", e))?;
    preset.name = ESLINTRC_PRESET.to_string();
    preset.rules.insert(
        NAMING_CONVENTION_RULE.to_string(),
        naming_convention_directive(&naming(false, NamingRevision::Legacy))?,
    );
    let tsx = preset
        .overrides
        .iter_mut()
        .find(|o| o.files.iter().any(|f| f == TSX_GLOB))
        .ok_or_else(|| Error::configuration("eslintrc preset has no `**/*.tsx` override"))?;
    tsx.rules.insert(
        NAMING_CONVENTION_RULE.to_string(),
        naming_convention_directive(&naming(true, NamingRevision::Legacy))?,
    );
    Ok(preset)
}

pub fn flat_preset() -> Result<FlatConfig> {
    let mut config: FlatConfig =
        serde_json::from_str(FLAT_JSON).map_err(|e| Error::parse("presets/flat.json", e))?;
    config.name = FLAT_PRESET.to_string();
    for (layer, allow) in [("lintkit/rules", false), ("lintkit/tsx", true)] {
        let directive = naming_convention_directive(&naming(allow, NamingRevision::Current))?;
        config
            .layer_mut(layer)
            .ok_or_else(|| Error::configuration(format!("flat preset has no `{layer}` layer")))?
            .rules
            .insert(NAMING_CONVENTION_RULE.to_string(), directive);
    }
    Ok(config)
}

pub fn prettier_preset() -> Result<PrettierOptions> {
    let value = serde_json::from_str(PRETTIER_JSON)
        .map_err(|e| Error::parse("presets/prettier.json", e))?;
    PrettierOptions::from_json(value)
}

/// Registry holding every built-in variant.
pub fn registry() -> Result<PresetRegistry> {
    let mut reg = PresetRegistry::new();
    reg.register(ESLINTRC_PRESET, eslintrc_preset()?)?;
    reg.register(FLAT_PRESET, flat_preset()?)?;
    reg.register(PRETTIER_PRESET, prettier_preset()?)?;
    Ok(reg)
}
