//! Naming-convention rule generator and selector matcher.
//!
//! `generate` builds the ordered selector-rule list for the
//! `@typescript-eslint/naming-convention` rule. The only input is whether
//! PascalCase identifiers are allowed where camelCase is otherwise required
//! (component-bearing `.tsx` files).
//!
//! `NamingPolicy` evaluates identifiers against such a list: the first rule
//! (in declaration order) whose selector, modifiers, types, and filter all
//! apply decides the verdict. Identifiers no rule applies to are
//! unconstrained.

use crate::error::{Error, Result};
use crate::models::{
    Format, Modifier, NameFilter, NamingConventionSelectorRule, RuleDirective, Selector,
    Severity, TypeFilter, UnderscorePolicy,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const NAMING_CONVENTION_RULE: &str = "@typescript-eslint/naming-convention";

pub const BOOLEAN_PREFIXES: [&str; 6] = ["is", "has", "can", "should", "will", "did"];

/// Acronyms allowed inside otherwise strict-camelCase names.
pub const SHORTCUT_ACRONYMS: [&str; 4] = ["UTC", "URL", "DOP", "DOC"];

const UPPER_SNAKE: &str = "^[A-Z]+(?:_[A-Z]+)*$";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which iteration of the naming table to produce.
pub enum NamingRevision {
    /// eslintrc era: variables share the first strict-camelCase rule.
    Legacy,
    /// flat-config era: variables get const/boolean/default rules of their own.
    #[default]
    Current,
}

impl FromStr for NamingRevision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(NamingRevision::Legacy),
            "current" => Ok(NamingRevision::Current),
            _ => Err(Error::configuration(format!(
                "unknown naming revision '{s}' (expected legacy|current)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamingOptions {
    pub allow_pascal_case_variables: bool,
    pub revision: NamingRevision,
}

impl NamingOptions {
    pub fn new(allow_pascal_case_variables: bool) -> Self {
        Self {
            allow_pascal_case_variables,
            revision: NamingRevision::default(),
        }
    }
}

fn our_selectors(revision: NamingRevision) -> Vec<Selector> {
    let mut out = Vec::with_capacity(9);
    if revision == NamingRevision::Legacy {
        out.push(Selector::Variable);
    }
    out.extend([
        Selector::Function,
        Selector::ClassProperty,
        Selector::ObjectLiteralProperty,
        Selector::ParameterProperty,
        Selector::ClassMethod,
        Selector::ObjectLiteralMethod,
        Selector::TypeMethod,
        Selector::Accessor,
    ]);
    out
}

/// Case-insensitive alternation of the shortcut acronyms, written with
/// character classes so the same source works for any regex dialect.
pub fn shortcuts_regex() -> String {
    SHORTCUT_ACRONYMS
        .iter()
        .map(|acronym| {
            let classes: String = acronym
                .chars()
                .map(|c| format!("[{}{}]", c.to_ascii_uppercase(), c.to_ascii_lowercase()))
                .collect();
            format!("^.*{classes}.*$")
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Names exempt from the camelCase rules: quoted keys with a space or
/// hyphen, purely numeric keys, and shortcut-bearing names.
pub fn exempt_regex() -> String {
    format!("[- ]|^[0-9]+$|{}", shortcuts_regex())
}

fn camel_formats(options: &NamingOptions) -> Vec<Format> {
    let mut f = vec![Format::StrictCamelCase];
    if options.allow_pascal_case_variables {
        f.push(Format::StrictPascalCase);
    }
    f
}

fn with_underscores(mut rule: NamingConventionSelectorRule) -> NamingConventionSelectorRule {
    rule.leading_underscore = Some(UnderscorePolicy::AllowSingleOrDouble);
    rule.trailing_underscore = Some(UnderscorePolicy::Allow);
    rule
}

/// Produce the ordered naming-convention rule list. Pure and deterministic.
pub fn generate(options: &NamingOptions) -> Vec<NamingConventionSelectorRule> {
    type Rule = NamingConventionSelectorRule;
    let selectors = our_selectors(options.revision);
    let mut rules = Vec::new();

    let mut strict = with_underscores(Rule::new(selectors.clone(), Some(camel_formats(options))));
    strict.filter = Some(NameFilter::not_matching(exempt_regex()));
    rules.push(strict);

    rules.push(Rule::new(vec![Selector::TypeLike], Some(vec![Format::StrictPascalCase])));

    match options.revision {
        NamingRevision::Legacy => {
            let mut boolean =
                Rule::new(vec![Selector::Variable], Some(vec![Format::StrictPascalCase]));
            boolean.types = vec![TypeFilter::Boolean];
            boolean.prefix = BOOLEAN_PREFIXES.iter().map(|p| p.to_string()).collect();
            rules.push(boolean);
        }
        NamingRevision::Current => {
            let mut constants = Rule::new(vec![Selector::Variable], Some(vec![Format::UpperCase]));
            constants.modifiers = vec![Modifier::Const];
            constants.types = vec![TypeFilter::Number, TypeFilter::String];
            constants.filter = Some(NameFilter::matching(UPPER_SNAKE));
            rules.push(constants);

            let mut const_flags =
                Rule::new(vec![Selector::Variable], Some(vec![Format::UpperCase]));
            const_flags.modifiers = vec![Modifier::Const];
            const_flags.types = vec![TypeFilter::Boolean];
            const_flags.filter = Some(NameFilter::matching(UPPER_SNAKE));
            const_flags.prefix = BOOLEAN_PREFIXES
                .iter()
                .map(|p| format!("{}_", p.to_ascii_uppercase()))
                .collect();
            rules.push(const_flags);

            let mut boolean = with_underscores(Rule::new(
                vec![Selector::Variable],
                Some(vec![Format::StrictPascalCase]),
            ));
            boolean.types = vec![TypeFilter::Boolean];
            boolean.prefix = BOOLEAN_PREFIXES.iter().map(|p| p.to_string()).collect();
            boolean.filter = Some(NameFilter::not_matching(exempt_regex()));
            rules.push(boolean);

            let mut variable = with_underscores(Rule::new(
                vec![Selector::Variable],
                Some(camel_formats(options)),
            ));
            variable.filter = Some(NameFilter::not_matching(exempt_regex()));
            rules.push(variable);
        }
    }

    let mut interface = Rule::new(vec![Selector::Interface], Some(vec![Format::StrictPascalCase]));
    interface.filter = Some(NameFilter::matching("^[A-HJ-Z]"));
    rules.push(interface);

    let mut type_param = Rule::new(
        vec![Selector::TypeParameter],
        Some(vec![Format::StrictPascalCase]),
    );
    type_param.filter = Some(NameFilter::matching("^[A-Z][a-z][a-zA-Z]+$"));
    rules.push(type_param);

    let mut short_param = Rule::new(vec![Selector::TypeParameter], Some(vec![Format::PascalCase]));
    short_param.filter = Some(NameFilter::matching("^T$|^[A-Z][a-zA-Z]+$"));
    rules.push(short_param);

    let mut quoted = Rule::new(
        vec![Selector::ClassProperty, Selector::ObjectLiteralProperty],
        None,
    );
    quoted.modifiers = vec![Modifier::RequiresQuotes];
    rules.push(quoted);

    let mut shortcut_selectors = selectors;
    if !shortcut_selectors.contains(&Selector::Variable) {
        shortcut_selectors.insert(0, Selector::Variable);
    }
    let mut shortcuts = Rule::new(shortcut_selectors, Some(vec![Format::CamelCase]));
    shortcuts.filter = Some(NameFilter::matching(shortcuts_regex()));
    rules.push(shortcuts);

    rules
}

/// Wrap the generated list as the `error`-level directive for
/// `@typescript-eslint/naming-convention`.
pub fn naming_convention_directive(options: &NamingOptions) -> Result<RuleDirective> {
    let payload = generate(options)
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::configuration(format!("naming rules: {e}")))?;
    Ok(RuleDirective::with_options(Severity::Error, payload))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One identifier occurrence to classify.
pub struct Identifier {
    pub name: String,
    pub kind: Selector,
    pub is_const: bool,
    pub ty: Option<TypeFilter>,
}

impl Identifier {
    pub fn new(name: impl Into<String>, kind: Selector) -> Self {
        Self {
            name: name.into(),
            kind,
            is_const: false,
            ty: None,
        }
    }

    pub fn with_type(mut self, ty: TypeFilter) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Names that are not plain identifiers can only appear quoted.
    pub fn requires_quotes(&self) -> bool {
        let mut chars = self.name.chars();
        let valid_start =
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$');
        !(valid_start && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$'))
    }

    fn has_modifier(&self, m: Modifier) -> bool {
        match m {
            Modifier::Const => self.is_const,
            Modifier::RequiresQuotes => self.requires_quotes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCheck {
    /// No rule applies to the identifier.
    Unconstrained,
    /// Rule at `rule` applies and the name satisfies it.
    Accepted { rule: usize },
    /// Rule at `rule` applies and the name violates it.
    Rejected { rule: usize, reason: String },
}

impl NameCheck {
    pub fn is_ok(&self) -> bool {
        !matches!(self, NameCheck::Rejected { .. })
    }

    pub fn rule(&self) -> Option<usize> {
        match self {
            NameCheck::Unconstrained => None,
            NameCheck::Accepted { rule } | NameCheck::Rejected { rule, .. } => Some(*rule),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: NamingConventionSelectorRule,
    filter: Option<(Regex, bool)>,
}

impl CompiledRule {
    fn applies_to(&self, ident: &Identifier) -> bool {
        if !self.rule.selector.iter().any(|s| s.covers(ident.kind)) {
            return false;
        }
        if !self.rule.modifiers.iter().all(|m| ident.has_modifier(*m)) {
            return false;
        }
        if !self.rule.types.is_empty() && !ident.ty.is_some_and(|t| self.rule.types.contains(&t)) {
            return false;
        }
        match &self.filter {
            Some((re, want)) => re.is_match(&ident.name) == *want,
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
/// Compiled, read-only naming rule list.
pub struct NamingPolicy {
    rules: Vec<CompiledRule>,
}

impl NamingPolicy {
    pub fn new(rules: Vec<NamingConventionSelectorRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| -> Result<CompiledRule> {
                let filter = match rule.filter.as_ref() {
                    Some(f) => {
                        let re = Regex::new(&f.regex).map_err(|e| {
                            Error::configuration(format!(
                                "naming rule #{i}: invalid filter '{}': {e}",
                                f.regex
                            ))
                        })?;
                        Some((re, f.matches))
                    }
                    None => None,
                };
                Ok(CompiledRule { rule, filter })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn from_options(options: &NamingOptions) -> Result<Self> {
        Self::new(generate(options))
    }

    pub fn rules(&self) -> impl Iterator<Item = &NamingConventionSelectorRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn check(&self, ident: &Identifier) -> NameCheck {
        for (i, compiled) in self.rules.iter().enumerate() {
            if !compiled.applies_to(ident) {
                continue;
            }
            tracing::debug!(name = %ident.name, rule = i, "naming rule applies");
            return match validate(&compiled.rule, &ident.name) {
                Ok(()) => NameCheck::Accepted { rule: i },
                Err(reason) => NameCheck::Rejected { rule: i, reason },
            };
        }
        NameCheck::Unconstrained
    }
}

#[derive(Clone, Copy)]
enum Side {
    Leading,
    Trailing,
}

fn strip_underscores<'a>(
    name: &'a str,
    policy: Option<UnderscorePolicy>,
    side: Side,
) -> std::result::Result<&'a str, String> {
    let Some(policy) = policy else {
        return Ok(name);
    };
    let label = match side {
        Side::Leading => "leading",
        Side::Trailing => "trailing",
    };
    let has = |n: &str, p: &str| match side {
        Side::Leading => n.starts_with(p),
        Side::Trailing => n.ends_with(p),
    };
    let strip = |n: &'a str, count: usize| -> &'a str {
        match side {
            Side::Leading => &n[count..],
            Side::Trailing => &n[..n.len() - count],
        }
    };
    match policy {
        UnderscorePolicy::Forbid if has(name, "_") => {
            Err(format!("must not have a {label} underscore"))
        }
        UnderscorePolicy::Forbid => Ok(name),
        UnderscorePolicy::Require if has(name, "_") && !has(name, "__") => Ok(strip(name, 1)),
        UnderscorePolicy::Require => Err(format!("must have exactly one {label} underscore")),
        UnderscorePolicy::RequireDouble if has(name, "__") => Ok(strip(name, 2)),
        UnderscorePolicy::RequireDouble => Err(format!("must have a double {label} underscore")),
        UnderscorePolicy::Allow if has(name, "_") => Ok(strip(name, 1)),
        UnderscorePolicy::AllowDouble if has(name, "__") => Ok(strip(name, 2)),
        UnderscorePolicy::AllowSingleOrDouble if has(name, "__") => Ok(strip(name, 2)),
        UnderscorePolicy::AllowSingleOrDouble if has(name, "_") => Ok(strip(name, 1)),
        _ => Ok(name),
    }
}

fn validate(rule: &NamingConventionSelectorRule, name: &str) -> std::result::Result<(), String> {
    let mut rest = strip_underscores(name, rule.leading_underscore, Side::Leading)?;
    rest = strip_underscores(rest, rule.trailing_underscore, Side::Trailing)?;
    if !rule.prefix.is_empty() {
        match rule.prefix.iter().find(|p| rest.starts_with(p.as_str())) {
            Some(p) => rest = &rest[p.len()..],
            None => {
                return Err(format!(
                    "must start with one of the prefixes: {}",
                    rule.prefix.join(", ")
                ))
            }
        }
    }
    let Some(formats) = rule.format.as_ref() else {
        return Ok(());
    };
    if formats.is_empty() || rest.is_empty() || formats.iter().any(|f| f.accepts(rest)) {
        return Ok(());
    }
    let names: Vec<String> = formats
        .iter()
        .filter_map(|f| serde_json::to_value(f).ok())
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    Err(format!("must match one of the formats: {}", names.join(", ")))
}

fn has_strict_humps(name: &str, mut is_upper: bool) -> bool {
    if name.starts_with('_') {
        return false;
    }
    for c in name.chars().skip(1) {
        if c == '_' {
            return false;
        }
        if is_upper == c.is_uppercase() {
            if is_upper {
                return false;
            }
        } else {
            is_upper = !is_upper;
        }
    }
    true
}

impl Format {
    /// Whether `name` (already stripped of underscores/prefix) satisfies the format.
    pub fn accepts(&self, name: &str) -> bool {
        let Some(first) = name.chars().next() else {
            return true;
        };
        match self {
            Format::CamelCase => !first.is_uppercase() && !name.contains('_'),
            Format::StrictCamelCase => !first.is_uppercase() && has_strict_humps(name, false),
            Format::PascalCase => !first.is_lowercase() && !name.contains('_'),
            Format::StrictPascalCase => !first.is_lowercase() && has_strict_humps(name, true),
            Format::UpperCase => name == name.to_uppercase(),
            Format::SnakeCase => name == name.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy(allow: bool) -> NamingPolicy {
        NamingPolicy::from_options(&NamingOptions::new(allow)).unwrap()
    }

    #[test]
    fn test_first_rule_formats_follow_flag() {
        let off = generate(&NamingOptions::new(false));
        assert_eq!(off[0].format, Some(vec![Format::StrictCamelCase]));
        let on = generate(&NamingOptions::new(true));
        assert_eq!(
            on[0].format,
            Some(vec![Format::StrictCamelCase, Format::StrictPascalCase])
        );
        assert_eq!(generate(&NamingOptions::new(true)), on);
    }

    #[test]
    fn test_shortcut_names_fall_back_to_camel_case() {
        assert!(!Format::StrictCamelCase.accepts("fetchUTCOffset"));
        let p = policy(false);
        let check = p.check(&Identifier::new("fetchUTCOffset", Selector::Function));
        assert_eq!(check.rule(), Some(p.rules().count() - 1));
        assert!(check.is_ok());
        let check = p.check(&Identifier::new("FetchURL", Selector::ClassMethod));
        assert!(!check.is_ok());
    }

    #[test]
    fn test_quoted_and_numeric_keys_are_exempt() {
        let p = policy(false);
        assert!(p.check(&Identifier::new("Retry-After", Selector::ObjectLiteralProperty)).is_ok());
        assert_eq!(
            p.check(&Identifier::new("Retry-After", Selector::Variable)),
            NameCheck::Unconstrained
        );
        assert!(p.check(&Identifier::new("Content Type", Selector::ClassProperty)).is_ok());
        assert!(p.check(&Identifier::new("200", Selector::ObjectLiteralProperty)).is_ok());
    }

    #[test]
    fn test_strict_camel_case_and_underscores() {
        let p = policy(false);
        assert!(p.check(&Identifier::new("loadUser", Selector::Function)).is_ok());
        assert!(p.check(&Identifier::new("__typename", Selector::ObjectLiteralProperty)).is_ok());
        assert!(p.check(&Identifier::new("value_", Selector::ClassProperty)).is_ok());
        assert!(!p.check(&Identifier::new("loadHTTPUser", Selector::Function)).is_ok());
        assert!(!p.check(&Identifier::new("UserCard", Selector::Function)).is_ok());
        assert!(policy(true).check(&Identifier::new("UserCard", Selector::Function)).is_ok());
    }

    #[test]
    fn test_boolean_variables_need_prefix() {
        let p = policy(false);
        let ok = Identifier::new("isOpen", Selector::Variable).with_type(TypeFilter::Boolean);
        assert!(p.check(&ok).is_ok());
        let bad = Identifier::new("open", Selector::Variable).with_type(TypeFilter::Boolean);
        match p.check(&bad) {
            NameCheck::Rejected { reason, .. } => assert!(reason.contains("prefixes")),
            other => panic!("expected rejection, got {other:?}"),
        }
        let flag = Identifier::new("IS_READY", Selector::Variable)
            .with_type(TypeFilter::Boolean)
            .constant();
        assert!(p.check(&flag).is_ok());
        let limit = Identifier::new("MAX_RETRIES", Selector::Variable)
            .with_type(TypeFilter::Number)
            .constant();
        assert!(p.check(&limit).is_ok());
    }

    #[test]
    fn test_type_like_and_interfaces() {
        let p = policy(false);
        assert!(p.check(&Identifier::new("UserProps", Selector::Interface)).is_ok());
        assert!(p.check(&Identifier::new("Props", Selector::TypeLike)).is_ok());
        assert!(!p.check(&Identifier::new("userProps", Selector::TypeLike)).is_ok());
        assert!(p.check(&Identifier::new("T", Selector::TypeParameter)).is_ok());
    }

    #[test]
    fn test_legacy_revision_shares_first_rule_with_variables() {
        let legacy = generate(&NamingOptions {
            allow_pascal_case_variables: false,
            revision: NamingRevision::Legacy,
        });
        assert_eq!(legacy[0].selector[0], Selector::Variable);
        assert_eq!(legacy.len(), 8);
        assert_eq!(generate(&NamingOptions::default()).len(), 11);
    }

    #[test]
    fn test_directive_payload_shape() {
        let d = naming_convention_directive(&NamingOptions::new(false)).unwrap();
        assert_eq!(d.severity(), Severity::Error);
        let first = &d.options()[0];
        assert_eq!(first["format"], json!(["strictCamelCase"]));
        assert_eq!(first["leadingUnderscore"], json!("allowSingleOrDouble"));
        assert_eq!(first["filter"]["match"], json!(false));
        assert_eq!(d.options()[1], json!({"selector": "typeLike", "format": ["StrictPascalCase"]}));
    }

    #[test]
    fn test_invalid_filter_is_configuration_error() {
        let mut rule = NamingConventionSelectorRule::new(vec![Selector::Variable], None);
        rule.filter = Some(NameFilter::matching("(unclosed"));
        assert!(NamingPolicy::new(vec![rule]).unwrap_err().is_configuration());
    }
}
