//! Output rendering for list, resolve, naming, and Prettier commands.
//!
//! Supports `human` (default) and `json` outputs. JSON forms are built by
//! pure `compose_*` functions so their shape can be tested directly.

use crate::models::{NamingConventionSelectorRule, PrettierOptions, RuleDirective, Severity};
use crate::naming::{Identifier, NameCheck};
use crate::registry::{Preset, PresetRegistry};
use crate::resolve::EffectiveConfig;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && crate::utils::colors_enabled()
}

fn print_json(value: &JsonVal) {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    println!("{text}");
}

fn paint(text: &str, color: bool, style: fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

/// Compose the preset listing (pure).
pub fn compose_list_json(reg: &PresetRegistry) -> JsonVal {
    let items: Vec<_> = reg
        .iter()
        .map(|(name, preset)| {
            let size = match preset {
                Preset::Eslintrc(p) => json!({
                    "rules": p.rules.len(),
                    "overrides": p.overrides.len(),
                    "extends": p.extends.len(),
                }),
                Preset::Flat(f) => json!({"layers": f.layers.len()}),
                Preset::Prettier(o) => json!({"plugins": o.plugins.len()}),
            };
            json!({"name": name, "kind": preset.kind().as_str(), "size": size})
        })
        .collect();
    json!({"presets": items, "total": reg.len()})
}

pub fn print_list(reg: &PresetRegistry, output: &str) {
    if output == "json" {
        print_json(&compose_list_json(reg));
        return;
    }
    let color = use_colors(output);
    for (name, preset) in reg.iter() {
        let detail = match preset {
            Preset::Eslintrc(p) => format!(
                "{} rules, {} overrides, extends {}",
                p.rules.len(),
                p.overrides.len(),
                p.extends.len()
            ),
            Preset::Flat(f) => format!("{} layers", f.layers.len()),
            Preset::Prettier(o) => format!("{} plugins", o.plugins.len()),
        };
        println!(
            "{} {} ({})",
            paint(name, color, |s| s.bold().to_string()),
            paint(preset.kind().as_str(), color, |s| s.cyan().to_string()),
            detail
        );
    }
}

/// Compose per-file effective configs plus a summary (pure).
pub fn compose_resolve_json(results: &[EffectiveConfig]) -> JsonVal {
    let items: Vec<_> = results
        .iter()
        .map(|r| serde_json::to_value(r).unwrap_or(JsonVal::Null))
        .collect();
    let summary = json!({
        "files": results.len(),
        "ignored": results.iter().filter(|r| r.ignored).count(),
    });
    json!({"results": items, "summary": summary})
}

fn severity_label(sev: Severity, color: bool) -> String {
    let (icon, word) = match sev {
        Severity::Error => ("✖", "error"),
        Severity::Warn => ("▲", "warn"),
        Severity::Off => ("○", "off"),
    };
    if !color {
        return format!("{icon} {word}");
    }
    match sev {
        Severity::Error => format!("{} {}", icon.red(), word.red().bold()),
        Severity::Warn => format!("{} {}", icon.yellow(), word.yellow().bold()),
        Severity::Off => format!("{} {}", icon.bright_black(), word.bright_black()),
    }
}

fn directive_options(d: &RuleDirective) -> String {
    if d.options().is_empty() {
        return String::new();
    }
    let opts = JsonVal::Array(d.options().to_vec());
    format!(" {opts}")
}

pub fn print_resolved(results: &[EffectiveConfig], output: &str) {
    if output == "json" {
        print_json(&compose_resolve_json(results));
        return;
    }
    let color = use_colors(output);
    for r in results {
        let header = format!("{} ({})", r.file, r.preset);
        println!("{}", paint(&header, color, |s| s.bold().to_string()));
        if r.ignored {
            println!("  {}", paint("ignored", color, |s| s.bright_black().to_string()));
            continue;
        }
        for (id, d) in &r.rules {
            println!("  {} {}{}", severity_label(d.severity(), color), id, directive_options(d));
        }
        if !r.external.is_empty() {
            println!("  external: {}", r.external.join(", "));
        }
        let on = r.rules.values().filter(|d| !d.is_off()).count();
        let summary = format!(
            "— Summary — rules={} on={} off={} layers={}",
            r.rules.len(),
            on,
            r.rules.len() - on,
            r.matched.len()
        );
        println!("{}", paint(&summary, color, |s| s.bold().to_string()));
    }
}

/// Print a preset as exported JSON; human mode adds a header line.
pub fn print_preset(name: &str, preset: &Preset, output: &str) {
    let value = serde_json::to_value(preset).unwrap_or(JsonVal::Null);
    if output != "json" {
        let color = use_colors(output);
        let header = format!("{name} ({})", preset.kind());
        println!("{}", paint(&header, color, |s| s.bold().to_string()));
    }
    print_json(&value);
}

pub fn print_naming(rules: &[NamingConventionSelectorRule], output: &str) {
    let value = serde_json::to_value(rules).unwrap_or(JsonVal::Null);
    if output == "json" {
        print_json(&value);
        return;
    }
    for (i, rule) in rules.iter().enumerate() {
        let line = serde_json::to_string(rule).unwrap_or_default();
        println!("#{i:<2} {line}");
    }
}

/// Compose a naming verdict (pure).
pub fn compose_name_check_json(ident: &Identifier, check: &NameCheck) -> JsonVal {
    let (status, reason) = match check {
        NameCheck::Unconstrained => ("unconstrained", None),
        NameCheck::Accepted { .. } => ("accepted", None),
        NameCheck::Rejected { reason, .. } => ("rejected", Some(reason.as_str())),
    };
    json!({
        "name": ident.name,
        "kind": ident.kind,
        "status": status,
        "rule": check.rule(),
        "reason": reason,
    })
}

pub fn print_name_check(ident: &Identifier, check: &NameCheck, output: &str) {
    if output == "json" {
        print_json(&compose_name_check_json(ident, check));
        return;
    }
    let color = use_colors(output);
    let kind = serde_json::to_value(ident.kind)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    match check {
        NameCheck::Unconstrained => println!(
            "{} {} ({kind}): no rule applies",
            paint("◆ unconstrained", color, |s| s.blue().bold().to_string()),
            ident.name
        ),
        NameCheck::Accepted { rule } => println!(
            "{} {} ({kind}) by rule #{rule}",
            paint("✔ accepted", color, |s| s.green().bold().to_string()),
            ident.name
        ),
        NameCheck::Rejected { rule, reason } => println!(
            "{} {} ({kind}) by rule #{rule}: {reason}",
            paint("✖ rejected", color, |s| s.red().bold().to_string()),
            ident.name
        ),
    }
}

pub fn print_prettier(opts: &PrettierOptions, output: &str) {
    let value = serde_json::to_value(opts).unwrap_or(JsonVal::Null);
    if output == "json" {
        print_json(&value);
        return;
    }
    let color = use_colors(output);
    if let JsonVal::Object(map) = &value {
        for (k, v) in map {
            println!("{} {}", paint(&format!("{k}:"), color, |s| s.bold().to_string()), v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Selector;
    use crate::resolve::{ResolveOptions, Resolver};
    use std::path::Path;

    #[test]
    fn test_compose_list_json_shape() {
        let reg = crate::builtin::registry().unwrap();
        let out = compose_list_json(&reg);
        assert_eq!(out["total"], 3);
        assert_eq!(out["presets"][0]["name"], "eslintrc");
        assert_eq!(out["presets"][1]["kind"], "flat");
        assert_eq!(out["presets"][2]["size"]["plugins"], 2);
    }

    #[test]
    fn test_compose_resolve_json_summary() {
        let reg = crate::builtin::registry().unwrap();
        let resolver = Resolver::new(&reg, ResolveOptions::default());
        let results = vec![
            resolver.resolve("flat", Path::new("src/a.ts")).unwrap(),
            resolver.resolve("flat", Path::new("src/b.test.tsx")).unwrap(),
        ];
        let out = compose_resolve_json(&results);
        assert_eq!(out["summary"]["files"], 2);
        assert_eq!(out["summary"]["ignored"], 0);
        assert_eq!(out["results"][1]["file"], "src/b.test.tsx");
        assert!(out["results"][0]["rules"].is_object());
    }

    #[test]
    fn test_compose_name_check_json() {
        let ident = Identifier::new("open", Selector::Variable);
        let check = NameCheck::Rejected {
            rule: 4,
            reason: "must start with one of the prefixes: is".into(),
        };
        let out = compose_name_check_json(&ident, &check);
        assert_eq!(out["kind"], "variable");
        assert_eq!(out["status"], "rejected");
        assert_eq!(out["rule"], 4);
        let free = compose_name_check_json(&ident, &NameCheck::Unconstrained);
        assert!(free["rule"].is_null());
    }
}
