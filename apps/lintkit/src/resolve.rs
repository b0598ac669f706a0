//! Override resolution: from a registered preset and a file path to the
//! effective rule mapping a lint engine would apply.
//!
//! A preset is first compiled into an ordered list of config elements,
//! the way an eslintrc engine builds its config array:
//! 1. every `extends` entry, depth first, in declaration order
//! 2. the preset's own top-level settings and rules
//! 3. each override block (its own `extends` first), carrying the block's
//!    file criteria
//!
//! Flat configs compile the same way, one element per layer. Applying the
//! compiled list to a path merges every element whose criteria all match,
//! later elements winning on colliding keys. Rule directives are replaced
//! as a whole; options are never inspected.

use crate::error::{Error, Result};
use crate::glob::{normalize_path, GlobSet, MatchOptions};
use crate::models::preset::deep_merge_map;
use crate::models::{ConfigLayer, ConfigPreset, FlatConfig, OverrideBlock, ParserOptions, RuleMap};
use crate::registry::{Preset, PresetRegistry};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value as Json};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// What to do with `extends` references missing from the registry.
pub enum ExtendsPolicy {
    /// Record them as external (plugin-provided) presets.
    #[default]
    Passthrough,
    /// Fail with `NotFound`.
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Directory globs are relative to; absolute target paths are made
    /// relative to it before matching.
    pub base_dir: Option<PathBuf>,
    pub extends_policy: ExtendsPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Effective configuration for one file.
pub struct EffectiveConfig {
    pub preset: String,
    pub file: String,
    pub ignored: bool,
    pub rules: RuleMap,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, bool>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, Json>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(skip_serializing_if = "ParserOptions::is_empty")]
    pub parser_options: ParserOptions,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub linter_options: Map<String, Json>,
    /// Extended presets not present in the registry, in first-seen order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,
    /// Labels of the elements that applied, in application order.
    pub matched: Vec<String>,
}

#[derive(Debug, Clone)]
struct Criteria {
    files: Option<GlobSet>,
    excluded: GlobSet,
}

impl Criteria {
    fn matches(&self, path: &str) -> bool {
        let included = self.files.as_ref().map_or(true, |g| g.is_match(path));
        included && (self.excluded.is_empty() || !self.excluded.is_match(path))
    }
}

#[derive(Debug, Clone, Default)]
struct Body {
    rules: RuleMap,
    env: IndexMap<String, bool>,
    globals: IndexMap<String, Json>,
    plugins: Vec<String>,
    settings: Map<String, Json>,
    parser: Option<String>,
    parser_options: ParserOptions,
    linter_options: Map<String, Json>,
    external: Option<String>,
}

impl Body {
    fn from_preset(p: &ConfigPreset) -> Self {
        Self {
            rules: p.rules.clone(),
            env: p.env.clone(),
            globals: p.globals.clone(),
            plugins: p.plugins.clone(),
            settings: p.settings.clone(),
            parser: p.parser.clone(),
            parser_options: p.parser_options.clone(),
            ..Self::default()
        }
    }

    fn from_override(o: &OverrideBlock) -> Self {
        Self {
            rules: o.rules.clone(),
            env: o.env.clone(),
            globals: o.globals.clone(),
            plugins: o.plugins.clone(),
            settings: o.settings.clone(),
            parser: o.parser.clone(),
            parser_options: o.parser_options.clone(),
            ..Self::default()
        }
    }

    fn from_layer(l: &ConfigLayer) -> Self {
        let lang = &l.language_options;
        let mut parser_options = lang.parser_options.clone();
        if lang.ecma_version.is_some() {
            parser_options.ecma_version = lang.ecma_version;
        }
        if lang.source_type.is_some() {
            parser_options.source_type = lang.source_type;
        }
        Self {
            rules: l.rules.clone(),
            globals: lang.globals.clone(),
            plugins: l.plugins.clone(),
            settings: l.settings.clone(),
            parser: lang.parser.clone(),
            parser_options,
            linter_options: l.linter_options.clone(),
            ..Self::default()
        }
    }

    fn external(name: &str) -> Self {
        Self {
            external: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn apply(&self, eff: &mut EffectiveConfig) {
        for (id, directive) in &self.rules {
            eff.rules.insert(id.clone(), directive.clone());
        }
        for (k, v) in &self.env {
            eff.env.insert(k.clone(), *v);
        }
        for (k, v) in &self.globals {
            eff.globals.insert(k.clone(), v.clone());
        }
        for p in &self.plugins {
            if !eff.plugins.contains(p) {
                eff.plugins.push(p.clone());
            }
        }
        deep_merge_map(&mut eff.settings, &self.settings);
        if self.parser.is_some() {
            eff.parser = self.parser.clone();
        }
        eff.parser_options.merge_from(&self.parser_options);
        deep_merge_map(&mut eff.linter_options, &self.linter_options);
        if let Some(ext) = &self.external {
            if !eff.external.contains(ext) {
                eff.external.push(ext.clone());
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    label: String,
    criteria: Vec<Criteria>,
    body: Body,
}

#[derive(Debug, Clone)]
/// A preset flattened into config elements. Read-only; safe to share
/// across threads.
pub struct CompiledPreset {
    name: String,
    base_dir: Option<PathBuf>,
    elements: Vec<Element>,
    ignores: Vec<GlobSet>,
}

const ESLINTRC_GLOBS: MatchOptions = MatchOptions { match_base: true };
const FLAT_GLOBS: MatchOptions = MatchOptions { match_base: false };

/// Ignore patterns ending in `/` name whole directories.
fn ignore_patterns(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| {
            if p.ends_with('/') {
                format!("{p}**")
            } else {
                p.clone()
            }
        })
        .collect()
}

/// eslintrc `ignorePatterns` follow gitignore rules: a pattern also names
/// a directory whose contents are ignored, at any depth unless it holds a
/// `/` other than a trailing one.
fn gitignore_patterns(patterns: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(patterns.len() * 2);
    for p in patterns {
        let (neg, body) = match p.strip_prefix('!') {
            Some(rest) => ("!", rest),
            None => ("", p.as_str()),
        };
        let dir_only = body.ends_with('/');
        let body = body.trim_end_matches('/');
        let anchored = body.contains('/');
        let body = body.trim_start_matches('/');
        if body.is_empty() {
            continue;
        }
        if !dir_only {
            out.push(format!("{neg}{body}"));
        }
        if body.ends_with("**") {
            continue;
        }
        if anchored {
            out.push(format!("{neg}{body}/**"));
        } else {
            out.push(format!("{neg}**/{body}/**"));
        }
    }
    out
}

struct Flattener<'a> {
    registry: &'a PresetRegistry,
    policy: ExtendsPolicy,
    stack: Vec<String>,
    elements: Vec<Element>,
    ignores: Vec<GlobSet>,
}

impl<'a> Flattener<'a> {
    fn expand(&mut self, reference: &str, criteria: &[Criteria]) -> Result<()> {
        if let Some(start) = self.stack.iter().position(|n| n == reference) {
            let mut chain: Vec<&str> = self.stack[start..].iter().map(String::as_str).collect();
            chain.push(reference);
            return Err(Error::configuration(format!(
                "cyclic extends: {}",
                chain.join(" -> ")
            )));
        }
        let preset = match self.registry.resolve(reference) {
            Ok(p) => p,
            Err(Error::NotFound { .. }) if self.policy == ExtendsPolicy::Passthrough => {
                tracing::debug!(reference, "extends reference is external");
                self.elements.push(Element {
                    label: reference.to_string(),
                    criteria: criteria.to_vec(),
                    body: Body::external(reference),
                });
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.stack.push(reference.to_string());
        match preset {
            Preset::Eslintrc(p) => self.eslintrc(p, criteria)?,
            Preset::Flat(f) => self.flat(f, criteria)?,
            Preset::Prettier(_) => {
                return Err(Error::configuration(format!(
                    "preset '{reference}' holds Prettier options and cannot be extended"
                )))
            }
        }
        self.stack.pop();
        Ok(())
    }

    fn eslintrc(&mut self, preset: &ConfigPreset, criteria: &[Criteria]) -> Result<()> {
        for ext in &preset.extends {
            self.expand(ext, criteria)?;
        }
        if !preset.ignore_patterns.is_empty() {
            self.ignores.push(GlobSet::new(
                gitignore_patterns(&preset.ignore_patterns),
                ESLINTRC_GLOBS,
            )?);
        }
        self.elements.push(Element {
            label: preset.name.clone(),
            criteria: criteria.to_vec(),
            body: Body::from_preset(preset),
        });
        for (i, block) in preset.overrides.iter().enumerate() {
            if block.files.is_empty() {
                return Err(Error::configuration(format!(
                    "{}: overrides[{i}] has no file patterns",
                    preset.name
                )));
            }
            let mut scoped = criteria.to_vec();
            scoped.push(Criteria {
                files: Some(GlobSet::new(&block.files, ESLINTRC_GLOBS)?),
                excluded: GlobSet::new(&block.excluded_files, ESLINTRC_GLOBS)?,
            });
            for ext in &block.extends {
                self.expand(ext, &scoped)?;
            }
            self.elements.push(Element {
                label: format!("{}#overrides[{i}]", preset.name),
                criteria: scoped,
                body: Body::from_override(block),
            });
        }
        Ok(())
    }

    fn flat(&mut self, config: &FlatConfig, criteria: &[Criteria]) -> Result<()> {
        for (i, layer) in config.layers.iter().enumerate() {
            let label = layer.label(&config.name, i);
            if layer.is_global_ignore() {
                self.ignores
                    .push(GlobSet::new(ignore_patterns(&layer.ignores), FLAT_GLOBS)?);
                continue;
            }
            if matches!(&layer.files, Some(f) if f.is_empty()) {
                return Err(Error::configuration(format!(
                    "{label}: `files` must not be empty"
                )));
            }
            let mut scoped = criteria.to_vec();
            if layer.files.is_some() || !layer.ignores.is_empty() {
                let files = match &layer.files {
                    Some(f) => Some(GlobSet::new(f, FLAT_GLOBS)?),
                    None => None,
                };
                scoped.push(Criteria {
                    files,
                    excluded: GlobSet::new(ignore_patterns(&layer.ignores), FLAT_GLOBS)?,
                });
            }
            for ext in &layer.extends {
                self.expand(ext, &scoped)?;
            }
            self.elements.push(Element {
                label,
                criteria: scoped,
                body: Body::from_layer(layer),
            });
        }
        Ok(())
    }
}

/// Resolves registered presets against file paths.
pub struct Resolver<'a> {
    registry: &'a PresetRegistry,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a PresetRegistry, options: ResolveOptions) -> Self {
        Self { registry, options }
    }

    /// Flatten `name` and compile every glob it references. Cycles and
    /// malformed globs fail here.
    pub fn compile(&self, name: &str) -> Result<CompiledPreset> {
        let mut f = Flattener {
            registry: self.registry,
            policy: self.options.extends_policy,
            stack: vec![name.to_string()],
            elements: Vec::new(),
            ignores: Vec::new(),
        };
        match self.registry.resolve(name)? {
            Preset::Eslintrc(p) => f.eslintrc(p, &[])?,
            Preset::Flat(c) => f.flat(c, &[])?,
            Preset::Prettier(_) => {
                return Err(Error::configuration(format!(
                    "preset '{name}' holds Prettier options and has no rules to resolve"
                )))
            }
        }
        tracing::debug!(preset = name, elements = f.elements.len(), "compiled preset");
        Ok(CompiledPreset {
            name: name.to_string(),
            base_dir: self.options.base_dir.clone(),
            elements: f.elements,
            ignores: f.ignores,
        })
    }

    pub fn resolve(&self, name: &str, file: &Path) -> Result<EffectiveConfig> {
        Ok(self.compile(name)?.for_file(file))
    }

    /// Resolve many files against one compiled preset, in parallel. Output
    /// order follows `files`.
    pub fn resolve_many(&self, name: &str, files: &[PathBuf]) -> Result<Vec<EffectiveConfig>> {
        let compiled = self.compile(name)?;
        Ok(files.par_iter().map(|f| compiled.for_file(f)).collect())
    }
}

impl CompiledPreset {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element labels in application order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.label.as_str())
    }

    fn relative(&self, file: &Path) -> String {
        let rel = match &self.base_dir {
            Some(base) if file.is_absolute() => {
                pathdiff::diff_paths(file, base).unwrap_or_else(|| file.to_path_buf())
            }
            _ => file.to_path_buf(),
        };
        normalize_path(&rel.to_string_lossy())
    }

    pub fn for_file(&self, file: &Path) -> EffectiveConfig {
        let rel = self.relative(file);
        let mut eff = EffectiveConfig {
            preset: self.name.clone(),
            file: rel.clone(),
            ..EffectiveConfig::default()
        };
        if self.ignores.iter().any(|g| g.is_match(&rel)) {
            tracing::debug!(file = %rel, "file is globally ignored");
            eff.ignored = true;
            return eff;
        }
        for el in &self.elements {
            if el.criteria.iter().all(|c| c.matches(&rel)) {
                el.body.apply(&mut eff);
                eff.matched.push(el.label.clone());
            }
        }
        eff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RuleDirective, Severity};
    use serde_json::json;

    fn eslintrc(value: Json) -> ConfigPreset {
        serde_json::from_value(value).unwrap()
    }

    fn registry() -> PresetRegistry {
        let mut reg = PresetRegistry::new();
        reg.register(
            "base",
            eslintrc(json!({
                "env": {"browser": true},
                "plugins": ["import"],
                "rules": {"eqeqeq": "error", "no-console": ["error", {"allow": ["warn"]}], "curly": 2}
            })),
        )
        .unwrap();
        reg.register(
            "strict",
            eslintrc(json!({
                "extends": "base",
                "plugins": ["import", "unicorn"],
                "rules": {"eqeqeq": ["warn", "smart"]}
            })),
        )
        .unwrap();
        reg.register(
            "project",
            eslintrc(json!({
                "extends": ["strict", "plugin:react/recommended"],
                "rules": {"curly": "off"},
                "overrides": [
                    {"files": ["**/*.test.ts"], "rules": {"no-console": "off"}},
                    {"files": ["**/*.ts"], "rules": {"eqeqeq": "error", "max-len": "warn"}},
                    {"files": ["src/**"], "excludedFiles": ["src/legacy/**"], "rules": {"max-len": "off"}},
                    {"files": "App.tsx", "extends": "plugin:jsx-a11y/recommended", "rules": {"react/jsx-key": "error"}}
                ]
            })),
        )
        .unwrap();
        reg
    }

    fn resolve(reg: &PresetRegistry, name: &str, file: &str) -> EffectiveConfig {
        Resolver::new(reg, ResolveOptions::default())
            .resolve(name, Path::new(file))
            .unwrap()
    }

    #[test]
    fn test_extends_chain_then_own_rules() {
        let reg = registry();
        let eff = resolve(&reg, "project", "lib/index.js");
        assert_eq!(
            eff.rules["eqeqeq"],
            RuleDirective::with_options(Severity::Warn, vec![json!("smart")])
        );
        assert!(eff.rules["curly"].is_off());
        assert_eq!(eff.rules.keys().collect::<Vec<_>>(), vec!["eqeqeq", "no-console", "curly"]);
        assert_eq!(eff.plugins, vec!["import", "unicorn"]);
        assert_eq!(eff.env["browser"], true);
        assert_eq!(eff.external, vec!["plugin:react/recommended"]);
        assert_eq!(eff.matched, vec!["base", "strict", "plugin:react/recommended", "project"]);
    }

    #[test]
    fn test_override_off_wins_over_base() {
        let reg = registry();
        let eff = resolve(&reg, "project", "src/api/client.test.ts");
        assert!(eff.rules["no-console"].is_off());
        let plain = resolve(&reg, "project", "lib/client.js");
        assert_eq!(plain.rules["no-console"].severity(), Severity::Error);
        assert_eq!(plain.rules["no-console"].options(), &[json!({"allow": ["warn"]})]);
    }

    #[test]
    fn test_later_override_blocks_win() {
        let reg = registry();
        let eff = resolve(&reg, "project", "src/api/client.ts");
        assert_eq!(eff.rules["eqeqeq"], RuleDirective::new(Severity::Error));
        assert!(eff.rules["max-len"].is_off());
        let legacy = resolve(&reg, "project", "src/legacy/old.ts");
        assert_eq!(legacy.rules["max-len"].severity(), Severity::Warn);
    }

    #[test]
    fn test_basename_patterns_and_nested_extends() {
        let reg = registry();
        let eff = resolve(&reg, "project", "src/App.tsx");
        assert_eq!(eff.rules["react/jsx-key"].severity(), Severity::Error);
        assert_eq!(
            eff.external,
            vec!["plugin:react/recommended", "plugin:jsx-a11y/recommended"]
        );
        let other = resolve(&reg, "project", "src/Page.tsx");
        assert!(!other.rules.contains_key("react/jsx-key"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let reg = registry();
        let a = serde_json::to_string(&resolve(&reg, "project", "src/x.test.ts")).unwrap();
        let b = serde_json::to_string(&resolve(&reg, "project", "src/x.test.ts")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cycles_are_configuration_errors() {
        let mut reg = PresetRegistry::new();
        reg.register("self", eslintrc(json!({"extends": "self"}))).unwrap();
        reg.register("a", eslintrc(json!({"extends": "b"}))).unwrap();
        reg.register("b", eslintrc(json!({"overrides": [{"files": "*.ts", "extends": "a"}]})))
            .unwrap();
        let resolver = Resolver::new(&reg, ResolveOptions::default());
        let err = resolver.compile("self").unwrap_err();
        assert!(err.is_configuration());
        let err = resolver.compile("a").unwrap_err();
        assert!(err.to_string().contains("a -> b -> a"), "{err}");
    }

    #[test]
    fn test_malformed_glob_fails_at_compile() {
        let mut reg = PresetRegistry::new();
        reg.register(
            "bad",
            eslintrc(json!({"overrides": [{"files": "src/{a,b", "rules": {"x": "off"}}]})),
        )
        .unwrap();
        let err = Resolver::new(&reg, ResolveOptions::default())
            .compile("bad")
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_strict_policy_rejects_external_presets() {
        let reg = registry();
        let strict = ResolveOptions {
            extends_policy: ExtendsPolicy::Strict,
            ..ResolveOptions::default()
        };
        let err = Resolver::new(&reg, strict).compile("project").unwrap_err();
        assert!(matches!(err, Error::NotFound { ref name } if name == "plugin:react/recommended"));
        assert!(Resolver::new(&reg, ResolveOptions::default()).compile("missing").is_err());
    }

    #[test]
    fn test_flat_layers_and_ignores() {
        let mut reg = PresetRegistry::new();
        let flat: FlatConfig = serde_json::from_value(json!([
            {"ignores": ["dist/"]},
            {"name": "base", "extends": ["plugin:x/recommended"], "rules": {"no-var": "error"},
             "languageOptions": {"ecmaVersion": "latest", "parserOptions": {"ecmaFeatures": {"jsx": true}}}},
            {"name": "tests", "files": ["**/?(*.)+(spec|test).[jt]s?(x)"], "rules": {"no-var": "off"}},
            {"name": "tsx", "files": ["**/*.tsx"], "ignores": ["**/*.stories.tsx"], "rules": {"tsx-only": "warn"}},
            {"files": ["**/*.js"], "rules": {"js-only": "warn"}}
        ]))
        .unwrap();
        reg.register("flat", flat).unwrap();

        let eff = resolve(&reg, "flat", "src/Button.tsx");
        assert_eq!(eff.matched, vec!["plugin:x/recommended", "base", "tsx"]);
        assert!(eff.parser_options.jsx());
        assert_eq!(eff.rules["tsx-only"].severity(), Severity::Warn);

        let test = resolve(&reg, "flat", "src/Button.test.tsx");
        assert!(test.rules["no-var"].is_off());

        let story = resolve(&reg, "flat", "src/Button.stories.tsx");
        assert!(!story.rules.contains_key("tsx-only"));

        let js = resolve(&reg, "flat", "src/a.js");
        assert_eq!(js.matched, vec!["plugin:x/recommended", "base", "flat[4]"]);

        let dist = resolve(&reg, "flat", "dist/index.js");
        assert!(dist.ignored);
        assert!(dist.rules.is_empty());
    }

    #[test]
    fn test_ignore_patterns_cover_directories_at_any_depth() {
        let mut reg = PresetRegistry::new();
        reg.register(
            "ignoring",
            eslintrc(json!({
                "ignorePatterns": [
                    "node_modules", "build", "/coverage/", "*.min.js", "!build/keep.js"
                ],
                "rules": {"no-var": "error"}
            })),
        )
        .unwrap();
        for hidden in [
            "node_modules/lib/x.js",
            "packages/a/node_modules/y.js",
            "build/out.js",
            "build",
            "coverage/lcov.js",
            "vendor/jquery.min.js",
        ] {
            let eff = resolve(&reg, "ignoring", hidden);
            assert!(eff.ignored, "{hidden} should be ignored");
            assert!(eff.rules.is_empty());
        }
        for linted in [
            "src/builder.js",
            "src/build.ts",
            "packages/coverage/a.js",
            "build/keep.js",
        ] {
            let eff = resolve(&reg, "ignoring", linted);
            assert!(!eff.ignored, "{linted} should be linted");
            assert_eq!(eff.rules["no-var"].severity(), Severity::Error);
        }
    }

    #[test]
    fn test_absolute_paths_relative_to_base_dir() {
        let reg = registry();
        let base = std::env::temp_dir().join("lintkit-base");
        let resolver = Resolver::new(
            &reg,
            ResolveOptions {
                base_dir: Some(base.clone()),
                ..ResolveOptions::default()
            },
        );
        let eff = resolver
            .resolve("project", &base.join("src").join("a.test.ts"))
            .unwrap();
        assert_eq!(eff.file, "src/a.test.ts");
        assert!(eff.rules["no-console"].is_off());
    }

    #[test]
    fn test_parallel_resolution_keeps_order() {
        let reg = registry();
        let files: Vec<PathBuf> = ["a.ts", "b.test.ts", "src/legacy/c.ts", "App.tsx"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let resolver = Resolver::new(&reg, ResolveOptions::default());
        let many = resolver.resolve_many("project", &files).unwrap();
        let one_by_one: Vec<_> = files
            .iter()
            .map(|f| resolver.resolve("project", f).unwrap())
            .collect();
        assert_eq!(many, one_by_one);
    }
}
