//! File-glob matching for override targeting.
//!
//! Patterns are translated to anchored regular expressions. Supported syntax:
//! - `*` (any run within a segment), `?` (one char within a segment)
//! - `**` as a whole segment (zero or more directories)
//! - `[abc]`, `[a-z]`, `[!abc]` character classes
//! - `{a,b}` brace alternation (nestable)
//! - extglobs `?(a|b)`, `*(a|b)`, `+(a|b)`, `@(a|b)`
//! - a leading `!` negates the whole pattern
//!
//! `!(a|b)` needs look-around and is rejected as malformed.

use crate::error::{Error, Result};
use regex::Regex;

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// Patterns without a `/` are matched against the basename only.
    pub match_base: bool,
}

#[derive(Debug, Clone)]
/// One compiled glob pattern.
pub struct Glob {
    source: String,
    regex: Regex,
    negated: bool,
    base_only: bool,
}

impl Glob {
    pub fn new(pattern: &str, options: MatchOptions) -> Result<Self> {
        let (negated, body) = match pattern.strip_prefix('!') {
            Some(rest) if !rest.starts_with('(') => (true, rest),
            _ => (false, pattern),
        };
        let body = body.strip_prefix("./").unwrap_or(body);
        if body.is_empty() {
            return Err(Error::configuration(format!(
                "invalid glob '{pattern}': empty pattern"
            )));
        }
        let translated = translate(body).map_err(|reason| {
            Error::configuration(format!("invalid glob '{pattern}': {reason}"))
        })?;
        let regex = Regex::new(&translated)
            .map_err(|e| Error::configuration(format!("invalid glob '{pattern}': {e}")))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            negated,
            base_only: options.match_base && !body.contains('/'),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Match ignoring the negation flag.
    fn matches_body(&self, path: &str) -> bool {
        let path = normalize_path(path);
        if self.base_only {
            let base = path.rsplit('/').next().unwrap_or(&path);
            return self.regex.is_match(base);
        }
        self.regex.is_match(&path)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matches_body(path) != self.negated
    }
}

#[derive(Debug, Clone, Default)]
/// A list of globs: a path matches when any positive pattern matches and no
/// negated pattern excludes it.
pub struct GlobSet {
    globs: Vec<Glob>,
}

impl GlobSet {
    pub fn new<I, S>(patterns: I, options: MatchOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let globs = patterns
            .into_iter()
            .map(|p| Glob::new(p.as_ref(), options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { globs })
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.globs.iter().map(Glob::source)
    }

    pub fn is_match(&self, path: &str) -> bool {
        let mut hit = false;
        for g in &self.globs {
            if g.is_negated() {
                if g.matches_body(path) {
                    return false;
                }
            } else if !hit && g.matches_body(path) {
                hit = true;
            }
        }
        hit
    }
}

/// Forward slashes, no leading `./`, no doubled separators.
pub fn normalize_path(path: &str) -> String {
    let mut s = path.replace('\\', "/");
    while s.contains("//") {
        s = s.replace("//", "/");
    }
    let mut rest = s.as_str();
    while let Some(r) = rest.strip_prefix("./") {
        rest = r;
    }
    rest.to_string()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    Top,
    Brace,
    Ext,
}

fn translate(pattern: &str) -> std::result::Result<String, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut pos = 0;
    let mut out = String::from("^");
    parse_seq(&chars, &mut pos, Context::Top, &mut out)?;
    if pos < chars.len() {
        return Err(format!("unexpected '{}'", chars[pos]));
    }
    out.push('$');
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn parse_seq(
    chars: &[char],
    pos: &mut usize,
    ctx: Context,
    out: &mut String,
) -> std::result::Result<(), String> {
    while *pos < chars.len() {
        let c = chars[*pos];
        let next = chars.get(*pos + 1).copied();
        match c {
            ',' | '}' if ctx == Context::Brace => return Ok(()),
            '|' | ')' if ctx == Context::Ext => return Ok(()),
            '?' | '*' | '+' | '@' if next == Some('(') => parse_extglob(c, chars, pos, out)?,
            '!' if next == Some('(') => {
                return Err("negated extglob '!(...)' is not supported".to_string())
            }
            '\\' => {
                let escaped = next.ok_or_else(|| "trailing escape".to_string())?;
                push_literal(out, escaped);
                *pos += 2;
            }
            '*' => {
                let seg_start = *pos == 0 || chars[*pos - 1] == '/';
                if next == Some('*') {
                    let after = *pos + 2;
                    let seg_end = after == chars.len() || chars[after] == '/';
                    if seg_start && seg_end {
                        if after == chars.len() {
                            out.push_str(".*");
                            *pos = after;
                        } else {
                            out.push_str("(?:[^/]*/)*");
                            *pos = after + 1;
                        }
                        continue;
                    }
                }
                while chars.get(*pos) == Some(&'*') {
                    *pos += 1;
                }
                out.push_str("[^/]*");
            }
            '?' => {
                out.push_str("[^/]");
                *pos += 1;
            }
            '[' => parse_class(chars, pos, out)?,
            '{' => parse_brace(chars, pos, out)?,
            other => {
                push_literal(out, other);
                *pos += 1;
            }
        }
    }
    Ok(())
}

fn parse_extglob(
    kind: char,
    chars: &[char],
    pos: &mut usize,
    out: &mut String,
) -> std::result::Result<(), String> {
    *pos += 2;
    let mut alts = Vec::new();
    loop {
        let mut alt = String::new();
        parse_seq(chars, pos, Context::Ext, &mut alt)?;
        alts.push(alt);
        match chars.get(*pos) {
            Some('|') => *pos += 1,
            Some(')') => {
                *pos += 1;
                break;
            }
            _ => return Err(format!("unclosed '{kind}('")),
        }
    }
    let quantifier = match kind {
        '?' => "?",
        '*' => "*",
        '+' => "+",
        _ => "",
    };
    out.push_str("(?:");
    out.push_str(&alts.join("|"));
    out.push(')');
    out.push_str(quantifier);
    Ok(())
}

fn parse_brace(
    chars: &[char],
    pos: &mut usize,
    out: &mut String,
) -> std::result::Result<(), String> {
    *pos += 1;
    let mut alts = Vec::new();
    loop {
        let mut alt = String::new();
        parse_seq(chars, pos, Context::Brace, &mut alt)?;
        alts.push(alt);
        match chars.get(*pos) {
            Some(',') => *pos += 1,
            Some('}') => {
                *pos += 1;
                break;
            }
            _ => return Err("unclosed '{'".to_string()),
        }
    }
    out.push_str("(?:");
    out.push_str(&alts.join("|"));
    out.push(')');
    Ok(())
}

fn parse_class(
    chars: &[char],
    pos: &mut usize,
    out: &mut String,
) -> std::result::Result<(), String> {
    *pos += 1;
    let mut class = String::from("[");
    let negated = matches!(chars.get(*pos), Some('!') | Some('^'));
    if negated {
        class.push('^');
        *pos += 1;
    }
    let mut first = true;
    loop {
        match chars.get(*pos) {
            None => return Err("unclosed '['".to_string()),
            Some(']') if !first => {
                *pos += 1;
                break;
            }
            Some('\\') => {
                let c = chars
                    .get(*pos + 1)
                    .ok_or_else(|| "trailing escape".to_string())?;
                class.push('\\');
                class.push(*c);
                *pos += 2;
            }
            Some(&c) => {
                // `[`, `&&` and `~~` carry set-operation meaning inside regex classes.
                if matches!(c, '[' | ']' | '&' | '~') {
                    class.push('\\');
                }
                class.push(c);
                *pos += 1;
            }
        }
        first = false;
    }
    if negated {
        class.push('/');
    }
    class.push(']');
    out.push_str(&class);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(p: &str) -> Glob {
        Glob::new(p, MatchOptions::default()).unwrap()
    }

    #[test]
    fn test_globstar_matches_nested_dot_spec_ts() {
        let g = glob("**/*.spec.ts");
        assert!(g.is_match("src/features/foo/foo.spec.ts"));
        assert!(g.is_match("foo.spec.ts"));
        assert!(!g.is_match("src/features/foo/foo.ts"));
    }

    #[test]
    fn test_extglob_test_file_pattern() {
        let g = glob("**/?(*.)+(spec|test).[jt]s?(x)");
        for hit in ["src/a.test.tsx", "foo.spec.js", "test.ts", "a/b/c.spec.jsx"] {
            assert!(g.is_match(hit), "{hit}");
        }
        for miss in ["src/a.tsx", "spec.md", "src/a.test.tsxx", "contest.ts.bak"] {
            assert!(!g.is_match(miss), "{miss}");
        }
    }

    #[test]
    fn test_single_star_stays_in_segment() {
        let g = glob("*.tsx");
        assert!(g.is_match("App.tsx"));
        assert!(!g.is_match("src/App.tsx"));
        let g = glob("**/*.tsx");
        assert!(g.is_match("src/App.tsx"));
    }

    #[test]
    fn test_ui_directory_pattern() {
        let g = glob("src/ui/**/*.[jt]s?(x)");
        assert!(g.is_match("src/ui/button.tsx"));
        assert!(g.is_match("src/ui/forms/input.js"));
        assert!(!g.is_match("src/features/ui.ts"));
        let g = glob("src/**/ui/**/*.[jt]s?(x)");
        assert!(g.is_match("src/features/cart/ui/list.ts"));
        assert!(g.is_match("src/ui/list.ts"));
    }

    #[test]
    fn test_braces_question_mark_and_classes() {
        let g = glob("{pages,locales}/**");
        assert!(g.is_match("pages/index.ts"));
        assert!(!g.is_match("models/index.ts"));
        let g = glob("file?.{js,{c,m}js}");
        assert!(g.is_match("file1.mjs"));
        assert!(!g.is_match("file12.js"));
        let g = glob("[!_]*.ts");
        assert!(g.is_match("a.ts"));
        assert!(!g.is_match("_a.ts"));
    }

    #[test]
    fn test_match_base_for_slashless_patterns() {
        let opts = MatchOptions { match_base: true };
        let g = Glob::new("App.tsx", opts).unwrap();
        assert!(g.is_match("src/App.tsx"));
        let g = Glob::new("src/App.tsx", opts).unwrap();
        assert!(!g.is_match("lib/src/App.tsx"));
    }

    #[test]
    fn test_paths_are_normalized() {
        let g = glob("src/**/*.ts");
        assert!(g.is_match("./src/a.ts"));
        assert!(g.is_match("src\\nested\\a.ts"));
        assert_eq!(normalize_path(".//src//a.ts"), "src/a.ts");
    }

    #[test]
    fn test_malformed_globs_are_configuration_errors() {
        for bad in ["src/{a,b", "[abc", "+(a|b", "!(a).ts", "", "foo\\"] {
            let err = Glob::new(bad, MatchOptions::default()).unwrap_err();
            assert!(err.is_configuration(), "{bad}");
        }
    }

    #[test]
    fn test_glob_set_negation() {
        let set = GlobSet::new(["**/*.ts", "!**/*.d.ts"], MatchOptions::default()).unwrap();
        assert!(set.is_match("src/a.ts"));
        assert!(!set.is_match("src/a.d.ts"));
        assert!(!set.is_match("src/a.js"));
        assert_eq!(set.patterns().count(), 2);
    }
}
