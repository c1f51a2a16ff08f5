//! Cached regex patterns for the custom course markup.
//!
//! Uses LazyLock to compile patterns once on first use. Markers look like
//! `[tag attr="value" ...]`, optionally self-closed with `/]` or paired with
//! a `[/tag]` closing marker. Attribute values may contain `\"`.

use regex_lite::{Captures, Regex};
use std::sync::LazyLock;

/// Attribute list of a marker: zero or more ` name="value"` pairs.
const ATTRS: &str = r#"(?:\s+\w+\s*=\s*"(?:[^"\\]|\\.)*")*"#;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid marker pattern {pattern}: {e}"))
}

/// Matches `[target name="x"]` (optionally self-closed)
pub static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\[target({ATTRS})\s*/?\]")));

/// Matches `[glossary term="x"]definition[/glossary]`
pub static GLOSSARY_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?s)\[glossary({ATTRS})\s*\](.*?)\[/glossary\]")));

/// Matches the bare reference form `[glossary term="x" /]`
pub static GLOSSARY_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\[glossary({ATTRS})\s*/\]")));

/// Matches `[ref key="x"]` citations (optionally self-closed)
pub static REF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\[ref({ATTRS})\s*/?\]")));

/// Matches `[image ...]`, `[anim ...]` and `[applet ...]`
pub static MEDIA_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\[(image|anim|applet)({ATTRS})\s*/?\]")));

/// Matches `[popup name="x" title="y"]content[/popup]`
pub static POPUP_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?s)\[popup({ATTRS})\s*\](.*?)\[/popup\]")));

/// Matches `[link to="anchor"]text[/link]`
pub static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?s)\[link({ATTRS})\s*\](.*?)\[/link\]")));

/// Matches one `name="value"` pair inside an attribute list
static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(\w+)\s*=\s*"((?:[^"\\]|\\.)*)""#));

/// Parsed marker attributes, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn parse(list: &str) -> Self {
        Attrs(
            ATTR_RE
                .captures_iter(list)
                .map(|caps| (caps[1].to_ascii_lowercase(), unescape_marker(&caps[2])))
                .collect(),
        )
    }

    /// Parse the attribute list captured as group `group`.
    pub fn from_captures(caps: &Captures<'_>, group: usize) -> Self {
        caps.get(group)
            .map(|m| Self::parse(m.as_str()))
            .unwrap_or_default()
    }

    /// Value of a non-empty attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Undo marker escaping: `\[` → `[`, `\]` → `]`, `\"` → `"`, `\\` → `\`.
pub fn unescape_marker(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('[' | ']' | '"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
