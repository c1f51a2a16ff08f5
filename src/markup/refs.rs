//! Citation rendering.
//!
//! `[ref key="x" /]` markers are handed to a [`ReferenceHandler`], which
//! renders each citation and then merges runs of adjacent citations. The
//! built-in handler reads a bibliography XML file:
//!
//! ```xml
//! <references>
//!   <reference key="knuth84">D. Knuth, Literate Programming, 1984.</reference>
//! </references>
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::{Error, Result};
use crate::metadata::xml::{extract_xml_encoding, parse_document};
use crate::model::Citation;
use crate::util::{decode_text, escape_html, strip_bom};

/// Renders citations and supplies the text of cited works.
pub trait ReferenceHandler {
    /// Inline citation for `citation`, linking into `references.html` via `prefix`.
    fn cite(&self, citation: &Citation, prefix: &str) -> String;

    /// Merge adjacent citations produced by [`cite`](Self::cite).
    fn compress(&self, html: &str) -> String;

    /// Bibliography text for `key`, if known.
    fn entry(&self, key: &str) -> Option<&str>;
}

/// Citations closed and immediately reopened, with only whitespace between.
static ADJACENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\]</cite>\s*<cite class="ref">\["#)
        .unwrap_or_else(|e| panic!("invalid citation pattern: {e}"))
});

/// Numbered citations backed by a bibliography file.
#[derive(Debug, Clone, Default)]
pub struct Bibliography {
    entries: HashMap<String, String>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::read(path, e))?;
        let content = decode_text(strip_bom(&bytes), extract_xml_encoding(&bytes));
        let root = parse_document(&content, path)?;
        if root.name != "references" {
            return Err(Error::Xml {
                path: path.to_path_buf(),
                message: format!("expected <references> root, found <{}>", root.name),
            });
        }

        let mut bib = Self::new();
        for elem in root.children_named("reference") {
            let Some(key) = elem.attr("key").map(str::trim).filter(|k| !k.is_empty()) else {
                return Err(Error::Xml {
                    path: path.to_path_buf(),
                    message: "<reference> without a key attribute".into(),
                });
            };
            if bib.entries.contains_key(key) {
                log::warn!("{}: reference '{key}' listed twice; keeping the first", path.display());
                continue;
            }
            bib.insert(key, elem.text());
        }
        log::debug!("loaded {} references from {}", bib.entries.len(), path.display());
        Ok(bib)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceHandler for Bibliography {
    fn cite(&self, citation: &Citation, prefix: &str) -> String {
        format!(
            "<cite class=\"ref\">[<a href=\"{prefix}references.html#ref-{}\">{}</a>]</cite>",
            escape_html(&citation.key),
            citation.number
        )
    }

    fn compress(&self, html: &str) -> String {
        ADJACENT_RE.replace_all(html, ",").into_owned()
    }

    fn entry(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(key: &str, number: usize) -> Citation {
        Citation {
            key: key.into(),
            number,
            cited_at: Vec::new(),
        }
    }

    #[test]
    fn test_compress_merges_adjacent_runs() {
        let bib = Bibliography::new();
        let html = format!(
            "a {}{} {} b {}",
            bib.cite(&citation("x", 1), ""),
            bib.cite(&citation("y", 2), ""),
            bib.cite(&citation("z", 3), ""),
            bib.cite(&citation("w", 4), "")
        );
        let compressed = bib.compress(&html);

        assert_eq!(compressed.matches("<cite").count(), 2);
        assert!(compressed.contains(">1</a>,<a href=\"references.html#ref-y\">2</a>,<a"));
        assert!(compressed.ends_with("b <cite class=\"ref\">[<a href=\"references.html#ref-w\">4</a>]</cite>"));
    }

    #[test]
    fn test_load_bibliography() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("refs.xml");
        fs::write(
            &path,
            r#"<references>
                 <reference key="knuth">D. Knuth &amp; friends</reference>
                 <reference key="knuth">ignored</reference>
               </references>"#,
        )
        .unwrap();

        let bib = Bibliography::load(&path).unwrap();
        assert_eq!(bib.len(), 1);
        assert_eq!(bib.entry("knuth"), Some("D. Knuth & friends"));
        assert_eq!(bib.entry("other"), None);
    }

    #[test]
    fn test_load_rejects_wrong_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("refs.xml");
        fs::write(&path, "<bibliography/>").unwrap();
        assert!(matches!(Bibliography::load(&path), Err(Error::Xml { .. })));
    }
}
