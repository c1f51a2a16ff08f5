//! Glossary and reference pages.

use std::collections::HashSet;
use std::fmt::Write;

use super::Emitter;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::markup::Converter;
use crate::model::{Bucket, GlossaryTable, GlossaryTerm, StepRef};
use crate::template::Vars;
use crate::util::escape_html;

impl Emitter<'_> {
    /// Write one page per non-empty glossary bucket plus `glossary/index.html`.
    ///
    /// Definitions are converted like step bodies, one level below the root.
    /// Their popups are written into `glossary/`.
    pub fn emit_glossary_pages(&self, diag: &mut Diagnostics) -> Result<usize> {
        let glossary = &self.scanned.glossary;
        if !glossary.has_terms() {
            log::debug!("no glossary terms; skipping glossary pages");
            return Ok(0);
        }

        let converter = Converter::new(self.scanned)
            .with_references(self.references)
            .with_prefix("../");
        let letters = letter_bar(glossary);
        let mut popups = HashSet::new();
        let mut written = 0;
        for bucket in Bucket::all() {
            let mut entries = String::new();
            for term in glossary.in_bucket(bucket) {
                let (Some(definition), Some(at)) = (&term.definition, &term.defined_at) else {
                    continue;
                };
                let converted = converter.convert(definition, at, diag);
                for popup in &converted.popups {
                    if popups.insert(popup.name.clone()) {
                        written += 1;
                    } else {
                        diag.warn(
                            at.to_string(),
                            format!("glossary popup '{}' appears twice; the later one replaces it", popup.name),
                        );
                    }
                    self.write_popup(popup, "glossary", "../")?;
                }
                entries.push_str(&glossary_entry(term, &converted.body));
            }
            if entries.is_empty() {
                continue;
            }
            let title = format!("Glossary: {}", bucket.label());
            let vars = Vars::new()
                .set("title", escape_html(&title))
                .set("letters", letters.as_str())
                .set("entries", entries);
            let html = self.page("glossary", vars, &title, "../", "glossary")?;
            self.out.write(&format!("glossary/{}", bucket.file_name()), &html)?;
            written += 1;
        }

        let mut entries = String::new();
        for term in glossary.defined() {
            writeln!(
                entries,
                "<li><a href=\"{}#{}\">{}</a></li>",
                term.bucket().file_name(),
                term.key,
                escape_html(&term.term)
            )
            .unwrap();
        }
        let vars = Vars::new()
            .set("title", "Glossary")
            .set("letters", letters)
            .set("entries", entries);
        let html = self.page("glossaryindex", vars, "Glossary", "../", "glossary")?;
        self.out.write("glossary/index.html", &html)?;

        Ok(written + 1)
    }

    /// Write `references.html` when citations exist and a handler is configured.
    pub fn emit_references(&self, diag: &mut Diagnostics) -> Result<usize> {
        let Some(handler) = self.references else {
            return Ok(0);
        };
        if self.scanned.references.is_empty() {
            return Ok(0);
        }

        let mut entries = String::new();
        for citation in self.scanned.references.iter() {
            let text = match handler.entry(&citation.key) {
                Some(text) => escape_html(text).into_owned(),
                None => {
                    diag.warn(
                        "references",
                        format!("no bibliography entry for cited key '{}'", citation.key),
                    );
                    format!("<span class=\"error\">Unknown reference '{}'</span>", escape_html(&citation.key))
                }
            };
            let id = format!("ref-{}", escape_html(&citation.key));
            writeln!(
                entries,
                "<li id=\"{id}\" value=\"{}\"><a name=\"{id}\"></a>{text} <span class=\"backlinks\">{}</span></li>",
                citation.number,
                backlinks(&citation.cited_at, "")
            )
            .unwrap();
        }

        let vars = Vars::new().set("title", "References").set("entries", entries);
        let html = self.page("references", vars, "References", "", "references")?;
        self.out.write("references.html", &html)?;
        Ok(1)
    }
}

/// Links to every bucket page, plain text for empty buckets.
fn letter_bar(glossary: &GlossaryTable) -> String {
    Bucket::all()
        .map(|bucket| {
            if glossary.in_bucket(bucket).next().is_some() {
                format!("<a href=\"{}\">{}</a>", bucket.file_name(), bucket.label())
            } else {
                format!("<span class=\"empty\">{}</span>", bucket.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn glossary_entry(term: &GlossaryTerm, definition: &str) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "<dt id=\"{0}\"><a name=\"{0}\"></a>{1}</dt>",
        term.key,
        escape_html(&term.term)
    )
    .unwrap();
    write!(out, "<dd>\n<div class=\"definition\">{definition}</div>\n").unwrap();
    if !term.references.is_empty() {
        writeln!(
            out,
            "<p class=\"backlinks\">Referenced in: {}</p>",
            backlinks(&term.references, "../")
        )
        .unwrap();
    }
    out.push_str("</dd>\n");
    out
}

/// Numbered links to each location, in order.
fn backlinks(locations: &[StepRef], prefix: &str) -> String {
    locations
        .iter()
        .enumerate()
        .map(|(i, at)| format!("<a href=\"{prefix}{}\" title=\"{at}\">{}</a>", at.path(), i + 1))
        .collect::<Vec<_>>()
        .join(" ")
}
