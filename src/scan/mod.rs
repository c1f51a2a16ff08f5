//! Scan pass: read every step once and collect what the emit pass needs.
//!
//! The scan must finish before anything is rendered: a step may link to an
//! anchor defined in a later step, and glossary backlinks need every
//! reference in the course.

pub mod extract;
pub mod patterns;

use std::fs;
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::metadata::{Course, ThemeSource};
use crate::model::{
    AnchorTable, Definition, GlossaryTable, Layout, ModuleLayout, ReferenceTable, Step, StepRef,
    ThemeLayout, normalize_term,
};
use crate::nav::order::by_index_order;
use crate::plugin::Plugins;
use crate::util::{decode_text, extract_html_charset, strip_bom};

use crate::markup::Popup;

use patterns::{Attrs, GLOSSARY_DEF_RE, GLOSSARY_REF_RE, POPUP_RE, REF_RE, TARGET_RE};

/// Everything learned from the scan pass. Read-only from here on.
#[derive(Debug, Clone, Default)]
pub struct Scanned {
    pub layout: Layout,
    pub anchors: AnchorTable,
    pub glossary: GlossaryTable,
    pub references: ReferenceTable,
}

/// Walks the course tree and builds a [`Scanned`] snapshot.
pub struct Scanner<'a> {
    plugins: &'a Plugins,
    citations: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(plugins: &'a Plugins) -> Self {
        Self {
            plugins,
            citations: false,
        }
    }

    /// Also record `[ref]` citations (only meaningful with a reference handler).
    pub fn with_citations(mut self, enabled: bool) -> Self {
        self.citations = enabled;
        self
    }

    pub fn scan(&self, course: Course, title: &str, diag: &mut Diagnostics) -> Result<Scanned> {
        let mut scanned = Scanned::default();

        let mut themes = course.themes;
        by_index_order(
            &mut themes,
            |t: &ThemeSource| (t.meta.index_order, t.meta.name.as_str()),
            "course",
            diag,
        );

        for theme in themes {
            let layout = self.scan_theme(theme, &mut scanned, diag)?;
            scanned.layout.themes.push(layout);
        }

        scanned.layout.title = course
            .meta
            .as_ref()
            .and_then(|m| m.info.first())
            .map(|info| info.title.clone())
            .unwrap_or_else(|| title.to_string());
        scanned.layout.course = course.meta;

        for term in scanned.glossary.undefined() {
            let first = term.references.first().map(StepRef::to_string).unwrap_or_default();
            diag.warn(first, format!("glossary term '{}' is referenced but never defined", term.term));
        }

        log::info!(
            "scanned {} steps: {} anchors, {} glossary terms, {} citations",
            scanned.layout.steps().count(),
            scanned.anchors.len(),
            scanned.glossary.defined().count(),
            scanned.references.iter().count()
        );
        Ok(scanned)
    }

    fn scan_theme(
        &self,
        theme: ThemeSource,
        scanned: &mut Scanned,
        diag: &mut Diagnostics,
    ) -> Result<ThemeLayout> {
        let mut modules: Vec<_> = theme.meta.modules.values().cloned().collect();
        by_index_order(
            &mut modules,
            |m| (m.index_order, m.name.as_str()),
            &theme.meta.name,
            diag,
        );

        let mut layouts = Vec::with_capacity(modules.len());
        for meta in modules {
            let source_dir = theme.dir.join(&meta.name);
            let plugin = self
                .plugins
                .check_module(&theme.dir, &meta.name)
                .map_err(|problems| {
                    Error::step(&source_dir, format!("unreadable module: {}", problems.join("; ")))
                })?;
            log::debug!("scanning {}/{} with {}", theme.meta.name, meta.name, plugin.name());

            let mut steps = Vec::new();
            for source in plugin.process(&source_dir)? {
                let at = StepRef::new(&theme.meta.name, &meta.name, source.number.file_name());
                let step = read_step(&source.path, source.number, &at)?;
                self.record_markers(&step.body, &at, scanned, diag);
                steps.push(step);
            }
            if steps.is_empty() {
                diag.warn(format!("{}/{}", theme.meta.name, meta.name), "module has no steps");
            }

            layouts.push(ModuleLayout {
                meta,
                source_dir,
                steps,
            });
        }

        Ok(ThemeLayout {
            meta: theme.meta,
            source_dir: theme.dir,
            modules: layouts,
        })
    }

    /// Record anchors, glossary terms and citations found in one step body.
    ///
    /// Each marker kind is searched independently from the start of the body.
    /// Targets inside a popup are bound to the popup page.
    fn record_markers(&self, body: &str, at: &StepRef, scanned: &mut Scanned, diag: &mut Diagnostics) {
        record_targets(&POPUP_RE.replace_all(body, ""), at, scanned, diag);
        for caps in POPUP_RE.captures_iter(body) {
            let content = caps.get(2).map_or("", |m| m.as_str());
            if let Ok(popup) = Popup::from_marker(&Attrs::from_captures(&caps, 1), content) {
                let page = StepRef::new(&at.theme, &at.module, popup.file_name());
                record_targets(&popup.content, &page, scanned, diag);
            }
        }

        for caps in GLOSSARY_DEF_RE.captures_iter(body) {
            let Some(term) = glossary_term(&caps, at, diag) else {
                continue;
            };
            let definition = caps.get(2).map_or("", |m| m.as_str());
            if let Definition::Duplicate { first } = scanned.glossary.define(&term, definition, at) {
                diag.warn(
                    at.to_string(),
                    format!("glossary term '{term}' is already defined in {first}; keeping the first definition"),
                );
            }
        }

        for caps in GLOSSARY_REF_RE.captures_iter(body) {
            if let Some(term) = glossary_term(&caps, at, diag) {
                scanned.glossary.reference(&term, at);
            }
        }

        if self.citations {
            for caps in REF_RE.captures_iter(body) {
                match Attrs::from_captures(&caps, 1).get("key") {
                    Some(key) => {
                        scanned.references.cite(key, at);
                    }
                    None => diag.warn(at.to_string(), "reference marker without a key"),
                }
            }
        }
    }
}

fn record_targets(body: &str, at: &StepRef, scanned: &mut Scanned, diag: &mut Diagnostics) {
    for caps in TARGET_RE.captures_iter(body) {
        let Some(name) = Attrs::from_captures(&caps, 1).get("name").map(str::to_string) else {
            diag.warn(at.to_string(), "target marker without a name");
            continue;
        };
        if let Err(first) = scanned.anchors.insert(&name, at) {
            diag.warn(
                at.to_string(),
                format!("anchor '{name}' is already defined in {first}; keeping the first"),
            );
        }
    }
}

fn glossary_term(
    caps: &regex_lite::Captures<'_>,
    at: &StepRef,
    diag: &mut Diagnostics,
) -> Option<String> {
    let attrs = Attrs::from_captures(caps, 1);
    let Some(term) = attrs.get("term") else {
        diag.warn(at.to_string(), "glossary marker without a term");
        return None;
    };
    if !normalize_term(term).chars().any(char::is_alphanumeric) {
        diag.warn(at.to_string(), format!("glossary term '{term}' has no letters or digits"));
        return None;
    }
    Some(term.to_string())
}

/// Read one step source file and pull out its title and body.
fn read_step(path: &Path, number: crate::model::StepNumber, at: &StepRef) -> Result<Step> {
    let bytes = fs::read(path).map_err(|e| Error::read(path, e))?;
    let html = decode_text(strip_bom(&bytes), extract_html_charset(&bytes));

    let title = extract::title(&html)
        .ok_or_else(|| Error::step(path, "no <title> element to take the step title from"))?;
    let body = extract::body(&html)
        .ok_or_else(|| Error::step(path, "no content region or <body> element"))?
        .to_string();

    log::debug!("read {at} from {}", path.display());
    Ok(Step {
        number,
        file_name: at.step.clone(),
        source: path.to_path_buf(),
        title,
        body,
    })
}
