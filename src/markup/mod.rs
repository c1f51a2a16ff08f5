//! Rewriting of the custom course markup into HTML.
//!
//! A step body goes through a fixed sequence of rules. Each rule only
//! touches text matching its own marker pattern, and later rules see the
//! output of earlier ones:
//!
//! 1. glossary markers
//! 2. media markers (`image`, `anim`, `applet`)
//! 3. popups
//! 4. inter-step links
//! 5. link targets
//! 6. citations, then citation compression
//!
//! Popup content leaves the body at rule 3 and goes through rules 4 to 6
//! on its own. Rules never fail: a broken marker becomes an inline error
//! fragment and a warning, and the rest of the page still renders.

pub mod media;
pub mod popup;
pub mod refs;

use regex_lite::Captures;

use crate::diagnostics::Diagnostics;
use crate::model::StepRef;
use crate::scan::Scanned;
use crate::scan::patterns::{
    Attrs, GLOSSARY_DEF_RE, GLOSSARY_REF_RE, LINK_RE, MEDIA_RE, POPUP_RE, REF_RE, TARGET_RE,
};
use crate::util::escape_html;

pub use media::Media;
pub use popup::Popup;
pub use refs::{Bibliography, ReferenceHandler};

/// Path from a step page back to the output root.
pub const STEP_PREFIX: &str = "../../";

/// A converted step body and the popup pages it spawned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Converted {
    pub body: String,
    pub popups: Vec<Popup>,
}

/// Converts step bodies against a finished scan.
pub struct Converter<'a> {
    scanned: &'a Scanned,
    references: Option<&'a dyn ReferenceHandler>,
    /// Path from the page being written back to the output root.
    prefix: &'a str,
}

impl<'a> Converter<'a> {
    pub fn new(scanned: &'a Scanned) -> Self {
        Self {
            scanned,
            references: None,
            prefix: STEP_PREFIX,
        }
    }

    pub fn with_references(mut self, handler: Option<&'a dyn ReferenceHandler>) -> Self {
        self.references = handler;
        self
    }

    /// Convert for a page at another depth than a step, e.g. `"../"`.
    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn convert(&self, body: &str, at: &StepRef, diag: &mut Diagnostics) -> Converted {
        let body = self.glossary(body, at, diag);
        let body = media_markers(&body, at, diag);
        let (body, mut popups) = popups(&body, at, diag);
        let body = self.cross_links(&body, at, diag);
        for popup in &mut popups {
            popup.content = self.cross_links(&popup.content, at, diag);
        }
        Converted { body, popups }
    }

    /// Rules 4 to 6.
    fn cross_links(&self, body: &str, at: &StepRef, diag: &mut Diagnostics) -> String {
        let body = self.links(body, at, diag);
        let body = targets(&body);
        match self.references {
            Some(handler) => self.citations(&body, handler),
            None => body,
        }
    }

    fn glossary(&self, body: &str, at: &StepRef, diag: &mut Diagnostics) -> String {
        let mut link = |caps: &Captures<'_>| {
            let attrs = Attrs::from_captures(caps, 1);
            let Some(term) = attrs.get("term") else {
                return error_span("glossary marker without a term");
            };
            match self.scanned.glossary.get(term).filter(|t| t.is_defined()) {
                Some(entry) => format!(
                    "<a class=\"glossary\" href=\"{}glossary/{}#{}\">{}</a>",
                    self.prefix,
                    entry.bucket().file_name(),
                    entry.key,
                    escape_html(term)
                ),
                None => {
                    diag.warn(at.to_string(), format!("no glossary entry for '{term}'"));
                    error_span(&format!("Unknown glossary term '{term}'"))
                }
            }
        };
        let body = GLOSSARY_DEF_RE.replace_all(body, &mut link).into_owned();
        GLOSSARY_REF_RE.replace_all(&body, &mut link).into_owned()
    }

    fn links(&self, body: &str, at: &StepRef, diag: &mut Diagnostics) -> String {
        LINK_RE
            .replace_all(body, |caps: &Captures<'_>| {
                let text = caps.get(2).map_or("", |m| m.as_str());
                let Some(anchor) = Attrs::from_captures(caps, 1).get("to").map(str::to_string) else {
                    diag.warn(at.to_string(), "link marker without a 'to' attribute");
                    return error_span("Link marker without a target");
                };
                match self.scanned.anchors.get(&anchor) {
                    Some(target) => format!(
                        "<a href=\"{}{}#{}\">{text}</a>",
                        self.prefix,
                        target.path(),
                        escape_html(&anchor)
                    ),
                    None => {
                        diag.warn(at.to_string(), format!("unable to locate anchor '{anchor}'"));
                        error_span(&format!("Unable to locate anchor '{anchor}'"))
                    }
                }
            })
            .into_owned()
    }

    fn citations(&self, body: &str, handler: &dyn ReferenceHandler) -> String {
        let cited = REF_RE.replace_all(body, |caps: &Captures<'_>| {
            Attrs::from_captures(caps, 1)
                .get("key")
                .and_then(|key| self.scanned.references.get(key))
                .map(|citation| handler.cite(citation, self.prefix))
                .unwrap_or_else(|| error_span("Reference marker without a key"))
        });
        handler.compress(&cited)
    }
}

fn media_markers(body: &str, at: &StepRef, diag: &mut Diagnostics) -> String {
    MEDIA_RE
        .replace_all(body, |caps: &Captures<'_>| {
            let Some(kind) = Media::from_tag(&caps[1]) else {
                return caps[0].to_string();
            };
            media::render(kind, &Attrs::from_captures(caps, 2)).unwrap_or_else(|message| {
                diag.warn(at.to_string(), message.as_str());
                media::error(&message)
            })
        })
        .into_owned()
}

fn popups(body: &str, at: &StepRef, diag: &mut Diagnostics) -> (String, Vec<Popup>) {
    let mut found: Vec<Popup> = Vec::new();
    let body = POPUP_RE
        .replace_all(body, |caps: &Captures<'_>| {
            let attrs = Attrs::from_captures(caps, 1);
            let content = caps.get(2).map_or("", |m| m.as_str());
            let popup = match Popup::from_marker(&attrs, content) {
                Ok(popup) => popup,
                Err(message) => {
                    diag.warn(at.to_string(), message.as_str());
                    return media::error(&message);
                }
            };
            if found.iter().any(|p| p.name == popup.name) {
                diag.warn(
                    at.to_string(),
                    format!("popup '{}' appears twice; the later one replaces it", popup.name),
                );
                found.retain(|p| p.name != popup.name);
            }
            let link = popup.link();
            found.push(popup);
            link
        })
        .into_owned();
    (body, found)
}

fn targets(body: &str) -> String {
    TARGET_RE
        .replace_all(body, |caps: &Captures<'_>| {
            match Attrs::from_captures(caps, 1).get("name") {
                Some(name) => {
                    let name = escape_html(name);
                    format!("<a id=\"{name}\" name=\"{name}\"></a>")
                }
                None => String::new(),
            }
        })
        .into_owned()
}

fn error_span(message: &str) -> String {
    format!("<span class=\"error\">{}</span>", escape_html(message))
}
