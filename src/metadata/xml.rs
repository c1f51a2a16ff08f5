//! Minimal element tree over quick-xml events.
//!
//! Metadata files are small, so they are read into a tree of [`Element`]s and
//! validated afterwards. Whitespace is kept while reading (entity references
//! arrive as separate events and trimming would eat the spaces around them);
//! [`Element::text`] trims on access.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// An XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    raw_text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(local_name(e.name().as_ref())).into_owned();
        let attrs = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(local_name(attr.key.as_ref())).into_owned();
                let value = unescape(&String::from_utf8_lossy(&attr.value));
                (key, value)
            })
            .collect();
        Self {
            name,
            attrs,
            ..Default::default()
        }
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &str {
        self.raw_text.trim()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of the first child called `name`, if present and non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text).filter(|t| !t.is_empty())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Parse an XML document into its root element.
pub fn parse_document(content: &str, path: &Path) -> Result<Element> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    let xml_error = |message: String| Error::Xml {
        path: path.to_path_buf(),
        message,
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Element::from_start(&e)),
            Ok(Event::Empty(e)) => {
                let elem = Element::from_start(&e);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(elem),
                    None if root.is_none() => root = Some(elem),
                    None => return Err(xml_error("multiple root elements".into())),
                }
            }
            Ok(Event::End(_)) => {
                let Some(elem) = stack.pop() else {
                    return Err(xml_error("unbalanced end tag".into()));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(elem),
                    None if root.is_none() => root = Some(elem),
                    None => return Err(xml_error("multiple root elements".into())),
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.raw_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.raw_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(top) = stack.last_mut() {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    match resolve_entity(&entity) {
                        Some(resolved) => top.raw_text.push_str(&resolved),
                        None => return Err(xml_error(format!("unknown entity &{entity};"))),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e.to_string())),
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("unexpected end of document".into()));
    }
    root.ok_or_else(|| xml_error("document has no root element".into()))
}

/// Extract encoding from an XML declaration.
///
/// Looks for `<?xml ... encoding="..." ?>` in the first 100 bytes.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after_enc[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after_enc[1..value_end]).ok()
}

/// Extract local name from namespaced XML name (e.g., "cp:module" -> "module").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

/// Resolve entity references inside an attribute value. Unknown ones are kept verbatim.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match tail.find(';').and_then(|semi| Some((semi, resolve_entity(&tail[..semi])?))) {
            Some((semi, resolved)) => {
                out.push_str(&resolved);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
