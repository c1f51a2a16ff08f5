//! Title and body extraction from step source HTML.
//!
//! Step files are whatever the authoring tool produced, often not well-formed,
//! so extraction works on byte offsets rather than a full parse. The body is
//! the region between `<!-- content -->` and `<!-- /content -->` when the
//! author marked one, otherwise the contents of `<body>`.

use crate::util::{find_ignore_case, strip_tags};

const CONTENT_START: &str = "<!-- content -->";
const CONTENT_END: &str = "<!-- /content -->";

/// Text of the `<title>` element, tags stripped and whitespace collapsed.
pub fn title(html: &str) -> Option<String> {
    let open = find_open_tag(html, "<title")?;
    let start = open + memchr::memchr(b'>', &html.as_bytes()[open..])? + 1;
    let end = find_ignore_case(html, "</title>", start)?;

    let title = strip_tags(&html[start..end]);
    (!title.is_empty()).then_some(title)
}

/// The content region of a step page.
pub fn body(html: &str) -> Option<&str> {
    if let Some(open) = find_ignore_case(html, CONTENT_START, 0) {
        let start = open + CONTENT_START.len();
        let end = find_ignore_case(html, CONTENT_END, start)?;
        return Some(html[start..end].trim());
    }

    let open = find_open_tag(html, "<body")?;
    let start = open + memchr::memchr(b'>', &html.as_bytes()[open..])? + 1;
    let end = find_ignore_case(html, "</body>", start)?;
    Some(html[start..end].trim())
}

/// Offset of the first `<tag` that is followed by `>` or whitespace, so
/// `<title` does not match `<titlepage>`.
fn find_open_tag(html: &str, tag: &str) -> Option<usize> {
    let mut from = 0;
    loop {
        let open = find_ignore_case(html, tag, from)?;
        match html.as_bytes().get(open + tag.len()) {
            Some(b'>') => return Some(open),
            Some(b) if b.is_ascii_whitespace() => return Some(open),
            Some(_) => from = open + tag.len(),
            None => return None,
        }
    }
}
