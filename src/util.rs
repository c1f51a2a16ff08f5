//! Text helpers shared by the scanner, converter and emitter.

use std::borrow::Cow;

use memchr::memmem;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Strip a UTF-8 byte order mark.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset>` and friends)
/// 3. Falls back to Windows-1252 (LaTeX2HTML exports are frequently Latin-1)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the declared charset from the head of an HTML document.
///
/// Recognizes both `<meta charset="...">` and the older
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">` form.
/// Only the first 1 KiB is inspected.
pub fn extract_html_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];
    let lower = prefix.to_ascii_lowercase();

    let pos = memmem::find(&lower, b"charset=")?;
    let mut start = pos + 8;
    while start < prefix.len() && matches!(prefix[start], b'"' | b'\'' | b' ') {
        start += 1;
    }
    let end = prefix[start..]
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'>' | b' ' | b'/'))
        .map(|i| start + i)
        .unwrap_or(prefix.len());

    if end == start {
        return None;
    }
    std::str::from_utf8(&prefix[start..end]).ok()
}

/// Find `needle` in `haystack` ignoring ASCII case, starting at byte `from`.
///
/// `needle` must already be lowercase. Offsets are byte offsets into the
/// original haystack (ASCII lowercasing preserves them).
pub fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    let lower = haystack.as_bytes()[from..].to_ascii_lowercase();
    memmem::find(&lower, needle.as_bytes()).map(|i| from + i)
}

/// Escape special characters for HTML text and attribute values.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Characters that cannot appear raw in a relative resource href.
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'`');

/// Percent-encode a relative resource path for use in `src`/`href`.
///
/// Path separators are kept so `figs/a b.png` becomes `figs/a%20b.png`.
pub fn encode_href(path: &str) -> String {
    utf8_percent_encode(path, HREF).to_string()
}

/// True if `name` can be used as one path component inside the output:
/// non-empty, no separators, no `..`, no control characters.
pub fn is_safe_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
}

/// Remove tags from an HTML fragment and collapse whitespace runs.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
