//! `[image]`, `[anim]` and `[applet]` markers.

use std::fmt::Write;

use crate::scan::patterns::Attrs;
use crate::util::{encode_href, escape_html};

/// Kind of embedded media, from the marker tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media {
    Image,
    Anim,
    Applet,
}

impl Media {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "image" => Some(Media::Image),
            "anim" => Some(Media::Anim),
            "applet" => Some(Media::Applet),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Media::Image => "image",
            Media::Anim => "anim",
            Media::Applet => "applet",
        }
    }

    fn needs_size(self) -> bool {
        !matches!(self, Media::Image)
    }
}

/// Render one media marker, or an error paragraph naming what is missing.
///
/// The error string is returned alongside so the caller can log it.
pub fn render(media: Media, attrs: &Attrs) -> Result<String, String> {
    let Some(name) = attrs.get("name") else {
        return Err(format!("{} marker has no 'name' attribute", media.tag()));
    };

    let size = match (attrs.get("width"), attrs.get("height")) {
        (Some(w), Some(h)) => Some((w, h)),
        _ if media.needs_size() => {
            return Err(format!(
                "{} marker '{name}' needs both 'width' and 'height' attributes",
                media.tag()
            ));
        }
        _ => None,
    };
    let size_attrs = size
        .map(|(w, h)| format!(" width=\"{}\" height=\"{}\"", escape_html(w), escape_html(h)))
        .unwrap_or_default();

    let src = escape_html(&encode_href(name)).into_owned();
    let mut out = String::new();
    match media {
        Media::Image => {
            let alt = attrs.get("alt").unwrap_or(name);
            write!(out, "<img src=\"{src}\" alt=\"{}\"{size_attrs} />", escape_html(alt)).unwrap();
        }
        Media::Anim => {
            let mime = attrs.get("type").unwrap_or_else(|| guess_type(name));
            write!(
                out,
                "<object data=\"{src}\" type=\"{}\"{size_attrs}><param name=\"movie\" value=\"{src}\" /></object>",
                escape_html(mime)
            )
            .unwrap();
        }
        Media::Applet => {
            write!(out, "<applet code=\"{src}\"{size_attrs}").unwrap();
            for extra in ["codebase", "archive"] {
                if let Some(value) = attrs.get(extra) {
                    write!(out, " {extra}=\"{}\"", escape_html(value)).unwrap();
                }
            }
            out.push_str("></applet>");
        }
    }
    Ok(out)
}

/// Inline error fragment shown in place of a broken media marker.
pub fn error(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", escape_html(message))
}

fn guess_type(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "swf" => "application/x-shockwave-flash",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
