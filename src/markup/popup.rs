//! Local popups: marker content moved into its own page next to the step.

use crate::scan::patterns::{Attrs, unescape_marker};
use crate::util::{encode_href, escape_html, is_safe_component};

/// A popup page to be written into the module output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub name: String,
    pub title: String,
    /// Content with marker escapes already undone.
    pub content: String,
}

impl Popup {
    /// Build a popup from its marker. The error is the message for the
    /// inline error fragment.
    pub fn from_marker(attrs: &Attrs, content: &str) -> Result<Self, String> {
        let name = attrs
            .get("name")
            .ok_or("popup marker has no 'name' attribute")?
            .to_string();
        if !is_safe_component(&name) {
            return Err(format!("popup name '{name}' cannot be used as a file name"));
        }
        let title = attrs.get("title").unwrap_or(&name).to_string();
        Ok(Popup {
            name,
            title,
            content: unescape_marker(content),
        })
    }

    pub fn file_name(&self) -> String {
        format!("popup_{}.html", self.name)
    }

    /// True for file names of the form written by [`Popup::file_name`].
    pub fn is_file_name(name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        lower.starts_with("popup_") && lower.ends_with(".html")
    }

    /// Link placed in the step in place of the marker.
    pub fn link(&self) -> String {
        let href = escape_html(&encode_href(&self.file_name())).into_owned();
        let window = escape_html(&self.name).into_owned();
        format!(
            "<a class=\"popup\" href=\"{href}\" onclick=\"window.open(this.href, 'popup_{window}', 'width=500,height=400,scrollbars=yes'); return false;\">{}</a>",
            escape_html(&self.title)
        )
    }
}
