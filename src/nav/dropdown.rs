//! Navigation dropdowns.
//!
//! A dropdown is built once per course/module as a list of entries and
//! rendered once per page. Rendering takes the entry to highlight, so the
//! cached dropdown itself never changes.

use std::fmt::Write;

use crate::util::escape_html;

/// How an entry relates to the page it is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Plain,
    Prereq,
    Leadsto,
}

impl Relation {
    fn class(self) -> &'static str {
        match self {
            Relation::Plain => "plain",
            Relation::Prereq => "prereq",
            Relation::Leadsto => "leadsto",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownEntry {
    /// Identity used for highlighting (theme, module or step file name).
    pub key: String,
    pub label: String,
    /// Target path relative to the output root.
    pub href: String,
    pub relation: Relation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    pub id: String,
    pub entries: Vec<DropdownEntry>,
}

impl Dropdown {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, label: impl Into<String>, href: impl Into<String>, relation: Relation) {
        self.entries.push(DropdownEntry {
            key: key.into(),
            label: label.into(),
            href: href.into(),
            relation,
        });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Render as a `<select>`, marking the entry keyed `current` (if any) as current.
    ///
    /// `prefix` is the path from the rendering page back to the output root
    /// (`""`, `"../"` or `"../../"`). At most one entry is ever marked.
    pub fn render(&self, prefix: &str, current: Option<&str>) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "<select class=\"nav-dropdown\" id=\"{}\" onchange=\"if (this.value) window.location.href = this.value;\">",
            escape_html(&self.id)
        )
        .unwrap();

        let current_idx = current.and_then(|key| self.entries.iter().position(|e| e.key == key));
        for (i, entry) in self.entries.iter().enumerate() {
            let is_current = current_idx == Some(i);
            let class = if is_current {
                format!("current {}", entry.relation.class())
            } else {
                entry.relation.class().to_string()
            };
            writeln!(
                out,
                "  <option value=\"{}{}\" class=\"{}\"{}>{}</option>",
                prefix,
                escape_html(&entry.href),
                class,
                if is_current { " selected=\"selected\"" } else { "" },
                escape_html(&entry.label)
            )
            .unwrap();
        }
        out.push_str("</select>");
        out
    }
}
