//! Writing the generated site.
//!
//! The emitter only reads the scan results. Every write failure is fatal:
//! the destination is scratch space regenerated on each run, so there is no
//! partial-success mode.

mod glossary;
mod index;
mod resources;
mod step;

use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::markup::{Popup, ReferenceHandler};
use crate::nav::{Dropdown, Navigation};
use crate::scan::Scanned;
use crate::template::{TemplateEngine, Vars};

pub use resources::copy_resources;

/// Names the emitter writes at the output root.
pub const ROOT_OUTPUTS: &[&str] = &["index.html", "courseindex.html", "references.html", "glossary"];

/// Names the emitter writes in each theme directory.
pub const THEME_OUTPUTS: &[&str] = &["index.html", "themeindex.html"];

/// The destination directory.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `rel` inside the output.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Write `contents` to `rel`, creating parent directories as needed.
    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
        fs::write(&path, contents).map_err(|e| Error::write(&path, e))?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Copy `source` to `rel` inside the output.
    pub fn copy(&self, source: &Path, rel: &Path) -> Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
        fs::copy(source, &path).map_err(|e| Error::write(&path, e))?;
        Ok(())
    }
}

/// Renders pages from a finished scan.
pub struct Emitter<'a> {
    scanned: &'a Scanned,
    nav: &'a Navigation,
    templates: &'a dyn TemplateEngine,
    references: Option<&'a dyn ReferenceHandler>,
    out: &'a OutputDir,
}

impl<'a> Emitter<'a> {
    pub fn new(
        scanned: &'a Scanned,
        nav: &'a Navigation,
        templates: &'a dyn TemplateEngine,
        out: &'a OutputDir,
    ) -> Self {
        Self {
            scanned,
            nav,
            templates,
            references: None,
            out,
        }
    }

    pub fn with_references(mut self, handler: Option<&'a dyn ReferenceHandler>) -> Self {
        self.references = handler;
        self
    }

    /// Emit every page of the course. Returns the number of files written.
    pub fn emit_all(&self, diag: &mut Diagnostics) -> Result<usize> {
        let mut written = 0;
        for theme in &self.scanned.layout.themes {
            for module in &theme.modules {
                for idx in 0..module.steps.len() {
                    written += self.emit_step(theme, module, idx, diag)?;
                }
            }
            written += self.emit_theme_index(theme, diag)?;
        }
        written += self.emit_course_index(diag)?;
        written += self.emit_glossary_pages(diag)?;
        written += self.emit_references(diag)?;
        log::info!("wrote {written} pages to {}", self.out.root().display());
        Ok(written)
    }

    /// Render content template `id` and wrap it in the shared page skeleton.
    fn page(&self, id: &str, vars: Vars, title: &str, root: &str, class: &str) -> Result<String> {
        let content = self.templates.render(id, &vars)?;
        let page = Vars::new()
            .set("title", crate::util::escape_html(title))
            .set("root", root)
            .set("class", class)
            .set("content", content);
        self.templates.render("page", &page)
    }

    /// Write `popup` into the output directory `dir`, `root` levels below the top.
    fn write_popup(&self, popup: &Popup, dir: &str, root: &str) -> Result<()> {
        let vars = Vars::new()
            .set("title", crate::util::escape_html(&popup.title))
            .set("body", popup.content.as_str());
        let html = self.page("popup", vars, &popup.title, root, "popup")?;
        self.out.write(&format!("{dir}/{}", popup.file_name()), &html)
    }

    /// Render `menu` highlighting `current`, warning if it has no such entry.
    fn menu(
        &self,
        menu: Option<&Dropdown>,
        prefix: &str,
        current: &str,
        location: &str,
        diag: &mut Diagnostics,
    ) -> String {
        let Some(menu) = menu else {
            diag.warn(location, "no navigation menu available");
            return String::new();
        };
        if !menu.contains(current) {
            diag.warn(location, format!("{} menu has no entry '{current}'", menu.id));
        }
        menu.render(prefix, Some(current))
    }

    fn glossary_link(&self, prefix: &str) -> String {
        if self.scanned.glossary.has_terms() {
            format!("<a class=\"glossary-link\" href=\"{prefix}glossary/index.html\">Glossary</a>")
        } else {
            "<span class=\"glossary-link disabled\">Glossary</span>".to_string()
        }
    }

    fn has_references(&self) -> bool {
        self.references.is_some() && !self.scanned.references.is_empty()
    }

    fn references_link(&self, prefix: &str) -> String {
        if self.has_references() {
            format!("<a class=\"references-link\" href=\"{prefix}references.html\">References</a>")
        } else {
            "<span class=\"references-link disabled\">References</span>".to_string()
        }
    }
}
