use super::Emitter;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::markup::{Converter, STEP_PREFIX};
use crate::model::{ModuleLayout, StepRef, ThemeLayout};
use crate::template::Vars;
use crate::util::escape_html;

impl Emitter<'_> {
    /// Write step `idx` of `module` plus its popup pages. Returns the file count.
    pub fn emit_step(
        &self,
        theme: &ThemeLayout,
        module: &ModuleLayout,
        idx: usize,
        diag: &mut Diagnostics,
    ) -> Result<usize> {
        let step = &module.steps[idx];
        let at = StepRef::new(theme.name(), module.name(), &step.file_name);
        let location = at.to_string();

        let converted = Converter::new(self.scanned)
            .with_references(self.references)
            .convert(&step.body, &at, diag);

        let prev = match idx.checked_sub(1).map(|i| &module.steps[i]) {
            Some(p) => format!("<a class=\"prev\" href=\"{}\">Previous</a>", p.file_name),
            None => "<span class=\"prev disabled\">Previous</span>".to_string(),
        };
        let next = match module.steps.get(idx + 1) {
            Some(n) => format!("<a class=\"next\" href=\"{}\">Next</a>", n.file_name),
            None => "<span class=\"next disabled\">Next</span>".to_string(),
        };

        let layout = &self.scanned.layout;
        let breadcrumb = format!(
            "<a href=\"{STEP_PREFIX}courseindex.html\">{}</a> &gt; \
             <a href=\"../themeindex.html\">{}</a> &gt; \
             <a href=\"../themeindex.html#{}\">{}</a> &gt; {}",
            escape_html(&layout.title),
            escape_html(&theme.meta.title),
            module.name(),
            escape_html(&module.meta.title),
            escape_html(&step.title)
        );

        let theme_menu = self.menu(Some(self.nav.themes()), STEP_PREFIX, theme.name(), &location, diag);
        let module_menu = self.menu(
            self.nav.modules(theme.name(), module.name()),
            STEP_PREFIX,
            module.name(),
            &location,
            diag,
        );
        let step_menu = self.menu(
            self.nav.steps(theme.name(), module.name()),
            STEP_PREFIX,
            &step.file_name,
            &location,
            diag,
        );

        let vars = Vars::new()
            .set("title", escape_html(&step.title))
            .set("breadcrumb", breadcrumb)
            .set("theme_menu", theme_menu)
            .set("module_menu", module_menu)
            .set("step_menu", step_menu)
            .set("prev", prev)
            .set("next", next)
            .set("level", module.meta.level.as_str())
            .set("level_label", module.meta.level.label())
            .set("body", converted.body)
            .set("glossary_link", self.glossary_link(STEP_PREFIX))
            .set("references_link", self.references_link(STEP_PREFIX));
        let title = format!("{}: {}", layout.title, step.title);
        let html = self.page("step", vars, &title, STEP_PREFIX, "step")?;
        self.out.write(&at.path(), &html)?;

        let dir = format!("{}/{}", theme.name(), module.name());
        for popup in &converted.popups {
            self.write_popup(popup, &dir, STEP_PREFIX)?;
        }

        Ok(1 + converted.popups.len())
    }
}
