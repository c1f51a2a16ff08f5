//! Theme index, theme map, course index and splash pages.

use std::fmt::Write;
use std::fs;

use super::Emitter;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::metadata::{CourseInfo, SplashKind};
use crate::model::{ModuleLayout, ThemeLayout};
use crate::nav::module_href;
use crate::template::Vars;
use crate::util::{decode_text, encode_href, escape_html, extract_html_charset, strip_bom};

/// Author-supplied fragment shown on a theme's map page.
const MAP_FRAGMENT: &str = "map.html";

impl Emitter<'_> {
    /// Write `theme/themeindex.html` and the `theme/index.html` map page.
    pub fn emit_theme_index(&self, theme: &ThemeLayout, diag: &mut Diagnostics) -> Result<usize> {
        let location = theme.name().to_string();
        let theme_menu = self.menu(Some(self.nav.themes()), "../", theme.name(), &location, diag);
        let breadcrumb = format!(
            "<a href=\"../courseindex.html\">{}</a> &gt; {}",
            escape_html(&self.scanned.layout.title),
            escape_html(&theme.meta.title)
        );

        let mut modules = String::new();
        for module in &theme.modules {
            modules.push_str(&module_entry(theme, module));
        }

        let vars = Vars::new()
            .set("title", escape_html(&theme.meta.title))
            .set("breadcrumb", breadcrumb.as_str())
            .set("theme_menu", theme_menu.as_str())
            .set("modules", modules);
        let html = self.page("themeindex", vars, &theme.meta.title, "../", "themeindex")?;
        self.out.write(&format!("{}/themeindex.html", theme.name()), &html)?;

        let map_path = theme.source_dir.join(MAP_FRAGMENT);
        let map = if map_path.is_file() {
            let bytes = fs::read(&map_path).map_err(|e| Error::read(&map_path, e))?;
            decode_text(strip_bom(&bytes), extract_html_charset(&bytes)).into_owned()
        } else {
            "<p class=\"nocontent\">There is no map for this theme.</p>".to_string()
        };
        let vars = Vars::new()
            .set("title", escape_html(&theme.meta.title))
            .set("breadcrumb", breadcrumb)
            .set("theme_menu", theme_menu)
            .set("map", map);
        let html = self.page("thememap", vars, &theme.meta.title, "../", "thememap")?;
        self.out.write(&format!("{}/index.html", theme.name()), &html)?;

        Ok(2)
    }

    /// Write `courseindex.html`, and the `index.html` splash page when the
    /// course has metadata.
    pub fn emit_course_index(&self, diag: &mut Diagnostics) -> Result<usize> {
        let layout = &self.scanned.layout;

        let mut themes = String::new();
        for theme in &layout.themes {
            writeln!(
                themes,
                "<div class=\"theme\">\n<h2><a href=\"{0}/themeindex.html\">{1}</a></h2>",
                theme.name(),
                escape_html(&theme.meta.title)
            )
            .unwrap();
            for module in &theme.modules {
                let anchor = format!("{}-{}", theme.name(), module.name());
                writeln!(
                    themes,
                    "<h3 id=\"{anchor}\"><a name=\"{anchor}\"></a><a href=\"{}\">{}</a> <span class=\"level level-{}\">{}</span></h3>",
                    module_href(theme, module),
                    escape_html(&module.meta.title),
                    module.meta.level,
                    module.meta.level.label()
                )
                .unwrap();
                themes.push_str(&step_list(module, &format!("{}/{}/", theme.name(), module.name())));
            }
            themes.push_str("</div>\n");
        }

        let theme_menu = self.nav.themes().render("", None);
        let vars = Vars::new()
            .set("title", escape_html(&layout.title))
            .set("theme_menu", theme_menu)
            .set("themes", themes)
            .set("glossary_link", self.glossary_link(""))
            .set("references_link", self.references_link(""));
        let html = self.page("courseindex", vars, &layout.title, "", "courseindex")?;
        self.out.write("courseindex.html", &html)?;

        let Some(course) = &layout.course else {
            return Ok(1);
        };
        if course.info.is_empty() {
            diag.warn("course", "course metadata has no courseinfo blocks; no splash page");
            return Ok(1);
        }
        let entries: String = course.info.iter().map(splash_entry).collect();
        let vars = Vars::new().set("entries", entries);
        let html = self.page("splash", vars, &layout.title, "", "splash")?;
        self.out.write("index.html", &html)?;
        Ok(2)
    }
}

fn module_entry(theme: &ThemeLayout, module: &ModuleLayout) -> String {
    let mut out = String::new();
    let name = module.name();
    writeln!(
        out,
        "<div class=\"module\" id=\"{name}\">\n<h2><a name=\"{name}\"></a>{} <span class=\"level level-{}\">{}</span></h2>",
        escape_html(&module.meta.title),
        module.meta.level,
        module.meta.level.label()
    )
    .unwrap();

    for (class, label, names) in [
        ("prereqs", "Prerequisites", &module.meta.prerequisites),
        ("leadsto", "Leads to", &module.meta.leadsto),
    ] {
        let links: Vec<String> = names
            .iter()
            .map(|other| {
                let title = theme.module(other).map_or(other.as_str(), |m| m.meta.title.as_str());
                format!("<a class=\"{class}\" href=\"#{other}\">{}</a>", escape_html(title))
            })
            .collect();
        let links = if links.is_empty() {
            "none".to_string()
        } else {
            links.join(", ")
        };
        writeln!(out, "<p class=\"{class}\">{label}: {links}</p>").unwrap();
    }

    for (label, items) in [
        ("Objectives", &module.meta.objectives),
        ("Outcomes", &module.meta.outcomes),
    ] {
        if items.is_empty() {
            continue;
        }
        writeln!(out, "<h3>{label}</h3>\n<ul>").unwrap();
        for item in items {
            writeln!(out, "<li>{}</li>", escape_html(item)).unwrap();
        }
        out.push_str("</ul>\n");
    }

    out.push_str(&step_list(module, &format!("{name}/")));
    out.push_str("</div>\n");
    out
}

/// Ordered list of a module's steps, hrefs relative to `base`.
fn step_list(module: &ModuleLayout, base: &str) -> String {
    if module.steps.is_empty() {
        return "<p class=\"nocontent\">No steps.</p>\n".to_string();
    }
    let mut out = String::from("<ol class=\"steps\">\n");
    for step in &module.steps {
        writeln!(
            out,
            "<li><a href=\"{base}{}\">{}. {}</a></li>",
            step.file_name,
            step.number,
            escape_html(&step.title)
        )
        .unwrap();
    }
    out.push_str("</ol>\n");
    out
}

fn splash_entry(info: &CourseInfo) -> String {
    let src = escape_html(&encode_href(&info.splash)).into_owned();
    let media = match info.kind {
        SplashKind::Image => format!(
            "<img src=\"{src}\" width=\"{}\" height=\"{}\" alt=\"{}\" />",
            info.width,
            info.height,
            escape_html(&info.title)
        ),
        SplashKind::Anim => format!(
            "<object data=\"{src}\" width=\"{}\" height=\"{}\"><param name=\"movie\" value=\"{src}\" /></object>",
            info.width, info.height
        ),
    };
    format!(
        "<div class=\"courseinfo\">\n<h1>{}</h1>\n<div class=\"splash\">{media}</div>\n<div class=\"content\">{}</div>\n</div>\n",
        escape_html(&info.title),
        escape_html(&info.content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Level, ModuleMetadata};
    use crate::model::{Step, StepNumber};
    use std::path::PathBuf;

    #[test]
    fn test_step_list_is_numbered() {
        let module = ModuleLayout {
            meta: ModuleMetadata {
                name: "intro".into(),
                title: "Intro".into(),
                level: Level::Green,
                index_order: 1,
                prerequisites: Vec::new(),
                leadsto: Vec::new(),
                objectives: Vec::new(),
                outcomes: Vec::new(),
            },
            source_dir: PathBuf::new(),
            steps: vec![Step {
                number: StepNumber::new(2),
                file_name: "step02.html".into(),
                source: PathBuf::new(),
                title: "A & B".into(),
                body: String::new(),
            }],
        };
        let html = step_list(&module, "intro/");
        assert!(html.contains("<li><a href=\"intro/step02.html\">02. A &amp; B</a></li>"));
    }

    #[test]
    fn test_splash_entry() {
        let info = CourseInfo {
            title: "Physics".into(),
            splash: "front page.png".into(),
            width: 640,
            height: 480,
            kind: SplashKind::Image,
            content: "Welcome".into(),
        };
        let html = splash_entry(&info);
        assert!(html.contains("<img src=\"front%20page.png\" width=\"640\" height=\"480\""));
        assert!(html.contains("<div class=\"content\">Welcome</div>"));
    }
}
