//! Navigation built from the scanned layout: ordering and dropdown menus.

pub mod dropdown;
pub mod order;

use std::collections::HashMap;

use crate::model::{Layout, ModuleLayout, ThemeLayout};

pub use dropdown::{Dropdown, DropdownEntry, Relation};

/// Cached dropdowns for the whole course.
#[derive(Debug, Clone)]
pub struct Navigation {
    themes: Dropdown,
    modules: HashMap<(String, String), Dropdown>,
    steps: HashMap<(String, String), Dropdown>,
}

impl Navigation {
    pub fn build(layout: &Layout) -> Self {
        let mut themes = Dropdown::new("themes");
        let mut modules = HashMap::new();
        let mut steps = HashMap::new();

        for theme in &layout.themes {
            themes.push(
                theme.name(),
                &theme.meta.title,
                format!("{}/themeindex.html", theme.name()),
                Relation::Plain,
            );

            for module in &theme.modules {
                let key = (theme.name().to_string(), module.name().to_string());
                modules.insert(key.clone(), module_menu(theme, module));
                steps.insert(key, step_menu(theme, module));
            }
        }

        log::debug!("built navigation for {} modules", modules.len());
        Self {
            themes,
            modules,
            steps,
        }
    }

    pub fn themes(&self) -> &Dropdown {
        &self.themes
    }

    /// Sibling modules of `module`, tagged by their relation to it.
    pub fn modules(&self, theme: &str, module: &str) -> Option<&Dropdown> {
        self.modules.get(&(theme.to_string(), module.to_string()))
    }

    pub fn steps(&self, theme: &str, module: &str) -> Option<&Dropdown> {
        self.steps.get(&(theme.to_string(), module.to_string()))
    }
}

/// Where a module link should land: its first step, or its entry in the theme index.
pub fn module_href(theme: &ThemeLayout, module: &ModuleLayout) -> String {
    match module.first_step() {
        Some(step) => format!("{}/{}/{}", theme.name(), module.name(), step.file_name),
        None => format!("{}/themeindex.html#{}", theme.name(), module.name()),
    }
}

fn module_menu(theme: &ThemeLayout, current: &ModuleLayout) -> Dropdown {
    let mut menu = Dropdown::new("modules");
    for sibling in &theme.modules {
        let relation = if current.meta.is_prerequisite(sibling.name()) {
            Relation::Prereq
        } else if current.meta.leads_to(sibling.name()) {
            Relation::Leadsto
        } else {
            Relation::Plain
        };
        menu.push(
            sibling.name(),
            &sibling.meta.title,
            module_href(theme, sibling),
            relation,
        );
    }
    menu
}

fn step_menu(theme: &ThemeLayout, module: &ModuleLayout) -> Dropdown {
    let mut menu = Dropdown::new("steps");
    for step in &module.steps {
        menu.push(
            &step.file_name,
            format!("{}. {}", step.number, step.title),
            format!("{}/{}/{}", theme.name(), module.name(), step.file_name),
            Relation::Plain,
        );
    }
    menu
}
