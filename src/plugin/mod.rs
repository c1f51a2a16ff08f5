//! Input plugins: the source-tree flavours a course can be authored in.
//!
//! A plugin knows how to recognize a module directory and how to list its
//! step files. The registry is fixed at configuration time; the scanner asks
//! each plugin in turn and uses the first one that accepts a module.

mod latex2html;
mod step_tree;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::StepNumber;

pub use latex2html::Latex2HtmlPlugin;
pub use step_tree::StepTreePlugin;

/// A step file found in a module directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSource {
    pub path: PathBuf,
    pub number: StepNumber,
}

/// Capability interface over source-tree flavours.
pub trait InputPlugin {
    /// Short identifier used in configuration and log output.
    fn name(&self) -> &'static str;

    /// Number of module directories in `theme_dir` this plugin recognizes.
    fn use_plugin(&self, theme_dir: &Path) -> usize;

    /// `None` if `theme_dir/module` is a module this plugin can read,
    /// otherwise a description of what is wrong with it.
    fn module_check(&self, theme_dir: &Path, module: &str) -> Option<String>;

    /// List the step files of a module, in step order.
    fn process(&self, module_dir: &Path) -> Result<Vec<StepSource>>;
}

/// Plugin selection as written in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Latex2Html,
    Steps,
}

impl PluginKind {
    fn instantiate(self) -> Box<dyn InputPlugin> {
        match self {
            PluginKind::Latex2Html => Box::new(Latex2HtmlPlugin),
            PluginKind::Steps => Box::new(StepTreePlugin),
        }
    }
}

/// The registered input plugins, in priority order.
pub struct Plugins {
    plugins: Vec<Box<dyn InputPlugin>>,
}

impl Default for Plugins {
    fn default() -> Self {
        Self::from_kinds(&[PluginKind::Steps, PluginKind::Latex2Html])
    }
}

impl Plugins {
    pub fn from_kinds(kinds: &[PluginKind]) -> Self {
        Self {
            plugins: kinds.iter().map(|k| k.instantiate()).collect(),
        }
    }

    pub fn with(mut self, plugin: Box<dyn InputPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn InputPlugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }

    /// First plugin accepting the module, or every plugin's complaint.
    pub fn check_module(
        &self,
        theme_dir: &Path,
        module: &str,
    ) -> std::result::Result<&dyn InputPlugin, Vec<String>> {
        let mut problems = Vec::new();
        for plugin in self.iter() {
            match plugin.module_check(theme_dir, module) {
                None => return Ok(plugin),
                Some(problem) => problems.push(format!("{}: {problem}", plugin.name())),
            }
        }
        Err(problems)
    }
}

/// Shared by the bundled plugins: list `<prefix>N.html` files in step order.
pub(crate) fn list_prefixed(module_dir: &Path, prefix: &str) -> Result<Vec<StepSource>> {
    let entries = fs::read_dir(module_dir).map_err(|e| Error::read(module_dir, e))?;

    let mut steps = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::read(module_dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(number) = StepNumber::from_file_name(name, prefix) {
            steps.push(StepSource {
                path: entry.path(),
                number,
            });
        }
    }

    steps.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.path.cmp(&b.path)));
    for pair in steps.windows(2) {
        if pair[0].number == pair[1].number {
            return Err(Error::step(
                &pair[1].path,
                format!(
                    "maps to {} which is already produced by {}",
                    pair[1].number.file_name(),
                    pair[0].path.display()
                ),
            ));
        }
    }
    Ok(steps)
}

/// Shared by the bundled plugins: does `module_dir` hold at least one `<prefix>N.html`?
pub(crate) fn check_prefixed(module_dir: &Path, prefix: &str) -> Option<String> {
    let Ok(entries) = fs::read_dir(module_dir) else {
        return Some(format!("module directory {} is missing", module_dir.display()));
    };
    let found = entries.flatten().any(|entry| {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| StepNumber::from_file_name(name, prefix).is_some())
    });
    if found {
        None
    } else {
        Some(format!("no {prefix}N.html files in {}", module_dir.display()))
    }
}

/// Shared by the bundled plugins: count module directories accepted by `check`.
pub(crate) fn count_modules(theme_dir: &Path, check: impl Fn(&Path) -> bool) -> usize {
    fs::read_dir(theme_dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().is_dir() && check(&e.path()))
                .count()
        })
        .unwrap_or(0)
}
