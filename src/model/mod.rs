//! Course layout tree and the tables built while scanning.
//!
//! The layout mirrors the output tree: themes hold modules, modules hold
//! steps, each level already in display order.

mod anchors;
mod glossary;
mod step;

use std::fmt;
use std::path::PathBuf;

use crate::metadata::{CourseMetadata, ModuleMetadata, ThemeMetadata};

pub use anchors::{AnchorTable, Citation, ReferenceTable};
pub use glossary::{Bucket, Definition, GlossaryTable, GlossaryTerm, normalize_term};
pub use step::StepNumber;

/// Identifies one step page in the course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepRef {
    pub theme: String,
    pub module: String,
    /// Canonical file name, e.g. `step03.html`.
    pub step: String,
}

impl StepRef {
    pub fn new(theme: impl Into<String>, module: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            module: module.into(),
            step: step.into(),
        }
    }

    /// Path of the step page relative to the output root.
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.theme, self.module, self.step)
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// The whole course, ordered for output.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub title: String,
    pub course: Option<CourseMetadata>,
    pub themes: Vec<ThemeLayout>,
}

#[derive(Debug, Clone)]
pub struct ThemeLayout {
    pub meta: ThemeMetadata,
    pub source_dir: PathBuf,
    /// Modules in `indexorder` order.
    pub modules: Vec<ModuleLayout>,
}

#[derive(Debug, Clone)]
pub struct ModuleLayout {
    pub meta: ModuleMetadata,
    pub source_dir: PathBuf,
    /// Steps in numeric order.
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub number: StepNumber,
    /// Canonical output file name.
    pub file_name: String,
    pub source: PathBuf,
    pub title: String,
    /// Body as extracted from the source, before markup conversion.
    pub body: String,
}

impl Layout {
    pub fn theme(&self, name: &str) -> Option<&ThemeLayout> {
        self.themes.iter().find(|t| t.meta.name == name)
    }

    pub fn module(&self, theme: &str, module: &str) -> Option<&ModuleLayout> {
        self.theme(theme)?.module(module)
    }

    pub fn step(&self, at: &StepRef) -> Option<&Step> {
        self.module(&at.theme, &at.module)?
            .steps
            .iter()
            .find(|s| s.file_name == at.step)
    }

    /// Every step in output order.
    pub fn steps(&self) -> impl Iterator<Item = (&ThemeLayout, &ModuleLayout, &Step)> {
        self.themes.iter().flat_map(|theme| {
            theme.modules.iter().flat_map(move |module| {
                module.steps.iter().map(move |step| (theme, module, step))
            })
        })
    }
}

impl ThemeLayout {
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn module(&self, name: &str) -> Option<&ModuleLayout> {
        self.modules.iter().find(|m| m.meta.name == name)
    }
}

impl ModuleLayout {
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }
}
