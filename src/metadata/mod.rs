//! Course and theme metadata.
//!
//! Each course root and each theme directory may carry a `metadata.xml`.
//! The root element decides what kind of metadata it is:
//!
//! ```xml
//! <theme>
//!   <name>basics</name><title>Basics</title><indexorder>1</indexorder>
//!   <module name="intro">
//!     <title>Introduction</title><level>green</level><indexorder>1</indexorder>
//!     <leadsto><module>advanced</module></leadsto>
//!   </module>
//! </theme>
//! ```
//!
//! Loading validates eagerly. Anything structurally wrong is an [`Error`];
//! asymmetric prerequisite/leadsto pairs are repaired in memory and reported
//! as warnings.

mod course;
mod validate;
pub(crate) mod xml;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::util::{decode_text, strip_bom};

pub use course::{Course, ThemeSource, load_course};
pub use validate::{RelationKind, Repair};

/// File name of the metadata document inside a course or theme directory.
pub const METADATA_FILE: &str = "metadata.xml";

/// Reserved placeholder module name, ignored everywhere.
pub const DUMMY_MODULE: &str = "dummy";

/// Metadata of either kind, decided by the document's root element.
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    Course(CourseMetadata),
    Theme(ThemeMetadata),
}

/// Course-wide metadata (`<course>` root).
#[derive(Debug, Clone, PartialEq)]
pub struct CourseMetadata {
    pub version: String,
    pub info: Vec<CourseInfo>,
}

/// A splash block shown on the course front page.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseInfo {
    pub title: String,
    pub splash: String,
    pub width: u32,
    pub height: u32,
    pub kind: SplashKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashKind {
    Image,
    Anim,
}

/// Theme metadata (`<theme>` root).
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeMetadata {
    pub name: String,
    pub title: String,
    pub index_order: i64,
    /// Modules keyed by name. The reserved `dummy` module never appears here.
    pub modules: BTreeMap<String, ModuleMetadata>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleMetadata {
    pub name: String,
    pub title: String,
    pub level: Level,
    pub index_order: i64,
    pub prerequisites: Vec<String>,
    pub leadsto: Vec<String>,
    pub objectives: Vec<String>,
    pub outcomes: Vec<String>,
}

/// Module difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Green,
    Yellow,
    Orange,
    Red,
}

impl Level {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Some(Level::Green),
            "yellow" => Some(Level::Yellow),
            "orange" => Some(Level::Orange),
            "red" => Some(Level::Red),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Green => "green",
            Level::Yellow => "yellow",
            Level::Orange => "orange",
            Level::Red => "red",
        }
    }

    /// Human readable difficulty label.
    pub fn label(self) -> &'static str {
        match self {
            Level::Green => "Introductory",
            Level::Yellow => "Intermediate",
            Level::Orange => "Advanced",
            Level::Red => "Expert",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ThemeMetadata {
    pub fn module(&self, name: &str) -> Option<&ModuleMetadata> {
        self.modules.get(name)
    }
}

impl ModuleMetadata {
    pub fn is_prerequisite(&self, other: &str) -> bool {
        self.prerequisites.iter().any(|p| p == other)
    }

    pub fn leads_to(&self, other: &str) -> bool {
        self.leadsto.iter().any(|l| l == other)
    }
}

/// Load and validate `dir/metadata.xml`.
///
/// Returns `Ok(None)` when the directory has no metadata file, an error when
/// the file exists but is unreadable or invalid, and the validated metadata
/// otherwise. Relation repairs are reported to `diag`.
pub fn load(dir: &Path, diag: &mut Diagnostics) -> Result<Option<Metadata>> {
    let path = dir.join(METADATA_FILE);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::read(&path, e)),
    };

    let content = decode_text(strip_bom(&bytes), xml::extract_xml_encoding(&bytes));
    let root = xml::parse_document(&content, &path)?;

    match root.name.as_str() {
        "course" => validate::course(&root, &path).map(|c| Some(Metadata::Course(c))),
        "theme" => {
            let mut theme = validate::theme(&root, &path)?;
            for repair in validate::repair_relations(&mut theme)? {
                diag.warn(format!("{}/{}", theme.name, repair.module), repair.to_string());
            }
            Ok(Some(Metadata::Theme(theme)))
        }
        other => Err(Error::Metadata(format!(
            "{}: unknown metadata root element <{other}>, expected <course> or <theme>",
            path.display()
        ))),
    }
}
