//! Run configuration.
//!
//! A JSON file supplies defaults; command-line flags override it field by
//! field. Every key is optional except `source` and `destination`, which
//! must come from one place or the other.
//!
//! ```json
//! {
//!   "source": "course",
//!   "destination": "site",
//!   "templates": "templates",
//!   "references": "refs.xml",
//!   "plugins": ["steps", "latex2html"],
//!   "course_title": "Physics 101",
//!   "filter": ["mechanics"]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::plugin::PluginKind;

/// Title used when the course has no metadata and none is configured.
pub const DEFAULT_COURSE_TITLE: &str = "Course";

/// Output handler. Only static HTML is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Html,
}

impl OutputKind {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "html" => Ok(OutputKind::Html),
            other => Err(Error::Config(format!(
                "unknown output handler '{other}', expected html"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    /// Directory of `<id>.html` template overrides.
    pub templates: Option<PathBuf>,
    /// Bibliography file; citations are only processed when set.
    pub references: Option<PathBuf>,
    /// Input plugins in priority order. Empty means the default set.
    pub plugins: Vec<PluginKind>,
    pub output: OutputKind,
    pub course_title: Option<String>,
    /// Theme directory names to process. Empty means all.
    pub filter: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let mut config: Config = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

        // Relative paths in the file are relative to the file itself.
        if let Some(base) = path.parent() {
            for field in [
                &mut config.source,
                &mut config.destination,
                &mut config.templates,
                &mut config.references,
            ] {
                if let Some(p) = field.as_mut()
                    && p.is_relative()
                {
                    *p = base.join(&*p);
                }
            }
        }
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_templates(mut self, templates: impl Into<PathBuf>) -> Self {
        self.templates = Some(templates.into());
        self
    }

    pub fn with_references(mut self, references: impl Into<PathBuf>) -> Self {
        self.references = Some(references.into());
        self
    }

    pub fn with_course_title(mut self, title: impl Into<String>) -> Self {
        self.course_title = Some(title.into());
        self
    }

    pub fn with_filter(mut self, themes: Vec<String>) -> Self {
        self.filter = themes;
        self
    }

    pub fn course_title(&self) -> &str {
        self.course_title.as_deref().unwrap_or(DEFAULT_COURSE_TITLE)
    }

    /// Source and destination, which every run needs.
    pub fn paths(&self) -> Result<(&Path, &Path)> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| Error::Config("no source directory given".into()))?;
        let destination = self
            .destination
            .as_deref()
            .ok_or_else(|| Error::Config("no destination directory given".into()))?;
        Ok((source, destination))
    }
}
