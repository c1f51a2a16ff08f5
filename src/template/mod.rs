//! Page skeletons rendered with `minijinja`.
//!
//! The emitter only needs "fill these named slots in template X", so the
//! engine is a trait; [`Templates`] is the built-in implementation. Slot
//! values are finished HTML fragments: auto-escaping is off and an unknown
//! slot is an error.

mod defaults;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::error::{Error, Result};

pub use defaults::IDS as TEMPLATE_IDS;

/// Placeholder values for one render.
#[derive(Debug, Clone, Default)]
pub struct Vars(HashMap<&'static str, String>);

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Renders a template by id.
pub trait TemplateEngine {
    fn render(&self, id: &str, vars: &Vars) -> Result<String>;
}

/// Built-in templates, optionally overridden from a directory.
#[derive(Debug, Clone)]
pub struct Templates {
    env: Environment<'static>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        for &id in TEMPLATE_IDS {
            if let Some(source) = defaults::builtin(id) {
                env.add_template(id, source)
                    .unwrap_or_else(|e| panic!("invalid built-in template {id}: {e}"));
            }
        }
        Self { env }
    }

    /// Load `<id>.html` overrides from `dir` for every known template id.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "templates directory {} does not exist",
                dir.display()
            )));
        }

        let mut templates = Self::new();
        for id in TEMPLATE_IDS {
            let path = dir.join(format!("{id}.html"));
            if !path.is_file() {
                continue;
            }
            let text = fs::read_to_string(&path).map_err(|e| Error::read(&path, e))?;
            log::debug!("template '{id}' overridden by {}", path.display());
            templates = templates.with(id, text)?;
        }
        Ok(templates)
    }

    /// Override a single template. Fails if `text` does not parse.
    pub fn with(mut self, id: &str, text: impl Into<String>) -> Result<Self> {
        self.env
            .add_template_owned(id.to_string(), text.into())
            .map_err(|e| Error::Template(format!("template '{id}' does not parse: {e}")))?;
        Ok(self)
    }
}

impl TemplateEngine for Templates {
    fn render(&self, id: &str, vars: &Vars) -> Result<String> {
        let template = self
            .env
            .get_template(id)
            .map_err(|_| Error::Template(format!("unknown template '{id}'")))?;
        template
            .render(&vars.0)
            .map_err(|e| Error::Template(format!("template '{id}': {e}")))
    }
}
