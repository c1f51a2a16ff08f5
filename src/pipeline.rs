//! The processing run: load, scan, navigate, copy resources, emit.

use std::fs;

use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::emit::{Emitter, OutputDir, copy_resources};
use crate::error::{Error, Result};
use crate::markup::{Bibliography, ReferenceHandler};
use crate::metadata::load_course;
use crate::nav::Navigation;
use crate::plugin::Plugins;
use crate::scan::Scanner;
use crate::template::{TemplateEngine, Templates};

/// Summary of a completed run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub themes: usize,
    pub modules: usize,
    pub steps: usize,
    pub pages: usize,
    pub resources: usize,
    pub warnings: Vec<Warning>,
}

/// Runs the whole pipeline for one configuration.
pub struct Processor {
    config: Config,
    plugins: Plugins,
    templates: Box<dyn TemplateEngine>,
    references: Option<Box<dyn ReferenceHandler>>,
}

impl Processor {
    /// Set up plugins, templates and bibliography from `config`.
    ///
    /// Templates and the bibliography are read here, so a broken template
    /// directory or bibliography fails before the course is touched.
    pub fn new(config: Config) -> Result<Self> {
        let plugins = if config.plugins.is_empty() {
            Plugins::default()
        } else {
            Plugins::from_kinds(&config.plugins)
        };
        let templates: Box<dyn TemplateEngine> = match &config.templates {
            Some(dir) => Box::new(Templates::from_dir(dir)?),
            None => Box::new(Templates::new()),
        };
        let references: Option<Box<dyn ReferenceHandler>> = match &config.references {
            Some(path) => Some(Box::new(Bibliography::load(path)?)),
            None => None,
        };
        log::debug!("output handler: {:?}", config.output);

        Ok(Self {
            config,
            plugins,
            templates,
            references,
        })
    }

    /// Replace the template engine.
    pub fn with_templates(mut self, templates: Box<dyn TemplateEngine>) -> Self {
        self.templates = templates;
        self
    }

    /// Replace the input plugins.
    pub fn with_plugins(mut self, plugins: Plugins) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn run(&self) -> Result<Report> {
        let (source, destination) = self.config.paths()?;
        let mut diag = Diagnostics::new();

        // Phase 1: every piece of metadata, before any output exists.
        let course = load_course(source, &self.plugins, &self.config.filter, &mut diag)?;
        for theme in &course.themes {
            for plugin in self.plugins.iter() {
                log::debug!(
                    "{}: {} recognizes {} modules",
                    theme.meta.name,
                    plugin.name(),
                    plugin.use_plugin(&theme.dir)
                );
            }
        }
        log::info!("loaded metadata for {} themes", course.themes.len());
        let course_root = course.root.clone();

        // Phase 2: scan every step.
        let scanned = Scanner::new(&self.plugins)
            .with_citations(self.references.is_some())
            .scan(course, self.config.course_title(), &mut diag)?;

        // Phase 3: navigation, then output.
        let nav = Navigation::build(&scanned.layout);
        fs::create_dir_all(destination).map_err(|e| Error::write(destination, e))?;
        let out = OutputDir::new(destination);
        // Resources first, so generated pages always win.
        let resources = copy_resources(&course_root, &scanned.layout, &out, &mut diag)?;
        let pages = Emitter::new(&scanned, &nav, self.templates.as_ref(), &out)
            .with_references(self.references.as_deref())
            .emit_all(&mut diag)?;

        let layout = &scanned.layout;
        let report = Report {
            themes: layout.themes.len(),
            modules: layout.themes.iter().map(|t| t.modules.len()).sum(),
            steps: layout.steps().count(),
            pages,
            resources,
            warnings: diag.into_warnings(),
        };
        log::info!(
            "processed {} themes, {} modules, {} steps with {} warnings",
            report.themes,
            report.modules,
            report.steps,
            report.warnings.len()
        );
        Ok(report)
    }
}

/// Process a course with the given configuration.
pub fn process(config: Config) -> Result<Report> {
    Processor::new(config)?.run()
}
