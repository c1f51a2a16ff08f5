//! # courseproc
//!
//! Compiles course material authored as a tree of theme/module/step HTML
//! files into a cross-linked static HTML site.
//!
//! ## Source layout
//!
//! ```text
//! course/
//!   metadata.xml          <course> metadata (optional)
//!   mechanics/
//!     metadata.xml        <theme> metadata listing the modules
//!     map.html            optional theme map fragment
//!     intro/
//!       node1.html        LaTeX2HTML export...
//!       node2.html
//!     advanced/
//!       step01.html       ...or canonical step files
//! ```
//!
//! Step bodies may contain custom markers: `[target name=".."]`,
//! `[link to=".."]..[/link]`, `[glossary term=".."]..[/glossary]`,
//! `[glossary term=".." /]`, `[image ..]`, `[anim ..]`, `[applet ..]`,
//! `[popup ..]..[/popup]` and `[ref key=".." /]`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use courseproc::{Config, process};
//!
//! let config = Config::default()
//!     .with_source("course")
//!     .with_destination("site");
//! let report = process(config).unwrap();
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```
//!
//! ## Phases
//!
//! 1. [`metadata`]: every `metadata.xml` is loaded and validated. Nothing is
//!    written if any of it is broken.
//! 2. [`scan`]: every step is read once, filling the anchor, glossary and
//!    citation tables.
//! 3. [`nav`]: themes and modules are ordered and the navigation menus built.
//! 4. [`emit`]: pages are rendered from the finished tables through
//!    [`markup`] and the [`template`] engine.

pub mod config;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod markup;
pub mod metadata;
pub mod model;
pub mod nav;
pub mod pipeline;
pub mod plugin;
pub mod scan;
pub mod template;
pub(crate) mod util;

pub use config::{Config, OutputKind};
pub use diagnostics::{Diagnostics, Warning};
pub use error::{Error, Result};
pub use pipeline::{Processor, Report, process};
pub use plugin::{InputPlugin, PluginKind, Plugins};
pub use template::{TemplateEngine, Templates, Vars};
