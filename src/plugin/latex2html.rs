use std::path::Path;

use super::{InputPlugin, StepSource, check_prefixed, count_modules, list_prefixed};
use crate::error::Result;

/// Modules exported by LaTeX2HTML: `node1.html`, `node2.html`, `node5.1.html`, ...
///
/// The node numbers become the step numbers; `node5.html` is emitted as
/// `step05.html`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latex2HtmlPlugin;

const PREFIX: &str = "node";

impl InputPlugin for Latex2HtmlPlugin {
    fn name(&self) -> &'static str {
        "latex2html"
    }

    fn use_plugin(&self, theme_dir: &Path) -> usize {
        count_modules(theme_dir, |dir| check_prefixed(dir, PREFIX).is_none())
    }

    fn module_check(&self, theme_dir: &Path, module: &str) -> Option<String> {
        check_prefixed(&theme_dir.join(module), PREFIX)
    }

    fn process(&self, module_dir: &Path) -> Result<Vec<StepSource>> {
        list_prefixed(module_dir, PREFIX)
    }
}
