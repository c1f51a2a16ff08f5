use std::path::Path;

use super::{InputPlugin, StepSource, check_prefixed, count_modules, list_prefixed};
use crate::error::Result;

/// Modules already laid out with canonical `stepNN.html` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepTreePlugin;

const PREFIX: &str = "step";

impl InputPlugin for StepTreePlugin {
    fn name(&self) -> &'static str {
        "steps"
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_use_plugin_counts_recognized_modules() {
        let dir = TempDir::new().unwrap();
        for (module, file) in [("a", "step01.html"), ("b", "step1.html"), ("c", "node1.html")] {
            let module_dir = dir.path().join(module);
            fs::create_dir(&module_dir).unwrap();
            fs::write(module_dir.join(file), "").unwrap();
        }
        assert_eq!(StepTreePlugin.use_plugin(dir.path()), 2);
        assert_eq!(super::super::Latex2HtmlPlugin.use_plugin(dir.path()), 1);
    }
}
