//! Copying author resources (images, applets, animations) into the output.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{OutputDir, ROOT_OUTPUTS, THEME_OUTPUTS};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::markup::Popup;
use crate::metadata::METADATA_FILE;
use crate::model::Layout;

/// Files consumed by the processor itself rather than served as-is.
const RESERVED: &[&str] = &[METADATA_FILE, "map.html"];

fn is_one_of(names: &[&str], name: &str) -> bool {
    names.iter().any(|n| n.eq_ignore_ascii_case(name))
}

/// Copy resources next to the generated pages. Returns the number of files copied.
///
/// Course root and theme directories contribute their top-level files;
/// module directories are copied recursively, minus the step sources. A
/// top-level file named like a generated page is skipped with a warning.
pub fn copy_resources(
    course_root: &Path,
    layout: &Layout,
    out: &OutputDir,
    diag: &mut Diagnostics,
) -> Result<usize> {
    let none = HashSet::new();
    let mut copied = copy_tree(
        course_root,
        Path::new(""),
        1,
        &none,
        &|name| is_one_of(ROOT_OUTPUTS, name),
        out,
        diag,
    )?;

    for theme in &layout.themes {
        let theme_out = PathBuf::from(theme.name());
        copied += copy_tree(
            &theme.source_dir,
            &theme_out,
            1,
            &none,
            &|name| is_one_of(THEME_OUTPUTS, name),
            out,
            diag,
        )?;

        for module in &theme.modules {
            let sources: HashSet<&Path> = module.steps.iter().map(|s| s.source.as_path()).collect();
            let generated = |name: &str| {
                Popup::is_file_name(name)
                    || module.steps.iter().any(|s| s.file_name.eq_ignore_ascii_case(name))
            };
            copied += copy_tree(
                &module.source_dir,
                &theme_out.join(module.name()),
                usize::MAX,
                &sources,
                &generated,
                out,
                diag,
            )?;
        }
    }

    log::info!("copied {copied} resource files");
    Ok(copied)
}

fn copy_tree(
    source: &Path,
    dest: &Path,
    max_depth: usize,
    skip: &HashSet<&Path>,
    generated: &dyn Fn(&str) -> bool,
    out: &OutputDir,
    diag: &mut Diagnostics,
) -> Result<usize> {
    let mut copied = 0;
    let walker = WalkDir::new(source)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            Error::read(&path, e.into())
        })?;
        if !entry.file_type().is_file() || skip.contains(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(source) else {
            continue;
        };
        if entry.depth() == 1 {
            let name = entry.file_name().to_string_lossy();
            if is_one_of(RESERVED, &name) {
                continue;
            }
            if generated(&name) {
                diag.warn(
                    dest.join(rel).to_string_lossy(),
                    "resource has the name of a generated page and is not copied",
                );
                continue;
            }
        }
        out.copy(entry.path(), &dest.join(rel))?;
        copied += 1;
    }
    Ok(copied)
}
