//! Loading the metadata of a whole course tree.
//!
//! Everything here runs before a single output byte is written: any invalid
//! metadata anywhere in the tree stops the run while the destination is
//! still untouched.

use std::fs;
use std::path::{Path, PathBuf};

use super::{CourseMetadata, DUMMY_MODULE, METADATA_FILE, Metadata, ThemeMetadata, load};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::plugin::Plugins;

/// A course whose metadata has been loaded and validated.
#[derive(Debug, Clone)]
pub struct Course {
    pub root: PathBuf,
    pub meta: Option<CourseMetadata>,
    /// Valid themes, in directory-name order (display order is decided later).
    pub themes: Vec<ThemeSource>,
}

#[derive(Debug, Clone)]
pub struct ThemeSource {
    pub dir: PathBuf,
    pub meta: ThemeMetadata,
}

/// Load course and theme metadata under `root`.
///
/// `filter`, when non-empty, restricts processing to the named themes
/// (matched against the theme directory name).
pub fn load_course(
    root: &Path,
    plugins: &Plugins,
    filter: &[String],
    diag: &mut Diagnostics,
) -> Result<Course> {
    if !root.is_dir() {
        return Err(Error::Config(format!(
            "source directory {} does not exist",
            root.display()
        )));
    }

    let meta = match load(root, diag)? {
        Some(Metadata::Course(course)) => Some(course),
        Some(Metadata::Theme(_)) => {
            return Err(Error::Metadata(format!(
                "{}: the course root holds theme metadata; expected <course>",
                root.join(METADATA_FILE).display()
            )));
        }
        None => {
            log::info!("no course metadata in {}", root.display());
            None
        }
    };

    let mut dirs: Vec<PathBuf> = fs::read_dir(root)
        .map_err(|e| Error::read(root, e))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut themes = Vec::new();
    for dir in dirs {
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if dir_name.starts_with('.') {
            continue;
        }
        if !filter.is_empty() && !filter.iter().any(|f| *f == dir_name) {
            log::debug!("skipping theme {dir_name}: not selected");
            continue;
        }

        let theme = match load(&dir, diag)? {
            Some(Metadata::Theme(theme)) => theme,
            Some(Metadata::Course(_)) => {
                return Err(Error::Metadata(format!(
                    "{}: theme directory holds course metadata; expected <theme>",
                    dir.join(METADATA_FILE).display()
                )));
            }
            None => {
                diag.warn(&dir_name, "no metadata.xml; directory is not part of the course");
                continue;
            }
        };

        if theme.name != dir_name {
            diag.warn(
                &dir_name,
                format!("theme is named '{}' in its metadata; output uses that name", theme.name),
            );
        }

        if check_modules(&dir, &theme, plugins, diag) {
            themes.push(ThemeSource { dir, meta: theme });
        } else {
            diag.warn(&theme.name, "theme failed validation and is skipped");
        }
    }

    if let Some((a, b)) = first_duplicate(&themes) {
        return Err(Error::Metadata(format!(
            "theme name '{}' is used by both {} and {}",
            a.meta.name,
            a.dir.display(),
            b.dir.display()
        )));
    }

    Ok(Course {
        root: root.to_path_buf(),
        meta,
        themes,
    })
}

/// Run every module past the plugins. Returns false if any module is unreadable.
fn check_modules(
    dir: &Path,
    theme: &ThemeMetadata,
    plugins: &Plugins,
    diag: &mut Diagnostics,
) -> bool {
    let mut valid = true;
    for name in theme.modules.keys() {
        if let Err(problems) = plugins.check_module(dir, name) {
            diag.warn(
                format!("{}/{name}", theme.name),
                format!("no input plugin recognizes this module ({})", problems.join("; ")),
            );
            valid = false;
        }
    }

    if let Ok(entries) = fs::read_dir(dir) {
        let mut extra: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| !n.starts_with('.') && n != DUMMY_MODULE && !theme.modules.contains_key(n))
            .collect();
        extra.sort();
        for name in extra {
            diag.warn(
                format!("{}/{name}", theme.name),
                "directory is not listed in the theme metadata and is ignored",
            );
        }
    }

    valid
}

fn first_duplicate(themes: &[ThemeSource]) -> Option<(&ThemeSource, &ThemeSource)> {
    themes.iter().enumerate().find_map(|(i, a)| {
        themes[i + 1..]
            .iter()
            .find(|b| b.meta.name == a.meta.name)
            .map(|b| (a, b))
    })
}
