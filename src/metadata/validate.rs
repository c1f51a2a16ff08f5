//! Typed conversion and validation of metadata element trees.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::xml::Element;
use super::{
    CourseInfo, CourseMetadata, DUMMY_MODULE, Level, ModuleMetadata, SplashKind, ThemeMetadata,
};
use crate::emit::{ROOT_OUTPUTS, THEME_OUTPUTS};
use crate::error::{Error, Result};
use crate::util::is_safe_component;

/// A back-reference that was missing and has been inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    /// Module that received the new entry.
    pub module: String,
    /// Module that declared the original relation.
    pub source: String,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Prerequisite,
    Leadsto,
}

impl RelationKind {
    fn element(self) -> &'static str {
        match self {
            RelationKind::Prerequisite => "prerequisites",
            RelationKind::Leadsto => "leadsto",
        }
    }
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (inverse, relation) = match self.kind {
            RelationKind::Prerequisite => ("prerequisite", "leadsto"),
            RelationKind::Leadsto => ("leadsto", "prerequisite"),
        };
        write!(
            f,
            "added '{}' to {} list because '{}' lists it as {}",
            self.source, inverse, self.source, relation
        )
    }
}

pub(super) fn course(root: &Element, path: &Path) -> Result<CourseMetadata> {
    let fail = |field: &str| {
        Error::Metadata(format!(
            "course metadata {}: missing required field '{field}'",
            path.display()
        ))
    };

    let version = root.child_text("version").ok_or_else(|| fail("version"))?;

    let mut info = Vec::new();
    for (i, block) in root.children_named("courseinfo").enumerate() {
        let field = |name: &str| {
            block.child_text(name).map(str::to_string).ok_or_else(|| {
                Error::Metadata(format!(
                    "course metadata {}: courseinfo block {} is missing required field '{name}'",
                    path.display(),
                    i + 1
                ))
            })
        };
        let dimension = |name: &str| -> Result<u32> {
            let value = field(name)?;
            value.parse::<u32>().ok().filter(|&v| v > 0).ok_or_else(|| {
                Error::Metadata(format!(
                    "course metadata {}: courseinfo block {} has invalid {name} '{value}'",
                    path.display(),
                    i + 1
                ))
            })
        };

        let kind = match field("type")?.as_str() {
            "image" => SplashKind::Image,
            "anim" => SplashKind::Anim,
            other => {
                return Err(Error::Metadata(format!(
                    "course metadata {}: courseinfo block {} has type '{other}', expected 'image' or 'anim'",
                    path.display(),
                    i + 1
                )));
            }
        };

        info.push(CourseInfo {
            title: field("title")?,
            splash: field("splash")?,
            width: dimension("width")?,
            height: dimension("height")?,
            kind,
            content: field("content")?,
        });
    }

    if info.is_empty() {
        return Err(fail("courseinfo"));
    }

    Ok(CourseMetadata {
        version: version.to_string(),
        info,
    })
}

pub(super) fn theme(root: &Element, path: &Path) -> Result<ThemeMetadata> {
    let required = |elem: &Element, field: &str, owner: &str| {
        elem.child_text(field).map(str::to_string).ok_or_else(|| {
            Error::Metadata(format!(
                "{owner} ({}): missing required field '{field}'",
                path.display()
            ))
        })
    };

    let name = required(root, "name", "theme")?;
    let owner = format!("theme '{name}'");
    check_output_name(&name, &owner, ROOT_OUTPUTS)?;
    let title = required(root, "title", owner.as_str())?;
    let index_order = parse_index_order(&required(root, "indexorder", owner.as_str())?, &owner)?;

    let mut modules = BTreeMap::new();
    for elem in root.children_named("module") {
        let module_name = elem
            .attr("name")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| elem.child_text("name"))
            .ok_or_else(|| Error::Metadata(format!("{owner}: module without a name")))?
            .to_string();

        if module_name == DUMMY_MODULE {
            continue;
        }

        let owner = format!("theme '{name}' module '{module_name}'");
        check_output_name(&module_name, &owner, THEME_OUTPUTS)?;
        let level_text = required(elem, "level", owner.as_str())?;
        let level = Level::parse(&level_text).ok_or_else(|| {
            Error::Metadata(format!(
                "{owner}: unknown level '{level_text}', expected green, yellow, orange or red"
            ))
        })?;

        let module = ModuleMetadata {
            title: required(elem, "title", owner.as_str())?,
            level,
            index_order: parse_index_order(&required(elem, "indexorder", owner.as_str())?, &owner)?,
            prerequisites: relation(elem, RelationKind::Prerequisite.element(), &owner)?,
            leadsto: relation(elem, RelationKind::Leadsto.element(), &owner)?,
            objectives: list(elem, "objectives"),
            outcomes: list(elem, "outcomes"),
            name: module_name.clone(),
        };

        if modules.insert(module_name, module).is_some() {
            return Err(Error::Metadata(format!("{owner}: module is declared twice")));
        }
    }

    Ok(ThemeMetadata {
        name,
        title,
        index_order,
        modules,
    })
}

/// Theme and module names become output directories.
fn check_output_name(name: &str, owner: &str, generated: &[&str]) -> Result<()> {
    if !is_safe_component(name) {
        return Err(Error::Metadata(format!(
            "{owner}: name cannot be used as an output directory"
        )));
    }
    if generated.iter().any(|g| g.eq_ignore_ascii_case(name)) {
        return Err(Error::Metadata(format!(
            "{owner}: name '{name}' clashes with a generated page"
        )));
    }
    Ok(())
}

fn parse_index_order(value: &str, owner: &str) -> Result<i64> {
    value.parse::<i64>().map_err(|_| {
        Error::Metadata(format!(
            "{owner}: indexorder '{value}' is not an integer"
        ))
    })
}

/// Read a relation block. Every child must be a leaf naming one module.
fn relation(elem: &Element, block: &str, owner: &str) -> Result<Vec<String>> {
    let malformed = |detail: &str| {
        Error::Metadata(format!(
            "{owner}: malformed <{block}> ({detail}); expected a flat list of module names"
        ))
    };

    let mut names: Vec<String> = Vec::new();
    for rel in elem.children_named(block) {
        if !rel.text().is_empty() {
            return Err(malformed("bare text inside the list"));
        }
        for item in &rel.children {
            if !item.is_leaf() {
                return Err(malformed("nested elements"));
            }
            let target = item.text();
            if target.is_empty() {
                return Err(malformed("empty entry"));
            }
            if !names.iter().any(|n| n == target) {
                names.push(target.to_string());
            }
        }
    }
    Ok(names)
}

/// Read a free-form list such as objectives/outcomes. Text of every leaf child.
fn list(elem: &Element, block: &str) -> Vec<String> {
    elem.children_named(block)
        .flat_map(|b| b.children.iter())
        .map(|item| item.text().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Check every relation target exists and insert missing inverse entries.
pub(super) fn repair_relations(theme: &mut ThemeMetadata) -> Result<Vec<Repair>> {
    let mut repairs = Vec::new();

    for (name, module) in &theme.modules {
        for (kind, targets) in [
            (RelationKind::Prerequisite, &module.prerequisites),
            (RelationKind::Leadsto, &module.leadsto),
        ] {
            for target in targets {
                if target == name {
                    return Err(Error::Metadata(format!(
                        "theme '{}' module '{name}': lists itself in <{}>",
                        theme.name,
                        kind.element()
                    )));
                }
                let Some(other) = theme.modules.get(target) else {
                    return Err(Error::Metadata(format!(
                        "theme '{}' module '{name}': <{}> refers to unknown module '{target}'",
                        theme.name,
                        kind.element()
                    )));
                };
                let has_inverse = match kind {
                    RelationKind::Prerequisite => other.leads_to(name),
                    RelationKind::Leadsto => other.is_prerequisite(name),
                };
                if !has_inverse {
                    repairs.push(Repair {
                        module: target.clone(),
                        source: name.clone(),
                        kind: match kind {
                            RelationKind::Prerequisite => RelationKind::Leadsto,
                            RelationKind::Leadsto => RelationKind::Prerequisite,
                        },
                    });
                }
            }
        }
    }

    for repair in &repairs {
        if let Some(module) = theme.modules.get_mut(&repair.module) {
            let list = match repair.kind {
                RelationKind::Prerequisite => &mut module.prerequisites,
                RelationKind::Leadsto => &mut module.leadsto,
            };
            if !list.contains(&repair.source) {
                list.push(repair.source.clone());
            }
        }
    }

    Ok(repairs)
}
