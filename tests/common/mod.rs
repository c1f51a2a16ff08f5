//! Course tree fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use courseproc::Config;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A course source tree and an output directory inside one temp dir.
pub struct CourseFixture {
    dir: TempDir,
}

impl CourseFixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.source()).unwrap();
        fixture
    }

    /// The temp dir holding both the source tree and the output.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.dir.path().join("course")
    }

    pub fn dest(&self) -> PathBuf {
        self.dir.path().join("site")
    }

    pub fn config(&self) -> Config {
        Config::default()
            .with_source(self.source())
            .with_destination(self.dest())
    }

    pub fn write(&self, rel: &str, contents: &str) -> &Self {
        let path = self.source().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    pub fn course_metadata(&self, xml: &str) -> &Self {
        self.write("metadata.xml", xml)
    }

    /// Write `<theme>/metadata.xml` with the given `<module>` blocks.
    pub fn theme(&self, name: &str, title: &str, order: i64, modules: &[String]) -> &Self {
        let xml = format!(
            "<theme>\n  <name>{name}</name><title>{title}</title><indexorder>{order}</indexorder>\n{}\n</theme>\n",
            modules.join("\n")
        );
        self.write(&format!("{name}/metadata.xml"), &xml)
    }

    pub fn step(&self, theme: &str, module: &str, file: &str, title: &str, body: &str) -> &Self {
        self.write(&format!("{theme}/{module}/{file}"), &step_html(title, body))
    }

    /// Contents of an output file.
    pub fn output(&self, rel: &str) -> String {
        let path = self.dest().join(rel);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
    }

    pub fn has_output(&self, rel: &str) -> bool {
        self.dest().join(rel).exists()
    }
}

/// A `<module>` block for a theme metadata file.
pub fn module_xml(name: &str, title: &str, level: &str, order: i64, prerequisites: &[&str]) -> String {
    let prereqs = if prerequisites.is_empty() {
        String::new()
    } else {
        let list: Vec<_> = prerequisites
            .iter()
            .map(|p| format!("<module>{p}</module>"))
            .collect();
        format!("<prerequisites>{}</prerequisites>", list.join(""))
    };
    format!(
        "  <module name=\"{name}\"><title>{title}</title><level>{level}</level><indexorder>{order}</indexorder>{prereqs}</module>"
    )
}

pub fn step_html(title: &str, body: &str) -> String {
    format!(
        "<html>\n<head><title>{title}</title></head>\n<body>\n<!-- content -->\n{body}\n<!-- /content -->\n<address>generated</address>\n</body>\n</html>\n"
    )
}

/// Files under `dir`, relative, in walk order.
pub fn list_files(dir: &Path) -> Vec<String> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(dir)
                .ok()
                .map(|r| r.to_string_lossy().into_owned())
        })
        .collect()
}
