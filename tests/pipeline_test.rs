//! End-to-end processing tests.
//!
//! Each test builds a small course tree in a temp dir, runs the whole
//! pipeline and inspects the generated site.

mod common;

use common::{CourseFixture, list_files, module_xml};
use courseproc::{Error, Processor, process};

const COURSE_XML: &str = r#"<course>
  <version>1.0</version>
  <courseinfo>
    <title>Physics</title><splash>front.png</splash>
    <width>320</width><height>200</height><type>image</type>
    <content>Welcome to physics.</content>
  </courseinfo>
</course>"#;

/// The two-module theme: `advanced` requires `intro`, `intro` says nothing.
fn intro_advanced() -> CourseFixture {
    let fixture = CourseFixture::new();
    fixture
        .course_metadata(COURSE_XML)
        .write("front.png", "png")
        .theme(
            "basics",
            "Basics",
            1,
            &[
                module_xml("advanced", "Advanced Topics", "red", 2, &["intro"]),
                module_xml("intro", "Introduction", "green", 1, &[]),
            ],
        )
        .step("basics", "intro", "node1.html", "Welcome", r#"[target name="start"]Hello."#)
        .step("basics", "intro", "node2.html", "Vectors", "More.")
        .step("basics", "intro", "node10.html", "Summary", "Done.")
        .step("basics", "advanced", "node1.html", "Fields", r#"Back to [link to="start"]the start[/link]."#)
        .write("basics/intro/fig.png", "png");
    fixture
}

// ============================================================================
// Module relations and ordering
// ============================================================================

#[test]
fn test_missing_leadsto_is_repaired_with_warning() {
    let fixture = intro_advanced();
    let report = process(fixture.config()).unwrap();

    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.location == "basics/intro"
                && w.message.contains("added 'advanced' to leadsto list")),
        "warnings: {:?}",
        report.warnings
    );
}

#[test]
fn test_theme_index_orders_and_cross_links_modules() {
    let fixture = intro_advanced();
    process(fixture.config()).unwrap();

    let index = fixture.output("basics/themeindex.html");
    let intro = index.find("id=\"intro\"").unwrap();
    let advanced = index.find("id=\"advanced\"").unwrap();
    assert!(intro < advanced, "intro must be listed before advanced");

    // advanced shows its prerequisite, intro its (repaired) leadsto.
    assert!(index[advanced..].contains(
        "<p class=\"prereqs\">Prerequisites: <a class=\"prereqs\" href=\"#intro\">Introduction</a></p>"
    ));
    assert!(index[intro..advanced].contains(
        "<p class=\"leadsto\">Leads to: <a class=\"leadsto\" href=\"#advanced\">Advanced Topics</a></p>"
    ));
    assert!(index.contains("<li><a href=\"intro/step10.html\">10. Summary</a></li>"));
}

#[test]
fn test_module_menus_tag_relations() {
    let fixture = intro_advanced();
    process(fixture.config()).unwrap();

    let advanced = fixture.output("basics/advanced/step01.html");
    assert!(advanced.contains("<option value=\"../../basics/intro/step01.html\" class=\"prereq\">Introduction</option>"));
    assert!(advanced.contains("class=\"current plain\" selected=\"selected\">Advanced Topics</option>"));

    let intro = fixture.output("basics/intro/step01.html");
    assert!(intro.contains("<option value=\"../../basics/advanced/step01.html\" class=\"leadsto\">Advanced Topics</option>"));
    assert!(intro.contains("<div class=\"level level-green\">Introductory</div>"));
}

// ============================================================================
// Step pages
// ============================================================================

#[test]
fn test_steps_are_renamed_and_ordered_numerically() {
    let fixture = intro_advanced();
    let report = process(fixture.config()).unwrap();
    assert_eq!(report.steps, 4);

    for step in ["step01.html", "step02.html", "step10.html"] {
        assert!(fixture.has_output(&format!("basics/intro/{step}")), "missing {step}");
    }
    assert!(!fixture.has_output("basics/intro/node1.html"));

    let middle = fixture.output("basics/intro/step02.html");
    assert!(middle.contains("<a class=\"prev\" href=\"step01.html\">Previous</a>"));
    assert!(middle.contains("<a class=\"next\" href=\"step10.html\">Next</a>"));

    let first = fixture.output("basics/intro/step01.html");
    assert!(first.contains("<span class=\"prev disabled\">Previous</span>"));
    let last = fixture.output("basics/intro/step10.html");
    assert!(last.contains("<span class=\"next disabled\">Next</span>"));

    // Step menu lists steps numerically.
    let two = first.find(">02. Vectors</option>").unwrap();
    let ten = first.find(">10. Summary</option>").unwrap();
    assert!(two < ten);
}

#[test]
fn test_links_resolve_across_modules() {
    let fixture = intro_advanced();
    process(fixture.config()).unwrap();

    let page = fixture.output("basics/advanced/step01.html");
    assert!(page.contains("<a href=\"../../basics/intro/step01.html#start\">the start</a>"));
    let target = fixture.output("basics/intro/step01.html");
    assert!(target.contains("<a id=\"start\" name=\"start\"></a>Hello."));
}

#[test]
fn test_step_body_comes_from_content_region() {
    let fixture = intro_advanced();
    process(fixture.config()).unwrap();

    let page = fixture.output("basics/intro/step02.html");
    assert!(page.contains("<title>Physics: Vectors</title>"));
    assert!(page.contains("More."));
    assert!(!page.contains("<address>generated</address>"));
}

// ============================================================================
// Course level pages and resources
// ============================================================================

#[test]
fn test_course_index_and_splash() {
    let fixture = intro_advanced();
    process(fixture.config()).unwrap();

    let index = fixture.output("courseindex.html");
    assert!(index.contains("<h3 id=\"basics-intro\">"));
    assert!(index.contains("<h3 id=\"basics-advanced\">"));
    assert!(index.find("basics-intro").unwrap() < index.find("basics-advanced").unwrap());
    assert!(index.contains("<span class=\"glossary-link disabled\">Glossary</span>"));

    let splash = fixture.output("index.html");
    assert!(splash.contains("<h1>Physics</h1>"));
    assert!(splash.contains("<img src=\"front.png\" width=\"320\" height=\"200\""));
    assert!(fixture.has_output("front.png"));
    assert!(!fixture.has_output("metadata.xml"));
}

#[test]
fn test_theme_map_falls_back_without_fragment() {
    let fixture = intro_advanced();
    process(fixture.config()).unwrap();
    assert!(fixture.output("basics/index.html").contains("There is no map for this theme."));

    let fixture = intro_advanced();
    fixture.write("basics/map.html", "<img src=\"map.png\" usemap=\"#m\" />");
    process(fixture.config()).unwrap();
    assert!(fixture.output("basics/index.html").contains("usemap=\"#m\""));
    assert!(!fixture.has_output("basics/map.html"));
}

#[test]
fn test_module_resources_copied() {
    let fixture = intro_advanced();
    let report = process(fixture.config()).unwrap();

    assert!(fixture.has_output("basics/intro/fig.png"));
    assert_eq!(report.resources, 2);
}

#[test]
fn test_author_files_never_replace_generated_pages() {
    let fixture = intro_advanced();
    fixture
        .write("courseindex.html", "STALE ROOT FILE")
        .write("basics/themeindex.html", "STALE AUTHOR FILE")
        .write("basics/intro/popup_old.html", "STALE POPUP");

    let report = process(fixture.config()).unwrap();
    assert_eq!(report.resources, 2);
    assert_eq!(
        report
            .warnings
            .iter()
            .filter(|w| w.message.contains("name of a generated page"))
            .count(),
        3
    );

    assert!(fixture.output("courseindex.html").contains("<h3 id=\"basics-intro\">"));
    assert!(fixture.output("basics/themeindex.html").contains("id=\"intro\""));
    assert!(!fixture.has_output("basics/intro/popup_old.html"));
}

#[test]
fn test_popup_name_cannot_leave_destination() {
    let fixture = intro_advanced();
    fixture.step(
        "basics",
        "intro",
        "node2.html",
        "Vectors",
        r#"[popup name="x/../../../../escaped" title="t"]boom[/popup]"#,
    );

    let report = process(fixture.config()).unwrap();
    assert!(report.warnings.iter().any(|w| w.location == "basics/intro/step02.html"
        && w.message.contains("cannot be used as a file name")));
    assert!(fixture.output("basics/intro/step02.html").contains("<p class=\"error\">popup name"));
    assert!(
        list_files(fixture.root()).iter().all(|f| !f.contains("escaped")),
        "{:?}",
        list_files(fixture.root())
    );
}

// ============================================================================
// Fail-fast behaviour
// ============================================================================

#[test]
fn test_missing_version_writes_nothing() {
    let fixture = intro_advanced();
    fixture.course_metadata(
        r#"<course><courseinfo><title>T</title><splash>s.png</splash><width>1</width>
           <height>1</height><type>image</type><content>c</content></courseinfo></course>"#,
    );
    std::fs::create_dir_all(fixture.dest()).unwrap();

    let err = process(fixture.config()).unwrap_err();
    assert!(matches!(err, Error::Metadata(_)));
    assert!(err.to_string().contains("version"));
    assert!(list_files(&fixture.dest()).is_empty());
}

#[test]
fn test_step_without_title_aborts_run() {
    let fixture = intro_advanced();
    fixture.write("basics/intro/node2.html", "<html><body><p>No title.</p></body></html>");

    let err = process(fixture.config()).unwrap_err();
    assert!(matches!(err, Error::Step { .. }), "{err}");
    assert!(err.to_string().contains("node2.html"));
    assert!(!fixture.dest().exists());
}

#[test]
fn test_write_failure_is_fatal() {
    let fixture = intro_advanced();
    std::fs::create_dir_all(fixture.dest()).unwrap();
    std::fs::write(fixture.dest().join("basics"), "a file where a directory belongs").unwrap();

    let err = process(fixture.config()).unwrap_err();
    assert!(matches!(err, Error::Write { .. }), "{err}");

    let fixture = intro_advanced();
    std::fs::write(fixture.dest(), "not a directory").unwrap();
    assert!(matches!(process(fixture.config()), Err(Error::Write { .. })));
}

#[test]
fn test_unknown_level_is_fatal() {
    let fixture = intro_advanced();
    fixture.theme("basics", "Basics", 1, &[module_xml("intro", "Introduction", "purple", 1, &[])]);

    let err = process(fixture.config()).unwrap_err();
    assert!(err.to_string().contains("purple"));
    assert!(!fixture.dest().exists());
}

#[test]
fn test_unknown_relation_target_is_fatal() {
    let fixture = intro_advanced();
    fixture.theme(
        "basics",
        "Basics",
        1,
        &[module_xml("intro", "Introduction", "green", 1, &["ghost"])],
    );
    assert!(matches!(process(fixture.config()), Err(Error::Metadata(_))));
}

#[test]
fn test_unreadable_module_skips_theme_only() {
    let fixture = intro_advanced();
    fixture
        .theme("broken", "Broken", 2, &[module_xml("empty", "Empty", "green", 1, &[])])
        .write("broken/empty/readme.txt", "no steps here");

    let report = process(fixture.config()).unwrap();
    assert_eq!(report.themes, 1);
    assert!(report.warnings.iter().any(|w| w.message.contains("theme failed validation")));
    assert!(!fixture.has_output("broken/themeindex.html"));
    assert!(fixture.has_output("basics/themeindex.html"));
}

#[test]
fn test_filter_selects_themes() {
    let fixture = intro_advanced();
    fixture
        .theme("extra", "Extra", 0, &[module_xml("one", "One", "yellow", 1, &[])])
        .step("extra", "one", "step01.html", "Only", "x");

    let report = process(fixture.config().with_filter(vec!["extra".into()])).unwrap();
    assert_eq!(report.themes, 1);
    assert!(fixture.has_output("extra/one/step01.html"));
    assert!(!fixture.has_output("basics/themeindex.html"));
}

#[test]
fn test_course_without_metadata_uses_configured_title() {
    let fixture = CourseFixture::new();
    fixture
        .theme("t", "Theme", 1, &[module_xml("m", "Module", "orange", 1, &[])])
        .step("t", "m", "step01.html", "First", "x");

    let config = fixture.config().with_course_title("Fallback");
    let report = Processor::new(config).unwrap().run().unwrap();
    assert_eq!(report.steps, 1);
    assert!(fixture.output("courseindex.html").contains("<h1>Fallback</h1>"));
    assert!(!fixture.has_output("index.html"));
}
