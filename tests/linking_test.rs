//! Cross-step linking: anchors, glossary, popups and citations.

mod common;

use common::{CourseFixture, module_xml};
use courseproc::{Processor, Templates, process};

fn one_module(fixture: &CourseFixture) -> &CourseFixture {
    fixture.theme(
        "calc",
        "Calculus",
        1,
        &[
            module_xml("limits", "Limits", "yellow", 1, &[]),
            module_xml("series", "Series", "orange", 2, &[]),
        ],
    )
}

// ============================================================================
// Anchors
// ============================================================================

#[test]
fn test_forward_anchor_resolves() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step("calc", "limits", "step01.html", "Intro", r#"See [link to="ratio"]the ratio test[/link]."#)
        .step("calc", "series", "step03.html", "Tests", r#"[target name="ratio"]Ratio test."#);

    let report = process(fixture.config()).unwrap();
    assert!(report.warnings.iter().all(|w| !w.message.contains("anchor")));

    let page = fixture.output("calc/limits/step01.html");
    assert!(page.contains("<a href=\"../../calc/series/step03.html#ratio\">the ratio test</a>"));
}

#[test]
fn test_unresolved_anchor_is_inline_error() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step("calc", "limits", "step01.html", "Intro", r#"See [link to="foo"]foo[/link]."#)
        .step("calc", "series", "step01.html", "Other", "x");

    let report = process(fixture.config()).unwrap();
    let page = fixture.output("calc/limits/step01.html");
    assert!(page.contains("<span class=\"error\">Unable to locate anchor &#39;foo&#39;</span>"));
    assert!(report.warnings.iter().any(|w| w.location == "calc/limits/step01.html"
        && w.message.contains("unable to locate anchor 'foo'")));
    // The run continued past the broken link.
    assert!(fixture.has_output("calc/series/step01.html"));
}

#[test]
fn test_duplicate_anchor_keeps_first() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step("calc", "limits", "step01.html", "A", r#"[target name="x"] [link to="x"]x[/link]"#)
        .step("calc", "series", "step01.html", "B", r#"[target name="x"]"#);

    let report = process(fixture.config()).unwrap();
    assert!(report.warnings.iter().any(|w| w.message.contains("anchor 'x' is already defined")));
    assert!(fixture.output("calc/limits/step01.html").contains("href=\"../../calc/limits/step01.html#x\""));
}

// ============================================================================
// Glossary
// ============================================================================

#[test]
fn test_glossary_backlinks_one_per_reference_in_step_order() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step("calc", "limits", "step01.html", "Def", r#"[glossary term="Limit"]The value approached.[/glossary]"#)
        .step("calc", "limits", "step02.html", "Use", r#"A [glossary term="limit" /]."#)
        .step("calc", "series", "step01.html", "Use again", r#"Another [glossary term="Limit" /]."#)
        .step("calc", "series", "step02.html", "Redefine", r#"[glossary term="limit"]Something else.[/glossary]"#);

    let report = process(fixture.config()).unwrap();
    assert!(report.warnings.iter().any(|w| w.location == "calc/series/step02.html"
        && w.message.contains("keeping the first definition")));

    let page = fixture.output("glossary/l.html");
    assert!(page.contains("The value approached."));
    assert!(!page.contains("Something else."));
    let first = page.find("<a href=\"../calc/limits/step02.html\"").unwrap();
    let second = page.find("<a href=\"../calc/series/step01.html\"").unwrap();
    assert!(first < second);
    assert_eq!(page.matches("title=\"calc/").count(), 2);

    let index = fixture.output("glossary/index.html");
    assert!(index.contains("<li><a href=\"l.html#limit\">Limit</a></li>"));
    assert!(!fixture.has_output("glossary/a.html"));

    let step = fixture.output("calc/limits/step02.html");
    assert!(step.contains("<a class=\"glossary\" href=\"../../glossary/l.html#limit\">limit</a>"));
    assert!(step.contains("<a class=\"glossary-link\" href=\"../../glossary/index.html\">Glossary</a>"));
}

#[test]
fn test_undefined_glossary_term_warns() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step("calc", "limits", "step01.html", "A", r#"[glossary term="2-norm" /]"#)
        .step("calc", "series", "step01.html", "B", "x");

    let report = process(fixture.config()).unwrap();
    assert!(report.warnings.iter().any(|w| w.message.contains("referenced but never defined")));
    assert!(fixture.output("calc/limits/step01.html").contains("Unknown glossary term"));
    assert!(!fixture.has_output("glossary/index.html"));
}

// ============================================================================
// Media and popups
// ============================================================================

#[test]
fn test_media_and_popups() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step(
            "calc",
            "limits",
            "step01.html",
            "Media",
            r#"[image name="plot.png"] [applet name="Sim.class"]
               [popup name="proof" title="Proof"]By \"induction\" \[1\].[/popup]"#,
        )
        .step("calc", "series", "step01.html", "B", "x");

    let report = process(fixture.config()).unwrap();
    let page = fixture.output("calc/limits/step01.html");
    assert!(page.contains("<img src=\"plot.png\" alt=\"plot.png\" />"));
    assert!(page.contains("<p class=\"error\">applet marker &#39;Sim.class&#39; needs both"));
    assert!(page.contains("href=\"popup_proof.html\""));
    assert!(report.warnings.iter().any(|w| w.message.contains("applet marker")));

    let popup = fixture.output("calc/limits/popup_proof.html");
    assert!(popup.contains("By \"induction\" [1]."));
    assert!(popup.contains("<h1>Proof</h1>"));
}

#[test]
fn test_popup_and_definition_content_is_converted() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step(
            "calc",
            "limits",
            "step01.html",
            "A",
            r#"[glossary term="Limit"]Close to [link to="a"]a[/link].[/glossary]
               [popup name="more" title="More"][target name="deep"]See [link to="a"]a[/link].[/popup]"#,
        )
        .step(
            "calc",
            "series",
            "step01.html",
            "B",
            r#"[target name="a"]Here. [glossary term="limit" /] [link to="deep"]deeper[/link]"#,
        );

    let report = process(fixture.config()).unwrap();
    assert!(report.warnings.iter().all(|w| !w.message.contains("anchor")), "{:?}", report.warnings);

    let popup = fixture.output("calc/limits/popup_more.html");
    assert!(popup.contains("<a href=\"../../calc/series/step01.html#a\">a</a>"));
    assert!(popup.contains("<a id=\"deep\" name=\"deep\"></a>"));
    assert!(!popup.contains("[link"));

    let glossary = fixture.output("glossary/l.html");
    assert!(glossary.contains("Close to <a href=\"../calc/series/step01.html#a\">a</a>."));
    assert!(!glossary.contains("[link"));

    // The popup target lives on the popup page, not the step.
    let step = fixture.output("calc/series/step01.html");
    assert!(step.contains("<a href=\"../../calc/limits/popup_more.html#deep\">deeper</a>"));
    assert!(!fixture.output("calc/limits/step01.html").contains("id=\"deep\""));
}

// ============================================================================
// Citations and templates
// ============================================================================

#[test]
fn test_citations_with_bibliography() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .write(
            "refs.xml",
            r#"<references><reference key="apostol">T. Apostol, Calculus.</reference></references>"#,
        )
        .step("calc", "limits", "step01.html", "A", r#"See [ref key="apostol" /][ref key="spivak" /]."#)
        .step("calc", "series", "step01.html", "B", r#"Again [ref key="apostol" /]."#);

    let config = fixture.config().with_references(fixture.source().join("refs.xml"));
    let report = process(config).unwrap();
    assert!(report.warnings.iter().any(|w| w.message.contains("'spivak'")));

    let page = fixture.output("calc/limits/step01.html");
    assert!(page.contains(
        "<cite class=\"ref\">[<a href=\"../../references.html#ref-apostol\">1</a>,\
         <a href=\"../../references.html#ref-spivak\">2</a>]</cite>"
    ));
    assert!(fixture.output("calc/series/step01.html").contains("ref-apostol\">1</a>]"));

    let refs = fixture.output("references.html");
    assert!(refs.contains("T. Apostol, Calculus."));
    assert!(refs.contains("Unknown reference &#39;spivak&#39;"));
}

#[test]
fn test_citations_left_alone_without_bibliography() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step("calc", "limits", "step01.html", "A", r#"See [ref key="apostol" /]."#)
        .step("calc", "series", "step01.html", "B", "x");

    process(fixture.config()).unwrap();
    assert!(fixture.output("calc/limits/step01.html").contains(r#"[ref key="apostol" /]"#));
    assert!(!fixture.has_output("references.html"));
}

#[test]
fn test_template_override() {
    let fixture = CourseFixture::new();
    one_module(&fixture)
        .step("calc", "limits", "step01.html", "A", "body text")
        .step("calc", "series", "step01.html", "B", "x");

    let templates = Templates::new()
        .with("step", "<main>{{title}}|{{body}}</main>")
        .unwrap();
    Processor::new(fixture.config())
        .unwrap()
        .with_templates(Box::new(templates))
        .run()
        .unwrap();
    assert!(fixture.output("calc/limits/step01.html").contains("<main>A|body text</main>"));
}
