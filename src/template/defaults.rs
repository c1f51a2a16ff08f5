//! Built-in page templates.
//!
//! Every page is a content template wrapped in [`PAGE`]. Any of them can be
//! replaced by dropping `<id>.html` into the templates directory.

/// Outer document shared by every generated page.
pub const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{{title}}</title>
<link rel="stylesheet" type="text/css" href="{{root}}course.css" />
</head>
<body class="{{class}}">
{{content}}
</body>
</html>
"#;

pub const STEP: &str = r#"<div class="nav">
<div class="breadcrumb">{{breadcrumb}}</div>
<div class="menus">{{theme_menu}} {{module_menu}} {{step_menu}}</div>
<div class="steps">{{prev}} | {{next}}</div>
</div>
<div class="level level-{{level}}">{{level_label}}</div>
<h1>{{title}}</h1>
<div class="content">
{{body}}
</div>
<div class="nav bottom">
<div class="steps">{{prev}} | {{next}}</div>
<div class="extras">{{glossary_link}} {{references_link}}</div>
</div>
"#;

pub const THEME_INDEX: &str = r#"<div class="breadcrumb">{{breadcrumb}}</div>
<div class="menus">{{theme_menu}}</div>
<h1>{{title}}</h1>
<p class="map-link"><a href="index.html">Theme map</a></p>
{{modules}}
"#;

pub const THEME_MAP: &str = r#"<div class="breadcrumb">{{breadcrumb}}</div>
<div class="menus">{{theme_menu}}</div>
<h1>{{title}}</h1>
<div class="map">
{{map}}
</div>
<p class="index-link"><a href="themeindex.html">Theme index</a></p>
"#;

pub const COURSE_INDEX: &str = r#"<h1>{{title}}</h1>
<div class="menus">{{theme_menu}}</div>
{{themes}}
<div class="extras">{{glossary_link}} {{references_link}}</div>
"#;

pub const SPLASH: &str = r#"{{entries}}
<p class="enter"><a href="courseindex.html">Enter the course</a></p>
"#;

pub const GLOSSARY: &str = r#"<h1>{{title}}</h1>
<div class="letters">{{letters}}</div>
<dl class="glossary">
{{entries}}
</dl>
"#;

pub const GLOSSARY_INDEX: &str = r#"<h1>{{title}}</h1>
<div class="letters">{{letters}}</div>
<ul class="glossary-index">
{{entries}}
</ul>
<p><a href="../courseindex.html">Course index</a></p>
"#;

pub const POPUP: &str = r#"<h1>{{title}}</h1>
<div class="popup">
{{body}}
</div>
<p class="close"><a href="javascript:window.close()">Close</a></p>
"#;

pub const REFERENCES: &str = r#"<h1>{{title}}</h1>
<ol class="references">
{{entries}}
</ol>
<p><a href="courseindex.html">Course index</a></p>
"#;

/// Built-in template for `id`.
pub fn builtin(id: &str) -> Option<&'static str> {
    Some(match id {
        "page" => PAGE,
        "step" => STEP,
        "themeindex" => THEME_INDEX,
        "thememap" => THEME_MAP,
        "courseindex" => COURSE_INDEX,
        "splash" => SPLASH,
        "glossary" => GLOSSARY,
        "glossaryindex" => GLOSSARY_INDEX,
        "popup" => POPUP,
        "references" => REFERENCES,
        _ => return None,
    })
}

/// Every template id the emitter uses.
pub const IDS: &[&str] = &[
    "page",
    "step",
    "themeindex",
    "thememap",
    "courseindex",
    "splash",
    "glossary",
    "glossaryindex",
    "popup",
    "references",
];
