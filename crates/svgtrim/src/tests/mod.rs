mod scan;

pub(crate) const HEAD: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="1280" height="850" viewBox="0 0 1280 850">
<style>.bar { fill: #39d353; } g > text { font-size: 12px; }</style>
<defs><linearGradient id="bg"><stop offset="0" stop-color="#0d1117"/></linearGradient></defs>
<rect x="0" y="0" width="1280" height="850" fill="url(#bg)"/>
"##;

/// A card with the usual header followed by `groups`, one per line.
pub(crate) fn card(groups: &[String]) -> String {
    let mut s = String::from(HEAD);
    for g in groups {
        s.push_str(g);
        s.push('\n');
    }
    s.push_str("</svg>\n");
    s
}

/// A top-level group wrapping `depth` levels of same-named descendants.
pub(crate) fn nested_group(id: &str, depth: usize) -> String {
    let mut s = format!(r#"<g id="{id}" transform="translate(40 40)">"#);
    for level in 0..depth {
        s.push_str(&format!(r#"<g class="level-{level}">"#));
    }
    s.push_str(r#"<rect class="bar" width="10" height="10"/>"#);
    for _ in 0..depth {
        s.push_str("</g>");
    }
    s.push_str("</g>");
    s
}

pub(crate) fn four_groups() -> Vec<String> {
    vec![
        nested_group("contrib", 2),
        r#"<g id="radar"><g><path d="M0 0L10 10"/></g></g>"#.to_string(),
        r#"<g id="pie"><g class="slice"><path d="M0 0"/></g><g class="slice"/></g>"#.to_string(),
        r#"<g id="stats"><text x="0" y="0">1,234 contributions</text></g>"#.to_string(),
    ]
}
