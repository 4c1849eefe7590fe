use super::*;
use crate::scan::{ElementKind, TagNames, TopLevelScanner, find_cut_offset, group_ends};
use crate::{Error, resolve_group_end, tree};

fn body_range(doc: &str) -> (usize, usize) {
    let tags = TagNames::default();
    let root = crate::scan::find_root_open(doc, tags.root).unwrap();
    let close = crate::scan::find_root_close(doc, tags.root).unwrap();
    (root.end, close)
}

#[test]
fn scanner_classifies_children_in_order() {
    let doc = card(&four_groups());
    let (from, limit) = body_range(&doc);
    let kinds: Vec<_> = TopLevelScanner::new(&doc, from, limit, TagNames::default())
        .map(|el| el.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Style,
            ElementKind::Defs,
            ElementKind::Rect,
            ElementKind::Group,
            ElementKind::Group,
            ElementKind::Group,
            ElementKind::Group,
        ]
    );
}

#[test]
fn every_group_boundary_lies_between_its_start_and_the_next_start() {
    let groups: Vec<String> = (0..5)
        .map(|i| nested_group(&format!("g{i}"), i % 4))
        .collect();
    let doc = card(&groups);
    let (from, limit) = body_range(&doc);
    let starts: Vec<usize> = (0..5)
        .map(|i| doc.find(&format!(r#"<g id="g{i}""#)).unwrap())
        .collect();
    let ends = group_ends(&doc, from, limit, TagNames::default());
    assert_eq!(ends.len(), 5);

    for k in 0..5 {
        assert!(ends[k] > starts[k]);
        if k + 1 < 5 {
            assert!(ends[k] <= starts[k + 1], "group {k} overruns the next group");
        }
        assert_eq!(&doc[ends[k] - 4..ends[k]], "</g>");
    }

    let tree_ends: Vec<usize> = tree::top_level_group_ranges(&doc, TagNames::default())
        .unwrap()
        .into_iter()
        .map(|r| r.end)
        .collect();
    assert_eq!(ends, tree_ends);
}

#[test]
fn outer_boundary_ignores_nested_same_named_groups() {
    for depth in [0, 1, 3] {
        let group = nested_group("outer", depth);
        let doc = card(&[group.clone(), nested_group("next", 1)]);
        let start = HEAD.len();
        assert_eq!(
            resolve_group_end(&doc, start, "g"),
            Some(start + group.len()),
            "depth {depth}"
        );
    }
}

#[test]
fn look_alike_tag_names_do_not_count() {
    let group = r#"<g id="a"><glyph/><gx></gx><text>g</text><g-b/><gradient></gradient></g>"#;
    let doc = card(&[group.to_string()]);
    assert_eq!(
        resolve_group_end(&doc, HEAD.len(), "g"),
        Some(HEAD.len() + group.len())
    );
}

#[test]
fn self_closing_groups_do_not_change_depth() {
    let inner = r#"<g id="outer"><g class="empty"/><g><g /></g></g>"#;
    assert_eq!(resolve_group_end(inner, 0, "g"), Some(inner.len()));

    let doc = card(&[r#"<g id="empty"/>"#.to_string(), nested_group("second", 1)]);
    let (from, limit) = body_range(&doc);
    let ends = group_ends(&doc, from, limit, TagNames::default());
    assert_eq!(ends.len(), 2);
    assert_eq!(ends[0], HEAD.len() + r#"<g id="empty"/>"#.len());
}

#[test]
fn quoted_angle_brackets_stay_inside_the_tag() {
    let group = r#"<g data-label="a > b" class='x</g>'><path d="M0 0"/></g>"#;
    assert_eq!(resolve_group_end(group, 0, "g"), Some(group.len()));
}

#[test]
fn unbalanced_group_is_not_resolved() {
    let doc = card(&[
        nested_group("ok", 1),
        r#"<g id="broken"><g></g>"#.to_string(),
    ]);
    let (from, limit) = body_range(&doc);
    let broken = doc.find(r#"<g id="broken""#).unwrap();
    assert_eq!(resolve_group_end(&doc, broken, "g"), None);

    match find_cut_offset(&doc, from, limit, TagNames::default(), 2) {
        Err(Error::BoundaryNotFound { required, found }) => {
            assert_eq!((required, found), (2, 1));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn stray_close_tag_is_not_resolved() {
    assert_eq!(resolve_group_end("</g><g></g>", 0, "g"), None);
}

#[test]
fn unknown_siblings_are_stepped_over() {
    let doc = HEAD.replace(
        "<rect x=",
        "<metadata><title>card</title></metadata>\n<rect x=",
    ) + &nested_group("contrib", 1)
        + "\n</svg>\n";
    let (from, limit) = body_range(&doc);
    let cut = find_cut_offset(&doc, from, limit, TagNames::default(), 1).unwrap();
    assert_eq!(&doc[cut..], "\n</svg>\n");
}

#[test]
fn scanner_is_restartable_and_bounded() {
    let doc = card(&four_groups());
    let (from, limit) = body_range(&doc);
    let mut scanner = TopLevelScanner::new(&doc, from, limit, TagNames::default());
    let first_group = scanner
        .by_ref()
        .find(|el| el.kind == ElementKind::Group)
        .unwrap();
    let resume = scanner.position();
    assert_eq!(Some(resume), first_group.end);

    let rest: Vec<_> = TopLevelScanner::new(&doc, resume, limit, TagNames::default()).collect();
    assert_eq!(rest.len(), 3);
    assert!(rest.iter().all(|el| el.end.is_some_and(|e| e <= limit)));
}

#[test]
fn custom_group_tag() {
    let doc = r#"<svg><a id="1"><a></a></a><a id="2"></a></svg>"#;
    let tags = TagNames {
        root: "svg",
        group: "a",
    };
    let (from, limit) = (5, doc.len() - "</svg>".len());
    let cut = find_cut_offset(doc, from, limit, tags, 1).unwrap();
    assert_eq!(&doc[..cut], r#"<svg><a id="1"><a></a></a>"#);
}
