//! Nesting-aware scanning over the direct children of the root element.
//!
//! The scanner never builds a tree. It walks `<name` occurrences in document order and skips
//! over each recognised child in one step:
//! - `style` / `defs` jump to their literal closing tag (they are never nested),
//! - `rect` jumps to the end of its own tag (the background is self-closing),
//! - groups are handed to [`resolve_group_end`], which counts open/close tags of the group
//!   name so that same-named descendants do not end the group early.

use crate::error::{Error, Result};

/// Tag names the scanner treats specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagNames<'t> {
    pub root: &'t str,
    pub group: &'t str,
}

impl Default for TagNames<'static> {
    fn default() -> Self {
        Self {
            root: "svg",
            group: "g",
        }
    }
}

impl TagNames<'_> {
    pub fn classify(&self, name: &str) -> ElementKind {
        if name == self.group {
            return ElementKind::Group;
        }
        if name == self.root {
            return ElementKind::Root;
        }
        match name {
            "style" => ElementKind::Style,
            "defs" => ElementKind::Defs,
            "rect" => ElementKind::Rect,
            _ => ElementKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Style,
    Defs,
    Rect,
    Group,
    Root,
    Other,
}

/// A direct child of the root element, as byte offsets into the document.
///
/// `end` is `None` when the element's end could not be found; the scan stops right after
/// yielding such an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopLevelElement<'a> {
    pub name: &'a str,
    pub kind: ElementKind,
    pub start: usize,
    pub end: Option<usize>,
}

/// Location of an opening tag: `start` is the `<`, `end` is one past its `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpan {
    pub start: usize,
    pub end: usize,
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

/// Finds the next `<name` in `doc[from..limit]`. Closing tags, comments, processing
/// instructions and declarations are skipped.
pub(crate) fn next_open_tag(doc: &str, from: usize, limit: usize) -> Option<(usize, &str)> {
    let bytes = doc.as_bytes();
    let limit = limit.min(doc.len());
    let mut pos = from;
    while pos < limit {
        let start = pos + doc[pos..limit].find('<')?;
        let name_start = start + 1;
        if name_start < limit && is_name_start(bytes[name_start]) {
            let mut name_end = name_start;
            while name_end < limit && is_name_char(bytes[name_end]) {
                name_end += 1;
            }
            return Some((start, &doc[name_start..name_end]));
        }
        pos = name_start;
    }
    None
}

/// Returns the offset one past the `>` that closes the tag starting at `start`.
///
/// `>` inside quoted attribute values does not end the tag.
pub(crate) fn tag_end(doc: &str, start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in doc.as_bytes()[start..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(start + i + 1),
                _ => {}
            },
        }
    }
    None
}

fn is_self_closing(doc: &str, span: TagSpan) -> bool {
    doc[span.start..span.end - 1].ends_with('/')
}

/// Locates the first opening tag named `root`.
pub fn find_root_open(doc: &str, root: &str) -> Option<TagSpan> {
    let mut pos = 0;
    while let Some((start, name)) = next_open_tag(doc, pos, doc.len()) {
        if name == root {
            let end = tag_end(doc, start)?;
            return Some(TagSpan { start, end });
        }
        pos = start + 1;
    }
    None
}

/// Locates the root's closing tag by searching backwards from the end of the document.
pub fn find_root_close(doc: &str, root: &str) -> Option<usize> {
    doc.rfind(&format!("</{root}>"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupTagKind {
    Open,
    SelfClosing,
    Close,
}

#[derive(Debug, Clone, Copy)]
struct GroupTag {
    kind: GroupTagKind,
    end: usize,
}

/// Finds the next opening or closing tag for `group` at or after `from`.
///
/// The name must be followed by whitespace, `>` or `/`, so `<gx>` does not count as `<g>`.
fn next_group_tag(doc: &str, from: usize, group: &str) -> Option<GroupTag> {
    let mut pos = from;
    while pos < doc.len() {
        let start = pos + doc[pos..].find('<')?;
        let mut name_start = start + 1;
        let closing = doc[name_start..].starts_with('/');
        if closing {
            name_start += 1;
        }
        let after_name = name_start + group.len();
        let boundary = doc[name_start..].starts_with(group)
            && doc
                .as_bytes()
                .get(after_name)
                .is_some_and(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/');
        if boundary {
            let end = tag_end(doc, start)?;
            let kind = if closing {
                GroupTagKind::Close
            } else if is_self_closing(doc, TagSpan { start, end }) {
                GroupTagKind::SelfClosing
            } else {
                GroupTagKind::Open
            };
            return Some(GroupTag { kind, end });
        }
        pos = start + 1;
    }
    None
}

/// Given the offset of a group's opening tag, returns the offset just past its matching
/// closing tag, or `None` when the document is unbalanced from `start` onwards.
pub fn resolve_group_end(doc: &str, start: usize, group: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = start;
    while let Some(tag) = next_group_tag(doc, pos, group) {
        match tag.kind {
            GroupTagKind::Open => depth += 1,
            GroupTagKind::SelfClosing => {
                if depth == 0 {
                    return Some(tag.end);
                }
            }
            GroupTagKind::Close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(tag.end);
                }
            }
        }
        pos = tag.end;
    }
    None
}

/// Lazy walk over the direct children of the root element in `doc[from..limit]`.
#[derive(Debug, Clone)]
pub struct TopLevelScanner<'a, 't> {
    doc: &'a str,
    pos: usize,
    limit: usize,
    tags: TagNames<'t>,
    done: bool,
}

impl<'a, 't> TopLevelScanner<'a, 't> {
    pub fn new(doc: &'a str, from: usize, limit: usize, tags: TagNames<'t>) -> Self {
        Self {
            doc,
            pos: from,
            limit: limit.min(doc.len()),
            tags,
            done: false,
        }
    }

    /// Offset the next `next()` call resumes from.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn element_end(&self, start: usize, name: &str, kind: ElementKind) -> Option<usize> {
        let doc = self.doc;
        match kind {
            ElementKind::Style | ElementKind::Defs => {
                let open_end = tag_end(doc, start)?;
                if is_self_closing(doc, TagSpan { start, end: open_end }) {
                    return Some(open_end);
                }
                let close = format!("</{name}>");
                doc[start..].find(&close).map(|i| start + i + close.len())
            }
            ElementKind::Rect => tag_end(doc, start),
            ElementKind::Group => resolve_group_end(doc, start, self.tags.group),
            ElementKind::Root | ElementKind::Other => None,
        }
    }
}

impl<'a> Iterator for TopLevelScanner<'a, '_> {
    type Item = TopLevelElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some((start, name)) = next_open_tag(self.doc, self.pos, self.limit) else {
                self.done = true;
                return None;
            };
            let kind = self.tags.classify(name);
            match kind {
                ElementKind::Root => {
                    tracing::warn!(offset = start, "nested <{name}> inside the root element");
                    self.pos = start + 1;
                    continue;
                }
                ElementKind::Other => {
                    tracing::debug!(offset = start, "stepping over unrecognised <{name}>");
                    self.pos = start + 1;
                    continue;
                }
                _ => {}
            }

            let end = self.element_end(start, name, kind);
            match end {
                Some(end) => self.pos = end,
                None => {
                    tracing::debug!(offset = start, "no end found for <{name}>; stopping scan");
                    self.done = true;
                }
            }
            return Some(TopLevelElement {
                name,
                kind,
                start,
                end,
            });
        }
    }
}

/// End offsets of the top-level groups in `doc[from..limit]`, in document order.
///
/// Stops at the first group whose closing tag cannot be resolved.
pub fn group_ends(doc: &str, from: usize, limit: usize, tags: TagNames<'_>) -> Vec<usize> {
    TopLevelScanner::new(doc, from, limit, tags)
        .filter(|el| el.kind == ElementKind::Group)
        .map_while(|el| el.end)
        .collect()
}

/// The cut offset: the end of the `keep`-th top-level group.
pub fn find_cut_offset(
    doc: &str,
    from: usize,
    limit: usize,
    tags: TagNames<'_>,
    keep: usize,
) -> Result<usize> {
    let mut found = 0;
    for el in TopLevelScanner::new(doc, from, limit, tags) {
        if el.kind != ElementKind::Group {
            continue;
        }
        let Some(end) = el.end else {
            break;
        };
        found += 1;
        tracing::debug!(index = found, start = el.start, end, "resolved top-level group");
        if found == keep {
            return Ok(end);
        }
    }
    Err(Error::BoundaryNotFound {
        required: keep,
        found,
    })
}
