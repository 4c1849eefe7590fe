//! Cut, resize and splice: assembles the trimmed document.

use crate::attrs::{Length, StartTag, ViewBox, fmt_num};
use crate::config::{Locator, OverlayAnchor, SizingMode, TrimConfig};
use crate::error::{Error, Result};
use crate::overlay::{StreakBadge, anchor_point};
use crate::scan::{self, ElementKind, TagNames, TagSpan, TopLevelScanner};
use crate::tree;

/// Outcome of [`trim_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trimmed {
    pub text: String,
    /// End of the last kept group in the input document.
    pub cut_offset: usize,
    pub groups_kept: usize,
    pub groups_removed: usize,
    /// The canvas or background rectangle attributes were rewritten.
    pub resized: bool,
    pub overlay: bool,
}

/// Keeps the first `config.keep_groups` top-level groups of `doc`, drops every later
/// sibling, applies the sizing policy and, when `streak` is given, injects the badge.
pub fn trim_document(doc: &str, config: &TrimConfig, streak: Option<u64>) -> Result<Trimmed> {
    config.validate()?;
    let tags = config.tag_names();

    let root = scan::find_root_open(doc, tags.root).ok_or_else(|| Error::RootNotFound {
        tag: tags.root.to_string(),
    })?;
    let close = scan::find_root_close(doc, tags.root)
        .filter(|&c| c >= root.end)
        .ok_or_else(|| Error::RootCloseNotFound {
            tag: tags.root.to_string(),
        })?;

    let cut = locate_cut(doc, root, close, config)?;
    let groups_removed = TopLevelScanner::new(doc, cut, close, tags)
        .filter(|el| el.kind == ElementKind::Group)
        .count();

    let badge_placement = match streak {
        Some(_) => config.overlay,
        None => OverlayAnchor::None,
    };
    let with_badge = badge_placement != OverlayAnchor::None;

    let mut root_tag = StartTag::parse(&doc[root.start..root.end]).ok_or_else(|| {
        Error::RootNotFound {
            tag: tags.root.to_string(),
        }
    })?;
    let background = find_background(doc, root.end, cut, tags);
    let mut rect_tag = match background {
        Some(span) => StartTag::parse(&doc[span.start..span.end]),
        None => None,
    };

    apply_sizing(config.sizing, with_badge, &mut root_tag, rect_tag.as_mut())?;
    let resized = root_tag.is_modified() || rect_tag.as_ref().is_some_and(|t| t.is_modified());

    let fragment = match streak {
        Some(count) if with_badge => {
            let canvas = canvas_of(&root_tag)?;
            anchor_point(badge_placement, &canvas, &config.badge)
                .map(|anchor| {
                    StreakBadge {
                        count,
                        anchor,
                        placement: badge_placement,
                        style: &config.badge,
                    }
                    .render()
                })
                .unwrap_or_default()
        }
        _ => String::new(),
    };

    let mut text = String::with_capacity(cut + fragment.len() + (doc.len() - close) + 1);
    text.push_str(&doc[..root.start]);
    text.push_str(&root_tag.render());
    match (background, &rect_tag) {
        (Some(span), Some(tag)) => {
            text.push_str(&doc[root.end..span.start]);
            text.push_str(&tag.render());
            text.push_str(&doc[span.end..cut]);
        }
        _ => text.push_str(&doc[root.end..cut]),
    }
    text.push_str(&fragment);
    text.push('\n');
    text.push_str(&doc[close..]);

    tracing::debug!(
        cut,
        kept = config.keep_groups,
        removed = groups_removed,
        resized,
        overlay = with_badge,
        "trimmed document"
    );

    Ok(Trimmed {
        text,
        cut_offset: cut,
        groups_kept: config.keep_groups,
        groups_removed,
        resized,
        overlay: with_badge,
    })
}

fn locate_cut(doc: &str, root: TagSpan, close: usize, config: &TrimConfig) -> Result<usize> {
    let tags = config.tag_names();
    let keep = config.keep_groups;
    match config.locator {
        Locator::Scan => scan::find_cut_offset(doc, root.end, close, tags, keep),
        Locator::Tree => tree::find_cut_offset(doc, tags, keep),
        Locator::Verified => {
            let scanned = scan::find_cut_offset(doc, root.end, close, tags, keep)?;
            let parsed = tree::find_cut_offset(doc, tags, keep)?;
            if scanned != parsed {
                return Err(Error::LocatorMismatch {
                    scan: scanned,
                    tree: parsed,
                });
            }
            Ok(scanned)
        }
    }
}

/// The background is the first top-level `rect`; it only counts when it sits before the cut.
fn find_background(doc: &str, from: usize, cut: usize, tags: TagNames<'_>) -> Option<TagSpan> {
    TopLevelScanner::new(doc, from, cut, tags)
        .find(|el| el.kind == ElementKind::Rect)
        .and_then(|el| {
            el.end.map(|end| TagSpan {
                start: el.start,
                end,
            })
        })
}

fn apply_sizing(
    sizing: SizingMode,
    with_badge: bool,
    root: &mut StartTag<'_>,
    rect: Option<&mut StartTag<'_>>,
) -> Result<()> {
    match sizing {
        SizingMode::None => Ok(()),
        SizingMode::Crop { height } => crop(height, root, rect),
        SizingMode::ReserveTop { extra } if with_badge => reserve_top(extra, root, rect),
        SizingMode::ReserveTop { .. } => Ok(()),
    }
}

fn number_attr(tag: &StartTag<'_>, key: &str) -> Result<f64> {
    let raw = tag.require(key)?;
    Length::parse(raw)
        .and_then(Length::number)
        .ok_or_else(|| Error::invalid_attribute(tag.name(), key, raw))
}

fn required_view_box(tag: &StartTag<'_>) -> Result<ViewBox> {
    tag.view_box()?
        .ok_or_else(|| Error::missing_attribute(tag.name(), "viewBox"))
}

fn crop(height: f64, root: &mut StartTag<'_>, rect: Option<&mut StartTag<'_>>) -> Result<()> {
    // Only ever shrinks; a canvas already at or below `height` is left alone.
    let current = number_attr(root, "height")?;
    let mut view_box = required_view_box(root)?;
    if current > height {
        root.set("height", fmt_num(height));
    }
    if view_box.height > height {
        view_box.height = height;
        root.set("viewBox", view_box.to_string());
    }

    if let Some(rect) = rect {
        if let Some(Length::Number(current)) = rect.length("height")? {
            if current > height {
                rect.set("height", fmt_num(height));
            }
        }
    }
    Ok(())
}

fn reserve_top(extra: f64, root: &mut StartTag<'_>, rect: Option<&mut StartTag<'_>>) -> Result<()> {
    let height = number_attr(root, "height")?;
    let mut view_box = required_view_box(root)?;
    // The band above the content is already there from an earlier run.
    if view_box.min_y <= -extra {
        return Ok(());
    }
    view_box.min_y -= extra;
    view_box.height += extra;
    root.set("height", fmt_num(height + extra));
    root.set("viewBox", view_box.to_string());

    if let Some(rect) = rect {
        let y = match rect.length("y")? {
            None => 0.0,
            Some(Length::Number(y)) => y,
            Some(Length::Percent(_)) => {
                let raw = rect.get("y").unwrap_or_default().to_string();
                return Err(Error::invalid_attribute(rect.name(), "y", &raw));
            }
        };
        match rect.length("height")? {
            None => return Err(Error::missing_attribute(rect.name(), "height")),
            Some(Length::Number(h)) => {
                rect.set("height", fmt_num(h + extra));
                rect.set("y", fmt_num(y - extra));
            }
            // Relative heights already follow the viewBox.
            Some(Length::Percent(_)) => {}
        }
    }
    Ok(())
}

/// The canvas the badge is placed on: the viewBox, or `0 0 width height` without one.
fn canvas_of(root: &StartTag<'_>) -> Result<ViewBox> {
    if let Some(view_box) = root.view_box()? {
        return Ok(view_box);
    }
    Ok(ViewBox {
        min_x: 0.0,
        min_y: 0.0,
        width: number_attr(root, "width")?,
        height: number_attr(root, "height")?,
    })
}
