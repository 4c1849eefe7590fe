//! Group boundaries taken from a parsed XML tree.
//!
//! Slower than the scanner and stricter about well-formedness, but immune to
//! tag-name look-alikes; used as an alternative locator and to cross-check the scanner.

use crate::error::{Error, Result};
use crate::scan::TagNames;
use std::ops::Range;

/// Byte ranges of the root element's direct group children, in document order.
pub fn top_level_group_ranges(doc: &str, tags: TagNames<'_>) -> Result<Vec<Range<usize>>> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let parsed = roxmltree::Document::parse_with_options(doc, opts)?;
    let root = parsed.root_element();
    if root.tag_name().name() != tags.root {
        return Err(Error::RootNotFound {
            tag: tags.root.to_string(),
        });
    }
    Ok(root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == tags.group)
        .map(|n| n.range())
        .collect())
}

/// The end of the `keep`-th top-level group.
pub fn find_cut_offset(doc: &str, tags: TagNames<'_>, keep: usize) -> Result<usize> {
    let ranges = top_level_group_ranges(doc, tags)?;
    ranges
        .get(keep.saturating_sub(1))
        .filter(|_| keep > 0)
        .map(|r| r.end)
        .ok_or(Error::BoundaryNotFound {
            required: keep,
            found: ranges.len(),
        })
}
