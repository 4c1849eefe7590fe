#![forbid(unsafe_code)]

//! Post-processing for generated contribution-card SVGs.
//!
//! A card is an `<svg>` whose direct children are, in order, a `<style>` block, a `<defs>`
//! block, a background `<rect>` and a run of `<g>` drawings. `svgtrim` keeps the first few
//! groups, drops the rest, resizes the canvas and can stamp a streak badge in the freed space.
//!
//! Group boundaries are found by a nesting-aware scanner ([`scan`]) rather than a full XML
//! parse; [`tree`] offers the parsed-tree alternative and a cross-check.

pub mod attrs;
pub mod compose;
pub mod config;
pub mod error;
pub mod overlay;
pub mod scan;
pub mod tree;

pub use compose::{Trimmed, trim_document};
pub use config::{BadgeStyle, Locator, OverlayAnchor, Preset, SizingMode, TrimConfig};
pub use error::{Error, Result};
pub use scan::{ElementKind, TagNames, TopLevelElement, TopLevelScanner, resolve_group_end};

#[cfg(test)]
mod tests;
