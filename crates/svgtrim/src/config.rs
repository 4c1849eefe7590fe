use crate::error::{Error, Result};
use crate::scan::TagNames;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// How the root canvas (and the background rectangle) is resized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SizingMode {
    #[default]
    None,
    /// Shrink the canvas to at most `height`. Applied on every run.
    Crop { height: f64 },
    /// Grow the canvas upwards by `extra`, once. Applied only when a badge is injected.
    ReserveTop { extra: f64 },
}

/// Where the streak badge is anchored on the (resized) canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayAnchor {
    #[default]
    None,
    BottomLeft,
    TopCenter,
}

/// Which implementation resolves the cut offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Locator {
    /// Nesting-aware text scanner.
    #[default]
    Scan,
    /// Byte ranges from a parsed XML tree.
    Tree,
    /// Both; a disagreement is an error.
    Verified,
}

impl FromStr for Locator {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scan" => Ok(Self::Scan),
            "tree" => Ok(Self::Tree),
            "verified" | "verify" => Ok(Self::Verified),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BadgeStyle {
    pub caption: String,
    pub font_family: String,
    pub number_size: f64,
    pub caption_size: f64,
    pub icon_size: f64,
    pub flame_color: String,
    pub flame_core_color: String,
    pub number_color: String,
    pub caption_color: String,
    /// Horizontal distance from the left canvas edge (bottom-left placement).
    pub inset_x: f64,
    /// Distance from the bottom canvas edge (bottom-left placement).
    pub inset_bottom: f64,
    /// Distance from the top canvas edge (top-center placement).
    pub inset_top: f64,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            caption: "day streak".to_string(),
            font_family: "Ubuntu, 'Segoe UI', Arial, sans-serif".to_string(),
            number_size: 48.0,
            caption_size: 16.0,
            icon_size: 40.0,
            flame_color: "#ff9600".to_string(),
            flame_core_color: "#ffc800".to_string(),
            number_color: "#ff9600".to_string(),
            caption_color: "#8b949e".to_string(),
            inset_x: 120.0,
            inset_bottom: 70.0,
            inset_top: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrimConfig {
    /// Number of leading top-level groups to keep.
    pub keep_groups: usize,
    pub sizing: SizingMode,
    pub overlay: OverlayAnchor,
    pub locator: Locator,
    pub root_tag: String,
    pub group_tag: String,
    pub badge: BadgeStyle,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl TrimConfig {
    pub fn tag_names(&self) -> TagNames<'_> {
        TagNames {
            root: &self.root_tag,
            group: &self.group_tag,
        }
    }

    /// Layers a (partial) JSON object on top of this configuration.
    pub fn with_json_overrides(&self, overrides: Value) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        deep_merge(&mut base, overrides);
        Ok(serde_json::from_value(base)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keep_groups == 0 {
            return Err(invalid("keepGroups must be at least 1"));
        }
        for (what, tag) in [("rootTag", &self.root_tag), ("groupTag", &self.group_tag)] {
            let valid = tag.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
                && tag
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
            if !valid {
                return Err(invalid(&format!("{what} {tag:?} is not a tag name")));
            }
        }
        match self.sizing {
            SizingMode::Crop { height } if !(height.is_finite() && height > 0.0) => {
                Err(invalid("crop height must be a positive number"))
            }
            SizingMode::ReserveTop { extra } if !(extra.is_finite() && extra >= 0.0) => {
                Err(invalid("reserved space must be a non-negative number"))
            }
            _ => Ok(()),
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfig {
        message: message.to_string(),
    }
}

fn deep_merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// The trimming policies the card pipeline has used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Keep the contribution bars only and crop the empty space left by the charts.
    #[default]
    Crop,
    /// Keep the first two groups at full canvas size.
    KeepTwo,
    /// Keep the contribution bars and grow the canvas upwards to fit the badge.
    ReserveTop,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Crop, Preset::KeepTwo, Preset::ReserveTop];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Crop => "crop",
            Preset::KeepTwo => "keep-two",
            Preset::ReserveTop => "reserve-top",
        }
    }

    pub fn config(self) -> TrimConfig {
        let (keep_groups, sizing, overlay) = match self {
            Preset::Crop => (
                1,
                SizingMode::Crop { height: 630.0 },
                OverlayAnchor::BottomLeft,
            ),
            Preset::KeepTwo => (2, SizingMode::None, OverlayAnchor::BottomLeft),
            Preset::ReserveTop => (
                1,
                SizingMode::ReserveTop { extra: 120.0 },
                OverlayAnchor::TopCenter,
            ),
        };
        TrimConfig {
            keep_groups,
            sizing,
            overlay,
            locator: Locator::Scan,
            root_tag: "svg".to_string(),
            group_tag: "g".to_string(),
            badge: BadgeStyle::default(),
        }
    }
}

impl FromStr for Preset {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Preset::ALL.into_iter().find(|p| p.name() == s).ok_or(())
    }
}
