//! The streak badge: a flame icon, the streak count and a caption.

use crate::attrs::{ViewBox, escape_attr, escape_text, fmt_num};
use crate::config::{BadgeStyle, OverlayAnchor};

// Flame outline on a 24x24 grid.
const FLAME_PATH: &str = "M12 0C13 6 20 9 20 16a8 8 0 0 1-16 0c0-4 2-6 4-8 0 3 1 5 3 5 0-5-2-9 1-13z";
const FLAME_CORE_PATH: &str = "M12 11c1 3 4 4 4 7a4 4 0 0 1-8 0c0-2 1-3 2-4 0 2 1 3 2 3 0-3-1-4 0-6z";
const FLAME_GRID: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Anchor (centre of the count label) for a placement on the given canvas.
pub fn anchor_point(anchor: OverlayAnchor, canvas: &ViewBox, style: &BadgeStyle) -> Option<Point> {
    match anchor {
        OverlayAnchor::None => None,
        OverlayAnchor::BottomLeft => Some(Point {
            x: canvas.min_x + style.inset_x,
            y: canvas.min_y + canvas.height - style.inset_bottom,
        }),
        OverlayAnchor::TopCenter => Some(Point {
            x: canvas.min_x + canvas.width / 2.0,
            y: canvas.min_y + style.inset_top,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct StreakBadge<'s> {
    pub count: u64,
    pub anchor: Point,
    pub placement: OverlayAnchor,
    pub style: &'s BadgeStyle,
}

impl StreakBadge<'_> {
    /// Rough advance width of the count label; the icon sits just left of it.
    fn label_width(&self) -> f64 {
        let digits = self.count.to_string().len() as f64;
        digits * self.style.number_size * 0.6
    }

    /// Renders the badge as a fragment to be inserted at the cut offset.
    pub fn render(&self) -> String {
        let s = self.style;
        let icon_scale = s.icon_size / FLAME_GRID;
        let icon_x = -(self.label_width() / 2.0) - 8.0 - s.icon_size;
        let icon_y = -s.icon_size / 2.0;
        // Caption goes above the count when the badge sits at the bottom edge.
        let caption_dy = match self.placement {
            OverlayAnchor::BottomLeft => -(s.number_size * 0.5 + s.caption_size * 0.6),
            _ => s.number_size * 0.5 + s.caption_size,
        };
        let font = escape_attr(&s.font_family);

        let mut out = String::new();
        out.push_str(&format!(
            "\n<g class=\"streak-badge\" transform=\"translate({} {})\">",
            fmt_num(self.anchor.x),
            fmt_num(self.anchor.y)
        ));
        out.push_str(&format!(
            "<g class=\"streak-icon\" transform=\"translate({} {}) scale({})\"><path d=\"{FLAME_PATH}\" fill=\"{}\"/><path d=\"{FLAME_CORE_PATH}\" fill=\"{}\"/></g>",
            fmt_num(icon_x),
            fmt_num(icon_y),
            fmt_num(icon_scale),
            escape_attr(&s.flame_color),
            escape_attr(&s.flame_core_color),
        ));
        out.push_str(&format!(
            "<text class=\"streak-count\" x=\"0\" y=\"0\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{font}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            fmt_num(s.number_size),
            escape_attr(&s.number_color),
            self.count
        ));
        out.push_str(&format!(
            "<text class=\"streak-caption\" x=\"0\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{font}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            fmt_num(caption_dy),
            fmt_num(s.caption_size),
            escape_attr(&s.caption_color),
            escape_text(&s.caption)
        ));
        out.push_str("</g>");
        out
    }
}
