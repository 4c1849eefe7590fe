//! Keyed access to the attributes of a single opening tag.
//!
//! Edits are applied by rewriting attribute values in place; everything else in the tag
//! (attribute order, quoting, whitespace) is preserved byte-for-byte.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

fn re_attr() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

fn re_length() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r"^\s*(-?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?)\s*(px)?\s*$").unwrap()
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attr<'a> {
    name: &'a str,
    value: &'a str,
    /// Value range within the tag source, quotes excluded.
    value_range: Range<usize>,
}

/// An opening tag such as `<svg width="1280" height="850">`, parsed into attributes.
#[derive(Debug, Clone)]
pub struct StartTag<'a> {
    source: &'a str,
    name: &'a str,
    attrs: Vec<Attr<'a>>,
    updates: Vec<(String, String)>,
}

impl<'a> StartTag<'a> {
    /// Parses the text of one opening tag (`<` through `>`).
    pub fn parse(source: &'a str) -> Option<Self> {
        let inner = source.strip_prefix('<')?;
        let name_len = inner
            .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
            .unwrap_or(inner.len());
        if name_len == 0 || !source.ends_with('>') {
            return None;
        }
        let name = &inner[..name_len];
        let body_start = 1 + name_len;
        let attrs = re_attr()
            .captures_iter(&source[body_start..])
            .filter_map(|caps| {
                let name = caps.get(1)?;
                let value = caps.get(2).or_else(|| caps.get(3))?;
                Some(Attr {
                    name: &source[body_start + name.start()..body_start + name.end()],
                    value: value.as_str(),
                    value_range: body_start + value.start()..body_start + value.end(),
                })
            })
            .collect();
        Some(Self {
            source,
            name,
            attrs,
            updates: Vec::new(),
        })
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Current value of `key`, including edits made through [`StartTag::set`].
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some((_, v)) = self.updates.iter().find(|(k, _)| k == key) {
            return Some(v.as_str());
        }
        self.attrs.iter().find(|a| a.name == key).map(|a| a.value)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::missing_attribute(self.name, key))
    }

    pub fn length(&self, key: &str) -> Result<Option<Length>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => Length::parse(raw)
                .map(Some)
                .ok_or_else(|| Error::invalid_attribute(self.name, key, raw)),
        }
    }

    pub fn view_box(&self) -> Result<Option<ViewBox>> {
        match self.get("viewBox") {
            None => Ok(None),
            Some(raw) => ViewBox::parse(raw)
                .map(Some)
                .ok_or_else(|| Error::invalid_attribute(self.name, "viewBox", raw)),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.updates.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.updates.push((key.to_string(), value));
        }
    }

    pub fn is_modified(&self) -> bool {
        self.updates.iter().any(|(k, v)| {
            self.attrs
                .iter()
                .find(|a| a.name == k)
                .is_none_or(|a| a.value != v)
        })
    }

    /// Re-serialises the tag. Untouched tags come back unchanged.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        let mut last = 0;
        for attr in &self.attrs {
            let Some((_, value)) = self.updates.iter().find(|(k, _)| k == attr.name) else {
                continue;
            };
            out.push_str(&self.source[last..attr.value_range.start]);
            out.push_str(&escape_attr(value));
            last = attr.value_range.end;
        }

        let tail_start = if self.source.ends_with("/>") {
            self.source.len() - 2
        } else {
            self.source.len() - 1
        };
        out.push_str(&self.source[last..tail_start]);
        for (key, value) in &self.updates {
            if self.attrs.iter().any(|a| a.name == key) {
                continue;
            }
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push_str(&self.source[tail_start..]);
        out
    }
}

/// A numeric attribute value: a plain user-unit number or a percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Number(f64),
    Percent(f64),
}

impl Length {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Some(p) = trimmed.strip_suffix('%') {
            return p.trim().parse::<f64>().ok().map(Length::Percent);
        }
        let caps = re_length().captures(trimmed)?;
        caps.get(1)?.as_str().parse::<f64>().ok().map(Length::Number)
    }

    pub fn number(self) -> Option<f64> {
        match self {
            Length::Number(v) => Some(v),
            Length::Percent(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut it = raw
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>());
        let min_x = it.next()?.ok()?;
        let min_y = it.next()?.ok()?;
        let width = it.next()?.ok()?;
        let height = it.next()?.ok()?;
        if it.next().is_some() {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fmt_num(self.min_x),
            fmt_num(self.min_y),
            fmt_num(self.width),
            fmt_num(self.height)
        )
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    let r = if r == 0.0 { 0.0 } else { r };
    format!("{r}")
}

pub(crate) fn escape_attr(s: &str) -> String {
    escape(s, true)
}

pub(crate) fn escape_text(s: &str) -> String {
    escape(s, false)
}

fn escape(s: &str, quotes: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
