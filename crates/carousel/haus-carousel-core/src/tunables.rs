//! Host-driven physical tunables (gap, snap anchor, uniform item size,
//! auto-scroll velocity, disabled flag).
//!
//! Hosts either build [`Tunables`] directly or, when the values live in CSS
//! custom properties, hand the raw property strings to
//! [`Tunables::from_custom_properties`]. Malformed values never fail; they
//! fall back to safe defaults.

use serde::{Deserialize, Serialize};

pub const PROP_GAP: &str = "--carousel-gap";
pub const PROP_SNAP: &str = "--carousel-snap-position";
pub const PROP_SNAP_START: &str = "--carousel-snap-position-start";
pub const PROP_SNAP_END: &str = "--carousel-snap-position-end";
pub const PROP_ITEM_SIZE: &str = "--carousel-item-size";
/// Deprecated alias of [`PROP_ITEM_SIZE`].
pub const PROP_ITEM_WIDTH: &str = "--carousel-item-width";
pub const PROP_AUTOSCROLL: &str = "--carousel-autoscroll";
pub const PROP_DISABLED: &str = "--carousel-disabled";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Space between neighbouring items, px. Never negative.
    pub gap: f64,
    /// Snap anchor used for both edges unless overridden, px.
    pub snap: f64,
    /// Where the active item rests, measured from the container start, px.
    pub snap_start: Option<f64>,
    /// Trailing inset, measured from the container end, px.
    pub snap_end: Option<f64>,
    /// Uniform item size, px. 0 means "sizes are measured per item".
    pub item_size: f64,
    /// Auto-scroll velocity in px/ms. 0 disables auto-scroll.
    pub auto_scroll: f64,
    pub disabled: bool,
}

impl Tunables {
    /// Effective leading snap anchor.
    pub fn snap_start(&self) -> f64 {
        self.snap_start.unwrap_or(self.snap)
    }

    /// Effective trailing snap inset.
    pub fn snap_end(&self) -> f64 {
        self.snap_end.unwrap_or(self.snap)
    }

    /// Uniform item size when one is configured.
    pub fn uniform_item_size(&self) -> Option<f64> {
        (self.item_size > 0.0).then_some(self.item_size)
    }

    /// Copy with every value forced into its valid range.
    pub fn sanitized(&self) -> Self {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            gap: finite_or_zero(self.gap).max(0.0),
            snap: finite_or_zero(self.snap),
            snap_start: self.snap_start.filter(|v| v.is_finite()),
            snap_end: self.snap_end.filter(|v| v.is_finite()),
            item_size: finite_or_zero(self.item_size).max(0.0),
            auto_scroll: finite_or_zero(self.auto_scroll),
            disabled: self.disabled,
        }
    }

    /// Parse tunables from raw CSS custom property values.
    ///
    /// `lookup` returns the property's computed string (or `None` when the
    /// property is unset). Lengths accept `px`, unitless numbers and `%`
    /// (resolved against `container_size`).
    pub fn from_custom_properties<F>(container_size: f64, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let length = |name: &str| -> Option<f64> {
            lookup(name).and_then(|raw| parse_length(&raw, container_size))
        };
        let snap = length(PROP_SNAP).unwrap_or(0.0);
        let item_size = length(PROP_ITEM_SIZE)
            .or_else(|| length(PROP_ITEM_WIDTH))
            .unwrap_or(0.0);
        let auto_scroll = lookup(PROP_AUTOSCROLL)
            .and_then(|raw| parse_leading_float(&raw))
            .unwrap_or(0.0);
        let disabled = lookup(PROP_DISABLED)
            .and_then(|raw| parse_leading_float(&raw))
            .map(|v| v.trunc() as i64 != 0)
            .unwrap_or(false);
        Self {
            gap: length(PROP_GAP).unwrap_or(0.0),
            snap,
            snap_start: length(PROP_SNAP_START),
            snap_end: length(PROP_SNAP_END),
            item_size,
            auto_scroll,
            disabled,
        }
        .sanitized()
    }
}

fn parse_length(raw: &str, container_size: f64) -> Option<f64> {
    let s = raw.trim();
    if let Some(pct) = s.strip_suffix('%') {
        return parse_leading_float(pct).map(|p| p / 100.0 * container_size);
    }
    parse_leading_float(s)
}

/// `parseFloat`-style parse: the longest numeric prefix, ignoring units.
fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let bytes = s.as_bytes();
    while end < bytes.len() {
        let c = bytes[end] as char;
        let ok = match c {
            '0'..='9' => {
                seen_digit = true;
                true
            }
            '+' | '-' => end == 0 || matches!(bytes[end - 1] as char, 'e' | 'E'),
            '.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                true
            }
            'e' | 'E' if seen_digit && !seen_exp => {
                // only an exponent if digits follow
                let rest = &s[end + 1..];
                let rest = rest.strip_prefix(['+', '-']).unwrap_or(rest);
                if rest.starts_with(|ch: char| ch.is_ascii_digit()) {
                    seen_exp = true;
                    true
                } else {
                    false
                }
            }
            _ => false,
        };
        if !ok {
            break;
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
