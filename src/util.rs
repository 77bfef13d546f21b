use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::Color32;

pub const TAG_PREFIX: &str = "tags/";

pub fn tag_node_id(name: &str) -> String {
    format!("{TAG_PREFIX}{name}")
}

pub fn tag_name(id: &str) -> Option<&str> {
    id.strip_prefix(TAG_PREFIX)
}

/// Fallback display title for an item without one: the last path segment.
pub fn id_title(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Deterministic pseudo-random pair in [-1, 1] derived from an id, so node
/// placement is stable across rebuilds of the same graph.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Parses `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }

    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    let r = byte(0..2)?;
    let g = byte(2..4)?;
    let b = byte(4..6)?;
    let a = if digits.len() == 8 { byte(6..8)? } else { 255 };
    Some(Color32::from_rgba_unmultiplied(r, g, b, a))
}
