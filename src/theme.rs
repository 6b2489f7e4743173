use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static REGION_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("us-east-1", "#E0F7FA"),
        ("us-west-1", "#FFF9C4"),
        ("eu-central-1", "#F3E5F5"),
    ])
});

const DEFAULT_REGION_COLOR: &str = "#f3f4f6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub font_size: f32,
    pub node_padding: f32,
    pub node_border_radius: f32,
    pub node_border: String,
    pub edge_stroke: String,
    pub edge_stroke_width: f32,
    pub layout_edge_stroke_width: f32,
    pub group_border: String,
    pub group_border_radius: f32,
    pub group_padding: f32,
    pub selected_border: String,
    pub selected_shadow: String,
}

impl Theme {
    pub fn network_default() -> Self {
        Self {
            font_size: 12.0,
            node_padding: 8.0,
            node_border_radius: 4.0,
            node_border: "1px solid #ccc".to_string(),
            edge_stroke: "#1d4ed8".to_string(),
            edge_stroke_width: 2.5,
            layout_edge_stroke_width: 2.0,
            group_border: "2px dashed #c3dafe".to_string(),
            group_border_radius: 12.0,
            group_padding: 20.0,
            selected_border: "2px solid #ff3366".to_string(),
            selected_shadow: "0 0 8px rgba(255, 51, 102, 0.6)".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::network_default()
    }
}

/// Background color for endpoints of a region.
pub fn region_color(region: &str) -> &'static str {
    REGION_COLORS
        .get(region)
        .copied()
        .unwrap_or(DEFAULT_REGION_COLOR)
}

/// Deterministic color for a key, used to tint every edge by its target.
///
/// The hash runs over UTF-16 code units with 32-bit wrapping arithmetic, so a
/// key maps to the same hue on every run and platform.
pub fn color_for(key: &str) -> String {
    let mut hash: i32 = 0;
    for unit in key.encode_utf16() {
        hash = i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    let hue = hash.unsigned_abs() % 360;
    format!("hsl({hue}, 70%, 50%)")
}
