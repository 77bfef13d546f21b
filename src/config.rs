use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Immutable per-session graph configuration. The controls panel edits a
/// staged copy and applying it rebuilds the whole session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
    pub drag: bool,
    pub zoom: bool,
    /// Neighborhood depth around the focus item; negative means whole graph.
    pub depth: i32,
    /// Initial view scale.
    pub scale: f32,
    pub repel_force: f32,
    pub center_force: f32,
    pub link_distance: f32,
    pub font_size: f32,
    pub opacity_scale: f32,
    pub remove_tags: Vec<String>,
    pub show_tags: bool,
    pub focus_on_hover: bool,
    pub enable_radial: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            drag: true,
            zoom: true,
            depth: 1,
            scale: 1.1,
            repel_force: 0.5,
            center_force: 0.3,
            link_distance: 30.0,
            font_size: 0.6,
            opacity_scale: 1.0,
            remove_tags: Vec::new(),
            show_tags: true,
            focus_on_hover: false,
            enable_radial: false,
        }
    }
}

pub fn load_graph_config(path: Option<&Path>) -> Result<GraphConfig> {
    let Some(path) = path else {
        return Ok(GraphConfig::default());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GraphConfig::default();
        assert!(config.drag);
        assert!(config.zoom);
        assert_eq!(config.depth, 1);
        assert_eq!(config.link_distance, 30.0);
        assert!(config.show_tags);
        assert!(!config.focus_on_hover);
        assert!(!config.enable_radial);
        assert!(config.remove_tags.is_empty());
    }

    #[test]
    fn partial_json_overrides_keep_defaults_elsewhere() {
        let config: GraphConfig = serde_json::from_str(
            r#"{ "depth": -1, "enableRadial": true, "removeTags": ["draft"] }"#,
        )
        .unwrap();
        assert_eq!(config.depth, -1);
        assert!(config.enable_radial);
        assert_eq!(config.remove_tags, vec!["draft".to_string()]);
        assert!(config.drag);
        assert_eq!(config.scale, 1.1);
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let config: GraphConfig =
            serde_json::from_str(r#"{ "repelForce": 1.5, "linkDistance": 60, "showTags": false }"#)
                .unwrap();
        assert_eq!(config.repel_force, 1.5);
        assert_eq!(config.link_distance, 60.0);
        assert!(!config.show_tags);
    }
}
