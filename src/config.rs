use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    #[default]
    Region,
    #[serde(alias = "accountId")]
    Account,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

/// Settings for the region-grouped layout backed by the hierarchical solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HierarchicalConfig {
    pub leaf_width: f32,
    pub leaf_height: f32,
    pub node_spacing: f32,
    pub region_spacing: f32,
    pub region_padding: Padding,
    pub columns: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub stagger: Vec<f32>,
    pub container_extra_width: f32,
    pub container_extra_height: f32,
    pub side_column_gap: f32,
    pub side_column_step: f32,
}

impl Default for HierarchicalConfig {
    fn default() -> Self {
        Self {
            leaf_width: 180.0,
            leaf_height: 60.0,
            node_spacing: 40.0,
            region_spacing: 80.0,
            region_padding: Padding {
                top: 40.0,
                left: 20.0,
                bottom: 20.0,
                right: 20.0,
            },
            columns: 4,
            cell_width: 220.0,
            cell_height: 100.0,
            origin_x: 40.0,
            origin_y: 60.0,
            stagger: vec![0.0, 15.0, -5.0, 10.0],
            container_extra_width: 40.0,
            container_extra_height: 80.0,
            side_column_gap: 300.0,
            side_column_step: 120.0,
        }
    }
}

impl HierarchicalConfig {
    pub fn stagger_for(&self, col: usize) -> f32 {
        if self.stagger.is_empty() {
            return 0.0;
        }
        self.stagger[col % self.stagger.len()]
    }

    /// Container size for `count` children, never smaller than what the solver reported.
    pub fn container_size(&self, count: usize, solver_width: f32, solver_height: f32) -> (f32, f32) {
        let columns = self.columns.max(1);
        let rows = count.div_ceil(columns);
        let width = (columns as f32 * self.cell_width + self.container_extra_width).max(solver_width);
        let height = (rows as f32 * self.cell_height + self.container_extra_height).max(solver_height);
        (width, height)
    }
}

/// Settings for the flat grid layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub group_by: GroupBy,
    pub columns: usize,
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            group_by: GroupBy::Region,
            columns: 5,
            spacing: 300.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub hierarchical: HierarchicalConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<Theme>,
    layout: Option<LayoutConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    if let Some(theme) = parsed.theme {
        config.theme = theme;
    }
    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_size_fits_four_column_grid() {
        let cfg = HierarchicalConfig::default();
        assert_eq!(cfg.container_size(0, 0.0, 0.0), (920.0, 80.0));
        assert_eq!(cfg.container_size(5, 0.0, 0.0), (920.0, 280.0));
        assert_eq!(cfg.container_size(1, 1200.0, 400.0), (1200.0, 400.0));
    }

    #[test]
    fn stagger_cycles_by_column() {
        let cfg = HierarchicalConfig::default();
        assert_eq!(cfg.stagger_for(1), 15.0);
        assert_eq!(cfg.stagger_for(6), -5.0);
    }

    #[test]
    fn partial_layout_file_keeps_defaults() {
        let parsed: ConfigFile =
            serde_json::from_str(r#"{"layout": {"grid": {"columns": 3, "groupBy": "account"}}}"#)
                .unwrap();
        let layout = parsed.layout.unwrap();
        assert_eq!(layout.grid.columns, 3);
        assert_eq!(layout.grid.group_by, GroupBy::Account);
        assert_eq!(layout.grid.spacing, 300.0);
        assert_eq!(layout.hierarchical, HierarchicalConfig::default());
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
    }
}
