use serde::Deserialize;
use vpc_topology::config::{Config, GroupBy};
use vpc_topology::layout_dump::LayoutDump;
use vpc_topology::{LayoutStrategy, layout_network, parse_network};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkLayoutOptions {
    layout: Option<String>,
    group_by: Option<String>,
    columns: Option<usize>,
    spacing: Option<f32>,
}

fn build_layout_request(options: NetworkLayoutOptions) -> (Config, LayoutStrategy) {
    let mut config = Config::default();
    let strategy = if options.layout.as_deref() == Some("grid") {
        LayoutStrategy::Grid
    } else {
        LayoutStrategy::Hierarchical
    };

    if options.group_by.as_deref() == Some("accountId") || options.group_by.as_deref() == Some("account") {
        config.layout.grid.group_by = GroupBy::Account;
    }
    if let Some(columns) = options.columns {
        config.layout.grid.columns = columns;
    }
    if let Some(spacing) = options.spacing {
        config.layout.grid.spacing = spacing;
    }

    (config, strategy)
}

fn layout_json(network_json: &str, options: NetworkLayoutOptions) -> Result<String, String> {
    let model = parse_network(network_json).map_err(|error| error.to_string())?;
    let (config, strategy) = build_layout_request(options);
    let layout = layout_network(&model, &config, strategy).map_err(|error| error.to_string())?;
    LayoutDump::from_layout(&layout)
        .to_json()
        .map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_network_json(network_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<NetworkLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        NetworkLayoutOptions::default()
    };

    layout_json(network_json, options).map_err(|error| JsValue::from_str(&error))
}
