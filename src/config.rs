use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canvas geometry and drawing defaults shared by every structure in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub center_x: f64,
    pub center_y: f64,
    pub text_width: f64,
    pub text_height: f64,
    pub stroke_color: String,
    pub font_color: String,
    /// Outer radius of the level-1 circle when no level config overrides it.
    pub base_radius: f64,
    /// Base fill color; deeper levels derive lightness-shifted shades of it.
    pub base_color: String,
    /// Gap between the outer edge and an `outside`-placed label.
    pub outside_label_margin: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            center_x: 320.0,
            center_y: 290.0,
            text_width: 80.0,
            text_height: 30.0,
            stroke_color: "#808080".to_string(),
            font_color: "#000000".to_string(),
            base_radius: 100.0,
            base_color: "#a20025".to_string(),
            outside_label_margin: 5.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    center_x: Option<f64>,
    center_y: Option<f64>,
    text_width: Option<f64>,
    text_height: Option<f64>,
    stroke_color: Option<String>,
    font_color: Option<String>,
    base_radius: Option<f64>,
    base_color: Option<String>,
    outside_label_margin: Option<f64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(value) = parsed.center_x {
        config.center_x = value;
    }
    if let Some(value) = parsed.center_y {
        config.center_y = value;
    }
    if let Some(value) = parsed.text_width {
        config.text_width = value;
    }
    if let Some(value) = parsed.text_height {
        config.text_height = value;
    }
    if let Some(value) = parsed.stroke_color {
        config.stroke_color = value;
    }
    if let Some(value) = parsed.font_color {
        config.font_color = value;
    }
    if let Some(value) = parsed.base_radius {
        config.base_radius = value;
    }
    if let Some(value) = parsed.base_color {
        config.base_color = value;
    }
    if let Some(value) = parsed.outside_label_margin {
        config.outside_label_margin = value;
    }

    Ok(config)
}
