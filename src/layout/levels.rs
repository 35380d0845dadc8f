//! Merges the built-in per-level template with user `levels_config` entries
//! and finalizes ring radii. Level n's radii depend on level n-1's resolved
//! outer radius, so levels are built strictly in order.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::color::adjust_color;
use crate::config::Config;
use crate::error::WheelError;
use crate::ir::{ConfigValue, LevelEntry, PropName, PropValue};

const DEFAULT_OUTER_INCREMENT: f64 = 50.0;

/// Fully resolved configuration for one ring of the wheel.
#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub level: u32,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub props: BTreeMap<PropName, ConfigValue>,
    /// Legacy unified color list from the matched user entry.
    pub legacy_colors: Option<Vec<String>>,
}

/// Builds the configs for levels `1..=depth`, each on top of the previous.
pub fn build_level_configs(
    entries: &[LevelEntry],
    depth: u32,
    config: &Config,
) -> Result<Vec<LevelConfig>, WheelError> {
    let mut levels: Vec<LevelConfig> = Vec::with_capacity(depth as usize);
    for level in 1..=depth {
        let resolved = build_level(entries, level, levels.last(), config)?;
        levels.push(resolved);
    }
    Ok(levels)
}

fn build_level(
    entries: &[LevelEntry],
    level: u32,
    previous: Option<&LevelConfig>,
    config: &Config,
) -> Result<LevelConfig, WheelError> {
    // First matching entry wins; later matches are ignored.
    let entry = entries.iter().find(|entry| entry.levels.matches(level));
    let mut props = default_props(level, config);
    let mut legacy_colors = None;

    if let Some(entry) = entry {
        debug!(level, "level config matched user entry");
        for name in PropName::ALL {
            if let Some(value) = entry.prop(name) {
                props.insert(name, ConfigValue::Literal(value.clone()));
            }
        }
        legacy_colors = entry.color.clone();
    } else {
        debug!(level, "level config from defaults");
    }

    let (inner_radius, outer_radius) = resolve_radii(entry, level, previous, config)?;
    if level > 1 && inner_radius > outer_radius {
        return Err(WheelError::Configuration(format!(
            "inner_radius ({inner_radius}) is greater than outer_radius ({outer_radius}) at level {level}"
        )));
    }

    Ok(LevelConfig {
        level,
        inner_radius,
        outer_radius,
        props,
        legacy_colors,
    })
}

fn resolve_radii(
    entry: Option<&LevelEntry>,
    level: u32,
    previous: Option<&LevelConfig>,
    config: &Config,
) -> Result<(f64, f64), WheelError> {
    if level == 1 {
        // The central circle has no inner radius, and increment keys are
        // meaningless here: they are overridden back to the default radius.
        let outer = entry
            .and_then(|entry| entry.radius.or(entry.outer_radius))
            .unwrap_or(config.base_radius);
        return Ok((0.0, outer));
    }

    let previous = previous.ok_or_else(|| {
        WheelError::Structure(format!("level {level} resolved before level {}", level - 1))
    })?;
    let prev_outer = previous.outer_radius;

    let outer = match entry {
        Some(entry) if entry.outer_radius.is_some() && entry.outer_radius_increment.is_some() => {
            return Err(WheelError::Configuration(format!(
                "both outer_radius and outer_radius_increment given at level {level}"
            )));
        }
        Some(LevelEntry {
            outer_radius: Some(value),
            ..
        }) => *value,
        Some(LevelEntry {
            outer_radius_increment: Some(increment),
            ..
        }) => prev_outer + increment,
        _ => prev_outer + DEFAULT_OUTER_INCREMENT,
    };

    let inner = match entry {
        Some(entry) if entry.inner_radius.is_some() && entry.inner_radius_increment.is_some() => {
            return Err(WheelError::Configuration(format!(
                "both inner_radius and inner_radius_increment given at level {level}"
            )));
        }
        Some(LevelEntry {
            inner_radius: Some(value),
            ..
        }) => *value,
        Some(LevelEntry {
            inner_radius_increment: Some(increment),
            ..
        }) => prev_outer + increment,
        // Flush against the previous ring.
        _ => prev_outer,
    };

    Ok((inner, outer))
}

/// The built-in template: level 1 is the opaque central circle, deeper levels
/// shrink the font, fade the fill, and lighten the base color per level.
fn default_props(level: u32, config: &Config) -> BTreeMap<PropName, ConfigValue> {
    let mut props = BTreeMap::new();
    if level == 1 {
        props.insert(
            PropName::ShapeColor,
            ConfigValue::Literal(PropValue::Text(config.base_color.clone())),
        );
        props.insert(
            PropName::FontSize,
            ConfigValue::Literal(PropValue::Number(10.0)),
        );
        props.insert(
            PropName::ShapeOpacity,
            ConfigValue::Literal(PropValue::Number(100.0)),
        );
    } else {
        let base_color = config.base_color.clone();
        props.insert(
            PropName::ShapeColor,
            ConfigValue::PerLevel(Arc::new(move |lvl| {
                PropValue::Text(adjust_color(&base_color, 0.1 * (f64::from(lvl) - 1.0)))
            })),
        );
        props.insert(
            PropName::FontSize,
            ConfigValue::PerLevel(Arc::new(|lvl| {
                PropValue::Number((10.0 - (f64::from(lvl) - 1.0)).max(6.0))
            })),
        );
        props.insert(
            PropName::ShapeOpacity,
            ConfigValue::PerLevel(Arc::new(|lvl| {
                PropValue::Number((100.0 - (f64::from(lvl) - 1.0) * 10.0).max(30.0))
            })),
        );
    }
    props.insert(
        PropName::TextColor,
        ConfigValue::Literal(PropValue::Text(config.font_color.clone())),
    );
    props.insert(
        PropName::TextOpacity,
        ConfigValue::Literal(PropValue::Number(100.0)),
    );
    props.insert(
        PropName::TextRotation,
        ConfigValue::Literal(PropValue::Text("radial".to_string())),
    );
    props.insert(
        PropName::TextPlacement,
        ConfigValue::Literal(PropValue::Text("centered".to_string())),
    );
    props
}
