//! Maps laid-out nodes to draw.io primitives: one shape per node (circle,
//! pie slice, donut, or annulus slice) plus one rotated text label.

use crate::config::Config;
use crate::error::WheelError;
use crate::ir::{Node, PropName, PropValue};
use crate::render::Document;

use super::angle::{self, PlacementOption, RotationOption};
use super::levels::LevelConfig;

const FULL_TURN_EPS: f64 = 1e-9;
const TOP_DEG: f64 = 270.0;

pub fn emit_nodes(
    nodes: &[Node],
    levels: &[LevelConfig],
    document: &mut Document,
    config: &Config,
) -> Result<(), WheelError> {
    let Some((level_config, deeper)) = levels.split_first() else {
        return Ok(());
    };
    for node in nodes {
        let (Some(start), Some(end)) = (node.start_angle, node.end_angle) else {
            // Skipped during angle assignment; the subtree emits nothing.
            continue;
        };
        emit_node(node, start, end, level_config, document, config)?;
        if !node.sub_nodes.is_empty() {
            emit_nodes(&node.sub_nodes, deeper, document, config)?;
        }
    }
    Ok(())
}

fn emit_node(
    node: &Node,
    start: f64,
    end: f64,
    level_config: &LevelConfig,
    document: &mut Document,
    config: &Config,
) -> Result<(), WheelError> {
    let level = level_config.level;
    let inner = level_config.inner_radius;
    let outer = level_config.outer_radius;
    let center = (config.center_x, config.center_y);

    let shape_color = color_prop(node, PropName::ShapeColor, level)?;
    let text_color = color_prop(node, PropName::TextColor, level)?;
    let shape_opacity = number_prop(node, PropName::ShapeOpacity)?;
    let text_opacity = number_prop(node, PropName::TextOpacity)?;
    let font_size = number_prop(node, PropName::FontSize)?;

    let wrapped = (end - start).rem_euclid(1.0);
    let full_turn = wrapped < FULL_TURN_EPS || wrapped > 1.0 - FULL_TURN_EPS;

    if full_turn {
        if level == 1 {
            document.add_circle(
                center.0,
                center.1,
                outer,
                &shape_color,
                &config.stroke_color,
                shape_opacity,
            );
        } else {
            document.add_annulus(
                center.0,
                center.1,
                outer,
                inner,
                &shape_color,
                &config.stroke_color,
                shape_opacity,
            );
        }
    } else if level == 1 {
        document.add_pie_slice(
            center.0,
            center.1,
            outer,
            start,
            end,
            &shape_color,
            &config.stroke_color,
            shape_opacity,
        );
    } else {
        let arc_width = 1.0 - inner / outer;
        document.add_annulus_slice(
            center.0,
            center.1,
            outer,
            arc_width,
            start,
            end,
            &shape_color,
            &config.stroke_color,
            shape_opacity,
        );
    }

    let placement = PlacementOption::from_value(node.resolved.get(&PropName::TextPlacement));
    let label_radius = placement.radius(inner, outer, config.text_height, config.outside_label_margin);

    if full_turn {
        // A full ring has no midpoint: pin the label horizontally at dead
        // center (level-1 circle) or at twelve o'clock (deeper donuts).
        let (x, y) = if level == 1 {
            (
                center.0 - config.text_width / 2.0,
                center.1 - config.text_height / 2.0,
            )
        } else {
            angle::position(center, label_radius, TOP_DEG, config.text_width, config.text_height)
        };
        document.add_text(
            &node.label,
            x,
            y,
            config.text_width,
            config.text_height,
            0.0,
            font_size,
            &text_color,
            text_opacity,
        );
        return Ok(());
    }

    let mid_deg = angle::turn_to_degrees(angle::mid_angle(start, end));
    let rotation =
        RotationOption::from_value(node.resolved.get(&PropName::TextRotation)).rotation(mid_deg);
    let (x, y) = angle::position(center, label_radius, mid_deg, config.text_width, config.text_height);
    document.add_text(
        &node.label,
        x,
        y,
        config.text_width,
        config.text_height,
        rotation,
        font_size,
        &text_color,
        text_opacity,
    );
    Ok(())
}

/// Resolved color values may be lists, indexed by `level - 1` and clamped to
/// the last entry when the wheel is deeper than the list.
fn color_prop(node: &Node, name: PropName, level: u32) -> Result<String, WheelError> {
    match node.resolved.get(&name) {
        Some(PropValue::Text(color)) => Ok(color.clone()),
        Some(PropValue::List(colors)) if !colors.is_empty() => {
            let idx = (level as usize - 1).min(colors.len() - 1);
            Ok(colors[idx].clone())
        }
        Some(_) => Err(WheelError::Structure(format!(
            "{} on '{}' is not a usable color",
            name.as_str(),
            node.label
        ))),
        None => Err(missing(node, name)),
    }
}

fn number_prop(node: &Node, name: PropName) -> Result<f64, WheelError> {
    node.resolved
        .get(&name)
        .ok_or_else(|| missing(node, name))?
        .as_number()
        .ok_or_else(|| {
            WheelError::Structure(format!(
                "{} on '{}' is not a number",
                name.as_str(),
                node.label
            ))
        })
}

fn missing(node: &Node, name: PropName) -> WheelError {
    WheelError::Structure(format!(
        "property {} missing on '{}' after resolution",
        name.as_str(),
        node.label
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Node;

    fn node_with(name: PropName, value: PropValue) -> Node {
        let mut node: Node = serde_json::from_str(r#"{"label": "n"}"#).unwrap();
        node.resolved.insert(name, value);
        node
    }

    #[test]
    fn color_lists_index_by_level_and_clamp() {
        let node = node_with(
            PropName::ShapeColor,
            PropValue::List(vec!["#111111".into(), "#222222".into()]),
        );
        assert_eq!(color_prop(&node, PropName::ShapeColor, 1).unwrap(), "#111111");
        assert_eq!(color_prop(&node, PropName::ShapeColor, 2).unwrap(), "#222222");
        assert_eq!(color_prop(&node, PropName::ShapeColor, 5).unwrap(), "#222222");
    }

    #[test]
    fn numeric_color_is_rejected() {
        let node = node_with(PropName::TextColor, PropValue::Number(7.0));
        assert!(color_prop(&node, PropName::TextColor, 1).is_err());
    }

    #[test]
    fn missing_property_is_an_internal_error() {
        let node: Node = serde_json::from_str(r#"{"label": "n"}"#).unwrap();
        let err = number_prop(&node, PropName::FontSize).unwrap_err();
        assert!(matches!(err, WheelError::Structure(_)));
    }
}
