//! Per-node property resolution: node override, then level config, then the
//! value the parent resolved. Runs strictly top-down so a parent's map is
//! final before any child consults it.

use std::collections::BTreeMap;

use crate::error::WheelError;
use crate::ir::{Node, PropName, PropValue};

use super::levels::LevelConfig;

pub fn resolve_properties(
    nodes: &mut [Node],
    parent: Option<&BTreeMap<PropName, PropValue>>,
    levels: &[LevelConfig],
) -> Result<(), WheelError> {
    let Some((level_config, deeper)) = levels.split_first() else {
        return Ok(());
    };
    for node in nodes {
        let mut resolved = BTreeMap::new();
        for name in PropName::ALL {
            let Some(value) = resolve_prop(node, name, level_config, parent) else {
                // The default merge always seeds the level config, so an
                // exhausted chain means the merge itself is broken.
                return Err(WheelError::Structure(format!(
                    "property {} unresolved for node '{}' at level {}",
                    name.as_str(),
                    node.label,
                    level_config.level
                )));
            };
            resolved.insert(name, value);
        }
        node.resolved = resolved;

        let Node {
            resolved, sub_nodes, ..
        } = node;
        if !sub_nodes.is_empty() {
            resolve_properties(sub_nodes, Some(resolved), deeper)?;
        }
    }
    Ok(())
}

/// Color properties consult the legacy unified `color` list (node first,
/// then level) after the node's own override but before the level template,
/// matching how list-bearing nodes shade their slices in existing inputs.
/// Values from the level config may be level functions and are evaluated
/// here; inherited parent values are already literals.
fn resolve_prop(
    node: &Node,
    name: PropName,
    level_config: &LevelConfig,
    parent: Option<&BTreeMap<PropName, PropValue>>,
) -> Option<PropValue> {
    if let Some(value) = node.prop_override(name) {
        return Some(value.clone());
    }
    let is_color = matches!(name, PropName::ShapeColor | PropName::TextColor);
    if is_color && let Some(colors) = &node.color {
        return Some(PropValue::List(colors.clone()));
    }
    if let Some(value) = level_config.props.get(&name) {
        return Some(value.eval(level_config.level));
    }
    if is_color && let Some(colors) = &level_config.legacy_colors {
        return Some(PropValue::List(colors.clone()));
    }
    parent.and_then(|props| props.get(&name)).cloned()
}
