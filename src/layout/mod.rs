pub mod angle;
pub mod assign;
pub mod emit;
pub mod levels;
pub mod properties;

pub use assign::AngleStrategy;
pub use levels::{LevelConfig, build_level_configs};

use tracing::debug;

use crate::config::Config;
use crate::error::WheelError;
use crate::ir::{LevelEntry, Node, Structure, WheelDoc, WheelKind};
use crate::render::Document;

/// Generates the draw.io XML for one named structure. Errors abort this
/// structure only; the input document is never mutated.
pub fn generate_structure(
    doc: &WheelDoc,
    name: &str,
    config: &Config,
) -> Result<String, WheelError> {
    let kind = WheelKind::from_token(&doc.kind).ok_or_else(|| {
        WheelError::Configuration(format!("unsupported wheel type '{}'", doc.kind))
    })?;
    let structure = doc
        .structure(name)
        .ok_or_else(|| WheelError::Lookup(format!("structure '{name}' not found in the input")))?;
    let document = compute_wheel(kind, structure, &doc.levels_config, config)?;
    Ok(document.to_xml(&format!("{} - {}", kind.title(), name)))
}

/// Generates every structure in the document, reporting each result
/// separately so one failure cannot poison its siblings.
pub fn generate_all(doc: &WheelDoc, config: &Config) -> Vec<(String, Result<String, WheelError>)> {
    doc.structures
        .iter()
        .map(|structure| {
            (
                structure.name.clone(),
                generate_structure(doc, &structure.name, config),
            )
        })
        .collect()
}

/// The full pipeline for one structure: build level configs, partition
/// angles, resolve properties top-down, then emit shapes and labels. Each
/// call gets a fresh document with its own id counter.
pub fn compute_wheel(
    kind: WheelKind,
    structure: &Structure,
    entries: &[LevelEntry],
    config: &Config,
) -> Result<Document, WheelError> {
    debug!(structure = %structure.name, ?kind, "computing wheel layout");

    let mut nodes: Vec<Node> = structure.nodes.clone();
    let depth = nodes.iter().map(Node::depth).max().unwrap_or(0);
    if depth == 0 {
        return Err(WheelError::Validation(format!(
            "structure '{}' has no nodes",
            structure.name
        )));
    }

    let levels = build_level_configs(entries, depth, config)?;
    AngleStrategy::for_kind(kind).assign(&mut nodes, 0.0, 1.0, 1)?;
    properties::resolve_properties(&mut nodes, None, &levels)?;

    let mut document = Document::new();
    emit::emit_nodes(&nodes, &levels, &mut document, config)?;
    debug!(
        structure = %structure.name,
        elements = document.element_count(),
        "wheel layout complete"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> WheelDoc {
        WheelDoc::from_json(json).unwrap()
    }

    #[test]
    fn unknown_wheel_type_is_a_configuration_error() {
        let doc = doc(r#"{"type": "spiral_wheel", "structures": [{"name": "A", "nodes": [{"label": "x"}]}]}"#);
        let err = generate_structure(&doc, "A", &Config::default()).unwrap_err();
        assert!(matches!(err, WheelError::Configuration(_)));
    }

    #[test]
    fn missing_structure_is_a_lookup_failure() {
        let doc = doc(r#"{"type": "generic_wheel", "structures": [{"name": "A", "nodes": [{"label": "x"}]}]}"#);
        let err = generate_structure(&doc, "B", &Config::default()).unwrap_err();
        assert!(matches!(err, WheelError::Lookup(_)));
    }

    #[test]
    fn empty_structure_is_a_validation_error() {
        let doc = doc(r#"{"type": "generic_wheel", "structures": [{"name": "A", "nodes": []}]}"#);
        let err = generate_structure(&doc, "A", &Config::default()).unwrap_err();
        assert!(matches!(err, WheelError::Validation(_)));
    }

    #[test]
    fn one_bad_structure_does_not_poison_the_rest() {
        let doc = doc(
            r#"{"type": "generic_wheel", "structures": [
                {"name": "bad", "nodes": [
                    {"label": "a", "percentage": 80}, {"label": "b", "percentage": 60}
                ]},
                {"name": "good", "nodes": [{"label": "x"}]}
            ]}"#,
        );
        let results = generate_all(&doc, &Config::default());
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_err());
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn config_errors_surface_before_any_emission() {
        let doc = doc(
            r#"{"type": "generic_wheel",
                "levels_config": [{"levels": 2, "outer_radius": 170, "outer_radius_increment": 50}],
                "structures": [{"name": "A", "nodes": [
                    {"label": "x", "sub_nodes": [{"label": "y"}]}
                ]}]}"#,
        );
        let err = generate_structure(&doc, "A", &Config::default()).unwrap_err();
        assert!(matches!(err, WheelError::Configuration(_)));
    }
}
