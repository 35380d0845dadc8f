use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::WheelError;

/// Which angle-assignment strategy the input document asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelKind {
    Generic,
    Percentage,
    Flavor,
}

impl WheelKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "generic_wheel" => Some(Self::Generic),
            "percentage_wheel" => Some(Self::Percentage),
            "flavor_wheel" => Some(Self::Flavor),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Generic => "Generic Wheel",
            Self::Percentage => "Percentage Wheel",
            Self::Flavor => "Flavor Wheel",
        }
    }
}

/// The visual attributes resolved per node through the
/// node -> level -> parent chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PropName {
    TextRotation,
    TextPlacement,
    FontSize,
    ShapeColor,
    TextColor,
    ShapeOpacity,
    TextOpacity,
}

impl PropName {
    pub const ALL: [PropName; 7] = [
        PropName::TextRotation,
        PropName::TextPlacement,
        PropName::FontSize,
        PropName::ShapeColor,
        PropName::TextColor,
        PropName::ShapeOpacity,
        PropName::TextOpacity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextRotation => "text_rotation",
            Self::TextPlacement => "text_placement",
            Self::FontSize => "font_size",
            Self::ShapeColor => "shape_color",
            Self::TextColor => "text_color",
            Self::ShapeOpacity => "shape_opacity",
            Self::TextOpacity => "text_opacity",
        }
    }
}

/// A literal property value as it appears in the input JSON. Color properties
/// may carry a list indexed by level; everything else is a number or token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl PropValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// A config field is either a literal or a pure function of the level
/// number, evaluated where the literal is needed. Functions come from the
/// built-in level template; JSON input always supplies literals.
#[derive(Clone)]
pub enum ConfigValue {
    Literal(PropValue),
    PerLevel(Arc<dyn Fn(u32) -> PropValue + Send + Sync>),
}

impl ConfigValue {
    pub fn eval(&self, level: u32) -> PropValue {
        match self {
            Self::Literal(value) => value.clone(),
            Self::PerLevel(compute) => compute(level),
        }
    }
}

impl From<PropValue> for ConfigValue {
    fn from(value: PropValue) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::PerLevel(_) => f.write_str("PerLevel(..)"),
        }
    }
}

/// Selects which level numbers a `levels_config` entry applies to. Predicates
/// are only constructible from code; JSON supplies the first three forms.
#[derive(Debug, Clone)]
pub enum LevelSelector {
    Exact(u32),
    List(Vec<u32>),
    Range { from: Option<u32>, to: Option<u32> },
    Predicate(fn(u32) -> bool),
}

impl LevelSelector {
    pub fn matches(&self, level: u32) -> bool {
        match self {
            Self::Exact(value) => level == *value,
            Self::List(values) => values.contains(&level),
            Self::Range { from, to } => {
                from.unwrap_or(level) <= level && level <= to.unwrap_or(level)
            }
            Self::Predicate(check) => check(level),
        }
    }
}

impl<'de> Deserialize<'de> for LevelSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Exact(u32),
            List(Vec<u32>),
            Range { from: Option<u32>, to: Option<u32> },
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Exact(value) => Self::Exact(value),
            Raw::List(values) => Self::List(values),
            Raw::Range { from, to } => Self::Range { from, to },
        })
    }
}

/// One user-supplied `levels_config` entry. Radius keys are resolved by the
/// level configuration builder; property keys override the default template.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelEntry {
    pub levels: LevelSelector,
    /// Level-1 outer radius (the central circle has no inner radius).
    pub radius: Option<f64>,
    pub outer_radius: Option<f64>,
    pub outer_radius_increment: Option<f64>,
    pub inner_radius: Option<f64>,
    pub inner_radius_increment: Option<f64>,
    pub shape_color: Option<PropValue>,
    pub text_color: Option<PropValue>,
    pub shape_opacity: Option<PropValue>,
    pub text_opacity: Option<PropValue>,
    pub font_size: Option<PropValue>,
    pub text_rotation: Option<PropValue>,
    pub text_placement: Option<PropValue>,
    /// Legacy unified color list, indexed by level.
    pub color: Option<Vec<String>>,
}

impl LevelEntry {
    pub fn prop(&self, name: PropName) -> Option<&PropValue> {
        match name {
            PropName::TextRotation => self.text_rotation.as_ref(),
            PropName::TextPlacement => self.text_placement.as_ref(),
            PropName::FontSize => self.font_size.as_ref(),
            PropName::ShapeColor => self.shape_color.as_ref(),
            PropName::TextColor => self.text_color.as_ref(),
            PropName::ShapeOpacity => self.shape_opacity.as_ref(),
            PropName::TextOpacity => self.text_opacity.as_ref(),
        }
    }
}

/// One labeled segment of the wheel. Angles and resolved properties start
/// unset and are filled in by the layout passes; the tree is immutable
/// afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub label: String,
    pub percentage: Option<f64>,
    pub shape_color: Option<PropValue>,
    pub text_color: Option<PropValue>,
    pub shape_opacity: Option<PropValue>,
    pub text_opacity: Option<PropValue>,
    pub font_size: Option<PropValue>,
    pub text_rotation: Option<PropValue>,
    pub text_placement: Option<PropValue>,
    /// Legacy unified color list, indexed by level.
    pub color: Option<Vec<String>>,
    #[serde(default)]
    pub sub_nodes: Vec<Node>,

    /// Assigned during angle partitioning; `None` means the node was skipped
    /// and emits nothing.
    #[serde(skip)]
    pub start_angle: Option<f64>,
    #[serde(skip)]
    pub end_angle: Option<f64>,
    /// One entry per [`PropName`], filled by property resolution.
    #[serde(skip)]
    pub resolved: BTreeMap<PropName, PropValue>,
}

impl Node {
    pub fn prop_override(&self, name: PropName) -> Option<&PropValue> {
        match name {
            PropName::TextRotation => self.text_rotation.as_ref(),
            PropName::TextPlacement => self.text_placement.as_ref(),
            PropName::FontSize => self.font_size.as_ref(),
            PropName::ShapeColor => self.shape_color.as_ref(),
            PropName::TextColor => self.text_color.as_ref(),
            PropName::ShapeOpacity => self.shape_opacity.as_ref(),
            PropName::TextOpacity => self.text_opacity.as_ref(),
        }
    }

    /// A node with no children counts as one leaf.
    pub fn leaf_count(&self) -> usize {
        if self.sub_nodes.is_empty() {
            1
        } else {
            self.sub_nodes.iter().map(Node::leaf_count).sum()
        }
    }

    /// Height of the subtree rooted here, in levels.
    pub fn depth(&self) -> u32 {
        1 + self
            .sub_nodes
            .iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }
}

/// A named tree of root nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct Structure {
    pub name: String,
    pub nodes: Vec<Node>,
}

/// The parsed input document: a wheel type, named structures, and optional
/// per-level configuration entries.
#[derive(Debug, Clone, Deserialize)]
pub struct WheelDoc {
    #[serde(rename = "type")]
    pub kind: String,
    pub structures: Vec<Structure>,
    #[serde(default)]
    pub levels_config: Vec<LevelEntry>,
}

impl WheelDoc {
    pub fn from_json(input: &str) -> Result<Self, WheelError> {
        serde_json::from_str(input)
            .map_err(|err| WheelError::Structure(format!("malformed input document: {err}")))
    }

    pub fn structure(&self, name: &str) -> Option<&Structure> {
        self.structures.iter().find(|entry| entry.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let doc = WheelDoc::from_json(
            r#"{
                "type": "generic_wheel",
                "structures": [
                    {"name": "A", "nodes": [
                        {"label": "X", "percentage": 60},
                        {"label": "Y", "sub_nodes": [{"label": "Y1"}]}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(WheelKind::from_token(&doc.kind), Some(WheelKind::Generic));
        let structure = doc.structure("A").unwrap();
        assert_eq!(structure.nodes[0].percentage, Some(60.0));
        assert_eq!(structure.nodes[1].sub_nodes.len(), 1);
        assert!(structure.nodes[0].start_angle.is_none());
    }

    #[test]
    fn missing_label_is_a_structure_error() {
        let err = WheelDoc::from_json(
            r#"{"type": "generic_wheel", "structures": [{"name": "A", "nodes": [{"percentage": 10}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, WheelError::Structure(_)));
    }

    #[test]
    fn selector_forms_match() {
        assert!(LevelSelector::Exact(2).matches(2));
        assert!(!LevelSelector::Exact(2).matches(3));
        assert!(LevelSelector::List(vec![1, 3]).matches(3));
        let range = LevelSelector::Range {
            from: Some(2),
            to: Some(4),
        };
        assert!(range.matches(2) && range.matches(4) && !range.matches(5));
        let open = LevelSelector::Range {
            from: None,
            to: Some(3),
        };
        assert!(open.matches(1) && !open.matches(4));
        assert!(LevelSelector::Predicate(|level| level % 2 == 0).matches(4));
    }

    #[test]
    fn selector_deserializes_all_json_forms() {
        let entry: LevelEntry =
            serde_json::from_str(r#"{"levels": 2, "outer_radius_increment": 50}"#).unwrap();
        assert!(entry.levels.matches(2));
        let entry: LevelEntry = serde_json::from_str(r#"{"levels": [1, 3]}"#).unwrap();
        assert!(entry.levels.matches(3));
        let entry: LevelEntry = serde_json::from_str(r#"{"levels": {"from": 2, "to": 5}}"#).unwrap();
        assert!(entry.levels.matches(4));
    }

    #[test]
    fn prop_value_shapes() {
        let value: PropValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(value.as_number(), Some(12.5));
        let value: PropValue = serde_json::from_str(r#""radial""#).unwrap();
        assert_eq!(value.as_text(), Some("radial"));
        let value: PropValue = serde_json::from_str(r##"["#a20025", "#d73058"]"##).unwrap();
        assert!(matches!(value, PropValue::List(ref colors) if colors.len() == 2));
    }

    #[test]
    fn leaf_count_and_depth() {
        let doc = WheelDoc::from_json(
            r#"{
                "type": "flavor_wheel",
                "structures": [{"name": "T", "nodes": [
                    {"label": "a", "sub_nodes": [
                        {"label": "b"},
                        {"label": "c", "sub_nodes": [{"label": "d"}, {"label": "e"}]}
                    ]},
                    {"label": "f"}
                ]}]
            }"#,
        )
        .unwrap();
        let nodes = &doc.structures[0].nodes;
        assert_eq!(nodes[0].leaf_count(), 3);
        assert_eq!(nodes[1].leaf_count(), 1);
        assert_eq!(nodes[0].depth(), 3);
    }
}
