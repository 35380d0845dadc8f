use std::path::Path;

use drawheel::{Config, WheelDoc, WheelError, generate_structure};

fn load_fixture(name: &str) -> WheelDoc {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    WheelDoc::from_json(&input).expect("fixture parse failed")
}

fn generate_fixture(name: &str, structure: &str) -> String {
    let doc = load_fixture(name);
    generate_structure(&doc, structure, &Config::default()).expect("generation failed")
}

fn assert_contains(xml: &str, needle: &str, fixture: &str) {
    assert!(xml.contains(needle), "{fixture}: missing `{needle}` in:\n{xml}");
}

#[test]
fn envelope_is_well_formed_for_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        ("generic_basic.json", "Tasks"),
        ("percentage_rings.json", "Budget"),
        ("flavor_basic.json", "Coffee"),
        ("full_section.json", "Takeover"),
        ("single_root.json", "Whole"),
        ("text_options.json", "Labels"),
    ];
    for (fixture, structure) in candidates {
        let xml = generate_fixture(fixture, structure);
        assert_contains(&xml, "<mxfile host=\"Electron\">", fixture);
        assert_contains(&xml, "<mxCell id=\"0\"/>", fixture);
        assert_contains(&xml, "<mxCell id=\"1\" parent=\"0\"/>", fixture);
        assert_contains(&xml, "</mxfile>", fixture);
    }
}

#[test]
fn generic_wheel_partitions_the_circle() {
    let xml = generate_fixture("generic_basic.json", "Tasks");
    // 60% explicit, the remaining 40% split evenly across two siblings.
    assert_contains(&xml, "startAngle=0;endAngle=0.6;", "generic_basic");
    assert_contains(&xml, "startAngle=0.6;endAngle=0.8;", "generic_basic");
    assert_contains(&xml, "startAngle=0.8;endAngle=0;", "generic_basic");
    assert_contains(&xml, "shape=mxgraph.basic.pie;", "generic_basic");
    // Default template at level 1.
    assert_contains(&xml, "fillColor=#a20025;", "generic_basic");
    assert_contains(&xml, "opacity=100;", "generic_basic");
    // 100-radius circle centered on (320, 290).
    assert_contains(&xml, "x=\"220\" y=\"190\" width=\"200\" height=\"200\"", "generic_basic");
    // Radial label of the 60% slice, upright at its midpoint.
    assert_contains(&xml, "value=\"Build\"", "generic_basic");
    assert_contains(&xml, "rotation=18;", "generic_basic");
}

#[test]
fn ring_levels_use_annulus_slices() {
    let xml = generate_fixture("percentage_rings.json", "Budget");
    assert_contains(&xml, "startAngle=0;endAngle=0.5;", "percentage_rings");
    assert_contains(&xml, "startAngle=0.5;endAngle=0;", "percentage_rings");
    // Level 2 ring from 120 to 180: arcWidth = 1 - 120/180.
    assert_contains(&xml, "shape=mxgraph.basic.partConcEllipse;", "percentage_rings");
    assert_contains(&xml, "arcWidth=0.333333;", "percentage_rings");
    assert_contains(&xml, "x=\"140\" y=\"110\" width=\"360\" height=\"360\"", "percentage_rings");
    // Children split their parent's half evenly.
    assert_contains(&xml, "startAngle=0;endAngle=0.25;", "percentage_rings");
    assert_contains(&xml, "startAngle=0.25;endAngle=0.5;", "percentage_rings");
    // Template fade at level 2.
    assert_contains(&xml, "opacity=90;", "percentage_rings");
    assert_contains(&xml, "<diagram name=\"Percentage Wheel - Budget\">", "percentage_rings");
}

#[test]
fn flavor_wheel_weights_by_leaf_count() {
    let xml = generate_fixture("flavor_basic.json", "Coffee");
    // Fruity carries three of the four leaves.
    assert_contains(&xml, "startAngle=0;endAngle=0.75;", "flavor_basic");
    assert_contains(&xml, "startAngle=0.75;endAngle=0;", "flavor_basic");
    // Citrus holds two leaves of Fruity's three.
    assert_contains(&xml, "startAngle=0.25;endAngle=0.75;", "flavor_basic");
    assert_contains(&xml, "startAngle=0.25;endAngle=0.5;", "flavor_basic");
    assert_contains(&xml, "startAngle=0.5;endAngle=0.75;", "flavor_basic");
    // Level 3 ring sits between 150 and 200.
    assert_contains(&xml, "arcWidth=0.25;", "flavor_basic");
    assert_contains(&xml, "<diagram name=\"Flavor Wheel - Coffee\">", "flavor_basic");
}

#[test]
fn full_section_sibling_renders_circle_and_donut() {
    let xml = generate_fixture("full_section.json", "Takeover");
    // The 100% root covers the whole turn, so it renders as a plain circle.
    assert_contains(&xml, "ellipse;whiteSpace=wrap;html=1;aspect=fixed;", "full_section");
    // Its only child wraps the full second ring as a donut.
    assert_contains(&xml, "shape=mxgraph.basic.donut;dx=50;", "full_section");
    // Full rings take horizontal labels.
    assert_contains(&xml, "value=\"All\"", "full_section");
    assert_contains(&xml, "x=\"280\" y=\"275\"", "full_section");
    assert_contains(&xml, "value=\"Everything\"", "full_section");
    // The zero-percent sibling emits nothing.
    assert!(!xml.contains("Ignored"), "full_section: skipped sibling leaked");
}

#[test]
fn single_root_covers_the_whole_wheel() {
    let xml = generate_fixture("single_root.json", "Whole");
    assert_contains(&xml, "ellipse;whiteSpace=wrap;html=1;aspect=fixed;", "single_root");
    assert!(!xml.contains("mxgraph.basic.pie"), "single_root: expected no pie slice");
    assert_contains(&xml, "rotation=0;", "single_root");
    assert_contains(&xml, "<diagram name=\"Generic Wheel - Whole\">", "single_root");
}

#[test]
fn text_options_flow_into_labels() {
    let xml = generate_fixture("text_options.json", "Labels");
    // Level 2 overrides color, keeps the template font decay.
    assert_contains(&xml, "fontColor=#333333;", "text_options");
    assert_contains(&xml, "fontSize=9;", "text_options");
    // Level 1 labels keep the default font color.
    assert_contains(&xml, "fontColor=#000000;", "text_options");
}

#[test]
fn conflicting_radius_config_fails_generation() {
    let doc = load_fixture("radius_conflict.json");
    let err = generate_structure(&doc, "Broken", &Config::default()).unwrap_err();
    assert!(matches!(err, WheelError::Configuration(_)), "unexpected error: {err}");
}
