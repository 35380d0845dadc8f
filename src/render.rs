use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

/// Append-only draw.io document. Every element gets the next integer id;
/// ids 0 and 1 are reserved for the implicit root and layer cells, so
/// allocation starts at 2. Serialization writes shapes, then text elements,
/// then connectors.
#[derive(Debug, Default)]
pub struct Document {
    shapes: Vec<String>,
    texts: Vec<String>,
    edges: Vec<String>,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            texts: Vec::new(),
            edges: Vec::new(),
            next_id: 2,
        }
    }

    pub fn element_count(&self) -> usize {
        self.shapes.len() + self.texts.len() + self.edges.len()
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_pie_slice(
        &mut self,
        center_x: f64,
        center_y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        fill_color: &str,
        stroke_color: &str,
        opacity: f64,
    ) -> u64 {
        let id = self.alloc_id();
        self.shapes.push(format!(
            "<mxCell id=\"{id}\" value=\"\" \
             style=\"shape=mxgraph.basic.pie;fillColor={fill_color};strokeColor={stroke_color};\
             opacity={};startAngle={};endAngle={};\" vertex=\"1\" parent=\"1\">\n\
             <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n\
             </mxCell>\n",
            num(opacity),
            num(start_angle),
            num(end_angle),
            num(center_x - radius),
            num(center_y - radius),
            num(2.0 * radius),
            num(2.0 * radius),
        ));
        id
    }

    pub fn add_annulus_slice(
        &mut self,
        center_x: f64,
        center_y: f64,
        outer_radius: f64,
        arc_width: f64,
        start_angle: f64,
        end_angle: f64,
        fill_color: &str,
        stroke_color: &str,
        opacity: f64,
    ) -> u64 {
        let id = self.alloc_id();
        self.shapes.push(format!(
            "<mxCell id=\"{id}\" value=\"\" \
             style=\"shape=mxgraph.basic.partConcEllipse;fillColor={fill_color};\
             strokeColor={stroke_color};opacity={};startAngle={};endAngle={};arcWidth={};\" \
             vertex=\"1\" parent=\"1\">\n\
             <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n\
             </mxCell>\n",
            num(opacity),
            num(start_angle),
            num(end_angle),
            num(arc_width),
            num(center_x - outer_radius),
            num(center_y - outer_radius),
            num(2.0 * outer_radius),
            num(2.0 * outer_radius),
        ));
        id
    }

    pub fn add_circle(
        &mut self,
        center_x: f64,
        center_y: f64,
        radius: f64,
        fill_color: &str,
        stroke_color: &str,
        opacity: f64,
    ) -> u64 {
        let id = self.alloc_id();
        self.shapes.push(format!(
            "<mxCell id=\"{id}\" value=\"\" \
             style=\"ellipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor={fill_color};\
             strokeColor={stroke_color};opacity={};\" vertex=\"1\" parent=\"1\">\n\
             <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n\
             </mxCell>\n",
            num(opacity),
            num(center_x - radius),
            num(center_y - radius),
            num(2.0 * radius),
            num(2.0 * radius),
        ));
        id
    }

    pub fn add_annulus(
        &mut self,
        center_x: f64,
        center_y: f64,
        outer_radius: f64,
        inner_radius: f64,
        fill_color: &str,
        stroke_color: &str,
        opacity: f64,
    ) -> u64 {
        let id = self.alloc_id();
        let dx = outer_radius - inner_radius;
        self.shapes.push(format!(
            "<mxCell id=\"{id}\" value=\"\" \
             style=\"verticalLabelPosition=bottom;verticalAlign=top;html=1;\
             shape=mxgraph.basic.donut;dx={};strokeColor={stroke_color};fillColor={fill_color};\
             opacity={};\" vertex=\"1\" parent=\"1\">\n\
             <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n\
             </mxCell>\n",
            num(dx),
            num(opacity),
            num(center_x - outer_radius),
            num(center_y - outer_radius),
            num(2.0 * outer_radius),
            num(2.0 * outer_radius),
        ));
        id
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
        font_size: f64,
        font_color: &str,
        opacity: f64,
    ) -> u64 {
        let id = self.alloc_id();
        self.texts.push(format!(
            "<mxCell id=\"{id}\" value=\"{}\" \
             style=\"text;html=1;align=center;verticalAlign=middle;fontSize={};rotation={};\
             fontColor={font_color};opacity={};\" vertex=\"1\" parent=\"1\">\n\
             <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n\
             </mxCell>\n",
            escape_xml(text),
            num(font_size),
            num(rotation),
            num(opacity),
            num(x),
            num(y),
            num(width),
            num(height),
        ));
        id
    }

    pub fn add_arrow(&mut self, source: u64, target: u64) -> u64 {
        let id = self.alloc_id();
        self.edges.push(format!(
            "<mxCell id=\"{id}\" \
             style=\"rounded=0;orthogonalLoop=1;jettySize=auto;html=1;endArrow=none;endFill=0;\" \
             edge=\"1\" parent=\"1\" source=\"{source}\" target=\"{target}\">\n\
             <mxGeometry relative=\"1\" as=\"geometry\"/>\n\
             </mxCell>\n"
        ));
        id
    }

    pub fn add_line(
        &mut self,
        source: u64,
        target: u64,
        from: (f64, f64),
        to: (f64, f64),
        style_overrides: &BTreeMap<&str, String>,
    ) -> u64 {
        let mut style: BTreeMap<&str, String> = BTreeMap::from([
            ("strokeColor", "#000000".to_string()),
            ("strokeWidth", "1".to_string()),
            ("endArrow", "none".to_string()),
        ]);
        for (key, value) in style_overrides {
            style.insert(key, value.clone());
        }
        let style = style
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";");
        let id = self.alloc_id();
        self.edges.push(format!(
            "<mxCell id=\"{id}\" style=\"{style}\" edge=\"1\" parent=\"1\" \
             source=\"{source}\" target=\"{target}\">\n\
             <mxGeometry relative=\"1\" as=\"geometry\">\n\
             <mxPoint x=\"{}\" y=\"{}\" as=\"sourcePoint\"/>\n\
             <mxPoint x=\"{}\" y=\"{}\" as=\"targetPoint\"/>\n\
             </mxGeometry>\n\
             </mxCell>\n",
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
        ));
        id
    }

    /// Wraps the element list in the mxfile envelope with the two bootstrap
    /// cells (ids 0 and 1).
    pub fn to_xml(&self, diagram_name: &str) -> String {
        let mut xml = String::new();
        xml.push_str("<mxfile host=\"Electron\">\n");
        xml.push_str(&format!(
            "<diagram name=\"{}\">\n",
            escape_xml(diagram_name)
        ));
        xml.push_str("<mxGraphModel>\n<root>\n");
        xml.push_str("<mxCell id=\"0\"/>\n<mxCell id=\"1\" parent=\"0\"/>\n");
        for shape in &self.shapes {
            xml.push_str(shape);
        }
        for text in &self.texts {
            xml.push_str(text);
        }
        for edge in &self.edges {
            xml.push_str(edge);
        }
        xml.push_str("</root>\n</mxGraphModel>\n</diagram>\n</mxfile>");
        xml
    }
}

pub fn write_output(xml: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, xml)?;
        }
        None => {
            print!("{}", xml);
        }
    }
    Ok(())
}

/// Formats numbers for style strings: integers without a decimal point,
/// fractions with up to six significant decimals.
fn num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let formatted = format!("{value:.6}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
