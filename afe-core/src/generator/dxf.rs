//! DXF (Drawing Exchange Format) export of a recorded drawing.
//!
//! Each sketch becomes a layer; each curve becomes a LINE, ARC or CIRCLE
//! entity raised to the elevation of its sketch plane.

use std::fmt::Write;

use super::emit::{HOLES_SKETCH, REFERENCE_SKETCH};
use super::recorder::RecordingEngine;
use crate::config::angle::normalize_degrees;
use crate::error::Result;
use crate::model::{Arc, Curve, Point2D};

/// DXF layer colors (AutoCAD color indices)
pub struct DxfColors {
    pub reference: i32, // Member lines
    pub parts: i32,     // Part outlines
    pub holes: i32,     // Joint holes
}

impl Default for DxfColors {
    fn default() -> Self {
        Self {
            reference: 7, // White
            parts: 3,     // Green
            holes: 1,     // Red
        }
    }
}

impl DxfColors {
    fn for_sketch(&self, name: &str) -> i32 {
        match name {
            REFERENCE_SKETCH => self.reference,
            HOLES_SKETCH => self.holes,
            _ => self.parts,
        }
    }
}

/// DXF writer for generating AutoCAD-compatible drawings.
pub struct DxfWriter {
    output: String,
}

impl Default for DxfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Get the generated DXF content.
    pub fn into_string(self) -> String {
        self.output
    }

    /// Write a DXF group code and value.
    ///
    /// Group codes are right-aligned in three columns.
    fn write_group(&mut self, code: i32, value: &str) {
        writeln!(self.output, "{:>3}", code).unwrap();
        writeln!(self.output, "{}", value).unwrap();
    }

    /// Write a DXF group code with integer value (right-aligned in 6 chars).
    fn write_group_int(&mut self, code: i32, value: i32) {
        writeln!(self.output, "{:>3}", code).unwrap();
        writeln!(self.output, "{:>6}", value).unwrap();
    }

    /// Format a coordinate with 4 decimal places, rounding half away from zero.
    fn format_coord(value: f64) -> String {
        let scaled = value * 10000.0;
        let rounded = if scaled >= 0.0 {
            (scaled + 0.5).floor()
        } else {
            (scaled - 0.5).ceil()
        };
        let value = rounded / 10000.0;
        // Avoid "-0.0000"
        let value = if value == 0.0 { 0.0 } else { value };
        format!("{:.4}", value)
    }

    /// Write the DXF header section.
    pub fn write_header(&mut self, title: &str) {
        self.write_group(999, title);
        // R12 has no units header variable
        self.write_group(999, "Units: cm");
        self.write_group(0, "SECTION");
        self.write_group(2, "HEADER");

        // AutoCAD version
        self.write_group(9, "$ACADVER");
        self.write_group(1, "AC1009");

        self.write_group(0, "ENDSEC");
    }

    /// Write the tables section with layer definitions.
    pub fn write_tables(&mut self, layers: &[(String, i32)]) {
        self.write_group(0, "SECTION");
        self.write_group(2, "TABLES");

        // Line type table
        self.write_group(0, "TABLE");
        self.write_group(2, "LTYPE");
        self.write_group_int(70, 1);

        self.write_group(0, "LTYPE");
        self.write_group(2, "CONTINUOUS");
        self.write_group_int(70, 64);
        self.write_group(3, "Solid line");
        self.write_group_int(72, 65);
        self.write_group_int(73, 0);
        self.write_group(40, "0.0");

        self.write_group(0, "ENDTAB");

        // Layer table
        self.write_group(0, "TABLE");
        self.write_group(2, "LAYER");
        self.write_group_int(70, layers.len() as i32);

        for (name, color) in layers {
            self.write_layer(name, *color);
        }

        self.write_group(0, "ENDTAB");
        self.write_group(0, "ENDSEC");
    }

    /// Write a layer definition.
    fn write_layer(&mut self, name: &str, color: i32) {
        self.write_group(0, "LAYER");
        self.write_group(2, name);
        self.write_group_int(70, 64);
        self.write_group_int(62, color);
        self.write_group(6, "CONTINUOUS");
    }

    /// Begin the entities section.
    pub fn begin_entities(&mut self) {
        self.write_group(0, "SECTION");
        self.write_group(2, "ENTITIES");
    }

    /// End the entities section and write EOF.
    pub fn end_entities(&mut self) {
        self.write_group(0, "ENDSEC");
        self.write_group(0, "EOF");
    }

    fn write_entity_start(&mut self, kind: &str, layer: &str) {
        self.write_group(0, kind);
        self.write_group(8, layer);
    }

    fn write_point(&mut self, code: i32, p: Point2D, z: f64) {
        self.write_group(code, &Self::format_coord(p.x));
        self.write_group(code + 10, &Self::format_coord(p.y));
        self.write_group(code + 20, &Self::format_coord(z));
    }

    /// Write a LINE entity.
    pub fn write_line_entity(&mut self, layer: &str, start: Point2D, end: Point2D, z: f64) {
        self.write_entity_start("LINE", layer);
        self.write_point(10, start, z);
        self.write_point(11, end, z);
    }

    /// Write an ARC entity.
    ///
    /// DXF arcs always run counter-clockwise from start to end angle, so a
    /// negative sweep is written from its end point instead.
    pub fn write_arc_entity(&mut self, layer: &str, arc: &Arc, z: f64) {
        let start = arc.start_angle().to_degrees();
        let end = start + arc.sweep.to_degrees();
        let (from, to) = if arc.sweep >= 0.0 {
            (start, end)
        } else {
            (end, start)
        };

        self.write_entity_start("ARC", layer);
        self.write_point(10, arc.center, z);
        self.write_group(40, &Self::format_coord(arc.radius()));
        self.write_group(50, &Self::format_coord(normalize_degrees(from)));
        self.write_group(51, &Self::format_coord(normalize_degrees(to)));
    }

    /// Write a CIRCLE entity.
    pub fn write_circle_entity(&mut self, layer: &str, center: Point2D, radius: f64, z: f64) {
        self.write_entity_start("CIRCLE", layer);
        self.write_point(10, center, z);
        self.write_group(40, &Self::format_coord(radius));
    }

    /// Write any sketch curve.
    pub fn write_curve(&mut self, layer: &str, curve: &Curve, z: f64) {
        match curve {
            Curve::Line(seg) => self.write_line_entity(layer, seg.start, seg.end, z),
            Curve::Arc(arc) => self.write_arc_entity(layer, arc, z),
            Curve::Circle { center, radius } => {
                self.write_circle_entity(layer, *center, *radius, z)
            }
        }
    }
}

/// Turn a sketch name into a valid R12 layer name.
pub fn layer_name(sketch_name: &str) -> String {
    sketch_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Render every recorded sketch into one DXF document.
pub fn generate_dxf(engine: &RecordingEngine, title: &str) -> Result<String> {
    let colors = DxfColors::default();
    let layers: Vec<(String, i32)> = engine
        .sketches
        .iter()
        .map(|s| (layer_name(&s.name), colors.for_sketch(&s.name)))
        .collect();

    let mut dxf = DxfWriter::new();
    dxf.write_header(title);
    dxf.write_tables(&layers);
    dxf.begin_entities();

    for (sketch, (layer, _)) in engine.sketches.iter().zip(&layers) {
        let z = engine.plane_offset(sketch.plane)?;
        for curve in &sketch.curves {
            dxf.write_curve(layer, curve, z);
        }
    }

    dxf.end_entities();
    Ok(dxf.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::engine::ModelingEngine;
    use crate::model::Segment;
    use std::f64::consts::PI;

    fn entity_count(dxf: &str, kind: &str) -> usize {
        dxf.lines().filter(|l| *l == kind).count()
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(DxfWriter::format_coord(1.0), "1.0000");
        assert_eq!(DxfWriter::format_coord(0.12346), "0.1235");
        assert_eq!(DxfWriter::format_coord(-0.00001), "0.0000");
        assert_eq!(DxfWriter::format_coord(-2.5), "-2.5000");
    }

    #[test]
    fn test_header_is_r12() {
        let mut dxf = DxfWriter::new();
        dxf.write_header("T");
        let out = dxf.into_string();
        assert!(out.contains("  9\n$ACADVER\n  1\nAC1009\n"));
        assert!(out.contains("999\nUnits: cm\n"));
        assert!(!out.contains("$INSUNITS"));
    }

    #[test]
    fn test_layer_name() {
        assert_eq!(layer_name("Part - 12"), "PART_-_12");
        assert_eq!(layer_name("PartsHoles"), "PARTSHOLES");
    }

    #[test]
    fn test_arc_angles_ccw() {
        let mut dxf = DxfWriter::new();
        let arc = Arc::new(Point2D::new(0.0, 0.0), Point2D::new(0.0, 1.0), PI);
        dxf.write_arc_entity("L", &arc, 0.0);
        let out = dxf.into_string();
        assert!(out.contains(" 50\n90.0000\n"));
        assert!(out.contains(" 51\n270.0000\n"));
    }

    #[test]
    fn test_arc_angles_negative_sweep() {
        let mut dxf = DxfWriter::new();
        let arc = Arc::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), -PI / 2.0);
        dxf.write_arc_entity("L", &arc, 0.0);
        let out = dxf.into_string();
        assert!(out.contains(" 50\n270.0000\n"));
        assert!(out.contains(" 51\n0.0000\n"));
    }

    #[test]
    fn test_generate_dxf_layers_and_elevation() {
        let mut engine = RecordingEngine::new();
        let base = engine.base_plane();
        let reference = engine.add_sketch(base, REFERENCE_SKETCH).unwrap();
        engine
            .add_curve(
                reference,
                Curve::Line(Segment::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0))),
            )
            .unwrap();
        let plane = engine.add_offset_plane(base, 0.36).unwrap();
        let part = engine.add_sketch(plane, "Part - 0").unwrap();
        engine
            .add_curve(
                part,
                Curve::Circle {
                    center: Point2D::new(2.0, 2.0),
                    radius: 0.5,
                },
            )
            .unwrap();

        let dxf = generate_dxf(&engine, "Truss(truss.afe)").unwrap();

        assert!(dxf.starts_with("999\nTruss(truss.afe)\n"));
        assert!(dxf.ends_with("  0\nEOF\n"));
        assert!(dxf.contains("  2\nINSTRUCTIONS\n"));
        assert!(dxf.contains("  2\nPART_-_0\n"));
        assert_eq!(entity_count(&dxf, "LINE"), 1);
        assert_eq!(entity_count(&dxf, "CIRCLE"), 1);
        assert!(dxf.contains(" 30\n0.3600\n"));
    }
}
