//! SVG emitter — accumulates drawing primitives and produces the
//! final document.
//!
//! Element order matches what the cutter expects: left guide dashes,
//! right guide dashes, optional top/bottom dashes, then the holes.
//! Everything sits inside one top-level group carrying the mirror
//! transform, because the cutting mechanism reads the roll reversed.

use std::fs;
use std::path::Path;

use crate::error::RollError;
use crate::model::RollGeometry;

pub(crate) const GUIDE_COLOR: &str = "red";
pub(crate) const HOLE_COLOR: &str = "black";

pub struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke="{}" stroke-width="1"/>"#,
            x1, y1, x2, y2, GUIDE_COLOR
        ));
    }

    pub fn rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        self.elements.push(format!(
            r#"<rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" rx="{:.3}" ry="{:.3}" fill="{}"/>"#,
            x, y, w, h, radius, radius, HOLE_COLOR
        ));
    }

    /// Assemble the document, wrapping every element in the mirrored
    /// top-level group.
    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.3}" height="{:.3}" viewBox="0 0 {:.3} {:.3}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        svg.push_str(&format!(
            "  <g transform=\"translate({:.3},0) scale(-1,1)\">\n",
            self.width
        ));
        for el in &self.elements {
            svg.push_str("    ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("  </g>\n</svg>\n");
        svg
    }
}

/// Serialize a computed geometry to an SVG string.
pub fn render_svg(geometry: &RollGeometry) -> String {
    let mut svg = SvgBuilder::new(geometry.total_width, geometry.total_height);
    for line in &geometry.cut_lines {
        svg.line(line.x1, line.y1, line.x2, line.y2);
    }
    for hole in &geometry.holes {
        svg.rounded_rect(hole.x, hole.y, hole.width, hole.height, hole.radius);
    }
    svg.build()
}

/// Write the geometry to an SVG file.
pub fn write_svg_file<P: AsRef<Path>>(path: P, geometry: &RollGeometry) -> Result<(), RollError> {
    let path = path.as_ref();
    fs::write(path, render_svg(geometry)).map_err(|e| RollError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, RoundedRect};

    #[test]
    fn document_structure() {
        let geometry = RollGeometry {
            total_width: 100.0,
            total_height: 40.0,
            cut_lines: vec![Line { x1: 5.0, y1: 0.0, x2: 5.0, y2: 15.0 }],
            holes: vec![RoundedRect { x: 8.0, y: 10.0, width: 3.0, height: 5.0, radius: 1.5 }],
        };
        let svg = render_svg(&geometry);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<g transform="translate(100.000,0) scale(-1,1)">"#));
        assert!(svg.contains(r#"<line x1="5.000""#));
        assert!(svg.contains(r#"rx="1.500""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        // guides precede holes
        assert!(svg.find("<line").unwrap() < svg.find("<rect").unwrap());
    }
}
