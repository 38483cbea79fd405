//! SVG output through the library's render contract.

use std::fmt::Write as _;

use gridaura::path::bounds;
use gridaura::prelude::*;
use gridaura::render::{FillPass, StrokePass};

/// Collects `<path>` elements and the running canvas bounds.
#[derive(Debug, Default)]
pub struct SvgSink {
    elements: Vec<String>,
    bounds: Option<(Vec2<f64>, Vec2<f64>)>,
}

/// SVG path data. Arcs are quarter circles traced clockwise on screen.
pub fn path_data(path: &[PathCommand]) -> String {
    let mut d = String::new();
    for cmd in path {
        let _ = match *cmd {
            PathCommand::Move { x, y } => write!(d, "M{x} {y} "),
            PathCommand::Line { x, y } => write!(d, "L{x} {y} "),
            PathCommand::Arc { x, y, radius, .. } => write!(d, "A{radius} {radius} 0 0 1 {x} {y} "),
        };
    }
    d.push('Z');
    d
}

fn fill_attrs(fill: Option<&FillPass>) -> String {
    match fill {
        None => "fill=\"none\"".to_string(),
        Some(f) => {
            let mut s = format!("fill=\"{}\" fill-opacity=\"{}\"", f.color, f.opacity);
            if let Some(tex) = &f.texture {
                let _ = write!(s, " data-texture=\"{tex}\"");
            }
            s
        }
    }
}

fn stroke_attrs(stroke: Option<&StrokePass>) -> String {
    match stroke {
        None => "stroke=\"none\"".to_string(),
        Some(st) => {
            let mut s = format!(
                "stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\"",
                st.color, st.width, st.opacity
            );
            if let Some((dash, gap)) = st.dash {
                let _ = write!(s, " stroke-dasharray=\"{dash} {gap}\"");
            }
            s
        }
    }
}

impl RenderSink for SvgSink {
    fn draw(&mut self, path: &[PathCommand], pass: &RenderPass) {
        if let Some((lo, hi)) = bounds(path) {
            self.bounds = Some(match self.bounds {
                Some((a, b)) => (a.inf(&lo), b.sup(&hi)),
                None => (lo, hi),
            });
        }
        self.elements.push(format!(
            "<path d=\"{}\" {} {}/>",
            path_data(path),
            fill_attrs(pass.fill.as_ref()),
            stroke_attrs(pass.stroke.as_ref())
        ));
    }
}

impl SvgSink {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The finished document, with `margin` pixels around everything drawn.
    pub fn finish(&self, margin: f64) -> String {
        let (lo, hi) = self
            .bounds
            .unwrap_or((Vec2::zeros(), Vec2::new(1.0, 1.0)));
        let (w, h) = (hi.x - lo.x + 2.0 * margin, hi.y - lo.y + 2.0 * margin);
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\">\n",
            lo.x - margin,
            lo.y - margin,
            w,
            h
        );
        for e in &self.elements {
            out.push_str("  ");
            out.push_str(e);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}
