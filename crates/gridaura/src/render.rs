//! Style contract for the external path renderer.
//!
//! The renderer receives a closed path plus one `RenderPass` at a time. Dashed outlines
//! cannot share a pass with the fill, so `AuraStyle::passes` splits them: fill first with
//! no stroke, then the dashed stroke with no fill.

use serde::{Deserialize, Serialize};

use crate::path::PathCommand;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    None,
    #[default]
    Solid,
    Dashed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillType {
    None,
    #[default]
    Solid,
    Pattern,
}

/// Fill and stroke settings of one aura.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraStyle {
    pub line_type: LineType,
    pub line_width: f64,
    pub line_color: String,
    pub line_opacity: f64,
    pub dash_size: Option<f64>,
    pub gap_size: Option<f64>,
    pub fill_type: FillType,
    pub fill_color: String,
    pub fill_opacity: f64,
    /// Texture source for `FillType::Pattern`.
    pub texture: Option<String>,
}

impl Default for AuraStyle {
    fn default() -> Self {
        Self {
            line_type: LineType::Solid,
            line_width: 4.0,
            line_color: "#000000".to_string(),
            line_opacity: 0.8,
            dash_size: None,
            gap_size: None,
            fill_type: FillType::Solid,
            fill_color: "#ffffff".to_string(),
            fill_opacity: 0.1,
            texture: None,
        }
    }
}

pub const DEFAULT_DASH: f64 = 20.0;
pub const DEFAULT_GAP: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct FillPass {
    pub fill_type: FillType,
    pub color: String,
    pub opacity: f64,
    pub texture: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokePass {
    pub width: f64,
    pub color: String,
    pub opacity: f64,
    /// `(dash, gap)` lengths in pixels for dashed strokes.
    pub dash: Option<(f64, f64)>,
}

/// One traversal of the path by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPass {
    pub fill: Option<FillPass>,
    pub stroke: Option<StrokePass>,
}

impl AuraStyle {
    pub fn is_dashed(&self) -> bool {
        self.line_type == LineType::Dashed
    }

    fn fill(&self) -> Option<FillPass> {
        (self.fill_type != FillType::None).then(|| FillPass {
            fill_type: self.fill_type,
            color: self.fill_color.clone(),
            opacity: self.fill_opacity,
            texture: self.texture.clone(),
        })
    }

    fn stroke(&self) -> Option<StrokePass> {
        if self.line_type == LineType::None || self.line_width <= 0.0 {
            return None;
        }
        let dash = self.is_dashed().then(|| {
            (
                self.dash_size.unwrap_or(DEFAULT_DASH),
                self.gap_size.unwrap_or(DEFAULT_GAP),
            )
        });
        Some(StrokePass {
            width: self.line_width,
            color: self.line_color.clone(),
            opacity: self.line_opacity,
            dash,
        })
    }

    /// Passes in draw order; empty when the style draws nothing.
    pub fn passes(&self) -> Vec<RenderPass> {
        let fill = self.fill();
        let stroke = self.stroke();
        if self.is_dashed() {
            let fill_pass = fill.map(|f| RenderPass {
                fill: Some(f),
                stroke: None,
            });
            let stroke_pass = stroke.map(|s| RenderPass {
                fill: None,
                stroke: Some(s),
            });
            return fill_pass.into_iter().chain(stroke_pass).collect();
        }
        if fill.is_none() && stroke.is_none() {
            return Vec::new();
        }
        vec![RenderPass { fill, stroke }]
    }
}

/// Receiver for aura borders in canvas coordinates.
pub trait RenderSink {
    fn draw(&mut self, path: &[PathCommand], pass: &RenderPass);
}

/// Collects every draw call; handy for tests and offline rendering.
impl RenderSink for Vec<(Vec<PathCommand>, RenderPass)> {
    fn draw(&mut self, path: &[PathCommand], pass: &RenderPass) {
        self.push((path.to_vec(), pass.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_style_is_one_pass() {
        let passes = AuraStyle::default().passes();
        assert_eq!(passes.len(), 1);
        assert!(passes[0].fill.is_some());
        assert_eq!(passes[0].stroke.as_ref().and_then(|s| s.dash), None);
    }

    #[test]
    fn dashed_style_splits_fill_and_stroke() {
        let style = AuraStyle {
            line_type: LineType::Dashed,
            dash_size: Some(8.0),
            ..AuraStyle::default()
        };
        let passes = style.passes();
        assert_eq!(passes.len(), 2);
        assert!(passes[0].fill.is_some() && passes[0].stroke.is_none());
        assert!(passes[1].fill.is_none());
        assert_eq!(
            passes[1].stroke.as_ref().and_then(|s| s.dash),
            Some((8.0, DEFAULT_GAP))
        );
    }

    #[test]
    fn dashed_without_fill_is_stroke_only() {
        let style = AuraStyle {
            line_type: LineType::Dashed,
            fill_type: FillType::None,
            ..AuraStyle::default()
        };
        let passes = style.passes();
        assert_eq!(passes.len(), 1);
        assert!(passes[0].fill.is_none());
    }

    #[test]
    fn invisible_style_draws_nothing() {
        let style = AuraStyle {
            line_type: LineType::None,
            fill_type: FillType::None,
            ..AuraStyle::default()
        };
        assert!(style.passes().is_empty());
    }

    #[test]
    fn style_deserializes_with_defaults() {
        let json = r#"{"line_type":"dashed","fill_type":"pattern","texture":"a.png"}"#;
        let style: AuraStyle = serde_json::from_str(json).unwrap();
        assert!(style.is_dashed());
        assert_eq!(style.line_width, 4.0);
        assert_eq!(style.passes()[0].fill.as_ref().unwrap().texture.as_deref(), Some("a.png"));
    }
}
