//! Editor configuration.
//!
//! Every behaviour that differed between revisions of the editor, or that
//! was previously left unclamped by accident, is an explicit knob here. The
//! defaults reproduce the observed behaviour of the latest revision.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// What a press on the empty canvas background does to the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundPress {
    /// Clear the selection.
    #[default]
    ClearSelection,
    /// Leave the selection as it was.
    KeepSelection,
}

/// Clamping rules applied whenever an element's geometry changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryPolicy {
    /// Smallest allowed width, if any.
    pub min_width: Option<f32>,
    /// Smallest allowed height, if any.
    pub min_height: Option<f32>,
    /// Keep elements fully inside the canvas.
    pub clamp_to_canvas: bool,
}

/// Configuration for an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Canvas background as a CSS colour.
    pub background: String,
    /// Canvas border colour; `None` draws no border.
    pub border_color: Option<String>,
    /// Outline colour of the selected text element.
    pub selection_outline: String,
    /// Background press behaviour.
    pub background_press: BackgroundPress,
    /// Geometry clamping.
    pub geometry: GeometryPolicy,
    /// Font size change per increment/decrement step.
    pub font_step: f32,
    /// Floor for decrement.
    pub min_font_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            background: "#ffffff".to_string(),
            border_color: Some("#000000".to_string()),
            selection_outline: "#cccccc".to_string(),
            background_press: BackgroundPress::default(),
            geometry: GeometryPolicy::default(),
            font_step: 2.0,
            min_font_size: 8.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> CanvasResult<()> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(self.font_step > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "font_step must be positive, got {}",
                self.font_step
            )));
        }
        if !(self.min_font_size > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "min_font_size must be positive, got {}",
                self.min_font_size
            )));
        }
        for (name, value) in [
            ("min_width", self.geometry.min_width),
            ("min_height", self.geometry.min_height),
        ] {
            if value.is_some_and(|v| v < 0.0) {
                return Err(CanvasError::InvalidConfig(format!(
                    "{name} must not be negative"
                )));
            }
        }
        Ok(())
    }
}
