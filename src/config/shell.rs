use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::core::Rect;

/// Startup parameters of the shell
///
/// Missing fields in a config file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Device pixels per logical unit
    pub device_scale: f64,
    /// View width in logical units
    pub view_width: f64,
    /// View height in logical units
    pub view_height: f64,
    /// Flip the engine bitmap vertically when previewing
    ///
    /// Both the engine bitmap and the preview surface are top-left origin
    /// pixmaps, so this stays off. Turn it on only for an engine that
    /// delivers its rows bottom-up.
    pub flip_vertical: bool,
    /// Device pixels panned per arrow key
    pub key_pan_step: i32,
    /// Zoom factor of the zoom-in key; zoom-out uses its reciprocal
    pub key_zoom_factor: f64,
    /// Degrees rotated per rotate key
    pub key_rotate_step: f64,
    /// Zoom factor per mouse wheel notch
    pub wheel_zoom_factor: f64,
    /// Logical units a press may move and still count as a click
    pub tap_slop: f64,
    /// Metric or imperial trip summaries
    pub metric_units: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            device_scale: 1.0,
            view_width: 800.0,
            view_height: 600.0,
            flip_vertical: false,
            key_pan_step: Self::DEFAULT_KEY_PAN_STEP,
            key_zoom_factor: 2.0,
            key_rotate_step: 10.0,
            wheel_zoom_factor: std::f64::consts::SQRT_2,
            tap_slop: 3.0,
            metric_units: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ShellConfig {
    pub const DEFAULT_KEY_PAN_STEP: i32 = 50;
    pub const MAX_DEVICE_SCALE: f64 = 8.0;

    /// Loads and validates a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses and validates a JSON config document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ShellConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.device_scale > 0.0 && self.device_scale <= Self::MAX_DEVICE_SCALE) {
            return Err(invalid(
                "device_scale",
                format!("must be in (0, {}], got {}", Self::MAX_DEVICE_SCALE, self.device_scale),
            ));
        }
        if !(self.view_width > 0.0 && self.view_height > 0.0) {
            return Err(invalid(
                "view_width",
                format!("view must be non-empty, got {}x{}", self.view_width, self.view_height),
            ));
        }
        if self.key_pan_step <= 0 {
            return Err(invalid("key_pan_step", format!("must be positive, got {}", self.key_pan_step)));
        }
        if !(self.key_zoom_factor > 1.0 && self.key_zoom_factor.is_finite()) {
            return Err(invalid(
                "key_zoom_factor",
                format!("must be greater than 1, got {}", self.key_zoom_factor),
            ));
        }
        if !self.key_rotate_step.is_finite() {
            return Err(invalid("key_rotate_step", "must be finite".to_string()));
        }
        if !(self.wheel_zoom_factor > 1.0 && self.wheel_zoom_factor.is_finite()) {
            return Err(invalid(
                "wheel_zoom_factor",
                format!("must be greater than 1, got {}", self.wheel_zoom_factor),
            ));
        }
        if !(self.tap_slop >= 0.0) {
            return Err(invalid("tap_slop", format!("must not be negative, got {}", self.tap_slop)));
        }
        Ok(())
    }

    /// The view rectangle in logical units
    pub fn view_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.view_width, self.view_height)
    }

    /// The view size in whole device pixels
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.view_width * self.device_scale).round() as u32,
            (self.view_height * self.device_scale).round() as u32,
        )
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
