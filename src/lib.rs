//! Interactive map shell core
//!
//! Previews pan, pinch and rotate gestures locally on the last engine bitmap
//! and commits the accumulated transform to the map engine as a short
//! command sequence once the gesture ends. Also tracks route endpoints from
//! taps and turns navigator output into instruction lines.

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod input;
pub mod platform;
pub mod ui;
