//! Domain logic and core data structures
//!
//! This module contains pure logic that is independent of the map engine
//! and of any platform windowing API.

pub mod core;
pub mod gesture;
pub mod navigation;
pub mod route;
pub mod transform;
