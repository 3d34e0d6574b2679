//! Configuration module for map-shell
//!
//! Holds the environment parameters supplied at startup: view geometry, the
//! device-to-logical pixel factor, and the step sizes of the desktop shell.

pub mod shell;

pub use shell::{ConfigError, ShellConfig};
