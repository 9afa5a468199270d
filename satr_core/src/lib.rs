//! # satr_core
//!
//! Foundational utilities shared across the satradio workspace: a `libm`-backed
//! real-number trait for deterministic trigonometry, saturating fixed-point
//! rounding helpers used throughout the signal chain, and the shutdown flag
//! passed from the CLI's signal handler down into the mux loop.

pub mod fixed;
pub mod math;
pub mod shutdown;

pub use math::{Real, abs, atan2, cos, round, sin, sqrt};
pub use shutdown::ShutdownFlag;
