//! Handform Tracking - Input side of the interaction pipeline
//!
//! This crate models what a hand-tracking device reports every fixed tick:
//! - Fingertip samples (position, pointing direction, velocity) in device space
//! - Frames of samples, filtered down to the extended fingertips
//! - The source trait the host's device driver implements
//! - Mapping from device space (millimetres, right-handed) to world space

pub mod frame;
pub mod mapping;

pub use frame::*;
pub use mapping::*;
