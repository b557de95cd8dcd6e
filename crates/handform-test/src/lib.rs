//! Handform Test Harness
//!
//! This crate provides:
//! - `MockWorld`: in-memory host with sphere bodies and recorded calls
//! - `ScriptedHand`: deterministic tracking source with optional seeded jitter
//! - `Harness`: session over the standard scene, stepped one frame at a time

pub mod hand;
pub mod scene;
pub mod world;

pub use hand::*;
pub use scene::*;
pub use world::*;
