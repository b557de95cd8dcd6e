//! Handform Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every Handform component:
//! - Math primitives (Vec3, Color, Ray, interpolation helpers)
//! - Identifiers (ObjectId, LayerMask)
//! - Host collaborator traits (scene queries, rigid bodies, renderers, audio)
//! - The shared selection context and typed selection signals
//! - Error types

pub mod error;
pub mod host;
pub mod id;
pub mod math;
pub mod selection;
pub mod signals;

pub use error::*;
pub use host::*;
pub use id::*;
pub use math::*;
pub use selection::*;
pub use signals::*;
