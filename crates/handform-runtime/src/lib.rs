//! Handform Runtime - Drives the interaction pipeline
//!
//! - `SimulationLoop`: fixed-step accumulator for the gesture interpreter and
//!   host physics, then one variable-step highlight pass per visual frame
//! - `Session`: composition root owning the host, the tracking source, the
//!   interpreter, the highlight registry and the shared selection
//! - `SessionConfig`: JSON configuration
//! - `init_tracing`: log subscriber setup

pub mod config;
pub mod error;
pub mod session;
pub mod sim_loop;
pub mod telemetry;

pub use config::*;
pub use error::*;
pub use session::*;
pub use sim_loop::*;
pub use telemetry::*;
