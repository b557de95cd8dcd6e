//! Error types for Handform components

use thiserror::Error;

use crate::ObjectId;

/// Core Handform errors
///
/// All of these surface while components are being wired together. A running
/// tick never fails: bad tracking data degrades to the empty stance instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandformError {
    #[error("Object {object} is missing a {component} component")]
    MissingComponent {
        object: ObjectId,
        component: &'static str,
    },

    #[error("Unknown object: {0}")]
    UnknownObject(ObjectId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Object {0} is already registered")]
    AlreadyRegistered(ObjectId),
}

/// Result type for Handform operations
pub type HandformResult<T> = Result<T, HandformError>;
