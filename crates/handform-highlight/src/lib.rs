//! Handform Highlight - Selection feedback
//!
//! Every interactable leaf object carries a highlighter. When the gesture
//! interpreter points at an object, the highlighter crossfades its color and
//! scale towards the highlight look over `selection_delay` seconds. Only when
//! that crossfade completes does the object become the confirmed selection.
//!
//! # Reversal
//!
//! A crossfade can be reversed at any point. The elapsed timer is folded
//! (`elapsed = delay - elapsed`) so the reversed animation starts from the
//! exact blend the object was showing.

pub mod highlighter;
pub mod registry;

pub use highlighter::*;
pub use registry::*;
