//! Handform Gesture - Finger-count driven manipulation
//!
//! The interpreter runs once per fixed tick. It counts the extended
//! fingertips, debounces changes of that count, and dispatches:
//!
//! | extended | stance        | effect                                        |
//! |----------|---------------|-----------------------------------------------|
//! | 0        | closed fist   | nothing, so the hand can be repositioned      |
//! | 1        | point         | ray-target an interactable (thumb excluded)   |
//! | 2        | translate     | mean tip velocity as force                    |
//! | 3        | rotate        | mean tip velocity × down as torque            |
//! | 4        | unused        | nothing                                       |
//! | 5        | open hand     | mean tip depth velocity drives scale          |

pub mod config;
pub mod interpreter;
pub mod manipulation;
pub mod stance;

pub use config::*;
pub use interpreter::*;
pub use manipulation::*;
pub use stance::*;
