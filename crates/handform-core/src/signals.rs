//! Typed selection signalling
//!
//! The interpreter announces selection changes to whatever reacts to them
//! (normally the highlight registry) through this trait, addressed by object.

use crate::{ObjectId, Vec3};

/// Receiver of selection-feedback signals
pub trait SelectionSignals {
    /// Begin (or reverse) the select / deselect feedback of `object`
    fn signal_select(&mut self, object: ObjectId, is_selecting: bool);

    /// `object` was rescaled externally; `current_scale` is its new scale
    fn signal_default_scale_changed(&mut self, object: ObjectId, current_scale: Vec3);
}

/// Signal sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignals;

impl SelectionSignals for NoSignals {
    fn signal_select(&mut self, _object: ObjectId, _is_selecting: bool) {}

    fn signal_default_scale_changed(&mut self, _object: ObjectId, _current_scale: Vec3) {}
}

/// Signal sink that records every call, in order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordedSignals {
    pub events: Vec<Signal>,
}

/// A recorded signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Select { object: ObjectId, is_selecting: bool },
    DefaultScaleChanged { object: ObjectId, current_scale: Vec3 },
}

impl RecordedSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select signals only, as `(object, is_selecting)`
    pub fn selects(&self) -> Vec<(ObjectId, bool)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Signal::Select {
                    object,
                    is_selecting,
                } => Some((*object, *is_selecting)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SelectionSignals for RecordedSignals {
    fn signal_select(&mut self, object: ObjectId, is_selecting: bool) {
        self.events.push(Signal::Select {
            object,
            is_selecting,
        });
    }

    fn signal_default_scale_changed(&mut self, object: ObjectId, current_scale: Vec3) {
        self.events.push(Signal::DefaultScaleChanged {
            object,
            current_scale,
        });
    }
}
