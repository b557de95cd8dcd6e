//! Shared selection context
//!
//! The confirmed selection is written by exactly one party (a highlighter
//! finishing its select transition) and read by the gesture interpreter every
//! fixed tick. The composition root creates one context and clones the handle
//! into every component that needs it.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::ObjectId;

/// Confirmed selection: the object being manipulated and the rigid body
/// forces are applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub object: ObjectId,
    pub body: ObjectId,
}

impl Selection {
    /// Selection where the object carries its own rigid body
    pub fn of(object: ObjectId) -> Self {
        Selection {
            object,
            body: object,
        }
    }
}

/// Cloneable handle to the process-wide selection
///
/// INVARIANT: always refers to a valid object. There is no empty state; the
/// context starts out pointing at the default aggregate of all interactables.
#[derive(Debug, Clone)]
pub struct SharedSelection {
    inner: Arc<RwLock<Selection>>,
}

impl SharedSelection {
    pub fn new(initial: Selection) -> Self {
        SharedSelection {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Snapshot of the current selection
    pub fn get(&self) -> Selection {
        *self.inner.read()
    }

    pub fn object(&self) -> ObjectId {
        self.inner.read().object
    }

    pub fn body(&self) -> ObjectId {
        self.inner.read().body
    }

    /// Replace the selection, returning the previous one
    pub fn set(&self, selection: Selection) -> Selection {
        std::mem::replace(&mut *self.inner.write(), selection)
    }

    pub fn is_selected(&self, object: ObjectId) -> bool {
        self.inner.read().object == object
    }
}
