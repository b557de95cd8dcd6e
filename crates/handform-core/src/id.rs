//! Identity types for scene objects and collision layers

use std::fmt;

/// Scene object identity, assigned by the host engine
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub const ZERO: ObjectId = ObjectId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        ObjectId(id)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({:x})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Bit set of collision layers (32 layers, as in the host engine)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask containing a single layer. Layers past 31 yield an empty mask.
    #[inline]
    pub fn layer(index: u8) -> Self {
        if index < 32 {
            LayerMask(1 << index)
        } else {
            LayerMask::NONE
        }
    }

    #[inline]
    pub fn contains(self, index: u8) -> bool {
        index < 32 && self.0 & (1 << index) != 0
    }

    #[inline]
    pub fn union(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerMask({:#034b})", self.0)
    }
}
