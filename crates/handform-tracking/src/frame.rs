//! Tracking frames - per-tick fingertip snapshots

use handform_core::Vec3;

/// Which digit (or held tool) a pointable belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerKind {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
    /// Pen-like tool held in the hand
    Tool,
}

impl FingerKind {
    /// The five fingers of one hand, thumb first
    pub fn fingers() -> [FingerKind; 5] {
        [
            FingerKind::Thumb,
            FingerKind::Index,
            FingerKind::Middle,
            FingerKind::Ring,
            FingerKind::Pinky,
        ]
    }

    pub fn is_thumb(self) -> bool {
        self == FingerKind::Thumb
    }
}

/// One tracked pointable, in device space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fingertip {
    /// Device-assigned id, stable while the pointable stays tracked
    pub id: u32,
    pub kind: FingerKind,
    /// Stabilized tip position (millimetres)
    pub position: Vec3,
    /// Pointing direction (unit vector)
    pub direction: Vec3,
    /// Tip velocity (millimetres per second)
    pub velocity: Vec3,
    /// Whether the device reports this pointable as straightened out
    pub extended: bool,
}

impl Fingertip {
    /// Extended fingertip at rest, pointing away from the device along -Z
    pub fn extended(id: u32, kind: FingerKind, position: Vec3) -> Self {
        Fingertip {
            id,
            kind,
            position,
            direction: Vec3::new(0.0, 0.0, -1.0),
            velocity: Vec3::ZERO,
            extended: true,
        }
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn curled(mut self) -> Self {
        self.extended = false;
        self
    }
}

/// Snapshot produced by the tracking device for one fixed tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingFrame {
    /// Device frame counter
    pub id: u64,
    /// All tracked pointables of the hand, in device order
    pub fingertips: Vec<Fingertip>,
}

impl TrackingFrame {
    pub fn new(id: u64, fingertips: Vec<Fingertip>) -> Self {
        TrackingFrame { id, fingertips }
    }

    /// Frame with nothing tracked
    pub fn empty(id: u64) -> Self {
        TrackingFrame {
            id,
            fingertips: Vec::new(),
        }
    }

    /// Extended pointables, in device order
    pub fn extended(&self) -> impl Iterator<Item = &Fingertip> {
        self.fingertips.iter().filter(|f| f.extended)
    }

    pub fn extended_count(&self) -> usize {
        self.extended().count()
    }

    /// The single extended pointable, if exactly one is extended
    pub fn sole_extended(&self) -> Option<&Fingertip> {
        let mut extended = self.extended();
        match (extended.next(), extended.next()) {
            (Some(tip), None) => Some(tip),
            _ => None,
        }
    }
}

/// Device driver seam, polled once per fixed tick
pub trait TrackingSource {
    /// Latest frame, or `None` when the device has no hand in view
    fn poll(&mut self) -> Option<TrackingFrame>;
}

impl<T: TrackingSource + ?Sized> TrackingSource for Box<T> {
    fn poll(&mut self) -> Option<TrackingFrame> {
        (**self).poll()
    }
}
