//! Scripted hand - replays a fixed sequence of poses as a tracking source

use std::collections::VecDeque;

use handform_core::Vec3;
use handform_tracking::{FingerKind, Fingertip, TrackingFrame, TrackingSource};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Default tip position in device space (mm): above the sensor
pub const HOVER: Vec3 = Vec3::new(0.0, 200.0, 0.0);

/// Straight away from the user, in device space
pub const AHEAD: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// One held pose
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// `None` while no hand is in view
    pub fingers: Option<Vec<FingerKind>>,
    /// Device mm/s, shared by every extended tip
    pub velocity: Vec3,
    /// Device-space pointing direction
    pub direction: Vec3,
    pub position: Vec3,
    /// Fixed ticks the pose is held
    pub ticks: u32,
}

/// Hand that replays segments, one frame per poll
pub struct ScriptedHand {
    step: f32,
    segments: VecDeque<Segment>,
    held: u32,
    frame_id: u64,
    jitter: Option<(StdRng, Uniform<f32>)>,
}

impl ScriptedHand {
    /// Script for a source polled every `step` seconds
    pub fn new(step: f32) -> Self {
        ScriptedHand {
            step,
            segments: VecDeque::new(),
            held: 0,
            frame_id: 0,
            jitter: None,
        }
    }

    /// Perturb every tip position and velocity by up to `amplitude_mm`
    pub fn with_jitter(mut self, seed: u64, amplitude_mm: f32) -> Self {
        let amplitude = amplitude_mm.abs().max(f32::EPSILON);
        self.jitter = Some((
            StdRng::seed_from_u64(seed),
            Uniform::new_inclusive(-amplitude, amplitude),
        ));
        self
    }

    fn ticks(&self, duration: f32) -> u32 {
        (duration / self.step).round().max(1.0) as u32
    }

    pub fn segment(
        mut self,
        fingers: &[FingerKind],
        velocity: Vec3,
        direction: Vec3,
        duration: f32,
    ) -> Self {
        let ticks = self.ticks(duration);
        self.segments.push_back(Segment {
            fingers: Some(fingers.to_vec()),
            velocity,
            direction,
            position: HOVER,
            ticks,
        });
        self
    }

    /// Index finger pointing along `direction`
    pub fn point(self, direction: Vec3, duration: f32) -> Self {
        self.segment(&[FingerKind::Index], Vec3::ZERO, direction, duration)
    }

    /// Only the thumb out
    pub fn thumb(self, direction: Vec3, duration: f32) -> Self {
        self.segment(&[FingerKind::Thumb], Vec3::ZERO, direction, duration)
    }

    /// First `count` fingers (index first, thumb last) moving at `velocity`
    pub fn spread(self, count: usize, velocity: Vec3, duration: f32) -> Self {
        let kinds = spread_kinds(count);
        self.segment(&kinds, velocity, AHEAD, duration)
    }

    /// Closed fist, moving at `velocity`
    pub fn fist(self, velocity: Vec3, duration: f32) -> Self {
        self.segment(&[], velocity, AHEAD, duration)
    }

    /// Hand out of view
    pub fn absent(mut self, duration: f32) -> Self {
        let ticks = self.ticks(duration);
        self.segments.push_back(Segment {
            fingers: None,
            velocity: Vec3::ZERO,
            direction: AHEAD,
            position: HOVER,
            ticks,
        });
        self
    }

    /// Fixed ticks left in the script
    pub fn remaining_ticks(&self) -> u32 {
        self.segments
            .iter()
            .map(|s| s.ticks)
            .sum::<u32>()
            .saturating_sub(self.held)
    }

    pub fn is_finished(&self) -> bool {
        self.segments.is_empty()
    }

    fn noise(&mut self) -> Vec3 {
        match self.jitter.as_mut() {
            Some((rng, dist)) => Vec3::new(dist.sample(rng), dist.sample(rng), dist.sample(rng)),
            None => Vec3::ZERO,
        }
    }
}

impl TrackingSource for ScriptedHand {
    fn poll(&mut self) -> Option<TrackingFrame> {
        let segment = self.segments.front()?.clone();
        self.held += 1;
        if self.held >= segment.ticks {
            self.segments.pop_front();
            self.held = 0;
        }

        let kinds = segment.fingers?;
        self.frame_id += 1;

        let mut tips = Vec::with_capacity(6);
        for (i, finger) in FingerKind::fingers().into_iter().enumerate() {
            let tip = Fingertip::extended(i as u32, finger, segment.position + self.noise())
                .with_direction(segment.direction)
                .with_velocity(segment.velocity + self.noise());
            tips.push(if kinds.contains(&finger) { tip } else { tip.curled() });
        }
        if kinds.contains(&FingerKind::Tool) {
            let tool = Fingertip::extended(tips.len() as u32, FingerKind::Tool, segment.position)
                .with_direction(segment.direction)
                .with_velocity(segment.velocity);
            tips.push(tool);
        }
        Some(TrackingFrame::new(self.frame_id, tips))
    }
}

/// Extension order used for multi-finger stances
pub fn spread_kinds(count: usize) -> Vec<FingerKind> {
    [
        FingerKind::Index,
        FingerKind::Middle,
        FingerKind::Ring,
        FingerKind::Pinky,
        FingerKind::Thumb,
    ]
    .into_iter()
    .take(count)
    .collect()
}
