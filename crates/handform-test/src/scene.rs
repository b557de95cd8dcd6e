//! Standard test scene and session harness

use handform_core::{HandformResult, ObjectId, Vec3};
use handform_gesture::INTERACTABLE_LAYER;
use handform_highlight::{HighlightConfig, HighlightOutcome};
use handform_runtime::{FrameStats, LoopConfig, Session, SessionBuilder};

use crate::{MockWorld, ScriptedHand};

/// Aggregate of every interactable
pub const ROOT: ObjectId = ObjectId(1);
/// Straight ahead of the hand
pub const CUBE: ObjectId = ObjectId(2);
/// Ahead and to the right
pub const BALL: ObjectId = ObjectId(3);
/// Ahead and to the left, on a layer the pointer ignores
pub const PLINTH: ObjectId = ObjectId(4);

/// Fixed step and visual frame time; one tick per frame
pub const STEP: f32 = 0.02;

/// Device-space direction from the hovering hand to [`BALL`]
pub const TOWARD_BALL: Vec3 = Vec3::new(2.0, 0.0, -2.8);
/// Device-space direction from the hovering hand to [`PLINTH`]
pub const TOWARD_PLINTH: Vec3 = Vec3::new(-2.0, 0.0, -2.8);

/// Root at the origin with three spheres 0.2 m up and 3 m ahead
pub fn standard_world() -> MockWorld {
    MockWorld::new()
        .with_group(ROOT, Vec3::ZERO)
        .with_leaf(CUBE, ROOT, Vec3::new(0.0, 0.2, 3.0), 0.5, INTERACTABLE_LAYER)
        .with_leaf(BALL, ROOT, Vec3::new(2.0, 0.2, 2.8), 0.5, INTERACTABLE_LAYER)
        .with_leaf(PLINTH, ROOT, Vec3::new(-2.0, 0.2, 2.8), 0.5, 0)
}

/// Session over `world` and `hand` with default interaction settings
pub struct Harness {
    pub session: Session<MockWorld, ScriptedHand>,
    pub frames: Vec<FrameStats>,
}

impl Harness {
    pub fn new(world: MockWorld, hand: ScriptedHand) -> HandformResult<Self> {
        let session = SessionBuilder::new(ROOT)
            .loop_config(LoopConfig {
                fixed_step: STEP,
                max_substeps: 5,
            })
            .highlight(HighlightConfig::default())
            .interactables([CUBE, BALL, PLINTH])
            .build(world, hand)?;
        Ok(Harness {
            session,
            frames: Vec::new(),
        })
    }

    pub fn standard(hand: ScriptedHand) -> HandformResult<Self> {
        Self::new(standard_world(), hand)
    }

    pub fn world(&self) -> &MockWorld {
        self.session.host()
    }

    pub fn frame(&mut self) -> &FrameStats {
        let stats = self.session.frame(STEP);
        self.frames.push(stats);
        &self.frames[self.frames.len() - 1]
    }

    pub fn run_frames(&mut self, n: usize) {
        for _ in 0..n {
            self.frame();
        }
    }

    pub fn run_seconds(&mut self, seconds: f32) {
        self.run_frames((seconds / STEP).round() as usize);
    }

    /// Run until the script is exhausted
    pub fn run_script(&mut self) {
        let ticks = self.session.source_mut().remaining_ticks();
        self.run_frames(ticks as usize);
    }

    /// Every highlight outcome so far, in order
    pub fn outcomes(&self) -> Vec<(ObjectId, HighlightOutcome)> {
        self.frames
            .iter()
            .flat_map(|f| f.outcomes.iter().copied())
            .collect()
    }

    pub fn promotions(&self) -> Vec<ObjectId> {
        self.outcomes()
            .into_iter()
            .filter(|(_, o)| *o == HighlightOutcome::Promoted)
            .map(|(object, _)| object)
            .collect()
    }

    /// Frame index of the first tick that dispatched a non-trivial action
    pub fn first_action_frame(&self) -> Option<usize> {
        self.frames.iter().position(|f| {
            f.reports
                .iter()
                .any(|r| r.action != handform_gesture::Action::None)
        })
    }
}
