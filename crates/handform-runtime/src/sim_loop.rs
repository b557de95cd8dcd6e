//! Fixed-step simulation loop
//!
//! Visual frames arrive at whatever rate the renderer manages. Gesture
//! dispatch and physics run on a fixed step carved out of an accumulator;
//! highlight animation runs once per visual frame with the real frame time.

use handform_core::{HandformError, HandformResult, Host, ObjectId};
use handform_gesture::{GestureInterpreter, TickReport};
use handform_highlight::{HighlightOutcome, HighlightRegistry};
use handform_tracking::TrackingSource;
use tracing::{trace, warn};

/// Simulation loop configuration
#[derive(Clone, Debug, PartialEq)]
pub struct LoopConfig {
    /// Seconds per fixed tick
    pub fixed_step: f32,
    /// Fixed ticks allowed per visual frame before backlog is dropped
    pub max_substeps: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            fixed_step: 0.02,
            max_substeps: 5,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> HandformResult<()> {
        if !self.fixed_step.is_finite() || self.fixed_step <= 0.0 {
            return Err(HandformError::InvalidConfig(format!(
                "fixed_step must be positive, got {}",
                self.fixed_step
            )));
        }
        if self.max_substeps == 0 {
            return Err(HandformError::InvalidConfig(
                "max_substeps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// What one visual frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Fixed ticks run
    pub substeps: u32,
    /// Simulated seconds discarded because the substep cap was hit
    pub dropped_backlog: f32,
    /// Report of every fixed tick, in order
    pub reports: Vec<TickReport>,
    /// Highlight state changes from the animation pass
    pub outcomes: Vec<(ObjectId, HighlightOutcome)>,
}

impl FrameStats {
    /// Object promoted to the selection this frame, if any
    pub fn promoted(&self) -> Option<ObjectId> {
        self.outcomes
            .iter()
            .rev()
            .find(|(_, outcome)| *outcome == HighlightOutcome::Promoted)
            .map(|(object, _)| *object)
    }
}

/// Fixed-step accumulator
#[derive(Debug)]
pub struct SimulationLoop {
    config: LoopConfig,
    accumulator: f32,
    /// Total simulated time across all fixed ticks
    simulated: f64,
    frames: u64,
}

impl SimulationLoop {
    pub fn new(config: LoopConfig) -> HandformResult<Self> {
        config.validate()?;
        Ok(SimulationLoop {
            config,
            accumulator: 0.0,
            simulated: 0.0,
            frames: 0,
        })
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Time waiting for the next fixed tick
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn simulated_time(&self) -> f64 {
        self.simulated
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one visual frame of `frame_dt` seconds.
    ///
    /// Each fixed tick polls `source` once, runs the interpreter and then
    /// steps host physics, so forces applied by the interpreter take effect in
    /// the same tick. The highlight pass runs last, reading the selection the
    /// interpreter holds.
    pub fn advance<T, H>(
        &mut self,
        frame_dt: f32,
        source: &mut T,
        host: &mut H,
        interpreter: &mut GestureInterpreter,
        registry: &mut HighlightRegistry,
    ) -> FrameStats
    where
        T: TrackingSource + ?Sized,
        H: Host + ?Sized,
    {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.max(0.0)
        } else {
            0.0
        };
        let step = self.config.fixed_step;
        let mut stats = FrameStats::default();

        self.accumulator += frame_dt;
        while self.accumulator >= step {
            if stats.substeps >= self.config.max_substeps {
                // Keep the sub-step remainder so the phase is preserved
                let dropped = (self.accumulator / step).floor() * step;
                self.accumulator -= dropped;
                stats.dropped_backlog = dropped;
                warn!(
                    dropped_secs = dropped,
                    max_substeps = self.config.max_substeps,
                    "simulation falling behind, backlog dropped"
                );
                break;
            }

            let frame = source.poll();
            let report = interpreter.fixed_tick(frame.as_ref(), step, host, registry);
            host.integrate(step);

            self.accumulator -= step;
            self.simulated += f64::from(step);
            stats.substeps += 1;
            stats.reports.push(report);
        }

        stats.outcomes = registry.update_all(frame_dt, host, interpreter.selection());
        self.frames += 1;

        trace!(
            frame = self.frames,
            substeps = stats.substeps,
            accumulator = self.accumulator,
            "frame advanced"
        );
        stats
    }

    /// Forget any pending partial tick
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
