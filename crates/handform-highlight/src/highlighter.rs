//! Highlighter - per-object select / deselect state machine

use handform_core::{
    ping_pong, Color, HandformError, HandformResult, Host, ObjectId, Selection, SharedSelection,
    Vec3,
};
use tracing::{debug, info, trace};

/// What a highlighted object looks like and how long selecting it takes
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightConfig {
    /// Color at full highlight
    pub highlight_color: Color,
    /// Scale multiplier at full highlight
    pub highlight_scale_factor: f32,
    /// Seconds from first highlight to confirmed selection
    pub selection_delay: f32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            highlight_color: Color::rgb(1.0, 0.8, 0.2),
            highlight_scale_factor: 1.2,
            selection_delay: 0.5,
        }
    }
}

impl HighlightConfig {
    /// Short dwell for users who point deliberately
    pub fn snappy() -> Self {
        HighlightConfig {
            selection_delay: 0.25,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> HandformResult<()> {
        if !self.selection_delay.is_finite() || self.selection_delay <= 0.0 {
            return Err(HandformError::InvalidConfig(format!(
                "selection_delay must be positive, got {}",
                self.selection_delay
            )));
        }
        if !self.highlight_scale_factor.is_finite() || self.highlight_scale_factor <= 0.0 {
            return Err(HandformError::InvalidConfig(format!(
                "highlight_scale_factor must be positive, got {}",
                self.highlight_scale_factor
            )));
        }
        Ok(())
    }
}

/// Capability of reacting to selection signals
pub trait Highlightable {
    /// Begin or reverse the crossfade
    fn select(&mut self, is_selecting: bool);

    /// The object was rescaled externally to `current_scale` while
    /// highlighted; rebase the un-highlighted scale on it
    fn notify_default_scale_changed(&mut self, current_scale: Vec3);
}

/// State change produced by a settled highlighter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// Object became the confirmed selection; its body is now dynamic
    Promoted,
    /// Deselected body came to rest and was made kinematic
    Frozen,
}

/// Highlight state machine for one interactable
#[derive(Debug, Clone)]
pub struct Highlighter {
    object: ObjectId,
    config: HighlightConfig,
    default_color: Color,
    default_scale: Vec3,
    cue_pitch: f32,
    /// Seconds into the current crossfade, in [0, selection_delay]
    elapsed: f32,
    animating: bool,
    selecting: bool,
}

impl Highlighter {
    /// Attach a highlighter to `object`, capturing its current look as the
    /// default. Fails if the object lacks a renderer or a rigid body.
    pub fn new<H: Host + ?Sized>(
        object: ObjectId,
        config: HighlightConfig,
        host: &H,
    ) -> HandformResult<Self> {
        config.validate()?;

        let default_color = host
            .color(object)
            .ok_or(HandformError::MissingComponent {
                object,
                component: "renderer",
            })?;
        let default_scale = host
            .local_scale(object)
            .ok_or(HandformError::UnknownObject(object))?;
        if !host.has_rigid_body(object) {
            return Err(HandformError::MissingComponent {
                object,
                component: "rigid body",
            });
        }

        // Slower selections get a deeper cue
        let cue_pitch = 1.0 / (config.selection_delay * 3.0);

        Ok(Highlighter {
            object,
            elapsed: config.selection_delay,
            config,
            default_color,
            default_scale,
            cue_pitch,
            animating: false,
            selecting: false,
        })
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn default_scale(&self) -> Vec3 {
        self.default_scale
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    pub fn cue_pitch(&self) -> f32 {
        self.cue_pitch
    }

    /// Whether the crossfade has run its full course
    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.config.selection_delay
    }

    /// Highlight blend in [0, 1]: 0 is the default look, 1 full highlight
    pub fn blend(&self) -> f32 {
        let delay = self.config.selection_delay;
        let progress = ping_pong(self.elapsed, delay) / delay;
        if self.selecting {
            progress
        } else {
            1.0 - progress
        }
    }

    /// Color for the current blend
    pub fn current_color(&self) -> Color {
        self.default_color.lerp(self.config.highlight_color, self.blend())
    }

    /// Scale for the current blend
    pub fn current_scale(&self) -> Vec3 {
        let highlighted = self.default_scale * self.config.highlight_scale_factor;
        self.default_scale.lerp(highlighted, self.blend())
    }

    /// Advance by one visual frame
    ///
    /// Once settled, the completion step runs on every frame. A deselected
    /// body that is still coasting is therefore frozen as soon as it rests.
    pub fn update<H: Host + ?Sized>(
        &mut self,
        dt: f32,
        host: &mut H,
        selection: &SharedSelection,
    ) -> Option<HighlightOutcome> {
        let delay = self.config.selection_delay;
        let mut outcome = None;

        if self.is_settled() {
            outcome = self.settle(host, selection);
            self.elapsed = delay;
            self.animating = false;
        } else {
            self.elapsed = (self.elapsed + dt.max(0.0)).min(delay);
        }

        if !self.animating {
            return outcome;
        }

        let color = self.current_color();
        let scale = self.current_scale();
        host.set_color(self.object, color);
        host.set_local_scale(self.object, scale);
        trace!(object = %self.object, blend = self.blend(), "highlight step");

        outcome
    }

    fn settle<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        selection: &SharedSelection,
    ) -> Option<HighlightOutcome> {
        if selection.is_selected(self.object) {
            return None;
        }

        if self.selecting {
            host.play_selection_cue(self.object, self.cue_pitch);
            let previous = selection.set(Selection::of(self.object));
            host.set_kinematic(self.object, false);
            info!(object = %self.object, previous = %previous.object, "selection confirmed");
            return Some(HighlightOutcome::Promoted);
        }

        if host.has_stopped(self.object) && !host.is_kinematic(self.object) {
            host.set_kinematic(self.object, true);
            debug!(object = %self.object, "deselected body at rest, frozen");
            return Some(HighlightOutcome::Frozen);
        }

        None
    }
}

impl Highlightable for Highlighter {
    fn select(&mut self, is_selecting: bool) {
        self.elapsed = self.config.selection_delay - self.elapsed;
        self.animating = true;
        self.selecting = is_selecting;
        debug!(object = %self.object, is_selecting, elapsed = self.elapsed, "highlight reversed");
    }

    fn notify_default_scale_changed(&mut self, current_scale: Vec3) {
        self.default_scale = current_scale / self.config.highlight_scale_factor;
    }
}
