//! Interaction configuration

use handform_core::{HandformError, HandformResult, LayerMask};

/// Collision layer interactables live on
pub const INTERACTABLE_LAYER: u8 = 8;

/// Gesture interpreter configuration
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    /// Maximum pointing distance (world units)
    pub selection_range: f32,
    /// Force per unit of mean tip velocity
    pub translate_sensitivity: f32,
    /// Torque per unit of mean tip velocity
    pub rotate_sensitivity: f32,
    /// Scale blend rate
    pub scale_sensitivity: f32,
    /// Seconds a finger count must hold before its stance dispatches
    pub transition_delay: f32,
    /// Layers the pointing ray may hit
    pub interactable_layers: LayerMask,
    /// Pointer light intensity while pointing
    pub pointer_intensity: f32,
    /// Extra pointer light range past the hit point
    pub pointer_range_padding: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            selection_range: 100.0,
            translate_sensitivity: 50.0,
            rotate_sensitivity: 10.0,
            scale_sensitivity: 10.0,
            transition_delay: 0.1,
            interactable_layers: LayerMask::layer(INTERACTABLE_LAYER),
            pointer_intensity: 8.0,
            pointer_range_padding: 10.0,
        }
    }
}

impl InteractionConfig {
    /// Damped manipulation and a longer stance guard, for fine placement
    pub fn precise() -> Self {
        InteractionConfig {
            translate_sensitivity: 20.0,
            rotate_sensitivity: 4.0,
            scale_sensitivity: 4.0,
            transition_delay: 0.2,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> HandformResult<()> {
        let fields = [
            ("selection_range", self.selection_range),
            ("translate_sensitivity", self.translate_sensitivity),
            ("rotate_sensitivity", self.rotate_sensitivity),
            ("scale_sensitivity", self.scale_sensitivity),
            ("transition_delay", self.transition_delay),
            ("pointer_intensity", self.pointer_intensity),
            ("pointer_range_padding", self.pointer_range_padding),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(HandformError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.interactable_layers.is_empty() {
            return Err(HandformError::InvalidConfig(
                "interactable_layers is empty; pointing could never hit".into(),
            ));
        }
        Ok(())
    }
}
