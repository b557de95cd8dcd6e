//! Session configuration file
//!
//! Every field is optional in the JSON form; missing fields take the
//! component defaults.

use std::path::Path;

use handform_core::{Color, HandformError, HandformResult, LayerMask, Vec3};
use handform_gesture::InteractionConfig;
use handform_highlight::HighlightConfig;
use handform_tracking::DeviceMapping;
use serde::{Deserialize, Serialize};

use crate::{LoopConfig, RuntimeError, RuntimeResult};

/// Top-level session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub interaction: InteractionSection,
    pub highlight: HighlightSection,
    pub device: DeviceSection,
    pub simulation: SimulationSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSection {
    pub selection_range: f32,
    pub translate_sensitivity: f32,
    pub rotate_sensitivity: f32,
    pub scale_sensitivity: f32,
    pub transition_delay: f32,
    /// Collision layer indices the pointing ray may hit
    pub interactable_layers: Vec<u8>,
    pub pointer_intensity: f32,
    pub pointer_range_padding: f32,
}

impl Default for InteractionSection {
    fn default() -> Self {
        let d = InteractionConfig::default();
        InteractionSection {
            selection_range: d.selection_range,
            translate_sensitivity: d.translate_sensitivity,
            rotate_sensitivity: d.rotate_sensitivity,
            scale_sensitivity: d.scale_sensitivity,
            transition_delay: d.transition_delay,
            interactable_layers: (0..32u8).filter(|i| d.interactable_layers.contains(*i)).collect(),
            pointer_intensity: d.pointer_intensity,
            pointer_range_padding: d.pointer_range_padding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSection {
    /// RGBA
    pub color: [f32; 4],
    pub scale_factor: f32,
    pub selection_delay: f32,
}

impl Default for HighlightSection {
    fn default() -> Self {
        let d = HighlightConfig::default();
        HighlightSection {
            color: d.highlight_color.to_array(),
            scale_factor: d.highlight_scale_factor,
            selection_delay: d.selection_delay,
        }
    }
}

/// Where the tracking device sits in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSection {
    pub mount_position: [f32; 3],
    /// Mount local scale; averaged into a single factor
    pub mount_scale: [f32; 3],
}

impl Default for DeviceSection {
    fn default() -> Self {
        DeviceSection {
            mount_position: [0.0; 3],
            mount_scale: [1.0; 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub fixed_step: f32,
    pub max_substeps: u32,
}

impl Default for SimulationSection {
    fn default() -> Self {
        let d = LoopConfig::default();
        SimulationSection {
            fixed_step: d.fixed_step,
            max_substeps: d.max_substeps,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> RuntimeResult<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> RuntimeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section converts into a valid component config
    pub fn validate(&self) -> HandformResult<()> {
        self.interaction_config()?.validate()?;
        self.highlight_config().validate()?;
        self.device_mapping()?;
        self.loop_config().validate()
    }

    pub fn interaction_config(&self) -> HandformResult<InteractionConfig> {
        let s = &self.interaction;
        let mut layers = LayerMask::NONE;
        for &index in &s.interactable_layers {
            if index >= 32 {
                return Err(HandformError::InvalidConfig(format!(
                    "layer index {} out of range",
                    index
                )));
            }
            layers = layers.union(LayerMask::layer(index));
        }
        Ok(InteractionConfig {
            selection_range: s.selection_range,
            translate_sensitivity: s.translate_sensitivity,
            rotate_sensitivity: s.rotate_sensitivity,
            scale_sensitivity: s.scale_sensitivity,
            transition_delay: s.transition_delay,
            interactable_layers: layers,
            pointer_intensity: s.pointer_intensity,
            pointer_range_padding: s.pointer_range_padding,
        })
    }

    pub fn highlight_config(&self) -> HighlightConfig {
        HighlightConfig {
            highlight_color: Color::from_array(self.highlight.color),
            highlight_scale_factor: self.highlight.scale_factor,
            selection_delay: self.highlight.selection_delay,
        }
    }

    pub fn device_mapping(&self) -> HandformResult<DeviceMapping> {
        let [px, py, pz] = self.device.mount_position;
        let [sx, sy, sz] = self.device.mount_scale;
        DeviceMapping::from_mount(Vec3::new(px, py, pz), Vec3::new(sx, sy, sz))
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            fixed_step: self.simulation.fixed_step,
            max_substeps: self.simulation.max_substeps,
        }
    }
}
