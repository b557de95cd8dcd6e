//! Session - composition root for one interactive scene

use handform_core::{HandformResult, Host, ObjectId, Selection, SharedSelection};
use handform_gesture::{GestureInterpreter, InteractionConfig};
use handform_highlight::{HighlightConfig, HighlightRegistry};
use handform_tracking::{DeviceMapping, TrackingSource};
use tracing::info;

use crate::{FrameStats, LoopConfig, SessionConfig, SimulationLoop};

/// Builder for [`Session`]
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    aggregate: ObjectId,
    interaction: InteractionConfig,
    mapping: DeviceMapping,
    highlight: HighlightConfig,
    loop_config: LoopConfig,
    interactables: Vec<(ObjectId, Option<HighlightConfig>)>,
}

impl SessionBuilder {
    pub fn new(aggregate: ObjectId) -> Self {
        SessionBuilder {
            aggregate,
            interaction: InteractionConfig::default(),
            mapping: DeviceMapping::default(),
            highlight: HighlightConfig::default(),
            loop_config: LoopConfig::default(),
            interactables: Vec::new(),
        }
    }

    /// Builder pre-filled from a configuration file
    pub fn from_config(aggregate: ObjectId, config: &SessionConfig) -> HandformResult<Self> {
        Ok(SessionBuilder {
            aggregate,
            interaction: config.interaction_config()?,
            mapping: config.device_mapping()?,
            highlight: config.highlight_config(),
            loop_config: config.loop_config(),
            interactables: Vec::new(),
        })
    }

    pub fn interaction(mut self, config: InteractionConfig) -> Self {
        self.interaction = config;
        self
    }

    pub fn mapping(mut self, mapping: DeviceMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Highlight look shared by interactables registered without their own
    pub fn highlight(mut self, config: HighlightConfig) -> Self {
        self.highlight = config;
        self
    }

    pub fn loop_config(mut self, config: LoopConfig) -> Self {
        self.loop_config = config;
        self
    }

    pub fn interactable(mut self, object: ObjectId) -> Self {
        self.interactables.push((object, None));
        self
    }

    pub fn interactables(mut self, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        self.interactables
            .extend(objects.into_iter().map(|object| (object, None)));
        self
    }

    /// Interactable with its own highlight look
    pub fn interactable_with(mut self, object: ObjectId, config: HighlightConfig) -> Self {
        self.interactables.push((object, Some(config)));
        self
    }

    /// Wire everything against `host`. Fails on the first missing component.
    pub fn build<H: Host, T: TrackingSource>(
        self,
        host: H,
        source: T,
    ) -> HandformResult<Session<H, T>> {
        let sim = SimulationLoop::new(self.loop_config)?;
        let selection = SharedSelection::new(Selection::of(self.aggregate));
        let interpreter = GestureInterpreter::new(
            self.interaction,
            self.mapping,
            self.aggregate,
            selection.clone(),
            &host,
        )?;

        let mut registry = HighlightRegistry::new();
        for (object, config) in self.interactables {
            let config = config.unwrap_or_else(|| self.highlight.clone());
            registry.attach(object, config, &host)?;
        }

        info!(
            aggregate = %self.aggregate,
            interactables = registry.len(),
            fixed_step = sim.config().fixed_step,
            "session started"
        );

        Ok(Session {
            host,
            source,
            selection,
            interpreter,
            registry,
            sim,
        })
    }
}

/// One scene: host, tracking source, interpreter, highlighters and the
/// selection they share
pub struct Session<H: Host, T: TrackingSource> {
    host: H,
    source: T,
    selection: SharedSelection,
    interpreter: GestureInterpreter,
    registry: HighlightRegistry,
    sim: SimulationLoop,
}

impl<H: Host, T: TrackingSource> Session<H, T> {
    /// Drive one visual frame
    pub fn frame(&mut self, frame_dt: f32) -> FrameStats {
        self.sim.advance(
            frame_dt,
            &mut self.source,
            &mut self.host,
            &mut self.interpreter,
            &mut self.registry,
        )
    }

    /// Stop interpreting gestures. Highlight animation keeps running on later
    /// frames so a fading target finishes its fade.
    pub fn shutdown(&mut self) {
        if self.interpreter.is_active() {
            self.interpreter.deactivate(&self.host, &mut self.registry);
            info!(frames = self.sim.frames(), "session shut down");
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection.get()
    }

    pub fn shared_selection(&self) -> &SharedSelection {
        &self.selection
    }

    pub fn interpreter(&self) -> &GestureInterpreter {
        &self.interpreter
    }

    pub fn registry(&self) -> &HighlightRegistry {
        &self.registry
    }

    pub fn sim(&self) -> &SimulationLoop {
        &self.sim
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }

    pub fn into_parts(self) -> (H, T) {
        (self.host, self.source)
    }
}
