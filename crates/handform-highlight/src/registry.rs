//! Highlight registry - routes selection signals to per-object highlighters

use std::collections::BTreeMap;

use handform_core::{
    HandformError, HandformResult, Host, ObjectId, SelectionSignals, SharedSelection, Vec3,
};
use tracing::debug;

use crate::{HighlightConfig, HighlightOutcome, Highlightable, Highlighter};

/// All highlighters in the scene, keyed by object
#[derive(Debug, Default)]
pub struct HighlightRegistry {
    highlighters: BTreeMap<ObjectId, Highlighter>,
}

impl HighlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a highlighter; an object may carry at most one
    pub fn register(&mut self, highlighter: Highlighter) -> HandformResult<()> {
        let object = highlighter.object();
        if self.highlighters.contains_key(&object) {
            return Err(HandformError::AlreadyRegistered(object));
        }
        self.highlighters.insert(object, highlighter);
        Ok(())
    }

    /// Build and register a highlighter for `object`
    pub fn attach<H: Host + ?Sized>(
        &mut self,
        object: ObjectId,
        config: HighlightConfig,
        host: &H,
    ) -> HandformResult<()> {
        let highlighter = Highlighter::new(object, config, host)?;
        self.register(highlighter)
    }

    pub fn get(&self, object: ObjectId) -> Option<&Highlighter> {
        self.highlighters.get(&object)
    }

    pub fn remove(&mut self, object: ObjectId) -> Option<Highlighter> {
        self.highlighters.remove(&object)
    }

    pub fn len(&self) -> usize {
        self.highlighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlighters.is_empty()
    }

    /// Objects whose crossfade is still running
    pub fn animating(&self) -> Vec<ObjectId> {
        self.highlighters
            .values()
            .filter(|h| h.is_animating())
            .map(|h| h.object())
            .collect()
    }

    /// Variable-rate animation pass over every highlighter, in object order
    pub fn update_all<H: Host + ?Sized>(
        &mut self,
        dt: f32,
        host: &mut H,
        selection: &SharedSelection,
    ) -> Vec<(ObjectId, HighlightOutcome)> {
        let mut outcomes = Vec::new();
        for (object, highlighter) in self.highlighters.iter_mut() {
            if let Some(outcome) = highlighter.update(dt, host, selection) {
                outcomes.push((*object, outcome));
            }
        }
        outcomes
    }
}

impl SelectionSignals for HighlightRegistry {
    fn signal_select(&mut self, object: ObjectId, is_selecting: bool) {
        match self.highlighters.get_mut(&object) {
            Some(highlighter) => highlighter.select(is_selecting),
            None => debug!(object = %object, is_selecting, "select signal without highlighter"),
        }
    }

    fn signal_default_scale_changed(&mut self, object: ObjectId, current_scale: Vec3) {
        match self.highlighters.get_mut(&object) {
            Some(highlighter) => highlighter.notify_default_scale_changed(current_scale),
            None => debug!(object = %object, "scale signal without highlighter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlighter::tests::StubHost;
    use handform_core::Selection;

    const ROOT: ObjectId = ObjectId(10);
    const A: ObjectId = ObjectId(11);
    const B: ObjectId = ObjectId(12);

    fn setup() -> (StubHost, HighlightRegistry, SharedSelection) {
        let host = StubHost::default()
            .with_object(ROOT)
            .with_object(A)
            .with_object(B);
        let mut registry = HighlightRegistry::new();
        let config = HighlightConfig {
            selection_delay: 0.5,
            ..HighlightConfig::default()
        };
        registry.attach(A, config.clone(), &host).unwrap();
        registry.attach(B, config, &host).unwrap();
        (host, registry, SharedSelection::new(Selection::of(ROOT)))
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let (host, mut registry, _) = setup();
        let err = registry
            .attach(A, HighlightConfig::default(), &host)
            .unwrap_err();
        assert_eq!(err, HandformError::AlreadyRegistered(A));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_signals_route_to_highlighter() {
        let (_, mut registry, _) = setup();

        registry.signal_select(A, true);
        assert_eq!(registry.animating(), vec![A]);
        assert!(registry.get(A).unwrap().is_selecting());

        registry.signal_default_scale_changed(B, Vec3::splat(2.4));
        assert!((registry.get(B).unwrap().default_scale().x - 2.0).abs() < 1e-5);

        // Unknown targets are ignored
        registry.signal_select(ROOT, true);
        registry.signal_default_scale_changed(ROOT, Vec3::ONE);
        assert_eq!(registry.animating(), vec![A]);
    }

    #[test]
    fn test_update_all_reports_promotion() {
        let (mut host, mut registry, selection) = setup();
        registry.signal_select(B, true);

        let mut outcomes = Vec::new();
        for _ in 0..4 {
            outcomes.extend(registry.update_all(0.25, &mut host, &selection));
        }

        assert_eq!(outcomes, vec![(B, HighlightOutcome::Promoted)]);
        assert!(selection.is_selected(B));
        assert!(registry.animating().is_empty());
    }
}
