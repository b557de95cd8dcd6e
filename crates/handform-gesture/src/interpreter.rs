//! Gesture interpreter - per-tick stance dispatch

use handform_core::{
    HandformError, HandformResult, Host, ObjectId, Ray, Selection, SelectionSignals,
    SharedSelection, Vec3,
};
use handform_tracking::{DeviceMapping, TrackingFrame};
use tracing::{debug, trace};

use crate::{
    mean_velocity, rotation_torque, scaled, translation_force, InteractionConfig, Stance,
    StanceDebounce,
};

/// Selection-aid light that follows the pointing finger
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerIndicator {
    pub position: Vec3,
    /// Unit pointing direction
    pub direction: Vec3,
    pub range: f32,
    /// 0 when not pointing
    pub intensity: f32,
}

impl PointerIndicator {
    pub fn is_lit(&self) -> bool {
        self.intensity > 0.0
    }
}

/// What the dispatched stance did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    /// Pointing ray resolved to `target`; `hit` is false on the aggregate fallback
    Targeted { target: ObjectId, hit: bool },
    /// Sole extended finger was the thumb
    ThumbIgnored,
    Force(Vec3),
    Torque(Vec3),
    /// New local scale of the selection
    Scale(Vec3),
}

/// Summary of one fixed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub extended: usize,
    pub stance: Stance,
    /// Dispatch was held back by the stance debounce
    pub guarded: bool,
    pub action: Action,
}

/// Maps tracked fingertips onto selection and manipulation of scene objects
pub struct GestureInterpreter {
    config: InteractionConfig,
    mapping: DeviceMapping,
    /// Group of all interactables; fallback target and initial selection
    aggregate: ObjectId,
    selection: SharedSelection,
    /// Object under the pointer, not yet (or no longer) the selection
    provisional: ObjectId,
    debounce: StanceDebounce,
    pointer: PointerIndicator,
    active: bool,
}

impl GestureInterpreter {
    /// Create an interpreter and reset the shared selection to `aggregate`.
    ///
    /// The aggregate must exist and carry a rigid body, since it receives
    /// forces until the first individual selection completes.
    pub fn new<H: Host + ?Sized>(
        config: InteractionConfig,
        mapping: DeviceMapping,
        aggregate: ObjectId,
        selection: SharedSelection,
        host: &H,
    ) -> HandformResult<Self> {
        config.validate()?;

        if host.child_count(aggregate).is_none() {
            return Err(HandformError::UnknownObject(aggregate));
        }
        if !host.has_rigid_body(aggregate) {
            return Err(HandformError::MissingComponent {
                object: aggregate,
                component: "rigid body",
            });
        }

        selection.set(Selection::of(aggregate));

        Ok(GestureInterpreter {
            debounce: StanceDebounce::new(config.transition_delay),
            config,
            mapping,
            aggregate,
            selection,
            provisional: aggregate,
            pointer: PointerIndicator::default(),
            active: true,
        })
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn mapping(&self) -> &DeviceMapping {
        &self.mapping
    }

    pub fn aggregate(&self) -> ObjectId {
        self.aggregate
    }

    pub fn selection(&self) -> &SharedSelection {
        &self.selection
    }

    pub fn provisional_target(&self) -> ObjectId {
        self.provisional
    }

    pub fn pointer(&self) -> &PointerIndicator {
        &self.pointer
    }

    pub fn debounce(&self) -> &StanceDebounce {
        &self.debounce
    }

    /// Stance of the most recently observed finger count
    pub fn stance(&self) -> Stance {
        Stance::from_count(self.debounce.last_count())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run one fixed tick. `None` means no hand was tracked this tick.
    pub fn fixed_tick<H, S>(
        &mut self,
        frame: Option<&TrackingFrame>,
        dt: f32,
        host: &mut H,
        signals: &mut S,
    ) -> TickReport
    where
        H: Host + ?Sized,
        S: SelectionSignals + ?Sized,
    {
        let extended = frame.map_or(0, |f| f.extended_count());
        let stance = Stance::from_count(extended);
        let mut report = TickReport {
            extended,
            stance,
            guarded: false,
            action: Action::None,
        };

        if !self.active {
            return report;
        }

        if extended != self.debounce.last_count() {
            debug!(
                from = self.debounce.last_count(),
                to = extended,
                stance = stance.as_str(),
                "finger count changed"
            );
        }
        if !self.debounce.observe(extended, dt) {
            report.guarded = true;
            return report;
        }

        // Closed fist: leave everything as it is while the hand repositions
        if stance == Stance::None {
            return report;
        }

        let current = self.selection.get();
        let current_is_leaf = host.is_leaf(current.object);

        report.action = match (stance, frame) {
            (Stance::Select, Some(frame)) => self.target(frame, host, signals),
            (Stance::TranslateSet, Some(frame)) => {
                let force = translation_force(
                    mean_velocity(frame, &self.mapping),
                    self.config.translate_sensitivity,
                );
                host.add_force(current.body, force);
                Action::Force(force)
            }
            (Stance::RotateSet, Some(frame)) => {
                let torque = rotation_torque(
                    mean_velocity(frame, &self.mapping),
                    self.config.rotate_sensitivity,
                );
                host.add_torque(current.body, torque);
                Action::Torque(torque)
            }
            (Stance::ScaleSet, Some(frame)) => {
                match host.local_scale(current.object) {
                    Some(scale) => {
                        let vz = mean_velocity(frame, &self.mapping).z;
                        let next = scaled(scale, vz, self.config.scale_sensitivity, dt);
                        host.set_local_scale(current.object, next);
                        if current_is_leaf {
                            signals.signal_default_scale_changed(current.object, next);
                        }
                        Action::Scale(next)
                    }
                    None => Action::None,
                }
            }
            _ => Action::None,
        };
        trace!(stance = stance.as_str(), action = ?report.action, "stance dispatched");

        if stance != Stance::Select {
            self.pointer.intensity = 0.0;
            self.abandon_provisional(current, current_is_leaf, host, signals);
        }

        report
    }

    /// Point with a single finger: the ray-hit object becomes the provisional
    /// target; a miss falls back to the aggregate
    fn target<H, S>(&mut self, frame: &TrackingFrame, host: &mut H, signals: &mut S) -> Action
    where
        H: Host + ?Sized,
        S: SelectionSignals + ?Sized,
    {
        let Some(tip) = frame.sole_extended() else {
            return Action::None;
        };
        // A near-fist often leaves the thumb out; that is not a pointing gesture
        if tip.kind.is_thumb() {
            return Action::ThumbIgnored;
        }

        let ray = Ray::new(
            self.mapping.to_world_point(tip.position),
            self.mapping.to_world_direction(tip.direction),
        );
        let hit = host.raycast(
            &ray,
            self.config.selection_range,
            self.config.interactable_layers,
        );

        let previous = self.provisional;
        self.provisional = hit.map_or(self.aggregate, |h| h.object);

        if previous != self.provisional {
            if host.is_leaf(previous) {
                signals.signal_select(previous, false);
            }
            if host.is_leaf(self.provisional) {
                signals.signal_select(self.provisional, true);
            }
            debug!(from = %previous, to = %self.provisional, "provisional target switched");
        }

        self.pointer = PointerIndicator {
            position: ray.origin,
            direction: ray.direction,
            range: hit.map_or(0.0, |h| h.distance) + self.config.pointer_range_padding,
            intensity: self.config.pointer_intensity,
        };

        Action::Targeted {
            target: self.provisional,
            hit: hit.is_some(),
        }
    }

    /// Fade out a provisional leaf that never became the selection, and bring
    /// the selection's highlight back
    fn abandon_provisional<H, S>(
        &mut self,
        current: Selection,
        current_is_leaf: bool,
        host: &H,
        signals: &mut S,
    ) where
        H: Host + ?Sized,
        S: SelectionSignals + ?Sized,
    {
        if !host.is_leaf(self.provisional) || self.provisional == current.object {
            return;
        }

        signals.signal_select(self.provisional, false);
        if current_is_leaf {
            signals.signal_select(current.object, true);
        }
        debug!(
            abandoned = %self.provisional,
            selection = %current.object,
            "provisional target reverted"
        );
        self.provisional = current.object;
    }

    /// Tear down: a highlighted provisional leaf must not stay lit. Further
    /// ticks are ignored.
    pub fn deactivate<H, S>(&mut self, host: &H, signals: &mut S)
    where
        H: Host + ?Sized,
        S: SelectionSignals + ?Sized,
    {
        if !self.active {
            return;
        }
        if host.is_leaf(self.provisional) {
            signals.signal_select(self.provisional, false);
        }
        self.pointer.intensity = 0.0;
        self.active = false;
        debug!(provisional = %self.provisional, "interpreter deactivated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handform_core::{
        AudioCues, Color, LayerMask, RayHit, RecordedSignals, Renderers, RigidBodies,
        SceneQuery, Transforms,
    };
    use handform_tracking::{FingerKind, Fingertip};
    use std::collections::HashMap;

    const ROOT: ObjectId = ObjectId(1);
    const CUBE: ObjectId = ObjectId(2);
    const BALL: ObjectId = ObjectId(3);

    /// Two leaves under one root. Pointing straight ahead hits whatever
    /// `ahead` names.
    struct Bench {
        ahead: Option<ObjectId>,
        scales: HashMap<ObjectId, Vec3>,
        forces: Vec<(ObjectId, Vec3)>,
        torques: Vec<(ObjectId, Vec3)>,
    }

    impl Bench {
        fn new() -> Self {
            let scales = [(ROOT, Vec3::ONE), (CUBE, Vec3::ONE), (BALL, Vec3::ONE)]
                .into_iter()
                .collect();
            Bench {
                ahead: None,
                scales,
                forces: Vec::new(),
                torques: Vec::new(),
            }
        }

        fn mutations(&self) -> usize {
            self.forces.len() + self.torques.len()
        }
    }

    impl SceneQuery for Bench {
        fn raycast(&self, _ray: &Ray, max_distance: f32, _layers: LayerMask) -> Option<RayHit> {
            let distance = 4.0;
            if distance > max_distance {
                return None;
            }
            self.ahead.map(|object| RayHit {
                object,
                distance,
                point: Vec3::ZERO,
            })
        }
        fn child_count(&self, object: ObjectId) -> Option<usize> {
            match object {
                ROOT => Some(2),
                CUBE | BALL => Some(0),
                _ => None,
            }
        }
    }

    impl Transforms for Bench {
        fn local_scale(&self, object: ObjectId) -> Option<Vec3> {
            self.scales.get(&object).copied()
        }
        fn set_local_scale(&mut self, object: ObjectId, scale: Vec3) {
            self.scales.insert(object, scale);
        }
    }

    impl RigidBodies for Bench {
        fn has_rigid_body(&self, body: ObjectId) -> bool {
            self.scales.contains_key(&body)
        }
        fn add_force(&mut self, body: ObjectId, force: Vec3) {
            self.forces.push((body, force));
        }
        fn add_torque(&mut self, body: ObjectId, torque: Vec3) {
            self.torques.push((body, torque));
        }
        fn set_kinematic(&mut self, _body: ObjectId, _kinematic: bool) {}
        fn is_kinematic(&self, _body: ObjectId) -> bool {
            false
        }
        fn linear_velocity(&self, _body: ObjectId) -> Vec3 {
            Vec3::ZERO
        }
        fn angular_velocity(&self, _body: ObjectId) -> Vec3 {
            Vec3::ZERO
        }
        fn integrate(&mut self, _dt: f32) {}
    }

    impl Renderers for Bench {
        fn color(&self, _object: ObjectId) -> Option<Color> {
            Some(Color::WHITE)
        }
        fn set_color(&mut self, _object: ObjectId, _color: Color) {}
    }

    impl AudioCues for Bench {
        fn play_selection_cue(&mut self, _object: ObjectId, _pitch: f32) {}
    }

    const DT: f32 = 0.02;

    fn interpreter(bench: &Bench) -> GestureInterpreter {
        GestureInterpreter::new(
            InteractionConfig::default(),
            DeviceMapping::default(),
            ROOT,
            SharedSelection::new(Selection::of(CUBE)),
            bench,
        )
        .unwrap()
    }

    fn hand(kinds: &[FingerKind], velocity: Vec3) -> TrackingFrame {
        let tips = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                Fingertip::extended(i as u32, *kind, Vec3::new(0.0, 150.0, 0.0))
                    .with_velocity(velocity)
            })
            .collect();
        TrackingFrame::new(0, tips)
    }

    fn fingers(n: usize) -> Vec<FingerKind> {
        [
            FingerKind::Index,
            FingerKind::Middle,
            FingerKind::Ring,
            FingerKind::Pinky,
            FingerKind::Thumb,
        ][..n]
            .to_vec()
    }

    /// Tick until the debounce opens, returning the first dispatched report
    fn settle(
        gi: &mut GestureInterpreter,
        frame: Option<&TrackingFrame>,
        bench: &mut Bench,
        signals: &mut RecordedSignals,
    ) -> TickReport {
        for _ in 0..20 {
            let report = gi.fixed_tick(frame, DT, bench, signals);
            if !report.guarded {
                return report;
            }
        }
        panic!("debounce never opened");
    }

    #[test]
    fn test_new_resets_selection_to_aggregate() {
        let bench = Bench::new();
        let gi = interpreter(&bench);
        assert_eq!(gi.selection().object(), ROOT);
        assert_eq!(gi.provisional_target(), ROOT);
        assert!(!gi.pointer().is_lit());
    }

    #[test]
    fn test_new_fails_fast() {
        let bench = Bench::new();
        let unknown = GestureInterpreter::new(
            InteractionConfig::default(),
            DeviceMapping::default(),
            ObjectId(99),
            SharedSelection::new(Selection::of(ROOT)),
            &bench,
        );
        assert!(matches!(unknown, Err(HandformError::UnknownObject(_))));
    }

    #[test]
    fn test_translate_waits_for_debounce() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();
        let frame = hand(&fingers(2), Vec3::new(1000.0, 0.0, 0.0));

        // 0.1s delay at 0.02s per tick; five f32 steps land just under 0.1,
        // so five ticks stay guarded and the sixth dispatches
        let mut elapsed = 0.0;
        loop {
            let report = gi.fixed_tick(Some(&frame), DT, &mut bench, &mut signals);
            elapsed += DT;
            if !report.guarded {
                assert!(elapsed >= 0.1 - 1e-6);
                assert_eq!(report.action, Action::Force(Vec3::new(50.0, 0.0, 0.0)));
                break;
            }
            assert!(bench.forces.is_empty());
        }
        assert_eq!(bench.forces, vec![(ROOT, Vec3::new(50.0, 0.0, 0.0))]);
    }

    #[test]
    fn test_rotate_applies_torque_to_selected_body() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        gi.selection().set(Selection::of(CUBE));
        let mut signals = RecordedSignals::new();

        let frame = hand(&fingers(3), Vec3::new(1000.0, 0.0, 0.0));
        let report = settle(&mut gi, Some(&frame), &mut bench, &mut signals);

        assert_eq!(report.stance, Stance::RotateSet);
        assert_eq!(bench.torques, vec![(CUBE, Vec3::new(0.0, 0.0, -10.0))]);
    }

    #[test]
    fn test_scale_notifies_leaf_selection() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();
        let frame = hand(&fingers(5), Vec3::new(0.0, 0.0, -500.0));

        // Aggregate selected: scaled, but no highlight baseline to move
        let report = settle(&mut gi, Some(&frame), &mut bench, &mut signals);
        let Action::Scale(s) = report.action else {
            panic!("expected scale, got {:?}", report.action);
        };
        // vz = +0.5, blend 10 * 0.02 = 0.2 -> 1.1
        assert!((s.x - 1.1).abs() < 1e-5);
        assert!(signals.events.is_empty());

        gi.selection().set(Selection::of(CUBE));
        gi.fixed_tick(Some(&frame), DT, &mut bench, &mut signals);
        assert!((bench.scales[&CUBE].x - 1.1).abs() < 1e-5);
        assert_eq!(signals.events.len(), 1);
    }

    #[test]
    fn test_unused_and_fist_do_not_mutate() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();
        let fast = Vec3::new(800.0, 800.0, 800.0);

        for n in [0usize, 4] {
            let frame = hand(&fingers(n), fast);
            settle(&mut gi, Some(&frame), &mut bench, &mut signals);
            for _ in 0..10 {
                gi.fixed_tick(Some(&frame), DT, &mut bench, &mut signals);
            }
        }
        // six tips: two hands or a held tool
        let mut six = hand(&fingers(5), fast);
        six.fingertips
            .push(Fingertip::extended(9, FingerKind::Tool, Vec3::ZERO).with_velocity(fast));
        settle(&mut gi, Some(&six), &mut bench, &mut signals);

        assert_eq!(bench.mutations(), 0);
        assert!(bench.scales.values().all(|s| *s == Vec3::ONE));
    }

    #[test]
    fn test_no_frame_is_fist() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();

        let report = settle(&mut gi, None, &mut bench, &mut signals);
        assert_eq!(report.stance, Stance::None);
        assert_eq!(report.action, Action::None);
    }

    #[test]
    fn test_pointing_switches_provisional_target() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();
        let point = hand(&fingers(1), Vec3::ZERO);

        bench.ahead = Some(CUBE);
        let report = settle(&mut gi, Some(&point), &mut bench, &mut signals);
        assert_eq!(report.action, Action::Targeted { target: CUBE, hit: true });
        assert_eq!(signals.selects(), vec![(CUBE, true)]);
        assert!(gi.pointer().is_lit());
        assert!((gi.pointer().range - 14.0).abs() < 1e-6);

        // Same target: no new signals
        gi.fixed_tick(Some(&point), DT, &mut bench, &mut signals);
        assert_eq!(signals.selects().len(), 1);

        bench.ahead = Some(BALL);
        gi.fixed_tick(Some(&point), DT, &mut bench, &mut signals);
        assert_eq!(
            signals.selects(),
            vec![(CUBE, true), (CUBE, false), (BALL, true)]
        );
    }

    #[test]
    fn test_selection_range_limits_pointing() {
        let mut bench = Bench::new();
        let config = InteractionConfig {
            selection_range: 3.0,
            ..InteractionConfig::default()
        };
        let mut gi = GestureInterpreter::new(
            config,
            DeviceMapping::default(),
            ROOT,
            SharedSelection::new(Selection::of(ROOT)),
            &bench,
        )
        .unwrap();
        let mut signals = RecordedSignals::new();

        // CUBE sits 4 units ahead, past the range
        bench.ahead = Some(CUBE);
        let frame = hand(&fingers(1), Vec3::ZERO);
        let report = settle(&mut gi, Some(&frame), &mut bench, &mut signals);
        assert_eq!(report.action, Action::Targeted { target: ROOT, hit: false });
        assert!(signals.events.is_empty());
    }

    #[test]
    fn test_miss_falls_back_to_aggregate() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();
        let point = hand(&fingers(1), Vec3::ZERO);

        bench.ahead = Some(CUBE);
        settle(&mut gi, Some(&point), &mut bench, &mut signals);

        bench.ahead = None;
        let report = gi.fixed_tick(Some(&point), DT, &mut bench, &mut signals);
        assert_eq!(report.action, Action::Targeted { target: ROOT, hit: false });
        assert_eq!(gi.provisional_target(), ROOT);
        // Aggregate is a group: only the leaf is told
        assert_eq!(signals.selects(), vec![(CUBE, true), (CUBE, false)]);
        assert!((gi.pointer().range - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_thumb_never_targets() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();
        bench.ahead = Some(CUBE);

        let thumb = hand(&[FingerKind::Thumb], Vec3::ZERO);
        let report = settle(&mut gi, Some(&thumb), &mut bench, &mut signals);

        assert_eq!(report.action, Action::ThumbIgnored);
        assert_eq!(gi.provisional_target(), ROOT);
        assert!(signals.events.is_empty());
    }

    #[test]
    fn test_abandoned_target_reverts_to_selection() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        gi.selection().set(Selection::of(BALL));
        let mut signals = RecordedSignals::new();

        bench.ahead = Some(CUBE);
        settle(&mut gi, Some(&hand(&fingers(1), Vec3::ZERO)), &mut bench, &mut signals);
        signals.clear();

        // Switch to translate before CUBE's highlight completes
        let translate = hand(&fingers(2), Vec3::ZERO);
        settle(&mut gi, Some(&translate), &mut bench, &mut signals);

        assert_eq!(signals.selects(), vec![(CUBE, false), (BALL, true)]);
        assert_eq!(gi.provisional_target(), BALL);
        assert!(!gi.pointer().is_lit());
    }

    #[test]
    fn test_fist_keeps_provisional_target() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();

        bench.ahead = Some(CUBE);
        settle(&mut gi, Some(&hand(&fingers(1), Vec3::ZERO)), &mut bench, &mut signals);
        signals.clear();

        settle(&mut gi, Some(&hand(&[], Vec3::ZERO)), &mut bench, &mut signals);
        assert_eq!(gi.provisional_target(), CUBE);
        assert!(signals.events.is_empty());
    }

    #[test]
    fn test_deactivate_deselects_leaf_once() {
        let mut bench = Bench::new();
        let mut gi = interpreter(&bench);
        let mut signals = RecordedSignals::new();

        bench.ahead = Some(CUBE);
        settle(&mut gi, Some(&hand(&fingers(1), Vec3::ZERO)), &mut bench, &mut signals);
        signals.clear();

        gi.deactivate(&bench, &mut signals);
        gi.deactivate(&bench, &mut signals);
        assert_eq!(signals.selects(), vec![(CUBE, false)]);
        assert!(!gi.is_active());

        // Inactive interpreters ignore ticks
        let translate = hand(&fingers(2), Vec3::new(1000.0, 0.0, 0.0));
        for _ in 0..10 {
            gi.fixed_tick(Some(&translate), DT, &mut bench, &mut signals);
        }
        assert!(bench.forces.is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn nothing_dispatches_inside_guard(count in 0usize..6, ticks in 1usize..4) {
                let mut bench = Bench::new();
                let mut gi = interpreter(&bench);
                let mut signals = RecordedSignals::new();

                // Establish a different count first
                let other = if count == 2 { 3 } else { 2 };
                let warmup = hand(&fingers(other), Vec3::ZERO);
                settle(&mut gi, Some(&warmup), &mut bench, &mut signals);
                let baseline = bench.mutations();

                // 0.1s delay, 0.02s ticks: the first four ticks stay guarded
                let frame = hand(&fingers(count), Vec3::new(500.0, 0.0, 0.0));
                for _ in 0..ticks {
                    let report = gi.fixed_tick(Some(&frame), DT, &mut bench, &mut signals);
                    prop_assert!(report.guarded);
                }
                prop_assert_eq!(bench.mutations(), baseline);
            }
        }
    }
}
