//! In-memory host world
//!
//! Objects form a parent/child tree. Bodies are spheres integrated with
//! explicit Euler steps and linear damping; kinematic children ride along
//! with their parent. Every force, torque, scale, kinematic and cue call is
//! recorded in order.

use std::collections::BTreeMap;

use handform_core::{
    AudioCues, Color, LayerMask, ObjectId, Ray, RayHit, Renderers, RigidBodies, SceneQuery,
    Transforms, Vec3,
};

/// Rigid body state
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    /// Collision sphere radius at unit scale; 0 means no collider
    pub radius: f32,
    pub mass: f32,
    pub linear: Vec3,
    pub angular: Vec3,
    pub kinematic: bool,
    pending_force: Vec3,
    pending_torque: Vec3,
}

impl Body {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Body {
            position,
            radius,
            mass: 1.0,
            linear: Vec3::ZERO,
            angular: Vec3::ZERO,
            kinematic: false,
            pending_force: Vec3::ZERO,
            pending_torque: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorldObject {
    pub parent: Option<ObjectId>,
    pub children: Vec<ObjectId>,
    pub layer: u8,
    pub scale: Vec3,
    pub color: Option<Color>,
    pub body: Option<Body>,
}

/// Recorded host call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    Force { body: ObjectId, force: Vec3 },
    Torque { body: ObjectId, torque: Vec3 },
    Scale { object: ObjectId, scale: Vec3 },
    Kinematic { body: ObjectId, kinematic: bool },
    Cue { object: ObjectId, pitch: f32 },
}

#[derive(Debug, Clone)]
pub struct MockWorld {
    objects: BTreeMap<ObjectId, WorldObject>,
    /// Fraction of velocity lost per second
    pub damping: f32,
    pub events: Vec<WorldEvent>,
    /// Simulated seconds
    pub time: f32,
}

impl Default for MockWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorld {
    pub fn new() -> Self {
        MockWorld {
            objects: BTreeMap::new(),
            damping: 2.0,
            events: Vec::new(),
            time: 0.0,
        }
    }

    /// Add a parent object with a collider-less dynamic body
    pub fn with_group(mut self, id: ObjectId, position: Vec3) -> Self {
        self.objects.insert(
            id,
            WorldObject {
                parent: None,
                children: Vec::new(),
                layer: 0,
                scale: Vec3::ONE,
                color: None,
                body: Some(Body::new(position, 0.0)),
            },
        );
        self
    }

    /// Add a white, kinematic sphere under `parent` on collision `layer`
    pub fn with_leaf(
        mut self,
        id: ObjectId,
        parent: ObjectId,
        position: Vec3,
        radius: f32,
        layer: u8,
    ) -> Self {
        let mut body = Body::new(position, radius);
        body.kinematic = true;
        self.objects.insert(
            id,
            WorldObject {
                parent: Some(parent),
                children: Vec::new(),
                layer,
                scale: Vec3::ONE,
                color: Some(Color::WHITE),
                body: Some(body),
            },
        );
        if let Some(p) = self.objects.get_mut(&parent) {
            p.children.push(id);
        }
        self
    }

    pub fn without_renderer(mut self, id: ObjectId) -> Self {
        if let Some(object) = self.objects.get_mut(&id) {
            object.color = None;
        }
        self
    }

    pub fn without_body(mut self, id: ObjectId) -> Self {
        if let Some(object) = self.objects.get_mut(&id) {
            object.body = None;
        }
        self
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    pub fn body(&self, id: ObjectId) -> Option<&Body> {
        self.objects.get(&id).and_then(|o| o.body.as_ref())
    }

    pub fn body_mut(&mut self, id: ObjectId) -> Option<&mut Body> {
        self.objects.get_mut(&id).and_then(|o| o.body.as_mut())
    }

    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.body(id).map(|b| b.position)
    }

    pub fn forces_on(&self, id: ObjectId) -> Vec<Vec3> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WorldEvent::Force { body, force } if *body == id => Some(*force),
                _ => None,
            })
            .collect()
    }

    pub fn torques_on(&self, id: ObjectId) -> Vec<Vec3> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WorldEvent::Torque { body, torque } if *body == id => Some(*torque),
                _ => None,
            })
            .collect()
    }

    pub fn cues(&self) -> Vec<(ObjectId, f32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WorldEvent::Cue { object, pitch } => Some((*object, *pitch)),
                _ => None,
            })
            .collect()
    }

    /// Events recorded since index `mark`
    pub fn events_since(&self, mark: usize) -> &[WorldEvent] {
        self.events.get(mark..).unwrap_or(&[])
    }

    fn sphere_hit(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
        let oc = ray.origin - center;
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let near = -b - root;
        let t = if near >= 0.0 { near } else { -b + root };
        (t >= 0.0).then_some(t)
    }
}

impl SceneQuery for MockWorld {
    fn raycast(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<RayHit> {
        if ray.is_degenerate() {
            return None;
        }
        self.objects
            .iter()
            .filter(|(_, o)| layers.contains(o.layer))
            .filter_map(|(id, o)| {
                let body = o.body.as_ref()?;
                if body.radius <= 0.0 {
                    return None;
                }
                let radius = body.radius * o.scale.mean_component();
                let t = Self::sphere_hit(ray, body.position, radius)?;
                (t <= max_distance).then(|| RayHit {
                    object: *id,
                    distance: t,
                    point: ray.at(t),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn child_count(&self, object: ObjectId) -> Option<usize> {
        self.objects.get(&object).map(|o| o.children.len())
    }
}

impl Transforms for MockWorld {
    fn local_scale(&self, object: ObjectId) -> Option<Vec3> {
        self.objects.get(&object).map(|o| o.scale)
    }

    fn set_local_scale(&mut self, object: ObjectId, scale: Vec3) {
        if let Some(o) = self.objects.get_mut(&object) {
            o.scale = scale;
            self.events.push(WorldEvent::Scale { object, scale });
        }
    }
}

impl RigidBodies for MockWorld {
    fn has_rigid_body(&self, body: ObjectId) -> bool {
        self.body(body).is_some()
    }

    fn add_force(&mut self, body: ObjectId, force: Vec3) {
        if let Some(b) = self.body_mut(body) {
            b.pending_force += force;
            self.events.push(WorldEvent::Force { body, force });
        }
    }

    fn add_torque(&mut self, body: ObjectId, torque: Vec3) {
        if let Some(b) = self.body_mut(body) {
            b.pending_torque += torque;
            self.events.push(WorldEvent::Torque { body, torque });
        }
    }

    fn set_kinematic(&mut self, body: ObjectId, kinematic: bool) {
        if let Some(b) = self.body_mut(body) {
            b.kinematic = kinematic;
            if kinematic {
                b.linear = Vec3::ZERO;
                b.angular = Vec3::ZERO;
            }
            self.events.push(WorldEvent::Kinematic { body, kinematic });
        }
    }

    fn is_kinematic(&self, body: ObjectId) -> bool {
        self.body(body).map_or(false, |b| b.kinematic)
    }

    fn linear_velocity(&self, body: ObjectId) -> Vec3 {
        self.body(body).map_or(Vec3::ZERO, |b| b.linear)
    }

    fn angular_velocity(&self, body: ObjectId) -> Vec3 {
        self.body(body).map_or(Vec3::ZERO, |b| b.angular)
    }

    fn integrate(&mut self, dt: f32) {
        let keep = (1.0 - self.damping * dt).max(0.0);
        let mut moved = BTreeMap::new();

        for (id, o) in self.objects.iter_mut() {
            let Some(b) = o.body.as_mut() else { continue };
            let force = std::mem::replace(&mut b.pending_force, Vec3::ZERO);
            let torque = std::mem::replace(&mut b.pending_torque, Vec3::ZERO);
            if b.kinematic {
                continue;
            }
            b.linear += force / b.mass * dt;
            b.angular += torque / b.mass * dt;
            let delta = b.linear * dt;
            b.position += delta;
            b.linear = b.linear * keep;
            b.angular = b.angular * keep;
            moved.insert(*id, delta);
        }

        // Kinematic children follow their parent
        for o in self.objects.values_mut() {
            let Some(delta) = o.parent.and_then(|p| moved.get(&p)) else {
                continue;
            };
            if let Some(b) = o.body.as_mut().filter(|b| b.kinematic) {
                b.position += *delta;
            }
        }

        self.time += dt;
    }
}

impl Renderers for MockWorld {
    fn color(&self, object: ObjectId) -> Option<Color> {
        self.objects.get(&object).and_then(|o| o.color)
    }

    fn set_color(&mut self, object: ObjectId, color: Color) {
        if let Some(c) = self.objects.get_mut(&object).and_then(|o| o.color.as_mut()) {
            *c = color;
        }
    }
}

impl AudioCues for MockWorld {
    fn play_selection_cue(&mut self, object: ObjectId, pitch: f32) {
        self.events.push(WorldEvent::Cue { object, pitch });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: ObjectId = ObjectId(1);
    const A: ObjectId = ObjectId(2);
    const B: ObjectId = ObjectId(3);

    fn world() -> MockWorld {
        MockWorld::new()
            .with_group(ROOT, Vec3::ZERO)
            .with_leaf(A, ROOT, Vec3::new(0.0, 0.0, 3.0), 0.5, 8)
            .with_leaf(B, ROOT, Vec3::new(0.0, 0.0, 6.0), 0.5, 8)
    }

    #[test]
    fn test_raycast_nearest_and_layers() {
        let world = world();
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);

        let hit = world.raycast(&ray, 100.0, LayerMask::layer(8)).unwrap();
        assert_eq!(hit.object, A);
        assert!((hit.distance - 2.5).abs() < 1e-5);
        assert!((hit.point.z - 2.5).abs() < 1e-5);

        assert!(world.raycast(&ray, 2.0, LayerMask::layer(8)).is_none());
        assert!(world.raycast(&ray, 100.0, LayerMask::layer(3)).is_none());
        assert!(world
            .raycast(&Ray::new(Vec3::ZERO, Vec3::UP), 100.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn test_scaled_sphere_grows() {
        let mut world = world();
        world.set_local_scale(A, Vec3::splat(2.0));
        let hit = world
            .raycast(&Ray::new(Vec3::ZERO, Vec3::FORWARD), 100.0, LayerMask::ALL)
            .unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_tree_shape() {
        let world = world();
        assert_eq!(world.child_count(ROOT), Some(2));
        assert!(world.is_leaf(A));
        assert!(!world.is_leaf(ROOT));
        assert_eq!(world.child_count(ObjectId(77)), None);
    }

    #[test]
    fn test_force_moves_dynamic_body_and_children_follow() {
        let mut world = world();
        world.add_force(ROOT, Vec3::new(10.0, 0.0, 0.0));
        world.integrate(0.1);

        let root = world.position(ROOT).unwrap();
        assert!(root.x > 0.0);
        assert_eq!(world.position(A).unwrap().x, root.x);

        // Force is consumed by one step; damping then slows the body
        let v1 = world.linear_velocity(ROOT).length();
        world.integrate(0.1);
        assert!(world.linear_velocity(ROOT).length() < v1);
        assert_eq!(world.forces_on(ROOT), vec![Vec3::new(10.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_kinematic_body_ignores_force() {
        let mut world = world();
        world.add_force(A, Vec3::new(0.0, 5.0, 0.0));
        world.integrate(0.1);
        assert_eq!(world.position(A), Some(Vec3::new(0.0, 0.0, 3.0)));

        world.set_kinematic(A, false);
        world.add_force(A, Vec3::new(0.0, 5.0, 0.0));
        world.integrate(0.1);
        assert!(world.position(A).unwrap().y > 0.0);
        assert!(!world.has_stopped(A));
    }

    #[test]
    fn test_damping_brings_body_to_rest() {
        let mut world = world();
        world.add_force(ROOT, Vec3::new(0.0, 0.0, 50.0));
        for _ in 0..200 {
            world.integrate(0.02);
        }
        assert!(world.has_stopped(ROOT));
    }
}
