//! Host engine collaborators
//!
//! Handform never owns a scene, a physics world or a renderer. The host engine
//! implements these traits and hands itself to the interpreter and the
//! highlighters on every tick.

use crate::{Color, LayerMask, ObjectId, Ray, Vec3};

/// Squared-velocity threshold below which a body counts as resting
pub const STOPPED_VELOCITY_SQ: f32 = 0.01;

/// Result of a successful ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub object: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

/// Scene graph queries
pub trait SceneQuery {
    /// Nearest hit along `ray` within `max_distance`, restricted to `layers`
    fn raycast(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<RayHit>;

    /// Number of direct children, `None` if the object does not exist
    fn child_count(&self, object: ObjectId) -> Option<usize>;

    /// Leaf objects are individual interactables; groups have children.
    /// Unknown objects are not leaves.
    fn is_leaf(&self, object: ObjectId) -> bool {
        self.child_count(object) == Some(0)
    }
}

/// Object transforms
pub trait Transforms {
    fn local_scale(&self, object: ObjectId) -> Option<Vec3>;

    fn set_local_scale(&mut self, object: ObjectId, scale: Vec3);
}

/// Rigid-body physics. Integration itself belongs to the host.
pub trait RigidBodies {
    fn has_rigid_body(&self, body: ObjectId) -> bool;

    /// Continuous force, applied over the next physics step
    fn add_force(&mut self, body: ObjectId, force: Vec3);

    /// Continuous torque, applied over the next physics step
    fn add_torque(&mut self, body: ObjectId, torque: Vec3);

    fn set_kinematic(&mut self, body: ObjectId, kinematic: bool);

    fn is_kinematic(&self, body: ObjectId) -> bool;

    fn linear_velocity(&self, body: ObjectId) -> Vec3;

    fn angular_velocity(&self, body: ObjectId) -> Vec3;

    /// Advance the physics world by `dt` seconds
    fn integrate(&mut self, dt: f32);

    /// Whether the body has effectively come to rest
    fn has_stopped(&self, body: ObjectId) -> bool {
        let linear = self.linear_velocity(body).length_squared();
        let angular = self.angular_velocity(body).length_squared();
        linear + angular < STOPPED_VELOCITY_SQ
    }
}

/// Material color access
pub trait Renderers {
    fn color(&self, object: ObjectId) -> Option<Color>;

    fn set_color(&mut self, object: ObjectId, color: Color);
}

/// One-shot audio feedback
pub trait AudioCues {
    fn play_selection_cue(&mut self, object: ObjectId, pitch: f32);
}

/// Everything Handform needs from the host engine
pub trait Host: SceneQuery + Transforms + RigidBodies + Renderers + AudioCues {}

impl<T> Host for T where T: SceneQuery + Transforms + RigidBodies + Renderers + AudioCues {}
