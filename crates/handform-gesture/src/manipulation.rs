//! Velocity-driven manipulation math
//!
//! Pure functions, kept apart from the interpreter so the transform rules can
//! be checked without a host.

use handform_core::Vec3;
use handform_tracking::{DeviceMapping, TrackingFrame};

/// Arithmetic mean of the extended tips' world velocities
pub fn mean_velocity(frame: &TrackingFrame, mapping: &DeviceMapping) -> Vec3 {
    let (sum, count) = frame
        .extended()
        .fold((Vec3::ZERO, 0usize), |(sum, n), tip| {
            (sum + mapping.to_world_velocity(tip.velocity), n + 1)
        });
    if count == 0 {
        Vec3::ZERO
    } else {
        sum / count as f32
    }
}

/// Continuous force for the translate stance
pub fn translation_force(mean_velocity: Vec3, sensitivity: f32) -> Vec3 {
    mean_velocity * sensitivity
}

/// Continuous torque for the rotate stance: about the axis perpendicular to
/// both the mean velocity and world down (right-hand rule)
pub fn rotation_torque(mean_velocity: Vec3, sensitivity: f32) -> Vec3 {
    mean_velocity.cross(Vec3::DOWN) * sensitivity
}

/// New scale for the scale stance
///
/// Only the depth component of the velocity counts. The result moves from
/// `current` toward `current * (1 + vz)` by a blend of `sensitivity * dt`,
/// clamped to [0, 1]. The blend is linear in `dt`, so the smoothing depends
/// on the tick rate.
pub fn scaled(current: Vec3, vz: f32, sensitivity: f32, dt: f32) -> Vec3 {
    let target = current * (1.0 + vz);
    current.lerp(target, sensitivity * dt)
}
