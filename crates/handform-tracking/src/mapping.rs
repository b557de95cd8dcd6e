//! Device space to world space conversion
//!
//! The device reports millimetres in a right-handed frame centred on the
//! sensor. World space is left-handed metres. The sensor is mounted somewhere
//! in the world, possibly scaled, and positions follow that mount.

use handform_core::{HandformError, HandformResult, Vec3};

/// Device millimetres to world metres
pub const DEVICE_UNIT_SCALE: f32 = 0.001;

/// Placement of the tracking device in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceMapping {
    /// World position of the sensor mount
    pub mount_position: Vec3,
    /// Uniform scale applied to tip positions
    pub scale_factor: f32,
}

impl Default for DeviceMapping {
    fn default() -> Self {
        DeviceMapping {
            mount_position: Vec3::ZERO,
            scale_factor: 1.0,
        }
    }
}

impl DeviceMapping {
    pub fn new(mount_position: Vec3, scale_factor: f32) -> HandformResult<Self> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(HandformError::InvalidConfig(format!(
                "device scale factor must be positive, got {}",
                scale_factor
            )));
        }
        if !mount_position.is_finite() {
            return Err(HandformError::InvalidConfig(
                "device mount position must be finite".into(),
            ));
        }
        Ok(DeviceMapping {
            mount_position,
            scale_factor,
        })
    }

    /// Mapping from the mount's world transform; a non-uniform mount scale is
    /// averaged into one factor
    pub fn from_mount(position: Vec3, local_scale: Vec3) -> HandformResult<Self> {
        Self::new(position, local_scale.mean_component())
    }

    /// Tip position in world space
    pub fn to_world_point(&self, p: Vec3) -> Vec3 {
        device_to_world_units(p) * self.scale_factor + self.mount_position
    }

    /// Pointing direction in world space (handedness flip only)
    pub fn to_world_direction(&self, d: Vec3) -> Vec3 {
        flip_handedness(d)
    }

    /// Tip velocity in world units per second
    ///
    /// Velocities are unit-converted but not mount-scaled, so manipulation
    /// sensitivity does not depend on how large the sensor rig is.
    pub fn to_world_velocity(&self, v: Vec3) -> Vec3 {
        device_to_world_units(v)
    }
}

#[inline]
fn flip_handedness(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, -v.z)
}

#[inline]
fn device_to_world_units(v: Vec3) -> Vec3 {
    flip_handedness(v) * DEVICE_UNIT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_mapping() {
        let mapping = DeviceMapping::new(Vec3::new(0.0, 1.0, 0.0), 2.0).unwrap();

        let world = mapping.to_world_point(Vec3::new(100.0, 200.0, 50.0));
        assert!((world.x - 0.2).abs() < 1e-6);
        assert!((world.y - 1.4).abs() < 1e-6);
        assert!((world.z + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_direction_and_velocity() {
        let mapping = DeviceMapping::new(Vec3::new(5.0, 5.0, 5.0), 10.0).unwrap();

        assert_eq!(
            mapping.to_world_direction(Vec3::new(0.0, 0.0, -1.0)),
            Vec3::new(0.0, 0.0, 1.0)
        );

        // mount offset and scale do not leak into velocities
        let v = mapping.to_world_velocity(Vec3::new(1000.0, 0.0, 500.0));
        assert!((v.x - 1.0).abs() < 1e-6);
        assert!((v.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_from_mount_averages_scale() {
        let mapping = DeviceMapping::from_mount(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert!((mapping.scale_factor - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert!(DeviceMapping::new(Vec3::ZERO, 0.0).is_err());
        assert!(DeviceMapping::new(Vec3::ZERO, -1.0).is_err());
        assert!(DeviceMapping::new(Vec3::ZERO, f32::NAN).is_err());
        assert!(DeviceMapping::new(Vec3::new(f32::INFINITY, 0.0, 0.0), 1.0).is_err());
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offsets_map_without_mount(
                ax in -500.0f32..500.0, ay in 0.0f32..500.0, az in -500.0f32..500.0,
                dx in -50.0f32..50.0, dy in -50.0f32..50.0, dz in -50.0f32..50.0,
                scale in 0.1f32..10.0
            ) {
                let mapping = DeviceMapping::new(Vec3::new(3.0, -1.0, 7.0), scale).unwrap();
                let a = Vec3::new(ax, ay, az);
                let d = Vec3::new(dx, dy, dz);

                let offset = mapping.to_world_point(a + d) - mapping.to_world_point(a);
                let expected = Vec3::new(dx, dy, -dz) * (DEVICE_UNIT_SCALE * scale);
                prop_assert!((offset - expected).length() < 1e-4);
            }
        }
    }
}
