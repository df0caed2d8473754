use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, orientation, and non-uniform scale of a skeletal node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Applies a child's local transform on top of this one, returning the child's world transform.
    pub fn combine(&self, local: &Transform) -> Transform {
        Transform {
            position: self.transform_point(local.position),
            rotation: (self.rotation * local.rotation).normalize(),
            scale: self.scale * local.scale,
        }
    }

    /// Maps a point from this transform's local space into the parent space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    /// Maps a point from the parent space into this transform's local space.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        (self.rotation.inverse() * (point - self.position)) / self.scale
    }

    /// Expresses `world` relative to this transform, so that `self.combine(&result) == world`.
    pub fn relative(&self, world: &Transform) -> Transform {
        Transform {
            position: self.inverse_transform_point(world.position),
            rotation: (self.rotation.inverse() * world.rotation).normalize(),
            scale: world.scale / self.scale,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            rotation: self.rotation,
        }
    }
}

/// World position and orientation of a node, the unit the blend controller snapshots and writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn combine_then_relative_round_trips_local_offset() {
        let parent = Transform {
            position: Vec3::new(1.0, 2.0, 0.0),
            rotation: Quat::from_rotation_z(FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let local = Transform::from_position(Vec3::new(0.5, 0.0, 0.0));
        let world = parent.combine(&local);

        // X axis rotated onto Y, scaled by two.
        assert_relative_eq!(world.position.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(world.position.y, 3.0, epsilon = 1e-5);

        let back = parent.relative(&world);
        assert_relative_eq!(back.position.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(back.position.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn non_finite_components_are_detected() {
        let mut transform = Transform::default();
        assert!(transform.is_finite());
        transform.position.y = f32::NAN;
        assert!(!transform.is_finite());
    }
}
