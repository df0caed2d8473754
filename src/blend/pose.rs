//! Pose snapshots and the blend primitive shared by every transition frame.

use crate::{
    core::{skeleton::Skeleton, types::Pose},
    utils::allocator::NodeId,
};

/// Interpolates positions linearly and orientations spherically. `t` = 0 yields `from`.
pub fn interpolate(from: &Pose, to: &Pose, t: f32) -> Pose {
    Pose {
        position: from.position.lerp(to.position, t),
        rotation: from.rotation.slerp(to.rotation, t),
    }
}

/// World pose of one physics-capable node, captured when a transition starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneSnapshot {
    pub node: NodeId,
    pub pose: Pose,
}

impl BoneSnapshot {
    pub fn capture(skeleton: &Skeleton, node: NodeId) -> Option<Self> {
        skeleton
            .world_pose(node)
            .map(|pose| BoneSnapshot { node, pose })
    }

    /// Blends this snapshot toward the node's live pose.
    pub fn blend_toward(&self, live: &Pose, t: f32) -> Pose {
        interpolate(&self.pose, live, t)
    }
}
