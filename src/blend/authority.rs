//! Seams to the external systems that own a node's output when the blend controller is idle.

use crate::utils::allocator::NodeId;

/// Opaque handle to an animation trigger returned by [`AnimationAuthority::find_trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub u32);

/// The keyframed animation system driving a skeleton.
pub trait AnimationAuthority: Send {
    fn name(&self) -> &str;

    /// Enables or disables animation output for the whole skeleton.
    fn set_enabled(&mut self, enabled: bool);

    /// Looks up a trigger input by name. `None` when the animation setup has no such input.
    fn find_trigger(&self, _name: &str) -> Option<TriggerId> {
        None
    }

    fn fire_trigger(&mut self, _trigger: TriggerId) {}
}

/// The rigid-body system owning the physics-capable nodes.
pub trait PhysicsAuthority: Send {
    fn name(&self) -> &str;

    /// While kinematic a body is excluded from simulation and follows its node.
    fn set_kinematic(&mut self, node: NodeId, kinematic: bool);
}

/// Animation authority that ignores every request.
#[derive(Debug, Default)]
pub struct NoopAnimation;

impl AnimationAuthority for NoopAnimation {
    fn name(&self) -> &str {
        "noop-animation"
    }

    fn set_enabled(&mut self, _enabled: bool) {}
}

/// Physics authority that ignores every request.
#[derive(Debug, Default)]
pub struct NoopPhysics;

impl PhysicsAuthority for NoopPhysics {
    fn name(&self) -> &str {
        "noop-physics"
    }

    fn set_kinematic(&mut self, _node: NodeId, _kinematic: bool) {}
}
