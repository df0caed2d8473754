use glam::Vec3;

use crate::utils::allocator::NodeId;

/// Verlet state of one simulated skeletal node. Velocity is implicit in `position - prev_position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub node: NodeId,
    pub position: Vec3,
    pub prev_position: Vec3,
    /// Offset from the parent node in the authored rest pose, in the parent's local space.
    pub local_rest: Vec3,
    /// Distance to keep from the previous particle. Zero for roots.
    pub target_length: f32,
    pub is_root: bool,
}

impl Particle {
    pub fn root(node: NodeId, position: Vec3) -> Self {
        Self {
            node,
            position,
            prev_position: position,
            local_rest: Vec3::ZERO,
            target_length: 0.0,
            is_root: true,
        }
    }

    pub fn link(node: NodeId, position: Vec3, local_rest: Vec3) -> Self {
        Self {
            node,
            position,
            prev_position: position,
            local_rest,
            target_length: local_rest.length(),
            is_root: false,
        }
    }

    /// Per-step displacement carried by the Verlet history.
    pub fn displacement(&self) -> Vec3 {
        self.position - self.prev_position
    }

    /// Forgets the motion history by pinning both positions to `position`.
    pub fn snap_to(&mut self, position: Vec3) {
        self.position = position;
        self.prev_position = position;
    }
}

/// Ordered particles along one hierarchy path, root first. Always holds at least two particles.
#[derive(Debug, Clone)]
pub struct Chain {
    particles: Vec<Particle>,
}

impl Chain {
    /// Minimum number of particles a chain must have to be simulated.
    pub const MIN_LEN: usize = 2;

    /// Wraps `particles` when they form a valid chain.
    pub fn new(particles: Vec<Particle>) -> Option<Self> {
        (particles.len() >= Self::MIN_LEN).then_some(Self { particles })
    }

    pub fn root(&self) -> &Particle {
        &self.particles[0]
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.particles.iter().map(|p| p.node)
    }
}
