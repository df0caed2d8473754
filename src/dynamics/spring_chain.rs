//! Verlet spring simulation for terminal bone chains without native dynamics (hair, tails, straps).
//!
//! Each frame the root of every chain follows its node, and each following particle is
//! integrated, pulled toward its rest offset, projected back to its segment length, and blended
//! onto its node by the configured influence. Particles are processed strictly root to tip in a
//! single pass; a particle only sees the already-updated position of the one before it.

use glam::Vec3;

use super::discovery::discover_chains;
use crate::{
    config::SpringChainConfig,
    core::{particle::Chain, skeleton::Skeleton, types::Transform},
    error::{Result, SetupError},
    utils::{allocator::NodeId, logging::Diagnostics},
};

pub struct SpringChainSimulator {
    config: SpringChainConfig,
    source_nodes: Vec<NodeId>,
    chains: Vec<Chain>,
    enabled: bool,
    diagnostics: Diagnostics<SetupError>,
}

impl SpringChainSimulator {
    pub fn new(config: SpringChainConfig) -> Self {
        Self {
            config: config.sanitized(),
            source_nodes: Vec::new(),
            chains: Vec::new(),
            enabled: true,
            diagnostics: Diagnostics::new("SpringChainSimulator"),
        }
    }

    /// Activates the simulator on the bones of one skinned skeleton and returns the chain count.
    ///
    /// On failure the simulator is left inactive; the error is logged and returned.
    pub fn initialize(&mut self, skeleton: &Skeleton, nodes: &[NodeId]) -> Result<usize> {
        self.source_nodes = nodes.to_vec();
        self.reinitialize(skeleton)
    }

    /// Re-runs chain discovery on the node set given to [`initialize`](Self::initialize).
    pub fn reinitialize(&mut self, skeleton: &Skeleton) -> Result<usize> {
        self.chains.clear();
        self.diagnostics.clear();

        match discover_chains(skeleton, &self.source_nodes) {
            Ok(chains) => {
                self.chains = chains;
                Ok(self.chains.len())
            }
            Err(err) => {
                log::warn!("[SpringChainSimulator] setup failed: {err}");
                Err(err)
            }
        }
    }

    /// Discards all chains; the simulator stays inert until reinitialized.
    pub fn deactivate(&mut self) {
        self.chains.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.chains.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling snaps every particle to its node so re-enabling starts without carried motion.
    pub fn set_enabled(&mut self, skeleton: &Skeleton, enabled: bool) {
        if self.enabled && !enabled {
            self.reset(skeleton);
        }
        self.enabled = enabled;
    }

    pub fn config(&self) -> &SpringChainConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SpringChainConfig) {
        self.config = config.sanitized();
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn source_nodes(&self) -> &[NodeId] {
        &self.source_nodes
    }

    pub fn diagnostics(&self) -> &Diagnostics<SetupError> {
        &self.diagnostics
    }

    /// Snaps every particle to its node's live position and clears the motion history.
    ///
    /// Call after teleporting the character so the next step carries no velocity spike.
    pub fn reset(&mut self, skeleton: &Skeleton) {
        for chain in &mut self.chains {
            for particle in chain.particles_mut() {
                if let Some(live) = skeleton.world_position(particle.node) {
                    particle.snap_to(live);
                }
            }
        }
    }

    /// Advances every chain by `dt` seconds under `gravity` and writes the result to the skeleton.
    ///
    /// Does nothing while inactive, disabled, at zero influence, or when `dt` is not positive.
    pub fn step(&mut self, skeleton: &mut Skeleton, dt: f32, gravity: Vec3) {
        if !self.enabled || self.chains.is_empty() || self.config.influence <= 0.0 {
            return;
        }
        if dt.is_nan() || dt <= 0.0 {
            return;
        }

        let gravity_step = gravity * self.config.gravity_scale * dt * dt;
        for chain in &mut self.chains {
            if let Err(cause) = step_chain(chain, skeleton, &self.config, gravity_step) {
                self.diagnostics
                    .warn_once(cause, format!("skipping chain this frame: {cause}"));
            }
        }
    }
}

fn step_chain(
    chain: &mut Chain,
    skeleton: &mut Skeleton,
    config: &SpringChainConfig,
    gravity_step: Vec3,
) -> Result<()> {
    let particles = chain.particles_mut();

    let root = &mut particles[0];
    let live = skeleton
        .world_position(root.node)
        .ok_or(SetupError::StaleNode(root.node))?;
    if !live.is_finite() {
        return Err(SetupError::InvalidTransform(root.node));
    }
    root.prev_position = root.position;
    root.position = live;

    for i in 1..particles.len() {
        let (head, tail) = particles.split_at_mut(i);
        let parent_position = head[i - 1].position;
        let particle = &mut tail[0];

        let parent_world = parent_world(skeleton, particle.node)?;
        let rest_target = parent_world.transform_point(particle.local_rest);

        let velocity = particle.displacement() * (1.0 - config.damping) + gravity_step;
        let spring = (rest_target - particle.position) * config.stiffness;

        particle.prev_position = particle.position;
        particle.position += velocity + spring;

        if particle.target_length > 0.0 {
            let to_parent = parent_position - particle.position;
            let distance = to_parent.length();
            if distance > 0.0 {
                particle.position = parent_position - to_parent / distance * particle.target_length;
            }
        }

        let before = skeleton
            .world_position(particle.node)
            .ok_or(SetupError::StaleNode(particle.node))?;
        skeleton.set_world_position(
            particle.node,
            before.lerp(particle.position, config.influence),
        );
    }
    Ok(())
}

fn parent_world(skeleton: &Skeleton, node: NodeId) -> Result<Transform> {
    let parent = skeleton.parent(node).ok_or(SetupError::StaleNode(node))?;
    let world = skeleton
        .world(parent)
        .ok_or(SetupError::StaleNode(parent))?;
    if world.is_finite() {
        Ok(world)
    } else {
        Err(SetupError::InvalidTransform(parent))
    }
}
