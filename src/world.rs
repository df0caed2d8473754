use glam::Vec3;

use crate::{
    blend::controller::BlendController,
    config::{BlendConfig, SpringChainConfig, DEFAULT_GRAVITY},
    core::skeleton::Skeleton,
    dynamics::spring_chain::SpringChainSimulator,
    error::Result,
    utils::{
        allocator::{Arena, EntityId, NodeId},
        logging::ScopedTimer,
    },
};

/// Rig components attached to one character entity.
#[derive(Default)]
pub struct Rig {
    pub simulator: Option<SpringChainSimulator>,
    pub controller: Option<BlendController>,
}

/// Central container holding the host skeleton and every rig's components.
///
/// Per frame the host runs its animation system, then its physics system, then
/// [`post_update`](Self::post_update), which steps all spring chains and then all blend controllers.
pub struct RigWorld {
    pub skeleton: Skeleton,
    pub gravity: Vec3,
    rigs: Arena<Rig>,
}

impl Default for RigWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RigWorld {
    pub fn new() -> Self {
        Self::with_skeleton(Skeleton::new())
    }

    pub fn with_skeleton(skeleton: Skeleton) -> Self {
        Self {
            skeleton,
            gravity: Vec3::from_slice(&DEFAULT_GRAVITY),
            rigs: Arena::new(),
        }
    }

    pub fn spawn_rig(&mut self) -> EntityId {
        self.rigs.insert(Rig::default())
    }

    pub fn despawn_rig(&mut self, id: EntityId) -> Option<Rig> {
        self.rigs.remove(id)
    }

    pub fn rig(&self, id: EntityId) -> Option<&Rig> {
        self.rigs.get(id)
    }

    pub fn rig_mut(&mut self, id: EntityId) -> Option<&mut Rig> {
        self.rigs.get_mut(id)
    }

    pub fn rig_count(&self) -> usize {
        self.rigs.len()
    }

    /// Attaches a spring chain simulator built from `nodes` and returns its chain count.
    ///
    /// The simulator stays attached when discovery fails, inert until reinitialized.
    pub fn attach_simulator(
        &mut self,
        id: EntityId,
        nodes: &[NodeId],
        config: SpringChainConfig,
    ) -> Option<Result<usize>> {
        let rig = self.rigs.get_mut(id)?;
        let mut simulator = SpringChainSimulator::new(config);
        let outcome = simulator.initialize(&self.skeleton, nodes);
        rig.simulator = Some(simulator);
        Some(outcome)
    }

    /// Attaches `controller` to the rig, replacing any previous one.
    pub fn attach_controller(
        &mut self,
        id: EntityId,
        controller: BlendController,
    ) -> Option<&mut BlendController> {
        let rig = self.rigs.get_mut(id)?;
        rig.controller = Some(controller);
        rig.controller.as_mut()
    }

    /// Convenience for attaching a controller with no-op authorities.
    pub fn attach_default_controller(
        &mut self,
        id: EntityId,
        bones: Vec<NodeId>,
        config: BlendConfig,
    ) -> Option<&mut BlendController> {
        self.attach_controller(id, BlendController::new(bones, config))
    }

    pub fn simulator_mut(&mut self, id: EntityId) -> Option<&mut SpringChainSimulator> {
        self.rigs.get_mut(id)?.simulator.as_mut()
    }

    pub fn controller(&self, id: EntityId) -> Option<&BlendController> {
        self.rigs.get(id)?.controller.as_ref()
    }

    pub fn controller_mut(&mut self, id: EntityId) -> Option<&mut BlendController> {
        self.rigs.get_mut(id)?.controller.as_mut()
    }

    /// Starts a blend on the rig's controller. Returns false when the rig has none.
    pub fn begin_transition(&mut self, id: EntityId, to_physics: bool, duration: Option<f32>) -> bool {
        let Some(controller) = self
            .rigs
            .get_mut(id)
            .and_then(|rig| rig.controller.as_mut())
        else {
            return false;
        };
        controller.begin_transition(&self.skeleton, to_physics, duration);
        true
    }

    pub fn set_immediate(&mut self, id: EntityId, to_physics: bool) -> bool {
        match self.controller_mut(id) {
            Some(controller) => {
                controller.set_immediate(to_physics);
                true
            }
            None => false,
        }
    }

    pub fn reset_simulation(&mut self, id: EntityId) -> bool {
        let Some(simulator) = self
            .rigs
            .get_mut(id)
            .and_then(|rig| rig.simulator.as_mut())
        else {
            return false;
        };
        simulator.reset(&self.skeleton);
        true
    }

    /// Re-runs chain discovery for the rig's simulator, e.g. after the skeleton was rebuilt.
    pub fn reinitialize_simulator(&mut self, id: EntityId) -> Option<Result<usize>> {
        let simulator = self.rigs.get_mut(id)?.simulator.as_mut()?;
        Some(simulator.reinitialize(&self.skeleton))
    }

    /// Runs this crate's writes for the frame: every spring chain, then every blend controller.
    pub fn post_update(&mut self, dt: f32) {
        {
            let _timer = ScopedTimer::new("spring_chains::step");
            for (_, rig) in self.rigs.iter_mut() {
                if let Some(simulator) = rig.simulator.as_mut() {
                    simulator.step(&mut self.skeleton, dt, self.gravity);
                }
            }
        }
        {
            let _timer = ScopedTimer::new("blend_controllers::update");
            for (_, rig) in self.rigs.iter_mut() {
                if let Some(controller) = rig.controller.as_mut() {
                    controller.update(&mut self.skeleton, dt);
                }
            }
        }
    }
}
