//! State machine blending an articulated skeleton between animation and rigid-body pose.
//!
//! A transition flips authority once when it starts and then, on every [`BlendController::update`],
//! overrides each physics-capable node with a blend between the pose captured at the start and
//! whatever the now active authority wrote this frame. `update` must therefore run after both
//! the animation and the physics systems have written their output.

use serde::{Deserialize, Serialize};

use super::{
    authority::{AnimationAuthority, NoopAnimation, NoopPhysics, PhysicsAuthority},
    pose::BoneSnapshot,
};
use crate::{
    config::BlendConfig,
    core::skeleton::Skeleton,
    error::SetupError,
    utils::{allocator::NodeId, logging::Diagnostics},
};

/// Which authority owns the skeleton, or which way it is blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BlendState {
    #[default]
    Animated,
    BlendingToPhysics,
    Physics,
    BlendingToAnimated,
}

impl BlendState {
    pub fn is_blending(self) -> bool {
        matches!(self, BlendState::BlendingToPhysics | BlendState::BlendingToAnimated)
    }

    fn blending(to_physics: bool) -> Self {
        if to_physics {
            BlendState::BlendingToPhysics
        } else {
            BlendState::BlendingToAnimated
        }
    }

    fn terminal(to_physics: bool) -> Self {
        if to_physics {
            BlendState::Physics
        } else {
            BlendState::Animated
        }
    }
}

/// In-flight transition. Dropping it is the whole cancellation story.
#[derive(Debug, Clone)]
struct Transition {
    to_physics: bool,
    duration: f32,
    elapsed: f32,
    start_weight: f32,
    target_weight: f32,
    snapshots: Vec<BoneSnapshot>,
}

impl Transition {
    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    fn weight(&self) -> f32 {
        self.start_weight + (self.target_weight - self.start_weight) * self.progress()
    }
}

pub struct BlendController {
    config: BlendConfig,
    bones: Vec<NodeId>,
    state: BlendState,
    weight: f32,
    transition: Option<Transition>,
    animation: Box<dyn AnimationAuthority>,
    physics: Box<dyn PhysicsAuthority>,
    diagnostics: Diagnostics<SetupError>,
}

impl BlendController {
    /// Creates a controller over the physics-capable `bones`, starting fully animated.
    pub fn new(bones: Vec<NodeId>, config: BlendConfig) -> Self {
        let mut controller = Self {
            config: config.sanitized(),
            bones,
            state: BlendState::Animated,
            weight: 0.0,
            transition: None,
            animation: Box::new(NoopAnimation),
            physics: Box::new(NoopPhysics),
            diagnostics: Diagnostics::new("BlendController"),
        };
        if controller.bones.is_empty() {
            controller
                .diagnostics
                .warn_once(SetupError::NoPhysicsBodies, SetupError::NoPhysicsBodies);
        }
        controller.apply_authority(false);
        controller
    }

    /// Installs the animation system and hands it the current authority.
    pub fn with_animation<A>(mut self, animation: A) -> Self
    where
        A: AnimationAuthority + 'static,
    {
        self.set_animation(animation);
        self
    }

    /// Installs the physics system and hands it the current authority.
    pub fn with_physics<P>(mut self, physics: P) -> Self
    where
        P: PhysicsAuthority + 'static,
    {
        self.set_physics(physics);
        self
    }

    pub fn set_animation<A>(&mut self, animation: A)
    where
        A: AnimationAuthority + 'static,
    {
        self.animation = Box::new(animation);
        self.apply_authority(self.is_physics());
    }

    pub fn set_physics<P>(&mut self, physics: P)
    where
        P: PhysicsAuthority + 'static,
    {
        self.physics = Box::new(physics);
        self.apply_authority(self.is_physics());
    }

    pub fn animation_name(&self) -> &str {
        self.animation.name()
    }

    pub fn physics_name(&self) -> &str {
        self.physics.name()
    }

    pub fn state(&self) -> BlendState {
        self.state
    }

    /// 0 = fully animated, 1 = fully physics.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// True while physics owns the skeleton or the skeleton is blending toward it.
    pub fn is_physics(&self) -> bool {
        matches!(self.state, BlendState::Physics | BlendState::BlendingToPhysics)
    }

    pub fn bones(&self) -> &[NodeId] {
        &self.bones
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BlendConfig) {
        self.config = config.sanitized();
    }

    pub fn begin_to_physics(&mut self, skeleton: &Skeleton, duration: Option<f32>) {
        self.begin_transition(skeleton, true, duration);
    }

    pub fn begin_to_animation(&mut self, skeleton: &Skeleton, duration: Option<f32>) {
        self.begin_transition(skeleton, false, duration);
    }

    /// Starts a blend toward physics or animation, replacing any transition in flight.
    ///
    /// `None` uses the configured default duration; a non-positive duration completes on the
    /// next [`update`](Self::update). The weight continues from its current value.
    pub fn begin_transition(&mut self, skeleton: &Skeleton, to_physics: bool, duration: Option<f32>) {
        self.cancel_transition();

        let duration = match duration {
            None => self.config.default_duration,
            Some(seconds) if seconds.is_finite() => seconds.max(0.0),
            Some(_) => 0.0,
        };

        let mut snapshots = Vec::with_capacity(self.bones.len());
        for &bone in &self.bones {
            match BoneSnapshot::capture(skeleton, bone) {
                Some(snapshot) => snapshots.push(snapshot),
                None => {
                    self.diagnostics.warn_once(
                        SetupError::StaleNode(bone),
                        format!("bone left out of blend: {}", SetupError::StaleNode(bone)),
                    );
                }
            }
        }

        self.apply_authority(to_physics);
        self.state = BlendState::blending(to_physics);
        self.transition = Some(Transition {
            to_physics,
            duration,
            elapsed: 0.0,
            start_weight: self.weight,
            target_weight: if to_physics { 1.0 } else { 0.0 },
            snapshots,
        });
        log::debug!(
            "blend toward {} over {duration}s from weight {}",
            if to_physics { "physics" } else { "animation" },
            self.weight
        );
    }

    /// Switches authority with no blending. State and weight are terminal when this returns.
    pub fn set_immediate(&mut self, to_physics: bool) {
        self.cancel_transition();
        self.weight = if to_physics { 1.0 } else { 0.0 };
        self.apply_authority(to_physics);
        self.state = BlendState::terminal(to_physics);
    }

    /// Advances the transition by `dt` and writes the blended pose of every bone.
    ///
    /// A non-positive `dt` leaves the elapsed time unchanged but still rewrites the bones, since
    /// the authorities may have written them this frame.
    pub fn update(&mut self, skeleton: &mut Skeleton, dt: f32) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        if transition.is_complete() {
            self.finish_transition();
            return;
        }

        if dt.is_finite() && dt > 0.0 {
            transition.elapsed += dt;
        }
        self.weight = transition.weight();

        let progress = transition.progress();
        for snapshot in &transition.snapshots {
            let Some(live) = skeleton.world_pose(snapshot.node) else {
                self.diagnostics.warn_once(
                    SetupError::StaleNode(snapshot.node),
                    format!("bone left out of blend: {}", SetupError::StaleNode(snapshot.node)),
                );
                continue;
            };
            skeleton.set_world_pose(snapshot.node, snapshot.blend_toward(&live, progress));
        }
    }

    fn finish_transition(&mut self) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        self.weight = transition.target_weight;
        self.state = BlendState::terminal(transition.to_physics);
        if !transition.to_physics {
            self.trigger_recovery();
        }
    }

    fn cancel_transition(&mut self) {
        if self.transition.take().is_some() {
            log::debug!(
                "cancelled blend in state {:?} at weight {}",
                self.state,
                self.weight
            );
        }
    }

    fn apply_authority(&mut self, to_physics: bool) {
        for &bone in &self.bones {
            self.physics.set_kinematic(bone, !to_physics);
        }
        self.animation.set_enabled(!to_physics);
    }

    fn trigger_recovery(&mut self) {
        match self.animation.find_trigger(&self.config.recovery_trigger) {
            Some(trigger) => self.animation.fire_trigger(trigger),
            None => log::trace!(
                "animation '{}' has no '{}' trigger",
                self.animation.name(),
                self.config.recovery_trigger
            ),
        }
    }
}
