use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use approx::assert_relative_eq;
use glam::{Quat, Vec3};
use parking_lot::Mutex;
use rig_dynamics::{
    blend::{
        authority::{AnimationAuthority, PhysicsAuthority, TriggerId},
        controller::{BlendController, BlendState},
    },
    config::BlendConfig,
    core::{skeleton::Skeleton, types::Transform},
    utils::allocator::NodeId,
};

#[derive(Default)]
struct AnimationLog {
    enabled: Option<bool>,
    fired: Vec<TriggerId>,
}

struct RecordingAnimation {
    log: Arc<Mutex<AnimationLog>>,
    triggers: Vec<&'static str>,
}

impl AnimationAuthority for RecordingAnimation {
    fn name(&self) -> &str {
        "recording-animation"
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.log.lock().enabled = Some(enabled);
    }

    fn find_trigger(&self, name: &str) -> Option<TriggerId> {
        self.triggers
            .iter()
            .position(|trigger| *trigger == name)
            .map(|index| TriggerId(index as u32))
    }

    fn fire_trigger(&mut self, trigger: TriggerId) {
        self.log.lock().fired.push(trigger);
    }
}

struct RecordingPhysics {
    kinematic: Arc<Mutex<HashMap<NodeId, bool>>>,
}

impl PhysicsAuthority for RecordingPhysics {
    fn name(&self) -> &str {
        "recording-physics"
    }

    fn set_kinematic(&mut self, node: NodeId, kinematic: bool) {
        self.kinematic.lock().insert(node, kinematic);
    }
}

struct Harness {
    skeleton: Skeleton,
    bones: Vec<NodeId>,
    controller: BlendController,
    animation: Arc<Mutex<AnimationLog>>,
    kinematic: Arc<Mutex<HashMap<NodeId, bool>>>,
}

fn make_harness(triggers: Vec<&'static str>, config: BlendConfig) -> Harness {
    let mut skeleton = Skeleton::new();
    let hips = skeleton.add_node("hips", None, Transform::from_position(Vec3::Y));
    let spine = skeleton.add_node("spine", Some(hips), Transform::from_position(Vec3::Y * 0.3));
    let bones = vec![hips, spine];

    let animation = Arc::new(Mutex::new(AnimationLog::default()));
    let kinematic = Arc::new(Mutex::new(HashMap::new()));
    let controller = BlendController::new(bones.clone(), config)
        .with_animation(RecordingAnimation {
            log: Arc::clone(&animation),
            triggers,
        })
        .with_physics(RecordingPhysics {
            kinematic: Arc::clone(&kinematic),
        });

    Harness {
        skeleton,
        bones,
        controller,
        animation,
        kinematic,
    }
}

fn all_kinematic(harness: &Harness, expected: bool) -> bool {
    let kinematic = harness.kinematic.lock();
    harness
        .bones
        .iter()
        .all(|bone| kinematic.get(bone) == Some(&expected))
}

#[test]
fn starts_fully_animated() {
    let harness = make_harness(vec![], BlendConfig::default());
    assert_eq!(harness.controller.state(), BlendState::Animated);
    assert_eq!(harness.controller.weight(), 0.0);
    assert_eq!(harness.animation.lock().enabled, Some(true));
    assert!(all_kinematic(&harness, true));
}

#[test]
fn weight_reaches_target_after_duration_then_state_settles() {
    let mut h = make_harness(vec![], BlendConfig::default());
    h.controller.begin_transition(&h.skeleton, true, Some(0.5));

    assert_eq!(h.controller.state(), BlendState::BlendingToPhysics);
    assert!(h.controller.is_physics());
    assert_eq!(h.animation.lock().enabled, Some(false));
    assert!(all_kinematic(&h, false));

    let mut previous = h.controller.weight();
    for frame in 1..=5 {
        h.controller.update(&mut h.skeleton, 0.1);
        let weight = h.controller.weight();
        assert!(weight >= previous, "weight must not decrease");
        assert_relative_eq!(weight, frame as f32 * 0.2, epsilon = 1e-5);
        assert_eq!(h.controller.state(), BlendState::BlendingToPhysics);
        previous = weight;
    }
    assert_eq!(h.controller.weight(), 1.0);
    assert!(h.controller.is_transitioning());

    h.controller.update(&mut h.skeleton, 0.1);
    assert_eq!(h.controller.state(), BlendState::Physics);
    assert!(!h.controller.is_transitioning());
    assert_eq!(h.controller.weight(), 1.0);

    h.controller.update(&mut h.skeleton, 0.1);
    assert_eq!(h.controller.weight(), 1.0);
    assert_eq!(h.controller.state(), BlendState::Physics);
}

#[test]
fn retargeting_mid_blend_continues_from_current_weight() {
    let mut h = make_harness(vec![], BlendConfig::default());
    h.controller.begin_to_physics(&h.skeleton, Some(1.0));
    h.controller.update(&mut h.skeleton, 0.25);
    h.controller.update(&mut h.skeleton, 0.25);
    assert_relative_eq!(h.controller.weight(), 0.5);

    h.controller.begin_to_animation(&h.skeleton, Some(1.0));
    assert_eq!(h.controller.state(), BlendState::BlendingToAnimated);
    assert_relative_eq!(h.controller.weight(), 0.5);
    assert_eq!(h.animation.lock().enabled, Some(true));
    assert!(all_kinematic(&h, true));

    let mut previous = h.controller.weight();
    h.controller.update(&mut h.skeleton, 0.25);
    assert_relative_eq!(h.controller.weight(), 0.375);
    for _ in 0..4 {
        h.controller.update(&mut h.skeleton, 0.25);
        assert!(h.controller.weight() <= previous);
        previous = h.controller.weight();
    }
    h.controller.update(&mut h.skeleton, 0.25);
    assert_eq!(h.controller.state(), BlendState::Animated);
    assert_eq!(h.controller.weight(), 0.0);
}

#[test]
fn set_immediate_skips_blending_and_cancels_transition() {
    let mut h = make_harness(vec!["GetUp"], BlendConfig::default());
    h.controller.begin_to_animation(&h.skeleton, Some(1.0));
    h.controller.update(&mut h.skeleton, 0.1);

    h.controller.set_immediate(true);
    assert_eq!(h.controller.state(), BlendState::Physics);
    assert_eq!(h.controller.weight(), 1.0);
    assert!(!h.controller.is_transitioning());
    assert!(all_kinematic(&h, false));

    // The cancelled blend never completes, so recovery is never requested.
    for _ in 0..20 {
        h.controller.update(&mut h.skeleton, 0.1);
    }
    assert_eq!(h.controller.state(), BlendState::Physics);
    assert!(h.animation.lock().fired.is_empty());

    h.controller.set_immediate(false);
    assert_eq!(h.controller.state(), BlendState::Animated);
    assert_eq!(h.controller.weight(), 0.0);
    assert!(h.animation.lock().fired.is_empty());
}

#[test]
fn degenerate_durations_complete_on_first_update() {
    for duration in [0.0, -1.0, f32::NAN] {
        let mut h = make_harness(vec![], BlendConfig::default());
        h.controller.begin_transition(&h.skeleton, true, Some(duration));
        assert_eq!(h.controller.state(), BlendState::BlendingToPhysics);

        h.controller.update(&mut h.skeleton, 0.016);
        assert_eq!(h.controller.state(), BlendState::Physics);
        assert_eq!(h.controller.weight(), 1.0);
    }
}

#[test]
fn omitted_duration_uses_configured_default() {
    let config = BlendConfig::default().with_default_duration(0.2);
    let mut h = make_harness(vec![], config);
    h.controller.begin_transition(&h.skeleton, true, None);

    h.controller.update(&mut h.skeleton, 0.1);
    assert_relative_eq!(h.controller.weight(), 0.5);
    h.controller.update(&mut h.skeleton, 0.1);
    assert_eq!(h.controller.weight(), 1.0);
    h.controller.update(&mut h.skeleton, 0.1);
    assert_eq!(h.controller.state(), BlendState::Physics);
}

#[test]
fn completing_blend_to_animation_fires_recovery_trigger() {
    let mut h = make_harness(vec!["Wave", "GetUp"], BlendConfig::default());
    h.controller.set_immediate(true);
    h.controller.begin_to_animation(&h.skeleton, Some(0.2));
    for _ in 0..3 {
        h.controller.update(&mut h.skeleton, 0.1);
    }

    assert_eq!(h.controller.state(), BlendState::Animated);
    assert_eq!(h.animation.lock().fired, vec![TriggerId(1)]);
}

#[test]
fn missing_recovery_trigger_is_ignored() {
    let mut h = make_harness(vec!["Wave"], BlendConfig::default());
    h.controller.set_immediate(true);
    h.controller.begin_to_animation(&h.skeleton, Some(0.0));
    h.controller.update(&mut h.skeleton, 0.1);

    assert_eq!(h.controller.state(), BlendState::Animated);
    assert!(h.animation.lock().fired.is_empty());
}

#[test]
fn bones_blend_from_snapshot_toward_live_authority_pose() {
    let mut h = make_harness(vec![], BlendConfig::default());
    let hips = h.bones[0];
    let start = h.skeleton.world_pose(hips).unwrap();
    h.controller.begin_to_physics(&h.skeleton, Some(1.0));

    // Physics writes its pose for the frame, then the controller post-processes it.
    let physics_position = start.position + Vec3::new(2.0, 0.0, 0.0);
    let physics_rotation = Quat::from_rotation_z(FRAC_PI_2);
    h.skeleton.set_world_pose(hips, rig_dynamics::Pose::new(physics_position, physics_rotation));
    h.controller.update(&mut h.skeleton, 0.5);

    let blended = h.skeleton.world_pose(hips).unwrap();
    assert_relative_eq!(blended.position.x, start.position.x + 1.0, epsilon = 1e-5);
    assert_relative_eq!(
        blended.rotation.angle_between(start.rotation),
        FRAC_PI_2 / 2.0,
        epsilon = 1e-4
    );

    h.skeleton.set_world_pose(hips, rig_dynamics::Pose::new(physics_position, physics_rotation));
    h.controller.update(&mut h.skeleton, 0.5);
    let settled = h.skeleton.world_pose(hips).unwrap();
    assert_relative_eq!(settled.position.x, physics_position.x, epsilon = 1e-5);
    assert!(settled.rotation.abs_diff_eq(physics_rotation, 1e-5));
}

#[test]
fn controller_without_bones_still_tracks_state() {
    let mut skeleton = Skeleton::new();
    let mut controller = BlendController::new(Vec::new(), BlendConfig::default());
    controller.begin_to_physics(&skeleton, Some(0.1));
    controller.update(&mut skeleton, 0.1);
    controller.update(&mut skeleton, 0.1);
    assert_eq!(controller.state(), BlendState::Physics);
    assert!(skeleton.is_empty());
}
