use rig_dynamics::*;

/// A head with one ponytail and a two-bone ragdoll spine. The head sways for a second while
/// the ponytail trails behind, then the body drops into physics and blends back to animation.
fn main() {
    let mut world = RigWorld::new();
    let skeleton = &mut world.skeleton;

    let hips = skeleton.add_node("hips", None, Transform::from_position(Vec3::Y));
    let head = skeleton.add_node("head", Some(hips), Transform::from_position(Vec3::Y * 0.7));
    let mut ponytail = vec![skeleton.add_node(
        "ponytail_0",
        Some(head),
        Transform::from_position(Vec3::new(0.0, 0.0, -0.1)),
    )];
    for link in 1..5 {
        let parent = ponytail[link - 1];
        ponytail.push(skeleton.add_node(
            format!("ponytail_{link}"),
            Some(parent),
            Transform::from_position(-Vec3::Y * 0.08),
        ));
    }

    let rig = world.spawn_rig();
    match world.attach_simulator(rig, &ponytail, SpringChainConfig::default()) {
        Some(Ok(chains)) => println!("Ponytail simulated as {chains} chain(s)"),
        Some(Err(err)) => println!("Ponytail setup failed: {err}"),
        None => println!("Rig {rig} no longer exists"),
    }
    world.attach_default_controller(rig, vec![hips, head], BlendConfig::default());

    let dt = 1.0 / 60.0;
    let tip = ponytail[ponytail.len() - 1];
    for frame in 0..60 {
        let sway = (frame as f32 * dt * 6.0).sin() * 0.3;
        world.skeleton.set_world_position(hips, Vec3::new(sway, 1.0, 0.0));
        world.post_update(dt);
        if frame % 15 == 0 {
            println!(
                "frame {frame:>2}: hips x = {sway:+.3}, ponytail tip = {:?}",
                world.skeleton.world_position(tip)
            );
        }
    }

    world.begin_transition(rig, true, Some(0.25));
    for _ in 0..20 {
        world.post_update(dt);
    }
    if let Some(controller) = world.controller(rig) {
        println!("After ragdoll blend: {:?} (weight {:.2})", controller.state(), controller.weight());
    }

    world.begin_transition(rig, false, None);
    for _ in 0..30 {
        world.post_update(dt);
    }
    if let Some(controller) = world.controller(rig) {
        println!("After recovery: {:?} (weight {:.2})", controller.state(), controller.weight());
    }
}
