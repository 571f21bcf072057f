//! Integration tests for the turtle running on the rapier backend

use glam::Vec3;
use turtle_creature::{JointRole, LegPosition, PartRole, Turtle, TurtleMorphology};
use turtle_physics::{PhysicsEngine, PhysicsFactory, RapierWorld};

// ============================================================================
// Assembly
// ============================================================================

#[test]
fn test_assemble_on_rapier() {
    let mut world = RapierWorld::new();
    world.create_ground_physics();

    let turtle = Turtle::assemble(&mut world, Vec3::new(-10.0, 5.0, 10.0), 5.0).unwrap();

    assert_eq!(world.part_count(), 1 + 8);
    assert_eq!(world.joint_count(), 8);

    for part in turtle.parts() {
        assert!(world.rigid_body_handle(part).is_some());
    }

    let head = world.part_transform(turtle.head()).unwrap();
    assert!(head.position.distance(Vec3::new(-10.0, 5.625, 13.5)) < 1e-4);
}

#[test]
fn test_turtle_settles_without_blowing_up() {
    let mut world = RapierWorld::new();
    world.set_gravity(Vec3::new(0.0, -9.0, 0.0));
    world.create_ground_physics();
    let ball = world.create_sphere(2.0, Vec3::new(-20.0, 2.0, 20.0), glam::Quat::IDENTITY);

    let mut turtle = Turtle::assemble(&mut world, Vec3::new(-10.0, 5.0, 10.0), 5.0)
        .unwrap()
        .with_diagnostics(false);

    let dt = 1.0 / 60.0;
    for _ in 0..120 {
        let target = world.part_transform(ball).unwrap().position;
        let report = turtle.update(&mut world, target, dt).unwrap();
        assert!(report.distance_to_target.is_finite());
        assert!(report.head_aim.degrees.is_finite());
        world.step(dt);
    }

    for part in turtle.parts() {
        let transform = world.part_transform(part).unwrap();
        assert!(transform.position.is_finite(), "{} left the world", part);
        assert!(transform.rotation.is_finite());
    }

    // Latch is either intact or released through a flip, never lost
    let expected = if turtle.is_shell_open() { 7 } else { 8 };
    assert_eq!(world.joint_count(), expected);
}

// ============================================================================
// Shell flip
// ============================================================================

#[test]
fn test_flip_releases_latch_and_lifts_shell() {
    let mut world = RapierWorld::new();
    let mut turtle = Turtle::assemble(&mut world, Vec3::ZERO, 5.0).unwrap();
    let shell_before = world.part_transform(turtle.shell()).unwrap().position;

    assert!(turtle.flip_shell(&mut world).unwrap());
    assert_eq!(world.joint_count(), 7);

    world.step(1.0 / 60.0);
    let shell_after = world.part_transform(turtle.shell()).unwrap().position;
    assert!(shell_after.y > shell_before.y);

    // Second flip leaves the world untouched
    assert!(!turtle.flip_shell(&mut world).unwrap());
    assert_eq!(world.joint_count(), 7);
}

// ============================================================================
// Body plan
// ============================================================================

#[test]
fn test_morphology_ron_roundtrip_keeps_layout() {
    let morphology = TurtleMorphology::new(Vec3::new(1.0, 2.0, 3.0), 4.0);

    let text = ron::ser::to_string_pretty(&morphology, ron::ser::PrettyConfig::default()).unwrap();
    let parsed: TurtleMorphology = ron::from_str(&text).unwrap();

    assert!(parsed.validate().is_ok());
    assert_eq!(parsed.parts.len(), 8);
    assert_eq!(parsed.joints.len(), 7);
    assert_eq!(
        parsed.part(PartRole::Leg(LegPosition::LeftBack)).map(|p| p.position),
        morphology.part(PartRole::Leg(LegPosition::LeftBack)).map(|p| p.position)
    );
    assert!(parsed.joint(JointRole::ShellLatch).is_some());
}

#[test]
fn test_assemble_from_parsed_morphology() {
    let text = ron::ser::to_string(&TurtleMorphology::new(Vec3::ZERO, 2.0)).unwrap();
    let parsed: TurtleMorphology = ron::from_str(&text).unwrap();

    let mut world = RapierWorld::new();
    let turtle = Turtle::from_morphology(&mut world, parsed).unwrap();
    assert_eq!(turtle.shell_radius(), 1.0);
    assert_eq!(world.joint_count(), 8);
}
