//! Main turtle entity
//!
//! Owns the handles of every part and joint it created. The target ball and
//! the world itself belong to the host and are only passed in per call.

use glam::{Quat, Vec3};
use thiserror::Error;
use turtle_physics::{BodyDesc, JointDesc, JointId, PartId, PhysicsEngine, PhysicsError};

use crate::behavior::{
    should_wag_tail, HeadAim, ShellFlipTimer, TickReport, FLIP_FORCE, LEG_TORQUE,
};
use crate::morphology::{JointRole, JointSpec, LegPosition, PartRole, TurtleMorphology};

/// Errors raised while turning a body plan into bodies and joints
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssemblyError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error("body plan has no {0}")]
    MissingPart(PartRole),

    #[error("body plan has no {0:?} joint")]
    MissingJoint(JointRole),

    #[error("invalid body plan: {0}")]
    InvalidPlan(String),
}

/// Reject a plan before any body is created, so a failed assembly leaves the
/// world untouched
fn check_plan(morphology: &TurtleMorphology) -> Result<(), AssemblyError> {
    let legs = LegPosition::all().iter().copied();

    let parts = [PartRole::Base, PartRole::Head, PartRole::Tail, PartRole::Shell]
        .into_iter()
        .chain(legs.clone().map(PartRole::Leg));
    for role in parts {
        if morphology.part(role).is_none() {
            return Err(AssemblyError::MissingPart(role));
        }
    }

    let joints = [JointRole::HeadHinge, JointRole::TailCone]
        .into_iter()
        .chain(legs.map(JointRole::LegCone))
        .chain([JointRole::ShellHinge]);
    for role in joints {
        if morphology.joint(role).is_none() {
            return Err(AssemblyError::MissingJoint(role));
        }
    }

    morphology.validate().map_err(AssemblyError::InvalidPlan)
}

/// Articulated shell turtle
#[derive(Debug, Clone)]
pub struct Turtle {
    morphology: TurtleMorphology,

    base: PartId,
    head: PartId,
    tail: PartId,
    shell: PartId,
    legs: [PartId; 4],

    head_hinge: JointId,
    tail_cone: JointId,
    leg_cones: [JointId; 4],
    shell_hinge: JointId,

    /// Present until the shell flips open
    latch: Option<JointId>,

    flip_timer: ShellFlipTimer,

    /// Log head-aim values every tick
    diagnostics: bool,
}

impl Turtle {
    /// Build a turtle at `position` with uniform `scale` and register all its
    /// joints with `engine`
    pub fn assemble<E: PhysicsEngine + ?Sized>(
        engine: &mut E,
        position: Vec3,
        scale: f32,
    ) -> Result<Self, AssemblyError> {
        Self::from_morphology(engine, TurtleMorphology::new(position, scale))
    }

    /// Build a turtle from an existing body plan
    pub fn from_morphology<E: PhysicsEngine + ?Sized>(
        engine: &mut E,
        morphology: TurtleMorphology,
    ) -> Result<Self, AssemblyError> {
        check_plan(&morphology)?;

        let mut created: Vec<(PartRole, PartId)> = Vec::with_capacity(morphology.parts.len());
        for spec in &morphology.parts {
            let id = engine.create_body(BodyDesc::dynamic(
                spec.shape,
                spec.position,
                Quat::IDENTITY,
            ));
            created.push((spec.role, id));
        }

        let part = |role: PartRole| {
            created
                .iter()
                .find(|(r, _)| *r == role)
                .map(|(_, id)| *id)
                .ok_or(AssemblyError::MissingPart(role))
        };

        let base = part(PartRole::Base)?;
        let head = part(PartRole::Head)?;
        let tail = part(PartRole::Tail)?;
        let shell = part(PartRole::Shell)?;
        let mut legs = [base; 4];
        for &leg in LegPosition::all() {
            legs[leg.slot()] = part(PartRole::Leg(leg))?;
        }

        let mut add = |spec: Option<&JointSpec>, role: JointRole| -> Result<JointId, AssemblyError> {
            let spec = spec.ok_or(AssemblyError::MissingJoint(role))?;
            let desc = JointDesc::new(part(spec.part_a)?, part(spec.part_b)?, spec.kind);
            Ok(engine.add_joint(desc)?)
        };

        let head_hinge = add(morphology.joint(JointRole::HeadHinge), JointRole::HeadHinge)?;
        let tail_cone = add(morphology.joint(JointRole::TailCone), JointRole::TailCone)?;
        let mut leg_cones = [head_hinge; 4];
        for &leg in LegPosition::all() {
            let role = JointRole::LegCone(leg);
            leg_cones[leg.slot()] = add(morphology.joint(role), role)?;
        }
        let shell_hinge = add(morphology.joint(JointRole::ShellHinge), JointRole::ShellHinge)?;
        let latch = add(Some(&morphology.latch), JointRole::ShellLatch)?;

        log::info!(
            "Turtle: Assembled at ({:.1}, {:.1}, {:.1}) scale={:.2} with {} parts and {} joints",
            morphology.position.x,
            morphology.position.y,
            morphology.position.z,
            morphology.scale,
            created.len(),
            morphology.joints.len() + 1
        );

        Ok(Self {
            morphology,
            base,
            head,
            tail,
            shell,
            legs,
            head_hinge,
            tail_cone,
            leg_cones,
            shell_hinge,
            latch: Some(latch),
            flip_timer: ShellFlipTimer::default(),
            diagnostics: true,
        })
    }

    /// Enable or disable per-tick head-aim logging
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Run one tick of behavior against `target`
    ///
    /// Rules run in order: shell flip timer, tail wag, head aim, leg drive.
    pub fn update<E: PhysicsEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        target: Vec3,
        delta_time: f32,
    ) -> Result<TickReport, PhysicsError> {
        let base = engine.part_transform(self.base)?;

        // Open the shell after lying on the back for a while
        let flipped = if self.flip_timer.tick(base.up().y, delta_time) {
            self.flip_shell(engine)?
        } else {
            false
        };

        // Wag tail when close to the target
        let distance_to_target = base.position.distance(target);
        let tail_wagged = should_wag_tail(distance_to_target);
        if tail_wagged {
            engine.apply_torque(self.tail, LEG_TORQUE)?;
        }

        // Report how far the head is turned away from the target
        let head = engine.part_transform(self.head)?;
        let head_aim = HeadAim::measure(&head, target);
        if self.diagnostics {
            log::debug!("Turtle: head aim dot product: {}", head_aim.dot);
            log::debug!("Turtle: head aim angle: {}", head_aim.angle);
            log::debug!("Turtle: head aim degrees: {}", head_aim.degrees);
        }

        for &leg in &self.legs {
            engine.apply_torque(leg, LEG_TORQUE)?;
        }

        Ok(TickReport {
            flipped,
            tail_wagged,
            distance_to_target,
            head_aim,
            flip_countdown: self.flip_timer.remaining(),
        })
    }

    /// Release the shell latch and push the shell open
    ///
    /// Returns false without touching the world when the latch is already gone.
    pub fn flip_shell<E: PhysicsEngine + ?Sized>(
        &mut self,
        engine: &mut E,
    ) -> Result<bool, PhysicsError> {
        let Some(latch) = self.latch.take() else {
            log::debug!("Turtle: shell already open, ignoring flip");
            return Ok(false);
        };

        if !engine.remove_joint(latch) {
            log::warn!("Turtle: latch {} was not in the world", latch);
        }
        engine.apply_force(self.shell, FLIP_FORCE, self.morphology.shell_lift_point())?;

        log::info!("Turtle: latch released, flipping shell open");

        Ok(true)
    }

    /// Root part, used as the creature's handle
    pub fn base(&self) -> PartId {
        self.base
    }

    pub fn head(&self) -> PartId {
        self.head
    }

    pub fn tail(&self) -> PartId {
        self.tail
    }

    pub fn shell(&self) -> PartId {
        self.shell
    }

    pub fn leg(&self, leg: LegPosition) -> PartId {
        self.legs[leg.slot()]
    }

    /// Every part, base first
    pub fn parts(&self) -> [PartId; 8] {
        let [rf, lf, rb, lb] = self.legs;
        [self.base, self.head, self.tail, rf, lf, rb, lb, self.shell]
    }

    /// Articulation joints (latch excluded)
    pub fn joints(&self) -> [JointId; 7] {
        let [rf, lf, rb, lb] = self.leg_cones;
        [
            self.head_hinge,
            self.tail_cone,
            rf,
            lf,
            rb,
            lb,
            self.shell_hinge,
        ]
    }

    /// Latch joint while the shell is closed
    pub fn latch(&self) -> Option<JointId> {
        self.latch
    }

    pub fn is_shell_open(&self) -> bool {
        self.latch.is_none()
    }

    pub fn morphology(&self) -> &TurtleMorphology {
        &self.morphology
    }

    pub fn shell_radius(&self) -> f32 {
        self.morphology.shell_radius
    }

    pub fn head_scale(&self) -> f32 {
        self.morphology.head_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use turtle_physics::{PhysicsFactory, RecordingWorld};

    const ORIGIN: Vec3 = Vec3::new(-10.0, 5.0, 10.0);

    fn spawn() -> (RecordingWorld, Turtle) {
        let mut world = RecordingWorld::new();
        let turtle = Turtle::assemble(&mut world, ORIGIN, 5.0).unwrap();
        (world, turtle)
    }

    fn turn_over(world: &mut RecordingWorld, turtle: &Turtle) {
        world
            .set_transform(turtle.base(), ORIGIN, Quat::from_rotation_z(PI))
            .unwrap();
    }

    #[test]
    fn test_assembly_registers_all_joints() {
        let (world, turtle) = spawn();

        assert_eq!(world.part_count(), 8);
        assert_eq!(world.joint_count(), 8);
        assert!(turtle.latch().is_some());
        assert!(!turtle.is_shell_open());

        for joint in turtle.joints() {
            assert!(world.has_joint(joint));
        }
    }

    #[test]
    fn test_every_joint_references_two_turtle_parts() {
        let (world, turtle) = spawn();
        let parts = turtle.parts();

        for (_, joint) in world.active_joints() {
            assert!(parts.contains(&joint.part_a));
            assert!(parts.contains(&joint.part_b));
            assert_ne!(joint.part_a, joint.part_b);
        }
    }

    #[test]
    fn test_dimensions_exposed() {
        let (world, turtle) = spawn();
        assert_eq!(turtle.shell_radius(), 2.5);
        assert!((turtle.head_scale() - 0.8333333).abs() < 1e-5);

        let head = world.part_transform(turtle.head()).unwrap();
        assert!((head.position - (ORIGIN + Vec3::new(0.0, 0.625, 3.5))).length() < 1e-5);
    }

    #[test]
    fn test_legs_get_torque_every_tick() {
        let (mut world, mut turtle) = spawn();
        let far_away = Vec3::new(500.0, 0.0, 0.0);

        turtle.update(&mut world, far_away, 1.0 / 60.0).unwrap();

        for &leg in LegPosition::all() {
            assert_eq!(world.torques(turtle.leg(leg)), &[LEG_TORQUE]);
        }
        assert!(world.torques(turtle.tail()).is_empty());
    }

    #[test]
    fn test_tail_wags_within_range_only() {
        let (mut world, mut turtle) = spawn();

        let at_edge = ORIGIN + Vec3::new(10.0, 0.0, 0.0);
        let report = turtle.update(&mut world, at_edge, 0.1).unwrap();
        assert!(report.tail_wagged);
        assert_eq!(report.distance_to_target, 10.0);
        assert_eq!(world.torques(turtle.tail()), &[LEG_TORQUE]);

        world.step(0.1);

        let beyond = ORIGIN + Vec3::new(10.001, 0.0, 0.0);
        let report = turtle.update(&mut world, beyond, 0.1).unwrap();
        assert!(!report.tail_wagged);
        assert!(world.torques(turtle.tail()).is_empty());
    }

    #[test]
    fn test_upright_turtle_never_flips() {
        let (mut world, mut turtle) = spawn();

        for _ in 0..600 {
            let report = turtle.update(&mut world, Vec3::ZERO, 0.1).unwrap();
            assert!(!report.flipped);
            assert_eq!(report.flip_countdown, 3.0);
            world.step(0.1);
        }

        assert!(turtle.latch().is_some());
    }

    #[test]
    fn test_upside_down_turtle_flips_after_interval() {
        let (mut world, mut turtle) = spawn();
        turn_over(&mut world, &turtle);

        // 3.0s on the back is not enough, the countdown must drop below zero
        for _ in 0..6 {
            let report = turtle.update(&mut world, Vec3::ZERO, 0.5).unwrap();
            assert!(!report.flipped);
            world.step(0.5);
        }
        assert!(turtle.latch().is_some());

        let latch = turtle.latch().unwrap();
        let report = turtle.update(&mut world, Vec3::ZERO, 0.5).unwrap();
        assert!(report.flipped);
        assert_eq!(report.flip_countdown, 3.0);
        assert!(turtle.is_shell_open());
        assert!(!world.has_joint(latch));
        assert_eq!(world.joint_count(), 7);

        let forces = world.forces(turtle.shell());
        assert_eq!(forces.len(), 1);
        assert_eq!(forces[0].force, FLIP_FORCE);
        assert_eq!(forces[0].local_offset, Vec3::new(0.0, -0.625, 2.5));
    }

    #[test]
    fn test_second_flip_is_noop() {
        let (mut world, mut turtle) = spawn();

        assert!(turtle.flip_shell(&mut world).unwrap());
        world.step(0.1);

        assert!(!turtle.flip_shell(&mut world).unwrap());
        assert!(world.forces(turtle.shell()).is_empty());
        assert_eq!(world.joint_count(), 7);
    }

    #[test]
    fn test_staying_upside_down_does_not_push_shell_again() {
        let (mut world, mut turtle) = spawn();
        turn_over(&mut world, &turtle);

        let mut pushes = 0;
        let mut flips = 0;
        for _ in 0..100 {
            let report = turtle.update(&mut world, Vec3::ZERO, 0.25).unwrap();
            flips += report.flipped as u32;
            pushes += world.forces(turtle.shell()).len();
            world.step(0.25);
        }

        assert_eq!(flips, 1);
        assert_eq!(pushes, 1);
    }

    #[test]
    fn test_righting_the_turtle_resets_countdown() {
        let (mut world, mut turtle) = spawn();
        turn_over(&mut world, &turtle);

        let report = turtle.update(&mut world, Vec3::ZERO, 2.0).unwrap();
        assert_eq!(report.flip_countdown, 1.0);

        world
            .set_transform(turtle.base(), ORIGIN, Quat::IDENTITY)
            .unwrap();
        let report = turtle.update(&mut world, Vec3::ZERO, 2.0).unwrap();
        assert_eq!(report.flip_countdown, 3.0);
        assert!(!turtle.is_shell_open());
    }

    #[test]
    fn test_head_aim_reported_without_moving_head() {
        let (mut world, mut turtle) = spawn();
        let head = world.part_transform(turtle.head()).unwrap();

        // Target straight behind the head (look basis is -Z)
        let target = head.position + Vec3::new(0.0, 0.0, 20.0);
        let report = turtle.update(&mut world, target, 0.1).unwrap();

        assert!((report.head_aim.degrees - 180.0).abs() < 0.1);
        assert!(world.torques(turtle.head()).is_empty());
        assert!(world.forces(turtle.head()).is_empty());
    }

    #[test]
    fn test_update_with_foreign_world_fails() {
        let (_, mut turtle) = spawn();
        let mut empty = RecordingWorld::new();
        let err = turtle.update(&mut empty, Vec3::ZERO, 0.1).unwrap_err();
        assert_eq!(err, PhysicsError::UnknownPart(turtle.base()));
    }

    #[test]
    fn test_assembly_in_populated_world() {
        let mut world = RecordingWorld::new();
        world.create_ground_physics();
        let ball = world.create_sphere(2.0, Vec3::new(-20.0, 0.0, 20.0), Quat::IDENTITY);

        let turtle = Turtle::assemble(&mut world, ORIGIN, 5.0).unwrap();
        assert_eq!(world.part_count(), 10);
        assert!(!turtle.parts().contains(&ball));
    }

    #[test]
    fn test_incomplete_morphology_is_rejected() {
        let mut morph = TurtleMorphology::new(ORIGIN, 5.0);
        morph.parts.retain(|p| p.role != PartRole::Head);

        let mut world = RecordingWorld::new();
        let err = Turtle::from_morphology(&mut world, morph).unwrap_err();
        assert_eq!(err, AssemblyError::MissingPart(PartRole::Head));
        assert_eq!(world.part_count(), 0);
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_rejected_plan_leaves_world_untouched() {
        let mut world = RecordingWorld::new();
        world.create_ground_physics();

        let mut morph = TurtleMorphology::new(ORIGIN, 5.0);
        morph.joints.retain(|j| j.role != JointRole::TailCone);
        let err = Turtle::from_morphology(&mut world, morph).unwrap_err();
        assert_eq!(err, AssemblyError::MissingJoint(JointRole::TailCone));
        assert_eq!(world.part_count(), 1);
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn test_duplicate_part_role_is_rejected() {
        let mut morph = TurtleMorphology::new(ORIGIN, 5.0);
        let extra_head = *morph.part(PartRole::Head).unwrap();
        morph.parts.push(extra_head);

        let mut world = RecordingWorld::new();
        let err = Turtle::from_morphology(&mut world, morph).unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidPlan(_)), "{:?}", err);
        assert_eq!(world.part_count(), 0);
    }
}
