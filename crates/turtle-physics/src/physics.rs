//! Rigid body physics backed by rapier3d

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

use crate::error::PhysicsError;
use crate::joint::{ConeTwistLimits, JointDesc, JointFrame, JointKind};
use crate::traits::PhysicsEngine;
use crate::types::{BodyDesc, BodyKind, JointId, PartId, PartTransform, Shape};

/// Default fixed timestep (60 FPS)
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// Manages the rapier3d physics world
pub struct RapierWorld {
    /// Rapier rigid body set
    rigid_body_set: RigidBodySet,

    /// Rapier collider set
    collider_set: ColliderSet,

    /// Physics pipeline
    pipeline: PhysicsPipeline,

    /// Integration parameters
    integration_parameters: IntegrationParameters,

    /// Island manager
    island_manager: IslandManager,

    /// Broad phase
    broad_phase: BroadPhase,

    /// Narrow phase
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set (unused by creatures, required by the pipeline)
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver
    ccd_solver: CCDSolver,

    /// Query pipeline
    query_pipeline: QueryPipeline,

    /// World gravity
    gravity: Vector<Real>,

    /// Part arena: `PartId` indexes into this
    parts: Vec<RigidBodyHandle>,

    /// Joint arena: `JointId` indexes into this, `None` once removed
    joints: Vec<Option<ImpulseJointHandle>>,
}

impl RapierWorld {
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: DEFAULT_TIMESTEP,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            gravity: vector![0.0, 0.0, 0.0],
            parts: Vec::new(),
            joints: Vec::new(),
        }
    }

    /// Rapier handle behind a part
    pub fn rigid_body_handle(&self, part: PartId) -> Option<RigidBodyHandle> {
        self.parts.get(part.index()).copied()
    }

    fn body(&self, part: PartId) -> Result<&RigidBody, PhysicsError> {
        self.rigid_body_handle(part)
            .and_then(|handle| self.rigid_body_set.get(handle))
            .ok_or(PhysicsError::UnknownPart(part))
    }

    fn body_mut(&mut self, part: PartId) -> Result<&mut RigidBody, PhysicsError> {
        let handle = self
            .rigid_body_handle(part)
            .ok_or(PhysicsError::UnknownPart(part))?;
        self.rigid_body_set
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownPart(part))
    }

    fn joint_body(
        &self,
        joint: &JointDesc,
        part: PartId,
    ) -> Result<RigidBodyHandle, PhysicsError> {
        self.rigid_body_handle(part)
            .ok_or(PhysicsError::UnknownJointPart {
                joint: joint.kind.name(),
                part,
            })
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for RapierWorld {
    fn create_body(&mut self, desc: BodyDesc) -> PartId {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let rigid_body = builder
            .position(to_isometry(desc.position, desc.orientation))
            .build();
        let body_handle = self.rigid_body_set.insert(rigid_body);

        let collider = collider_for(desc.shape).build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        let id = PartId::from_raw(self.parts.len() as u32);
        self.parts.push(body_handle);

        log::trace!(
            "Physics: Created {:?} {:?} body {} at ({:.2}, {:.2}, {:.2})",
            desc.kind,
            desc.shape,
            id,
            desc.position.x,
            desc.position.y,
            desc.position.z
        );

        id
    }

    fn add_joint(&mut self, joint: JointDesc) -> Result<JointId, PhysicsError> {
        let body_a = self.joint_body(&joint, joint.part_a)?;
        let body_b = self.joint_body(&joint, joint.part_b)?;

        let handle = self
            .impulse_joint_set
            .insert(body_a, body_b, to_generic_joint(&joint.kind), true);

        let id = JointId::from_raw(self.joints.len() as u32);
        self.joints.push(Some(handle));

        log::trace!(
            "Physics: Added {} joint {} between {} and {}",
            joint.kind.name(),
            id,
            joint.part_a,
            joint.part_b
        );

        Ok(id)
    }

    fn remove_joint(&mut self, joint: JointId) -> bool {
        match self.joints.get_mut(joint.index()).and_then(Option::take) {
            Some(handle) => self.impulse_joint_set.remove(handle, true).is_some(),
            None => false,
        }
    }

    fn has_joint(&self, joint: JointId) -> bool {
        matches!(self.joints.get(joint.index()), Some(Some(_)))
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = to_vector(gravity);
    }

    fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    fn part_transform(&self, part: PartId) -> Result<PartTransform, PhysicsError> {
        let body = self.body(part)?;
        Ok(PartTransform::new(
            from_vector(body.translation()),
            from_rotation(body.rotation()),
        ))
    }

    fn apply_torque(&mut self, part: PartId, torque: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(part)?.add_torque(to_vector(torque), true);
        Ok(())
    }

    fn apply_force(
        &mut self,
        part: PartId,
        force: Vec3,
        local_offset: Vec3,
    ) -> Result<(), PhysicsError> {
        let body = self.body_mut(part)?;
        let world_point = body.position() * point![local_offset.x, local_offset.y, local_offset.z];
        body.add_force_at_point(to_vector(force), world_point, true);
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;

        let physics_hooks = ();
        let event_handler = ();

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &physics_hooks,
            &event_handler,
        );

        // User forces persist in rapier; game code re-applies them every tick
        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
    }

    fn part_count(&self) -> usize {
        self.parts.len()
    }

    fn joint_count(&self) -> usize {
        self.impulse_joint_set.len()
    }
}

fn collider_for(shape: Shape) -> ColliderBuilder {
    match shape {
        Shape::Sphere { radius } => ColliderBuilder::ball(radius),
        Shape::Cylinder { radius, height } => ColliderBuilder::cylinder(height / 2.0, radius),
        Shape::Capsule { radius, height } => ColliderBuilder::capsule_y(height / 2.0, radius),
        Shape::Box {
            width,
            height,
            depth,
        } => ColliderBuilder::cuboid(width / 2.0, height / 2.0, depth / 2.0),
    }
}

fn to_generic_joint(kind: &JointKind) -> GenericJoint {
    match *kind {
        JointKind::Hinge {
            pivot_a,
            pivot_b,
            axis_a,
            axis_b,
        } => GenericJointBuilder::new(JointAxesMask::LOCKED_REVOLUTE_AXES)
            .local_axis1(to_unit_vector(axis_a))
            .local_axis2(to_unit_vector(axis_b))
            .local_anchor1(to_point(pivot_a))
            .local_anchor2(to_point(pivot_b))
            .contacts_enabled(false)
            .build(),
        JointKind::ConeTwist {
            frame_a,
            frame_b,
            limits,
        } => {
            let mut builder = GenericJointBuilder::new(JointAxesMask::LOCKED_SPHERICAL_AXES)
                .local_frame1(frame_isometry(&frame_a))
                .local_frame2(frame_isometry(&frame_b))
                .contacts_enabled(false)
                .limits(JointAxis::AngX, [-limits.twist_span, limits.twist_span]);

            if !ConeTwistLimits::is_unbounded(limits.swing_span2) {
                builder = builder.limits(
                    JointAxis::AngY,
                    [-limits.swing_span2, limits.swing_span2],
                );
            }
            if !ConeTwistLimits::is_unbounded(limits.swing_span1) {
                builder = builder.limits(
                    JointAxis::AngZ,
                    [-limits.swing_span1, limits.swing_span1],
                );
            }

            builder.build()
        }
        JointKind::Fixed { frame_a, frame_b } => {
            GenericJointBuilder::new(JointAxesMask::LOCKED_FIXED_AXES)
                .local_frame1(frame_isometry(&frame_a))
                .local_frame2(frame_isometry(&frame_b))
                .contacts_enabled(false)
                .build()
        }
    }
}

// ===== glam <-> nalgebra conversions =====

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

fn to_unit_vector(v: Vec3) -> UnitVector<Real> {
    UnitVector::new_normalize(to_vector(v))
}

fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn to_isometry(translation: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(to_vector(translation).into(), to_rotation(rotation))
}

fn frame_isometry(frame: &JointFrame) -> Isometry<Real> {
    to_isometry(frame.origin, frame.rotation)
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn from_rotation(r: &UnitQuaternion<Real>) -> Quat {
    let c = r.quaternion().coords;
    Quat::from_xyzw(c[0], c[1], c[2], c[3])
}
