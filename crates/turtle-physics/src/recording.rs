//! Headless world that records commands instead of simulating
//!
//! Bodies stay where they were created unless moved with `set_transform`.
//! Forces and torques are logged per part until the next `step`, which makes
//! this backend suitable for scripting scenarios and for tests of game logic.

use glam::{Quat, Vec3};

use crate::error::PhysicsError;
use crate::joint::JointDesc;
use crate::traits::PhysicsEngine;
use crate::types::{BodyDesc, JointId, PartId, PartTransform};

/// Force applied at a part-local offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedForce {
    pub force: Vec3,
    pub local_offset: Vec3,
}

/// Recorded state of one part
#[derive(Debug, Clone)]
pub struct RecordedBody {
    pub desc: BodyDesc,
    pub transform: PartTransform,
    /// Torques applied since the last step
    pub torques: Vec<Vec3>,
    /// Forces applied since the last step
    pub forces: Vec<AppliedForce>,
}

/// In-memory `PhysicsEngine` without dynamics
#[derive(Debug, Clone)]
pub struct RecordingWorld {
    bodies: Vec<RecordedBody>,
    joints: Vec<Option<JointDesc>>,
    gravity: Vec3,
    steps: u64,
    elapsed: f32,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            joints: Vec::new(),
            gravity: Vec3::ZERO,
            steps: 0,
            elapsed: 0.0,
        }
    }

    /// Recorded body by handle
    pub fn body(&self, part: PartId) -> Option<&RecordedBody> {
        self.bodies.get(part.index())
    }

    /// Joint description, if the joint is still in the simulation
    pub fn joint(&self, joint: JointId) -> Option<&JointDesc> {
        self.joints.get(joint.index()).and_then(Option::as_ref)
    }

    /// All joints still in the simulation
    pub fn active_joints(&self) -> impl Iterator<Item = (JointId, &JointDesc)> {
        self.joints
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.as_ref().map(|j| (JointId::from_raw(i as u32), j)))
    }

    /// Move a part, e.g. to turn a creature upside down
    pub fn set_transform(
        &mut self,
        part: PartId,
        position: Vec3,
        rotation: Quat,
    ) -> Result<(), PhysicsError> {
        let body = self.body_mut(part)?;
        body.transform = PartTransform::new(position, rotation);
        Ok(())
    }

    /// Torques applied to a part since the last step
    pub fn torques(&self, part: PartId) -> &[Vec3] {
        self.body(part).map(|b| b.torques.as_slice()).unwrap_or(&[])
    }

    /// Forces applied to a part since the last step
    pub fn forces(&self, part: PartId) -> &[AppliedForce] {
        self.body(part).map(|b| b.forces.as_slice()).unwrap_or(&[])
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total simulated time
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn body_mut(&mut self, part: PartId) -> Result<&mut RecordedBody, PhysicsError> {
        self.bodies
            .get_mut(part.index())
            .ok_or(PhysicsError::UnknownPart(part))
    }
}

impl Default for RecordingWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for RecordingWorld {
    fn create_body(&mut self, desc: BodyDesc) -> PartId {
        let id = PartId::from_raw(self.bodies.len() as u32);
        self.bodies.push(RecordedBody {
            desc,
            transform: PartTransform::new(desc.position, desc.orientation),
            torques: Vec::new(),
            forces: Vec::new(),
        });
        id
    }

    fn add_joint(&mut self, joint: JointDesc) -> Result<JointId, PhysicsError> {
        for part in joint.parts() {
            if self.body(part).is_none() {
                return Err(PhysicsError::UnknownJointPart {
                    joint: joint.kind.name(),
                    part,
                });
            }
        }

        let id = JointId::from_raw(self.joints.len() as u32);
        self.joints.push(Some(joint));
        Ok(id)
    }

    fn remove_joint(&mut self, joint: JointId) -> bool {
        self.joints
            .get_mut(joint.index())
            .and_then(Option::take)
            .is_some()
    }

    fn has_joint(&self, joint: JointId) -> bool {
        self.joint(joint).is_some()
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn part_transform(&self, part: PartId) -> Result<PartTransform, PhysicsError> {
        self.body(part)
            .map(|b| b.transform)
            .ok_or(PhysicsError::UnknownPart(part))
    }

    fn apply_torque(&mut self, part: PartId, torque: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(part)?.torques.push(torque);
        Ok(())
    }

    fn apply_force(
        &mut self,
        part: PartId,
        force: Vec3,
        local_offset: Vec3,
    ) -> Result<(), PhysicsError> {
        self.body_mut(part)?.forces.push(AppliedForce {
            force,
            local_offset,
        });
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for body in &mut self.bodies {
            body.torques.clear();
            body.forces.clear();
        }
        self.steps += 1;
        self.elapsed += dt;
    }

    fn part_count(&self) -> usize {
        self.bodies.len()
    }

    fn joint_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }
}
