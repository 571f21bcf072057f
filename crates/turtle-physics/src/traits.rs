//! World access trait for game code
//!
//! Decouples creatures and scenes from the concrete rigid-body engine. All
//! dynamics, collision and constraint solving stay inside the implementor.

use glam::Vec3;

use crate::error::PhysicsError;
use crate::joint::JointDesc;
use crate::types::{BodyDesc, JointId, PartId, PartTransform};

/// A rigid-body simulation world
pub trait PhysicsEngine {
    /// Create a body with a single collider and return its handle
    fn create_body(&mut self, desc: BodyDesc) -> PartId;

    /// Register a joint between two existing parts
    fn add_joint(&mut self, joint: JointDesc) -> Result<JointId, PhysicsError>;

    /// Remove a joint from the simulation
    /// Returns false if the joint was already removed (or never existed)
    fn remove_joint(&mut self, joint: JointId) -> bool;

    /// Check if a joint is currently part of the simulation
    fn has_joint(&self, joint: JointId) -> bool;

    /// Set world gravity
    fn set_gravity(&mut self, gravity: Vec3);

    /// Get world gravity
    fn gravity(&self) -> Vec3;

    /// Current world transform of a part
    fn part_transform(&self, part: PartId) -> Result<PartTransform, PhysicsError>;

    /// Apply a torque for the next step
    fn apply_torque(&mut self, part: PartId, torque: Vec3) -> Result<(), PhysicsError>;

    /// Apply a force for the next step at an offset given in part-local space
    fn apply_force(
        &mut self,
        part: PartId,
        force: Vec3,
        local_offset: Vec3,
    ) -> Result<(), PhysicsError>;

    /// Advance the simulation by `dt` seconds
    ///
    /// Forces and torques applied before the step are consumed by it. A
    /// non-positive `dt` is ignored.
    fn step(&mut self, dt: f32);

    /// Number of parts in the world
    fn part_count(&self) -> usize;

    /// Number of joints currently in the simulation
    fn joint_count(&self) -> usize;
}
