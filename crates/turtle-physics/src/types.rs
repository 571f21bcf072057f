//! Common types shared by every engine backend
//!
//! Handles are plain arena indices assigned by the owning world, so they are
//! only meaningful for the world that created them.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a rigid body part owned by a physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartId(u32);

impl PartId {
    /// Create a handle from a raw arena index
    pub fn from_raw(index: u32) -> Self {
        PartId(index)
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Part({})", self.0)
    }
}

/// Handle to a joint registered with a physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointId(u32);

impl JointId {
    /// Create a handle from a raw arena index
    pub fn from_raw(index: u32) -> Self {
        JointId(index)
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for JointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Joint({})", self.0)
    }
}

/// Collision shape of a part
///
/// Cylinders and capsules are aligned with the local Y axis. For capsules,
/// `height` is the length of the cylindrical section between the caps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Sphere { radius: f32 },
    Cylinder { radius: f32, height: f32 },
    Capsule { radius: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
}

/// How the engine moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BodyKind {
    /// Fully simulated
    #[default]
    Dynamic,
    /// Never moves (ground, static scenery)
    Fixed,
    /// Moved by game code only (camera proxy)
    Kinematic,
}

/// Everything needed to create one part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub shape: Shape,
    pub position: Vec3,
    pub orientation: Quat,
    pub kind: BodyKind,
}

impl BodyDesc {
    /// Dynamic body
    pub fn dynamic(shape: Shape, position: Vec3, orientation: Quat) -> Self {
        Self {
            shape,
            position,
            orientation,
            kind: BodyKind::Dynamic,
        }
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }
}

/// World transform snapshot of a part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl PartTransform {
    /// Forward direction of an unrotated part (camera-style look basis)
    pub const BASIS_LOOK: Vec3 = Vec3::NEG_Z;

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Local +Y in world space
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local look direction in world space
    pub fn look(&self) -> Vec3 {
        self.rotation * Self::BASIS_LOOK
    }
}

impl Default for PartTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}
