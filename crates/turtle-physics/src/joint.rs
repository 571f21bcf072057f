//! Engine-neutral joint descriptions
//!
//! Anchors and frames are expressed in each body's local space, `a` being the
//! first body passed to the joint and `b` the second.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::PartId;

/// Local attachment frame of one joint endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointFrame {
    pub origin: Vec3,
    pub rotation: Quat,
}

impl JointFrame {
    pub fn from_origin(origin: Vec3) -> Self {
        Self {
            origin,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn new(origin: Vec3, rotation: Quat) -> Self {
        Self { origin, rotation }
    }
}

/// Half-angle limits of a cone-twist joint (radians)
///
/// `swing_span1` and `swing_span2` bound the swing cone around the frame's Z
/// and Y axes, `twist_span` bounds rotation around the frame's X axis. A swing
/// span of pi or more leaves that axis unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeTwistLimits {
    pub swing_span1: f32,
    pub swing_span2: f32,
    pub twist_span: f32,
}

impl ConeTwistLimits {
    pub fn new(swing_span1: f32, swing_span2: f32, twist_span: f32) -> Self {
        Self {
            swing_span1,
            swing_span2,
            twist_span,
        }
    }

    /// Whether a swing span is wide enough to impose no limit
    pub fn is_unbounded(span: f32) -> bool {
        span >= std::f32::consts::PI
    }
}

/// Joint type between two parts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JointKind {
    /// One rotational degree of freedom about `axis_a`/`axis_b`
    Hinge {
        pivot_a: Vec3,
        pivot_b: Vec3,
        axis_a: Vec3,
        axis_b: Vec3,
    },
    /// Ball joint with a limited swing cone and twist
    ConeTwist {
        frame_a: JointFrame,
        frame_b: JointFrame,
        limits: ConeTwistLimits,
    },
    /// No relative motion
    Fixed {
        frame_a: JointFrame,
        frame_b: JointFrame,
    },
}

impl JointKind {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            JointKind::Hinge { .. } => "hinge",
            JointKind::ConeTwist { .. } => "cone-twist",
            JointKind::Fixed { .. } => "fixed",
        }
    }
}

/// Joint connecting two parts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointDesc {
    pub part_a: PartId,
    pub part_b: PartId,
    pub kind: JointKind,
}

impl JointDesc {
    pub fn new(part_a: PartId, part_b: PartId, kind: JointKind) -> Self {
        Self {
            part_a,
            part_b,
            kind,
        }
    }

    /// Both endpoints, in order
    pub fn parts(&self) -> [PartId; 2] {
        [self.part_a, self.part_b]
    }
}
