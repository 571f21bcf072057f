//! Turtle body plan
//!
//! Derives every part and joint of the turtle from a spawn position and a
//! uniform scale. The result is physics-independent and serializable;
//! `Turtle::assemble` turns it into bodies and joints.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use turtle_physics::{ConeTwistLimits, JointFrame, JointKind, Shape};

/// Corner a leg is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegPosition {
    RightFront,
    LeftFront,
    RightBack,
    LeftBack,
}

impl LegPosition {
    /// All legs in assembly order
    pub fn all() -> &'static [LegPosition; 4] {
        &[
            LegPosition::RightFront,
            LegPosition::LeftFront,
            LegPosition::RightBack,
            LegPosition::LeftBack,
        ]
    }

    /// -1 for right legs, +1 for left legs (X axis)
    pub fn lateral_sign(&self) -> f32 {
        match self {
            LegPosition::RightFront | LegPosition::RightBack => -1.0,
            LegPosition::LeftFront | LegPosition::LeftBack => 1.0,
        }
    }

    /// +1 for front legs, -1 for back legs (Z axis, the head side is +Z)
    pub fn longitudinal_sign(&self) -> f32 {
        match self {
            LegPosition::RightFront | LegPosition::LeftFront => 1.0,
            LegPosition::RightBack | LegPosition::LeftBack => -1.0,
        }
    }

    /// Leg on the other side of the body
    pub fn mirrored(&self) -> LegPosition {
        match self {
            LegPosition::RightFront => LegPosition::LeftFront,
            LegPosition::LeftFront => LegPosition::RightFront,
            LegPosition::RightBack => LegPosition::LeftBack,
            LegPosition::LeftBack => LegPosition::RightBack,
        }
    }

    /// Array slot used by `Turtle` for per-leg handles
    pub fn slot(&self) -> usize {
        match self {
            LegPosition::RightFront => 0,
            LegPosition::LeftFront => 1,
            LegPosition::RightBack => 2,
            LegPosition::LeftBack => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LegPosition::RightFront => "right front leg",
            LegPosition::LeftFront => "left front leg",
            LegPosition::RightBack => "right back leg",
            LegPosition::LeftBack => "left back leg",
        }
    }
}

/// What a body part is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartRole {
    /// Hub every other part attaches to
    Base,
    Head,
    Tail,
    Shell,
    Leg(LegPosition),
}

impl std::fmt::Display for PartRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartRole::Base => write!(f, "base"),
            PartRole::Head => write!(f, "head"),
            PartRole::Tail => write!(f, "tail"),
            PartRole::Shell => write!(f, "shell"),
            PartRole::Leg(leg) => write!(f, "{}", leg.name()),
        }
    }
}

/// What a joint is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointRole {
    HeadHinge,
    TailCone,
    LegCone(LegPosition),
    ShellHinge,
    /// Fixed joint holding the shell closed against the shell hinge
    ShellLatch,
}

/// Body part specification (physics-independent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartSpec {
    pub role: PartRole,
    pub shape: Shape,
    /// World-space spawn position
    pub position: Vec3,
}

/// Joint connecting two body parts by role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub role: JointRole,
    pub part_a: PartRole,
    pub part_b: PartRole,
    pub kind: JointKind,
}

/// Complete turtle body plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurtleMorphology {
    pub position: Vec3,
    pub scale: f32,
    pub shell_radius: f32,
    pub head_scale: f32,
    pub leg_length: f32,
    pub leg_width: f32,
    /// Parts in assembly order, base first
    pub parts: Vec<PartSpec>,
    /// Articulation joints in assembly order (latch excluded)
    pub joints: Vec<JointSpec>,
    pub latch: JointSpec,
}

impl TurtleMorphology {
    /// Derive the body plan for a turtle at `position` with uniform `scale`
    ///
    /// `scale` is not validated; non-positive values give degenerate geometry.
    pub fn new(position: Vec3, scale: f32) -> Self {
        let shell_radius = scale / 2.0;
        let head_scale = scale / 6.0;
        let leg_length = scale / 10.0;
        let leg_width = scale / 18.0;
        let tail_radius = scale / 20.0;
        let tail_length = scale / 18.0;
        let quarter = shell_radius / 4.0;

        let mut parts = Vec::with_capacity(8);
        let mut joints = Vec::with_capacity(7);

        // Body which all parts attach to
        parts.push(PartSpec {
            role: PartRole::Base,
            shape: Shape::Cylinder {
                radius: shell_radius,
                height: shell_radius / 2.0,
            },
            position,
        });

        // Head in front, swinging left/right
        parts.push(PartSpec {
            role: PartRole::Head,
            shape: Shape::Sphere { radius: head_scale },
            position: position + Vec3::new(0.0, quarter, shell_radius + 1.0),
        });
        joints.push(JointSpec {
            role: JointRole::HeadHinge,
            part_a: PartRole::Base,
            part_b: PartRole::Head,
            kind: JointKind::Hinge {
                pivot_a: Vec3::new(0.0, quarter, shell_radius),
                pivot_b: Vec3::new(0.0, 0.0, -head_scale - 1.0),
                axis_a: Vec3::Y,
                axis_b: Vec3::Y,
            },
        });

        // Tail behind, free to swing within a quarter turn
        parts.push(PartSpec {
            role: PartRole::Tail,
            shape: Shape::Capsule {
                radius: tail_radius,
                height: tail_length,
            },
            position: position + Vec3::new(0.0, quarter, -(shell_radius + tail_radius)),
        });
        let flipped = Quat::from_rotation_z(PI);
        joints.push(JointSpec {
            role: JointRole::TailCone,
            part_a: PartRole::Base,
            part_b: PartRole::Tail,
            kind: JointKind::ConeTwist {
                frame_a: JointFrame::new(
                    Vec3::new(0.0, quarter, -shell_radius - scale / 10.0),
                    flipped,
                ),
                frame_b: JointFrame::new(Vec3::new(0.0, tail_radius, 0.0), flipped),
                limits: ConeTwistLimits::new(FRAC_PI_2, FRAC_PI_2, 0.0),
            },
        });

        // Legs at the four corners, swinging freely but not twisting
        for &leg in LegPosition::all() {
            let side = leg.lateral_sign();
            let end = leg.longitudinal_sign();
            parts.push(PartSpec {
                role: PartRole::Leg(leg),
                shape: Shape::Capsule {
                    radius: leg_width,
                    height: leg_length,
                },
                position: position
                    + Vec3::new(
                        side * (scale / 2.0 + leg_length),
                        -leg_length / 2.0,
                        end * scale / 3.0,
                    ),
            });
            joints.push(JointSpec {
                role: JointRole::LegCone(leg),
                part_a: PartRole::Leg(leg),
                part_b: PartRole::Base,
                kind: JointKind::ConeTwist {
                    frame_a: JointFrame::from_origin(Vec3::new(0.0, leg_length, 0.0)),
                    frame_b: JointFrame::from_origin(Vec3::new(
                        side * scale / 2.0,
                        -leg_length / 2.0,
                        end * scale / 3.0,
                    )),
                    limits: ConeTwistLimits::new(PI * 2.0, PI * 2.0, 0.0),
                },
            });
        }

        // Shell on top, hinged at the back so it can flip open
        parts.push(PartSpec {
            role: PartRole::Shell,
            shape: Shape::Cylinder {
                radius: shell_radius,
                height: shell_radius / 2.0,
            },
            position: position + Vec3::new(0.0, shell_radius / 2.0, 0.0),
        });
        joints.push(JointSpec {
            role: JointRole::ShellHinge,
            part_a: PartRole::Shell,
            part_b: PartRole::Base,
            kind: JointKind::Hinge {
                pivot_a: Vec3::new(0.0, -quarter, -shell_radius),
                pivot_b: Vec3::new(0.0, quarter, -shell_radius),
                axis_a: Vec3::X,
                axis_b: Vec3::X,
            },
        });

        // Latch at the front keeps the shell shut while moving normally
        let latch = JointSpec {
            role: JointRole::ShellLatch,
            part_a: PartRole::Shell,
            part_b: PartRole::Base,
            kind: JointKind::Fixed {
                frame_a: JointFrame::from_origin(Vec3::new(0.0, -quarter, shell_radius)),
                frame_b: JointFrame::from_origin(Vec3::new(0.0, quarter, shell_radius)),
            },
        };

        Self {
            position,
            scale,
            shell_radius,
            head_scale,
            leg_length,
            leg_width,
            parts,
            joints,
            latch,
        }
    }

    /// Part spec by role
    pub fn part(&self, role: PartRole) -> Option<&PartSpec> {
        self.parts.iter().find(|p| p.role == role)
    }

    /// Joint spec by role (including the latch)
    pub fn joint(&self, role: JointRole) -> Option<&JointSpec> {
        self.joints
            .iter()
            .chain(std::iter::once(&self.latch))
            .find(|j| j.role == role)
    }

    /// Spawn offset of a part relative to the turtle position
    pub fn offset(&self, role: PartRole) -> Option<Vec3> {
        self.part(role).map(|p| p.position - self.position)
    }

    /// Shell-local point where the opening impulse is applied (the latch side)
    pub fn shell_lift_point(&self) -> Vec3 {
        Vec3::new(0.0, -self.shell_radius / 4.0, self.shell_radius)
    }

    /// Validate structure (unique roles, joint endpoints present)
    pub fn validate(&self) -> Result<(), String> {
        for (i, part) in self.parts.iter().enumerate() {
            if self.parts[..i].iter().any(|p| p.role == part.role) {
                return Err(format!("Duplicate part role: {}", part.role));
            }
        }

        for joint in self.joints.iter().chain(std::iter::once(&self.latch)) {
            for role in [joint.part_a, joint.part_b] {
                if self.part(role).is_none() {
                    return Err(format!(
                        "Joint {:?} references missing part: {}",
                        joint.role, role
                    ));
                }
            }
            if joint.part_a == joint.part_b {
                return Err(format!("Joint {:?} connects {} to itself", joint.role, joint.part_a));
            }
        }

        if !matches!(self.latch.kind, JointKind::Fixed { .. }) {
            return Err(format!("Latch must be a fixed joint, got {}", self.latch.kind.name()));
        }

        Ok(())
    }
}
