//! Rigid-body engine abstraction for the turtle
//!
//! This crate implements:
//! - Opaque part/joint handles and transform snapshots
//! - Engine-neutral joint descriptions (hinge, cone-twist, fixed)
//! - The `PhysicsEngine` trait plus `PhysicsFactory` shape/scene helpers
//! - A rapier3d backend and a headless recording backend

pub mod error;
pub mod factory;
pub mod joint;
pub mod physics;
pub mod recording;
pub mod traits;
pub mod types;

// Re-export main types for convenience
pub use error::PhysicsError;
pub use factory::PhysicsFactory;
pub use joint::{ConeTwistLimits, JointDesc, JointFrame, JointKind};
pub use physics::RapierWorld;
pub use recording::RecordingWorld;
pub use traits::PhysicsEngine;
pub use types::{BodyDesc, BodyKind, JointId, PartId, PartTransform, Shape};
