//! Shell turtle built from jointed rigid bodies
//!
//! This crate implements:
//! - The turtle body plan derived from position and scale
//! - Assembly of that plan into parts and joints of a `PhysicsEngine`
//! - The per-tick behavior: shell flip timer, tail wag, head aim, leg drive

pub mod behavior;
pub mod morphology;
pub mod turtle;

// Re-export main types for convenience
pub use behavior::{HeadAim, ShellFlipTimer, TickReport};
pub use morphology::{JointRole, LegPosition, PartRole, TurtleMorphology};
pub use turtle::{AssemblyError, Turtle};
