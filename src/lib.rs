//! # Turtle - articulated shell creature in a rigid-body scene
//!
//! A turtle built from jointed bodies wanders a small scene, wags its tail
//! near a ball and pops its shell open when left lying on its back.

pub mod config;
pub mod game;
pub mod scene;

pub use config::GameConfig;
pub use game::{Game, GameBase};
pub use scene::TurtleGame;
