//! Host lifecycle shared by every scene
//!
//! A scene implements `Game`, runs its own logic in `update` and then calls
//! through to its `GameBase`, which owns the world and steps it.

use turtle_physics::PhysicsEngine;

/// Lifecycle hooks driven by the fixed-step loop
pub trait Game {
    /// Build the scene. Returns false if anything failed.
    fn initialise(&mut self) -> bool;

    /// Advance one tick
    fn update(&mut self, delta_time: f32);

    /// Release everything the scene created
    fn cleanup(&mut self);
}

/// World ownership and stepping
pub struct GameBase<E: PhysicsEngine> {
    world: E,
    elapsed: f32,
    frames: u64,
    running: bool,
}

impl<E: PhysicsEngine> GameBase<E> {
    pub fn new(world: E) -> Self {
        Self {
            world,
            elapsed: 0.0,
            frames: 0,
            running: false,
        }
    }

    pub fn world(&self) -> &E {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut E {
        &mut self.world
    }

    /// Simulated seconds since `initialise`
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Ticks since `initialise`
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<E: PhysicsEngine> Game for GameBase<E> {
    fn initialise(&mut self) -> bool {
        self.elapsed = 0.0;
        self.frames = 0;
        self.running = true;

        log::info!(
            "Game: Initialised with {} parts, {} joints",
            self.world.part_count(),
            self.world.joint_count()
        );
        true
    }

    fn update(&mut self, delta_time: f32) {
        if !self.running {
            return;
        }

        self.world.step(delta_time);
        self.elapsed += delta_time;
        self.frames += 1;
    }

    fn cleanup(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        log::info!(
            "Game: Stopped after {} frames ({:.2}s simulated)",
            self.frames,
            self.elapsed
        );
    }
}
