//! The turtle scene: ground, camera proxy, a block wall, a ball and the turtle
//! that chases it

use glam::Quat;
use turtle_creature::{TickReport, Turtle};
use turtle_physics::{PartId, PhysicsEngine, PhysicsFactory, RapierWorld};

use crate::config::GameConfig;
use crate::game::{Game, GameBase};

/// Scene that drives one turtle towards a ball
pub struct TurtleGame<E: PhysicsEngine = RapierWorld> {
    base: GameBase<E>,
    config: GameConfig,

    ball: Option<PartId>,
    turtle: Option<Turtle>,
    last_report: Option<TickReport>,
}

impl<E: PhysicsEngine + Default> TurtleGame<E> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_world(E::default(), config)
    }
}

impl<E: PhysicsEngine> TurtleGame<E> {
    pub fn with_world(world: E, config: GameConfig) -> Self {
        Self {
            base: GameBase::new(world),
            config,
            ball: None,
            turtle: None,
            last_report: None,
        }
    }

    pub fn world(&self) -> &E {
        self.base.world()
    }

    pub fn world_mut(&mut self) -> &mut E {
        self.base.world_mut()
    }

    pub fn turtle(&self) -> Option<&Turtle> {
        self.turtle.as_ref()
    }

    pub fn ball(&self) -> Option<PartId> {
        self.ball
    }

    /// Outcome of the most recent creature update
    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn elapsed(&self) -> f32 {
        self.base.elapsed()
    }

    pub fn frames(&self) -> u64 {
        self.base.frames()
    }

    fn build_scene(&mut self) -> Result<(PartId, Turtle), turtle_creature::AssemblyError> {
        let scene = &self.config.scene;
        let world = self.base.world_mut();

        world.create_ground_physics();
        world.create_camera_physics(scene.camera_position());
        world.set_gravity(scene.gravity());

        let wall = &scene.wall;
        world.create_wall(
            wall.start(),
            wall.width,
            wall.height,
            wall.block_width,
            wall.block_height,
            wall.block_depth,
        );

        let ball = world.create_sphere(scene.ball_radius, scene.ball_position(), Quat::IDENTITY);

        let turtle = Turtle::assemble(world, scene.turtle_position(), scene.turtle_scale)?
            .with_diagnostics(self.config.debug.head_aim_diagnostics);

        Ok((ball, turtle))
    }
}

impl<E: PhysicsEngine> Game for TurtleGame<E> {
    fn initialise(&mut self) -> bool {
        let (ball, turtle) = match self.build_scene() {
            Ok(built) => built,
            Err(e) => {
                log::error!("TurtleGame: Failed to build scene: {}", e);
                return false;
            }
        };

        log::info!(
            "TurtleGame: Scene ready, turtle at {} chasing ball at {}",
            self.config.scene.turtle_position(),
            self.config.scene.ball_position()
        );

        self.ball = Some(ball);
        self.turtle = Some(turtle);
        self.last_report = None;

        self.base.initialise()
    }

    fn update(&mut self, delta_time: f32) {
        let (Some(turtle), Some(ball)) = (self.turtle.as_mut(), self.ball) else {
            log::warn!("TurtleGame: update called before initialise, ignoring");
            return;
        };

        let world = self.base.world_mut();
        match world.part_transform(ball) {
            Ok(target) => match turtle.update(world, target.position, delta_time) {
                Ok(report) => self.last_report = Some(report),
                Err(e) => log::error!("TurtleGame: Turtle update failed: {}", e),
            },
            Err(e) => {
                log::error!("TurtleGame: Lost track of the ball, skipping turtle: {}", e)
            }
        }

        self.base.update(delta_time);
    }

    fn cleanup(&mut self) {
        if let Some(turtle) = self.turtle.take() {
            log::info!(
                "TurtleGame: Releasing turtle (shell {})",
                if turtle.is_shell_open() { "open" } else { "closed" }
            );
        }
        self.ball = None;
        self.last_report = None;

        self.base.cleanup();
    }
}
