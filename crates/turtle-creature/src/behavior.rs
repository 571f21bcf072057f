//! Per-tick reactions of the turtle
//!
//! Pure decision helpers; `Turtle::update` reads the world, runs these and
//! applies the resulting torques and forces.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use turtle_physics::PartTransform;

/// Seconds the turtle must lie on its back before the shell pops open
pub const FLIP_INTERVAL: f32 = 3.0;

/// Maximum base-to-target distance at which the tail wags (inclusive)
pub const TAIL_WAG_DISTANCE: f32 = 10.0;

/// Torque applied to the tail while wagging and to every leg each tick
pub const LEG_TORQUE: Vec3 = Vec3::new(10.0, 0.0, 0.0);

/// Force that lifts the shell once the latch is released
pub const FLIP_FORCE: Vec3 = Vec3::new(0.0, 20000.0, 0.0);

/// Countdown before an upside-down turtle opens its shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellFlipTimer {
    interval: f32,
    remaining: f32,
}

impl ShellFlipTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: interval,
        }
    }

    /// Advance the countdown
    /// Returns true when the countdown expired this tick (it is re-armed)
    pub fn tick(&mut self, up_y: f32, delta_time: f32) -> bool {
        if up_y < 0.0 {
            self.remaining -= delta_time;
        } else {
            self.remaining = self.interval;
        }

        if self.remaining < 0.0 {
            self.remaining = self.interval;
            return true;
        }

        false
    }

    /// Time left before the shell flips
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Default for ShellFlipTimer {
    fn default() -> Self {
        Self::new(FLIP_INTERVAL)
    }
}

/// Whether the tail should wag for a given base-to-target distance
pub fn should_wag_tail(distance: f32) -> bool {
    distance <= TAIL_WAG_DISTANCE
}

/// How far the head is turned away from the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadAim {
    /// Cosine between the head's look direction and the direction to the target
    pub dot: f32,
    /// Angle in radians
    pub angle: f32,
    /// Angle in degrees
    pub degrees: f32,
}

impl HeadAim {
    /// Measure the head's aim at `target`
    ///
    /// A target at the head's own position counts as perpendicular.
    pub fn measure(head: &PartTransform, target: Vec3) -> Self {
        let to_target = (target - head.position).normalize_or_zero();
        let dot = to_target.dot(head.look());
        let angle = dot.clamp(-1.0, 1.0).acos();

        Self {
            dot,
            angle,
            degrees: angle.to_degrees(),
        }
    }
}

/// What happened during one `Turtle::update`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Shell flip action ran and released the latch
    pub flipped: bool,
    pub tail_wagged: bool,
    pub distance_to_target: f32,
    pub head_aim: HeadAim,
    /// Countdown left after this tick
    pub flip_countdown: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::PI;

    #[test]
    fn test_upright_resets_countdown() {
        let mut timer = ShellFlipTimer::default();

        assert!(!timer.tick(-1.0, 1.0));
        assert_eq!(timer.remaining(), 2.0);

        assert!(!timer.tick(0.0, 1.0));
        assert_eq!(timer.remaining(), 3.0);

        assert!(!timer.tick(0.7, 1.0));
        assert_eq!(timer.remaining(), 3.0);
    }

    #[test]
    fn test_countdown_expires_strictly_below_zero() {
        let mut timer = ShellFlipTimer::default();

        // Exactly 3.0 elapsed leaves the countdown at zero
        for _ in 0..6 {
            assert!(!timer.tick(-1.0, 0.5));
        }
        assert_eq!(timer.remaining(), 0.0);

        assert!(timer.tick(-1.0, 0.5));
        assert_eq!(timer.remaining(), FLIP_INTERVAL);
    }

    #[test]
    fn test_flip_fires_once_per_exhaustion() {
        let mut timer = ShellFlipTimer::default();
        let dt = 0.25;

        let fired = (0..30).filter(|_| timer.tick(-1.0, dt)).count();

        // 7.5s upside down exhausts the countdown twice (after 3.25s and 6.5s)
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_interrupted_interval_never_fires() {
        let mut timer = ShellFlipTimer::default();

        for _ in 0..5 {
            for _ in 0..10 {
                assert!(!timer.tick(-1.0, 0.25));
            }
            // Briefly righted before the countdown runs out
            assert!(!timer.tick(1.0, 0.25));
        }
    }

    #[test]
    fn test_tail_wag_threshold_is_inclusive() {
        assert!(should_wag_tail(0.0));
        assert!(should_wag_tail(10.0));
        assert!(!should_wag_tail(10.0001));
    }

    #[test]
    fn test_head_aim_straight_ahead() {
        let head = PartTransform::new(Vec3::ZERO, Quat::IDENTITY);
        let aim = HeadAim::measure(&head, Vec3::new(0.0, 0.0, -5.0));

        assert!((aim.dot - 1.0).abs() < 1e-6);
        assert!(aim.angle.abs() < 1e-3);
        assert!(aim.degrees.abs() < 0.1);
    }

    #[test]
    fn test_head_aim_behind_and_sideways() {
        let head = PartTransform::new(Vec3::ZERO, Quat::IDENTITY);

        let behind = HeadAim::measure(&head, Vec3::new(0.0, 0.0, 5.0));
        assert!((behind.dot + 1.0).abs() < 1e-6);
        assert!((behind.degrees - 180.0).abs() < 0.1);

        let side = HeadAim::measure(&head, Vec3::new(4.0, 0.0, 0.0));
        assert!(side.dot.abs() < 1e-6);
        assert!((side.angle - PI / 2.0).abs() < 1e-5);
        assert!((side.degrees - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_head_aim_follows_head_rotation() {
        // Head turned to face +X
        let head = PartTransform::new(Vec3::ZERO, Quat::from_rotation_y(-PI / 2.0));
        let aim = HeadAim::measure(&head, Vec3::new(3.0, 0.0, 0.0));
        assert!((aim.dot - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_head_aim_at_own_position_is_finite() {
        let head = PartTransform::new(Vec3::ONE, Quat::IDENTITY);
        let aim = HeadAim::measure(&head, Vec3::ONE);
        assert_eq!(aim.dot, 0.0);
        assert!((aim.degrees - 90.0).abs() < 1e-3);
    }
}
