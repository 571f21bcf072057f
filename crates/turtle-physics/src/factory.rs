//! Shape and scenery helpers available on every engine

use glam::{Quat, Vec3};

use crate::traits::PhysicsEngine;
use crate::types::{BodyDesc, BodyKind, PartId, Shape};

/// Half extents of the static ground slab
pub const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(500.0, 0.5, 500.0);

/// Radius of the kinematic camera proxy
pub const CAMERA_PROXY_RADIUS: f32 = 0.5;

/// Vertical gap between stacked wall blocks
const WALL_ROW_GAP: f32 = 1.0;

/// Horizontal gap between neighbouring wall blocks
const WALL_COLUMN_GAP: f32 = 2.0;

/// Convenience constructors layered on top of `PhysicsEngine::create_body`
pub trait PhysicsFactory: PhysicsEngine {
    /// Dynamic sphere
    fn create_sphere(&mut self, radius: f32, position: Vec3, orientation: Quat) -> PartId {
        self.create_body(BodyDesc::dynamic(
            Shape::Sphere { radius },
            position,
            orientation,
        ))
    }

    /// Dynamic Y-aligned cylinder
    fn create_cylinder(
        &mut self,
        radius: f32,
        height: f32,
        position: Vec3,
        orientation: Quat,
    ) -> PartId {
        self.create_body(BodyDesc::dynamic(
            Shape::Cylinder { radius, height },
            position,
            orientation,
        ))
    }

    /// Dynamic Y-aligned capsule
    fn create_capsule(
        &mut self,
        radius: f32,
        height: f32,
        position: Vec3,
        orientation: Quat,
    ) -> PartId {
        self.create_body(BodyDesc::dynamic(
            Shape::Capsule { radius, height },
            position,
            orientation,
        ))
    }

    /// Dynamic box
    fn create_box(
        &mut self,
        width: f32,
        height: f32,
        depth: f32,
        position: Vec3,
        orientation: Quat,
    ) -> PartId {
        self.create_body(BodyDesc::dynamic(
            Shape::Box {
                width,
                height,
                depth,
            },
            position,
            orientation,
        ))
    }

    /// Static ground slab whose top face sits at y=0
    fn create_ground_physics(&mut self) -> PartId {
        let ground = self.create_body(
            BodyDesc::dynamic(
                Shape::Box {
                    width: GROUND_HALF_EXTENTS.x * 2.0,
                    height: GROUND_HALF_EXTENTS.y * 2.0,
                    depth: GROUND_HALF_EXTENTS.z * 2.0,
                },
                Vec3::new(0.0, -GROUND_HALF_EXTENTS.y, 0.0),
                Quat::IDENTITY,
            )
            .with_kind(BodyKind::Fixed),
        );

        log::debug!(
            "Physics: Created ground plane at y=0 ({}x{})",
            GROUND_HALF_EXTENTS.x * 2.0,
            GROUND_HALF_EXTENTS.z * 2.0
        );

        ground
    }

    /// Kinematic sphere that stands in for the camera so it can push objects
    fn create_camera_physics(&mut self, position: Vec3) -> PartId {
        self.create_body(
            BodyDesc::dynamic(
                Shape::Sphere {
                    radius: CAMERA_PROXY_RADIUS,
                },
                position,
                Quat::IDENTITY,
            )
            .with_kind(BodyKind::Kinematic),
        )
    }

    /// Stack of `width` x `height` boxes standing on `start_at`
    fn create_wall(
        &mut self,
        start_at: Vec3,
        width: u32,
        height: u32,
        block_width: f32,
        block_height: f32,
        block_depth: f32,
    ) -> Vec<PartId> {
        let mut blocks = Vec::with_capacity((width * height) as usize);

        for w in 0..width {
            for h in 0..height {
                let x = start_at.x + (block_width + WALL_COLUMN_GAP) * w as f32;
                let y = start_at.y
                    + (block_height + WALL_ROW_GAP) / 2.0
                    + (block_height + WALL_ROW_GAP) * h as f32;
                blocks.push(self.create_box(
                    block_width,
                    block_height,
                    block_depth,
                    Vec3::new(x, y, start_at.z),
                    Quat::IDENTITY,
                ));
            }
        }

        log::debug!(
            "Physics: Created {}x{} wall at ({:.1}, {:.1}, {:.1})",
            width,
            height,
            start_at.x,
            start_at.y,
            start_at.z
        );

        blocks
    }
}

impl<T: PhysicsEngine + ?Sized> PhysicsFactory for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingWorld;

    #[test]
    fn test_wall_block_count_and_layout() {
        let mut world = RecordingWorld::new();
        let blocks = world.create_wall(Vec3::new(20.0, 0.0, 20.0), 3, 2, 2.0, 2.0, 2.0);

        assert_eq!(blocks.len(), 6);
        assert_eq!(world.part_count(), 6);

        let first = world.body(blocks[0]).unwrap();
        assert_eq!(first.desc.position, Vec3::new(20.0, 1.5, 20.0));

        // Second block of the first column sits one row higher
        let stacked = world.body(blocks[1]).unwrap();
        assert_eq!(stacked.desc.position, Vec3::new(20.0, 4.5, 20.0));

        // First block of the second column
        let next_column = world.body(blocks[2]).unwrap();
        assert_eq!(next_column.desc.position, Vec3::new(24.0, 1.5, 20.0));
    }

    #[test]
    fn test_ground_is_static_with_top_at_zero() {
        let mut world = RecordingWorld::new();
        let ground = world.create_ground_physics();
        let body = world.body(ground).unwrap();

        assert_eq!(body.desc.kind, BodyKind::Fixed);
        match body.desc.shape {
            Shape::Box { height, .. } => {
                assert_eq!(body.desc.position.y + height / 2.0, 0.0);
            }
            other => panic!("unexpected ground shape {:?}", other),
        }
    }

    #[test]
    fn test_camera_proxy_is_kinematic() {
        let mut world = RecordingWorld::new();
        let camera = world.create_camera_physics(Vec3::new(0.0, 10.0, 20.0));
        assert_eq!(world.body(camera).unwrap().desc.kind, BodyKind::Kinematic);
    }
}
