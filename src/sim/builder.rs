//! Procedural course generation
//!
//! Lays down the fixed opening field, then streams obstacle batches ahead of
//! the camera as the character advances, and finally caps the course with a
//! closing composition. Layout is deterministic given the run RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use rapier2d::prelude::RigidBodyHandle;

use crate::consts::*;
use crate::sim::physics::{BodyKind, BodySpec, PhysicsWorld, ShapeSpec};
use crate::sim::registry::{Entity, EntityKind, EntityRegistry};

/// Borrowed view over the two world halves the builder mutates together:
/// every spawned body gets a registry record in the same call.
pub struct CourseBuilder<'a> {
    physics: &'a mut PhysicsWorld,
    entities: &'a mut EntityRegistry,
}

impl<'a> CourseBuilder<'a> {
    pub fn new(physics: &'a mut PhysicsWorld, entities: &'a mut EntityRegistry) -> Self {
        Self { physics, entities }
    }

    /// The opening layout. Returns the character's body handle.
    pub fn initial_course(&mut self) -> RigidBodyHandle {
        self.ground(GROUND_WIDTH, GROUND_HEIGHT, 0.0, 0.0, true);
        self.ground(GROUND_WIDTH, GROUND_HEIGHT, 0.0, GROUND_BAND_OFFSET, false);
        let character = self.character(
            -GROUND_WIDTH / 2.0 + CHARACTER_WIDTH / 2.0,
            10.0,
        );
        self.stone_block(30.0, 2.0, 25.0, 25.0);

        // Paired platform rounds at increasing offsets; the last round drops
        // its upper platform to a slightly sunken single group.
        for round in 0..3 {
            let x = 10.0 + 10.0 * round as f32;
            if round != 2 {
                self.block_group(x, 18.0 - 3.0 * round as f32);
            } else {
                self.block_group(x, 6.978 + 3.0 * round as f32);
            }
            if round < 2 {
                self.block_group(x, 7.0 + 3.0 * round as f32);
            }
        }

        self.stone_block(30.0, 2.0, 25.0, 0.0);
        character
    }

    /// A static ground strip. The lower band also grows a short staircase of
    /// stone blocks off its left edge.
    pub fn ground(&mut self, width: f32, height: f32, x: f32, y: f32, is_top: bool) {
        let spec = BodySpec::new(
            BodyKind::Static,
            ShapeSpec::Cuboid { width, height },
            Vec2::new(x, y),
        )
        .friction(GROUND_FRICTION);
        let body = self.physics.create_body(&spec);
        self.entities.add(Entity {
            kind: EntityKind::Ground,
            body,
            width,
            height,
        });

        if !is_top {
            self.staircase(x);
        }
    }

    /// Five steps ascending from the ground's left edge, then back down by
    /// half a block width per step after the third.
    fn staircase(&mut self, ground_x: f32) {
        let mut step_y = 0.0;
        for i in 0..STAIR_STEPS {
            let step_x = STONE_BLOCK_WIDTH / 2.0 + ground_x - GROUND_WIDTH / 2.0
                + STONE_BLOCK_WIDTH * i as f32;
            if i <= 2 {
                step_y = GROUND_HEIGHT / 2.0
                    + STONE_BLOCK_HEIGHT / 2.0
                    + STONE_BLOCK_WIDTH / 2.0 * i as f32;
            } else {
                step_y -= STONE_BLOCK_WIDTH / 2.0;
            }
            self.stone_block(STONE_BLOCK_WIDTH, STONE_BLOCK_HEIGHT, step_x, step_y);
        }
    }

    pub fn stone_block(&mut self, width: f32, height: f32, x: f32, y: f32) {
        let spec = BodySpec::new(
            BodyKind::Static,
            ShapeSpec::Cuboid { width, height },
            Vec2::new(x, y),
        );
        let body = self.physics.create_body(&spec);
        self.entities.add(Entity {
            kind: EntityKind::StoneBlock,
            body,
            width,
            height,
        });
    }

    /// A wide platform anchored left of its center.
    pub fn block_group(&mut self, x: f32, y: f32) {
        self.stone_block(
            BLOCK_GROUP_WIDTH,
            STONE_BLOCK_HEIGHT,
            x + BLOCK_GROUP_WIDTH,
            y,
        );
    }

    pub fn character(&mut self, x: f32, y: f32) -> RigidBodyHandle {
        let spec = BodySpec::new(
            BodyKind::Dynamic,
            ShapeSpec::Cuboid {
                width: CHARACTER_WIDTH,
                height: CHARACTER_HEIGHT,
            },
            Vec2::new(x, y),
        )
        .density(CHARACTER_DENSITY)
        .fixed_rotation()
        .no_sleep();
        let body = self.physics.create_body(&spec);
        self.entities.add(Entity {
            kind: EntityKind::Character,
            body,
            width: CHARACTER_WIDTH,
            height: CHARACTER_HEIGHT,
        });
        body
    }

    pub fn coin(&mut self, x: f32, y: f32) {
        let spec = BodySpec::new(
            BodyKind::Kinematic,
            ShapeSpec::Cuboid {
                width: COIN_SIZE,
                height: COIN_SIZE,
            },
            Vec2::new(x, y),
        )
        .density(COIN_DENSITY)
        .fixed_rotation();
        let body = self.physics.create_body(&spec);
        self.entities.add(Entity {
            kind: EntityKind::Coin,
            body,
            width: COIN_SIZE,
            height: COIN_SIZE,
        });
    }

    /// Two stone blocks anchored at (x, y): a wide platform segment and a
    /// narrow capstone raised or sunken by the top flag. Bottom-flagged pairs
    /// on a coin lane also drop a row of coins just outside the obstacle.
    pub fn obstacle_pair(&mut self, x: f32, y: f32, is_top: bool) {
        let cap_rise = if is_top {
            OBSTACLE_CAP_RISE
        } else {
            -OBSTACLE_CAP_RISE
        };
        self.stone_block(
            OBSTACLE_PLATFORM_WIDTH,
            STONE_BLOCK_HEIGHT,
            x + 5.0,
            y,
        );
        self.stone_block(
            OBSTACLE_CAP_WIDTH,
            STONE_BLOCK_HEIGHT,
            x + 10.0,
            y + cap_rise,
        );

        if is_top {
            return;
        }
        let row_y = if y == TOP_LANE_Y || y == MID_LOW_LANE_Y {
            Some(y - COIN_ROW_OFFSET)
        } else if y == BOTTOM_LANE_Y || y == MID_HIGH_LANE_Y {
            Some(y + COIN_ROW_OFFSET)
        } else {
            None
        };
        if let Some(row_y) = row_y {
            for i in 0..COIN_ROW_LEN {
                self.coin(x + COIN_SPACING * i as f32, row_y);
            }
        }
    }

    /// One streamed batch ahead of the frontier: ten iterations of three
    /// lanes of obstacle pairs. The mid lanes get complementary random flags
    /// except on the last iteration, which is pinned so the approach to the
    /// ending stays traversable.
    pub fn batch(&mut self, rng: &mut Pcg32, mut frontier: f32) {
        for i in 0..STREAM_ITERATIONS {
            if i == 0 && frontier >= 90.0 {
                frontier -= 2.0;
            } else {
                frontier += 5.0;
            }

            let flip = rng.random_bool(0.5);
            let x = frontier + STREAM_PITCH * i as f32;

            self.obstacle_pair(x, TOP_LANE_Y, rng.random_bool(0.5));
            if i == STREAM_ITERATIONS - 1 {
                self.obstacle_pair(x + MID_LANE_NUDGE, MID_HIGH_LANE_Y, false);
                self.obstacle_pair(x + MID_LANE_NUDGE, MID_LOW_LANE_Y, true);
            } else {
                self.obstacle_pair(x + MID_LANE_NUDGE, MID_HIGH_LANE_Y, flip);
                self.obstacle_pair(x + MID_LANE_NUDGE, MID_LOW_LANE_Y, !flip);
            }
            self.obstacle_pair(x, BOTTOM_LANE_Y, rng.random_bool(0.5));
        }
    }

    /// The closing composition: two final platforms and a bounding ground
    /// pair at the frontier.
    pub fn ending(&mut self, frontier: f32) {
        self.block_group(frontier - 10.0, TOP_LANE_Y);
        self.block_group(frontier - 10.0, BOTTOM_LANE_Y);
        self.ground(GROUND_WIDTH, GROUND_HEIGHT, frontier + 20.0, 0.0, true);
        self.ground(
            GROUND_WIDTH,
            GROUND_HEIGHT,
            frontier + 20.0,
            GROUND_BAND_OFFSET,
            false,
        );
    }
}
