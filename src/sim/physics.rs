//! Rigid-body world built on rapier2d
//!
//! Owns every body and collider behind a narrow surface: body creation from a
//! `BodySpec`, destruction, gravity, and a fixed-timestep `step` that reports
//! the contact pairs that began during it. Nothing outside this
//! module touches rapier types other than `RigidBodyHandle`.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::consts::{FIXED_TIMESTEP, SOLVER_ITERATIONS};

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
    Kinematic,
}

/// Collision shape, sized in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSpec {
    Cuboid { width: f32, height: f32 },
    Ball { radius: f32 },
}

/// Everything needed to place one body with one fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub kind: BodyKind,
    pub shape: ShapeSpec,
    pub position: Vec2,
    pub density: f32,
    pub friction: f32,
    pub fixed_rotation: bool,
    pub can_sleep: bool,
}

impl BodySpec {
    pub fn new(kind: BodyKind, shape: ShapeSpec, position: Vec2) -> Self {
        Self {
            kind,
            shape,
            position,
            density: 0.0,
            friction: 0.0,
            fixed_rotation: false,
            can_sleep: true,
        }
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }

    pub fn no_sleep(mut self) -> Self {
        self.can_sleep = false;
        self
    }
}

/// Contact listener: records the pairs that began touching during a step.
#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        // Contact-end is intentionally ignored.
        if let CollisionEvent::Started(a, b, _) = event {
            if let Ok(mut started) = self.started.lock() {
                started.push((a, b));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// The mutable world of rigid bodies
pub struct PhysicsWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_TIMESTEP;
        if let Some(iterations) = NonZeroUsize::new(SOLVER_ITERATIONS) {
            integration_parameters.num_solver_iterations = iterations;
        }
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: vector![gravity.x, gravity.y],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Insert a body and its single fixture. Every collider reports contact
    /// events, matching a single global contact listener.
    pub fn create_body(&mut self, spec: &BodySpec) -> RigidBodyHandle {
        let mut body = match spec.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
        }
        .translation(vector![spec.position.x, spec.position.y])
        .can_sleep(spec.can_sleep);
        if spec.fixed_rotation {
            body = body.lock_rotations();
        }
        let handle = self.bodies.insert(body);

        let collider = match spec.shape {
            ShapeSpec::Cuboid { width, height } => ColliderBuilder::cuboid(width / 2.0, height / 2.0),
            ShapeSpec::Ball { radius } => ColliderBuilder::ball(radius),
        }
        .density(spec.density)
        .friction(spec.friction)
        .active_events(ActiveEvents::COLLISION_EVENTS);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    /// Remove a body and its colliders. Unknown or already-destroyed handles
    /// are a logged no-op, never a crash.
    pub fn destroy_body(&mut self, handle: RigidBodyHandle) {
        if self
            .bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_none()
        {
            log::warn!("destroy_body: {handle:?} is not in the world");
        }
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).is_some()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vector![gravity.x, gravity.y];
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        match self.bodies.get_mut(handle) {
            Some(body) => body.set_linvel(vector![velocity.x, velocity.y], true),
            None => log::warn!("set_linear_velocity: {handle:?} is not in the world"),
        }
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|body| {
            let translation = body.translation();
            Vec2::new(translation.x, translation.y)
        })
    }

    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec2) {
        match self.bodies.get_mut(handle) {
            Some(body) => body.set_translation(vector![position.x, position.y], true),
            None => log::warn!("set_position: {handle:?} is not in the world"),
        }
    }

    pub fn rotation(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.bodies.get(handle).map(|body| body.rotation().angle())
    }

    /// Advance the simulation by one fixed tick and return the body pairs
    /// whose fixtures began touching during it. Deterministic for fixed
    /// inputs.
    pub fn step(&mut self, dt: f32) -> Vec<(RigidBodyHandle, RigidBodyHandle)> {
        self.integration_parameters.dt = dt;
        let collector = ContactCollector::default();
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &collector,
        );

        let started = collector.started.into_inner().unwrap_or_default();
        started
            .iter()
            .filter_map(|&(a, b)| {
                let body_a = self.colliders.get(a)?.parent()?;
                let body_b = self.colliders.get(b)?.parent()?;
                Some((body_a, body_b))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(kind: BodyKind, position: Vec2) -> BodySpec {
        BodySpec::new(
            kind,
            ShapeSpec::Cuboid {
                width: 1.0,
                height: 1.0,
            },
            position,
        )
    }

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        let handle = world.create_body(&unit_box(BodyKind::Dynamic, Vec2::new(0.0, 10.0)).density(1.0));

        for _ in 0..60 {
            world.step(FIXED_TIMESTEP);
        }

        let position = world.position(handle).expect("body exists");
        assert!(position.y < 10.0, "expected fall, got y={}", position.y);
    }

    #[test]
    fn ball_body_falls_too() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        let spec = BodySpec::new(
            BodyKind::Dynamic,
            ShapeSpec::Ball { radius: 0.5 },
            Vec2::new(0.0, 5.0),
        )
        .density(1.0);
        let handle = world.create_body(&spec);

        for _ in 0..30 {
            world.step(FIXED_TIMESTEP);
        }

        assert!(world.position(handle).expect("body exists").y < 5.0);
    }

    #[test]
    fn static_body_does_not_move() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        let handle = world.create_body(&unit_box(BodyKind::Static, Vec2::new(3.0, 4.0)));

        for _ in 0..30 {
            world.step(FIXED_TIMESTEP);
        }

        let position = world.position(handle).expect("body exists");
        assert!((position.x - 3.0).abs() < 1e-6);
        assert!((position.y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn destroy_body_twice_is_a_no_op() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        let handle = world.create_body(&unit_box(BodyKind::Static, Vec2::ZERO));
        assert_eq!(world.body_count(), 1);

        world.destroy_body(handle);
        assert_eq!(world.body_count(), 0);
        assert!(!world.contains(handle));
        assert!(world.position(handle).is_none());

        // Destroying again must not panic.
        world.destroy_body(handle);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_round_trips() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        world.set_gravity(Vec2::new(0.0, 200.0));
        assert_eq!(world.gravity(), Vec2::new(0.0, 200.0));
    }

    #[test]
    fn contact_begin_reported_for_overlapping_pair() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 0.0));
        let mover = world.create_body(
            &unit_box(BodyKind::Dynamic, Vec2::new(0.0, 10.0))
                .density(3.0)
                .no_sleep(),
        );
        let target = world.create_body(&unit_box(BodyKind::Kinematic, Vec2::new(0.4, 10.2)).density(3.0));

        let mut pairs = Vec::new();
        for _ in 0..10 {
            pairs.extend(world.step(FIXED_TIMESTEP));
            if !pairs.is_empty() {
                break;
            }
        }

        assert!(
            pairs
                .iter()
                .any(|&(a, b)| (a == mover && b == target) || (a == target && b == mover)),
            "expected a contact between the two bodies, got {pairs:?}"
        );
    }
}
