//! Entity records pairing physics bodies with render metadata
//!
//! The registry owns no physics state: every record holds a non-owning body
//! handle, and bodies themselves belong to the physics world. Destroying a
//! body and dropping its record must happen together.

use rapier2d::prelude::RigidBodyHandle;

/// Closed set of things that exist in the course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ground,
    Character,
    StoneBlock,
    Coin,
}

/// One record per live body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub body: RigidBodyHandle,
    /// Fixture width in meters
    pub width: f32,
    /// Fixture height in meters
    pub height: f32,
}

/// Ordered collection of entity records, keyed by body handle
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Drop the record for `body`. Relative order of the remaining records is
    /// not preserved. Returns whether a record was found.
    pub fn remove_by_body(&mut self, body: RigidBodyHandle) -> bool {
        match self.entities.iter().position(|e| e.body == body) {
            Some(index) => {
                self.entities.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get_by_body(&self, body: RigidBodyHandle) -> Option<&Entity> {
        self.entities.iter().find(|e| e.body == body)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}
