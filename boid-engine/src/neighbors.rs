//! The authoritative neighbor map.
//!
//! Workers copy out of it under the read lock; the coordinator replaces it
//! wholesale under the write lock once per tick. Entries are never edited in
//! place, so a reader always sees every agent from the same tick.

use std::collections::BTreeMap;

use boid_core::{AgentId, Boid};
use parking_lot::RwLock;

use crate::error::{Result, WorldError};

/// Agent states keyed by id. Ordered so that snapshots are deterministic.
pub type NeighborMap = BTreeMap<AgentId, Boid>;

#[derive(Debug, Default)]
pub struct NeighborView {
    map: RwLock<NeighborMap>,
}

impl NeighborView {
    pub fn new(map: NeighborMap) -> Self {
        Self {
            map: RwLock::new(map),
        }
    }

    /// Every agent except `id`, ordered by id. Fails if `id` itself is not
    /// in the map, which means the coordinator lost track of an agent.
    pub fn others(&self, id: AgentId) -> Result<Vec<Boid>> {
        let map = self.map.read();
        if !map.contains_key(&id) {
            return Err(WorldError::MissingAgent(id));
        }
        Ok(map
            .iter()
            .filter(|(other, _)| **other != id)
            .map(|(_, boid)| *boid)
            .collect())
    }

    /// Swaps in a complete new map and hands back the previous one.
    pub fn publish(&self, map: NeighborMap) -> NeighborMap {
        let mut guard = self.map.write();
        std::mem::replace(&mut *guard, map)
    }

    /// Copy of the whole published map.
    pub fn snapshot(&self) -> NeighborMap {
        self.map.read().clone()
    }

    /// Published state of one agent.
    pub fn get(&self, id: AgentId) -> Option<Boid> {
        self.map.read().get(&id).copied()
    }

    /// Number of published agents.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// True when no agent has been published.
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}
