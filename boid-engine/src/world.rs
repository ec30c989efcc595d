//! The tick coordinator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use boid_core::{AgentId, Boid, InitialVelocity, RuleConfig, Vector2D};
use boid_shared::{FrameSnapshot, Position, StatusResponse};
use log::{error, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Boundary, SharedRuleConfig, WorldParams};
use crate::error::{Result, WorldError};
use crate::neighbors::{NeighborMap, NeighborView};
use crate::worker::{AgentWorker, WorkerHandle};

/// Agent states after one tick, ordered by agent id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    tick: u64,
    positions: Vec<Vector2D>,
    velocities: Vec<Vector2D>,
}

impl Frame {
    fn from_states<'a, I>(tick: u64, states: I) -> Self
    where
        I: IntoIterator<Item = &'a Boid>,
    {
        let (positions, velocities) = states
            .into_iter()
            .map(|boid| (boid.position, boid.velocity))
            .unzip();
        Self {
            tick,
            positions,
            velocities,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn positions(&self) -> &[Vector2D] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vector2D] {
        &self.velocities
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn to_snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            positions: self
                .positions
                .iter()
                .map(|p| Position::new(p.x, p.y))
                .collect(),
        }
    }
}

/// Builder for [`World`]
#[derive(Debug, Clone)]
pub struct WorldBuilder {
    params: WorldParams,
    boid_count: usize,
    rules: RuleConfig,
    seed: Option<u64>,
    initial_velocity: InitialVelocity,
}

impl WorldBuilder {
    pub fn new(width: f64, height: f64, boid_count: usize) -> Self {
        Self {
            params: WorldParams::new(width, height),
            boid_count,
            rules: RuleConfig::default(),
            seed: None,
            initial_velocity: InitialVelocity::default(),
        }
    }

    pub fn rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Makes the initial placement reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn initial_velocity(mut self, initial_velocity: InitialVelocity) -> Self {
        self.initial_velocity = initial_velocity;
        self
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.params.boundary = boundary;
        self
    }

    pub fn build(self) -> Result<World> {
        self.params.validate()?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let boids = (0..self.boid_count)
            .map(|_| {
                Boid::random(
                    &mut rng,
                    self.params.width,
                    self.params.height,
                    self.initial_velocity,
                )
            })
            .collect();

        World::from_boids(self.params, self.rules, boids)
    }
}

/// Owns the neighbor map and one worker per agent, and advances them in
/// lockstep.
pub struct World {
    params: WorldParams,
    rules: SharedRuleConfig,
    neighbors: Arc<NeighborView>,
    workers: Vec<WorkerHandle>,
    frame: Frame,
    tick: u64,
    cancel: Arc<AtomicBool>,
}

impl World {
    /// Randomly placed agents with default rules.
    pub fn new(width: f64, height: f64, boid_count: usize) -> Result<Self> {
        WorldBuilder::new(width, height, boid_count).build()
    }

    /// Starts a world from explicit agent states; agent `i` gets id `i`.
    pub fn from_boids(params: WorldParams, rules: RuleConfig, boids: Vec<Boid>) -> Result<Self> {
        params.validate()?;
        rules.validate()?;

        let map: NeighborMap = boids.iter().copied().enumerate().collect();
        let mut world = Self {
            params,
            rules: SharedRuleConfig::new(rules),
            neighbors: Arc::new(NeighborView::new(map)),
            workers: Vec::with_capacity(boids.len()),
            frame: Frame::from_states(0, &boids),
            tick: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        };

        for (id, boid) in boids.into_iter().enumerate() {
            let worker = AgentWorker::new(
                id,
                boid,
                params,
                world.rules.clone(),
                Arc::clone(&world.neighbors),
            );
            // on failure, Drop tears down the workers spawned so far
            world
                .workers
                .push(WorkerHandle::spawn(worker, Arc::clone(&world.cancel))?);
        }

        info!(
            "world {}x{} started with {} workers",
            params.width,
            params.height,
            world.workers.len()
        );
        Ok(world)
    }

    /// Runs one tick: every worker moves exactly once, then the neighbor map
    /// is replaced in a single swap.
    ///
    /// If any worker fails, every channel is still drained, agents that did
    /// move are published, the frame is left as it was and the first error
    /// is returned.
    pub fn advance(&mut self) -> Result<&Frame> {
        if self.cancel.load(Ordering::Acquire) {
            return Err(WorldError::ShutDown);
        }

        let tick = self.tick + 1;
        let mut failure: Option<WorldError> = None;

        let requested: Vec<bool> = self
            .workers
            .iter()
            .map(|worker| match worker.request(tick) {
                Ok(()) => true,
                Err(e) => {
                    failure.get_or_insert(e);
                    false
                }
            })
            .collect();

        let mut states: Vec<Option<Boid>> = Vec::with_capacity(self.workers.len());
        for (worker, requested) in self.workers.iter().zip(requested) {
            if !requested {
                states.push(None);
                continue;
            }
            match worker.collect() {
                Ok(boid) => states.push(Some(boid)),
                Err(e) => {
                    failure.get_or_insert(e);
                    states.push(None);
                }
            }
        }

        match failure {
            None => {
                let map: NeighborMap = self
                    .workers
                    .iter()
                    .map(WorkerHandle::id)
                    .zip(states.into_iter().flatten())
                    .collect();
                self.frame = Frame::from_states(tick, map.values());
                self.neighbors.publish(map);
                self.tick = tick;
                trace!("tick {} complete", tick);
                Ok(&self.frame)
            }
            Some(e) => {
                let mut map = self.neighbors.snapshot();
                for (worker, state) in self.workers.iter().zip(&states) {
                    if let Some(boid) = state {
                        map.insert(worker.id(), *boid);
                    }
                }
                self.neighbors.publish(map);
                error!("tick {} failed: {}", tick, e);
                Err(e)
            }
        }
    }

    /// The last completed frame. Before the first tick this holds the
    /// initial placement.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn params(&self) -> WorldParams {
        self.params
    }

    /// Live rule configuration. Changes reach the workers on the next tick.
    pub fn rules(&self) -> SharedRuleConfig {
        self.rules.clone()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Number of entries in the published neighbor map.
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Published state of one agent.
    pub fn agent(&self, id: AgentId) -> Option<Boid> {
        self.neighbors.get(id)
    }

    /// Moves the goal to a uniformly random point inside the world.
    pub fn relocate_goal<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2D {
        let goal = Vector2D::new(
            rng.gen_range(0.0..self.params.width),
            rng.gen_range(0.0..self.params.height),
        );
        self.rules.set_goal(Some(goal));
        goal
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            tick: self.tick,
            boid_count: self.workers.len(),
            goal_active: self.rules.goal().is_some(),
        }
    }

    /// Stops and joins every worker. Further `advance` calls fail.
    pub fn shutdown(&mut self) {
        if self.cancel.swap(true, Ordering::AcqRel) {
            return;
        }
        for worker in &mut self.workers {
            worker.stop();
        }
        info!("world stopped after {} ticks", self.tick);
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.shutdown();
    }
}
