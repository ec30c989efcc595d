//! One thread per agent.
//!
//! A worker idles until the coordinator asks for a tick, then computes
//! (snapshot under the read lock, rules, position update) and publishes its
//! new state on a single-slot channel. The read lock is always released
//! before the publish, so a coordinator draining channels never waits on a
//! worker that holds the lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use boid_core::{rules, AgentId, Boid};
use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, error, warn};

use crate::config::{SharedRuleConfig, WorldParams};
use crate::error::{Result, WorldError};
use crate::neighbors::NeighborView;

/// What a worker hands back for one tick: its new state, or the invariant
/// violation that stopped it from computing one.
pub type Publication = Result<Boid>;

/// Owns one agent and moves it once per tick.
pub struct AgentWorker {
    id: AgentId,
    boid: Boid,
    params: WorldParams,
    rules: SharedRuleConfig,
    neighbors: Arc<NeighborView>,
}

impl AgentWorker {
    pub fn new(
        id: AgentId,
        boid: Boid,
        params: WorldParams,
        rules: SharedRuleConfig,
        neighbors: Arc<NeighborView>,
    ) -> Self {
        Self {
            id,
            boid,
            params,
            rules,
            neighbors,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn boid(&self) -> &Boid {
        &self.boid
    }

    /// Computes the next state. On error the agent is left as it was.
    pub fn step(&mut self) -> Result<Boid> {
        let others = self.neighbors.others(self.id)?;
        let config = self.rules.snapshot();

        self.boid.velocity = rules::next_velocity(&self.boid, &others, &config);
        self.params.integrate(&mut self.boid);
        Ok(self.boid)
    }

    /// Runs until the step channel closes, the output channel closes, or
    /// `cancel` is raised.
    pub fn run(
        mut self,
        steps: Receiver<u64>,
        output: Sender<Publication>,
        cancel: Arc<AtomicBool>,
    ) {
        for tick in steps.iter() {
            if cancel.load(Ordering::Acquire) {
                break;
            }

            let publication = self.step();
            if let Err(e) = &publication {
                error!("agent {} failed tick {}: {}", self.id, tick, e);
            }

            if output.send(publication).is_err() {
                break;
            }
        }
        debug!("worker {} stopped", self.id);
    }
}

/// Coordinator-side ends of one worker's channels plus its thread.
pub(crate) struct WorkerHandle {
    id: AgentId,
    steps: Option<Sender<u64>>,
    output: Option<Receiver<Publication>>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn spawn(worker: AgentWorker, cancel: Arc<AtomicBool>) -> Result<Self> {
        let id = worker.id();
        let (step_tx, step_rx) = bounded(1);
        let (out_tx, out_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name(format!("boid-worker-{}", id))
            .spawn(move || worker.run(step_rx, out_tx, cancel))
            .map_err(|source| WorldError::Spawn { id, source })?;

        debug!("spawned worker {}", id);

        Ok(Self {
            id,
            steps: Some(step_tx),
            output: Some(out_rx),
            handle: Some(handle),
        })
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Asks the worker to compute `tick`.
    pub fn request(&self, tick: u64) -> Result<()> {
        self.steps
            .as_ref()
            .ok_or(WorldError::WorkerDisconnected(self.id))?
            .send(tick)
            .map_err(|_| WorldError::WorkerDisconnected(self.id))
    }

    /// Blocks until the worker publishes.
    pub fn collect(&self) -> Publication {
        self.output
            .as_ref()
            .ok_or(WorldError::WorkerDisconnected(self.id))?
            .recv()
            .map_err(|_| WorldError::WorkerDisconnected(self.id))?
    }

    /// Closes both channels and joins the thread.
    pub fn stop(&mut self) {
        self.steps.take();
        self.output.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("worker {} panicked", self.id);
            }
        }
    }
}
