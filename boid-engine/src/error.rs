use boid_core::{AgentId, ConfigError};
use thiserror::Error;

/// Errors raised while building or stepping a [`World`](crate::World)
#[derive(Error, Debug)]
pub enum WorldError {
    #[error("world dimensions must be positive and finite, got {width} x {height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("invalid rule configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("agent {0} is missing from the neighbor map")]
    MissingAgent(AgentId),
    #[error("worker for agent {0} disconnected")]
    WorkerDisconnected(AgentId),
    #[error("failed to spawn worker for agent {id}: {source}")]
    Spawn {
        id: AgentId,
        #[source]
        source: std::io::Error,
    },
    #[error("world has been shut down")]
    ShutDown,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, WorldError>;
