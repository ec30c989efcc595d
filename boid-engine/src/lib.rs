//! Threaded boid simulation.
//!
//! Every agent is driven by its own worker thread. A [`World`] coordinates
//! them in discrete ticks:
//!
//! 1. each worker copies "everyone but me" out of the [`NeighborView`] under
//!    the read lock,
//! 2. evaluates the flocking rules from `boid_core::rules` and moves its
//!    agent,
//! 3. publishes the new state on its own single-slot channel,
//! 4. the world drains all channels, then swaps in the new neighbor map
//!    under the write lock.
//!
//! Workers only start a tick when the world asks for it, which happens
//! after the previous swap, so no worker ever computes from a map that
//! mixes two ticks.
//!
//! # Example
//!
//! ```no_run
//! use boid_engine::WorldBuilder;
//!
//! let mut world = WorldBuilder::new(640.0, 480.0, 100).seed(1).build().unwrap();
//! for _ in 0..10 {
//!     let frame = world.advance().unwrap();
//!     assert_eq!(frame.positions().len(), 100);
//! }
//! ```

pub mod config;
pub mod error;
pub mod neighbors;
pub mod worker;
pub mod world;

pub use boid_core::{AgentId, Boid, CombinationPolicy, InitialVelocity, RuleConfig, Vector2D};
pub use config::{merge_settings, Boundary, SharedRuleConfig, WorldParams};
pub use error::{Result, WorldError};
pub use neighbors::{NeighborMap, NeighborView};
pub use worker::{AgentWorker, Publication};
pub use world::{Frame, World, WorldBuilder};
