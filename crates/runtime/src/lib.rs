//! Runtime orchestration for the two-sided battle engine.
//!
//! This crate wires the allocation provider abstraction, the topic event bus,
//! and the battle worker task into a cohesive runtime API. Consumers embed
//! [`BattleRuntime`] to run a battle, subscribe to events, and steer the
//! player side through [`BattleHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{AllocationProvider, BattleHandle, PolicyProvider, Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use runtime::{BattleOutcome, BattleRuntime, RuntimeBuilder, RuntimeConfig};
