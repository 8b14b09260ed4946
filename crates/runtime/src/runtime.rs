//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use battle_core::{AllocationPolicy, BattleConfig, BattleEngine, BattleSession, Side, WeaponCatalog};

use crate::api::{AllocationProvider, BattleHandle, Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::workers::BattleWorker;

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Pause between `CountdownStarted` and `BattleStarted`.
    pub countdown: Duration,
    /// Pause between `AllocationsRevealed` and damage resolution.
    pub reveal_delay: Duration,
}

impl RuntimeConfig {
    /// Default configuration with both presentation delays removed.
    pub fn instant() -> Self {
        Self {
            countdown: Duration::ZERO,
            reveal_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            countdown: Duration::from_secs(3),
            reveal_delay: Duration::from_secs(1),
        }
    }
}

/// How a battle worker finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory(Side),
    Aborted,
}

/// Main runtime that orchestrates one battle
///
/// Runtime owns the worker task. [`BattleHandle`] provides a cloneable
/// façade for clients. The worker starts paused in setup and publishes
/// nothing until started, so subscribers can attach without missing events.
pub struct BattleRuntime {
    handle: BattleHandle,
    worker: JoinHandle<BattleOutcome>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Subscribe to every battle event in emission order
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.handle.subscribe_all()
    }

    /// Let the battle leave setup
    pub async fn start(&self) -> Result<bool> {
        self.handle.start().await
    }

    /// Wait for the worker to finish
    ///
    /// Drops the runtime's own handle first. A battle that still waits on
    /// handle commands is aborted once no other handle is alive; an autopilot
    /// battle runs to the end.
    pub async fn wait(self) -> Result<BattleOutcome> {
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }

    /// Start the battle and wait for its outcome
    pub async fn run(self) -> Result<BattleOutcome> {
        self.start().await?;
        self.wait().await
    }

    /// Run the battle and return the winning side
    pub async fn winner(self) -> Result<Side> {
        match self.run().await? {
            BattleOutcome::Victory(side) => Ok(side),
            BattleOutcome::Aborted => Err(RuntimeError::BattleAborted),
        }
    }

    /// Abort the battle and wait for the worker to stop
    pub async fn shutdown(self) -> Result<()> {
        self.handle.abort().await?;
        self.wait().await.map(|_| ())
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    session: Option<BattleSession>,
    catalog: Option<Box<dyn WeaponCatalog>>,
    player_provider: Option<Arc<dyn AllocationProvider>>,
    enemy_policy: Option<Box<dyn AllocationPolicy>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            session: None,
            catalog: None,
            player_provider: None,
            enemy_policy: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the battle rules
    pub fn battle_config(mut self, battle: BattleConfig) -> Self {
        self.config.battle = battle;
        self
    }

    /// Provide the rosters to fight with (required)
    pub fn session(mut self, session: BattleSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the weapon catalog used to resolve descriptors (required)
    pub fn catalog(mut self, catalog: impl WeaponCatalog + 'static) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    /// Drive the player side with an autopilot instead of handle commands
    pub fn player_provider(mut self, provider: impl AllocationProvider + 'static) -> Self {
        self.player_provider = Some(Arc::new(provider));
        self
    }

    /// Replace the enemy side's default all-attack policy
    pub fn enemy_policy(mut self, policy: impl AllocationPolicy + 'static) -> Self {
        self.enemy_policy = Some(Box::new(policy));
        self
    }

    /// Build the engine and spawn the battle worker
    ///
    /// Setup failures are returned before any task is spawned.
    pub async fn build(self) -> Result<BattleRuntime> {
        let session = self.session.ok_or(RuntimeError::MissingSession)?;
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;

        let mut engine = BattleEngine::new(&session, catalog.as_ref(), self.config.battle.clone())?;
        if let Some(policy) = self.enemy_policy {
            engine.set_enemy_policy(policy);
        }

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let worker = BattleWorker::new(
            engine,
            command_rx,
            event_bus.clone(),
            self.player_provider,
            self.config.countdown,
            self.config.reveal_delay,
        );
        let worker = tokio::spawn(worker.run());

        tracing::info!(
            target: "runtime",
            players = session.player.len(),
            enemies = session.enemy.len(),
            "battle runtime ready"
        );

        Ok(BattleRuntime {
            handle: BattleHandle::new(command_tx, event_bus),
            worker,
        })
    }
}
