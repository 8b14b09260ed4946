//! Cloneable façade for issuing commands to the battle worker.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for
//! steering the player side or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{Allocation, AllocationRequest, BattleSnapshot, CombatantId, SwitchKind};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a running battle
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Lets the worker leave setup and start the countdown.
    ///
    /// Returns false if the battle had already been started.
    pub async fn start(&self) -> Result<bool> {
        self.request(|reply| Command::Start { reply }).await
    }

    /// Submit the allocation of the awaited player combatant
    pub async fn submit_allocation(
        &self,
        combatant: CombatantId,
        request: AllocationRequest,
    ) -> Result<Allocation> {
        self.request(|reply| Command::SubmitAllocation {
            combatant,
            request,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    /// Bring `incoming` to the front of the player roster
    pub async fn request_switch(&self, incoming: CombatantId, kind: SwitchKind) -> Result<()> {
        self.request(|reply| Command::RequestSwitch {
            incoming,
            kind,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    /// End the player allocation phase for every combatant still pending
    pub async fn finalize_allocation(&self) -> Result<()> {
        self.request(|reply| Command::FinalizeAllocation { reply })
            .await?
            .map_err(RuntimeError::from)
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// The player combatant the battle is waiting on, if any
    pub async fn awaiting(&self) -> Result<Option<CombatantId>> {
        Ok(self.snapshot().await?.awaiting)
    }

    /// Tear the battle down
    ///
    /// Returns false if the battle had already ended. Either way the worker
    /// stops and every later command fails with `CommandChannelClosed`.
    pub async fn abort(&self) -> Result<bool> {
        self.request(|reply| Command::Abort { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Lifecycle` - Setup, countdown, start, end, abort
    /// - `Topic::Turn` - Turn changes, allocation phases, reveals
    /// - `Topic::Combat` - Damage, deaths, weapon switches
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use battle_runtime::Topic;
    ///
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // Animate hits and deaths
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to every event in emission order
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe_all()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
