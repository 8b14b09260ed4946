//! Topic-based event bus implementation.

use std::sync::Arc;

use battle_core::BattleEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Setup, countdown, start, end, abort
    Lifecycle,
    /// Turn changes, allocation phases, reveals
    Turn,
    /// Damage, deaths, weapon switches
    Combat,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Lifecycle, Topic::Turn, Topic::Combat];

    pub fn of(event: &BattleEvent) -> Self {
        match event {
            BattleEvent::BattleSetupComplete { .. }
            | BattleEvent::CountdownStarted
            | BattleEvent::BattleStarted
            | BattleEvent::BattleEnded { .. }
            | BattleEvent::BattleAborted { .. } => Topic::Lifecycle,
            BattleEvent::TurnChanged { .. }
            | BattleEvent::PlayerAllocationPhaseStarted { .. }
            | BattleEvent::EnemyTurnStarted { .. }
            | BattleEvent::AllocationCommitted { .. }
            | BattleEvent::AllocationsRevealed { .. } => Topic::Turn,
            BattleEvent::CombatantDamaged { .. }
            | BattleEvent::CombatantDeath { .. }
            | BattleEvent::WeaponSwitched { .. }
            | BattleEvent::SwitchRejected { .. } => Topic::Combat,
        }
    }
}

/// Engine event stamped with its position in the battle's event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic across all topics, starting at 0.
    pub sequence: u64,
    pub event: BattleEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.event)
    }
}

struct Channels {
    lifecycle: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
    all: broadcast::Sender<Event>,
}

impl Channels {
    fn topic(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Lifecycle => &self.lifecycle,
            Topic::Turn => &self.turn,
            Topic::Combat => &self.combat,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning shares the underlying channels.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                lifecycle: broadcast::channel(capacity).0,
                turn: broadcast::channel(capacity).0,
                combat: broadcast::channel(capacity).0,
                all: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its topic and to the all-events stream
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        if self.channels.topic(topic).send(event.clone()).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
        if self.channels.all.send(event).is_err() {
            tracing::trace!("No subscribers for the all-events stream");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.topic(topic).subscribe()
    }

    /// Subscribe to every event, in emission order
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.channels.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
