//! Asynchronous abstraction for sourcing player allocations.
//!
//! By default the runtime waits for allocations submitted through a
//! [`BattleHandle`](super::BattleHandle). Plugging in an
//! [`AllocationProvider`] turns the player side into an autopilot driven by
//! scripted fixtures, AI policies, or a remote client.
use async_trait::async_trait;
use battle_core::{AllocationPolicy, BattleSnapshot, CombatantId, PolicyDecision};

use super::errors::{Result, RuntimeError};

/// Trait for providing allocations based on the current battle snapshot.
#[async_trait]
pub trait AllocationProvider: Send + Sync {
    /// Decide what `combatant` does this turn.
    ///
    /// Errors end the player's allocation phase; combatants that have not yet
    /// allocated keep their banks.
    async fn provide_allocation(
        &self,
        combatant: CombatantId,
        snapshot: &BattleSnapshot,
    ) -> Result<PolicyDecision>;
}

/// Adapts a synchronous [`AllocationPolicy`] into a provider.
#[derive(Clone, Debug, Default)]
pub struct PolicyProvider<P> {
    policy: P,
}

impl<P> PolicyProvider<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl<P> AllocationProvider for PolicyProvider<P>
where
    P: AllocationPolicy,
{
    async fn provide_allocation(
        &self,
        combatant: CombatantId,
        snapshot: &BattleSnapshot,
    ) -> Result<PolicyDecision> {
        let actor = snapshot
            .state
            .combatant(combatant)
            .ok_or_else(|| RuntimeError::Provider {
                combatant,
                reason: "combatant missing from snapshot".into(),
            })?;
        Ok(self.policy.decide(actor, &snapshot.state))
    }
}
