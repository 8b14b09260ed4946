//! Built-in allocation policies for sides that do not wait on external input.

use crate::state::{BattleState, Combatant, CombatantId};

use super::AllocationRequest;

/// What a policy wants one combatant to do this turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyDecision {
    /// Optional switch performed before allocating.
    pub switch_to: Option<CombatantId>,
    pub allocation: AllocationRequest,
}

impl PolicyDecision {
    pub fn allocate(allocation: AllocationRequest) -> Self {
        Self {
            switch_to: None,
            allocation,
        }
    }

    #[must_use]
    pub fn with_switch(mut self, incoming: CombatantId) -> Self {
        self.switch_to = Some(incoming);
        self
    }
}

/// Deterministic allocation strategy.
///
/// Called once per alive combatant, in roster order, after the side's points
/// have been banked. The state is read-only; the engine applies the decision.
pub trait AllocationPolicy: Send + Sync {
    fn decide(&self, actor: &Combatant, state: &BattleState) -> PolicyDecision;
}

/// Commits every banked point to attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllInAttack;

impl AllocationPolicy for AllInAttack {
    fn decide(&self, actor: &Combatant, _state: &BattleState) -> PolicyDecision {
        PolicyDecision::allocate(AllocationRequest::all_attack(actor.banked_points()))
    }
}

/// Splits the bank evenly between attack and defend, odd point to attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balanced;

impl AllocationPolicy for Balanced {
    fn decide(&self, actor: &Combatant, _state: &BattleState) -> PolicyDecision {
        let banked = actor.banked_points();
        let defend = banked / 2;
        let attack = banked - defend;
        PolicyDecision::allocate(AllocationRequest::new(
            i32::try_from(attack).unwrap_or(i32::MAX),
            i32::try_from(defend).unwrap_or(i32::MAX),
            0,
        ))
    }
}

impl<F> AllocationPolicy for F
where
    F: Fn(&Combatant, &BattleState) -> PolicyDecision + Send + Sync,
{
    fn decide(&self, actor: &Combatant, state: &BattleState) -> PolicyDecision {
        self(actor, state)
    }
}
