//! Authoritative battle state representation.
//!
//! This module owns the combatant rosters and turn bookkeeping. Runtime layers
//! clone or query this state but mutate it exclusively through the engine.
mod combatant;
mod common;
mod turn;

pub use combatant::Combatant;
pub use common::{CombatantId, Side};
pub use turn::TurnState;

#[cfg(test)]
pub(crate) use combatant::tests::combatant as test_combatant;

/// Both rosters plus turn bookkeeping.
///
/// Roster order is significant: combatants act in roster order, and the first
/// alive combatant of a side is its front, the target of every attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub turn: TurnState,
    player: Vec<Combatant>,
    enemy: Vec<Combatant>,
}

impl BattleState {
    pub fn new(turn: TurnState, player: Vec<Combatant>, enemy: Vec<Combatant>) -> Self {
        Self {
            turn,
            player,
            enemy,
        }
    }

    pub fn roster(&self, side: Side) -> &[Combatant] {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub(crate) fn roster_mut(&mut self, side: Side) -> &mut Vec<Combatant> {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Iterates every combatant, player roster first.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.player.iter().chain(self.enemy.iter())
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants().find(|c| c.id() == id)
    }

    pub(crate) fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.player
            .iter_mut()
            .chain(self.enemy.iter_mut())
            .find(|c| c.id() == id)
    }

    /// Roster index of a combatant on the given side.
    pub fn position_of(&self, side: Side, id: CombatantId) -> Option<usize> {
        self.roster(side).iter().position(|c| c.id() == id)
    }

    /// First alive combatant of a side.
    pub fn front(&self, side: Side) -> Option<&Combatant> {
        self.roster(side).iter().find(|c| c.is_alive())
    }

    pub fn alive_count(&self, side: Side) -> usize {
        self.roster(side).iter().filter(|c| c.is_alive()).count()
    }

    pub fn has_alive(&self, side: Side) -> bool {
        self.front(side).is_some()
    }

    /// Ids of a side's combatants in current roster order.
    pub fn roster_ids(&self, side: Side) -> Vec<CombatantId> {
        self.roster(side).iter().map(Combatant::id).collect()
    }
}
