//! Events emitted by the engine, in emission order.
//!
//! Consumers drive animation and UI from these; they never need to diff state.

use crate::action::{Allocation, SwitchError};
use crate::env::ClassType;
use crate::session::RosterError;
use crate::state::{Combatant, CombatantId, Side};

/// Public view of a combatant at setup time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSummary {
    pub id: CombatantId,
    pub name: String,
    pub class_type: ClassType,
    pub level: u32,
    pub max_health: u32,
    pub current_hp: u32,
}

impl From<&Combatant> for CombatantSummary {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id(),
            name: combatant.name().to_owned(),
            class_type: combatant.class_type(),
            level: combatant.level(),
            max_health: combatant.max_health(),
            current_hp: combatant.current_hp(),
        }
    }
}

/// Attack and defend of one combatant as shown during the reveal.
///
/// Reserve stays hidden.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PublicAllocation {
    pub combatant: CombatantId,
    pub attack: u32,
    pub defend: u32,
}

impl From<&Combatant> for PublicAllocation {
    fn from(combatant: &Combatant) -> Self {
        let allocation = combatant.allocation();
        Self {
            combatant: combatant.id(),
            attack: allocation.attack,
            defend: allocation.defend,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BattleEvent {
    BattleSetupComplete {
        player: Vec<CombatantSummary>,
        enemy: Vec<CombatantSummary>,
        roster_issues: Vec<RosterError>,
    },
    CountdownStarted,
    BattleStarted,
    TurnChanged {
        turn: u32,
        side: Side,
    },
    /// The engine is now waiting on this player combatant.
    PlayerAllocationPhaseStarted {
        combatant: CombatantId,
        available_points: u32,
    },
    EnemyTurnStarted {
        turn: u32,
    },
    AllocationCommitted {
        combatant: CombatantId,
        allocation: Allocation,
    },
    /// Front combatants only. Benched actors' allocations appear in
    /// `AllocationCommitted`.
    AllocationsRevealed {
        player: Option<PublicAllocation>,
        enemy: Option<PublicAllocation>,
    },
    CombatantDamaged {
        attacker: CombatantId,
        defender: CombatantId,
        damage: u32,
        new_hp: u32,
    },
    CombatantDeath {
        combatant: CombatantId,
        side: Side,
    },
    WeaponSwitched {
        incoming: CombatantId,
        outgoing: CombatantId,
        deducted_cost: u32,
        is_player_side: bool,
    },
    /// An enemy policy asked for a switch the rules refuse; the allocation
    /// still applies.
    SwitchRejected {
        actor: CombatantId,
        incoming: CombatantId,
        error: SwitchError,
    },
    BattleEnded {
        winner: Side,
    },
    BattleAborted {
        turn: u32,
    },
}

impl BattleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BattleSetupComplete { .. } => "battle_setup_complete",
            Self::CountdownStarted => "countdown_started",
            Self::BattleStarted => "battle_started",
            Self::TurnChanged { .. } => "turn_changed",
            Self::PlayerAllocationPhaseStarted { .. } => "player_allocation_phase_started",
            Self::EnemyTurnStarted { .. } => "enemy_turn_started",
            Self::AllocationCommitted { .. } => "allocation_committed",
            Self::AllocationsRevealed { .. } => "allocations_revealed",
            Self::CombatantDamaged { .. } => "combatant_damaged",
            Self::CombatantDeath { .. } => "combatant_death",
            Self::WeaponSwitched { .. } => "weapon_switched",
            Self::SwitchRejected { .. } => "switch_rejected",
            Self::BattleEnded { .. } => "battle_ended",
            Self::BattleAborted { .. } => "battle_aborted",
        }
    }

    /// True for the events after which the engine emits nothing further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::BattleEnded { .. } | Self::BattleAborted { .. })
    }
}
