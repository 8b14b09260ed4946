//! Weapon switching: bringing a benched combatant to the front.

use crate::state::{CombatantId, Side};

/// Whether a switch is charged against the acting combatant's bank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwitchKind {
    /// Costs the configured switch cost.
    #[default]
    Paid,
    Free,
}

/// Reasons a switch request is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwitchError {
    #[error("combatant {combatant} does not exist")]
    UnknownCombatant { combatant: CombatantId },

    #[error("combatant {combatant} fights for the {side} side")]
    WrongSide { combatant: CombatantId, side: Side },

    #[error("combatant {combatant} is down")]
    CombatantDown { combatant: CombatantId },

    #[error("combatant {combatant} is already in front")]
    AlreadyInFront { combatant: CombatantId },

    #[error("combatant {actor} already switched this turn")]
    AlreadySwitched { actor: CombatantId },

    #[error("switching costs {cost} points but combatant {actor} has {banked} banked")]
    InsufficientPoints {
        actor: CombatantId,
        cost: u32,
        banked: u32,
    },
}
