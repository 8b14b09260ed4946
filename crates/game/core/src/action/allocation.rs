//! Allocation contract: how a combatant spends banked points for one turn.

use crate::state::CombatantId;

/// Allocation as submitted by a caller.
///
/// Amounts are signed so that malformed input is reported as
/// [`AllocationError::NegativeAmount`] instead of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationRequest {
    pub attack: i32,
    pub defend: i32,
    pub reserve: i32,
}

impl AllocationRequest {
    pub const fn new(attack: i32, defend: i32, reserve: i32) -> Self {
        Self {
            attack,
            defend,
            reserve,
        }
    }

    /// Commits every point to attack.
    pub const fn all_attack(points: u32) -> Self {
        Self::new(saturating_i32(points), 0, 0)
    }

    /// Allocates nothing; the whole bank carries over.
    pub const fn hold() -> Self {
        Self::new(0, 0, 0)
    }

    /// Validates the request against a bank, yielding the accepted allocation.
    pub fn validate(
        &self,
        combatant: CombatantId,
        banked: u32,
    ) -> Result<Allocation, AllocationError> {
        if self.attack < 0 || self.defend < 0 || self.reserve < 0 {
            return Err(AllocationError::NegativeAmount { combatant });
        }

        let allocation = Allocation {
            attack: self.attack.unsigned_abs(),
            defend: self.defend.unsigned_abs(),
            reserve: self.reserve.unsigned_abs(),
        };

        let requested = allocation.total();
        if requested > u64::from(banked) {
            return Err(AllocationError::InsufficientPoints {
                combatant,
                requested,
                banked,
            });
        }

        Ok(allocation)
    }
}

const fn saturating_i32(points: u32) -> i32 {
    if points > i32::MAX as u32 {
        i32::MAX
    } else {
        points as i32
    }
}

/// Accepted per-turn split of banked points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    pub attack: u32,
    pub defend: u32,
    pub reserve: u32,
}

impl Allocation {
    pub const NONE: Self = Self {
        attack: 0,
        defend: 0,
        reserve: 0,
    };

    /// Total points named by the allocation, reserve included.
    pub fn total(&self) -> u64 {
        u64::from(self.attack) + u64::from(self.defend) + u64::from(self.reserve)
    }

    /// Points that actually leave the bank (reserve returns to it).
    pub fn spent(&self) -> u32 {
        self.attack.saturating_add(self.defend)
    }

    pub fn is_empty(&self) -> bool {
        self.attack == 0 && self.defend == 0 && self.reserve == 0
    }
}

/// Errors raised by the allocation contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AllocationError {
    #[error("engine is not waiting for combatant {provided} (awaiting {awaiting})")]
    NotAwaitingThisActor {
        awaiting: CombatantId,
        provided: CombatantId,
    },

    #[error("allocation for combatant {combatant} contains a negative amount")]
    NegativeAmount { combatant: CombatantId },

    #[error("combatant {combatant} requested {requested} points but only {banked} are banked")]
    InsufficientPoints {
        combatant: CombatantId,
        requested: u64,
        banked: u32,
    },
}
