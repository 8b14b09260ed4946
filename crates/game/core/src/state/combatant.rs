//! Per-unit runtime state for one battle.

use crate::action::{Allocation, AllocationError, AllocationRequest};
use crate::env::{ClassType, WeaponProfile};

use super::{CombatantId, Side};

/// A combatant fielded by one side.
///
/// Stats come from an immutable [`WeaponProfile`]; everything else is battle
/// state owned by the engine. Mutators are crate-private so that callers
/// outside the engine only ever observe snapshots.
///
/// # Invariants
///
/// - `current_hp <= max_health`, and the combatant is alive iff `current_hp > 0`
/// - `banked_points` never exceeds the bank cap passed to
///   [`start_turn_with_available_points`](Self::start_turn_with_available_points)
/// - an accepted allocation never names more points than were banked
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    id: CombatantId,
    side: Side,
    catalog_id: String,
    owned: bool,
    instance_id: Option<String>,
    profile: WeaponProfile,
    current_hp: u32,
    banked_points: u32,
    allocation: Allocation,
    has_switched: bool,
}

impl Combatant {
    /// Creates a combatant at full health with an empty bank.
    pub fn new(
        id: CombatantId,
        side: Side,
        catalog_id: impl Into<String>,
        profile: WeaponProfile,
    ) -> Self {
        Self {
            id,
            side,
            catalog_id: catalog_id.into(),
            owned: false,
            instance_id: None,
            current_hp: profile.max_health,
            profile,
            banked_points: 0,
            allocation: Allocation::NONE,
            has_switched: false,
        }
    }

    /// Overrides starting health (clamped to max health).
    #[must_use]
    pub fn with_starting_health(mut self, hp: u32) -> Self {
        self.current_hp = hp.min(self.profile.max_health);
        self
    }

    #[must_use]
    pub fn with_ownership(mut self, owned: bool, instance_id: Option<String>) -> Self {
        self.owned = owned;
        self.instance_id = instance_id;
        self
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    pub fn profile(&self) -> &WeaponProfile {
        &self.profile
    }

    pub fn class_type(&self) -> ClassType {
        self.profile.class_type
    }

    pub fn base_attack(&self) -> u32 {
        self.profile.base_attack
    }

    pub fn max_health(&self) -> u32 {
        self.profile.max_health
    }

    pub fn level(&self) -> u32 {
        self.profile.level
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn banked_points(&self) -> u32 {
        self.banked_points
    }

    pub fn allocation(&self) -> Allocation {
        self.allocation
    }

    pub fn has_switched_this_turn(&self) -> bool {
        self.has_switched
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    // ===== engine-only mutators =====

    /// Banks this turn's base points, capped at `cap`.
    pub(crate) fn start_turn_with_available_points(&mut self, base: u32, cap: u32) {
        self.banked_points = self.banked_points.saturating_add(base).min(cap);
    }

    /// Validates and applies an allocation.
    ///
    /// Attack and defend leave the bank; the reserve stays in it.
    pub(crate) fn try_allocate(
        &mut self,
        request: AllocationRequest,
    ) -> Result<Allocation, AllocationError> {
        let allocation = request.validate(self.id, self.banked_points)?;
        self.banked_points -= allocation.spent();
        self.allocation = allocation;
        Ok(allocation)
    }

    /// Clears the per-turn allocation and switch flag. Banked points persist.
    pub(crate) fn reset_round_allocations(&mut self) {
        self.allocation = Allocation::NONE;
        self.has_switched = false;
    }

    /// Clears attack, reserve, and the switch flag while leaving defend standing.
    pub(crate) fn reset_keeping_guard(&mut self) {
        self.allocation = Allocation {
            defend: self.allocation.defend,
            ..Allocation::NONE
        };
        self.has_switched = false;
    }

    pub(crate) fn clear_guard(&mut self) {
        self.allocation.defend = 0;
    }

    /// Subtracts damage, clamping at zero. Returns the new HP.
    pub(crate) fn apply_damage(&mut self, damage: u32) -> u32 {
        self.current_hp = self.current_hp.saturating_sub(damage);
        self.current_hp
    }

    /// Pays a switch cost from the bank and flags the switch.
    pub(crate) fn pay_switch(&mut self, cost: u32) -> Result<(), AllocationError> {
        if cost > self.banked_points {
            return Err(AllocationError::InsufficientPoints {
                combatant: self.id,
                requested: u64::from(cost),
                banked: self.banked_points,
            });
        }
        self.banked_points -= cost;
        self.has_switched = true;
        Ok(())
    }
}
