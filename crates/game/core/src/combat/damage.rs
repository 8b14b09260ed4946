//! Damage resolution.
//!
//! `damage = round_half_away(base_attack × max(attack − defend, 0) × multiplier)`
//!
//! The multiplier is kept in integer percent so that exact halves round the
//! same way on every platform.

use crate::env::ClassType;
use crate::state::Combatant;

use super::matchup::class_multiplier_percent;

/// Damage `attacker` deals to `defender` given their current allocations.
///
/// Pure: neither combatant is modified.
pub fn resolve_damage(attacker: &Combatant, defender: &Combatant) -> u32 {
    calculate_damage(
        attacker.base_attack(),
        attacker.allocation().attack,
        defender.allocation().defend,
        attacker.class_type(),
        defender.class_type(),
    )
}

/// Raw form of [`resolve_damage`].
pub fn calculate_damage(
    base_attack: u32,
    attack_points: u32,
    defend_points: u32,
    attacker_class: ClassType,
    defender_class: ClassType,
) -> u32 {
    let effective = attack_points.saturating_sub(defend_points);
    if effective == 0 {
        return 0;
    }

    let percent = class_multiplier_percent(attacker_class, defender_class);
    let scaled = u128::from(base_attack) * u128::from(effective) * u128::from(percent);
    // Non-negative, so adding half the divisor rounds halves away from zero.
    let rounded = (scaled + 50) / 100;
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
