use crate::config::TiePolicy;
use crate::state::Side;

/// Decides whether the battle is over after a resolution phase.
///
/// Returns the winning side, or `None` while both sides still field someone.
/// A simultaneous wipe is settled by `policy` relative to `active_side`.
pub fn decide_outcome(
    player_alive: bool,
    enemy_alive: bool,
    active_side: Side,
    policy: TiePolicy,
) -> Option<Side> {
    match (player_alive, enemy_alive) {
        (true, true) => None,
        (true, false) => Some(Side::Player),
        (false, true) => Some(Side::Enemy),
        (false, false) => Some(match policy {
            TiePolicy::DefenderLoses => active_side,
            TiePolicy::AttackerLoses => active_side.opponent(),
        }),
    }
}
