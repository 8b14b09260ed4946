use super::Side;

/// Turn bookkeeping shared by both sides.
///
/// Each side has its own base-point counter. A side plays its first turn on
/// its initial base points; every later activation ratchets the counter by
/// one, up to the configured maximum. It never decreases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Monotonic half-round counter, 1 for the opening side's first turn.
    pub turn: u32,
    pub active_side: Side,
    pub player_base_points: u32,
    pub enemy_base_points: u32,
    player_activated: bool,
    enemy_activated: bool,
}

impl TurnState {
    pub fn new(opening_side: Side, player_base_points: u32, enemy_base_points: u32) -> Self {
        Self {
            turn: 0,
            active_side: opening_side,
            player_base_points,
            enemy_base_points,
            player_activated: false,
            enemy_activated: false,
        }
    }

    pub fn base_points(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_base_points,
            Side::Enemy => self.enemy_base_points,
        }
    }

    /// Whether `side` has already had a turn.
    pub fn has_activated(&self, side: Side) -> bool {
        match side {
            Side::Player => self.player_activated,
            Side::Enemy => self.enemy_activated,
        }
    }

    /// Starts turn 1 for the opening side on its initial base points.
    pub fn open(&mut self) {
        self.turn = 1;
        self.mark_activated(self.active_side);
    }

    /// Flips the active side and advances the turn counter.
    ///
    /// The new side's base points ratchet unless this is its first turn.
    pub fn advance(&mut self, max_points_per_turn: u32) {
        self.active_side = self.active_side.opponent();
        let side = self.active_side;
        if self.has_activated(side) {
            let base = match side {
                Side::Player => &mut self.player_base_points,
                Side::Enemy => &mut self.enemy_base_points,
            };
            *base = base.saturating_add(1).min(max_points_per_turn);
        } else {
            self.mark_activated(side);
        }
        self.turn += 1;
    }

    fn mark_activated(&mut self, side: Side) {
        match side {
            Side::Player => self.player_activated = true,
            Side::Enemy => self.enemy_activated = true,
        }
    }
}
