use crate::engine::SetupError;
use crate::state::Side;

/// Who wins when both sides are wiped out by the same check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TiePolicy {
    /// The side that was being attacked loses; the active side wins.
    #[default]
    DefenderLoses,
    /// The active side loses.
    AttackerLoses,
}

/// How long a combatant's defend allocation stays standing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GuardWindow {
    /// Cleared together with attack right after the combatant acts.
    #[default]
    ActingTurn,
    /// Survives the opponent's resolution; cleared when the combatant's own
    /// side next allocates.
    UntilNextAllocation,
}

/// Battle rules tunable per session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Upper bound on a combatant's banked points.
    pub bank_cap: u32,
    /// Upper bound on a side's base points.
    pub max_points_per_turn: u32,
    pub initial_player_base_points: u32,
    pub initial_enemy_base_points: u32,
    /// Banked points a paid switch costs.
    pub switch_cost: u32,
    pub opening_side: Side,
    pub tie_policy: TiePolicy,
    pub guard_window: GuardWindow,
}

impl BattleConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BANK_CAP: u32 = 8;
    pub const DEFAULT_MAX_POINTS_PER_TURN: u32 = 4;
    pub const DEFAULT_INITIAL_BASE_POINTS: u32 = 1;
    pub const DEFAULT_SWITCH_COST: u32 = 1;

    pub fn new() -> Self {
        Self {
            bank_cap: Self::DEFAULT_BANK_CAP,
            max_points_per_turn: Self::DEFAULT_MAX_POINTS_PER_TURN,
            initial_player_base_points: Self::DEFAULT_INITIAL_BASE_POINTS,
            initial_enemy_base_points: Self::DEFAULT_INITIAL_BASE_POINTS,
            switch_cost: Self::DEFAULT_SWITCH_COST,
            opening_side: Side::Player,
            tie_policy: TiePolicy::default(),
            guard_window: GuardWindow::default(),
        }
    }

    /// Rejects configurations under which no points could ever be spent.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.bank_cap == 0 {
            return Err(SetupError::InvalidConfig {
                reason: "bank_cap must be at least 1",
            });
        }
        if self.max_points_per_turn == 0 {
            return Err(SetupError::InvalidConfig {
                reason: "max_points_per_turn must be at least 1",
            });
        }
        Ok(())
    }

    /// Initial base points for a side, clamped to `[1, max_points_per_turn]`.
    pub fn initial_base_points(&self, side: Side) -> u32 {
        let configured = match side {
            Side::Player => self.initial_player_base_points,
            Side::Enemy => self.initial_enemy_base_points,
        };
        configured.clamp(1, self.max_points_per_turn.max(1))
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
