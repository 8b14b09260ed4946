//! Error types surfaced by the battle engine.

use crate::action::{AllocationError, SwitchError};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::Side;

use super::Phase;

/// A command arrived while the engine was not suspended on player input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineStateError {
    #[error("command not accepted during {phase}")]
    CommandOutsideExpectedPhase { phase: Phase },
}

/// Umbrella error returned by every engine command.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Switch(#[from] SwitchError),

    #[error(transparent)]
    State(#[from] EngineStateError),
}

impl CommandError {
    pub(crate) fn outside(phase: Phase) -> Self {
        Self::State(EngineStateError::CommandOutsideExpectedPhase { phase })
    }
}

impl BattleError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Allocation(error) => error.severity(),
            Self::Switch(error) => error.severity(),
            Self::State(_) => ErrorSeverity::Recoverable,
        }
    }
}

/// Reasons a battle refuses to start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("the {side} roster is empty")]
    EmptyRoster { side: Side },

    #[error("every combatant on the {side} roster is already defeated")]
    AllDefeated { side: Side },

    #[error("invalid battle config: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}
