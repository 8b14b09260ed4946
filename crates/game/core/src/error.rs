//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (`AllocationError`, `SwitchError`, ...) are defined
//! next to the rules they enforce. This module provides the shared severity
//! classification used by the runtime to decide how to report them.

use crate::action::{AllocationError, SwitchError};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same caller may succeed with a different command
/// - **Validation**: malformed input that should not be retried unchanged
/// - **Fatal**: the battle cannot start or continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: wrong combatant awaited, not enough banked points
    Recoverable,

    /// Examples: negative amounts, switching to an enemy combatant
    Validation,

    /// Examples: empty roster, zero bank cap
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;
}

impl BattleError for AllocationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NegativeAmount { .. } => ErrorSeverity::Validation,
            Self::NotAwaitingThisActor { .. } | Self::InsufficientPoints { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }
}

impl BattleError for SwitchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCombatant { .. } | Self::WrongSide { .. } => ErrorSeverity::Validation,
            Self::CombatantDown { .. }
            | Self::AlreadyInFront { .. }
            | Self::AlreadySwitched { .. }
            | Self::InsufficientPoints { .. } => ErrorSeverity::Recoverable,
        }
    }
}
