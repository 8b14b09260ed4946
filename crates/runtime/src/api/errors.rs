//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections, setup failures, worker coordination, and
//! allocation providers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{BattleError, CombatantId, CommandError, ErrorSeverity, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a battle session before building")]
    MissingSession,

    #[error("runtime requires a weapon catalog before building")]
    MissingCatalog,

    #[error("battle setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("battle was aborted")]
    BattleAborted,

    #[error("allocation provider failed for {combatant}: {reason}")]
    Provider {
        combatant: CombatantId,
        reason: String,
    },
}

impl RuntimeError {
    /// Severity of the underlying engine error, if this wraps one.
    pub fn severity(&self) -> Option<ErrorSeverity> {
        match self {
            RuntimeError::Setup(error) => Some(error.severity()),
            RuntimeError::Command(error) => Some(error.severity()),
            _ => None,
        }
    }
}
