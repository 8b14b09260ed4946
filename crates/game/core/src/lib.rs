//! Deterministic battle rules shared by the runtime and offline tools.
//!
//! `battle-core` defines the canonical rules (allocation, damage, switching,
//! turn sequencing) and exposes pure, synchronous APIs. All state mutation
//! flows through [`engine::BattleEngine`]; supporting crates depend on the
//! types re-exported here.
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod session;
pub mod state;

pub use action::{
    AllInAttack, Allocation, AllocationError, AllocationPolicy, AllocationRequest, Balanced,
    PolicyDecision, SwitchError, SwitchKind,
};
pub use combat::{Matchup, calculate_damage, matchup, resolve_damage};
pub use config::{BattleConfig, GuardWindow, TiePolicy};
pub use engine::{
    BattleEngine, BattleSnapshot, CommandError, DelayKind, EngineStateError, Phase, Progress,
    SetupError, decide_outcome,
};
pub use env::{ClassType, StaticWeaponCatalog, WeaponCatalog, WeaponProfile, WeaponTemplate};
pub use error::{BattleError, ErrorSeverity};
pub use events::{BattleEvent, CombatantSummary, PublicAllocation};
pub use session::{BattleSession, CombatantDescriptor, RosterError, Rosters};
pub use state::{BattleState, Combatant, CombatantId, Side, TurnState};
