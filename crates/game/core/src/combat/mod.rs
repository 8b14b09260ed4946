//! Combat resolution system.
//!
//! This module provides pure functions for resolving combat interactions.
//! All combat logic is deterministic and side-effect free.
//!
//! # Core Functions
//!
//! - `resolve_damage`: Damage one combatant deals to another given both allocations
//! - `calculate_damage`: The same formula over raw numbers
//! - `matchup`: Rock-paper-scissors relation between two weapon classes

pub mod damage;
pub mod matchup;

pub use damage::{calculate_damage, resolve_damage};
pub use matchup::{Matchup, class_multiplier_percent, matchup};
