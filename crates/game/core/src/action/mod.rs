//! Action domain: what a combatant may do with its banked points.
//!
//! - `allocation`: the attack/defend/reserve split and its validation
//! - `switch`: bringing a benched combatant to the front
//! - `policy`: deterministic strategies for sides that do not wait on input

pub mod allocation;
pub mod policy;
pub mod switch;

pub use allocation::{Allocation, AllocationError, AllocationRequest};
pub use policy::{AllInAttack, AllocationPolicy, Balanced, PolicyDecision};
pub use switch::{SwitchError, SwitchKind};
