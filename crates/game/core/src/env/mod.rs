//! Read-only data the engine consults during setup.
//!
//! The weapon catalog is an oracle: the engine never mutates it and only reads
//! it while building rosters from a [`BattleSession`](crate::session::BattleSession).
mod weapons;

pub use weapons::{ClassType, StaticWeaponCatalog, WeaponCatalog, WeaponProfile, WeaponTemplate};
