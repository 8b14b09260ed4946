//! Data-driven content definitions and loaders.
//!
//! This crate reads battle content from disk:
//! - Weapon catalogs (RON)
//! - Battle sessions, the two rosters of one battle (RON)
//! - Battle rules (TOML)
//!
//! All loaders deserialize straight into battle-core types via serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, LoadResult, SessionLoader, WeaponEntry,
};
