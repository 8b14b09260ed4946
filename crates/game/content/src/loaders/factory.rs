//! Content factory for loading a whole battle from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, BattleSession, StaticWeaponCatalog};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, SessionLoader};

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── session.ron
/// └── weapons.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CATALOG_FILE: &'static str = "weapons.ron";
    pub const SESSION_FILE: &'static str = "session.ron";
    pub const CONFIG_FILE: &'static str = "battle.toml";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the weapon catalog from `weapons.ron`.
    pub fn load_catalog(&self) -> LoadResult<StaticWeaponCatalog> {
        CatalogLoader::load(&self.data_dir.join(Self::CATALOG_FILE))
    }

    /// Load the rosters from `session.ron`.
    pub fn load_session(&self) -> LoadResult<BattleSession> {
        SessionLoader::load(&self.data_dir.join(Self::SESSION_FILE))
    }

    /// Load battle rules from `battle.toml`, falling back to defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{BattleEngine, WeaponCatalog};

    fn bundled() -> ContentFactory {
        ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../client/data"))
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let factory = ContentFactory::new("/nonexistent/battle-content");
        assert_eq!(factory.load_config().unwrap(), BattleConfig::default());
        assert!(factory.load_catalog().is_err());
    }

    #[test]
    fn bundled_content_builds_a_battle() {
        let factory = bundled();
        let catalog = factory.load_catalog().expect("bundled catalog");
        let session = factory.load_session().expect("bundled session");
        let config = factory.load_config().expect("bundled config");

        for descriptor in session.player.iter().chain(&session.enemy) {
            assert!(
                catalog.template(&descriptor.catalog_id).is_some(),
                "unknown weapon '{}'",
                descriptor.catalog_id
            );
        }

        let engine = BattleEngine::new(&session, &catalog, config).expect("bundled battle starts");
        assert!(engine.roster_issues().is_empty());
    }
}
