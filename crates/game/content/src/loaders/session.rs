//! Battle session loader.

use std::path::Path;

use battle_core::BattleSession;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle sessions from RON files.
pub struct SessionLoader;

impl SessionLoader {
    /// Load a battle session from a RON file.
    pub fn load(path: &Path) -> LoadResult<BattleSession> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleSession> {
        let session: BattleSession = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle session RON: {}", e))?;
        Ok(session)
    }
}
