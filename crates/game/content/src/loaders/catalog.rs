//! Weapon catalog loader.

use std::collections::HashSet;
use std::path::Path;

use battle_core::{ClassType, StaticWeaponCatalog, WeaponTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One catalog entry as written in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponEntry {
    pub id: String,
    pub name: String,
    pub class_type: ClassType,
    pub base_attack: u32,
    pub max_health: u32,
    #[serde(default)]
    pub attack_per_level: u32,
    #[serde(default)]
    pub health_per_level: u32,
}

impl WeaponEntry {
    /// Splits the entry into its catalog id and template.
    pub fn into_template(self) -> (String, WeaponTemplate) {
        let template =
            WeaponTemplate::new(self.name, self.class_type, self.base_attack, self.max_health)
                .with_growth(self.attack_per_level, self.health_per_level);
        (self.id, template)
    }
}

/// Weapon catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeaponCatalogRon {
    weapons: Vec<WeaponEntry>,
}

/// Loader for weapon catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a weapon catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<StaticWeaponCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a weapon catalog from RON text.
    ///
    /// Duplicate ids and zero max health are rejected.
    pub fn parse(content: &str) -> LoadResult<StaticWeaponCatalog> {
        let catalog: WeaponCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for entry in &catalog.weapons {
            if !seen.insert(entry.id.as_str()) {
                anyhow::bail!("Duplicate weapon id '{}' in catalog", entry.id);
            }
            if entry.max_health == 0 {
                anyhow::bail!("Weapon '{}' has zero max_health", entry.id);
            }
        }

        Ok(catalog
            .weapons
            .into_iter()
            .map(WeaponEntry::into_template)
            .collect())
    }
}
