//! Weapon templates, level-scaled profiles, and the catalog oracle.
//!
//! A combatant's stats are derived once, at battle setup, from the weapon
//! profile its roster descriptor resolves to. Templates live in a catalog
//! supplied by the caller (usually loaded from RON by `battle-content`).

use std::collections::HashMap;

/// Weapon class governing the rock-paper-scissors damage multiplier.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassType {
    Sword,
    Hammer,
    Shield,
}

/// Catalog entry describing a weapon at level 1 plus its per-level growth.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponTemplate {
    pub name: String,
    pub class_type: ClassType,
    pub base_attack: u32,
    pub max_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_per_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub health_per_level: u32,
}

impl WeaponTemplate {
    pub fn new(
        name: impl Into<String>,
        class_type: ClassType,
        base_attack: u32,
        max_health: u32,
    ) -> Self {
        Self {
            name: name.into(),
            class_type,
            base_attack,
            max_health,
            attack_per_level: 0,
            health_per_level: 0,
        }
    }

    /// Sets per-level growth (builder pattern).
    #[must_use]
    pub fn with_growth(mut self, attack_per_level: u32, health_per_level: u32) -> Self {
        self.attack_per_level = attack_per_level;
        self.health_per_level = health_per_level;
        self
    }

    /// Resolves the immutable profile for a combatant at `level`.
    ///
    /// Levels below 1 are treated as level 1.
    pub fn profile_at(&self, level: u32) -> WeaponProfile {
        let level = level.max(1);
        let steps = level - 1;
        WeaponProfile {
            name: self.name.clone(),
            class_type: self.class_type,
            base_attack: self
                .base_attack
                .saturating_add(self.attack_per_level.saturating_mul(steps)),
            max_health: self
                .max_health
                .saturating_add(self.health_per_level.saturating_mul(steps))
                .max(1),
            level,
        }
    }

    /// Template substituted when a roster descriptor cannot be resolved.
    pub fn placeholder() -> Self {
        Self::new(WeaponProfile::PLACEHOLDER_NAME, ClassType::Sword, 1, 10)
    }
}

/// Combat stats of one combatant, fixed for the whole battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub name: String,
    pub class_type: ClassType,
    pub base_attack: u32,
    pub max_health: u32,
    pub level: u32,
}

impl WeaponProfile {
    pub const PLACEHOLDER_NAME: &'static str = "Unknown Weapon";

    pub fn placeholder(level: u32) -> Self {
        WeaponTemplate::placeholder().profile_at(level)
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == Self::PLACEHOLDER_NAME
    }
}

/// Oracle resolving catalog ids to weapon templates.
pub trait WeaponCatalog: Send + Sync {
    fn template(&self, catalog_id: &str) -> Option<&WeaponTemplate>;

    /// Resolves a level-scaled profile, or `None` for unknown ids.
    fn profile(&self, catalog_id: &str, level: u32) -> Option<WeaponProfile> {
        self.template(catalog_id)
            .map(|template| template.profile_at(level))
    }
}

/// In-memory catalog keyed by catalog id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StaticWeaponCatalog {
    templates: HashMap<String, WeaponTemplate>,
}

impl StaticWeaponCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, replacing any previous entry with the same id.
    pub fn insert(&mut self, catalog_id: impl Into<String>, template: WeaponTemplate) {
        self.templates.insert(catalog_id.into(), template);
    }

    #[must_use]
    pub fn with(mut self, catalog_id: impl Into<String>, template: WeaponTemplate) -> Self {
        self.insert(catalog_id, template);
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<(String, WeaponTemplate)> for StaticWeaponCatalog {
    fn from_iter<T: IntoIterator<Item = (String, WeaponTemplate)>>(iter: T) -> Self {
        Self {
            templates: iter.into_iter().collect(),
        }
    }
}

impl WeaponCatalog for StaticWeaponCatalog {
    fn template(&self, catalog_id: &str) -> Option<&WeaponTemplate> {
        self.templates.get(catalog_id)
    }
}
