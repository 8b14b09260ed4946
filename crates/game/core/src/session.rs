//! Battle input: the two rosters a battle is fought with.
//!
//! A [`BattleSession`] is supplied once, before the engine starts, and is
//! read-only afterwards. Descriptors reference weapons by catalog id; the
//! engine resolves them through a [`WeaponCatalog`] during setup.

use crate::engine::SetupError;
use crate::env::{WeaponCatalog, WeaponProfile};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{Combatant, CombatantId, Side};

/// One roster slot as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantDescriptor {
    pub catalog_id: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub owned: bool,
    /// Live inventory instance the combatant was drawn from, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub instance_id: Option<String>,
    /// Health carried into the battle; `None` means full health.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_health: Option<u32>,
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    1
}

impl CombatantDescriptor {
    pub fn new(catalog_id: impl Into<String>, level: u32) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            level,
            owned: false,
            instance_id: None,
            starting_health: None,
        }
    }

    #[must_use]
    pub fn owned(mut self, instance_id: impl Into<String>) -> Self {
        self.owned = true;
        self.instance_id = Some(instance_id.into());
        self
    }

    #[must_use]
    pub fn with_starting_health(mut self, hp: u32) -> Self {
        self.starting_health = Some(hp);
        self
    }
}

/// Two ordered rosters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSession {
    pub player: Vec<CombatantDescriptor>,
    pub enemy: Vec<CombatantDescriptor>,
}

/// A roster slot that could not be resolved as described.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RosterError {
    #[error("no weapon profile for '{catalog_id}' ({side} slot {slot}); placeholder substituted")]
    MissingWeaponProfile {
        catalog_id: String,
        side: Side,
        slot: usize,
    },
}

impl BattleError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// Combatants built from a session, ready to be placed into a battle state.
#[derive(Clone, Debug)]
pub struct Rosters {
    pub player: Vec<Combatant>,
    pub enemy: Vec<Combatant>,
    pub issues: Vec<RosterError>,
}

impl BattleSession {
    pub fn new(player: Vec<CombatantDescriptor>, enemy: Vec<CombatantDescriptor>) -> Self {
        Self { player, enemy }
    }

    pub fn roster(&self, side: Side) -> &[CombatantDescriptor] {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Resolves every descriptor into a combatant.
    ///
    /// Unresolvable catalog ids get the placeholder profile and are reported in
    /// [`Rosters::issues`]. Fails if either side is empty or has nobody alive.
    pub fn build_rosters(&self, catalog: &dyn WeaponCatalog) -> Result<Rosters, SetupError> {
        for side in [Side::Player, Side::Enemy] {
            if self.roster(side).is_empty() {
                return Err(SetupError::EmptyRoster { side });
            }
        }

        let mut issues = Vec::new();
        let mut next_id = 0;
        let player = build_side(
            self.roster(Side::Player),
            Side::Player,
            catalog,
            &mut next_id,
            &mut issues,
        );
        let enemy = build_side(
            self.roster(Side::Enemy),
            Side::Enemy,
            catalog,
            &mut next_id,
            &mut issues,
        );

        for (side, roster) in [(Side::Player, &player), (Side::Enemy, &enemy)] {
            if !roster.iter().any(Combatant::is_alive) {
                return Err(SetupError::AllDefeated { side });
            }
        }

        Ok(Rosters {
            player,
            enemy,
            issues,
        })
    }
}

fn build_side(
    descriptors: &[CombatantDescriptor],
    side: Side,
    catalog: &dyn WeaponCatalog,
    next_id: &mut u32,
    issues: &mut Vec<RosterError>,
) -> Vec<Combatant> {
    descriptors
        .iter()
        .enumerate()
        .map(|(slot, descriptor)| {
            let profile = catalog
                .profile(&descriptor.catalog_id, descriptor.level)
                .unwrap_or_else(|| {
                    issues.push(RosterError::MissingWeaponProfile {
                        catalog_id: descriptor.catalog_id.clone(),
                        side,
                        slot,
                    });
                    WeaponProfile::placeholder(descriptor.level)
                });

            let id = CombatantId(*next_id);
            *next_id += 1;

            let mut combatant = Combatant::new(id, side, descriptor.catalog_id.clone(), profile)
                .with_ownership(descriptor.owned, descriptor.instance_id.clone());
            if let Some(hp) = descriptor.starting_health {
                combatant = combatant.with_starting_health(hp);
            }
            combatant
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ClassType, StaticWeaponCatalog, WeaponTemplate};

    fn catalog() -> StaticWeaponCatalog {
        StaticWeaponCatalog::new()
            .with("sword", WeaponTemplate::new("Longsword", ClassType::Sword, 20, 100))
            .with(
                "hammer",
                WeaponTemplate::new("Maul", ClassType::Hammer, 20, 100).with_growth(2, 10),
            )
    }

    #[test]
    fn ids_run_player_first_then_enemy() {
        let session = BattleSession::new(
            vec![CombatantDescriptor::new("sword", 1), CombatantDescriptor::new("hammer", 1)],
            vec![CombatantDescriptor::new("hammer", 3)],
        );
        let rosters = session.build_rosters(&catalog()).unwrap();

        let ids: Vec<_> = rosters.player.iter().map(Combatant::id).collect();
        assert_eq!(ids, vec![CombatantId(0), CombatantId(1)]);
        assert_eq!(rosters.enemy[0].id(), CombatantId(2));
        assert_eq!(rosters.enemy[0].side(), Side::Enemy);
        assert_eq!(rosters.enemy[0].base_attack(), 24);
        assert!(rosters.issues.is_empty());
    }

    #[test]
    fn unknown_weapon_gets_placeholder_and_is_reported() {
        let session = BattleSession::new(
            vec![CombatantDescriptor::new("sword", 1)],
            vec![CombatantDescriptor::new("trident", 2)],
        );
        let rosters = session.build_rosters(&catalog()).unwrap();

        assert!(rosters.enemy[0].profile().is_placeholder());
        assert_eq!(rosters.enemy[0].catalog_id(), "trident");
        assert_eq!(
            rosters.issues,
            vec![RosterError::MissingWeaponProfile {
                catalog_id: "trident".into(),
                side: Side::Enemy,
                slot: 0,
            }]
        );
    }

    #[test]
    fn ownership_and_wounds_carry_over() {
        let session = BattleSession::new(
            vec![CombatantDescriptor::new("sword", 1)
                .owned("inv-42")
                .with_starting_health(60)],
            vec![CombatantDescriptor::new("hammer", 1)],
        );
        let rosters = session.build_rosters(&catalog()).unwrap();

        let c = &rosters.player[0];
        assert!(c.is_owned());
        assert_eq!(c.instance_id(), Some("inv-42"));
        assert_eq!(c.current_hp(), 60);
    }

    #[test]
    fn empty_roster_is_refused() {
        let session = BattleSession::new(Vec::new(), vec![CombatantDescriptor::new("hammer", 1)]);
        assert_eq!(
            session.build_rosters(&catalog()).unwrap_err(),
            SetupError::EmptyRoster { side: Side::Player }
        );
    }

    #[test]
    fn all_defeated_roster_is_refused() {
        let session = BattleSession::new(
            vec![CombatantDescriptor::new("sword", 1)],
            vec![
                CombatantDescriptor::new("hammer", 1).with_starting_health(0),
                CombatantDescriptor::new("sword", 1).with_starting_health(0),
            ],
        );
        assert_eq!(
            session.build_rosters(&catalog()).unwrap_err(),
            SetupError::AllDefeated { side: Side::Enemy }
        );
    }
}
