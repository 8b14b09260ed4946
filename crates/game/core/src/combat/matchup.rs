//! Weapon class matchups.

use crate::env::ClassType;

/// Relation of an attacking class to a defending class.
///
/// Exactly one variant holds for every ordered pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Matchup {
    Advantage,
    Disadvantage,
    Neutral,
}

impl Matchup {
    /// Damage multiplier in percent.
    pub const fn multiplier_percent(self) -> u32 {
        match self {
            Matchup::Advantage => 115,
            Matchup::Disadvantage => 85,
            Matchup::Neutral => 100,
        }
    }
}

impl ClassType {
    /// The class this one has the advantage over.
    pub const fn beats(self) -> ClassType {
        match self {
            ClassType::Sword => ClassType::Hammer,
            ClassType::Hammer => ClassType::Shield,
            ClassType::Shield => ClassType::Sword,
        }
    }
}

/// Classifies an ordered (attacker, defender) pair.
pub fn matchup(attacker: ClassType, defender: ClassType) -> Matchup {
    if attacker.beats() == defender {
        Matchup::Advantage
    } else if defender.beats() == attacker {
        Matchup::Disadvantage
    } else {
        Matchup::Neutral
    }
}

pub fn class_multiplier_percent(attacker: ClassType, defender: ClassType) -> u32 {
    matchup(attacker, defender).multiplier_percent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn listed_pairings() {
        assert_eq!(class_multiplier_percent(ClassType::Sword, ClassType::Hammer), 115);
        assert_eq!(class_multiplier_percent(ClassType::Hammer, ClassType::Sword), 85);
        assert_eq!(class_multiplier_percent(ClassType::Sword, ClassType::Shield), 85);
        assert_eq!(class_multiplier_percent(ClassType::Shield, ClassType::Sword), 115);
        assert_eq!(class_multiplier_percent(ClassType::Hammer, ClassType::Shield), 115);
        assert_eq!(class_multiplier_percent(ClassType::Shield, ClassType::Hammer), 85);
    }

    #[test]
    fn same_class_is_neutral() {
        for class in ClassType::iter() {
            assert_eq!(matchup(class, class), Matchup::Neutral);
        }
    }

    #[test]
    fn relation_is_antisymmetric_over_every_pair() {
        for attacker in ClassType::iter() {
            for defender in ClassType::iter() {
                let forward = matchup(attacker, defender);
                let reverse = matchup(defender, attacker);
                match forward {
                    Matchup::Advantage => assert_eq!(reverse, Matchup::Disadvantage),
                    Matchup::Disadvantage => assert_eq!(reverse, Matchup::Advantage),
                    Matchup::Neutral => assert_eq!(reverse, Matchup::Neutral),
                }
            }
        }
    }

    #[test]
    fn each_class_beats_exactly_one_other() {
        for attacker in ClassType::iter() {
            let advantaged = ClassType::iter()
                .filter(|&defender| matchup(attacker, defender) == Matchup::Advantage)
                .count();
            assert_eq!(advantaged, 1);
        }
    }
}
