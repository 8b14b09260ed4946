//! One-line descriptions of battle events for the simulator log.

use battle_core::{BattleEvent, CombatantSummary, PublicAllocation};

pub fn describe(event: &BattleEvent) -> String {
    match event {
        BattleEvent::BattleSetupComplete {
            player,
            enemy,
            roster_issues,
        } => {
            let mut line = format!("setup: [{}] vs [{}]", roster(player), roster(enemy));
            if !roster_issues.is_empty() {
                line.push_str(&format!(" ({} slot(s) substituted)", roster_issues.len()));
            }
            line
        }
        BattleEvent::CountdownStarted => "countdown started".into(),
        BattleEvent::BattleStarted => "battle started".into(),
        BattleEvent::TurnChanged { turn, side } => format!("turn {turn}: {side} side"),
        BattleEvent::PlayerAllocationPhaseStarted {
            combatant,
            available_points,
        } => format!("{combatant} to allocate {available_points} point(s)"),
        BattleEvent::EnemyTurnStarted { turn } => format!("enemy acts on turn {turn}"),
        BattleEvent::AllocationCommitted {
            combatant,
            allocation,
        } => format!(
            "{combatant} commits atk {} / def {} / reserve {}",
            allocation.attack, allocation.defend, allocation.reserve
        ),
        BattleEvent::AllocationsRevealed { player, enemy } => {
            format!("reveal: {} vs {}", revealed(player), revealed(enemy))
        }
        BattleEvent::CombatantDamaged {
            attacker,
            defender,
            damage,
            new_hp,
        } => format!("{attacker} hits {defender} for {damage} ({new_hp} hp left)"),
        BattleEvent::CombatantDeath { combatant, side } => {
            format!("{combatant} ({side}) is defeated")
        }
        BattleEvent::WeaponSwitched {
            incoming,
            outgoing,
            deducted_cost,
            ..
        } => format!("{outgoing} swaps out for {incoming} (cost {deducted_cost})"),
        BattleEvent::SwitchRejected {
            actor,
            incoming,
            error,
        } => format!("{actor} could not bring in {incoming}: {error}"),
        BattleEvent::BattleEnded { winner } => format!("battle over: {winner} side wins"),
        BattleEvent::BattleAborted { turn } => format!("battle aborted on turn {turn}"),
    }
}

fn roster(combatants: &[CombatantSummary]) -> String {
    combatants
        .iter()
        .map(|c| format!("{} {} Lv{} {}hp", c.id, c.name, c.level, c.current_hp))
        .collect::<Vec<_>>()
        .join(", ")
}

fn revealed(allocation: &Option<PublicAllocation>) -> String {
    match allocation {
        Some(a) => format!("{} atk {} def {}", a.combatant, a.attack, a.defend),
        None => "nobody".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{CombatantId, Side, SwitchError};

    #[test]
    fn describes_hits_and_endings() {
        let hit = BattleEvent::CombatantDamaged {
            attacker: CombatantId(0),
            defender: CombatantId(1),
            damage: 23,
            new_hp: 77,
        };
        let line = describe(&hit);
        assert!(line.contains("for 23"));
        assert!(line.contains("77 hp left"));

        let end = BattleEvent::BattleEnded {
            winner: Side::Enemy,
        };
        assert_eq!(describe(&end), "battle over: enemy side wins");
    }

    #[test]
    fn empty_reveal_reads_as_nobody() {
        let reveal = BattleEvent::AllocationsRevealed {
            player: None,
            enemy: Some(PublicAllocation {
                combatant: CombatantId(3),
                attack: 2,
                defend: 1,
            }),
        };
        let line = describe(&reveal);
        assert!(line.starts_with("reveal: nobody vs"));
        assert!(line.ends_with("atk 2 def 1"));
    }

    #[test]
    fn rejected_switch_names_the_reason() {
        let rejected = BattleEvent::SwitchRejected {
            actor: CombatantId(2),
            incoming: CombatantId(0),
            error: SwitchError::WrongSide {
                combatant: CombatantId(0),
                side: Side::Player,
            },
        };
        let line = describe(&rejected);
        assert!(line.contains("could not bring in"));
        assert!(line.ends_with("fights for the player side"));
    }
}
