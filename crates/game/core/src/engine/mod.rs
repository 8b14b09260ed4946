//! Battle state machine.
//!
//! The [`BattleEngine`] is the authoritative owner of both rosters. It is a
//! synchronous stepper: [`BattleEngine::advance`] runs phases until the
//! battle needs something from the outside world (a wall-clock delay or a
//! player allocation) and reports that as [`Progress`]. The caller performs
//! the wait, feeds any commands back in, and calls `advance` again.
//!
//! ```text
//! Setup → Countdown → Allocation(side) → Reveal(side) → Resolution(side)
//!       → TurnEnd → Allocation(other side) → ... → BattleEnd
//! ```

mod errors;
mod outcome;

pub use errors::{CommandError, EngineStateError, SetupError};
pub use outcome::decide_outcome;

use std::collections::HashSet;
use std::fmt;

use crate::action::{
    AllInAttack, Allocation, AllocationError, AllocationPolicy, AllocationRequest, SwitchError,
    SwitchKind,
};
use crate::combat::resolve_damage;
use crate::config::{BattleConfig, GuardWindow};
use crate::env::WeaponCatalog;
use crate::events::{BattleEvent, CombatantSummary, PublicAllocation};
use crate::session::{BattleSession, RosterError};
use crate::state::{BattleState, Combatant, CombatantId, Side, TurnState};

/// Current position in the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Setup,
    Countdown,
    Allocation(Side),
    Reveal(Side),
    Resolution(Side),
    TurnEnd,
    BattleEnd { winner: Side },
    Aborted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::BattleEnd { .. } | Phase::Aborted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => f.write_str("setup"),
            Phase::Countdown => f.write_str("countdown"),
            Phase::Allocation(side) => write!(f, "{side} allocation"),
            Phase::Reveal(side) => write!(f, "{side} reveal"),
            Phase::Resolution(side) => write!(f, "{side} resolution"),
            Phase::TurnEnd => f.write_str("turn end"),
            Phase::BattleEnd { winner } => write!(f, "battle end ({winner} won)"),
            Phase::Aborted => f.write_str("aborted"),
        }
    }
}

/// Fixed-duration waits the caller is expected to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelayKind {
    /// Before the first turn.
    Countdown,
    /// After allocations are revealed, before damage lands.
    Reveal,
}

/// Why [`BattleEngine::advance`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Progress {
    Delay(DelayKind),
    AwaitingAllocation(CombatantId),
    Finished(Side),
    Aborted,
}

/// Point-in-time copy of everything an observer may read.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub phase: Phase,
    pub awaiting: Option<CombatantId>,
    pub state: BattleState,
}

/// Two-sided turn engine.
///
/// All combatant mutation happens here. Commands are only accepted while the
/// engine is suspended on a player combatant; everything else is driven by
/// `advance`.
pub struct BattleEngine {
    config: BattleConfig,
    state: BattleState,
    phase: Phase,
    awaiting: Option<CombatantId>,
    settled: HashSet<CombatantId>,
    roster_issues: Vec<RosterError>,
    enemy_policy: Box<dyn AllocationPolicy>,
    events: Vec<BattleEvent>,
}

impl fmt::Debug for BattleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleEngine")
            .field("phase", &self.phase)
            .field("awaiting", &self.awaiting)
            .field("turn", &self.state.turn)
            .finish_non_exhaustive()
    }
}

impl BattleEngine {
    /// Builds both rosters and emits `BattleSetupComplete`.
    ///
    /// Refuses to start on an invalid config, an empty roster, or a roster
    /// with nobody alive.
    pub fn new(
        session: &BattleSession,
        catalog: &dyn WeaponCatalog,
        config: BattleConfig,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let rosters = session.build_rosters(catalog)?;

        let turn = TurnState::new(
            config.opening_side,
            config.initial_base_points(Side::Player),
            config.initial_base_points(Side::Enemy),
        );
        let state = BattleState::new(turn, rosters.player, rosters.enemy);

        let mut engine = Self {
            config,
            state,
            phase: Phase::Setup,
            awaiting: None,
            settled: HashSet::new(),
            roster_issues: rosters.issues,
            enemy_policy: Box::new(AllInAttack),
            events: Vec::new(),
        };

        let summaries = |side| {
            engine
                .state
                .roster(side)
                .iter()
                .map(CombatantSummary::from)
                .collect::<Vec<_>>()
        };
        let event = BattleEvent::BattleSetupComplete {
            player: summaries(Side::Player),
            enemy: summaries(Side::Enemy),
            roster_issues: engine.roster_issues.clone(),
        };
        engine.events.push(event);

        Ok(engine)
    }

    /// Replaces the enemy's built-in all-in-attack policy (builder pattern).
    #[must_use]
    pub fn with_enemy_policy(mut self, policy: impl AllocationPolicy + 'static) -> Self {
        self.set_enemy_policy(Box::new(policy));
        self
    }

    pub fn set_enemy_policy(&mut self, policy: Box<dyn AllocationPolicy>) {
        self.enemy_policy = policy;
    }

    // ===== queries =====

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Player combatant the engine is suspended on, if any.
    pub fn awaiting(&self) -> Option<CombatantId> {
        self.awaiting
    }

    pub fn turn(&self) -> u32 {
        self.state.turn.turn
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Roster slots that were filled with the placeholder profile.
    pub fn roster_issues(&self) -> &[RosterError] {
        &self.roster_issues
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            phase: self.phase,
            awaiting: self.awaiting,
            state: self.state.clone(),
        }
    }

    /// Takes every event emitted since the previous drain.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== stepping =====

    /// Runs the state machine until the next suspension point.
    ///
    /// While suspended on a player combatant this returns the same
    /// `AwaitingAllocation` without side effects. Once finished or aborted it
    /// keeps returning that outcome.
    pub fn advance(&mut self) -> Progress {
        loop {
            match self.phase {
                Phase::Setup => {
                    self.phase = Phase::Countdown;
                    self.emit(BattleEvent::CountdownStarted);
                    return Progress::Delay(DelayKind::Countdown);
                }
                Phase::Countdown => {
                    self.emit(BattleEvent::BattleStarted);
                    self.state.turn.open();
                    let side = self.state.turn.active_side;
                    self.emit(BattleEvent::TurnChanged { turn: 1, side });
                    self.begin_allocation(side);
                }
                Phase::Allocation(side) => match self.awaiting {
                    Some(id) => return Progress::AwaitingAllocation(id),
                    None => self.phase = Phase::Reveal(side),
                },
                Phase::Reveal(side) => {
                    let player = self.state.front(Side::Player).map(PublicAllocation::from);
                    let enemy = self.state.front(Side::Enemy).map(PublicAllocation::from);
                    self.emit(BattleEvent::AllocationsRevealed { player, enemy });
                    self.phase = Phase::Resolution(side);
                    return Progress::Delay(DelayKind::Reveal);
                }
                Phase::Resolution(side) => {
                    self.resolve(side);
                    let outcome = decide_outcome(
                        self.state.has_alive(Side::Player),
                        self.state.has_alive(Side::Enemy),
                        side,
                        self.config.tie_policy,
                    );
                    match outcome {
                        Some(winner) => {
                            self.phase = Phase::BattleEnd { winner };
                            self.emit(BattleEvent::BattleEnded { winner });
                            return Progress::Finished(winner);
                        }
                        None => self.phase = Phase::TurnEnd,
                    }
                }
                Phase::TurnEnd => {
                    self.state.turn.advance(self.config.max_points_per_turn);
                    let turn = self.state.turn.turn;
                    let side = self.state.turn.active_side;
                    self.emit(BattleEvent::TurnChanged { turn, side });
                    self.begin_allocation(side);
                }
                Phase::BattleEnd { winner } => return Progress::Finished(winner),
                Phase::Aborted => return Progress::Aborted,
            }
        }
    }

    // ===== commands =====

    /// Applies the awaited player combatant's allocation.
    ///
    /// On success the combatant is settled and the engine moves on to the next
    /// player combatant with points to spend, or to the reveal.
    pub fn submit_allocation(
        &mut self,
        combatant: CombatantId,
        request: AllocationRequest,
    ) -> Result<Allocation, CommandError> {
        let awaiting = self.expect_player_suspension()?;
        if awaiting != combatant {
            return Err(AllocationError::NotAwaitingThisActor {
                awaiting,
                provided: combatant,
            }
            .into());
        }

        let actor = self
            .state
            .combatant_mut(combatant)
            .ok_or(AllocationError::NotAwaitingThisActor {
                awaiting,
                provided: combatant,
            })?;
        let allocation = actor.try_allocate(request)?;

        self.emit(BattleEvent::AllocationCommitted {
            combatant,
            allocation,
        });
        self.settled.insert(combatant);
        self.await_next_player();
        Ok(allocation)
    }

    /// Brings `incoming` to the front of the player roster on behalf of the
    /// awaited combatant.
    ///
    /// The awaited combatant stays suspended afterwards so that it can still
    /// allocate, unless the switch emptied its bank.
    pub fn request_switch(
        &mut self,
        incoming: CombatantId,
        kind: SwitchKind,
    ) -> Result<(), CommandError> {
        let actor = self.expect_player_suspension()?;
        self.perform_switch(Side::Player, actor, incoming, kind)?;

        let bank_empty = self
            .state
            .combatant(actor)
            .is_none_or(|c| c.banked_points() == 0);
        if bank_empty {
            self.settled.insert(actor);
            self.await_next_player();
        } else if let Some(c) = self.state.combatant(actor) {
            let available_points = c.banked_points();
            self.emit(BattleEvent::PlayerAllocationPhaseStarted {
                combatant: actor,
                available_points,
            });
        }
        Ok(())
    }

    /// Ends the player allocation phase early.
    ///
    /// Combatants that have not allocated keep their banks and allocate nothing.
    pub fn finalize_allocation(&mut self) -> Result<(), CommandError> {
        self.expect_player_suspension()?;
        self.awaiting = None;
        self.settled.clear();
        self.phase = Phase::Reveal(Side::Player);
        Ok(())
    }

    /// Tears the battle down. Returns false if it had already ended.
    pub fn abort(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.awaiting = None;
        self.settled.clear();
        self.phase = Phase::Aborted;
        let turn = self.state.turn.turn;
        self.emit(BattleEvent::BattleAborted { turn });
        true
    }

    // ===== phase internals =====

    fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    fn expect_player_suspension(&self) -> Result<CombatantId, CommandError> {
        match (self.phase, self.awaiting) {
            (Phase::Allocation(Side::Player), Some(id)) => Ok(id),
            (phase, _) => Err(CommandError::outside(phase)),
        }
    }

    /// Banks the side's base points and either suspends on the first player
    /// combatant or runs the enemy policy.
    fn begin_allocation(&mut self, side: Side) {
        self.phase = Phase::Allocation(side);
        self.settled.clear();

        let base = self.state.turn.base_points(side);
        let cap = self.config.bank_cap;
        let clear_guard = self.config.guard_window == GuardWindow::UntilNextAllocation;
        for combatant in self.state.roster_mut(side).iter_mut().filter(|c| c.is_alive()) {
            if clear_guard {
                combatant.clear_guard();
            }
            combatant.start_turn_with_available_points(base, cap);
        }

        match side {
            Side::Player => self.await_next_player(),
            Side::Enemy => {
                let turn = self.state.turn.turn;
                self.emit(BattleEvent::EnemyTurnStarted { turn });
                self.run_enemy_policy();
            }
        }
    }

    /// Suspends on the next alive, unsettled player combatant with points, or
    /// closes the allocation phase when there is none.
    fn await_next_player(&mut self) {
        let mut next = None;
        for combatant in self.state.roster(Side::Player) {
            if !combatant.is_alive() || self.settled.contains(&combatant.id()) {
                continue;
            }
            if combatant.banked_points() == 0 {
                continue;
            }
            next = Some((combatant.id(), combatant.banked_points()));
            break;
        }

        match next {
            Some((combatant, available_points)) => {
                self.awaiting = Some(combatant);
                self.emit(BattleEvent::PlayerAllocationPhaseStarted {
                    combatant,
                    available_points,
                });
            }
            None => {
                self.awaiting = None;
                self.settled.clear();
                self.phase = Phase::Reveal(Side::Player);
            }
        }
    }

    fn run_enemy_policy(&mut self) {
        let actors: Vec<CombatantId> = self
            .state
            .roster(Side::Enemy)
            .iter()
            .filter(|c| c.is_alive())
            .map(Combatant::id)
            .collect();

        for id in actors {
            let Some(actor) = self.state.combatant(id) else {
                continue;
            };
            let decision = self.enemy_policy.decide(actor, &self.state);

            if let Some(incoming) = decision.switch_to {
                let switched = self.perform_switch(Side::Enemy, id, incoming, SwitchKind::Paid);
                if let Err(error) = switched {
                    self.emit(BattleEvent::SwitchRejected {
                        actor: id,
                        incoming,
                        error,
                    });
                }
            }

            let Some(actor) = self.state.combatant_mut(id) else {
                continue;
            };
            let banked = actor.banked_points();
            let allocation = actor
                .try_allocate(decision.allocation)
                .or_else(|_| actor.try_allocate(AllocationRequest::all_attack(banked)));
            if let Ok(allocation) = allocation {
                self.emit(BattleEvent::AllocationCommitted {
                    combatant: id,
                    allocation,
                });
            }
        }
        self.phase = Phase::Reveal(Side::Enemy);
    }

    fn perform_switch(
        &mut self,
        side: Side,
        actor: CombatantId,
        incoming: CombatantId,
        kind: SwitchKind,
    ) -> Result<(), SwitchError> {
        let target = self
            .state
            .combatant(incoming)
            .ok_or(SwitchError::UnknownCombatant {
                combatant: incoming,
            })?;
        if target.side() != side {
            return Err(SwitchError::WrongSide {
                combatant: incoming,
                side: target.side(),
            });
        }
        if !target.is_alive() {
            return Err(SwitchError::CombatantDown {
                combatant: incoming,
            });
        }

        let outgoing = match self.state.front(side) {
            Some(front) if front.id() == incoming => {
                return Err(SwitchError::AlreadyInFront {
                    combatant: incoming,
                });
            }
            Some(front) => front.id(),
            None => {
                return Err(SwitchError::CombatantDown {
                    combatant: incoming,
                });
            }
        };

        let cost = match kind {
            SwitchKind::Paid => self.config.switch_cost,
            SwitchKind::Free => 0,
        };
        let acting = self
            .state
            .combatant_mut(actor)
            .ok_or(SwitchError::UnknownCombatant { combatant: actor })?;
        if acting.has_switched_this_turn() {
            return Err(SwitchError::AlreadySwitched { actor });
        }
        let banked = acting.banked_points();
        acting
            .pay_switch(cost)
            .map_err(|_| SwitchError::InsufficientPoints {
                actor,
                cost,
                banked,
            })?;

        let (Some(from), Some(to)) = (
            self.state.position_of(side, incoming),
            self.state.position_of(side, outgoing),
        ) else {
            return Err(SwitchError::UnknownCombatant {
                combatant: incoming,
            });
        };
        self.state.roster_mut(side).swap(from, to);

        self.emit(BattleEvent::WeaponSwitched {
            incoming,
            outgoing,
            deducted_cost: cost,
            is_player_side: side.is_player(),
        });
        Ok(())
    }

    /// Every alive combatant of `side` attacks the opposing front, in roster
    /// order, then has its per-turn allocation reset.
    fn resolve(&mut self, side: Side) {
        let actors: Vec<CombatantId> = self.state.roster_ids(side);
        let keep_guard = self.config.guard_window == GuardWindow::UntilNextAllocation;

        for id in actors {
            let Some(attacker) = self.state.combatant(id).filter(|c| c.is_alive()) else {
                continue;
            };

            if attacker.allocation().attack > 0 {
                if let Some(defender) = self.state.front(side.opponent()) {
                    let damage = resolve_damage(attacker, defender);
                    let defender_id = defender.id();
                    let defender_side = defender.side();

                    if let Some(target) = self.state.combatant_mut(defender_id) {
                        let new_hp = target.apply_damage(damage);
                        self.emit(BattleEvent::CombatantDamaged {
                            attacker: id,
                            defender: defender_id,
                            damage,
                            new_hp,
                        });
                        if new_hp == 0 {
                            self.emit(BattleEvent::CombatantDeath {
                                combatant: defender_id,
                                side: defender_side,
                            });
                        }
                    }
                }
            }

            if let Some(actor) = self.state.combatant_mut(id) {
                if keep_guard {
                    actor.reset_keeping_guard();
                } else {
                    actor.reset_round_allocations();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ClassType, StaticWeaponCatalog, WeaponTemplate};
    use crate::session::CombatantDescriptor;

    fn catalog() -> StaticWeaponCatalog {
        StaticWeaponCatalog::new()
            .with("sword", WeaponTemplate::new("Longsword", ClassType::Sword, 20, 100))
            .with("hammer", WeaponTemplate::new("Maul", ClassType::Hammer, 20, 100))
    }

    fn duel() -> BattleEngine {
        let session = BattleSession::new(
            vec![CombatantDescriptor::new("sword", 1)],
            vec![CombatantDescriptor::new("hammer", 1)],
        );
        BattleEngine::new(&session, &catalog(), BattleConfig::default()).unwrap()
    }

    #[test]
    fn setup_event_is_emitted_on_construction() {
        let mut engine = duel();
        assert_eq!(engine.phase(), Phase::Setup);
        let events = engine.drain_events();
        assert!(matches!(events.as_slice(), [BattleEvent::BattleSetupComplete { .. }]));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn countdown_precedes_first_suspension() {
        let mut engine = duel();
        assert_eq!(engine.advance(), Progress::Delay(DelayKind::Countdown));
        assert_eq!(engine.phase(), Phase::Countdown);
        assert_eq!(engine.advance(), Progress::AwaitingAllocation(CombatantId(0)));
        assert_eq!(engine.turn(), 1);
    }

    #[test]
    fn advance_is_idempotent_while_awaiting() {
        let mut engine = duel();
        engine.advance();
        engine.advance();
        engine.drain_events();

        assert_eq!(engine.advance(), Progress::AwaitingAllocation(CombatantId(0)));
        assert_eq!(engine.advance(), Progress::AwaitingAllocation(CombatantId(0)));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn commands_outside_suspension_are_rejected() {
        let mut engine = duel();
        let err = engine
            .submit_allocation(CombatantId(0), AllocationRequest::all_attack(1))
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::State(EngineStateError::CommandOutsideExpectedPhase {
                phase: Phase::Setup
            })
        );
        assert!(engine.finalize_allocation().is_err());
        assert!(engine.request_switch(CombatantId(0), SwitchKind::Free).is_err());
    }

    #[test]
    fn phase_display_is_readable() {
        assert_eq!(Phase::Allocation(Side::Player).to_string(), "player allocation");
        assert_eq!(
            Phase::BattleEnd {
                winner: Side::Enemy
            }
            .to_string(),
            "battle end (enemy won)"
        );
    }

    #[test]
    fn abort_is_terminal_and_reported_once() {
        let mut engine = duel();
        engine.advance();
        engine.advance();
        engine.drain_events();

        assert!(engine.abort());
        assert!(!engine.abort());
        assert_eq!(engine.advance(), Progress::Aborted);
        assert_eq!(
            engine.drain_events(),
            vec![BattleEvent::BattleAborted { turn: 1 }]
        );
        assert!(
            engine
                .submit_allocation(CombatantId(0), AllocationRequest::hold())
                .is_err()
        );
    }
}
