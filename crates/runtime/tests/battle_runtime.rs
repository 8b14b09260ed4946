use std::time::Duration;

use async_trait::async_trait;
use battle_content::ContentFactory;
use battle_core::{
    AllInAttack, Allocation, AllocationRequest, BattleEvent, BattleSession, BattleSnapshot,
    ClassType, CombatantDescriptor, CombatantId, CommandError, EngineStateError, Phase,
    PolicyDecision, SetupError, Side, StaticWeaponCatalog, SwitchKind, WeaponTemplate,
};
use battle_runtime::{
    AllocationProvider, BattleOutcome, BattleRuntime, Event, PolicyProvider, RuntimeConfig,
    RuntimeError, Topic,
};
use tokio::sync::broadcast;

fn catalog() -> StaticWeaponCatalog {
    StaticWeaponCatalog::new()
        .with("sword", WeaponTemplate::new("Longsword", ClassType::Sword, 20, 100))
        .with("hammer", WeaponTemplate::new("Maul", ClassType::Hammer, 20, 100))
}

fn session(player: &[&str], enemy: &[&str]) -> BattleSession {
    let roster = |ids: &[&str]| {
        ids.iter()
            .map(|id| CombatantDescriptor::new(*id, 1))
            .collect::<Vec<_>>()
    };
    BattleSession::new(roster(player), roster(enemy))
}

async fn manual_runtime(player: &[&str], enemy: &[&str]) -> BattleRuntime {
    BattleRuntime::builder()
        .session(session(player, enemy))
        .catalog(catalog())
        .config(RuntimeConfig::instant())
        .build()
        .await
        .expect("valid setup")
}

async fn next_event(rx: &mut broadcast::Receiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within timeout")
        .expect("event bus open")
}

/// Collects events up to and including the terminal one.
async fn collect_until_terminal(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        let event = next_event(rx).await;
        let terminal = event.event.is_terminal();
        events.push(event);
        if terminal {
            return events;
        }
    }
}

async fn wait_for_player_phase(rx: &mut broadcast::Receiver<Event>) -> (CombatantId, u32) {
    loop {
        if let BattleEvent::PlayerAllocationPhaseStarted {
            combatant,
            available_points,
        } = next_event(rx).await.event
        {
            return (combatant, available_points);
        }
    }
}

struct FailingProvider;

#[async_trait]
impl AllocationProvider for FailingProvider {
    async fn provide_allocation(
        &self,
        combatant: CombatantId,
        _snapshot: &BattleSnapshot,
    ) -> battle_runtime::Result<PolicyDecision> {
        Err(RuntimeError::Provider {
            combatant,
            reason: "offline".into(),
        })
    }
}

#[tokio::test]
async fn autopilot_runs_the_battle_to_a_single_victory() {
    let runtime = BattleRuntime::builder()
        .session(session(&["sword"], &["hammer"]))
        .catalog(catalog())
        .config(RuntimeConfig::instant())
        .player_provider(PolicyProvider::new(AllInAttack))
        .build()
        .await
        .expect("valid setup");

    let mut all = runtime.subscribe_events();
    let outcome = runtime.run().await.expect("worker joins");
    assert_eq!(outcome, BattleOutcome::Victory(Side::Player));

    let events = collect_until_terminal(&mut all).await;

    // Sequence numbers are contiguous from zero.
    for (index, event) in events.iter().enumerate() {
        assert_eq!(event.sequence, index as u64);
    }
    assert!(matches!(
        events[0].event,
        BattleEvent::BattleSetupComplete { .. }
    ));
    assert_eq!(events[1].event, BattleEvent::CountdownStarted);
    assert_eq!(events[2].event, BattleEvent::BattleStarted);

    let ended = events
        .iter()
        .filter(|e| matches!(e.event, BattleEvent::BattleEnded { .. }))
        .count();
    assert_eq!(ended, 1);
    assert_eq!(
        events.last().map(|e| &e.event),
        Some(&BattleEvent::BattleEnded { winner: Side::Player })
    );

    let last_hit_on_player = events
        .iter()
        .rev()
        .find_map(|e| match e.event {
            BattleEvent::CombatantDamaged {
                defender: CombatantId(0),
                new_hp,
                ..
            } => Some(new_hp),
            _ => None,
        });
    assert_eq!(last_hit_on_player, Some(49));
}

#[tokio::test]
async fn topic_streams_split_the_event_flow() {
    let runtime = BattleRuntime::builder()
        .session(session(&["sword"], &["hammer"]))
        .catalog(catalog())
        .config(RuntimeConfig::instant())
        .player_provider(PolicyProvider::new(AllInAttack))
        .build()
        .await
        .expect("valid setup");

    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let mut combat = handle.subscribe(Topic::Combat);
    drop(handle);
    runtime.run().await.expect("worker joins");

    let lifecycle = collect_until_terminal(&mut lifecycle).await;
    let names: Vec<_> = lifecycle.iter().map(|e| e.event.name()).collect();
    assert_eq!(
        names,
        vec![
            "battle_setup_complete",
            "countdown_started",
            "battle_started",
            "battle_ended"
        ]
    );

    let first_hit = next_event(&mut combat).await;
    assert_eq!(first_hit.topic(), Topic::Combat);
    assert_eq!(
        first_hit.event,
        BattleEvent::CombatantDamaged {
            attacker: CombatantId(0),
            defender: CombatantId(1),
            damage: 23,
            new_hp: 77,
        }
    );
}

#[tokio::test]
async fn manual_allocations_drive_the_player_side() {
    let runtime = manual_runtime(&["sword"], &["hammer"]).await;
    let handle = runtime.handle();
    let mut all = handle.subscribe_all();

    assert!(runtime.start().await.expect("worker alive"));
    assert!(!runtime.start().await.expect("worker alive"));

    let (combatant, points) = wait_for_player_phase(&mut all).await;
    assert_eq!((combatant, points), (CombatantId(0), 1));
    assert_eq!(handle.awaiting().await.expect("worker alive"), Some(combatant));

    let allocation = handle
        .submit_allocation(combatant, AllocationRequest::new(1, 0, 0))
        .await
        .expect("allocation within bank");
    assert_eq!(
        allocation,
        Allocation {
            attack: 1,
            defend: 0,
            reserve: 0
        }
    );

    let winner = loop {
        match next_event(&mut all).await.event {
            BattleEvent::PlayerAllocationPhaseStarted {
                combatant,
                available_points,
            } => {
                handle
                    .submit_allocation(combatant, AllocationRequest::all_attack(available_points))
                    .await
                    .expect("all-in allocation is always valid");
            }
            BattleEvent::BattleEnded { winner } => break winner,
            _ => {}
        }
    };
    assert_eq!(winner, Side::Player);

    drop(handle);
    assert_eq!(
        runtime.wait().await.expect("worker joins"),
        BattleOutcome::Victory(Side::Player)
    );
}

#[tokio::test]
async fn rejected_commands_leave_the_battle_running() {
    let runtime = manual_runtime(&["sword"], &["hammer"]).await;
    let handle = runtime.handle();

    let error = handle
        .submit_allocation(CombatantId(0), AllocationRequest::new(1, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Command(CommandError::State(
            EngineStateError::CommandOutsideExpectedPhase {
                phase: Phase::Setup
            }
        ))
    ));
    assert!(error.severity().is_some_and(|s| s.is_recoverable()));

    let mut turn = handle.subscribe(Topic::Turn);
    runtime.start().await.expect("worker alive");
    let (combatant, _) = wait_for_player_phase(&mut turn).await;

    let error = handle
        .submit_allocation(combatant, AllocationRequest::new(5, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(error, RuntimeError::Command(CommandError::Allocation(_))));

    let error = handle
        .submit_allocation(CombatantId(1), AllocationRequest::new(1, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(error, RuntimeError::Command(CommandError::Allocation(_))));

    assert_eq!(handle.awaiting().await.expect("worker alive"), Some(combatant));
    handle.finalize_allocation().await.expect("finalize while awaiting");

    assert!(handle.abort().await.expect("worker alive"));
    drop(handle);
    runtime.wait().await.expect("worker joins");
}

#[tokio::test]
async fn switching_through_the_handle_changes_the_front() {
    let runtime = manual_runtime(&["sword", "hammer"], &["hammer"]).await;
    let handle = runtime.handle();
    let mut turn = handle.subscribe(Topic::Turn);
    let mut combat = handle.subscribe(Topic::Combat);
    runtime.start().await.expect("worker alive");
    wait_for_player_phase(&mut turn).await;

    handle
        .request_switch(CombatantId(1), SwitchKind::Free)
        .await
        .expect("free switch to a benched ally");

    assert_eq!(
        next_event(&mut combat).await.event,
        BattleEvent::WeaponSwitched {
            incoming: CombatantId(1),
            outgoing: CombatantId(0),
            deducted_cost: 0,
            is_player_side: true,
        }
    );

    let snapshot = handle.snapshot().await.expect("worker alive");
    assert_eq!(
        snapshot.state.front(Side::Player).map(|c| c.id()),
        Some(CombatantId(1))
    );

    let error = handle
        .request_switch(CombatantId(2), SwitchKind::Free)
        .await
        .unwrap_err();
    assert!(matches!(error, RuntimeError::Command(CommandError::Switch(_))));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn abort_stops_the_worker_and_closes_the_handle() {
    let runtime = manual_runtime(&["sword"], &["hammer"]).await;
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let mut turn = handle.subscribe(Topic::Turn);

    runtime.start().await.expect("worker alive");
    wait_for_player_phase(&mut turn).await;

    assert!(handle.abort().await.expect("worker alive"));

    let events = collect_until_terminal(&mut lifecycle).await;
    assert_eq!(
        events.last().map(|e| &e.event),
        Some(&BattleEvent::BattleAborted { turn: 1 })
    );

    assert!(matches!(
        handle.snapshot().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
    assert!(matches!(
        handle.abort().await,
        Err(RuntimeError::CommandChannelClosed)
    ));

    assert_eq!(
        runtime.wait().await.expect("worker joins"),
        BattleOutcome::Aborted
    );
}

#[tokio::test]
async fn dropping_every_handle_aborts_a_manual_battle() {
    let runtime = manual_runtime(&["sword"], &["hammer"]).await;
    let mut lifecycle = runtime.subscribe_events();
    runtime.start().await.expect("worker alive");

    let outcome = runtime.wait().await.expect("worker joins");
    assert_eq!(outcome, BattleOutcome::Aborted);

    let events = collect_until_terminal(&mut lifecycle).await;
    assert!(matches!(
        events.last().map(|e| &e.event),
        Some(BattleEvent::BattleAborted { .. })
    ));
}

#[tokio::test]
async fn dropping_the_runtime_before_start_aborts_silently() {
    let runtime = manual_runtime(&["sword"], &["hammer"]).await;
    let mut all = runtime.subscribe_events();

    assert_eq!(
        runtime.wait().await.expect("worker joins"),
        BattleOutcome::Aborted
    );

    // Setup events are flushed together with the abort.
    let names: Vec<_> = collect_until_terminal(&mut all)
        .await
        .iter()
        .map(|e| e.event.name())
        .collect();
    assert_eq!(names, vec!["battle_setup_complete", "battle_aborted"]);
}

#[tokio::test]
async fn failing_provider_forfeits_the_player_turns() {
    let runtime = BattleRuntime::builder()
        .session(session(&["sword"], &["hammer"]))
        .catalog(catalog())
        .config(RuntimeConfig::instant())
        .player_provider(FailingProvider)
        .build()
        .await
        .expect("valid setup");

    let mut all = runtime.subscribe_events();
    assert_eq!(
        runtime.winner().await.expect("battle finishes"),
        Side::Enemy
    );

    let events = collect_until_terminal(&mut all).await;
    assert!(!events.iter().any(|e| matches!(
        e.event,
        BattleEvent::AllocationCommitted {
            combatant: CombatantId(0),
            ..
        }
    )));
}

#[tokio::test]
async fn build_refuses_unplayable_setups() {
    let error = BattleRuntime::builder()
        .session(session(&[], &["hammer"]))
        .catalog(catalog())
        .build()
        .await
        .err()
        .expect("empty roster is refused");
    assert!(matches!(
        error,
        RuntimeError::Setup(SetupError::EmptyRoster { side: Side::Player })
    ));

    let error = BattleRuntime::builder()
        .catalog(catalog())
        .build()
        .await
        .err()
        .expect("session is required");
    assert!(matches!(error, RuntimeError::MissingSession));

    let error = BattleRuntime::builder()
        .session(session(&["sword"], &["hammer"]))
        .build()
        .await
        .err()
        .expect("catalog is required");
    assert!(matches!(error, RuntimeError::MissingCatalog));
}

#[tokio::test]
async fn events_survive_a_json_round_trip() {
    let runtime = BattleRuntime::builder()
        .session(session(&["sword"], &["hammer"]))
        .catalog(catalog())
        .config(RuntimeConfig::instant())
        .player_provider(PolicyProvider::new(AllInAttack))
        .build()
        .await
        .expect("valid setup");

    let mut all = runtime.subscribe_events();
    runtime.run().await.expect("worker joins");

    for event in collect_until_terminal(&mut all).await {
        let json = serde_json::to_string(&event).expect("serialize");
        let back: Event = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    let ended = Event {
        sequence: 0,
        event: BattleEvent::BattleEnded {
            winner: Side::Enemy,
        },
    };
    let json = serde_json::to_value(&ended).expect("serialize");
    assert_eq!(json["event"]["type"], "battle_ended");
    assert_eq!(json["event"]["winner"], "enemy");
}

#[tokio::test]
async fn bundled_content_plays_to_completion() {
    let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../client/data"));
    let config = RuntimeConfig {
        battle: factory.load_config().expect("bundled battle.toml"),
        ..RuntimeConfig::instant()
    };

    let runtime = BattleRuntime::builder()
        .session(factory.load_session().expect("bundled session.ron"))
        .catalog(factory.load_catalog().expect("bundled weapons.ron"))
        .config(config)
        .player_provider(PolicyProvider::new(AllInAttack))
        .build()
        .await
        .expect("bundled content is playable");

    let mut lifecycle = runtime.handle().subscribe(Topic::Lifecycle);
    let outcome = runtime.run().await.expect("worker joins");
    let BattleOutcome::Victory(winner) = outcome else {
        panic!("autopilot battle should not abort, got {outcome:?}");
    };

    let events = collect_until_terminal(&mut lifecycle).await;
    match &events[0].event {
        BattleEvent::BattleSetupComplete {
            player,
            enemy,
            roster_issues,
        } => {
            assert_eq!(player.len(), 3);
            assert_eq!(enemy.len(), 3);
            assert!(roster_issues.is_empty());
        }
        other => panic!("expected setup first, got {other:?}"),
    }
    assert_eq!(
        events.last().map(|e| &e.event),
        Some(&BattleEvent::BattleEnded { winner })
    );
}
