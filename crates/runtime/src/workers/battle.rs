//! Battle worker that owns the authoritative [`battle_core::BattleEngine`].
//!
//! Drives the engine through its phases, waits out presentation delays,
//! answers commands from [`BattleHandle`](crate::BattleHandle), and publishes
//! every engine event to the EventBus in emission order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use battle_core::{
    Allocation, AllocationRequest, BattleEngine, BattleError, BattleSnapshot, CombatantId,
    CommandError, DelayKind, PolicyDecision, Progress, SwitchKind,
};

use crate::api::AllocationProvider;
use crate::events::{Event, EventBus};
use crate::runtime::BattleOutcome;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Leave setup and start the countdown.
    Start { reply: oneshot::Sender<bool> },
    SubmitAllocation {
        combatant: CombatantId,
        request: AllocationRequest,
        reply: oneshot::Sender<Result<Allocation, CommandError>>,
    },
    RequestSwitch {
        incoming: CombatantId,
        kind: SwitchKind,
        reply: oneshot::Sender<Result<(), CommandError>>,
    },
    FinalizeAllocation {
        reply: oneshot::Sender<Result<(), CommandError>>,
    },
    /// Query the current battle state (read-only).
    Snapshot { reply: oneshot::Sender<BattleSnapshot> },
    Abort { reply: oneshot::Sender<bool> },
}

/// Background task that runs one battle to completion.
pub struct BattleWorker {
    engine: BattleEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    player_provider: Option<Arc<dyn AllocationProvider>>,
    countdown: Duration,
    reveal_delay: Duration,
    sequence: u64,
    started: bool,
    /// Every handle is gone but the autopilot can still finish the battle.
    detached: bool,
}

impl BattleWorker {
    pub fn new(
        engine: BattleEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        player_provider: Option<Arc<dyn AllocationProvider>>,
        countdown: Duration,
        reveal_delay: Duration,
    ) -> Self {
        Self {
            engine,
            command_rx,
            event_bus,
            player_provider,
            countdown,
            reveal_delay,
            sequence: 0,
            started: false,
            detached: false,
        }
    }

    /// Main worker loop.
    ///
    /// Stays in setup until a `Start` command arrives, then runs the engine
    /// until the battle ends or is aborted.
    pub async fn run(mut self) -> BattleOutcome {
        for issue in self.engine.roster_issues() {
            warn!(target: "runtime::worker", %issue, "roster slot substituted");
        }

        while !self.started && !self.engine.phase().is_terminal() {
            self.next_command().await;
        }

        loop {
            let progress = self.engine.advance();
            self.publish_pending();

            match progress {
                Progress::Delay(kind) => self.pause(kind).await,
                Progress::AwaitingAllocation(combatant) => match self.player_provider.clone() {
                    Some(provider) => self.consult(provider, combatant).await,
                    None => self.next_command().await,
                },
                Progress::Finished(winner) => {
                    info!(
                        target: "runtime::worker",
                        %winner,
                        turn = self.engine.turn(),
                        "battle finished"
                    );
                    return BattleOutcome::Victory(winner);
                }
                Progress::Aborted => {
                    info!(target: "runtime::worker", turn = self.engine.turn(), "battle aborted");
                    return BattleOutcome::Aborted;
                }
            }
        }
    }

    /// Waits out a presentation delay while still answering commands.
    async fn pause(&mut self, kind: DelayKind) {
        let duration = match kind {
            DelayKind::Countdown => self.countdown,
            DelayKind::Reveal => self.reveal_delay,
        };
        trace!(target: "runtime::worker", ?kind, ?duration, "pausing");

        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return,
                command = self.command_rx.recv(), if !self.detached => {
                    self.dispatch(command);
                    if self.engine.phase().is_terminal() {
                        return;
                    }
                }
            }
        }
    }

    /// Asks the autopilot for `combatant`'s decision, answering commands
    /// that arrive in the meantime.
    async fn consult(&mut self, provider: Arc<dyn AllocationProvider>, combatant: CombatantId) {
        let snapshot = self.engine.snapshot();
        let decision = provider.provide_allocation(combatant, &snapshot);
        tokio::pin!(decision);

        loop {
            tokio::select! {
                result = &mut decision => {
                    match result {
                        Ok(decision) => self.apply_decision(combatant, decision),
                        Err(error) => {
                            warn!(
                                target: "runtime::worker",
                                %combatant,
                                %error,
                                "allocation provider failed; finalizing phase"
                            );
                            if let Err(error) = self.engine.finalize_allocation() {
                                debug!(target: "runtime::worker", %error, "finalize rejected");
                            }
                        }
                    }
                    self.publish_pending();
                    return;
                }
                command = self.command_rx.recv(), if !self.detached => {
                    self.dispatch(command);
                    if self.engine.awaiting() != Some(combatant) {
                        return;
                    }
                }
            }
        }
    }

    fn apply_decision(&mut self, combatant: CombatantId, decision: PolicyDecision) {
        if let Some(incoming) = decision.switch_to {
            if let Err(error) = self.engine.request_switch(incoming, SwitchKind::Paid) {
                warn!(
                    target: "runtime::worker",
                    %combatant,
                    %incoming,
                    %error,
                    "autopilot switch rejected"
                );
            }
            if self.engine.awaiting() != Some(combatant) {
                return;
            }
        }

        if let Err(error) = self.engine.submit_allocation(combatant, decision.allocation) {
            warn!(
                target: "runtime::worker",
                %combatant,
                %error,
                severity = error.severity().as_str(),
                "autopilot allocation rejected; holding"
            );
            if let Err(error) = self
                .engine
                .submit_allocation(combatant, AllocationRequest::hold())
            {
                debug!(target: "runtime::worker", %error, "hold rejected");
            }
        }
    }

    async fn next_command(&mut self) {
        let command = self.command_rx.recv().await;
        self.dispatch(command);
    }

    /// Handles one received command, or the loss of every handle.
    ///
    /// Losing every handle aborts the battle unless it is running and the
    /// autopilot can carry it to the end.
    fn dispatch(&mut self, command: Option<Command>) {
        match command {
            Some(command) => self.handle_command(command),
            None if self.started && self.player_provider.is_some() => {
                if !self.detached {
                    debug!(
                        target: "runtime::worker",
                        "all handles dropped; continuing on autopilot"
                    );
                    self.detached = true;
                }
            }
            None => {
                if self.engine.abort() {
                    info!(target: "runtime::worker", "all handles dropped; aborting battle");
                }
                self.publish_pending();
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { reply } => {
                let first = !self.started;
                self.started = true;
                if first {
                    info!(target: "runtime::worker", "battle starting");
                    self.publish_pending();
                }
                if reply.send(first).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::SubmitAllocation {
                combatant,
                request,
                reply,
            } => {
                let result = self.engine.submit_allocation(combatant, request);
                self.log_rejection("submit_allocation", &result);
                self.publish_pending();
                if reply.send(result).is_err() {
                    debug!("SubmitAllocation reply channel closed (caller dropped)");
                }
            }
            Command::RequestSwitch {
                incoming,
                kind,
                reply,
            } => {
                let result = self.engine.request_switch(incoming, kind);
                self.log_rejection("request_switch", &result);
                self.publish_pending();
                if reply.send(result).is_err() {
                    debug!("RequestSwitch reply channel closed (caller dropped)");
                }
            }
            Command::FinalizeAllocation { reply } => {
                let result = self.engine.finalize_allocation();
                self.log_rejection("finalize_allocation", &result);
                if reply.send(result).is_err() {
                    debug!("FinalizeAllocation reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.engine.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Abort { reply } => {
                let aborted = self.engine.abort();
                // Refuse anything queued behind the abort.
                self.command_rx.close();
                self.publish_pending();
                if reply.send(aborted).is_err() {
                    debug!("Abort reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn log_rejection<T>(&self, command: &'static str, result: &Result<T, CommandError>) {
        if let Err(error) = result {
            debug!(
                target: "runtime::worker",
                command,
                %error,
                severity = error.severity().as_str(),
                phase = %self.engine.phase(),
                "command rejected"
            );
        }
    }

    /// Events stay queued in the engine until the battle is started or torn down.
    fn publish_pending(&mut self) {
        if !self.started && !self.engine.phase().is_terminal() {
            return;
        }
        for event in self.engine.drain_events() {
            trace!(
                target: "runtime::worker",
                sequence = self.sequence,
                event = event.name(),
                "publishing event"
            );
            self.event_bus.publish(Event {
                sequence: self.sequence,
                event,
            });
            self.sequence += 1;
        }
    }
}
