use crate::battle::conditions::VolatileKind;
use crate::battle::end_turn::run_end_turn;
use crate::battle::script::run_move_script;
use crate::battle::state::{
    BattleEvent, BattleState, EventLog, TieBreakPolicy, TurnPhase,
};
use crate::battle::stats::effective_speed;
use crate::dex::Dex;
use crate::errors::{EngineError, EngineResult, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// A submitted choice for one side in one turn. Consumed by validation;
/// an invalid action never touches battle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    UseMove { move_index: usize },
    Switch { team_index: usize },
}

/// Everything one `process_turn` call produced: the ordered event log and
/// where the battle stands afterwards.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// The turn number that was being processed
    pub turn: u32,
    pub events: Vec<BattleEvent>,
    pub phase: TurnPhase,
}

/// An action bound to the battler that committed it. If that battler is no
/// longer active (or able) when its turn in the order comes up, the action
/// is skipped, not transferred.
#[derive(Debug, Clone)]
struct ScheduledAction {
    side: usize,
    actor: usize,
    action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    /// Switches occupy a reserved tier above every move
    tier: u8,
    priority: i8,
    speed: u16,
    tiebreak: u16,
}

/// Top-level orchestrator. Owns the `BattleState` for the battle's
/// lifetime and drives validation, ordering, the script interpreter and
/// end-of-turn processing.
///
/// The flow is submit/submit/process. When a battler faints mid-turn and
/// its side has a reserve, `process_turn` returns with the phase set to
/// `AwaitingReplacement` instead of blocking; the caller submits the
/// replacement switch and calls `process_turn` again to resume the
/// remainder of the turn.
pub struct BattleEngine<'d> {
    dex: &'d Dex,
    state: BattleState,
    submitted: [Option<Action>; 2],
    /// Ordered actions still to resolve while a turn is suspended
    parked: VecDeque<ScheduledAction>,
    turn_in_progress: bool,
}

impl<'d> BattleEngine<'d> {
    pub fn new(dex: &'d Dex, state: BattleState) -> Self {
        BattleEngine {
            dex,
            state,
            submitted: [None, None],
            parked: VecDeque::new(),
            turn_in_progress: false,
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Direct state access for fixtures and tooling.
    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    /// Sides the engine is currently waiting on.
    pub fn awaiting(&self) -> Vec<usize> {
        let waited: Vec<usize> = match &self.state.phase {
            TurnPhase::WaitingForActions => vec![0, 1],
            TurnPhase::AwaitingReplacement { sides } => sides.clone(),
            TurnPhase::Finished { .. } => vec![],
        };
        waited
            .into_iter()
            .filter(|&side| self.submitted[side].is_none())
            .collect()
    }

    pub fn ready(&self) -> bool {
        !self.state.is_finished() && self.awaiting().is_empty()
    }

    /// Validate and queue one side's action. Nothing is mutated on error;
    /// the caller corrects the action and resubmits.
    pub fn submit_action(&mut self, side: usize, action: Action) -> Result<(), ValidationError> {
        if side >= 2 {
            return Err(ValidationError::InvalidSide(side));
        }
        match &self.state.phase {
            TurnPhase::Finished { .. } => return Err(ValidationError::NotAcceptingActions),
            TurnPhase::AwaitingReplacement { sides } => {
                if !sides.contains(&side) {
                    return Err(ValidationError::NotAcceptingActions);
                }
                if !matches!(action, Action::Switch { .. }) {
                    return Err(ValidationError::ReplacementRequired);
                }
            }
            TurnPhase::WaitingForActions => {}
        }
        if self.submitted[side].is_some() {
            return Err(ValidationError::AlreadySubmitted);
        }
        self.validate_action(side, &action)?;
        self.submitted[side] = Some(action);
        Ok(())
    }

    fn validate_action(&self, side: usize, action: &Action) -> Result<(), ValidationError> {
        let side_state = self.state.side(side);
        match action {
            Action::UseMove { move_index } => {
                let battler = side_state.active();
                if battler.is_fainted() {
                    return Err(ValidationError::BattlerFainted);
                }
                let slot = battler
                    .move_slot(*move_index)
                    .ok_or(ValidationError::InvalidMoveSlot(*move_index))?;
                if slot.pp == 0 {
                    return Err(ValidationError::NoPpRemaining);
                }
            }
            Action::Switch { team_index } => {
                let target = side_state
                    .team
                    .get(*team_index)
                    .ok_or(ValidationError::InvalidTeamSlot(*team_index))?;
                if *team_index == side_state.active {
                    return Err(ValidationError::AlreadyActive);
                }
                if target.is_fainted() {
                    return Err(ValidationError::TargetFainted);
                }
                let voluntary = matches!(self.state.phase, TurnPhase::WaitingForActions);
                if voluntary && side_state.active().has_volatile(VolatileKind::Trapped) {
                    return Err(ValidationError::Trapped);
                }
            }
        }
        Ok(())
    }

    /// Submit both actions and process the turn in one call.
    pub fn resolve(&mut self, first: Action, second: Action) -> EngineResult<TurnReport> {
        self.submit_action(0, first)?;
        self.submit_action(1, second)?;
        self.process_turn()
    }

    /// Run the turn (or resume a suspended one) once every awaited side has
    /// submitted. Returns the events generated by this call.
    pub fn process_turn(&mut self) -> EngineResult<TurnReport> {
        if self.state.is_finished() {
            return Err(EngineError::BattleOver);
        }
        if !self.ready() {
            return Err(EngineError::NotReady);
        }

        match self.state.phase.clone() {
            TurnPhase::WaitingForActions => self.start_turn(),
            TurnPhase::AwaitingReplacement { sides } => self.resume_after_replacement(&sides),
            TurnPhase::Finished { .. } => Err(EngineError::BattleOver),
        }
    }

    fn start_turn(&mut self) -> EngineResult<TurnReport> {
        let turn = self.state.turn;
        let mut log = EventLog::new();
        debug!(turn, "processing turn");
        log.push(BattleEvent::TurnStarted { turn });
        self.turn_in_progress = true;

        let mut actions = Vec::new();
        for side in 0..2 {
            if let Some(action) = self.submitted[side].take() {
                actions.push(ScheduledAction {
                    side,
                    actor: self.state.side(side).active,
                    action,
                });
            }
        }
        self.parked = self.order_actions(actions).into();

        self.run_parked(&mut log);
        self.conclude(turn, log)
    }

    fn resume_after_replacement(&mut self, sides: &[usize]) -> EngineResult<TurnReport> {
        let turn = self.state.turn;
        let mut log = EventLog::new();
        for &side in sides {
            if let Some(Action::Switch { team_index }) = self.submitted[side].take() {
                self.execute_switch(side, team_index, &mut log);
            }
        }
        self.state.phase = TurnPhase::WaitingForActions;

        if self.turn_in_progress {
            // The faint happened mid-turn: resume the remaining actions and
            // the end-of-turn phase
            self.run_parked(&mut log);
            self.conclude(turn, log)
        } else {
            // The faint happened during end-of-turn; the turn itself already
            // finished and the next one can start
            Ok(TurnReport {
                turn,
                events: log.into_events(),
                phase: self.state.phase.clone(),
            })
        }
    }

    /// Sort by reserved switch tier, then move priority, then effective
    /// speed, then the configured tie-break.
    fn order_actions(&mut self, actions: Vec<ScheduledAction>) -> Vec<ScheduledAction> {
        let mut keyed: Vec<(OrderKey, ScheduledAction)> = actions
            .into_iter()
            .map(|scheduled| (self.order_key(&scheduled), scheduled))
            .collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        keyed.into_iter().map(|(_, scheduled)| scheduled).collect()
    }

    fn order_key(&mut self, scheduled: &ScheduledAction) -> OrderKey {
        let side = scheduled.side;
        let (tier, priority) = match &scheduled.action {
            Action::Switch { .. } => (1, 0),
            Action::UseMove { move_index } => {
                let priority = self
                    .state
                    .active(side)
                    .move_slot(*move_index)
                    .and_then(|slot| self.dex.move_data(slot.move_id).ok())
                    .map(|data| data.priority)
                    .unwrap_or(0);
                (0, priority)
            }
        };
        let speed = effective_speed(self.state.active(side));
        let tiebreak = match self.state.tie_break {
            TieBreakPolicy::SlotOrder => (1 - side) as u16,
            TieBreakPolicy::SeededRoll => self.state.rng.pick("speed tie", 256),
        };
        OrderKey {
            tier,
            priority,
            speed,
            tiebreak,
        }
    }

    /// Drain the action queue in order, stopping early when the battle ends
    /// or a mid-turn faint needs a replacement before the turn can go on.
    fn run_parked(&mut self, log: &mut EventLog) {
        while let Some(scheduled) = self.parked.pop_front() {
            self.execute_action(scheduled, log);

            if self.check_battle_over(log) {
                self.parked.clear();
                return;
            }
            let sides = self.replacements_needed();
            if !sides.is_empty() {
                self.state.phase = TurnPhase::AwaitingReplacement { sides };
                return;
            }
        }
    }

    fn execute_action(&mut self, scheduled: ScheduledAction, log: &mut EventLog) {
        let ScheduledAction {
            side,
            actor,
            action,
        } = scheduled;

        // Re-check the committing battler can still act: it may have fainted
        // or been replaced since the order was computed. Not an error.
        if self.state.side(side).active != actor || self.state.active(side).is_fainted() {
            log.push(BattleEvent::ActionSkipped { side });
            return;
        }

        match action {
            Action::Switch { team_index } => {
                if self.state.side(side).team[team_index].is_fainted() {
                    log.push(BattleEvent::ActionSkipped { side });
                    return;
                }
                self.execute_switch(side, team_index, log);
            }
            Action::UseMove { move_index } => {
                if let Err(err) = run_move_script(&mut self.state, self.dex, side, move_index, log)
                {
                    // Fatal for this action only; the turn continues
                    log.push(BattleEvent::ActionError {
                        side,
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    /// Swap the active slot. The outgoing battler sheds its volatile
    /// conditions and stat stages.
    fn execute_switch(&mut self, side: usize, team_index: usize, log: &mut EventLog) {
        let side_state = self.state.side_mut(side);
        let outgoing_battler = side_state.active_mut();
        outgoing_battler.clear_volatiles();
        outgoing_battler.clear_stages();
        let outgoing = outgoing_battler.name.clone();
        side_state.active = team_index;
        let incoming = side_state.active().name.clone();
        log.push(BattleEvent::Switched {
            side,
            outgoing,
            incoming,
        });
    }

    /// Sides whose active battler fainted but still have a healthy reserve.
    fn replacements_needed(&self) -> Vec<usize> {
        (0..2)
            .filter(|&side| {
                self.state.active(side).is_fainted() && self.state.side(side).has_replacement()
            })
            .collect()
    }

    fn check_battle_over(&mut self, log: &mut EventLog) -> bool {
        let side_a = self.state.side(0).any_healthy();
        let side_b = self.state.side(1).any_healthy();
        let winner = match (side_a, side_b) {
            (true, true) => return false,
            (true, false) => Some(0),
            (false, true) => Some(1),
            (false, false) => None,
        };
        log.push(BattleEvent::BattleEnded { winner });
        self.state.phase = TurnPhase::Finished { winner };
        true
    }

    /// Close out the call: either the turn suspended for a replacement, or
    /// it runs end-of-turn effects and advances the counter exactly once.
    fn conclude(&mut self, turn: u32, mut log: EventLog) -> EngineResult<TurnReport> {
        if matches!(self.state.phase, TurnPhase::AwaitingReplacement { .. }) {
            return Ok(TurnReport {
                turn,
                events: log.into_events(),
                phase: self.state.phase.clone(),
            });
        }

        if !self.state.is_finished() {
            run_end_turn(&mut self.state, self.dex, &mut log);

            if !self.check_battle_over(&mut log) {
                let sides = self.replacements_needed();
                if !sides.is_empty() {
                    self.state.phase = TurnPhase::AwaitingReplacement { sides };
                } else {
                    self.state.phase = TurnPhase::WaitingForActions;
                }
            }
        }

        self.state.turn += 1;
        self.turn_in_progress = false;
        log.push(BattleEvent::TurnEnded);

        Ok(TurnReport {
            turn,
            events: log.into_events(),
            phase: self.state.phase.clone(),
        })
    }
}
