use crate::battle::conditions::{VolatileCondition, VolatileKind};
use crate::battler::{Battler, Stat, StatusCondition};
use crate::moves::MoveId;
use crate::types::{SideCondition, Weather};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Where the battle currently stands between `process_turn` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Every side must submit one action
    WaitingForActions,
    /// The listed sides must each submit a replacement switch before the
    /// battle can continue
    AwaitingReplacement { sides: Vec<usize> },
    /// Terminal state; `None` is a draw
    Finished { winner: Option<usize> },
}

/// How equal-priority, equal-speed actions are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreakPolicy {
    /// Side 0 acts first. The default; fully input-determined.
    SlotOrder,
    /// Draw from the battle RNG; deterministic under the battle seed.
    SeededRoll,
}

/// Why a move did not come out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    Asleep,
    Frozen,
    FullyParalyzed,
    Flinched,
    HurtItselfInConfusion,
    Protected,
}

/// The single seedable randomness source for a battle.
///
/// Every probabilistic decision (accuracy, crits, secondary chances, damage
/// variance, tie-breaks) draws from this handle with a label, so a turn is
/// bit-reproducible from the seed and the submitted actions. The scripted
/// variant feeds predetermined rolls to tests and panics with the label when
/// it runs dry.
#[derive(Debug, Clone)]
pub struct BattleRng {
    source: RngSource,
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted { rolls: VecDeque<u8> },
}

impl BattleRng {
    pub fn seeded(seed: u64) -> Self {
        BattleRng {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn scripted(rolls: Vec<u8>) -> Self {
        BattleRng {
            source: RngSource::Scripted {
                rolls: rolls.into(),
            },
        }
    }

    /// Uniform roll in 1..=100.
    pub fn percent(&mut self, label: &str) -> u8 {
        match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(1..=100),
            RngSource::Scripted { rolls } => rolls
                .pop_front()
                .unwrap_or_else(|| panic!("scripted rng exhausted at: {}", label)),
        }
    }

    /// True with the given percent probability.
    pub fn chance(&mut self, label: &str, percent: u8) -> bool {
        self.percent(label) <= percent
    }

    /// Uniform index in 0..n. Scripted sources consume one roll modulo n.
    pub fn pick(&mut self, label: &str, n: u16) -> u16 {
        debug_assert!(n > 0);
        match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(0..n),
            RngSource::Scripted { rolls } => {
                let roll = rolls
                    .pop_front()
                    .unwrap_or_else(|| panic!("scripted rng exhausted at: {}", label));
                roll as u16 % n
            }
        }
    }
}

impl Default for BattleRng {
    fn default() -> Self {
        BattleRng::seeded(0)
    }
}

/// Active weather with its remaining duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: Weather,
    pub turns_remaining: u8,
}

/// A queued effect that resolves a fixed number of end-of-turn phases after
/// being set. Targets the slot, not the battler that occupied it: it strikes
/// whoever is active on the target side when the counter hits zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEffect {
    pub kind: DelayedKind,
    pub target_side: usize,
    pub turns_remaining: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayedKind {
    /// A stored attack; the damage was computed when it was queued
    FutureAttack { move_id: MoveId, damage: u16 },
    /// A stored heal for whoever occupies the slot
    WishHeal { amount: u16 },
}

/// Field-wide state: weather and the delayed-effect queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldState {
    pub weather: Option<WeatherState>,
    pub delayed: Vec<DelayedEffect>,
}

impl FieldState {
    pub fn weather_kind(&self) -> Option<Weather> {
        self.weather.map(|w| w.kind)
    }
}

/// One side of the battle: a team, its active slot, and side conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideState {
    pub name: String,
    pub team: Vec<Battler>,
    pub active: usize,
    conditions: HashMap<SideCondition, u8>,
}

impl SideState {
    pub fn new(name: &str, team: Vec<Battler>) -> Self {
        assert!(!team.is_empty(), "a side needs at least one battler");
        SideState {
            name: name.to_string(),
            team,
            active: 0,
            conditions: HashMap::new(),
        }
    }

    pub fn active(&self) -> &Battler {
        &self.team[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Battler {
        &mut self.team[self.active]
    }

    pub fn has_condition(&self, condition: SideCondition) -> bool {
        self.conditions.contains_key(&condition)
    }

    pub fn set_condition(&mut self, condition: SideCondition, turns: u8) {
        self.conditions.insert(condition, turns);
    }

    pub fn remove_condition(&mut self, condition: SideCondition) {
        self.conditions.remove(&condition);
    }

    /// Decrement side-condition timers; returns the ones that just expired.
    pub fn tick_conditions(&mut self) -> Vec<SideCondition> {
        let mut expired = Vec::new();
        self.conditions.retain(|&condition, turns| {
            *turns = turns.saturating_sub(1);
            if *turns == 0 {
                expired.push(condition);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Any battler on this side still able to fight?
    pub fn any_healthy(&self) -> bool {
        self.team.iter().any(|b| !b.is_fainted())
    }

    /// A healthy battler other than the active slot exists.
    pub fn has_replacement(&self) -> bool {
        self.team
            .iter()
            .enumerate()
            .any(|(i, b)| i != self.active && !b.is_fainted())
    }
}

/// The single mutable root of a battle. Exclusively owned by one
/// `BattleEngine` for the battle's lifetime; components operate on it
/// through slot indices and the accessor methods below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub sides: [SideState; 2],
    pub field: FieldState,
    pub turn: u32,
    pub phase: TurnPhase,
    pub tie_break: TieBreakPolicy,
    #[serde(skip)]
    pub rng: BattleRng,
}

impl BattleState {
    pub fn new(side_a: SideState, side_b: SideState, seed: u64) -> Self {
        BattleState {
            sides: [side_a, side_b],
            field: FieldState::default(),
            turn: 1,
            phase: TurnPhase::WaitingForActions,
            tie_break: TieBreakPolicy::SlotOrder,
            rng: BattleRng::seeded(seed),
        }
    }

    pub fn opponent_of(&self, side: usize) -> usize {
        1 - side
    }

    pub fn side(&self, side: usize) -> &SideState {
        &self.sides[side]
    }

    pub fn side_mut(&mut self, side: usize) -> &mut SideState {
        &mut self.sides[side]
    }

    pub fn active(&self, side: usize) -> &Battler {
        self.sides[side].active()
    }

    pub fn active_mut(&mut self, side: usize) -> &mut Battler {
        self.sides[side].active_mut()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, TurnPhase::Finished { .. })
    }

    /// Process a faint on `side` if its active battler just hit 0 HP: shed
    /// everything a fainted battler cannot hold and record the event.
    /// Call sites invoke this exactly once per damaging step.
    pub fn check_faint(&mut self, side: usize, log: &mut EventLog) -> bool {
        let battler = self.active_mut(side);
        if battler.current_hp() != 0 {
            return false;
        }
        battler.faint();
        let name = battler.name.clone();
        log.push(BattleEvent::Fainted {
            side,
            battler: name,
        });
        true
    }
}

/// One discrete state change, in resolution order. The per-turn sequence of
/// these is the engine's authoritative output: sufficient for a presentation
/// layer to render the turn without re-deriving state, and for byte-exact
/// replay comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted { turn: u32 },
    TurnEnded,

    MoveUsed { side: usize, battler: String, move_used: String },
    MoveMissed { side: usize },
    MoveFailed { side: usize, reason: FailReason },
    NoEffect { side: usize },
    CriticalHit { side: usize },
    Effectiveness { multiplier_x10: u8 },

    DamageDealt { side: usize, amount: u16, remaining_hp: u16 },
    Recoil { side: usize, amount: u16, remaining_hp: u16 },
    SubstituteDamaged { side: usize, remaining: u16 },
    SubstituteBroke { side: usize },
    EnduredHit { side: usize },
    Healed { side: usize, amount: u16, new_hp: u16 },

    StatusApplied { side: usize, status: StatusCondition },
    StatusRemoved { side: usize, status: StatusCondition },
    StatusDamage { side: usize, status: StatusCondition, damage: u16, remaining_hp: u16 },

    StatStageChanged { side: usize, stat: Stat, old_stage: i8, new_stage: i8 },
    StatChangeBlocked { side: usize, stat: Stat },
    StatStagesReset,

    VolatileApplied { side: usize, condition: VolatileCondition },
    VolatileExpired { side: usize, condition: VolatileCondition },
    ConditionDamage { side: usize, condition: VolatileKind, damage: u16, remaining_hp: u16 },

    WeatherStarted { weather: Weather },
    WeatherDamage { weather: Weather, side: usize, damage: u16, remaining_hp: u16 },
    WeatherEnded { weather: Weather },

    SideConditionRaised { side: usize, condition: SideCondition },
    SideConditionEnded { side: usize, condition: SideCondition },

    DelayedEffectQueued { side: usize, turns: u8 },
    FutureAttackStruck { side: usize, damage: u16, remaining_hp: u16 },
    WishHealed { side: usize, amount: u16, new_hp: u16 },

    Switched { side: usize, outgoing: String, incoming: String },
    Fainted { side: usize, battler: String },
    ActionSkipped { side: usize },
    ActionError { side: usize, message: String },

    BattleEnded { winner: Option<usize> },
}

impl BattleEvent {
    /// Render a human-readable line for this event, or `None` for events
    /// that carry no user-facing text of their own.
    pub fn format(&self, state: &BattleState) -> Option<String> {
        let side_name = |side: &usize| state.sides[*side].name.clone();
        match self {
            BattleEvent::TurnStarted { turn } => Some(format!("=== Turn {} ===", turn)),
            BattleEvent::TurnEnded => None,

            BattleEvent::MoveUsed { battler, move_used, .. } => {
                Some(format!("{} used {}!", battler, move_used))
            }
            BattleEvent::MoveMissed { side } => {
                Some(format!("{}'s attack missed!", side_name(side)))
            }
            BattleEvent::MoveFailed { side, reason } => Some(match reason {
                FailReason::Asleep => format!("{}'s battler is fast asleep.", side_name(side)),
                FailReason::Frozen => format!("{}'s battler is frozen solid!", side_name(side)),
                FailReason::FullyParalyzed => {
                    format!("{}'s battler is fully paralyzed!", side_name(side))
                }
                FailReason::Flinched => {
                    format!("{}'s battler flinched and couldn't move!", side_name(side))
                }
                FailReason::HurtItselfInConfusion => {
                    format!("{}'s battler hurt itself in its confusion!", side_name(side))
                }
                FailReason::Protected => "The target protected itself!".to_string(),
            }),
            BattleEvent::NoEffect { .. } => Some("It had no effect!".to_string()),
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::Effectiveness { multiplier_x10 } => match *multiplier_x10 {
                m if m > 10 => Some("It's super effective!".to_string()),
                m if m < 10 && m > 0 => Some("It's not very effective...".to_string()),
                0 => Some("It had no effect!".to_string()),
                _ => None,
            },

            BattleEvent::DamageDealt { side, amount, .. } => {
                Some(format!("{}'s battler took {} damage!", side_name(side), amount))
            }
            BattleEvent::Recoil { side, amount, .. } => {
                Some(format!("{}'s battler is hit with recoil! ({} damage)", side_name(side), amount))
            }
            BattleEvent::SubstituteDamaged { side, .. } => {
                Some(format!("{}'s substitute took the hit!", side_name(side)))
            }
            BattleEvent::SubstituteBroke { side } => {
                Some(format!("{}'s substitute faded!", side_name(side)))
            }
            BattleEvent::EnduredHit { side } => {
                Some(format!("{}'s battler endured the hit!", side_name(side)))
            }
            BattleEvent::Healed { side, amount, .. } => {
                Some(format!("{}'s battler recovered {} HP!", side_name(side), amount))
            }

            BattleEvent::StatusApplied { side, status } => {
                Some(format!("{}'s battler {}", side_name(side), format_status_applied(status)))
            }
            BattleEvent::StatusRemoved { side, status } => {
                Some(format!("{}'s battler {}", side_name(side), format_status_removed(status)))
            }
            BattleEvent::StatusDamage { side, status, damage, .. } => Some(format!(
                "{}'s battler is hurt by its {}! ({} damage)",
                side_name(side),
                format_status_name(status),
                damage
            )),

            BattleEvent::StatStageChanged { side, stat, old_stage, new_stage } => {
                let direction = if new_stage > old_stage { "rose" } else { "fell" };
                Some(format!(
                    "{}'s battler's {:?} {}!",
                    side_name(side),
                    stat,
                    direction
                ))
            }
            BattleEvent::StatChangeBlocked { side, stat } => Some(format!(
                "{}'s battler's {:?} won't go any further!",
                side_name(side),
                stat
            )),
            BattleEvent::StatStagesReset => {
                Some("All stat changes were eliminated!".to_string())
            }

            BattleEvent::VolatileApplied { side, condition } => Some(format!(
                "{}'s battler was afflicted by {}!",
                side_name(side),
                format_condition_name(condition.kind())
            )),
            BattleEvent::VolatileExpired { side, condition } => Some(format!(
                "{}'s battler's {} wore off.",
                side_name(side),
                format_condition_name(condition.kind())
            )),
            BattleEvent::ConditionDamage { side, condition, damage, .. } => Some(format!(
                "{}'s battler is hurt by {}! ({} damage)",
                side_name(side),
                format_condition_name(*condition),
                damage
            )),

            BattleEvent::WeatherStarted { weather } => Some(match weather {
                Weather::Rain => "It started to rain!".to_string(),
                Weather::Sun => "The sunlight turned harsh!".to_string(),
                Weather::Sandstorm => "A sandstorm kicked up!".to_string(),
                Weather::Hail => "It started to hail!".to_string(),
            }),
            BattleEvent::WeatherDamage { side, damage, .. } => Some(format!(
                "{}'s battler is buffeted! ({} damage)",
                side_name(side),
                damage
            )),
            BattleEvent::WeatherEnded { weather } => Some(match weather {
                Weather::Rain => "The rain stopped.".to_string(),
                Weather::Sun => "The sunlight faded.".to_string(),
                Weather::Sandstorm => "The sandstorm subsided.".to_string(),
                Weather::Hail => "The hail stopped.".to_string(),
            }),

            BattleEvent::SideConditionRaised { side, condition } => {
                Some(format!("{}'s {:?} is now in effect!", side_name(side), condition))
            }
            BattleEvent::SideConditionEnded { side, condition } => {
                Some(format!("{}'s {:?} wore off.", side_name(side), condition))
            }

            BattleEvent::DelayedEffectQueued { side, .. } => {
                Some(format!("Something looms over {}'s side!", side_name(side)))
            }
            BattleEvent::FutureAttackStruck { side, damage, .. } => Some(format!(
                "{}'s battler was struck by the foreseen attack! ({} damage)",
                side_name(side),
                damage
            )),
            BattleEvent::WishHealed { side, amount, .. } => {
                Some(format!("{}'s wish came true! ({} HP restored)", side_name(side), amount))
            }

            BattleEvent::Switched { side, outgoing, incoming } => Some(format!(
                "{} recalled {} and sent out {}!",
                side_name(side),
                outgoing,
                incoming
            )),
            BattleEvent::Fainted { battler, .. } => Some(format!("{} fainted!", battler)),
            BattleEvent::ActionSkipped { .. } => None,
            BattleEvent::ActionError { message, .. } => {
                Some(format!("The action could not be carried out: {}", message))
            }

            BattleEvent::BattleEnded { winner } => match winner {
                Some(side) => Some(format!("{} won the battle!", side_name(side))),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }
}

fn format_status_name(status: &StatusCondition) -> &'static str {
    match status {
        StatusCondition::Sleep(_) => "sleep",
        StatusCondition::Poison => "poison",
        StatusCondition::Toxic(_) => "toxic poison",
        StatusCondition::Burn => "burn",
        StatusCondition::Freeze => "freeze",
        StatusCondition::Paralysis => "paralysis",
    }
}

fn format_status_applied(status: &StatusCondition) -> &'static str {
    match status {
        StatusCondition::Sleep(_) => "fell asleep!",
        StatusCondition::Poison => "was poisoned!",
        StatusCondition::Toxic(_) => "was badly poisoned!",
        StatusCondition::Burn => "was burned!",
        StatusCondition::Freeze => "was frozen solid!",
        StatusCondition::Paralysis => "is paralyzed! It may be unable to move!",
    }
}

fn format_status_removed(status: &StatusCondition) -> String {
    match status {
        StatusCondition::Sleep(_) => "woke up!".to_string(),
        other => format!("was cured of its {}!", format_status_name(other)),
    }
}

fn format_condition_name(kind: VolatileKind) -> &'static str {
    match kind {
        VolatileKind::Flinched => "flinching",
        VolatileKind::Confused => "confusion",
        VolatileKind::Substitute => "substitute",
        VolatileKind::Protected => "protection",
        VolatileKind::Enduring => "endurance",
        VolatileKind::Seeded => "leech seed",
        VolatileKind::Trapped => "trapping",
        VolatileKind::FocusEnergy => "heightened focus",
    }
}

/// Ordered collection of the events one turn produced.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }
}

impl std::fmt::Display for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}
