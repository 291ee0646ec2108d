use crate::battle::conditions::VolatileKind;
use crate::battle::state::{
    BattleEvent, BattleState, DelayedEffect, DelayedKind, EventLog, TieBreakPolicy,
};
use crate::battle::stats::effective_speed;
use crate::battler::StatusCondition;
use crate::dex::Dex;
use crate::errors::DataResult;
use crate::types::{Element, Weather};
use tracing::debug;

/// The fixed end-of-turn pipeline: field effects once, then per-battler
/// effects in speed order, then the delayed-effect queue.
///
/// A data error while resolving delayed effects aborts the remainder of the
/// phase (logged as an action error); the turn still advances.
pub fn run_end_turn(state: &mut BattleState, dex: &Dex, log: &mut EventLog) {
    debug!(turn = state.turn, "end-of-turn phase");
    field_effects(state, log);
    battler_effects(state, log);
    delayed_effects(state, dex, log);
}

/// Side-condition timers, weather countdown and weather chip damage.
fn field_effects(state: &mut BattleState, log: &mut EventLog) {
    for side in 0..2 {
        for condition in state.side_mut(side).tick_conditions() {
            log.push(BattleEvent::SideConditionEnded { side, condition });
        }
    }

    let Some(mut weather) = state.field.weather else {
        return;
    };
    weather.turns_remaining -= 1;
    if weather.turns_remaining == 0 {
        state.field.weather = None;
        log.push(BattleEvent::WeatherEnded {
            weather: weather.kind,
        });
        return;
    }
    state.field.weather = Some(weather);

    if matches!(weather.kind, Weather::Sandstorm | Weather::Hail) {
        for side in 0..2 {
            let battler = state.active(side);
            if battler.is_fainted() || weather_immune(weather.kind, &battler.types) {
                continue;
            }
            let damage = (battler.max_hp() / 16).max(1);
            let dealt = state.active_mut(side).take_damage(damage);
            let remaining = state.active(side).current_hp();
            log.push(BattleEvent::WeatherDamage {
                weather: weather.kind,
                side,
                damage: dealt,
                remaining_hp: remaining,
            });
            state.check_faint(side, log);
        }
    }
}

fn weather_immune(weather: Weather, types: &[Element]) -> bool {
    match weather {
        Weather::Sandstorm => types
            .iter()
            .any(|t| matches!(t, Element::Rock | Element::Ground | Element::Steel)),
        Weather::Hail => types.contains(&Element::Ice),
        Weather::Rain | Weather::Sun => true,
    }
}

/// Per-battler residuals, iterated in the same speed-based order used for
/// action resolution. A battler that faints mid-pipeline is excluded from
/// its remaining sub-steps.
fn battler_effects(state: &mut BattleState, log: &mut EventLog) {
    for side in battler_order(state) {
        if state.active(side).is_fainted() {
            continue;
        }

        if status_damage(state, side, log) {
            continue;
        }
        if leech_seed_drain(state, side, log) {
            continue;
        }
        if trap_damage(state, side, log) {
            continue;
        }

        for condition in state.active_mut(side).tick_volatiles() {
            log.push(BattleEvent::VolatileExpired { side, condition });
        }
    }
}

fn battler_order(state: &mut BattleState) -> [usize; 2] {
    let speed_0 = effective_speed(state.active(0));
    let speed_1 = effective_speed(state.active(1));
    if speed_0 > speed_1 {
        [0, 1]
    } else if speed_1 > speed_0 {
        [1, 0]
    } else {
        match state.tie_break {
            TieBreakPolicy::SlotOrder => [0, 1],
            TieBreakPolicy::SeededRoll => {
                if state.rng.pick("end-of-turn order tie", 2) == 0 {
                    [0, 1]
                } else {
                    [1, 0]
                }
            }
        }
    }
}

/// Poison, toxic and burn residuals. Returns true if the battler fainted.
fn status_damage(state: &mut BattleState, side: usize, log: &mut EventLog) -> bool {
    let battler = state.active(side);
    let max_hp = battler.max_hp();
    let (status, damage, next_status) = match battler.status {
        Some(status @ StatusCondition::Poison) => (status, (max_hp / 8).max(1), None),
        Some(status @ StatusCondition::Toxic(counter)) => {
            let base = (max_hp / 16).max(1);
            let damage = base * (counter as u16 + 1);
            (
                status,
                damage,
                Some(StatusCondition::Toxic(counter.saturating_add(1).min(15))),
            )
        }
        Some(status @ StatusCondition::Burn) => (status, (max_hp / 8).max(1), None),
        _ => return false,
    };

    if let Some(next) = next_status {
        state.active_mut(side).status = Some(next);
    }
    let dealt = state.active_mut(side).take_damage(damage);
    let remaining = state.active(side).current_hp();
    log.push(BattleEvent::StatusDamage {
        side,
        status,
        damage: dealt,
        remaining_hp: remaining,
    });
    state.check_faint(side, log)
}

/// Leech seed drains the host and feeds the opposing active battler.
/// Returns true if the host fainted.
fn leech_seed_drain(state: &mut BattleState, side: usize, log: &mut EventLog) -> bool {
    if !state.active(side).has_volatile(VolatileKind::Seeded) {
        return false;
    }
    let damage = (state.active(side).max_hp() / 8).max(1);
    let dealt = state.active_mut(side).take_damage(damage);
    let remaining = state.active(side).current_hp();
    log.push(BattleEvent::ConditionDamage {
        side,
        condition: VolatileKind::Seeded,
        damage: dealt,
        remaining_hp: remaining,
    });

    let opponent = state.opponent_of(side);
    if !state.active(opponent).is_fainted() {
        let restored = state.active_mut(opponent).heal(dealt);
        if restored > 0 {
            let new_hp = state.active(opponent).current_hp();
            log.push(BattleEvent::Healed {
                side: opponent,
                amount: restored,
                new_hp,
            });
        }
    }
    state.check_faint(side, log)
}

/// Partial-trap chip damage. Returns true if the battler fainted.
fn trap_damage(state: &mut BattleState, side: usize, log: &mut EventLog) -> bool {
    if !state.active(side).has_volatile(VolatileKind::Trapped) {
        return false;
    }
    let damage = (state.active(side).max_hp() / 16).max(1);
    let dealt = state.active_mut(side).take_damage(damage);
    let remaining = state.active(side).current_hp();
    log.push(BattleEvent::ConditionDamage {
        side,
        condition: VolatileKind::Trapped,
        damage: dealt,
        remaining_hp: remaining,
    });
    state.check_faint(side, log)
}

/// Decrement every queued delayed effect and resolve the ones that hit
/// zero. Future attacks strike whoever occupies the slot now, ignoring
/// protection and type immunity; wishes heal the occupant.
fn delayed_effects(state: &mut BattleState, dex: &Dex, log: &mut EventLog) {
    for effect in &mut state.field.delayed {
        effect.turns_remaining = effect.turns_remaining.saturating_sub(1);
    }

    let mut index = 0;
    while index < state.field.delayed.len() {
        if state.field.delayed[index].turns_remaining > 0 {
            index += 1;
            continue;
        }
        let effect = state.field.delayed.remove(index);
        let target_side = effect.target_side;
        if let Err(err) = fire_delayed(state, dex, effect, log) {
            // Fatal for the rest of this phase only; the turn still advances
            log.push(BattleEvent::ActionError {
                side: target_side,
                message: err.to_string(),
            });
            return;
        }
    }
}

fn fire_delayed(
    state: &mut BattleState,
    dex: &Dex,
    effect: DelayedEffect,
    log: &mut EventLog,
) -> DataResult<()> {
    let side = effect.target_side;
    match effect.kind {
        DelayedKind::FutureAttack { move_id, damage } => {
            // The move must still resolve in the dex when the attack lands
            dex.move_data(move_id)?;
            if state.active(side).is_fainted() {
                return Ok(());
            }
            let dealt = state.active_mut(side).take_damage(damage.max(1));
            let remaining = state.active(side).current_hp();
            log.push(BattleEvent::FutureAttackStruck {
                side,
                damage: dealt,
                remaining_hp: remaining,
            });
            state.check_faint(side, log);
        }
        DelayedKind::WishHeal { amount } => {
            if state.active(side).is_fainted() {
                return Ok(());
            }
            let restored = state.active_mut(side).heal(amount);
            if restored > 0 {
                let new_hp = state.active(side).current_hp();
                log.push(BattleEvent::WishHealed {
                    side,
                    amount: restored,
                    new_hp,
                });
            }
        }
    }
    Ok(())
}
