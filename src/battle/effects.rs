use crate::battle::conditions::{VolatileCondition, VolatileKind};
use crate::battle::damage::calculate_base_damage;
use crate::battle::script::ScriptContext;
use crate::battle::state::{
    BattleEvent, BattleState, DelayedEffect, DelayedKind, EventLog, WeatherState,
};
use crate::battler::{Stat, StatusCondition};
use crate::dex::Dex;
use crate::errors::DataResult;
use crate::moves::{Effect, FixedDamageKind, MoveData, SecondaryEffect, StatusKind, Target};
use crate::types::{Element, SideCondition};

/// Apply a move's primary effect. Primary effects fire unconditionally once
/// the move resolves.
pub fn apply_primary(
    state: &mut BattleState,
    dex: &Dex,
    move_data: &MoveData,
    effect: &Effect,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) -> DataResult<()> {
    apply_effect(state, dex, move_data, effect, ctx, log, false)
}

/// Apply one secondary effect unconditionally (the chance roll has already
/// succeeded). Secondaries are blocked by a substitute on the target and
/// skipped against a fainted target; failure is silent.
pub fn apply_secondary(
    state: &mut BattleState,
    dex: &Dex,
    move_data: &MoveData,
    effect: &Effect,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) -> DataResult<()> {
    apply_effect(state, dex, move_data, effect, ctx, log, true)
}

/// Roll a secondary effect's trigger chance and delegate on success.
pub fn apply_with_chance(
    state: &mut BattleState,
    dex: &Dex,
    move_data: &MoveData,
    secondary: &SecondaryEffect,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) -> DataResult<()> {
    if !state.rng.chance("secondary effect chance", secondary.chance) {
        return Ok(());
    }
    apply_secondary(state, dex, move_data, &secondary.effect, ctx, log)
}

fn apply_effect(
    state: &mut BattleState,
    dex: &Dex,
    move_data: &MoveData,
    effect: &Effect,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
    is_secondary: bool,
) -> DataResult<()> {
    let user = ctx.attacker;
    let foe = ctx.defender;

    match effect {
        Effect::RaiseStat { stat, stages } => {
            change_stat_stage(state, user, *stat, *stages, user, log);
        }
        Effect::LowerStat { stat, stages } => {
            let target = directed_target(move_data, user, foe);
            change_stat_stage(state, target, *stat, -*stages, user, log);
        }
        Effect::InflictStatus { status } => {
            let target = directed_target(move_data, user, foe);
            try_inflict_status(state, target, *status, target != user, log);
        }
        Effect::Flinch => {
            if target_open(state, foe, user) {
                state
                    .active_mut(foe)
                    .set_volatile(VolatileCondition::Flinched);
            }
        }
        Effect::Confuse => {
            if target_open(state, foe, user)
                && !state.side(foe).has_condition(SideCondition::Safeguard)
                && !state.active(foe).has_volatile(VolatileKind::Confused)
            {
                let turns = 2 + state.rng.pick("confusion turns", 4) as u8;
                let condition = VolatileCondition::Confused {
                    turns_remaining: turns,
                };
                state.active_mut(foe).set_volatile(condition.clone());
                log.push(BattleEvent::VolatileApplied {
                    side: foe,
                    condition,
                });
            }
        }
        Effect::LeechSeed => {
            if target_open(state, foe, user)
                && !state.active(foe).types.contains(&Element::Grass)
                && !state.active(foe).has_volatile(VolatileKind::Seeded)
            {
                state.active_mut(foe).set_volatile(VolatileCondition::Seeded);
                log.push(BattleEvent::VolatileApplied {
                    side: foe,
                    condition: VolatileCondition::Seeded,
                });
            }
        }
        Effect::Trap => {
            if target_open(state, foe, user)
                && !state.active(foe).has_volatile(VolatileKind::Trapped)
            {
                let turns = 2 + state.rng.pick("trap turns", 4) as u8;
                let condition = VolatileCondition::Trapped {
                    turns_remaining: turns,
                };
                state.active_mut(foe).set_volatile(condition.clone());
                log.push(BattleEvent::VolatileApplied {
                    side: foe,
                    condition,
                });
            }
        }
        Effect::Substitute => {
            let battler = state.active_mut(user);
            let cost = battler.max_hp() / 4;
            if cost > 0
                && battler.current_hp() > cost
                && !battler.has_volatile(VolatileKind::Substitute)
            {
                battler.take_damage(cost);
                let remaining = battler.current_hp();
                battler.set_volatile(VolatileCondition::Substitute { hp: cost });
                log.push(BattleEvent::DamageDealt {
                    side: user,
                    amount: cost,
                    remaining_hp: remaining,
                });
                log.push(BattleEvent::VolatileApplied {
                    side: user,
                    condition: VolatileCondition::Substitute { hp: cost },
                });
            }
        }
        Effect::Protect => {
            state
                .active_mut(user)
                .set_volatile(VolatileCondition::Protected);
            log.push(BattleEvent::VolatileApplied {
                side: user,
                condition: VolatileCondition::Protected,
            });
        }
        Effect::Endure => {
            state
                .active_mut(user)
                .set_volatile(VolatileCondition::Enduring);
            log.push(BattleEvent::VolatileApplied {
                side: user,
                condition: VolatileCondition::Enduring,
            });
        }
        Effect::FocusEnergy => {
            state
                .active_mut(user)
                .set_volatile(VolatileCondition::FocusEnergy);
            log.push(BattleEvent::VolatileApplied {
                side: user,
                condition: VolatileCondition::FocusEnergy,
            });
        }
        Effect::Heal {
            numerator,
            denominator,
        } => {
            let battler = state.active_mut(user);
            let amount =
                (battler.max_hp() as u32 * *numerator as u32 / *denominator as u32).max(1) as u16;
            let restored = battler.heal(amount);
            if restored > 0 {
                let new_hp = battler.current_hp();
                log.push(BattleEvent::Healed {
                    side: user,
                    amount: restored,
                    new_hp,
                });
            }
        }
        Effect::Rest => {
            let battler = state.active_mut(user);
            let missing = battler.max_hp() - battler.current_hp();
            let restored = battler.heal(missing);
            // Rest is the one status that overwrites an existing one
            battler.status = Some(StatusCondition::Sleep(2));
            let new_hp = battler.current_hp();
            if restored > 0 {
                log.push(BattleEvent::Healed {
                    side: user,
                    amount: restored,
                    new_hp,
                });
            }
            log.push(BattleEvent::StatusApplied {
                side: user,
                status: StatusCondition::Sleep(2),
            });
        }
        Effect::SetWeather { weather } => {
            if state.field.weather_kind() != Some(*weather) {
                state.field.weather = Some(WeatherState {
                    kind: *weather,
                    turns_remaining: 5,
                });
                log.push(BattleEvent::WeatherStarted { weather: *weather });
            }
        }
        Effect::Screen { condition } => {
            if !state.side(user).has_condition(*condition) {
                state.side_mut(user).set_condition(*condition, 5);
                log.push(BattleEvent::SideConditionRaised {
                    side: user,
                    condition: *condition,
                });
            }
        }
        Effect::Haze => {
            for side in 0..2 {
                state.active_mut(side).clear_stages();
            }
            log.push(BattleEvent::StatStagesReset);
        }
        Effect::FixedDamage { kind } => {
            ctx.damage = match kind {
                FixedDamageKind::Constant(amount) => *amount,
                FixedDamageKind::UserLevel => state.active(user).level as u16,
                FixedDamageKind::HalfTargetHp => (state.active(foe).current_hp() / 2).max(1),
            };
        }
        Effect::Drain => {
            if ctx.dealt > 0 {
                let amount = (ctx.dealt / 2).max(1);
                let battler = state.active_mut(user);
                let restored = battler.heal(amount);
                if restored > 0 {
                    let new_hp = battler.current_hp();
                    log.push(BattleEvent::Healed {
                        side: user,
                        amount: restored,
                        new_hp,
                    });
                }
            }
        }
        Effect::Recoil {
            numerator,
            denominator,
        } => {
            if ctx.dealt > 0 {
                let amount =
                    (ctx.dealt as u32 * *numerator as u32 / *denominator as u32).max(1) as u16;
                let battler = state.active_mut(user);
                battler.take_damage(amount);
                let remaining = battler.current_hp();
                log.push(BattleEvent::Recoil {
                    side: user,
                    amount,
                    remaining_hp: remaining,
                });
                state.check_faint(user, log);
            }
        }
        Effect::FutureSight => {
            let already_queued = state
                .field
                .delayed
                .iter()
                .any(|d| d.target_side == foe && matches!(d.kind, DelayedKind::FutureAttack { .. }));
            if !already_queued {
                let damage = {
                    let attacker = state.active(user);
                    let defender = state.active(foe);
                    calculate_base_damage(attacker, defender, move_data, false)
                };
                state.field.delayed.push(DelayedEffect {
                    kind: DelayedKind::FutureAttack {
                        move_id: ctx.move_id,
                        damage,
                    },
                    target_side: foe,
                    turns_remaining: 2,
                });
                log.push(BattleEvent::DelayedEffectQueued {
                    side: foe,
                    turns: 2,
                });
            }
        }
        Effect::Wish => {
            let already_queued = state
                .field
                .delayed
                .iter()
                .any(|d| d.target_side == user && matches!(d.kind, DelayedKind::WishHeal { .. }));
            if !already_queued {
                let amount = (state.active(user).max_hp() / 2).max(1);
                state.field.delayed.push(DelayedEffect {
                    kind: DelayedKind::WishHeal { amount },
                    target_side: user,
                    turns_remaining: 2,
                });
                log.push(BattleEvent::DelayedEffectQueued {
                    side: user,
                    turns: 2,
                });
            }
        }
    }

    // `dex` and `is_secondary` reserved: no current effect resolves extra
    // data or differs between primary and secondary application beyond the
    // shared gating above.
    let _ = (dex, is_secondary);
    Ok(())
}

/// Which side a foe-directed effect lands on, honoring self-targeted moves.
fn directed_target(move_data: &MoveData, user: usize, foe: usize) -> usize {
    match move_data.target {
        Target::User | Target::UserSide => user,
        _ => foe,
    }
}

/// A target-directed effect can land: the target is alive and, when the
/// effect comes from the opponent, not hidden behind a substitute.
fn target_open(state: &BattleState, target: usize, user: usize) -> bool {
    let battler = state.active(target);
    if battler.is_fainted() {
        return false;
    }
    if target != user && battler.has_volatile(VolatileKind::Substitute) {
        return false;
    }
    true
}

/// Try to set a non-volatile status, honoring exclusivity, type immunities,
/// Safeguard and substitutes. Silently a no-op when blocked.
fn try_inflict_status(
    state: &mut BattleState,
    target: usize,
    kind: StatusKind,
    from_opponent: bool,
    log: &mut EventLog,
) {
    let battler = state.active(target);
    if battler.is_fainted() || battler.has_major_status() {
        return;
    }
    if from_opponent && battler.has_volatile(VolatileKind::Substitute) {
        return;
    }
    if from_opponent && state.side(target).has_condition(SideCondition::Safeguard) {
        return;
    }

    let types = &battler.types;
    let immune = match kind {
        StatusKind::Burn => types.contains(&Element::Fire),
        StatusKind::Paralysis => types.contains(&Element::Electric),
        StatusKind::Poison | StatusKind::Toxic => {
            types.contains(&Element::Poison) || types.contains(&Element::Steel)
        }
        StatusKind::Freeze => types.contains(&Element::Ice),
        StatusKind::Sleep => false,
    };
    if immune {
        return;
    }

    let status = match kind {
        StatusKind::Sleep => {
            let turns = 2 + state.rng.pick("sleep turns", 4) as u8;
            StatusCondition::Sleep(turns)
        }
        StatusKind::Poison => StatusCondition::Poison,
        StatusKind::Toxic => StatusCondition::Toxic(0),
        StatusKind::Burn => StatusCondition::Burn,
        StatusKind::Freeze => StatusCondition::Freeze,
        StatusKind::Paralysis => StatusCondition::Paralysis,
    };
    state.active_mut(target).status = Some(status);
    log.push(BattleEvent::StatusApplied {
        side: target,
        status,
    });
}

/// Shift a stat stage, respecting the [-6, +6] bounds, Mist and substitutes.
/// A change that cannot move the stage logs `StatChangeBlocked`.
fn change_stat_stage(
    state: &mut BattleState,
    target: usize,
    stat: Stat,
    delta: i8,
    user: usize,
    log: &mut EventLog,
) {
    if state.active(target).is_fainted() {
        return;
    }
    let hostile = target != user && delta < 0;
    if hostile
        && (state.side(target).has_condition(SideCondition::Mist)
            || state.active(target).has_volatile(VolatileKind::Substitute))
    {
        log.push(BattleEvent::StatChangeBlocked { side: target, stat });
        return;
    }

    let (old_stage, new_stage) = state.active_mut(target).modify_stage(stat, delta);
    if old_stage == new_stage {
        log.push(BattleEvent::StatChangeBlocked { side: target, stat });
    } else {
        log.push(BattleEvent::StatStageChanged {
            side: target,
            stat,
            old_stage,
            new_stage,
        });
    }
}
