use crate::battle::conditions::{VolatileCondition, VolatileKind};
use crate::battle::damage::{
    apply_final_damage_modifiers, calculate_base_damage, confusion_self_damage,
};
use crate::battle::effects;
use crate::battle::state::{BattleEvent, BattleState, EventLog, FailReason};
use crate::battle::stats::hit_chance;
use crate::battler::{Stat, StatusCondition};
use crate::dex::Dex;
use crate::errors::{DataError, DataResult};
use crate::moves::{MoveData, MoveId, ScriptId, Target};
use tracing::trace;

/// Critical-hit percent thresholds by crit stage (1/16, 1/8, 1/4, 1/3, 1/2).
const CRIT_CHANCE_PERCENT: [u8; 5] = [6, 12, 25, 33, 50];

/// One step of a move's resolution pipeline. The vocabulary is closed;
/// dispatch is an exhaustive match in the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Can the move come out at all? (sleep, freeze, flinch, paralysis,
    /// confusion, the target's protection)
    CancelCheck,
    AccuracyCheck,
    PpReduce,
    CritCalc,
    DamageCalc,
    /// Type effectiveness and same-type attack bonus
    TypeAndStab,
    /// Random 85-100% factor, then floor to a minimum of 1
    VarianceAndClamp,
    /// Apply damage to the target, through substitute and endure
    HpUpdate,
    FaintCheck,
    PrimaryEffect,
    SecondaryEffects,
    /// Rebound damage on the user; the one step that runs on a miss
    CrashOnMiss,
    End,
}

/// Maps every `ScriptId` to its fixed command pipeline. Move-specific
/// variation lives entirely in which optional steps a script includes.
pub struct ScriptLibrary;

impl ScriptLibrary {
    pub fn script(id: ScriptId) -> &'static [ScriptCommand] {
        use ScriptCommand::*;
        match id {
            ScriptId::Standard => &[
                CancelCheck,
                AccuracyCheck,
                PpReduce,
                CritCalc,
                DamageCalc,
                TypeAndStab,
                VarianceAndClamp,
                HpUpdate,
                FaintCheck,
                PrimaryEffect,
                SecondaryEffects,
                End,
            ],
            ScriptId::SureHit => &[
                CancelCheck,
                PpReduce,
                CritCalc,
                DamageCalc,
                TypeAndStab,
                VarianceAndClamp,
                HpUpdate,
                FaintCheck,
                PrimaryEffect,
                SecondaryEffects,
                End,
            ],
            ScriptId::Status => &[CancelCheck, AccuracyCheck, PpReduce, PrimaryEffect, End],
            ScriptId::SelfStatus => &[CancelCheck, PpReduce, PrimaryEffect, End],
            ScriptId::FixedDamage => &[
                CancelCheck,
                AccuracyCheck,
                PpReduce,
                PrimaryEffect,
                HpUpdate,
                FaintCheck,
                End,
            ],
            ScriptId::CrashOnMiss => &[
                CancelCheck,
                AccuracyCheck,
                PpReduce,
                CritCalc,
                DamageCalc,
                TypeAndStab,
                VarianceAndClamp,
                HpUpdate,
                FaintCheck,
                PrimaryEffect,
                SecondaryEffects,
                CrashOnMiss,
                End,
            ],
        }
    }
}

/// Per-action resolution scratchpad. Created when a move starts, discarded
/// when its script ends; never persisted.
#[derive(Debug)]
pub struct ScriptContext {
    pub attacker: usize,
    pub defender: usize,
    pub move_id: MoveId,
    pub move_index: usize,
    /// Set by any step that stops the pipeline; later steps no-op on it
    pub halted: bool,
    pub missed: bool,
    pub critical: bool,
    /// Damage computed so far through the pipeline
    pub damage: u16,
    /// Damage that actually landed on the target's real HP
    pub dealt: u16,
    /// Combined type factor, x10 fixed point
    pub effectiveness: u8,
}

impl ScriptContext {
    fn new(attacker: usize, defender: usize, move_id: MoveId, move_index: usize) -> Self {
        ScriptContext {
            attacker,
            defender,
            move_id,
            move_index,
            halted: false,
            missed: false,
            critical: false,
            damage: 0,
            dealt: 0,
            effectiveness: 10,
        }
    }
}

/// Resolve one "use move" action: look up the move, select its script and
/// run the command pipeline against a fresh context.
pub fn run_move_script(
    state: &mut BattleState,
    dex: &Dex,
    side: usize,
    move_index: usize,
    log: &mut EventLog,
) -> DataResult<()> {
    let move_id = state
        .active(side)
        .move_slot(move_index)
        .map(|slot| slot.move_id)
        .ok_or_else(|| DataError::Inconsistent(format!("empty move slot {}", move_index)))?;
    let move_data = dex.move_data(move_id)?.clone();
    let defender = state.opponent_of(side);
    let mut ctx = ScriptContext::new(side, defender, move_id, move_index);

    trace!(side, move_name = %move_data.name, "running move script");

    for &command in ScriptLibrary::script(move_data.script) {
        if ctx.halted && !runs_while_halted(command, &ctx) {
            continue;
        }
        execute_command(command, state, dex, &move_data, &mut ctx, log)?;
    }
    Ok(())
}

/// Steps documented as applying regardless of an earlier halt.
fn runs_while_halted(command: ScriptCommand, ctx: &ScriptContext) -> bool {
    matches!(command, ScriptCommand::CrashOnMiss) && ctx.missed
}

fn execute_command(
    command: ScriptCommand,
    state: &mut BattleState,
    dex: &Dex,
    move_data: &MoveData,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) -> DataResult<()> {
    match command {
        ScriptCommand::CancelCheck => cmd_cancel_check(state, move_data, ctx, log),
        ScriptCommand::AccuracyCheck => {
            cmd_accuracy_check(state, move_data, ctx, log);
            Ok(())
        }
        ScriptCommand::PpReduce => cmd_pp_reduce(state, ctx),
        ScriptCommand::CritCalc => {
            cmd_crit_calc(state, move_data, ctx, log);
            Ok(())
        }
        ScriptCommand::DamageCalc => {
            cmd_damage_calc(state, move_data, ctx);
            Ok(())
        }
        ScriptCommand::TypeAndStab => {
            cmd_type_and_stab(state, dex, move_data, ctx, log);
            Ok(())
        }
        ScriptCommand::VarianceAndClamp => {
            cmd_variance_and_clamp(state, ctx);
            Ok(())
        }
        ScriptCommand::HpUpdate => {
            cmd_hp_update(state, ctx, log);
            Ok(())
        }
        ScriptCommand::FaintCheck => {
            state.check_faint(ctx.defender, log);
            Ok(())
        }
        ScriptCommand::PrimaryEffect => {
            if let Some(effect) = move_data.primary.clone() {
                effects::apply_primary(state, dex, move_data, &effect, ctx, log)?;
            }
            Ok(())
        }
        ScriptCommand::SecondaryEffects => {
            for secondary in move_data.secondary.clone() {
                effects::apply_with_chance(state, dex, move_data, &secondary, ctx, log)?;
            }
            Ok(())
        }
        ScriptCommand::CrashOnMiss => {
            cmd_crash_on_miss(state, move_data, ctx, log);
            Ok(())
        }
        ScriptCommand::End => Ok(()),
    }
}

/// Everything that can stop a move before it happens. Each check either
/// passes or emits the failure and halts the script.
fn cmd_cancel_check(
    state: &mut BattleState,
    move_data: &MoveData,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) -> DataResult<()> {
    let side = ctx.attacker;

    // Sleep: the counter ticks on each attempt to act
    match state.active(side).status {
        Some(StatusCondition::Sleep(turns)) => {
            if turns == 0 {
                state.active_mut(side).status = None;
                log.push(BattleEvent::StatusRemoved {
                    side,
                    status: StatusCondition::Sleep(0),
                });
            } else {
                state.active_mut(side).status = Some(StatusCondition::Sleep(turns - 1));
                log.push(BattleEvent::MoveFailed {
                    side,
                    reason: FailReason::Asleep,
                });
                ctx.halted = true;
                return Ok(());
            }
        }
        Some(StatusCondition::Freeze) => {
            if state.rng.chance("thaw chance", 25) {
                state.active_mut(side).status = None;
                log.push(BattleEvent::StatusRemoved {
                    side,
                    status: StatusCondition::Freeze,
                });
            } else {
                log.push(BattleEvent::MoveFailed {
                    side,
                    reason: FailReason::Frozen,
                });
                ctx.halted = true;
                return Ok(());
            }
        }
        _ => {}
    }

    if state
        .active_mut(side)
        .remove_volatile(VolatileKind::Flinched)
        .is_some()
    {
        log.push(BattleEvent::MoveFailed {
            side,
            reason: FailReason::Flinched,
        });
        ctx.halted = true;
        return Ok(());
    }

    if matches!(state.active(side).status, Some(StatusCondition::Paralysis))
        && state.rng.chance("full paralysis", 25)
    {
        log.push(BattleEvent::MoveFailed {
            side,
            reason: FailReason::FullyParalyzed,
        });
        ctx.halted = true;
        return Ok(());
    }

    // Confusion: tick the counter, then roll for the self-hit
    if let Some(VolatileCondition::Confused { turns_remaining }) =
        state.active(side).volatile(VolatileKind::Confused).cloned()
    {
        if turns_remaining <= 1 {
            state.active_mut(side).remove_volatile(VolatileKind::Confused);
            log.push(BattleEvent::VolatileExpired {
                side,
                condition: VolatileCondition::Confused { turns_remaining: 0 },
            });
        } else {
            state.active_mut(side).set_volatile(VolatileCondition::Confused {
                turns_remaining: turns_remaining - 1,
            });
            if state.rng.chance("confusion self-hit", 50) {
                log.push(BattleEvent::MoveFailed {
                    side,
                    reason: FailReason::HurtItselfInConfusion,
                });
                let snapshot = state.active(side).clone();
                let damage = confusion_self_damage(&snapshot, &mut state.rng);
                let dealt = state.active_mut(side).take_damage(damage);
                let remaining = state.active(side).current_hp();
                log.push(BattleEvent::DamageDealt {
                    side,
                    amount: dealt,
                    remaining_hp: remaining,
                });
                state.check_faint(side, log);
                ctx.halted = true;
                return Ok(());
            }
        }
    }

    // The target's protection blocks moves flagged as protect-affected
    let targets_foe = matches!(move_data.target, Target::Foe | Target::FoeSide);
    if targets_foe
        && move_data.affected_by_protect
        && state
            .active(ctx.defender)
            .has_volatile(VolatileKind::Protected)
    {
        log.push(BattleEvent::MoveFailed {
            side,
            reason: FailReason::Protected,
        });
        ctx.halted = true;
        return Ok(());
    }

    let battler = state.active(side);
    log.push(BattleEvent::MoveUsed {
        side,
        battler: battler.name.clone(),
        move_used: move_data.name.clone(),
    });
    Ok(())
}

fn cmd_accuracy_check(
    state: &mut BattleState,
    move_data: &MoveData,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) {
    let Some(base_accuracy) = move_data.accuracy else {
        return;
    };
    let accuracy_stage = state.active(ctx.attacker).stage(Stat::Accuracy);
    let evasion_stage = state.active(ctx.defender).stage(Stat::Evasion);
    let threshold = hit_chance(base_accuracy, accuracy_stage, evasion_stage);

    if state.rng.percent("accuracy roll") > threshold {
        log.push(BattleEvent::MoveMissed { side: ctx.attacker });
        ctx.missed = true;
        ctx.halted = true;
    }
}

fn cmd_pp_reduce(state: &mut BattleState, ctx: &mut ScriptContext) -> DataResult<()> {
    let slot = state
        .active_mut(ctx.attacker)
        .move_slot_mut(ctx.move_index)
        .ok_or_else(|| {
            DataError::Inconsistent(format!("empty move slot {} at pp deduction", ctx.move_index))
        })?;
    if slot.pp == 0 {
        // Validation should have rejected this action; reaching here means
        // the state and the submitted action disagree.
        return Err(DataError::Inconsistent(format!(
            "move {:?} had no PP at execution",
            ctx.move_id
        )));
    }
    slot.pp -= 1;
    Ok(())
}

fn cmd_crit_calc(
    state: &mut BattleState,
    move_data: &MoveData,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) {
    let mut stage = move_data.crit_bonus as usize;
    if state
        .active(ctx.attacker)
        .has_volatile(VolatileKind::FocusEnergy)
    {
        stage += 2;
    }
    let threshold = CRIT_CHANCE_PERCENT[stage.min(CRIT_CHANCE_PERCENT.len() - 1)];
    if state.rng.chance("critical hit", threshold) {
        ctx.critical = true;
        log.push(BattleEvent::CriticalHit { side: ctx.attacker });
    }
}

fn cmd_damage_calc(state: &mut BattleState, move_data: &MoveData, ctx: &mut ScriptContext) {
    let weather = state.field.weather_kind();
    let attacker = state.active(ctx.attacker);
    let defender = state.active(ctx.defender);
    let base = calculate_base_damage(attacker, defender, move_data, ctx.critical);
    ctx.damage = apply_final_damage_modifiers(
        base,
        attacker,
        state.side(ctx.defender),
        move_data,
        weather,
        ctx.critical,
    );
}

fn cmd_type_and_stab(
    state: &mut BattleState,
    dex: &Dex,
    move_data: &MoveData,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) {
    let defender_types = state.active(ctx.defender).types.clone();
    ctx.effectiveness = dex.chart().against(move_data.element, &defender_types);

    if ctx.effectiveness == 0 {
        log.push(BattleEvent::NoEffect { side: ctx.defender });
        ctx.damage = 0;
        ctx.halted = true;
        return;
    }

    // Factors apply sequentially per defending type, as the fixed-point
    // rounding differs from multiplying by the combined factor.
    let mut damage = ctx.damage as u32;
    let mut seen_first: Option<_> = None;
    for &defend in &defender_types {
        if seen_first == Some(defend) {
            continue;
        }
        if seen_first.is_none() {
            seen_first = Some(defend);
        }
        damage = damage * dex.chart().effectiveness(move_data.element, defend) as u32 / 10;
    }

    if state.active(ctx.attacker).types.contains(&move_data.element) {
        damage = damage * 15 / 10;
    }
    ctx.damage = damage.min(u16::MAX as u32) as u16;

    if ctx.effectiveness != 10 {
        log.push(BattleEvent::Effectiveness {
            multiplier_x10: ctx.effectiveness,
        });
    }
}

fn cmd_variance_and_clamp(state: &mut BattleState, ctx: &mut ScriptContext) {
    let roll = 85 + state.rng.pick("damage variance", 16) as u32;
    ctx.damage = ((ctx.damage as u32 * roll / 100).max(1)).min(u16::MAX as u32) as u16;
}

/// Apply the computed damage to the target's HP, with the substitute and
/// endure special cases.
fn cmd_hp_update(state: &mut BattleState, ctx: &mut ScriptContext, log: &mut EventLog) {
    let defender = ctx.defender;
    let damage = ctx.damage;

    if let Some(VolatileCondition::Substitute { hp }) = state
        .active(defender)
        .volatile(VolatileKind::Substitute)
        .cloned()
    {
        // The decoy soaks the hit; excess damage does not carry over
        if damage >= hp {
            state
                .active_mut(defender)
                .remove_volatile(VolatileKind::Substitute);
            log.push(BattleEvent::SubstituteBroke { side: defender });
        } else {
            state
                .active_mut(defender)
                .set_volatile(VolatileCondition::Substitute { hp: hp - damage });
            log.push(BattleEvent::SubstituteDamaged {
                side: defender,
                remaining: hp - damage,
            });
        }
        ctx.dealt = 0;
        return;
    }

    let current_hp = state.active(defender).current_hp();
    if damage >= current_hp
        && state
            .active_mut(defender)
            .remove_volatile(VolatileKind::Enduring)
            .is_some()
    {
        let dealt = current_hp.saturating_sub(1);
        state.active_mut(defender).take_damage(dealt);
        log.push(BattleEvent::EnduredHit { side: defender });
        if dealt > 0 {
            log.push(BattleEvent::DamageDealt {
                side: defender,
                amount: dealt,
                remaining_hp: 1,
            });
        }
        ctx.dealt = dealt;
        return;
    }

    let dealt = state.active_mut(defender).take_damage(damage);
    let remaining = state.active(defender).current_hp();
    log.push(BattleEvent::DamageDealt {
        side: defender,
        amount: dealt,
        remaining_hp: remaining,
    });
    ctx.dealt = dealt;
}

/// A missed crash-recoil move rebounds half the damage it would have dealt.
fn cmd_crash_on_miss(
    state: &mut BattleState,
    move_data: &MoveData,
    ctx: &mut ScriptContext,
    log: &mut EventLog,
) {
    let would_deal = {
        let attacker = state.active(ctx.attacker);
        let defender = state.active(ctx.defender);
        calculate_base_damage(attacker, defender, move_data, false)
    };
    let amount = (would_deal / 2).max(1);
    state.active_mut(ctx.attacker).take_damage(amount);
    let remaining = state.active(ctx.attacker).current_hp();
    log.push(BattleEvent::Recoil {
        side: ctx.attacker,
        amount,
        remaining_hp: remaining,
    });
    state.check_faint(ctx.attacker, log);
}
