use crate::battle::state::{BattleRng, SideState};
use crate::battle::stats::{apply_stat_stage, effective_stat};
use crate::battler::{Battler, Stat, StatusCondition};
use crate::moves::{MoveCategory, MoveData};
use crate::types::{Element, SideCondition, Weather};

/// Raw damage before type, STAB and variance:
/// `((2 * level / 5 + 2) * power * atk) / def / 50 + 2`, all integer.
///
/// The category picks the offensive/defensive pair. Stage multipliers apply
/// with the critical-hit exception: a crit ignores the attacker's negative
/// offensive stages and the defender's positive defensive stages.
pub fn calculate_base_damage(
    attacker: &Battler,
    defender: &Battler,
    move_data: &MoveData,
    critical: bool,
) -> u16 {
    let (attack_stat, defense_stat) = match move_data.category {
        MoveCategory::Physical => (Stat::Attack, Stat::Defense),
        MoveCategory::Special => (Stat::SpAttack, Stat::SpDefense),
        MoveCategory::Status => return 0,
    };
    if move_data.power == 0 {
        return 0;
    }

    let attack = if critical && attacker.stage(attack_stat) < 0 {
        attacker.raw_stat(attack_stat)
    } else {
        effective_stat(attacker, attack_stat)
    };
    let defense = if critical && defender.stage(defense_stat) > 0 {
        defender.raw_stat(defense_stat)
    } else {
        effective_stat(defender, defense_stat)
    };
    let defense = defense.max(1);

    let mut damage = attack as u32 * move_data.power as u32;
    damage *= 2 * attacker.level as u32 / 5 + 2;
    damage /= defense as u32;
    damage /= 50;
    if damage == 0 {
        damage = 1;
    }
    (damage + 2) as u16
}

/// Final modifiers over the running total, in fixed order: burn halving,
/// weather, screens, the critical multiplier, then any move-specific
/// multiplier. Crits punch through screens.
pub fn apply_final_damage_modifiers(
    base: u16,
    attacker: &Battler,
    defender_side: &SideState,
    move_data: &MoveData,
    weather: Option<Weather>,
    critical: bool,
) -> u16 {
    let mut damage = base as u32;

    if move_data.category == MoveCategory::Physical
        && matches!(attacker.status, Some(StatusCondition::Burn))
    {
        damage /= 2;
    }

    match weather {
        Some(Weather::Rain) => {
            if move_data.element == Element::Fire {
                damage /= 2;
            } else if move_data.element == Element::Water {
                damage = damage * 15 / 10;
            }
        }
        Some(Weather::Sun) => {
            if move_data.element == Element::Fire {
                damage = damage * 15 / 10;
            } else if move_data.element == Element::Water {
                damage /= 2;
            }
        }
        _ => {}
    }

    if !critical {
        let screened = match move_data.category {
            MoveCategory::Physical => defender_side.has_condition(SideCondition::Reflect),
            MoveCategory::Special => defender_side.has_condition(SideCondition::LightScreen),
            MoveCategory::Status => false,
        };
        if screened {
            damage /= 2;
        }
    }

    if critical {
        damage *= 2;
    }

    damage.min(u16::MAX as u32) as u16
}

/// A confused battler striking itself: a typeless 40-power physical hit
/// against its own Defense. No STAB, no type factor, no crit; the usual
/// variance roll applies.
pub fn confusion_self_damage(battler: &Battler, rng: &mut BattleRng) -> u16 {
    let attack = apply_stat_stage(battler.raw_stat(Stat::Attack), battler.stage(Stat::Attack));
    let defense = apply_stat_stage(battler.raw_stat(Stat::Defense), battler.stage(Stat::Defense))
        .max(1);

    let mut damage = attack as u32 * 40;
    damage *= 2 * battler.level as u32 / 5 + 2;
    damage /= defense as u32;
    damage /= 50;
    damage += 2;

    let roll = 85 + rng.pick("confusion damage variance", 16) as u32;
    (damage * roll / 100).max(1) as u16
}
