use crate::battler::{Battler, Stat, StatusCondition};

/// (numerator, denominator) pairs for regular stat stages, indexed by
/// stage + 6. Stage 0 is 1.0x; each step up adds half the base.
const STAT_STAGE_RATIOS: [(u16, u16); 13] = [
    (2, 8), // -6
    (2, 7),
    (2, 6),
    (2, 5),
    (2, 4),
    (2, 3),
    (2, 2), // 0
    (3, 2),
    (4, 2),
    (5, 2),
    (6, 2),
    (7, 2),
    (8, 2), // +6
];

/// Accuracy and evasion use their own, shallower ratio table.
const ACCURACY_STAGE_RATIOS: [(u16, u16); 13] = [
    (3, 9), // -6
    (3, 8),
    (3, 7),
    (3, 6),
    (3, 5),
    (3, 4),
    (3, 3), // 0
    (4, 3),
    (5, 3),
    (6, 3),
    (7, 3),
    (8, 3),
    (9, 3), // +6
];

/// Apply a stage multiplier to a base stat with pure integer math.
pub fn apply_stat_stage(base: u16, stage: i8) -> u16 {
    let (num, den) = STAT_STAGE_RATIOS[(stage.clamp(-6, 6) + 6) as usize];
    (base as u32 * num as u32 / den as u32) as u16
}

/// Apply the combined accuracy/evasion stage to a base accuracy percent.
pub fn apply_accuracy_stage(base: u16, stage: i8) -> u16 {
    let (num, den) = ACCURACY_STAGE_RATIOS[(stage.clamp(-6, 6) + 6) as usize];
    (base as u32 * num as u32 / den as u32) as u16
}

/// Offensive or defensive stat with its stage applied.
pub fn effective_stat(battler: &Battler, stat: Stat) -> u16 {
    apply_stat_stage(battler.raw_stat(stat), battler.stage(stat))
}

/// Speed after stages and the paralysis quartering.
pub fn effective_speed(battler: &Battler) -> u16 {
    let mut speed = apply_stat_stage(battler.raw_stat(Stat::Speed), battler.stage(Stat::Speed));
    if matches!(battler.status, Some(StatusCondition::Paralysis)) {
        speed /= 4;
    }
    speed
}

/// Final hit chance in 1..=100 from base accuracy and the two stages.
pub fn hit_chance(base_accuracy: u8, accuracy_stage: i8, evasion_stage: i8) -> u8 {
    let combined = (accuracy_stage - evasion_stage).clamp(-6, 6);
    apply_accuracy_stage(base_accuracy as u16, combined).clamp(1, 100) as u8
}
