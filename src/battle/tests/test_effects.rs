use super::common::*;
use crate::battle::conditions::{VolatileCondition, VolatileKind};
use crate::battle::engine::Action;
use crate::battle::state::BattleEvent;
use crate::battler::{Stat, StatusCondition};
use crate::types::{Element, SideCondition, Weather};
use pretty_assertions::assert_eq;

#[test]
fn stat_raises_clamp_at_plus_six_with_a_blocked_entry() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[SWORDS_DANCE]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![]);

    for _ in 0..3 {
        engine
            .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
            .unwrap();
    }
    assert_eq!(engine.state().active(0).stage(Stat::Attack), 6);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();
    assert!(report.events.contains(&BattleEvent::StatChangeBlocked {
        side: 0,
        stat: Stat::Attack,
    }));
    assert_eq!(engine.state().active(0).stage(Stat::Attack), 6);
}

#[test]
fn growl_lowers_the_targets_attack() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[GROWL]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    // One accuracy roll for Growl
    let mut engine = engine_with_rolls(&dex, a, b, vec![50]);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    // Growl resolves first (faster side), then Swords Dance raises from -1
    assert!(report.events.contains(&BattleEvent::StatStageChanged {
        side: 1,
        stat: Stat::Attack,
        old_stage: 0,
        new_stage: -1,
    }));
    assert_eq!(engine.state().active(1).stage(Stat::Attack), 1);
}

#[test]
fn mist_blocks_hostile_stat_drops() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[GROWL]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![50]);
    engine.state_mut().side_mut(1).set_condition(SideCondition::Mist, 5);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert!(report.events.contains(&BattleEvent::StatChangeBlocked {
        side: 1,
        stat: Stat::Attack,
    }));
    assert_eq!(engine.state().active(1).stage(Stat::Attack), 2);
}

#[test]
fn type_immunities_block_status_infliction() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[THUNDER_WAVE]);
    let b = battler(&dex, "Voltvole", vec![Element::Electric], 80, &[WILL_O_WISP]);
    // Thunder Wave accuracy, Will-O-Wisp accuracy
    let mut engine = engine_with_rolls(&dex, a, b, vec![50, 50]);

    engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    // Electric-types shrug off paralysis; Fire-types shrug off burns
    assert!(engine.state().active(1).status.is_none());
    assert!(engine.state().active(0).status.is_none());
}

#[test]
fn a_battler_holds_at_most_one_non_volatile_status() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[THUNDER_WAVE]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![50]);
    engine.state_mut().active_mut(1).status = Some(StatusCondition::Poison);

    engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert_eq!(
        engine.state().active(1).status,
        Some(StatusCondition::Poison)
    );
}

#[test]
fn safeguard_blocks_incoming_status() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[THUNDER_WAVE]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SAFEGUARD]);
    // The screen is already up before the attacker moves
    let mut engine = engine_with_rolls(&dex, a, b, vec![50]);
    engine
        .state_mut()
        .side_mut(1)
        .set_condition(SideCondition::Safeguard, 5);

    engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert!(engine.state().active(1).status.is_none());
}

#[test]
fn rest_overwrites_status_and_restores_everything() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[REST]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    // One roll for the paralysis check before Rest comes out
    let mut engine = engine_with_rolls(&dex, a, b, vec![26]);
    engine.state_mut().active_mut(0).set_hp(40);
    engine.state_mut().active_mut(0).status = Some(StatusCondition::Paralysis);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert_eq!(engine.state().active(0).current_hp(), 200);
    assert_eq!(
        engine.state().active(0).status,
        Some(StatusCondition::Sleep(2))
    );
    assert!(report.events.contains(&BattleEvent::Healed {
        side: 0,
        amount: 160,
        new_hp: 200,
    }));
}

#[test]
fn drain_heals_half_the_damage_dealt() {
    let dex = test_dex();
    let a = battler(&dex, "Fernling", vec![Element::Grass], 100, &[ABSORB]);
    let b = battler(&dex, "Plainrunner", vec![Element::Normal], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![50, 100, 0]);
    engine.state_mut().active_mut(0).set_hp(100);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    // 20 power with STAB: 15, minimum variance 12; drain restores 6
    assert!(report.events.contains(&BattleEvent::DamageDealt {
        side: 1,
        amount: 12,
        remaining_hp: 188,
    }));
    assert!(report.events.contains(&BattleEvent::Healed {
        side: 0,
        amount: 6,
        new_hp: 106,
    }));
}

#[test]
fn recoil_rebounds_a_fraction_of_damage_dealt() {
    let dex = test_dex();
    let a = battler(&dex, "Plainrunner", vec![Element::Normal], 100, &[DOUBLE_EDGE]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![50, 100, 0]);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    // 120 power with STAB: 81, minimum variance 68; recoil is a third
    assert!(report.events.contains(&BattleEvent::DamageDealt {
        side: 1,
        amount: 68,
        remaining_hp: 132,
    }));
    assert!(report.events.contains(&BattleEvent::Recoil {
        side: 0,
        amount: 22,
        remaining_hp: 178,
    }));
}

#[test]
fn substitute_costs_a_quarter_of_max_hp() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[SUBSTITUTE]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![]);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert_eq!(engine.state().active(0).current_hp(), 150);
    assert_eq!(
        engine.state().active(0).volatile(VolatileKind::Substitute),
        Some(&VolatileCondition::Substitute { hp: 50 })
    );
    assert!(report.events.contains(&BattleEvent::VolatileApplied {
        side: 0,
        condition: VolatileCondition::Substitute { hp: 50 },
    }));
}

#[test]
fn substitute_fails_without_enough_hp() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[SUBSTITUTE]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![]);
    engine.state_mut().active_mut(0).set_hp(50);

    engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert_eq!(engine.state().active(0).current_hp(), 50);
    assert!(!engine.state().active(0).has_volatile(VolatileKind::Substitute));
}

#[test]
fn secondary_effects_roll_their_own_chance() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[EMBER]);
    let b = battler(&dex, "Fernling", vec![Element::Grass], 80, &[SWORDS_DANCE]);
    // accuracy, crit, variance, then the 10% burn chance succeeding at 10
    let mut engine = engine_with_rolls(&dex, a, b, vec![50, 100, 0, 10]);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert!(report.events.contains(&BattleEvent::StatusApplied {
        side: 1,
        status: StatusCondition::Burn,
    }));
    assert_eq!(
        engine.state().active(1).status,
        Some(StatusCondition::Burn)
    );
}

#[test]
fn focus_energy_raises_the_critical_stage() {
    let dex = test_dex();
    let a = battler(&dex, "Cindermaw", vec![Element::Fire], 100, &[FOCUS_ENERGY, SLAM]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    // Turn 1: no rolls. Turn 2: accuracy, crit (25 is within the boosted
    // 25% threshold but outside the base 6%), variance.
    let mut engine = engine_with_rolls(&dex, a, b, vec![50, 25, 0]);

    engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();
    let report = engine
        .resolve(Action::UseMove { move_index: 1 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert!(report.events.contains(&BattleEvent::CriticalHit { side: 0 }));
}

#[test]
fn weather_setters_do_not_restart_the_same_weather() {
    let dex = test_dex();
    let a = battler(&dex, "Tidefly", vec![Element::Water], 100, &[RAIN_DANCE]);
    let b = battler(&dex, "Cindermaw", vec![Element::Fire], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![]);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();
    assert!(report.events.contains(&BattleEvent::WeatherStarted {
        weather: Weather::Rain,
    }));

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::WeatherStarted { .. })));
}

#[test]
fn haze_resets_every_stage_on_both_sides() {
    let dex = test_dex();
    let a = battler(&dex, "Glacielle", vec![Element::Ice], 100, &[HAZE]);
    let b = battler(&dex, "Tidefly", vec![Element::Water], 80, &[SWORDS_DANCE]);
    let mut engine = engine_with_rolls(&dex, a, b, vec![]);
    engine.state_mut().active_mut(0).set_stage(Stat::Defense, -3);
    engine.state_mut().active_mut(1).set_stage(Stat::Attack, 4);

    let report = engine
        .resolve(Action::UseMove { move_index: 0 }, Action::UseMove { move_index: 0 })
        .unwrap();

    assert!(report.events.contains(&BattleEvent::StatStagesReset));
    assert_eq!(engine.state().active(0).stage(Stat::Defense), 0);
    // Swords Dance resolved after Haze (slower side), so the boost it
    // granted this turn survives the reset
    assert_eq!(engine.state().active(1).stage(Stat::Attack), 2);
}
