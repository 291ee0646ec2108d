//! Shared fixtures: a small dex and battler builders used across the
//! scenario tests. Battlers default to level 50 with flat 100 stats and
//! 200 max HP, so damage numbers stay easy to verify by hand.

use crate::battle::engine::BattleEngine;
use crate::battle::state::{BattleRng, BattleState, SideState};
use crate::battler::{Battler, MoveSlot, Stat};
use crate::dex::Dex;
use crate::moves::{
    Effect, FixedDamageKind, MoveCategory, MoveData, MoveId, ScriptId, StatusKind, Target,
};
use crate::species::{BaseStats, SpeciesData, SpeciesId};
use crate::types::{Element, SideCondition, Weather};

pub const SLAM: MoveId = MoveId(1);
pub const EMBER: MoveId = MoveId(2);
pub const AQUA_JET: MoveId = MoveId(3);
pub const SWIFT: MoveId = MoveId(4);
pub const GROWL: MoveId = MoveId(5);
pub const SWORDS_DANCE: MoveId = MoveId(6);
pub const TOXIN: MoveId = MoveId(7);
pub const HYPNOSIS: MoveId = MoveId(8);
pub const PROTECT: MoveId = MoveId(9);
pub const ENDURE: MoveId = MoveId(10);
pub const SUBSTITUTE: MoveId = MoveId(11);
pub const RECOVER: MoveId = MoveId(12);
pub const REST: MoveId = MoveId(13);
pub const LEAF_BLADE: MoveId = MoveId(14);
pub const SEISMIC_TOSS: MoveId = MoveId(15);
pub const DRAGON_RAGE: MoveId = MoveId(16);
pub const SUPER_FANG: MoveId = MoveId(17);
pub const ABSORB: MoveId = MoveId(18);
pub const DOUBLE_EDGE: MoveId = MoveId(19);
pub const JUMP_KICK: MoveId = MoveId(20);
pub const FUTURE_SIGHT: MoveId = MoveId(21);
pub const WISH: MoveId = MoveId(22);
pub const RAIN_DANCE: MoveId = MoveId(23);
pub const SAND_WHIRL: MoveId = MoveId(24);
pub const REFLECT: MoveId = MoveId(25);
pub const LIGHT_SCREEN: MoveId = MoveId(26);
pub const SAFEGUARD: MoveId = MoveId(27);
pub const HAZE: MoveId = MoveId(28);
pub const LEECH_SEED: MoveId = MoveId(29);
pub const WRAP: MoveId = MoveId(30);
pub const CONFUSE_RAY: MoveId = MoveId(31);
pub const BITE: MoveId = MoveId(32);
pub const THUNDER_WAVE: MoveId = MoveId(33);
pub const WILL_O_WISP: MoveId = MoveId(34);
pub const ICE_BEAM: MoveId = MoveId(35);
pub const EARTHQUAKE: MoveId = MoveId(36);
pub const FOCUS_ENERGY: MoveId = MoveId(37);
pub const MIST_VEIL: MoveId = MoveId(38);

pub const PLAINRUNNER: SpeciesId = SpeciesId(1);

pub fn test_dex() -> Dex {
    use Element::*;
    use MoveCategory::*;

    let mut dex = Dex::new();

    dex.add_move(SLAM, MoveData::new("Slam", Normal, Physical, 40, Some(100), 35));
    dex.add_move(
        EMBER,
        MoveData::new("Ember", Fire, Special, 40, Some(100), 25)
            .with_secondary(Effect::InflictStatus { status: StatusKind::Burn }, 10),
    );
    dex.add_move(
        AQUA_JET,
        MoveData::new("Aqua Jet", Water, Physical, 40, Some(100), 20).with_priority(1),
    );
    dex.add_move(
        SWIFT,
        MoveData::new("Swift", Normal, Special, 60, None, 20).with_script(ScriptId::SureHit),
    );
    dex.add_move(
        GROWL,
        MoveData::new("Growl", Normal, Status, 0, Some(100), 40)
            .with_primary(Effect::LowerStat { stat: Stat::Attack, stages: 1 }),
    );
    dex.add_move(
        SWORDS_DANCE,
        MoveData::new("Swords Dance", Normal, Status, 0, None, 20)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::RaiseStat { stat: Stat::Attack, stages: 2 }),
    );
    dex.add_move(
        TOXIN,
        MoveData::new("Toxin", Poison, Status, 0, Some(90), 10)
            .with_primary(Effect::InflictStatus { status: StatusKind::Toxic }),
    );
    dex.add_move(
        HYPNOSIS,
        MoveData::new("Hypnosis", Psychic, Status, 0, Some(60), 20)
            .with_primary(Effect::InflictStatus { status: StatusKind::Sleep }),
    );
    dex.add_move(
        PROTECT,
        MoveData::new("Protect", Normal, Status, 0, None, 10)
            .with_priority(4)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Protect),
    );
    dex.add_move(
        ENDURE,
        MoveData::new("Endure", Normal, Status, 0, None, 10)
            .with_priority(4)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Endure),
    );
    dex.add_move(
        SUBSTITUTE,
        MoveData::new("Substitute", Normal, Status, 0, None, 10)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Substitute),
    );
    dex.add_move(
        RECOVER,
        MoveData::new("Recover", Normal, Status, 0, None, 10)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Heal { numerator: 1, denominator: 2 }),
    );
    dex.add_move(
        REST,
        MoveData::new("Rest", Psychic, Status, 0, None, 10)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Rest),
    );
    dex.add_move(
        LEAF_BLADE,
        MoveData::new("Leaf Blade", Grass, Physical, 70, Some(100), 15).with_crit_bonus(1),
    );
    dex.add_move(
        SEISMIC_TOSS,
        MoveData::new("Seismic Toss", Fighting, Physical, 0, Some(100), 20)
            .with_script(ScriptId::FixedDamage)
            .with_primary(Effect::FixedDamage { kind: FixedDamageKind::UserLevel }),
    );
    dex.add_move(
        DRAGON_RAGE,
        MoveData::new("Dragon Rage", Dragon, Special, 0, Some(100), 10)
            .with_script(ScriptId::FixedDamage)
            .with_primary(Effect::FixedDamage { kind: FixedDamageKind::Constant(40) }),
    );
    dex.add_move(
        SUPER_FANG,
        MoveData::new("Super Fang", Normal, Physical, 0, Some(90), 10)
            .with_script(ScriptId::FixedDamage)
            .with_primary(Effect::FixedDamage { kind: FixedDamageKind::HalfTargetHp }),
    );
    dex.add_move(
        ABSORB,
        MoveData::new("Absorb", Grass, Special, 20, Some(100), 25).with_primary(Effect::Drain),
    );
    dex.add_move(
        DOUBLE_EDGE,
        MoveData::new("Double-Edge", Normal, Physical, 120, Some(100), 15)
            .with_primary(Effect::Recoil { numerator: 1, denominator: 3 }),
    );
    dex.add_move(
        JUMP_KICK,
        MoveData::new("Jump Kick", Fighting, Physical, 85, Some(95), 20)
            .with_script(ScriptId::CrashOnMiss),
    );
    dex.add_move(
        FUTURE_SIGHT,
        MoveData::new("Future Sight", Psychic, Special, 80, Some(90), 10)
            .with_script(ScriptId::Status)
            .with_primary(Effect::FutureSight),
    );
    dex.add_move(
        WISH,
        MoveData::new("Wish", Normal, Status, 0, None, 10)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Wish),
    );
    dex.add_move(
        RAIN_DANCE,
        MoveData::new("Rain Dance", Water, Status, 0, None, 5)
            .with_target(Target::Field)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::SetWeather { weather: Weather::Rain }),
    );
    dex.add_move(
        SAND_WHIRL,
        MoveData::new("Sand Whirl", Rock, Status, 0, None, 10)
            .with_target(Target::Field)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::SetWeather { weather: Weather::Sandstorm }),
    );
    dex.add_move(
        REFLECT,
        MoveData::new("Reflect", Psychic, Status, 0, None, 20)
            .with_target(Target::UserSide)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Screen { condition: SideCondition::Reflect }),
    );
    dex.add_move(
        LIGHT_SCREEN,
        MoveData::new("Light Screen", Psychic, Status, 0, None, 30)
            .with_target(Target::UserSide)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Screen { condition: SideCondition::LightScreen }),
    );
    dex.add_move(
        SAFEGUARD,
        MoveData::new("Safeguard", Normal, Status, 0, None, 25)
            .with_target(Target::UserSide)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Screen { condition: SideCondition::Safeguard }),
    );
    dex.add_move(
        HAZE,
        MoveData::new("Haze", Ice, Status, 0, None, 30)
            .with_target(Target::Field)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Haze),
    );
    dex.add_move(
        LEECH_SEED,
        MoveData::new("Leech Seed", Grass, Status, 0, Some(90), 10)
            .with_primary(Effect::LeechSeed),
    );
    dex.add_move(
        WRAP,
        MoveData::new("Wrap", Normal, Physical, 15, Some(90), 20).with_primary(Effect::Trap),
    );
    dex.add_move(
        CONFUSE_RAY,
        MoveData::new("Confuse Ray", Ghost, Status, 0, Some(100), 10)
            .with_primary(Effect::Confuse),
    );
    dex.add_move(
        BITE,
        MoveData::new("Bite", Dark, Physical, 60, Some(100), 25)
            .with_secondary(Effect::Flinch, 30),
    );
    dex.add_move(
        THUNDER_WAVE,
        MoveData::new("Thunder Wave", Electric, Status, 0, Some(100), 20)
            .with_primary(Effect::InflictStatus { status: StatusKind::Paralysis }),
    );
    dex.add_move(
        WILL_O_WISP,
        MoveData::new("Will-O-Wisp", Fire, Status, 0, Some(75), 15)
            .with_primary(Effect::InflictStatus { status: StatusKind::Burn }),
    );
    dex.add_move(
        ICE_BEAM,
        MoveData::new("Ice Beam", Ice, Special, 95, Some(100), 10)
            .with_secondary(Effect::InflictStatus { status: StatusKind::Freeze }, 10),
    );
    dex.add_move(
        EARTHQUAKE,
        MoveData::new("Earthquake", Ground, Physical, 100, Some(100), 10),
    );
    dex.add_move(
        FOCUS_ENERGY,
        MoveData::new("Focus Energy", Normal, Status, 0, None, 30)
            .with_target(Target::User)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::FocusEnergy),
    );
    dex.add_move(
        MIST_VEIL,
        MoveData::new("Mist Veil", Ice, Status, 0, None, 30)
            .with_target(Target::UserSide)
            .with_script(ScriptId::SelfStatus)
            .with_primary(Effect::Screen { condition: SideCondition::Mist }),
    );

    dex.add_species(
        PLAINRUNNER,
        SpeciesData::new(
            "Plainrunner",
            vec![Normal],
            BaseStats {
                hp: 80,
                attack: 80,
                defense: 80,
                sp_attack: 80,
                sp_defense: 80,
                speed: 80,
            },
        ),
    );

    dex
}

/// A level-50 battler with 200 HP, flat 100 stats and the given speed.
pub fn battler(
    dex: &Dex,
    name: &str,
    types: Vec<Element>,
    speed: u16,
    move_ids: &[MoveId],
) -> Battler {
    let slots = move_ids
        .iter()
        .map(|&move_id| MoveSlot {
            move_id,
            pp: dex
                .move_data(move_id)
                .map(|data| data.max_pp)
                .unwrap_or(5),
        })
        .collect();
    Battler::new_for_test(name, types, 50, [200, 100, 100, 100, 100, speed], slots)
}

/// Engine over a 1v1 with a scripted roll sequence.
pub fn engine_with_rolls<'d>(
    dex: &'d Dex,
    side_a: Battler,
    side_b: Battler,
    rolls: Vec<u8>,
) -> BattleEngine<'d> {
    engine_with_teams(dex, vec![side_a], vec![side_b], rolls)
}

/// Engine over full teams with a scripted roll sequence.
pub fn engine_with_teams<'d>(
    dex: &'d Dex,
    team_a: Vec<Battler>,
    team_b: Vec<Battler>,
    rolls: Vec<u8>,
) -> BattleEngine<'d> {
    let mut state = BattleState::new(
        SideState::new("Red", team_a),
        SideState::new("Blue", team_b),
        0,
    );
    state.rng = BattleRng::scripted(rolls);
    BattleEngine::new(dex, state)
}

/// Engine over a 1v1 with a real seeded source.
pub fn engine_seeded<'d>(
    dex: &'d Dex,
    side_a: Battler,
    side_b: Battler,
    seed: u64,
) -> BattleEngine<'d> {
    let state = BattleState::new(
        SideState::new("Red", vec![side_a]),
        SideState::new("Blue", vec![side_b]),
        seed,
    );
    BattleEngine::new(dex, state)
}
