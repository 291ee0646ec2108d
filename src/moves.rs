use crate::battler::Stat;
use crate::types::{Element, SideCondition, Weather};
use serde::{Deserialize, Serialize};

/// Identifier for a move entry in the dex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// What a move is aimed at. Singles format, so `Foe` resolves to the
/// opposing active battler and side-wide selectors to whole sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Foe,
    User,
    UserSide,
    FoeSide,
    Field,
}

/// Which command pipeline the interpreter runs for a move.
///
/// The vocabulary is closed: every move names one of these, and the library
/// owns the actual command sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptId {
    /// Full damaging pipeline with accuracy check
    Standard,
    /// Damaging pipeline that never misses
    SureHit,
    /// Non-damaging move aimed at the foe (accuracy still applies)
    Status,
    /// Non-damaging move aimed at the user or the field (no accuracy check)
    SelfStatus,
    /// Damage set by the primary effect instead of the damage formula
    FixedDamage,
    /// Standard pipeline, but a miss rebounds on the user
    CrashOnMiss,
}

/// Non-volatile status a move can inflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Sleep,
    Poison,
    Toxic,
    Burn,
    Freeze,
    Paralysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedDamageKind {
    /// Always this exact amount
    Constant(u16),
    /// Damage equal to the user's level
    UserLevel,
    /// Half the target's current HP, minimum 1
    HalfTargetHp,
}

/// One effect a move can carry, primary or secondary.
///
/// A closed tagged set dispatched by exhaustive matching in the applier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    RaiseStat { stat: Stat, stages: i8 },
    LowerStat { stat: Stat, stages: i8 },
    InflictStatus { status: StatusKind },
    Flinch,
    Confuse,
    LeechSeed,
    Trap,
    Substitute,
    Protect,
    Endure,
    FocusEnergy,
    Heal { numerator: u8, denominator: u8 },
    Rest,
    SetWeather { weather: Weather },
    Screen { condition: SideCondition },
    Haze,
    FixedDamage { kind: FixedDamageKind },
    Drain,
    Recoil { numerator: u8, denominator: u8 },
    FutureSight,
    Wish,
}

/// A secondary effect with its independent trigger chance (percent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryEffect {
    pub effect: Effect,
    pub chance: u8,
}

/// Immutable move definition, supplied by the data-loading layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub element: Element,
    pub category: MoveCategory,
    pub power: u16,
    /// None means the move bypasses the accuracy check entirely
    pub accuracy: Option<u8>,
    pub priority: i8,
    pub max_pp: u8,
    pub target: Target,
    /// Extra critical-hit stages granted by the move itself
    pub crit_bonus: u8,
    pub affected_by_protect: bool,
    pub script: ScriptId,
    pub primary: Option<Effect>,
    pub secondary: Vec<SecondaryEffect>,
}

impl MoveData {
    pub fn new(
        name: &str,
        element: Element,
        category: MoveCategory,
        power: u16,
        accuracy: Option<u8>,
        max_pp: u8,
    ) -> Self {
        MoveData {
            name: name.to_string(),
            element,
            category,
            power,
            accuracy,
            priority: 0,
            max_pp,
            target: Target::Foe,
            crit_bonus: 0,
            affected_by_protect: true,
            script: if category == MoveCategory::Status {
                ScriptId::Status
            } else {
                ScriptId::Standard
            },
            primary: None,
            secondary: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_script(mut self, script: ScriptId) -> Self {
        self.script = script;
        self
    }

    pub fn with_primary(mut self, effect: Effect) -> Self {
        self.primary = Some(effect);
        self
    }

    pub fn with_secondary(mut self, effect: Effect, chance: u8) -> Self {
        self.secondary.push(SecondaryEffect { effect, chance });
        self
    }

    pub fn with_crit_bonus(mut self, bonus: u8) -> Self {
        self.crit_bonus = bonus;
        self
    }

    pub fn unaffected_by_protect(mut self) -> Self {
        self.affected_by_protect = false;
        self
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status
    }
}
