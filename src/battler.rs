use crate::battle::conditions::{VolatileCondition, VolatileKind};
use crate::dex::Dex;
use crate::errors::DataResult;
use crate::moves::MoveId;
use crate::species::{SpeciesData, SpeciesId};
use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MAX_MOVES: usize = 4;
pub const MIN_STAT_STAGE: i8 = -6;
pub const MAX_STAT_STAGE: i8 = 6;

/// Battle stats that carry stages. HP has no stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl Stat {
    fn index(self) -> usize {
        match self {
            Stat::Attack => 0,
            Stat::Defense => 1,
            Stat::SpAttack => 2,
            Stat::SpDefense => 3,
            Stat::Speed => 4,
            Stat::Accuracy => 5,
            Stat::Evasion => 6,
        }
    }
}

/// Non-volatile status. A battler carries at most one; it persists across
/// switches, unlike volatile conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    /// Turns of sleep remaining
    Sleep(u8),
    Poison,
    /// Escalating poison; the counter grows each end of turn
    Toxic(u8),
    Burn,
    Freeze,
    Paralysis,
}

/// A learned move with its remaining PP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: MoveId,
    pub pp: u8,
}

/// Bounded stage modifiers, one per battle stat, always within [-6, +6].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages([i8; 7]);

impl StatStages {
    pub fn get(&self, stat: Stat) -> i8 {
        self.0[stat.index()]
    }

    pub fn set(&mut self, stat: Stat, stage: i8) {
        self.0[stat.index()] = stage.clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);
    }

    /// Apply a delta, clamped to the bounds. Returns (old, new).
    pub fn modify(&mut self, stat: Stat, delta: i8) -> (i8, i8) {
        let old = self.get(stat);
        let new = (old + delta).clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);
        self.0[stat.index()] = new;
        (old, new)
    }

    pub fn clear(&mut self) {
        self.0 = [0; 7];
    }
}

/// One combatant: computed stats, current HP, status, stages, movepool and
/// volatile conditions. Owned by a side's team; referenced by slot index
/// everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battler {
    pub name: String,
    pub species: SpeciesId,
    pub level: u8,
    pub types: Vec<Element>,
    /// HP, Attack, Defense, Sp. Attack, Sp. Defense, Speed
    stats: [u16; 6],
    hp: u16,
    pub moves: [Option<MoveSlot>; MAX_MOVES],
    pub status: Option<StatusCondition>,
    stages: StatStages,
    volatiles: HashMap<VolatileKind, VolatileCondition>,
}

impl Battler {
    /// Build a battler from dex data, with full PP on every move.
    pub fn from_species(
        dex: &Dex,
        species: SpeciesId,
        level: u8,
        move_ids: &[MoveId],
    ) -> DataResult<Self> {
        let data = dex.species(species)?;
        let stats = Self::calculate_stats(data, level, &[0; 6]);

        let mut moves = [const { None }; MAX_MOVES];
        for (i, &move_id) in move_ids.iter().take(MAX_MOVES).enumerate() {
            let move_data = dex.move_data(move_id)?;
            moves[i] = Some(MoveSlot {
                move_id,
                pp: move_data.max_pp,
            });
        }

        Ok(Battler {
            name: data.name.clone(),
            species,
            level,
            types: data.types.clone(),
            stats,
            hp: stats[0],
            moves,
            status: None,
            stages: StatStages::default(),
            volatiles: HashMap::new(),
        })
    }

    /// Construct a battler with exact stats, bypassing species derivation.
    pub fn new_for_test(
        name: &str,
        types: Vec<Element>,
        level: u8,
        stats: [u16; 6],
        moves: Vec<MoveSlot>,
    ) -> Self {
        let mut move_array = [const { None }; MAX_MOVES];
        for (i, slot) in moves.into_iter().take(MAX_MOVES).enumerate() {
            move_array[i] = Some(slot);
        }
        Battler {
            name: name.to_string(),
            species: SpeciesId(0),
            level,
            types,
            stats,
            hp: stats[0],
            moves: move_array,
            status: None,
            stages: StatStages::default(),
            volatiles: HashMap::new(),
        }
    }

    /// Stat derivation from base stats and level, no natures:
    /// HP   = (2*base + IV) * level / 100 + level + 10
    /// rest = (2*base + IV) * level / 100 + 5
    fn calculate_stats(data: &SpeciesData, level: u8, ivs: &[u8; 6]) -> [u16; 6] {
        let base = data.base_stats.as_array();
        let mut stats = [0u16; 6];
        for i in 0..6 {
            let core = (2 * base[i] as u32 + ivs[i] as u32) * level as u32 / 100;
            stats[i] = if i == 0 {
                (core + level as u32 + 10) as u16
            } else {
                (core + 5) as u16
            };
        }
        stats
    }

    // === HP ===

    pub fn max_hp(&self) -> u16 {
        self.stats[0]
    }

    pub fn current_hp(&self) -> u16 {
        self.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Subtract HP, clamped at zero. Returns the amount actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restore HP, clamped at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let restored = amount.min(self.max_hp() - self.hp);
        self.hp += restored;
        restored
    }

    pub fn set_hp(&mut self, hp: u16) {
        self.hp = hp.min(self.max_hp());
    }

    /// Drop to zero HP and shed everything a fainted battler cannot hold.
    pub fn faint(&mut self) {
        self.hp = 0;
        self.volatiles.clear();
        self.stages.clear();
    }

    // === Raw stats ===

    pub fn raw_stat(&self, stat: Stat) -> u16 {
        match stat {
            Stat::Attack => self.stats[1],
            Stat::Defense => self.stats[2],
            Stat::SpAttack => self.stats[3],
            Stat::SpDefense => self.stats[4],
            Stat::Speed => self.stats[5],
            // Accuracy and evasion have no base stat; stages apply to 100%
            Stat::Accuracy | Stat::Evasion => 100,
        }
    }

    // === Stat stages ===

    pub fn stage(&self, stat: Stat) -> i8 {
        self.stages.get(stat)
    }

    pub fn set_stage(&mut self, stat: Stat, stage: i8) {
        self.stages.set(stat, stage);
    }

    pub fn modify_stage(&mut self, stat: Stat, delta: i8) -> (i8, i8) {
        self.stages.modify(stat, delta)
    }

    pub fn clear_stages(&mut self) {
        self.stages.clear();
    }

    // === Status ===

    pub fn has_major_status(&self) -> bool {
        self.status.is_some()
    }

    // === Volatile conditions ===

    pub fn has_volatile(&self, kind: VolatileKind) -> bool {
        self.volatiles.contains_key(&kind)
    }

    pub fn volatile(&self, kind: VolatileKind) -> Option<&VolatileCondition> {
        self.volatiles.get(&kind)
    }

    pub fn volatile_mut(&mut self, kind: VolatileKind) -> Option<&mut VolatileCondition> {
        self.volatiles.get_mut(&kind)
    }

    pub fn set_volatile(&mut self, condition: VolatileCondition) {
        self.volatiles.insert(condition.kind(), condition);
    }

    pub fn remove_volatile(&mut self, kind: VolatileKind) -> Option<VolatileCondition> {
        self.volatiles.remove(&kind)
    }

    pub fn clear_volatiles(&mut self) {
        self.volatiles.clear();
    }

    /// End-of-turn tick over every volatile condition.
    /// Returns the conditions that expired, in no particular order.
    pub fn tick_volatiles(&mut self) -> Vec<VolatileCondition> {
        let mut expired = Vec::new();
        self.volatiles.retain(|_, condition| {
            if condition.tick() {
                expired.push(condition.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    // === Moves ===

    pub fn move_slot(&self, index: usize) -> Option<&MoveSlot> {
        self.moves.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn move_slot_mut(&mut self, index: usize) -> Option<&mut MoveSlot> {
        self.moves.get_mut(index).and_then(|slot| slot.as_mut())
    }
}
