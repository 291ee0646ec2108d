use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Identifier for a species entry in the dex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u16);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }
}

/// Immutable species definition, supplied by the data-loading layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub name: String,
    pub types: Vec<Element>,
    pub base_stats: BaseStats,
}

impl SpeciesData {
    pub fn new(name: &str, types: Vec<Element>, base_stats: BaseStats) -> Self {
        SpeciesData {
            name: name.to_string(),
            types,
            base_stats,
        }
    }
}
