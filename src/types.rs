use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Elemental types for battlers and moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
}

/// Field-wide weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Rain,
    Sun,
    Sandstorm,
    Hail,
}

/// Conditions that protect one side of the field for a number of turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    Safeguard,
    Mist,
}

// Effectiveness multipliers are fixed-point x10 so damage math stays integral.
pub const EFF_NO_EFFECT: u8 = 0;
pub const EFF_NOT_VERY: u8 = 5;
pub const EFF_NORMAL: u8 = 10;
pub const EFF_SUPER: u8 = 20;

/// Lookup table of attack-type vs defend-type multipliers.
///
/// Pairs absent from the table are neutral (x10). A dual-typed defender
/// combines its two entries sequentially, so the combined factor is one of
/// 0, 2, 5, 10, 20 or 40.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeChart {
    entries: HashMap<(Element, Element), u8>,
}

impl TypeChart {
    /// Build a chart from explicit (attacker, defender, multiplier) triples.
    pub fn from_triples(triples: &[(Element, Element, u8)]) -> Self {
        let mut entries = HashMap::new();
        for &(attack, defend, multiplier) in triples {
            entries.insert((attack, defend), multiplier);
        }
        TypeChart { entries }
    }

    /// Multiplier (x10) for a single attack-type vs defend-type pairing.
    pub fn effectiveness(&self, attack: Element, defend: Element) -> u8 {
        self.entries
            .get(&(attack, defend))
            .copied()
            .unwrap_or(EFF_NORMAL)
    }

    /// Combined multiplier (x10) against a possibly dual-typed defender.
    pub fn against(&self, attack: Element, defender_types: &[Element]) -> u8 {
        let mut combined = EFF_NORMAL as u32;
        let mut seen_first: Option<Element> = None;
        for &defend in defender_types {
            if seen_first == Some(defend) {
                continue;
            }
            if seen_first.is_none() {
                seen_first = Some(defend);
            }
            combined = combined * self.effectiveness(attack, defend) as u32 / 10;
        }
        combined as u8
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        TypeChart::from_triples(DEFAULT_CHART)
    }
}

use Element::*;

/// The stock chart. Every non-neutral matchup, one triple per pairing.
const DEFAULT_CHART: &[(Element, Element, u8)] = &[
    (Normal, Rock, EFF_NOT_VERY),
    (Normal, Steel, EFF_NOT_VERY),
    (Normal, Ghost, EFF_NO_EFFECT),
    (Fighting, Normal, EFF_SUPER),
    (Fighting, Rock, EFF_SUPER),
    (Fighting, Steel, EFF_SUPER),
    (Fighting, Ice, EFF_SUPER),
    (Fighting, Dark, EFF_SUPER),
    (Fighting, Flying, EFF_NOT_VERY),
    (Fighting, Poison, EFF_NOT_VERY),
    (Fighting, Bug, EFF_NOT_VERY),
    (Fighting, Psychic, EFF_NOT_VERY),
    (Fighting, Ghost, EFF_NO_EFFECT),
    (Flying, Fighting, EFF_SUPER),
    (Flying, Bug, EFF_SUPER),
    (Flying, Grass, EFF_SUPER),
    (Flying, Rock, EFF_NOT_VERY),
    (Flying, Steel, EFF_NOT_VERY),
    (Flying, Electric, EFF_NOT_VERY),
    (Poison, Grass, EFF_SUPER),
    (Poison, Poison, EFF_NOT_VERY),
    (Poison, Ground, EFF_NOT_VERY),
    (Poison, Rock, EFF_NOT_VERY),
    (Poison, Ghost, EFF_NOT_VERY),
    (Poison, Steel, EFF_NO_EFFECT),
    (Ground, Poison, EFF_SUPER),
    (Ground, Rock, EFF_SUPER),
    (Ground, Steel, EFF_SUPER),
    (Ground, Fire, EFF_SUPER),
    (Ground, Electric, EFF_SUPER),
    (Ground, Bug, EFF_NOT_VERY),
    (Ground, Grass, EFF_NOT_VERY),
    (Ground, Flying, EFF_NO_EFFECT),
    (Rock, Flying, EFF_SUPER),
    (Rock, Bug, EFF_SUPER),
    (Rock, Fire, EFF_SUPER),
    (Rock, Ice, EFF_SUPER),
    (Rock, Fighting, EFF_NOT_VERY),
    (Rock, Ground, EFF_NOT_VERY),
    (Rock, Steel, EFF_NOT_VERY),
    (Bug, Grass, EFF_SUPER),
    (Bug, Psychic, EFF_SUPER),
    (Bug, Dark, EFF_SUPER),
    (Bug, Fighting, EFF_NOT_VERY),
    (Bug, Flying, EFF_NOT_VERY),
    (Bug, Poison, EFF_NOT_VERY),
    (Bug, Ghost, EFF_NOT_VERY),
    (Bug, Steel, EFF_NOT_VERY),
    (Bug, Fire, EFF_NOT_VERY),
    (Ghost, Ghost, EFF_SUPER),
    (Ghost, Psychic, EFF_SUPER),
    (Ghost, Dark, EFF_NOT_VERY),
    (Ghost, Steel, EFF_NOT_VERY),
    (Ghost, Normal, EFF_NO_EFFECT),
    (Steel, Rock, EFF_SUPER),
    (Steel, Ice, EFF_SUPER),
    (Steel, Steel, EFF_NOT_VERY),
    (Steel, Fire, EFF_NOT_VERY),
    (Steel, Water, EFF_NOT_VERY),
    (Steel, Electric, EFF_NOT_VERY),
    (Fire, Grass, EFF_SUPER),
    (Fire, Ice, EFF_SUPER),
    (Fire, Bug, EFF_SUPER),
    (Fire, Steel, EFF_SUPER),
    (Fire, Fire, EFF_NOT_VERY),
    (Fire, Water, EFF_NOT_VERY),
    (Fire, Rock, EFF_NOT_VERY),
    (Fire, Dragon, EFF_NOT_VERY),
    (Water, Fire, EFF_SUPER),
    (Water, Ground, EFF_SUPER),
    (Water, Rock, EFF_SUPER),
    (Water, Water, EFF_NOT_VERY),
    (Water, Grass, EFF_NOT_VERY),
    (Water, Dragon, EFF_NOT_VERY),
    (Grass, Water, EFF_SUPER),
    (Grass, Ground, EFF_SUPER),
    (Grass, Rock, EFF_SUPER),
    (Grass, Fire, EFF_NOT_VERY),
    (Grass, Grass, EFF_NOT_VERY),
    (Grass, Poison, EFF_NOT_VERY),
    (Grass, Flying, EFF_NOT_VERY),
    (Grass, Bug, EFF_NOT_VERY),
    (Grass, Dragon, EFF_NOT_VERY),
    (Grass, Steel, EFF_NOT_VERY),
    (Electric, Water, EFF_SUPER),
    (Electric, Flying, EFF_SUPER),
    (Electric, Electric, EFF_NOT_VERY),
    (Electric, Grass, EFF_NOT_VERY),
    (Electric, Dragon, EFF_NOT_VERY),
    (Electric, Ground, EFF_NO_EFFECT),
    (Psychic, Fighting, EFF_SUPER),
    (Psychic, Poison, EFF_SUPER),
    (Psychic, Psychic, EFF_NOT_VERY),
    (Psychic, Steel, EFF_NOT_VERY),
    (Psychic, Dark, EFF_NO_EFFECT),
    (Ice, Grass, EFF_SUPER),
    (Ice, Ground, EFF_SUPER),
    (Ice, Flying, EFF_SUPER),
    (Ice, Dragon, EFF_SUPER),
    (Ice, Fire, EFF_NOT_VERY),
    (Ice, Water, EFF_NOT_VERY),
    (Ice, Ice, EFF_NOT_VERY),
    (Ice, Steel, EFF_NOT_VERY),
    (Dragon, Dragon, EFF_SUPER),
    (Dragon, Steel, EFF_NOT_VERY),
    (Dark, Ghost, EFF_SUPER),
    (Dark, Psychic, EFF_SUPER),
    (Dark, Fighting, EFF_NOT_VERY),
    (Dark, Dark, EFF_NOT_VERY),
    (Dark, Steel, EFF_NOT_VERY),
];
