use crate::errors::{DataError, DataResult};
use crate::moves::{MoveData, MoveId};
use crate::species::{SpeciesData, SpeciesId};
use crate::types::TypeChart;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Registry of the static data a battle consumes: move table, species table
/// and the type chart.
///
/// The engine never owns this data; a `Dex` is built by the surrounding
/// application (from code or from RON files) and borrowed for the battle's
/// lifetime. Every lookup by identifier is fallible: a missing entry is a
/// `DataError`, fatal for the single action that needed it.
#[derive(Debug, Clone, Default)]
pub struct Dex {
    moves: HashMap<MoveId, MoveData>,
    species: HashMap<SpeciesId, SpeciesData>,
    chart: TypeChart,
}

impl Dex {
    pub fn new() -> Self {
        Dex::default()
    }

    pub fn with_chart(chart: TypeChart) -> Self {
        Dex {
            moves: HashMap::new(),
            species: HashMap::new(),
            chart,
        }
    }

    pub fn add_move(&mut self, id: MoveId, data: MoveData) {
        self.moves.insert(id, data);
    }

    pub fn add_species(&mut self, id: SpeciesId, data: SpeciesData) {
        self.species.insert(id, data);
    }

    pub fn move_data(&self, id: MoveId) -> DataResult<&MoveData> {
        self.moves.get(&id).ok_or(DataError::UnknownMove(id))
    }

    pub fn species(&self, id: SpeciesId) -> DataResult<&SpeciesData> {
        self.species.get(&id).ok_or(DataError::UnknownSpecies(id))
    }

    pub fn chart(&self) -> &TypeChart {
        &self.chart
    }

    /// Parse a dex document from a RON string. The type chart stays the
    /// stock one unless the document overrides it.
    pub fn from_ron_str(source: &str) -> Result<Self, ron::error::SpannedError> {
        let doc: DexDocument = ron::from_str(source)?;
        Ok(doc.into_dex())
    }

    /// Load a dex document from a RON file on disk.
    pub fn from_ron_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let dex = Self::from_ron_str(&content)?;
        Ok(dex)
    }
}

/// On-disk shape of a dex: id/data pairs, since RON maps keyed by newtypes
/// are awkward to hand-author.
#[derive(Debug, Serialize, Deserialize)]
struct DexDocument {
    #[serde(default)]
    moves: Vec<(u16, MoveData)>,
    #[serde(default)]
    species: Vec<(u16, SpeciesData)>,
}

impl DexDocument {
    fn into_dex(self) -> Dex {
        let mut dex = Dex::new();
        for (id, data) in self.moves {
            dex.add_move(MoveId(id), data);
        }
        for (id, data) in self.species {
            dex.add_species(SpeciesId(id), data);
        }
        dex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveCategory;
    use crate::types::Element;

    #[test]
    fn missing_entries_are_data_errors() {
        let dex = Dex::new();
        assert_eq!(
            dex.move_data(MoveId(7)).unwrap_err(),
            DataError::UnknownMove(MoveId(7))
        );
        assert_eq!(
            dex.species(SpeciesId(3)).unwrap_err(),
            DataError::UnknownSpecies(SpeciesId(3))
        );
    }

    #[test]
    fn loads_a_dex_from_ron() {
        let source = r#"(
            moves: [
                (1, (
                    name: "Slam",
                    element: Normal,
                    category: Physical,
                    power: 40,
                    accuracy: Some(100),
                    priority: 0,
                    max_pp: 35,
                    target: Foe,
                    crit_bonus: 0,
                    affected_by_protect: true,
                    script: Standard,
                    primary: None,
                    secondary: [],
                )),
            ],
            species: [
                (1, (
                    name: "Plainrunner",
                    types: [Normal],
                    base_stats: (
                        hp: 80,
                        attack: 80,
                        defense: 80,
                        sp_attack: 80,
                        sp_defense: 80,
                        speed: 80,
                    ),
                )),
            ],
        )"#;

        let dex = Dex::from_ron_str(source).expect("dex document should parse");
        let slam = dex.move_data(MoveId(1)).unwrap();
        assert_eq!(slam.name, "Slam");
        assert_eq!(slam.category, MoveCategory::Physical);
        assert_eq!(slam.accuracy, Some(100));

        let runner = dex.species(SpeciesId(1)).unwrap();
        assert_eq!(runner.types, vec![Element::Normal]);
        assert_eq!(runner.base_stats.speed, 80);
    }
}
