//! Fray: a deterministic turn-based creature combat engine.
//!
//! Two sides submit one action per turn; the engine validates them, works
//! out resolution order, runs each move through a fixed command pipeline,
//! processes end-of-turn effects and returns an ordered event log. All
//! randomness flows through a single seedable source owned by the battle
//! state, so a turn is bit-reproducible from its seed and inputs.
//!
//! Static data (moves, species, the type chart) lives in a [`Dex`] supplied
//! by the surrounding application; the engine only ever looks entries up by
//! identifier and treats missing ones as data errors.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod battler;
pub mod dex;
pub mod errors;
pub mod moves;
pub mod species;
pub mod types;

// --- PUBLIC API RE-EXPORTS ---

// Core engine entry points and per-turn output.
pub use battle::engine::{Action, BattleEngine, TurnReport};
pub use battle::state::{
    BattleEvent, BattleRng, BattleState, EventLog, SideState, TieBreakPolicy, TurnPhase,
};

// Runtime battle model.
pub use battle::conditions::{VolatileCondition, VolatileKind};
pub use battler::{Battler, MoveSlot, Stat, StatusCondition};

// Static data surface.
pub use dex::Dex;
pub use moves::{
    Effect, FixedDamageKind, MoveCategory, MoveData, MoveId, ScriptId, SecondaryEffect,
    StatusKind, Target,
};
pub use species::{BaseStats, SpeciesData, SpeciesId};
pub use types::{Element, SideCondition, TypeChart, Weather};

// Error and result types.
pub use errors::{DataError, DataResult, EngineError, EngineResult, ValidationError};
