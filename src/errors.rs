use crate::moves::MoveId;
use crate::species::SpeciesId;
use std::fmt;

/// Top-level error type for the battle engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A submitted action was rejected before the turn started
    Validation(ValidationError),
    /// Static data referenced by an action could not be resolved
    Data(DataError),
    /// `process_turn` was called before every awaited side submitted an action
    NotReady,
    /// The battle has already reached a terminal state
    BattleOver,
}

/// Errors raised while validating a submitted action. Nothing has been
/// mutated when one of these is returned; the caller resubmits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The battle is not currently accepting actions from this side
    NotAcceptingActions,
    /// Side index out of range
    InvalidSide(usize),
    /// This side already submitted an action this turn
    AlreadySubmitted,
    /// The acting battler has fainted
    BattlerFainted,
    /// Move slot index out of range or empty
    InvalidMoveSlot(usize),
    /// The chosen move has no PP remaining
    NoPpRemaining,
    /// Team slot index out of range or empty
    InvalidTeamSlot(usize),
    /// The switch target is already the active battler
    AlreadyActive,
    /// The switch target has fainted
    TargetFainted,
    /// A trapping condition prevents switching out
    Trapped,
    /// Only a replacement switch is legal for this side right now
    ReplacementRequired,
}

/// Errors raised when a static-data lookup fails mid-resolution.
/// Fatal for the single action that triggered them; the turn continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The move table has no entry for this identifier
    UnknownMove(MoveId),
    /// The species table has no entry for this identifier
    UnknownSpecies(SpeciesId),
    /// Battle state contradicts itself (e.g. PP reached the interpreter at 0)
    Inconsistent(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Validation(err) => write!(f, "validation error: {}", err),
            EngineError::Data(err) => write!(f, "data error: {}", err),
            EngineError::NotReady => write!(f, "not every side has submitted an action"),
            EngineError::BattleOver => write!(f, "the battle has already ended"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAcceptingActions => write!(f, "not accepting actions"),
            ValidationError::InvalidSide(side) => write!(f, "invalid side index: {}", side),
            ValidationError::AlreadySubmitted => write!(f, "action already submitted"),
            ValidationError::BattlerFainted => write!(f, "acting battler has fainted"),
            ValidationError::InvalidMoveSlot(slot) => write!(f, "invalid move slot: {}", slot),
            ValidationError::NoPpRemaining => write!(f, "move has no PP remaining"),
            ValidationError::InvalidTeamSlot(slot) => write!(f, "invalid team slot: {}", slot),
            ValidationError::AlreadyActive => write!(f, "battler is already active"),
            ValidationError::TargetFainted => write!(f, "cannot switch to a fainted battler"),
            ValidationError::Trapped => write!(f, "battler is trapped and cannot switch"),
            ValidationError::ReplacementRequired => {
                write!(f, "a replacement switch is required")
            }
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::UnknownMove(id) => write!(f, "unknown move: {:?}", id),
            DataError::UnknownSpecies(id) => write!(f, "unknown species: {:?}", id),
            DataError::Inconsistent(details) => write!(f, "inconsistent state: {}", details),
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for ValidationError {}
impl std::error::Error for DataError {}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation(err)
    }
}

impl From<DataError> for EngineError {
    fn from(err: DataError) -> Self {
        EngineError::Data(err)
    }
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;
