use serde::{Deserialize, Serialize};

/// Volatile conditions: battler state that clears on switch-out or faint,
/// as opposed to the single non-volatile status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatileCondition {
    /// Cancels the next action this turn; wiped at end of turn
    Flinched,
    /// Counts down each time the battler tries to act
    Confused { turns_remaining: u8 },
    /// A decoy that soaks damage until its own HP runs out
    Substitute { hp: u16 },
    /// Blocks protect-affected moves for the rest of the turn
    Protected,
    /// The next lethal hit this turn leaves the battler at 1 HP
    Enduring,
    /// Drained each end of turn, feeding the opposing active battler
    Seeded,
    /// Chip damage each end of turn while the timer runs
    Trapped { turns_remaining: u8 },
    /// Raised critical-hit stage until switch-out
    FocusEnergy,
}

/// Condition discriminant without payload, for lookups and removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatileKind {
    Flinched,
    Confused,
    Substitute,
    Protected,
    Enduring,
    Seeded,
    Trapped,
    FocusEnergy,
}

impl VolatileCondition {
    pub fn kind(&self) -> VolatileKind {
        match self {
            VolatileCondition::Flinched => VolatileKind::Flinched,
            VolatileCondition::Confused { .. } => VolatileKind::Confused,
            VolatileCondition::Substitute { .. } => VolatileKind::Substitute,
            VolatileCondition::Protected => VolatileKind::Protected,
            VolatileCondition::Enduring => VolatileKind::Enduring,
            VolatileCondition::Seeded => VolatileKind::Seeded,
            VolatileCondition::Trapped { .. } => VolatileKind::Trapped,
            VolatileCondition::FocusEnergy => VolatileKind::FocusEnergy,
        }
    }

    /// End-of-turn bookkeeping for one condition.
    ///
    /// Returns `true` when the condition has expired and should be removed.
    /// `Flinched`, `Protected` and `Enduring` only ever last the turn they
    /// were set; timered conditions count down and expire at zero.
    pub fn tick(&mut self) -> bool {
        match self {
            VolatileCondition::Flinched
            | VolatileCondition::Protected
            | VolatileCondition::Enduring => true,
            VolatileCondition::Trapped { turns_remaining } => {
                *turns_remaining = turns_remaining.saturating_sub(1);
                *turns_remaining == 0
            }
            // Confusion counts down on action attempts, not at end of turn
            VolatileCondition::Confused { .. } => false,
            VolatileCondition::Substitute { .. }
            | VolatileCondition::Seeded
            | VolatileCondition::FocusEnergy => false,
        }
    }
}
