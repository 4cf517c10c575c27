//! The day-phase machine.
//!
//! The cycle is the single source of temporal truth for the shop: the day
//! counter, the current phase, and the one-way game-over latch. It only
//! moves one step at a time, and it refuses to move at all once the latch
//! closes. Loan settlement is orchestrated by the shop aggregate at the
//! selling boundary; this type just walks the phases.

use chaffer_types::enums::Phase;

use crate::error::EngineError;

/// Day counter and phase state for the shop.
///
/// A new shop starts on day 1 in the management phase so the first
/// wholesale buying round happens before the first morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCycle {
    day: u32,
    phase: Phase,
    game_over: bool,
}

impl DayCycle {
    /// Create the cycle at its starting position.
    pub const fn new() -> Self {
        Self {
            day: 1,
            phase: Phase::Management,
            game_over: false,
        }
    }

    /// Create a cycle at an explicit position (tests, scenario setup).
    pub const fn from_parts(day: u32, phase: Phase) -> Self {
        Self {
            day,
            phase,
            game_over: matches!(phase, Phase::GameOver),
        }
    }

    /// The current day, starting at 1.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// The current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the game-over latch has closed. One-way.
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Setting up ends; the shop opens.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PhaseViolation`] outside the setting-up phase.
    pub const fn begin_selling(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::SettingUp => {
                self.phase = Phase::Selling;
                Ok(())
            }
            phase => Err(EngineError::PhaseViolation {
                action: "open the shop",
                phase,
            }),
        }
    }

    /// Selling ends; the shop closes into management.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PhaseViolation`] outside the selling phase.
    pub const fn close_shop(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Selling => {
                self.phase = Phase::Management;
                Ok(())
            }
            phase => Err(EngineError::PhaseViolation {
                action: "close the shop",
                phase,
            }),
        }
    }

    /// Management ends; the next day begins in setting up.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PhaseViolation`] outside the management phase.
    pub const fn next_day(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Management => {
                self.day = self.day.saturating_add(1);
                self.phase = Phase::SettingUp;
                Ok(())
            }
            phase => Err(EngineError::PhaseViolation {
                action: "start the next day",
                phase,
            }),
        }
    }

    /// Close the game-over latch. Irreversible; every later transition is
    /// rejected by the caller checking [`Self::is_game_over`].
    pub const fn latch_game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.game_over = true;
    }
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_management_on_day_one() {
        let cycle = DayCycle::new();
        assert_eq!(cycle.day(), 1);
        assert_eq!(cycle.phase(), Phase::Management);
        assert!(!cycle.is_game_over());
    }

    #[test]
    fn full_round_trip_increments_day_once() {
        let mut cycle = DayCycle::from_parts(3, Phase::SettingUp);
        assert!(cycle.begin_selling().is_ok());
        assert_eq!(cycle.phase(), Phase::Selling);
        assert!(cycle.close_shop().is_ok());
        assert_eq!(cycle.phase(), Phase::Management);
        assert!(cycle.next_day().is_ok());
        assert_eq!(cycle.phase(), Phase::SettingUp);
        assert_eq!(cycle.day(), 4);
    }

    #[test]
    fn wrong_phase_transitions_rejected() {
        let mut cycle = DayCycle::from_parts(1, Phase::SettingUp);
        assert!(cycle.close_shop().is_err());
        assert!(cycle.next_day().is_err());
        assert_eq!(cycle.phase(), Phase::SettingUp);
    }

    #[test]
    fn latch_is_one_way() {
        let mut cycle = DayCycle::from_parts(7, Phase::Selling);
        cycle.latch_game_over();
        assert!(cycle.is_game_over());
        assert_eq!(cycle.phase(), Phase::GameOver);
        // No transition out of game over exists.
        assert!(cycle.begin_selling().is_err());
        assert!(cycle.close_shop().is_err());
        assert!(cycle.next_day().is_err());
        assert!(cycle.is_game_over());
    }

    #[test]
    fn from_parts_with_game_over_phase_latches() {
        let cycle = DayCycle::from_parts(9, Phase::GameOver);
        assert!(cycle.is_game_over());
    }
}
