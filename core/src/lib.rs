#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use event::*;
pub use random::*;
pub use reveal::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod event;
mod random;
mod reveal;
mod session;
mod types;

/// Board dimensions and hazard count for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub hazards: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, hazards: CellCount) -> Self {
        Self {
            rows,
            cols,
            hazards,
        }
    }

    /// Validated constructor, a board needs at least one hazard and one safe cell.
    pub fn new(rows: Coord, cols: Coord, hazards: CellCount) -> Result<Self> {
        Self::new_unchecked(rows, cols, hazards).validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.rows == 0 || self.cols == 0 || self.hazards == 0 {
            return Err(self.invalid());
        }
        if self.hazards >= self.total_cells() {
            return Err(self.invalid());
        }
        Ok(self)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(8, 8, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(16, 30, 99)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.hazards)
    }

    fn invalid(self) -> GameError {
        GameError::InvalidConfiguration {
            rows: self.rows,
            cols: self.cols,
            hazards: self.hazards,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::beginner(),
            Self::Intermediate => GameConfig::intermediate(),
            Self::Expert => GameConfig::expert(),
        }
    }
}

impl From<Preset> for GameConfig {
    fn from(preset: Preset) -> Self {
        preset.config()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitHazard,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitHazard => true,
            Won => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for preset in Preset::ALL {
            let config = preset.config();
            assert_eq!(config.validate(), Ok(config));
        }
        assert_eq!(GameConfig::expert().safe_cells(), 381);
    }

    #[test]
    fn rejects_hazards_filling_board() {
        assert_eq!(
            GameConfig::new(3, 3, 9),
            Err(GameError::InvalidConfiguration {
                rows: 3,
                cols: 3,
                hazards: 9
            })
        );
        assert!(GameConfig::new(3, 3, 8).is_ok());
    }

    #[test]
    fn rejects_empty_dimensions_and_no_hazards() {
        assert!(GameConfig::new(0, 3, 1).is_err());
        assert!(GameConfig::new(3, 0, 1).is_err());
        assert!(GameConfig::new(3, 3, 0).is_err());
    }

    #[test]
    fn config_serializes_as_plain_fields() {
        let json = serde_json::to_string(&GameConfig::beginner()).unwrap();
        assert_eq!(json, r#"{"rows":8,"cols":8,"hazards":10}"#);
    }
}
