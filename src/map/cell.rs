//! Grid cell codes
//!
//! The map files store plain integers. Only a handful carry meaning for
//! level construction; everything else is treated as empty space.

use serde::{Deserialize, Serialize};

/// What occupies a single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellCode {
    /// Nothing placed (also covers any unrecognized code)
    #[default]
    Empty,
    /// A platform tile
    Platform,
    /// Player spawn point
    HeroSpawn,
}

impl CellCode {
    pub const EMPTY: i32 = 0;
    pub const PLATFORM: i32 = 1;
    pub const HERO_SPAWN: i32 = 2;

    /// Interpret a raw code, mapping unknown values to `Empty`
    pub fn from_code(code: i32) -> Self {
        Self::try_from_code(code).unwrap_or(CellCode::Empty)
    }

    /// Interpret a raw code, `None` if it has no defined meaning
    pub fn try_from_code(code: i32) -> Option<Self> {
        match code {
            Self::EMPTY => Some(CellCode::Empty),
            Self::PLATFORM => Some(CellCode::Platform),
            Self::HERO_SPAWN => Some(CellCode::HeroSpawn),
            _ => None,
        }
    }

    /// Raw integer written to map files
    pub fn code(&self) -> i32 {
        match self {
            CellCode::Empty => Self::EMPTY,
            CellCode::Platform => Self::PLATFORM,
            CellCode::HeroSpawn => Self::HERO_SPAWN,
        }
    }

    /// Whether `code` is one of the defined values
    #[inline]
    pub fn is_known(code: i32) -> bool {
        Self::try_from_code(code).is_some()
    }
}
