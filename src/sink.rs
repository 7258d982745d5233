//! Level construction sink
//!
//! The map loader doesn't know about entities; it reports what goes where
//! and the level decides how to build it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Receives placement calls while a map is walked
pub trait LevelSink {
    /// A platform tile centered at `position` (world units)
    fn add_platform(&mut self, position: Vec2);

    /// Where the player starts; later calls overwrite earlier ones
    fn set_player_initial_position(&mut self, position: Vec2);
}

/// Records placements in call order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub platforms: Vec<Vec2>,
    pub player_spawn: Option<Vec2>,
}

impl LevelLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.player_spawn.is_none()
    }
}

impl LevelSink for LevelLayout {
    fn add_platform(&mut self, position: Vec2) {
        self.platforms.push(position);
    }

    fn set_player_initial_position(&mut self, position: Vec2) {
        self.player_spawn = Some(position);
    }
}
