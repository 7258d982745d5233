//! Per-level state and lifecycle
//!
//! Everything a level owns lives in its `LevelContext`; nothing is kept in
//! module-level state. A context moves through:
//!
//! `Unloaded -> Loaded -> Running -> Freed -> (Running | Unloaded)`
//!
//! - load: read the map file
//! - init: build the layout from the map
//! - update: advance time, handle pause
//! - free: drop the built layout, keep the map for a restart
//! - unload: drop everything

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{LevelError, MapError};
use crate::map::{BinaryMap, PlacementSummary};
use crate::settings::Settings;
use crate::sink::LevelLayout;

/// The game's levels, in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    Tutorial,
    Level1,
    Level2,
    Level3,
}

impl LevelId {
    pub const ALL: [LevelId; 4] = [
        LevelId::Tutorial,
        LevelId::Level1,
        LevelId::Level2,
        LevelId::Level3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::Tutorial => "Tutorial",
            LevelId::Level1 => "Level 1",
            LevelId::Level2 => "Level 2",
            LevelId::Level3 => "Level 3",
        }
    }

    /// Map file name inside the settings' map directory
    pub fn map_file(&self) -> &'static str {
        match self {
            LevelId::Tutorial => "tutorial.txt",
            LevelId::Level1 => "level1.txt",
            LevelId::Level2 => "level2.txt",
            LevelId::Level3 => "level3.txt",
        }
    }

    /// Level that follows this one, `None` after the last
    pub fn next(&self) -> Option<Self> {
        match self {
            LevelId::Tutorial => Some(LevelId::Level1),
            LevelId::Level1 => Some(LevelId::Level2),
            LevelId::Level2 => Some(LevelId::Level3),
            LevelId::Level3 => None,
        }
    }
}

/// Where a level is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// No map in memory
    Unloaded,
    /// Map read, layout not built yet
    Loaded,
    /// Layout built, level is live
    Running,
    /// Layout dropped, map kept for re-init
    Freed,
}

/// Input consumed by `LevelContext::update`
#[derive(Debug, Clone, Default)]
pub struct LevelInput {
    /// Pause key pressed this frame
    pub toggle_pause: bool,
}

/// All state owned by one level
#[derive(Debug)]
pub struct LevelContext {
    id: LevelId,
    phase: LevelPhase,
    paused: bool,
    /// Seconds of unpaused play since init
    elapsed: f32,
    map: Option<BinaryMap>,
    layout: Option<LevelLayout>,
}

impl LevelContext {
    pub fn new(id: LevelId) -> Self {
        Self {
            id,
            phase: LevelPhase::Unloaded,
            paused: false,
            elapsed: 0.0,
            map: None,
            layout: None,
        }
    }

    fn expect_phase(&self, allowed: &[LevelPhase], action: &'static str) -> Result<(), LevelError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(LevelError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }

    /// Read this level's map
    pub fn load(&mut self, settings: &Settings) -> Result<(), LevelError> {
        self.expect_phase(&[LevelPhase::Unloaded], "load")?;

        let map = Self::read_map(self.id, settings)?;
        if settings.strict_cells {
            map.validate_cells()?;
        }

        log::info!("{} loaded", self.id.as_str());
        self.map = Some(map);
        self.phase = LevelPhase::Loaded;
        Ok(())
    }

    fn read_map(id: LevelId, settings: &Settings) -> Result<BinaryMap, MapError> {
        let candidates = settings.map_candidates(id.map_file());
        let last = candidates.len().saturating_sub(1);
        for (i, path) in candidates.iter().enumerate() {
            match BinaryMap::load(path) {
                Err(MapError::FileNotFound { .. }) if i < last => {
                    log::debug!("No map at {}, trying next candidate", path.display());
                }
                result => return result,
            }
        }
        Err(MapError::FileNotFound {
            path: settings.map_path(id.map_file()),
        })
    }

    /// Build the layout from the loaded map
    pub fn init(&mut self) -> Result<PlacementSummary, LevelError> {
        self.expect_phase(&[LevelPhase::Loaded, LevelPhase::Freed], "init")?;
        let Some(map) = self.map.as_ref() else {
            return Err(LevelError::InvalidTransition {
                from: self.phase,
                action: "init",
            });
        };

        let mut layout = LevelLayout::new();
        let summary = map.emit_placements(&mut layout);
        if layout.player_spawn.is_none() {
            log::warn!("{} has no hero spawn", self.id.as_str());
        }

        self.layout = Some(layout);
        self.paused = false;
        self.elapsed = 0.0;
        self.phase = LevelPhase::Running;
        Ok(summary)
    }

    /// Per-frame update
    pub fn update(&mut self, dt: f32, input: &LevelInput) -> Result<(), LevelError> {
        self.expect_phase(&[LevelPhase::Running], "update")?;

        if input.toggle_pause {
            self.paused = !self.paused;
            log::debug!("{} paused: {}", self.id.as_str(), self.paused);
        }
        if !self.paused {
            self.elapsed += dt;
        }
        Ok(())
    }

    /// Drop the built layout, keeping the map
    pub fn free(&mut self) -> Result<(), LevelError> {
        self.expect_phase(&[LevelPhase::Running], "free")?;
        self.layout = None;
        self.paused = false;
        self.phase = LevelPhase::Freed;
        Ok(())
    }

    /// Drop everything this level holds
    pub fn unload(&mut self) {
        if self.phase != LevelPhase::Unloaded {
            log::info!("{} unloaded", self.id.as_str());
        }
        *self = Self::new(self.id);
    }

    #[inline]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[inline]
    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn map(&self) -> Option<&BinaryMap> {
        self.map.as_ref()
    }

    pub fn layout(&self) -> Option<&LevelLayout> {
        self.layout.as_ref()
    }

    pub fn player_spawn(&self) -> Option<Vec2> {
        self.layout.as_ref().and_then(|l| l.player_spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const TUTORIAL: &str = "Width 3\nHeight 2\nScaleX 64\nScaleY 64\n1 0 2\n1 1 1\n";

    fn map_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hazard_run_level_{}_{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn settings_with(dir: PathBuf) -> Settings {
        Settings {
            map_dir: dir,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let dir = map_dir("lifecycle");
        fs::write(dir.join("tutorial.txt"), TUTORIAL).unwrap();
        let settings = settings_with(dir.clone());

        let mut level = LevelContext::new(LevelId::Tutorial);
        assert_eq!(level.phase(), LevelPhase::Unloaded);

        level.load(&settings).unwrap();
        assert_eq!(level.phase(), LevelPhase::Loaded);
        assert!(level.layout().is_none());

        let summary = level.init().unwrap();
        assert_eq!(summary.platforms, 4);
        assert_eq!(level.player_spawn(), Some(Vec2::new(160.0, 32.0)));

        level.free().unwrap();
        assert_eq!(level.phase(), LevelPhase::Freed);
        assert!(level.layout().is_none());
        assert!(level.map().is_some());

        // Restart from the kept map
        level.init().unwrap();
        assert_eq!(level.layout().map(|l| l.platforms.len()), Some(4));

        level.unload();
        assert_eq!(level.phase(), LevelPhase::Unloaded);
        assert!(level.map().is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_pause_stops_time() {
        let dir = map_dir("pause");
        fs::write(dir.join("level1.txt"), TUTORIAL).unwrap();
        let mut level = LevelContext::new(LevelId::Level1);
        level.load(&settings_with(dir.clone())).unwrap();
        level.init().unwrap();

        level.update(0.5, &LevelInput::default()).unwrap();
        assert!((level.elapsed() - 0.5).abs() < 1e-6);

        let pause = LevelInput { toggle_pause: true };
        level.update(0.5, &pause).unwrap();
        assert!(level.is_paused());
        level.update(0.5, &LevelInput::default()).unwrap();
        assert!((level.elapsed() - 0.5).abs() < 1e-6);

        level.update(0.25, &pause).unwrap();
        assert!(!level.is_paused());
        assert!((level.elapsed() - 0.75).abs() < 1e-6);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_map_fails_load() {
        let dir = map_dir("missing");
        let mut level = LevelContext::new(LevelId::Level3);
        let err = level.load(&settings_with(dir.clone())).unwrap_err();
        assert!(matches!(err, LevelError::Map(MapError::FileNotFound { .. })));
        assert_eq!(level.phase(), LevelPhase::Unloaded);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_keyed_map_preferred_with_fallback() {
        let dir = map_dir("keyed");
        fs::write(dir.join("level2.txt"), TUTORIAL).unwrap();
        let mut settings = settings_with(dir.clone());
        settings.prefer_keyed_format = true;

        // No JSON yet: falls back to the legacy file
        let mut level = LevelContext::new(LevelId::Level2);
        level.load(&settings).unwrap();
        assert_eq!(level.map().map(|m| m.grid().width()), Some(3));
        level.unload();

        fs::write(
            dir.join("level2.json"),
            r#"{"width": 1, "height": 1, "scale": [8, 8], "rows": [[2]]}"#,
        )
        .unwrap();
        level.load(&settings).unwrap();
        level.init().unwrap();
        assert_eq!(level.player_spawn(), Some(Vec2::new(4.0, 4.0)));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_strict_cells_rejects_unknown_codes() {
        let dir = map_dir("strict");
        fs::write(
            dir.join("tutorial.txt"),
            "Width 2\nHeight 1\nScaleX 1\nScaleY 1\n1 9\n",
        )
        .unwrap();
        let mut settings = settings_with(dir.clone());

        let mut level = LevelContext::new(LevelId::Tutorial);
        level.load(&settings).unwrap();
        level.unload();

        settings.strict_cells = true;
        let err = level.load(&settings).unwrap_err();
        assert!(matches!(
            err,
            LevelError::Map(MapError::UnknownCellCode { code: 9, .. })
        ));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut level = LevelContext::new(LevelId::Tutorial);
        assert!(matches!(
            level.init(),
            Err(LevelError::InvalidTransition {
                from: LevelPhase::Unloaded,
                action: "init"
            })
        ));
        assert!(level.update(0.1, &LevelInput::default()).is_err());
        assert!(level.free().is_err());
    }

    #[test]
    fn test_level_order() {
        let mut id = LevelId::Tutorial;
        let mut order = vec![id];
        while let Some(next) = id.next() {
            order.push(next);
            id = next;
        }
        assert_eq!(order, LevelId::ALL.to_vec());
    }
}
