//! Hazard Run - level maps and per-level state for a 2D platform/trap game
//!
//! Core modules:
//! - `map`: Map file parsing (legacy fixed-offset text and keyed JSON) and placement
//! - `sink`: Level construction interface the map reports placements to
//! - `level`: Per-level context and load/init/update/free/unload lifecycle
//! - `settings`: Loader configuration
//! - `error`: Error kinds for map loading and level transitions

pub mod error;
pub mod level;
pub mod map;
pub mod settings;
pub mod sink;

pub use error::{LevelError, MapError};
pub use level::{LevelContext, LevelId, LevelInput, LevelPhase};
pub use map::{BinaryMap, CellCode, Grid, MapFormat, Placement, PlacementSummary};
pub use settings::Settings;
pub use sink::{LevelLayout, LevelSink};
