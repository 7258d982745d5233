//! Hazard Run map inspector
//!
//! Loads map files and reports what they place. With no arguments, every
//! level in the registry is loaded through the configured map directory.

use std::process::ExitCode;

use hazard_run::{BinaryMap, LevelContext, LevelId, LevelLayout, PlacementSummary, Settings};

fn report(name: &str, map: &BinaryMap, layout: &LevelLayout, summary: &PlacementSummary) {
    let grid = map.grid();
    println!("{name}");
    println!("  size:      {}x{}", grid.width(), grid.height());
    println!("  scale:     {}x{}", map.scale().x, map.scale().y);
    println!("  platforms: {}", summary.platforms);
    match layout.player_spawn {
        Some(pos) => println!("  spawn:     ({}, {})", pos.x, pos.y),
        None => println!("  spawn:     none"),
    }
    if summary.ignored > 0 {
        println!("  ignored:   {} cells", summary.ignored);
    }
}

fn inspect_files(paths: &[String]) -> bool {
    let mut ok = true;
    for path in paths {
        match BinaryMap::load(path) {
            Ok(map) => {
                let mut layout = LevelLayout::new();
                let summary = map.emit_placements(&mut layout);
                report(path, &map, &layout, &summary);
            }
            Err(e) => {
                log::error!("{}", e);
                ok = false;
            }
        }
    }
    ok
}

fn inspect_levels(settings: &Settings) -> bool {
    let mut ok = true;
    for id in LevelId::ALL {
        let mut level = LevelContext::new(id);
        let result = level.load(settings).and_then(|_| level.init());
        match (result, level.map(), level.layout()) {
            (Ok(summary), Some(map), Some(layout)) => report(id.as_str(), map, layout, &summary),
            (Err(e), _, _) => {
                log::error!("{}: {}", id.as_str(), e);
                ok = false;
            }
            _ => ok = false,
        }
        level.unload();
    }
    ok
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Hazard Run map inspector starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ok = if args.is_empty() {
        let settings = Settings::load_from(Settings::FILE_NAME);
        inspect_levels(&settings)
    } else {
        inspect_files(&args)
    };

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
