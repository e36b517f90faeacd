use anyhow::{bail, Context};
use tilegrid::config::types::Config;
use tilegrid::gesture::{GestureController, GestureEffect};
use tilegrid::grid::{ItemId, Region, TilePos};
use tilegrid::workspace::Workspace;

fn main() {
    // Handle --print-default-config before any other initialization
    if std::env::args().any(|a| a == "--print-default-config") {
        print!("{}", Config::print_default());
        return;
    }

    env_logger::init();
    log::info!("tilegrid v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = match config_path_arg() {
        Some(path) => path,
        None => dirs_config_path(),
    };
    let config = match Config::load(&config_path) {
        Ok(cfg) => {
            log::info!("Config loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            log::warn!("Config load error ({}), using defaults", e);
            Config::default()
        }
    };
    log::info!(
        "Grid: {}x{}, tiles {}x{}px",
        config.grid.rows,
        config.grid.columns,
        config.geometry.tile_width_px,
        config.geometry.tile_height_px
    );

    if let Err(e) = run(&config) {
        log::error!("Demo error: {e:#}");
        std::process::exit(1);
    }
}

/// Two linked grids: resize an item through the gesture controller, then
/// drag it across to the second grid.
fn run(config: &Config) -> anyhow::Result<()> {
    let mut workspace = Workspace::new();
    let left = workspace.create_grid(config);
    let right = workspace.create_grid(config);
    workspace.link(left, right)?;

    let left_events = workspace.grid_mut(left)?.subscribe();
    let right_events = workspace.grid_mut(right)?.subscribe();

    let item = ItemId::next();
    workspace
        .grid_mut(left)?
        .place(item, Region::new(0, 0, 2, 1))
        .context("placing the demo item")?;

    // Resize: press on the east edge, drag one column to the right, release.
    let mut gestures = GestureController::from_config(&config.interaction);
    let anchor = TilePos::new(0, 0);
    let grid = workspace.grid_mut(left)?;
    let rect = grid.geometry().region_rect(&Region::new(0, 0, 2, 1));
    let edge_x = rect.width - 1.0;
    let target_x = rect.width + grid.geometry().column_pitch();
    gestures.on_pointer_down(grid, anchor, edge_x, rect.height / 2.0);
    gestures.on_pointer_move(grid, anchor, target_x, rect.height / 2.0);
    match gestures.on_pointer_up(grid, anchor, target_x, rect.height / 2.0) {
        GestureEffect::Resized(resolution) => println!("resized {item} to {}", resolution.region),
        other => bail!("resize gesture ended with {other:?}"),
    }

    // Drag: press in the interior, move past the threshold.
    let press = (rect.width / 2.0, rect.height / 2.0);
    gestures.on_pointer_down(grid, anchor, press.0, press.1);
    let (grab_row, grab_column) =
        match gestures.on_pointer_move(grid, anchor, press.0 + 20.0, press.1 + 20.0) {
            GestureEffect::StartDrag {
                grab_row_offset,
                grab_column_offset,
                ..
            } => (grab_row_offset, grab_column_offset),
            other => bail!("drag did not start: {other:?}"),
        };

    let payload = workspace.begin_drag(left, item, grab_row, grab_column)?.encode();
    println!("payload: {payload}");
    // Release over the centre of the right grid's cell (1 + grab_row, 1 + grab_column).
    let target = workspace.grid(right)?;
    let release = target.geometry().tile_rect(TilePos::new(1 + grab_row, 1 + grab_column));
    let pointer = target
        .cell_at_point(release.x + release.width / 2.0, release.y + release.height / 2.0)
        .context("release point is outside the right grid")?;
    let candidate = workspace.drag_over(right, &payload, pointer)?;
    println!("drop candidate on right grid: {candidate}");
    let moved = workspace.drop_payload(right, &payload, pointer)?;
    gestures.drag_finished();
    workspace.finish_drag(left)?;
    println!(
        "moved {} from ({}, {}) to ({}, {})",
        moved.item, moved.from_row, moved.from_column, moved.to_row, moved.to_column
    );

    println!("\nleft grid:\n{}", workspace.grid(left)?);
    println!("right grid:\n{}", workspace.grid(right)?);

    println!("left grid events:");
    for event in left_events.try_iter() {
        println!("  {event:?}");
    }
    println!("right grid events:");
    for event in right_events.try_iter() {
        println!("  {event:?}");
    }
    Ok(())
}

/// The value following `--config`, if given.
fn config_path_arg() -> Option<std::path::PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(std::path::PathBuf::from);
        }
    }
    None
}

/// Get the config file path (~/.config/tilegrid/config.toml).
fn dirs_config_path() -> std::path::PathBuf {
    dirs_home().join(".config").join("tilegrid").join("config.toml")
}

/// Get the user's home directory.
fn dirs_home() -> std::path::PathBuf {
    std::env::var("HOME")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
}
