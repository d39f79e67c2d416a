//! `robotic-cell`: interactive manager for a robotic work cell.
//!
//! Configuration comes from the environment (see [`CellConfig::from_env`]).
//! The progress clock runs on its own thread for the lifetime of the menu.

use std::io;

use robotic_cell::builders::CellBuilder;
use robotic_cell::config::CellConfig;
use robotic_cell::core::{AppResult, ChannelEventSink};
use robotic_cell::runtime::Menu;
use robotic_cell::util::init_tracing;

fn main() -> AppResult<()> {
    init_tracing();
    let config = CellConfig::from_env()?;
    tracing::info!(
        tick_interval_ms = config.tick_interval_ms,
        robots = config.robots.len(),
        workers = config.workers.len(),
        "starting robotic cell"
    );

    let (notice_tx, notice_rx) = crossbeam_channel::unbounded();
    let (cell, clock) = CellBuilder::new(config)
        .with_event_sink(Box::new(ChannelEventSink::new(notice_tx)))
        .start()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = Menu::new(&cell, stdin.lock(), stdout.lock())
        .with_notices(notice_rx)
        .run();

    clock.stop();
    result?;
    Ok(())
}
