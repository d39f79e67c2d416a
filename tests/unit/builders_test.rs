//! Tests for builder modules

use std::time::{Duration, Instant};

use robotic_cell::builders::CellBuilder;
use robotic_cell::config::CellConfig;
use robotic_cell::core::{CellEventKind, InMemoryEventSink};
use robotic_cell::util::ResourceKind;

#[test]
fn test_cell_builder_keeps_config() {
    let config = CellConfig {
        tick_interval_ms: 50,
        ..CellConfig::default()
    };
    let builder = CellBuilder::new(config);
    assert_eq!(builder.config().tick_interval_ms, 50);
}

#[test]
fn test_cell_builder_reports_seeded_fleet() {
    let sink = InMemoryEventSink::new(16);
    let config = CellConfig {
        robots: vec!["r1".into()],
        workers: vec!["w1".into()],
        ..CellConfig::default()
    };
    let cell = CellBuilder::new(config)
        .with_event_sink(Box::new(sink.clone()))
        .build()
        .unwrap();

    assert_eq!(cell.snapshot(ResourceKind::Robot).len(), 1);
    assert_eq!(
        sink.kinds(),
        vec![
            CellEventKind::ResourceAdded {
                kind: ResourceKind::Robot,
                id: "r1".into()
            },
            CellEventKind::ResourceAdded {
                kind: ResourceKind::Worker,
                id: "w1".into()
            },
        ]
    );
}

#[test]
fn test_cell_builder_start_runs_clock() {
    let config = CellConfig {
        tick_interval_ms: 5,
        ..CellConfig::default()
    };
    let (cell, clock) = CellBuilder::new(config).start().unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while cell.ticks() < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    clock.stop();
    assert!(cell.ticks() >= 2);
}
