//! Tests for the tokio-driven clock

use std::sync::Arc;
use std::time::Duration;

use robotic_cell::core::RoboticCell;
use robotic_cell::runtime::spawn_async_clock;
use robotic_cell::util::ResourceKind;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_clock_ticks_and_stops() {
    let cell = Arc::new(RoboticCell::new());
    cell.add_resource(ResourceKind::Robot, "r1").unwrap();
    let id = cell.assign_task("weld", 1, 0, 2).unwrap();

    let handle = spawn_async_clock(Arc::clone(&cell), Duration::from_millis(5));
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while cell.task(id).unwrap().remaining > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    handle.stop().await;

    assert!(waited.is_ok());
    assert_eq!(cell.idle_count(ResourceKind::Robot), 1);

    let ticks = cell.ticks();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(cell.ticks(), ticks);
}
