//! # Robotic Cell
//!
//! Resource allocation and progress tracking for a work cell staffed by
//! interchangeable robots and workers.
//!
//! The cell keeps three pieces of state behind a single lock:
//!
//! - **Fleet**: robots and workers, each `Idle` or `Working`, in insertion order
//! - **Task ledger**: every task ever assigned, counting down once per tick
//! - **Product pipeline**: multi-stage products whose stages run one at a time
//!
//! A progress clock ticks the cell once per interval. Each tick first counts
//! every running task down by one second, releasing the resources of tasks
//! that reach zero, and only then advances products, so a stage sees its
//! task finish in the same tick.
//!
//! ## Example
//!
//! ```
//! use robotic_cell::core::{RoboticCell, StageSpec};
//! use robotic_cell::util::ResourceKind;
//!
//! let cell = RoboticCell::new();
//! cell.add_resource(ResourceKind::Robot, "arm-1").unwrap();
//! cell.add_resource(ResourceKind::Worker, "ann").unwrap();
//!
//! let product = cell
//!     .define_product(
//!         "gearbox",
//!         vec![StageSpec::new("weld", 1, 0, 2), StageSpec::new("inspect", 0, 1, 1)],
//!     )
//!     .unwrap();
//!
//! for _ in 0..4 {
//!     cell.tick();
//! }
//! assert_eq!(cell.product(product).unwrap().current_stage, 2);
//! ```
//!
//! In a running process, share the cell through an `Arc` with a
//! [`core::ProgressClock`] (or [`runtime::spawn_async_clock`] inside tokio)
//! and drive it from [`runtime::Menu`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Allocation engine, ledger, pipeline and clock.
pub mod core;
/// Configuration models for the cell and clock.
pub mod config;
/// Builders to construct a cell from configuration.
pub mod builders;
/// Operator surface: request parsing, menu, async clock.
pub mod runtime;
/// Shared utilities.
pub mod util;
