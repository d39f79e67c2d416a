//! Configuration models for the cell and its clock.

pub mod cell;

pub use cell::{CellConfig, CONFIG_PATH_ENV, TICK_MS_ENV};
