//! Operator-facing surface: request parsing, the text menu and async drivers.

pub mod api;
pub mod menu;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_clock;

pub use api::{Confirmation, ProductRequest, TaskRequest};
pub use menu::{render_status, Menu};
#[cfg(feature = "tokio-runtime")]
pub use tokio_clock::{spawn_async_clock, AsyncClockHandle};
