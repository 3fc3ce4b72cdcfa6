//! Lifecycle management.
//!
//! Startup lives in `main.rs` (config → logging → metrics → listener → server);
//! shutdown is a broadcast coordinator plus Ctrl+C.

pub mod shutdown;

pub use shutdown::{shutdown_signal, Shutdown};
