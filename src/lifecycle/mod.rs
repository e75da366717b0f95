//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Bind listener → Spawn server task → FakeErrol handle
//!
//! Shutdown (shutdown.rs):
//!     trigger() → graceful drain → server task exits
//!
//! Signals (signals.rs):
//!     SIGINT → trigger()
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{FakeErrol, StartError};
