//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request dispatch and handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to dispatch log events
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
