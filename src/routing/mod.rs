//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup by method)
//!     → matcher.rs (template match, parameter binding)
//!     → Return: matched Route + PathParams, or NoMatch
//!
//! Route Compilation (at startup):
//!     (method, template, handler)[]
//!     → Compile templates into segments
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use matcher::{PathParams, PathTemplate};
pub use router::{Route, RouteMatch, Router};
