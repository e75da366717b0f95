//! In-memory fake of the push notification device registration API.
//!
//! Serves the device endpoints a client SDK talks to (registration, token
//! updates, interests, user association) from per-instance in-memory
//! tables, so SDK integration tests can run against a real HTTP endpoint.

pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod store;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::{FakeErrol, Shutdown};
pub use store::TenantStore;
