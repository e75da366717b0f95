//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all dispatch)
//!     → routing (method + path template → handler, params)
//!     → request.rs (buffered body, JSON decoding)
//!     → handlers.rs (device operations against the tenant store)
//!     → response.rs / error.rs (status + optional JSON body)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use request::RouteRequest;
pub use response::Reply;
pub use server::{AppState, HttpServer};
