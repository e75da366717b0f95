//! In-memory device state.
//!
//! # Data Flow
//! ```text
//! instanceId (from path)
//!     → tenant.rs (TenantStore::table_for, auto-create)
//!     → device.rs (DeviceTable operations under one lock)
//!     → Device snapshot or StoreError
//! ```
//!
//! # Design Decisions
//! - Nothing is persisted; state lives as long as the process
//! - One mutex per instance table; no lock is held across requests
//! - Device ids are unique per instance, not globally

pub mod device;
pub mod tenant;

pub use device::{Device, DeviceTable, StoreError, StoreResult};
pub use tenant::TenantStore;
