//! Instance → device table mapping.

use std::sync::Arc;

use dashmap::DashMap;

use crate::store::device::DeviceTable;

/// Owns one device table per instance.
///
/// Tables are created on first reference and live for the life of the
/// process. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct TenantStore {
    tables: Arc<DashMap<String, DeviceTable>>,
}

impl TenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `instance_id`, created empty if this is the first reference.
    pub fn table_for(&self, instance_id: &str) -> DeviceTable {
        if let Some(table) = self.tables.get(instance_id) {
            return table.value().clone();
        }

        self.tables
            .entry(instance_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(instance_id = %instance_id, "Creating device table");
                DeviceTable::new()
            })
            .value()
            .clone()
    }

    /// Number of instances referenced so far.
    pub fn instance_count(&self) -> usize {
        self.tables.len()
    }

    /// Total devices across all instances.
    pub fn device_count(&self) -> usize {
        self.tables.iter().map(|table| table.value().len()).sum()
    }
}
