//! Summary statistics over the device store
//!
//! Pure read-only aggregation over a single [`DeviceStore::all`] snapshot,
//! so the counts are always internally consistent even while recognitions
//! run concurrently.

use vt_protocol::StatsSummary;

use crate::store::DeviceStore;

/// Derive summary counts from the store's current state
pub fn summarize(store: &DeviceStore) -> StatsSummary {
    let records = store.all();

    let total_unique_devices = records.len() as u64;
    let total_visits = records.iter().map(|r| r.visit_count).sum();
    let returning_devices = records.iter().filter(|r| r.visit_count > 1).count() as u64;
    let devices_with_multiple_names = records.iter().filter(|r| r.names.len() > 1).count() as u64;

    StatsSummary {
        total_unique_devices,
        total_visits,
        returning_devices,
        devices_with_multiple_names,
        new_devices: total_unique_devices - returning_devices,
    }
}
