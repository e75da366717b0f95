//! Per-instance device registry.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use uuid::Uuid;

/// Errors from device table operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("device {0} not found")]
    DeviceNotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A registered device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    /// Platform push token.
    pub token: String,
    pub interests: BTreeSet<String>,
    pub user_id: Option<String>,
}

impl Device {
    /// A fresh device with a random id and no interests.
    fn new(token: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            token,
            interests: BTreeSet::new(),
            user_id: None,
        }
    }
}

/// Device table for one instance.
///
/// Cloning is cheap and yields a handle to the same table. All operations
/// take the table lock for their whole duration, so each one is atomic.
#[derive(Debug, Clone, Default)]
pub struct DeviceTable {
    devices: Arc<Mutex<HashMap<String, Device>>>,
}

impl DeviceTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Device>> {
        // Every mutation completes under the lock, so a poisoned map is still whole.
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against an existing device.
    fn with_device<T>(&self, device_id: &str, f: impl FnOnce(&mut Device) -> T) -> StoreResult<T> {
        let mut devices = self.lock();
        devices
            .get_mut(device_id)
            .map(f)
            .ok_or_else(|| StoreError::DeviceNotFound(device_id.to_string()))
    }

    /// Register a new device with `token` and an empty interest set.
    pub fn register(&self, token: impl Into<String>) -> Device {
        let mut devices = self.lock();
        let mut device = Device::new(token.into());
        while devices.contains_key(&device.id) {
            device.id = Uuid::new_v4().to_string();
        }
        devices.insert(device.id.clone(), device.clone());
        device
    }

    /// Replace the push token, keeping interests and user.
    pub fn update_token(&self, device_id: &str, token: impl Into<String>) -> StoreResult<()> {
        let token = token.into();
        self.with_device(device_id, |device| device.token = token)
    }

    pub fn get(&self, device_id: &str) -> StoreResult<Device> {
        self.lock()
            .get(device_id)
            .cloned()
            .ok_or_else(|| StoreError::DeviceNotFound(device_id.to_string()))
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.lock().contains_key(device_id)
    }

    /// Remove a device. Returns whether it existed.
    pub fn delete(&self, device_id: &str) -> bool {
        self.lock().remove(device_id).is_some()
    }

    /// Associate the device with `user_id`, overwriting any previous user.
    pub fn associate_user(&self, device_id: &str, user_id: impl Into<String>) -> StoreResult<()> {
        let user_id = user_id.into();
        self.with_device(device_id, |device| device.user_id = Some(user_id))
    }

    pub fn interests(&self, device_id: &str) -> StoreResult<BTreeSet<String>> {
        self.with_device(device_id, |device| device.interests.clone())
    }

    /// Subscribe to an interest. Returns whether it was newly added.
    pub fn add_interest(&self, device_id: &str, interest: impl Into<String>) -> StoreResult<bool> {
        let interest = interest.into();
        self.with_device(device_id, |device| device.interests.insert(interest))
    }

    /// Unsubscribe from an interest. Returns whether it was present.
    pub fn remove_interest(&self, device_id: &str, interest: &str) -> StoreResult<bool> {
        self.with_device(device_id, |device| device.interests.remove(interest))
    }

    /// Discard the current interests and install `interests`.
    pub fn replace_interests<I>(&self, device_id: &str, interests: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = String>,
    {
        self.with_device(device_id, |device| {
            device.interests = interests.into_iter().collect();
        })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
