use crate::domain::page::DeviceFilter;
use crate::domain::result::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned device identifier
pub type DeviceId = i64;

/// Lifecycle state of a device. Gates which fields may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    Available,
    InUse,
    Inactive,
}

impl DeviceState {
    /// Wire name of the state, as used in payloads and filters
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Available => "AVAILABLE",
            DeviceState::InUse => "IN_USE",
            DeviceState::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device entity as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    pub created_at: DateTime<Utc>,
}

impl Device {
    pub fn is_in_use(&self) -> bool {
        self.state == DeviceState::InUse
    }

    /// Mutable fields of this device
    pub fn fields(&self) -> DeviceFields {
        DeviceFields {
            name: self.name.clone(),
            brand: self.brand.clone(),
            state: self.state,
        }
    }
}

/// The caller-controlled fields of a device, as proposed by a create or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFields {
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
}

impl DeviceFields {
    /// Copy with leading and trailing whitespace removed from name and brand
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            state: self.state,
        }
    }
}

/// Repository input for inserting a device. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertDeviceRepoInput {
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for device storage operations
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Get a device by ID
    async fn find_by_id(&self, id: DeviceId) -> DomainResult<Option<Device>>;

    /// Insert a new device, assigning its ID
    async fn insert(&self, input: InsertDeviceRepoInput) -> DomainResult<Device>;

    /// Overwrite an existing device by ID.
    /// Fails with `DeviceNotFound` if the record no longer exists.
    async fn replace(&self, device: Device) -> DomainResult<()>;

    /// Delete a device by ID.
    /// Fails with `DeviceNotFound` if the record no longer exists.
    async fn delete_by_id(&self, id: DeviceId) -> DomainResult<()>;

    /// All devices matching the filter, in ascending ID order (unpaginated)
    async fn scan(&self, filter: DeviceFilter) -> DomainResult<Vec<Device>>;
}
