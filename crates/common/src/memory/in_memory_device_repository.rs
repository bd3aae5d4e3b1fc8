use crate::domain::{
    Device, DeviceFilter, DeviceId, DeviceRepository, DomainError, DomainResult,
    InsertDeviceRepoInput,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

struct StoreState {
    devices: BTreeMap<DeviceId, Device>,
    next_id: DeviceId,
}

/// In-memory implementation of DeviceRepository.
/// IDs are assigned from a monotonic sequence starting at 1 and never reused;
/// scans return devices in ascending ID order.
#[derive(Clone)]
pub struct InMemoryDeviceRepository {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryDeviceRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                devices: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Number of stored devices
    pub async fn count(&self) -> usize {
        self.state.read().await.devices.len()
    }
}

impl Default for InMemoryDeviceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn find_by_id(&self, id: DeviceId) -> DomainResult<Option<Device>> {
        let state = self.state.read().await;
        Ok(state.devices.get(&id).cloned())
    }

    async fn insert(&self, input: InsertDeviceRepoInput) -> DomainResult<Device> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let device = Device {
            id,
            name: input.name,
            brand: input.brand,
            state: input.state,
            created_at: input.created_at,
        };
        state.devices.insert(id, device.clone());

        debug!(device_id = id, "inserted device");
        Ok(device)
    }

    async fn replace(&self, device: Device) -> DomainResult<()> {
        let mut state = self.state.write().await;
        match state.devices.get_mut(&device.id) {
            Some(slot) => {
                *slot = device;
                Ok(())
            }
            None => Err(DomainError::DeviceNotFound(device.id)),
        }
    }

    async fn delete_by_id(&self, id: DeviceId) -> DomainResult<()> {
        let mut state = self.state.write().await;
        state
            .devices
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::DeviceNotFound(id))
    }

    async fn scan(&self, filter: DeviceFilter) -> DomainResult<Vec<Device>> {
        let state = self.state.read().await;
        Ok(state
            .devices
            .values()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect())
    }
}
