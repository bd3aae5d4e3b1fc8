use crate::domain::filter_evaluator;
use crate::domain::lifecycle_guard::{self, UpdateDecision};
use crate::domain::patch_engine::{self, PatchOperation};
use chrono::Utc;
use common::domain::{
    Device, DeviceFields, DeviceFilter, DeviceId, DeviceRepository, DeviceState, DomainError,
    DomainResult, InsertDeviceRepoInput, Page, PageRequest,
};
use garde::Validate;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Pagination limits applied to list requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceServiceConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for DeviceServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 2000,
        }
    }
}

impl DeviceServiceConfig {
    /// Missing or zero sizes fall back to the default; sizes are capped at the maximum
    pub fn page_request(&self, index: Option<usize>, size: Option<usize>) -> PageRequest {
        let size = match size {
            Some(size) if size > 0 => size,
            _ => self.default_page_size,
        };
        PageRequest::new(index.unwrap_or(0), size.min(self.max_page_size).max(1))
    }
}

/// Service request for listing devices
#[derive(Debug, Clone, Default)]
pub struct ListDevicesRequest {
    pub brand: Option<String>,
    pub state: Option<String>,
    pub page_index: Option<usize>,
    pub page_size: Option<usize>,
}

/// Service request for getting a device
#[derive(Debug, Clone)]
pub struct GetDeviceRequest {
    pub device_id: DeviceId,
}

/// Service request for creating a device
#[derive(Debug, Clone, Validate)]
pub struct CreateDeviceRequest {
    #[garde(length(chars, min = 2, max = 100))]
    pub name: String,
    #[garde(length(chars, min = 2, max = 100))]
    pub brand: String,
    #[garde(skip)]
    pub state: DeviceState,
}

impl CreateDeviceRequest {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            state: self.state,
        }
    }
}

/// Service request for replacing all mutable fields of a device
#[derive(Debug, Clone, Validate)]
pub struct UpdateDeviceRequest {
    #[garde(skip)]
    pub device_id: DeviceId,
    #[garde(length(chars, min = 2, max = 100))]
    pub name: String,
    #[garde(length(chars, min = 2, max = 100))]
    pub brand: String,
    #[garde(skip)]
    pub state: DeviceState,
}

impl UpdateDeviceRequest {
    fn trimmed(self) -> Self {
        Self {
            device_id: self.device_id,
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            state: self.state,
        }
    }

    fn fields(&self) -> DeviceFields {
        DeviceFields {
            name: self.name.clone(),
            brand: self.brand.clone(),
            state: self.state,
        }
    }
}

/// Service request for applying a JSON Patch to a device
#[derive(Debug, Clone)]
pub struct PatchDeviceRequest {
    pub device_id: DeviceId,
    pub operations: Vec<PatchOperation>,
}

/// Service request for deleting a device
#[derive(Debug, Clone)]
pub struct DeleteDeviceRequest {
    pub device_id: DeviceId,
}

/// Device-shaped view of a patched document.
/// `id` and `createdAt` are accepted with any value and then discarded.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PatchedDevice {
    #[serde(rename = "id")]
    #[garde(skip)]
    _id: Option<IgnoredAny>,
    #[garde(length(chars, min = 2, max = 100))]
    name: String,
    #[garde(length(chars, min = 2, max = 100))]
    brand: String,
    #[garde(skip)]
    state: DeviceState,
    #[serde(rename = "createdAt")]
    #[garde(skip)]
    _created_at: Option<IgnoredAny>,
}

impl PatchedDevice {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            ..self
        }
    }

    fn fields(&self) -> DeviceFields {
        DeviceFields {
            name: self.name.clone(),
            brand: self.brand.clone(),
            state: self.state,
        }
    }
}

/// Domain service for device lifecycle management
/// This is the orchestration layer that handlers call
pub struct DeviceService {
    device_repository: Arc<dyn DeviceRepository>,
    config: DeviceServiceConfig,
}

impl DeviceService {
    pub fn new(device_repository: Arc<dyn DeviceRepository>, config: DeviceServiceConfig) -> Self {
        Self {
            device_repository,
            config,
        }
    }

    /// List devices matching the brand/state filter, one page at a time
    #[instrument(skip(self, request), fields(brand = ?request.brand, state = ?request.state))]
    pub async fn list_devices(&self, request: ListDevicesRequest) -> DomainResult<Page<Device>> {
        let page = self
            .config
            .page_request(request.page_index, request.page_size);
        let filter = DeviceFilter {
            brand: request.brand,
            state: request.state,
        };

        debug!(
            page_index = page.index,
            page_size = page.size,
            "listing devices"
        );

        // The store may narrow the scan; the evaluator owns the final match and count
        let devices = self.device_repository.scan(filter.clone()).await?;
        let page = filter_evaluator::evaluate(devices, &filter, page);

        debug!(count = page.items.len(), total = page.total_count, "listed devices");
        Ok(page)
    }

    /// Get a device by ID
    #[instrument(skip(self, request), fields(device_id = request.device_id))]
    pub async fn get_device(&self, request: GetDeviceRequest) -> DomainResult<Device> {
        self.find_device(request.device_id).await
    }

    /// Create a new device.
    /// The creation timestamp is assigned here; the store assigns the ID.
    #[instrument(skip(self, request), fields(device_name = %request.name, brand = %request.brand, state = %request.state))]
    pub async fn create_device(&self, request: CreateDeviceRequest) -> DomainResult<Device> {
        let request = request.trimmed();
        common::garde::validate_struct(&request)?;

        let input = InsertDeviceRepoInput {
            name: request.name,
            brand: request.brand,
            state: request.state,
            created_at: Utc::now(),
        };

        let device = self.device_repository.insert(input).await?;

        info!(device_id = device.id, "device created");
        Ok(device)
    }

    /// Delete a device unless it is in use
    #[instrument(skip(self, request), fields(device_id = request.device_id))]
    pub async fn delete_device(&self, request: DeleteDeviceRequest) -> DomainResult<()> {
        let current = self.find_device(request.device_id).await?;

        if let Err(e) = lifecycle_guard::evaluate_delete(&current) {
            warn!(state = %current.state, "delete rejected");
            return Err(e);
        }

        self.device_repository.delete_by_id(current.id).await?;

        info!("device deleted");
        Ok(())
    }

    /// Replace name, brand and state of a device.
    /// An update identical to the stored record is not written.
    #[instrument(skip(self, request), fields(device_id = request.device_id, state = %request.state))]
    pub async fn update_device(&self, request: UpdateDeviceRequest) -> DomainResult<Device> {
        let request = request.trimmed();
        common::garde::validate_struct(&request)?;

        let current = self.find_device(request.device_id).await?;
        let decision = lifecycle_guard::evaluate_update(&current, &request.fields())
            .inspect_err(|_| warn!(state = %current.state, "update rejected"))?;

        self.persist(decision).await
    }

    /// Apply a JSON Patch to a device.
    /// The update rules are re-applied to the patched result; `id` and
    /// `createdAt` always keep their stored values. Field constraints are
    /// checked only once the in-use rule has permitted the change.
    #[instrument(skip(self, request), fields(device_id = request.device_id, operations = request.operations.len()))]
    pub async fn patch_device(&self, request: PatchDeviceRequest) -> DomainResult<Device> {
        let current = self.find_device(request.device_id).await?;

        let document = serde_json::to_value(&current).map_err(anyhow::Error::from)?;
        let patched = patch_engine::apply(&document, &request.operations)?;

        let patched: PatchedDevice = serde_json::from_value(patched)
            .map_err(|e| DomainError::PatchResultInvalid(e.to_string()))?;
        let patched = patched.trimmed();

        let decision = lifecycle_guard::evaluate_update(&current, &patched.fields())
            .inspect_err(|_| warn!(state = %current.state, "patch rejected"))?;

        if let UpdateDecision::Apply(_) = decision {
            common::garde::validate_struct(&patched)?;
        }

        self.persist(decision).await
    }

    async fn find_device(&self, device_id: DeviceId) -> DomainResult<Device> {
        debug!(device_id, "getting device");

        self.device_repository
            .find_by_id(device_id)
            .await?
            .ok_or(DomainError::DeviceNotFound(device_id))
    }

    async fn persist(&self, decision: UpdateDecision) -> DomainResult<Device> {
        match decision {
            UpdateDecision::Unchanged(device) => {
                debug!("no changes, skipping write");
                Ok(device)
            }
            UpdateDecision::Apply(device) => {
                self.device_repository.replace(device.clone()).await?;
                info!(state = %device.state, "device updated");
                Ok(device)
            }
        }
    }
}
