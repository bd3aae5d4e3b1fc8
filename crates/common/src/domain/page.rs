use crate::domain::device::Device;

/// Filter criteria for listing devices.
/// Blank or absent terms match every device; present terms are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Case-insensitive substring of the brand
    pub brand: Option<String>,
    /// Case-insensitive substring of the state's wire name
    pub state: Option<String>,
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        contains_ignore_case(&device.brand, self.brand.as_deref())
            && contains_ignore_case(device.state.as_str(), self.state.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, term: Option<&str>) -> bool {
    match term.map(str::trim) {
        None | Some("") => true,
        Some(term) => haystack.to_lowercase().contains(&term.to_lowercase()),
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub index: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// Offset of the first element of this page
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size)
    }
}

/// One page of results plus the total number of matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_index: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
