use common::domain::{Device, DeviceFilter, Page, PageRequest};

/// Select the matching devices and cut out the requested page.
///
/// Input order is preserved, so a store returning devices in ID order yields
/// stable pages. `total_count` counts every match regardless of the page.
pub fn evaluate(all: Vec<Device>, filter: &DeviceFilter, page: PageRequest) -> Page<Device> {
    let matching: Vec<Device> = all.into_iter().filter(|d| filter.matches(d)).collect();
    let total_count = matching.len();

    let items = matching
        .into_iter()
        .skip(page.offset())
        .take(page.size)
        .collect();

    Page {
        items,
        total_count,
        page_index: page.index,
        page_size: page.size,
    }
}
