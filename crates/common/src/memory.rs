mod in_memory_device_repository;

pub use in_memory_device_repository::*;
