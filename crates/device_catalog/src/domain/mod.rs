pub mod device_service;
pub mod filter_evaluator;
pub mod lifecycle_guard;
pub mod patch_engine;

pub use device_service::*;
pub use lifecycle_guard::UpdateDecision;
pub use patch_engine::{PatchError, PatchOperation};
