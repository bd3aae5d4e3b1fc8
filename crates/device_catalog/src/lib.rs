pub mod config;
pub mod domain;

pub use self::config::ServiceConfig;
pub use domain::*;
