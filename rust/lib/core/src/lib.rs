pub mod client;
pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use client::{ClientIp, client_address};
pub use config::{ConfigError, RateLimitConfig, ServiceConfig};
pub use error::ServiceError;
pub use module::Module;
pub use types::{is_valid_id, new_id};
