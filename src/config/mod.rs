//! Configuration management
//!
//! YAML config file under the platform config directory plus environment
//! variable overrides.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{Config, DiscoveryConfig, LayoutConfig, LoggerConfig};
