//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file
//!     → loader.rs (read & deserialize)
//!     → overrides.rs (CLI values, applied before any check)
//!     → validation.rs (range checks)
//!     → StreamerConfig (immutable for the life of the process)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no file means the stock loopback server
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use overrides::ConfigOverrides;
pub use schema::{ListenerConfig, ObservabilityConfig, StreamConfig, StreamerConfig};
pub use validation::{validate_config, ValidationError};
