//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ResponderConfig (validated, immutable)
//!     → lifecycle::startup builds issuers, sources and server from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; issuer and prefix sets never change
//!   while the process runs
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    FilterConfig, HttpConfig, ListenerConfig, ObservabilityConfig, ResponderConfig, SourceConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
