//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → handed to BulkClient::from_config at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the client is built; pools are sized once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BodyConfig, ClientConfig, ObservabilityConfig, TimeoutConfig, WorkerConfig};
pub use validation::{validate_config, ValidationError};
