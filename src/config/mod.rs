//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PartialPluginConfig
//!     + routes / to_html supplied in code
//!     → schema.rs get_defaults (merge over defaults)
//!     → PluginConfig (owned by one setup call)
//! ```
//!
//! # Design Decisions
//! - Every field has a documented default
//! - Normalization is pure and never inspects routes
//! - Validation applies to file settings only

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{get_defaults, PartialPluginConfig, PluginConfig, PluginSettings};
