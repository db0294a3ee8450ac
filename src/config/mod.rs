//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WidgetConfig (validated, immutable)
//!     → sections cloned into each widget subsystem
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::GeocoderConfig;
pub use schema::ObservabilityConfig;
pub use schema::OverlayConfig;
pub use schema::ServerConfig;
pub use schema::ShareConfig;
pub use schema::SuggestionConfig;
pub use schema::WidgetConfig;
