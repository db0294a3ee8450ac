//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured tracing events (lookups, resolutions, overlay changes)
//!     → HTTP spans via tower-http TraceLayer, tagged with x-request-id
//!
//! Consumers:
//!     → stdout (pretty or JSON, see logging.rs)
//! ```

pub mod logging;

pub use logging::init_logging;
