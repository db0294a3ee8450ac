//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the geocoding service:
//!     → timeouts.rs (enforce per-lookup deadline)
//!     → On expiry: caller decides (empty suggestions / NoMatch-equivalent)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};
