//! Core data model shared by every subsystem.
//!
//! # Data Flow
//! ```text
//! geocoder records
//!     → Candidate (display name + LatLon, scoped to one query)
//!     → top candidate per Field
//!     → Route (immutable, replaced wholesale)
//!     → overlay / share link
//! ```

pub mod types;

pub use types::{Candidate, CoordinateError, Field, LatLon, Query, Route};
