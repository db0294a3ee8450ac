//! Route resolution subsystem.
//!
//! # Data Flow
//! ```text
//! (start text, end text)
//!     → two concurrent geocoder lookups (each with a deadline)
//!     → join: both must yield ≥ 1 candidate
//!     → Route { top start, top end }  |  ResolveError (no partial route)
//! ```

pub mod resolver;

pub use resolver::{ResolveError, RouteResolver};
