//! Geocoding collaborator.
//!
//! # Data Flow
//! ```text
//! free text
//!     → Geocoder::search (trait; nominatim.rs in production)
//!     → ordered Vec<Candidate> (service ranking preserved)
//!     → empty Vec means "no match", never an error
//! ```
//!
//! # Design Decisions
//! - The widget never matches places itself; it only orders calls
//! - Deadlines are applied by the callers (suggest / resolve), so every
//!   implementation is bounded the same way

pub mod error;
pub mod nominatim;

use std::future::Future;
use std::sync::Arc;

use crate::model::Candidate;

pub use error::{GeocodeError, GeocodeResult};
pub use nominatim::NominatimGeocoder;

/// Resolves free text into ranked coordinate candidates.
pub trait Geocoder: Send + Sync + 'static {
    /// Look up `text`, returning candidates in service rank order.
    fn search(&self, text: &str) -> impl Future<Output = GeocodeResult<Vec<Candidate>>> + Send;
}

impl<G: Geocoder> Geocoder for Arc<G> {
    async fn search(&self, text: &str) -> GeocodeResult<Vec<Candidate>> {
        (**self).search(text).await
    }
}
