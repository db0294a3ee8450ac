//! Dual-endpoint route resolution.
//!
//! # Responsibilities
//! - Geocode both endpoints concurrently and wait for both
//! - Build a Route from the top-ranked candidate of each side
//! - Fail without any partial state when either side finds nothing
//!
//! # Design Decisions
//! - All state is local to one `resolve` call, so overlapping calls cannot
//!   see each other's results
//! - Every lookup is bounded by the configured deadline; expiry and
//!   transport errors are reported as `Unavailable`, which callers treat
//!   like `NoMatch`

use std::time::Duration;
use thiserror::Error;

use crate::geocoding::Geocoder;
use crate::model::{Field, LatLon, Query, Route};
use crate::resilience::with_deadline;

/// Why a pair of queries did not produce a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The geocoder returned zero candidates for this side.
    #[error("no match for {0} location")]
    NoMatch(Field),

    /// The geocoder could not be reached, failed, or timed out.
    #[error("geocoding unavailable for {field} location: {reason}")]
    Unavailable { field: Field, reason: String },

    /// Nothing was typed for this side.
    #[error("{0} location is empty")]
    EmptyQuery(Field),
}

impl ResolveError {
    /// The side that failed.
    pub fn field(&self) -> Field {
        match self {
            ResolveError::NoMatch(field)
            | ResolveError::EmptyQuery(field)
            | ResolveError::Unavailable { field, .. } => *field,
        }
    }

    /// Text shown to the user; every variant is a retry prompt.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::EmptyQuery(_) => "Please enter both a start and an end location.",
            ResolveError::NoMatch(_) | ResolveError::Unavailable { .. } => {
                "One or both locations not found. Please try different queries."
            }
        }
    }
}

/// Resolves free-text endpoints into routes.
pub struct RouteResolver<G> {
    geocoder: G,
    lookup_timeout: Duration,
}

impl<G: Geocoder> RouteResolver<G> {
    pub fn new(geocoder: G, lookup_timeout: Duration) -> Self {
        Self {
            geocoder,
            lookup_timeout,
        }
    }

    /// Resolve both queries. Both succeed or the call fails.
    pub async fn resolve(&self, start: &str, end: &str) -> Result<Route, ResolveError> {
        let start = Query::new(Field::Start, start.trim());
        let end = Query::new(Field::End, end.trim());
        for query in [&start, &end] {
            if query.text.is_empty() {
                return Err(ResolveError::EmptyQuery(query.field));
            }
        }

        let (start_result, end_result) = tokio::join!(self.top(&start), self.top(&end));
        // Start is reported first when both sides fail.
        let route = Route::new(start_result?, end_result?);

        tracing::info!(
            start = %start.text,
            end = %end.text,
            start_coord = %route.start(),
            end_coord = %route.end(),
            "Route resolved"
        );
        Ok(route)
    }

    /// Resolve a single endpoint to its top-ranked coordinate.
    pub async fn resolve_one(&self, field: Field, text: &str) -> Result<LatLon, ResolveError> {
        let query = Query::new(field, text.trim());
        if query.text.is_empty() {
            return Err(ResolveError::EmptyQuery(field));
        }
        self.top(&query).await
    }

    async fn top(&self, query: &Query) -> Result<LatLon, ResolveError> {
        let field = query.field;
        let candidates = match with_deadline(self.lookup_timeout, self.geocoder.search(&query.text)).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => {
                tracing::warn!(%field, text = %query.text, error = %e, "Geocoding failed");
                return Err(ResolveError::Unavailable {
                    field,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(%field, text = %query.text, error = %e, "Geocoding timed out");
                return Err(ResolveError::Unavailable {
                    field,
                    reason: e.to_string(),
                });
            }
        };

        match candidates.into_iter().next() {
            Some(best) => {
                tracing::debug!(%field, text = %query.text, name = %best.display_name, "Endpoint resolved");
                Ok(best.coordinate)
            }
            None => {
                tracing::info!(%field, text = %query.text, "No geocoding match");
                Err(ResolveError::NoMatch(field))
            }
        }
    }
}
