//! Route planning widget library.
//!
//! Two location inputs with live suggestions, a route resolver that turns
//! both texts into coordinates, an overlay controller that keeps exactly one
//! route drawn, and shareable links that reproduce a route.

// Widget core
pub mod model;
pub mod geocoding;
pub mod suggest;
pub mod resolve;
pub mod overlay;
pub mod share;
pub mod widget;

// Service surface
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

#[cfg(test)]
mod testing;

pub use config::WidgetConfig;
pub use geocoding::{Geocoder, NominatimGeocoder};
pub use http::WidgetServer;
pub use lifecycle::Shutdown;
pub use model::{Candidate, Field, LatLon, Route};
pub use widget::{SessionRegistry, Widget, WidgetError};
