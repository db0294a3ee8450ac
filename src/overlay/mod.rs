//! Route overlay subsystem.
//!
//! # Data Flow
//! ```text
//! Route
//!     → OverlaySpec (waypoints [start, end], start/end markers, line style)
//!     → controller.rs: detach previous (if still attached) → attach new
//!     → MapSurface::fit_bounds(both endpoints)
//! ```
//!
//! # Design Decisions
//! - The routing library and the map are collaborators behind traits
//! - The controller is the only owner of overlay handles
//! - headless.rs records overlays in memory for the HTTP service and tests

pub mod controller;
pub mod headless;

use serde::Serialize;

use crate::config::OverlayConfig;
use crate::model::{Field, LatLon, Route};

pub use controller::{OverlayState, RouteOverlayController};
pub use headless::{HeadlessLayer, HeadlessMap, LayerEvent};

/// Opaque reference to one attached overlay, issued by a [`RoutingLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OverlayHandle(u64);

impl OverlayHandle {
    /// For routing layer implementations minting new handles.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Endpoint marker drawn on top of the path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub role: Field,
    pub position: LatLon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub weight: u32,
}

/// Everything the routing layer needs to compute and draw one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySpec {
    pub route: Route,
    pub waypoints: Vec<LatLon>,
    pub markers: [Marker; 2],
    pub line: LineStyle,
    pub route_while_dragging: bool,
}

impl OverlaySpec {
    pub fn build(route: Route, config: &OverlayConfig) -> Self {
        Self {
            route,
            waypoints: vec![route.start(), route.end()],
            markers: [
                Marker {
                    role: Field::Start,
                    position: route.start(),
                },
                Marker {
                    role: Field::End,
                    position: route.end(),
                },
            ],
            line: LineStyle {
                color: config.line_color.clone(),
                weight: config.line_weight,
            },
            route_while_dragging: config.route_while_dragging,
        }
    }
}

/// Axis-aligned box covering a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLon,
    pub north_east: LatLon,
}

impl Bounds {
    /// Smallest box containing every point; `None` for an empty slice.
    pub fn covering(points: &[LatLon]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut sw = *first;
        let mut ne = *first;
        for p in rest {
            sw.lat = sw.lat.min(p.lat);
            sw.lon = sw.lon.min(p.lon);
            ne.lat = ne.lat.max(p.lat);
            ne.lon = ne.lon.max(p.lon);
        }
        Some(Self {
            south_west: sw,
            north_east: ne,
        })
    }

    pub fn contains(&self, p: LatLon) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&p.lat)
            && (self.south_west.lon..=self.north_east.lon).contains(&p.lon)
    }
}

/// Routing/overlay library: computes and renders a path through waypoints.
pub trait RoutingLayer: Send {
    fn attach(&mut self, spec: &OverlaySpec) -> OverlayHandle;

    fn detach(&mut self, handle: OverlayHandle);

    fn is_attached(&self, handle: OverlayHandle) -> bool;
}

/// The map view hosting the overlay.
pub trait MapSurface: Send {
    fn fit_bounds(&mut self, bounds: Bounds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::point;

    #[test]
    fn test_spec_construction() {
        let route = Route::new(point(48.8, 2.3), point(51.5, -0.1));
        let spec = OverlaySpec::build(route, &OverlayConfig::default());

        assert_eq!(spec.waypoints, vec![point(48.8, 2.3), point(51.5, -0.1)]);
        assert_eq!(spec.markers[0].role, Field::Start);
        assert_eq!(spec.markers[1].position, point(51.5, -0.1));
        assert_eq!(spec.line, LineStyle { color: "blue".into(), weight: 4 });
        assert!(spec.route_while_dragging);
    }

    #[test]
    fn test_bounds_cover_all_points() {
        let a = point(48.8, 2.3);
        let b = point(51.5, -0.1);
        let bounds = Bounds::covering(&[a, b]).unwrap();

        assert_eq!(bounds.south_west, point(48.8, -0.1));
        assert_eq!(bounds.north_east, point(51.5, 2.3));
        assert!(bounds.contains(a) && bounds.contains(b));
        assert!(Bounds::covering(&[]).is_none());
    }
}
