//! Overlay lifecycle state machine.
//!
//! # States
//! - Empty: no overlay on the map
//! - Attached: exactly one overlay, bound to one route
//!
//! # State Transitions
//! ```text
//! Empty → Attached(r): first route
//! Attached(r1) → Attached(r2): detach r1, then attach r2
//! Attached(r) → Empty: teardown
//! Empty → Empty: teardown (no-op)
//! ```

use crate::config::OverlayConfig;
use crate::model::Route;
use crate::overlay::{Bounds, MapSurface, OverlayHandle, OverlaySpec, RoutingLayer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayState {
    Empty,
    Attached { route: Route, handle: OverlayHandle },
}

/// Owns the single overlay of one widget.
pub struct RouteOverlayController<L, M> {
    layer: L,
    map: M,
    config: OverlayConfig,
    state: OverlayState,
}

impl<L: RoutingLayer, M: MapSurface> RouteOverlayController<L, M> {
    pub fn new(layer: L, map: M, config: OverlayConfig) -> Self {
        Self {
            layer,
            map,
            config,
            state: OverlayState::Empty,
        }
    }

    /// Draw `route`, replacing whatever was drawn before.
    pub fn on_route(&mut self, route: Route) -> OverlayHandle {
        self.release();

        let spec = OverlaySpec::build(route, &self.config);
        let handle = self.layer.attach(&spec);
        if let Some(bounds) = Bounds::covering(&spec.waypoints) {
            self.map.fit_bounds(bounds);
        }
        self.state = OverlayState::Attached { route, handle };

        tracing::info!(
            handle = handle.id(),
            start = %route.start(),
            end = %route.end(),
            "Route overlay attached"
        );
        handle
    }

    /// Remove the overlay, if any. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.release();
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn route(&self) -> Option<Route> {
        match self.state {
            OverlayState::Attached { route, .. } => Some(route),
            OverlayState::Empty => None,
        }
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    fn release(&mut self) {
        let OverlayState::Attached { handle, .. } =
            std::mem::replace(&mut self.state, OverlayState::Empty)
        else {
            return;
        };
        if self.layer.is_attached(handle) {
            self.layer.detach(handle);
            tracing::debug!(handle = handle.id(), "Route overlay detached");
        } else {
            tracing::debug!(handle = handle.id(), "Route overlay already gone, skipping detach");
        }
    }
}
