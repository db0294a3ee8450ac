//! In-memory routing layer and map surface.
//!
//! Used by the HTTP service, where the real map lives in the browser and
//! only needs the overlay description, and by tests observing ordering.

use std::collections::BTreeMap;

use crate::overlay::{Bounds, MapSurface, OverlayHandle, OverlaySpec, RoutingLayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerEvent {
    Attached(OverlayHandle),
    Detached(OverlayHandle),
}

/// Routing layer that keeps attached overlays in a map.
#[derive(Debug, Default)]
pub struct HeadlessLayer {
    next_id: u64,
    attached: BTreeMap<OverlayHandle, OverlaySpec>,
    events: Vec<LayerEvent>,
    max_concurrent: usize,
    rejected_detaches: usize,
}

impl HeadlessLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(&self, handle: OverlayHandle) -> Option<&OverlaySpec> {
        self.attached.get(&handle)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn events(&self) -> &[LayerEvent] {
        &self.events
    }

    /// Highest number of overlays ever attached at once.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Detach calls for handles that were not attached.
    pub fn rejected_detaches(&self) -> usize {
        self.rejected_detaches
    }
}

impl RoutingLayer for HeadlessLayer {
    fn attach(&mut self, spec: &OverlaySpec) -> OverlayHandle {
        self.next_id += 1;
        let handle = OverlayHandle::new(self.next_id);
        self.attached.insert(handle, spec.clone());
        self.events.push(LayerEvent::Attached(handle));
        self.max_concurrent = self.max_concurrent.max(self.attached.len());
        handle
    }

    fn detach(&mut self, handle: OverlayHandle) {
        if self.attached.remove(&handle).is_some() {
            self.events.push(LayerEvent::Detached(handle));
        } else {
            self.rejected_detaches += 1;
            tracing::warn!(handle = handle.id(), "Detach of an overlay that is not attached");
        }
    }

    fn is_attached(&self, handle: OverlayHandle) -> bool {
        self.attached.contains_key(&handle)
    }
}

/// Map surface that remembers the last fitted viewport.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    viewport: Option<Bounds>,
    fit_count: usize,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Option<Bounds> {
        self.viewport
    }

    pub fn fit_count(&self) -> usize {
        self.fit_count
    }
}

impl MapSurface for HeadlessMap {
    fn fit_bounds(&mut self, bounds: Bounds) {
        self.viewport = Some(bounds);
        self.fit_count += 1;
    }
}
