//! One route-planning widget.
//!
//! # Responsibilities
//! - Hold the two input texts and the current Route
//! - Route keystrokes to the suggestion engine
//! - Run submissions through the resolver and hand results to the overlay
//! - Produce share links and load inbound ones
//!
//! # Design Decisions
//! - Submissions are numbered; only the latest issued one may replace the
//!   Route, so a slow earlier search can never overwrite a newer result
//! - Failed resolutions leave Route and overlay untouched
//! - Link coordinates build the Route directly; only values that are not
//!   coordinates fall back to text search (unless configured otherwise)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

use crate::config::WidgetConfig;
use crate::geocoding::Geocoder;
use crate::model::{Candidate, Field, LatLon, Route};
use crate::overlay::{MapSurface, OverlayState, RouteOverlayController, RoutingLayer};
use crate::resolve::{ResolveError, RouteResolver};
use crate::share::{DecodedLink, ShareError, ShareLinkCodec};
use crate::suggest::{SuggestionEngine, SuggestionList};

/// Failure of a widget-level operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Share(#[from] ShareError),
}

/// How a successful search or link load ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub route: Route,
    /// False when a newer submission was issued while this one was in flight;
    /// the route was then not drawn.
    pub applied: bool,
}

struct View<L, M> {
    overlay: RouteOverlayController<L, M>,
    route: Option<Route>,
}

pub struct Widget<G, L, M> {
    suggestions: SuggestionEngine<Arc<G>>,
    resolver: RouteResolver<Arc<G>>,
    codec: ShareLinkCodec,
    geocode_decoded: bool,
    inputs: Mutex<[String; 2]>,
    view: Mutex<View<L, M>>,
    submissions: AtomicU64,
}

impl<G, L, M> Widget<G, L, M>
where
    G: Geocoder,
    L: RoutingLayer,
    M: MapSurface,
{
    pub fn new(geocoder: Arc<G>, layer: L, map: M, config: &WidgetConfig) -> Result<Self, ShareError> {
        let lookup_timeout = Duration::from_millis(config.geocoder.timeout_ms);
        Ok(Self {
            suggestions: SuggestionEngine::new(geocoder.clone(), &config.suggestions, lookup_timeout),
            resolver: RouteResolver::new(geocoder, lookup_timeout),
            codec: ShareLinkCodec::new(&config.share.base_url)?,
            geocode_decoded: config.share.geocode_decoded_coordinates,
            inputs: Mutex::new([String::new(), String::new()]),
            view: Mutex::new(View {
                overlay: RouteOverlayController::new(layer, map, config.overlay.clone()),
                route: None,
            }),
            submissions: AtomicU64::new(0),
        })
    }

    // --- Inputs & suggestions ---

    /// A keystroke in `field`. Requires a Tokio runtime.
    pub fn set_input(&self, field: Field, text: &str) {
        lock(&self.inputs)[field.index()] = text.to_string();
        self.suggestions.accept_input(field, text);
    }

    pub fn input(&self, field: Field) -> String {
        lock(&self.inputs)[field.index()].clone()
    }

    pub fn suggestions(&self, field: Field) -> SuggestionList {
        self.suggestions.suggestions(field)
    }

    /// Choose a suggestion: fills the input with its name and closes the list.
    pub fn select_suggestion(&self, field: Field, index: usize) -> Option<Candidate> {
        let chosen = self.suggestions.select(field, index)?;
        lock(&self.inputs)[field.index()] = chosen.display_name.clone();
        Some(chosen)
    }

    pub fn dismiss_suggestions(&self, field: Field) {
        self.suggestions.dismiss(field);
    }

    // --- Resolution ---

    /// Resolve the current input texts.
    pub async fn submit(&self) -> Result<Resolution, WidgetError> {
        let [start, end] = lock(&self.inputs).clone();
        self.search(&start, &end).await
    }

    /// Resolve `start` and `end` as free text and draw the result.
    pub async fn search(&self, start: &str, end: &str) -> Result<Resolution, WidgetError> {
        {
            let mut inputs = lock(&self.inputs);
            inputs[Field::Start.index()] = start.to_string();
            inputs[Field::End.index()] = end.to_string();
        }
        let submission = self.issue_submission();
        let route = self.resolver.resolve(start, end).await?;
        Ok(self.apply(route, submission))
    }

    /// Load a shared link.
    pub async fn open_link(&self, link: &str) -> Result<Resolution, WidgetError> {
        let decoded = self.codec.decode(link).ok_or(ShareError::InvalidLink)?;
        tracing::info!(start = %decoded.start, end = %decoded.end, "Loading shared route");

        if self.geocode_decoded {
            return self.search(&decoded.start, &decoded.end).await;
        }

        {
            let mut inputs = lock(&self.inputs);
            inputs[Field::Start.index()] = decoded.start.clone();
            inputs[Field::End.index()] = decoded.end.clone();
        }
        let submission = self.issue_submission();
        let route = self.resolve_link(&decoded).await?;
        Ok(self.apply(route, submission))
    }

    async fn resolve_link(&self, decoded: &DecodedLink) -> Result<Route, ResolveError> {
        let (start, end) = tokio::join!(
            self.link_endpoint(Field::Start, &decoded.start),
            self.link_endpoint(Field::End, &decoded.end),
        );
        Ok(Route::new(start?, end?))
    }

    async fn link_endpoint(&self, field: Field, raw: &str) -> Result<LatLon, ResolveError> {
        match raw.parse::<LatLon>() {
            Ok(coordinate) => Ok(coordinate),
            Err(e) => {
                tracing::debug!(%field, raw, error = %e, "Link value is not a coordinate, searching as text");
                self.resolver.resolve_one(field, raw).await
            }
        }
    }

    fn issue_submission(&self) -> u64 {
        self.suggestions.cancel_all();
        self.submissions.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, route: Route, submission: u64) -> Resolution {
        let mut view = lock(&self.view);
        let latest = self.submissions.load(Ordering::SeqCst);
        if submission != latest {
            tracing::debug!(submission, latest, "Resolution superseded, not drawn");
            return Resolution {
                route,
                applied: false,
            };
        }
        view.route = Some(route);
        view.overlay.on_route(route);
        Resolution {
            route,
            applied: true,
        }
    }

    // --- Route, overlay & sharing ---

    pub fn route(&self) -> Option<Route> {
        lock(&self.view).route
    }

    /// Share link for the current route.
    pub fn share(&self) -> Result<String, ShareError> {
        let route = lock(&self.view).route;
        self.codec.encode(route.as_ref())
    }

    pub fn overlay_state(&self) -> OverlayState {
        lock(&self.view).overlay.state()
    }

    /// Inspect the overlay controller (layer, map) under the widget lock.
    pub fn with_overlay<R>(&self, f: impl FnOnce(&RouteOverlayController<L, M>) -> R) -> R {
        f(&lock(&self.view).overlay)
    }

    /// Tear the view down: cancel lookups, detach the overlay and forget
    /// the route.
    pub fn teardown(&self) {
        self.suggestions.cancel_all();
        let mut view = lock(&self.view);
        view.overlay.teardown();
        view.route = None;
        tracing::debug!("Widget torn down");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
