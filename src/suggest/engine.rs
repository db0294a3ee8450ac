//! Debounced type-ahead lookups.
//!
//! # Responsibilities
//! - Skip the network entirely for short inputs
//! - Arm one debounce timer per field, cancelling the previous one first
//! - Tag each fired lookup with the generation of the input that armed it
//! - Apply a response only if its generation is still the field's latest
//!
//! # Design Decisions
//! - Timers and generations live in the engine instance, never in globals
//! - Suggestion failures are advisory: logged and turned into an empty list
//! - An in-flight request is not aborted by newer input; its response is
//!   discarded on arrival instead

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;

use crate::config::SuggestionConfig;
use crate::geocoding::Geocoder;
use crate::model::{Candidate, Field, Query};
use crate::resilience::with_deadline;
use crate::suggest::state::{FieldSlot, SuggestionList};

/// Per-widget suggestion engine. Cheap to clone; clones share state.
pub struct SuggestionEngine<G> {
    inner: Arc<EngineInner<G>>,
}

struct EngineInner<G> {
    geocoder: G,
    debounce: Duration,
    lookup_timeout: Duration,
    min_query_chars: usize,
    slots: Mutex<[FieldSlot; 2]>,
    lookups_issued: AtomicU64,
}

impl<G> Clone for SuggestionEngine<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<G: Geocoder> SuggestionEngine<G> {
    /// Create an engine. `lookup_timeout` bounds each geocoding call.
    pub fn new(geocoder: G, config: &SuggestionConfig, lookup_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                geocoder,
                debounce: Duration::from_millis(config.debounce_ms),
                lookup_timeout,
                min_query_chars: config.min_query_chars,
                slots: Mutex::new([FieldSlot::new(), FieldSlot::new()]),
                lookups_issued: AtomicU64::new(0),
            }),
        }
    }

    /// Register a keystroke for `field`.
    ///
    /// Must be called from within a Tokio runtime: the debounce timer is a
    /// spawned task.
    pub fn accept_input(&self, field: Field, text: &str) {
        let text = text.trim();
        let mut slots = self.inner.lock();
        let slot = &mut slots[field.index()];
        let generation = slot.supersede();

        if text.chars().count() < self.inner.min_query_chars {
            slot.close();
            tracing::trace!(%field, generation, "Input too short, suggestions cleared");
            return;
        }

        let query = Query::new(field, text);
        let inner = self.inner.clone();
        let timer = tokio::spawn(async move { inner.fire(query, generation).await });
        slot.pending = Some(timer.abort_handle());
    }

    /// Pick a candidate from the open list, closing it.
    ///
    /// Returns `None` (and leaves the list untouched) if `index` is not in
    /// the list currently shown.
    pub fn select(&self, field: Field, index: usize) -> Option<Candidate> {
        let mut slots = self.inner.lock();
        let slot = &mut slots[field.index()];
        let chosen = slot.list.borrow().candidates().get(index).cloned()?;
        slot.supersede();
        slot.close();
        tracing::debug!(%field, name = %chosen.display_name, "Suggestion selected");
        Some(chosen)
    }

    /// Close the list for `field` and drop any lookup still pending for it.
    pub fn dismiss(&self, field: Field) {
        let mut slots = self.inner.lock();
        let slot = &mut slots[field.index()];
        slot.supersede();
        slot.close();
    }

    /// Cancel every pending timer and ignore every in-flight response.
    pub fn cancel_all(&self) {
        let mut slots = self.inner.lock();
        for slot in slots.iter_mut() {
            slot.supersede();
            slot.close();
        }
    }

    /// The list currently shown for `field`.
    pub fn suggestions(&self, field: Field) -> SuggestionList {
        self.inner.lock()[field.index()].snapshot()
    }

    /// Observe every list transition for `field`.
    pub fn subscribe(&self, field: Field) -> watch::Receiver<SuggestionList> {
        self.inner.lock()[field.index()].list.subscribe()
    }

    /// Number of lookups that actually reached the geocoder.
    pub fn lookups_issued(&self) -> u64 {
        self.inner.lookups_issued.load(Ordering::Relaxed)
    }
}

impl<G: Geocoder> EngineInner<G> {
    fn lock(&self) -> MutexGuard<'_, [FieldSlot; 2]> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fire(self: Arc<Self>, query: Query, generation: u64) {
        time::sleep(self.debounce).await;

        let field = query.field;
        {
            let mut slots = self.lock();
            let slot = &mut slots[field.index()];
            if slot.generation != generation {
                return;
            }
            // From here on newer input no longer cancels this lookup.
            slot.pending = None;
            slot.close();
        }

        self.lookups_issued.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%field, text = %query.text, generation, "Suggestion lookup fired");

        let candidates =
            match with_deadline(self.lookup_timeout, self.geocoder.search(&query.text)).await {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(e)) => {
                    tracing::debug!(%field, error = %e, "Suggestion lookup failed");
                    Vec::new()
                }
                Err(e) => {
                    tracing::debug!(%field, error = %e, "Suggestion lookup timed out");
                    Vec::new()
                }
            };

        let slots = self.lock();
        let slot = &slots[field.index()];
        if slot.generation != generation {
            tracing::debug!(
                %field,
                generation,
                latest = slot.generation,
                "Discarded stale suggestions"
            );
            return;
        }
        tracing::debug!(%field, count = candidates.len(), "Suggestions updated");
        slot.open(candidates);
    }
}
