//! Per-field suggestion state.
//!
//! # States
//! - Closed: nothing shown for the field
//! - Open: candidate list produced by the field's latest lookup
//!
//! # State Transitions
//! ```text
//! Closed → Open: lookup for the current generation returned candidates
//! Open → Closed: selection, dismissal, short input, or a newer lookup firing
//! ```

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::model::Candidate;

/// What the dropdown under one input shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "candidates", rename_all = "lowercase")]
pub enum SuggestionList {
    #[default]
    Closed,
    Open(Vec<Candidate>),
}

impl SuggestionList {
    /// An empty result closes the list rather than opening an empty one.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        if candidates.is_empty() {
            SuggestionList::Closed
        } else {
            SuggestionList::Open(candidates)
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        match self {
            SuggestionList::Closed => &[],
            SuggestionList::Open(list) => list,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SuggestionList::Open(_))
    }
}

/// Bookkeeping for one input field of one widget.
#[derive(Debug)]
pub(crate) struct FieldSlot {
    /// Bumped on every input, selection and dismissal.
    pub generation: u64,
    /// Debounce timer that has not fired yet.
    pub pending: Option<AbortHandle>,
    pub list: watch::Sender<SuggestionList>,
}

impl FieldSlot {
    pub fn new() -> Self {
        let (list, _) = watch::channel(SuggestionList::Closed);
        Self {
            generation: 0,
            pending: None,
            list,
        }
    }

    /// Invalidate everything issued so far and cancel the armed timer.
    pub fn supersede(&mut self) -> u64 {
        self.generation += 1;
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
        self.generation
    }

    pub fn close(&self) {
        self.list.send_if_modified(|list| {
            if list.is_open() {
                *list = SuggestionList::Closed;
                true
            } else {
                false
            }
        });
    }

    pub fn open(&self, candidates: Vec<Candidate>) {
        self.list.send_replace(SuggestionList::from_candidates(candidates));
    }

    pub fn snapshot(&self) -> SuggestionList {
        self.list.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatLon;

    fn candidate(name: &str) -> Candidate {
        Candidate {
            display_name: name.to_string(),
            coordinate: LatLon::new(0.0, 0.0).unwrap(),
        }
    }

    #[test]
    fn test_empty_result_stays_closed() {
        assert_eq!(SuggestionList::from_candidates(vec![]), SuggestionList::Closed);
        assert!(SuggestionList::from_candidates(vec![candidate("a")]).is_open());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(SuggestionList::from_candidates(vec![candidate("Paris")]))
            .unwrap();
        assert_eq!(json["state"], "open");
        assert_eq!(json["candidates"][0]["display_name"], "Paris");

        let json = serde_json::to_value(SuggestionList::Closed).unwrap();
        assert_eq!(json["state"], "closed");
    }

    #[test]
    fn test_slot_transitions() {
        let mut slot = FieldSlot::new();
        let mut rx = slot.list.subscribe();

        slot.open(vec![candidate("Paris")]);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_open());

        assert_eq!(slot.supersede(), 1);
        slot.close();
        assert_eq!(slot.snapshot(), SuggestionList::Closed);

        // Closing an already closed list does not notify.
        rx.borrow_and_update();
        slot.close();
        assert!(!rx.has_changed().unwrap());
    }
}
