//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::geocoding::{GeocodeError, GeocodeResult, Geocoder};
use crate::model::{Candidate, LatLon};

#[derive(Clone)]
enum Scripted {
    Found(Vec<Candidate>),
    Fail,
}

/// Geocoder answering from a fixed table, with optional per-query latency.
/// Unknown queries return no candidates.
#[derive(Default)]
pub(crate) struct ScriptedGeocoder {
    answers: HashMap<String, (Duration, Scripted)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, text: &str, places: &[(&str, f64, f64)]) -> Self {
        self.with_delay(text, Duration::ZERO, places)
    }

    pub fn with_delay(mut self, text: &str, delay: Duration, places: &[(&str, f64, f64)]) -> Self {
        let candidates = places
            .iter()
            .map(|(name, lat, lon)| candidate(name, *lat, *lon))
            .collect();
        self.answers
            .insert(text.to_string(), (delay, Scripted::Found(candidates)));
        self
    }

    pub fn failing(mut self, text: &str) -> Self {
        self.answers
            .insert(text.to_string(), (Duration::ZERO, Scripted::Fail));
        self
    }

    /// Every query received, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Geocoder for ScriptedGeocoder {
    async fn search(&self, text: &str) -> GeocodeResult<Vec<Candidate>> {
        self.calls.lock().unwrap().push(text.to_string());
        let (delay, answer) = self
            .answers
            .get(text)
            .cloned()
            .unwrap_or((Duration::ZERO, Scripted::Found(Vec::new())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match answer {
            Scripted::Found(candidates) => Ok(candidates),
            Scripted::Fail => Err(GeocodeError::Service(format!("scripted failure for {text}"))),
        }
    }
}

pub(crate) fn candidate(name: &str, lat: f64, lon: f64) -> Candidate {
    Candidate {
        display_name: name.to_string(),
        coordinate: LatLon::new(lat, lon).unwrap(),
    }
}

pub(crate) fn point(lat: f64, lon: f64) -> LatLon {
    LatLon::new(lat, lon).unwrap()
}
