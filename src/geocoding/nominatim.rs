//! Nominatim (OpenStreetMap) geocoding client.
//!
//! # Responsibilities
//! - Build `search?format=jsonv2&q=...` requests against the configured host
//! - Decode records into candidates, keeping service order
//! - Skip records whose coordinates do not parse

use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::GeocoderConfig;
use crate::geocoding::error::{GeocodeError, GeocodeResult};
use crate::geocoding::Geocoder;
use crate::model::{Candidate, LatLon};

/// One record of a Nominatim search response. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchRecord {
    display_name: String,
    lat: String,
    lon: String,
}

impl SearchRecord {
    fn into_candidate(self) -> Option<Candidate> {
        let lat = self.lat.trim().parse().ok()?;
        let lon = self.lon.trim().parse().ok()?;
        let coordinate = LatLon::new(lat, lon).ok()?;
        Some(Candidate {
            display_name: self.display_name,
            coordinate,
        })
    }
}

/// Geocoder backed by a Nominatim-compatible HTTP service.
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
    max_results: usize,
    accept_language: Option<String>,
}

impl NominatimGeocoder {
    /// Create a client from configuration.
    pub fn new(config: &GeocoderConfig) -> GeocodeResult<Self> {
        let mut search_url = Url::parse(&config.base_url)
            .map_err(|e| GeocodeError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        search_url
            .path_segments_mut()
            .map_err(|_| GeocodeError::InvalidBaseUrl(config.base_url.clone()))?
            .pop_if_empty()
            .push("search");

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        tracing::info!(url = %search_url, max_results = config.max_results, "Geocoder initialized");

        Ok(Self {
            client,
            search_url,
            max_results: config.max_results,
            accept_language: config.accept_language.clone(),
        })
    }

    /// The request URL used for `text`.
    pub fn request_url(&self, text: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("q", text)
            .append_pair("limit", &self.max_results.to_string());
        url
    }
}

impl Geocoder for NominatimGeocoder {
    async fn search(&self, text: &str) -> GeocodeResult<Vec<Candidate>> {
        let url = self.request_url(text);
        tracing::debug!(%url, "Geocoding request");

        let mut request = self.client.get(url);
        if let Some(lang) = &self.accept_language {
            request = request.header(ACCEPT_LANGUAGE, lang);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let records: Vec<SearchRecord> = response.json().await?;
        let total = records.len();
        let candidates: Vec<Candidate> = records
            .into_iter()
            .filter_map(SearchRecord::into_candidate)
            .take(self.max_results)
            .collect();

        if candidates.len() < total.min(self.max_results) {
            tracing::warn!(
                query = %text,
                dropped = total - candidates.len(),
                "Skipped geocoding records with unusable coordinates"
            );
        }
        Ok(candidates)
    }
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("search_url", &self.search_url.as_str())
            .field("max_results", &self.max_results)
            .finish()
    }
}
