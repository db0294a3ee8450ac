//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the widget
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the route widget service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WidgetConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Geocoding service settings.
    pub geocoder: GeocoderConfig,

    /// Type-ahead suggestion settings.
    pub suggestions: SuggestionConfig,

    /// Route overlay construction parameters.
    pub overlay: OverlayConfig,

    /// Share link settings.
    pub share: ShareConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Total time allowed for one API request in seconds.
    pub request_timeout_secs: u64,

    /// Maximum number of live widget sessions.
    pub max_sessions: usize,

    /// Sessions untouched for this many seconds are torn down.
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
            max_sessions: 10_000,
            session_idle_secs: 1800,
        }
    }
}

/// Geocoding service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim-compatible search service.
    pub base_url: String,

    /// User-Agent sent with every request. Nominatim rejects anonymous clients.
    pub user_agent: String,

    /// Per-lookup deadline in milliseconds.
    pub timeout_ms: u64,

    /// Maximum candidates requested per lookup.
    pub max_results: usize,

    /// Optional `Accept-Language` preference (e.g., "en,fr").
    pub accept_language: Option<String>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("route-widget/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 5_000,
            max_results: 5,
            accept_language: None,
        }
    }
}

/// Type-ahead suggestion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Quiet period after the last keystroke before a lookup fires.
    pub debounce_ms: u64,

    /// Inputs shorter than this (in characters) never hit the network.
    pub min_query_chars: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_chars: 3,
        }
    }
}

/// Overlay construction parameters handed to the routing layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Path line color.
    pub line_color: String,

    /// Path line weight in pixels.
    pub line_weight: u32,

    /// Let the routing layer recompute while a waypoint is dragged.
    pub route_while_dragging: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            line_color: "blue".to_string(),
            line_weight: 4,
            route_while_dragging: true,
        }
    }
}

/// Share link configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Page URL the share query string is attached to.
    pub base_url: String,

    /// Feed decoded `lat,lon` strings through free-text geocoding instead of
    /// building the route from them directly.
    pub geocode_decoded_coordinates: bool,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/".to_string(),
            geocode_decoded_coordinates: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
