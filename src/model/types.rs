//! Coordinates, candidates and routes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the two endpoint inputs of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Start,
    End,
}

impl Field {
    pub(crate) fn index(self) -> usize {
        match self {
            Field::Start => 0,
            Field::End => 1,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Start => write!(f, "start"),
            Field::End => write!(f, "end"),
        }
    }
}

/// Errors produced when reading a `"lat,lon"` pair.
#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("expected \"lat,lon\", got {0:?}")]
    Malformed(String),

    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Build a coordinate, rejecting values that cannot sit on a map.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }
}

/// Formats as `lat,lon` using the shortest decimal form that reads back to
/// the same `f64`. Share links depend on this being stable.
impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for LatLon {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordinateError::Malformed(s.to_string());
        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
        let lon: f64 = lon.trim().parse().map_err(|_| malformed())?;
        LatLon::new(lat, lon)
    }
}

/// A geocoding match, only meaningful for the query that produced it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Candidate {
    pub display_name: String,
    pub coordinate: LatLon,
}

/// Identifies an in-flight lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub field: Field,
    pub text: String,
}

impl Query {
    pub fn new(field: Field, text: impl Into<String>) -> Self {
        Self {
            field,
            text: text.into(),
        }
    }
}

/// A resolved pair of endpoints. Never mutated; a new route replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Route {
    start: LatLon,
    end: LatLon,
}

impl Route {
    pub fn new(start: LatLon, end: LatLon) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> LatLon {
        self.start
    }

    pub fn end(&self) -> LatLon {
        self.end
    }

    pub fn endpoint(&self, field: Field) -> LatLon {
        match field {
            Field::Start => self.start,
            Field::End => self.end,
        }
    }
}
