//! Share link encoding and decoding.
//!
//! # Format
//! ```text
//! <base_url>?start=<lat>,<lon>&end=<lat>,<lon>
//! ```
//! Coordinates use the shortest decimal form that reads back to the same
//! value, so `decode(encode(r))` returns the exact strings that were written.

use serde::Serialize;
use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::model::{CoordinateError, LatLon, Route};

pub const START_PARAM: &str = "start";
pub const END_PARAM: &str = "end";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// `encode` was asked for a link before any route existed.
    #[error("There is no route to share yet. Search for a route first.")]
    NothingToShare,

    /// The link lacks a `start` or `end` parameter.
    #[error("link does not describe a route")]
    InvalidLink,

    #[error("invalid share base URL: {0}")]
    InvalidBaseUrl(String),
}

/// The two raw values carried by a share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedLink {
    pub start: String,
    pub end: String,
}

impl DecodedLink {
    /// Read both values as coordinates.
    pub fn coordinates(&self) -> Result<(LatLon, LatLon), CoordinateError> {
        Ok((self.start.parse()?, self.end.parse()?))
    }
}

/// Converts between routes and share URLs.
#[derive(Debug, Clone)]
pub struct ShareLinkCodec {
    base_url: Url,
}

impl ShareLinkCodec {
    pub fn new(base_url: &str) -> Result<Self, ShareError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ShareError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self { base_url })
    }

    /// The canonical query string for `route`, without a leading `?`.
    pub fn query(route: &Route) -> String {
        format!(
            "{}={}&{}={}",
            START_PARAM,
            route.start(),
            END_PARAM,
            route.end()
        )
    }

    /// Full share URL for the current route.
    pub fn encode(&self, route: Option<&Route>) -> Result<String, ShareError> {
        let route = route.ok_or(ShareError::NothingToShare)?;
        let mut url = self.base_url.clone();
        url.set_query(Some(&Self::query(route)));
        url.set_fragment(None);
        Ok(url.into())
    }

    /// Extract the raw `start` and `end` values from a URL, a `?query`, or a
    /// bare query string. No geocoding is performed.
    pub fn decode(&self, link: &str) -> Option<DecodedLink> {
        decode(link)
    }
}

/// See [`ShareLinkCodec::decode`].
pub fn decode(link: &str) -> Option<DecodedLink> {
    let link = link.trim();
    let query = match Url::parse(link) {
        Ok(url) => url.query()?.to_string(),
        Err(_) => {
            let without_prefix = link.split_once('?').map_or(link, |(_, q)| q);
            without_prefix
                .split_once('#')
                .map_or(without_prefix, |(q, _)| q)
                .to_string()
        }
    };

    let mut start = None;
    let mut end = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            START_PARAM if start.is_none() => start = Some(value.into_owned()),
            END_PARAM if end.is_none() => end = Some(value.into_owned()),
            _ => {}
        }
    }

    match (start, end) {
        (Some(start), Some(end)) if !start.trim().is_empty() && !end.trim().is_empty() => {
            Some(DecodedLink { start, end })
        }
        _ => None,
    }
}
