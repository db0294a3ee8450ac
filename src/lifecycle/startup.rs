//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Bind the listener last, once everything else is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::WidgetConfig;
use crate::geocoding::{GeocodeError, NominatimGeocoder};
use crate::widget::SessionRegistry;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("geocoder setup failed: {0}")]
    Geocoder(#[from] GeocodeError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything the server needs, ready to run.
pub struct Prepared {
    pub registry: Arc<SessionRegistry<NominatimGeocoder>>,
    pub listener: TcpListener,
}

/// Build the geocoder and session registry, then bind the listener.
pub async fn prepare(config: WidgetConfig) -> Result<Prepared, StartupError> {
    let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);

    let address = config.server.bind_address.clone();
    let registry = Arc::new(SessionRegistry::new(geocoder, config));

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    Ok(Prepared { registry, listener })
}
