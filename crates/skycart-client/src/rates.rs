//! # Exchange Rates
//!
//! Fetches EUR-based rates and keeps the last good table around.
//!
//! ## Degradation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RatesProvider::latest()                                                │
//! │                                                                         │
//! │   fetch live ──ok──► cache it ──► RatesSnapshot { origin: Live }        │
//! │        │                                                                │
//! │       err                                                               │
//! │        ▼                                                                │
//! │   cache hit? ──yes──► RatesSnapshot { origin: Cached }                  │
//! │        │                                                                │
//! │        no                                                               │
//! │        ▼                                                                │
//! │   RatesSnapshot::fallback()   (1.08 / 0.86, date "offline")             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use skycart_core::{Currency, Rates, RatesOrigin, RatesSnapshot};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::http::{build_client, read_json};

// =============================================================================
// Source Trait
// =============================================================================

/// Anything that can produce a fresh rate table.
#[async_trait]
pub trait RatesSource: Send + Sync {
    async fn fetch_rates(&self) -> ClientResult<RatesSnapshot>;
}

// =============================================================================
// Frankfurter
// =============================================================================

/// `GET /latest?from=EUR&to=USD,GBP` response body.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: NaiveDate,
    rates: HashMap<String, f64>,
}

impl LatestResponse {
    fn into_snapshot(self) -> ClientResult<RatesSnapshot> {
        if self.base != Currency::Eur.code() {
            return Err(ClientError::DeserializationFailed(format!(
                "expected EUR based rates, got {}",
                self.base
            )));
        }

        let pick = |currency: Currency| {
            self.rates.get(currency.code()).copied().ok_or_else(|| {
                ClientError::DeserializationFailed(format!("missing {} rate", currency))
            })
        };
        let rates = Rates::new(pick(Currency::Usd)?, pick(Currency::Gbp)?)?;

        Ok(RatesSnapshot {
            rates,
            date: Some(self.date),
            origin: RatesOrigin::Live,
        })
    }
}

/// Frankfurter latest-rates endpoint.
#[derive(Debug, Clone)]
pub struct FrankfurterRates {
    client: Client,
    url: String,
}

impl FrankfurterRates {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        FrankfurterRates {
            client,
            url: url.into(),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> ClientResult<Self> {
        Ok(Self::new(build_client(settings)?, settings.rates_url.clone()))
    }
}

#[async_trait]
impl RatesSource for FrankfurterRates {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_rates(&self) -> ClientResult<RatesSnapshot> {
        let response = self.client.get(&self.url).send().await?;
        let body: LatestResponse = read_json(response).await?;
        let snapshot = body.into_snapshot()?;

        debug!(
            usd = snapshot.rates.get(Currency::Usd),
            gbp = snapshot.rates.get(Currency::Gbp),
            date = %snapshot.date_label(),
            "Fetched live rates"
        );
        Ok(snapshot)
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Wraps a [`RatesSource`] with a last-known-good cache.
pub struct RatesProvider<S> {
    source: S,
    cache: RwLock<Option<RatesSnapshot>>,
}

impl<S: RatesSource> RatesProvider<S> {
    pub fn new(source: S) -> Self {
        RatesProvider {
            source,
            cache: RwLock::new(None),
        }
    }

    /// Best available rates. Never fails.
    pub async fn latest(&self) -> RatesSnapshot {
        match self.source.fetch_rates().await {
            Ok(snapshot) => {
                *self.cache.write().await = Some(snapshot);
                info!(date = %snapshot.date_label(), "Using live rates");
                snapshot
            }
            Err(e) => match *self.cache.read().await {
                Some(cached) => {
                    warn!(error = %e, date = %cached.date_label(), "Rates fetch failed, using cached rates");
                    RatesSnapshot {
                        origin: RatesOrigin::Cached,
                        ..cached
                    }
                }
                None => {
                    warn!(error = %e, "Rates fetch failed, using fallback rates");
                    RatesSnapshot::fallback()
                }
            },
        }
    }

    /// Last live snapshot, if any fetch has succeeded.
    pub async fn cached(&self) -> Option<RatesSnapshot> {
        *self.cache.read().await
    }
}
