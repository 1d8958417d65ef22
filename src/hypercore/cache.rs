//! Process-wide metadata cache.
//!
//! Wraps the free `perp_markets`/`spot_markets`/`spot_tokens` info-endpoint
//! calls in [`mod@super`] with a symbol-indexed registry and a refreshable
//! mid-price table, so the order normalizer never has to round-trip to
//! `/info` for every order it builds.
//!
//! The registry is built once, lazily, and published atomically: readers
//! either see nothing yet (triggering a load) or a fully built universe,
//! never a partial one. Mids are kept in a separate, independently
//! refreshable map since they change far more often than the asset list.

use std::{collections::HashMap, sync::Arc, sync::RwLock};

use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use url::Url;

use super::error::Error;

/// Whether a cached asset trades on the perp or spot order book.
///
/// The facade and normalizer use this to pick the right price-decimal
/// budget (`6 - szDecimals` for perps, `8 - szDecimals` for spot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Perp,
    Spot,
}

/// A resolved asset: its wire id, size precision, and instrument kind.
#[derive(Debug, Clone, Copy)]
pub struct CachedAsset {
    pub id: usize,
    pub sz_decimals: i64,
    pub kind: InstrumentKind,
}

impl CachedAsset {
    /// Maximum decimal places a price for this asset may carry, per §4.A.
    #[must_use]
    pub fn max_price_decimals(&self) -> i64 {
        let budget = match self.kind {
            InstrumentKind::Perp => 6,
            InstrumentKind::Spot => 8,
        };
        (budget - self.sz_decimals).max(0)
    }
}

struct Registry {
    by_symbol: HashMap<String, CachedAsset>,
}

/// Concurrency-safe, lazily-loaded cache of asset metadata and mid prices.
///
/// Cheap to clone: internally `Arc`-backed, so callers can share one
/// instance across an application without wrapping it themselves.
pub struct MetadataCache {
    http_client: HttpClient,
    base_url: Url,
    registry: RwLock<Option<Arc<Registry>>>,
    mids: RwLock<HashMap<String, Decimal>>,
}

impl MetadataCache {
    /// Builds an (empty, unloaded) cache pointed at the given `/info` host.
    #[must_use]
    pub fn new(base_url: Url, http_client: HttpClient) -> Self {
        Self {
            http_client,
            base_url,
            registry: RwLock::new(None),
            mids: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves a symbol (case-insensitive) to its cached asset metadata.
    ///
    /// Lazily loads the asset universe on first use.
    pub async fn resolve_asset(&self, symbol: &str) -> Result<CachedAsset, Error> {
        let registry = self.ensure_registry().await?;
        registry
            .by_symbol
            .get(&symbol.to_uppercase())
            .copied()
            .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
    }

    /// Thin accessor over [`resolve_asset`](Self::resolve_asset) for callers
    /// that only need the size precision.
    pub async fn sz_decimals(&self, symbol: &str) -> Result<i64, Error> {
        Ok(self.resolve_asset(symbol).await?.sz_decimals)
    }

    /// Best-effort warm-up: loads the asset universe and mid prices
    /// concurrently. Failures are logged and swallowed; later lookups fall
    /// back to lazy loading. Never blocks core operations on failure.
    pub async fn warm_up(&self) {
        let (registry, mids) =
            tokio::join!(Self::build_registry(&self.base_url, &self.http_client), self.fetch_mids());

        match registry {
            Ok(registry) => *self.registry.write().unwrap() = Some(Arc::new(registry)),
            Err(err) => log::warn!("metadata cache warm-up: asset universe load failed: {err}"),
        }

        match mids {
            Ok(mids) => *self.mids.write().unwrap() = mids,
            Err(err) => log::warn!("metadata cache warm-up: mid price load failed: {err}"),
        }
    }

    /// Returns the cached mid price for `symbol`, fetching it on demand if
    /// the mid table hasn't been populated yet.
    pub async fn mid_or_error(&self, symbol: &str) -> Result<Decimal, Error> {
        if let Some(mid) = self.mids.read().unwrap().get(symbol).copied() {
            return Ok(mid);
        }

        let mids = self.fetch_mids().await?;
        let mid = mids.get(symbol).copied();
        *self.mids.write().unwrap() = mids;

        mid.ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
    }

    async fn ensure_registry(&self) -> Result<Arc<Registry>, Error> {
        if let Some(registry) = self.registry.read().unwrap().clone() {
            return Ok(registry);
        }

        let built = Arc::new(Self::build_registry(&self.base_url, &self.http_client).await?);
        *self.registry.write().unwrap() = Some(built.clone());
        Ok(built)
    }

    async fn build_registry(base_url: &Url, http_client: &HttpClient) -> Result<Registry, Error> {
        let (perps, spots) = tokio::try_join!(
            super::perp_markets(base_url.clone(), http_client.clone(), None),
            super::spot_markets(base_url.clone(), http_client.clone()),
        )
        .map_err(|err| Error::Io(err.to_string()))?;

        let mut by_symbol = HashMap::with_capacity(perps.len() + spots.len());

        for market in perps {
            by_symbol.insert(
                market.name.to_uppercase(),
                CachedAsset {
                    id: market.index,
                    sz_decimals: market.sz_decimals,
                    kind: InstrumentKind::Perp,
                },
            );
        }

        for market in spots {
            by_symbol.insert(
                market.symbol().to_uppercase(),
                CachedAsset {
                    id: market.index,
                    sz_decimals: market.base().sz_decimals,
                    kind: InstrumentKind::Spot,
                },
            );
        }

        Ok(Registry { by_symbol })
    }

    async fn fetch_mids(&self) -> Result<HashMap<String, Decimal>, Error> {
        let mut url = self.base_url.clone();
        url.set_path("/info");

        let resp = self
            .http_client
            .post(url)
            .json(&super::types::InfoRequest::AllMids)
            .send()
            .await
            .map_err(Error::from)?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::from)?;

        if status.is_client_error() {
            return Err(Error::Http4xx { status: status.as_u16(), body: text });
        }
        if status.is_server_error() {
            return Err(Error::Http5xx { status: status.as_u16(), body: text });
        }

        serde_json::from_str(&text).map_err(|err| Error::Io(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_price_decimals_clamps_at_zero() {
        let perp = CachedAsset {
            id: 0,
            sz_decimals: 6,
            kind: InstrumentKind::Perp,
        };
        assert_eq!(perp.max_price_decimals(), 0);

        let spot = CachedAsset {
            id: 10_000,
            sz_decimals: 3,
            kind: InstrumentKind::Spot,
        };
        assert_eq!(spot.max_price_decimals(), 5);
    }
}
