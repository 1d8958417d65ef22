//! HTTP client for HyperCore API interactions.
//!
//! This module provides the HTTP client for placing orders, querying balances,
//! managing positions, and performing asset transfers on Hyperliquid.
//!
//! # Examples
//!
//! ## Query User Balances
//!
//! ```no_run
//! use hypercore_sdk::hypercore;
//! use hypercore_sdk::Address;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = hypercore::mainnet();
//! let user: Address = "0x...".parse()?;
//! let balances = client.user_balances(user).await?;
//!
//! for balance in balances {
//!     println!("{}: {}", balance.coin, balance.total);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Place Orders
//!
//! ```no_run
//! use hypercore_sdk::hypercore::{self, types::*, PrivateKeySigner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = hypercore::mainnet();
//! let signer: PrivateKeySigner = "your_key".parse()?;
//!
//! // Note: This example shows the structure but cannot run without
//! // the rust_decimal_macros::dec!() macro and chrono clock feature.
//! // In real usage, replace with actual decimal values and timestamp.
//! # Ok(())
//! # }
//! ```

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use alloy::{
    primitives::Address,
    signers::{Signer, SignerSync},
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use super::cache::MetadataCache;
use super::normalizer::{self, IntentOrderType, OrderIntent, PositionSnapshot};
use super::signing::*;
use crate::hypercore::{
    Chain, Cloid, OidOrCloid, PerpMarket, SpotMarket, SpotToken,
    error::{ActionError, Error},
    mainnet_url, testnet_url,
    types::{
        Action, AgentEnableDexAbstraction, ApiResponse, ApproveAgent, ApproveBuilderFeeAction,
        BasicOrder, BatchCancel, BatchCancelCloid, BatchModify, BatchOrder, BuilderFee, Cancel,
        CancelByCloid, CSignerActionPayload, ClearinghouseState, ConvertToMultiSigUser,
        CreateSubAccount, CValidatorActionPayload, Fill, InfoRequest, Modify, OkResponse,
        OrderGrouping, OrderResponseStatus, OrderUpdate, PerpDeployAction, ScheduleCancel,
        SendAsset, SendToken, SetReferrerAction, SignersConfig, SpotDeployAction, SpotSend,
        SubAccountSpotTransfer, SubAccountTransfer, TimeInForce, TokenDelegateAction, UpdateLeverage,
        UpdateIsolatedMargin, UsdClassTransferAction, UsdSend, UserBalance, UserDexAbstractionAction,
        VaultTransfer, Withdraw3Action,
    },
};

/// Upper bound on the builder fee's `f` field (tenths of a basis point),
/// per spec §4.G: `f ≥ 0, f ≤ 10⁶`.
pub const MAX_BUILDER_FEE: u64 = 1_000_000;

/// Retry policy for the HTTP transport (spec §4.C, §5 "Back-off").
///
/// Only [`Error::Http5xx`] and [`Error::Io`] are retried; [`Error::Http4xx`]
/// always short-circuits regardless of the policy. Back-off is
/// `min(prev * multiplier, max_backoff)`, starting from `initial_backoff`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(250),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
            max_retries: 3,
        }
    }
}

/// Runs `attempt` under `policy`, retrying classified-retryable failures.
///
/// A free function generic over an async closure (rather than a method on
/// [`Client`]) so it can be exercised in tests with an in-memory closure
/// returning canned `Result<T, Error>` outcomes, with no live server or
/// HTTP-mocking dependency.
pub async fn retry_with<T, Fut>(policy: RetryPolicy, mut attempt: impl FnMut() -> Fut) -> Result<T, Error>
where
    Fut: Future<Output = Result<T, Error>>,
{
    let mut backoff = policy.initial_backoff;
    let mut tries = 0u32;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && tries < policy.max_retries => {
                log::warn!("retrying after {err} (attempt {tries}, sleeping {backoff:?})");
                tokio::time::sleep(backoff).await;
                backoff = backoff
                    .mul_f64(policy.multiplier)
                    .min(policy.max_backoff);
                tries += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Builder-style configuration for [`Client`].
///
/// Mirrors the existing `Client::new`/`with_url` pattern while adding the
/// knobs the ambient stack needs: retry policy, vault address, builder-fee
/// bound, and a debug-bodies flag for verbose request/response logging.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub chain: Chain,
    pub base_url: Option<Url>,
    pub timeout: Duration,
    pub retry_policy: Option<RetryPolicy>,
    pub vault_address: Option<Address>,
    pub max_builder_fee: u64,
    pub debug_bodies: bool,
}

impl ClientConfig {
    /// Starts a config for `chain` with the crate's defaults.
    #[must_use]
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            base_url: None,
            timeout: Duration::from_secs(10),
            retry_policy: None,
            vault_address: None,
            max_builder_fee: MAX_BUILDER_FEE,
            debug_bodies: false,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn with_vault_address(mut self, vault_address: Address) -> Self {
        self.vault_address = Some(vault_address);
        self
    }

    #[must_use]
    pub fn with_max_builder_fee(mut self, max_builder_fee: u64) -> Self {
        self.max_builder_fee = max_builder_fee;
        self
    }

    #[must_use]
    pub fn with_debug_bodies(mut self, debug_bodies: bool) -> Self {
        self.debug_bodies = debug_bodies;
        self
    }
}

/// HTTP client for HyperCore API.
///
/// Provides methods for trading, querying market data, managing positions,
/// and performing asset transfers.
///
/// # Example
///
/// ```
/// use hypercore_sdk::hypercore;
///
/// let client = hypercore::mainnet();
/// // Use client for API calls
/// ```
pub struct Client {
    http_client: reqwest::Client,
    base_url: Url,
    chain: Chain,
    cache: MetadataCache,
    retry_policy: Option<RetryPolicy>,
    vault_address: Option<Address>,
    max_builder_fee: u64,
    debug_bodies: bool,
}

impl Client {
    /// Creates a new HTTP client for the specified chain.
    ///
    /// The base URL is automatically determined based on the chain:
    /// - `Chain::Mainnet`: `https://api.hyperliquid.xyz`
    /// - `Chain::Testnet`: `https://api.hyperliquid-testnet.xyz`
    ///
    /// All actions signed by this client will use chain-specific values:
    /// - Agent source field: `"a"` for mainnet, `"b"` for testnet
    /// - Multisig chain ID: `"0x66eee"` for mainnet, `"0x66eef"` for testnet
    ///
    /// # Example
    ///
    /// ```
    /// use hypercore_sdk::hypercore::{HttpClient, Chain};
    ///
    /// // Create a mainnet client
    /// let mainnet_client = HttpClient::new(Chain::Mainnet);
    ///
    /// // Create a testnet client
    /// let testnet_client = HttpClient::new(Chain::Testnet);
    /// ```
    pub fn new(chain: Chain) -> Self {
        Self::from_config(ClientConfig::new(chain))
    }

    /// Creates a client from an explicit [`ClientConfig`].
    ///
    /// Prefer this over `new()` when a custom base URL, retry policy, vault
    /// address, builder-fee bound, or debug logging is needed.
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        let base_url = config.base_url.unwrap_or_else(|| {
            if config.chain.is_mainnet() {
                mainnet_url()
            } else {
                testnet_url()
            }
        });

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .tcp_nodelay(true)
            .build()
            .unwrap();

        let cache = MetadataCache::new(base_url.clone(), http_client.clone());

        Self {
            http_client,
            base_url,
            chain: config.chain,
            cache,
            retry_policy: config.retry_policy,
            vault_address: config.vault_address,
            max_builder_fee: config.max_builder_fee,
            debug_bodies: config.debug_bodies,
        }
    }

    /// Sets a custom base URL for this client.
    ///
    /// This is useful when connecting to a custom Hyperliquid node or proxy.
    /// The chain configuration is preserved.
    ///
    /// # Example
    ///
    /// ```
    /// use hypercore_sdk::hypercore::{HttpClient, Chain};
    /// use url::Url;
    ///
    /// let custom_url: Url = "https://my-custom-node.example.com".parse().unwrap();
    /// let client = HttpClient::new(Chain::Mainnet)
    ///     .with_url(custom_url);
    /// ```
    pub fn with_url(self, base_url: Url) -> Self {
        let cache = MetadataCache::new(base_url.clone(), self.http_client.clone());
        Self { base_url, cache, ..self }
    }

    /// Returns the chain this client is configured for.
    #[must_use]
    pub const fn chain(&self) -> Chain {
        self.chain
    }

    /// Best-effort warms the metadata cache (asset universe + mid prices).
    ///
    /// Failures are logged and swallowed per spec §4.B; later calls fall
    /// back to lazy, on-demand loading.
    pub async fn warm_up(&self) {
        self.cache.warm_up().await;
    }

    /// Posts `body` to `url` and classifies the outcome per spec §4.C.
    ///
    /// Unlike a bare `reqwest::Response`, this inspects the status line
    /// itself rather than relying on `error_for_status`: a `4xx`/`5xx` body
    /// is still valid JSON the server meant to send, so the classification
    /// has to happen before the response is handed to a deserializer that
    /// only knows the success schema.
    ///
    /// A free function (not a `&self` method) so [`Client::sign_and_send`]
    /// can use it from a `'static` future that has already detached from
    /// the client's lifetime.
    async fn send_classified<T: serde::de::DeserializeOwned>(
        http_client: &reqwest::Client,
        url: Url,
        body: &serde_json::Value,
        debug_bodies: bool,
    ) -> Result<T, Error> {
        if debug_bodies {
            log::debug!("POST {url} request body: {body}");
        }

        let resp = http_client.post(url.clone()).json(body).send().await.map_err(Error::from)?;
        let status = resp.status();
        let text = resp.text().await.map_err(Error::from)?;

        if debug_bodies {
            log::debug!("POST {url} response ({status}): {text}");
        }

        if status.is_client_error() {
            return Err(Error::Http4xx { status: status.as_u16(), body: text });
        }
        if status.is_server_error() {
            return Err(Error::Http5xx { status: status.as_u16(), body: text });
        }

        serde_json::from_str(&text).map_err(|err| Error::Io(err.to_string()))
    }

    /// Posts `body` to `path`, retrying per [`ClientConfig::with_retry_policy`]
    /// when one is configured. Only [`Error::Http5xx`]/[`Error::Io`] are
    /// retried; [`Error::Http4xx`] always short-circuits (spec §5, §8).
    async fn post_classified<T: serde::de::DeserializeOwned>(&self, path: &str, body: impl Serialize) -> Result<T, Error> {
        let body = serde_json::to_value(&body).map_err(|err| Error::EncodeError(err.to_string()))?;
        let mut url = self.base_url.clone();
        url.set_path(path);

        match self.retry_policy {
            Some(policy) => {
                retry_with(policy, || Self::send_classified(&self.http_client, url.clone(), &body, self.debug_bodies))
                    .await
            }
            None => Self::send_classified(&self.http_client, url, &body, self.debug_bodies).await,
        }
    }

    /// Posts an `/info` query and deserializes the response, per spec §6.
    async fn post_info<T: serde::de::DeserializeOwned>(&self, body: impl Serialize) -> Result<T, Error> {
        self.post_classified("/info", body).await
    }

    /// Fetches all available perpetual futures markets.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let perps = client.perps().await?;
    ///
    /// for market in perps {
    ///     println!("{}: {}x leverage", market.name, market.max_leverage);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[inline(always)]
    pub async fn perps(&self) -> Result<Vec<PerpMarket>> {
        super::perp_markets(self.base_url.clone(), self.http_client.clone()).await
    }

    /// Fetches all available spot markets.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let spots = client.spot().await?;
    ///
    /// for market in spots {
    ///     println!("{}", market.symbol());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[inline(always)]
    pub async fn spot(&self) -> Result<Vec<SpotMarket>> {
        super::spot_markets(self.base_url.clone(), self.http_client.clone()).await
    }

    /// Fetches all available spot tokens.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let tokens = client.spot_tokens().await?;
    ///
    /// for token in tokens {
    ///     println!("{}: {} decimals", token.name, token.sz_decimals);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[inline(always)]
    pub async fn spot_tokens(&self) -> Result<Vec<SpotToken>> {
        super::spot_tokens(self.base_url.clone(), self.http_client.clone()).await
    }

    /// Returns all open orders for a user.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore;
    /// use hypercore_sdk::Address;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let user: Address = "0x...".parse()?;
    /// let orders = client.open_orders(user).await?;
    ///
    /// for order in orders {
    ///     println!("{} {} @ {}", order.side, order.sz, order.limit_px);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open_orders(&self, user: Address) -> Result<Vec<BasicOrder>> {
        Ok(self.post_info(InfoRequest::FrontendOpenOrders { user }).await?)
    }

    /// Returns mid prices for all perpetual markets.
    ///
    /// Returns a map of market name to mid price.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let mids = client.all_mids().await?;
    ///
    /// for (market, price) in mids {
    ///     println!("{}: {}", market, price);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn all_mids(&self) -> Result<HashMap<String, Decimal>> {
        Ok(self.post_info(InfoRequest::AllMids).await?)
    }

    /// Returns the user's historical orders.
    pub async fn historical_orders(&self, user: Address) -> Result<Vec<BasicOrder>> {
        Ok(self.post_info(InfoRequest::HistoricalOrders { user }).await?)
    }

    /// Returns the user's fills.
    pub async fn user_fills(&self, user: Address) -> Result<Vec<Fill>> {
        Ok(self.post_info(InfoRequest::UserFills { user }).await?)
    }

    /// Returns the status of an order.
    pub async fn order_status(
        &self,
        user: Address,
        oid: OidOrCloid,
    ) -> Result<Option<OrderUpdate>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        #[serde(tag = "status")]
        enum Response {
            Order { order: OrderUpdate },
            UnknownOid,
        }

        let data: Response = self.post_info(InfoRequest::OrderStatus { user, oid }).await?;

        Ok(match data {
            Response::Order { order } => Some(order),
            Response::UnknownOid => None,
        })
    }

    /// Retrieves spot token balances for a user.
    ///
    /// Returns all tokens the user holds on the spot market, including held (locked) and total amounts.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore;
    /// use hypercore_sdk::Address;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let user: Address = "0x...".parse()?;
    /// let balances = client.user_balances(user).await?;
    ///
    /// for balance in balances {
    ///     println!("{}: total={}, held={}", balance.coin, balance.total, balance.hold);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn user_balances(&self, user: Address) -> Result<Vec<UserBalance>> {
        #[derive(Deserialize)]
        struct Balances {
            balances: Vec<UserBalance>,
        }

        let data: Balances = self.post_info(InfoRequest::SpotClearinghouseState { user }).await?;

        Ok(data.balances)
    }

    /// Returns the user's perpetual clearinghouse state (open positions, margin summary).
    ///
    /// Each call fetches fresh state from the server; the client does not cache
    /// positions across calls, so close-position inference never races a recent fill.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore;
    /// use hypercore_sdk::Address;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let user: Address = "0x...".parse()?;
    /// let state = client.clearinghouse_state(user).await?;
    ///
    /// for position in state.asset_positions {
    ///     println!("{}: {}", position.position.coin, position.position.szi);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn clearinghouse_state(&self, user: Address) -> Result<ClearinghouseState> {
        Ok(self.post_info(InfoRequest::ClearinghouseState { user }).await?)
    }

    /// Schedule cancellation.
    pub async fn schedule_cancel<S: SignerSync>(
        &self,
        signer: &S,
        nonce: u64,
        when: DateTime<Utc>,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let resp = self
            .sign_and_send(
                signer,
                ScheduleCancel {
                    time: Some(when.timestamp_millis() as u64),
                },
                nonce,
                vault_address,
                expires_after,
            )
            .await?;

        match resp {
            ApiResponse::Ok(OkResponse::Default) => Ok(()),
            ApiResponse::Err(err) => {
                anyhow::bail!("schedule_cancel: {err}")
            }
            _ => anyhow::bail!("schedule_cancel: unexpected response type: {resp:?}"),
        }
    }

    /// Places a batch of orders.
    ///
    /// Submits one or more orders to the exchange. Each order must be signed with your private key.
    ///
    /// # Parameters
    ///
    /// - `signer`: Private key signer for EIP-712 signatures
    /// - `batch`: Batch of orders to place
    /// - `nonce`: Unique nonce (typically current timestamp in milliseconds)
    /// - `vault_address`: Optional vault address if trading on behalf of a vault
    /// - `expires_after`: Optional expiration timestamp for the request
    ///
    /// # Returns
    ///
    /// A future that resolves to order statuses or an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore::{self, types::*, PrivateKeySigner};
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    /// let signer: PrivateKeySigner = "your_key".parse()?;
    ///
    /// // Example order placement - requires dec!() macro and timestamp
    /// // let order = BatchOrder { ... };
    /// // let nonce = chrono::Utc::now().timestamp_millis() as u64;
    /// // let statuses = client.place(&signer, order, nonce, None, None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn place<S: SignerSync>(
        &self,
        signer: &S,
        batch: BatchOrder,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<OrderResponseStatus>, ActionError<Cloid>>> + Send + 'static
    {
        let cloids: Vec<_> = batch.orders.iter().map(|req| req.cloid).collect();

        let future = self.sign_and_send(signer, batch, nonce, vault_address, expires_after);

        async move {
            let resp = future.await.map_err(|err| ActionError::new(cloids.clone(), err.to_string()))?;

            match resp {
                ApiResponse::Ok(OkResponse::Order { statuses }) => Ok(statuses),
                ApiResponse::Err(err) => Err(ActionError::new(cloids, err)),
                _ => Err(ActionError::new(cloids, format!("unexpected response type: {resp:?}"))),
            }
        }
    }

    /// Cancel a batch of orders.
    pub fn cancel<S: SignerSync>(
        &self,
        signer: &S,
        batch: BatchCancel,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<OrderResponseStatus>, ActionError<u64>>> + Send + 'static
    {
        let oids: Vec<_> = batch.cancels.iter().map(|req| req.oid).collect();

        let future = self.sign_and_send(signer, batch, nonce, vault_address, expires_after);

        async move {
            let resp = future.await.map_err(|err| ActionError::new(oids.clone(), err.to_string()))?;

            match resp {
                ApiResponse::Ok(OkResponse::Order { statuses }) => Ok(statuses),
                ApiResponse::Err(err) => Err(ActionError::new(oids, err)),
                _ => Err(ActionError::new(oids, format!("unexpected response type: {resp:?}"))),
            }
        }
    }

    /// Cancel a batch of orders by cloid.
    pub fn cancel_by_cloid<S: SignerSync>(
        &self,
        signer: &S,
        batch: BatchCancelCloid,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<OrderResponseStatus>, ActionError<Cloid>>> + Send + 'static
    {
        let cloids: Vec<_> = batch.cancels.iter().map(|req| req.cloid).collect();

        let future = self.sign_and_send(signer, batch, nonce, vault_address, expires_after);

        async move {
            let resp = future.await.map_err(|err| ActionError::new(cloids.clone(), err.to_string()))?;

            match resp {
                ApiResponse::Ok(OkResponse::Order { statuses }) => Ok(statuses),
                ApiResponse::Err(err) => Err(ActionError::new(cloids, err)),
                _ => Err(ActionError::new(cloids, format!("unexpected response type: {resp:?}"))),
            }
        }
    }

    /// Modify a batch of orders.
    pub fn modify<S: SignerSync>(
        &self,
        signer: &S,
        batch: BatchModify,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<OrderResponseStatus>, ActionError<OidOrCloid>>> + Send + 'static
    {
        let cloids: Vec<_> = batch.modifies.iter().map(|req| req.oid).collect();

        let future = self.sign_and_send(signer, batch, nonce, vault_address, expires_after);

        async move {
            let resp = future.await.map_err(|err| ActionError::new(cloids.clone(), err.to_string()))?;

            match resp {
                ApiResponse::Ok(OkResponse::Order { statuses }) => Ok(statuses),
                ApiResponse::Err(err) => Err(ActionError::new(cloids, err)),
                _ => Err(ActionError::new(cloids, format!("unexpected response type: {resp:?}"))),
            }
        }
    }

    /// Resolves `intent` against the metadata cache and, when relevant, a
    /// fresh position snapshot for `position_user`.
    ///
    /// Mid price and position snapshot are fetched unconditionally and
    /// concurrently; [`normalizer::normalize_order`] only consults them for
    /// the intent classes that actually need them, so an intent that needs
    /// neither simply ignores the fetched (and possibly absent) values.
    async fn resolve_order(&self, intent: OrderIntent, position_user: Address) -> Result<super::types::OrderRequest, Error> {
        let asset = self.cache.resolve_asset(&intent.symbol).await?;
        let (mid, state) = tokio::join!(
            self.cache.mid_or_error(&intent.symbol),
            self.clearinghouse_state(position_user),
        );
        let snapshot = state.ok().as_ref().map(PositionSnapshot::from_clearinghouse_state);

        normalizer::normalize_order(intent, &asset, mid.ok(), snapshot.as_ref(), normalizer::DEFAULT_SLIPPAGE)
    }

    /// Submits a single order intent.
    ///
    /// Resolves the asset, mid price, and (if needed) position snapshot from
    /// the metadata cache before normalizing and signing.
    pub async fn order<S: SignerSync>(
        &self,
        signer: &S,
        intent: OrderIntent,
        builder_fee: Option<BuilderFee>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        if let Some(fee) = &builder_fee {
            fee.validate(self.max_builder_fee)?;
        }

        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let order = self.resolve_order(intent, position_user).await?;
        let batch = BatchOrder {
            orders: vec![order],
            grouping: OrderGrouping::Na,
            builder: builder_fee,
        };

        self.place(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Submits a list of order intents as a single (ungrouped) batch.
    pub async fn bulk_orders<S: SignerSync>(
        &self,
        signer: &S,
        intents: Vec<OrderIntent>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        self.bulk_orders_grouped(signer, intents, OrderGrouping::Na, None, nonce, vault_address, expires_after)
            .await
    }

    /// Submits a list of order intents as a grouped batch (e.g. `positionTpsl`).
    pub async fn bulk_orders_grouped<S: SignerSync>(
        &self,
        signer: &S,
        intents: Vec<OrderIntent>,
        grouping: OrderGrouping,
        builder_fee: Option<BuilderFee>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        if let Some(fee) = &builder_fee {
            fee.validate(self.max_builder_fee)?;
        }

        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let mut orders = Vec::with_capacity(intents.len());
        for intent in intents {
            orders.push(self.resolve_order(intent, position_user).await?);
        }

        let batch = BatchOrder { orders, grouping, builder: builder_fee };

        self.place(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Modifies a single resting order.
    pub async fn modify_order<S: SignerSync>(
        &self,
        signer: &S,
        oid: OidOrCloid,
        intent: OrderIntent,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let order = self.resolve_order(intent, position_user).await?;
        let batch = BatchModify { modifies: vec![Modify { oid, order }] };

        self.modify(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Modifies a list of resting orders.
    pub async fn modify_orders<S: SignerSync>(
        &self,
        signer: &S,
        modifications: Vec<(OidOrCloid, OrderIntent)>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let mut modifies = Vec::with_capacity(modifications.len());
        for (oid, intent) in modifications {
            let order = self.resolve_order(intent, position_user).await?;
            modifies.push(Modify { oid, order });
        }
        let batch = BatchModify { modifies };

        self.modify(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Cancels a single resting order by symbol and exchange-assigned oid.
    pub async fn cancel_order<S: SignerSync>(
        &self,
        signer: &S,
        symbol: &str,
        oid: u64,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let asset = self.cache.resolve_asset(symbol).await?;
        let batch = BatchCancel { cancels: vec![Cancel { asset: asset.id as u32, oid }] };

        self.cancel(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Cancels a single resting order by symbol and client order id.
    pub async fn cancel_order_by_cloid<S: SignerSync>(
        &self,
        signer: &S,
        symbol: &str,
        cloid: Cloid,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let asset = self.cache.resolve_asset(symbol).await?;
        let batch = BatchCancelCloid { cancels: vec![CancelByCloid { asset: asset.id as u32, cloid }] };

        self.cancel_by_cloid(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Cancels a batch of orders, each given as `(symbol, oid)`.
    pub async fn cancel_orders<S: SignerSync>(
        &self,
        signer: &S,
        requests: Vec<(String, u64)>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let mut cancels = Vec::with_capacity(requests.len());
        for (symbol, oid) in requests {
            let asset = self.cache.resolve_asset(&symbol).await?;
            cancels.push(Cancel { asset: asset.id as u32, oid });
        }
        let batch = BatchCancel { cancels };

        self.cancel(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Cancels a batch of orders, each given as `(symbol, cloid)`.
    pub async fn cancel_orders_by_cloid<S: SignerSync>(
        &self,
        signer: &S,
        requests: Vec<(String, Cloid)>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let mut cancels = Vec::with_capacity(requests.len());
        for (symbol, cloid) in requests {
            let asset = self.cache.resolve_asset(&symbol).await?;
            cancels.push(CancelByCloid { asset: asset.id as u32, cloid });
        }
        let batch = BatchCancelCloid { cancels };

        self.cancel_by_cloid(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Closes a position at market (reduce-only, slippage-adjusted IOC order).
    ///
    /// Fails with [`Error::NoPosition`] and sends no HTTP request if the
    /// account holds no open position on `symbol`.
    pub async fn close_position_market<S: SignerSync>(
        &self,
        signer: &S,
        symbol: &str,
        size: Option<Decimal>,
        slippage: Option<Decimal>,
        cloid: Option<Cloid>,
        builder_fee: Option<BuilderFee>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        if let Some(fee) = &builder_fee {
            fee.validate(self.max_builder_fee)?;
        }

        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let asset = self.cache.resolve_asset(symbol).await?;
        let (mid, state) = tokio::join!(self.cache.mid_or_error(symbol), self.clearinghouse_state(position_user));
        let snapshot = PositionSnapshot::from_clearinghouse_state(&state?);

        let intent = OrderIntent {
            instrument: asset.kind,
            symbol: symbol.to_string(),
            is_buy: None,
            size,
            reduce_only: true,
            order_type: IntentOrderType::Limit { tif: TimeInForce::Ioc },
            limit_price: None,
            cloid,
            slippage,
        };
        let order = normalizer::normalize_order(intent, &asset, mid.ok(), Some(&snapshot), normalizer::DEFAULT_SLIPPAGE)?;
        let batch = BatchOrder { orders: vec![order], grouping: OrderGrouping::Na, builder: builder_fee };

        self.place(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Closes a position with a resting limit order at `limit_px`.
    ///
    /// Fails with [`Error::NoPosition`] and sends no HTTP request if the
    /// account holds no open position on `symbol`.
    pub async fn close_position_limit<S: SignerSync>(
        &self,
        signer: &S,
        tif: TimeInForce,
        symbol: &str,
        limit_px: Decimal,
        cloid: Option<Cloid>,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let asset = self.cache.resolve_asset(symbol).await?;
        let state = self.clearinghouse_state(position_user).await?;
        let snapshot = PositionSnapshot::from_clearinghouse_state(&state);

        let intent = OrderIntent {
            instrument: asset.kind,
            symbol: symbol.to_string(),
            is_buy: None,
            size: None,
            reduce_only: true,
            order_type: IntentOrderType::Limit { tif },
            limit_price: Some(limit_px),
            cloid,
            slippage: None,
        };
        let order = normalizer::normalize_order(intent, &asset, None, Some(&snapshot), normalizer::DEFAULT_SLIPPAGE)?;
        let batch = BatchOrder { orders: vec![order], grouping: OrderGrouping::Na, builder: None };

        self.place(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Closes every open position at market.
    ///
    /// Fails with [`Error::NoPosition`] and sends no HTTP request if the
    /// account holds no open positions at all.
    pub async fn close_all_positions<S: SignerSync>(
        &self,
        signer: &S,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<OrderResponseStatus>, Error> {
        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let state = self.clearinghouse_state(position_user).await?;
        let snapshot = PositionSnapshot::from_clearinghouse_state(&state);

        let intents = normalizer::close_all_intents(&snapshot, super::cache::InstrumentKind::Perp, normalizer::DEFAULT_SLIPPAGE)?;

        let mut orders = Vec::with_capacity(intents.len());
        for intent in intents {
            let asset = self.cache.resolve_asset(&intent.symbol).await?;
            let mid = self.cache.mid_or_error(&intent.symbol).await.ok();
            orders.push(normalizer::normalize_order(intent, &asset, mid, Some(&snapshot), normalizer::DEFAULT_SLIPPAGE)?);
        }
        let batch = BatchOrder { orders, grouping: OrderGrouping::Na, builder: None };

        self.place(signer, batch, nonce, vault_address, expires_after)
            .await
            .map_err(|err| Error::Io(err.message().to_string()))
    }

    /// Updates leverage for a perp asset.
    pub async fn update_leverage<S: SignerSync>(
        &self,
        signer: &S,
        symbol: &str,
        crossed: bool,
        leverage: u32,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<(), Error> {
        let asset = self.cache.resolve_asset(symbol).await?;
        let action = UpdateLeverage { asset: asset.id, is_cross: crossed, leverage };
        self.sign_and_send_default(signer, action, nonce, vault_address, expires_after, "update_leverage").await
    }

    /// Adjusts isolated margin allocated to a perp position.
    ///
    /// `amount` is signed: positive adds margin, negative removes it.
    pub async fn update_isolated_margin<S: SignerSync>(
        &self,
        signer: &S,
        amount: i64,
        symbol: &str,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<(), Error> {
        let asset = self.cache.resolve_asset(symbol).await?;
        let position_user = vault_address.unwrap_or_else(|| signer.address());
        let state = self.clearinghouse_state(position_user).await?;
        let is_buy = PositionSnapshot::from_clearinghouse_state(&state)
            .szi(symbol)
            .map(|szi| !szi.is_sign_negative())
            .unwrap_or(true);

        let action = UpdateIsolatedMargin { asset: asset.id, is_buy, ntli: amount };
        self.sign_and_send_default(signer, action, nonce, vault_address, expires_after, "update_isolated_margin").await
    }

    /// Moves USD into or out of a sub-account from the parent account.
    pub async fn sub_account_transfer<S: SignerSync>(
        &self,
        signer: &S,
        sub_account_user: Address,
        is_deposit: bool,
        usd: u64,
        nonce: u64,
    ) -> Result<(), Error> {
        let action = SubAccountTransfer { sub_account_user, is_deposit, usd };
        self.sign_and_send_default(signer, action, nonce, None, None, "sub_account_transfer").await
    }

    /// Moves a spot token into or out of a sub-account from the parent account.
    pub async fn sub_account_spot_transfer<S: SignerSync>(
        &self,
        signer: &S,
        sub_account_user: Address,
        is_deposit: bool,
        token: String,
        amount: Decimal,
        nonce: u64,
    ) -> Result<(), Error> {
        let action = SubAccountSpotTransfer { sub_account_user, is_deposit, token, amount };
        self.sign_and_send_default(signer, action, nonce, None, None, "sub_account_spot_transfer").await
    }

    /// Moves USD into or out of a vault the caller has access to.
    pub async fn vault_transfer<S: SignerSync>(
        &self,
        signer: &S,
        vault_address: Address,
        is_deposit: bool,
        usd: u64,
        nonce: u64,
    ) -> Result<(), Error> {
        let action = VaultTransfer { vault_address, is_deposit, usd };
        self.sign_and_send_default(signer, action, nonce, None, None, "vault_transfer").await
    }

    /// Creates a new sub-account under the calling account.
    pub async fn create_sub_account<S: SignerSync>(&self, signer: &S, name: String, nonce: u64) -> Result<(), Error> {
        let action = CreateSubAccount { name };
        self.sign_and_send_default(signer, action, nonce, None, None, "create_sub_account").await
    }

    /// Enables or disables dex abstraction for an approved agent wallet.
    pub async fn agent_enable_dex_abstraction<S: SignerSync>(&self, signer: &S, enabled: bool, nonce: u64) -> Result<(), Error> {
        let action = AgentEnableDexAbstraction { enabled };
        self.sign_and_send_default(signer, action, nonce, None, None, "agent_enable_dex_abstraction").await
    }

    /// Submits a raw spot-deploy sub-action payload (token registration, genesis, ...).
    ///
    /// See [`super::types::SpotDeployAction`] for why this takes a raw JSON payload.
    pub async fn spot_deploy<S: SignerSync>(&self, signer: &S, payload: serde_json::Value, nonce: u64) -> Result<(), Error> {
        let action = SpotDeployAction(payload);
        self.sign_and_send_default(signer, action, nonce, None, None, "spot_deploy").await
    }

    /// Submits a raw perp-deploy sub-action payload.
    pub async fn perp_deploy<S: SignerSync>(&self, signer: &S, payload: serde_json::Value, nonce: u64) -> Result<(), Error> {
        let action = PerpDeployAction(payload);
        self.sign_and_send_default(signer, action, nonce, None, None, "perp_deploy").await
    }

    /// Submits a raw validator-management sub-action payload.
    pub async fn c_validator_action<S: SignerSync>(&self, signer: &S, payload: serde_json::Value, nonce: u64) -> Result<(), Error> {
        let action = CValidatorActionPayload(payload);
        self.sign_and_send_default(signer, action, nonce, None, None, "c_validator_action").await
    }

    /// Submits a raw validator-signer sub-action payload.
    pub async fn c_signer_action<S: SignerSync>(&self, signer: &S, payload: serde_json::Value, nonce: u64) -> Result<(), Error> {
        let action = CSignerActionPayload(payload);
        self.sign_and_send_default(signer, action, nonce, None, None, "c_signer_action").await
    }

    /// Withdraws USDC from the Hyperliquid bridge back to L1 Arbitrum.
    pub async fn withdraw_from_bridge<S: SignerSync>(&self, signer: &S, destination: Address, amount: Decimal, time: u64) -> Result<(), Error> {
        let action = Withdraw3Action {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            destination,
            amount,
            time,
        };
        self.sign_and_send_default(signer, action, time, None, None, "withdraw_from_bridge").await
    }

    /// Moves USD between the perp and spot wallets of the same account.
    pub async fn usd_class_transfer<S: SignerSync>(&self, signer: &S, amount: Decimal, to_perp: bool, nonce: u64) -> Result<(), Error> {
        let action = UsdClassTransferAction {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            amount,
            to_perp,
            nonce,
        };
        self.sign_and_send_default(signer, action, nonce, None, None, "usd_class_transfer").await
    }

    /// Approves (or names) an API wallet (agent) to trade on behalf of the user.
    pub async fn approve_agent<S: SignerSync>(&self, signer: &S, agent_address: Address, agent_name: Option<String>, nonce: u64) -> Result<(), Error> {
        let action = ApproveAgent {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            agent_address,
            agent_name: agent_name.unwrap_or_default(),
            nonce,
        };
        self.sign_and_send_default(signer, action, nonce, None, None, "approve_agent").await
    }

    /// Enables or disables dex abstraction for the account owner.
    pub async fn user_dex_abstraction<S: SignerSync>(&self, signer: &S, enabled: bool, nonce: u64) -> Result<(), Error> {
        let action = UserDexAbstractionAction {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            enabled,
            nonce,
        };
        self.sign_and_send_default(signer, action, nonce, None, None, "user_dex_abstraction").await
    }

    /// Approves a maximum builder fee rate for a given builder address.
    ///
    /// `max_fee_rate` is a percentage string such as `"0.001%"`.
    pub async fn approve_builder_fee<S: SignerSync>(&self, signer: &S, builder: Address, max_fee_rate: String, nonce: u64) -> Result<(), Error> {
        let action = ApproveBuilderFeeAction {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            max_fee_rate,
            builder,
            nonce,
        };
        self.sign_and_send_default(signer, action, nonce, None, None, "approve_builder_fee").await
    }

    /// Sets (or clears) the referral code attached to the account.
    pub async fn set_referrer<S: SignerSync>(&self, signer: &S, code: String, nonce: u64) -> Result<(), Error> {
        let action = SetReferrerAction {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            code,
            nonce,
        };
        self.sign_and_send_default(signer, action, nonce, None, None, "set_referrer").await
    }

    /// Delegates (or undelegates) staked HYPE to a validator.
    pub async fn token_delegate<S: SignerSync>(&self, signer: &S, validator: Address, wei: u64, is_undelegate: bool, nonce: u64) -> Result<(), Error> {
        let action = TokenDelegateAction {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            validator,
            wei,
            is_undelegate,
            nonce,
        };
        self.sign_and_send_default(signer, action, nonce, None, None, "token_delegate").await
    }

    /// Converts the account into a multisig user, or back into a regular one.
    ///
    /// Passing a [`SignersConfig`] with an empty `authorized_users` list
    /// converts the account back to a normal (non-multisig) user.
    pub async fn convert_to_multisig_user<S: SignerSync>(&self, signer: &S, signers: SignersConfig, nonce: u64) -> Result<(), Error> {
        let action = ConvertToMultiSigUser {
            signature_chain_id: self.chain.arbitrum_id(),
            hyperliquid_chain: self.chain,
            signers,
            nonce,
        };
        self.sign_and_send_default(signer, action, nonce, None, None, "convert_to_multisig_user").await
    }

    /// Signs and sends `action`, treating `OkResponse::Default` as success.
    ///
    /// Shared by the facade's simple fire-and-forget operations (transfers,
    /// agent/referrer/delegate management, admin sub-actions).
    async fn sign_and_send_default<S: SignerSync, A: Signable>(
        &self,
        signer: &S,
        action: A,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
        op: &str,
    ) -> Result<(), Error> {
        let resp = self.sign_and_send(signer, action, nonce, vault_address, expires_after).await?;
        match resp {
            ApiResponse::Ok(OkResponse::Default) => Ok(()),
            ApiResponse::Err(err) => Err(Error::Http4xx { status: 200, body: format!("{op}: {err}") }),
            _ => Err(Error::Io(format!("{op}: unexpected response type: {resp:?}"))),
        }
    }

    /// Helper function to transfer from perps to spot.
    ///
    /// Only USDC is accepted as `token`.
    pub async fn transfer_to_spot<S: Signer + SignerSync>(
        &self,
        signer: &S,
        token: SpotToken,
        amount: Decimal,
        nonce: u64,
    ) -> Result<()> {
        if token.name != "USDC" {
            return Err(anyhow::anyhow!(
                "only USDC is accepted, tried to transfer {}",
                token.name
            ));
        }

        self.send_asset(
            signer,
            SendAsset {
                destination: signer.address(),
                source_dex: "".into(),
                destination_dex: "spot".into(),
                token: SendToken(token),
                from_sub_account: "".into(),
                amount,
                nonce,
            },
            nonce,
        )
        .await
    }

    /// Helper function to transfer from spot to perps.
    ///
    /// Only USDC is accepted as `token`.
    pub async fn transfer_to_perps<S: Signer + SignerSync>(
        &self,
        signer: &S,
        token: SpotToken,
        amount: Decimal,
        nonce: u64,
    ) -> Result<()> {
        if token.name != "USDC" {
            return Err(anyhow::anyhow!(
                "only USDC is accepted, tried to transfer {}",
                token.name
            ));
        }

        self.send_asset(
            signer,
            SendAsset {
                destination: signer.address(),
                source_dex: "spot".into(),
                destination_dex: "".into(),
                token: SendToken(token),
                from_sub_account: "".into(),
                amount,
                nonce,
            },
            nonce,
        )
        .await
    }

    /// Send USDC to another address.
    ///
    /// Perp <> Perp transfers.
    ///
    /// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#core-usdc-transfer>
    pub async fn send_usdc<S: SignerSync>(
        &self,
        signer: &S,
        send: UsdSend,
        nonce: u64,
    ) -> Result<()> {
        let resp = self
            .sign_and_send(
                signer,
                send.into_action(self.chain.arbitrum_id(), self.chain),
                nonce,
                None,
                None,
            )
            .await?;
        match resp {
            ApiResponse::Ok(OkResponse::Default) => Ok(()),
            ApiResponse::Err(err) => {
                anyhow::bail!("send_usdc: {err}")
            }
            _ => anyhow::bail!("send_usdc: unexpected response type: {resp:?}"),
        }
    }

    /// Send USDC to another address.
    ///
    /// Spot <> DEX or Subaccount.
    ///
    /// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#send-asset>
    pub fn send_asset<S: SignerSync>(
        &self,
        signer: &S,
        send: SendAsset,
        nonce: u64,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let future = self.sign_and_send(
            signer,
            send.into_action(self.chain.arbitrum_id(), self.chain),
            nonce,
            None,
            None,
        );

        async move {
            let resp = future.await?;
            match resp {
                ApiResponse::Ok(OkResponse::Default) => Ok(()),
                ApiResponse::Err(err) => {
                    anyhow::bail!("send_asset: {err}")
                }
                _ => anyhow::bail!("send_asset: unexpected response type: {resp:?}"),
            }
        }
    }

    /// Spot transfer.
    ///
    /// Spot <> Spot.
    ///
    /// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#core-spot-transfer>
    pub fn spot_send<S: SignerSync>(
        &self,
        signer: &S,
        send: SpotSend,
        nonce: u64,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let future = self.sign_and_send(
            signer,
            send.into_action(self.chain.arbitrum_id(), self.chain),
            nonce,
            None,
            None,
        );

        async move {
            let resp = future.await?;
            match resp {
                ApiResponse::Ok(OkResponse::Default) => Ok(()),
                ApiResponse::Err(err) => {
                    anyhow::bail!("spot send: {err}")
                }
                _ => anyhow::bail!("spot_send: unexpected response type: {resp:?}"),
            }
        }
    }

    /// Toggle big blocks or not idk.
    pub async fn evm_user_modify<S: SignerSync>(
        &self,
        signer: &S,
        toggle: bool,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let resp = self
            .sign_and_send(
                signer,
                Action::EvmUserModify {
                    using_big_blocks: toggle,
                },
                nonce,
                vault_address,
                expires_after,
            )
            .await?;

        match resp {
            ApiResponse::Ok(OkResponse::Default) => Ok(()),
            ApiResponse::Err(err) => {
                anyhow::bail!("evm_user_modify: {err}")
            }
            _ => anyhow::bail!("evm_user_modify: unexpected response type: {resp:?}"),
        }
    }

    /// Invalidate a nonce.
    pub async fn noop<S: SignerSync>(
        &self,
        signer: &S,
        nonce: u64,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let resp = self
            .sign_and_send(signer, Action::Noop, nonce, vault_address, expires_after)
            .await?;

        match resp {
            ApiResponse::Ok(OkResponse::Default) => Ok(()),
            ApiResponse::Err(err) => {
                anyhow::bail!("noop: {err}")
            }
            _ => anyhow::bail!("noop: unexpected response type: {resp:?}"),
        }
    }

    /// Executes a multisig action on Hyperliquid.
    ///
    /// This method allows multiple signers to authorize a single action (such as placing orders,
    /// canceling orders, or transferring funds) from a multisig wallet. All provided signers must
    /// be authorized on the multisig wallet configuration.
    ///
    /// # Parameters
    ///
    /// - `lead`: The lead signer who submits the transaction to the exchange
    /// - `multi_sig_user`: The multisig wallet address that will execute the action
    /// - `signers`: Iterator of all signers whose signatures are required (typically includes the lead)
    /// - `action`: The action to execute (Order, Cancel, Transfer, etc.)
    /// - `nonce`: Unique nonce for this transaction (typically current timestamp in milliseconds)
    ///
    /// # Multisig Process
    ///
    /// 1. The action is hashed with the multisig address and lead signer
    /// 2. Each signer signs the action hash using their private key
    /// 3. All signatures are collected into a multisig payload
    /// 4. The lead signer signs the entire multisig payload
    /// 5. The signed multisig transaction is submitted to the exchange
    /// 6. The exchange verifies all signatures match the multisig wallet's authorized signers
    ///
    /// # Returns
    ///
    /// Returns the API response containing the result of the action execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hypercore_sdk::hypercore::{self, types::*, PrivateKeySigner};
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = hypercore::mainnet();
    ///
    /// // Parse the signers for the multisig wallet
    /// let signer1: PrivateKeySigner = "key1".parse()?;
    /// let signer2: PrivateKeySigner = "key2".parse()?;
    ///
    /// // The multisig wallet address
    /// let multisig_addr: hypercore_sdk::Address = "0x...".parse()?;
    ///
    /// // Execute multisig operations - requires dec!() macro and timestamp
    /// // let nonce = chrono::Utc::now().timestamp_millis() as u64;
    /// // let response = client.multi_sig(&signer1, multisig_addr, nonce)
    /// //     .signer(&signer2)
    /// //     .place(order, None, None)
    /// //     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn multi_sig<'a, S: SignerSync + Signer>(
        &'a self,
        lead: &'a S,
        multi_sig_user: Address,
        nonce: u64,
    ) -> MultiSig<'a, S> {
        MultiSig {
            lead,
            multi_sig_user,
            signers: VecDeque::new(),
            client: self,
            nonce,
        }
    }

    /// Send a signed action hashing.
    fn sign_and_send<S: SignerSync, A: Signable>(
        &self,
        signer: &S,
        action: A,
        nonce: u64,
        maybe_vault_address: Option<Address>,
        maybe_expires_after: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'static {
        let res = action.sign_sync(
            signer,
            nonce,
            maybe_vault_address,
            maybe_expires_after,
            self.chain,
        );

        let http_client = self.http_client.clone();
        let mut url = self.base_url.clone();
        url.set_path("/exchange");
        let retry_policy = self.retry_policy;
        let debug_bodies = self.debug_bodies;

        async move {
            let req = res?;
            let body = serde_json::to_value(&req).map_err(|err| Error::EncodeError(err.to_string()))?;

            let resp = match retry_policy {
                Some(policy) => {
                    retry_with(policy, || Self::send_classified(&http_client, url.clone(), &body, debug_bodies)).await?
                }
                None => Self::send_classified(&http_client, url.clone(), &body, debug_bodies).await?,
            };
            Ok(resp)
        }
    }

    // TODO: https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/info-endpoint#retrieve-a-users-subaccounts
}

/// Builder for constructing and executing multisig transactions on Hyperliquid.
///
/// The `MultiSig` struct provides a fluent API for building multisig transactions that require
/// multiple signers to authorize actions. It collects signatures from all required signers and
/// submits the complete multisig transaction to the exchange.
///
/// # Multisig Flow
///
/// 1. Create a `MultiSig` instance via `Client::multi_sig()`
/// 2. Add signers using `signer()` or `signers()`
/// 3. Execute an action (e.g., `place()`, `send_usdc()`)
/// 4. The builder collects signatures from all signers
/// 5. The lead signer submits the transaction
///
/// # Type Parameters
///
/// - `'a`: Lifetime of the client and signer references
/// - `S`: The signer type implementing `SignerSync + Signer`
///
/// # Example
///
/// ```rust,ignore
/// use hypercore_sdk::hypercore::Client;
/// use alloy::signers::local::PrivateKeySigner;
///
/// let client = Client::mainnet();
/// let lead_signer: PrivateKeySigner = "0x...".parse()?;
/// let signer2: PrivateKeySigner = "0x...".parse()?;
/// let signer3: PrivateKeySigner = "0x...".parse()?;
/// let multisig_address = "0x...".parse()?;
/// let nonce = chrono::Utc::now().timestamp_millis() as u64;
///
/// // Execute a multisig order
/// let response = client
///     .multi_sig(&lead_signer, multisig_address, nonce)
///     .signer(&signer2)
///     .signer(&signer3)
///     .place(order, None, None)
///     .await?;
/// ```
///
/// # Notes
///
/// - The lead signer is the one who submits the transaction but also signs it
/// - All signers (including lead) must be authorized on the multisig wallet
/// - The order of signers should match the wallet's configuration
/// - Nonce must be unique for each transaction (typically millisecond timestamp)
pub struct MultiSig<'a, S: SignerSync + Signer> {
    lead: &'a S,
    multi_sig_user: Address,
    signers: VecDeque<&'a S>,
    nonce: u64,
    client: &'a Client,
}

impl<'a, S> MultiSig<'a, S>
where
    S: SignerSync + Signer,
{
    /// Add a single signer to the multisig transaction.
    ///
    /// This method adds one signer to the list of signers who will authorize the transaction.
    /// You can chain multiple calls to add multiple signers.
    ///
    /// # Parameters
    ///
    /// - `signer`: A reference to the signer to add
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// client
    ///     .multi_sig(&lead, multisig_addr, nonce)
    ///     .signer(&signer1)
    ///     .signer(&signer2)
    ///     .signer(&signer3)
    ///     .place(order, None, None)
    ///     .await?;
    /// ```
    pub fn signer(mut self, signer: &'a S) -> Self {
        self.signers.push_back(signer);
        self
    }

    /// Add multiple signers to the multisig transaction.
    ///
    /// This method adds a collection of signers at once. More convenient than calling
    /// `signer()` multiple times when you have signers in a collection.
    ///
    /// # Parameters
    ///
    /// - `signers`: An iterable collection of signer references
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let signers = vec![&signer1, &signer2, &signer3];
    ///
    /// client
    ///     .multi_sig(&lead, multisig_addr, nonce)
    ///     .signers(signers)
    ///     .place(order, None, None)
    ///     .await?;
    /// ```
    pub fn signers(mut self, signers: impl IntoIterator<Item = &'a S>) -> Self {
        self.signers.extend(signers);
        self
    }

    /// Place orders using the multisig account.
    ///
    /// This method collects signatures from all signers for a batch order placement using
    /// RMP (MessagePack) hashing, then submits the multisig transaction to the exchange.
    ///
    /// # Process
    ///
    /// 1. Creates an RMP hash of the order action
    /// 2. Each signer signs the hash using EIP-712
    /// 3. Collects all signatures into a `MultiSigAction`
    /// 4. Lead signer submits the complete transaction
    ///
    /// # Parameters
    ///
    /// - `batch`: The batch order to place
    /// - `vault_address`: Optional vault address if trading on behalf of a vault
    /// - `expires_after`: Optional expiration time for the request
    ///
    /// # Returns
    ///
    /// A future that resolves to a vector of `OrderResponseStatus` for each order in the batch,
    /// or an `ActionError` containing the failed order CLOIDs and error message.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use hypercore_sdk::hypercore::types::{BatchOrder, OrderRequest, OrderTypePlacement, TimeInForce};
    /// use rust_decimal::dec;
    ///
    /// let order = OrderRequest {
    ///     asset: 0,
    ///     is_buy: true,
    ///     limit_px: dec!(50000),
    ///     sz: dec!(0.1),
    ///     reduce_only: false,
    ///     order_type: OrderTypePlacement::Limit {
    ///         tif: TimeInForce::Gtc,
    ///     },
    ///     cloid: [0u8; 16].into(),
    /// };
    ///
    /// let batch = BatchOrder {
    ///     orders: vec![order],
    ///     grouping: OrderGrouping::Na,
    ///     builder: None,
    /// };
    ///
    /// let statuses = client
    ///     .multi_sig(&lead, multisig_addr, nonce)
    ///     .signers(&signers)
    ///     .place(batch, None, None)
    ///     .await?;
    ///
    /// for status in statuses {
    ///     match status {
    ///         OrderResponseStatus::Resting { oid, .. } => {
    ///             println!("Order {} placed", oid);
    ///         }
    ///         OrderResponseStatus::Error(err) => {
    ///             eprintln!("Order failed: {}", err);
    ///         }
    ///         _ => {}
    ///     }
    /// }
    /// ```
    pub fn place(
        &self,
        batch: BatchOrder,
        vault_address: Option<Address>,
        expires_after: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<Vec<OrderResponseStatus>, ActionError<Cloid>>> + Send + 'static
    {
        let cloids: Vec<_> = batch.orders.iter().map(|req| req.cloid).collect();

        let res = multisig_collect_signatures(
            self.lead.address(),
            self.multi_sig_user,
            self.signers.iter().copied(),
            Action::Order(batch),
            self.nonce,
            self.client.chain,
        )
        .map(|action| {
            self.client
                .sign_and_send(&self.lead, action, self.nonce, vault_address, expires_after)
        });

        async move {
            let future = res.map_err(|err| ActionError::new(cloids.clone(), err.to_string()))?;
            let resp = future.await.map_err(|err| ActionError::new(cloids.clone(), err.to_string()))?;

            match resp {
                ApiResponse::Ok(OkResponse::Order { statuses }) => Ok(statuses),
                ApiResponse::Err(err) => Err(ActionError::new(cloids, err)),
                _ => Err(ActionError::new(cloids, format!("unexpected response type: {resp:?}"))),
            }
        }
    }

    /// Send USDC from the multisig account.
    ///
    /// This method collects signatures from all signers for a USDC transfer using EIP-712
    /// typed data, then submits the multisig transaction to the exchange.
    ///
    /// # Process
    ///
    /// 1. Creates EIP-712 typed data from the UsdSend action
    /// 2. Each signer signs the typed data directly using EIP-712
    /// 3. Collects all signatures into a `MultiSigAction`
    /// 4. Lead signer submits the complete transaction
    ///
    /// # Parameters
    ///
    /// - `send`: The UsdSend parameters (destination, amount, time, chain, etc.)
    ///
    /// # Returns
    ///
    /// A future that resolves to `Ok(())` on success or an error on failure.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use hypercore_sdk::hypercore::types::{UsdSend, Chain};
    /// use hypercore_sdk::hypercore::ARBITRUM_SIGNATURE_CHAIN_ID;
    /// use rust_decimal::dec;
    ///
    /// let send = UsdSend {
    ///     hyperliquid_chain: Chain::Mainnet,
    ///     signature_chain_id: ARBITRUM_SIGNATURE_CHAIN_ID,
    ///     destination: "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb".parse()?,
    ///     amount: dec!(100),
    ///     time: chrono::Utc::now().timestamp_millis() as u64,
    /// };
    ///
    /// client
    ///     .multi_sig(&lead_signer, multisig_address, nonce)
    ///     .signers(&signers)
    ///     .send_usdc(send)
    ///     .await?;
    ///
    /// println!("Successfully sent 100 USDC from multisig account");
    /// ```
    ///
    /// # Notes
    ///
    /// - Uses EIP-712 typed data signatures (different from order placement which uses RMP)
    /// - Time should typically be the current timestamp in milliseconds
    /// - Destination can be any valid Ethereum address
    /// - Amount is in USDC (6 decimals on-chain, but use regular decimal representation)
    pub fn send_usdc(&self, send: UsdSend) -> impl Future<Output = Result<()>> + Send + 'static {
        let nonce = send.time;
        let res = multisig_collect_signatures(
            self.lead.address(),
            self.multi_sig_user,
            self.signers.iter().copied(),
            send.into_action(self.client.chain().arbitrum_id(), self.client.chain())
                .into(),
            nonce,
            self.client.chain,
        )
        .map(|action| {
            self.client
                .sign_and_send(&self.lead, action, self.nonce, None, None)
        });

        async move {
            let future = res?;
            let resp = future.await?;

            match resp {
                ApiResponse::Ok(OkResponse::Default) => Ok(()),
                ApiResponse::Err(err) => anyhow::bail!("send_usdc: {err}"),
                _ => anyhow::bail!("send_usdc: unexpected response type: {resp:?}"),
            }
        }
    }

    /// Send assets from the multisig account.
    ///
    /// This method collects signatures from all signers for an asset transfer using EIP-712
    /// typed data, then submits the multisig transaction to the exchange. This can be used
    /// to transfer assets between different destinations (accounts, DEXes, subaccounts).
    ///
    /// # Process
    ///
    /// 1. Creates EIP-712 typed data from the SendAsset action
    /// 2. Each signer signs the typed data directly using EIP-712
    /// 3. Collects all signatures into a `MultiSigAction`
    /// 4. Lead signer submits the complete transaction
    ///
    /// # Parameters
    ///
    /// - `send`: The SendAsset parameters (destination, token, amount, source/dest DEX, etc.)
    ///
    /// # Returns
    ///
    /// A future that resolves to `Ok(())` on success or an error on failure.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use hypercore_sdk::hypercore::types::{SendAsset, SendToken};
    /// use hypercore_sdk::hypercore::ARBITRUM_MAINNET_CHAIN_ID;
    /// use rust_decimal::dec;
    ///
    /// // Get the token info first
    /// let tokens = client.spot_meta().await?;
    /// let usdc = tokens.iter().find(|t| t.name == "USDC").unwrap();
    ///
    /// let send = SendAsset {
    ///     hyperliquid_chain: Chain::Mainnet,
    ///     signature_chain_id: ARBITRUM_MAINNET_CHAIN_ID,
    ///     destination: "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb".parse()?,
    ///     source_dex: "".to_string(),      // Empty for perp balance
    ///     destination_dex: "".to_string(), // Empty for recipient's perp balance
    ///     token: SendToken(usdc.clone()),
    ///     from_sub_account: "".to_string(), // Empty for main account
    ///     amount: dec!(100),
    ///     nonce: chrono::Utc::now().timestamp_millis() as u64,
    /// };
    ///
    /// client
    ///     .multi_sig(&lead_signer, multisig_address, nonce)
    ///     .signers(&signers)
    ///     .send_asset(send)
    ///     .await?;
    ///
    /// println!("Successfully sent 100 USDC from multisig account");
    /// ```
    ///
    /// # Notes
    ///
    /// - Uses EIP-712 typed data signatures (different from order placement which uses RMP)
    /// - Source/destination DEX can be: "" (perp balance), "spot", or other DEX identifiers
    /// - Token must be obtained from `spot_meta()` API call
    /// - Nonce should be unique for each transaction (typically current timestamp in ms)
    pub fn send_asset(&self, send: SendAsset) -> impl Future<Output = Result<()>> + Send + 'static {
        let nonce = send.nonce;
        let res = multisig_collect_signatures(
            self.lead.address(),
            self.multi_sig_user,
            self.signers.iter().copied(),
            send.into_action(self.client.chain().arbitrum_id(), self.client.chain())
                .into(),
            nonce,
            self.client.chain,
        )
        .map(|action| {
            self.client
                .sign_and_send(&self.lead, action, self.nonce, None, None)
        });

        async move {
            let future = res?;
            let resp = future.await?;

            match resp {
                ApiResponse::Ok(OkResponse::Default) => Ok(()),
                ApiResponse::Err(err) => anyhow::bail!("send_asset: {err}"),
                _ => anyhow::bail!("send_asset: unexpected response type: {resp:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn test_policy() -> RetryPolicy {
        RetryPolicy {
            initial_backoff: Duration::from_millis(1),
            multiplier: 2.0,
            max_backoff: Duration::from_millis(10),
            max_retries: 3,
        }
    }

    #[tokio::test]
    async fn http_4xx_never_retries() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), Error> = retry_with(test_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Http4xx { status: 422, body: "bad request".into() }) }
        })
        .await;

        assert!(matches!(result, Err(Error::Http4xx { status: 422, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn http_5xx_retries_up_to_max_retries_then_raises() {
        let attempts = AtomicU32::new(0);
        let policy = test_policy();

        let result: Result<(), Error> = retry_with(policy, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Http5xx { status: 503, body: "unavailable".into() }) }
        })
        .await;

        assert!(matches!(result, Err(Error::Http5xx { status: 503, .. })));
        // One initial attempt plus `max_retries` retries.
        assert_eq!(attempts.load(Ordering::SeqCst), policy.max_retries + 1);
    }

    #[tokio::test]
    async fn io_errors_retry_like_5xx() {
        let attempts = AtomicU32::new(0);

        let result: Result<(), Error> = retry_with(test_policy(), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Io("connection reset".into())) }
        })
        .await;

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn retry_stops_as_soon_as_an_attempt_succeeds() {
        let attempts = AtomicU32::new(0);

        let result = retry_with(test_policy(), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::Http5xx { status: 500, body: "retry me".into() })
                } else {
                    Ok::<_, Error>(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn other_errors_are_not_retryable() {
        assert!(!Error::BadNumber("x".into()).is_retryable());
        assert!(!Error::UnknownSymbol("ETH".into()).is_retryable());
        assert!(!Error::Http4xx { status: 400, body: String::new() }.is_retryable());
        assert!(Error::Http5xx { status: 500, body: String::new() }.is_retryable());
        assert!(Error::Io("x".into()).is_retryable());
    }
}
