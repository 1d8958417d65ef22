//! HyperCore type definitions for trading operations.
//!
//! This module contains all the core types used for interacting with the Hyperliquid
//! exchange API: order intents, signed actions, and the read-only query responses the
//! normalizer and facade depend on.
//!
//! # Core Components
//!
//! ## Trading Types
//! - [`Side`]: Buy or sell direction
//! - [`OrderType`]: Limit, market, or trigger orders
//! - [`TimeInForce`]: Order duration specifications (GTC, IOC, ALO)
//! - [`OrderStatus`]: Order lifecycle states
//! - [`OrderRequest`]: Order placement parameters
//! - [`BatchOrder`]: Batch order submission
//!
//! ## Account Types
//! - [`Fill`]: User order fills
//! - [`OrderUpdate`]: Order status changes
//!
//! ## Transfer Types
//! - [`UsdSend`]: Send USDC from perp balance
//! - [`SpotSend`]: Send spot tokens
//! - [`SendAsset`]: Send assets between accounts/DEXes
//!
//! ## API Response Types
//! - [`OrderResponseStatus`]: Result of order submission
//! - [`UserBalance`]: Account balance information
//!
//! # EIP-712 Signing
//!
//! All actions that modify state require EIP-712 signatures. Signing domains are
//! configured automatically by the SDK based on the chain and operation type.
//!
//! # Example: Placing an Order
//!
//! ```no_run
//! use hypercore_sdk::hypercore::types::{
//!     OrderRequest, OrderTypePlacement, TimeInForce, Side
//! };
//!
//! // Example order structure - requires dec!() macro for prices/sizes
//! // let order = OrderRequest { ... };
//! ```

use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
};

use alloy::{
    dyn_abi::{Eip712Domain, TypedData},
    primitives::{Address, B128, B256, U256},
    signers::{SignerSync, k256::ecdsa::RecoveryId},
    sol_types::eip712_domain,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::hypercore::{
    Chain, Cloid, OidOrCloid, SpotToken,
    signing::{Signable, sign_rmp, sign_rmp_sync},
    utils,
};

/// Domain for Core mainnet EIP‑712 signing.
/// This domain is used when creating signatures for transactions on the mainnet.
pub(super) const CORE_MAINNET_EIP712_DOMAIN: Eip712Domain = eip712_domain! {
    name: "Exchange",
    version: "1",
    chain_id: 1337,
    verifying_contract: Address::ZERO,
};

/// Domain for Arbitrum mainnet EIP‑712 signing.
/// This domain is used when creating signatures for transactions on Arbitrum.
pub(super) const ARBITRUM_MAINNET_EIP712_DOMAIN: Eip712Domain = eip712_domain! {
    name: "HyperliquidSignTransaction",
    version: "1",
    chain_id: 42161,
    verifying_contract: Address::ZERO,
};

/// Domain for L1 multisig mainnet EIP‑712 signing.
/// This domain is used when creating multisig signatures on mainnet (chainId 0x66eee = 421614).
pub(super) const MULTISIG_MAINNET_EIP712_DOMAIN: Eip712Domain = eip712_domain! {
    name: "HyperliquidSignTransaction",
    version: "1",
    chain_id: 421614,
    verifying_contract: Address::ZERO,
};

/// HIP-3 exchange.
#[derive(Debug, Clone, derive_more::Display)]
#[display("{name}")]
pub struct Dex {
    pub(super) name: String,
    pub(super) index: usize,
}

impl Dex {
    /// Returns the DEX name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Dex {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Dex {}

impl Hash for Dex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Side for a trade or an order.
///
/// `Bid` represents a buy order, `Ask` represents a sell order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub enum Side {
    #[serde(rename = "B")]
    Bid,
    #[serde(rename = "A")]
    Ask,
}

/// Order update.
///
/// Contains status, timestamp, and the original order details.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: OrderStatus,
    pub status_timestamp: u64,
    pub order: BasicOrder,
}

/// Candle interval for historical data.
///
/// Specifies the time period covered by each candle.
///
/// # Available Intervals
///
/// - Minutes: `OneMinute`, `ThreeMinutes`, `FiveMinutes`, `FifteenMinutes`, `ThirtyMinutes`
/// - Hours: `OneHour`, `TwoHours`, `FourHours`, `EightHours`, `TwelveHours`
/// - Days and above: `OneDay`, `ThreeDays`, `OneWeek`, `OneMonth`
///
/// # Example
///
/// ```rust
/// use hypercore_sdk::hypercore::types::CandleInterval;
///
/// let interval = CandleInterval::FifteenMinutes;
/// assert_eq!(interval.to_string(), "15m");
///
/// let parsed: CandleInterval = "15m".parse().unwrap();
/// assert_eq!(parsed, CandleInterval::FifteenMinutes);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum CandleInterval {
    #[serde(rename = "1m")]
    #[display("1m")]
    OneMinute,
    #[serde(rename = "3m")]
    #[display("3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    #[display("5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    #[display("15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    #[display("30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    #[display("1h")]
    OneHour,
    #[serde(rename = "2h")]
    #[display("2h")]
    TwoHours,
    #[serde(rename = "4h")]
    #[display("4h")]
    FourHours,
    #[serde(rename = "8h")]
    #[display("8h")]
    EightHours,
    #[serde(rename = "12h")]
    #[display("12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    #[display("1d")]
    OneDay,
    #[serde(rename = "3d")]
    #[display("3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    #[display("1w")]
    OneWeek,
    #[serde(rename = "1M")]
    #[display("1M")]
    OneMonth,
}

impl std::str::FromStr for CandleInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::OneMinute),
            "3m" => Ok(Self::ThreeMinutes),
            "5m" => Ok(Self::FiveMinutes),
            "15m" => Ok(Self::FifteenMinutes),
            "30m" => Ok(Self::ThirtyMinutes),
            "1h" => Ok(Self::OneHour),
            "2h" => Ok(Self::TwoHours),
            "4h" => Ok(Self::FourHours),
            "8h" => Ok(Self::EightHours),
            "12h" => Ok(Self::TwelveHours),
            "1d" => Ok(Self::OneDay),
            "3d" => Ok(Self::ThreeDays),
            "1w" => Ok(Self::OneWeek),
            "1M" => Ok(Self::OneMonth),
            _ => anyhow::bail!("Invalid candle interval: {}", s),
        }
    }
}

/// WebSocket candle (OHLCV bar).
///
/// Represents a single candlestick with open, high, low, close prices and volume.
///
/// # Fields
///
/// - `open_time`: Candle open time in milliseconds
/// - `close_time`: Candle close time in milliseconds
/// - `coin`: Market symbol (e.g., "BTC", "ETH")
/// - `interval`: Candle interval (e.g., "15m", "1h", "1d")
/// - `open`: Open price (first trade in the period)
/// - `high`: High price (highest trade in the period)
/// - `low`: Low price (lowest trade in the period)
/// - `close`: Close price (last trade in the period)
/// - `volume`: Volume (total traded amount in the period)
/// - `num_trades`: Number of trades in this candle
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Candle open time (milliseconds)
    #[serde(rename = "t")]
    pub open_time: u64,
    /// Candle close time (milliseconds)
    #[serde(rename = "T")]
    pub close_time: u64,
    /// Market symbol
    #[serde(rename = "s")]
    pub coin: String,
    /// Interval
    #[serde(rename = "i")]
    pub interval: String,
    /// Open price
    #[serde(rename = "o")]
    pub open: Decimal,
    /// High price
    #[serde(rename = "h")]
    pub high: Decimal,
    /// Low price
    #[serde(rename = "l")]
    pub low: Decimal,
    /// Close price
    #[serde(rename = "c")]
    pub close: Decimal,
    /// Volume
    #[serde(rename = "v")]
    pub volume: Decimal,
    /// Number of trades
    #[serde(rename = "n")]
    pub num_trades: u64,
}

/// WebSocket fill.
///
/// Describes a filled order for a user. Contains execution details and position impact.
///
/// # Fields
///
/// - `coin`: Market symbol
/// - `px`: Fill price
/// - `sz`: Fill size
/// - `side`: Order side (Bid = buy, Ask = sell)
/// - `time`: Timestamp in milliseconds
/// - `start_position`: Position size before this fill
/// - `dir`: Direction ("Open Long", "Close Long", "Open Short", "Close Short")
/// - `closed_pnl`: Realized PnL from closing position (0 if opening)
/// - `hash`: Transaction hash
/// - `oid`: Order ID
/// - `crossed`: True if this fill crossed the spread (taker)
/// - `fee`: Fee amount
/// - `tid`: Trade ID
/// - `cloid`: Optional client order ID
/// - `fee_token`: Token used for fee payment
/// - `liquidation`: Optional liquidation details
///
/// # Example
///
/// ```rust
/// use hypercore_sdk::hypercore::types::Fill;
/// use rust_decimal::Decimal;
///
/// # fn process_fill(fill: Fill) {
/// // Check if this opened or closed a position
/// if fill.is_opening() {
///     println!("Opened position: {} @ {}", fill.sz, fill.px);
/// } else {
///     println!("Closed position: {} @ {} (PnL: {})", fill.sz, fill.px, fill.closed_pnl);
/// }
///
/// // Calculate notional value
/// let notional = fill.notional();
/// println!("Fill value: ${}", notional);
///
/// // Check if maker or taker
/// if fill.is_maker() {
///     println!("Maker fill (added liquidity)");
/// } else {
///     println!("Taker fill (took liquidity)");
/// }
/// # }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    /// Market symbol
    pub coin: String,
    /// Fill price
    pub px: Decimal,
    /// Fill size
    pub sz: Decimal,
    /// Order side
    pub side: Side,
    /// Timestamp in milliseconds
    pub time: u64,
    /// Position before fill
    pub start_position: Decimal,
    /// Direction (Open/Close Long/Short)
    pub dir: String,
    /// Realized PnL from closing
    pub closed_pnl: Decimal,
    /// Transaction hash
    pub hash: String,
    /// Order ID
    pub oid: u64,
    /// True if taker (crossed spread)
    pub crossed: bool,
    /// Fee amount
    pub fee: Decimal,
    /// Trade ID
    pub tid: u64,
    /// Client order ID
    pub cloid: Option<B128>,
    /// Fee token
    pub fee_token: String,
    /// Liquidation details, if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidation: Option<Liquidation>,
}

impl Fill {
    /// Returns the notional value of the fill (price * size).
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.px * self.sz
    }

    /// Returns true if this fill opened a position (closed_pnl is zero).
    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.closed_pnl.is_zero()
    }

    /// Returns true if this fill closed a position (closed_pnl is non-zero).
    #[must_use]
    pub fn is_closing(&self) -> bool {
        !self.closed_pnl.is_zero()
    }

    /// Returns true if this was a maker fill (added liquidity).
    #[must_use]
    pub fn is_maker(&self) -> bool {
        !self.crossed
    }

    /// Returns true if this was a taker fill (took liquidity).
    #[must_use]
    pub fn is_taker(&self) -> bool {
        self.crossed
    }

    /// Returns true if this fill was a liquidation.
    #[must_use]
    pub fn is_liquidation(&self) -> bool {
        self.liquidation.is_some()
    }

    /// Returns the net proceeds after fees (notional - fee).
    #[must_use]
    pub fn net_proceeds(&self) -> Decimal {
        self.notional() - self.fee
    }
}

/// Order details.
///
/// Basic information needed for creating or updating an order.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde_as]
#[serde(rename_all = "camelCase")]
pub struct BasicOrder {
    pub timestamp: u64,
    pub coin: String,
    pub side: Side,
    pub limit_px: Decimal,
    pub sz: Decimal,
    pub oid: u64,
    pub orig_sz: Decimal,
    pub cloid: Option<B128>,
    pub order_type: OrderType,
    pub tif: Option<TimeInForce>,
    pub reduce_only: bool,
}

/// Liquidation details.
///
/// Information about a liquidation event associated with a trade or fill.
///
/// # Fields
///
/// - `liquidated_user`: Address of the user being liquidated
/// - `mark_px`: Mark price at liquidation
/// - `method`: Liquidation method used
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liquidation {
    /// Address of liquidated user
    pub liquidated_user: String,
    /// Mark price at liquidation
    pub mark_px: Decimal,
    /// Liquidation method
    pub method: String,
}

/// Order type.
///
/// Determines the behaviour of the order (limit, market, or trigger).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub enum OrderType {
    Limit,
    Market,
    Trigger,
}

/// Time‑in‑force.
///
/// Specifies how long an order remains active and how it interacts with the order book.
///
/// # Variants
///
/// - **Alo** (Add Liquidity Only): Order will only be placed if it adds liquidity to the book.
///   If it would take liquidity (match immediately), it's rejected. This is a maker-only order.
///
/// - **Ioc** (Immediate or Cancel): Order executes immediately against available liquidity,
///   and any unfilled portion is cancelled. This is a taker-only order that never rests on the book.
///
/// - **Gtc** (Good Till Cancel): Order remains active until fully filled or explicitly cancelled.
///   This is the standard order type that can both take and make liquidity.
///
/// - **FrontendMarket**: Special order type used by the Hyperliquid frontend for market orders.
///
/// # Example
///
/// ```rust
/// use hypercore_sdk::hypercore::types::TimeInForce;
///
/// // Maker order: only adds liquidity, never takes
/// let maker_tif = TimeInForce::Alo;
///
/// // Taker order: executes immediately or cancels
/// let taker_tif = TimeInForce::Ioc;
///
/// // Standard order: remains active until filled or cancelled
/// let standard_tif = TimeInForce::Gtc;
/// ```
#[derive(Debug, Deserialize, Clone, Copy, Serialize)]
#[serde(rename = "PascalCase")]
pub enum TimeInForce {
    /// Add Liquidity Only - maker-only order
    Alo,
    /// Immediate or Cancel - taker-only order
    Ioc,
    /// Good Till Cancel - standard order
    Gtc,
    /// Frontend market order type
    FrontendMarket,
}

/// Order status.
///
/// Represents the lifecycle state of an order. Orders can be in active states (Open, Triggered)
/// or terminal states (Filled, Canceled, Rejected).
///
/// # Active States
///
/// - **Open**: Order is active on the book awaiting execution
/// - **Triggered**: Trigger order has been activated and is now being placed
///
/// # Success States
///
/// - **Filled**: Order was completely filled
///
/// # Cancellation States
///
/// Orders can be cancelled for various reasons:
///
/// - **Canceled**: User-requested cancellation
/// - **MarginCanceled**: Cancelled due to insufficient margin
/// - **VaultWithdrawalCanceled**: Cancelled due to vault withdrawal
/// - **OpenInterestCapCanceled**: Cancelled due to open interest cap
/// - **SelfTradeCanceled**: Cancelled to prevent self-trading
/// - **ReduceOnlyCanceled**: Reduce-only order would have increased position
/// - **SiblingFilledCanceled**: Associated order was filled (e.g., TP/SL pair)
/// - **DelistedCanceled**: Market was delisted
/// - **LiquidatedCanceled**: Position was liquidated
/// - **ScheduledCancel**: User-scheduled cancellation executed
/// - **IocCancelRejected**: IOC order had unfilled portion
///
/// # Rejection States
///
/// Orders can be rejected before placement:
///
/// - **Rejected**: Generic rejection
/// - **TickRejected**: Price doesn't match tick size
/// - **MinTradeNtlRejected**: Order value below minimum notional
/// - **PerpMarginRejected**: Insufficient margin for perp order
/// - **ReduceOnlyRejected**: Reduce-only order would increase position
/// - **BadAloPxRejected**: ALO order price would take liquidity
/// - **BadTriggerPxRejected**: Invalid trigger price
/// - **MarketOrderNoLiquidityRejected**: No liquidity for market order
/// - **PositionIncreaseAtOpenInterestCapRejected**: Would exceed open interest cap
/// - **PositionFlipAtOpenInterestCapRejected**: Would flip position at cap
/// - **TooAggressiveAtOpenInterestCapRejected**: Too aggressive near cap
/// - **OpenInterestIncreaseRejected**: Would increase open interest past limit
/// - **InsufficientSpotBalanceRejected**: Insufficient spot balance
/// - **OracleRejected**: Oracle price check failed
/// - **PerpMaxPositionRejected**: Would exceed max position size
///
/// # Example
///
/// ```rust
/// use hypercore_sdk::hypercore::types::OrderStatus;
///
/// let status = OrderStatus::Filled;
/// assert!(status.is_finished());
///
/// let status = OrderStatus::Open;
/// assert!(!status.is_finished());
/// ```
#[derive(Debug, Copy, Clone, Hash, Deserialize, Serialize, derive_more::Display)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    /// Order is active on the book
    Open,
    /// Order was completely filled
    Filled,
    /// User-requested cancellation
    Canceled,
    /// Trigger order activated
    Triggered,
    /// Generic rejection
    Rejected,
    /// Cancelled due to insufficient margin
    MarginCanceled,
    /// Cancelled due to vault withdrawal
    VaultWithdrawalCanceled,
    /// Cancelled due to open interest cap
    OpenInterestCapCanceled,
    /// Cancelled to prevent self-trading
    SelfTradeCanceled,
    /// Reduce-only order would increase position
    ReduceOnlyCanceled,
    /// Associated order was filled
    SiblingFilledCanceled,
    /// Market was delisted
    DelistedCanceled,
    /// Position was liquidated
    LiquidatedCanceled,
    /// User-scheduled cancellation
    ScheduledCancel,
    /// Price doesn't match tick size
    TickRejected,
    /// Order value below minimum
    MinTradeNtlRejected,
    /// Insufficient margin for perp
    PerpMarginRejected,
    /// Reduce-only would increase position
    ReduceOnlyRejected,
    /// ALO price would take liquidity
    BadAloPxRejected,
    /// IOC unfilled portion cancelled
    IocCancelRejected,
    /// Invalid trigger price
    BadTriggerPxRejected,
    /// No liquidity for market order
    MarketOrderNoLiquidityRejected,
    /// Would exceed open interest cap
    PositionIncreaseAtOpenInterestCapRejected,
    /// Would flip position at cap
    PositionFlipAtOpenInterestCapRejected,
    /// Too aggressive near cap
    TooAggressiveAtOpenInterestCapRejected,
    /// Would exceed open interest limit
    OpenInterestIncreaseRejected,
    /// Insufficient spot balance
    InsufficientSpotBalanceRejected,
    /// Oracle check failed
    OracleRejected,
    /// Would exceed max position
    PerpMaxPositionRejected,
}

impl OrderStatus {
    /// Returns whether the order is finished (not Open).
    ///
    /// # Example
    ///
    /// ```rust
    /// use hypercore_sdk::hypercore::types::OrderStatus;
    ///
    /// assert!(OrderStatus::Filled.is_finished());
    /// assert!(OrderStatus::Canceled.is_finished());
    /// assert!(!OrderStatus::Open.is_finished());
    /// ```
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, OrderStatus::Open)
    }

    /// Returns whether the order was successfully filled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hypercore_sdk::hypercore::types::OrderStatus;
    ///
    /// assert!(OrderStatus::Filled.is_filled());
    /// assert!(!OrderStatus::Canceled.is_filled());
    /// ```
    #[must_use]
    pub fn is_filled(&self) -> bool {
        matches!(self, OrderStatus::Filled)
    }

    /// Returns whether the order was cancelled (any cancellation reason).
    ///
    /// # Example
    ///
    /// ```rust
    /// use hypercore_sdk::hypercore::types::OrderStatus;
    ///
    /// assert!(OrderStatus::Canceled.is_cancelled());
    /// assert!(OrderStatus::MarginCanceled.is_cancelled());
    /// assert!(!OrderStatus::Filled.is_cancelled());
    /// ```
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            OrderStatus::Canceled
                | OrderStatus::MarginCanceled
                | OrderStatus::VaultWithdrawalCanceled
                | OrderStatus::OpenInterestCapCanceled
                | OrderStatus::SelfTradeCanceled
                | OrderStatus::ReduceOnlyCanceled
                | OrderStatus::SiblingFilledCanceled
                | OrderStatus::DelistedCanceled
                | OrderStatus::LiquidatedCanceled
                | OrderStatus::ScheduledCancel
                | OrderStatus::IocCancelRejected
        )
    }

    /// Returns whether the order was rejected (any rejection reason).
    ///
    /// # Example
    ///
    /// ```rust
    /// use hypercore_sdk::hypercore::types::OrderStatus;
    ///
    /// assert!(OrderStatus::TickRejected.is_rejected());
    /// assert!(OrderStatus::PerpMarginRejected.is_rejected());
    /// assert!(!OrderStatus::Filled.is_rejected());
    /// ```
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected
                | OrderStatus::TickRejected
                | OrderStatus::MinTradeNtlRejected
                | OrderStatus::PerpMarginRejected
                | OrderStatus::ReduceOnlyRejected
                | OrderStatus::BadAloPxRejected
                | OrderStatus::BadTriggerPxRejected
                | OrderStatus::MarketOrderNoLiquidityRejected
                | OrderStatus::PositionIncreaseAtOpenInterestCapRejected
                | OrderStatus::PositionFlipAtOpenInterestCapRejected
                | OrderStatus::TooAggressiveAtOpenInterestCapRejected
                | OrderStatus::OpenInterestIncreaseRejected
                | OrderStatus::InsufficientSpotBalanceRejected
                | OrderStatus::OracleRejected
                | OrderStatus::PerpMaxPositionRejected
        )
    }
}

/// Send USDC from the perpetual balance (inner data).
///
/// This is the core data structure for a USDC transfer. To create a signable action,
/// use the `into_action()` method to convert it to a `UsdSendAction`.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#core-usdc-transfer>
pub struct UsdSend {
    pub destination: Address,
    pub amount: Decimal,
    pub time: u64,
}

impl UsdSend {
    /// Converts this into a signable `UsdSendAction`.
    ///
    /// # Parameters
    ///
    /// - `signature_chain_id`: The chain ID for signature verification (e.g., [`super::ARBITRUM_MAINNET_CHAIN_ID`])
    /// - `chain`: Whether this is mainnet or testnet
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let send = UsdSend {
    ///     destination: "0x1234...".parse()?,
    ///     amount: dec!(100),
    ///     time: chrono::Utc::now().timestamp_millis() as u64,
    /// };
    ///
    /// let action = send.into_action(ARBITRUM_MAINNET_CHAIN_ID, Chain::Mainnet);
    /// ```
    #[must_use]
    pub(super) fn into_action(
        self,
        signature_chain_id: &'static str,
        chain: Chain,
    ) -> UsdSendAction {
        UsdSendAction {
            signature_chain_id,
            hyperliquid_chain: chain,
            destination: self.destination,
            amount: self.amount,
            time: self.time,
        }
    }
}

/// Send spot tokens (inner data).
///
/// This is the core data structure for a spot token transfer. To create a signable action,
/// use the `into_action()` method to convert it to a `SpotSendAction`.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#core-spot-transfer>
pub struct SpotSend {
    /// The destination address.
    pub destination: Address,
    /// Token
    pub token: SendToken,
    /// The amount.
    pub amount: Decimal,
    /// Current time, should match the nonce
    pub time: u64,
}

impl SpotSend {
    /// Converts this into a signable `SpotSendAction`.
    ///
    /// # Parameters
    ///
    /// - `signature_chain_id`: The chain ID for signature verification (e.g., [`super::ARBITRUM_MAINNET_CHAIN_ID`])
    /// - `chain`: Whether this is mainnet or testnet
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let send = SpotSend {
    ///     destination: "0x1234...".parse()?,
    ///     token: SendToken(purr_token),
    ///     amount: dec!(1000),
    ///     time: chrono::Utc::now().timestamp_millis() as u64,
    /// };
    ///
    /// let action = send.into_action(ARBITRUM_MAINNET_CHAIN_ID, Chain::Mainnet);
    /// ```
    #[must_use]
    pub(super) fn into_action(
        self,
        signature_chain_id: &'static str,
        chain: Chain,
    ) -> SpotSendAction {
        SpotSendAction {
            signature_chain_id,
            hyperliquid_chain: chain,
            destination: self.destination,
            token: self.token,
            amount: self.amount,
            time: self.time,
        }
    }
}

/// Send asset between accounts or DEXes (inner data).
///
/// This is the core data structure for sending assets across different contexts
/// (e.g., between DEXes or subaccounts). To create a signable action,
/// use the `into_action()` method to convert it to a `SendAssetAction`.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#send-asset>
pub struct SendAsset {
    /// The destination address.
    pub destination: Address,
    /// Source DEX, can be empty
    pub source_dex: String,
    /// Destiation DEX, can be empty
    pub destination_dex: String,
    /// Token
    pub token: SendToken,
    /// The amount.
    pub amount: Decimal,
    /// From subaccount, can be empty
    pub from_sub_account: String,
    /// Request nonce
    pub nonce: u64,
}

impl SendAsset {
    /// Converts this into a signable `SendAssetAction`.
    ///
    /// # Parameters
    ///
    /// - `signature_chain_id`: The chain ID for signature verification (e.g., [`super::ARBITRUM_MAINNET_CHAIN_ID`])
    /// - `chain`: Whether this is mainnet or testnet
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let send = SendAsset {
    ///     destination: "0x1234...".parse()?,
    ///     source_dex: String::new(),
    ///     destination_dex: String::new(),
    ///     token: SendToken(token),
    ///     amount: dec!(500),
    ///     from_sub_account: String::new(),
    ///     nonce: 12345,
    /// };
    ///
    /// let action = send.into_action(ARBITRUM_MAINNET_CHAIN_ID, Chain::Mainnet);
    /// ```
    #[must_use]
    pub(super) fn into_action(
        self,
        signature_chain_id: &'static str,
        chain: Chain,
    ) -> SendAssetAction {
        SendAssetAction {
            signature_chain_id,
            hyperliquid_chain: chain,
            destination: self.destination,
            source_dex: self.source_dex,
            destination_dex: self.destination_dex,
            token: self.token,
            amount: self.amount,
            from_sub_account: self.from_sub_account,
            nonce: self.nonce,
        }
    }
}

/// Approve (or revoke) an API wallet to trade on behalf of the user.
///
/// Unlike [`UsdSend`]/[`SpotSend`]/[`SendAsset`], this struct doubles as both the
/// ergonomic input and the signable wire payload: it is constructed directly with
/// `signature_chain_id`/`hyperliquid_chain` already filled in and passed straight
/// to [`super::signing::Signable::sign`].
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#approve-an-api-wallet>
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAgent {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// The agent (API wallet) address being approved.
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub agent_address: Address,
    /// Optional human-readable label for the agent. Empty string if unnamed.
    pub agent_name: String,
    /// Request nonce, should match the signing nonce.
    pub nonce: u64,
}

/// Signers authorized on a multisig account, and the threshold required to act.
///
/// Serialized as an embedded JSON string on [`ConvertToMultiSigUser`] (or the
/// literal string `"null"` when converting back to a regular user).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignersConfig {
    /// Addresses authorized to co-sign actions for this account.
    pub authorized_users: Vec<Address>,
    /// Number of signatures required to execute an action.
    pub threshold: u64,
}

/// Convert an account into a multisig user, or back into a regular one.
///
/// Passing a [`SignersConfig`] with an empty `authorized_users` list converts the
/// account back to a normal (non-multisig) user.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#convert-to-and-from-a-multi-signature-user>
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToMultiSigUser {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// The target signer configuration, embedded as a JSON string on the wire.
    #[serde(serialize_with = "super::utils::serialize_signers_as_json")]
    pub signers: SignersConfig,
    /// Request nonce, should match the signing nonce.
    pub nonce: u64,
}

/// Withdraw USDC from the Hyperliquid bridge back to L1 Arbitrum.
///
/// Like [`ApproveAgent`], this struct doubles as both the ergonomic input and the
/// signable wire payload.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#initiate-a-withdrawal-request>
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Withdraw3Action {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// Destination address on Arbitrum.
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub destination: Address,
    /// Amount of USDC to withdraw.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Current time, should match the nonce.
    pub time: u64,
}

/// Move USD between the perp and spot wallets of the same account.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#transfer-from-spot-to-perp>
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsdClassTransferAction {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// Amount to move, as a plain decimal string on the wire.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// `true` moves spot funds into the perp wallet; `false` the reverse.
    pub to_perp: bool,
    /// Request nonce, should match the signing nonce.
    pub nonce: u64,
}

/// Approve a maximum builder fee rate for a given builder address.
///
/// `max_fee_rate` is a percentage string such as `"0.001%"`, matching the exchange's
/// own representation; the facade's numeric [`BuilderFee`] bound is enforced separately.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#approve-a-builder-fee>
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBuilderFeeAction {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// Maximum fee rate the builder is allowed to charge, e.g. `"0.001%"`.
    pub max_fee_rate: String,
    /// The builder address being approved.
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub builder: Address,
    /// Request nonce, should match the signing nonce.
    pub nonce: u64,
}

/// Set (or clear) the referral code attached to an account.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetReferrerAction {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// Referral code to attach to the account.
    pub code: String,
    /// Request nonce, should match the signing nonce.
    pub nonce: u64,
}

/// Delegate (or undelegate) staked HYPE to a validator.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenDelegateAction {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// Validator address to (un)delegate to.
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub validator: Address,
    /// Amount of wei (HYPE's smallest unit) to move.
    pub wei: u64,
    /// `true` removes a prior delegation rather than adding one.
    pub is_undelegate: bool,
    /// Request nonce, should match the signing nonce.
    pub nonce: u64,
}

/// Enable or disable dex abstraction (cross-DEX order routing) for the user's own account.
///
/// Distinct from [`AgentEnableDexAbstraction`], which toggles the same setting for an
/// approved agent rather than the account owner.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDexAbstractionAction {
    /// Signature chain ID.
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// Whether dex abstraction should be enabled.
    pub enabled: bool,
    /// Request nonce, should match the signing nonce.
    pub nonce: u64,
}

/// Response to an order insertion.
///
/// Contains the result of submitting an order to the exchange.
///
/// # Variants
///
/// - **Success**: Order was accepted (generic success)
/// - **Resting**: Order is resting on the book (not immediately filled)
/// - **Filled**: Order was immediately filled (market or aggressive limit)
/// - **Error**: Order was rejected with an error message
///
/// # Example
///
/// ```rust
/// use hypercore_sdk::hypercore::types::OrderResponseStatus;
///
/// # fn handle_order_response(status: OrderResponseStatus) {
/// match status {
///     OrderResponseStatus::Success => {
///         println!("Order accepted");
///     }
///     OrderResponseStatus::Resting { oid, cloid } => {
///         println!("Order {} resting on book", oid);
///     }
///     OrderResponseStatus::Filled { total_sz, avg_px, oid } => {
///         println!("Order {} filled: {} @ avg {}", oid, total_sz, avg_px);
///     }
///     OrderResponseStatus::Error(err) => {
///         eprintln!("Order rejected: {}", err);
///     }
/// }
/// # }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderResponseStatus {
    /// Order accepted (generic)
    Success,
    /// Order resting on book
    Resting {
        /// Order ID
        oid: u64,
        /// Client order ID
        cloid: Option<B128>,
    },
    /// Order immediately filled
    Filled {
        /// Total filled size
        #[serde(rename = "totalSz")]
        total_sz: Decimal,
        /// Average fill price
        #[serde(rename = "avgPx")]
        avg_px: Decimal,
        /// Order ID
        oid: u64,
    },
    /// Order rejected with error
    Error(String),
}

impl OrderResponseStatus {
    /// Returns true if the order was successful (not an error).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        !matches!(self, OrderResponseStatus::Error(_))
    }

    /// Returns true if the order resulted in an error.
    #[must_use]
    pub fn is_err(&self) -> bool {
        matches!(self, OrderResponseStatus::Error(_))
    }

    /// Returns the error message if this is an error response.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            OrderResponseStatus::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the order ID if available (Resting or Filled).
    #[must_use]
    pub fn oid(&self) -> Option<u64> {
        match self {
            OrderResponseStatus::Resting { oid, .. } | OrderResponseStatus::Filled { oid, .. } => {
                Some(*oid)
            }
            _ => None,
        }
    }
}

/// Batch order submission.
///
/// A collection of orders sent together in a single transaction, optionally grouped
/// for atomic execution (e.g., bracket orders with take-profit and stop-loss).
///
/// # When to Use
///
/// - **Single order**: Use a vec with one [`OrderRequest`]
/// - **Multiple independent orders**: Set `grouping` to [`OrderGrouping::Na`]
/// - **Bracket orders (TP/SL)**: Use [`OrderGrouping::NormalTpsl`] or [`OrderGrouping::PositionTpsl`]
///
/// # Related Types
///
/// - [`OrderRequest`]: Individual order within the batch
/// - [`OrderGrouping`]: Grouping strategy for the batch
/// - [`OrderResponseStatus`]: Response status for each order
/// - [`HttpClient::place`](crate::hypercore::http::Client::place): Method to submit orders
///
/// # Example
///
/// ```no_run
/// use hypercore_sdk::hypercore::types::*;
/// use rust_decimal::dec;
///
/// let order = BatchOrder {
///     orders: vec![
///         OrderRequest {
///             asset: 0, // BTC
///             is_buy: true,
///             limit_px: dec!(50000),
///             sz: dec!(0.1),
///             reduce_only: false,
///             order_type: OrderTypePlacement::Limit {
///                 tif: TimeInForce::Gtc,
///             },
///             cloid: Default::default(),
///         }
///     ],
///     grouping: OrderGrouping::Na,
///     builder: None,
/// };
/// ```
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BatchOrder {
    pub orders: Vec<OrderRequest>,
    pub grouping: OrderGrouping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builder: Option<BuilderFee>,
}

/// Optional builder fee attached to an order action.
///
/// `f` is in tenths of a basis point and must not exceed the configured
/// bound (see [`BuilderFee::validate`]).
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BuilderFee {
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub b: Address,
    pub f: u64,
}

impl BuilderFee {
    /// Validates the fee against the configured maximum (inclusive).
    pub fn validate(&self, max_f: u64) -> Result<(), super::error::Error> {
        if self.f > max_f {
            return Err(super::error::Error::BadBuilderFee(format!(
                "builder fee {} exceeds configured bound {max_f}",
                self.f
            )));
        }
        Ok(())
    }
}

/// Order grouping strategy.
///
/// Determines how orders are grouped when sent in a batch.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub enum OrderGrouping {
    Na,
    NormalTpsl,
    PositionTpsl,
}

/// Order request.
///
/// Represents a single order within a batch.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[serde_as]
pub struct OrderRequest {
    #[serde(rename = "a")]
    pub asset: usize,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(rename = "p", with = "rust_decimal::serde::str")]
    pub limit_px: Decimal,
    #[serde(rename = "s", with = "rust_decimal::serde::str")]
    pub sz: Decimal,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    #[serde(rename = "t")]
    pub order_type: OrderTypePlacement,
    #[serde(rename = "c")]
    #[serde(serialize_with = "super::utils::serialize_cloid_as_hex")]
    pub cloid: Cloid,
}

/// Order type for the placement.
///
/// Specifies whether the order is limit or trigger and its associated parameters.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub enum OrderTypePlacement {
    Limit {
        tif: TimeInForce,
    },
    Trigger {
        #[serde(with = "rust_decimal::serde::str")]
        trigger_px: Decimal,
        is_market: bool,
        tpsl: TpSl,
    },
}

/// Trigger type.
///
/// Indicates whether the trigger is a take‑profit (`Tp`) or stop‑loss (`Sl`).
#[derive(PartialEq, Eq, Deserialize, Serialize, Copy, Clone, Debug)]
#[serde(rename = "lowercase")]
pub enum TpSl {
    Tp,
    Sl,
}

/// Batch modify request.
///
/// Contains a list of order modifications to be applied.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BatchModify {
    pub modifies: Vec<Modify>,
}

/// Individual order modification.
///
/// References the order by ID and includes the new order data.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Modify {
    pub oid: OidOrCloid,
    pub order: OrderRequest,
}

/// Batch cancel request.
///
/// Contains a list of order IDs to cancel.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BatchCancel {
    pub cancels: Vec<Cancel>,
}

/// Batch cancel by cloid request.
///
/// Contains a list of cloid values to cancel.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BatchCancelCloid {
    pub cancels: Vec<CancelByCloid>,
}

/// Cancel request.
///
/// References an order by asset and ID.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cancel {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "o")]
    pub oid: u64,
}

/// Cancel request by cloid.
///
/// References an order by asset and cloid.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CancelByCloid {
    pub asset: u32,
    #[serde(with = "const_hex")]
    pub cloid: B128,
}

/// Schedule cancellation of all orders.
///
/// The optional `time` field can be used to delay the cancellation.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCancel {
    pub time: Option<u64>,
}

/// Update the leverage setting for a perp asset.
///
/// `is_cross` selects cross-margin (`true`) vs isolated-margin (`false`).
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeverage {
    pub asset: usize,
    pub is_cross: bool,
    pub leverage: u32,
}

/// Adjust the isolated margin allocated to a perp position.
///
/// `ntli` is signed: positive adds margin, negative removes it.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIsolatedMargin {
    pub asset: usize,
    pub is_buy: bool,
    pub ntli: i64,
}

/// Move USD into or out of a sub-account from the parent account.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountTransfer {
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub sub_account_user: Address,
    pub is_deposit: bool,
    pub usd: u64,
}

/// Move a spot token into or out of a sub-account from the parent account.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountSpotTransfer {
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub sub_account_user: Address,
    pub is_deposit: bool,
    pub token: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Move USD into or out of a vault the caller has access to.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VaultTransfer {
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub vault_address: Address,
    pub is_deposit: bool,
    pub usd: u64,
}

/// Create a new sub-account under the calling account.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubAccount {
    pub name: String,
}

/// Enable or disable dex abstraction for an approved agent wallet.
///
/// Distinct from [`UserDexAbstractionAction`], which toggles the setting for the
/// account owner directly.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgentEnableDexAbstraction {
    pub enabled: bool,
}

/// Opaque spot-deploy sub-action (token registration, genesis, Hyperliquidity setup, ...).
///
/// The spot-deploy family covers a wide, evolving set of sub-actions; rather than model
/// each one as its own type, callers build the JSON payload for the sub-action they need
/// (`registerToken2`, `userGenesis`, `genesis`, `registerSpot`, `registerHyperliquidity`,
/// `setDeployerTradingFeeShare`, ...) and this wraps it verbatim for signing.
#[derive(Serialize, Debug, Clone)]
#[serde(transparent)]
pub struct SpotDeployAction(pub serde_json::Value);

/// Opaque perp-deploy sub-action (perp dex registration, oracle updates, ...).
///
/// See [`SpotDeployAction`] for why this carries a raw JSON payload instead of a
/// per-sub-action struct.
#[derive(Serialize, Debug, Clone)]
#[serde(transparent)]
pub struct PerpDeployAction(pub serde_json::Value);

/// Opaque validator-management sub-action (register, unregister, change profile, ...).
#[derive(Serialize, Debug, Clone)]
#[serde(transparent)]
pub struct CValidatorActionPayload(pub serde_json::Value);

/// Opaque validator-signer sub-action (jail/unjail self, update signer set, ...).
#[derive(Serialize, Debug, Clone)]
#[serde(transparent)]
pub struct CSignerActionPayload(pub serde_json::Value);

/// User balance.
///
/// Represents the balance of a specific token in a user's account.
///
/// # Fields
///
/// - `coin`: Token symbol (e.g., "USDC", "BTC")
/// - `token`: Token index in the system
/// - `hold`: Amount currently held (locked in orders or positions)
/// - `total`: Total balance (held + available)
/// - `entry_ntl`: Entry notional value for position tracking
///
/// # Example
///
/// ```rust
/// use hypercore_sdk::hypercore::types::UserBalance;
/// use rust_decimal::dec;
///
/// # fn check_balance(balance: UserBalance) {
/// // Check available balance
/// let available = balance.available();
/// println!("Available {}: {}", balance.coin, available);
///
/// // Check if sufficient balance for trade
/// let trade_amount = dec!(100);
/// if balance.can_trade(trade_amount) {
///     println!("Sufficient balance for trade");
/// } else {
///     println!("Insufficient balance");
/// }
/// # }
/// ```
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserBalance {
    /// Token symbol
    pub coin: String,
    /// Token index
    pub token: usize,
    /// Amount held (locked)
    pub hold: Decimal,
    /// Total balance
    pub total: Decimal,
    /// Entry notional
    pub entry_ntl: Decimal,
}

impl UserBalance {
    /// Returns the available balance (total - hold).
    ///
    /// This is the amount that can be freely used for new orders or withdrawals.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.total - self.hold
    }

    /// Returns true if the available balance is sufficient for the given amount.
    #[must_use]
    pub fn can_trade(&self, amount: Decimal) -> bool {
        self.available() >= amount
    }

    /// Returns true if there is any held balance.
    #[must_use]
    pub fn has_held(&self) -> bool {
        self.hold > Decimal::ZERO
    }

    /// Returns the percentage of balance that is held (locked).
    ///
    /// Returns a Decimal (e.g., 25.5 for 25.5%). Returns 0 if total balance is zero.
    #[must_use]
    pub fn held_percentage(&self) -> Decimal {
        if self.total.is_zero() {
            Decimal::ZERO
        } else {
            (self.hold / self.total) * Decimal::ONE_HUNDRED
        }
    }
}

/// Abstraction over a token to be sent out.
///
/// This is to prevent users from f*cking it up.
#[derive(Debug, Clone)]
pub struct SendToken(pub SpotToken);

impl fmt::Display for SendToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:x}", self.0.name, self.0.token_id)
    }
}

/// Response to a `clearinghouseState` info query for perpetual positions.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClearinghouseState {
    /// Server time of the snapshot, in milliseconds since epoch.
    pub time: u64,
    /// Account-level margin summary.
    pub margin_summary: MarginSummary,
    /// Open positions for the account, one per asset.
    pub asset_positions: Vec<AssetPosition>,
}

/// Account-level margin summary for a [`ClearinghouseState`] snapshot.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarginSummary {
    /// Total account value, including unrealized PnL.
    pub account_value: Decimal,
    /// Total notional position value.
    pub total_ntl_pos: Decimal,
    /// Total raw margin used.
    pub total_margin_used: Decimal,
}

/// A single open position, as reported by [`ClearinghouseState`].
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssetPosition {
    /// The wrapped position data.
    pub position: Position,
}

/// Position details for a single asset.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Asset symbol (coin name).
    pub coin: String,
    /// Signed position size as a decimal string (`szi`); negative is short.
    pub szi: Decimal,
    /// Entry price, if any.
    pub entry_px: Option<Decimal>,
    /// Unrealized PnL.
    pub unrealized_pnl: Decimal,
    /// Leverage applied to this position.
    pub leverage: Leverage,
}

/// Leverage mode and value for a position.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Leverage {
    /// `"cross"` or `"isolated"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Leverage multiplier.
    pub value: u32,
}

// ========================================================
// PRIVATE TYPES
// ========================================================

/// Send USDC from the perpetual balance.
///
/// This action transfers USDC from your perpetual trading balance to another address.
/// The transfer happens on the Hyperliquid L1 and requires EIP-712 signature.
///
/// # Fields
///
/// - `signature_chain_id`: The chain ID for signature verification (use [`super::ARBITRUM_MAINNET_CHAIN_ID`] or [`super::ARBITRUM_TESTNET_CHAIN_ID`])
/// - `hyperliquid_chain`: Whether this is mainnet or testnet
/// - `destination`: The recipient's address
/// - `amount`: Amount of USDC to send (in USDC, not wei)
/// - `time`: Timestamp in milliseconds (should match the nonce)
///
/// # Example
///
/// ```rust,ignore
/// use hypercore_sdk::hypercore::types::UsdSendAction;
/// use rust_decimal::dec;
///
/// let send = UsdSendAction {
///     signature_chain_id: ARBITRUM_MAINNET_CHAIN_ID,
///     hyperliquid_chain: Chain::Mainnet,
///     destination: "0x1234...".parse()?,
///     amount: dec!(100), // 100 USDC
///     time: chrono::Utc::now().timestamp_millis() as u64,
/// };
/// ```
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#core-usdc-transfer>
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct UsdSendAction {
    /// Signature chain ID.
    ///
    /// For arbitrum use [`super::ARBITRUM_MAINNET_CHAIN_ID`] or [`super::ARBITRUM_TESTNET_CHAIN_ID`].
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// The destination address.
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub destination: Address,
    /// The amount.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Current time, should match the nonce
    pub time: u64,
}

/// Send spot tokens to another address.
///
/// This action transfers spot tokens (like PURR, HYPE, etc.) from your spot balance
/// to another address. The transfer happens on the Hyperliquid L1 and requires EIP-712 signature.
///
/// # Fields
///
/// - `signature_chain_id`: The chain ID for signature verification (use [`super::ARBITRUM_MAINNET_CHAIN_ID`] or [`super::ARBITRUM_TESTNET_CHAIN_ID`])
/// - `hyperliquid_chain`: Whether this is mainnet or testnet
/// - `destination`: The recipient's address
/// - `token`: The spot token to send (wrapped in `SendToken`)
/// - `amount`: Amount to send (in token's native units)
/// - `time`: Timestamp in milliseconds (should match the nonce)
///
/// # Example
///
/// ```rust,ignore
/// use hypercore_sdk::hypercore::types::{SpotSendAction, SendToken};
/// use rust_decimal::dec;
///
/// let send = SpotSendAction {
///     signature_chain_id: ARBITRUM_MAINNET_CHAIN_ID,
///     hyperliquid_chain: Chain::Mainnet,
///     destination: "0x1234...".parse()?,
///     token: SendToken(purr_token),
///     amount: dec!(1000),
///     time: chrono::Utc::now().timestamp_millis() as u64,
/// };
/// ```
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#core-spot-transfer>
#[serde_as]
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct SpotSendAction {
    /// Signature chain ID.
    ///
    /// For arbitrum use [`super::ARBITRUM_MAINNET_CHAIN_ID`] or [`super::ARBITRUM_TESTNET_CHAIN_ID`].
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// The destination address.
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub destination: Address,
    /// Token
    #[serde_as(as = "DisplayFromStr")]
    pub token: SendToken,
    /// The amount.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Current time, should match the nonce
    pub time: u64,
}

/// Send asset.
///
/// <https://hyperliquid.gitbook.io/hyperliquid-docs/for-developers/api/exchange-endpoint#send-asset>
#[serde_as]
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct SendAssetAction {
    /// Signature chain ID.
    ///
    /// For arbitrum use [`super::ARBITRUM_MAINNET_CHAIN_ID`] or [`super::ARBITRUM_TESTNET_CHAIN_ID`].
    pub signature_chain_id: &'static str,
    /// The chain this action is being executed on.
    pub hyperliquid_chain: Chain,
    /// The destination address.
    #[serde(serialize_with = "super::utils::serialize_address_as_hex")]
    pub destination: Address,
    /// Source DEX, can be empty
    pub source_dex: String,
    /// Destiation DEX, can be empty
    pub destination_dex: String,
    /// Token
    #[serde_as(as = "DisplayFromStr")]
    pub token: SendToken,
    /// The amount.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// From subaccount, can be empty
    pub from_sub_account: String,
    /// Request nonce
    pub nonce: u64,
}

/// Request for an action.
///
/// Contains the action, a nonce, signature, optional vault address, and optional expiry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActionRequest {
    /// Action.
    pub action: Action,
    /// Nonce of the message.
    pub nonce: u64,
    /// Signature
    pub signature: Signature,
    /// Trading on behalf of
    pub vault_address: Option<Address>,
    /// Timestamp in milliseconds
    pub expires_after: Option<u64>,
}

/// API response wrapper.
///
/// The `Ok` variant contains a successful response, while `Err` holds an error message.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", content = "response")]
#[serde(rename_all = "camelCase")]
pub(super) enum ApiResponse {
    Ok(OkResponse),
    Err(String),
}

/// Successful API response data.
///
/// Currently supports order responses and a default placeholder.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "camelCase")]
pub(super) enum OkResponse {
    Order { statuses: Vec<OrderResponseStatus> },
    // should be ok?
    Default,
}

/// Info endpoint request types.
///
/// Used for querying various types of information from the API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "type")]
pub(super) enum InfoRequest {
    Meta {
        #[serde(skip_serializing_if = "Option::is_none")]
        dex: Option<String>,
    },
    SpotMeta,
    PerpDexs,
    FrontendOpenOrders {
        user: Address,
    },
    HistoricalOrders {
        user: Address,
    },
    UserFills {
        user: Address,
    },
    OrderStatus {
        user: Address,
        #[serde(with = "either::serde_untagged")]
        oid: OidOrCloid,
    },
    SpotClearinghouseState {
        user: Address,
    },
    ClearinghouseState {
        user: Address,
    },
    AllMids,
    CandleSnapshot {
        req: CandleSnapshotRequest,
    },
}

/// Candle snapshot request parameters.
///
/// Used to query historical candlestick data from the API.
///
/// # Notes
///
/// - Only the most recent 5000 candles are available
/// - Times are in milliseconds
/// - For HIP-3 assets, prefix the coin with dex name (e.g., "xyz:XYZ100")
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CandleSnapshotRequest {
    /// Market symbol (e.g., "BTC", "ETH")
    pub coin: String,
    /// Candle interval (e.g., "1m", "15m", "1h", "1d")
    pub interval: CandleInterval,
    /// Start time in milliseconds
    pub start_time: u64,
    /// End time in milliseconds
    pub end_time: u64,
}

/// Signature.
///
/// Represents an EIP‑712 signature split into its components.
#[derive(Clone, Copy, Serialize)]
#[serde_as]
pub struct Signature {
    #[serde(serialize_with = "super::utils::serialize_as_hex")]
    pub r: U256,
    #[serde(serialize_with = "super::utils::serialize_as_hex")]
    pub s: U256,
    pub v: u64,
}

impl fmt::Display for Signature {
    /// Formats the signature as a hex string in the format: 0x{r}{s}{v}
    ///
    /// This is the standard Ethereum signature format where:
    /// - r: 32 bytes (64 hex chars)
    /// - s: 32 bytes (64 hex chars)
    /// - v: 1 byte (2 hex chars)
    ///
    /// Total: 130 hex characters (0x prefix + 128 chars)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:064x}{:064x}{:02x}", self.r, self.s, self.v)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("r", &format!("0x{:x}", self.r))
            .field("s", &format!("0x{:x}", self.s))
            .field("v", &self.v)
            .finish()
    }
}

impl std::str::FromStr for Signature {
    type Err = anyhow::Error;

    /// Parses a signature from a hex string.
    ///
    /// The input can be:
    /// - With or without "0x" prefix
    /// - 130 hex characters (65 bytes: r=32, s=32, v=1)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Remove 0x prefix if present
        let hex_str = s.strip_prefix("0x").unwrap_or(s);

        // Validate length (130 hex chars = 65 bytes)
        if hex_str.len() != 130 {
            anyhow::bail!(
                "Invalid signature length: expected 130 hex characters (65 bytes), got {}",
                hex_str.len()
            );
        }

        // Parse r (first 64 hex chars = 32 bytes)
        let r = U256::from_str_radix(&hex_str[..64], 16)
            .map_err(|e| anyhow::anyhow!("Failed to parse r component: {}", e))?;

        // Parse s (next 64 hex chars = 32 bytes)
        let s = U256::from_str_radix(&hex_str[64..128], 16)
            .map_err(|e| anyhow::anyhow!("Failed to parse s component: {}", e))?;

        // Parse v (last 2 hex chars = 1 byte)
        let v = u64::from_str_radix(&hex_str[128..130], 16)
            .map_err(|e| anyhow::anyhow!("Failed to parse v component: {}", e))?;

        Ok(Signature { r, s, v })
    }
}

impl From<Signature> for alloy::signers::Signature {
    fn from(sig: Signature) -> Self {
        let recid = RecoveryId::from_byte((sig.v - 27) as u8).expect("recid");
        Self::new(sig.r, sig.s, recid.is_y_odd())
    }
}

impl From<alloy::signers::Signature> for Signature {
    fn from(signature: alloy::signers::Signature) -> Self {
        let recid = signature.recid().to_byte() as u64 + 27;
        Self {
            r: signature.r(),
            s: signature.s(),
            v: recid,
        }
    }
}

/// Multi-signature action payload.
///
/// Contains the multisig user address, outer signer, and the inner action to execute.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(super) struct MultiSigPayload {
    /// The multisig account address
    pub multi_sig_user: String,
    /// The address executing the multisig action
    pub outer_signer: String,
    /// The inner action to execute
    pub action: Box<Action>,
}

/// Multi-signature action wrapper.
///
/// Wraps any action with multiple signatures for multisig execution.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(super) struct MultiSigAction {
    /// Signature chain ID (0x66eee for L1 multisig)
    pub signature_chain_id: &'static str,
    /// Signatures from authorized signers
    pub signatures: Vec<Signature>,
    /// The multisig payload
    pub payload: MultiSigPayload,
}

/// An action that requires signing.
///
/// Represents a request to the exchange that must be signed by the user.
#[derive(Clone, Serialize, Debug, derive_more::From)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub(super) enum Action {
    /// Order insertion.
    Order(BatchOrder),
    /// Order modification.
    BatchModify(BatchModify),
    /// Order cancellation by oid.
    Cancel(BatchCancel),
    /// Order cancellation by cloid.
    CancelByCloid(BatchCancelCloid),
    /// Single order modification.
    Modify(Modify),
    /// Schedule cancellation of all orders.
    ScheduleCancel(ScheduleCancel),
    /// Update leverage for a perp asset.
    UpdateLeverage(UpdateLeverage),
    /// Update isolated margin for a perp position.
    UpdateIsolatedMargin(UpdateIsolatedMargin),
    /// Core USDC transfer.
    UsdSend(UsdSendAction),
    /// Withdraw USDC from the bridge back to L1 Arbitrum.
    Withdraw3(Withdraw3Action),
    /// Send asset.
    SendAsset(SendAssetAction),
    /// Spot send.
    SpotSend(SpotSendAction),
    /// Move USD between the perp and spot wallets.
    UsdClassTransfer(UsdClassTransferAction),
    /// Move USD into or out of a sub-account.
    SubAccountTransfer(SubAccountTransfer),
    /// Move a spot token into or out of a sub-account.
    SubAccountSpotTransfer(SubAccountSpotTransfer),
    /// Move USD into or out of a vault.
    VaultTransfer(VaultTransfer),
    /// Approve an API wallet.
    ApproveAgent(ApproveAgent),
    /// Enable or disable dex abstraction for the account owner.
    UserDexAbstraction(UserDexAbstractionAction),
    /// Approve a maximum builder fee rate.
    ApproveBuilderFee(ApproveBuilderFeeAction),
    /// Set the account's referral code.
    SetReferrer(SetReferrerAction),
    /// Delegate or undelegate staked HYPE.
    TokenDelegate(TokenDelegateAction),
    /// Convert to/from a multisig user.
    ConvertToMultiSigUser(ConvertToMultiSigUser),
    /// EVM user modify.
    EvmUserModify { using_big_blocks: bool },
    /// Multi-sig action.
    MultiSig(MultiSigAction),
    /// Spot-deploy sub-action.
    SpotDeploy(SpotDeployAction),
    /// Perp-deploy sub-action.
    PerpDeploy(PerpDeployAction),
    /// Validator-management sub-action.
    #[serde(rename = "CValidatorAction")]
    CValidatorAction(CValidatorActionPayload),
    /// Validator-signer sub-action.
    #[serde(rename = "CSignerAction")]
    CSignerAction(CSignerActionPayload),
    /// Create a sub-account.
    CreateSubAccount(CreateSubAccount),
    /// Enable or disable dex abstraction for an approved agent.
    AgentEnableDexAbstraction(AgentEnableDexAbstraction),
    /// Invalidate a request.
    Noop,
}

impl Action {
    /// Hash the action for signing.
    ///
    /// The hash is generated by serializing the action to MessagePack, appending the nonce,
    /// optional vault address, and optional expiry, then Keccak256 hashing.
    #[inline]
    pub fn hash(
        &self,
        nonce: u64,
        maybe_vault_address: Option<Address>,
        maybe_expires_after: Option<u64>,
    ) -> Result<B256, rmp_serde::encode::Error> {
        utils::rmp_hash(self, nonce, maybe_vault_address, maybe_expires_after)
    }
}

impl Action {
    /// Returns the typed data for multisig signing, if applicable.
    ///
    /// Only EIP-712 typed data actions (UsdSend, SpotSend, SendAsset) support multisig typed data.
    /// All other actions (orders, cancels, modifications) return None and use RMP hash signing.
    pub fn typed_data_multisig(
        &self,
        multi_sig_user: Address,
        lead: Address,
        chain: Chain,
    ) -> Option<TypedData> {
        let multi_sig = Some((multi_sig_user, lead));

        match self {
            Action::UsdSend(inner) => Some(utils::get_typed_data::<solidity::multisig::UsdSend>(
                inner, chain, multi_sig,
            )),
            Action::SpotSend(inner) => Some(utils::get_typed_data::<solidity::multisig::SpotSend>(
                inner, chain, multi_sig,
            )),
            Action::SendAsset(inner) => Some(utils::get_typed_data::<solidity::multisig::SendAsset>(
                inner, chain, multi_sig,
            )),
            // All other actions use RMP signing
            _ => None,
        }
    }
}

impl Signable for Action {
    fn sign_sync<S: SignerSync>(
        self,
        signer: &S,
        nonce: u64,
        maybe_vault_address: Option<Address>,
        maybe_expires_after: Option<DateTime<Utc>>,
        chain: Chain,
    ) -> anyhow::Result<ActionRequest> {
        // Top-down delegation: Action dispatches to each variant's sign_sync implementation
        match self {
            Action::Order(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::BatchModify(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::Cancel(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::CancelByCloid(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::ScheduleCancel(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::UsdSend(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::SendAsset(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::SpotSend(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::ApproveAgent(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::Withdraw3(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::UsdClassTransfer(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::ApproveBuilderFee(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::SetReferrer(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::TokenDelegate(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::UserDexAbstraction(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::ConvertToMultiSigUser(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::MultiSig(inner) => {
                inner.sign_sync(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
            Action::Modify(_)
            | Action::UpdateLeverage(_)
            | Action::UpdateIsolatedMargin(_)
            | Action::SubAccountTransfer(_)
            | Action::SubAccountSpotTransfer(_)
            | Action::VaultTransfer(_)
            | Action::EvmUserModify { .. }
            | Action::SpotDeploy(_)
            | Action::PerpDeploy(_)
            | Action::CValidatorAction(_)
            | Action::CSignerAction(_)
            | Action::CreateSubAccount(_)
            | Action::AgentEnableDexAbstraction(_)
            | Action::Noop => {
                // These variants use RMP signing directly
                sign_rmp_sync(signer, self, nonce, maybe_vault_address, maybe_expires_after, chain)
            }
        }
    }

    async fn sign<S: alloy::signers::Signer + Send + Sync>(
        self,
        signer: &S,
        nonce: u64,
        maybe_vault_address: Option<Address>,
        maybe_expires_after: Option<DateTime<Utc>>,
        chain: Chain,
    ) -> anyhow::Result<ActionRequest> {
        // Top-down delegation: Action dispatches to each variant's sign implementation
        match self {
            Action::Order(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::BatchModify(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::Cancel(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::CancelByCloid(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::ScheduleCancel(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::UsdSend(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::SendAsset(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::SpotSend(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::ApproveAgent(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::Withdraw3(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::UsdClassTransfer(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::ApproveBuilderFee(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::SetReferrer(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::TokenDelegate(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::UserDexAbstraction(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::ConvertToMultiSigUser(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::MultiSig(inner) => {
                inner
                    .sign(signer, nonce, maybe_vault_address, maybe_expires_after, chain)
                    .await
            }
            Action::Modify(_)
            | Action::UpdateLeverage(_)
            | Action::UpdateIsolatedMargin(_)
            | Action::SubAccountTransfer(_)
            | Action::SubAccountSpotTransfer(_)
            | Action::VaultTransfer(_)
            | Action::EvmUserModify { .. }
            | Action::SpotDeploy(_)
            | Action::PerpDeploy(_)
            | Action::CValidatorAction(_)
            | Action::CSignerAction(_)
            | Action::CreateSubAccount(_)
            | Action::AgentEnableDexAbstraction(_)
            | Action::Noop => {
                // These variants use RMP signing directly
                sign_rmp(signer, self, nonce, maybe_vault_address, maybe_expires_after, chain).await
            }
        }
    }
}

/// Solidity struct definitions for EIP-712 signing.
///
/// These structs define the EIP-712 types used for signing various actions
/// on the Hyperliquid exchange. Each struct corresponds to a specific action type.
pub(super) mod solidity {
    use alloy::sol;

    sol! {
        struct Agent {
            string source;
            bytes32 connectionId;
        }

        struct UsdSend {
            string hyperliquidChain;
            string destination;
            string amount;
            uint64 time;
        }

        struct SpotSend {
            string hyperliquidChain;
            string destination;
            string token;
            string amount;
            uint64 time;
        }

        struct SendAsset {
            string hyperliquidChain;
            string destination;
            string sourceDex;
            string destinationDex;
            string token;
            string amount;
            string fromSubAccount;
            uint64 nonce;
        }

        struct SendMultiSig {
            string hyperliquidChain;
            bytes32 multiSigActionHash;
            uint64 nonce;
        }

        struct ApproveAgent {
            string hyperliquidChain;
            address agentAddress;
            string agentName;
            uint64 nonce;
        }

        struct ConvertToMultiSigUser {
            string hyperliquidChain;
            string signers;
            uint64 nonce;
        }

        struct Withdraw {
            string hyperliquidChain;
            string destination;
            string amount;
            uint64 time;
        }

        struct UsdClassTransfer {
            string hyperliquidChain;
            string amount;
            bool toPerp;
            uint64 nonce;
        }

        struct ApproveBuilderFee {
            string hyperliquidChain;
            string maxFeeRate;
            address builder;
            uint64 nonce;
        }

        struct SetReferrer {
            string hyperliquidChain;
            string code;
            uint64 nonce;
        }

        struct TokenDelegate {
            string hyperliquidChain;
            address validator;
            uint64 wei;
            bool isUndelegate;
            uint64 nonce;
        }

        struct DexAbstraction {
            string hyperliquidChain;
            bool enabled;
            uint64 nonce;
        }
    }

    /// Multisig-specific EIP-712 struct definitions.
    ///
    /// These structs include additional fields for multisig operations,
    /// including the multisig user address and outer signer address.
    pub mod multisig {
        use alloy::sol;

        sol! {
            struct UsdSend {
                string hyperliquidChain;
                address payloadMultiSigUser;
                address outerSigner;
                string destination;
                string amount;
                uint64 time;
            }

            struct SpotSend {
                string hyperliquidChain;
                address payloadMultiSigUser;
                address outerSigner;
                string destination;
                string token;
                string amount;
                uint64 time;
            }

            struct SendAsset {
                string hyperliquidChain;
                address payloadMultiSigUser;
                address outerSigner;
                string destination;
                string sourceDex;
                string destinationDex;
                string token;
                string amount;
                string fromSubAccount;
                uint64 nonce;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response() {
        let text = r#"{
           "status":"ok",
           "response":{
              "type":"order",
              "data":{
                 "statuses":[
                    {
                       "error":"Order must have minimum value of $10."
                    }
                 ]
              }
           }
        }"#;
        let res = serde_json::from_str::<ApiResponse>(text);
        assert!(res.is_ok());
    }

    #[test]
    fn test_api_order_response() {
        let text = r#"{
           "status":"ok",
           "response":{
              "type":"order",
              "data":{
                 "statuses":[
                    {
                       "resting":{
                          "oid":77738308
                       }
                    }
                 ]
              }
           }
        }"#;
        let res = serde_json::from_str::<ApiResponse>(text);
        assert!(res.is_ok());
    }

    #[test]
    fn test_signature_from_str_with_0x_prefix() {
        let hex_sig = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1b";
        let sig: Signature = hex_sig.parse().unwrap();

        assert_eq!(
            sig.r,
            U256::from_str_radix(
                "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
                16
            )
            .unwrap()
        );
        assert_eq!(
            sig.s,
            U256::from_str_radix(
                "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
                16
            )
            .unwrap()
        );
        assert_eq!(sig.v, 27);
    }

    #[test]
    fn test_signature_from_str_without_0x_prefix() {
        let hex_sig = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1b";
        let sig: Signature = hex_sig.parse().unwrap();

        assert_eq!(
            sig.r,
            U256::from_str_radix(
                "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
                16
            )
            .unwrap()
        );
        assert_eq!(
            sig.s,
            U256::from_str_radix(
                "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
                16
            )
            .unwrap()
        );
        assert_eq!(sig.v, 27);
    }

    #[test]
    fn test_candle_interval_display() {
        assert_eq!(CandleInterval::OneMinute.to_string(), "1m");
        assert_eq!(CandleInterval::FifteenMinutes.to_string(), "15m");
        assert_eq!(CandleInterval::OneHour.to_string(), "1h");
        assert_eq!(CandleInterval::OneDay.to_string(), "1d");
        assert_eq!(CandleInterval::OneWeek.to_string(), "1w");
        assert_eq!(CandleInterval::OneMonth.to_string(), "1M");
    }

    #[test]
    fn test_candle_interval_from_str() {
        assert_eq!(
            "1m".parse::<CandleInterval>().unwrap(),
            CandleInterval::OneMinute
        );
        assert_eq!(
            "15m".parse::<CandleInterval>().unwrap(),
            CandleInterval::FifteenMinutes
        );
        assert_eq!(
            "1h".parse::<CandleInterval>().unwrap(),
            CandleInterval::OneHour
        );
        assert_eq!(
            "4h".parse::<CandleInterval>().unwrap(),
            CandleInterval::FourHours
        );
        assert_eq!(
            "1d".parse::<CandleInterval>().unwrap(),
            CandleInterval::OneDay
        );
        assert_eq!(
            "1w".parse::<CandleInterval>().unwrap(),
            CandleInterval::OneWeek
        );
        assert_eq!(
            "1M".parse::<CandleInterval>().unwrap(),
            CandleInterval::OneMonth
        );
    }

    #[test]
    fn test_candle_interval_from_str_invalid() {
        let result = "invalid".parse::<CandleInterval>();
        assert!(result.is_err());
    }

    #[test]
    fn test_candle_deserialization() {
        let json = r#"{
            "t": 1681923600000,
            "T": 1681924499999,
            "s": "BTC",
            "i": "15m",
            "o": "29295.0",
            "h": "29309.0",
            "l": "29250.0",
            "c": "29258.0",
            "v": "0.98639",
            "n": 189
        }"#;

        let candle: Candle = serde_json::from_str(json).unwrap();
        assert_eq!(candle.open_time, 1681923600000);
        assert_eq!(candle.close_time, 1681924499999);
        assert_eq!(candle.coin, "BTC");
        assert_eq!(candle.interval, "15m");
        assert_eq!(candle.open.to_string(), "29295.0");
        assert_eq!(candle.high.to_string(), "29309.0");
        assert_eq!(candle.low.to_string(), "29250.0");
        assert_eq!(candle.close.to_string(), "29258.0");
        assert_eq!(candle.volume.to_string(), "0.98639");
        assert_eq!(candle.num_trades, 189);
    }

    #[test]
    fn test_signature_from_str_invalid_length() {
        let hex_sig = "0x1234"; // Too short
        let result: Result<Signature, _> = hex_sig.parse();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid signature length")
        );
    }

    #[test]
    fn test_signature_from_str_invalid_hex() {
        let hex_sig = "0xGGGG567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef1b";
        let result: Result<Signature, _> = hex_sig.parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_signature_display_format() {
        let sig = Signature {
            r: U256::from_str_radix(
                "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
                16,
            )
            .unwrap(),
            s: U256::from_str_radix(
                "fedcba0987654321fedcba0987654321fedcba0987654321fedcba0987654321",
                16,
            )
            .unwrap(),
            v: 28,
        };

        let display_str = sig.to_string();
        assert!(display_str.starts_with("0x"));
        assert_eq!(display_str.len(), 132); // 0x + 64 + 64 + 2 = 132
        assert!(
            display_str
                .contains("1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef")
        );
        assert!(
            display_str
                .contains("fedcba0987654321fedcba0987654321fedcba0987654321fedcba0987654321")
        );
        assert!(display_str.ends_with("1c")); // v=28 = 0x1c
    }

    #[test]
    fn test_signature_roundtrip() {
        let original = Signature {
            r: U256::from_str_radix(
                "abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890",
                16,
            )
            .unwrap(),
            s: U256::from_str_radix(
                "0987654321fedcba0987654321fedcba0987654321fedcba0987654321fedcba",
                16,
            )
            .unwrap(),
            v: 27,
        };

        // Convert to string and back
        let sig_str = original.to_string();
        let parsed: Signature = sig_str.parse().unwrap();

        assert_eq!(original.r, parsed.r);
        assert_eq!(original.s, parsed.s);
        assert_eq!(original.v, parsed.v);
    }
}
