//! # hypercore-sdk
//!
//! Order intent normalization, action signing, and HTTP transport for a
//! Hyperliquid-style high-frequency derivatives exchange.
//!
//! This crate takes a semantic, user-level order intent (symbol, size,
//! optional price and slippage) and turns it into a byte-for-byte correct,
//! cryptographically signed request the exchange's `/exchange` endpoint
//! accepts — inferring direction and size for close-position intents from
//! cached account state, rounding to per-asset precision, and signing via
//! either the msgpack+keccak L1 path or EIP-712 typed data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hypercore_sdk::hypercore::{self, PrivateKeySigner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = hypercore::mainnet();
//! let signer: PrivateKeySigner = "0x...".parse()?;
//!
//! // Close an entire ETH position at a slippage-adjusted market price.
//! client.close_position_market(&signer, "ETH", None, None, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`hypercore`]: order normalizer, action signer, metadata cache, and
//!   HTTP transport for the exchange's `/info` and `/exchange` endpoints.

pub mod hypercore;

/// Re-exported Ethereum address type from Alloy.
///
/// Used throughout the SDK for representing Ethereum-compatible addresses.
pub use alloy::primitives::{Address, U256, address};

/// Re-exported decimal type from rust_decimal.
///
/// Used for precise numerical operations, especially for prices and quantities.
pub use rust_decimal::Decimal;
