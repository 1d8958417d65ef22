//! Order intent normalization.
//!
//! Turns a semantic [`OrderIntent`] into the wire [`OrderRequest`] form the
//! signer accepts: classifying the intent, inferring missing fields from
//! cached metadata and a position snapshot, and formatting size/price
//! through [`super::numeric`].
//!
//! This module is pure and CPU-only. It never calls out to the network
//! itself; callers (the facade in [`super::http`]) resolve asset metadata
//! and fetch a position snapshot first and hand the results in, matching
//! the crate's rule of keeping retry and I/O concerns out of the signer and
//! the normalizer.

use std::collections::HashMap;

use rust_decimal::{Decimal, dec};

use super::cache::{CachedAsset, InstrumentKind};
use super::error::Error;
use super::numeric;
use super::types::{
    BatchOrder, BuilderFee, ClearinghouseState, OrderGrouping, OrderRequest, OrderTypePlacement, TimeInForce, TpSl,
};
use super::Cloid;

/// Default slippage applied to synthesized market prices (5%), per the
/// exchange's documented fallback.
pub const DEFAULT_SLIPPAGE: Decimal = dec!(0.05);

/// A snapshot of a user's signed position sizes, keyed by symbol.
///
/// Built once per operation from a `clearinghouseState` query (component F)
/// and handed to the normalizer as plain data; the normalizer itself never
/// fetches it.
#[derive(Debug, Clone, Default)]
pub struct PositionSnapshot(HashMap<String, Decimal>);

impl PositionSnapshot {
    /// Builds a snapshot from a raw clearinghouse state response.
    #[must_use]
    pub fn from_clearinghouse_state(state: &ClearinghouseState) -> Self {
        let map = state
            .asset_positions
            .iter()
            .map(|entry| (entry.position.coin.to_uppercase(), entry.position.szi))
            .collect();
        Self(map)
    }

    /// Signed position size for `symbol`, if any is open.
    #[must_use]
    pub fn szi(&self, symbol: &str) -> Option<Decimal> {
        self.0.get(&symbol.to_uppercase()).copied()
    }

    /// All symbols with a non-zero position.
    pub fn open_symbols(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, szi)| !szi.is_zero())
            .map(|(symbol, _)| symbol.as_str())
    }
}

/// The semantic, user-level order type before normalization.
#[derive(Debug, Clone)]
pub enum IntentOrderType {
    Limit {
        tif: TimeInForce,
    },
    Trigger {
        trigger_px: Option<Decimal>,
        is_market: bool,
        tpsl: TpSl,
    },
}

/// A semantic order intent, the normalizer's input.
///
/// Optional fields are inferred during normalization per the rules in
/// [`normalize_order`].
#[derive(Debug, Clone)]
pub struct OrderIntent {
    pub instrument: InstrumentKind,
    pub symbol: String,
    pub is_buy: Option<bool>,
    pub size: Option<Decimal>,
    pub reduce_only: bool,
    pub order_type: IntentOrderType,
    pub limit_price: Option<Decimal>,
    pub cloid: Option<Cloid>,
    pub slippage: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntentClass {
    MarketOpen,
    CloseMarketPlaceholder,
    CloseLimitPlaceholder,
    Trigger,
    Plain,
}

fn classify(intent: &OrderIntent) -> IntentClass {
    match &intent.order_type {
        IntentOrderType::Trigger { .. } => IntentClass::Trigger,
        IntentOrderType::Limit { tif } => {
            let is_perp = matches!(intent.instrument, InstrumentKind::Perp);
            let is_ioc = matches!(tif, TimeInForce::Ioc);
            let is_gtc = matches!(tif, TimeInForce::Gtc);

            if !intent.reduce_only && is_ioc && intent.limit_price.is_none() {
                IntentClass::MarketOpen
            } else if is_perp && intent.reduce_only && is_ioc && intent.limit_price.is_none() {
                IntentClass::CloseMarketPlaceholder
            } else if is_perp
                && intent.reduce_only
                && is_gtc
                && intent.limit_price.is_some()
                && intent.is_buy.is_none()
            {
                IntentClass::CloseLimitPlaceholder
            } else {
                IntentClass::Plain
            }
        }
    }
}

/// Computes a slippage-adjusted market price: `mid * (1 + slippage)` for a
/// buy, `mid * (1 - slippage)` for a sell.
#[must_use]
pub fn slippage_price(mid: Decimal, is_buy: bool, slippage: Decimal) -> Decimal {
    if is_buy {
        mid * (Decimal::ONE + slippage)
    } else {
        mid * (Decimal::ONE - slippage)
    }
}

/// Normalizes a single order intent into its wire form.
///
/// - `asset`: resolved from the metadata cache (component B) for `intent.symbol`.
/// - `mid`: the cached mid price, needed only for market-open/close-market
///   synthesis and as a trigger-price fallback; pass `None` when not yet
///   fetched and the intent doesn't need it (a genuine need without a mid
///   supplied is a caller bug, not a recoverable error here).
/// - `position`: the position snapshot, needed only for close-position
///   inference.
pub fn normalize_order(
    mut intent: OrderIntent,
    asset: &CachedAsset,
    mid: Option<Decimal>,
    position: Option<&PositionSnapshot>,
    default_slippage: Decimal,
) -> Result<OrderRequest, Error> {
    // Step 1: sanitize size.
    intent.size = intent.size.map(|s| s.abs());

    let class = classify(&intent);
    let slippage = intent.slippage.unwrap_or(default_slippage);

    match class {
        IntentClass::MarketOpen => {
            let is_buy = intent
                .is_buy
                .ok_or_else(|| Error::BadNumber("market-open order missing isBuy".into()))?;
            let mid = mid.ok_or_else(|| Error::UnknownSymbol(intent.symbol.clone()))?;
            intent.limit_price = Some(slippage_price(mid, is_buy, slippage));
        }
        IntentClass::CloseMarketPlaceholder => {
            let szi = position
                .and_then(|snapshot| snapshot.szi(&intent.symbol))
                .filter(|szi| !szi.is_zero())
                .ok_or_else(|| Error::NoPosition(intent.symbol.clone()))?;

            let is_buy = szi.is_sign_negative();
            intent.is_buy = Some(is_buy);
            if intent.size.is_none() {
                intent.size = Some(szi.abs());
            }
            let mid = mid.ok_or_else(|| Error::UnknownSymbol(intent.symbol.clone()))?;
            intent.limit_price = Some(slippage_price(mid, is_buy, slippage));
        }
        IntentClass::CloseLimitPlaceholder => {
            let szi = position
                .and_then(|snapshot| snapshot.szi(&intent.symbol))
                .filter(|szi| !szi.is_zero())
                .ok_or_else(|| Error::NoPosition(intent.symbol.clone()))?;
            intent.is_buy = Some(szi.is_sign_negative());
        }
        IntentClass::Trigger => {
            if let IntentOrderType::Trigger { trigger_px, .. } = &mut intent.order_type {
                if trigger_px.is_none() {
                    *trigger_px = Some(mid.ok_or_else(|| Error::UnknownSymbol(intent.symbol.clone()))?);
                }
            }
        }
        IntentClass::Plain => {}
    }

    translate(intent, asset)
}

fn translate(intent: OrderIntent, asset: &CachedAsset) -> Result<OrderRequest, Error> {
    let is_buy = intent
        .is_buy
        .ok_or_else(|| Error::BadNumber(format!("{}: missing direction after inference", intent.symbol)))?;
    let size = intent
        .size
        .ok_or_else(|| Error::BadNumber(format!("{}: missing size after inference", intent.symbol)))?;

    let sz = numeric::format_size(size, asset.sz_decimals as u32)?.parse::<Decimal>().map_err(|err| {
        Error::BadNumber(format!("{err}"))
    })?;

    let max_decimals = asset.max_price_decimals();

    let order_type = match intent.order_type {
        IntentOrderType::Limit { tif } => OrderTypePlacement::Limit { tif },
        IntentOrderType::Trigger {
            trigger_px,
            is_market,
            tpsl,
        } => {
            let trigger_px = trigger_px.ok_or_else(|| Error::BadNumber("trigger order missing triggerPx".into()))?;
            let formatted = numeric::format_price(trigger_px, max_decimals)?.parse::<Decimal>().map_err(|err| {
                Error::BadNumber(format!("{err}"))
            })?;
            OrderTypePlacement::Trigger {
                trigger_px: formatted,
                is_market,
                tpsl,
            }
        }
    };

    let limit_px = match intent.limit_price {
        Some(price) => numeric::format_price(price, max_decimals)?.parse::<Decimal>().map_err(|err| {
            Error::BadNumber(format!("{err}"))
        })?,
        None => Decimal::ZERO,
    };

    Ok(OrderRequest {
        asset: asset.id,
        is_buy,
        limit_px,
        sz,
        reduce_only: intent.reduce_only,
        order_type,
        cloid: intent.cloid.unwrap_or_default(),
    })
}

/// Normalizes a list of order intents into a bulk order action.
///
/// Each intent is normalized independently via [`normalize_order`]; `assets`
/// and `mids` must already contain an entry for every symbol referenced
/// (callers resolve these from the metadata cache before calling in).
pub fn normalize_bulk(
    intents: Vec<OrderIntent>,
    grouping: OrderGrouping,
    assets: &HashMap<String, CachedAsset>,
    mids: &HashMap<String, Decimal>,
    position: Option<&PositionSnapshot>,
    default_slippage: Decimal,
    builder: Option<BuilderFee>,
) -> Result<BatchOrder, Error> {
    if let Some(fee) = &builder {
        fee.validate(super::http::MAX_BUILDER_FEE)?;
    }

    let orders = intents
        .into_iter()
        .map(|intent| {
            let key = intent.symbol.to_uppercase();
            let asset = assets
                .get(&key)
                .ok_or_else(|| Error::UnknownSymbol(intent.symbol.clone()))?;
            let mid = mids.get(&key).copied();
            normalize_order(intent, asset, mid, position, default_slippage)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchOrder { orders, grouping, builder })
}

/// Auto-infers direction and size for a position-TP/SL bundle.
///
/// Any entry missing `isBuy` or `size` is filled in from the position
/// snapshot: reduce-only entries take the reverse direction of the
/// underlying position, with size defaulting to `|szi|`. Entries that
/// already specify a direction are left untouched.
///
/// Fails with [`Error::NoPosition`] if the symbol has no open position.
pub fn infer_position_tpsl(
    mut intents: Vec<OrderIntent>,
    symbol: &str,
    position: &PositionSnapshot,
) -> Result<Vec<OrderIntent>, Error> {
    let szi = position
        .szi(symbol)
        .filter(|szi| !szi.is_zero())
        .ok_or_else(|| Error::NoPosition(symbol.to_string()))?;

    for intent in &mut intents {
        if intent.is_buy.is_none() {
            intent.is_buy = Some(szi.is_sign_negative());
        }
        if intent.size.is_none() {
            intent.size = Some(szi.abs());
        }
    }

    Ok(intents)
}

/// Builds close-all-positions intents: one reduce-only, slippage-adjusted
/// market order per non-zero position.
///
/// Fails with [`Error::NoPosition`] if the account holds no open positions.
pub fn close_all_intents(
    position: &PositionSnapshot,
    instrument: InstrumentKind,
    default_slippage: Decimal,
) -> Result<Vec<OrderIntent>, Error> {
    let mut intents: Vec<OrderIntent> = position
        .open_symbols()
        .map(|symbol| OrderIntent {
            instrument,
            symbol: symbol.to_string(),
            is_buy: None,
            size: None,
            reduce_only: true,
            order_type: IntentOrderType::Limit { tif: TimeInForce::Ioc },
            limit_price: None,
            cloid: None,
            slippage: Some(default_slippage),
        })
        .collect();

    if intents.is_empty() {
        return Err(Error::NoPosition("<account>".into()));
    }

    intents.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(intents)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn perp_asset(id: usize, sz_decimals: i64) -> CachedAsset {
        CachedAsset {
            id,
            sz_decimals,
            kind: InstrumentKind::Perp,
        }
    }

    #[test]
    fn market_open_scenario() {
        let intent = OrderIntent {
            instrument: InstrumentKind::Perp,
            symbol: "ETH".into(),
            is_buy: Some(true),
            size: Some(dec!(0.01)),
            reduce_only: false,
            order_type: IntentOrderType::Limit { tif: TimeInForce::Ioc },
            limit_price: None,
            cloid: None,
            slippage: Some(dec!(0.05)),
        };
        let asset = perp_asset(4, 4);

        let wire = normalize_order(intent, &asset, Some(dec!(3000.0)), None, DEFAULT_SLIPPAGE).unwrap();

        assert!(wire.is_buy);
        assert_eq!(wire.sz, dec!(0.01));
        assert_eq!(wire.limit_px, dec!(3150.0));
    }

    #[test]
    fn close_market_inference_scenario() {
        let intent = OrderIntent {
            instrument: InstrumentKind::Perp,
            symbol: "ETH".into(),
            is_buy: None,
            size: None,
            reduce_only: true,
            order_type: IntentOrderType::Limit { tif: TimeInForce::Ioc },
            limit_price: None,
            cloid: None,
            slippage: None,
        };
        let asset = perp_asset(4, 4);

        let mut positions = HashMap::new();
        positions.insert("ETH".to_string(), dec!(-0.0335));
        let snapshot = PositionSnapshot(positions);

        let wire = normalize_order(intent, &asset, Some(dec!(2986.3)), Some(&snapshot), DEFAULT_SLIPPAGE).unwrap();

        assert!(wire.is_buy);
        assert_eq!(wire.sz, dec!(0.0335));
        assert_eq!(wire.limit_px, dec!(3135.6));
        assert!(wire.reduce_only);
    }

    #[test]
    fn close_market_without_position_fails() {
        let intent = OrderIntent {
            instrument: InstrumentKind::Perp,
            symbol: "ETH".into(),
            is_buy: None,
            size: None,
            reduce_only: true,
            order_type: IntentOrderType::Limit { tif: TimeInForce::Ioc },
            limit_price: None,
            cloid: None,
            slippage: None,
        };
        let asset = perp_asset(4, 4);
        let snapshot = PositionSnapshot::default();

        let err = normalize_order(intent, &asset, Some(dec!(2986.3)), Some(&snapshot), DEFAULT_SLIPPAGE).unwrap_err();
        assert!(matches!(err, Error::NoPosition(_)));
    }

    #[test]
    fn position_tpsl_auto_infer_scenario() {
        let mut positions = HashMap::new();
        positions.insert("ETH".to_string(), dec!(0.02));
        let snapshot = PositionSnapshot(positions);

        let make = |trigger: Decimal, tpsl: TpSl| OrderIntent {
            instrument: InstrumentKind::Perp,
            symbol: "ETH".into(),
            is_buy: None,
            size: None,
            reduce_only: true,
            order_type: IntentOrderType::Trigger {
                trigger_px: Some(trigger),
                is_market: true,
                tpsl,
            },
            limit_price: None,
            cloid: None,
            slippage: None,
        };

        let intents = vec![make(dec!(3600), TpSl::Tp), make(dec!(3400), TpSl::Sl)];
        let inferred = infer_position_tpsl(intents, "ETH", &snapshot).unwrap();

        for intent in &inferred {
            assert_eq!(intent.is_buy, Some(false));
            assert_eq!(intent.size, Some(dec!(0.02)));
        }
    }

    #[test]
    fn close_all_skips_zero_positions() {
        let mut positions = HashMap::new();
        positions.insert("ETH".to_string(), dec!(0.02));
        positions.insert("BTC".to_string(), dec!(0));
        let snapshot = PositionSnapshot(positions);

        let intents = close_all_intents(&snapshot, InstrumentKind::Perp, DEFAULT_SLIPPAGE).unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].symbol, "ETH");
    }

    #[test]
    fn close_all_fails_on_empty_account() {
        let snapshot = PositionSnapshot::default();
        let err = close_all_intents(&snapshot, InstrumentKind::Perp, DEFAULT_SLIPPAGE).unwrap_err();
        assert!(matches!(err, Error::NoPosition(_)));
    }
}
