//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core data types used throughout the matching engine:
// the quote a caller submits, the resting/incoming order the book tracks
// internally, and the trade record a fill produces.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | ENUMS              | Side, OrderKind.                                                 |
// | Quote               | The external input shape (§6 of the engine contract).            |
// | Order               | The internal resting/incoming order, with intrusive list links.  |
// | Trade               | A fill emitted by the matching algorithm.                        |
// | TESTS               | Validation and construction tests.                               |
//--------------------------------------------------------------------------------------------------

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{OrderId, TradeId};

/// Represents the side of an order (Buy or Sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// A buy order.
    Bid,
    /// A sell order.
    Ask,
}

impl Side {
    /// The side that a resting order on this side is matched against.
    pub fn opposite(self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }
}

/// Distinguishes a limit order (carries a price, rests unfilled remainder)
/// from a market order (no price constraint, unfilled remainder discarded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Executes at a specified price or better; unfilled remainder rests.
    Limit,
    /// Executes immediately at the best available price; unfilled
    /// remainder is discarded, never rests.
    Market,
}

/// The quote shape a front-end submits to the engine (§6). `price` is
/// only meaningful for `OrderKind::Limit` and is rounded to `tick_size`
/// on entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub order_id: OrderId,
    pub trade_id: TradeId,
    pub timestamp: i64,
    pub side: Side,
    pub kind: OrderKind,
    pub price: Option<Decimal>,
    pub quantity: Decimal,
}

impl Quote {
    /// Validates the quote against §7's `InvalidQuote` rules, before any
    /// mutation of book state takes place.
    pub fn validate(&self) -> Result<(), crate::error::EngineError> {
        if self.quantity <= Decimal::ZERO {
            return Err(crate::error::EngineError::InvalidQuote(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        match (self.kind, self.price) {
            (OrderKind::Limit, None) => {
                return Err(crate::error::EngineError::InvalidQuote(
                    "limit order requires a price".to_string(),
                ))
            }
            (OrderKind::Limit, Some(price)) if price <= Decimal::ZERO => {
                return Err(crate::error::EngineError::InvalidQuote(format!(
                    "price must be positive, got {price}"
                )))
            }
            _ => {}
        }
        Ok(())
    }
}

/// A resting or incoming order tracked by one side of the book.
///
/// `prev`/`next` are intrusive doubly-linked-list links within the owning
/// `PriceLevel`, expressed as arena handles rather than pointers or `Rc`
/// (see `price_level.rs`) — the "weak backreference to the PriceLevel"
/// spec §9 describes becomes `price`, used to look the level up again
/// through the owning `Book`'s index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub trade_id: TradeId,
    pub side: Side,
    pub kind: OrderKind,
    pub price: Decimal,
    pub quantity: Decimal,
    pub timestamp: i64,
    #[serde(skip)]
    pub(crate) prev: Option<crate::price_level::OrderHandle>,
    #[serde(skip)]
    pub(crate) next: Option<crate::price_level::OrderHandle>,
}

impl Order {
    pub(crate) fn from_quote(quote: &Quote, price: Decimal) -> Self {
        Self {
            order_id: quote.order_id.clone(),
            trade_id: quote.trade_id.clone(),
            side: quote.side,
            kind: quote.kind,
            price,
            quantity: quote.quantity,
            timestamp: quote.timestamp,
            prev: None,
            next: None,
        }
    }
}

/// A completed fill between an incoming (taker) quote and a resting
/// (maker) order, per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: i64,
    pub price: Decimal,
    pub quantity: Decimal,
    pub maker_order_id: OrderId,
    pub maker_trade_id: TradeId,
    pub taker_trade_id: TradeId,
    pub maker_side: Side,
}
