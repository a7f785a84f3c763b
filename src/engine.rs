//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the core matching engine: two `Book`s (bids,
// asks), the crossing algorithm that turns an incoming quote into trades
// plus an optional resting residual, and the trade tape.
//
// | Component   | Description                                                                 |
// |-------------|------------------------------------------------------------------------------|
// | OrderBook   | Owns bids/asks, dispatches `submit`/`cancel`/`amend`, appends to the tape.  |
//
// | Operation            | Description                                                        |
// |-----------------------|---------------------------------------------------------------------|
// | submit                | Dispatches on (kind, side); returns trades + optional resting qty.  |
// | cancel                | Removes a resting order from whichever side holds it.              |
// | amend                 | Delegates to `Book::update_order` on the owning side.               |
// | best_bid / best_ask   | Observers over the current best price on each side.                |
// | depth / volume        | Observers over per-side aggregate counters.                         |
// | tape / tape_rev       | Iterate emitted trades in / reverse-of emission order.              |
//--------------------------------------------------------------------------------------------------

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::book::Book;
use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::ids::OrderId;
use crate::types::{Order, OrderKind, Quote, Side, Trade};

/// The matching engine for a single instrument: two `Book`s, a tick-size
/// policy, and the append-only trade tape.
///
/// The engine is single-threaded cooperative at the matching boundary:
/// `submit` runs one quote to completion before returning, has no
/// internal suspension points, and provides no locking of its own — a
/// concurrent front-end must serialize calls itself.
#[derive(Debug)]
pub struct OrderBook {
    bids: Book,
    asks: Book,
    tape: Vec<Trade>,
    config: Config,
    clock: i64,
}

impl OrderBook {
    pub fn new(config: Config) -> Self {
        Self {
            bids: Book::new(),
            asks: Book::new(),
            tape: Vec::new(),
            config,
            clock: 0,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(Config::default())
    }

    pub fn tick_size(&self) -> Decimal {
        self.config.tick_size
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.max_price()
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.min_price()
    }

    pub fn depth(&self, side: Side) -> usize {
        self.book(side).depth()
    }

    pub fn volume(&self, side: Side) -> Decimal {
        self.book(side).volume()
    }

    pub fn num_orders(&self, side: Side) -> usize {
        self.book(side).num_orders()
    }

    pub fn bids(&self) -> &Book {
        &self.bids
    }

    pub fn asks(&self) -> &Book {
        &self.asks
    }

    fn book(&self, side: Side) -> &Book {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn book_mut(&mut self, side: Side) -> &mut Book {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Chronological trade tape: oldest trade first.
    pub fn tape(&self) -> impl Iterator<Item = &Trade> {
        self.tape.iter()
    }

    /// Most-recent-trade-first view of the tape (the original source's
    /// "0th position is the most recent trade" deque convention — see
    /// SPEC_FULL.md §10).
    pub fn tape_rev(&self) -> impl Iterator<Item = &Trade> {
        self.tape.iter().rev()
    }

    /// Submits a quote for matching. Dispatches on `(kind, side)` per spec
    /// §4.4 and returns the trades produced and, for a limit order with
    /// unfilled remainder, the quantity that came to rest on the book.
    ///
    /// Rejects invalid quotes (§7) before any mutation: the book is left
    /// untouched if this returns `Err`.
    ///
    /// In debug builds, re-checks both sides' cross-referencing invariants
    /// (spec §3/§8) after matching and returns
    /// `EngineError::InvariantViolation` if one is found, per §7's "assert
    /// and abort rather than continue" guidance — the check is skipped in
    /// release builds since it walks every price level.
    pub fn submit(&mut self, mut quote: Quote) -> EngineResult<(Vec<Trade>, Option<Decimal>)> {
        quote.validate().map_err(|e| {
            warn!(error = %e, order_id = %quote.order_id, "rejected invalid quote");
            e
        })?;

        if let Some(price) = quote.price {
            quote.price = Some(self.config.round_price(price));
        }

        debug!(
            order_id = %quote.order_id,
            side = ?quote.side,
            kind = ?quote.kind,
            quantity = %quote.quantity,
            "submitting quote"
        );

        let result = match quote.kind {
            OrderKind::Market => (self.market_order(quote.side, &quote), None),
            OrderKind::Limit => self.limit_order(quote.side, quote),
        };

        #[cfg(debug_assertions)]
        self.check_invariants()?;

        Ok(result)
    }

    /// Checks both sides' cross-referencing invariants (spec §3/§8): no
    /// empty price levels, order-index agreement between `order_map` and
    /// the price tree, and per-side volume conservation. Returns
    /// `EngineError::InvariantViolation` naming the inconsistency found,
    /// if any.
    pub fn check_invariants(&self) -> EngineResult<()> {
        self.bids
            .check_invariants()
            .map_err(EngineError::InvariantViolation)?;
        self.asks
            .check_invariants()
            .map_err(EngineError::InvariantViolation)?;
        Ok(())
    }

    /// Removes a resting order from whichever side holds it.
    pub fn cancel(&mut self, order_id: &OrderId) -> EngineResult<Order> {
        if let Some(order) = self.bids.remove_order_by_id(order_id) {
            return Ok(order);
        }
        if let Some(order) = self.asks.remove_order_by_id(order_id) {
            return Ok(order);
        }
        Err(EngineError::UnknownOrder(order_id.clone()))
    }

    /// Amends a resting order's price and/or quantity in place. A price
    /// change always loses time priority; a quantity-only change follows
    /// the upsize/downsize rule (see `PriceLevel::update_order_quantity`).
    pub fn amend(
        &mut self,
        order_id: &OrderId,
        new_price: Decimal,
        new_quantity: Decimal,
        new_timestamp: i64,
    ) -> EngineResult<()> {
        let new_price = self.config.round_price(new_price);
        if self.bids.has_order(order_id) {
            self.bids
                .update_order(order_id, new_price, new_quantity, new_timestamp);
            return Ok(());
        }
        if self.asks.has_order(order_id) {
            self.asks
                .update_order(order_id, new_price, new_quantity, new_timestamp);
            return Ok(());
        }
        Err(EngineError::UnknownOrder(order_id.clone()))
    }

    fn next_tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }

    /// Limit order matching: sweeps the opposing side while it crosses
    /// the incoming price, then rests any unfilled remainder at `price`
    /// on the incoming side.
    fn limit_order(&mut self, side: Side, quote: Quote) -> (Vec<Trade>, Option<Decimal>) {
        let opposite = side.opposite();
        let price = quote
            .price
            .expect("Quote::validate rejects a limit order without a price");
        let mut remaining = quote.quantity;
        let mut trades = Vec::new();

        loop {
            if remaining <= Decimal::ZERO {
                break;
            }
            let best_price = match side {
                Side::Bid => self.book(opposite).min_price(),
                Side::Ask => self.book(opposite).max_price(),
            };
            let Some(best_price) = best_price else {
                break;
            };
            let crosses = match side {
                Side::Bid => price > best_price,
                Side::Ask => price < best_price,
            };
            if !crosses {
                break;
            }

            let (new_remaining, new_trades) =
                self.process_orders(opposite, best_price, remaining, &quote);
            remaining = new_remaining;
            trades.extend(new_trades);
        }

        let resting = if remaining > Decimal::ZERO {
            let mut order = Order::from_quote(&quote, price);
            order.quantity = remaining;
            self.book_mut(side).insert_order(order);
            Some(remaining)
        } else {
            None
        };

        (trades, resting)
    }

    /// Market order matching: sweeps the opposing side with no price
    /// check until it is exhausted or the quote is filled. Never rests;
    /// an unfilled remainder is simply discarded (a partial fill).
    fn market_order(&mut self, side: Side, quote: &Quote) -> Vec<Trade> {
        let opposite = side.opposite();
        let mut remaining = quote.quantity;
        let mut trades = Vec::new();

        loop {
            if remaining <= Decimal::ZERO {
                break;
            }
            let best_price = match side {
                Side::Bid => self.book(opposite).min_price(),
                Side::Ask => self.book(opposite).max_price(),
            };
            let Some(best_price) = best_price else {
                break;
            };

            let (new_remaining, new_trades) =
                self.process_orders(opposite, best_price, remaining, quote);
            remaining = new_remaining;
            trades.extend(new_trades);
        }

        trades
    }

    /// Matches a group of orders at one price level against `remaining`
    /// incoming quantity. Consumes makers strictly in FIFO order, halting
    /// as soon as `remaining` or the level is exhausted — since the outer
    /// loop re-reads the best price afterwards, a level that empties
    /// mid-sweep is correctly dropped from consideration on the next
    /// iteration.
    fn process_orders(
        &mut self,
        maker_side: Side,
        price: Decimal,
        mut remaining: Decimal,
        quote: &Quote,
    ) -> (Decimal, Vec<Trade>) {
        let mut trades = Vec::new();

        loop {
            let level_len = self
                .book(maker_side)
                .price_list(price)
                .map(|level| level.len())
                .unwrap_or(0);
            if level_len == 0 || remaining <= Decimal::ZERO {
                break;
            }

            let maker = self
                .book(maker_side)
                .head_order(price)
                .expect("level_len > 0 guarantees a head order")
                .clone();
            let traded_price = maker.price;

            let traded_qty = if remaining < maker.quantity {
                let new_quantity = maker.quantity - remaining;
                // Pass the maker's existing timestamp: a partial fill is a
                // downsize, so it must not cost the maker its time priority.
                self.book_mut(maker_side).update_order(
                    &maker.order_id,
                    maker.price,
                    new_quantity,
                    maker.timestamp,
                );
                let traded = remaining;
                remaining = Decimal::ZERO;
                traded
            } else if remaining == maker.quantity {
                self.book_mut(maker_side).remove_order_by_id(&maker.order_id);
                let traded = remaining;
                remaining = Decimal::ZERO;
                traded
            } else {
                self.book_mut(maker_side).remove_order_by_id(&maker.order_id);
                remaining -= maker.quantity;
                maker.quantity
            };

            let timestamp = self.next_tick();
            let trade = Trade {
                timestamp,
                price: traded_price,
                quantity: traded_qty,
                maker_order_id: maker.order_id.clone(),
                maker_trade_id: maker.trade_id.clone(),
                taker_trade_id: quote.trade_id.clone(),
                maker_side,
            };
            trace!(
                maker_order_id = %trade.maker_order_id,
                price = %trade.price,
                quantity = %trade.quantity,
                "trade executed"
            );
            self.tape.push(trade.clone());
            trades.push(trade);
        }

        (remaining, trades)
    }
}
