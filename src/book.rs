//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements one side (bids or asks) of the order book: an
// ordered map from price to `PriceLevel` for O(log P) best-price access,
// plus a direct order-id index for O(1) cancel/amend.
//
// | Component    | Description                                                                |
// |--------------|------------------------------------------------------------------------------|
// | Book         | One side's price tree, order-id index, and aggregate counters.            |
//
// | Method              | Complexity  | Description                                           |
// |---------------------|-------------|--------------------------------------------------------|
// | insert_order         | O(log P)    | Idempotent on order_id; replaces an existing order.    |
// | update_order         | O(log P)    | In-place amend; delegates to PriceLevel on same price. |
// | remove_order_by_id   | O(log P)    | Splice out of its PriceLevel, drop empty levels.       |
// | best_price/_list     | O(log P)    | Extremum lookup (min for asks, max for bids).          |
//--------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;
use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::ids::OrderId;
use crate::price_level::{OrderArena, OrderHandle, PriceLevel};
use crate::types::Order;

/// One side of the order book: bids, or asks.
///
/// Invariants:
/// - every price in `price_map`/`order_map`'s price lookups is present in
///   the `price_tree` and vice versa (here, `price_tree` *is* the index,
///   so this holds by construction);
/// - a `PriceLevel` with `length == 0` is never reachable — created lazily
///   on first order, removed eagerly when its last order leaves;
/// - `order_map[id]`'s order is always linked into
///   `price_tree[order.price]`.
#[derive(Debug, Default)]
pub struct Book {
    price_tree: BTreeMap<Decimal, PriceLevel>,
    order_map: HashMap<OrderId, OrderHandle>,
    arena: OrderArena,
    volume: Decimal,
}

impl Book {
    pub fn new() -> Self {
        Self {
            price_tree: BTreeMap::new(),
            order_map: HashMap::new(),
            arena: OrderArena::new(),
            volume: Decimal::ZERO,
        }
    }

    /// Number of distinct price levels on this side.
    pub fn depth(&self) -> usize {
        self.price_tree.len()
    }

    /// Sum of the quantities of every resting order on this side.
    pub fn volume(&self) -> Decimal {
        self.volume
    }

    /// Total number of resting orders on this side.
    pub fn num_orders(&self) -> usize {
        self.order_map.len()
    }

    /// Alias for `num_orders`, matching the original source's `len(book)`.
    pub fn len(&self) -> usize {
        self.num_orders()
    }

    pub fn is_empty(&self) -> bool {
        self.order_map.is_empty()
    }

    pub fn has_order(&self, order_id: &OrderId) -> bool {
        self.order_map.contains_key(order_id)
    }

    pub fn has_price(&self, price: Decimal) -> bool {
        self.price_tree.contains_key(&price)
    }

    pub fn min_price(&self) -> Option<Decimal> {
        self.price_tree.keys().next().copied()
    }

    pub fn max_price(&self) -> Option<Decimal> {
        self.price_tree.keys().next_back().copied()
    }

    pub fn min_price_list(&self) -> Option<&PriceLevel> {
        self.price_tree.values().next()
    }

    pub fn max_price_list(&self) -> Option<&PriceLevel> {
        self.price_tree.values().next_back()
    }

    pub fn price_list(&self, price: Decimal) -> Option<&PriceLevel> {
        self.price_tree.get(&price)
    }

    /// All occupied price levels on this side, ordered from best to worst
    /// for neither side in particular (ascending price) — callers that
    /// want a bid ladder should `.rev()` it.
    pub fn price_levels(&self) -> impl Iterator<Item = &PriceLevel> {
        self.price_tree.values()
    }

    /// Order data for `order_id`, if it is resting on this side.
    pub fn get_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.order_map
            .get(order_id)
            .map(|&handle| self.arena.get(handle))
    }

    /// Returns the order currently at the head of the price level
    /// addressed by `price` — the next order matching would consume.
    pub fn head_order(&self, price: Decimal) -> Option<&Order> {
        let level = self.price_tree.get(&price)?;
        let handle = level.head()?;
        Some(self.arena.get(handle))
    }

    /// Inserts `order` into the book, idempotent on `order_id`: an
    /// existing order under the same id is removed first, so repeated
    /// inserts behave as cancel-then-insert rather than an error.
    pub fn insert_order(&mut self, order: Order) {
        if self.order_map.contains_key(&order.order_id) {
            self.remove_order_by_id(&order.order_id);
        }

        let price = order.price;
        let quantity = order.quantity;
        let order_id = order.order_id.clone();

        let level = self
            .price_tree
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price));
        let handle = self.arena.insert(order);
        level.append(&mut self.arena, handle);

        self.order_map.insert(order_id, handle);
        self.volume += quantity;
    }

    /// Amends a resting order in place.
    ///
    /// Same price: delegates to `PriceLevel::update_order_quantity`
    /// (upsize loses time priority, downsize keeps it) and adjusts the
    /// book's own volume tracking by the same signed delta exactly once.
    /// Different price: always loses time priority — removed from its
    /// current level and re-inserted fresh at the new price.
    ///
    /// Returns `false` if `order_id` is not resting on this side.
    pub fn update_order(&mut self, order_id: &OrderId, new_price: Decimal, new_quantity: Decimal, new_timestamp: i64) -> bool {
        let Some(&handle) = self.order_map.get(order_id) else {
            return false;
        };
        let current_price = self.arena.get(handle).price;

        if new_price == current_price {
            let level = self
                .price_tree
                .get_mut(&current_price)
                .expect("order_map handle references a price absent from price_tree");
            let delta = level.update_order_quantity(&mut self.arena, handle, new_quantity, new_timestamp);
            self.volume += delta;
        } else {
            let mut order = self.remove_order_by_id(order_id).expect("checked above");
            order.price = new_price;
            order.quantity = new_quantity;
            order.timestamp = new_timestamp;
            self.insert_order(order);
        }
        true
    }

    /// Removes the resting order with `order_id`, dropping its price
    /// level if it becomes empty. O(log P).
    pub fn remove_order_by_id(&mut self, order_id: &OrderId) -> Option<Order> {
        let handle = self.order_map.remove(order_id)?;
        let price = self.arena.get(handle).price;

        let level = self
            .price_tree
            .get_mut(&price)
            .expect("order_map handle references a price absent from price_tree");
        level.remove(&mut self.arena, handle);
        let now_empty = level.is_empty();
        if now_empty {
            self.price_tree.remove(&price);
        }

        let order = self.arena.take(handle);
        self.volume -= order.quantity;
        Some(order)
    }

    /// Checks this side's cross-referencing invariants from spec §3: every
    /// order in `order_map` is linked into the price level its own `price`
    /// names, no empty `PriceLevel` is reachable from the tree, each
    /// level's traversal length agrees with its cached `length`, and the
    /// book's tracked `volume` agrees with the sum of its levels' volumes.
    ///
    /// Walks every level, so it is only ever invoked from debug builds
    /// (see `OrderBook::submit`) rather than unconditionally on the hot
    /// path.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut total_volume = Decimal::ZERO;
        for (price, level) in &self.price_tree {
            if level.is_empty() {
                return Err(format!("empty price level retained at price {price}"));
            }
            total_volume += level.volume();

            let mut seen = 0usize;
            let mut cursor = level.head();
            while let Some(handle) = cursor {
                let order = self.arena.get(handle);
                if order.price != *price {
                    return Err(format!(
                        "order {} linked at price {price} but order.price is {}",
                        order.order_id, order.price
                    ));
                }
                seen += 1;
                cursor = order.next;
            }
            if seen != level.len() {
                return Err(format!(
                    "price level {price} reports length {} but traversal found {seen}",
                    level.len()
                ));
            }
        }
        if total_volume != self.volume {
            return Err(format!(
                "book volume {} disagrees with summed level volume {total_volume}",
                self.volume
            ));
        }

        for (id, &handle) in &self.order_map {
            let order = self.arena.get(handle);
            if !self.price_tree.contains_key(&order.price) {
                return Err(format!(
                    "order {id} references price {} absent from the price tree",
                    order.price
                ));
            }
        }
        Ok(())
    }
}
