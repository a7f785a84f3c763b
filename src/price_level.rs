//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the FIFO queue of resting orders at a single price,
// and the arena that backs its intrusive doubly-linked list.
//
// | Component     | Description                                                               |
// |---------------|----------------------------------------------------------------------------|
// | OrderArena    | Slot-allocated storage for one side's orders; handles replace pointers.   |
// | OrderHandle   | Non-owning, `Copy` index into an `OrderArena`.                            |
// | PriceLevel    | Doubly-linked FIFO queue of orders at one price, arrival order.           |
//
// Spec §9 recommends arena allocation with index-based prev/next over a
// pointer- or Rc/RefCell-based linked list, to make ownership obvious and
// avoid per-node heap churn. One `OrderArena` backs an entire `Book` side;
// each `PriceLevel` only stores `head`/`tail` handles into it, so moving an
// order between the free list and a price level's list is pure index
// bookkeeping — no allocation on the hot path.
//--------------------------------------------------------------------------------------------------

use rust_decimal::Decimal;

use crate::types::Order;

/// Non-owning handle to an order living in an `OrderArena`. Cheap to copy,
/// meaningless outside the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderHandle(usize);

/// Slot-allocated storage for the `Order`s resting on one side of the book.
///
/// Allocation and deallocation are O(1): a free list of reclaimed slot
/// indices is consulted before growing the backing `Vec`.
#[derive(Debug, Default)]
pub struct OrderArena {
    slots: Vec<Option<Order>>,
    free: Vec<usize>,
}

impl OrderArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an order and returns a handle to it. O(1) amortized.
    pub fn insert(&mut self, order: Order) -> OrderHandle {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(order);
            OrderHandle(index)
        } else {
            self.slots.push(Some(order));
            OrderHandle(self.slots.len() - 1)
        }
    }

    /// Removes and returns the order at `handle`. O(1).
    ///
    /// # Panics
    /// Panics if `handle` does not refer to a currently-occupied slot —
    /// a caller bug (double remove / dangling handle), not a recoverable
    /// error.
    pub fn take(&mut self, handle: OrderHandle) -> Order {
        let order = self.slots[handle.0]
            .take()
            .expect("OrderArena::take on an empty or already-removed slot");
        self.free.push(handle.0);
        order
    }

    pub fn get(&self, handle: OrderHandle) -> &Order {
        self.slots[handle.0]
            .as_ref()
            .expect("OrderArena::get on an empty slot")
    }

    pub fn get_mut(&mut self, handle: OrderHandle) -> &mut Order {
        self.slots[handle.0]
            .as_mut()
            .expect("OrderArena::get_mut on an empty slot")
    }
}

/// A FIFO queue of orders resting at one price, maintained as an intrusive
/// doubly-linked list threaded through the owning `Book`'s `OrderArena`.
///
/// Invariant: `length == 0 <=> head == tail == None`; `volume` is always
/// the sum of the quantities of the orders currently linked in.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    pub price: Decimal,
    head: Option<OrderHandle>,
    tail: Option<OrderHandle>,
    length: usize,
    volume: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            head: None,
            tail: None,
            length: 0,
            volume: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn volume(&self) -> Decimal {
        self.volume
    }

    pub fn head(&self) -> Option<OrderHandle> {
        self.head
    }

    /// Links `handle` at the tail of this level's list.
    ///
    /// # Panics (debug only)
    /// Appending an order that is already linked elsewhere is a caller
    /// bug, not a recoverable error — flagged via `debug_assert!` rather
    /// than silently corrupting the list.
    pub fn append(&mut self, arena: &mut OrderArena, handle: OrderHandle) {
        {
            let order = arena.get(handle);
            debug_assert!(
                order.prev.is_none() && order.next.is_none(),
                "append: order already linked in a list"
            );
        }
        let quantity = arena.get(handle).quantity;
        match self.tail {
            None => {
                self.head = Some(handle);
                self.tail = Some(handle);
            }
            Some(old_tail) => {
                arena.get_mut(old_tail).next = Some(handle);
                arena.get_mut(handle).prev = Some(old_tail);
                self.tail = Some(handle);
            }
        }
        self.length += 1;
        self.volume += quantity;
    }

    /// Unlinks `handle` from this level's list, splicing its neighbors
    /// together and fixing up head/tail as needed.
    ///
    /// # Panics (debug only)
    /// Removing from an empty list is a caller bug.
    pub fn remove(&mut self, arena: &mut OrderArena, handle: OrderHandle) {
        debug_assert!(self.length > 0, "remove: price level is empty");
        let (prev, next, quantity) = {
            let order = arena.get(handle);
            (order.prev, order.next, order.quantity)
        };

        match prev {
            Some(p) => arena.get_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena.get_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let order = arena.get_mut(handle);
        order.prev = None;
        order.next = None;

        self.length -= 1;
        self.volume -= quantity;
    }

    /// Detaches `handle` in place and re-appends it at the tail, without
    /// touching `length`. Used by `Order::update_quantity` (via the owning
    /// `Book`) when an amendment upsizes the order's quantity, which loses
    /// it time priority.
    pub fn move_to_tail(&mut self, arena: &mut OrderArena, handle: OrderHandle) {
        if self.tail == Some(handle) {
            return;
        }
        let (prev, next) = {
            let order = arena.get(handle);
            (order.prev, order.next)
        };

        match prev {
            Some(p) => arena.get_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena.get_mut(n).prev = prev,
            None => {} // handle was not the tail, so there is always a next
        }

        let old_tail = self.tail.expect("move_to_tail: non-empty level has a tail");
        arena.get_mut(old_tail).next = Some(handle);
        arena.get_mut(handle).prev = Some(old_tail);
        arena.get_mut(handle).next = None;
        self.tail = Some(handle);
    }

    /// Adjusts the cached `volume` by a signed delta, without touching the
    /// list shape. Called once per amend by the owning `Book` after it has
    /// applied the new quantity to the order itself.
    pub fn adjust_volume(&mut self, delta: Decimal) {
        self.volume += delta;
    }

    /// Implements an order's quantity-update contract: an upsize that does
    /// not already sit at the tail loses time priority (moves to tail); a
    /// downsize (or an upsize already at the tail) keeps position. Returns
    /// the signed quantity delta (`new - old`) so the caller (the owning
    /// `Book`) can apply the same delta to its own volume tracking exactly
    /// once, avoiding a double-counting bug where both the level and the
    /// book independently re-derive the delta.
    pub fn update_order_quantity(
        &mut self,
        arena: &mut OrderArena,
        handle: OrderHandle,
        new_quantity: Decimal,
        new_timestamp: i64,
    ) -> Decimal {
        let old_quantity = arena.get(handle).quantity;
        if new_quantity > old_quantity && self.tail != Some(handle) {
            self.move_to_tail(arena, handle);
        }
        let delta = new_quantity - old_quantity;
        self.adjust_volume(delta);
        let order = arena.get_mut(handle);
        order.quantity = new_quantity;
        order.timestamp = new_timestamp;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{OrderId, TradeId};
    use crate::types::{OrderKind, Side};
    use rust_decimal_macros::dec;

    fn order(id: &str, qty: Decimal) -> Order {
        Order {
            order_id: OrderId::new(id),
            trade_id: TradeId::new("t"),
            side: Side::Bid,
            kind: OrderKind::Limit,
            price: dec!(100),
            quantity: qty,
            timestamp: 0,
            prev: None,
            next: None,
        }
    }

    #[test]
    fn append_and_fifo_head() {
        let mut arena = OrderArena::new();
        let mut level = PriceLevel::new(dec!(100));

        let a = arena.insert(order("a", dec!(5)));
        let b = arena.insert(order("b", dec!(3)));
        level.append(&mut arena, a);
        level.append(&mut arena, b);

        assert_eq!(level.len(), 2);
        assert_eq!(level.volume(), dec!(8));
        assert_eq!(level.head(), Some(a));
        assert_eq!(arena.get(arena.get(a).next.unwrap()).order_id, OrderId::new("b"));
    }

    #[test]
    fn remove_middle_relinks_neighbors() {
        let mut arena = OrderArena::new();
        let mut level = PriceLevel::new(dec!(100));
        let a = arena.insert(order("a", dec!(1)));
        let b = arena.insert(order("b", dec!(1)));
        let c = arena.insert(order("c", dec!(1)));
        level.append(&mut arena, a);
        level.append(&mut arena, b);
        level.append(&mut arena, c);

        level.remove(&mut arena, b);

        assert_eq!(level.len(), 2);
        assert_eq!(level.volume(), dec!(2));
        assert_eq!(arena.get(a).next, Some(c));
        assert_eq!(arena.get(c).prev, Some(a));
    }

    #[test]
    fn remove_head_and_tail_updates_endpoints() {
        let mut arena = OrderArena::new();
        let mut level = PriceLevel::new(dec!(100));
        let a = arena.insert(order("a", dec!(1)));
        let b = arena.insert(order("b", dec!(1)));
        level.append(&mut arena, a);
        level.append(&mut arena, b);

        level.remove(&mut arena, a);
        assert_eq!(level.head(), Some(b));

        level.remove(&mut arena, b);
        assert!(level.is_empty());
        assert_eq!(level.head(), None);
    }

    #[test]
    fn move_to_tail_loses_priority() {
        let mut arena = OrderArena::new();
        let mut level = PriceLevel::new(dec!(100));
        let a = arena.insert(order("a", dec!(1)));
        let b = arena.insert(order("b", dec!(1)));
        let c = arena.insert(order("c", dec!(1)));
        level.append(&mut arena, a);
        level.append(&mut arena, b);
        level.append(&mut arena, c);

        level.move_to_tail(&mut arena, a);

        assert_eq!(level.head(), Some(b));
        assert_eq!(arena.get(b).prev, None);
        assert_eq!(arena.get(c).next, Some(a));
        assert_eq!(arena.get(a).prev, Some(c));
        assert_eq!(arena.get(a).next, None);
        assert_eq!(level.len(), 3);
    }

    #[test]
    fn upsize_not_already_tail_loses_priority() {
        let mut arena = OrderArena::new();
        let mut level = PriceLevel::new(dec!(100));
        let a = arena.insert(order("a", dec!(5)));
        let b = arena.insert(order("b", dec!(5)));
        level.append(&mut arena, a);
        level.append(&mut arena, b);

        let delta = level.update_order_quantity(&mut arena, a, dec!(7), 42);

        assert_eq!(delta, dec!(2));
        assert_eq!(level.head(), Some(b));
        assert_eq!(arena.get(a).quantity, dec!(7));
        assert_eq!(arena.get(a).timestamp, 42);
        assert_eq!(level.volume(), dec!(12));
    }

    #[test]
    fn downsize_keeps_priority() {
        let mut arena = OrderArena::new();
        let mut level = PriceLevel::new(dec!(100));
        let a = arena.insert(order("a", dec!(5)));
        let b = arena.insert(order("b", dec!(5)));
        level.append(&mut arena, a);
        level.append(&mut arena, b);

        let delta = level.update_order_quantity(&mut arena, a, dec!(3), 7);

        assert_eq!(delta, dec!(-2));
        assert_eq!(level.head(), Some(a));
        assert_eq!(arena.get(a).quantity, dec!(3));
        assert_eq!(level.volume(), dec!(8));
    }

    #[test]
    fn move_to_tail_noop_when_already_tail() {
        let mut arena = OrderArena::new();
        let mut level = PriceLevel::new(dec!(100));
        let a = arena.insert(order("a", dec!(1)));
        let b = arena.insert(order("b", dec!(1)));
        level.append(&mut arena, a);
        level.append(&mut arena, b);

        level.move_to_tail(&mut arena, b);

        assert_eq!(level.head(), Some(a));
        assert_eq!(arena.get(a).next, Some(b));
    }
}
