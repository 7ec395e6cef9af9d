use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::errors::OrderBookError;
use crate::order::Order;
use crate::status::OrderStatus;

/// A FIFO ordered queue of resting orders at one exact price.
///
/// Backed by an [`indexmap::IndexMap`] keyed by `order_id`, which preserves
/// insertion order and gives O(1)-average lookup by id (`shift_remove` is
/// O(n) in the level's order count — bounded in practice by how many
/// resting orders share one price — rather than the O(1) an intrusive
/// linked list would give; see DESIGN.md).
///
/// Invariants: every order stored has `price == level.price`; `count` is
/// the map's length; `size` is the sum of `leaves_qty`.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Decimal,
    orders: IndexMap<String, Order>,
    total_quantity: u64,
}

impl PriceLevel {
    pub fn new(price: Decimal) -> Self {
        PriceLevel {
            price,
            orders: IndexMap::new(),
            total_quantity: 0,
        }
    }

    pub fn level_price(&self) -> Decimal {
        self.price
    }

    pub fn count(&self) -> usize {
        self.orders.len()
    }

    pub fn size(&self) -> u64 {
        self.total_quantity
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Order> {
        self.orders.get_index(idx).map(|(_, order)| order)
    }

    pub fn get_by_id(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    fn verify_price(&self, order: &Order) -> Result<(), OrderBookError> {
        if order.price != self.price {
            return Err(OrderBookError::PriceMismatch {
                order_id: order.order_id.clone(),
                expected: self.price,
                got: order.price,
            });
        }
        Ok(())
    }

    /// Appends `order` to the back of the queue. Returns its 0-based index.
    pub fn push_order(&mut self, order: Order) -> Result<usize, OrderBookError> {
        self.verify_price(&order)?;
        if self.orders.contains_key(&order.order_id) {
            return Err(OrderBookError::DuplicateOrder {
                order_id: order.order_id.clone(),
            });
        }
        self.total_quantity += order.leaves_qty;
        let order_id = order.order_id.clone();
        self.orders.insert(order_id, order);
        Ok(self.orders.len() - 1)
    }

    /// Replaces the order matching `new_order.order_id` in place, provided
    /// its `leaves_qty` did not increase (size-down keeps priority). A
    /// size-increase is refused — the caller must cancel and repost.
    ///
    /// Returns `Ok(None)` if the level is already empty (matches the
    /// source's `-1` sentinel for that case); errors if the id is absent
    /// from a non-empty level.
    pub fn modify_order(&mut self, new_order: Order) -> Result<Option<usize>, OrderBookError> {
        if self.is_empty() {
            return Ok(None);
        }
        self.verify_price(&new_order)?;

        let idx = self.orders.get_index_of(&new_order.order_id).ok_or_else(|| {
            OrderBookError::NotFound {
                order_id: new_order.order_id.clone(),
            }
        })?;

        let old_leaves = self.orders[idx].leaves_qty;
        if new_order.leaves_qty > old_leaves {
            return Err(OrderBookError::ModifyWouldIncreasePriority {
                order_id: new_order.order_id,
            });
        }

        self.total_quantity = self.total_quantity - old_leaves + new_order.leaves_qty;
        let order_id = new_order.order_id.clone();
        self.orders.insert(order_id, new_order); // existing key: value replaced, position kept
        Ok(Some(idx))
    }

    /// Removes and returns the order with matching price and id.
    pub fn remove_order(&mut self, order: &Order) -> Result<Order, OrderBookError> {
        self.verify_price(order)?;
        self.remove_order_by_id(&order.order_id)
    }

    pub fn remove_order_by_id(&mut self, order_id: &str) -> Result<Order, OrderBookError> {
        let (_, order) = self
            .orders
            .shift_remove_full(order_id)
            .map(|(idx, _, order)| (idx, order))
            .ok_or_else(|| OrderBookError::NotFound {
                order_id: order_id.to_string(),
            })?;
        self.total_quantity -= order.leaves_qty;
        Ok(order)
    }

    /// The matching primitive: walks the FIFO from the head, subtracting
    /// each order's `leaves_qty` from `volume` until it is exhausted or the
    /// queue empties.
    ///
    /// Fully consumed orders are removed and reported with `leaves_qty ==
    /// 0`; if the last order consumed only partially absorbs the demand it
    /// stays resident with its `leaves_qty` reduced, and a snapshot of it
    /// is included in the returned list alongside the qty actually taken
    /// from it in this call. Returns `(remaining, consumed)` where
    /// `remaining = max(0, volume - size_before)`.
    pub fn trade_volume(&mut self, volume: u64) -> (u64, Vec<(Order, u64)>) {
        let mut remaining = volume;
        let mut consumed = Vec::new();

        while remaining > 0 {
            let Some((_, front)) = self.orders.get_index(0) else {
                break;
            };

            if front.leaves_qty > remaining {
                let id = front.order_id.clone();
                let taken = remaining;
                let order = self.orders.get_mut(&id).expect("front exists");
                order.leaves_qty -= taken;
                order.cum_qty += taken;
                order.ord_status = order.ord_status.migrate(OrderStatus::PartiallyFilled).unwrap_or(order.ord_status);
                self.total_quantity -= taken;
                consumed.push((order.clone(), taken));
                remaining = 0;
            } else {
                let taken = front.leaves_qty;
                remaining -= taken;
                let (_, mut order) = self.orders.shift_remove_index(0).expect("front exists");
                self.total_quantity -= order.leaves_qty;
                order.cum_qty += order.leaves_qty;
                order.leaves_qty = 0;
                order.ord_status = order.ord_status.migrate(OrderStatus::Filled).unwrap_or(order.ord_status);
                consumed.push((order, taken));
            }
        }

        (remaining, consumed)
    }
}
