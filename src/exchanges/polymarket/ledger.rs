//! Order ledger - in-memory order lifecycle for dry-run trading

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::core::{ExchangeName, Order, OrderStatus, SubmitOrder};

/// Storage seam for order state.
///
/// The facade serializes every call, so implementations take `&mut self`
/// and need no locking of their own.
pub trait OrderStore: Send {
    /// Record a new working order and return a copy of it
    fn submit(&mut self, order: SubmitOrder) -> Order;

    /// Working orders, filtered by symbol when `symbol` is non-empty
    fn list_open(&self, symbol: Option<&str>) -> Vec<Order>;

    /// Cancel the given ids; unknown ids are ignored
    fn cancel(&mut self, order_ids: &[u64]);

    fn get(&self, order_id: u64) -> Option<Order>;
}

/// Volatile ledger. Orders are never removed, only moved to `Canceled`.
#[derive(Debug)]
pub struct OrderLedger {
    next_order_id: u64,
    orders: HashMap<u64, Order>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self {
            // ids start at 1
            next_order_id: 1,
            orders: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore for OrderLedger {
    fn submit(&mut self, order: SubmitOrder) -> Order {
        let now = Utc::now();
        let order_id = self.next_order_id;
        self.next_order_id += 1;

        let created = Order {
            submit: order,
            exchange: ExchangeName::Polymarket,
            order_id,
            status: OrderStatus::New,
            original_status: OrderStatus::New.as_str().to_string(),
            is_working: OrderStatus::New.is_working(),
            executed_quantity: Decimal::ZERO,
            creation_time: now,
            update_time: now,
        };

        self.orders.insert(order_id, created.clone());
        created
    }

    fn list_open(&self, symbol: Option<&str>) -> Vec<Order> {
        let symbol = symbol.filter(|s| !s.is_empty());
        self.orders
            .values()
            .filter(|o| o.is_working)
            .filter(|o| symbol.is_none_or(|s| o.symbol().as_str() == s))
            .cloned()
            .collect()
    }

    fn cancel(&mut self, order_ids: &[u64]) {
        let now = Utc::now();
        for id in order_ids {
            match self.orders.get_mut(id) {
                Some(existing) => {
                    existing.status = OrderStatus::Canceled;
                    existing.original_status = OrderStatus::Canceled.as_str().to_string();
                    existing.is_working = existing.status.is_working();
                    existing.update_time = now;
                    debug!(order_id = id, "Order canceled");
                }
                None => warn!(order_id = id, "Cancel ignored: unknown order id"),
            }
        }
    }

    fn get(&self, order_id: u64) -> Option<Order> {
        self.orders.get(&order_id).cloned()
    }
}
