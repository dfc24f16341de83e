//! Buttery-scoped caches for the menu and orders collections
//!
//! Each collection is cached independently under its own key and tagged with
//! the buttery filter it was fetched for.

use std::sync::Arc;

use super::progressive::{CacheMetadata, CacheStats, ProgressiveCache};
use super::storage::KeyValueStore;
use crate::client::models::{MenuItem, Order, OrderStatus};

/// Cache name for the menu collection
pub const MENU: &str = "menu";

/// Cache name for the orders collection
pub const ORDERS: &str = "orders";

/// Menu and order caches sharing one underlying store
pub struct ButteryCache<S> {
    inner: Arc<ProgressiveCache<S>>,
}

impl<S> Clone for ButteryCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> ButteryCache<S> {
    pub fn new(cache: ProgressiveCache<S>) -> Self {
        Self {
            inner: Arc::new(cache),
        }
    }

    /// The generic cache underneath
    pub fn inner(&self) -> &ProgressiveCache<S> {
        &self.inner
    }

    pub fn menu(&self, buttery: Option<&str>) -> Option<Vec<MenuItem>> {
        self.inner.get(MENU, buttery)
    }

    pub fn store_menu(&self, items: &[MenuItem], buttery: Option<&str>) {
        self.inner.set(MENU, &items, buttery);
    }

    pub fn orders(&self, buttery: Option<&str>) -> Option<Vec<Order>> {
        self.inner.get(ORDERS, buttery)
    }

    pub fn store_orders(&self, orders: &[Order], buttery: Option<&str>) {
        self.inner.set(ORDERS, &orders, buttery);
    }

    /// Patch one cached order's status in place. Returns whether the order was
    /// found in the cached collection.
    pub fn set_order_status(&self, order_id: &str, status: OrderStatus) -> bool {
        self.inner.update::<Vec<Order>, _>(ORDERS, |orders| {
            match orders.iter_mut().find(|o| o.id == order_id) {
                Some(order) => {
                    order.status = status;
                    true
                }
                None => false,
            }
        })
    }

    /// Swap in the server's copy of an order.
    ///
    /// Item names the server left out are carried over from the cached copy.
    pub fn replace_order(&self, mut order: Order) -> bool {
        self.inner.update::<Vec<Order>, _>(ORDERS, |orders| {
            let Some(cached) = orders.iter_mut().find(|o| o.id == order.id) else {
                return false;
            };
            for item in order.items.iter_mut().filter(|i| i.name.is_none()) {
                item.name = cached
                    .items
                    .iter()
                    .find(|c| c.menu_item_id == item.menu_item_id)
                    .and_then(|c| c.name.clone());
            }
            *cached = order;
            true
        })
    }

    /// Drop one item from the cached menu
    pub fn remove_menu_item(&self, item_id: &str) -> bool {
        self.inner.update::<Vec<MenuItem>, _>(MENU, |items| {
            let before = items.len();
            items.retain(|item| item.id != item_id);
            items.len() != before
        })
    }

    pub fn menu_metadata(&self) -> Option<CacheMetadata> {
        self.inner.metadata(MENU)
    }

    pub fn orders_metadata(&self) -> Option<CacheMetadata> {
        self.inner.metadata(ORDERS)
    }

    /// Forget everything cached for one buttery (or for the unfiltered view)
    pub fn clear_buttery(&self, buttery: Option<&str>) -> usize {
        self.inner.clear_scope(buttery)
    }

    pub fn clear_all(&self) -> usize {
        self.inner.clear_all()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}
