//! Buttery REST API client

use async_trait::async_trait;

use crate::error::Result;

pub mod buttery;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use buttery::ButteryClient;
#[cfg(test)]
pub use mock::MockButteryClient;
pub use models::{DeleteConfirmation, MenuItem, Order, OrderStatus, Role, User};

/// Buttery backend API.
///
/// Reads return collections optionally filtered by buttery; the caching
/// layer stores them verbatim. Mutations return the server's canonical
/// representation so optimistic local state can be reconciled.
#[async_trait]
pub trait ButteryApi: Send + Sync {
    /// Get the signed-in user and their role
    async fn current_user(&self) -> Result<User>;

    /// List menu items, optionally for a single buttery
    async fn list_menu_items(&self, buttery: Option<&str>) -> Result<Vec<MenuItem>>;

    /// List orders, optionally for a single buttery
    async fn list_orders(&self, buttery: Option<&str>) -> Result<Vec<Order>>;

    /// Set an order's status, returning the updated order
    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order>;

    /// Delete a menu item
    async fn delete_menu_item(&self, item_id: &str) -> Result<DeleteConfirmation>;
}
