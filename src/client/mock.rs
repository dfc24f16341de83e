//! Mock buttery API client for testing
//!
//! Provides a mock implementation of [`ButteryApi`] for unit testing
//! without making real API calls.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::ButteryApi;
use super::models::{DeleteConfirmation, MenuItem, Order, OrderStatus, Role, User};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockButteryClient::new()
///     .with_orders(vec![order])
///     .await
///     .failing("update_order_status", 2)
///     .await;
/// ```
#[derive(Clone)]
pub struct MockButteryClient {
    /// Menu items returned from list_menu_items (filtered by buttery)
    menu: Arc<Mutex<Vec<MenuItem>>>,
    /// Orders returned from list_orders (filtered by buttery)
    orders: Arc<Mutex<Vec<Order>>>,
    /// User returned from current_user
    user: Arc<Mutex<User>>,
    /// One-shot error returned by the next call of any operation
    error: Arc<Mutex<Option<ApiError>>>,
    /// Remaining simulated network failures per operation
    failures: Arc<Mutex<HashMap<&'static str, usize>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Default for MockButteryClient {
    fn default() -> Self {
        Self {
            menu: Arc::new(Mutex::new(Vec::new())),
            orders: Arc::new(Mutex::new(Vec::new())),
            user: Arc::new(Mutex::new(User {
                netid: "mock123".to_string(),
                name: Some("Mock Staff".to_string()),
                role: Role::Staff,
            })),
            error: Arc::new(Mutex::new(None)),
            failures: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub current_user: usize,
    pub list_menu_items: usize,
    pub list_orders: usize,
    pub update_order_status: usize,
    pub delete_menu_item: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.current_user
            + self.list_menu_items
            + self.list_orders
            + self.update_order_status
            + self.delete_menu_item
    }
}

/// A captured API request for test assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// The API method called (e.g., "list_orders")
    pub method: String,
    /// Buttery filter if provided
    pub buttery: Option<String>,
}

impl MockButteryClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure menu items to return from list_menu_items.
    pub async fn with_menu(self, menu: Vec<MenuItem>) -> Self {
        *self.menu.lock().await = menu;
        self
    }

    /// Configure orders to return from list_orders.
    pub async fn with_orders(self, orders: Vec<Order>) -> Self {
        *self.orders.lock().await = orders;
        self
    }

    /// Configure the user returned from current_user.
    pub async fn with_role(self, role: Role) -> Self {
        self.user.lock().await.role = role;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Make the next `count` calls of `method` fail with a network error.
    pub async fn failing(self, method: &'static str, count: usize) -> Self {
        self.failures.lock().await.insert(method, count);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured requests for test assertions.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.captured_requests.lock().await.clone()
    }

    /// Current server-side orders (reflects successful mutations).
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.lock().await.clone()
    }

    /// Record a call, then return any configured error for it.
    async fn check_error(&self, method: &'static str, buttery: Option<&str>) -> Result<()> {
        self.captured_requests.lock().await.push(CapturedRequest {
            method: method.to_string(),
            buttery: buttery.map(|s| s.to_string()),
        });

        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }

        let mut failures = self.failures.lock().await;
        if let Some(remaining) = failures.get_mut(method) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ApiError::Network(format!("simulated failure in {}", method)).into());
            }
        }

        Ok(())
    }
}

fn matches_buttery(item_buttery: Option<&String>, filter: Option<&str>) -> bool {
    match filter {
        Some(b) => item_buttery.map(|s| s.as_str()) == Some(b),
        None => true,
    }
}

#[async_trait]
impl ButteryApi for MockButteryClient {
    async fn current_user(&self) -> Result<User> {
        self.call_count.lock().await.current_user += 1;
        self.check_error("current_user", None).await?;

        Ok(self.user.lock().await.clone())
    }

    async fn list_menu_items(&self, buttery: Option<&str>) -> Result<Vec<MenuItem>> {
        self.call_count.lock().await.list_menu_items += 1;
        self.check_error("list_menu_items", buttery).await?;

        let menu = self.menu.lock().await;
        Ok(menu
            .iter()
            .filter(|item| matches_buttery(item.buttery.as_ref(), buttery))
            .cloned()
            .collect())
    }

    async fn list_orders(&self, buttery: Option<&str>) -> Result<Vec<Order>> {
        self.call_count.lock().await.list_orders += 1;
        self.check_error("list_orders", buttery).await?;

        let orders = self.orders.lock().await;
        Ok(orders
            .iter()
            .filter(|order| matches_buttery(order.buttery.as_ref(), buttery))
            .cloned()
            .collect())
    }

    async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> Result<Order> {
        self.call_count.lock().await.update_order_status += 1;
        self.check_error("update_order_status", None).await?;

        let mut orders = self.orders.lock().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| ApiError::NotFound(format!("Order {} not found", order_id)))?;
        order.status = status;
        // The backend never echoes denormalized names.
        let mut updated = order.clone();
        for item in &mut updated.items {
            item.name = None;
        }
        Ok(updated)
    }

    async fn delete_menu_item(&self, item_id: &str) -> Result<DeleteConfirmation> {
        self.call_count.lock().await.delete_menu_item += 1;
        self.check_error("delete_menu_item", None).await?;

        let mut menu = self.menu.lock().await;
        let before = menu.len();
        menu.retain(|item| item.id != item_id);
        if menu.len() == before {
            return Err(ApiError::NotFound(format!("Menu item {} not found", item_id)).into());
        }

        Ok(DeleteConfirmation {
            id: item_id.to_string(),
            deleted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::OrderItem;

    fn order(id: &str, buttery: &str) -> Order {
        Order {
            id: id.to_string(),
            status: OrderStatus::Pending,
            buttery: Some(buttery.to_string()),
            customer: None,
            items: vec![OrderItem {
                menu_item_id: "m1".to_string(),
                quantity: 1,
                name: Some("Bagel".to_string()),
                modifiers: vec![],
            }],
            total_price: 250,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_mock_filters_orders_by_buttery() {
        let mock = MockButteryClient::new()
            .with_orders(vec![order("o1", "North"), order("o2", "South")])
            .await;

        let north = mock.list_orders(Some("North")).await.unwrap();
        assert_eq!(north.len(), 1);
        assert_eq!(north[0].id, "o1");

        let all = mock.list_orders(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let requests = mock.captured_requests().await;
        assert_eq!(requests[0].buttery.as_deref(), Some("North"));
        assert!(requests[1].buttery.is_none());
    }

    #[tokio::test]
    async fn test_mock_scripted_failures_then_success() {
        let mock = MockButteryClient::new()
            .with_orders(vec![order("o1", "North")])
            .await
            .failing("update_order_status", 2)
            .await;

        assert!(mock.update_order_status("o1", OrderStatus::Ready).await.is_err());
        assert!(mock.update_order_status("o1", OrderStatus::Ready).await.is_err());

        let updated = mock
            .update_order_status("o1", OrderStatus::Ready)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Ready);
        assert!(updated.items[0].name.is_none());
        assert_eq!(mock.call_counts().await.update_order_status, 3);
    }

    #[tokio::test]
    async fn test_mock_one_shot_error() {
        let mock = MockButteryClient::new()
            .with_error(ApiError::Forbidden)
            .await;

        assert!(mock.current_user().await.is_err());
        assert!(mock.current_user().await.is_ok());
        assert_eq!(mock.call_counts().await.total(), 2);
    }

    #[tokio::test]
    async fn test_mock_delete_not_found() {
        let mock = MockButteryClient::new();
        let result = mock.delete_menu_item("nonexistent").await;
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
