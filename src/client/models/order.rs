//! Order models

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MenuItem;

/// Name shown for order lines whose menu item is no longer on the menu
pub const UNKNOWN_ITEM_NAME: &str = "Unknown item";

/// Order lifecycle status.
///
/// Staff may request any status from any other; the client does not enforce
/// a transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid order status '{}'. Expected one of: pending, preparing, ready, completed, cancelled",
                    s
                )
            })
    }
}

/// An order placed at a buttery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID
    pub id: String,

    /// Current status
    pub status: OrderStatus,

    /// Buttery the order was placed at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttery: Option<String>,

    /// NetID of the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Ordered lines
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Total in cents, fixed when the order was placed
    pub total_price: i64,

    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A single line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Referenced menu item
    pub menu_item_id: String,

    /// Quantity ordered
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Item name, filled in client-side from the menu
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Names of selected modifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

fn default_quantity() -> u32 {
    1
}

impl OrderItem {
    /// Name to show for this line.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_ITEM_NAME)
    }
}

/// Fill in `OrderItem::name` for every line from the current menu.
///
/// The backend only guarantees `menu_item_id`; lines whose item is missing
/// from `menu` keep whatever name they already had.
pub fn join_item_names(orders: &mut [Order], menu: &[MenuItem]) {
    let names: HashMap<&str, &str> = menu
        .iter()
        .map(|item| (item.id.as_str(), item.name.as_str()))
        .collect();

    for item in orders.iter_mut().flat_map(|order| order.items.iter_mut()) {
        if let Some(name) = names.get(item.menu_item_id.as_str()) {
            item.name = Some((*name).to_string());
        }
    }
}
