//! Order display model

use serde::Serialize;
use tabled::Tabled;

use super::common::{EMPTY_CELL, or_empty, truncate_string};
use crate::client::models::Order;
use crate::output::formatters::{format_local, format_price};

/// Longest item summary shown in a table cell
const MAX_ITEMS_WIDTH: usize = 48;

/// Order display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct OrderDisplay {
    #[tabled(rename = "ORDER ID")]
    pub id: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Item lines, e.g. "2x Bagel (cream cheese), Chai"
    #[tabled(rename = "ITEMS")]
    pub items: String,

    #[tabled(rename = "TOTAL")]
    pub total: String,

    #[tabled(rename = "CUSTOMER")]
    pub customer: String,

    #[tabled(rename = "PLACED")]
    pub placed: String,
}

impl From<&Order> for OrderDisplay {
    fn from(order: &Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|line| {
                let mut text = if line.quantity > 1 {
                    format!("{}x {}", line.quantity, line.display_name())
                } else {
                    line.display_name().to_string()
                };
                if !line.modifiers.is_empty() {
                    text.push_str(&format!(" ({})", line.modifiers.join(", ")));
                }
                text
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: order.id.clone(),
            status: order.status.to_string(),
            items: truncate_string(&items, MAX_ITEMS_WIDTH),
            total: format_price(order.total_price),
            customer: or_empty(order.customer.as_deref()),
            placed: order
                .created_at
                .as_ref()
                .map(format_local)
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
        }
    }
}
