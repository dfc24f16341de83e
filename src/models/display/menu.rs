//! Menu display model

use serde::Serialize;
use tabled::Tabled;

use super::common::or_empty;
use crate::client::models::MenuItem;
use crate::output::formatters::format_price;

/// Menu item display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MenuItemDisplay {
    #[tabled(rename = "ITEM ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "CATEGORY")]
    pub category: String,

    #[tabled(rename = "PRICE")]
    pub price: String,

    /// "yes" / "no"
    #[tabled(rename = "AVAILABLE")]
    pub available: String,

    #[tabled(rename = "BUTTERY")]
    pub buttery: String,
}

impl From<&MenuItem> for MenuItemDisplay {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: or_empty(item.category.as_deref()),
            price: format_price(item.price),
            available: if item.available { "yes" } else { "no" }.to_string(),
            buttery: or_empty(item.buttery.as_deref()),
        }
    }
}
