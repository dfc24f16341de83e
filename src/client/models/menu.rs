//! Menu models

use serde::{Deserialize, Serialize};

/// A menu item offered by a buttery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Menu item ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Price in cents
    pub price: i64,

    /// Menu category (e.g. "Snacks", "Drinks")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Buttery this item belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttery: Option<String>,

    /// Whether the item can currently be ordered
    #[serde(default = "default_available")]
    pub available: bool,

    /// Optional add-ons for this item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

fn default_available() -> bool {
    true
}

/// A priced add-on for a menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    /// Modifier ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Price adjustment in cents
    #[serde(default)]
    pub price_delta: i64,
}

/// Server confirmation for a menu item deletion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// ID of the deleted item
    pub id: String,

    /// Whether the server removed the item
    #[serde(default)]
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_defaults() {
        let json = r#"{"id": "m1", "name": "Grilled Cheese", "price": 450}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();

        assert!(item.available);
        assert!(item.modifiers.is_empty());
        assert!(item.buttery.is_none());
    }

    #[test]
    fn test_menu_item_camel_case_modifiers() {
        let json = r#"{
            "id": "m2",
            "name": "Quesadilla",
            "price": 500,
            "buttery": "North",
            "available": false,
            "modifiers": [{"id": "x1", "name": "Extra cheese", "priceDelta": 75}]
        }"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();

        assert!(!item.available);
        assert_eq!(item.buttery.as_deref(), Some("North"));
        assert_eq!(item.modifiers[0].price_delta, 75);
    }
}
