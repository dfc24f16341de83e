//! Buttery API data models
//!
//! Domain types returned by the buttery REST backend, organized by resource.

mod menu;
mod order;
mod user;

pub use menu::{DeleteConfirmation, MenuItem, Modifier};
pub use order::{Order, OrderItem, OrderStatus, UNKNOWN_ITEM_NAME, join_item_names};
pub use user::{Role, User};
