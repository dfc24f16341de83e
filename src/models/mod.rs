//! Display models for CLI output
//!
//! Converts API model types into table rows and JSON shapes for printing.

pub mod display;

pub use display::{MenuItemDisplay, OrderDisplay};
