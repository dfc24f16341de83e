//! butteryop - client core for the campus buttery ordering service
//!
//! Two engines sit under the CLI:
//!
//! - [`sync::SyncManager`] applies changes locally at once and reconciles
//!   them with the backend in the background, retrying on a fixed schedule.
//! - [`cache::ProgressiveCache`] keeps last-known-good collections per
//!   buttery so views can render before the network answers.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod sync;
pub mod view;

pub use error::{Error, Result};
