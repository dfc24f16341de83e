//! Reusable command handler patterns
//!
//! - [`ListPrinter`]: renders a progressively loaded collection
//! - [`run_optimistic`]: applies a change locally, then waits for the sync

mod list;
mod sync;

pub use list::{ListPrinter, cached_age};
pub use sync::{SyncOutcome, run_optimistic};
