//! Order commands

use std::sync::Arc;

use colored::Colorize;

use crate::cli::handlers::{ListPrinter, SyncOutcome, cached_age, run_optimistic};
use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::{ButteryApi, Order, OrderStatus, Role};
use crate::error::Result;
use crate::models::OrderDisplay;
use crate::output::{self, DataSource};

/// List orders with item names, cached first
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let buttery = ctx.buttery();

    let age = cached_age(ctx.cache().orders_metadata(), buttery);
    let mut printer = ListPrinter::<Order, OrderDisplay>::new(ctx.format, "orders", age);

    let outcome = ctx
        .views
        .load_orders(buttery, None, |state| printer.render(state))
        .await;
    printer.finish(outcome)
}

/// Move an order to `status`.
///
/// The cached order changes immediately. A sync that never succeeds is
/// reported as a warning; the local change is kept.
pub async fn set_status(opts: &GlobalOptions, order_id: String, status: OrderStatus) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    ctx.require_role(Role::can_manage_orders, "update order status")
        .await?;

    let local = ctx.cache().clone();
    let reconcile = ctx.cache().clone();
    let client = Arc::clone(&ctx.client);
    let remote_id = order_id.clone();
    let mut was_cached = false;

    let outcome = run_optimistic(
        &ctx.sync,
        format!("order-status:{}", order_id),
        || was_cached = local.set_order_status(&order_id, status),
        move || {
            let client = Arc::clone(&client);
            let id = remote_id.clone();
            async move { client.update_order_status(&id, status).await }
        },
        move |order: &Order| {
            reconcile.replace_order(order.clone());
        },
        &format!("Marking {} {}", order_id, status),
    )
    .await;

    log::debug!("Order {} was cached: {}", order_id, was_cached);

    match outcome {
        SyncOutcome::Synced(order) => {
            if ctx.format == OutputFormat::Json {
                output::print(&vec![OrderDisplay::from(&order)], ctx.format, DataSource::Live)?;
            } else {
                println!(
                    "{} Order {} is {}",
                    "✓".green(),
                    order.id.bold(),
                    order.status.to_string().cyan()
                );
            }
        }
        SyncOutcome::Failed { error, attempts } => {
            let hint = if error.is_transient() {
                "the server could not be reached"
            } else {
                "the server rejected the change"
            };
            eprintln!(
                "{} Order {} shows {} locally, but {} ({} attempts): {}",
                "⚠".yellow(),
                order_id,
                status,
                hint,
                attempts,
                error
            );
        }
        SyncOutcome::Abandoned => {}
    }

    Ok(())
}
