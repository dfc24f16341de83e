//! Menu commands

use std::sync::Arc;

use colored::Colorize;

use crate::cli::handlers::{ListPrinter, SyncOutcome, cached_age, run_optimistic};
use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::{ButteryApi, MenuItem, Role};
use crate::error::Result;
use crate::models::MenuItemDisplay;
use crate::output::{self, DataSource};

/// List menu items, cached first
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let buttery = ctx.buttery();

    let age = cached_age(ctx.cache().menu_metadata(), buttery);
    let mut printer = ListPrinter::<MenuItem, MenuItemDisplay>::new(ctx.format, "menu items", age);

    let outcome = ctx
        .views
        .load_menu(buttery, |state| printer.render(state))
        .await;
    printer.finish(outcome)
}

/// Delete a menu item, removing it from the cached menu immediately
pub async fn delete(opts: &GlobalOptions, item_id: String) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    ctx.require_role(Role::can_edit_menu, "delete menu items")
        .await?;

    let cache = ctx.cache().clone();
    let client = Arc::clone(&ctx.client);
    let remote_id = item_id.clone();
    let mut was_cached = false;

    let outcome = run_optimistic(
        &ctx.sync,
        format!("menu-delete:{}", item_id),
        || was_cached = cache.remove_menu_item(&item_id),
        move || {
            let client = Arc::clone(&client);
            let id = remote_id.clone();
            async move { client.delete_menu_item(&id).await }
        },
        |_| {},
        &format!("Deleting {}", item_id),
    )
    .await;

    log::debug!("Menu item {} was cached: {}", item_id, was_cached);

    match outcome {
        SyncOutcome::Synced(confirmation) => {
            if ctx.format == OutputFormat::Json {
                println!(
                    "{}",
                    output::json::format_json(&confirmation, DataSource::Live)?
                );
            } else {
                println!("{} Deleted menu item {}", "✓".green(), item_id.bold());
            }
        }
        SyncOutcome::Failed { error, attempts } => {
            eprintln!(
                "{} Removed {} locally, but the server did not confirm after {} attempts: {}",
                "⚠".yellow(),
                item_id,
                attempts,
                error
            );
        }
        SyncOutcome::Abandoned => {}
    }

    Ok(())
}
