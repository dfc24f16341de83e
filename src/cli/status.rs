//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::cli::context::{load_config, open_cache};
use crate::config::Config;
use crate::error::Result;
use crate::output::formatters::format_age;
use crate::output::table::format_fields;

/// Display configuration and cache status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "butteryop Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!(
            "Config file: {} {}",
            config_path.display().to_string().cyan(),
            "(not created yet, using defaults)".dimmed()
        );
    }

    let config = load_config(opts)?;
    println!();

    if config.session.is_some() {
        println!("{} Session configured", "✓".green());
    } else {
        println!("{} No session configured", "✗".red());
        println!("  → Log in through CAS, then run 'butteryop config set-session <cookie>'");
    }

    match config.buttery {
        Some(ref buttery) => println!("{} Default buttery: {}", "✓".green(), buttery),
        None => println!("{} No default buttery (showing all)", "○".dimmed()),
    }

    let delays: Vec<String> = config
        .sync
        .retry_delays_secs
        .iter()
        .map(|d| format!("{}s", d))
        .collect();

    let cache = open_cache(&config, opts.no_cache);
    let describe = |meta: Option<crate::cache::CacheMetadata>| match meta {
        Some(m) if m.expired => "expired".to_string(),
        Some(m) => format!(
            "{} ({})",
            format_age(m.age),
            m.scope.as_deref().unwrap_or("all butteries")
        ),
        None => "none".to_string(),
    };

    println!();
    println!(
        "{}",
        format_fields(&[
            ("API host", config.api_host.clone()),
            ("Retry delays", delays.join(", ")),
            ("Cached menu", describe(cache.menu_metadata())),
            ("Cached orders", describe(cache.orders_metadata())),
        ])
    );

    Ok(())
}
