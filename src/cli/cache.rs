//! Cache management commands

use colored::Colorize;

use crate::cache::SqliteStore;
use crate::cli::context::{load_config, open_cache};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::error::{Error, Result};
use crate::output::formatters::{format_bytes, format_millis_local};

fn cache_dir_display() -> String {
    SqliteStore::cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Show cache status/statistics
pub fn status(opts: &GlobalOptions) -> Result<()> {
    let config = load_config(opts)?;
    let cache = open_cache(&config, opts.no_cache);
    let stats = cache.stats();

    match opts.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total_entries": stats.total_entries,
                "valid_entries": stats.valid_entries,
                "expired_entries": stats.expired_entries,
                "total_size_bytes": stats.total_size_bytes,
                "capacity_bytes": config.cache.max_value_bytes,
                "max_age_hours": config.cache.max_age_hours,
                "oldest_entry_timestamp": stats.oldest_entry,
                "newest_entry_timestamp": stats.newest_entry,
                "butteries": stats.scopes,
                "path": cache_dir_display(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            println!("Cache Status");
            println!("────────────────────────────────────────");
            println!("Location:       {}", cache_dir_display());
            println!("Valid entries:  {}", stats.valid_entries);
            println!("Expired:        {}", stats.expired_entries);
            println!(
                "Total size:     {} of {}",
                format_bytes(stats.total_size_bytes),
                format_bytes(config.cache.max_value_bytes)
            );
            println!("Max age:        {}h", config.cache.max_age_hours);

            if !stats.scopes.is_empty() {
                let scopes: Vec<&str> = stats.scopes.iter().map(String::as_str).collect();
                println!("Butteries:      {}", scopes.join(", "));
            }
            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_millis_local(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_millis_local(newest));
            }
        }
    }

    Ok(())
}

/// Clear cache entries, optionally only those for `--buttery`
pub fn clear(opts: &GlobalOptions) -> Result<()> {
    let config = load_config(opts)?;
    let cache = open_cache(&config, opts.no_cache);

    let removed = match opts.buttery_ref() {
        Some(buttery) => cache.clear_buttery(Some(buttery)),
        None => cache.clear_all(),
    };

    match opts.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "buttery": opts.buttery_ref(),
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            let target = opts
                .buttery_ref()
                .map(|b| format!(" for {}", b))
                .unwrap_or_default();
            if removed > 0 {
                println!("{} Cleared {} cache entries{}", "✓".green(), removed, target);
            } else {
                println!("Cache was already empty{}", target);
            }
        }
    }

    Ok(())
}

/// Show cache path
pub fn path() -> Result<()> {
    let path = SqliteStore::cache_dir().map_err(|e| Error::Other(e.to_string()))?;
    println!("{}", path.display());
    Ok(())
}
