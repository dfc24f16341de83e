//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

use crate::client::OrderStatus;

pub mod args;
pub mod cache;
pub mod config;
pub mod context;
pub mod handlers;
pub mod menu;
pub mod order;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// butteryop - Command-line companion for the campus buttery ordering service
#[derive(Parser, Debug)]
#[command(name = "butteryop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "BUTTERYOP_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Only show data for this buttery
    #[arg(long, global = true, env = "BUTTERYOP_BUTTERY", hide_env = true)]
    pub buttery: Option<String>,

    /// Override config file location
    #[arg(long, global = true, env = "BUTTERYOP_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the backend host
    #[arg(long, global = true, env = "BUTTERYOP_API_HOST", hide = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "BUTTERYOP_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Skip the on-disk cache for this run
    #[arg(long, global = true, env = "BUTTERYOP_NO_CACHE", hide_env = true)]
    pub no_cache: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show configuration and cache status
    Status,

    /// View and edit the menu
    #[command(subcommand)]
    Menu(MenuCommands),

    /// View orders and update their status
    #[command(subcommand)]
    Order(OrderCommands),

    /// Manage the local cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Menu subcommands
#[derive(Subcommand, Debug)]
pub enum MenuCommands {
    /// List menu items
    List,

    /// Delete a menu item (admin only)
    Delete {
        /// Menu item ID
        item_id: String,
    },
}

/// Order subcommands
#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// List orders
    List,

    /// Set an order's status (staff and admins)
    Status {
        /// Order ID
        order_id: String,

        /// New status (pending, preparing, ready, completed, cancelled)
        status: OrderStatus,
    },
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Remove cached data (only one buttery's with --buttery)
    Clear,

    /// Print the cache directory
    Path,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set the backend host
    SetHost {
        /// URL such as https://buttery.example.edu
        url: String,
    },

    /// Store the session cookie from a browser login
    SetSession {
        /// Value of the connect.sid cookie
        cookie: String,
    },

    /// Set the default buttery filter
    SetButtery {
        /// Buttery name, or "none" to clear
        name: String,
    },
}
