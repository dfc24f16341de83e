//! butteryop CLI - companion for the campus buttery ordering service

use clap::Parser;

use butteryop::cli::{
    self, CacheCommands, Cli, Commands, ConfigCommands, GlobalOptions, MenuCommands,
    OrderCommands,
};
use butteryop::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Errors only by default; `--debug` turns on this crate's debug output.
/// `RUST_LOG` still wins when set.
fn init_logging(debug: bool) {
    let default = if debug { "butteryop=debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
    log::debug!("Debug logging enabled");
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Status => cli::status::run(&opts),
        Commands::Menu(cmd) => match cmd {
            MenuCommands::List => cli::menu::list(&opts).await,
            MenuCommands::Delete { item_id } => cli::menu::delete(&opts, item_id).await,
        },
        Commands::Order(cmd) => match cmd {
            OrderCommands::List => cli::order::list(&opts).await,
            OrderCommands::Status { order_id, status } => {
                cli::order::set_status(&opts, order_id, status).await
            }
        },
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Status => cli::cache::status(&opts),
            CacheCommands::Clear => cli::cache::clear(&opts),
            CacheCommands::Path => cli::cache::path(),
        },
        Commands::Config(cmd) => match cmd {
            ConfigCommands::SetHost { url } => cli::config::set_host(&opts, url),
            ConfigCommands::SetSession { cookie } => cli::config::set_session(&opts, cookie),
            ConfigCommands::SetButtery { name } => cli::config::set_buttery(&opts, name),
        },
    }
}
