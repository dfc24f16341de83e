//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, session validation, and client/cache initialization.

use std::sync::Arc;

use crate::cache::{ButteryCache, KeyValueStore, MemoryStore, ProgressiveCache, SqliteStore};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{ButteryApi, ButteryClient, Role, User};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::sync::SyncManager;
use crate::view::ButteryViews;

/// Store behind the CLI's cache: SQLite on disk, or memory with `--no-cache`
pub type CliStore = Box<dyn KeyValueStore>;

/// Context for command execution containing config, client, cache, and
/// the sync manager.
pub struct CommandContext {
    /// Loaded configuration with CLI overrides applied
    pub config: Config,
    /// Authenticated API client (Arc-wrapped so background syncs can share it)
    pub client: Arc<ButteryClient>,
    /// Progressive loaders over the cache and client
    pub views: ButteryViews<CliStore, ButteryClient>,
    /// Runs optimistic updates for this invocation
    pub sync: SyncManager,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or no session is configured.
    pub async fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = load_config(opts)?;
        let session = config.require_session()?.to_string();

        let client = Arc::new(ButteryClient::new(&config.api_host, Some(session))?);
        let cache = open_cache(&config, opts.no_cache);
        let views = ButteryViews::new(cache, Arc::clone(&client));
        let sync = SyncManager::new(config.retry_policy());

        Ok(Self {
            config,
            client,
            views,
            sync,
            format: opts.format,
        })
    }

    /// Buttery filter in effect: `--buttery`, else the configured default
    pub fn buttery(&self) -> Option<&str> {
        self.config.buttery.as_deref()
    }

    pub fn cache(&self) -> &ButteryCache<CliStore> {
        self.views.cache()
    }

    /// Fetch the signed-in user and check they may perform `action`.
    pub async fn require_role(&self, allowed: fn(&Role) -> bool, action: &str) -> Result<User> {
        let user = self.client.current_user().await?;
        if !allowed(&user.role) {
            log::debug!("{} ({}) may not {}", user.netid, user.role, action);
            return Err(ApiError::Forbidden.into());
        }
        Ok(user)
    }
}

/// Load config and apply the CLI/env layer on top.
pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
    let mut config = Config::load_at(opts.config_ref())?;

    if let Some(host) = opts.api_host_ref() {
        config.api_host = host.trim_end_matches('/').to_string();
    }
    if let Some(buttery) = opts.buttery_ref() {
        config.buttery = Some(buttery.to_string());
    }

    config.validate()?;
    Ok(config)
}

/// Open the cache for `config`.
///
/// Falls back to an in-memory store when the on-disk cache cannot be
/// opened; commands still work, just without persistence.
pub fn open_cache(config: &Config, no_cache: bool) -> ButteryCache<CliStore> {
    let capacity = config.cache.max_value_bytes;
    let store: CliStore = if no_cache {
        Box::new(MemoryStore::with_capacity(capacity))
    } else {
        match SqliteStore::open() {
            Ok(store) => Box::new(store.with_capacity(capacity)),
            Err(e) => {
                log::warn!("Cache unavailable, continuing without it: {}", e);
                Box::new(MemoryStore::with_capacity(capacity))
            }
        }
    };

    ButteryCache::new(ProgressiveCache::new(store).with_max_age(config.cache_max_age()))
}
