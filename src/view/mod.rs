//! Progressive loading of server collections
//!
//! A view shows cached data as soon as it is available, fetches in the
//! background, and swaps in the fresh copy when it lands. A failed fetch
//! keeps the cached render; it only surfaces as an error when there was
//! nothing cached to show.

use std::future::Future;

use crate::error::{Error, Result};

pub mod buttery;

pub use buttery::ButteryViews;

/// What a view is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// Nothing to show yet
    Loading,
    /// Last-known-good data from the cache, refresh in progress or failed
    Cached(T),
    /// Data from the server
    Fresh(T),
    /// Fetch failed with nothing cached
    Failed(String),
}

impl<T> ViewState<T> {
    /// The data being shown, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Cached(data) | ViewState::Fresh(data) => Some(data),
            ViewState::Loading | ViewState::Failed(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

impl<T: Clone> ViewState<&T> {
    /// Take an owned copy of a borrowed render
    pub fn cloned(&self) -> ViewState<T> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Cached(data) => ViewState::Cached((*data).clone()),
            ViewState::Fresh(data) => ViewState::Fresh((*data).clone()),
            ViewState::Failed(message) => ViewState::Failed(message.clone()),
        }
    }
}

/// How a refresh ended
#[derive(Debug)]
pub enum RefreshOutcome<T> {
    /// The fetch succeeded and the cache was overwritten
    Fresh(T),
    /// The fetch failed; the cached data is still what is shown
    Stale { data: T, error: Error },
    /// The fetch failed and there was nothing cached
    Unavailable(Error),
}

impl<T> RefreshOutcome<T> {
    /// The data to present, fresh or stale
    pub fn data(&self) -> Option<&T> {
        match self {
            RefreshOutcome::Fresh(data) | RefreshOutcome::Stale { data, .. } => Some(data),
            RefreshOutcome::Unavailable(_) => None,
        }
    }

    /// Convert to a `Result`, treating stale data as success.
    pub fn into_result(self) -> Result<T> {
        match self {
            RefreshOutcome::Fresh(data) | RefreshOutcome::Stale { data, .. } => Ok(data),
            RefreshOutcome::Unavailable(error) => Err(error),
        }
    }
}

/// Render cached data (if any), fetch, then store and render the fresh data.
///
/// `render` is called with every state the view passes through: at most one
/// `Cached` followed by either `Fresh` or, when nothing was cached, `Failed`.
pub async fn refresh<T, Fut, S, R>(
    cached: Option<T>,
    fetch: Fut,
    store: S,
    mut render: R,
) -> RefreshOutcome<T>
where
    Fut: Future<Output = Result<T>>,
    S: FnOnce(&T),
    R: FnMut(ViewState<&T>),
{
    if let Some(ref data) = cached {
        render(ViewState::Cached(data));
    }

    match fetch.await {
        Ok(data) => {
            store(&data);
            render(ViewState::Fresh(&data));
            RefreshOutcome::Fresh(data)
        }
        Err(error) => match cached {
            Some(data) => {
                log::warn!("Refresh failed, keeping cached data: {}", error);
                RefreshOutcome::Stale { data, error }
            }
            None => {
                log::debug!("Refresh failed with nothing cached: {}", error);
                render(ViewState::Failed(error.to_string()));
                RefreshOutcome::Unavailable(error)
            }
        },
    }
}

/// Ticket for one load, used to drop results that arrive after the view has
/// moved to another scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    scope: Option<String>,
    generation: u64,
}

impl LoadTicket {
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}

/// One collection shown for one buttery scope
#[derive(Debug)]
pub struct CollectionView<T> {
    scope: Option<String>,
    state: ViewState<T>,
    generation: u64,
}

impl<T: Clone> CollectionView<T> {
    pub fn new(scope: Option<&str>) -> Self {
        Self {
            scope: scope.map(str::to_string),
            state: ViewState::Loading,
            generation: 0,
        }
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Change the buttery filter. The view drops back to `Loading` before
    /// anything else is shown, and loads started for the old scope are
    /// ignored from here on.
    pub fn switch_scope(&mut self, scope: Option<&str>) {
        self.state = ViewState::Loading;
        self.generation += 1;
        self.scope = scope.map(str::to_string);
    }

    /// Start a load for the current scope
    pub fn begin(&self) -> LoadTicket {
        LoadTicket {
            scope: self.scope.clone(),
            generation: self.generation,
        }
    }

    /// Show `state` if `ticket` belongs to the current scope. Returns whether
    /// it was applied.
    pub fn apply(&mut self, ticket: &LoadTicket, state: ViewState<T>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Ignoring result for {:?}, view is now on {:?}",
                ticket.scope,
                self.scope
            );
            return false;
        }
        self.state = state;
        true
    }

    /// Run a [`refresh`] for the current scope, recording each rendered state.
    ///
    /// The view stays mutably borrowed until the refresh finishes, so no scope
    /// switch can happen in between. When the scope may change while a fetch
    /// is in flight, drive the load with [`CollectionView::begin`] and
    /// [`CollectionView::apply`] instead.
    pub async fn load<Fut, S>(&mut self, cached: Option<T>, fetch: Fut, store: S) -> RefreshOutcome<T>
    where
        Fut: Future<Output = Result<T>>,
        S: FnOnce(&T),
    {
        let ticket = self.begin();
        refresh(cached, fetch, store, |state| {
            self.apply(&ticket, state.cloned());
        })
        .await
    }
}
