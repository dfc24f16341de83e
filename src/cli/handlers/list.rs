//! Progressive list rendering
//!
//! Table output shows the cached copy straight away and then the server's,
//! skipping the second table when nothing changed. JSON output prints a
//! single document once the refresh has settled, tagged with where the
//! data came from.

use std::marker::PhantomData;
use std::time::Duration;

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cache::CacheMetadata;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::formatters::format_age;
use crate::output::{DataSource, Formattable};
use crate::view::{RefreshOutcome, ViewState};

/// Age of a cached collection, if it is usable for `scope`.
pub fn cached_age(metadata: Option<CacheMetadata>, scope: Option<&str>) -> Option<Duration> {
    metadata
        .filter(|m| !m.expired && m.scope.as_deref() == scope)
        .map(|m| m.age)
}

/// Prints each state of a collection view as it arrives.
pub struct ListPrinter<T, D> {
    format: OutputFormat,
    resource: &'static str,
    cached_age: Option<Duration>,
    shown: Option<Vec<T>>,
    _display: PhantomData<D>,
}

impl<T, D> ListPrinter<T, D>
where
    T: Clone + PartialEq,
    D: for<'a> From<&'a T> + Tabled + Serialize,
{
    pub fn new(format: OutputFormat, resource: &'static str, cached_age: Option<Duration>) -> Self {
        Self {
            format,
            resource,
            cached_age,
            shown: None,
            _display: PhantomData,
        }
    }

    fn rows(data: &[T]) -> Vec<D> {
        data.iter().map(|item| D::from(item)).collect()
    }

    /// Render callback for a view load
    pub fn render(&mut self, state: ViewState<&Vec<T>>) {
        if self.format == OutputFormat::Json {
            return;
        }

        match state {
            ViewState::Cached(data) => {
                let age = self.cached_age.map(format_age).unwrap_or_default();
                println!("{}", format!("Cached {} {}, refreshing...", self.resource, age).dimmed());
                println!("{}", crate::output::table::format_table(&Self::rows(data)));
                self.shown = Some(data.clone());
            }
            ViewState::Fresh(data) => {
                if self.shown.as_ref() == Some(data) {
                    println!("{} Up to date", "✓".green());
                } else {
                    if self.shown.is_some() {
                        println!("\n{}", "Updated:".bold());
                    }
                    println!("{}", crate::output::table::format_table(&Self::rows(data)));
                }
            }
            ViewState::Loading | ViewState::Failed(_) => {}
        }
    }

    /// Report how the load ended. Fails only when there was nothing to show.
    pub fn finish(self, outcome: RefreshOutcome<Vec<T>>) -> Result<()> {
        match outcome {
            RefreshOutcome::Fresh(data) => {
                log::debug!("Fetched {} {}", data.len(), self.resource);
                if self.format == OutputFormat::Json {
                    crate::output::print(&Self::rows(&data), self.format, DataSource::Live)?;
                }
                Ok(())
            }
            RefreshOutcome::Stale { data, error } => {
                if self.format == OutputFormat::Json {
                    let age_secs = self.cached_age.unwrap_or_default().as_secs();
                    let rows = Self::rows(&data);
                    println!(
                        "{}",
                        rows.format(self.format, DataSource::Cache { age_secs })?
                    );
                }
                eprintln!(
                    "{} Could not refresh {}: {}. Showing cached data.",
                    "⚠".yellow(),
                    self.resource,
                    error
                );
                Ok(())
            }
            RefreshOutcome::Unavailable(error) => {
                if self.format == OutputFormat::Table {
                    println!("No {} to show.", self.resource);
                }
                Err(error)
            }
        }
    }
}
