//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::time;

use common::operations::{By, Start};
use derive_more::Error;
use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Duration a cached [`Employee`] list stays fresh for.
    ///
    /// [`Employee`]: domain::Employee
    #[default(time::Duration::from_secs(5))]
    pub listings_ttl: time::Duration,

    /// [`task::EvictStaleListings`] configuration.
    pub evict_stale_listings: task::evict_stale_listings::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`read::Cache`] of [`Employee`] lists.
    ///
    /// [`Employee`]: domain::Employee
    listings: read::cache::Listings,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::EvictStaleListings<Self>,
                        task::evict_stale_listings::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Self {
            config,
            database,
            listings: read::Cache::new(config.listings_ttl),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn("evict_stale_listings", async move {
            svc.execute(Start(By::new(svc.config().evict_stale_listings)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`read::Cache`] of [`Employee`] lists of this [`Service`].
    ///
    /// [`Employee`]: domain::Employee
    #[must_use]
    pub fn listings(&self) -> &read::cache::Listings {
        &self.listings
    }
}

#[cfg(test)]
impl<Db> Service<Db> {
    /// Creates a new [`Service`] without spawning its background tasks.
    pub(crate) fn without_tasks(config: Config, database: Db) -> Self {
        Self {
            config,
            database,
            listings: read::Cache::new(config.listings_ttl),
        }
    }
}
