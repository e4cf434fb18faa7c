//! [`EvictStaleListings`] [`Task`].

use std::{convert::Infallible, time};

use common::operations::{By, Evict, Perform, Start};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracing as log;

use crate::{read::cache::FetchDateTime, Service};

use super::Task;

/// Configuration for [`EvictStaleListings`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between stale [`Employee`] lists evictions.
    ///
    /// [`Employee`]: crate::domain::Employee
    #[default(time::Duration::from_secs(60))]
    pub interval: time::Duration,
}

/// [`Task`] for evicting stale entries of the [`Service::listings()`] cache.
#[derive(Clone, Copy, Debug)]
pub struct EvictStaleListings<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<EvictStaleListings<Self>, Config>>> for Service<Db>
where
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<EvictStaleListings<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = EvictStaleListings {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            let evicted = task
                .execute(Perform(()))
                .await
                .unwrap_or_else(|e| match e {});
            if evicted > 0 {
                log::debug!(
                    "`task::EvictStaleListings` evicted {evicted} entries",
                );
            }
        }
    }
}

impl<Db> Task<Perform<()>> for EvictStaleListings<Service<Db>> {
    /// Number of evicted entries.
    type Ok = usize;
    type Err = Infallible;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        self.service
            .listings()
            .execute(Evict(FetchDateTime::now()))
            .await
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Insert, Perform, Select},
        Handler as _,
    };

    use crate::{
        infra::database::InMemory,
        read::{cache::Lookup, employee::list::Filter},
        Config, Service,
    };

    use super::EvictStaleListings;

    #[tokio::test]
    async fn evicts_stale_listings() {
        let config = Config {
            listings_ttl: Duration::ZERO,
            ..Config::default()
        };
        let service = Service::without_tasks(config, InMemory::default());
        let listings = service.listings();
        let Lookup { generation, .. } = listings
            .execute(Select(By::<Lookup<_>, _>::new(Filter::default())))
            .await
            .unwrap();
        assert!(listings
            .execute(Insert((Filter::default(), vec![], generation)))
            .await
            .unwrap());
        let task = EvictStaleListings {
            config: config.evict_stale_listings,
            service,
        };

        assert_eq!(task.execute(Perform(())).await.unwrap(), 1);
        assert_eq!(task.execute(Perform(())).await.unwrap(), 0);
    }
}
