//! [`Query`] collection related to the multiple [`Employee`]s.

use common::operations::{By, Insert, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Employee,
    infra::{database, Database},
    read::{cache::Lookup, employee::list},
    Service,
};

use super::{DatabaseQuery, Query};

/// Queries a list of [`Employee`]s matching the provided [`list::Filter`].
///
/// Served from the [`Service::listings()`] cache while it's fresh, falling
/// back to the [`Database`] otherwise. A list fetched concurrently with a
/// write is returned, but not cached.
#[derive(Clone, Debug, Default)]
pub struct List(pub list::Filter);

impl List {
    /// Creates a new [`List`] query filtering by the provided
    /// [`list::Filter`].
    #[must_use]
    pub fn by(filter: list::Filter) -> Self {
        Self(filter)
    }
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Employee>, list::Filter>>,
        Ok = Vec<Employee>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        List(filter): List,
    ) -> Result<Self::Ok, Self::Err> {
        let Lookup { value, generation } = self
            .listings()
            .execute(Select(By::<Lookup<_>, _>::new(filter.clone())))
            .await
            .unwrap_or_else(|e| match e {});
        if let Some(employees) = value {
            return Ok(employees);
        }

        let employees = self
            .database()
            .execute(Select(By::new(filter.clone())))
            .await
            .map_err(tracerr::wrap!())?;

        // Listings invalidated while fetching are outdated already.
        let stored = self
            .listings()
            .execute(Insert((filter, employees.clone(), generation)))
            .await
            .unwrap_or_else(|e| match e {});
        if !stored {
            log::debug!("outdated listing is not cached");
        }

        Ok(employees)
    }
}

/// Queries total count of [`Employee`]s.
pub type TotalCount = DatabaseQuery<By<list::TotalCount, ()>>;
