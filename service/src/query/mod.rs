//! [`Query`] definition.

pub mod employee;
pub mod employees;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::Handler as _;

    use crate::{
        domain::employee::{spec::employee, Id},
        infra::database::InMemory,
        Config, Service,
    };

    use super::employee::ById;

    #[tokio::test]
    async fn selects_existing_employee() {
        let jane = employee("Jane", "Doe", "2020-01-15");
        let svc = Service::without_tasks(
            Config::default(),
            InMemory::with([jane.clone()]),
        );

        let found = svc.execute(ById::by(jane.id)).await.unwrap();

        assert_eq!(found.map(|e| e.email), Some(jane.email));
    }

    #[tokio::test]
    async fn selects_nothing_for_unknown_id() {
        let svc = Service::without_tasks(
            Config::default(),
            InMemory::with([employee("Jane", "Doe", "2020-01-15")]),
        );

        let found = svc.execute(ById::by(Id::new())).await.unwrap();

        assert!(found.is_none());
    }
}
