//! Postgres database client definitions.

use std::{future::Future, sync::Arc};

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Lazily initialized [`Connection`] shared between clones of a client.
#[derive(Debug)]
struct Slot<C>(RwLock<Option<C>>);

impl<C> Default for Slot<C> {
    fn default() -> Self {
        Self(RwLock::new(None))
    }
}

impl<C> Slot<C> {
    /// Returns the [`Connection`] held in this [`Slot`], initializing it with
    /// the provided `init` function if there is none yet.
    async fn get_or_try_init<F, Fut>(
        &self,
        init: F,
    ) -> Result<RwLockReadGuard<'_, C>, Traced<database::Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C, Traced<database::Error>>>,
    {
        let conn = self.0.read().await;
        let guard = if conn.is_none() {
            drop(conn);

            let mut conn = self.0.write().await;
            if conn.is_none() {
                *conn = Some(init().await.map_err(tracerr::wrap!())?);
            }
            conn.downgrade()
        } else {
            conn
        };

        Ok(RwLockReadGuard::map(guard, |c| {
            c.as_ref()
                .expect("connection cannot be dropped while guard is alive")
        }))
    }

    /// Takes the [`Connection`] out of this [`Slot`], if any.
    async fn take(&self) -> Option<C> {
        self.0.write().await.take()
    }
}

/// Retrieves a new [`connection::NonTx`] from the provided
/// [`connection::Pool`].
pub(super) async fn pooled(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Non-transactional Postgres database client.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to retrieve [`Connection`]s from.
    pub(crate) pool: connection::Pool,

    /// [`Connection`] used for non-transactional operations, if retrieved.
    connection: Arc<Slot<connection::NonTx>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Arc::default(),
        }
    }

    /// Returns the underlying [`Connection`] of this [`NonTx`] client.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        self.connection.get_or_try_init(|| pooled(&self.pool)).await
    }
}

/// Transactional Postgres database client.
///
/// The transaction is started lazily on the first operation, reusing the
/// [`Connection`] of the [`NonTx`] client it was created from, if any.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client this [`Tx`] was created from, until its
    /// [`Connection`] is taken.
    non_tx: Arc<Mutex<Option<NonTx>>>,

    /// Lazily started [`connection::Tx`].
    tx: Arc<Slot<connection::Tx>>,
}

impl Tx {
    /// Creates a new [`Tx`] client from the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            non_tx: Arc::new(Mutex::new(Some(client))),
            tx: Arc::default(),
        }
    }

    /// Returns the underlying [`Connection`] of this [`Tx`] client, starting
    /// the transaction if it hasn't been started yet.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        self.tx
            .get_or_try_init(|| async {
                let Some(client) = self.non_tx.lock().await.take() else {
                    return Err(tracerr::new!(database::Error::from(
                        postgres::Error::TxFinished,
                    )));
                };
                let conn = match client.connection.take().await {
                    Some(c) => c,
                    None => pooled(&client.pool)
                        .await
                        .map_err(tracerr::wrap!())?,
                };
                connection::Tx::from_non_tx(conn)
                    .await
                    .map_err(tracerr::wrap!())
            })
            .await
    }

    /// Commits this [`Tx`] client.
    ///
    /// # Errors
    ///
    /// If failed to commit transaction of this [`Tx`] client.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        match self.tx.take().await {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            // No operation has been performed, so nothing to commit.
            None => Ok(()),
        }
    }
}

/// Implements [`Connection`] for a client delegating to its lazily retrieved
/// underlying [`Connection`].
macro_rules! delegate_connection {
    ($client:ty) => {
        impl Connection for $client {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

delegate_connection!(NonTx);
delegate_connection!(Tx);
