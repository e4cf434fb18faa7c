//! Background environment for running [`Task`]s.

use std::{
    error::Error as StdError,
    future::{Future, IntoFuture},
    iter,
};

use derive_more::{Display, Error};
use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a [`Task`].
type BoxError = Box<dyn StdError + 'static>;

/// Background environment for running named [`Task`]s.
///
/// Resolves once all the spawned [`Task`]s complete, or the first one fails.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Names and handles of spawned tasks.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), BoxError>>)>,
}

impl Background {
    /// Spawns a new [`Task`] with the provided `name` inside this
    /// [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: StdError + 'static,
    {
        log::debug!("spawning `{name}` task");
        let handle = self
            .set
            .spawn_local(future.map_err(|e| BoxError::from(Box::new(e))));
        self.handles.push((name, handle));
    }

    /// Returns the number of [`Task`]s spawned in this [`Background`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Indicates whether no [`Task`]s were spawned in this [`Background`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Failure>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let tasks = handles.into_iter().map(|(task, handle)| {
            handle
                .map(move |res| match res {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(error)) => Err(Failure::Errored { task, error }),
                    Err(source) => Err(Failure::Aborted { task, source }),
                })
                .boxed_local()
        });
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(tasks))
            .map_ok(drop)
            .boxed_local()
    }
}

/// Failure of a [`Task`] running in a [`Background`].
#[derive(Debug, Display, Error)]
pub enum Failure {
    /// [`Task`] returned an error.
    #[display("`{task}` task failed: {error}")]
    Errored {
        /// Name of the failed [`Task`].
        task: &'static str,

        /// Error returned by the [`Task`].
        #[error(not(source))]
        error: BoxError,
    },

    /// [`Task`] panicked or was cancelled.
    #[display("`{task}` task aborted: {source}")]
    Aborted {
        /// Name of the aborted [`Task`].
        task: &'static str,

        /// Reason of the abortion.
        source: task::JoinError,
    },
}

#[cfg(test)]
mod spec {
    use std::io;

    use super::{Background, Failure};

    #[tokio::test]
    async fn completes_with_all_tasks() {
        let mut bg = Background::default();
        bg.spawn("first", async { Ok::<_, io::Error>(()) });
        bg.spawn("second", async { Ok::<_, io::Error>(()) });

        assert_eq!(bg.len(), 2);
        assert!(bg.await.is_ok());
    }

    #[tokio::test]
    async fn names_failed_task() {
        let mut bg = Background::default();
        bg.spawn("fine", async { Ok::<_, io::Error>(()) });
        bg.spawn("failing", async { Err(io::Error::other("boom")) });

        let err = bg.await.unwrap_err();

        assert!(matches!(err, Failure::Errored { task: "failing", .. }));
        assert_eq!(err.to_string(), "`failing` task failed: boom");
    }

    #[tokio::test]
    async fn names_panicked_task() {
        let mut bg = Background::default();
        bg.spawn("panicking", async {
            if true {
                panic!("boom");
            }
            Ok::<_, io::Error>(())
        });

        let err = bg.await.unwrap_err();

        assert!(matches!(err, Failure::Aborted { task: "panicking", .. }));
    }
}
