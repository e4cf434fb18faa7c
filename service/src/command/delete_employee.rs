//! [`Command`] for deleting an [`Employee`].

use common::operations::{
    By, Commit, Delete, Invalidate, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{employee, Employee},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Employee`].
///
/// [`Employee`]s with ongoing employment cannot be deleted.
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteEmployee {
    /// ID of the [`Employee`] to be deleted.
    pub employee_id: employee::Id,
}

impl<Db> Command<DeleteEmployee> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Employee, employee::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Employee, employee::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    /// Deleted [`Employee`].
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteEmployee { employee_id }: DeleteEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Employee`.
        tx.execute(Lock(By::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let employee = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;
        if employee.ongoing {
            return Err(tracerr::new!(E::EmployeeOngoing(employee_id)));
        }

        tx.execute(Delete(By::<Employee, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.listings()
            .execute(Invalidate(()))
            .await
            .unwrap_or_else(|e| match e {});

        Ok(employee)
    }
}

/// Error of [`DeleteEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] doesn't exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// [`Employee`] has ongoing employment.
    #[display("`Employee(id: {_0})` has ongoing employment")]
    EmployeeOngoing(#[error(not(source))] employee::Id),
}
