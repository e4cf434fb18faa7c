//! [`Command`] for updating an [`Employee`].

use common::operations::{
    By, Commit, Invalidate, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        employee::{self, TermViolation},
        Employee,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an [`Employee`] partially.
///
/// Only the fields being [`Some`] are changed. Optional fields of an
/// [`Employee`] are cleared with [`Some(None)`].
///
/// [`Some(None)`]: Some
#[derive(Clone, Debug, Default)]
pub struct UpdateEmployee {
    /// ID of the [`Employee`] to be updated.
    pub employee_id: employee::Id,

    /// New first [`employee::Name`].
    pub first_name: Option<employee::Name>,

    /// New middle [`employee::Name`].
    pub middle_name: Option<Option<employee::Name>>,

    /// New last [`employee::Name`].
    pub last_name: Option<employee::Name>,

    /// New [`employee::Email`].
    pub email: Option<employee::Email>,

    /// New [`employee::MobileNumber`].
    pub mobile_number: Option<employee::MobileNumber>,

    /// New residential [`employee::Address`].
    pub residential_address: Option<Option<employee::Address>>,

    /// New [`employee::ContractType`].
    pub contract_type: Option<employee::ContractType>,

    /// New [`employee::EmploymentType`].
    pub employment_type: Option<employee::EmploymentType>,

    /// New [`employee::StartDate`].
    pub start_date: Option<employee::StartDate>,

    /// New [`employee::FinishDate`].
    pub finish_date: Option<Option<employee::FinishDate>>,

    /// New indicator whether the employment is ongoing.
    pub ongoing: Option<bool>,

    /// New [`employee::Salary`].
    pub salary: Option<employee::Salary>,

    /// New [`employee::HoursPerWeek`].
    pub hours_per_week: Option<Option<employee::HoursPerWeek>>,
}

impl UpdateEmployee {
    /// Applies this [`UpdateEmployee`] to the provided [`Employee`].
    fn apply(self, employee: &mut Employee) {
        /// Replaces the `field` with the `value`, if it's provided.
        fn set<T>(field: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *field = v;
            }
        }

        let Self {
            employee_id: _,
            first_name,
            middle_name,
            last_name,
            email,
            mobile_number,
            residential_address,
            contract_type,
            employment_type,
            start_date,
            finish_date,
            ongoing,
            salary,
            hours_per_week,
        } = self;

        set(&mut employee.first_name, first_name);
        set(&mut employee.middle_name, middle_name);
        set(&mut employee.last_name, last_name);
        set(&mut employee.email, email);
        set(&mut employee.mobile_number, mobile_number);
        set(&mut employee.residential_address, residential_address);
        set(&mut employee.contract_type, contract_type);
        set(&mut employee.employment_type, employment_type);
        set(&mut employee.start_date, start_date);
        set(&mut employee.finish_date, finish_date);
        set(&mut employee.ongoing, ongoing);
        set(&mut employee.salary, salary);
        set(&mut employee.hours_per_week, hours_per_week);
    }
}

impl<Db> Command<UpdateEmployee> for Service<Db>
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
        > + for<'l> Database<
            Select<By<Option<Employee>, &'l employee::Email>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<Update<Employee>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let employee_id = cmd.employee_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Employee`.
        tx.execute(Lock(By::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut employee = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;
        let old_email = employee.email.clone();

        cmd.apply(&mut employee);
        employee
            .check_term()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        if employee.email != old_email {
            let occupant = tx
                .execute(Select(By::<Option<Employee>, _>::new(
                    &employee.email,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if occupant.is_some_and(|o| o.id != employee.id) {
                return Err(tracerr::new!(E::EmailOccupied(employee.email)));
            }
        }

        let updated = tx.execute(Update(employee.clone())).await;
        if updated
            .as_ref()
            .is_err_and(|e| e.as_ref().is_unique_violation(None))
        {
            return Err(tracerr::new!(E::EmailOccupied(employee.email)));
        }
        updated
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

/// Error of [`UpdateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`employee::Email`] is already occupied by another [`Employee`].
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] employee::Email),

    /// [`Employee`] doesn't exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// Updated employment term of the [`Employee`] is invalid.
    #[display("Invalid employment term: {_0}")]
    #[from]
    InvalidTerm(TermViolation),
}
