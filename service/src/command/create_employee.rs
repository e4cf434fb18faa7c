//! [`Command`] for creating a new [`Employee`].

use common::{
    operations::{By, Commit, Insert, Invalidate, Select, Transact, Transacted},
    DateTime,
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

/// [`Command`] for creating a new [`Employee`].
#[derive(Clone, Debug)]
pub struct CreateEmployee {
    /// First [`employee::Name`] of a new [`Employee`].
    pub first_name: employee::Name,

    /// Middle [`employee::Name`] of a new [`Employee`], if any.
    pub middle_name: Option<employee::Name>,

    /// Last [`employee::Name`] of a new [`Employee`].
    pub last_name: employee::Name,

    /// [`employee::Email`] of a new [`Employee`].
    pub email: employee::Email,

    /// [`employee::MobileNumber`] of a new [`Employee`].
    pub mobile_number: employee::MobileNumber,

    /// Residential [`employee::Address`] of a new [`Employee`], if known.
    pub residential_address: Option<employee::Address>,

    /// [`employee::ContractType`] of a new [`Employee`].
    pub contract_type: employee::ContractType,

    /// [`employee::EmploymentType`] of a new [`Employee`].
    pub employment_type: employee::EmploymentType,

    /// [`employee::StartDate`] of a new [`Employee`].
    pub start_date: employee::StartDate,

    /// [`employee::FinishDate`] of a new [`Employee`], if any.
    pub finish_date: Option<employee::FinishDate>,

    /// Indicator whether employment of a new [`Employee`] is ongoing.
    pub ongoing: bool,

    /// [`employee::Salary`] of a new [`Employee`].
    pub salary: employee::Salary,

    /// [`employee::HoursPerWeek`] of a new [`Employee`], if any.
    pub hours_per_week: Option<employee::HoursPerWeek>,
}

impl<Db> Command<CreateEmployee> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Employee>, &'l employee::Email>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Employee>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEmployee {
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
        } = cmd;

        let employee = Employee {
            id: employee::Id::new(),
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
            created_at: DateTime::now().coerce(),
        };
        employee
            .check_term()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let existing = self
            .database()
            .execute(Select(By::<Option<Employee>, _>::new(
                &employee.email,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(employee.email)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let inserted = tx.execute(Insert(employee.clone())).await;
        if inserted
            .as_ref()
            .is_err_and(|e| e.as_ref().is_unique_violation(None))
        {
            // Another `Employee` has occupied the `Email` concurrently.
            return Err(tracerr::new!(E::EmailOccupied(employee.email)));
        }
        inserted
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

/// Error of [`CreateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`employee::Email`] is already occupied by another [`Employee`].
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] employee::Email),

    /// Employment term of a new [`Employee`] is invalid.
    #[display("Invalid employment term: {_0}")]
    #[from]
    InvalidTerm(TermViolation),
}

#[cfg(test)]
pub(crate) mod spec {
    use common::{Date, Handler as _};

    use crate::{
        domain::{
            employee::{
                spec::employee, ContractType, Email, TermViolation,
            },
            Employee,
        },
        infra::database::InMemory,
        Config, Service,
    };

    use super::{CreateEmployee, ExecutionError};

    /// Creates a new [`CreateEmployee`] [`Command`] repeating the data of
    /// the provided [`Employee`].
    ///
    /// [`Command`]: crate::Command
    pub(crate) fn command(from: &Employee) -> CreateEmployee {
        let e = from.clone();
        CreateEmployee {
            first_name: e.first_name,
            middle_name: e.middle_name,
            last_name: e.last_name,
            email: e.email,
            mobile_number: e.mobile_number,
            residential_address: e.residential_address,
            contract_type: e.contract_type,
            employment_type: e.employment_type,
            start_date: e.start_date,
            finish_date: e.finish_date,
            ongoing: e.ongoing,
            salary: e.salary,
            hours_per_week: e.hours_per_week,
        }
    }

    #[tokio::test]
    async fn creates_employee() {
        let db = InMemory::default();
        let svc = Service::without_tasks(Config::default(), db.clone());

        let template = employee("Jane", "Doe", "2020-01-15");
        let created = svc.execute(command(&template)).await.unwrap();

        assert_ne!(created.id, template.id);
        assert_eq!(created.email, template.email);
        let stored = db.employee(created.id).unwrap();
        assert_eq!(stored.last_name, template.last_name);
    }

    #[tokio::test]
    async fn rejects_occupied_email() {
        let existing = employee("Jane", "Doe", "2020-01-15");
        let db = InMemory::with([existing.clone()]);
        let svc = Service::without_tasks(Config::default(), db);

        let mut cmd = command(&employee("John", "Smith", "2021-03-01"));
        cmd.email = Email::new("jane.doe@example.com").unwrap();

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::EmailOccupied(e) if e == &existing.email,
        ));
    }

    #[tokio::test]
    async fn rejects_finish_before_start() {
        let svc =
            Service::without_tasks(Config::default(), InMemory::default());

        let mut cmd = command(&employee("Jane", "Doe", "2020-01-15"));
        cmd.ongoing = false;
        cmd.finish_date =
            Some(Date::from_iso8601("2020-01-01").unwrap().coerce());

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidTerm(
                TermViolation::FinishBeforeStart { .. },
            ),
        ));
    }

    #[tokio::test]
    async fn rejects_ongoing_contract() {
        let svc =
            Service::without_tasks(Config::default(), InMemory::default());

        let mut cmd = command(&employee("Jane", "Doe", "2020-01-15"));
        cmd.contract_type = ContractType::Contract;
        cmd.ongoing = true;

        let err = svc.execute(cmd).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidTerm(TermViolation::OngoingContract),
        ));
    }
}
