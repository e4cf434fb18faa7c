//! [`Employee`]-related definitions.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Extension, Json,
};
use common::{money::Currency, Date, DateTime, Handler as _, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use service::{
    command,
    domain::{
        self,
        employee::{
            status::{self, Field},
            TermViolation,
        },
    },
    query,
    read::employee::list,
};
use tracing as log;
use uuid::Uuid;

use crate::{api, define_error, AsError, Error, Service};

/// An employee along with the status derived from its employment term.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identifier of this `Employee`.
    pub id: Uuid,

    /// First name of this `Employee`.
    pub first_name: String,

    /// Middle name of this `Employee`, if any.
    pub middle_name: Option<String>,

    /// Last name of this `Employee`.
    pub last_name: String,

    /// Email address of this `Employee`.
    pub email: String,

    /// Australian mobile number of this `Employee`.
    pub mobile_number: String,

    /// Residential address of this `Employee`, if known.
    pub residential_address: Option<String>,

    /// [`ContractType`] of this `Employee`.
    pub contract_type: ContractType,

    /// [`EmploymentType`] of this `Employee`.
    pub employment_type: EmploymentType,

    /// [`Date`] when this `Employee` started working.
    pub start_date: Date,

    /// [`Date`] when this `Employee` finishes working, if recorded.
    pub finish_date: Option<Date>,

    /// Indicator whether the employment has no defined end.
    pub ongoing: bool,

    /// Salary of this `Employee` in AUD.
    #[serde(with = "rust_decimal::serde::float")]
    pub salary: Decimal,

    /// Contracted working hours per week, if any.
    pub hours_per_week: Option<i16>,

    /// [`DateTime`] when this `Employee` was created.
    pub created_at: DateTime,

    /// [`Status`] derived from the employment term.
    #[serde(flatten)]
    pub status: Status,
}

impl Employee {
    /// Creates a new [`Employee`] out of the provided [`domain::Employee`],
    /// deriving its [`Status`] at the `now` moment.
    ///
    /// A [`Status`] which cannot be derived is left unknown.
    #[must_use]
    pub fn at(employee: domain::Employee, now: DateTime) -> Self {
        let status = employee.status(now).map_or_else(
            |e| {
                log::warn!(
                    "cannot derive status of `Employee(id: {})`: {e}",
                    employee.id,
                );
                Status::default()
            },
            Status::from,
        );
        let domain::Employee {
            id,
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
            created_at,
        } = employee;

        Self {
            id: id.into(),
            first_name: first_name.to_string(),
            middle_name: middle_name.map(|n| n.to_string()),
            last_name: last_name.to_string(),
            email: email.to_string(),
            mobile_number: mobile_number.to_string(),
            residential_address: residential_address.map(|a| a.to_string()),
            contract_type: contract_type.into(),
            employment_type: employment_type.into(),
            start_date: start_date.coerce(),
            finish_date: finish_date.map(|d| d.coerce()),
            ongoing,
            salary: salary.amount().amount,
            hours_per_week: hours_per_week.map(Into::into),
            created_at: created_at.coerce(),
            status,
        }
    }
}

/// Status derived from an employment term.
///
/// All the fields are [`None`] if the status cannot be derived.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Human-readable tenure, like `2 years 3 months`.
    pub tenure: Option<String>,

    /// Whole years of the tenure.
    pub tenure_years: Option<u32>,

    /// Months of the tenure on top of the whole years.
    pub tenure_months: Option<u8>,

    /// Contract expiry banner, like `Contract expires in 5 days`.
    pub contract_expiry: Option<String>,

    /// Indicator whether the employee is on probation.
    pub on_probation: Option<bool>,

    /// Indicator whether the employee has a work anniversary this month.
    pub has_work_anniversary: Option<bool>,
}

impl From<status::DerivedStatus> for Status {
    fn from(status: status::DerivedStatus) -> Self {
        let status::DerivedStatus {
            tenure,
            contract_expiry,
            on_probation,
            has_work_anniversary,
        } = status;
        Self {
            tenure: Some(tenure.to_string()),
            tenure_years: Some(tenure.years),
            tenure_months: Some(tenure.months),
            contract_expiry: contract_expiry.map(|b| b.to_string()),
            on_probation: Some(on_probation),
            has_work_anniversary: Some(has_work_anniversary),
        }
    }
}

/// Type of an `Employee` contract.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    /// Permanent contract.
    Permanent,

    /// Fixed-term contract.
    Contract,
}

impl From<domain::employee::ContractType> for ContractType {
    fn from(kind: domain::employee::ContractType) -> Self {
        use domain::employee::ContractType as K;
        match kind {
            K::Permanent => Self::Permanent,
            K::Contract => Self::Contract,
        }
    }
}

impl From<ContractType> for domain::employee::ContractType {
    fn from(kind: ContractType) -> Self {
        match kind {
            ContractType::Permanent => Self::Permanent,
            ContractType::Contract => Self::Contract,
        }
    }
}

/// Type of an `Employee` employment.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    /// Full-time employment.
    FullTime,

    /// Part-time employment.
    PartTime,
}

impl From<domain::employee::EmploymentType> for EmploymentType {
    fn from(kind: domain::employee::EmploymentType) -> Self {
        use domain::employee::EmploymentType as K;
        match kind {
            K::FullTime => Self::FullTime,
            K::PartTime => Self::PartTime,
        }
    }
}

impl From<EmploymentType> for domain::employee::EmploymentType {
    fn from(kind: EmploymentType) -> Self {
        match kind {
            EmploymentType::FullTime => Self::FullTime,
            EmploymentType::PartTime => Self::PartTime,
        }
    }
}

/// Query parameters of an `Employee` list.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// [`EmploymentType`] the listed `Employee`s must have.
    pub employment_type: Option<EmploymentType>,

    /// [`ContractType`] the listed `Employee`s must have.
    pub contract_type: Option<ContractType>,

    /// Keyword to search the listed `Employee`s by.
    pub keyword: Option<String>,
}

impl From<ListParams> for list::Filter {
    fn from(params: ListParams) -> Self {
        Self {
            employment_type: params.employment_type.map(Into::into),
            contract_type: params.contract_type.map(Into::into),
            keyword: params.keyword.and_then(list::Keyword::new),
        }
    }
}

/// Query parameters of an `Employee` search.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchParams {
    /// Keyword to search `Employee`s by.
    pub keyword: String,
}

/// Total count of `Employee`s.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Count {
    /// Number of `Employee`s.
    pub count: i64,
}

/// Input for creating a new `Employee`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInput {
    /// First name of a new `Employee`.
    pub first_name: String,

    /// Middle name of a new `Employee`, if any.
    pub middle_name: Option<String>,

    /// Last name of a new `Employee`.
    pub last_name: String,

    /// Email address of a new `Employee`.
    pub email: String,

    /// Australian mobile number of a new `Employee`.
    pub mobile_number: String,

    /// Residential address of a new `Employee`, if known.
    pub residential_address: Option<String>,

    /// [`ContractType`] of a new `Employee`.
    pub contract_type: ContractType,

    /// [`EmploymentType`] of a new `Employee`.
    pub employment_type: EmploymentType,

    /// Start date of a new `Employee` in `YYYY-MM-DD` format.
    pub start_date: String,

    /// Finish date of a new `Employee` in `YYYY-MM-DD` format, if any.
    pub finish_date: Option<String>,

    /// Indicator whether the employment has no defined end.
    #[serde(default)]
    pub ongoing: bool,

    /// Salary of a new `Employee` in AUD.
    #[serde(with = "rust_decimal::serde::float")]
    pub salary: Decimal,

    /// Contracted working hours per week, if any.
    pub hours_per_week: Option<i16>,
}

impl TryFrom<CreateInput> for command::CreateEmployee {
    type Error = Error;

    fn try_from(input: CreateInput) -> Result<Self, Self::Error> {
        use domain::employee as e;

        let CreateInput {
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
        } = input;
        let record = status::Record::parse(
            &start_date,
            finish_date.as_deref(),
            ongoing,
            contract_type.into(),
        )
        .map_err(AsError::into_error)?;

        Ok(Self {
            first_name: name(&first_name, InputError::FirstName)?,
            middle_name: non_blank(middle_name)
                .map(|n| name(&n, InputError::MiddleName))
                .transpose()?,
            last_name: name(&last_name, InputError::LastName)?,
            email: parse(e::Email::new(email.trim()), InputError::Email)?,
            mobile_number: parse(
                e::MobileNumber::new(mobile_number.trim()),
                InputError::MobileNumber,
            )?,
            residential_address: non_blank(residential_address)
                .map(|a| address(&a))
                .transpose()?,
            contract_type: contract_type.into(),
            employment_type: employment_type.into(),
            start_date: record.start_date.coerce(),
            finish_date: record.finish_date.map(Date::coerce),
            ongoing,
            salary: salary_of(salary)?,
            hours_per_week: hours_per_week.map(hours).transpose()?,
        })
    }
}

/// Partial input for updating an `Employee`.
///
/// Absent fields are left untouched, while `null` clears optional ones.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInput {
    /// New first name.
    pub first_name: Option<String>,

    /// New middle name.
    #[serde(default, deserialize_with = "nullable")]
    pub middle_name: Option<Option<String>>,

    /// New last name.
    pub last_name: Option<String>,

    /// New email address.
    pub email: Option<String>,

    /// New Australian mobile number.
    pub mobile_number: Option<String>,

    /// New residential address.
    #[serde(default, deserialize_with = "nullable")]
    pub residential_address: Option<Option<String>>,

    /// New [`ContractType`].
    pub contract_type: Option<ContractType>,

    /// New [`EmploymentType`].
    pub employment_type: Option<EmploymentType>,

    /// New start date in `YYYY-MM-DD` format.
    pub start_date: Option<String>,

    /// New finish date in `YYYY-MM-DD` format.
    #[serde(default, deserialize_with = "nullable")]
    pub finish_date: Option<Option<String>>,

    /// New indicator whether the employment has no defined end.
    pub ongoing: Option<bool>,

    /// New salary in AUD.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub salary: Option<Decimal>,

    /// New contracted working hours per week.
    #[serde(default, deserialize_with = "nullable")]
    pub hours_per_week: Option<Option<i16>>,
}

impl UpdateInput {
    /// Converts this [`UpdateInput`] into a [`command::UpdateEmployee`] of
    /// the `Employee` with the provided ID.
    ///
    /// # Errors
    ///
    /// If any of the provided values is invalid.
    pub fn into_command(
        self,
        id: domain::employee::Id,
    ) -> Result<command::UpdateEmployee, Error> {
        use domain::employee as e;

        let Self {
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

        Ok(command::UpdateEmployee {
            employee_id: id,
            first_name: first_name
                .map(|n| name(&n, InputError::FirstName))
                .transpose()?,
            middle_name: middle_name
                .map(|n| {
                    non_blank(n)
                        .map(|n| name(&n, InputError::MiddleName))
                        .transpose()
                })
                .transpose()?,
            last_name: last_name
                .map(|n| name(&n, InputError::LastName))
                .transpose()?,
            email: email
                .map(|v| parse(e::Email::new(v.trim()), InputError::Email))
                .transpose()?,
            mobile_number: mobile_number
                .map(|v| {
                    parse(
                        e::MobileNumber::new(v.trim()),
                        InputError::MobileNumber,
                    )
                })
                .transpose()?,
            residential_address: residential_address
                .map(|a| non_blank(a).map(|a| address(&a)).transpose())
                .transpose()?,
            contract_type: contract_type.map(Into::into),
            employment_type: employment_type.map(Into::into),
            start_date: start_date
                .map(|d| Field::StartDate.parse(&d).map(Date::coerce))
                .transpose()
                .map_err(AsError::into_error)?,
            finish_date: finish_date
                .map(|d| {
                    non_blank(d)
                        .map(|d| Field::FinishDate.parse(&d).map(Date::coerce))
                        .transpose()
                })
                .transpose()
                .map_err(AsError::into_error)?,
            ongoing,
            salary: salary.map(salary_of).transpose()?,
            hours_per_week: hours_per_week
                .map(|h| h.map(hours).transpose())
                .transpose()?,
        })
    }
}

/// Raw employment term to derive a [`Status`] of.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInput {
    /// Start date in `YYYY-MM-DD` format.
    pub start_date: String,

    /// Finish date in `YYYY-MM-DD` format, if any.
    pub finish_date: Option<String>,

    /// Indicator whether the employment has no defined end.
    #[serde(default)]
    pub ongoing: bool,

    /// [`ContractType`] of the employment.
    pub contract_type: ContractType,
}

impl StatusInput {
    /// Derives the [`Status`] of this [`StatusInput`] at the `now` moment.
    ///
    /// # Errors
    ///
    /// If the dates cannot be parsed or the employment ends before it starts.
    pub fn derive(&self, now: DateTime) -> Result<Status, Error> {
        let record = status::Record::parse(
            &self.start_date,
            self.finish_date.as_deref(),
            self.ongoing,
            self.contract_type.into(),
        )
        .map_err(AsError::into_error)?;
        status::DerivedStatus::compute(&record, now)
            .map(Status::from)
            .map_err(AsError::into_error)
    }
}

/// Deserializes a field distinguishing an explicit `null` from an absent
/// value.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Filters out blank strings, as forms submit them for empty fields.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Turns an invalid (absent) `value` into the provided [`InputError`].
fn parse<T>(value: Option<T>, err: InputError) -> Result<T, Error> {
    value.ok_or_else(|| err.into())
}

/// Parses a [`domain::employee::Name`] out of the provided `value`.
fn name(
    value: &str,
    err: InputError,
) -> Result<domain::employee::Name, Error> {
    parse(domain::employee::Name::new(value.trim()), err)
}

/// Parses a [`domain::employee::Address`] out of the provided `value`.
fn address(value: &str) -> Result<domain::employee::Address, Error> {
    parse(
        domain::employee::Address::new(value.trim()),
        InputError::ResidentialAddress,
    )
}

/// Parses a [`domain::employee::Salary`] out of the provided AUD `amount`.
fn salary_of(amount: Decimal) -> Result<domain::employee::Salary, Error> {
    parse(
        domain::employee::Salary::new(Money::new(amount, Currency::Aud)),
        InputError::Salary,
    )
}

/// Parses [`domain::employee::HoursPerWeek`] out of the provided `value`.
fn hours(value: i16) -> Result<domain::employee::HoursPerWeek, Error> {
    parse(
        domain::employee::HoursPerWeek::new(value),
        InputError::HoursPerWeek,
    )
}

define_error! {
    enum InputError {
        #[code = "INVALID_FIRST_NAME"]
        #[status = BAD_REQUEST]
        #[message = "First name must be non-empty and at most 100 characters"]
        FirstName,

        #[code = "INVALID_MIDDLE_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Middle name must be at most 100 characters"]
        MiddleName,

        #[code = "INVALID_LAST_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Last name must be non-empty and at most 100 characters"]
        LastName,

        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Email must be a valid address of at most 100 characters"]
        Email,

        #[code = "INVALID_MOBILE_NUMBER"]
        #[status = BAD_REQUEST]
        #[message = "Mobile number must be `+61` followed by 9 digits"]
        MobileNumber,

        #[code = "INVALID_RESIDENTIAL_ADDRESS"]
        #[status = BAD_REQUEST]
        #[message = "Residential address must be at most 512 characters"]
        ResidentialAddress,

        #[code = "INVALID_SALARY"]
        #[status = BAD_REQUEST]
        #[message = "Salary must be positive"]
        Salary,

        #[code = "INVALID_HOURS_PER_WEEK"]
        #[status = BAD_REQUEST]
        #[message = "Hours per week must be between 1 and 168"]
        HoursPerWeek,
    }
}

/// Lists `Employee`s matching the provided [`ListParams`].
///
/// # Errors
///
/// If the [`ListParams`] are invalid or the listing fails.
#[tracing::instrument(skip_all, fields(params = ?params))]
pub async fn list(
    Extension(service): Extension<Service>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Employee>>, Error> {
    let Query(params) = params.map_err(AsError::into_error)?;
    list_by(&service, params.into()).await
}

/// Searches `Employee`s by the provided keyword.
///
/// # Errors
///
/// If no keyword is provided or the listing fails.
#[tracing::instrument(skip_all, fields(params = ?params))]
pub async fn search(
    Extension(service): Extension<Service>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Employee>>, Error> {
    let Query(SearchParams { keyword }) =
        params.map_err(AsError::into_error)?;
    list_by(
        &service,
        list::Filter {
            keyword: list::Keyword::new(keyword),
            ..list::Filter::default()
        },
    )
    .await
}

/// Lists `Employee`s having the provided [`EmploymentType`].
///
/// # Errors
///
/// If the [`EmploymentType`] is unknown or the listing fails.
#[tracing::instrument(skip_all, fields(kind = ?kind))]
pub async fn list_by_employment_type(
    Extension(service): Extension<Service>,
    kind: Result<Path<EmploymentType>, PathRejection>,
) -> Result<Json<Vec<Employee>>, Error> {
    let Path(kind) = kind.map_err(AsError::into_error)?;
    list_by(
        &service,
        list::Filter {
            employment_type: Some(kind.into()),
            ..list::Filter::default()
        },
    )
    .await
}

/// Lists `Employee`s having the provided [`ContractType`].
///
/// # Errors
///
/// If the [`ContractType`] is unknown or the listing fails.
#[tracing::instrument(skip_all, fields(kind = ?kind))]
pub async fn list_by_contract_type(
    Extension(service): Extension<Service>,
    kind: Result<Path<ContractType>, PathRejection>,
) -> Result<Json<Vec<Employee>>, Error> {
    let Path(kind) = kind.map_err(AsError::into_error)?;
    list_by(
        &service,
        list::Filter {
            contract_type: Some(kind.into()),
            ..list::Filter::default()
        },
    )
    .await
}

/// Lists `Employee`s matching the provided [`list::Filter`].
async fn list_by(
    service: &Service,
    filter: list::Filter,
) -> Result<Json<Vec<Employee>>, Error> {
    let employees = service
        .execute(query::employees::List::by(filter))
        .await
        .map_err(AsError::into_error)?;

    let now = DateTime::now();
    Ok(Json(
        employees.into_iter().map(|e| Employee::at(e, now)).collect(),
    ))
}

/// Counts all the `Employee`s.
///
/// # Errors
///
/// If the counting fails.
#[tracing::instrument(skip_all)]
pub async fn count(
    Extension(service): Extension<Service>,
) -> Result<Json<Count>, Error> {
    let count = service
        .execute(query::employees::TotalCount::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(Count {
        count: count.into(),
    }))
}

/// Returns the `Employee` with the provided ID.
///
/// # Errors
///
/// If the `Employee` doesn't exist.
#[tracing::instrument(skip_all, fields(id = ?id))]
pub async fn get(
    Extension(service): Extension<Service>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Employee>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let employee = service
        .execute(query::employee::ById::by(id.into()))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| Error::from(api::EmployeeError::NotExists))?;
    Ok(Json(Employee::at(employee, DateTime::now())))
}

/// Creates a new `Employee`.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_*` - provided value of the field is invalid;
/// - `INVALID_DATE` - provided date cannot be parsed;
/// - `FINISH_BEFORE_START` - finish date precedes the start date;
/// - `ONGOING_CONTRACT` - contract employment cannot be ongoing;
/// - `EMAIL_OCCUPIED` - email is used by another `Employee`.
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    input: Result<Json<CreateInput>, JsonRejection>,
) -> Result<(http::StatusCode, Json<Employee>), Error> {
    let Json(input) = input.map_err(AsError::into_error)?;
    let employee = service
        .execute(command::CreateEmployee::try_from(input)?)
        .await
        .map_err(AsError::into_error)?;

    log::info!("created `Employee(id: {})`", employee.id);
    Ok((
        http::StatusCode::CREATED,
        Json(Employee::at(employee, DateTime::now())),
    ))
}

/// Updates the `Employee` with the provided ID partially.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_*` - provided value of the field is invalid;
/// - `INVALID_DATE` - provided date cannot be parsed;
/// - `EMPLOYEE_NOT_EXISTS` - `Employee` doesn't exist;
/// - `FINISH_BEFORE_START` - finish date precedes the start date;
/// - `ONGOING_CONTRACT` - contract employment cannot be ongoing;
/// - `EMAIL_OCCUPIED` - email is used by another `Employee`.
#[tracing::instrument(skip_all, fields(id = ?id))]
pub async fn update(
    Extension(service): Extension<Service>,
    id: Result<Path<Uuid>, PathRejection>,
    input: Result<Json<UpdateInput>, JsonRejection>,
) -> Result<Json<Employee>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let Json(input) = input.map_err(AsError::into_error)?;
    let employee = service
        .execute(input.into_command(id.into())?)
        .await
        .map_err(AsError::into_error)?;

    log::info!("updated `Employee(id: {})`", employee.id);
    Ok(Json(Employee::at(employee, DateTime::now())))
}

/// Deletes the `Employee` with the provided ID.
///
/// # Errors
///
/// Possible error codes:
/// - `EMPLOYEE_NOT_EXISTS` - `Employee` doesn't exist;
/// - `EMPLOYEE_ONGOING` - ongoing `Employee` cannot be deleted.
#[tracing::instrument(skip_all, fields(id = ?id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Employee>, Error> {
    let Path(id) = id.map_err(AsError::into_error)?;
    let employee = service
        .execute(command::DeleteEmployee {
            employee_id: id.into(),
        })
        .await
        .map_err(AsError::into_error)?;

    log::info!("deleted `Employee(id: {})`", employee.id);
    Ok(Json(Employee::at(employee, DateTime::now())))
}

/// Derives the [`Status`] of the provided raw employment term, without
/// storing anything.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_DATE` - provided date cannot be parsed;
/// - `NEGATIVE_DURATION` - employment ends before it starts.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
#[tracing::instrument(skip_all)]
pub async fn preview_status(
    input: Result<Json<StatusInput>, JsonRejection>,
) -> Result<Json<Status>, Error> {
    let Json(input) = input.map_err(AsError::into_error)?;
    input.derive(DateTime::now()).map(Json)
}

impl AsError for status::InvalidInput {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Unparseable { .. } => Error::bad_request("INVALID_DATE", self),
            Self::NegativeDuration { .. } => {
                Error::bad_request("NEGATIVE_DURATION", self)
            }
        })
    }
}

impl AsError for TermViolation {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "FINISH_BEFORE_START"]
                #[status = BAD_REQUEST]
                #[message = "Finish date must not precede the start date"]
                FinishBeforeStart,

                #[code = "ONGOING_CONTRACT"]
                #[status = BAD_REQUEST]
                #[message = "Contract employment cannot be ongoing"]
                OngoingContract,
            }
        }

        Some(match self {
            Self::FinishBeforeStart { .. } => Error::FinishBeforeStart.into(),
            Self::OngoingContract => Error::OngoingContract.into(),
        })
    }
}

define_error! {
    enum EmailError {
        #[code = "EMAIL_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Email is used by another `Employee`"]
        Occupied,
    }
}

impl AsError for command::create_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(EmailError::Occupied.into()),
            Self::InvalidTerm(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(EmailError::Occupied.into()),
            Self::EmployeeNotExists(_) => {
                Some(api::EmployeeError::NotExists.into())
            }
            Self::InvalidTerm(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMPLOYEE_ONGOING"]
                #[status = CONFLICT]
                #[message = "`Employee` with ongoing employment cannot be \
                             deleted"]
                Ongoing,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EmployeeNotExists(_) => api::EmployeeError::NotExists.into(),
            Self::EmployeeOngoing(_) => Error::Ongoing.into(),
        })
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, DateTime, Money};
    use rust_decimal::Decimal;
    use serde_json::json;
    use service::domain::{self, employee as e};

    use super::{CreateInput, Employee, Status, StatusInput, UpdateInput};

    fn employee() -> domain::Employee {
        domain::Employee {
            id: e::Id::new(),
            first_name: e::Name::new("Jane").unwrap(),
            middle_name: None,
            last_name: e::Name::new("Doe").unwrap(),
            email: e::Email::new("jane.doe@example.com").unwrap(),
            mobile_number: e::MobileNumber::new("+61 412345678").unwrap(),
            residential_address: None,
            contract_type: e::ContractType::Contract,
            employment_type: e::EmploymentType::FullTime,
            start_date: Date::from_iso8601("2023-01-15").unwrap().coerce(),
            finish_date: Some(
                Date::from_iso8601("2024-06-30").unwrap().coerce(),
            ),
            ongoing: false,
            salary: e::Salary::new(Money::new(
                Decimal::from(85_000),
                Currency::Aud,
            ))
            .unwrap(),
            hours_per_week: Some(e::HoursPerWeek::new(38).unwrap()),
            created_at: DateTime::from_rfc3339("2023-01-10T09:00:00Z")
                .unwrap()
                .coerce(),
        }
    }

    fn now() -> DateTime {
        DateTime::from_rfc3339("2024-06-25T12:00:00Z").unwrap()
    }

    #[test]
    fn serializes_employee_with_status() {
        let json =
            serde_json::to_value(Employee::at(employee(), now())).unwrap();

        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["middleName"], serde_json::Value::Null);
        assert_eq!(json["mobileNumber"], "+61 412345678");
        assert_eq!(json["contractType"], "CONTRACT");
        assert_eq!(json["employmentType"], "FULL_TIME");
        assert_eq!(json["startDate"], "2023-01-15");
        assert_eq!(json["finishDate"], "2024-06-30");
        assert_eq!(json["salary"], 85_000.0);
        assert_eq!(json["hoursPerWeek"], 38);
        assert_eq!(json["tenure"], "1 year 5 months");
        assert_eq!(json["tenureYears"], 1);
        assert_eq!(json["tenureMonths"], 5);
        assert_eq!(json["contractExpiry"], "Contract expires in 5 days");
        assert_eq!(json["onProbation"], false);
        assert_eq!(json["hasWorkAnniversary"], false);
    }

    #[test]
    fn leaves_underivable_status_unknown() {
        let mut employee = employee();
        employee.finish_date =
            Some(Date::from_iso8601("2022-12-31").unwrap().coerce());

        let dto = Employee::at(employee, now());

        assert_eq!(dto.status, Status::default());
        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["tenure"], serde_json::Value::Null);
        assert_eq!(json["onProbation"], serde_json::Value::Null);
    }

    #[test]
    fn serializes_not_started_employee_with_zero_tenure() {
        let mut employee = employee();
        employee.contract_type = e::ContractType::Permanent;
        employee.start_date =
            Date::from_iso8601("2024-07-01").unwrap().coerce();
        employee.finish_date = None;
        employee.ongoing = true;

        let json =
            serde_json::to_value(Employee::at(employee, now())).unwrap();

        assert_eq!(json["tenure"], "");
        assert_eq!(json["tenureYears"], 0);
        assert_eq!(json["onProbation"], false);
        assert_eq!(json["contractExpiry"], serde_json::Value::Null);
    }

    #[test]
    fn converts_create_input() {
        let input: CreateInput = serde_json::from_value(json!({
            "firstName": " Jane ",
            "middleName": "",
            "lastName": "Doe",
            "email": "jane.doe@example.com",
            "mobileNumber": "+61412345678",
            "contractType": "PERMANENT",
            "employmentType": "PART_TIME",
            "startDate": "2023-01-15",
            "finishDate": "",
            "ongoing": true,
            "salary": 72000.5,
            "hoursPerWeek": 20,
        }))
        .unwrap();

        let cmd = service::command::CreateEmployee::try_from(input).unwrap();

        assert_eq!(cmd.first_name.to_string(), "Jane");
        assert!(cmd.middle_name.is_none());
        assert!(cmd.finish_date.is_none());
        assert_eq!(cmd.employment_type, e::EmploymentType::PartTime);
        assert_eq!(cmd.salary.amount().amount, Decimal::new(720_005, 1));
    }

    #[test]
    fn rejects_invalid_create_input() {
        let input = |email: &str, start: &str| -> CreateInput {
            serde_json::from_value(json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": email,
                "mobileNumber": "+61412345678",
                "contractType": "PERMANENT",
                "employmentType": "FULL_TIME",
                "startDate": start,
                "salary": 1000.0,
            }))
            .unwrap()
        };

        let err = service::command::CreateEmployee::try_from(input(
            "not-an-email",
            "2023-01-15",
        ))
        .unwrap_err();
        assert_eq!(err.code, "INVALID_EMAIL");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);

        let err = service::command::CreateEmployee::try_from(input(
            "jane@example.com",
            "15/01/2023",
        ))
        .unwrap_err();
        assert_eq!(err.code, "INVALID_DATE");
    }

    #[test]
    fn distinguishes_absent_and_null_updates() {
        let input: UpdateInput = serde_json::from_value(json!({
            "lastName": "Roe",
            "finishDate": null,
            "hoursPerWeek": 30,
        }))
        .unwrap();

        let cmd = input.into_command(e::Id::new()).unwrap();

        assert_eq!(
            cmd.last_name.map(|n| n.to_string()).as_deref(),
            Some("Roe"),
        );
        assert!(cmd.first_name.is_none());
        assert!(cmd.middle_name.is_none());
        assert_eq!(cmd.finish_date, Some(None));
        assert_eq!(cmd.hours_per_week.flatten().map(i16::from), Some(30));
        assert!(cmd.salary.is_none());
    }

    #[test]
    fn previews_status() {
        let input: StatusInput = serde_json::from_value(json!({
            "startDate": "2024-03-01",
            "ongoing": true,
            "contractType": "PERMANENT",
        }))
        .unwrap();

        let status = input.derive(now()).unwrap();

        assert_eq!(status.tenure.as_deref(), Some("3 months"));
        assert_eq!(status.on_probation, Some(true));
        assert_eq!(status.contract_expiry, None);

        let input: StatusInput = serde_json::from_value(json!({
            "startDate": "2024-03-01",
            "finishDate": "2024-02-01",
            "contractType": "CONTRACT",
        }))
        .unwrap();
        let err = input.derive(now()).unwrap_err();
        assert_eq!(err.code, "NEGATIVE_DURATION");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }
}
