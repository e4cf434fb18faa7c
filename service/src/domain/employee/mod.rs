//! [`Employee`] definitions.

pub mod status;

use std::sync::LazyLock;

use common::{define_kind, unit, DateOf, DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::status::DerivedStatus;

/// Employee of the organization.
#[derive(Clone, Debug)]
pub struct Employee {
    /// ID of this [`Employee`].
    pub id: Id,

    /// First [`Name`] of this [`Employee`].
    pub first_name: Name,

    /// Middle [`Name`] of this [`Employee`], if any.
    pub middle_name: Option<Name>,

    /// Last [`Name`] of this [`Employee`].
    pub last_name: Name,

    /// [`Email`] of this [`Employee`].
    pub email: Email,

    /// [`MobileNumber`] of this [`Employee`].
    pub mobile_number: MobileNumber,

    /// Residential [`Address`] of this [`Employee`], if known.
    pub residential_address: Option<Address>,

    /// [`ContractType`] of this [`Employee`].
    pub contract_type: ContractType,

    /// [`EmploymentType`] of this [`Employee`].
    pub employment_type: EmploymentType,

    /// [`Date`] when this [`Employee`] started working.
    ///
    /// [`Date`]: common::Date
    pub start_date: StartDate,

    /// [`Date`] when this [`Employee`] finishes (or finished) working, if
    /// recorded.
    ///
    /// [`Date`]: common::Date
    pub finish_date: Option<FinishDate>,

    /// Indicator whether employment of this [`Employee`] has no defined end.
    pub ongoing: bool,

    /// [`Salary`] of this [`Employee`].
    pub salary: Salary,

    /// Contracted [`HoursPerWeek`] of this [`Employee`], if any.
    pub hours_per_week: Option<HoursPerWeek>,

    /// [`DateTime`] when this [`Employee`] was created.
    pub created_at: CreationDateTime,
}

impl Employee {
    /// Returns the [`status::Record`] describing employment term of this
    /// [`Employee`].
    #[must_use]
    pub fn record(&self) -> status::Record {
        status::Record {
            start_date: self.start_date.coerce(),
            finish_date: self.finish_date.map(FinishDate::coerce),
            ongoing: self.ongoing,
            contract_type: self.contract_type,
        }
    }

    /// Derives the [`DerivedStatus`] of this [`Employee`] at the provided
    /// moment.
    ///
    /// # Errors
    ///
    /// If the employment term of this [`Employee`] is inconsistent.
    pub fn status(
        &self,
        now: DateTime,
    ) -> Result<DerivedStatus, status::InvalidInput> {
        DerivedStatus::compute(&self.record(), now)
    }

    /// Checks the employment term invariants of this [`Employee`].
    ///
    /// # Errors
    ///
    /// With the first violated invariant.
    pub fn check_term(&self) -> Result<(), TermViolation> {
        if let Some(finish) = self.finish_date {
            if finish.coerce::<()>() < self.start_date.coerce() {
                return Err(TermViolation::FinishBeforeStart {
                    start: self.start_date,
                    finish,
                });
            }
        }
        if self.ongoing && self.contract_type == ContractType::Contract {
            return Err(TermViolation::OngoingContract);
        }
        Ok(())
    }
}

/// Violation of an [`Employee`] employment term invariant.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum TermViolation {
    /// Finish date precedes the start date.
    #[display("finish date `{finish}` precedes start date `{start}`")]
    FinishBeforeStart {
        /// Start date of the employment.
        start: StartDate,

        /// Finish date of the employment.
        finish: FinishDate,
    },

    /// [`ContractType::Contract`] employment is marked as ongoing.
    #[display("`CONTRACT` employment cannot be ongoing")]
    OngoingContract,
}

/// ID of an [`Employee`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Personal name (first, middle or last) of an [`Employee`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Maximum length of a [`Name`] in characters.
    pub const MAX_LEN: usize = 100;

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name
            && !name.is_empty()
            && name.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of an [`Employee`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Maximum length of an [`Email`] in characters.
    pub const MAX_LEN: usize = 100;

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format: a local part, a
        /// single `@` and a dotted domain, no whitespace anywhere.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
                .expect("valid regex")
        });

        let address = address.as_ref();
        address.chars().count() <= Self::MAX_LEN && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Australian mobile number of an [`Employee`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Creates a new [`MobileNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`MobileNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`MobileNumber`] format: `+61`
        /// country code, optionally followed by a whitespace, and 9 digits.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+61\s?\d{9}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for MobileNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `MobileNumber`")
    }
}

/// Residential address of an [`Employee`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Address(String);

impl Address {
    /// Maximum length of an [`Address`] in characters.
    pub const MAX_LEN: usize = 512;

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address
            && !address.is_empty()
            && address.chars().count() <= Self::MAX_LEN
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Salary of an [`Employee`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Salary(Money);

impl Salary {
    /// Creates a new [`Salary`] if the given `amount` is positive.
    #[must_use]
    pub fn new(amount: Money) -> Option<Self> {
        amount.is_positive().then_some(Self(amount))
    }

    /// Creates a new [`Salary`] without checking the `amount`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `amount` is positive.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(amount: Money) -> Self {
        Self(amount)
    }

    /// Returns the [`Money`] amount of this [`Salary`].
    #[must_use]
    pub fn amount(&self) -> Money {
        self.0
    }
}

/// Number of working hours per week of an [`Employee`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct HoursPerWeek(i16);

impl HoursPerWeek {
    /// Creates a new [`HoursPerWeek`] if the given `hours` fit into a week.
    #[must_use]
    pub fn new(hours: i16) -> Option<Self> {
        (1..=24 * 7).contains(&hours).then_some(Self(hours))
    }
}

define_kind! {
    #[doc = "Type of an [`Employee`] contract."]
    enum ContractType {
        #[doc = "Permanent employment."]
        Permanent = 1,

        #[doc = "Fixed-term contract employment."]
        Contract = 2,
    }
}

define_kind! {
    #[doc = "Type of an [`Employee`] working schedule."]
    enum EmploymentType {
        #[doc = "Full-time employment."]
        FullTime = 1,

        #[doc = "Part-time employment."]
        PartTime = 2,
    }
}

/// Marker type indicating an employment start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type indicating an employment finish.
#[derive(Clone, Copy, Debug)]
pub struct Finish;

/// [`Date`] when an [`Employee`] started working.
///
/// [`Date`]: common::Date
pub type StartDate = DateOf<(Employee, Start)>;

/// [`Date`] when an [`Employee`] finishes working.
///
/// [`Date`]: common::Date
pub type FinishDate = DateOf<(Employee, Finish)>;

/// [`DateTime`] when an [`Employee`] was created.
pub type CreationDateTime = DateTimeOf<(Employee, unit::Creation)>;
