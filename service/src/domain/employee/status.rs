//! Derivation of an [`Employee`]'s employment status.
//!
//! Everything here is a pure function of its arguments: the current moment
//! is always provided by the caller and never read from the wall clock.
//!
//! [`Employee`]: super::Employee

use std::fmt;

use common::{datetime::ParseError, Date, DateTime};
use derive_more::{Display, Error};

use super::ContractType;

/// Number of months an [`Employee`] stays on probation after starting.
///
/// [`Employee`]: super::Employee
pub const PROBATION_MONTHS: u32 = 6;

/// Employment term data the status is derived from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Record {
    /// [`Date`] when the employment started.
    pub start_date: Date,

    /// [`Date`] when the employment finishes, if recorded.
    pub finish_date: Option<Date>,

    /// Indicator whether the employment has no defined end, regardless of
    /// the [`Record::finish_date`].
    pub ongoing: bool,

    /// [`ContractType`] of the employment.
    pub contract_type: ContractType,
}

impl Record {
    /// Parses a [`Record`] out of raw date strings.
    ///
    /// A blank `finish_date` is considered as absent.
    ///
    /// # Errors
    ///
    /// With [`InvalidInput::Unparseable`] if any of the provided dates cannot
    /// be parsed.
    pub fn parse(
        start_date: &str,
        finish_date: Option<&str>,
        ongoing: bool,
        contract_type: ContractType,
    ) -> Result<Self, InvalidInput> {
        Ok(Self {
            start_date: Field::StartDate.parse(start_date)?,
            finish_date: finish_date
                .filter(|s| !s.trim().is_empty())
                .map(|s| Field::FinishDate.parse(s))
                .transpose()?,
            ongoing,
            contract_type,
        })
    }

    /// Returns the [`Date`] the employment effectively finishes at.
    ///
    /// [`None`] for ongoing employment, even if a finish [`Date`] is
    /// recorded.
    #[must_use]
    pub fn effective_finish_date(&self) -> Option<Date> {
        (!self.ongoing).then_some(self.finish_date).flatten()
    }
}

/// Field of a [`Record`] carrying a date.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Field {
    /// [`Record::start_date`].
    #[display("start date")]
    StartDate,

    /// [`Record::finish_date`].
    #[display("finish date")]
    FinishDate,
}

impl Field {
    /// Parses the raw `input` provided for this [`Field`] into a [`Date`].
    ///
    /// # Errors
    ///
    /// With [`InvalidInput::Unparseable`] if the `input` is not a date.
    pub fn parse(self, input: &str) -> Result<Date, InvalidInput> {
        Date::from_iso8601(input).map_err(|source| InvalidInput::Unparseable {
            field: self,
            input: input.to_owned(),
            source,
        })
    }
}

/// Invalid input of a status derivation.
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum InvalidInput {
    /// Provided date cannot be parsed.
    #[display("{field} `{input}` is not a valid date: {source}")]
    Unparseable {
        /// [`Field`] the date was provided for.
        field: Field,

        /// Raw input that failed to parse.
        input: String,

        /// Parsing error.
        source: ParseError,
    },

    /// Employment ends before it starts.
    #[display("employment ends at `{end}` before it starts at `{start}`")]
    NegativeDuration {
        /// [`Date`] the employment starts at.
        start: Date,

        /// [`Date`] the employment ends at.
        end: Date,
    },
}

/// Length of an employment.
///
/// Only month indices are compared, so any partial month counts as a whole
/// one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tenure {
    /// Number of whole years.
    pub years: u32,

    /// Number of months on top of [`Tenure::years`], in `0..=11` range.
    pub months: u8,
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: u32| if n == 1 { "" } else { "s" };

        let Self { years, months } = *self;
        let months = u32::from(months);
        match (years, months) {
            (0, 0) => Ok(()),
            (y, 0) => write!(f, "{y} year{}", plural(y)),
            (0, m) => write!(f, "{m} month{}", plural(m)),
            (y, m) => {
                write!(f, "{y} year{} {m} month{}", plural(y), plural(m))
            }
        }
    }
}

/// Computes the [`Tenure`] between the `start` and the `finish` dates, or
/// the `now` date, if the `finish` one is absent.
///
/// # Errors
///
/// With [`InvalidInput::NegativeDuration`] if the end precedes the `start`.
pub fn tenure(
    start: Date,
    finish: Option<Date>,
    now: DateTime,
) -> Result<Tenure, InvalidInput> {
    let end = finish.unwrap_or_else(|| now.date());
    let negative = || InvalidInput::NegativeDuration { start, end };
    if end < start {
        return Err(negative());
    }

    let mut years = end.year() - start.year();
    let mut months = i32::from(end.month()) - i32::from(start.month());
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Ok(Tenure {
        years: u32::try_from(years).map_err(|_| negative())?,
        months: u8::try_from(months).map_err(|_| negative())?,
    })
}

/// Banner describing an expiration of a [`ContractType::Contract`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContractExpiry {
    /// Contract has already expired.
    Expired,

    /// Contract expires in the provided number of days.
    ExpiresIn(u64),
}

impl fmt::Display for ContractExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Contract Expired"),
            Self::ExpiresIn(1) => write!(f, "Contract expires in 1 day"),
            Self::ExpiresIn(days) => {
                write!(f, "Contract expires in {days} days")
            }
        }
    }
}

/// Computes the [`ContractExpiry`] banner of a [`ContractType::Contract`]
/// finishing at the provided date.
///
/// Days are counted from `now` until the midnight (UTC) of the `finish`
/// date, rounding up. No banner is returned for other [`ContractType`]s or
/// when no `finish` date is recorded.
#[must_use]
pub fn contract_expiry(
    contract_type: ContractType,
    finish: Option<Date>,
    now: DateTime,
) -> Option<ContractExpiry> {
    if contract_type != ContractType::Contract {
        return None;
    }
    let days = now.days_until(finish?.start_of_day());
    Some(
        u64::try_from(days)
            .map_or(ContractExpiry::Expired, ContractExpiry::ExpiresIn),
    )
}

/// Status of an employment derived from its [`Record`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DerivedStatus {
    /// [`Tenure`] of the employment so far.
    pub tenure: Tenure,

    /// [`ContractExpiry`] banner, if any.
    pub contract_expiry: Option<ContractExpiry>,

    /// Indicator whether the employee is on probation.
    pub on_probation: bool,

    /// Indicator whether the employee has a work anniversary this month.
    pub has_work_anniversary: bool,
}

impl DerivedStatus {
    /// Derives the [`DerivedStatus`] of the provided [`Record`] at the `now`
    /// moment.
    ///
    /// Employment starting after the `now` moment has a zero [`Tenure`].
    ///
    /// # Errors
    ///
    /// With [`InvalidInput::NegativeDuration`] if the employment ends before
    /// it starts.
    pub fn compute(
        record: &Record,
        now: DateTime,
    ) -> Result<Self, InvalidInput> {
        let finish = record.effective_finish_date();
        let today = now.date();
        let start = record.start_date;

        let tenure = match finish {
            Some(end) if end < start => {
                return Err(InvalidInput::NegativeDuration { start, end });
            }
            _ if today < start => Tenure::default(),
            _ => tenure(start, finish, now)?,
        };

        let active = start <= today && finish.map_or(true, |f| today <= f);

        let on_probation = active
            && start
                .checked_add_months(PROBATION_MONTHS)
                .map_or(true, |end| today < end);
        let has_work_anniversary = active
            && today.month() == start.month()
            && today.year() > start.year();

        Ok(Self {
            tenure,
            contract_expiry: contract_expiry(
                record.contract_type,
                record.finish_date,
                now,
            ),
            on_probation,
            has_work_anniversary,
        })
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, DateTime};

    use super::{
        contract_expiry, tenure, ContractExpiry, ContractType, DerivedStatus,
        Field, InvalidInput, Record, Tenure,
    };

    fn date(s: &str) -> Date {
        Date::from_iso8601(s).unwrap()
    }

    fn now(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn record(start: &str, finish: Option<&str>, ongoing: bool) -> Record {
        Record::parse(start, finish, ongoing, ContractType::Contract).unwrap()
    }

    #[test]
    fn tenure_between_dates() {
        let any = now("2030-06-01T00:00:00Z");

        let t = tenure(date("2020-01-15"), Some(date("2023-03-10")), any)
            .unwrap();
        assert_eq!(t, Tenure { years: 3, months: 2 });
        assert_eq!(t.to_string(), "3 years 2 months");

        let t = tenure(date("2022-06-01"), Some(date("2023-05-01")), any)
            .unwrap();
        assert_eq!(t, Tenure { years: 0, months: 11 });
        assert_eq!(t.to_string(), "11 months");
    }

    #[test]
    fn tenure_until_now() {
        let n = now("2023-03-10T15:00:00Z");

        let t = tenure(date("2023-03-10"), None, n).unwrap();
        assert_eq!(t, Tenure::default());
        assert_eq!(t.to_string(), "");

        let t = tenure(date("2020-01-15"), None, n).unwrap();
        assert_eq!(t.to_string(), "3 years 2 months");

        let t = tenure(date("2020-02-15"), None, n).unwrap();
        assert_eq!(t.to_string(), "3 years 1 month");
    }

    #[test]
    fn tenure_ignores_day_of_month() {
        let any = now("2030-06-01T00:00:00Z");

        let t = tenure(date("2023-01-28"), Some(date("2023-02-05")), any)
            .unwrap();
        assert_eq!(t, Tenure { years: 0, months: 1 });

        let t = tenure(date("2023-01-05"), Some(date("2023-01-28")), any)
            .unwrap();
        assert_eq!(t, Tenure::default());
    }

    #[test]
    fn tenure_stays_in_range() {
        let start = date("2019-11-20");
        let mut end = start;
        for _ in 0..60 {
            let t = tenure(start, None, end.start_of_day()).unwrap();
            assert!(t.months <= 11, "{t:?} at {end}");
            end = end.checked_add_months(1).unwrap();
        }
        for d in 0..400 {
            let end = start.start_of_day()
                + std::time::Duration::from_secs(d * 24 * 60 * 60);
            let t = tenure(start, None, end).unwrap();
            assert!(t.months <= 11, "{t:?} at {end:?}");
        }
    }

    #[test]
    fn formats_tenure_with_plurals() {
        let fmt = |years, months| Tenure { years, months }.to_string();

        assert_eq!(fmt(0, 0), "");
        assert_eq!(fmt(1, 0), "1 year");
        assert_eq!(fmt(0, 1), "1 month");
        assert_eq!(fmt(2, 1), "2 years 1 month");
        assert_eq!(fmt(1, 2), "1 year 2 months");
        assert_eq!(fmt(5, 0), "5 years");
    }

    #[test]
    fn rejects_negative_tenure() {
        let any = now("2030-06-01T00:00:00Z");

        assert_eq!(
            tenure(date("2020-01-15"), Some(date("2020-01-01")), any),
            Err(InvalidInput::NegativeDuration {
                start: date("2020-01-15"),
                end: date("2020-01-01"),
            }),
        );
        assert!(tenure(date("2020-01-15"), Some(date("2019-12-31")), any)
            .is_err());
        assert!(tenure(
            date("2030-06-02"),
            None,
            now("2030-06-01T23:59:59Z"),
        )
        .is_err());
    }

    #[test]
    fn no_banner_for_permanent_or_open_contracts() {
        let n = now("2025-01-01T00:00:00Z");

        assert_eq!(
            contract_expiry(ContractType::Permanent, Some(date("2025-01-01")), n),
            None,
        );
        assert_eq!(
            contract_expiry(ContractType::Permanent, Some(date("2020-01-01")), n),
            None,
        );
        assert_eq!(contract_expiry(ContractType::Contract, None, n), None);
    }

    #[test]
    fn banner_for_finishing_contracts() {
        let n = now("2025-01-01T00:00:00Z");
        let banner =
            |finish| contract_expiry(ContractType::Contract, Some(date(finish)), n);

        assert_eq!(banner("2024-01-01"), Some(ContractExpiry::Expired));
        assert_eq!(
            banner("2024-01-01").unwrap().to_string(),
            "Contract Expired",
        );

        assert_eq!(banner("2025-01-10"), Some(ContractExpiry::ExpiresIn(9)));
        assert_eq!(
            banner("2025-01-10").unwrap().to_string(),
            "Contract expires in 9 days",
        );
        assert_eq!(
            banner("2025-01-02").unwrap().to_string(),
            "Contract expires in 1 day",
        );
        assert_eq!(
            banner("2025-01-01").unwrap().to_string(),
            "Contract expires in 0 days",
        );
    }

    #[test]
    fn banner_rounds_partial_days_up() {
        let n = now("2025-01-01T12:00:00Z");
        let banner =
            |finish| contract_expiry(ContractType::Contract, Some(date(finish)), n);

        assert_eq!(banner("2025-01-02"), Some(ContractExpiry::ExpiresIn(1)));
        assert_eq!(banner("2025-01-01"), Some(ContractExpiry::ExpiresIn(0)));
        assert_eq!(banner("2024-12-31"), Some(ContractExpiry::Expired));
    }

    #[test]
    fn parses_raw_records() {
        let r = Record::parse(
            "2020-01-15",
            Some("  "),
            true,
            ContractType::Permanent,
        )
        .unwrap();
        assert_eq!(r.start_date, date("2020-01-15"));
        assert_eq!(r.finish_date, None);

        let r = record("2020-01-15", Some("2021-01-15"), false);
        assert_eq!(r.finish_date, Some(date("2021-01-15")));

        assert!(matches!(
            Record::parse("15/01/2020", None, true, ContractType::Permanent),
            Err(InvalidInput::Unparseable { field: Field::StartDate, .. }),
        ));
        assert!(matches!(
            Record::parse("2020-01-15", Some("x"), false, ContractType::Contract),
            Err(InvalidInput::Unparseable { field: Field::FinishDate, .. }),
        ));
    }

    #[test]
    fn ongoing_employment_ignores_finish_date_for_tenure() {
        let n = now("2025-03-01T00:00:00Z");

        let status =
            DerivedStatus::compute(&record("2020-01-15", Some("2020-06-01"), true), n)
                .unwrap();
        assert_eq!(status.tenure, Tenure { years: 5, months: 2 });
        assert_eq!(
            status.contract_expiry,
            Some(ContractExpiry::Expired),
            "banner uses the stored finish date",
        );

        let status = DerivedStatus::compute(
            &record("2020-01-15", Some("2020-06-01"), false),
            n,
        )
        .unwrap();
        assert_eq!(status.tenure, Tenure { years: 0, months: 5 });
    }

    #[test]
    fn derives_probation() {
        let probation = |start, finish, at| {
            DerivedStatus::compute(&record(start, finish, false), now(at))
                .unwrap()
                .on_probation
        };

        assert!(probation("2024-01-31", None, "2024-01-31T00:00:00Z"));
        assert!(probation("2024-01-31", None, "2024-07-30T23:59:59Z"));
        assert!(!probation("2024-01-31", None, "2024-07-31T00:00:00Z"));
        assert!(probation("2023-08-31", None, "2024-02-28T10:00:00Z"));
        assert!(!probation("2023-08-31", None, "2024-02-29T10:00:00Z"));
        assert!(probation(
            "2024-01-01",
            Some("2024-12-31"),
            "2024-03-01T00:00:00Z",
        ));
        assert!(!probation(
            "2024-01-01",
            Some("2024-02-01"),
            "2024-03-01T00:00:00Z",
        ));
    }

    #[test]
    fn derives_work_anniversary() {
        let anniversary = |start, finish, at| {
            DerivedStatus::compute(&record(start, finish, false), now(at))
                .unwrap()
                .has_work_anniversary
        };

        assert!(anniversary("2020-03-20", None, "2023-03-01T00:00:00Z"));
        assert!(anniversary("2020-03-01", None, "2021-03-31T00:00:00Z"));
        assert!(!anniversary("2023-03-01", None, "2023-03-31T00:00:00Z"));
        assert!(!anniversary("2020-03-20", None, "2023-04-01T00:00:00Z"));
        assert!(!anniversary(
            "2020-03-20",
            Some("2022-01-01"),
            "2023-03-15T00:00:00Z",
        ));
    }

    #[test]
    fn tolerates_ongoing_contracts() {
        let n = now("2025-01-01T00:00:00Z");

        let status =
            DerivedStatus::compute(&record("2024-06-01", Some("2025-01-10"), true), n)
                .unwrap();
        assert_eq!(status.contract_expiry, Some(ContractExpiry::ExpiresIn(9)));
        assert_eq!(status.tenure, Tenure { years: 0, months: 7 });
    }

    #[test]
    fn not_started_employment_has_no_tenure_yet() {
        let n = now("2025-01-01T00:00:00Z");

        let status = DerivedStatus::compute(
            &Record::parse("2025-02-01", None, true, ContractType::Permanent)
                .unwrap(),
            n,
        )
        .unwrap();
        assert_eq!(status.tenure, Tenure::default());
        assert!(!status.on_probation);
        assert!(!status.has_work_anniversary);

        let status = DerivedStatus::compute(
            &record("2025-02-01", Some("2025-08-01"), false),
            n,
        )
        .unwrap();
        assert_eq!(status.tenure, Tenure::default());
        assert_eq!(
            status.contract_expiry,
            Some(ContractExpiry::ExpiresIn(212)),
        );

        assert_eq!(
            DerivedStatus::compute(
                &record("2025-02-01", Some("2025-01-15"), false),
                n,
            ),
            Err(InvalidInput::NegativeDuration {
                start: date("2025-02-01"),
                end: date("2025-01-15"),
            }),
        );
    }

    #[test]
    fn is_idempotent() {
        let n = now("2025-01-01T08:30:00Z");
        let r = record("2021-05-17", Some("2025-02-14"), false);

        let first = DerivedStatus::compute(&r, n).unwrap();
        let second = DerivedStatus::compute(&r, n).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            contract_expiry(r.contract_type, r.finish_date, n),
            contract_expiry(r.contract_type, r.finish_date, n),
        );
    }
}
