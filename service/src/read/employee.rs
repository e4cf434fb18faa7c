//! [`Employee`]-related read definitions.

#[cfg(doc)]
use crate::domain::Employee;

pub mod list {
    //! [`Employee`] list definitions.

    use derive_more::{AsRef, Display, From, Into};

    use crate::domain::employee::{ContractType, EmploymentType};
    #[cfg(doc)]
    use crate::domain::{employee, Employee};

    /// Filter of an [`Employee`] list.
    ///
    /// Listed [`Employee`]s are ordered by their last names, then by their
    /// first names.
    #[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Filter {
        /// [`EmploymentType`] the listed [`Employee`]s must have.
        pub employment_type: Option<EmploymentType>,

        /// [`ContractType`] the listed [`Employee`]s must have.
        pub contract_type: Option<ContractType>,

        /// [`Keyword`] to search the listed [`Employee`]s by.
        pub keyword: Option<Keyword>,
    }

    /// Keyword to search [`Employee`]s by.
    ///
    /// Matches case-insensitively any part of an [`employee::Name`] (first or
    /// last one) or an [`employee::Email`].
    #[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
    #[as_ref(str)]
    pub struct Keyword(String);

    impl Keyword {
        /// Creates a new [`Keyword`] out of the provided `input`.
        ///
        /// [`None`] is returned if the `input` is blank.
        #[must_use]
        pub fn new(input: impl AsRef<str>) -> Option<Self> {
            let input = input.as_ref().trim();
            (!input.is_empty()).then(|| Self(input.to_lowercase()))
        }

        /// Checks whether the provided `text` matches this [`Keyword`].
        #[must_use]
        pub fn matches(&self, text: impl AsRef<str>) -> bool {
            text.as_ref().to_lowercase().contains(&self.0)
        }
    }

    /// Total count of [`Employee`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i64);

}
