//! [`SearchPattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

use crate::read::employee::list::Keyword;

/// `LIKE` pattern matching any text containing a [`Keyword`].
///
/// Meant to be matched against lowercased text with the default `\` escape
/// character.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct SearchPattern(String);

impl SearchPattern {
    /// Creates a new [`SearchPattern`] out of the provided [`Keyword`].
    #[must_use]
    pub fn new(keyword: &Keyword) -> Self {
        let mut pattern = String::with_capacity(keyword.as_ref().len() + 2);
        pattern.push('%');
        for c in keyword.as_ref().chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Self(pattern)
    }
}
