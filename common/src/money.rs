//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Indicates whether this [`Money`] amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        let amount = amount.normalize();
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Australian Dollar."]
        Aud = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Euro."]
        Eur = 3,
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("85000.50AUD").unwrap(),
            Money::new(decimal("85000.50"), Currency::Aud),
        );
        assert_eq!(
            Money::from_str("123.45EUR").unwrap(),
            Money::new(decimal("123.45"), Currency::Eur),
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Au").is_err());
        assert!(Money::from_str("123.45Audollar").is_err());
        assert!(Money::from_str("AUD").is_err());

        assert!(Money::from_str("123.00AUD").is_ok());
        assert!(Money::from_str("123AUD").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money::new(decimal("85000.50"), Currency::Aud).to_string(),
            "85000.5AUD",
        );
        assert_eq!(
            Money::new(decimal("123.00"), Currency::Usd).to_string(),
            "123USD",
        );
        assert_eq!(
            Money::new(decimal("123"), Currency::Aud).to_string(),
            "123AUD",
        );
    }

    #[test]
    fn positiveness() {
        assert!(Money::new(decimal("0.01"), Currency::Aud).is_positive());
        assert!(!Money::new(decimal("0"), Currency::Aud).is_positive());
        assert!(!Money::new(decimal("-10"), Currency::Aud).is_positive());
    }
}
