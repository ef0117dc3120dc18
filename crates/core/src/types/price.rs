//! Type-safe price representation.
//!
//! Prices are stored as an integer count of the smallest currency unit
//! (cents). The storefront is currency-agnostic; display formatting assumes
//! a two-decimal currency with a `$` symbol, which is what the catalog uses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the smallest currency unit (cents).
///
/// Arithmetic on prices stays in integer cents; conversion to a decimal
/// amount happens only at display boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from a cent amount.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// The amount as a two-decimal value (e.g. `6.96` for 696 cents).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Multiply by a line quantity, saturating on overflow.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// Sum with another price, saturating on overflow.
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Format for display (e.g. `$6.96`).
    #[must_use]
    pub fn display(self) -> String {
        format!("${}", self.to_decimal())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(cents))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_cents_as_dollars() {
        assert_eq!(Price::from_cents(696).display(), "$6.96");
        assert_eq!(Price::from_cents(104_313).display(), "$1043.13");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn line_totals_multiply_by_quantity() {
        let unit = Price::from_cents(39_920);
        assert_eq!(unit.times(3), Price::from_cents(119_760));
    }

    #[test]
    fn ordering_follows_cent_amounts() {
        assert!(Price::from_cents(100) < Price::from_cents(101));
    }

    #[test]
    fn serde_is_transparent() {
        let price = Price::from_cents(696);
        assert_eq!(serde_json::to_string(&price).expect("serialize"), "696");
    }
}
