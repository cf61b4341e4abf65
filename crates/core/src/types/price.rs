//! Catalogue price using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reasons a price is rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative")]
    Negative,
    #[error("price cannot exceed 9999999999.99")]
    TooLarge,
    #[error("price cannot have more than 2 decimal places")]
    TooPrecise,
}

/// Decimal places kept by the `NUMERIC(12, 2)` column.
const SCALE: u32 = 2;
/// Largest amount the column holds, in cents.
const MAX_CENTS: i64 = 999_999_999_999;

/// A non-negative product price in the shop's currency.
///
/// Serialized as a plain JSON number (`1299.5`), stored as `NUMERIC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero,
    /// [`PriceError::TooLarge`] past `9999999999.99` and
    /// [`PriceError::TooPrecise`] for fractions of a cent.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        let amount = amount.normalize();
        if amount.scale() > SCALE {
            return Err(PriceError::TooPrecise);
        }
        if amount > Decimal::new(MAX_CENTS, SCALE) {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(amount))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Two-decimal display form, e.g. `1299.50`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
