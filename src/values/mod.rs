//! Scalar values
//!
//! A scalar is one typed piece of text. [`ValueType`] owns the parse/format
//! pair of each supported type, [`Scalar`] holds a parsed value, and
//! [`Value`] is the handle that reads and writes a scalar at one position of
//! the document (element text, the parent's own text, or an attribute).

mod types;
mod value;

pub use types::{DATETIME_PATTERN, DATE_PATTERN, TIME_PATTERN};
pub use value::Value;

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::fmt;

/// Supported scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Text, stored verbatim
    String,
    /// Base-10 integer
    Integer,
    /// Decimal literal, plain or scientific. Backed by `rust_decimal`:
    /// precision is 28 significant digits, magnitudes beyond its 96-bit
    /// mantissa (about 7.9e28) are `InvalidValue` and surplus fractional
    /// digits are rounded.
    Decimal,
    /// Title-case boolean: `True` / `False`
    Boolean,
    /// Date, `YYYYMMDD`
    Date,
    /// Time, `HHMMSS`
    Time,
    /// Date and time, `YYYY-MM-DDTHH:MM:SS`
    DateTime,
}

impl ValueType {
    /// Type name used in type names and messages
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::Integer => "Integer",
            ValueType::Decimal => "Decimal",
            ValueType::Boolean => "Boolean",
            ValueType::Date => "Date",
            ValueType::Time => "Time",
            ValueType::DateTime => "DateTime",
        }
    }

    /// Parse raw document text. Temporal types read blank text as `None`.
    pub fn parse(self, raw: &str) -> Result<Option<Scalar>> {
        match self {
            ValueType::String => Ok(Some(Scalar::String(raw.to_string()))),
            ValueType::Integer => types::parse_integer(raw).map(|v| Some(Scalar::Integer(v))),
            ValueType::Decimal => types::parse_decimal(raw).map(|v| Some(Scalar::Decimal(v))),
            ValueType::Boolean => types::parse_boolean(raw).map(|v| Some(Scalar::Boolean(v))),
            ValueType::Date => Ok(types::parse_temporal::<NaiveDate>(raw)?.map(Scalar::Date)),
            ValueType::Time => Ok(types::parse_temporal::<NaiveTime>(raw)?.map(Scalar::Time)),
            ValueType::DateTime => {
                Ok(types::parse_temporal::<NaiveDateTime>(raw)?.map(Scalar::DateTime))
            }
        }
    }

    /// Format a scalar of this type as document text
    pub fn format(self, value: &Scalar) -> Result<String> {
        if value.value_type() != self {
            return Err(Error::type_mismatch(self.name(), value.value_type().name()));
        }
        Ok(value.to_string())
    }

    /// Check a scalar against this type. Strings are parsed with this
    /// type's grammar, so `"12"` is accepted for an integer field.
    pub fn coerce(self, value: Scalar) -> Result<Scalar> {
        match value {
            value if value.value_type() == self => Ok(value),
            Scalar::String(raw) => self.parse(&raw)?.ok_or_else(|| {
                Error::InvalidValue(format!("Invalid {}Value: {:?}", self.name(), raw))
            }),
            other => Err(Error::type_mismatch(self.name(), other.value_type().name())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed scalar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Text
    String(String),
    /// Integer
    Integer(i64),
    /// Decimal
    Decimal(Decimal),
    /// Boolean
    Boolean(bool),
    /// Date
    Date(NaiveDate),
    /// Time
    Time(NaiveTime),
    /// Date and time
    DateTime(NaiveDateTime),
}

impl Scalar {
    /// The type this scalar belongs to
    pub fn value_type(&self) -> ValueType {
        match self {
            Scalar::String(_) => ValueType::String,
            Scalar::Integer(_) => ValueType::Integer,
            Scalar::Decimal(_) => ValueType::Decimal,
            Scalar::Boolean(_) => ValueType::Boolean,
            Scalar::Date(_) => ValueType::Date,
            Scalar::Time(_) => ValueType::Time,
            Scalar::DateTime(_) => ValueType::DateTime,
        }
    }

    /// Borrow the text of a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap a string scalar
    pub fn into_string(self) -> Option<String> {
        match self {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap an integer scalar
    pub fn into_integer(self) -> Option<i64> {
        match self {
            Scalar::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap a decimal scalar
    pub fn into_decimal(self) -> Option<Decimal> {
        match self {
            Scalar::Decimal(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap a boolean scalar
    pub fn into_boolean(self) -> Option<bool> {
        match self {
            Scalar::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap a date scalar
    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            Scalar::Date(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap a time scalar
    pub fn into_time(self) -> Option<NaiveTime> {
        match self {
            Scalar::Time(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap a datetime scalar
    pub fn into_datetime(self) -> Option<NaiveDateTime> {
        match self {
            Scalar::DateTime(v) => Some(v),
            _ => None,
        }
    }
}

/// Renders the canonical document text of the scalar
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(v) => f.write_str(v),
            Scalar::Integer(v) => write!(f, "{}", v),
            Scalar::Decimal(v) => write!(f, "{}", v),
            Scalar::Boolean(v) => f.write_str(types::format_boolean(*v)),
            Scalar::Date(v) => write!(f, "{}", v.format(DATE_PATTERN)),
            Scalar::Time(v) => write!(f, "{}", v.format(TIME_PATTERN)),
            Scalar::DateTime(v) => write!(f, "{}", v.format(DATETIME_PATTERN)),
        }
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Integer(i64::from(v))
    }
}

impl From<Decimal> for Scalar {
    fn from(v: Decimal) -> Self {
        Scalar::Decimal(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(v: NaiveDate) -> Self {
        Scalar::Date(v)
    }
}

impl From<NaiveTime> for Scalar {
    fn from(v: NaiveTime) -> Self {
        Scalar::Time(v)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(v: NaiveDateTime) -> Self {
        Scalar::DateTime(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_string_is_identity() {
        assert_eq!(
            ValueType::String.parse("  Title ").unwrap(),
            Some(Scalar::from("  Title "))
        );
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(ValueType::Integer.parse(" 42 ").unwrap(), Some(Scalar::Integer(42)));
        assert_eq!(ValueType::Integer.parse("-7").unwrap(), Some(Scalar::Integer(-7)));
        assert!(ValueType::Integer.parse("4.2").unwrap_err().is_invalid_value());
        assert!(ValueType::Integer.parse("").unwrap_err().is_invalid_value());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(
            ValueType::Decimal.parse("153.0234").unwrap(),
            Some(Scalar::Decimal(Decimal::from_str("153.0234").unwrap()))
        );
        assert_eq!(
            ValueType::Decimal.parse("1.5e3").unwrap(),
            Some(Scalar::Decimal(Decimal::from(1500)))
        );
        assert!(ValueType::Decimal.parse("east").unwrap_err().is_invalid_value());
    }

    #[test]
    fn test_parse_decimal_beyond_precision() {
        let widest = "79228162514264337593543950335";
        assert_eq!(
            ValueType::Decimal.parse(widest).unwrap(),
            Some(Scalar::Decimal(Decimal::MAX))
        );
        assert!(ValueType::Decimal
            .parse("123456789012345678901234567890")
            .unwrap_err()
            .is_invalid_value());
    }

    #[test]
    fn test_parse_boolean_is_exact() {
        assert_eq!(ValueType::Boolean.parse("True").unwrap(), Some(Scalar::Boolean(true)));
        assert_eq!(ValueType::Boolean.parse("False").unwrap(), Some(Scalar::Boolean(false)));
        assert!(ValueType::Boolean.parse("true").unwrap_err().is_invalid_value());
        assert!(ValueType::Boolean.parse(" True").unwrap_err().is_invalid_value());
    }

    #[test]
    fn test_parse_temporal() {
        assert_eq!(
            ValueType::Date.parse("20160901").unwrap(),
            Some(Scalar::Date(NaiveDate::from_ymd_opt(2016, 9, 1).unwrap()))
        );
        assert_eq!(
            ValueType::Time.parse("101500").unwrap(),
            Some(Scalar::Time(NaiveTime::from_hms_opt(10, 15, 0).unwrap()))
        );
        assert_eq!(
            ValueType::DateTime.parse(" 2016-09-01T00:00:00\n").unwrap(),
            Some(Scalar::DateTime(
                NaiveDate::from_ymd_opt(2016, 9, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
            ))
        );
        assert_eq!(ValueType::Date.parse("   ").unwrap(), None);
        assert!(ValueType::Date.parse("2016-09-01").unwrap_err().is_invalid_value());
        assert!(ValueType::Time.parse("251500").unwrap_err().is_invalid_value());
    }

    #[test]
    fn test_format_checks_type() {
        assert_eq!(ValueType::Boolean.format(&Scalar::Boolean(true)).unwrap(), "True");
        assert!(matches!(
            ValueType::Integer.format(&Scalar::from("12")),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            ValueType::Integer.coerce(Scalar::from("12")).unwrap(),
            Scalar::Integer(12)
        );
        assert!(ValueType::Integer.coerce(Scalar::from("twelve")).unwrap_err().is_invalid_value());
        assert!(ValueType::Date.coerce(Scalar::from("")).unwrap_err().is_invalid_value());
        assert!(matches!(
            ValueType::Date.coerce(Scalar::Boolean(true)),
            Err(Error::TypeMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_integer_round_trip(v in any::<i64>()) {
            let text = ValueType::Integer.format(&Scalar::Integer(v)).unwrap();
            prop_assert_eq!(ValueType::Integer.parse(&text).unwrap(), Some(Scalar::Integer(v)));
        }

        #[test]
        fn prop_boolean_round_trip(v in any::<bool>()) {
            let text = ValueType::Boolean.format(&Scalar::Boolean(v)).unwrap();
            prop_assert_eq!(ValueType::Boolean.parse(&text).unwrap(), Some(Scalar::Boolean(v)));
        }

        #[test]
        fn prop_string_round_trip(v in ".*") {
            let text = ValueType::String.format(&Scalar::String(v.clone())).unwrap();
            prop_assert_eq!(ValueType::String.parse(&text).unwrap(), Some(Scalar::String(v)));
        }

        #[test]
        fn prop_decimal_round_trip(mantissa in any::<i64>(), scale in 0u32..10) {
            let v = Decimal::new(mantissa, scale);
            let text = ValueType::Decimal.format(&Scalar::Decimal(v)).unwrap();
            prop_assert_eq!(ValueType::Decimal.parse(&text).unwrap(), Some(Scalar::Decimal(v)));
        }

        #[test]
        fn prop_datetime_round_trip(
            year in 1000i32..9999,
            ordinal in 1u32..366,
            secs in 0u32..86400,
        ) {
            let date = NaiveDate::from_yo_opt(year, ordinal).unwrap();
            let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
            for scalar in [Scalar::Date(date), Scalar::Time(time), Scalar::DateTime(date.and_time(time))] {
                let ty = scalar.value_type();
                let text = ty.format(&scalar).unwrap();
                prop_assert_eq!(ty.parse(&text).unwrap(), Some(scalar));
            }
        }
    }
}
