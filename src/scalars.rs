//! Scalar type codecs
//!
//! This module defines the concrete simple-type kinds and their text
//! codecs: decoding XML text into scalar program values and encoding
//! scalar values back to their XML text form.
//!
//! Encoders never emit whitespace, so list values can be joined with a
//! single space without escaping.

use std::fmt;

use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{Error, Result, ScalarDecodeError};

// =============================================================================
// Scalar Values
// =============================================================================

/// A scalar program value carried by a simple type
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Decimal value
    Decimal(Decimal),
    /// Double value
    Double(f64),
    /// DateTime value
    DateTime(NaiveDateTime),
    /// Date value
    Date(NaiveDate),
    /// Time value
    Time(NaiveTime),
    /// Binary value (base64 on the wire)
    Binary(Vec<u8>),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "{}", s),
            ScalarValue::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Decimal(d) => write!(f, "{}", d),
            ScalarValue::Double(v) => {
                if v.is_nan() {
                    write!(f, "NaN")
                } else if *v == f64::INFINITY {
                    write!(f, "INF")
                } else if *v == f64::NEG_INFINITY {
                    write!(f, "-INF")
                } else {
                    write!(f, "{}", v)
                }
            }
            ScalarValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            ScalarValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            ScalarValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            ScalarValue::Binary(b) => {
                write!(f, "{}", base64::engine::general_purpose::STANDARD.encode(b))
            }
        }
    }
}

// =============================================================================
// Scalar Kinds
// =============================================================================

/// The concrete simple-type kinds with their text codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// xs:string
    String,
    /// xs:boolean
    Boolean,
    /// xs:integer
    Integer,
    /// xs:decimal
    Decimal,
    /// xs:double
    Double,
    /// xs:dateTime
    DateTime,
    /// xs:date
    Date,
    /// xs:time
    Time,
    /// xs:base64Binary
    Base64Binary,
}

impl ScalarKind {
    /// The XSD local name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Integer => "integer",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Double => "double",
            ScalarKind::DateTime => "dateTime",
            ScalarKind::Date => "date",
            ScalarKind::Time => "time",
            ScalarKind::Base64Binary => "base64Binary",
        }
    }

    /// Decode XML text into a scalar value
    pub fn decode(&self, text: &str) -> Result<ScalarValue> {
        match self {
            ScalarKind::String => Ok(ScalarValue::String(text.to_string())),
            ScalarKind::Boolean => match text.trim() {
                "true" | "1" => Ok(ScalarValue::Boolean(true)),
                "false" | "0" => Ok(ScalarValue::Boolean(false)),
                other => Err(ScalarDecodeError::new(self.name(), other)
                    .with_reason("expected true, false, 1 or 0")
                    .into()),
            },
            ScalarKind::Integer => text
                .trim()
                .parse::<i64>()
                .map(ScalarValue::Integer)
                .map_err(|e| ScalarDecodeError::new(self.name(), text).with_reason(e.to_string()).into()),
            ScalarKind::Decimal => text
                .trim()
                .parse::<Decimal>()
                .map(ScalarValue::Decimal)
                .map_err(|e| ScalarDecodeError::new(self.name(), text).with_reason(e.to_string()).into()),
            ScalarKind::Double => match text.trim() {
                "INF" => Ok(ScalarValue::Double(f64::INFINITY)),
                "-INF" => Ok(ScalarValue::Double(f64::NEG_INFINITY)),
                "NaN" => Ok(ScalarValue::Double(f64::NAN)),
                other => other
                    .parse::<f64>()
                    .map(ScalarValue::Double)
                    .map_err(|e| {
                        ScalarDecodeError::new(self.name(), text).with_reason(e.to_string()).into()
                    }),
            },
            ScalarKind::DateTime => {
                let trimmed = text.trim();
                let lexical = trimmed.strip_suffix('Z').unwrap_or(trimmed);
                NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(ScalarValue::DateTime)
                    .map_err(|e| {
                        ScalarDecodeError::new(self.name(), text).with_reason(e.to_string()).into()
                    })
            }
            ScalarKind::Date => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map(ScalarValue::Date)
                .map_err(|e| ScalarDecodeError::new(self.name(), text).with_reason(e.to_string()).into()),
            ScalarKind::Time => NaiveTime::parse_from_str(text.trim(), "%H:%M:%S%.f")
                .map(ScalarValue::Time)
                .map_err(|e| ScalarDecodeError::new(self.name(), text).with_reason(e.to_string()).into()),
            ScalarKind::Base64Binary => base64::engine::general_purpose::STANDARD
                .decode(text.trim())
                .map(ScalarValue::Binary)
                .map_err(|e| ScalarDecodeError::new(self.name(), text).with_reason(e.to_string()).into()),
        }
    }

    /// Encode a scalar value to its XML text form
    ///
    /// The value's variant must match this kind.
    pub fn encode(&self, value: &ScalarValue) -> Result<String> {
        let matches = matches!(
            (self, value),
            (ScalarKind::String, ScalarValue::String(_))
                | (ScalarKind::Boolean, ScalarValue::Boolean(_))
                | (ScalarKind::Integer, ScalarValue::Integer(_))
                | (ScalarKind::Decimal, ScalarValue::Decimal(_))
                | (ScalarKind::Double, ScalarValue::Double(_))
                | (ScalarKind::DateTime, ScalarValue::DateTime(_))
                | (ScalarKind::Date, ScalarValue::Date(_))
                | (ScalarKind::Time, ScalarValue::Time(_))
                | (ScalarKind::Base64Binary, ScalarValue::Binary(_))
        );
        if !matches {
            return Err(Error::Value(format!(
                "cannot encode {:?} as {}",
                value,
                self.name()
            )));
        }
        Ok(value.to_string())
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boolean_tokens() {
        assert_eq!(
            ScalarKind::Boolean.decode("true").unwrap(),
            ScalarValue::Boolean(true)
        );
        assert_eq!(
            ScalarKind::Boolean.decode("1").unwrap(),
            ScalarValue::Boolean(true)
        );
        assert_eq!(
            ScalarKind::Boolean.decode("false").unwrap(),
            ScalarValue::Boolean(false)
        );
        assert_eq!(
            ScalarKind::Boolean.decode("0").unwrap(),
            ScalarValue::Boolean(false)
        );
        assert!(ScalarKind::Boolean.decode("yes").is_err());
    }

    #[test]
    fn test_integer_codec() {
        assert_eq!(
            ScalarKind::Integer.decode("42").unwrap(),
            ScalarValue::Integer(42)
        );
        assert_eq!(
            ScalarKind::Integer.decode("-7").unwrap(),
            ScalarValue::Integer(-7)
        );
        assert!(ScalarKind::Integer.decode("abc").is_err());

        assert_eq!(
            ScalarKind::Integer.encode(&ScalarValue::Integer(42)).unwrap(),
            "42"
        );
    }

    #[test]
    fn test_decimal_codec() {
        assert_eq!(
            ScalarKind::Decimal.decode("3.14").unwrap(),
            ScalarValue::Decimal("3.14".parse().unwrap())
        );
        assert!(ScalarKind::Decimal.decode("3.1.4").is_err());
    }

    #[test]
    fn test_double_special_values() {
        assert_eq!(
            ScalarKind::Double.decode("INF").unwrap(),
            ScalarValue::Double(f64::INFINITY)
        );
        assert_eq!(
            ScalarKind::Double.encode(&ScalarValue::Double(f64::NEG_INFINITY)).unwrap(),
            "-INF"
        );
        assert_eq!(
            ScalarKind::Double.encode(&ScalarValue::Double(f64::NAN)).unwrap(),
            "NaN"
        );
    }

    #[test]
    fn test_datetime_codec() {
        let decoded = ScalarKind::DateTime.decode("2024-01-15T10:30:00").unwrap();
        assert_eq!(
            ScalarKind::DateTime.encode(&decoded).unwrap(),
            "2024-01-15T10:30:00"
        );

        // trailing Z accepted on decode
        assert!(ScalarKind::DateTime.decode("2024-01-15T10:30:00Z").is_ok());
        assert!(ScalarKind::DateTime.decode("invalid").is_err());
    }

    #[test]
    fn test_date_and_time_codec() {
        let d = ScalarKind::Date.decode("2024-06-01").unwrap();
        assert_eq!(ScalarKind::Date.encode(&d).unwrap(), "2024-06-01");

        let t = ScalarKind::Time.decode("10:30:05").unwrap();
        assert_eq!(ScalarKind::Time.encode(&t).unwrap(), "10:30:05");
    }

    #[test]
    fn test_base64_codec() {
        let v = ScalarKind::Base64Binary.decode("aGVsbG8=").unwrap();
        assert_eq!(v, ScalarValue::Binary(b"hello".to_vec()));
        assert_eq!(
            ScalarKind::Base64Binary.encode(&v).unwrap(),
            "aGVsbG8="
        );
        assert!(ScalarKind::Base64Binary.decode("!!!").is_err());
    }

    #[test]
    fn test_encode_kind_mismatch() {
        let err = ScalarKind::Integer.encode(&ScalarValue::String("x".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn test_encoders_emit_no_whitespace() {
        let values = [
            ScalarValue::Integer(123),
            ScalarValue::Boolean(true),
            ScalarValue::Decimal("2.5".parse().unwrap()),
            ScalarValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
            ),
        ];
        for v in &values {
            assert!(!v.to_string().contains(char::is_whitespace));
        }
    }

    proptest! {
        #[test]
        fn roundtrip_integer(v in any::<i64>()) {
            let text = ScalarKind::Integer.encode(&ScalarValue::Integer(v)).unwrap();
            prop_assert_eq!(ScalarKind::Integer.decode(&text).unwrap(), ScalarValue::Integer(v));
        }

        #[test]
        fn roundtrip_boolean(v in any::<bool>()) {
            let text = ScalarKind::Boolean.encode(&ScalarValue::Boolean(v)).unwrap();
            prop_assert_eq!(ScalarKind::Boolean.decode(&text).unwrap(), ScalarValue::Boolean(v));
        }

        #[test]
        fn roundtrip_decimal(mantissa in any::<i64>(), scale in 0u32..10) {
            let v = Decimal::new(mantissa, scale);
            let text = ScalarKind::Decimal.encode(&ScalarValue::Decimal(v)).unwrap();
            prop_assert_eq!(ScalarKind::Decimal.decode(&text).unwrap(), ScalarValue::Decimal(v));
        }

        #[test]
        fn roundtrip_double(v in -1.0e15f64..1.0e15) {
            let text = ScalarKind::Double.encode(&ScalarValue::Double(v)).unwrap();
            prop_assert_eq!(ScalarKind::Double.decode(&text).unwrap(), ScalarValue::Double(v));
        }

        #[test]
        fn roundtrip_binary(v in proptest::collection::vec(any::<u8>(), 0..64)) {
            let text = ScalarKind::Base64Binary.encode(&ScalarValue::Binary(v.clone())).unwrap();
            prop_assert_eq!(ScalarKind::Base64Binary.decode(&text).unwrap(), ScalarValue::Binary(v));
        }
    }
}
