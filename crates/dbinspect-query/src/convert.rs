//! Cell to field conversions.

use chrono::{NaiveDate, NaiveDateTime};
use dbinspect_core::Cell;

/// Why a cell could not be stored in a field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    Null,
    Undecodable,
}

/// Conversion from a [`Cell`] into a record field type.
///
/// Null cells only convert into `Option<T>`.
pub trait FromCell: Sized {
    /// Name of the target type in error messages.
    const EXPECTED: &'static str;

    fn from_cell(cell: Cell) -> Result<Self, ConvertError>;
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn mismatch<T: FromCell>(cell: &Cell) -> ConvertError {
    ConvertError::Mismatch {
        expected: T::EXPECTED,
        found: cell.kind(),
    }
}

fn decode(bytes: Vec<u8>) -> Result<String, ConvertError> {
    String::from_utf8(bytes).map_err(|_| ConvertError::Undecodable)
}

impl FromCell for String {
    const EXPECTED: &'static str = "text";

    fn from_cell(cell: Cell) -> Result<Self, ConvertError> {
        match cell {
            Cell::Text(s) => Ok(s),
            Cell::Bytes(b) => decode(b),
            Cell::Null => Err(ConvertError::Null),
            other => Ok(other.to_string()),
        }
    }
}

impl FromCell for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_cell(cell: Cell) -> Result<Self, ConvertError> {
        match cell {
            Cell::Integer(i) => Ok(i),
            Cell::Real(r) if r.fract() == 0.0 && r >= i64::MIN as f64 && r <= i64::MAX as f64 => {
                Ok(r as i64)
            }
            Cell::Text(ref s) => s.trim().parse().map_err(|_| mismatch::<Self>(&cell)),
            Cell::Bytes(b) => decode(b)?
                .trim()
                .parse()
                .map_err(|_| ConvertError::Mismatch {
                    expected: Self::EXPECTED,
                    found: "bytes",
                }),
            Cell::Null => Err(ConvertError::Null),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromCell for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    fn from_cell(cell: Cell) -> Result<Self, ConvertError> {
        let found = cell.kind();
        let wide = i64::from_cell(cell)?;
        i32::try_from(wide).map_err(|_| ConvertError::Mismatch {
            expected: Self::EXPECTED,
            found,
        })
    }
}

impl FromCell for f64 {
    const EXPECTED: &'static str = "real";

    fn from_cell(cell: Cell) -> Result<Self, ConvertError> {
        match cell {
            Cell::Real(r) => Ok(r),
            Cell::Integer(i) => Ok(i as f64),
            Cell::Text(ref s) => s.trim().parse().map_err(|_| mismatch::<Self>(&cell)),
            Cell::Bytes(b) => decode(b)?
                .trim()
                .parse()
                .map_err(|_| ConvertError::Mismatch {
                    expected: Self::EXPECTED,
                    found: "bytes",
                }),
            Cell::Null => Err(ConvertError::Null),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl FromCell for NaiveDateTime {
    const EXPECTED: &'static str = "timestamp";

    fn from_cell(cell: Cell) -> Result<Self, ConvertError> {
        match cell {
            Cell::Timestamp(ts) => Ok(ts),
            Cell::Text(ref s) => parse_timestamp(s).ok_or_else(|| mismatch::<Self>(&cell)),
            Cell::Bytes(b) => parse_timestamp(&decode(b)?).ok_or(ConvertError::Mismatch {
                expected: Self::EXPECTED,
                found: "bytes",
            }),
            Cell::Null => Err(ConvertError::Null),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FromCell> FromCell for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_cell(cell: Cell) -> Result<Self, ConvertError> {
        match cell {
            Cell::Null => Ok(None),
            other => T::from_cell(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_real_converts_to_integer() {
        assert_eq!(i64::from_cell(Cell::Real(42.0)), Ok(42));
        assert!(i64::from_cell(Cell::Real(4.5)).is_err());
    }

    #[test]
    fn numeric_text_converts_to_numbers() {
        assert_eq!(i64::from_cell(Cell::from(" 17 ")), Ok(17));
        assert_eq!(f64::from_cell(Cell::from("0.25")), Ok(0.25));
    }

    #[test]
    fn i32_rejects_out_of_range() {
        assert!(i32::from_cell(Cell::Integer(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn timestamp_parses_common_text_forms() {
        let ts = NaiveDateTime::from_cell(Cell::from("2024-05-01 08:15:00")).unwrap();
        assert_eq!(ts.to_string(), "2024-05-01 08:15:00");
        assert!(NaiveDateTime::from_cell(Cell::from("2024-05-01")).is_ok());
        assert!(NaiveDateTime::from_cell(Cell::from("yesterday")).is_err());
    }

    #[test]
    fn null_requires_option() {
        assert_eq!(String::from_cell(Cell::Null), Err(ConvertError::Null));
        assert_eq!(Option::<String>::from_cell(Cell::Null), Ok(None));
    }

    #[test]
    fn invalid_utf8_bytes_are_undecodable() {
        assert_eq!(
            String::from_cell(Cell::Bytes(vec![0xff, 0xfe])),
            Err(ConvertError::Undecodable)
        );
    }
}
