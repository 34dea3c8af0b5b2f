//! Decoding of joined rows into domain types.
//!
//! Joins produce nullable columns even where the domain requires a value.
//! Decoding goes through these helpers so that a missing column becomes a
//! [`DecodeError`] instead of a silently defaulted field.

use std::str::FromStr;

use derive_more::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[display("{entity}: missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[display("{entity}: invalid value {value:?} for field `{field}`")]
    InvalidValue {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
}

impl std::error::Error for DecodeError {}

pub fn required<T>(entity: &'static str, field: &'static str, value: Option<T>) -> Result<T, DecodeError> {
    value.ok_or(DecodeError::MissingField { entity, field })
}

/// Parses a text column into an enum through its `FromStr` impl.
pub fn parse_enum<T: FromStr>(entity: &'static str, field: &'static str, value: &str) -> Result<T, DecodeError> {
    value.parse::<T>().map_err(|_| DecodeError::InvalidValue {
        entity,
        field,
        value: value.to_string(),
    })
}

/// Decodes every row, failing on the first bad one.
pub fn decode_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DecodeError>
where
    T: TryFrom<R, Error = DecodeError>,
{
    rows.into_iter().map(T::try_from).collect()
}
