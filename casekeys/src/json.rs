//! Interop with serde and `serde_json`.
//!
//! JSON is the usual source of values whose keys need converting. [`Value`] converts from and to
//! [`serde_json::Value`], implements [`Serialize`] and [`Deserialize`], and [`transcode`] moves any
//! serializable type into a differently cased type in one step.

use chrono::SecondsFormat;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};

use crate::{CaseKeys, Casing, convert::convert_value, value::Value};

/// Errors at the serde boundary. Key conversion itself cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to serialize input: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to deserialize converted value: {0}")]
    Deserialize(#[source] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Serialize `value`, then convert its keys to `casing`.
pub fn to_value_cased<T: Serialize + ?Sized>(value: &T, casing: Casing) -> Result<Value> {
    let json = serde_json::to_value(value).map_err(Error::Serialize)?;
    Ok(convert_value(&Value::from(json), casing))
}

/// Serialize `value`, convert its keys to `casing` and deserialize the result as `U`.
///
/// ```
/// use casekeys::{Casing, json::transcode};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct Row {
///     row_id: u32,
/// }
///
/// #[derive(Deserialize)]
/// #[allow(non_snake_case)]
/// struct RowDto {
///     rowId: u32,
/// }
///
/// let dto: RowDto = transcode(&Row { row_id: 7 }, Casing::Camel).unwrap();
/// assert_eq!(dto.rowId, 7);
/// ```
pub fn transcode<T, U>(value: &T, casing: Casing) -> Result<U>
where
    T: Serialize + ?Sized,
    U: DeserializeOwned,
{
    let converted = to_value_cased(value, casing)?;
    serde_json::from_value(serde_json::Value::from(converted)).map_err(Error::Deserialize)
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Instants become RFC 3339 strings and sets become arrays. Opaque handles have no JSON form and
/// become `null`; serialize through [`Serialize`] to get an error instead.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null | Value::Opaque(_) => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Instant(instant) => {
                Self::String(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Sequence(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Set(members) => Self::Array(members.into_iter().map(Self::from).collect()),
            Value::Record(record) => {
                Self::Object(record.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Instant(instant) => instant.serialize(serializer),
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Set(members) => serializer.collect_seq(members),
            Self::Record(record) => serializer.collect_map(record),
            Self::Opaque(opaque) => Err(<S::Error as serde::ser::Error>::custom(format_args!(
                "opaque value of type `{}` cannot be serialized",
                opaque.type_name()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// JSON documents convert like [`Value`]s and stay JSON.
impl CaseKeys for serde_json::Value {
    type CamelCased = serde_json::Value;
    type SnakeCased = serde_json::Value;

    fn into_camel_cased(self) -> Self::CamelCased {
        convert_value(&Value::from(self), Casing::Camel).into()
    }

    fn into_snake_cased(self) -> Self::SnakeCased {
        convert_value(&Value::from(self), Casing::Snake).into()
    }
}
