//! Advanced filters
//!
//! Advanced filters are a closed family of operators. On the wire each one is
//! a JSON object carrying its own fields plus an `operatorType` field naming
//! the operator, e.g.
//!
//! ```json
//! { "operatorType": "NumberLessThan", "key": "data.temp", "value": 10.0 }
//! ```
//!
//! The tag is written by the enum's serializer and read back first on decode
//! to choose the payload shape. It is never stored on the payload itself.

use crate::error::{Error, Result};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the discriminator field
pub const DISCRIMINATOR: &str = "operatorType";

const TYPE_NAME: &str = "AdvancedFilter";

/// Single numeric operand
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Set of numeric operands
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberSetFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Inclusive `[low, high]` ranges
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberRangeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<[f64; 2]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoolFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StringSetFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Operators that only name the key they test
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

macro_rules! advanced_filters {
    ($($(#[$meta:meta])* $variant:ident($payload:ty),)+) => {
        /// An advanced filter, tagged on the wire by `operatorType`
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "operatorType")]
        pub enum AdvancedFilter {
            $($(#[$meta])* $variant($payload),)+
        }

        impl AdvancedFilter {
            /// Every tag this client understands
            pub const OPERATOR_TYPES: &'static [&'static str] = &[$(stringify!($variant)),+];

            /// The discriminator written for this variant
            pub fn operator_type(&self) -> &'static str {
                match self {
                    $(AdvancedFilter::$variant(_) => stringify!($variant),)+
                }
            }

            /// The event property this filter tests
            pub fn key(&self) -> Option<&str> {
                match self {
                    $(AdvancedFilter::$variant(f) => f.key.as_deref(),)+
                }
            }

            fn decode_tagged(tag: &str, payload: Value) -> Result<Self> {
                match tag {
                    $(stringify!($variant) => {
                        Ok(AdvancedFilter::$variant(decode_payload(stringify!($variant), payload)?))
                    })+
                    other => Err(Error::UnknownDiscriminator {
                        type_name: TYPE_NAME,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

advanced_filters! {
    NumberIn(NumberSetFilter),
    NumberNotIn(NumberSetFilter),
    NumberLessThan(NumberFilter),
    NumberGreaterThan(NumberFilter),
    NumberLessThanOrEquals(NumberFilter),
    NumberGreaterThanOrEquals(NumberFilter),
    NumberInRange(NumberRangeFilter),
    NumberNotInRange(NumberRangeFilter),
    BoolEquals(BoolFilter),
    StringIn(StringSetFilter),
    StringNotIn(StringSetFilter),
    StringBeginsWith(StringSetFilter),
    StringNotBeginsWith(StringSetFilter),
    StringEndsWith(StringSetFilter),
    StringNotEndsWith(StringSetFilter),
    StringContains(StringSetFilter),
    StringNotContains(StringSetFilter),
    IsNullOrUndefined(KeyFilter),
    IsNotNull(KeyFilter),
}

fn decode_payload<T: DeserializeOwned>(variant: &'static str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| Error::Decode {
        type_name: variant,
        source,
    })
}

impl AdvancedFilter {
    /// Encode to a JSON object carrying the `operatorType` tag.
    ///
    /// Numeric operands are `f64`, so an operand of `10` is written as `10.0`.
    /// Both spell the same JSON number.
    pub fn to_json(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|source| Error::Encode {
            variant: self.operator_type(),
            source,
        })
    }

    /// Decode a JSON object by dispatching on its `operatorType`
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::Decode {
                type_name: TYPE_NAME,
                source: serde_json::Error::custom("expected a JSON object"),
            });
        };

        let tag = match fields.remove(DISCRIMINATOR) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(Error::UnknownDiscriminator {
                    type_name: TYPE_NAME,
                    value: other.to_string(),
                })
            }
            None => {
                return Err(Error::MissingDiscriminator {
                    type_name: TYPE_NAME,
                    field: DISCRIMINATOR,
                })
            }
        };

        Self::decode_tagged(&tag, Value::Object(fields))
    }
}

impl<'de> Deserialize<'de> for AdvancedFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AdvancedFilter::from_json(value).map_err(|err| match &err {
            Error::Decode { source, .. } => D::Error::custom(format!("{err}: {source}")),
            _ => D::Error::custom(err.to_string()),
        })
    }
}
