//! JSON codec for the backend model.
//!
//! Flat records go through plain `serde` derives. Discriminated unions are
//! Rust enums with one newtype variant per wire shape; the wire form of each
//! variant is its struct's fields plus a `$type` field naming the variant.
//!
//! Decoding a union reads `$type` first and dispatches with an explicit
//! `match` in [`Union::decode_tagged`]. An unknown tag is a hard error, never
//! a fallback to some default variant. When the union sits inside a record
//! (a disk's partitions, say) the record decode reports
//! [`DecodeError::Nested`] with the typed discriminator error as its source.
//!
//! ## Wire conventions
//!
//! - Absent optional fields are written as `null`, never omitted.
//! - Sizes and offsets are integer byte counts.
//! - Lists keep their source order.

use std::cell::RefCell;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Name of the discriminator field carried by every union variant.
pub const DISCRIMINATOR: &str = "$type";

/// Errors from decoding backend JSON into the typed model.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The JSON did not match the expected shape: a required field is
    /// missing, a value has the wrong type, or an enum value is unknown.
    #[error("failed to decode {type_name}: {source}")]
    Shape {
        type_name: &'static str,
        source: serde_json::Error,
    },

    #[error("{union}: missing discriminator field `{field}`")]
    MissingDiscriminator {
        union: &'static str,
        field: &'static str,
    },

    #[error("{union}: unrecognized value {value:?} for discriminator field `{field}`")]
    UnknownDiscriminator {
        union: &'static str,
        field: &'static str,
        value: String,
    },

    /// A union nested inside `type_name` failed on its discriminator.
    #[error("failed to decode {type_name}: {source}")]
    Nested {
        type_name: &'static str,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Unknown-discriminator error for union `U`.
    pub fn unknown_discriminator<U: Union>(value: impl Into<String>) -> Self {
        DecodeError::UnknownDiscriminator {
            union: U::NAME,
            field: DISCRIMINATOR,
            value: value.into(),
        }
    }

    /// The innermost error, following [`DecodeError::Nested`] links.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Copy of a discriminator failure, possibly wrapped in `Nested`.
    /// `Shape` errors hold a non-cloneable `serde_json::Error` and give `None`.
    fn clone_discriminator(&self) -> Option<DecodeError> {
        match self {
            DecodeError::Shape { .. } => None,
            DecodeError::MissingDiscriminator { union, field } => {
                Some(DecodeError::MissingDiscriminator {
                    union: *union,
                    field: *field,
                })
            }
            DecodeError::UnknownDiscriminator {
                union,
                field,
                value,
            } => Some(DecodeError::UnknownDiscriminator {
                union: *union,
                field: *field,
                value: value.clone(),
            }),
            DecodeError::Nested { type_name, source } => {
                source.clone_discriminator().map(|source| DecodeError::Nested {
                    type_name: *type_name,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Wrap a serde failure of `type_name`, surfacing a parked union error.
    fn from_serde(type_name: &'static str, source: serde_json::Error) -> Self {
        match take_parked() {
            Some(inner) => DecodeError::Nested {
                type_name,
                source: Box::new(inner),
            },
            None => DecodeError::Shape { type_name, source },
        }
    }
}

thread_local! {
    /// Discriminator error of a union that failed while serde was decoding
    /// an enclosing record on this thread.
    static PARKED: RefCell<Option<DecodeError>> = const { RefCell::new(None) };
}

/// Record `error` for the enclosing decode to pick up.
pub(crate) fn park_nested(error: &DecodeError) {
    if let Some(error) = error.clone_discriminator() {
        PARKED.with(|slot| *slot.borrow_mut() = Some(error));
    }
}

fn take_parked() -> Option<DecodeError> {
    PARKED.with(|slot| slot.borrow_mut().take())
}

/// Run a serde decode of `type_name` with a clean parking slot.
fn serde_decode<T>(
    type_name: &'static str,
    decode: impl FnOnce() -> Result<T, serde_json::Error>,
) -> Result<T, DecodeError> {
    take_parked();
    let result = decode().map_err(|source| DecodeError::from_serde(type_name, source));
    take_parked();
    result
}

/// A struct that appears on the wire as one variant of a union.
pub trait Tagged {
    /// The `$type` value written for this variant.
    const TAG: &'static str;
}

/// A discriminated union decoded by dispatching on `$type`.
pub trait Union: Sized {
    /// Union name used in decode errors.
    const NAME: &'static str;

    /// The discriminator value of this particular value.
    fn tag(&self) -> &'static str;

    /// Decode the variant selected by `tag` from the full JSON object.
    fn decode_tagged(tag: &str, value: Value) -> Result<Self, DecodeError>;
}

/// Decode any union value from a JSON object.
pub fn decode_union<U: Union>(value: Value) -> Result<U, DecodeError> {
    let tag = match value.get(DISCRIMINATOR) {
        Some(Value::String(tag)) => tag.clone(),
        // A non-string discriminator can never match a variant name.
        Some(other) => return Err(DecodeError::unknown_discriminator::<U>(other.to_string())),
        None => {
            return Err(DecodeError::MissingDiscriminator {
                union: U::NAME,
                field: DISCRIMINATOR,
            });
        }
    };
    U::decode_tagged(&tag, value)
}

/// Decode a union from response text.
pub fn decode_union_str<U: Union>(text: &str) -> Result<U, DecodeError> {
    let value: Value = serde_decode(U::NAME, || serde_json::from_str(text))?;
    decode_union(value)
}

/// Decode the fields of one union variant. The `$type` field is ignored
/// here since the caller has already matched it.
pub fn decode_variant<V: Tagged + DeserializeOwned>(value: Value) -> Result<V, DecodeError> {
    serde_decode(V::TAG, || serde_json::from_value(value))
}

/// Decode a flat record (or scalar) from response text.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    serde_decode(std::any::type_name::<T>(), || serde_json::from_str(text))
}

/// Variant fields followed by the variant's `$type`.
#[derive(Serialize)]
struct WithTag<'a, V> {
    #[serde(flatten)]
    variant: &'a V,
    #[serde(rename = "$type")]
    tag: &'static str,
}

/// Serialize a variant struct together with its discriminator.
///
/// Usable as `#[serde(serialize_with = "codec::serialize_tagged")]` on
/// request fields that carry a bare variant, such as the gap of an
/// add-partition request.
pub fn serialize_tagged<V, S>(variant: &V, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Tagged + Serialize,
    S: Serializer,
{
    WithTag {
        variant,
        tag: V::TAG,
    }
    .serialize(serializer)
}

/// Implements `Serialize`/`Deserialize` for a union in terms of
/// [`serialize_tagged`] and [`decode_union`].
macro_rules! union_serde {
    ($union:ty { $($variant:ident),+ $(,)? }) => {
        impl ::serde::Serialize for $union {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Self::$variant(inner) => $crate::codec::serialize_tagged(inner, serializer),)+
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $union {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                $crate::codec::decode_union(value).map_err(|e| {
                    $crate::codec::park_nested(&e);
                    ::serde::de::Error::custom(e)
                })
            }
        }
    };
}

pub(crate) use union_serde;
