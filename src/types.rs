//! Canonical value kinds and their strict structural codecs.
//!
//! Every kind here has exactly one in-memory representation, a strict `decode` that
//! accepts only its serialized document form, and an `encode` that produces that form.
//! The lenient, accept-many-shapes side lives in [`crate::coerce`].
pub mod block_state;
pub mod geometry;
pub mod height;
pub mod noise;
pub mod numeric;
pub mod predicate;
pub mod resource;
pub mod state_provider;

use crate::error::DecodeError;
use crate::value::{Map, Value};

pub use block_state::BlockState;
pub use geometry::{Direction, Heightmap, IntRange, Vec3f, Vec3i};
pub use height::{HeightProvider, VerticalAnchor};
pub use noise::NoiseParameters;
pub use numeric::NumericProvider;
pub use predicate::BlockPredicate;
pub use resource::ResourceLocation;
pub use state_provider::{BlockStateProvider, NoiseBase};

pub trait Canonical: Sized + Clone + PartialEq {
    /// Human readable kind, used in errors and diagnostics.
    const KIND: &'static str;

    fn decode(value: &Value) -> Result<Self, DecodeError>;

    fn encode(&self) -> Value;
}

// ------------------------------- Weighted --------------------------------- //

/// One entry of a weighted list: `{"data": ..., "weight": n}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Weighted<T> {
    pub data: T,
    pub weight: i32,
}

impl<T> Weighted<T> {
    pub fn new(data: T, weight: i32) -> Self {
        Self { data, weight }
    }
}

impl<T: Canonical> Weighted<T> {
    pub fn encode(&self) -> Value {
        Value::object([
            ("data", self.data.encode()),
            ("weight", Value::from(self.weight)),
        ])
    }

    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of("weighted entry", value)?;
        Ok(Self {
            data: fields.decode("data")?,
            weight: fields.i32("weight")?,
        })
    }
}

pub(crate) fn encode_weighted<T: Canonical>(entries: &[Weighted<T>]) -> Value {
    Value::Array(entries.iter().map(Weighted::encode).collect())
}

pub(crate) fn decode_weighted<T: Canonical>(
    kind: &'static str,
    value: &Value,
) -> Result<Vec<Weighted<T>>, DecodeError> {
    let items = value
        .as_array()
        .ok_or_else(|| DecodeError::expected("array", value))?;
    if items.is_empty() {
        return Err(DecodeError::invalid(kind, "weighted list must not be empty"));
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Weighted::decode(item).map_err(|e| e.at(i.to_string())))
        .collect()
}

// ---------------------------- Strict readers ------------------------------ //

/// Strips the default `minecraft:` namespace from a discriminator.
pub(crate) fn strip_namespace(name: &str) -> &str {
    name.strip_prefix("minecraft:").unwrap_or(name)
}

pub(crate) fn number_to_i32(value: &Value) -> Result<i32, DecodeError> {
    let n = value
        .as_i64()
        .ok_or_else(|| DecodeError::expected("integer", value))?;
    i32::try_from(n).map_err(|_| DecodeError::OutOfRange {
        value: n as f64,
        min: i32::MIN as f64,
        max: i32::MAX as f64,
    })
}

pub(crate) fn number_to_f64(value: &Value) -> Result<f64, DecodeError> {
    value
        .as_f64()
        .ok_or_else(|| DecodeError::expected("number", value))
}

/// Decodes every element of an array, tagging failures with their index.
pub(crate) fn decode_list<T, F>(value: &Value, mut decode: F) -> Result<Vec<T>, DecodeError>
where
    F: FnMut(&Value) -> Result<T, DecodeError>,
{
    let items = value
        .as_array()
        .ok_or_else(|| DecodeError::expected("array", value))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode(item).map_err(|e| e.at(i.to_string())))
        .collect()
}

/// Read-only view over a serialized object; every failure names the key it came from.
pub(crate) struct Fields<'a> {
    kind: &'static str,
    map: &'a Map,
}

impl<'a> Fields<'a> {
    pub fn of(kind: &'static str, value: &'a Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self { kind, map }),
            other => Err(DecodeError::expected("object", other)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub fn require(&self, key: &str) -> Result<&'a Value, DecodeError> {
        self.map
            .get(key)
            .ok_or_else(|| DecodeError::invalid(self.kind, format!("missing `{key}`")))
    }

    /// The `"type"` discriminator, namespace stripped.
    pub fn discriminator(&self) -> Result<&'a str, DecodeError> {
        let raw = self.require("type")?;
        raw.as_str()
            .map(strip_namespace)
            .ok_or_else(|| DecodeError::expected("string", raw).at("type"))
    }

    pub fn unknown(&self, discriminator: &str) -> DecodeError {
        DecodeError::UnknownVariant {
            kind: self.kind,
            discriminator: discriminator.to_string(),
        }
    }

    pub fn decode<T: Canonical>(&self, key: &str) -> Result<T, DecodeError> {
        T::decode(self.require(key)?).map_err(|e| e.at(key))
    }

    pub fn decode_list<T: Canonical>(&self, key: &str) -> Result<Vec<T>, DecodeError> {
        decode_list(self.require(key)?, T::decode).map_err(|e| e.at(key))
    }

    pub fn i32(&self, key: &str) -> Result<i32, DecodeError> {
        number_to_i32(self.require(key)?).map_err(|e| e.at(key))
    }

    pub fn i32_or(&self, key: &str, default: i32) -> Result<i32, DecodeError> {
        match self.get(key) {
            Some(v) => number_to_i32(v).map_err(|e| e.at(key)),
            None => Ok(default),
        }
    }

    pub fn i64(&self, key: &str) -> Result<i64, DecodeError> {
        let v = self.require(key)?;
        v.as_i64()
            .ok_or_else(|| DecodeError::expected("integer", v).at(key))
    }

    pub fn f64(&self, key: &str) -> Result<f64, DecodeError> {
        number_to_f64(self.require(key)?).map_err(|e| e.at(key))
    }

    pub fn str(&self, key: &str) -> Result<&'a str, DecodeError> {
        let v = self.require(key)?;
        v.as_str()
            .ok_or_else(|| DecodeError::expected("string", v).at(key))
    }
}
