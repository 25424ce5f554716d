//! Field codecs: one bidirectional converter per field.
//!
//! Primitive codecs decode strictly and fail hard. Provider codecs go through the
//! coercion engine, so a malformed value becomes the provider's default plus a
//! diagnostic rather than an error.
use std::fmt;
use std::sync::Arc;

use super::field::{Document, FieldValue, FromField};
use super::schema::Schema;
use crate::coerce::{Coercer, Coercible};
use crate::error::{DecodeError, EncodeError};
use crate::types::{
    BlockPredicate, BlockState, BlockStateProvider, Canonical, Direction, HeightProvider,
    Heightmap, NoiseParameters, NumericProvider, ResourceLocation, Vec3f, Vec3i, VerticalAnchor,
};
use crate::value::Value;

type DecodeFn = dyn Fn(&Value, &Coercer<'_>) -> Result<FieldValue, DecodeError> + Send + Sync;
type EncodeFn = dyn Fn(&FieldValue) -> Result<Value, EncodeError> + Send + Sync;

#[derive(Clone)]
pub struct FieldCodec {
    expects: String,
    decode: Arc<DecodeFn>,
    encode: Arc<EncodeFn>,
}

impl fmt::Debug for FieldCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCodec")
            .field("expects", &self.expects)
            .finish_non_exhaustive()
    }
}

fn mismatch(expected: &'static str, found: &FieldValue) -> EncodeError {
    EncodeError::Type {
        expected,
        found: found.kind(),
    }
}

fn check_range(value: f64, min: f64, max: f64) -> Result<f64, DecodeError> {
    if value < min || value > max {
        return Err(DecodeError::OutOfRange { value, min, max });
    }
    Ok(value)
}

fn integer(value: &Value) -> Result<i64, DecodeError> {
    value
        .as_i64()
        .ok_or_else(|| DecodeError::expected("integer", value))
}

fn number(value: &Value) -> Result<f64, DecodeError> {
    value
        .as_f64()
        .ok_or_else(|| DecodeError::expected("number", value))
}

impl FieldCodec {
    pub fn new<D, E>(expects: impl Into<String>, decode: D, encode: E) -> Self
    where
        D: Fn(&Value, &Coercer<'_>) -> Result<FieldValue, DecodeError> + Send + Sync + 'static,
        E: Fn(&FieldValue) -> Result<Value, EncodeError> + Send + Sync + 'static,
    {
        Self {
            expects: expects.into(),
            decode: Arc::new(decode),
            encode: Arc::new(encode),
        }
    }

    /// Describes the typed value this codec carries.
    pub fn expects(&self) -> &str {
        &self.expects
    }

    pub fn decode(&self, value: &Value, cx: &Coercer<'_>) -> Result<FieldValue, DecodeError> {
        (self.decode)(value, cx)
    }

    pub fn encode(&self, value: &FieldValue) -> Result<Value, EncodeError> {
        (self.encode)(value)
    }

    /// Adds a check run on every decoded value.
    fn validated<F>(self, check: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<(), DecodeError> + Send + Sync + 'static,
    {
        let inner = self.decode.clone();
        Self {
            decode: Arc::new(move |value: &Value, cx: &Coercer<'_>| {
                let out = inner(value, cx)?;
                check(&out)?;
                Ok(out)
            }),
            ..self
        }
    }

    /// A strictly decoded canonical type.
    fn canonical<T>(expects: &'static str) -> Self
    where
        T: Canonical + Into<FieldValue> + FromField + 'static,
    {
        Self::new(
            expects,
            |value, _| T::decode(value).map(Into::into),
            move |field| {
                T::from_field(field)
                    .map(|t| t.encode())
                    .ok_or_else(|| mismatch(expects, field))
            },
        )
    }

    /// A canonical type decoded through the coercion engine.
    fn coerced<T>() -> Self
    where
        T: Coercible + Into<FieldValue> + FromField + 'static,
    {
        Self::new(
            T::KIND,
            |value, cx| Ok(cx.coerce_value::<T>(value).into()),
            |field| {
                T::from_field(field)
                    .map(|t| t.encode())
                    .ok_or_else(|| mismatch(T::KIND, field))
            },
        )
    }

    // ------------------------------ Primitives ------------------------------ //

    pub fn bool() -> Self {
        Self::new(
            "bool",
            |value, _| {
                value
                    .as_bool()
                    .map(FieldValue::Bool)
                    .ok_or_else(|| DecodeError::expected("bool", value))
            },
            |field| match field {
                FieldValue::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(mismatch("bool", other)),
            },
        )
    }

    pub fn int() -> Self {
        Self::int_range(i32::MIN, i32::MAX).described("int")
    }

    pub fn long() -> Self {
        Self::new(
            "long",
            |value, _| integer(value).map(FieldValue::Int),
            |field| match field {
                FieldValue::Int(n) => Ok(Value::from(*n)),
                other => Err(mismatch("long", other)),
            },
        )
    }

    pub fn int_range(min: i32, max: i32) -> Self {
        Self::long_range(min.into(), max.into()).described(format!("int in [{min}, {max}]"))
    }

    pub fn long_range(min: i64, max: i64) -> Self {
        Self::long()
            .validated(move |field| match field {
                FieldValue::Int(n) => check_range(*n as f64, min as f64, max as f64).map(drop),
                _ => Ok(()),
            })
            .described(format!("long in [{min}, {max}]"))
    }

    pub fn double() -> Self {
        Self::new(
            "double",
            |value, _| number(value).map(FieldValue::Float),
            |field| match field {
                FieldValue::Float(n) => Ok(Value::Number(*n)),
                FieldValue::Int(n) => Ok(Value::from(*n)),
                other => Err(mismatch("double", other)),
            },
        )
    }

    pub fn float() -> Self {
        Self::double().described("float")
    }

    pub fn double_range(min: f64, max: f64) -> Self {
        Self::double()
            .validated(move |field| match field {
                FieldValue::Float(n) => check_range(*n, min, max).map(drop),
                _ => Ok(()),
            })
            .described(format!("double in [{min}, {max}]"))
    }

    pub fn float_range(min: f32, max: f32) -> Self {
        Self::double_range(min.into(), max.into()).described(format!("float in [{min}, {max}]"))
    }

    pub fn string() -> Self {
        Self::new(
            "string",
            |value, _| {
                value
                    .as_str()
                    .map(|s| FieldValue::String(s.to_string()))
                    .ok_or_else(|| DecodeError::expected("string", value))
            },
            |field| match field {
                FieldValue::String(s) => Ok(Value::from(s.as_str())),
                other => Err(mismatch("string", other)),
            },
        )
    }

    pub fn non_empty_string() -> Self {
        Self::string()
            .validated(|field| match field {
                FieldValue::String(s) if s.is_empty() => {
                    Err(DecodeError::invalid("string", "must not be empty"))
                }
                _ => Ok(()),
            })
            .described("non-empty string")
    }

    pub fn vec3i() -> Self {
        Self::canonical::<Vec3i>("vector")
    }

    /// A vector whose components all lie within `[-max, max]`.
    pub fn clamped_vec3i(max: u32) -> Self {
        Self::vec3i()
            .validated(move |field| match field {
                FieldValue::Vec3i(v) if v.max_abs() > max => Err(DecodeError::invalid(
                    "vector",
                    format!("{v:?} exceeds {max} on some axis"),
                )),
                _ => Ok(()),
            })
            .described(format!("vector within {max}"))
    }

    pub fn vec3f() -> Self {
        Self::canonical::<Vec3f>("float vector")
    }

    pub fn block_pos() -> Self {
        Self::vec3i().described("block position")
    }

    pub fn direction() -> Self {
        Self::canonical::<Direction>("direction")
    }

    pub fn vertical_direction() -> Self {
        Self::direction()
            .validated(|field| match field {
                FieldValue::Direction(d) if !d.is_vertical() => Err(DecodeError::invalid(
                    "direction",
                    format!("`{}` is not vertical", d.name()),
                )),
                _ => Ok(()),
            })
            .described("vertical direction")
    }

    pub fn heightmap() -> Self {
        Self::canonical::<Heightmap>("heightmap")
    }

    pub fn resource_location() -> Self {
        Self::canonical::<ResourceLocation>("resource location")
    }

    pub fn block() -> Self {
        Self::resource_location().described("block id")
    }

    pub fn fluid() -> Self {
        Self::resource_location().described("fluid id")
    }

    // ------------------------------ Providers ------------------------------- //

    pub fn numeric_provider() -> Self {
        Self::coerced::<NumericProvider>()
    }

    /// A numeric provider whose whole output range lies within `[min, max]`.
    pub fn ranged_numeric_provider(min: f64, max: f64) -> Self {
        Self::numeric_provider()
            .validated(move |field| match field {
                FieldValue::Numeric(p) => {
                    check_range(p.min_value(), min, max)?;
                    check_range(p.max_value(), min, max).map(drop)
                }
                _ => Ok(()),
            })
            .described(format!("numeric provider within [{min}, {max}]"))
    }

    pub fn block_state() -> Self {
        Self::coerced::<BlockState>()
    }

    pub fn block_predicate() -> Self {
        Self::coerced::<BlockPredicate>()
    }

    pub fn height_provider() -> Self {
        Self::coerced::<HeightProvider>()
    }

    pub fn vertical_anchor() -> Self {
        Self::coerced::<VerticalAnchor>()
    }

    pub fn noise_parameters() -> Self {
        Self::coerced::<NoiseParameters>()
    }

    pub fn block_state_provider() -> Self {
        Self::coerced::<BlockStateProvider>()
    }

    // ------------------------------ Combinators ----------------------------- //

    pub fn list_of(item: FieldCodec) -> Self {
        let expects = format!("list of {}", item.expects);
        let encoder = item.clone();
        Self::new(
            expects,
            move |value, cx| {
                let items = value
                    .as_array()
                    .ok_or_else(|| DecodeError::expected("array", value))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| item.decode(v, cx).map_err(|e| e.at(i.to_string())))
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::List)
            },
            move |field| match field {
                FieldValue::List(items) => items
                    .iter()
                    .map(|v| encoder.encode(v))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Err(mismatch("list", other)),
            },
        )
    }

    /// Exactly one of two alternatives, `left` tried first.
    pub fn xor(left: FieldCodec, right: FieldCodec) -> Self {
        let expects = format!("either {} or {}", left.expects, right.expects);
        let (l, r) = (left.clone(), right.clone());
        Self::new(
            expects,
            move |value, cx| match l.decode(value, cx) {
                Ok(v) => Ok(FieldValue::Left(Box::new(v))),
                Err(left_err) => match r.decode(value, cx) {
                    Ok(v) => Ok(FieldValue::Right(Box::new(v))),
                    Err(right_err) => Err(DecodeError::invalid(
                        "either",
                        format!("{left_err}; {right_err}"),
                    )),
                },
            },
            move |field| match field {
                FieldValue::Left(v) => left.encode(v),
                FieldValue::Right(v) => right.encode(v),
                other => Err(mismatch("either", other)),
            },
        )
    }

    /// A nested object decoded by its own schema.
    pub fn document(schema: Schema<Document>) -> Self {
        let expects = format!("document `{}`", schema.name());
        let encoder = schema.clone();
        Self::new(
            expects,
            move |value, cx| schema.decode_in(value, cx).map(FieldValue::Document),
            move |field| match field {
                FieldValue::Document(doc) => encoder.encode(doc),
                other => Err(mismatch("document", other)),
            },
        )
    }

    /// Any value, unchanged.
    pub fn raw() -> Self {
        Self::new(
            "raw value",
            |value, _| Ok(FieldValue::Raw(value.clone())),
            |field| match field {
                FieldValue::Raw(v) => Ok(v.clone()),
                other => Err(mismatch("raw value", other)),
            },
        )
    }

    fn described(mut self, expects: impl Into<String>) -> Self {
        self.expects = expects.into();
        self
    }
}
