//! Vertical anchors and height providers.
use super::{Canonical, Fields, Weighted, decode_weighted, encode_weighted, number_to_i32};
use crate::error::DecodeError;
use crate::value::Value;

// ---------------------------- VerticalAnchor ------------------------------ //

/// A y coordinate, either absolute or relative to one end of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerticalAnchor {
    Absolute(i32),
    AboveBottom(i32),
    BelowTop(i32),
}

impl Default for VerticalAnchor {
    fn default() -> Self {
        VerticalAnchor::Absolute(0)
    }
}

impl VerticalAnchor {
    pub const BOTTOM: VerticalAnchor = VerticalAnchor::AboveBottom(0);
    pub const TOP: VerticalAnchor = VerticalAnchor::BelowTop(0);

    fn key(&self) -> &'static str {
        match self {
            VerticalAnchor::Absolute(_) => "absolute",
            VerticalAnchor::AboveBottom(_) => "above_bottom",
            VerticalAnchor::BelowTop(_) => "below_top",
        }
    }

    pub fn offset(&self) -> i32 {
        match self {
            VerticalAnchor::Absolute(n)
            | VerticalAnchor::AboveBottom(n)
            | VerticalAnchor::BelowTop(n) => *n,
        }
    }
}

impl Canonical for VerticalAnchor {
    const KIND: &'static str = "vertical anchor";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(Self::KIND, value)?;
        let found: Vec<VerticalAnchor> = [
            ("absolute", VerticalAnchor::Absolute as fn(i32) -> VerticalAnchor),
            ("above_bottom", VerticalAnchor::AboveBottom),
            ("below_top", VerticalAnchor::BelowTop),
        ]
        .into_iter()
        .filter_map(|(key, make)| fields.get(key).map(|v| (key, v, make)))
        .map(|(key, v, make)| number_to_i32(v).map(make).map_err(|e| e.at(key)))
        .collect::<Result<_, _>>()?;
        match found.as_slice() {
            [anchor] => Ok(*anchor),
            [] => Err(DecodeError::invalid(
                Self::KIND,
                "expected one of `absolute`, `above_bottom`, `below_top`",
            )),
            _ => Err(DecodeError::invalid(Self::KIND, "more than one anchor key")),
        }
    }

    fn encode(&self) -> Value {
        Value::object([(self.key(), Value::from(self.offset()))])
    }
}

// ---------------------------- HeightProvider ------------------------------ //

#[derive(Clone, Debug, PartialEq)]
pub enum HeightProvider {
    Constant(VerticalAnchor),
    Uniform {
        min: VerticalAnchor,
        max: VerticalAnchor,
    },
    BiasedToBottom {
        min: VerticalAnchor,
        max: VerticalAnchor,
        inner: i32,
    },
    VeryBiasedToBottom {
        min: VerticalAnchor,
        max: VerticalAnchor,
        inner: i32,
    },
    Trapezoid {
        min: VerticalAnchor,
        max: VerticalAnchor,
        plateau: i32,
    },
    WeightedList(Vec<Weighted<HeightProvider>>),
}

impl Default for HeightProvider {
    fn default() -> Self {
        HeightProvider::Constant(VerticalAnchor::default())
    }
}

impl HeightProvider {
    /// Uniform range, collapsed to a constant when both anchors are equal.
    pub fn range(min: VerticalAnchor, max: VerticalAnchor) -> Self {
        if min == max {
            HeightProvider::Constant(min)
        } else {
            HeightProvider::Uniform { min, max }
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            HeightProvider::Constant(_) => "constant",
            HeightProvider::Uniform { .. } => "uniform",
            HeightProvider::BiasedToBottom { .. } => "biased_to_bottom",
            HeightProvider::VeryBiasedToBottom { .. } => "very_biased_to_bottom",
            HeightProvider::Trapezoid { .. } => "trapezoid",
            HeightProvider::WeightedList(_) => "weighted_list",
        }
    }
}

fn check_inner(inner: i32) -> Result<i32, DecodeError> {
    if inner < 1 {
        return Err(DecodeError::OutOfRange {
            value: inner as f64,
            min: 1.0,
            max: i32::MAX as f64,
        }
        .at("inner"));
    }
    Ok(inner)
}

impl Canonical for HeightProvider {
    const KIND: &'static str = "height provider";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(Self::KIND, value)?;
        if fields.get("type").is_none() {
            return VerticalAnchor::decode(value).map(HeightProvider::Constant);
        }
        let ty = fields.discriminator()?;
        let bounds = || -> Result<(VerticalAnchor, VerticalAnchor), DecodeError> {
            Ok((fields.decode("min_inclusive")?, fields.decode("max_inclusive")?))
        };
        Ok(match ty {
            "constant" => HeightProvider::Constant(fields.decode("value")?),
            "uniform" => {
                let (min, max) = bounds()?;
                HeightProvider::Uniform { min, max }
            }
            "biased_to_bottom" => {
                let (min, max) = bounds()?;
                HeightProvider::BiasedToBottom {
                    min,
                    max,
                    inner: check_inner(fields.i32_or("inner", 1)?)?,
                }
            }
            "very_biased_to_bottom" => {
                let (min, max) = bounds()?;
                HeightProvider::VeryBiasedToBottom {
                    min,
                    max,
                    inner: check_inner(fields.i32_or("inner", 1)?)?,
                }
            }
            "trapezoid" => {
                let (min, max) = bounds()?;
                HeightProvider::Trapezoid {
                    min,
                    max,
                    plateau: fields.i32_or("plateau", 0)?,
                }
            }
            "weighted_list" => HeightProvider::WeightedList(
                decode_weighted(Self::KIND, fields.require("distribution")?)
                    .map_err(|e| e.at("distribution"))?,
            ),
            other => return Err(fields.unknown(other)),
        })
    }

    fn encode(&self) -> Value {
        let head = ("type", Value::from(self.type_name()));
        match self {
            HeightProvider::Constant(anchor) => anchor.encode(),
            HeightProvider::Uniform { min, max } => Value::object([
                head,
                ("min_inclusive", min.encode()),
                ("max_inclusive", max.encode()),
            ]),
            HeightProvider::BiasedToBottom { min, max, inner }
            | HeightProvider::VeryBiasedToBottom { min, max, inner } => Value::object([
                head,
                ("min_inclusive", min.encode()),
                ("max_inclusive", max.encode()),
                ("inner", Value::from(*inner)),
            ]),
            HeightProvider::Trapezoid { min, max, plateau } => Value::object([
                head,
                ("min_inclusive", min.encode()),
                ("max_inclusive", max.encode()),
                ("plateau", Value::from(*plateau)),
            ]),
            HeightProvider::WeightedList(entries) => {
                Value::object([head, ("distribution", encode_weighted(entries))])
            }
        }
    }
}
