//! Numeric providers: a constant or a distribution over numbers.
use super::{Canonical, Fields, Weighted, decode_weighted, encode_weighted};
use crate::error::DecodeError;
use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum NumericProvider {
    Constant(f64),
    Uniform { min: f64, max: f64 },
    BiasedToBottom { min: f64, max: f64 },
    Trapezoid { min: f64, max: f64, plateau: f64 },
    ClampedNormal { mean: f64, deviation: f64, min: f64, max: f64 },
    Clamped { source: Box<NumericProvider>, min: f64, max: f64 },
    WeightedList(Vec<Weighted<NumericProvider>>),
}

impl Default for NumericProvider {
    fn default() -> Self {
        NumericProvider::Constant(0.0)
    }
}

impl NumericProvider {
    /// Uniform range, collapsed to a constant when both ends are equal.
    pub fn range(min: f64, max: f64) -> Self {
        if min == max {
            NumericProvider::Constant(min)
        } else {
            NumericProvider::Uniform { min, max }
        }
    }

    /// Smallest value the provider can yield.
    pub fn min_value(&self) -> f64 {
        match self {
            NumericProvider::Constant(c) => *c,
            NumericProvider::Uniform { min, .. }
            | NumericProvider::BiasedToBottom { min, .. }
            | NumericProvider::Trapezoid { min, .. }
            | NumericProvider::ClampedNormal { min, .. }
            | NumericProvider::Clamped { min, .. } => *min,
            NumericProvider::WeightedList(entries) => entries
                .iter()
                .map(|e| e.data.min_value())
                .reduce(f64::min)
                .unwrap_or(0.0),
        }
    }

    /// Largest value the provider can yield.
    pub fn max_value(&self) -> f64 {
        match self {
            NumericProvider::Constant(c) => *c,
            NumericProvider::Uniform { max, .. }
            | NumericProvider::BiasedToBottom { max, .. }
            | NumericProvider::Trapezoid { max, .. }
            | NumericProvider::ClampedNormal { max, .. }
            | NumericProvider::Clamped { max, .. } => *max,
            NumericProvider::WeightedList(entries) => entries
                .iter()
                .map(|e| e.data.max_value())
                .reduce(f64::max)
                .unwrap_or(0.0),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            NumericProvider::Constant(_) => "constant",
            NumericProvider::Uniform { .. } => "uniform",
            NumericProvider::BiasedToBottom { .. } => "biased_to_bottom",
            NumericProvider::Trapezoid { .. } => "trapezoid",
            NumericProvider::ClampedNormal { .. } => "clamped_normal",
            NumericProvider::Clamped { .. } => "clamped",
            NumericProvider::WeightedList(_) => "weighted_list",
        }
    }
}

fn check_bounds(min: f64, max: f64) -> Result<(), DecodeError> {
    if min > max {
        return Err(DecodeError::invalid(
            NumericProvider::KIND,
            format!("max must be >= min, got min {min} and max {max}"),
        ));
    }
    Ok(())
}

impl Canonical for NumericProvider {
    const KIND: &'static str = "numeric provider";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        if let Value::Number(n) = value {
            return Ok(NumericProvider::Constant(*n));
        }
        let fields = Fields::of(Self::KIND, value)?;
        let ty = fields.discriminator()?;
        if ty == "constant" {
            return Ok(NumericProvider::Constant(fields.f64("value")?));
        }

        if !KNOWN_TYPES.contains(&ty) {
            return Err(fields.unknown(ty));
        }
        let params = Fields::of(Self::KIND, fields.require("value")?).map_err(|e| e.at("value"))?;
        let provider = decode_params(ty, &params).map_err(|e| e.at("value"))?;
        if !matches!(provider, NumericProvider::WeightedList(_)) {
            check_bounds(provider.min_value(), provider.max_value())?;
        }
        Ok(provider)
    }

    fn encode(&self) -> Value {
        let params = match self {
            NumericProvider::Constant(c) => return Value::Number(*c),
            NumericProvider::Uniform { min, max } | NumericProvider::BiasedToBottom { min, max } => {
                Value::object([("min", Value::from(*min)), ("max", Value::from(*max))])
            }
            NumericProvider::Trapezoid { min, max, plateau } => Value::object([
                ("min", Value::from(*min)),
                ("max", Value::from(*max)),
                ("plateau", Value::from(*plateau)),
            ]),
            NumericProvider::ClampedNormal {
                mean,
                deviation,
                min,
                max,
            } => Value::object([
                ("mean", Value::from(*mean)),
                ("deviation", Value::from(*deviation)),
                ("min", Value::from(*min)),
                ("max", Value::from(*max)),
            ]),
            NumericProvider::Clamped { source, min, max } => Value::object([
                ("source", source.encode()),
                ("min", Value::from(*min)),
                ("max", Value::from(*max)),
            ]),
            NumericProvider::WeightedList(entries) => {
                Value::object([("distribution", encode_weighted(entries))])
            }
        };
        Value::object([("type", Value::from(self.type_name())), ("value", params)])
    }
}

fn decode_params(ty: &str, params: &Fields<'_>) -> Result<NumericProvider, DecodeError> {
    Ok(match ty {
        "uniform" => NumericProvider::Uniform {
            min: params.f64("min")?,
            max: params.f64("max")?,
        },
        "biased_to_bottom" => NumericProvider::BiasedToBottom {
            min: params.f64("min")?,
            max: params.f64("max")?,
        },
        "trapezoid" => NumericProvider::Trapezoid {
            min: params.f64("min")?,
            max: params.f64("max")?,
            plateau: params.f64("plateau")?,
        },
        "clamped_normal" => NumericProvider::ClampedNormal {
            mean: params.f64("mean")?,
            deviation: params.f64("deviation")?,
            min: params.f64("min")?,
            max: params.f64("max")?,
        },
        "clamped" => NumericProvider::Clamped {
            source: Box::new(params.decode("source")?),
            min: params.f64("min")?,
            max: params.f64("max")?,
        },
        "weighted_list" => NumericProvider::WeightedList(
            decode_weighted(NumericProvider::KIND, params.require("distribution")?)
                .map_err(|e| e.at("distribution"))?,
        ),
        other => return Err(params.unknown(other)),
    })
}

const KNOWN_TYPES: [&str; 6] = [
    "uniform",
    "biased_to_bottom",
    "trapezoid",
    "clamped_normal",
    "clamped",
    "weighted_list",
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(v: serde_json::Value) -> Result<NumericProvider, DecodeError> {
        NumericProvider::decode(&Value::from(v))
    }

    #[test]
    fn constant_encodes_as_bare_number() {
        assert_eq!(NumericProvider::Constant(4.0).encode(), Value::Number(4.0));
        assert_eq!(decode(json!({"type": "minecraft:constant", "value": 4})).unwrap(), NumericProvider::Constant(4.0));
    }

    #[test]
    fn uniform_document_shape() {
        let p = NumericProvider::Uniform { min: 1.0, max: 6.0 };
        assert_eq!(
            p.encode().to_string(),
            r#"{"type":"uniform","value":{"min":1,"max":6}}"#
        );
        assert_eq!(decode(json!({"type":"uniform","value":{"min":1,"max":6}})).unwrap(), p);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = decode(json!({"type":"uniform","value":{"min":6,"max":1}})).unwrap_err();
        assert!(err.to_string().contains("max must be >= min"));
    }

    #[test]
    fn unknown_type_is_an_unknown_variant() {
        let err = decode(json!({"type": "bogus"})).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVariant { .. }));
    }

    #[test]
    fn clamped_nests_a_provider() {
        let p = NumericProvider::Clamped {
            source: Box::new(NumericProvider::Uniform { min: -2.0, max: 9.0 }),
            min: 0.0,
            max: 5.0,
        };
        assert_eq!(NumericProvider::decode(&p.encode()).unwrap(), p);
    }

    #[test]
    fn weighted_list_bounds_span_entries() {
        let p = NumericProvider::WeightedList(vec![
            Weighted::new(NumericProvider::Constant(2.0), 1),
            Weighted::new(NumericProvider::Uniform { min: -1.0, max: 7.0 }, 3),
        ]);
        assert_eq!(p.min_value(), -1.0);
        assert_eq!(p.max_value(), 7.0);
    }
}
