use super::{Coercer, Coercible, Shape, keys, weighted_items};
use crate::types::NumericProvider;
use crate::value::{Map, Value};

const VARIANTS: &[&str] = &[
    "constant",
    "uniform",
    "biased_to_bottom",
    "trapezoid",
    "clamped_normal",
    "clamped",
    "weighted_list",
];

fn ordered(min: f64, max: f64) -> Option<(f64, f64)> {
    (min <= max).then_some((min, max))
}

fn bounds(map: &Map) -> Option<(f64, f64)> {
    ordered(keys::number_at(map, keys::MIN)?, keys::number_at(map, keys::MAX)?)
}

fn typed(variant: &str, map: &Map, cx: &Coercer<'_>) -> Option<NumericProvider> {
    Some(match variant {
        "constant" => NumericProvider::Constant(keys::number_at(map, keys::VALUE)?),
        "uniform" => {
            let (min, max) = bounds(map)?;
            NumericProvider::range(min, max)
        }
        "biased_to_bottom" => {
            let (min, max) = bounds(map)?;
            NumericProvider::BiasedToBottom { min, max }
        }
        "trapezoid" => {
            let (min, max) = bounds(map)?;
            NumericProvider::Trapezoid {
                min,
                max,
                plateau: keys::number_or(map, &["plateau"], 0.0)?,
            }
        }
        "clamped_normal" => {
            let (min, max) = bounds(map)?;
            NumericProvider::ClampedNormal {
                mean: keys::number_at(map, &["mean"])?,
                deviation: keys::number_at(map, &["deviation"])?,
                min,
                max,
            }
        }
        "clamped" => {
            let (min, max) = bounds(map)?;
            let source = keys::get_any(map, &["source"])?;
            NumericProvider::Clamped {
                source: Box::new(cx.coerce_value(source)),
                min,
                max,
            }
        }
        "weighted_list" => {
            let items = keys::get_any(map, keys::LIST)?.as_array()?;
            NumericProvider::WeightedList(weighted_items(items, cx)?)
        }
        _ => return None,
    })
}

/// Objects without a discriminator, matched by the keys they carry.
fn untyped(map: &Map) -> Option<NumericProvider> {
    if let Some(value) = keys::get_any(map, keys::VALUE) {
        return keys::number(value).map(NumericProvider::Constant);
    }
    let (min, max) = bounds(map)?;
    if let Some(plateau) = keys::get_any(map, &["plateau"]) {
        return Some(NumericProvider::Trapezoid {
            min,
            max,
            plateau: keys::number(plateau)?,
        });
    }
    if keys::has_any(map, &["mean"]) || keys::has_any(map, &["deviation"]) {
        return Some(NumericProvider::ClampedNormal {
            mean: keys::number_at(map, &["mean"])?,
            deviation: keys::number_at(map, &["deviation"])?,
            min,
            max,
        });
    }
    Some(NumericProvider::range(min, max))
}

impl Coercible for NumericProvider {
    fn from_scalar(value: &Value, _cx: &Coercer<'_>) -> Shape<Self> {
        match value {
            Value::Number(n) => Shape::Matched(NumericProvider::Constant(*n)),
            Value::String(_) => match keys::number(value) {
                Some(n) => Shape::Matched(NumericProvider::Constant(n)),
                None => Shape::Silent,
            },
            _ => Shape::Next,
        }
    }

    fn from_array(items: &[Value], _cx: &Coercer<'_>) -> Shape<Self> {
        let range = match items {
            [only] => keys::number(only).map(NumericProvider::Constant),
            [a, b] => keys::number(a)
                .zip(keys::number(b))
                .and_then(|(a, b)| ordered(a, b))
                .map(|(min, max)| NumericProvider::range(min, max)),
            _ => None,
        };
        Shape::from_option(range)
    }

    fn from_object(map: &Map, cx: &Coercer<'_>) -> Shape<Self> {
        match keys::discriminator(map) {
            Some(d) => match keys::select(&d, VARIANTS) {
                Some(variant) => Shape::from_option(typed(variant, map, cx)),
                None => Shape::Silent,
            },
            None => Shape::from_option(untyped(map)),
        }
    }
}
