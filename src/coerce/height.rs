use super::{Coercer, Coercible, Shape, keys, weighted_items};
use crate::types::{HeightProvider, VerticalAnchor};
use crate::value::{Map, Value};

const ANCHOR_VARIANTS: &[&str] = &["absolute", "above_bottom", "below_top"];

const HEIGHT_VARIANTS: &[&str] = &[
    "constant",
    "uniform",
    "biased_to_bottom",
    "very_biased_to_bottom",
    "trapezoid",
    "weighted_list",
];

const ANCHOR_ALIASES: &[(&str, &str)] = &[
    ("bottom", "above_bottom"),
    ("above", "above_bottom"),
    ("top", "below_top"),
    ("below", "below_top"),
];

const HEIGHT_ALIASES: &[(&str, &str)] = &[
    ("bottom_bias", "biased_to_bottom"),
    ("list", "weighted_list"),
    ("simple_weighted_list", "weighted_list"),
];

const CONSTANT_ANCHOR: &[&str] = &["anchor", "value", "constant"];

fn anchor_keyword(word: &str) -> Option<VerticalAnchor> {
    match keys::normalize(word.trim()).as_str() {
        "bottom" | "above" | "abovebottom" | "minbuildheight" | "worldbottom" => {
            Some(VerticalAnchor::BOTTOM)
        }
        "top" | "below" | "belowtop" | "maxbuildheight" | "worldtop" => Some(VerticalAnchor::TOP),
        _ => None,
    }
}

/// `{"absolute": 5}` and friends, the form anchors are written in.
fn is_serialized_anchor(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|m| m.len() == 1 && ANCHOR_VARIANTS.iter().any(|k| m.contains_key(*k)))
}

/// Both bounds written the way [`HeightProvider`] encodes them. Such a range is kept as
/// written, equal bounds included.
fn has_serialized_bounds(map: &Map) -> bool {
    ["min_inclusive", "max_inclusive"]
        .iter()
        .all(|k| map.get(*k).is_some_and(is_serialized_anchor))
}

impl Coercible for VerticalAnchor {
    fn from_scalar(value: &Value, _cx: &Coercer<'_>) -> Shape<Self> {
        match value {
            Value::Number(_) => Shape::from_option(keys::int(value).map(VerticalAnchor::Absolute)),
            Value::String(word) => {
                let numeric = || keys::int(value).map(VerticalAnchor::Absolute);
                match anchor_keyword(word).or_else(numeric) {
                    Some(anchor) => Shape::Matched(anchor),
                    None => Shape::Silent,
                }
            }
            _ => Shape::Next,
        }
    }

    fn from_object(map: &Map, _cx: &Coercer<'_>) -> Shape<Self> {
        let Some(d) = keys::discriminator(map) else {
            // `{"value": 5}`; serialized anchors go to the codec
            return match keys::get_any(map, keys::VALUE) {
                Some(v) => Shape::from_option(keys::int(v).map(VerticalAnchor::Absolute)),
                None => Shape::Next,
            };
        };
        let Some(variant) = keys::select_with(&d, ANCHOR_VARIANTS, ANCHOR_ALIASES) else {
            return Shape::Silent;
        };
        let offset = keys::int_or(map, keys::VALUE, 0);
        Shape::from_option(offset.map(|n| match variant {
            "above_bottom" => VerticalAnchor::AboveBottom(n),
            "below_top" => VerticalAnchor::BelowTop(n),
            _ => VerticalAnchor::Absolute(n),
        }))
    }
}

fn anchor_at(map: &Map, synonyms: &[&str], cx: &Coercer<'_>) -> Option<VerticalAnchor> {
    keys::get_any(map, synonyms).map(|v| cx.coerce_value(v))
}

fn bounds(map: &Map, cx: &Coercer<'_>) -> Option<(VerticalAnchor, VerticalAnchor)> {
    Some((anchor_at(map, keys::MIN, cx)?, anchor_at(map, keys::MAX, cx)?))
}

fn typed(variant: &str, map: &Map, cx: &Coercer<'_>) -> Option<HeightProvider> {
    let biased = |min: VerticalAnchor, max: VerticalAnchor, inner: i32, very: bool| {
        if very {
            HeightProvider::VeryBiasedToBottom { min, max, inner }
        } else {
            HeightProvider::BiasedToBottom { min, max, inner }
        }
    };
    Some(match variant {
        "constant" => HeightProvider::Constant(anchor_at(map, CONSTANT_ANCHOR, cx)?),
        "uniform" if has_serialized_bounds(map) => {
            let (min, max) = bounds(map, cx)?;
            HeightProvider::Uniform { min, max }
        }
        "uniform" => {
            let (min, max) = bounds(map, cx)?;
            HeightProvider::range(min, max)
        }
        "biased_to_bottom" | "very_biased_to_bottom" => {
            let (min, max) = bounds(map, cx)?;
            let inner = keys::int_or(map, &["inner"], 1)?.max(1);
            let very = variant == "very_biased_to_bottom"
                || keys::get_any(map, &["very"]).and_then(Value::as_bool).unwrap_or(false);
            biased(min, max, inner, very)
        }
        "trapezoid" => {
            let (min, max) = bounds(map, cx)?;
            HeightProvider::Trapezoid {
                min,
                max,
                plateau: keys::int_or(map, &["plateau"], 0)?,
            }
        }
        "weighted_list" => {
            let items = keys::get_any(map, keys::LIST)?.as_array()?;
            HeightProvider::WeightedList(weighted_items(items, cx)?)
        }
        _ => return None,
    })
}

impl Coercible for HeightProvider {
    fn from_scalar(value: &Value, cx: &Coercer<'_>) -> Shape<Self> {
        match VerticalAnchor::from_scalar(value, cx) {
            Shape::Matched(anchor) => Shape::Matched(HeightProvider::Constant(anchor)),
            Shape::Silent => Shape::Silent,
            Shape::Next => Shape::Next,
        }
    }

    fn from_array(items: &[Value], cx: &Coercer<'_>) -> Shape<Self> {
        match items {
            [only] => Shape::Matched(HeightProvider::Constant(cx.coerce_value(only))),
            [a, b] => Shape::Matched(HeightProvider::range(cx.coerce_value(a), cx.coerce_value(b))),
            _ => Shape::Next,
        }
    }

    fn from_object(map: &Map, cx: &Coercer<'_>) -> Shape<Self> {
        match keys::discriminator(map) {
            Some(d) => match keys::select_with(&d, HEIGHT_VARIANTS, HEIGHT_ALIASES) {
                Some(variant) => Shape::from_option(typed(variant, map, cx)),
                None => Shape::Silent,
            },
            // a bare serialized anchor is left to the codec
            None if ANCHOR_VARIANTS.iter().any(|k| map.contains_key(*k)) => Shape::Next,
            None if keys::has_any(map, CONSTANT_ANCHOR) => Shape::from_option(
                anchor_at(map, CONSTANT_ANCHOR, cx).map(HeightProvider::Constant),
            ),
            None => Shape::from_option(
                bounds(map, cx).map(|(min, max)| HeightProvider::range(min, max)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::types::{Canonical, Weighted};
    use serde_json::json;

    fn coerce<T: Coercible>(v: serde_json::Value) -> (T, usize) {
        let sink = CollectingSink::new();
        let out = Coercer::new(&sink).coerce_value(&Value::from(v));
        (out, sink.len())
    }

    #[test]
    fn anchor_keywords_and_numeric_strings() {
        assert_eq!(coerce::<VerticalAnchor>(json!("bottom")).0, VerticalAnchor::BOTTOM);
        assert_eq!(coerce::<VerticalAnchor>(json!("TOP")).0, VerticalAnchor::TOP);
        assert_eq!(coerce::<VerticalAnchor>(json!("-32")).0, VerticalAnchor::Absolute(-32));
        assert_eq!(coerce::<VerticalAnchor>(json!("sky")), (VerticalAnchor::default(), 0));
        assert_eq!(
            coerce::<VerticalAnchor>(json!({"type": "below_top", "value": 10})).0,
            VerticalAnchor::BelowTop(10)
        );
    }

    #[test]
    fn number_and_pair_shorthands() {
        assert_eq!(
            coerce::<HeightProvider>(json!(12)).0,
            HeightProvider::Constant(VerticalAnchor::Absolute(12))
        );
        assert_eq!(
            coerce::<HeightProvider>(json!([-64, "top"])).0,
            HeightProvider::Uniform {
                min: VerticalAnchor::Absolute(-64),
                max: VerticalAnchor::TOP,
            }
        );
        assert_eq!(
            coerce::<HeightProvider>(json!([7, 7])).0,
            HeightProvider::Constant(VerticalAnchor::Absolute(7))
        );
    }

    #[test]
    fn biased_flag_and_inner_default() {
        assert_eq!(
            coerce::<HeightProvider>(json!({"type": "biased_to_bottom", "min": 0, "max": 40, "very": true})).0,
            HeightProvider::VeryBiasedToBottom {
                min: VerticalAnchor::Absolute(0),
                max: VerticalAnchor::Absolute(40),
                inner: 1,
            }
        );
    }

    #[test]
    fn weighted_items_default_to_weight_one() {
        assert_eq!(
            coerce::<HeightProvider>(json!({"type": "weighted_list", "values": [5, {"data": [0, 9], "weight": 3}]})).0,
            HeightProvider::WeightedList(vec![
                Weighted::new(HeightProvider::Constant(VerticalAnchor::Absolute(5)), 1),
                Weighted::new(
                    HeightProvider::Uniform {
                        min: VerticalAnchor::Absolute(0),
                        max: VerticalAnchor::Absolute(9),
                    },
                    3
                ),
            ])
        );
    }

    #[test]
    fn anchor_aliases_and_untyped_values() {
        assert_eq!(coerce::<VerticalAnchor>(json!("above")), (VerticalAnchor::BOTTOM, 0));
        assert_eq!(coerce::<VerticalAnchor>(json!("below")), (VerticalAnchor::TOP, 0));
        assert_eq!(coerce::<VerticalAnchor>(json!({"value": 5})), (VerticalAnchor::Absolute(5), 0));
        assert_eq!(
            coerce::<VerticalAnchor>(json!({"type": "bottom", "value": 5})),
            (VerticalAnchor::AboveBottom(5), 0)
        );
        assert_eq!(
            coerce::<VerticalAnchor>(json!({"type": "above", "value": 2})).0,
            VerticalAnchor::AboveBottom(2)
        );
        assert_eq!(
            coerce::<VerticalAnchor>(json!({"type": "top", "value": 7})).0,
            VerticalAnchor::BelowTop(7)
        );
        assert_eq!(
            coerce::<VerticalAnchor>(json!({"type": "below"})).0,
            VerticalAnchor::BelowTop(0)
        );
    }

    #[test]
    fn constant_reads_anchor_key() {
        assert_eq!(
            coerce::<HeightProvider>(json!({"type": "constant", "anchor": 64})),
            (HeightProvider::Constant(VerticalAnchor::Absolute(64)), 0)
        );
        assert_eq!(
            coerce::<HeightProvider>(json!({"type": "constant", "anchor": "top"})).0,
            HeightProvider::Constant(VerticalAnchor::TOP)
        );
        assert_eq!(
            coerce::<HeightProvider>(json!({"value": {"type": "above_bottom", "value": 4}})).0,
            HeightProvider::Constant(VerticalAnchor::AboveBottom(4))
        );
    }

    #[test]
    fn height_type_aliases() {
        assert_eq!(
            coerce::<HeightProvider>(json!({"type": "bottom_bias", "min": 0, "max": 40})),
            (
                HeightProvider::BiasedToBottom {
                    min: VerticalAnchor::Absolute(0),
                    max: VerticalAnchor::Absolute(40),
                    inner: 1,
                },
                0
            )
        );
        let expected = HeightProvider::WeightedList(vec![Weighted::new(
            HeightProvider::Constant(VerticalAnchor::Absolute(3)),
            1,
        )]);
        for ty in ["list", "simple_weighted_list", "weightedList", "simpleWeightedList"] {
            assert_eq!(
                coerce::<HeightProvider>(json!({"type": ty, "values": [3]})).0,
                expected,
                "type {ty}"
            );
        }
    }

    #[test]
    fn weighted_items_carry_their_weight_inline() {
        assert_eq!(
            coerce::<HeightProvider>(json!({
                "type": "weighted_list",
                "values": [{"type": "uniform", "min": 0, "max": 9, "weight": 3}]
            })),
            (
                HeightProvider::WeightedList(vec![Weighted::new(
                    HeightProvider::Uniform {
                        min: VerticalAnchor::Absolute(0),
                        max: VerticalAnchor::Absolute(9),
                    },
                    3
                )]),
                0
            )
        );
    }

    #[test]
    fn serialized_uniform_keeps_equal_bounds() {
        let h = HeightProvider::Uniform {
            min: VerticalAnchor::Absolute(5),
            max: VerticalAnchor::Absolute(5),
        };
        assert_eq!(coerce::<HeightProvider>(serde_json::Value::from(&h.encode())), (h.clone(), 0));
        let list = HeightProvider::WeightedList(vec![Weighted::new(h, 2)]);
        assert_eq!(coerce::<HeightProvider>(serde_json::Value::from(&list.encode())), (list, 0));
        // loosely written equal bounds still collapse
        assert_eq!(
            coerce::<HeightProvider>(json!({"type": "uniform", "min": 5, "max": 5})).0,
            HeightProvider::Constant(VerticalAnchor::Absolute(5))
        );
    }

    #[test]
    fn serialized_forms_pass_through() {
        let h = HeightProvider::Trapezoid {
            min: VerticalAnchor::AboveBottom(8),
            max: VerticalAnchor::BelowTop(8),
            plateau: 2,
        };
        assert_eq!(coerce::<HeightProvider>(serde_json::Value::from(&h.encode())), (h, 0));
        let bare = HeightProvider::Constant(VerticalAnchor::AboveBottom(3));
        assert_eq!(coerce::<HeightProvider>(serde_json::Value::from(&bare.encode())), (bare, 0));
    }
}
