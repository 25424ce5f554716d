use super::{Coercer, Coercible, Shape, keys, weighted_items};
use crate::types::{
    BlockState, BlockStateProvider, Canonical, IntRange, NoiseBase, NumericProvider,
};
use crate::value::{Map, Value};

const VARIANTS: &[&str] = &[
    "simple",
    "weighted",
    "noise",
    "dual_noise",
    "noise_threshold",
    "randomized_int_state",
    "rotated_block",
];

impl From<BlockState> for BlockStateProvider {
    fn from(state: BlockState) -> Self {
        BlockStateProvider::Simple(state)
    }
}

/// `weighted_state_provider` and `weighted` both select `weighted`.
fn variant(map: &Map) -> Option<Option<&'static str>> {
    let d = keys::discriminator(map)?;
    let d = d
        .strip_suffix("stateprovider")
        .or_else(|| d.strip_suffix("provider"))
        .unwrap_or(&d);
    Some(keys::select(d, VARIANTS))
}

fn state_at(map: &Map, synonyms: &[&str], cx: &Coercer<'_>) -> Option<BlockState> {
    keys::get_any(map, synonyms).map(|v| cx.coerce_value(v))
}

/// A non-empty state list; a single state stands in for a one-element list.
fn states_at(map: &Map, key: &str, cx: &Coercer<'_>) -> Option<Vec<BlockState>> {
    let raw = keys::get_any(map, &[key])?;
    let states: Vec<BlockState> = keys::one_or_many(raw)
        .iter()
        .map(|v| cx.coerce_value(v))
        .collect();
    (!states.is_empty()).then_some(states)
}

fn noise_base(map: &Map, cx: &Coercer<'_>) -> Option<NoiseBase> {
    Some(NoiseBase {
        seed: keys::number_or(map, &["seed"], 0.0).filter(|n| n.fract() == 0.0)? as i64,
        noise: keys::get_any(map, &["noise"])
            .map(|v| cx.coerce_value(v))
            .unwrap_or_default(),
        scale: keys::number_or(map, &["scale"], 1.0)?,
    })
}

fn typed(variant: &str, map: &Map, cx: &Coercer<'_>) -> Option<BlockStateProvider> {
    Some(match variant {
        "simple" => BlockStateProvider::Simple(state_at(map, keys::ENTRY_DATA, cx)?),
        "rotated_block" => BlockStateProvider::RotatedBlock(state_at(map, keys::ENTRY_DATA, cx)?),
        "weighted" => {
            let items = keys::get_any(map, keys::LIST)?.as_array()?;
            BlockStateProvider::Weighted(weighted_items(items, cx)?)
        }
        "noise" => BlockStateProvider::Noise {
            base: noise_base(map, cx)?,
            states: states_at(map, "states", cx)?,
        },
        "dual_noise" => BlockStateProvider::DualNoise {
            base: noise_base(map, cx)?,
            states: states_at(map, "states", cx)?,
            variety: IntRange::decode(keys::get_any(map, &["variety"])?).ok()?,
            slow_noise: keys::get_any(map, &["slow_noise"])
                .map(|v| cx.coerce_value(v))
                .unwrap_or_default(),
            slow_scale: keys::number_or(map, &["slow_scale"], 1.0)?,
        },
        "noise_threshold" => BlockStateProvider::NoiseThreshold {
            base: noise_base(map, cx)?,
            threshold: keys::number_at(map, &["threshold"])?,
            high_chance: keys::number_at(map, &["high_chance"])?,
            default_state: state_at(map, &["default_state"], cx)?,
            low_states: states_at(map, "low_states", cx)?,
            high_states: states_at(map, "high_states", cx)?,
        },
        "randomized_int_state" => BlockStateProvider::RandomizedIntState {
            source: Box::new(cx.coerce_value(keys::get_any(map, &["source"])?)),
            property: keys::get_any(map, &["property"])?.as_str()?.to_string(),
            values: cx.coerce_value::<NumericProvider>(keys::get_any(map, &["values"])?),
        },
        _ => return None,
    })
}

impl Coercible for BlockStateProvider {
    fn from_scalar(value: &Value, cx: &Coercer<'_>) -> Shape<Self> {
        match BlockState::from_scalar(value, cx) {
            Shape::Matched(state) => Shape::Matched(state.into()),
            Shape::Silent => Shape::Silent,
            Shape::Next => Shape::Next,
        }
    }

    /// A list of states, each with weight 1 unless it carries one.
    fn from_array(items: &[Value], cx: &Coercer<'_>) -> Shape<Self> {
        Shape::from_option(weighted_items(items, cx).map(BlockStateProvider::Weighted))
    }

    fn from_object(map: &Map, cx: &Coercer<'_>) -> Shape<Self> {
        match variant(map) {
            Some(Some(variant)) => Shape::from_option(typed(variant, map, cx)),
            Some(None) => Shape::Silent,
            None => Shape::from_option(
                keys::has_any(map, keys::BLOCK_ID)
                    .then(|| BlockStateProvider::Simple(cx.coerce_value(&Value::Object(map.clone())))),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::Input;
    use crate::diagnostics::CollectingSink;
    use crate::types::{NoiseParameters, ResourceLocation, Weighted};
    use serde_json::json;

    fn coerce(v: serde_json::Value) -> (BlockStateProvider, usize) {
        let sink = CollectingSink::new();
        let out = Coercer::new(&sink).coerce_value(&Value::from(v));
        (out, sink.len())
    }

    fn block(path: &str) -> BlockState {
        BlockState::new(ResourceLocation::minecraft(path))
    }

    #[test]
    fn typed_block_state_becomes_simple() {
        let sink = CollectingSink::new();
        let cx = Coercer::new(&sink);
        let p: BlockStateProvider = cx.coerce(Input::Typed(block("stone").into()));
        assert_eq!(p, BlockStateProvider::Simple(block("stone")));
    }

    #[test]
    fn string_and_list_shorthands() {
        assert_eq!(coerce(json!("andesite")).0, BlockStateProvider::Simple(block("andesite")));
        assert_eq!(
            coerce(json!(["granite", {"data": "diorite", "weight": 3}])).0,
            BlockStateProvider::Weighted(vec![
                Weighted::new(block("granite"), 1),
                Weighted::new(block("diorite"), 3),
            ])
        );
    }

    #[test]
    fn untyped_object_is_a_simple_state() {
        assert_eq!(
            coerce(json!({"name": "oak_log", "properties": {"axis": "x"}})).0,
            BlockStateProvider::Simple(block("oak_log").with_property("axis", "x"))
        );
    }

    #[test]
    fn short_discriminators_and_defaults() {
        let (p, diagnostics) = coerce(json!({
            "type": "noise",
            "states": ["sand", "red_sand"],
            "noise": [1.0]
        }));
        assert_eq!(diagnostics, 0);
        assert_eq!(
            p,
            BlockStateProvider::Noise {
                base: NoiseBase {
                    seed: 0,
                    noise: NoiseParameters::new(0, 1.0, vec![]),
                    scale: 1.0,
                },
                states: vec![block("sand"), block("red_sand")],
            }
        );
    }

    #[test]
    fn serialized_documents_round_trip() {
        let p = BlockStateProvider::NoiseThreshold {
            base: NoiseBase {
                seed: 2345,
                noise: NoiseParameters::new(0, 1.0, vec![]),
                scale: 0.005,
            },
            threshold: -0.8,
            high_chance: 0.33,
            default_state: block("grass_block"),
            low_states: vec![block("podzol")],
            high_states: vec![block("coarse_dirt"), block("mud")],
        };
        assert_eq!(coerce(serde_json::Value::from(&p.encode())), (p, 0));
    }

    #[test]
    fn unknown_provider_type_is_silent() {
        assert_eq!(coerce(json!({"type": "mymod:fancy_provider"})), (BlockStateProvider::default(), 0));
    }
}
