use super::{Coercer, Coercible, Shape, keys};
use crate::types::predicate::check_offset;
use crate::types::{BlockPredicate, BlockState, Direction, ResourceLocation, Vec3i};
use crate::value::{Map, Value};

const VARIANTS: &[&str] = &[
    "true",
    "not",
    "all_of",
    "any_of",
    "matching_block_tag",
    "matching_blocks",
    "matching_fluids",
    "has_sturdy_face",
    "solid",
    "replaceable",
    "no_fluid",
    "would_survive",
    "inside_world_bounds",
];

const ALIASES: &[(&str, &str)] = &[
    ("tag", "matching_block_tag"),
    ("blocks", "matching_blocks"),
    ("fluids", "matching_fluids"),
    ("sturdy_face", "has_sturdy_face"),
    ("sturdy", "has_sturdy_face"),
    ("in_world", "inside_world_bounds"),
];

fn keyword(word: &str) -> Shape<BlockPredicate> {
    let at_origin = Vec3i::ZERO;
    Shape::Matched(match keys::normalize(word.trim()).as_str() {
        "true" | "alwaystrue" => BlockPredicate::True,
        "false" | "alwaysfalse" => BlockPredicate::always_false(),
        "nofluid" => BlockPredicate::NoFluid { offset: at_origin },
        "replaceable" => BlockPredicate::Replaceable { offset: at_origin },
        "solid" => BlockPredicate::Solid { offset: at_origin },
        "inworld" | "insideworldbounds" => BlockPredicate::InsideWorldBounds { offset: at_origin },
        _ => return Shape::Silent,
    })
}

/// `[x, y, z]` or `{x, y, z}`; absent means the origin.
fn offset(map: &Map) -> Option<Vec3i> {
    let Some(raw) = keys::get_any(map, &["offset"]) else {
        return Some(Vec3i::ZERO);
    };
    let v = match raw {
        Value::Array(xs) => match xs.as_slice() {
            [x, y, z] => Vec3i::new(keys::int(x)?, keys::int(y)?, keys::int(z)?),
            _ => return None,
        },
        Value::Object(xyz) => Vec3i::new(
            keys::int_or(xyz, &["x"], 0)?,
            keys::int_or(xyz, &["y"], 0)?,
            keys::int_or(xyz, &["z"], 0)?,
        ),
        _ => return None,
    };
    check_offset(v).ok()
}

fn ids(values: &[Value]) -> Option<Vec<ResourceLocation>> {
    values
        .iter()
        .map(|v| ResourceLocation::parse(v.as_str()?.trim_start_matches('#')).ok())
        .collect()
}

fn typed(variant: &str, map: &Map, cx: &Coercer<'_>) -> Option<BlockPredicate> {
    let predicates = || -> Option<Vec<BlockPredicate>> {
        let raw = keys::get_any(map, &["predicates", "values"])?;
        Some(keys::one_or_many(raw).iter().map(|p| cx.coerce_value(p)).collect())
    };
    Some(match variant {
        "true" => BlockPredicate::True,
        "not" => BlockPredicate::not(cx.coerce_value(keys::get_any(map, keys::PREDICATE)?)),
        "all_of" => BlockPredicate::AllOf(predicates()?),
        "any_of" => BlockPredicate::AnyOf(predicates()?),
        "matching_block_tag" => {
            let tag = keys::get_any(map, &["tag"])?.as_str()?;
            BlockPredicate::MatchingBlockTag {
                offset: offset(map)?,
                tag: ResourceLocation::parse(tag.trim_start_matches('#')).ok()?,
            }
        }
        "matching_blocks" => BlockPredicate::MatchingBlocks {
            offset: offset(map)?,
            blocks: ids(keys::one_or_many(keys::get_any(map, &["blocks", "block"])?))?,
        },
        "matching_fluids" => BlockPredicate::matching_fluids(
            offset(map)?,
            ids(keys::one_or_many(keys::get_any(map, &["fluids", "fluid"])?))?,
        ),
        "has_sturdy_face" => BlockPredicate::HasSturdyFace {
            offset: offset(map)?,
            direction: match keys::get_any(map, &["direction"]) {
                Some(name) => Direction::from_name(name.as_str()?)?,
                None => Direction::Down,
            },
        },
        "solid" => BlockPredicate::Solid { offset: offset(map)? },
        "replaceable" => BlockPredicate::Replaceable { offset: offset(map)? },
        "no_fluid" => BlockPredicate::NoFluid { offset: offset(map)? },
        "would_survive" => BlockPredicate::WouldSurvive {
            offset: offset(map)?,
            state: cx.coerce_value::<BlockState>(keys::get_any(map, &["state"])?),
        },
        "inside_world_bounds" => BlockPredicate::InsideWorldBounds { offset: offset(map)? },
        _ => return None,
    })
}

impl Coercible for BlockPredicate {
    fn from_scalar(value: &Value, _cx: &Coercer<'_>) -> Shape<Self> {
        match value {
            Value::String(word) => keyword(word),
            Value::Bool(true) => Shape::Matched(BlockPredicate::True),
            Value::Bool(false) => Shape::Matched(BlockPredicate::always_false()),
            _ => Shape::Next,
        }
    }

    /// A list of block ids matches any of them at the origin.
    fn from_array(items: &[Value], _cx: &Coercer<'_>) -> Shape<Self> {
        if items.is_empty() {
            return Shape::Next;
        }
        Shape::from_option(ids(items).map(|blocks| {
            BlockPredicate::MatchingBlocks {
                offset: Vec3i::ZERO,
                blocks,
            }
        }))
    }

    fn from_object(map: &Map, cx: &Coercer<'_>) -> Shape<Self> {
        let Some(d) = keys::discriminator(map) else {
            return Shape::Next;
        };
        match keys::select_with(&d, VARIANTS, ALIASES) {
            Some(variant) => Shape::from_option(typed(variant, map, cx)),
            None => Shape::Silent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::types::Canonical;
    use serde_json::json;

    fn coerce(v: serde_json::Value) -> (BlockPredicate, usize) {
        let sink = CollectingSink::new();
        let out = Coercer::new(&sink).coerce_value(&Value::from(v));
        (out, sink.len())
    }

    #[test]
    fn bogus_type_is_a_silent_always_false() {
        assert_eq!(coerce(json!({"type": "bogus"})), (BlockPredicate::always_false(), 0));
        assert_eq!(coerce(json!("sometimes")), (BlockPredicate::always_false(), 0));
    }

    #[test]
    fn keywords() {
        assert_eq!(coerce(json!("always_true")).0, BlockPredicate::True);
        assert_eq!(coerce(json!("in_world")).0, BlockPredicate::InsideWorldBounds { offset: Vec3i::ZERO });
        assert_eq!(coerce(json!("no_fluid")).0, BlockPredicate::NoFluid { offset: Vec3i::ZERO });
    }

    #[test]
    fn array_is_a_block_set() {
        assert_eq!(
            coerce(json!(["stone", "minecraft:dirt"])).0,
            BlockPredicate::MatchingBlocks {
                offset: Vec3i::ZERO,
                blocks: vec![ResourceLocation::minecraft("stone"), ResourceLocation::minecraft("dirt")],
            }
        );
    }

    #[test]
    fn object_offsets_and_single_element_lists() {
        let (p, diagnostics) = coerce(json!({
            "type": "all_of",
            "predicates": {"type": "matching_blocks", "offset": {"y": -1}, "blocks": "grass_block"}
        }));
        assert_eq!(diagnostics, 0);
        assert_eq!(
            p,
            BlockPredicate::AllOf(vec![BlockPredicate::MatchingBlocks {
                offset: Vec3i::new(0, -1, 0),
                blocks: vec![ResourceLocation::minecraft("grass_block")],
            }])
        );
    }

    #[test]
    fn nested_predicates_are_coerced() {
        let (p, _) = coerce(json!({"type": "not", "value": "solid"}));
        assert_eq!(p, BlockPredicate::not(BlockPredicate::Solid { offset: Vec3i::ZERO }));
    }

    #[test]
    fn serialized_document_is_accepted() {
        let p = BlockPredicate::AnyOf(vec![
            BlockPredicate::WouldSurvive {
                offset: Vec3i::new(1, 0, 0),
                state: BlockState::parse("oak_sapling[stage=0]").unwrap(),
            },
            BlockPredicate::HasSturdyFace { offset: Vec3i::ZERO, direction: Direction::Up },
        ]);
        assert_eq!(coerce(serde_json::Value::from(&p.encode())), (p, 0));
    }

    #[test]
    fn short_type_names() {
        let at_origin = Vec3i::ZERO;
        assert_eq!(
            coerce(json!({"type": "tag", "tag": "#minecraft:logs"})),
            (
                BlockPredicate::MatchingBlockTag {
                    offset: at_origin,
                    tag: ResourceLocation::minecraft("logs"),
                },
                0
            )
        );
        assert_eq!(
            coerce(json!({"type": "blocks", "blocks": ["stone"]})).0,
            BlockPredicate::MatchingBlocks {
                offset: at_origin,
                blocks: vec![ResourceLocation::minecraft("stone")],
            }
        );
        assert_eq!(
            coerce(json!({"type": "fluids", "fluids": "water"})).0,
            BlockPredicate::matching_fluids(at_origin, vec![ResourceLocation::minecraft("water")])
        );
        assert_eq!(
            coerce(json!({"type": "inWorld", "offset": [0, 2, 0]})).0,
            BlockPredicate::InsideWorldBounds { offset: Vec3i::new(0, 2, 0) }
        );
        for ty in ["sturdy_face", "sturdyFace", "sturdy"] {
            assert_eq!(
                coerce(json!({"type": ty, "direction": "north"})).0,
                BlockPredicate::HasSturdyFace { offset: at_origin, direction: Direction::North },
                "type {ty}"
            );
        }
    }

    #[test]
    fn sturdy_face_defaults_to_down() {
        assert_eq!(
            coerce(json!({"type": "has_sturdy_face"})),
            (BlockPredicate::HasSturdyFace { offset: Vec3i::ZERO, direction: Direction::Down }, 0)
        );
        assert_eq!(
            coerce(json!({"type": "sturdy", "offset": [0, -1, 0]})).0,
            BlockPredicate::HasSturdyFace { offset: Vec3i::new(0, -1, 0), direction: Direction::Down }
        );
    }

    #[test]
    fn malformed_variant_parameters_are_reported() {
        let (p, diagnostics) = coerce(json!({"type": "has_sturdy_face", "direction": "inward"}));
        assert_eq!(p, BlockPredicate::always_false());
        assert_eq!(diagnostics, 1);
    }
}
