//! Block predicates.
//!
//! Leaf predicates test the block at `origin + offset`. `NoFluid` has no discriminator
//! of its own on the wire: it is a fluid match against `minecraft:empty`, and decoding
//! that exact shape gives back `NoFluid`.
use super::{BlockState, Canonical, Direction, Fields, ResourceLocation, Vec3i, decode_list};
use crate::error::DecodeError;
use crate::value::{Map, Value};

/// Offsets outside of this per-axis bound are rejected.
pub const MAX_OFFSET: u32 = 16;

#[derive(Clone, Debug, PartialEq)]
pub enum BlockPredicate {
    True,
    Not(Box<BlockPredicate>),
    AllOf(Vec<BlockPredicate>),
    AnyOf(Vec<BlockPredicate>),
    MatchingBlockTag { offset: Vec3i, tag: ResourceLocation },
    MatchingBlocks { offset: Vec3i, blocks: Vec<ResourceLocation> },
    MatchingFluids { offset: Vec3i, fluids: Vec<ResourceLocation> },
    HasSturdyFace { offset: Vec3i, direction: Direction },
    Solid { offset: Vec3i },
    Replaceable { offset: Vec3i },
    NoFluid { offset: Vec3i },
    WouldSurvive { offset: Vec3i, state: BlockState },
    InsideWorldBounds { offset: Vec3i },
}

impl Default for BlockPredicate {
    fn default() -> Self {
        Self::always_false()
    }
}

impl BlockPredicate {
    pub fn always_false() -> Self {
        BlockPredicate::Not(Box::new(BlockPredicate::True))
    }

    pub fn not(inner: BlockPredicate) -> Self {
        BlockPredicate::Not(Box::new(inner))
    }

    /// Fluid match; a match on exactly `minecraft:empty` is `NoFluid`.
    pub fn matching_fluids(offset: Vec3i, fluids: Vec<ResourceLocation>) -> Self {
        if is_empty_fluid(&fluids) {
            BlockPredicate::NoFluid { offset }
        } else {
            BlockPredicate::MatchingFluids { offset, fluids }
        }
    }

    pub fn offset(&self) -> Option<Vec3i> {
        match self {
            BlockPredicate::True
            | BlockPredicate::Not(_)
            | BlockPredicate::AllOf(_)
            | BlockPredicate::AnyOf(_) => None,
            BlockPredicate::MatchingBlockTag { offset, .. }
            | BlockPredicate::MatchingBlocks { offset, .. }
            | BlockPredicate::MatchingFluids { offset, .. }
            | BlockPredicate::HasSturdyFace { offset, .. }
            | BlockPredicate::Solid { offset }
            | BlockPredicate::Replaceable { offset }
            | BlockPredicate::NoFluid { offset }
            | BlockPredicate::WouldSurvive { offset, .. }
            | BlockPredicate::InsideWorldBounds { offset } => Some(*offset),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            BlockPredicate::True => "true",
            BlockPredicate::Not(_) => "not",
            BlockPredicate::AllOf(_) => "all_of",
            BlockPredicate::AnyOf(_) => "any_of",
            BlockPredicate::MatchingBlockTag { .. } => "matching_block_tag",
            BlockPredicate::MatchingBlocks { .. } => "matching_blocks",
            BlockPredicate::MatchingFluids { .. } | BlockPredicate::NoFluid { .. } => {
                "matching_fluids"
            }
            BlockPredicate::HasSturdyFace { .. } => "has_sturdy_face",
            BlockPredicate::Solid { .. } => "solid",
            BlockPredicate::Replaceable { .. } => "replaceable",
            BlockPredicate::WouldSurvive { .. } => "would_survive",
            BlockPredicate::InsideWorldBounds { .. } => "inside_world_bounds",
        }
    }
}

pub(crate) fn empty_fluid() -> ResourceLocation {
    ResourceLocation::minecraft("empty")
}

fn is_empty_fluid(fluids: &[ResourceLocation]) -> bool {
    matches!(fluids, [only] if *only == empty_fluid())
}

pub(crate) fn check_offset(offset: Vec3i) -> Result<Vec3i, DecodeError> {
    if offset.max_abs() > MAX_OFFSET {
        return Err(DecodeError::invalid(
            "offset",
            format!("{offset:?} exceeds {MAX_OFFSET} on some axis"),
        ));
    }
    Ok(offset)
}

/// A registry id list, also accepting a single id in place of a list.
fn decode_ids(value: &Value) -> Result<Vec<ResourceLocation>, DecodeError> {
    match value {
        Value::String(_) => Ok(vec![ResourceLocation::decode(value)?]),
        _ => decode_list(value, ResourceLocation::decode),
    }
}

fn encode_ids(ids: &[ResourceLocation]) -> Value {
    Value::Array(ids.iter().map(Canonical::encode).collect())
}

impl Canonical for BlockPredicate {
    const KIND: &'static str = "block predicate";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(Self::KIND, value)?;
        let ty = fields.discriminator()?;
        let offset = || -> Result<Vec3i, DecodeError> {
            match fields.get("offset") {
                Some(v) => Vec3i::decode(v).and_then(check_offset).map_err(|e| e.at("offset")),
                None => Ok(Vec3i::ZERO),
            }
        };
        let predicates = || fields.decode_list::<BlockPredicate>("predicates");

        Ok(match ty {
            "true" => BlockPredicate::True,
            "not" => BlockPredicate::not(fields.decode("predicate")?),
            "all_of" => BlockPredicate::AllOf(predicates()?),
            "any_of" => BlockPredicate::AnyOf(predicates()?),
            "matching_block_tag" => {
                let tag = fields.str("tag")?;
                BlockPredicate::MatchingBlockTag {
                    offset: offset()?,
                    tag: ResourceLocation::parse(tag.trim_start_matches('#'))
                        .map_err(|e| e.at("tag"))?,
                }
            }
            "matching_blocks" => BlockPredicate::MatchingBlocks {
                offset: offset()?,
                blocks: decode_ids(fields.require("blocks")?).map_err(|e| e.at("blocks"))?,
            },
            "matching_fluids" => BlockPredicate::matching_fluids(
                offset()?,
                decode_ids(fields.require("fluids")?).map_err(|e| e.at("fluids"))?,
            ),
            "has_sturdy_face" => BlockPredicate::HasSturdyFace {
                offset: offset()?,
                direction: fields.decode("direction")?,
            },
            "solid" => BlockPredicate::Solid { offset: offset()? },
            "replaceable" => BlockPredicate::Replaceable { offset: offset()? },
            "would_survive" => BlockPredicate::WouldSurvive {
                offset: offset()?,
                state: fields.decode("state")?,
            },
            "inside_world_bounds" => BlockPredicate::InsideWorldBounds { offset: offset()? },
            other => return Err(fields.unknown(other)),
        })
    }

    fn encode(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::from(self.type_name()));
        if let Some(offset) = self.offset().filter(|o| !o.is_zero()) {
            out.insert("offset".into(), offset.encode());
        }
        match self {
            BlockPredicate::Not(inner) => {
                out.insert("predicate".into(), inner.encode());
            }
            BlockPredicate::AllOf(xs) | BlockPredicate::AnyOf(xs) => {
                out.insert(
                    "predicates".into(),
                    Value::Array(xs.iter().map(Canonical::encode).collect()),
                );
            }
            BlockPredicate::MatchingBlockTag { tag, .. } => {
                out.insert("tag".into(), tag.encode());
            }
            BlockPredicate::MatchingBlocks { blocks, .. } => {
                out.insert("blocks".into(), encode_ids(blocks));
            }
            BlockPredicate::MatchingFluids { fluids, .. } => {
                out.insert("fluids".into(), encode_ids(fluids));
            }
            BlockPredicate::NoFluid { .. } => {
                out.insert("fluids".into(), encode_ids(&[empty_fluid()]));
            }
            BlockPredicate::HasSturdyFace { direction, .. } => {
                out.insert("direction".into(), direction.encode());
            }
            BlockPredicate::WouldSurvive { state, .. } => {
                out.insert("state".into(), state.encode());
            }
            BlockPredicate::True
            | BlockPredicate::Solid { .. }
            | BlockPredicate::Replaceable { .. }
            | BlockPredicate::InsideWorldBounds { .. } => {}
        }
        Value::Object(out)
    }
}
