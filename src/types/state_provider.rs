//! Block-state providers, using the inline `{"type": "..._provider", ...}` layout.
use super::{
    BlockState, Canonical, Fields, IntRange, NoiseParameters, NumericProvider, Weighted,
    decode_weighted, encode_weighted,
};
use crate::error::DecodeError;
use crate::value::{Map, Value};

/// Noise settings shared by the noise-driven providers.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseBase {
    pub seed: i64,
    pub noise: NoiseParameters,
    pub scale: f64,
}

impl Default for NoiseBase {
    fn default() -> Self {
        Self {
            seed: 0,
            noise: NoiseParameters::default(),
            scale: 1.0,
        }
    }
}

impl NoiseBase {
    fn decode_from(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            seed: fields.i64("seed")?,
            noise: fields.decode("noise")?,
            scale: fields.f64("scale")?,
        })
    }

    fn encode_into(&self, out: &mut Map) {
        out.insert("seed".into(), Value::from(self.seed));
        out.insert("noise".into(), self.noise.encode());
        out.insert("scale".into(), Value::from(self.scale));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BlockStateProvider {
    Simple(BlockState),
    Weighted(Vec<Weighted<BlockState>>),
    Noise {
        base: NoiseBase,
        states: Vec<BlockState>,
    },
    DualNoise {
        base: NoiseBase,
        states: Vec<BlockState>,
        variety: IntRange,
        slow_noise: NoiseParameters,
        slow_scale: f64,
    },
    NoiseThreshold {
        base: NoiseBase,
        threshold: f64,
        high_chance: f64,
        default_state: BlockState,
        low_states: Vec<BlockState>,
        high_states: Vec<BlockState>,
    },
    RandomizedIntState {
        source: Box<BlockStateProvider>,
        property: String,
        values: NumericProvider,
    },
    RotatedBlock(BlockState),
}

impl Default for BlockStateProvider {
    fn default() -> Self {
        BlockStateProvider::Simple(BlockState::air())
    }
}

impl BlockStateProvider {
    fn type_name(&self) -> &'static str {
        match self {
            BlockStateProvider::Simple(_) => "simple_state_provider",
            BlockStateProvider::Weighted(_) => "weighted_state_provider",
            BlockStateProvider::Noise { .. } => "noise_provider",
            BlockStateProvider::DualNoise { .. } => "dual_noise_provider",
            BlockStateProvider::NoiseThreshold { .. } => "noise_threshold_provider",
            BlockStateProvider::RandomizedIntState { .. } => "randomized_int_state_provider",
            BlockStateProvider::RotatedBlock(_) => "rotated_block_provider",
        }
    }
}

fn non_empty_states(fields: &Fields<'_>, key: &str) -> Result<Vec<BlockState>, DecodeError> {
    let states = fields.decode_list::<BlockState>(key)?;
    if states.is_empty() {
        return Err(DecodeError::invalid(BlockStateProvider::KIND, "list must not be empty").at(key));
    }
    Ok(states)
}

fn encode_states(states: &[BlockState]) -> Value {
    Value::Array(states.iter().map(Canonical::encode).collect())
}

impl Canonical for BlockStateProvider {
    const KIND: &'static str = "block state provider";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(Self::KIND, value)?;
        Ok(match fields.discriminator()? {
            "simple_state_provider" => BlockStateProvider::Simple(fields.decode("state")?),
            "rotated_block_provider" => BlockStateProvider::RotatedBlock(fields.decode("state")?),
            "weighted_state_provider" => BlockStateProvider::Weighted(
                decode_weighted(Self::KIND, fields.require("entries")?)
                    .map_err(|e| e.at("entries"))?,
            ),
            "noise_provider" => BlockStateProvider::Noise {
                base: NoiseBase::decode_from(&fields)?,
                states: non_empty_states(&fields, "states")?,
            },
            "dual_noise_provider" => BlockStateProvider::DualNoise {
                base: NoiseBase::decode_from(&fields)?,
                states: non_empty_states(&fields, "states")?,
                variety: fields.decode("variety")?,
                slow_noise: fields.decode("slow_noise")?,
                slow_scale: fields.f64("slow_scale")?,
            },
            "noise_threshold_provider" => BlockStateProvider::NoiseThreshold {
                base: NoiseBase::decode_from(&fields)?,
                threshold: fields.f64("threshold")?,
                high_chance: fields.f64("high_chance")?,
                default_state: fields.decode("default_state")?,
                low_states: non_empty_states(&fields, "low_states")?,
                high_states: non_empty_states(&fields, "high_states")?,
            },
            "randomized_int_state_provider" => BlockStateProvider::RandomizedIntState {
                source: Box::new(fields.decode("source")?),
                property: fields.str("property")?.to_string(),
                values: fields.decode("values")?,
            },
            other => return Err(fields.unknown(other)),
        })
    }

    fn encode(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), Value::from(self.type_name()));
        match self {
            BlockStateProvider::Simple(state) | BlockStateProvider::RotatedBlock(state) => {
                out.insert("state".into(), state.encode());
            }
            BlockStateProvider::Weighted(entries) => {
                out.insert("entries".into(), encode_weighted(entries));
            }
            BlockStateProvider::Noise { base, states } => {
                base.encode_into(&mut out);
                out.insert("states".into(), encode_states(states));
            }
            BlockStateProvider::DualNoise {
                base,
                states,
                variety,
                slow_noise,
                slow_scale,
            } => {
                base.encode_into(&mut out);
                out.insert("states".into(), encode_states(states));
                out.insert("variety".into(), variety.encode());
                out.insert("slow_noise".into(), slow_noise.encode());
                out.insert("slow_scale".into(), Value::from(*slow_scale));
            }
            BlockStateProvider::NoiseThreshold {
                base,
                threshold,
                high_chance,
                default_state,
                low_states,
                high_states,
            } => {
                base.encode_into(&mut out);
                out.insert("threshold".into(), Value::from(*threshold));
                out.insert("high_chance".into(), Value::from(*high_chance));
                out.insert("default_state".into(), default_state.encode());
                out.insert("low_states".into(), encode_states(low_states));
                out.insert("high_states".into(), encode_states(high_states));
            }
            BlockStateProvider::RandomizedIntState {
                source,
                property,
                values,
            } => {
                out.insert("source".into(), source.encode());
                out.insert("property".into(), Value::from(property.as_str()));
                out.insert("values".into(), values.encode());
            }
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceLocation;
    use serde_json::json;

    fn stone() -> BlockState {
        BlockState::new(ResourceLocation::minecraft("stone"))
    }

    #[test]
    fn simple_provider_shape() {
        let p = BlockStateProvider::Simple(stone());
        assert_eq!(
            p.encode().to_string(),
            r#"{"type":"simple_state_provider","state":{"Name":"minecraft:stone"}}"#
        );
    }

    #[test]
    fn dual_noise_variety_accepts_a_pair() {
        let v = Value::from(json!({
            "type": "minecraft:dual_noise_provider",
            "seed": 2020,
            "noise": {"firstOctave": -6, "amplitudes": [1.0]},
            "scale": 0.5,
            "states": [{"Name": "minecraft:granite"}, {"Name": "minecraft:diorite"}],
            "variety": [2, 4],
            "slow_noise": {"firstOctave": -10, "amplitudes": [1.0]},
            "slow_scale": 1.0
        }));
        let p = BlockStateProvider::decode(&v).unwrap();
        let BlockStateProvider::DualNoise { variety, .. } = &p else {
            panic!("expected dual noise, got {p:?}");
        };
        assert_eq!(*variety, IntRange::new(2, 4));
        assert_eq!(BlockStateProvider::decode(&p.encode()).unwrap(), p);
    }

    #[test]
    fn noise_states_must_not_be_empty() {
        let v = Value::from(json!({
            "type": "noise_provider",
            "seed": 1,
            "noise": {"firstOctave": 0, "amplitudes": [1.0]},
            "scale": 1.0,
            "states": []
        }));
        let err = BlockStateProvider::decode(&v).unwrap_err();
        assert!(err.to_string().starts_with("at `states`"));
    }

    #[test]
    fn randomized_int_state_nests_providers() {
        let p = BlockStateProvider::RandomizedIntState {
            source: Box::new(BlockStateProvider::RotatedBlock(stone())),
            property: "age".into(),
            values: NumericProvider::Uniform { min: 0.0, max: 3.0 },
        };
        assert_eq!(BlockStateProvider::decode(&p.encode()).unwrap(), p);
    }
}
