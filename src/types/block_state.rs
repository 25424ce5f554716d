use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Canonical, Fields, ResourceLocation};
use crate::error::DecodeError;
use crate::value::{Map, Value};

/// `ns:id[prop=value,...]`
static STATE_SHORTHAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^\[\]\s]+)\s*(?:\[([^\[\]]*)\])?\s*$").expect("block state pattern")
});

/// A block id plus its property assignments. Properties are kept sorted so two states
/// written in different orders compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    pub id: ResourceLocation,
    pub properties: BTreeMap<String, String>,
}

impl Default for BlockState {
    fn default() -> Self {
        Self::air()
    }
}

impl BlockState {
    pub fn new(id: ResourceLocation) -> Self {
        Self {
            id,
            properties: BTreeMap::new(),
        }
    }

    pub fn air() -> Self {
        Self::new(ResourceLocation::minecraft("air"))
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Parses the textual form, e.g. `minecraft:oak_log[axis=y]`.
    pub fn parse(src: &str) -> Result<Self, DecodeError> {
        let caps = STATE_SHORTHAND
            .captures(src)
            .ok_or_else(|| DecodeError::invalid(Self::KIND, format!("`{src}`")))?;
        let mut state = Self::new(ResourceLocation::parse(&caps[1])?);
        if let Some(props) = caps.get(2) {
            for assignment in props.as_str().split(',').filter(|s| !s.trim().is_empty()) {
                let (name, value) = assignment.split_once('=').ok_or_else(|| {
                    DecodeError::invalid(Self::KIND, format!("property `{assignment}` has no value"))
                })?;
                state
                    .properties
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        Ok(state)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.properties.is_empty() {
            let props: Vec<String> = self
                .properties
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "[{}]", props.join(","))?;
        }
        Ok(())
    }
}

impl Canonical for BlockState {
    const KIND: &'static str = "block state";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(Self::KIND, value)?;
        let mut state = Self::new(fields.decode("Name")?);
        if let Some(props) = fields.get("Properties") {
            let props = props
                .as_object()
                .ok_or_else(|| DecodeError::expected("object", props).at("Properties"))?;
            for (name, v) in props {
                let v = v.as_str().ok_or_else(|| {
                    DecodeError::expected("string", v).at(name.clone()).at("Properties")
                })?;
                state.properties.insert(name.clone(), v.to_string());
            }
        }
        Ok(state)
    }

    fn encode(&self) -> Value {
        let mut out = Map::new();
        out.insert("Name".into(), self.id.encode());
        if !self.properties.is_empty() {
            let props = self
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                .collect::<Map>();
            out.insert("Properties".into(), Value::Object(props));
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_id_with_properties() {
        let state = BlockState::parse("oak_log[axis=y, waterlogged=false]").unwrap();
        assert_eq!(state.id, ResourceLocation::minecraft("oak_log"));
        assert_eq!(state.properties.get("axis").map(String::as_str), Some("y"));
        assert_eq!(state.to_string(), "minecraft:oak_log[axis=y,waterlogged=false]");
    }

    #[test]
    fn document_form_round_trips() {
        let v = Value::from(json!({"Name": "minecraft:furnace", "Properties": {"lit": "true", "facing": "north"}}));
        let state = BlockState::decode(&v).unwrap();
        assert_eq!(state.properties.len(), 2);
        assert_eq!(BlockState::decode(&state.encode()).unwrap(), state);
    }

    #[test]
    fn property_values_must_be_strings() {
        let v = Value::from(json!({"Name": "minecraft:furnace", "Properties": {"lit": true}}));
        let err = BlockState::decode(&v).unwrap_err();
        assert_eq!(err.to_string(), "at `Properties`: at `lit`: expected string, found true");
    }

    #[test]
    fn malformed_shorthand_is_rejected() {
        assert!(BlockState::parse("stone[axis]").is_err());
        assert!(BlockState::parse("Stone").is_err());
    }
}
