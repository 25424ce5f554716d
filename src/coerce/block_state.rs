use super::{Coercer, Coercible, Shape, keys};
use crate::types::BlockState;
use crate::value::{Map, Value};

/// Property values may be written as strings, bools or integers.
fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(_) => keys::int(value).map(|n| n.to_string()),
        _ => None,
    }
}

fn from_fields(map: &Map) -> Option<BlockState> {
    let id = keys::get_any(map, keys::BLOCK_ID)?.as_str()?;
    let mut state = BlockState::parse(id).ok()?;
    if let Some(props) = keys::get_any(map, keys::PROPERTIES) {
        for (name, value) in props.as_object()? {
            state.properties.insert(name.clone(), property_text(value)?);
        }
    }
    Some(state)
}

impl Coercible for BlockState {
    fn from_scalar(value: &Value, _cx: &Coercer<'_>) -> Shape<Self> {
        Shape::from_option(value.as_str().and_then(|s| BlockState::parse(s).ok()))
    }

    fn from_object(map: &Map, _cx: &Coercer<'_>) -> Shape<Self> {
        Shape::from_option(from_fields(map))
    }
}
