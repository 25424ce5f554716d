use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::Canonical;
use crate::error::DecodeError;
use crate::value::Value;

pub const DEFAULT_NAMESPACE: &str = "minecraft";

static RESOURCE_LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([a-z0-9_.-]+):)?([a-z0-9_./-]+)$").expect("resource location pattern")
});

/// Registry id such as `minecraft:stone`. The namespace defaults to `minecraft`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
}

impl ResourceLocation {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    pub fn minecraft(path: impl Into<String>) -> Self {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    pub fn parse(src: &str) -> Result<Self, DecodeError> {
        let caps = RESOURCE_LOCATION
            .captures(src.trim())
            .ok_or_else(|| DecodeError::invalid("resource location", format!("`{src}`")))?;
        let namespace = caps.get(1).map_or(DEFAULT_NAMESPACE, |m| m.as_str());
        Ok(Self::new(namespace, &caps[2]))
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Canonical for ResourceLocation {
    const KIND: &'static str = "resource location";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Self::parse(s),
            other => Err(DecodeError::expected("string", other)),
        }
    }

    fn encode(&self) -> Value {
        Value::String(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_defaults_to_minecraft() {
        let id = ResourceLocation::parse("stone").unwrap();
        assert_eq!(id, ResourceLocation::minecraft("stone"));
        assert_eq!(id.to_string(), "minecraft:stone");
    }

    #[test]
    fn explicit_namespace_and_nested_path() {
        let id = ResourceLocation::parse("mymod:ores/deep_tin").unwrap();
        assert_eq!(id.namespace, "mymod");
        assert_eq!(id.path, "ores/deep_tin");
    }

    #[test]
    fn rejects_uppercase_and_empty() {
        assert!(ResourceLocation::parse("Stone").is_err());
        assert!(ResourceLocation::parse("").is_err());
        assert!(ResourceLocation::parse("a:b:c").is_err());
    }
}
