//! `"type"`-discriminated dispatch over registered schemas.
use indexmap::IndexMap;

use super::schema::Schema;
use crate::coerce::Coercer;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{DecodeError, EncodeError};
use crate::types::ResourceLocation;
use crate::value::{Map, Value};

const TYPE_KEY: &str = "type";

/// Where a variant's fields live relative to its `"type"` key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `{"type": ..., <fields>}`
    Inline,
    /// `{"type": ..., "<key>": {<fields>}}`
    Wrapped(String),
}

impl Layout {
    /// Configured-feature layout: fields under `"config"`.
    pub fn config() -> Self {
        Layout::Wrapped("config".to_string())
    }
}

/// A decoded value together with the discriminator it was registered under.
#[derive(Clone, Debug, PartialEq)]
pub struct Tagged<T> {
    pub kind: String,
    pub value: T,
}

impl<T> Tagged<T> {
    pub fn new(kind: impl Into<String>, value: T) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

/// `minecraft:ore` and `ore` name the same variant.
fn canonical_kind(kind: &str) -> String {
    ResourceLocation::parse(kind)
        .map(|id| id.to_string())
        .unwrap_or_else(|_| kind.trim().to_string())
}

#[derive(Clone, Debug)]
pub struct Dispatch<T> {
    layout: Layout,
    variants: IndexMap<String, Schema<T>>,
}

impl<T> Dispatch<T> {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            variants: IndexMap::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn register(&mut self, kind: &str, schema: Schema<T>) -> &mut Self {
        self.variants.insert(canonical_kind(kind), schema);
        self
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn schema(&self, kind: &str) -> Option<&Schema<T>> {
        self.variants.get(&canonical_kind(kind))
    }

    pub fn decode(&self, value: &Value) -> Result<Tagged<T>, DecodeError> {
        self.decode_with(value, &TracingSink)
    }

    pub fn decode_with(&self, value: &Value, sink: &dyn DiagnosticSink) -> Result<Tagged<T>, DecodeError> {
        self.decode_in(value, &Coercer::new(sink))
    }

    pub fn decode_in(&self, value: &Value, cx: &Coercer<'_>) -> Result<Tagged<T>, DecodeError> {
        let object = value.as_object().ok_or_else(|| DecodeError::NotAnObject {
            schema: "dispatch".to_string(),
            found: value.kind(),
        })?;
        let raw_kind = object.get(TYPE_KEY).ok_or_else(|| DecodeError::MissingField {
            schema: "dispatch".to_string(),
            field: TYPE_KEY.to_string(),
        })?;
        let raw_kind = raw_kind
            .as_str()
            .ok_or_else(|| DecodeError::expected("string", raw_kind).at(TYPE_KEY))?;
        let kind = canonical_kind(raw_kind);
        let schema = self.variants.get(&kind).ok_or_else(|| DecodeError::UnknownVariant {
            kind: "dispatch",
            discriminator: raw_kind.to_string(),
        })?;
        let body = match &self.layout {
            Layout::Inline => value,
            Layout::Wrapped(key) => object.get(key).ok_or_else(|| DecodeError::MissingField {
                schema: kind.clone(),
                field: key.clone(),
            })?,
        };
        let decoded = schema.decode_in(body, cx)?;
        Ok(Tagged::new(kind, decoded))
    }

    /// Writes `"type"` first, then the variant's fields.
    pub fn encode(&self, tagged: &Tagged<T>) -> Result<Value, EncodeError> {
        let kind = canonical_kind(&tagged.kind);
        let schema = self
            .variants
            .get(&kind)
            .ok_or_else(|| EncodeError::UnknownVariant(tagged.kind.clone()))?;
        let fields = schema.encode_document(&schema.to_document(&tagged.value))?;
        let mut out = Map::new();
        out.insert(TYPE_KEY.to_string(), Value::String(kind));
        match &self.layout {
            Layout::Inline => out.extend(fields),
            Layout::Wrapped(key) => {
                out.insert(key.clone(), Value::Object(fields));
            }
        }
        Ok(Value::Object(out))
    }
}
