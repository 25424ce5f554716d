//! Field registration and the immutable schemas built from it.
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::catalog::FieldCodec;
use super::field::Document;
use crate::coerce::Coercer;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{DecodeError, EncodeError};
use crate::value::{Map, Value};

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub codec: FieldCodec,
}

/// Accumulates fields for one schema. Registering a name twice keeps the later codec
/// at the earlier position.
#[derive(Clone, Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: IndexMap<String, FieldSpec>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&mut self, name: impl Into<String>, codec: FieldCodec, required: bool) -> &mut Self {
        let name = name.into();
        let spec = FieldSpec {
            name: name.clone(),
            required,
            codec,
        };
        if self.fields.insert(name, spec).is_some() {
            tracing::debug!(schema = %self.name, "field registered twice, keeping the later codec");
        }
        self
    }

    pub fn add(&mut self, name: impl Into<String>, codec: FieldCodec) -> &mut Self {
        self.register(name, codec, true)
    }

    pub fn add_optional(&mut self, name: impl Into<String>, codec: FieldCodec) -> &mut Self {
        self.register(name, codec, false)
    }

    /// Registers a nested document field, built by `build` against a child builder.
    pub fn nested<F>(&mut self, name: &str, required: bool, build: F) -> &mut Self
    where
        F: FnOnce(&mut SchemaBuilder),
    {
        let mut child = SchemaBuilder::new(format!("{}.{name}", self.name));
        build(&mut child);
        self.register(name, FieldCodec::document(child.build_document()), required)
    }

    pub fn build<T, D, E>(&self, to_value: D, from_value: E) -> Schema<T>
    where
        D: Fn(Document) -> Result<T, DecodeError> + Send + Sync + 'static,
        E: Fn(&T) -> Document + Send + Sync + 'static,
    {
        tracing::debug!(schema = %self.name, fields = self.fields.len(), "building schema");
        Schema {
            inner: Arc::new(SchemaInner {
                name: self.name.clone(),
                fields: self.fields.values().cloned().collect(),
                to_value: Box::new(to_value),
                from_value: Box::new(from_value),
            }),
        }
    }

    /// A schema whose value is the decoded [`Document`] itself.
    pub fn build_document(&self) -> Schema<Document> {
        self.build(Ok, Document::clone)
    }
}

struct SchemaInner<T> {
    name: String,
    fields: Vec<FieldSpec>,
    to_value: Box<dyn Fn(Document) -> Result<T, DecodeError> + Send + Sync>,
    from_value: Box<dyn Fn(&T) -> Document + Send + Sync>,
}

/// Immutable, shareable codec for one object shape.
pub struct Schema<T> {
    inner: Arc<SchemaInner<T>>,
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.inner.name)
            .field("fields", &self.inner.fields)
            .finish()
    }
}

impl<T> Schema<T> {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.inner.fields
    }

    /// Decodes with diagnostics going to `tracing`.
    pub fn decode(&self, value: &Value) -> Result<T, DecodeError> {
        self.decode_with(value, &TracingSink)
    }

    pub fn decode_with(&self, value: &Value, sink: &dyn DiagnosticSink) -> Result<T, DecodeError> {
        self.decode_in(value, &Coercer::new(sink))
    }

    pub fn decode_in(&self, value: &Value, cx: &Coercer<'_>) -> Result<T, DecodeError> {
        let document = self.decode_document(value, cx)?;
        (self.inner.to_value)(document)
    }

    /// Left fold over the registered fields, starting from an empty document.
    pub fn decode_document(&self, value: &Value, cx: &Coercer<'_>) -> Result<Document, DecodeError> {
        let source = value.as_object().ok_or_else(|| DecodeError::NotAnObject {
            schema: self.inner.name.clone(),
            found: value.kind(),
        })?;
        self.inner
            .fields
            .iter()
            .try_fold(Document::new(), |mut document, spec| {
                match source.get(&spec.name) {
                    Some(raw) => {
                        tracing::trace!(schema = %self.inner.name, field = %spec.name, "decoding field");
                        let decoded = spec.codec.decode(raw, cx).map_err(|err| DecodeError::Field {
                            schema: self.inner.name.clone(),
                            field: spec.name.clone(),
                            source: Box::new(err),
                        })?;
                        document.insert(spec.name.clone(), decoded);
                    }
                    None if spec.required => {
                        return Err(DecodeError::MissingField {
                            schema: self.inner.name.clone(),
                            field: spec.name.clone(),
                        });
                    }
                    None => {}
                }
                Ok(document)
            })
    }

    pub fn encode(&self, value: &T) -> Result<Value, EncodeError> {
        self.encode_document(&self.to_document(value))
            .map(Value::Object)
    }

    pub fn to_document(&self, value: &T) -> Document {
        (self.inner.from_value)(value)
    }

    /// Registered fields present in `document`, in registration order. Unregistered
    /// entries are ignored.
    pub fn encode_document(&self, document: &Document) -> Result<Map, EncodeError> {
        let mut out = Map::new();
        for spec in &self.inner.fields {
            match document.get(&spec.name) {
                Some(field) => {
                    let encoded = spec.codec.encode(field).map_err(|err| EncodeError::Field {
                        schema: self.inner.name.clone(),
                        field: spec.name.clone(),
                        source: Box::new(err),
                    })?;
                    out.insert(spec.name.clone(), encoded);
                }
                None if spec.required => {
                    return Err(EncodeError::MissingField {
                        schema: self.inner.name.clone(),
                        field: spec.name.clone(),
                    });
                }
                None => {}
            }
        }
        Ok(out)
    }
}
