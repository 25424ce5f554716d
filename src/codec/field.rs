//! Type-erased field values and the documents built from them.
use indexmap::IndexMap;

use crate::error::DecodeError;
use crate::types::{
    BlockPredicate, BlockState, BlockStateProvider, Direction, HeightProvider, Heightmap,
    NoiseParameters, NumericProvider, ResourceLocation, Vec3f, Vec3i, VerticalAnchor,
};
use crate::value::Value;

/// Every value a field codec can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Resource(ResourceLocation),
    Vec3i(Vec3i),
    Vec3f(Vec3f),
    Direction(Direction),
    Heightmap(Heightmap),
    Numeric(NumericProvider),
    BlockState(BlockState),
    Predicate(BlockPredicate),
    Height(HeightProvider),
    Anchor(VerticalAnchor),
    Noise(NoiseParameters),
    StateProvider(BlockStateProvider),
    List(Vec<FieldValue>),
    Left(Box<FieldValue>),
    Right(Box<FieldValue>),
    Document(Document),
    Raw(Value),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::Resource(_) => "resource location",
            FieldValue::Vec3i(_) => "vector",
            FieldValue::Vec3f(_) => "float vector",
            FieldValue::Direction(_) => "direction",
            FieldValue::Heightmap(_) => "heightmap",
            FieldValue::Numeric(_) => "numeric provider",
            FieldValue::BlockState(_) => "block state",
            FieldValue::Predicate(_) => "block predicate",
            FieldValue::Height(_) => "height provider",
            FieldValue::Anchor(_) => "vertical anchor",
            FieldValue::Noise(_) => "noise parameters",
            FieldValue::StateProvider(_) => "block state provider",
            FieldValue::List(_) => "list",
            FieldValue::Left(_) => "left",
            FieldValue::Right(_) => "right",
            FieldValue::Document(_) => "document",
            FieldValue::Raw(_) => "raw value",
        }
    }
}

/// Typed access to a [`FieldValue`].
pub trait FromField: Sized {
    fn from_field(value: &FieldValue) -> Option<Self>;
}

macro_rules! field_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }

            impl FromField for $ty {
                fn from_field(value: &FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::$variant(inner) => Some(inner.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

field_conversions! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => String,
    ResourceLocation => Resource,
    Vec3i => Vec3i,
    Vec3f => Vec3f,
    Direction => Direction,
    Heightmap => Heightmap,
    NumericProvider => Numeric,
    BlockState => BlockState,
    BlockPredicate => Predicate,
    HeightProvider => Height,
    VerticalAnchor => Anchor,
    NoiseParameters => Noise,
    BlockStateProvider => StateProvider,
    Document => Document,
    Value => Raw,
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(n.into())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl FromField for i32 {
    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(n) => i32::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl<T: FromField> FromField for Vec<T> {
    fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::List(items) => items.iter().map(T::from_field).collect(),
            _ => None,
        }
    }
}

// ------------------------------- Document --------------------------------- //

/// Decoded fields by name, in registration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    fields: IndexMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_as<T: FromField>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(T::from_field)
    }

    /// Typed read for schema mapping functions; absence and kind mismatch are errors.
    pub fn require<T: FromField>(&self, schema: &str, name: &str) -> Result<T, DecodeError> {
        let value = self.get(name).ok_or_else(|| DecodeError::MissingField {
            schema: schema.to_string(),
            field: name.to_string(),
        })?;
        T::from_field(value).ok_or_else(|| DecodeError::Field {
            schema: schema.to_string(),
            field: name.to_string(),
            source: Box::new(DecodeError::Type {
                expected: std::any::type_name::<T>(),
                found: value.kind().to_string(),
            }),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}
