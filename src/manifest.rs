//! JSON manifests declaring feature schemas, so schemas can be built without code.
//!
//! ```json
//! { "layout": "config",
//!   "features": [
//!     { "type": "mymod:spire",
//!       "fields": [
//!         { "name": "height", "codec": "numeric_provider" },
//!         { "name": "radius", "codec": { "int_range": [0, 16] }, "required": false } ] } ] }
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::codec::{Dispatch, Document, FieldCodec, Layout, SchemaBuilder};
use crate::path_de::{PathError, from_str_with_path};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Json(#[from] PathError),

    #[error("feature `{feature}`, field `{field}`: {reason}")]
    Codec {
        feature: String,
        field: String,
        reason: String,
    },

    #[error("feature type `{0}` is declared more than once")]
    DuplicateFeature(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSpec {
    Inline,
    #[default]
    Config,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub layout: LayoutSpec,
    pub features: Vec<FeatureSpec>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    pub codec: CodecSpec,
    #[serde(default = "required_by_default")]
    pub required: bool,
}

fn required_by_default() -> bool {
    true
}

/// Names a field codec. Parameterless codecs are plain strings; the others are
/// single-key objects such as `{"int_range": [0, 16]}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecSpec {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    NonEmptyString,
    Vec3i,
    Vec3f,
    BlockPos,
    Direction,
    VerticalDirection,
    Heightmap,
    ResourceLocation,
    Block,
    Fluid,
    NumericProvider,
    BlockState,
    BlockPredicate,
    HeightProvider,
    VerticalAnchor,
    NoiseParameters,
    BlockStateProvider,
    Raw,
    IntRange(i32, i32),
    LongRange(i64, i64),
    FloatRange(f32, f32),
    DoubleRange(f64, f64),
    RangedNumericProvider(f64, f64),
    ClampedVec3i(u32),
    ListOf(Box<CodecSpec>),
    Xor(Box<CodecSpec>, Box<CodecSpec>),
    Document(Vec<FieldDef>),
}

fn ordered<T: PartialOrd + std::fmt::Display>(min: T, max: T) -> Result<(), String> {
    if min > max {
        return Err(format!("range [{min}, {max}] is empty"));
    }
    Ok(())
}

impl CodecSpec {
    /// `scope` names the schema a nested document is built under.
    pub fn build(&self, scope: &str) -> Result<FieldCodec, String> {
        Ok(match self {
            CodecSpec::Bool => FieldCodec::bool(),
            CodecSpec::Int => FieldCodec::int(),
            CodecSpec::Long => FieldCodec::long(),
            CodecSpec::Float => FieldCodec::float(),
            CodecSpec::Double => FieldCodec::double(),
            CodecSpec::String => FieldCodec::string(),
            CodecSpec::NonEmptyString => FieldCodec::non_empty_string(),
            CodecSpec::Vec3i => FieldCodec::vec3i(),
            CodecSpec::Vec3f => FieldCodec::vec3f(),
            CodecSpec::BlockPos => FieldCodec::block_pos(),
            CodecSpec::Direction => FieldCodec::direction(),
            CodecSpec::VerticalDirection => FieldCodec::vertical_direction(),
            CodecSpec::Heightmap => FieldCodec::heightmap(),
            CodecSpec::ResourceLocation => FieldCodec::resource_location(),
            CodecSpec::Block => FieldCodec::block(),
            CodecSpec::Fluid => FieldCodec::fluid(),
            CodecSpec::NumericProvider => FieldCodec::numeric_provider(),
            CodecSpec::BlockState => FieldCodec::block_state(),
            CodecSpec::BlockPredicate => FieldCodec::block_predicate(),
            CodecSpec::HeightProvider => FieldCodec::height_provider(),
            CodecSpec::VerticalAnchor => FieldCodec::vertical_anchor(),
            CodecSpec::NoiseParameters => FieldCodec::noise_parameters(),
            CodecSpec::BlockStateProvider => FieldCodec::block_state_provider(),
            CodecSpec::Raw => FieldCodec::raw(),
            CodecSpec::IntRange(min, max) => {
                ordered(min, max)?;
                FieldCodec::int_range(*min, *max)
            }
            CodecSpec::LongRange(min, max) => {
                ordered(min, max)?;
                FieldCodec::long_range(*min, *max)
            }
            CodecSpec::FloatRange(min, max) => {
                ordered(min, max)?;
                FieldCodec::float_range(*min, *max)
            }
            CodecSpec::DoubleRange(min, max) => {
                ordered(min, max)?;
                FieldCodec::double_range(*min, *max)
            }
            CodecSpec::RangedNumericProvider(min, max) => {
                ordered(min, max)?;
                FieldCodec::ranged_numeric_provider(*min, *max)
            }
            CodecSpec::ClampedVec3i(max) => FieldCodec::clamped_vec3i(*max),
            CodecSpec::ListOf(item) => FieldCodec::list_of(item.build(scope)?),
            CodecSpec::Xor(left, right) => FieldCodec::xor(left.build(scope)?, right.build(scope)?),
            CodecSpec::Document(fields) => {
                let mut builder = SchemaBuilder::new(scope);
                for field in fields {
                    let nested_scope = format!("{scope}.{}", field.name);
                    let codec = field.codec.build(&nested_scope)?;
                    builder.register(field.name.as_str(), codec, field.required);
                }
                FieldCodec::document(builder.build_document())
            }
        })
    }
}

impl Manifest {
    pub fn from_json(src: &str) -> Result<Self, ManifestError> {
        Ok(from_str_with_path(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&src)
    }

    pub fn layout(&self) -> Layout {
        match self.layout {
            LayoutSpec::Inline => Layout::Inline,
            LayoutSpec::Config => Layout::config(),
        }
    }

    /// Builds one schema per declared feature type.
    pub fn dispatch(&self) -> Result<Dispatch<Document>, ManifestError> {
        let mut dispatch = Dispatch::new(self.layout());
        for feature in &self.features {
            if dispatch.schema(&feature.kind).is_some() {
                return Err(ManifestError::DuplicateFeature(feature.kind.clone()));
            }
            let mut builder = SchemaBuilder::new(feature.kind.as_str());
            for field in &feature.fields {
                let scope = format!("{}.{}", feature.kind, field.name);
                let codec = field.codec.build(&scope).map_err(|reason| ManifestError::Codec {
                    feature: feature.kind.clone(),
                    field: field.name.clone(),
                    reason,
                })?;
                builder.register(field.name.as_str(), codec, field.required);
            }
            tracing::debug!(feature = %feature.kind, fields = feature.fields.len(), "registered feature schema");
            dispatch.register(&feature.kind, builder.build_document());
        }
        Ok(dispatch)
    }
}
