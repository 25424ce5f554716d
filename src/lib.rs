//! Lenient decoding of worldgen configuration values into canonical types, plus
//! declarative schemas for whole feature documents.
//!
//! - [`types`]: canonical kinds and their strict wire form.
//! - [`coerce`]: shorthand and synonym-tolerant decoding with soft diagnostics.
//! - [`codec`]: field codecs, schemas and `"type"` dispatch.
//! - [`manifest`]: schemas declared in JSON.
pub mod cli;
pub mod codec;
pub mod coerce;
pub mod diagnostics;
pub mod error;
pub mod jq_exec;
pub mod manifest;
pub mod path_de;
pub mod types;
pub mod value;

pub use codec::{Dispatch, Document, FieldCodec, Layout, Schema, SchemaBuilder, Tagged};
pub use coerce::{Coercer, Coercible};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use error::{DecodeError, EncodeError};
pub use types::Canonical;
pub use value::{Map, Value};
