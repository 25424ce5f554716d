//! Runtime schema composition.
//!
//! A [`SchemaBuilder`] collects named fields, each backed by a [`FieldCodec`], and
//! builds an immutable [`Schema`] that decodes an object into a [`Document`] (or any
//! type mapped from one) and encodes it back. [`Dispatch`] selects a schema by the
//! object's `"type"`.
mod catalog;
mod dispatch;
mod field;
mod schema;

pub use catalog::FieldCodec;
pub use dispatch::{Dispatch, Layout, Tagged};
pub use field::{Document, FieldValue, FromField};
pub use schema::{FieldSpec, Schema, SchemaBuilder};
