//! Lenient coercion of loosely-typed input into canonical values.
//!
//! Every target type runs one fixed pipeline, first match wins:
//!
//! 1. an already-typed value passes through unchanged;
//! 2. scalar shorthand (number / string / bool);
//! 3. array shorthand (`[a, b]` is a range, `[a]` a degenerate one);
//! 4. object shorthand (discriminated by `"type"`, or by the keys present);
//! 5. strict structural decode of the serialized document.
//!
//! Coercion never fails. Null input, unknown discriminators and unknown keywords fall
//! back to the type's default silently; a malformed serialized document falls back to
//! the default and reports a [`Diagnostic`] to the caller's sink.
pub mod keys;

mod block_state;
mod height;
mod noise;
mod numeric;
mod predicate;
mod state_provider;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::DecodeError;
use crate::types::{Canonical, Weighted};
use crate::value::{Map, Value};

/// Outcome of one shorthand matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<T> {
    /// The input matched and produced a value.
    Matched(T),
    /// The input is recognizably meaningless for this type; use the default quietly.
    Silent,
    /// No shorthand applies; try the next stage.
    Next,
}

impl<T> Shape<T> {
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Shape::Next, Shape::Matched)
    }
}

/// A per-type grammar. Each hook only sees the shapes it is named for; the pipeline
/// order lives in [`Coercer::coerce`].
pub trait Coercible: Canonical + Default {
    fn from_scalar(_value: &Value, _cx: &Coercer<'_>) -> Shape<Self> {
        Shape::Next
    }

    fn from_array(_items: &[Value], _cx: &Coercer<'_>) -> Shape<Self> {
        Shape::Next
    }

    fn from_object(_map: &Map, _cx: &Coercer<'_>) -> Shape<Self> {
        Shape::Next
    }
}

/// Either a value that is already canonical, or raw input to coerce.
#[derive(Debug, Clone)]
pub enum Input<'v, T> {
    Typed(T),
    Value(&'v Value),
}

impl<'v, T> From<&'v Value> for Input<'v, T> {
    fn from(value: &'v Value) -> Self {
        Input::Value(value)
    }
}

/// Runs coercions against one diagnostic sink.
#[derive(Clone, Copy)]
pub struct Coercer<'a> {
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Coercer<'a> {
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &'a dyn DiagnosticSink {
        self.sink
    }

    pub fn coerce<T: Coercible>(&self, input: Input<'_, T>) -> T {
        match input {
            Input::Typed(value) => value,
            Input::Value(value) => self.coerce_value(value),
        }
    }

    pub fn coerce_value<T: Coercible>(&self, value: &Value) -> T {
        let shape = match value {
            Value::Null => Shape::Silent,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => T::from_scalar(value, self),
            Value::Array(items) => T::from_array(items, self),
            Value::Object(map) => T::from_object(map, self),
        };
        match shape {
            Shape::Matched(out) => out,
            Shape::Silent => T::default(),
            Shape::Next => self.decode_or_default(value),
        }
    }

    fn decode_or_default<T: Coercible>(&self, value: &Value) -> T {
        match T::decode(value) {
            Ok(out) => out,
            Err(DecodeError::UnknownVariant { discriminator, .. }) => {
                tracing::trace!(kind = T::KIND, %discriminator, "unknown variant, using default");
                T::default()
            }
            Err(err) => {
                self.sink.report(Diagnostic {
                    kind: T::KIND,
                    input: value.clone(),
                    reason: err.to_string(),
                });
                T::default()
            }
        }
    }
}

/// Items of a weighted-list shorthand: `{data, weight}` pairs, typed objects carrying
/// their own `weight` key, or bare values with weight 1.
pub(crate) fn weighted_items<T: Coercible>(
    items: &[Value],
    cx: &Coercer<'_>,
) -> Option<Vec<Weighted<T>>> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| match item {
            Value::Object(entry) if keys::has_any(entry, keys::WEIGHT) => {
                let weight = keys::int_at(entry, keys::WEIGHT)?;
                let wrapped =
                    keys::has_any(entry, &["data"]) || keys::discriminator(entry).is_none();
                let data = match keys::get_any(entry, keys::ENTRY_DATA) {
                    Some(data) if wrapped => cx.coerce_value(data),
                    _ => cx.coerce_value(&without_weight(entry)),
                };
                Some(Weighted::new(data, weight))
            }
            other => Some(Weighted::new(cx.coerce_value(other), 1)),
        })
        .collect()
}

fn without_weight(entry: &Map) -> Value {
    let wanted: Vec<String> = keys::WEIGHT.iter().map(|k| keys::normalize(k)).collect();
    Value::Object(
        entry
            .iter()
            .filter(|(k, _)| !wanted.contains(&keys::normalize(k)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::types::{BlockPredicate, NumericProvider};
    use serde_json::json;

    #[test]
    fn typed_input_passes_through() {
        let sink = CollectingSink::new();
        let cx = Coercer::new(&sink);
        let p = NumericProvider::Uniform { min: 1.0, max: 2.0 };
        assert_eq!(cx.coerce(Input::Typed(p.clone())), p);
        assert!(sink.is_empty());
    }

    #[test]
    fn null_is_a_silent_default() {
        let sink = CollectingSink::new();
        let cx = Coercer::new(&sink);
        let p: BlockPredicate = cx.coerce_value(&Value::Null);
        assert_eq!(p, BlockPredicate::always_false());
        assert!(sink.is_empty());
    }

    #[test]
    fn malformed_document_reports_type_and_input() {
        let sink = CollectingSink::new();
        let cx = Coercer::new(&sink);
        let input = Value::from(json!({"type": "uniform", "value": {"min": "abc", "max": 2}}));
        let p: NumericProvider = cx.coerce_value(&input);
        assert_eq!(p, NumericProvider::default());
        let diagnostics = sink.take();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, "numeric provider");
        assert_eq!(diagnostics[0].input, input);
        assert!(diagnostics[0].to_string().contains("\"abc\""));
    }
}
