//! Non-fatal diagnostics from the coercion engine.
//!
//! A soft fallback (default substitution after a failed structural decode) is the only
//! place the engine reports anything. The sink is supplied by the caller; nothing here
//! blocks or fails.
use std::fmt;
use std::sync::Mutex;

use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Canonical type that was requested, e.g. `"block predicate"`.
    pub kind: &'static str,
    /// The literal input that could not be coerced.
    pub input: Value,
    pub reason: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unable to parse {} `{}` into a {}, using the default ({})",
            self.kind, self.input, self.kind, self.reason
        )
    }
}

pub trait DiagnosticSink: Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: one `warn` event per diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = diagnostic.kind,
            input = %diagnostic.input,
            reason = %diagnostic.reason,
            "unable to coerce value, substituting default"
        );
    }
}

/// Keeps every diagnostic in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // a panic mid-push leaves the vec intact
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order_and_drains() {
        let sink = CollectingSink::new();
        for kind in ["numeric provider", "block state"] {
            sink.report(Diagnostic {
                kind,
                input: Value::from("x"),
                reason: "nope".into(),
            });
        }
        assert_eq!(sink.len(), 2);
        let taken = sink.take();
        assert_eq!(taken[0].kind, "numeric provider");
        assert_eq!(taken[1].kind, "block state");
        assert!(sink.is_empty());
    }

    #[test]
    fn display_names_type_and_input() {
        let d = Diagnostic {
            kind: "height provider",
            input: Value::from(vec![Value::from(true)]),
            reason: "expected object".into(),
        };
        let text = d.to_string();
        assert!(text.contains("height provider"));
        assert!(text.contains("[true]"));
    }
}
