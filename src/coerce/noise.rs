use super::{Coercer, Coercible, Shape, keys};
use crate::types::NoiseParameters;
use crate::value::{Map, Value};

fn numbers(items: &[Value]) -> Option<Vec<f64>> {
    items.iter().map(keys::number).collect()
}

impl Coercible for NoiseParameters {
    /// A bare amplitude list, starting at octave 0.
    fn from_array(items: &[Value], _cx: &Coercer<'_>) -> Shape<Self> {
        Shape::from_option(
            numbers(items).and_then(|amps| NoiseParameters::from_amplitudes(0, &amps)),
        )
    }

    fn from_object(map: &Map, _cx: &Coercer<'_>) -> Shape<Self> {
        let parsed = || -> Option<NoiseParameters> {
            let first_octave = keys::int_or(map, keys::FIRST_OCTAVE, 0)?;
            if let Some(amplitudes) = keys::get_any(map, &["amplitudes"]) {
                let amps = numbers(amplitudes.as_array()?)?;
                return NoiseParameters::from_amplitudes(first_octave, &amps);
            }
            let base = keys::number_at(map, &["base_amplitude", "amplitude"])?;
            let extra = match keys::get_any(map, &["extra_amplitudes"]) {
                Some(v) => numbers(v.as_array()?)?,
                None => Vec::new(),
            };
            Some(NoiseParameters::new(first_octave, base, extra))
        };
        Shape::from_option(parsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use serde_json::json;

    fn coerce(v: serde_json::Value) -> (NoiseParameters, usize) {
        let sink = CollectingSink::new();
        let out = Coercer::new(&sink).coerce_value(&Value::from(v));
        (out, sink.len())
    }

    #[test]
    fn octave_synonyms() {
        for key in ["firstOctave", "first_octave", "octave", "FirstOctave"] {
            let (n, _) = coerce(json!({ key: -4, "amplitudes": [1.0, 2.0] }));
            assert_eq!(n, NoiseParameters::new(-4, 1.0, vec![2.0]), "key {key}");
        }
    }

    #[test]
    fn split_amplitude_form() {
        let (n, _) = coerce(json!({"first_octave": -2, "base_amplitude": 0.5, "extra_amplitudes": [0.25]}));
        assert_eq!(n, NoiseParameters::new(-2, 0.5, vec![0.25]));
    }

    #[test]
    fn bare_list_starts_at_octave_zero() {
        assert_eq!(coerce(json!([1, 1, 0.5])).0, NoiseParameters::new(0, 1.0, vec![1.0, 0.5]));
    }

    #[test]
    fn empty_amplitudes_fall_back_with_a_diagnostic() {
        assert_eq!(coerce(json!({"firstOctave": 3, "amplitudes": []})), (NoiseParameters::default(), 1));
    }
}
