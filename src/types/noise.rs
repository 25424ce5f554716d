use super::{Canonical, Fields, decode_list, number_to_f64};
use crate::error::DecodeError;
use crate::value::Value;

/// Octave noise settings: `{"firstOctave": i, "amplitudes": [base, ...extra]}`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParameters {
    pub first_octave: i32,
    pub base_amplitude: f64,
    pub extra_amplitudes: Vec<f64>,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self::new(0, 1.0, Vec::new())
    }
}

impl NoiseParameters {
    pub fn new(first_octave: i32, base_amplitude: f64, extra_amplitudes: Vec<f64>) -> Self {
        Self {
            first_octave,
            base_amplitude,
            extra_amplitudes,
        }
    }

    /// Splits a full amplitude list into base and extras. `None` when empty.
    pub fn from_amplitudes(first_octave: i32, amplitudes: &[f64]) -> Option<Self> {
        let (base, extra) = amplitudes.split_first()?;
        Some(Self::new(first_octave, *base, extra.to_vec()))
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        std::iter::once(self.base_amplitude)
            .chain(self.extra_amplitudes.iter().copied())
            .collect()
    }
}

impl Canonical for NoiseParameters {
    const KIND: &'static str = "noise parameters";

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(Self::KIND, value)?;
        let first_octave = fields.i32("firstOctave")?;
        let amplitudes = decode_list(fields.require("amplitudes")?, number_to_f64)
            .map_err(|e| e.at("amplitudes"))?;
        Self::from_amplitudes(first_octave, &amplitudes).ok_or_else(|| {
            DecodeError::invalid(Self::KIND, "amplitudes must not be empty").at("amplitudes")
        })
    }

    fn encode(&self) -> Value {
        Value::object([
            ("firstOctave", Value::from(self.first_octave)),
            (
                "amplitudes",
                Value::Array(self.amplitudes().into_iter().map(Value::from).collect()),
            ),
        ])
    }
}
