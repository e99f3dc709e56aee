use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Squashing function applied to a neuron's weighted input sum.
///
/// Both variants have a derivative that can be written in terms of the
/// neuron's output alone, so backpropagation only needs the cached outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Squash {
    /// σ(x) = 1 / (1 + e^-x), output in (0, 1).
    #[default]
    Logistic,
    /// tanh(x), output in (-1, 1).
    Tanh,
}

impl Squash {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Squash::Logistic => 1.0 / (1.0 + E.powf(-x)),
            Squash::Tanh => x.tanh(),
        }
    }

    /// Derivative evaluated from an already-squashed `output`.
    pub fn derivative(&self, output: f64) -> f64 {
        match self {
            Squash::Logistic => output * (1.0 - output),
            Squash::Tanh => 1.0 - output * output,
        }
    }
}
