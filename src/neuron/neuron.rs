use crate::activation::activation::Squash;

/// A single unit: trained bias plus the values cached by the latest forward
/// and backward pass. Input neurons keep a zero bias that is never read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neuron {
    pub bias: f64,
    pub(crate) output: f64,
    pub(crate) delta: f64,
}

impl Neuron {
    pub fn new(bias: f64) -> Neuron {
        Neuron { bias, output: 0.0, delta: 0.0 }
    }

    /// Output cached by the last forward pass.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Delta cached by the last backward pass.
    pub fn delta(&self) -> f64 {
        self.delta
    }
}

/// squash(bias + Σ weight_i * activation_i)
///
/// `activations` and `weights` are paired index by index; their lengths are
/// guaranteed equal by the full-projection invariant.
pub fn compute_output(activations: &[f64], weights: &[f64], bias: f64, squash: Squash) -> f64 {
    let sum: f64 = activations.iter().zip(weights.iter())
        .map(|(a, w)| a * w)
        .sum();
    squash.function(bias + sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sum_gives_logistic_midpoint() {
        assert_eq!(compute_output(&[1.0, 1.0], &[0.5, -0.5], 0.0, Squash::Logistic), 0.5);
    }

    #[test]
    fn bias_shifts_the_sum() {
        let with_bias = compute_output(&[0.0], &[3.0], 2.0, Squash::Logistic);
        let expected = 1.0 / (1.0 + (-2.0_f64).exp());
        assert!((with_bias - expected).abs() < 1e-15);
    }
}
