/// Squared-error measure used to report training progress. The update rule
/// itself works from `target - output` directly.
pub struct MseLoss;

impl MseLoss {
    /// mean((predicted - expected)²); `0.0` for empty vectors.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        if predicted.is_empty() {
            return 0.0;
        }
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| (p - e).powi(2))
            .sum::<f64>() / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_outputs() {
        assert_eq!(MseLoss::loss(&[0.5, 1.0], &[0.0, 1.0]), 0.125);
        assert_eq!(MseLoss::loss(&[], &[]), 0.0);
    }
}
