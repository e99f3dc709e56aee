use serde::{Serialize, Deserialize};

use crate::activation::activation::Squash;
use crate::errors::NetworkError;

/// Seed used when a config does not name one.
pub const DEFAULT_SEED: u64 = 0x5eed_cafe;

/// Half-width of the uniform range weights and biases are drawn from.
pub const DEFAULT_INIT_RANGE: f64 = 1.0;

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_init_range() -> f64 {
    DEFAULT_INIT_RANGE
}

/// Architecture and initialization of a network, before any training.
///
/// Can be saved to / loaded from JSON independently of trained weights, so
/// an experiment can be replayed from the same starting point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Sizes from input to output; at least two entries.
    pub layer_sizes: Vec<usize>,
    #[serde(default)]
    pub squash: Squash,
    #[serde(default = "default_init_range")]
    pub init_range: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl NetworkConfig {
    pub fn new(layer_sizes: Vec<usize>) -> NetworkConfig {
        NetworkConfig {
            layer_sizes,
            squash: Squash::default(),
            init_range: DEFAULT_INIT_RANGE,
            seed: DEFAULT_SEED,
        }
    }

    /// Input, single hidden and output layer.
    pub fn perceptron(inputs: usize, hidden: usize, outputs: usize) -> NetworkConfig {
        NetworkConfig::new(vec![inputs, hidden, outputs])
    }

    pub fn with_seed(mut self, seed: u64) -> NetworkConfig {
        self.seed = seed;
        self
    }

    pub fn with_squash(mut self, squash: Squash) -> NetworkConfig {
        self.squash = squash;
        self
    }

    pub fn with_init_range(mut self, init_range: f64) -> NetworkConfig {
        self.init_range = init_range;
        self
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.layer_sizes.len() < 2 {
            return Err(NetworkError::Topology(format!(
                "a network needs an input and an output layer, got {} layer(s)",
                self.layer_sizes.len()
            )));
        }
        if let Some(index) = self.layer_sizes.iter().position(|&size| size == 0) {
            return Err(NetworkError::Topology(format!("layer {index} has no neurons")));
        }
        // The sampled interval spans 2 * init_range and must stay finite.
        if !(2.0 * self.init_range).is_finite() || self.init_range <= 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "init_range must be positive with a finite span, got {}",
                self.init_range
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), NetworkError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<NetworkConfig, NetworkError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: NetworkConfig = serde_json::from_str(r#"{"layer_sizes":[2,3,1]}"#).unwrap();
        assert_eq!(config, NetworkConfig::perceptron(2, 3, 1));
    }

    #[test]
    fn rejects_degenerate_layouts() {
        assert!(NetworkConfig::new(vec![4]).validate().is_err());
        assert!(NetworkConfig::new(vec![2, 0, 1]).validate().is_err());
        assert!(NetworkConfig::perceptron(2, 3, 1).with_init_range(0.0).validate().is_err());
        assert!(NetworkConfig::perceptron(2, 3, 1).with_init_range(f64::NAN).validate().is_err());
        assert!(NetworkConfig::perceptron(2, 3, 1).with_init_range(1e300).validate().is_ok());
        assert!(NetworkConfig::perceptron(2, 3, 1).validate().is_ok());
    }

    #[test]
    fn rejects_init_range_whose_span_overflows() {
        let config = NetworkConfig::perceptron(2, 3, 1).with_init_range(1e308);
        assert!(matches!(config.validate(), Err(NetworkError::InvalidConfig(_))));
        assert!(matches!(
            crate::network::network::Network::from_config(&config),
            Err(NetworkError::InvalidConfig(_))
        ));
        let config = NetworkConfig::perceptron(2, 3, 1).with_init_range(f64::MAX);
        assert!(matches!(config.validate(), Err(NetworkError::InvalidConfig(_))));
    }
}
