use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, trace};

use crate::{
    activation::activation::Squash,
    errors::NetworkError,
    layers::dense::{Layer, Signal},
    network::config::NetworkConfig,
    train::train_config::validate_learning_rate,
};

/// Lifecycle of a network. Construction returns a `Wired` network; the first
/// successful `activate` makes it `Ready` for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    Wired,
    Ready,
}

/// A stack of fully-connected layers: `layers[0]` is the input layer, the
/// last one the output layer, every layer wired from the one before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    squash: Squash,
    state: NetworkState,
}

impl Network {
    /// Builds a network with the default squash, init range and seed.
    pub fn new(layer_sizes: &[usize]) -> Result<Network, NetworkError> {
        Network::from_config(&NetworkConfig::new(layer_sizes.to_vec()))
    }

    /// Input, hidden and output layer wired in sequence.
    pub fn perceptron(inputs: usize, hidden: usize, outputs: usize) -> Result<Network, NetworkError> {
        Network::from_config(&NetworkConfig::perceptron(inputs, hidden, outputs))
    }

    /// Creates every layer, then projects each one onto the next. For every
    /// projection the weights are drawn first, then the target layer's biases.
    pub fn from_config(config: &NetworkConfig) -> Result<Network, NetworkError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut layers: Vec<Layer> = config.layer_sizes.iter()
            .enumerate()
            .map(|(id, &size)| Layer::new(id, size, config.squash))
            .collect();

        for i in 1..layers.len() {
            let (head, tail) = layers.split_at_mut(i);
            head[i - 1].project(&mut tail[0], config.init_range, &mut rng)?;
            tail[0].randomize_biases(config.init_range, &mut rng);
        }

        debug!(
            layer_sizes = ?config.layer_sizes,
            seed = config.seed,
            squash = ?config.squash,
            "network wired"
        );
        Ok(Network::from_layers(layers, config.squash))
    }

    /// Wraps layers that are already wired in sequence.
    pub(crate) fn from_layers(layers: Vec<Layer>, squash: Squash) -> Network {
        Network { layers, squash, state: NetworkState::Wired }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::len).collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::len)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::len)
    }

    pub fn squash(&self) -> Squash {
        self.squash
    }

    pub fn state(&self) -> NetworkState {
        self.state
    }

    /// Forward pass; caches every neuron's output for a following `propagate`.
    pub fn activate(&mut self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if input.len() != self.input_size() {
            return Err(NetworkError::shape("input vector", self.input_size(), input.len()));
        }

        let mut current = self.layers[0].activate(Signal::Values(input))?;
        for i in 1..self.layers.len() {
            let (head, tail) = self.layers.split_at_mut(i);
            current = tail[0].activate(Signal::Upstream(&head[i - 1]))?;
        }

        self.state = NetworkState::Ready;
        Ok(current)
    }

    /// One online SGD step towards `target` using the activations cached by
    /// the last `activate`. Layers are processed output first; each layer's
    /// upstream error is taken before its own weights change.
    pub fn propagate(&mut self, learning_rate: f64, target: &[f64]) -> Result<(), NetworkError> {
        if target.len() != self.output_size() {
            return Err(NetworkError::shape("target vector", self.output_size(), target.len()));
        }
        if self.state != NetworkState::Ready {
            return Err(NetworkError::StatePrecondition(
                "propagate called before any activate".to_string(),
            ));
        }
        validate_learning_rate(learning_rate)?;

        let last = self.layers.len() - 1;
        let mut error = self.layers[last].error_against(target)?;
        trace!(
            squared_error = error.iter().map(|e| e * e).sum::<f64>(),
            learning_rate,
            "propagating"
        );

        for i in (1..=last).rev() {
            let (head, tail) = self.layers.split_at_mut(i);
            error = tail[0].propagate(learning_rate, &error, &head[i - 1])?.upstream_error;
        }
        Ok(())
    }
}
