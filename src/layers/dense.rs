use rand::Rng;

use crate::{
    activation::activation::Squash,
    errors::NetworkError,
    neuron::{connection::Connection, neuron::{compute_output, Neuron}},
};

/// The incoming connections of a layer: one per (source neuron, target neuron)
/// pair, stored source-major so that `connections[from * target_size + to]`
/// is the edge `from -> to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    source: usize,
    source_size: usize,
    target_size: usize,
    connections: Vec<Connection>,
}

impl Projection {
    /// Builds a projection from connections already laid out source-major.
    /// Callers guarantee the layout; `serialize::description` validates it.
    pub(crate) fn from_ordered(
        source: usize,
        source_size: usize,
        target_size: usize,
        connections: Vec<Connection>,
    ) -> Projection {
        debug_assert_eq!(connections.len(), source_size * target_size);
        Projection { source, source_size, target_size, connections }
    }

    /// Id of the layer the connections come from.
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn source_size(&self) -> usize {
        self.source_size
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn weight(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.source_size || to >= self.target_size {
            return None;
        }
        Some(self.connections[from * self.target_size + to].weight)
    }

    fn weights_into(&self, to: usize) -> Vec<f64> {
        (0..self.source_size)
            .map(|from| self.connections[from * self.target_size + to].weight)
            .collect()
    }
}

/// What a layer activates from: raw values for the input layer, the
/// upstream layer's cached outputs for every other layer.
#[derive(Debug, Clone, Copy)]
pub enum Signal<'a> {
    Values(&'a [f64]),
    Upstream(&'a Layer),
}

/// Result of one backward step through a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Backprop {
    /// Delta of every neuron in this layer, in declaration order.
    pub deltas: Vec<f64>,
    /// Σ_j delta_j * weight_{i->j} for every upstream neuron `i`, taken
    /// before the weights were updated.
    pub upstream_error: Vec<f64>,
}

/// An ordered, fixed-size group of neurons. A layer without an incoming
/// projection acts as an input layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    id: usize,
    neurons: Vec<Neuron>,
    incoming: Option<Projection>,
    squash: Squash,
}

impl Layer {
    /// `id` orders layers: a layer may only project onto a layer with a
    /// larger id.
    pub fn new(id: usize, size: usize, squash: Squash) -> Layer {
        Layer {
            id,
            neurons: vec![Neuron::default(); size],
            incoming: None,
            squash,
        }
    }

    pub(crate) fn with_biases(id: usize, biases: &[f64], squash: Squash) -> Layer {
        Layer {
            id,
            neurons: biases.iter().map(|&b| Neuron::new(b)).collect(),
            incoming: None,
            squash,
        }
    }

    pub(crate) fn attach(&mut self, projection: Projection) {
        self.incoming = Some(projection);
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn is_input(&self) -> bool {
        self.incoming.is_none()
    }

    pub fn squash(&self) -> Squash {
        self.squash
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn incoming(&self) -> Option<&Projection> {
        self.incoming.as_ref()
    }

    pub fn outputs(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.output).collect()
    }

    pub fn deltas(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.delta).collect()
    }

    pub fn biases(&self) -> Vec<f64> {
        self.neurons.iter().map(|n| n.bias).collect()
    }

    /// Draws every bias uniformly from `[-range, range]`.
    pub fn randomize_biases<R: Rng + ?Sized>(&mut self, range: f64, rng: &mut R) {
        for neuron in &mut self.neurons {
            neuron.bias = rng.gen_range(-range..=range);
        }
    }

    /// Fully connects this layer to `target`, drawing each weight uniformly
    /// from `[-range, range]`.
    ///
    /// Projecting onto a target already wired from this same layer returns
    /// the existing projection untouched. Fails if the target is wired from
    /// another layer or does not lie downstream of this one.
    pub fn project<'t, R: Rng + ?Sized>(
        &self,
        target: &'t mut Layer,
        range: f64,
        rng: &mut R,
    ) -> Result<&'t Projection, NetworkError> {
        if target.id <= self.id {
            return Err(NetworkError::Topology(format!(
                "layer {} cannot project onto layer {}: connections must point downstream",
                self.id, target.id
            )));
        }

        let source_size = self.len();
        let target_size = target.len();

        if let Some(existing) = &target.incoming {
            if existing.source != self.id || existing.source_size != source_size {
                return Err(NetworkError::Topology(format!(
                    "layer {} is already wired from layer {}",
                    target.id, existing.source
                )));
            }
        }

        let source_id = self.id;
        let projection: &'t Projection = target.incoming.get_or_insert_with(|| {
            let mut connections = Vec::with_capacity(source_size * target_size);
            for from in 0..source_size {
                for to in 0..target_size {
                    connections.push(Connection::new(from, to, rng.gen_range(-range..=range)));
                }
            }
            Projection::from_ordered(source_id, source_size, target_size, connections)
        });
        Ok(projection)
    }

    /// Forward step. Returns the layer's outputs in neuron order.
    pub fn activate(&mut self, signal: Signal<'_>) -> Result<Vec<f64>, NetworkError> {
        match signal {
            Signal::Values(values) => {
                if let Some(projection) = &self.incoming {
                    return Err(NetworkError::Topology(format!(
                        "layer {} is wired from layer {} and cannot take raw input",
                        self.id, projection.source
                    )));
                }
                if values.len() != self.len() {
                    return Err(NetworkError::shape("input layer", self.len(), values.len()));
                }
                for (neuron, &value) in self.neurons.iter_mut().zip(values) {
                    neuron.output = value;
                }
            }
            Signal::Upstream(upstream) => {
                let projection = self.checked_projection(upstream)?;
                let activations = upstream.outputs();
                let outputs: Vec<f64> = (0..self.neurons.len())
                    .map(|to| {
                        let weights = projection.weights_into(to);
                        compute_output(&activations, &weights, self.neurons[to].bias, self.squash)
                    })
                    .collect();
                for (neuron, output) in self.neurons.iter_mut().zip(outputs) {
                    neuron.output = output;
                }
            }
        }
        Ok(self.outputs())
    }

    /// `target_j - output_j` for every neuron; the error term of an output layer.
    pub fn error_against(&self, target: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if target.len() != self.len() {
            return Err(NetworkError::shape("target vector", self.len(), target.len()));
        }
        Ok(self.neurons.iter().zip(target)
            .map(|(neuron, t)| t - neuron.output)
            .collect())
    }

    /// Backward step.
    ///
    /// `error` holds one error term per neuron (`target - output` for the
    /// output layer, the downstream `upstream_error` otherwise). Computes and
    /// caches the deltas, derives the upstream error from the current
    /// weights, then moves every incoming weight by
    /// `rate * delta_to * output_from` and every bias by `rate * delta`.
    pub fn propagate(
        &mut self,
        learning_rate: f64,
        error: &[f64],
        upstream: &Layer,
    ) -> Result<Backprop, NetworkError> {
        if error.len() != self.len() {
            return Err(NetworkError::shape("layer error", self.len(), error.len()));
        }
        self.checked_projection(upstream)?;

        let squash = self.squash;
        for (neuron, e) in self.neurons.iter_mut().zip(error) {
            neuron.delta = e * squash.derivative(neuron.output);
        }
        let deltas = self.deltas();

        let projection = self.incoming.as_mut().ok_or_else(|| {
            NetworkError::Topology(format!("layer {} has no incoming connections", self.id))
        })?;

        let mut upstream_error = vec![0.0; projection.source_size];
        for connection in &projection.connections {
            upstream_error[connection.from] += deltas[connection.to] * connection.weight;
        }

        for connection in &mut projection.connections {
            connection.weight +=
                learning_rate * deltas[connection.to] * upstream.neurons[connection.from].output;
        }
        for (neuron, delta) in self.neurons.iter_mut().zip(&deltas) {
            neuron.bias += learning_rate * delta;
        }

        Ok(Backprop { deltas, upstream_error })
    }

    fn checked_projection(&self, upstream: &Layer) -> Result<&Projection, NetworkError> {
        let projection = self.incoming.as_ref().ok_or_else(|| {
            NetworkError::Topology(format!("layer {} has no incoming connections", self.id))
        })?;
        if projection.source != upstream.id || projection.source_size != upstream.len() {
            return Err(NetworkError::Topology(format!(
                "layer {} is wired from layer {}, not layer {}",
                self.id, projection.source, upstream.id
            )));
        }
        Ok(projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn wired_pair() -> (Layer, Layer) {
        let mut rng = StdRng::seed_from_u64(7);
        let input = Layer::new(0, 2, Squash::Logistic);
        let mut output = Layer::new(1, 3, Squash::Logistic);
        input.project(&mut output, 1.0, &mut rng).unwrap();
        (input, output)
    }

    #[test]
    fn project_creates_one_connection_per_pair() {
        let (_, output) = wired_pair();
        let projection = output.incoming().unwrap();
        assert_eq!(projection.connections().len(), 6);
        for (index, connection) in projection.connections().iter().enumerate() {
            assert_eq!(connection.from, index / 3);
            assert_eq!(connection.to, index % 3);
            assert!(connection.weight >= -1.0 && connection.weight <= 1.0);
        }
    }

    #[test]
    fn reprojecting_from_same_layer_keeps_weights() {
        let (input, mut output) = wired_pair();
        let before = output.incoming().unwrap().clone();
        let mut rng = StdRng::seed_from_u64(99);
        let again = input.project(&mut output, 1.0, &mut rng).unwrap();
        assert_eq!(*again, before);
    }

    #[test]
    fn projecting_from_another_layer_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let (_, mut output) = wired_pair();
        let stranger = Layer::new(0, 4, Squash::Logistic);
        assert!(matches!(
            stranger.project(&mut output, 1.0, &mut rng),
            Err(NetworkError::Topology(_))
        ));

        let first = Layer::new(0, 2, Squash::Logistic);
        let second = Layer::new(1, 2, Squash::Logistic);
        let mut target = Layer::new(2, 1, Squash::Logistic);
        first.project(&mut target, 1.0, &mut rng).unwrap();
        assert!(matches!(
            second.project(&mut target, 1.0, &mut rng),
            Err(NetworkError::Topology(_))
        ));
    }

    #[test]
    fn projecting_upstream_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let later = Layer::new(2, 2, Squash::Logistic);
        let mut earlier = Layer::new(1, 2, Squash::Logistic);
        assert!(matches!(
            later.project(&mut earlier, 1.0, &mut rng),
            Err(NetworkError::Topology(_))
        ));
    }

    #[test]
    fn input_layer_checks_length() {
        let mut input = Layer::new(0, 2, Squash::Logistic);
        assert!(matches!(
            input.activate(Signal::Values(&[1.0, 2.0, 3.0])),
            Err(NetworkError::ShapeMismatch { expected: 2, actual: 3, .. })
        ));
        assert_eq!(input.activate(Signal::Values(&[1.0, 2.0])).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn wired_layer_rejects_raw_values() {
        let (_, mut output) = wired_pair();
        assert!(matches!(
            output.activate(Signal::Values(&[0.0, 0.0, 0.0])),
            Err(NetworkError::Topology(_))
        ));
    }

    #[test]
    fn upstream_activation_uses_weights_and_bias() {
        let mut input = Layer::new(0, 2, Squash::Logistic);
        let mut output = Layer::with_biases(1, &[0.25], Squash::Logistic);
        output.attach(Projection::from_ordered(0, 2, 1, vec![
            Connection::new(0, 0, 0.5),
            Connection::new(1, 0, -1.5),
        ]));
        input.activate(Signal::Values(&[1.0, 2.0])).unwrap();
        let out = output.activate(Signal::Upstream(&input)).unwrap();
        let expected = Squash::Logistic.function(0.25 + 0.5 - 3.0);
        assert_eq!(out, vec![expected]);
    }

    #[test]
    fn propagate_returns_error_from_pre_update_weights() {
        let mut input = Layer::new(0, 2, Squash::Logistic);
        let mut output = Layer::with_biases(1, &[0.0], Squash::Logistic);
        output.attach(Projection::from_ordered(0, 2, 1, vec![
            Connection::new(0, 0, 0.5),
            Connection::new(1, 0, -0.5),
        ]));
        input.activate(Signal::Values(&[1.0, 1.0])).unwrap();
        output.activate(Signal::Upstream(&input)).unwrap();

        let error = output.error_against(&[1.0]).unwrap();
        assert_eq!(error, vec![0.5]);
        let step = output.propagate(0.1, &error, &input).unwrap();

        let delta = 0.5 * 0.25;
        assert_eq!(step.deltas, vec![delta]);
        assert_eq!(step.upstream_error, vec![delta * 0.5, delta * -0.5]);

        let projection = output.incoming().unwrap();
        assert_eq!(projection.weight(0, 0), Some(0.5 + 0.1 * delta));
        assert_eq!(projection.weight(1, 0), Some(-0.5 + 0.1 * delta));
        assert_eq!(output.biases(), vec![0.1 * delta]);
    }

    #[test]
    fn propagate_checks_error_length() {
        let (input, mut output) = wired_pair();
        assert!(matches!(
            output.propagate(0.1, &[1.0], &input),
            Err(NetworkError::ShapeMismatch { expected: 3, actual: 1, .. })
        ));
    }
}
