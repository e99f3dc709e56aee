//! Flat structural description of a network: layer sizes, biases and the
//! weighted connections between consecutive layers.
//!
//! The description is plain data (serde), so it can be stored as JSON and
//! handed to [`from_description`] to rebuild a network whose forward pass is
//! bit-for-bit identical to the one it was taken from.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::{
    activation::activation::Squash,
    errors::NetworkError,
    layers::dense::{Layer, Projection},
    network::network::Network,
    neuron::connection::Connection,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    /// Neuron count of every layer, input first.
    pub layer_sizes: Vec<usize>,
    #[serde(default)]
    pub squash: Squash,
    /// One entry per layer; the input layer's entry is empty.
    pub biases: Vec<Vec<f64>>,
    /// One entry per pair of consecutive layers. `from` indexes the earlier
    /// layer, `to` the later one.
    pub connections: Vec<Vec<Connection>>,
}

pub fn to_description(network: &Network) -> NetworkDescription {
    let layers = network.layers();
    let biases = layers.iter()
        .map(|layer| if layer.is_input() { Vec::new() } else { layer.biases() })
        .collect();
    let connections = layers.iter()
        .filter_map(Layer::incoming)
        .map(|projection| projection.connections().to_vec())
        .collect();

    NetworkDescription {
        layer_sizes: network.layer_sizes(),
        squash: network.squash(),
        biases,
        connections,
    }
}

/// Rebuilds a `Wired` network. Every layer after the first must be wired
/// with exactly one connection per (source, target) neuron pair.
pub fn from_description(description: &NetworkDescription) -> Result<Network, NetworkError> {
    let sizes = &description.layer_sizes;
    if sizes.len() < 2 {
        return Err(malformed(format!("expected at least 2 layers, got {}", sizes.len())));
    }
    if let Some(index) = sizes.iter().position(|&size| size == 0) {
        return Err(malformed(format!("layer {index} has size 0")));
    }
    if description.biases.len() != sizes.len() {
        return Err(malformed(format!(
            "{} layer sizes but {} bias lists",
            sizes.len(),
            description.biases.len()
        )));
    }
    if description.connections.len() != sizes.len() - 1 {
        return Err(malformed(format!(
            "{} layers need {} connection lists, got {}",
            sizes.len(),
            sizes.len() - 1,
            description.connections.len()
        )));
    }
    if !description.biases[0].is_empty() {
        return Err(malformed("the input layer has no biases".to_string()));
    }

    // Sizes are bounded by the listed connections before anything is allocated.
    let mut expected_counts = Vec::with_capacity(sizes.len() - 1);
    for (source, pair) in sizes.windows(2).enumerate() {
        let target = source + 1;
        let expected = pair[0].checked_mul(pair[1]).ok_or_else(|| {
            malformed(format!("layers {source} -> {target} are too large ({} x {})", pair[0], pair[1]))
        })?;
        let listed = description.connections[source].len();
        if listed != expected {
            return Err(malformed(format!(
                "layers {source} -> {target} need {expected} connections, got {listed}"
            )));
        }
        expected_counts.push(expected);
    }

    let squash = description.squash;
    let mut layers = vec![Layer::new(0, sizes[0], squash)];

    for id in 1..sizes.len() {
        let biases = &description.biases[id];
        if biases.len() != sizes[id] {
            return Err(malformed(format!(
                "layer {id} has {} neurons but {} biases",
                sizes[id],
                biases.len()
            )));
        }
        if biases.iter().any(|b| !b.is_finite()) {
            return Err(malformed(format!("layer {id} has a non-finite bias")));
        }

        let projection = ordered_projection(
            id - 1,
            sizes[id - 1],
            sizes[id],
            expected_counts[id - 1],
            &description.connections[id - 1],
        )?;
        let mut layer = Layer::with_biases(id, biases, squash);
        layer.attach(projection);
        layers.push(layer);
    }

    debug!(layer_sizes = ?sizes, squash = ?squash, "network rebuilt from description");
    Ok(Network::from_layers(layers, squash))
}

/// Validates one connection list and lays it out source-major.
/// `expected` is `source_size * target_size`, already checked against the list.
fn ordered_projection(
    source: usize,
    source_size: usize,
    target_size: usize,
    expected: usize,
    connections: &[Connection],
) -> Result<Projection, NetworkError> {
    let target = source + 1;
    let mut slots: Vec<Option<Connection>> = vec![None; expected];
    for connection in connections {
        if connection.from >= source_size || connection.to >= target_size {
            return Err(malformed(format!(
                "connection {} -> {} between layers {source} and {target} is out of range ({source_size} x {target_size})",
                connection.from, connection.to
            )));
        }
        if !connection.weight.is_finite() {
            return Err(malformed(format!(
                "connection {} -> {} between layers {source} and {target} has a non-finite weight",
                connection.from, connection.to
            )));
        }
        let slot = &mut slots[connection.from * target_size + connection.to];
        if slot.is_some() {
            return Err(malformed(format!(
                "connection {} -> {} between layers {source} and {target} is listed twice",
                connection.from, connection.to
            )));
        }
        *slot = Some(*connection);
    }

    // Equal length and no duplicates means every slot is filled.
    let ordered = slots.into_iter().flatten().collect();
    Ok(Projection::from_ordered(source, source_size, target_size, ordered))
}

fn malformed(message: String) -> NetworkError {
    NetworkError::MalformedDescription(message)
}

impl Network {
    pub fn to_description(&self) -> NetworkDescription {
        to_description(self)
    }

    pub fn from_description(description: &NetworkDescription) -> Result<Network, NetworkError> {
        from_description(description)
    }

    /// Pretty-printed JSON form of the description.
    pub fn to_json(&self) -> Result<String, NetworkError> {
        Ok(serde_json::to_string_pretty(&self.to_description())?)
    }

    pub fn from_json(json: &str) -> Result<Network, NetworkError> {
        let description: NetworkDescription = serde_json::from_str(json)?;
        from_description(&description)
    }

    /// Writes the description to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), NetworkError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.to_description())?;
        Ok(())
    }

    /// Reads a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network, NetworkError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let description: NetworkDescription = serde_json::from_reader(reader)?;
        from_description(&description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> NetworkDescription {
        Network::perceptron(2, 2, 1).unwrap().to_description()
    }

    fn assert_malformed(description: &NetworkDescription) {
        assert!(matches!(
            from_description(description),
            Err(NetworkError::MalformedDescription(_))
        ));
    }

    #[test]
    fn description_lists_every_connection() {
        let description = small();
        assert_eq!(description.layer_sizes, vec![2, 2, 1]);
        assert!(description.biases[0].is_empty());
        assert_eq!(description.biases[1].len(), 2);
        assert_eq!(description.connections[0].len(), 4);
        assert_eq!(description.connections[1].len(), 2);
    }

    #[test]
    fn connection_order_does_not_matter() {
        let mut description = small();
        description.connections[0].reverse();
        let rebuilt = from_description(&description).unwrap();
        assert_eq!(rebuilt.to_description(), small());
    }

    #[test]
    fn rejects_dangling_index() {
        let mut description = small();
        description.connections[1][0].from = 5;
        assert_malformed(&description);
    }

    #[test]
    fn rejects_duplicated_pair() {
        let mut description = small();
        description.connections[0][1] = description.connections[0][0];
        assert_malformed(&description);
    }

    #[test]
    fn rejects_partial_wiring() {
        let mut description = small();
        description.connections[0].pop();
        assert_malformed(&description);
    }

    #[test]
    fn rejects_size_mismatches() {
        let mut description = small();
        description.layer_sizes[1] = 3;
        assert_malformed(&description);

        let mut description = small();
        description.biases[2].push(0.0);
        assert_malformed(&description);

        let mut description = small();
        description.biases[0].push(0.0);
        assert_malformed(&description);

        let mut description = small();
        description.connections.pop();
        assert_malformed(&description);
    }

    #[test]
    fn rejects_sizes_not_backed_by_connections() {
        let json = r#"{"layer_sizes":[18446744073709551615,1],"biases":[[],[0.0]],"connections":[[]]}"#;
        assert!(matches!(
            Network::from_json(json),
            Err(NetworkError::MalformedDescription(_))
        ));

        let mut description = small();
        description.layer_sizes[0] = usize::MAX / 2;
        assert_malformed(&description);

        let mut description = small();
        description.layer_sizes = vec![usize::MAX, 2, 1];
        assert_malformed(&description);
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut description = small();
        description.connections[0][0].weight = f64::INFINITY;
        assert_malformed(&description);

        let mut description = small();
        description.biases[1][0] = f64::NAN;
        assert_malformed(&description);
    }
}
