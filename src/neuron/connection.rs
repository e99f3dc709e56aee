use serde::{Serialize, Deserialize};

/// Weighted edge from neuron `from` of a source layer to neuron `to` of the
/// layer directly downstream. Indices point into each layer's neuron vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

impl Connection {
    pub fn new(from: usize, to: usize, weight: f64) -> Connection {
        Connection { from, to, weight }
    }
}
