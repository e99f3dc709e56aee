pub mod connection;
pub mod neuron;

pub use connection::Connection;
pub use neuron::Neuron;
