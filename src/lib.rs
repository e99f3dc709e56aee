pub mod activation;
pub mod errors;
pub mod neuron;
pub mod layers;
pub mod network;
pub mod serialize;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use activation::activation::Squash;
pub use errors::NetworkError;
pub use neuron::{Connection, Neuron};
pub use layers::dense::{Backprop, Layer, Projection, Signal};
pub use network::{Network, NetworkConfig, NetworkState};
pub use serialize::{from_description, to_description, NetworkDescription};
pub use loss::MseLoss;
pub use train::{train_loop, train_network, TrainConfig, TrainReport};
