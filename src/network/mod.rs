pub mod config;
pub mod network;

pub use config::{NetworkConfig, DEFAULT_INIT_RANGE, DEFAULT_SEED};
pub use network::{Network, NetworkState};
