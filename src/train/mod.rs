pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use loop_fn::{train_loop, TrainReport};
pub use train_config::TrainConfig;
pub use trainer::train_network;
