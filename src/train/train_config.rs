use std::sync::{Arc, atomic::AtomicBool};

use crate::errors::NetworkError;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`         : number of full passes over the samples
/// - `learning_rate`  : fixed SGD step size
/// - `log_interval`   : emit an `info!` event every this many epochs; `0` disables it
/// - `error_threshold`: stop once an epoch's mean squared error falls below this
/// - `stop_flag`      : optional atomic flag; when set to `true` from another
///                    thread the loop ends before the next epoch.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub log_interval: usize,
    pub error_threshold: Option<f64>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a config with no periodic logging, no threshold and no stop flag.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            log_interval: 0,
            error_threshold: None,
            stop_flag: None,
        }
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    pub fn with_error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = Some(threshold);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        validate_learning_rate(self.learning_rate)
    }
}

pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<(), NetworkError> {
    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(NetworkError::InvalidConfig(format!(
            "learning_rate must be finite and positive, got {learning_rate}"
        )));
    }
    Ok(())
}
