use std::sync::atomic::Ordering;

use tracing::info;

use crate::errors::NetworkError;
use crate::network::network::Network;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{check_samples, run_epoch};

/// Outcome of a `train_loop` run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Epochs actually completed.
    pub epochs_run: usize,
    /// Mean squared error of the last completed epoch.
    pub final_error: f64,
    /// True when the error threshold or the stop flag ended the run.
    pub stopped_early: bool,
}

/// Trains `network` for up to `config.epochs` epochs, presenting the samples
/// in their given order every epoch.
///
/// # Early termination
/// The loop ends before all epochs are run if:
/// - an epoch's mean error drops below `config.error_threshold`, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<TrainReport, NetworkError> {
    config.validate()?;
    check_samples(network, inputs, expected_outputs)?;

    let mut report = TrainReport {
        epochs_run: 0,
        final_error: f64::NAN,
        stopped_early: false,
    };

    for epoch in 1..=config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                report.stopped_early = true;
                break;
            }
        }

        let error = run_epoch(network, inputs, expected_outputs, config.learning_rate)?;
        report.epochs_run = epoch;
        report.final_error = error;

        if config.log_interval > 0 && epoch % config.log_interval == 0 {
            info!(epoch, total_epochs = config.epochs, error, "training progress");
        }

        if config.error_threshold.is_some_and(|threshold| error < threshold) {
            report.stopped_early = true;
            break;
        }
    }

    info!(
        epochs_run = report.epochs_run,
        final_error = report.final_error,
        stopped_early = report.stopped_early,
        "training finished"
    );
    Ok(report)
}
