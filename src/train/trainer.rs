use crate::{
    errors::NetworkError,
    loss::mse::MseLoss,
    network::network::Network,
    train::train_config::validate_learning_rate,
};

/// Runs one epoch of online SGD: every sample, in the given order, is
/// activated and immediately propagated. Returns the mean squared error of
/// the outputs seen before each update.
pub fn train_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    learning_rate: f64,
) -> Result<f64, NetworkError> {
    validate_learning_rate(learning_rate)?;
    check_samples(network, inputs, expected_outputs)?;
    run_epoch(network, inputs, expected_outputs, learning_rate)
}

pub(crate) fn run_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
    learning_rate: f64,
) -> Result<f64, NetworkError> {
    let mut total_loss = 0.0;

    for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
        let output = network.activate(input)?;
        total_loss += MseLoss::loss(&output, expected);
        network.propagate(learning_rate, expected)?;
    }

    Ok(total_loss / inputs.len() as f64)
}

/// Rejects empty or ragged data before any weight is touched.
pub(crate) fn check_samples(
    network: &Network,
    inputs: &[Vec<f64>],
    expected_outputs: &[Vec<f64>],
) -> Result<(), NetworkError> {
    if inputs.is_empty() {
        return Err(NetworkError::InvalidConfig("training set is empty".to_string()));
    }
    if inputs.len() != expected_outputs.len() {
        return Err(NetworkError::shape("training targets", inputs.len(), expected_outputs.len()));
    }
    for (input, expected) in inputs.iter().zip(expected_outputs) {
        if input.len() != network.input_size() {
            return Err(NetworkError::shape("training input", network.input_size(), input.len()));
        }
        if expected.len() != network.output_size() {
            return Err(NetworkError::shape("training target", network.output_size(), expected.len()));
        }
    }
    Ok(())
}
