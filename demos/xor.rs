/// Teaches a (2, 3, 1) perceptron XOR with online backpropagation.
///
/// Run with:
///   cargo run --example xor
/// Progress is logged at `info`; override with e.g. `RUST_LOG=perceptron_nn=debug`.
use perceptron_nn::{train_loop, Network, TrainConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), perceptron_nn::NetworkError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut network = Network::perceptron(2, 3, 1)?;

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let expected_outputs = vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ];

    let config = TrainConfig::new(20_000, 0.3).with_log_interval(2_000);
    train_loop(&mut network, &inputs, &expected_outputs, &config)?;

    for (input, expected) in inputs.iter().zip(&expected_outputs) {
        println!("Expect: {:?} => {:?}", input, expected);
        println!("   Got: {:?} => {:.4}\n", input, network.activate(input)?[0]);
    }

    println!("{}", network.to_json()?);
    Ok(())
}
