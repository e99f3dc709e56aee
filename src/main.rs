//! Command-line entry point. The network, serializer and trainer are all in
//! the library; training on XOR is shown by the `xor` demo
//! (`cargo run --example xor`).

fn main() {
    println!("perceptron-nn {}", env!("CARGO_PKG_VERSION"));
    println!("Feedforward layers trained online by backpropagation, saved as a JSON description.");
    println!("See `cargo run --example xor` for a (2, 3, 1) network learning XOR.");
}
