pub mod dense;

pub use dense::{Backprop, Layer, Projection, Signal};
