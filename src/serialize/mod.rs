pub mod description;

pub use description::{from_description, to_description, NetworkDescription};
