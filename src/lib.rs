pub mod math;
pub mod activation;
pub mod network;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::Activation;
pub use network::network::Network;
pub use network::config::NetworkConfig;
pub use error::{NnError, Result};
