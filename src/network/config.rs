use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Per-network hyperparameters.
///
/// # Fields
/// - `learning_rate` — scale applied to every gradient before it is added
///                     to the weights (default `0.1`)
/// - `activation`    — transfer function used by both layers (default sigmoid)
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub learning_rate: f64,
    pub activation: Activation,
}

impl NetworkConfig {
    pub fn new(learning_rate: f64, activation: Activation) -> Self {
        NetworkConfig {
            learning_rate,
            activation,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig::new(DEFAULT_LEARNING_RATE, Activation::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = NetworkConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert!(matches!(config.activation, Activation::Sigmoid));
    }

    #[test]
    fn builders_override_single_fields() {
        let config = NetworkConfig::default()
            .with_learning_rate(0.5)
            .with_activation(Activation::tanh());
        assert_eq!(config.learning_rate, 0.5);
        assert!(matches!(config.activation, Activation::Tanh));
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: NetworkConfig = serde_json::from_str(r#"{"activation": "Tanh"}"#).unwrap();
        assert_eq!(config.learning_rate, DEFAULT_LEARNING_RATE);
        assert!(matches!(config.activation, Activation::Tanh));

        let config: NetworkConfig = serde_json::from_str(r#"{"learning_rate": 0.3}"#).unwrap();
        assert_eq!(config.learning_rate, 0.3);
        assert!(matches!(config.activation, Activation::Sigmoid));
    }
}
