use log::{debug, trace};
use rand::Rng;

use crate::activation::activation::Activation;
use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;

/// Fully connected network with one hidden layer.
///
/// Weights are stored as `hidden x input` and `output x hidden` matrices and
/// biases as column vectors, so a forward pass is two matrix products on a
/// column input. `Clone` produces a fully independent copy, including the
/// learning rate and activation.
#[derive(Debug, Clone)]
pub struct Network {
    input_nodes: usize,
    hidden_nodes: usize,
    output_nodes: usize,
    weights_ih: Matrix,
    weights_ho: Matrix,
    bias_h: Matrix,
    bias_o: Matrix,
    learning_rate: f64,
    activation: Activation,
}

/// Weight and bias updates computed by one training step, applied together.
struct Deltas {
    weights_ho: Matrix,
    bias_o: Matrix,
    weights_ih: Matrix,
    bias_h: Matrix,
}

impl Network {
    /// Builds a network with the default config and thread-local randomness.
    pub fn new(input_nodes: usize, hidden_nodes: usize, output_nodes: usize) -> Result<Network> {
        Network::with_config(input_nodes, hidden_nodes, output_nodes, NetworkConfig::default())
    }

    pub fn with_config(
        input_nodes: usize,
        hidden_nodes: usize,
        output_nodes: usize,
        config: NetworkConfig,
    ) -> Result<Network> {
        Network::with_rng(input_nodes, hidden_nodes, output_nodes, config, &mut rand::thread_rng())
    }

    /// Builds a network whose weights and biases are drawn from `rng`.
    ///
    /// Two networks built from identically seeded sources are identical.
    pub fn with_rng<R: Rng + ?Sized>(
        input_nodes: usize,
        hidden_nodes: usize,
        output_nodes: usize,
        config: NetworkConfig,
        rng: &mut R,
    ) -> Result<Network> {
        if input_nodes == 0 {
            return Err(NnError::InvalidTopology { what: "input nodes" });
        }
        if hidden_nodes == 0 {
            return Err(NnError::InvalidTopology { what: "hidden nodes" });
        }
        if output_nodes == 0 {
            return Err(NnError::InvalidTopology { what: "output nodes" });
        }

        let weights_ih = Matrix::random_with(hidden_nodes, input_nodes, rng);
        let weights_ho = Matrix::random_with(output_nodes, hidden_nodes, rng);
        let bias_h = Matrix::random_with(hidden_nodes, 1, rng);
        let bias_o = Matrix::random_with(output_nodes, 1, rng);

        debug!(
            "network {}-{}-{} created (learning rate {}, activation {:?})",
            input_nodes, hidden_nodes, output_nodes, config.learning_rate, config.activation
        );

        Ok(Network {
            input_nodes,
            hidden_nodes,
            output_nodes,
            weights_ih,
            weights_ho,
            bias_h,
            bias_o,
            learning_rate: config.learning_rate,
            activation: config.activation,
        })
    }

    /// Forward pass. Returns `output_nodes` values; the network is untouched.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let inputs = self.input_column(input)?;
        let (_, outputs) = self.feed_forward(&inputs)?;
        Ok(outputs.to_array())
    }

    /// One step of gradient descent on a single `(input, target)` pair.
    ///
    /// Every update is computed before any is applied, so an error leaves the
    /// network exactly as it was.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        let inputs = self.input_column(input)?;
        if target.len() != self.output_nodes {
            return Err(NnError::ShapeMismatch {
                op: "train target",
                left: (self.output_nodes, 1),
                right: (target.len(), 1),
            });
        }
        let targets = Matrix::from_array(target);

        let (hidden, outputs) = self.feed_forward(&inputs)?;
        let deltas = self.backpropagate(&inputs, &hidden, &outputs, &targets)?;

        self.weights_ho.add_matrix(&deltas.weights_ho)?;
        self.bias_o.add_matrix(&deltas.bias_o)?;
        self.weights_ih.add_matrix(&deltas.weights_ih)?;
        self.bias_h.add_matrix(&deltas.bias_h)?;

        Ok(())
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// `(input, hidden, output)` node counts.
    pub fn topology(&self) -> (usize, usize, usize) {
        (self.input_nodes, self.hidden_nodes, self.output_nodes)
    }

    pub fn weights_ih(&self) -> &Matrix {
        &self.weights_ih
    }

    pub fn weights_ho(&self) -> &Matrix {
        &self.weights_ho
    }

    pub fn bias_h(&self) -> &Matrix {
        &self.bias_h
    }

    pub fn bias_o(&self) -> &Matrix {
        &self.bias_o
    }

    fn input_column(&self, input: &[f64]) -> Result<Matrix> {
        if input.len() != self.input_nodes {
            return Err(NnError::ShapeMismatch {
                op: "network input",
                left: (self.input_nodes, 1),
                right: (input.len(), 1),
            });
        }
        Ok(Matrix::from_array(input))
    }

    /// Returns the activated hidden and output columns.
    fn feed_forward(&self, inputs: &Matrix) -> Result<(Matrix, Matrix)> {
        let activation = &self.activation;

        let mut hidden = Matrix::product(&self.weights_ih, inputs)?;
        hidden
            .add_matrix(&self.bias_h)?
            .map(|x, _, _| activation.function(x));

        let mut outputs = Matrix::product(&self.weights_ho, &hidden)?;
        outputs
            .add_matrix(&self.bias_o)?
            .map(|x, _, _| activation.function(x));

        Ok((hidden, outputs))
    }

    fn backpropagate(
        &self,
        inputs: &Matrix,
        hidden: &Matrix,
        outputs: &Matrix,
        targets: &Matrix,
    ) -> Result<Deltas> {
        let activation = &self.activation;
        let lr = self.learning_rate;

        let output_errors = Matrix::subtract(targets, outputs)?;

        let mut gradients = outputs.clone();
        gradients
            .map(|y, _, _| activation.derivative(y))
            .mul_elementwise(&output_errors)?
            .mul_scalar(lr);

        let weight_ho_deltas = Matrix::product(&gradients, &hidden.transpose())?;

        // Hidden errors flow back through the already-updated output weights.
        let mut updated_ho = self.weights_ho.clone();
        updated_ho.add_matrix(&weight_ho_deltas)?;
        let hidden_errors = Matrix::product(&updated_ho.transpose(), &output_errors)?;

        let mut hidden_gradient = hidden.clone();
        hidden_gradient
            .map(|y, _, _| activation.derivative(y))
            .mul_elementwise(&hidden_errors)?
            .mul_scalar(lr);

        let weights_ih_deltas = Matrix::product(&hidden_gradient, &inputs.transpose())?;

        trace!(
            "train step: output errors {:?}, hidden errors {:?}",
            output_errors.to_array(),
            hidden_errors.to_array()
        );

        Ok(Deltas {
            weights_ho: weight_ho_deltas,
            bias_o: gradients,
            weights_ih: weights_ih_deltas,
            bias_h: hidden_gradient,
        })
    }
}
