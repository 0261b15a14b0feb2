//! Neural network implementation for predator brains.
//!
//! A fixed-topology feed-forward network (input → hidden → output, sigmoid
//! activations) supporting inference, mutation, deep copy and validated
//! weight import/export.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::{LoadError, PredictError};

pub mod archive;
pub mod mlp;
pub mod weights;

pub use archive::BrainArchive;
pub use mlp::Mlp;
pub use weights::{Matrix, NetworkWeights};

/// Observation size: 5 wall rays, 5 player rays, angle, distance, speed.
pub const INPUT_NODES: usize = 13;
/// Hidden layer width.
pub const HIDDEN_NODES: usize = 16;
/// Steering x and y.
pub const OUTPUT_NODES: usize = 2;
/// Standard deviation of the Gaussian noise added by [`NeuralNetwork::mutate`].
pub const MUTATION_STD: f32 = 0.1;
/// Initial weights are uniform in `[-INIT_SCALE, INIT_SCALE)`.
const INIT_SCALE: f32 = 1.0;

/// Two-layer perceptron used as a predator brain.
///
/// Serializes through [`NetworkWeights`]; deserialization validates the
/// 13 → 16 → 2 topology before accepting any value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkWeights", into = "NetworkWeights")]
pub struct NeuralNetwork {
    hidden: Mlp,
    output: Mlp,
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NeuralNetwork {
    /// Creates a randomly initialised brain with the game topology.
    pub fn new() -> Self {
        Self::with_topology(INPUT_NODES, HIDDEN_NODES, OUTPUT_NODES)
    }

    /// Creates a randomly initialised network of arbitrary size.
    pub fn with_topology(input: usize, hidden: usize, output: usize) -> Self {
        Self {
            hidden: Mlp::new_random(input, hidden, INIT_SCALE),
            output: Mlp::new_random(hidden, output, INIT_SCALE),
        }
    }

    /// Input layer size.
    pub fn input_size(&self) -> usize {
        self.hidden.input_size()
    }

    /// Hidden layer size.
    pub fn hidden_size(&self) -> usize {
        self.hidden.output_size()
    }

    /// Output layer size.
    pub fn output_size(&self) -> usize {
        self.output.output_size()
    }

    /// Runs a forward pass. Every output lies in (0, 1).
    pub fn predict(&self, inputs: &Array1<f32>) -> Result<Array1<f32>, PredictError> {
        if inputs.len() != self.input_size() {
            return Err(PredictError::InputSize {
                expected: self.input_size(),
                actual: inputs.len(),
            });
        }
        if inputs.iter().any(|v| !v.is_finite()) {
            return Err(PredictError::NonFinite);
        }
        let hidden = self.hidden.forward(inputs);
        Ok(self.output.forward(&hidden))
    }

    /// Perturbs each weight and bias with probability `rate` by `N(0, 0.1)`.
    pub fn mutate(&mut self, rate: f32) {
        self.hidden.mutate(rate, MUTATION_STD);
        self.output.mutate(rate, MUTATION_STD);
    }

    /// Deep copy with independent weight storage.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Exports weights and biases as flat, shape-tagged matrices.
    pub fn to_weights(&self) -> NetworkWeights {
        NetworkWeights {
            weights_ih: Matrix::from_array2(&self.hidden.weights),
            weights_ho: Matrix::from_array2(&self.output.weights),
            bias_h: Matrix::from_array1(&self.hidden.biases),
            bias_o: Matrix::from_array1(&self.output.biases),
        }
    }

    /// Builds a game-topology brain from exported weights.
    pub fn from_weights(weights: &NetworkWeights) -> Result<Self, LoadError> {
        Self::from_weights_with_topology(weights, INPUT_NODES, HIDDEN_NODES, OUTPUT_NODES)
    }

    /// Replaces this network's values, keeping its own dimensions.
    ///
    /// All four matrices are validated before anything is overwritten.
    pub fn load_weights(&mut self, weights: &NetworkWeights) -> Result<(), LoadError> {
        let loaded = Self::from_weights_with_topology(
            weights,
            self.input_size(),
            self.hidden_size(),
            self.output_size(),
        )?;
        *self = loaded;
        Ok(())
    }

    /// Serializes to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_weights())
    }

    /// Parses and validates JSON produced by [`NeuralNetwork::to_json`].
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let weights: NetworkWeights = serde_json::from_str(json)?;
        Self::from_weights(&weights)
    }

    fn from_weights_with_topology(
        weights: &NetworkWeights,
        input: usize,
        hidden: usize,
        output: usize,
    ) -> Result<Self, LoadError> {
        let weights_ih = weights.weights_ih.to_array2("weights_ih", (hidden, input))?;
        let bias_h = weights.bias_h.to_array1("bias_h", hidden)?;
        let weights_ho = weights.weights_ho.to_array2("weights_ho", (output, hidden))?;
        let bias_o = weights.bias_o.to_array1("bias_o", output)?;

        Ok(Self {
            hidden: Mlp {
                weights: weights_ih,
                biases: bias_h,
            },
            output: Mlp {
                weights: weights_ho,
                biases: bias_o,
            },
        })
    }
}

impl TryFrom<NetworkWeights> for NeuralNetwork {
    type Error = LoadError;

    fn try_from(weights: NetworkWeights) -> Result<Self, Self::Error> {
        Self::from_weights(&weights)
    }
}

impl From<NeuralNetwork> for NetworkWeights {
    fn from(network: NeuralNetwork) -> Self {
        network.to_weights()
    }
}
