//! Single fully connected layer with sigmoid activation.

use ndarray::{Array, Array1, Array2, Dimension, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{StandardNormal, Uniform};

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with weights and biases drawn from `[-scale, scale)`.
    pub fn new_random(input_size: usize, output_size: usize, scale: f32) -> Self {
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new(-scale, scale)),
            biases: Array1::random(output_size, Uniform::new(-scale, scale)),
        }
    }

    /// Number of inputs the layer accepts.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs forward pass with sigmoid activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(sigmoid);
        output
    }

    /// Adds `N(0, std_dev)` noise to each weight and bias with probability `rate`.
    pub fn mutate(&mut self, rate: f32, std_dev: f32) {
        perturb(&mut self.weights, rate, std_dev);
        perturb(&mut self.biases, rate, std_dev);
    }
}

/// Logistic function, `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn perturb<D: Dimension>(values: &mut Array<f32, D>, rate: f32, std_dev: f32) {
    if rate <= 0.0 {
        return;
    }
    let noise = Array::<f32, D>::random(values.raw_dim(), StandardNormal);
    let rolls = Array::<f32, D>::random(values.raw_dim(), Uniform::new(0.0, 1.0));

    Zip::from(values)
        .and(&noise)
        .and(&rolls)
        .for_each(|value, &n, &roll| {
            if roll < rate {
                *value += n * std_dev;
            }
        });
}
