#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use globys_escape::simulation::brain::{
    HIDDEN_NODES, INPUT_NODES, Matrix, NeuralNetwork, OUTPUT_NODES, mlp::sigmoid,
};
use globys_escape::simulation::error::{LoadError, PredictError};
use ndarray::Array1;

fn observation() -> Array1<f32> {
    Array1::linspace(-1.0, 1.0, INPUT_NODES)
}

#[test]
fn test_predict_outputs_are_in_unit_interval() {
    let network = NeuralNetwork::new();
    let output = network.predict(&observation()).unwrap();

    assert_eq!(output.len(), OUTPUT_NODES);
    assert!(output.iter().all(|&v| v > 0.0 && v < 1.0));
}

#[test]
fn test_predict_rejects_wrong_input_size() {
    let network = NeuralNetwork::new();
    let err = network.predict(&Array1::zeros(12)).unwrap_err();
    assert_eq!(
        err,
        PredictError::InputSize {
            expected: 13,
            actual: 12
        }
    );
}

#[test]
fn test_predict_rejects_non_finite_input() {
    let network = NeuralNetwork::new();
    let mut inputs = observation();
    inputs[3] = f32::NAN;
    assert_eq!(network.predict(&inputs), Err(PredictError::NonFinite));
}

#[test]
fn test_copy_then_mutate_leaves_original_untouched() {
    let original = NeuralNetwork::new();
    let snapshot = original.to_weights();

    let mut child = original.copy();
    child.mutate(1.0);

    assert_eq!(original.to_weights(), snapshot);
    assert_ne!(child.to_weights(), snapshot);
}

#[test]
fn test_mutate_with_zero_rate_is_a_no_op() {
    let mut network = NeuralNetwork::new();
    let before = network.to_weights();
    network.mutate(0.0);
    assert_eq!(network.to_weights(), before);
}

#[test]
fn test_exported_weight_shapes() {
    let weights = NeuralNetwork::new().to_weights();

    assert_eq!((weights.weights_ih.rows, weights.weights_ih.cols), (HIDDEN_NODES, INPUT_NODES));
    assert_eq!(weights.weights_ih.data.len(), HIDDEN_NODES * INPUT_NODES);
    assert_eq!((weights.weights_ho.rows, weights.weights_ho.cols), (OUTPUT_NODES, HIDDEN_NODES));
    assert_eq!((weights.bias_h.rows, weights.bias_h.cols), (HIDDEN_NODES, 1));
    assert_eq!((weights.bias_o.rows, weights.bias_o.cols), (OUTPUT_NODES, 1));
}

#[test]
fn test_weights_round_trip_preserves_predictions() {
    let network = NeuralNetwork::new();
    let rebuilt = NeuralNetwork::from_weights(&network.to_weights()).unwrap();
    assert_eq!(
        network.predict(&observation()).unwrap(),
        rebuilt.predict(&observation()).unwrap()
    );
}

#[test]
fn test_import_rejects_wrong_dimensions() {
    let mut weights = NeuralNetwork::new().to_weights();
    weights.weights_ih = Matrix {
        rows: 13,
        cols: 16,
        data: vec![0.0; 208],
    };

    match NeuralNetwork::from_weights(&weights) {
        Err(LoadError::Dimension {
            name,
            expected_rows,
            expected_cols,
            ..
        }) => {
            assert_eq!(name, "weights_ih");
            assert_eq!((expected_rows, expected_cols), (16, 13));
        }
        other => panic!("expected a dimension error, got {other:?}"),
    }
}

#[test]
fn test_import_rejects_short_data() {
    let mut weights = NeuralNetwork::new().to_weights();
    weights.bias_o.data.pop();

    assert!(matches!(
        NeuralNetwork::from_weights(&weights),
        Err(LoadError::DataLength {
            name: "bias_o",
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn test_import_rejects_non_finite_values() {
    let mut weights = NeuralNetwork::new().to_weights();
    weights.weights_ho.data[0] = f32::INFINITY;

    assert!(matches!(
        NeuralNetwork::from_weights(&weights),
        Err(LoadError::NonFinite { name: "weights_ho" })
    ));
}

#[test]
fn test_failed_load_leaves_network_unchanged() {
    let mut network = NeuralNetwork::new();
    let before = network.to_weights();

    let mut bad = NeuralNetwork::new().to_weights();
    bad.bias_h.rows = 3;

    assert!(network.load_weights(&bad).is_err());
    assert_eq!(network.to_weights(), before);

    let good = NeuralNetwork::new().to_weights();
    network.load_weights(&good).unwrap();
    assert_eq!(network.to_weights(), good);
}

#[test]
fn test_custom_topology() {
    let network = NeuralNetwork::with_topology(4, 3, 1);
    assert_eq!(network.input_size(), 4);
    assert_eq!(network.hidden_size(), 3);
    assert_eq!(network.output_size(), 1);
    assert_eq!(network.predict(&Array1::zeros(4)).unwrap().len(), 1);
}

#[test]
fn test_sigmoid_midpoint() {
    assert_eq!(sigmoid(0.0), 0.5);
    assert!(sigmoid(10.0) > 0.99);
    assert!(sigmoid(-10.0) < 0.01);
}
