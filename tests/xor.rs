use rand::{rngs::StdRng, SeedableRng};
use shallow_nn::{Network, NetworkConfig};

fn setup_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn xor_samples() -> Vec<(Vec<f64>, Vec<f64>)> {
    vec![
        (vec![0.0, 0.0], vec![0.0]),
        (vec![0.0, 1.0], vec![1.0]),
        (vec![1.0, 0.0], vec![1.0]),
        (vec![1.0, 1.0], vec![0.0]),
    ]
}

fn converged(network: &Network, samples: &[(Vec<f64>, Vec<f64>)]) -> bool {
    samples
        .iter()
        .all(|(input, target)| (network.predict(input).unwrap()[0] - target[0]).abs() < 0.1)
}

/// Cycles through the samples for up to `max_steps`, stopping early once
/// every output is within tolerance.
fn train_xor(network: &mut Network, samples: &[(Vec<f64>, Vec<f64>)], max_steps: usize) -> bool {
    for step in 0..max_steps {
        let (input, target) = &samples[step % samples.len()];
        network.train(input, target).unwrap();
        if step % 10_000 == 9_999 && converged(network, samples) {
            return true;
        }
    }
    converged(network, samples)
}

#[test]
fn learns_xor_with_default_topology() {
    setup_logger();
    let samples = xor_samples();

    // Some initial weights settle in a local minimum; the first seed that
    // escapes it must fit all four cases.
    let network = (0..10u64)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut network =
                Network::with_rng(2, 2, 1, NetworkConfig::default(), &mut rng).unwrap();
            let ok = train_xor(&mut network, &samples, 200_000);
            (network, ok)
        })
        .find(|(_, ok)| *ok)
        .map(|(network, _)| network)
        .expect("no seed converged on XOR");

    assert_eq!(network.topology(), (2, 2, 1));
    assert_eq!(network.learning_rate(), 0.1);
    for (input, target) in &samples {
        let output = network.predict(input).unwrap();
        assert!(
            (output[0] - target[0]).abs() < 0.1,
            "{:?} -> {:.4}, expected {}",
            input,
            output[0],
            target[0]
        );
    }
}

#[test]
fn learns_xor() {
    setup_logger();
    let mut rng = StdRng::seed_from_u64(42);
    let config = NetworkConfig::default().with_learning_rate(0.5);
    let mut network = Network::with_rng(2, 8, 1, config, &mut rng).unwrap();
    let samples = xor_samples();

    for step in 0..40_000 {
        let (input, target) = &samples[step % samples.len()];
        network.train(input, target).unwrap();
    }

    for (input, target) in &samples {
        let output = network.predict(input).unwrap();
        assert!(
            (output[0] - target[0]).abs() < 0.1,
            "{:?} -> {:.4}, expected {}",
            input,
            output[0],
            target[0]
        );
    }
}

#[test]
fn repeated_training_moves_prediction_toward_target() {
    setup_logger();
    let mut rng = StdRng::seed_from_u64(9);
    let mut network = Network::with_rng(2, 2, 1, NetworkConfig::default(), &mut rng).unwrap();
    let (input, target) = ([0.0, 1.0], [1.0]);
    let before = (network.predict(&input).unwrap()[0] - target[0]).abs();

    for _ in 0..1_000 {
        network.train(&input, &target).unwrap();
    }

    let after = (network.predict(&input).unwrap()[0] - target[0]).abs();
    assert!(after < before, "error went from {} to {}", before, after);
}
