use shallow_nn::{Network, NetworkConfig};

fn main() -> shallow_nn::Result<()> {
    env_logger::init();

    let mut network = Network::with_config(2, 2, 1, NetworkConfig::default())?;

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let epochs = 50_000;

    for epoch in 0..epochs {
        let mut loss = 0.0;
        for (input, expected) in inputs.iter().zip(expected_outputs.iter()) {
            network.train(input, expected)?;
            let output = network.predict(input)?;
            loss += (output[0] - expected[0]).powi(2);
        }
        if epoch % 5000 == 0 {
            println!("Epoch {epoch}: loss = {:.6}", loss / inputs.len() as f64);
        }
    }

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }

    Ok(())
}
