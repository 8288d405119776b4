//! Autoencoder embedding model
//!
//! Compresses sparse feature vectors into dense latent vectors by learning to
//! reconstruct its own input (no labels). The [`Embedder`] trait is the seam:
//! the engine only needs `train` + `encode`, so any dimensionality-reduction
//! technique satisfying the self-reconstruction contract can substitute.
//!
//! Architecture mirrors the reference model: `input -> 64 (ReLU) -> latent
//! (ReLU) -> 64 (ReLU) -> input (sigmoid)`, MSE loss, mini-batch SGD with a
//! fixed epoch budget.

use peermatch_core::{Error, Result, Vector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// A self-supervised compressor from feature space to latent space
pub trait Embedder: Send + Sync {
    /// Learn parameters minimizing reconstruction error of `rows` against
    /// themselves. Always terminates within the configured epoch budget.
    fn train(&mut self, rows: &[Vector]) -> Result<TrainingHistory>;

    /// Deterministic forward pass producing one latent vector per input row.
    /// Never mutates the model; repeated calls return identical output.
    fn encode(&self, rows: &[Vector]) -> Result<Vec<Vector>>;

    fn latent_dim(&self) -> usize;
}

/// Per-epoch mean reconstruction loss
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    pub losses: Vec<f32>,
}

impl TrainingHistory {
    #[must_use]
    pub fn final_loss(&self) -> Option<f32> {
        self.losses.last().copied()
    }
}

/// Training hyperparameters
#[derive(Debug, Clone)]
pub struct AutoencoderConfig {
    /// Latent width; must be strictly smaller than the input width
    pub latent_dim: usize,
    pub hidden_dim: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    /// Fixed seed for reproducible weight init and batch shuffling
    pub seed: Option<u64>,
}

impl Default for AutoencoderConfig {
    fn default() -> Self {
        Self {
            latent_dim: 32,
            hidden_dim: 64,
            epochs: 50,
            batch_size: 32,
            learning_rate: 0.05,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    Relu,
    Sigmoid,
}

impl Activation {
    #[inline]
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Derivative expressed in terms of the activation output
    #[inline]
    fn derivative(self, y: f32) -> f32 {
        match self {
            Activation::Relu => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => y * (1.0 - y),
        }
    }
}

#[derive(Debug, Clone)]
struct Layer {
    in_dim: usize,
    out_dim: usize,
    /// Row-major, `out_dim x in_dim`
    weights: Vec<f32>,
    biases: Vec<f32>,
    activation: Activation,
}

impl Layer {
    fn new(in_dim: usize, out_dim: usize, activation: Activation, rng: &mut StdRng) -> Self {
        // Xavier-style uniform init
        let limit = (6.0 / (in_dim + out_dim) as f32).sqrt();
        let weights = (0..in_dim * out_dim)
            .map(|_| rng.random_range(-limit..limit))
            .collect();
        Self {
            in_dim,
            out_dim,
            weights,
            biases: vec![0.0; out_dim],
            activation,
        }
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut output = Vec::with_capacity(self.out_dim);
        for o in 0..self.out_dim {
            let row = &self.weights[o * self.in_dim..(o + 1) * self.in_dim];
            let mut acc = self.biases[o];
            for (w, x) in row.iter().zip(input) {
                acc += w * x;
            }
            output.push(self.activation.apply(acc));
        }
        output
    }
}

/// Accumulated gradients for one mini-batch, same shapes as the layers
struct Gradients {
    weights: Vec<Vec<f32>>,
    biases: Vec<Vec<f32>>,
}

impl Gradients {
    fn zeros(layers: &[Layer]) -> Self {
        Self {
            weights: layers.iter().map(|l| vec![0.0; l.weights.len()]).collect(),
            biases: layers.iter().map(|l| vec![0.0; l.biases.len()]).collect(),
        }
    }
}

/// Dense autoencoder with a mirrored encoder/decoder
#[derive(Debug, Clone)]
pub struct Autoencoder {
    config: AutoencoderConfig,
    input_dim: usize,
    /// Encoder is the first [`ENCODER_LAYERS`] layers
    layers: Vec<Layer>,
    rng: StdRng,
}

const ENCODER_LAYERS: usize = 2;

impl Autoencoder {
    pub fn new(input_dim: usize, config: AutoencoderConfig) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidConfig("input width must be positive".into()));
        }
        if config.latent_dim == 0 || config.latent_dim >= input_dim {
            return Err(Error::InvalidConfig(format!(
                "latent width {} must be in 1..{} for compression to be meaningful",
                config.latent_dim, input_dim
            )));
        }
        if config.hidden_dim == 0 {
            return Err(Error::InvalidConfig("hidden width must be positive".into()));
        }
        if config.epochs == 0 || config.batch_size == 0 {
            return Err(Error::InvalidConfig(
                "epochs and batch size must be positive".into(),
            ));
        }
        if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(
                "learning rate must be finite and positive".into(),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let layers = vec![
            Layer::new(input_dim, config.hidden_dim, Activation::Relu, &mut rng),
            Layer::new(config.hidden_dim, config.latent_dim, Activation::Relu, &mut rng),
            Layer::new(config.latent_dim, config.hidden_dim, Activation::Relu, &mut rng),
            Layer::new(config.hidden_dim, input_dim, Activation::Sigmoid, &mut rng),
        ];

        Ok(Self {
            config,
            input_dim,
            layers,
            rng,
        })
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Full forward pass, reconstructing each row through the bottleneck
    pub fn reconstruct(&self, rows: &[Vector]) -> Result<Vec<Vector>> {
        rows.iter()
            .map(|row| {
                self.check_dim(row)?;
                Ok(Vector::new(self.forward_through(row.as_slice(), self.layers.len())))
            })
            .collect()
    }

    fn check_dim(&self, row: &Vector) -> Result<()> {
        if row.dim() != self.input_dim {
            return Err(Error::DimensionMismatch {
                expected: self.input_dim,
                actual: row.dim(),
            });
        }
        Ok(())
    }

    fn forward_through(&self, input: &[f32], layer_count: usize) -> Vec<f32> {
        let mut current = input.to_vec();
        for layer in &self.layers[..layer_count] {
            current = layer.forward(&current);
        }
        current
    }

    /// Forward pass keeping every layer's activations for backprop
    fn forward_all(&self, input: &[f32]) -> Vec<Vec<f32>> {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.to_vec());
        for layer in &self.layers {
            let next = layer.forward(activations.last().map_or(input, Vec::as_slice));
            activations.push(next);
        }
        activations
    }

    /// Backpropagate one sample's reconstruction error into `grads`,
    /// returning the sample's MSE loss
    fn backward(&self, activations: &[Vec<f32>], target: &[f32], grads: &mut Gradients) -> f32 {
        let output = activations.last().expect("forward_all always yields output");
        let out_dim = output.len() as f32;

        let loss = output
            .iter()
            .zip(target)
            .map(|(y, t)| (y - t) * (y - t))
            .sum::<f32>()
            / out_dim;

        // dL/d(pre-activation) of the output layer
        let out_act = self.layers[self.layers.len() - 1].activation;
        let mut delta: Vec<f32> = output
            .iter()
            .zip(target)
            .map(|(y, t)| 2.0 * (y - t) / out_dim * out_act.derivative(*y))
            .collect();

        for l in (0..self.layers.len()).rev() {
            let layer = &self.layers[l];
            let input = &activations[l];

            for o in 0..layer.out_dim {
                let d = delta[o];
                let row = &mut grads.weights[l][o * layer.in_dim..(o + 1) * layer.in_dim];
                for (g, x) in row.iter_mut().zip(input) {
                    *g += d * x;
                }
                grads.biases[l][o] += d;
            }

            if l > 0 {
                let prev_act = self.layers[l - 1].activation;
                let mut next_delta = vec![0.0f32; layer.in_dim];
                for (i, nd) in next_delta.iter_mut().enumerate() {
                    let mut acc = 0.0;
                    for o in 0..layer.out_dim {
                        acc += layer.weights[o * layer.in_dim + i] * delta[o];
                    }
                    *nd = acc * prev_act.derivative(input[i]);
                }
                delta = next_delta;
            }
        }

        loss
    }

    fn apply_gradients(&mut self, grads: &Gradients, batch_len: usize) {
        let step = self.config.learning_rate / batch_len as f32;
        for (layer, (gw, gb)) in self
            .layers
            .iter_mut()
            .zip(grads.weights.iter().zip(grads.biases.iter()))
        {
            for (w, g) in layer.weights.iter_mut().zip(gw) {
                *w -= step * g;
            }
            for (b, g) in layer.biases.iter_mut().zip(gb) {
                *b -= step * g;
            }
        }
    }
}

impl Embedder for Autoencoder {
    fn train(&mut self, rows: &[Vector]) -> Result<TrainingHistory> {
        if rows.is_empty() {
            return Err(Error::EmptyPopulation);
        }
        for row in rows {
            self.check_dim(row)?;
        }

        let mut indices: Vec<usize> = (0..rows.len()).collect();
        let mut history = TrainingHistory::default();

        for epoch in 0..self.config.epochs {
            indices.shuffle(&mut self.rng);
            let mut epoch_loss = 0.0f64;

            for batch in indices.chunks(self.config.batch_size) {
                let mut grads = Gradients::zeros(&self.layers);
                for &i in batch {
                    let target = rows[i].as_slice();
                    let activations = self.forward_all(target);
                    epoch_loss += f64::from(self.backward(&activations, target, &mut grads));
                }
                self.apply_gradients(&grads, batch.len());
            }

            let loss = (epoch_loss / rows.len() as f64) as f32;
            debug!(epoch, loss, "autoencoder epoch complete");
            history.losses.push(loss);
        }

        info!(
            epochs = self.config.epochs,
            final_loss = history.final_loss().unwrap_or(f32::NAN),
            "autoencoder training complete"
        );
        Ok(history)
    }

    fn encode(&self, rows: &[Vector]) -> Result<Vec<Vector>> {
        rows.iter()
            .map(|row| {
                self.check_dim(row)?;
                Ok(Vector::new(self.forward_through(row.as_slice(), ENCODER_LAYERS)))
            })
            .collect()
    }

    fn latent_dim(&self) -> usize {
        self.config.latent_dim
    }
}
