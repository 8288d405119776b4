//! # peermatch Match
//!
//! The matching pipeline: deterministic feature preprocessing, an autoencoder
//! that compresses profiles into dense latent vectors, a preference-based
//! penalty engine, and the engine that blends the two into ranked matches.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Preprocessor│────>│ Autoencoder  │────>│   Latent    │
//! │ (fit/transf)│     │ (train/enc)  │     │   matrix    │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!       │                                        │
//!       │              ┌──────────────┐          │
//!       └─────────────>│ MatchEngine  │<─────────┘
//!                      │ (rank top-N) │
//!                      └──────────────┘
//!                             ▲
//!                      ┌──────────────┐
//!                      │   Penalty    │
//!                      │ (preferences)│
//!                      └──────────────┘
//! ```
//!
//! Raw one-hot + boolean feature vectors are high-dimensional and sparse;
//! cosine similarity over them is dominated by the categorical blocks.
//! Compressing to a dense latent space first lets the similarity reflect
//! holistic profile resemblance, while the penalty engine keeps the explicit
//! preferences (age, gender, schedule, region) in the final ranking.
//!
//! ## Example
//!
//! ```rust
//! use peermatch_core::generate_population;
//! use peermatch_match::{AutoencoderConfig, MatchEngine};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let population = generate_population(40, &mut rng);
//!
//! let config = AutoencoderConfig {
//!     latent_dim: 8,
//!     epochs: 5,
//!     seed: Some(1),
//!     ..AutoencoderConfig::default()
//! };
//! let mut engine = MatchEngine::new(config);
//! engine.fit(population.clone()).unwrap();
//!
//! let matches = engine.find_matches(&population[0], 5).unwrap();
//! assert!(matches.len() <= 5);
//! ```

pub mod autoencoder;
pub mod engine;
pub mod features;
pub mod penalty;

#[cfg(test)]
mod test_fixtures;

pub use autoencoder::{Autoencoder, AutoencoderConfig, Embedder, TrainingHistory};
pub use engine::{MatchEngine, MatchResult};
pub use features::{importance_weight, Preprocessor};
pub use penalty::{penalties, penalty};

pub use peermatch_core::{Error, Result};
