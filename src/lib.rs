//! # peermatch
//!
//! A peer-matching engine for collaborative learning. Profiles are compressed
//! into dense latent vectors by an autoencoder; candidates are ranked by
//! cosine similarity minus a hand-tuned penalty over explicit preferences
//! (age, gender, schedule overlap, region).
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install peermatch
//! peermatch --population-size 300 --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use peermatch::prelude::*;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let population = generate_population(50, &mut rng);
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
//!
//! ## Crate Structure
//!
//! - `peermatch-core` - Profile records, vector math, synthetic populations
//! - `peermatch-match` - Preprocessing, autoencoder, penalties, ranking
//! - `peermatch-api` - REST front end

// Re-export core types
pub use peermatch_core::{
    columns, generate_population, Error, GeneratorConfig, Profile, Result, Vector,
};

// Re-export the matching pipeline
pub use peermatch_match::{
    importance_weight, penalty, Autoencoder, AutoencoderConfig, Embedder, MatchEngine,
    MatchResult, Preprocessor, TrainingHistory,
};

// Re-export API
pub use peermatch_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        generate_population, Autoencoder, AutoencoderConfig, Embedder, Error, MatchEngine,
        MatchResult, Preprocessor, Profile, Result, RestApi, TrainingHistory, Vector,
    };
}
