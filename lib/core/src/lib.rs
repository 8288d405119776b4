//! # peermatch Core
//!
//! Core library for the peermatch engine.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`Profile`] - A child's profile record keyed by stable column names
//! - [`Vector`] - Dense vector with cosine similarity
//! - [`Error`] - Shared error type for the matching pipeline
//! - [`generate_population`] - Synthetic schema-conforming populations
//!
//! ## Example
//!
//! ```rust
//! use peermatch_core::{Profile, columns};
//!
//! let mut profile = Profile::new();
//! profile.insert(columns::CHILD_AGE, 7);
//! profile.insert(columns::CHILD_GENDER, "Female");
//!
//! assert_eq!(profile.age().unwrap(), 7);
//! ```

pub mod error;
pub mod generate;
pub mod profile;
pub mod vector;

pub use error::{Error, Result};
pub use generate::{generate_population, GeneratorConfig};
pub use profile::{columns, Profile};
pub use vector::Vector;
