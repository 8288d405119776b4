//! Feature preprocessing
//!
//! Converts raw profile records into fixed-width numeric feature vectors.
//! The layout is learned once from the population at fit time and is the
//! contract every later transform must conform to:
//!
//! `[scaled age] ++ [one-hot categorical blocks] ++ [21 availability 0/1]
//! ++ [7 interest 0/1]`
//!
//! Identical column order between the population transform and the per-query
//! transform is a hard invariant; violating it silently corrupts similarity
//! scores downstream. Both paths go through the same fitted instance, which
//! always emits the fitted layout.

use peermatch_core::profile::{columns, Profile, AVAILABLE, SELECTED};
use peermatch_core::{Error, Result, Vector};
use std::collections::BTreeSet;
use tracing::warn;

/// Map a preference ordinal to its penalty weight
///
/// Unrecognized values degrade to neutral rather than failing the query.
#[must_use]
pub fn importance_weight(value: &str) -> f32 {
    match value {
        "Important" => 1.0,
        "Not Important" => 0.0,
        _ => 0.5,
    }
}

/// Learns the feature-space layout from a reference population and applies it
/// deterministically to any later records
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    state: Option<Fitted>,
}

#[derive(Debug, Clone)]
struct Fitted {
    /// Per-categorical-column vocabulary, sorted, in [`columns::CATEGORICAL`] order
    vocabularies: Vec<(String, Vec<String>)>,
    age_mean: f32,
    age_std: f32,
    availability: Vec<String>,
    interests: Vec<String>,
}

impl Preprocessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Learn categorical vocabularies and age scaling statistics
    ///
    /// Every record must carry the age column and all six categorical columns.
    pub fn fit(&mut self, population: &[Profile]) -> Result<()> {
        if population.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        let mut vocabularies = Vec::with_capacity(columns::CATEGORICAL.len());
        for col in columns::CATEGORICAL {
            let mut values = BTreeSet::new();
            for record in population {
                values.insert(record.require_str(col)?.to_string());
            }
            vocabularies.push((col.to_string(), values.into_iter().collect()));
        }

        let ages: Vec<f64> = population
            .iter()
            .map(|record| record.age().map(|a| a as f64))
            .collect::<Result<_>>()?;

        let mean = ages.iter().sum::<f64>() / ages.len() as f64;
        let variance = ages.iter().map(|a| (a - mean) * (a - mean)).sum::<f64>() / ages.len() as f64;
        let std = variance.sqrt();

        self.state = Some(Fitted {
            vocabularies,
            age_mean: mean as f32,
            // A constant-age population degrades to unit scale
            age_std: if std > f64::EPSILON { std as f32 } else { 1.0 },
            availability: columns::availability_columns(),
            interests: columns::interest_columns(),
        });

        Ok(())
    }

    /// Width of the feature vectors this preprocessor emits
    pub fn feature_dim(&self) -> Result<usize> {
        let fitted = self.state.as_ref().ok_or(Error::NotFitted)?;
        let categorical: usize = fitted.vocabularies.iter().map(|(_, v)| v.len()).sum();
        Ok(1 + categorical + fitted.availability.len() + fitted.interests.len())
    }

    /// Transform records into feature vectors in the fitted layout
    ///
    /// Pure function of the fitted state: never mutates it, and identical
    /// input always yields bit-identical output. Missing columns fail the
    /// call; unseen categorical values encode as an all-zero block.
    pub fn transform(&self, records: &[Profile]) -> Result<Vec<Vector>> {
        records.iter().map(|r| self.transform_one(r)).collect()
    }

    fn transform_one(&self, record: &Profile) -> Result<Vector> {
        let fitted = self.state.as_ref().ok_or(Error::NotFitted)?;
        let mut features = Vec::with_capacity(self.feature_dim()?);

        features.push((record.age()? as f32 - fitted.age_mean) / fitted.age_std);

        for (col, vocabulary) in &fitted.vocabularies {
            let value = record.require_str(col)?;
            let hit = vocabulary.iter().position(|v| v == value);
            if hit.is_none() {
                warn!(column = %col, value = %value, "unseen categorical value, encoding as zeros");
            }
            for i in 0..vocabulary.len() {
                features.push(if hit == Some(i) { 1.0 } else { 0.0 });
            }
        }

        for col in &fitted.availability {
            let value = record.require_str(col)?;
            features.push(if value == AVAILABLE { 1.0 } else { 0.0 });
        }

        for col in &fitted.interests {
            let value = record.require_str(col)?;
            features.push(if value == SELECTED { 1.0 } else { 0.0 });
        }

        Ok(Vector::new(features))
    }
}
