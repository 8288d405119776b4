//! Match engine
//!
//! Owns the fitted preprocessor, the trained embedding model, the original
//! population, and the cached latent matrix. All of it is read-only after
//! [`MatchEngine::fit`], so concurrent `find_matches` calls against one
//! fitted engine are safe.

use crate::autoencoder::{Autoencoder, AutoencoderConfig, Embedder, TrainingHistory};
use crate::features::Preprocessor;
use crate::penalty;
use peermatch_core::profile::{columns, Profile};
use peermatch_core::{Error, Result, Vector};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info};

/// One ranked candidate, assembled fresh per query
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// The candidate's full original record
    pub profile: Profile,
    /// Base similarity minus penalty; can go negative
    pub combined_score: f32,
    /// Cosine similarity between latent vectors
    pub base_similarity: f32,
    pub penalty: f32,
    pub age_difference: i64,
    /// Interest tags (display names) selected by both sides
    pub shared_interests: Vec<String>,
    /// Availability cells (`<Day>_<TimeOfDay>`) available to both sides
    pub overlapping_availability: Vec<String>,
}

/// The matching orchestrator
pub struct MatchEngine {
    autoencoder_config: AutoencoderConfig,
    preprocessor: Preprocessor,
    model: Option<Box<dyn Embedder>>,
    population: Vec<Profile>,
    latents: Vec<Vector>,
}

impl MatchEngine {
    #[must_use]
    pub fn new(autoencoder_config: AutoencoderConfig) -> Self {
        Self {
            autoencoder_config,
            preprocessor: Preprocessor::new(),
            model: None,
            population: Vec::new(),
            latents: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    #[must_use]
    pub fn population_len(&self) -> usize {
        self.population.len()
    }

    /// Fit the whole pipeline to a population
    ///
    /// Sequences preprocessor fit, population transform, autoencoder training
    /// and latent caching, then retains the original records for penalty
    /// computation and result assembly. One-shot and blocking; the fitted
    /// state never mutates afterwards.
    pub fn fit(&mut self, population: Vec<Profile>) -> Result<TrainingHistory> {
        self.preprocessor.fit(&population)?;
        let features = self.preprocessor.transform(&population)?;

        let input_dim = self.preprocessor.feature_dim()?;
        info!(
            population = population.len(),
            input_dim,
            latent_dim = self.autoencoder_config.latent_dim,
            "fitting match engine"
        );

        let mut model = Autoencoder::new(input_dim, self.autoencoder_config.clone())?;
        let history = model.train(&features)?;
        self.latents = model.encode(&features)?;
        self.model = Some(Box::new(model));
        self.population = population;

        Ok(history)
    }

    /// Rank the population against a query and return the top `top_n`
    ///
    /// Sorted by descending combined score; equal scores keep ascending
    /// population index. A failing query never touches the fitted state.
    pub fn find_matches(&self, query: &Profile, top_n: usize) -> Result<Vec<MatchResult>> {
        let model = self.model.as_ref().ok_or(Error::NotFitted)?;

        let mut query = query.clone();
        query.normalize_age()?;

        let features = self.preprocessor.transform(std::slice::from_ref(&query))?;
        let latent = model
            .encode(&features)?
            .into_iter()
            .next()
            .ok_or(Error::EmptyPopulation)?;

        let similarities: Vec<f32> = self
            .latents
            .iter()
            .map(|candidate| latent.cosine_similarity(candidate))
            .collect();
        let penalties = penalty::penalties(&query, &self.population);

        let combined: Vec<f32> = similarities
            .iter()
            .zip(&penalties)
            .map(|(s, p)| s - p)
            .collect();

        let mut order: Vec<usize> = (0..self.population.len()).collect();
        order.sort_by(|&a, &b| {
            combined[b]
                .partial_cmp(&combined[a])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });

        let query_age = query.age()?;
        order
            .into_iter()
            .take(top_n)
            .map(|idx| {
                let candidate = &self.population[idx];
                Ok(MatchResult {
                    profile: candidate.clone(),
                    combined_score: combined[idx],
                    base_similarity: similarities[idx],
                    penalty: penalties[idx],
                    age_difference: (query_age - candidate.age()?).abs(),
                    shared_interests: shared_interests(&query, candidate),
                    overlapping_availability: overlapping_availability(&query, candidate),
                })
            })
            .collect()
    }
}

/// Interest tags selected by both profiles
///
/// A tag column missing on either side skips that tag rather than failing
/// the match.
fn shared_interests(query: &Profile, candidate: &Profile) -> Vec<String> {
    columns::INTEREST_TAGS
        .iter()
        .filter(|tag| {
            let col = columns::interest_column(tag);
            if !query.contains(&col) || !candidate.contains(&col) {
                debug!(column = %col, "interest column absent, skipping");
                return false;
            }
            query.has_interest(&col) && candidate.has_interest(&col)
        })
        .map(|tag| (*tag).to_string())
        .collect()
}

/// Availability cells marked available by both profiles
fn overlapping_availability(query: &Profile, candidate: &Profile) -> Vec<String> {
    columns::availability_columns()
        .into_iter()
        .filter(|col| query.is_available(col) && candidate.is_available(col))
        .map(|col| {
            col.strip_prefix("Available_Time_")
                .map(str::to_string)
                .unwrap_or(col)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{
        base_profile, set_available, set_importances, set_interest, small_population,
    };

    fn test_config() -> AutoencoderConfig {
        AutoencoderConfig {
            latent_dim: 4,
            hidden_dim: 16,
            epochs: 10,
            batch_size: 4,
            learning_rate: 0.1,
            seed: Some(11),
        }
    }

    fn fitted_engine(population: Vec<Profile>) -> MatchEngine {
        let mut engine = MatchEngine::new(test_config());
        engine.fit(population).unwrap();
        engine
    }

    #[test]
    fn test_find_matches_before_fit_fails() {
        let engine = MatchEngine::new(test_config());
        let query = base_profile("aaaaaaaaaa", 7, "Male", "Western America");
        assert!(matches!(
            engine.find_matches(&query, 5),
            Err(Error::NotFitted)
        ));
    }

    #[test]
    fn test_results_truncated_and_sorted() {
        let population = small_population();
        let engine = fitted_engine(population.clone());

        let matches = engine.find_matches(&population[0], 2).unwrap();
        assert_eq!(matches.len(), 2);

        let all = engine.find_matches(&population[0], 100).unwrap();
        assert_eq!(all.len(), population.len());
        for pair in all.windows(2) {
            assert!(pair[0].combined_score >= pair[1].combined_score);
        }
    }

    #[test]
    fn test_combined_score_is_similarity_minus_penalty() {
        let population = small_population();
        let engine = fitted_engine(population.clone());

        for result in engine.find_matches(&population[1], 10).unwrap() {
            assert_eq!(
                result.combined_score,
                result.base_similarity - result.penalty
            );
            assert!(result.penalty >= 0.0);
        }
    }

    #[test]
    fn test_tied_scores_keep_population_order() {
        // Identical records (nicknames aside) produce identical latents and
        // penalties, so their combined scores tie exactly.
        let template = base_profile("template00", 7, "Male", "Western America");
        let mut population = Vec::new();
        for nick in ["first00000", "second0000", "third00000"] {
            let mut p = template.clone();
            p.insert(columns::CHILD_NICKNAME, nick);
            population.push(p);
        }

        let engine = fitted_engine(population);
        let matches = engine.find_matches(&template, 3).unwrap();
        let order: Vec<&str> = matches
            .iter()
            .filter_map(|m| m.profile.nickname())
            .collect();
        assert_eq!(order, ["first00000", "second0000", "third00000"]);
    }

    #[test]
    fn test_query_age_normalized_from_string() {
        let population = small_population();
        let engine = fitted_engine(population.clone());

        let mut query = population[0].clone();
        query.insert(columns::CHILD_AGE, "5");
        let matches = engine.find_matches(&query, 1).unwrap();
        assert_eq!(matches[0].age_difference, (5 - matches[0].profile.age().unwrap()).abs());
    }

    #[test]
    fn test_non_numeric_query_age_fails_single_query() {
        let population = small_population();
        let engine = fitted_engine(population.clone());

        let mut query = population[0].clone();
        query.insert(columns::CHILD_AGE, "five");
        assert!(matches!(
            engine.find_matches(&query, 5),
            Err(Error::InvalidValue { .. })
        ));

        // The engine stays serviceable afterwards
        assert!(engine.find_matches(&population[0], 5).is_ok());
    }

    #[test]
    fn test_result_enrichment() {
        let mut a = base_profile("aaaaaaaaaa", 5, "Male", "Western America");
        set_available(&mut a, "Monday", "Morning");
        set_available(&mut a, "Saturday", "Afternoon");
        set_interest(&mut a, "Science");
        set_interest(&mut a, "Math");

        let mut b = base_profile("bbbbbbbbbb", 8, "Female", "Western America");
        set_available(&mut b, "Monday", "Morning");
        set_interest(&mut b, "Science");

        let engine = fitted_engine(vec![a.clone(), b]);

        let mut query = a;
        set_importances(&mut query, "Neutral", "Neutral", "Neutral");
        let matches = engine.find_matches(&query, 2).unwrap();

        let b_result = matches
            .iter()
            .find(|m| m.profile.nickname() == Some("bbbbbbbbbb"))
            .unwrap();
        assert_eq!(b_result.age_difference, 3);
        assert_eq!(b_result.shared_interests, ["Science"]);
        assert_eq!(b_result.overlapping_availability, ["Monday_Morning"]);
    }

    #[test]
    fn test_missing_interest_column_skipped_in_enrichment() {
        let population = small_population();

        // A record without any interest columns: the transform path would
        // reject it, but enrichment skips the absent tags.
        let bare = base_profile("bare000000", 7, "Male", "Western America");
        let stripped = {
            let value = serde_json::to_value(&bare).unwrap();
            let mut map = value.as_object().cloned().unwrap();
            for col in columns::interest_columns() {
                map.remove(&col);
            }
            serde_json::from_value::<Profile>(serde_json::Value::Object(map)).unwrap()
        };

        assert!(shared_interests(&stripped, &population[0]).is_empty());
    }
}
