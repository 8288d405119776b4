//! Preference penalty engine
//!
//! Computes a non-negative mismatch penalty for a (query, candidate) pair,
//! gated by the query's own stated importances. Three additive terms: age
//! gap, gender mismatch, schedule/region mismatch. The total is unbounded
//! above and is subtracted from cosine similarity by the engine, so callers
//! must not assume a [0, 1] range.

use crate::features::importance_weight;
use peermatch_core::profile::{columns, Profile, GENDER_BINARY, GENDER_UNDISCLOSED};
use rayon::prelude::*;

/// Maximum possible age gap over the 3..=13 domain
const MAX_AGE_GAP: f32 = 10.0;

const AGE_SCALE: f32 = 0.5;
const GENDER_BINARY_MISMATCH: f32 = 0.3;
const GENDER_UNDISCLOSED_MISMATCH: f32 = 0.1;
const GENDER_OTHER_MISMATCH: f32 = 0.2;
const SCHEDULE_UNKNOWN: f32 = 0.5;
const SCHEDULE_SCALE: f32 = 0.3;
const REGION_MISMATCH: f32 = 0.15;

/// Penalty for one candidate against the query's preferences
#[must_use]
pub fn penalty(query: &Profile, candidate: &Profile) -> f32 {
    age_term(query, candidate) + gender_term(query, candidate) + schedule_term(query, candidate)
}

/// Penalties for the whole population, one per candidate in order
///
/// Each pair is independent, so this is a data-parallel map.
#[must_use]
pub fn penalties(query: &Profile, population: &[Profile]) -> Vec<f32> {
    population
        .par_iter()
        .map(|candidate| penalty(query, candidate))
        .collect()
}

fn age_term(query: &Profile, candidate: &Profile) -> f32 {
    let weight = query_weight(query, columns::PREF_SIMILAR_AGE);
    if weight == 0.0 {
        return 0.0;
    }
    // Ages were validated upstream; a malformed record skips the term
    let (Ok(query_age), Ok(candidate_age)) = (query.age(), candidate.age()) else {
        return 0.0;
    };
    let gap = (query_age - candidate_age).unsigned_abs() as f32;
    (gap / MAX_AGE_GAP) * weight * AGE_SCALE
}

fn gender_term(query: &Profile, candidate: &Profile) -> f32 {
    let weight = query_weight(query, columns::PREF_SAME_GENDER);
    if weight == 0.0 {
        return 0.0;
    }
    let query_gender = query.get_str(columns::CHILD_GENDER).unwrap_or("");
    let candidate_gender = candidate.get_str(columns::CHILD_GENDER).unwrap_or("");
    if query_gender == candidate_gender {
        return 0.0;
    }

    let both_binary =
        GENDER_BINARY.contains(&query_gender) && GENDER_BINARY.contains(&candidate_gender);
    let any_undisclosed =
        query_gender == GENDER_UNDISCLOSED || candidate_gender == GENDER_UNDISCLOSED;

    let base = if both_binary {
        GENDER_BINARY_MISMATCH
    } else if any_undisclosed {
        GENDER_UNDISCLOSED_MISMATCH
    } else {
        GENDER_OTHER_MISMATCH
    };
    base * weight
}

fn schedule_term(query: &Profile, candidate: &Profile) -> f32 {
    let weight = query_weight(query, columns::PREF_OVERLAPPING_TIME);
    if weight == 0.0 {
        return 0.0;
    }

    let cells = columns::availability_columns();
    let query_cells = cells.iter().filter(|c| query.is_available(c)).count();
    let candidate_cells = cells.iter().filter(|c| candidate.is_available(c)).count();
    let shared = cells
        .iter()
        .filter(|c| query.is_available(c) && candidate.is_available(c))
        .count();

    // An empty schedule cannot be assessed; treat it as near-worst rather
    // than rewarding it
    let mut term = if query_cells == 0 || candidate_cells == 0 {
        SCHEDULE_UNKNOWN * weight
    } else {
        let overlap_ratio = shared as f32 / query_cells.min(candidate_cells) as f32;
        (1.0 - overlap_ratio) * weight * SCHEDULE_SCALE
    };

    // Region mismatch is a proxy for timezone friction, so it shares the
    // time-importance weight
    let query_region = query.get_str(columns::CHILD_REGION).unwrap_or("");
    let candidate_region = candidate.get_str(columns::CHILD_REGION).unwrap_or("");
    if query_region != candidate_region {
        term += REGION_MISMATCH * weight;
    }

    term
}

fn query_weight(query: &Profile, column: &str) -> f32 {
    importance_weight(query.get_str(column).unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_profile, set_available, set_importances, small_population};

    #[test]
    fn test_penalty_is_non_negative() {
        let population = small_population();
        for query in &population {
            for candidate in &population {
                assert!(penalty(query, candidate) >= 0.0);
            }
        }
    }

    #[test]
    fn test_identical_profiles_zero_penalty() {
        let mut p = base_profile("aaaaaaaaaa", 7, "Male", "Western America");
        set_available(&mut p, "Monday", "Morning");
        set_importances(&mut p, "Important", "Important", "Important");
        assert_eq!(penalty(&p, &p.clone()), 0.0);
    }

    #[test]
    fn test_age_term_zero_when_unimportant() {
        let mut query = base_profile("aaaaaaaaaa", 3, "Male", "Western America");
        set_importances(&mut query, "Not Important", "Not Important", "Not Important");
        let candidate = base_profile("bbbbbbbbbb", 13, "Male", "Western America");
        // Maximum age gap contributes nothing without importance
        assert_eq!(penalty(&query, &candidate), 0.0);
    }

    #[test]
    fn test_age_term_scales_with_gap() {
        let mut query = base_profile("aaaaaaaaaa", 3, "Male", "Western America");
        set_available(&mut query, "Monday", "Morning");
        set_importances(&mut query, "Not Important", "Important", "Not Important");
        let mut candidate = base_profile("bbbbbbbbbb", 13, "Male", "Western America");
        set_available(&mut candidate, "Monday", "Morning");
        // Gap 10 over max 10, importance 1.0, scale 0.5
        assert!((penalty(&query, &candidate) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gender_term_zero_on_match() {
        let mut query = base_profile("aaaaaaaaaa", 7, "Female", "Western America");
        set_available(&mut query, "Monday", "Morning");
        set_importances(&mut query, "Not Important", "Not Important", "Important");
        let mut candidate = base_profile("bbbbbbbbbb", 7, "Female", "Western America");
        set_available(&mut candidate, "Monday", "Morning");
        assert_eq!(penalty(&query, &candidate), 0.0);
    }

    #[test]
    fn test_gender_mismatch_tiers() {
        let mut query = base_profile("aaaaaaaaaa", 7, "Male", "Western America");
        set_available(&mut query, "Monday", "Morning");
        set_importances(&mut query, "Not Important", "Not Important", "Important");

        let make = |gender: &str| {
            let mut c = base_profile("bbbbbbbbbb", 7, gender, "Western America");
            set_available(&mut c, "Monday", "Morning");
            c
        };

        // Both binary-identified
        assert!((penalty(&query, &make("Female")) - 0.3).abs() < 1e-6);
        // One undisclosed
        assert!((penalty(&query, &make("Prefer not to say")) - 0.1).abs() < 1e-6);
        // Other combinations
        assert!((penalty(&query, &make("Other")) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_empty_candidate_schedule_is_near_worst() {
        let mut query = base_profile("aaaaaaaaaa", 7, "Male", "Western America");
        set_available(&mut query, "Monday", "Morning");
        set_importances(&mut query, "Important", "Not Important", "Not Important");
        // Candidate has zero available cells, same region
        let candidate = base_profile("bbbbbbbbbb", 7, "Male", "Western America");
        assert!((penalty(&query, &candidate) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_disjoint_schedules_ignored_when_unimportant() {
        let mut query = base_profile("aaaaaaaaaa", 7, "Male", "Western America");
        set_available(&mut query, "Monday", "Morning");
        set_importances(&mut query, "Not Important", "Not Important", "Not Important");
        let mut candidate = base_profile("bbbbbbbbbb", 7, "Male", "Western America");
        set_available(&mut candidate, "Friday", "Evening");
        assert_eq!(penalty(&query, &candidate), 0.0);
    }

    #[test]
    fn test_full_overlap_leaves_only_region_mismatch() {
        let mut query = base_profile("aaaaaaaaaa", 7, "Male", "Western America");
        set_available(&mut query, "Monday", "Morning");
        set_importances(&mut query, "Important", "Not Important", "Not Important");
        let mut candidate = base_profile("bbbbbbbbbb", 7, "Male", "Eastern America");
        set_available(&mut candidate, "Monday", "Morning");
        set_available(&mut candidate, "Sunday", "Evening");
        // Overlap ratio = 1 (min side fully covered), region differs
        assert!((penalty(&query, &candidate) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_reference_scenario_twin_query() {
        // Population: A(5, Male, Western, Mon-Morning), B(6, Female, Eastern,
        // Mon-Morning); query is A's twin with everything Important.
        let mut a = base_profile("aaaaaaaaaa", 5, "Male", "Western America");
        set_available(&mut a, "Monday", "Morning");
        let mut b = base_profile("bbbbbbbbbb", 6, "Female", "Eastern America");
        set_available(&mut b, "Monday", "Morning");

        let mut query = a.clone();
        set_importances(&mut query, "Important", "Important", "Important");

        // Age 0.1*0.5 + gender 0.3 + region 0.15, full schedule overlap
        assert!((penalty(&query, &b) - 0.5).abs() < 1e-6);
        assert_eq!(penalty(&query, &a), 0.0);
    }

    #[test]
    fn test_population_pass_matches_pairwise() {
        let population = small_population();
        let query = &population[0];
        let batch = penalties(query, &population);
        assert_eq!(batch.len(), population.len());
        for (batch_value, candidate) in batch.iter().zip(&population) {
            assert_eq!(*batch_value, penalty(query, candidate));
        }
    }
}
