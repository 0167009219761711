use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::Catalog;
use crate::core::RecipeRecord;
use crate::ranking::{NormalizedQuery, ScoredCandidate, Scorer};

/// Results returned per search
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Scans the catalog with a scorer and keeps the best matches
///
/// Searches never mutate the catalog, so one `Ranker` can serve concurrent
/// requests without locking.
#[derive(Clone)]
pub struct Ranker {
    catalog: Arc<Catalog>,
    scorer: Arc<dyn Scorer>,
    max_results: usize,
}

impl Ranker {
    pub fn new(catalog: Arc<Catalog>, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            catalog,
            scorer,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Override the result cap
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    /// Ranked recipes for a free-text query, at most `max_results` long
    pub fn search(&self, query: &str) -> Vec<RecipeRecord> {
        self.search_scored(query)
            .into_iter()
            .map(|candidate| candidate.recipe.clone())
            .collect()
    }

    /// Same as [`Ranker::search`], keeping the computed scores
    pub fn search_scored(&self, query: &str) -> Vec<ScoredCandidate<'_>> {
        let Some(query) = NormalizedQuery::parse(query) else {
            return Vec::new();
        };
        let start = Instant::now();

        // Indexed parallel scan: collected order is catalog (id) order
        let scorer = self.scorer.as_ref();
        let mut candidates: Vec<ScoredCandidate<'_>> = self
            .catalog
            .recipes()
            .par_iter()
            .filter_map(|recipe| {
                scorer
                    .score(&query, recipe)
                    .map(|score| ScoredCandidate::new(recipe, score))
            })
            .collect();
        let matched = candidates.len();

        if scorer.dedupes_by_name() {
            dedupe_by_name(&mut candidates);
        }

        let candidates = rank_candidates(candidates, scorer.near_tie_band(), self.max_results);

        tracing::debug!(
            "Search '{}' [{}]: {} matched, {} returned in {:.2}ms",
            query.text(),
            scorer.name(),
            matched,
            candidates.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        candidates
    }
}

/// Keep the first candidate for each exact (case-sensitive) name
fn dedupe_by_name(candidates: &mut Vec<ScoredCandidate<'_>>) {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.retain(|c| seen.insert(c.recipe.name.as_str()));
}

/// Score, then quality, then id; all descending except id
fn total_order(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.quality().total_cmp(&a.quality()))
        .then_with(|| a.recipe.id.cmp(&b.recipe.id))
}

/// `next` moves above `prev` when their scores are within the band and it has the higher quality
fn outranks(next: &ScoredCandidate<'_>, prev: &ScoredCandidate<'_>, band: f64) -> bool {
    (prev.score - next.score).abs() < band && next.quality() > prev.quality()
}

/// Order candidates best first and keep at most `limit` of them
///
/// Candidates are put in [`total_order`] first. Without a near-tie band that
/// order is final. With one, candidates are inserted in that order and each
/// moves up past predecessors it [`outranks`], so no adjacent pair is left
/// with a near tie in ascending quality.
///
/// Insertion in descending score order only ever pushes earlier candidates
/// down, so one that falls past `limit` never comes back. Those are kept as
/// their highest score and quality alone: a newcomer reaches the kept prefix
/// only if it outranks every one of them. The result equals settling the whole
/// list and then truncating, in O(n log n + n * limit).
fn rank_candidates<'a>(
    mut candidates: Vec<ScoredCandidate<'a>>,
    near_tie_band: Option<f64>,
    limit: usize,
) -> Vec<ScoredCandidate<'a>> {
    candidates.sort_unstable_by(total_order);

    let Some(band) = near_tie_band else {
        candidates.truncate(limit);
        return candidates;
    };

    let mut ranked: Vec<ScoredCandidate<'a>> = Vec::with_capacity(limit.min(candidates.len()) + 1);
    // (highest score, highest quality) of everything pushed past `limit`
    let mut overflow: Option<(f64, f64)> = None;

    for candidate in candidates {
        if let Some((max_score, max_quality)) = overflow {
            if max_score - candidate.score >= band || max_quality >= candidate.quality() {
                overflow = Some((max_score.max(candidate.score), max_quality.max(candidate.quality())));
                continue;
            }
        }

        ranked.push(candidate);
        let mut i = ranked.len() - 1;
        while i > 0 && outranks(&ranked[i], &ranked[i - 1], band) {
            ranked.swap(i - 1, i);
            i -= 1;
        }

        if ranked.len() > limit {
            if let Some(dropped) = ranked.pop() {
                overflow = Some(match overflow {
                    Some((s, q)) => (s.max(dropped.score), q.max(dropped.quality())),
                    None => (dropped.score, dropped.quality()),
                });
            }
        }
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{QualityGatedScorer, ScoringPolicy, WeightedFuzzyScorer};

    fn ranker(policy: ScoringPolicy, records: Vec<RecipeRecord>) -> Ranker {
        Ranker::new(Arc::new(Catalog::from_records(records)), policy.scorer())
    }

    fn ids(results: &[RecipeRecord]) -> Vec<u64> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let ranker = ranker(
            ScoringPolicy::WeightedFuzzy,
            vec![RecipeRecord::new(1, "Apple Pie").with_rating(4.0, 1)],
        );
        assert!(ranker.search("").is_empty());
        assert!(ranker.search("   ").is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let ranker = Ranker::new(Arc::new(Catalog::empty()), Arc::new(QualityGatedScorer::new()));
        assert!(ranker.search("soup").is_empty());
    }

    #[test]
    fn test_quality_gated_scenario() {
        let ranker = ranker(
            ScoringPolicy::QualityGated,
            vec![
                RecipeRecord::new(1, "Chicken Soup").with_rating(4.5, 10),
                RecipeRecord::new(2, "Beef Stew").with_rating(3.0, 5),
            ],
        );

        assert_eq!(ids(&ranker.search("chicken")), vec![1]);
        assert!(ranker.search("beef").is_empty());
    }

    #[test]
    fn test_quality_gated_orders_by_weighted_score() {
        let ranker = ranker(
            ScoringPolicy::QualityGated,
            vec![
                RecipeRecord::new(1, "Tomato Soup").with_rating(5.0, 3),
                RecipeRecord::new(2, "Onion Soup").with_rating(4.8, 2000),
                RecipeRecord::new(3, "Pea Soup").with_rating(4.2, 40),
            ],
        );

        assert_eq!(ids(&ranker.search("soup")), vec![2, 3, 1]);
    }

    #[test]
    fn test_quality_gated_keeps_duplicate_names() {
        let ranker = ranker(
            ScoringPolicy::QualityGated,
            vec![
                RecipeRecord::new(1, "Banana Bread").with_rating(4.5, 10),
                RecipeRecord::new(2, "Banana Bread").with_rating(4.5, 20),
            ],
        );

        assert_eq!(ids(&ranker.search("banana")), vec![2, 1]);
    }

    #[test]
    fn test_fuzzy_dedupes_by_exact_name() {
        let ranker = ranker(
            ScoringPolicy::WeightedFuzzy,
            vec![
                RecipeRecord::new(1, "Banana Bread").with_rating(4.0, 0),
                RecipeRecord::new(2, "Banana Bread").with_rating(5.0, 0),
                RecipeRecord::new(3, "banana bread").with_rating(4.0, 0),
            ],
        );

        let results = ranker.search("banana");
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.name == "Banana Bread").count(), 1);
        // first encountered in catalog order wins
        assert!(results.iter().any(|r| r.id == 1));
        assert!(results.iter().all(|r| r.id != 2));
    }

    #[test]
    fn test_fuzzy_apple_scenario() {
        let ranker = ranker(
            ScoringPolicy::WeightedFuzzy,
            vec![
                RecipeRecord::new(1, "Apple Pie")
                    .with_ingredients(["apple", "sugar"])
                    .with_rating(4.0, 0),
                RecipeRecord::new(2, "Apple Tart")
                    .with_ingredients(["apple", "butter"])
                    .with_rating(4.0, 0),
            ],
        );

        let mut found = ids(&ranker.search("apple"));
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn test_near_tie_prefers_quality() {
        let scorer = WeightedFuzzyScorer::new();
        let query = NormalizedQuery::parse("apple").unwrap();
        let high_score = RecipeRecord::new(1, "Apple Pie").with_rating(4.0, 0);
        let high_quality = RecipeRecord::new(2, "Apple Tarts").with_rating(4.2, 0);

        let a = scorer.score(&query, &high_score).unwrap();
        let b = scorer.score(&query, &high_quality).unwrap();
        assert!(a > b && a - b < NEAR_TIE);

        let ranker = ranker(ScoringPolicy::WeightedFuzzy, vec![high_score, high_quality]);
        assert_eq!(ids(&ranker.search("apple")), vec![2, 1]);
    }

    const NEAR_TIE: f64 = crate::ranking::fuzzy::NEAR_TIE_BAND;

    fn ranked_ids(ranked: &[ScoredCandidate<'_>]) -> Vec<u64> {
        ranked.iter().map(|c| c.recipe.id).collect()
    }

    #[test]
    fn test_outside_band_keeps_score_order() {
        let pie = RecipeRecord::new(1, "Apple Pie");
        let a = RecipeRecord::new(2, "Pineapple Cake").with_rating(5.0, 0);
        let candidates = vec![ScoredCandidate::new(&a, 100.0), ScoredCandidate::new(&pie, 150.0)];

        let ranked = rank_candidates(candidates, Some(NEAR_TIE), DEFAULT_MAX_RESULTS);
        assert_eq!(ranked_ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_near_tie_chain_settles() {
        let r1 = RecipeRecord::new(1, "a").with_rating(1.0, 0);
        let r2 = RecipeRecord::new(2, "b").with_rating(3.0, 0);
        let r3 = RecipeRecord::new(3, "c").with_rating(5.0, 0);
        let candidates = vec![
            ScoredCandidate::new(&r1, 100.0),
            ScoredCandidate::new(&r2, 98.0),
            ScoredCandidate::new(&r3, 96.0),
        ];

        let ranked = rank_candidates(candidates, Some(NEAR_TIE), DEFAULT_MAX_RESULTS);
        assert_eq!(ranked_ids(&ranked), vec![3, 2, 1]);
    }

    #[test]
    fn test_candidate_past_limit_stays_out() {
        let top = RecipeRecord::new(1, "a").with_rating(1.0, 0);
        let close = RecipeRecord::new(2, "b").with_rating(3.0, 0);
        let far = RecipeRecord::new(3, "c").with_rating(5.0, 0);
        let candidates = vec![
            ScoredCandidate::new(&top, 100.0),
            ScoredCandidate::new(&close, 96.0),
            ScoredCandidate::new(&far, 94.0),
        ];

        // `far` is within the band of `close` but not of `top`, which it would have to pass
        let ranked = rank_candidates(candidates, Some(NEAR_TIE), 1);
        assert_eq!(ranked_ids(&ranked), vec![2]);
    }

    #[test]
    fn test_without_band_is_plain_score_order() {
        let low = RecipeRecord::new(1, "a").with_rating(5.0, 0);
        let high = RecipeRecord::new(2, "b").with_rating(1.0, 0);
        let candidates = vec![ScoredCandidate::new(&low, 99.0), ScoredCandidate::new(&high, 100.0)];

        assert_eq!(ranked_ids(&rank_candidates(candidates, None, 5)), vec![2, 1]);
    }

    /// Scores shaped like fuzzy results: 10 * quality plus up to 20 of match bonus
    fn clustered_records(count: usize) -> Vec<(RecipeRecord, f64)> {
        let mut state = 0x2545_f491_4f6c_dd1d_u64;
        let mut next = move || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        };

        (0..count)
            .map(|i| {
                let quality = (10.0 + 40.0 * next()).round() / 10.0;
                let score = 10.0 * quality + 20.0 * next();
                (RecipeRecord::new(i as u64, format!("r{}", i)).with_rating(quality, 0), score)
            })
            .collect()
    }

    fn candidates_of(records: &[(RecipeRecord, f64)]) -> Vec<ScoredCandidate<'_>> {
        records
            .iter()
            .map(|(recipe, score)| ScoredCandidate::new(recipe, *score))
            .collect()
    }

    #[test]
    fn test_bounded_ranking_matches_full_settle() {
        let records = clustered_records(5_000);
        let candidates = candidates_of(&records);

        let bounded = rank_candidates(candidates.clone(), Some(NEAR_TIE), DEFAULT_MAX_RESULTS);
        let full = rank_candidates(candidates, Some(NEAR_TIE), usize::MAX);

        assert_eq!(full.len(), 5_000);
        assert_eq!(bounded.len(), DEFAULT_MAX_RESULTS);
        assert_eq!(ranked_ids(&bounded), ranked_ids(&full[..DEFAULT_MAX_RESULTS]));

        for pair in full.windows(2) {
            assert!(!outranks(&pair[1], &pair[0], NEAR_TIE));
        }
    }

    #[test]
    fn test_large_candidate_set_ranks_quickly() {
        let records = clustered_records(100_000);
        let candidates = candidates_of(&records);

        let start = Instant::now();
        let ranked = rank_candidates(candidates, Some(NEAR_TIE), DEFAULT_MAX_RESULTS);
        let elapsed = start.elapsed();

        assert_eq!(ranked.len(), DEFAULT_MAX_RESULTS);
        assert!(elapsed < std::time::Duration::from_secs(5), "ranking took {:?}", elapsed);
    }

    #[test]
    fn test_raising_quality_past_gate_adds_result() {
        let search = |rating: f64, reviews: u32| {
            let recipe = RecipeRecord::new(1, "Lentil Soup").with_rating(rating, reviews);
            ids(&ranker(ScoringPolicy::QualityGated, vec![recipe]).search("lentil"))
        };

        assert!(search(3.9, 12).is_empty());
        assert_eq!(search(4.1, 12), vec![1]);
        assert!(search(4.1, 0).is_empty());
    }

    #[test]
    fn test_truncates_to_max_results() {
        let records = (1..=45)
            .map(|i| RecipeRecord::new(i, format!("Soup {}", i)).with_rating(4.5, i as u32))
            .collect();
        let ranker = ranker(ScoringPolicy::QualityGated, records);

        let results = ranker.search("soup");
        assert_eq!(results.len(), DEFAULT_MAX_RESULTS);
        assert_eq!(results[0].id, 45);

        let capped = ranker.clone().with_max_results(5);
        assert_eq!(capped.search("soup").len(), 5);
    }

    #[test]
    fn test_search_is_idempotent() {
        let records = (1..=60)
            .map(|i| {
                RecipeRecord::new(i, format!("Chicken Dish {}", i % 7))
                    .with_ingredients(["chicken", "salt"])
                    .with_rating(f64::from(i as u32 % 5), 0)
            })
            .collect();
        let ranker = ranker(ScoringPolicy::WeightedFuzzy, records);

        let first = ranker.search("chicken dish");
        let second = ranker.search("chicken dish");
        assert_eq!(first, second);
        assert!(first.len() <= DEFAULT_MAX_RESULTS);
    }
}
