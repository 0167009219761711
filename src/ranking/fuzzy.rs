use crate::core::RecipeRecord;
use crate::ranking::query::{contains_whole_word, tokenize_words};
use crate::ranking::{NormalizedQuery, Scorer};

/// Bonus weights for the fuzzy scorer
#[derive(Debug, Clone, Copy, PartialEq)]
struct FuzzyWeights {
    name_phrase: f64,
    name_phrase_whole_word: f64,
    name_token: f64,
    name_token_whole_word: f64,
    ingredient_token: f64,
    category_token: f64,
    ingredient_phrase: f64,
    category_phrase: f64,
    similarity: f64,
    quality: f64,
}

impl Default for FuzzyWeights {
    fn default() -> Self {
        Self {
            name_phrase: 100.0,
            name_phrase_whole_word: 50.0,
            name_token: 30.0,
            name_token_whole_word: 20.0,
            ingredient_token: 15.0,
            category_token: 10.0,
            ingredient_phrase: 40.0,
            category_phrase: 25.0,
            similarity: 20.0,
            quality: 10.0,
        }
    }
}

/// Scores closer than this are treated as a tie and ordered by rating
pub const NEAR_TIE_BAND: f64 = 5.0;

/// Weighted multi-field scorer
///
/// No eligibility gate: every recipe accumulates independent, additive
/// bonuses from name, ingredient and category matches, a character-overlap
/// similarity against the name, and its rating. A total of zero means no match.
/// Results with the same name collapse to the first one.
pub struct WeightedFuzzyScorer {
    weights: FuzzyWeights,
}

impl WeightedFuzzyScorer {
    pub fn new() -> Self {
        Self {
            weights: FuzzyWeights::default(),
        }
    }
}

impl Default for WeightedFuzzyScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Character-overlap ratio in [0, 1]
///
/// Counts the characters of the shorter string that occur anywhere in the
/// longer one, divided by the longer string's length.
pub fn fuzzy_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if longer.is_empty() {
        return 0.0;
    }

    let shared = shorter.iter().filter(|c| longer.contains(c)).count();
    shared as f64 / longer.len() as f64
}

impl Scorer for WeightedFuzzyScorer {
    fn score(&self, query: &NormalizedQuery, recipe: &RecipeRecord) -> Option<f64> {
        let w = &self.weights;
        let name = recipe.name.to_lowercase();
        let name_words = tokenize_words(&name);
        let ingredients = recipe.ingredients.join(" ").to_lowercase();
        let category = recipe.category.to_lowercase();
        let phrase = query.text();

        let mut score = 0.0;

        if name.contains(phrase) {
            score += w.name_phrase;
            if contains_whole_word(&name_words, query.words()) {
                score += w.name_phrase_whole_word;
            }
        }

        for token in query.significant_tokens() {
            if name.contains(token) {
                score += w.name_token;
                if contains_whole_word(&name_words, &tokenize_words(token)) {
                    score += w.name_token_whole_word;
                }
            }
            if ingredients.contains(token) {
                score += w.ingredient_token;
            }
            if category.contains(token) {
                score += w.category_token;
            }
        }

        if ingredients.contains(phrase) {
            score += w.ingredient_phrase;
        }
        if category.contains(phrase) {
            score += w.category_phrase;
        }

        score += fuzzy_similarity(phrase, &name) * w.similarity;

        if recipe.quality() > 0.0 {
            score += recipe.quality() * w.quality;
        }

        (score > 0.0).then_some(score)
    }

    fn qualifies(&self, recipe: &RecipeRecord) -> bool {
        recipe.quality() > 0.0
    }

    fn dedupes_by_name(&self) -> bool {
        true
    }

    fn near_tie_band(&self) -> Option<f64> {
        Some(NEAR_TIE_BAND)
    }

    fn name(&self) -> &str {
        "weighted-fuzzy"
    }
}
