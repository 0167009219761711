/// Minimum token length (in characters) for per-token bonuses
pub const MIN_TOKEN_CHARS: usize = 3;

/// A free-text query, lower-cased and tokenized once per search
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    text: String,
    tokens: Vec<String>,
    words: Vec<String>,
}

impl NormalizedQuery {
    /// Normalize a raw query. Returns None for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }

        let tokens = text.split_whitespace().map(str::to_string).collect();
        let words = tokenize_words(&text);
        Some(Self { text, tokens, words })
    }

    /// The full lower-cased query
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace-separated tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens long enough to earn per-token bonuses
    pub fn significant_tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
    }

    /// Letter/digit words of the whole query
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Split on every character that is neither a letter nor a digit
pub fn tokenize_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when `needle` appears as a contiguous run of whole words in `haystack`
pub fn contains_whole_word(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
