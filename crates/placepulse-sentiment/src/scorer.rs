//! Integer word-list scorer for review text.

/// Text → integer polarity score. Positive means favourable.
///
/// Implemented for any `Fn(&str) -> i32`, so tests and callers can swap in
/// a fixed scoring function.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> i32;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> i32 + Send + Sync,
{
    fn score(&self, text: &str) -> i32 {
        self(text)
    }
}

/// The default scorer, backed by [`LEXICON`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> i32 {
        lexicon_score(text)
    }
}

/// Word weights in `-5..=5`. Keys are lowercase single tokens.
pub(crate) const LEXICON: &[(&str, i32)] = &[
    // Strong positive
    ("amazing", 4),
    ("awesome", 4),
    ("brilliant", 4),
    ("excellent", 3),
    ("exceptional", 4),
    ("fantastic", 4),
    ("outstanding", 5),
    ("perfect", 3),
    ("superb", 5),
    ("wonderful", 4),
    ("loved", 3),
    ("love", 3),
    ("lovely", 3),
    ("delicious", 3),
    ("best", 3),
    ("heavenly", 4),
    ("impressive", 3),
    ("incredible", 4),
    ("phenomenal", 4),
    ("stunning", 4),
    // Positive
    ("good", 3),
    ("great", 3),
    ("nice", 3),
    ("beautiful", 3),
    ("clean", 2),
    ("comfortable", 2),
    ("convenient", 2),
    ("cozy", 2),
    ("courteous", 2),
    ("enjoy", 2),
    ("enjoyed", 2),
    ("fair", 2),
    ("fresh", 1),
    ("friendly", 2),
    ("fun", 4),
    ("glad", 3),
    ("happy", 3),
    ("helpful", 2),
    ("hospitable", 2),
    ("kind", 2),
    ("like", 2),
    ("liked", 2),
    ("pleasant", 3),
    ("polite", 2),
    ("prompt", 1),
    ("quick", 1),
    ("recommend", 2),
    ("recommended", 2),
    ("reliable", 2),
    ("satisfied", 2),
    ("smooth", 1),
    ("tasty", 2),
    ("thank", 2),
    ("thanks", 2),
    ("welcoming", 2),
    ("worth", 2),
    ("yummy", 3),
    ("affordable", 2),
    ("attentive", 2),
    ("caring", 2),
    ("efficient", 2),
    ("professional", 1),
    ("relaxing", 2),
    ("spacious", 1),
    ("well", 1),
    ("ok", 1),
    ("okay", 1),
    ("fine", 2),
    // Negative
    ("bad", -3),
    ("poor", -2),
    ("rude", -2),
    ("dirty", -2),
    ("slow", -2),
    ("cold", -1),
    ("overpriced", -3),
    ("expensive", -2),
    ("crowded", -2),
    ("noisy", -1),
    ("wait", -1),
    ("waited", -2),
    ("waiting", -1),
    ("late", -1),
    ("bland", -2),
    ("stale", -2),
    ("smelly", -2),
    ("unhelpful", -2),
    ("unfriendly", -2),
    ("unprofessional", -2),
    ("uncomfortable", -2),
    ("disappointed", -2),
    ("disappointing", -2),
    ("disappointment", -2),
    ("problem", -2),
    ("problems", -2),
    ("issue", -1),
    ("issues", -1),
    ("complain", -2),
    ("complaint", -2),
    ("careless", -2),
    ("broken", -1),
    ("mess", -2),
    ("messy", -2),
    ("annoying", -2),
    ("annoyed", -2),
    ("angry", -3),
    ("sad", -2),
    ("unhappy", -2),
    ("wrong", -2),
    ("waste", -1),
    ("wasted", -2),
    ("never", -1),
    ("avoid", -1),
    ("ignored", -2),
    ("refused", -2),
    ("sick", -2),
    ("hate", -3),
    ("hated", -3),
    // Strong negative
    ("awful", -3),
    ("terrible", -3),
    ("horrible", -3),
    ("worst", -3),
    ("disgusting", -3),
    ("pathetic", -2),
    ("nasty", -3),
    ("filthy", -3),
    ("unacceptable", -2),
    ("scam", -2),
    ("cheated", -3),
    ("fraud", -4),
    ("useless", -2),
    ("dreadful", -3),
    ("appalling", -3),
    ("atrocious", -3),
];

/// Tokens that flip the sign of the word immediately after them.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "isn't",
    "isnt", "wasn't", "wasnt", "aren't", "arent", "weren't", "werent", "can't", "cant",
    "cannot", "couldn't", "couldnt", "won't", "wont", "wouldn't", "wouldnt", "shouldn't",
    "shouldnt", "hardly",
];

fn weight(token: &str) -> Option<i32> {
    LEXICON
        .iter()
        .find(|&&(word, _)| word == token)
        .map(|&(_, w)| w)
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|word| {
            word.replace('\u{2019}', "'")
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_matches('\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}

/// Scores `text` by summing per-word weights.
///
/// A word directly preceded by a negator ("not good") contributes its
/// weight with the sign flipped. Unknown words and empty text score `0`.
#[must_use]
pub fn lexicon_score(text: &str) -> i32 {
    let mut score = 0_i32;
    let mut negate_next = false;
    for token in tokenize(text) {
        if let Some(w) = weight(&token) {
            score = score.saturating_add(if negate_next { -w } else { w });
        }
        negate_next = NEGATORS.contains(&token.as_str());
    }
    score
}
