pub mod lexicon;

use lexicon::Lexicon;

/// Negations flip the next scored word; forms like `dont` are what is left
/// of contractions once titles have been cleaned.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nor", "dont", "doesnt", "didnt", "cant", "cannot", "couldnt",
    "isnt", "wasnt", "arent", "werent", "wont", "wouldnt", "shouldnt", "aint",
];
const NEGATION_FACTOR: f64 = -0.5;

/// Polarity in [-1, 1], subjectivity in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

pub trait SentimentScorer {
    fn score(&self, text: &str) -> Sentiment;
}

/// Pattern-style lexical scorer: averages per-word scores, with intensifiers
/// scaling the next word and negations reversing it.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Lexicon,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        LexiconScorer { lexicon }
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Sentiment {
        let tokens = tokenize(text);
        let mut assessments: Vec<(f64, f64)> = Vec::new();
        let mut negated = false;
        let mut multiplier = 1.0;

        for (i, token) in tokens.iter().enumerate() {
            if NEGATIONS.contains(&token.as_str()) {
                negated = true;
                continue;
            }
            let Some(entry) = self.lexicon.get(token) else {
                continue;
            };

            let modifies_next = tokens
                .get(i + 1)
                .is_some_and(|next| self.lexicon.get(next).is_some());
            if entry.is_intensifier() && modifies_next {
                multiplier *= entry.intensity;
                continue;
            }

            let mut polarity = entry.polarity * multiplier;
            if negated {
                polarity *= NEGATION_FACTOR;
            }
            let subjectivity = entry.subjectivity * multiplier;
            assessments.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));

            negated = false;
            multiplier = 1.0;
        }

        if assessments.is_empty() {
            return Sentiment::default();
        }
        let n = assessments.len() as f64;
        Sentiment {
            polarity: assessments.iter().map(|a| a.0).sum::<f64>() / n,
            subjectivity: assessments.iter().map(|a| a.1).sum::<f64>() / n,
        }
    }
}

/// Lowercase alphanumeric words; apostrophes are dropped so `don't` reads as `dont`.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.replace('\'', "").to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LexiconScorer {
        LexiconScorer::new(Lexicon::builtin().unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_positive_word() {
        let s = scorer().score("This is a great day");
        assert!(close(s.polarity, 0.8), "{:?}", s);
        assert!(close(s.subjectivity, 0.75), "{:?}", s);
    }

    #[test]
    fn single_negative_word() {
        let s = scorer().score("worst semester ever");
        assert!(close(s.polarity, -1.0), "{:?}", s);
        assert!(close(s.subjectivity, 1.0), "{:?}", s);
    }

    #[test]
    fn neutral_title_scores_zero() {
        let s = scorer().score("Looking for a roommate for spring");
        assert_eq!(s, Sentiment::default());
        assert_eq!(scorer().score(""), Sentiment::default());
    }

    #[test]
    fn negation_reverses_and_damps() {
        let s = scorer().score("not good");
        assert!(close(s.polarity, -0.35), "{:?}", s);
        assert!(close(s.subjectivity, 0.6), "{:?}", s);

        let s = scorer().score("I dont enjoy this");
        assert!(close(s.polarity, -0.2), "{:?}", s);
    }

    #[test]
    fn contraction_apostrophe_is_dropped() {
        assert_eq!(scorer().score("don't enjoy"), scorer().score("dont enjoy"));
    }

    #[test]
    fn intensifier_scales_next_word() {
        let s = scorer().score("very good");
        assert!(close(s.polarity, 0.91), "{:?}", s);
        assert!(close(s.subjectivity, 0.78), "{:?}", s);
    }

    #[test]
    fn stacked_intensifiers_are_clamped() {
        let s = scorer().score("very very good");
        assert!(close(s.polarity, 1.0), "{:?}", s);
        assert!(close(s.subjectivity, 1.0), "{:?}", s);
    }

    #[test]
    fn trailing_intensifier_counts_on_its_own() {
        let s = scorer().score("finals are so");
        assert!(close(s.polarity, 0.0));
        assert!(close(s.subjectivity, 0.0));
    }

    #[test]
    fn mixed_words_are_averaged() {
        let s = scorer().score("good and bad");
        assert!(close(s.polarity, 0.0), "{:?}", s);
        assert!(close(s.subjectivity, (0.6 + 0.67) / 2.0), "{:?}", s);
    }

    #[test]
    fn scores_stay_in_range() {
        let titles = [
            "Absolutely incredibly amazing best perfect day!!!",
            "not not not terrible",
            "extremely extremely extremely horrible awful worst",
            "Is it normal to feel so lonely and stressed?",
        ];
        for t in titles {
            let s = scorer().score(t);
            assert!((-1.0..=1.0).contains(&s.polarity), "{t}: {:?}", s);
            assert!((0.0..=1.0).contains(&s.subjectivity), "{t}: {:?}", s);
        }
    }
}
