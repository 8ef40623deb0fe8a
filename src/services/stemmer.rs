/// Maps a word to its canonical form.
///
/// The same stemmer must build the lexicon and normalize review text, otherwise
/// the keys never line up.
#[cfg_attr(test, mockall::automock)]
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

const SUFFIXES: &[&str] = &["ing", "ed", "es", "ly", "s"];

/// Minimum number of characters a stem keeps after stripping
const MIN_STEM: usize = 3;

/// Light inflection stripper: one suffix, then a trailing `e`.
///
/// `liked`, `likes` and `like` all become `lik`; `enjoyed` becomes `enjoy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixStemmer;

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        let mut stem = word.to_lowercase();

        if let Some(suffix) = SUFFIXES.iter().find(|s| {
            stem.ends_with(*s) && stem.chars().count() >= s.len() + MIN_STEM && !stem.ends_with("ss")
        }) {
            stem.truncate(stem.len() - suffix.len());
        }

        if stem.ends_with('e') && stem.chars().count() > MIN_STEM {
            stem.pop();
        }

        stem
    }
}
