use std::sync::Arc;

use crate::services::stemmer::Stemmer;

pub mod catalog;
pub mod profile;
pub mod ratings;

pub use catalog::{article_to_front, split_year, Catalog, CatalogEntry, Polarity, PolarityLexicon};
pub use profile::UserProfile;
pub use ratings::{cosine_similarity, RatingMatrix};

/// Everything loaded once at startup and shared read-only by every session
#[derive(Clone)]
pub struct MovieData {
    pub catalog: Catalog,
    pub lexicon: PolarityLexicon,
    pub ratings: RatingMatrix,
    /// The stemmer that built `lexicon`; review text must go through it too
    pub stemmer: Arc<dyn Stemmer>,
}

impl MovieData {
    pub fn new(
        catalog: Catalog,
        lexicon: PolarityLexicon,
        ratings: RatingMatrix,
        stemmer: Arc<dyn Stemmer>,
    ) -> Self {
        Self {
            catalog,
            lexicon,
            ratings,
            stemmer,
        }
    }
}

impl std::fmt::Debug for MovieData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieData")
            .field("movies", &self.catalog.len())
            .field("lexicon_words", &self.lexicon.len())
            .field("rated_movies", &self.ratings.movie_count())
            .finish()
    }
}
