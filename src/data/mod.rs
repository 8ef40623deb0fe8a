//! Loading the catalog, lexicon and rating matrix at startup.
//!
//! Sources are pluggable so the dialogue can be driven from the bundled
//! MovieLens text files or from anything else that yields a [`MovieData`].

use crate::{error::AppResult, models::MovieData};

pub mod movielens;

pub use movielens::MovieLensSource;

/// Anything that can produce the read-only movie data for a session
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the catalog, polarity lexicon and binarized rating matrix.
    ///
    /// Catalog indices and rating-matrix rows must line up.
    async fn load(&self) -> AppResult<MovieData>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
