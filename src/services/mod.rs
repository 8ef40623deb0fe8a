pub mod disambiguation;
pub mod extraction;
pub mod recommendations;
pub mod sentiment;
pub mod stemmer;
pub mod title_search;

pub use disambiguation::narrow;
pub use extraction::{quoted_titles, Extraction, ExtractionSource, TitleExtractor};
pub use recommendations::recommend;
pub use sentiment::{SentimentAnalyzer, SentimentMemory};
pub use stemmer::{Stemmer, SuffixStemmer};
pub use title_search::{contains_words, edit_distance, Resolution, TitleResolver};
