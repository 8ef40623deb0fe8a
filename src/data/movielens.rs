use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
};

use csv::ReaderBuilder;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, CatalogEntry, MovieData, Polarity, PolarityLexicon, RatingMatrix},
    services::stemmer::{Stemmer, SuffixStemmer},
};

use super::CatalogSource;

pub const MOVIES_FILE: &str = "movies.txt";
pub const RATINGS_FILE: &str = "ratings.txt";
pub const SENTIMENT_FILE: &str = "sentiment.txt";

/// Reads the MovieLens-style text files from one directory.
///
/// - `movies.txt`: `id%title%genres`, genres separated by `|`
/// - `ratings.txt`: `user%movie%rating`, star ratings from 0.5 to 5
/// - `sentiment.txt`: `word,pos` or `word,neg`
pub struct MovieLensSource {
    data_dir: PathBuf,
    threshold: f64,
    stemmer: Arc<dyn Stemmer>,
}

impl MovieLensSource {
    pub fn new(data_dir: impl Into<PathBuf>, threshold: f64) -> Self {
        Self {
            data_dir: data_dir.into(),
            threshold,
            stemmer: Arc::new(SuffixStemmer),
        }
    }

    /// Use a different stemmer for the lexicon keys
    pub fn with_stemmer(self, stemmer: Arc<dyn Stemmer>) -> Self {
        Self { stemmer, ..self }
    }

    async fn read(&self, file: &str) -> AppResult<String> {
        let path = self.data_dir.join(file);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read data file");
            AppError::Io(e)
        })
    }
}

#[async_trait::async_trait]
impl CatalogSource for MovieLensSource {
    async fn load(&self) -> AppResult<MovieData> {
        let (movies, sentiment) = tokio::try_join!(self.read(MOVIES_FILE), self.read(SENTIMENT_FILE))?;
        let ratings = self.read(RATINGS_FILE).await?;

        let (ids, entries) = parse_movies(&movies)?;
        let rows = parse_ratings(&ratings, &ids)?;
        let words = parse_sentiment(&sentiment)?;

        let catalog = Catalog::new(entries);
        let lexicon = PolarityLexicon::build(words, self.stemmer.as_ref());
        let matrix = RatingMatrix::binarize(rows, self.threshold);

        tracing::info!(
            source = self.name(),
            dir = %self.data_dir.display(),
            movies = catalog.len(),
            lexicon_words = lexicon.len(),
            "Loaded movie data"
        );

        Ok(MovieData::new(catalog, lexicon, matrix, Arc::clone(&self.stemmer)))
    }

    fn name(&self) -> &'static str {
        "movielens"
    }
}

fn percent_reader(text: &str) -> csv::Reader<&[u8]> {
    // titles carry their own unbalanced quotes, so quoting stays off
    ReaderBuilder::new()
        .delimiter(b'%')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn parse_id(field: Option<&str>, what: &str, line: u64) -> AppResult<u64> {
    field
        .map(str::trim)
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| AppError::InvalidData(format!("line {}: missing or bad {}", line, what)))
}

/// Parses `movies.txt`. Returns the file's movie ids alongside the entries,
/// both in file order.
pub fn parse_movies(text: &str) -> AppResult<(Vec<u64>, Vec<CatalogEntry>)> {
    let mut ids = Vec::new();
    let mut entries = Vec::new();

    for (n, record) in percent_reader(text).records().enumerate() {
        let record = record?;
        let line = n as u64 + 1;
        let id = parse_id(record.get(0), "movie id", line)?;
        let title = record
            .get(1)
            .ok_or_else(|| AppError::InvalidData(format!("line {}: missing title", line)))?;

        ids.push(id);
        entries.push(CatalogEntry::from_raw(title, record.get(2).unwrap_or_default()));
    }

    Ok((ids, entries))
}

/// Parses `ratings.txt` into raw star ratings, one row per movie in
/// `movie_ids` order and one column per distinct user in ascending id order.
///
/// Ratings for movies missing from the catalog are skipped with a warning.
pub fn parse_ratings(text: &str, movie_ids: &[u64]) -> AppResult<Vec<Vec<f64>>> {
    let rows_by_id: HashMap<u64, usize> = movie_ids.iter().enumerate().map(|(row, &id)| (id, row)).collect();

    let mut triples = Vec::new();
    for (n, record) in percent_reader(text).records().enumerate() {
        let record = record?;
        let line = n as u64 + 1;
        let user = parse_id(record.get(0), "user id", line)?;
        let movie = parse_id(record.get(1), "movie id", line)?;
        let rating: f64 = record
            .get(2)
            .map(str::trim)
            .and_then(|r| r.parse().ok())
            .ok_or_else(|| AppError::InvalidData(format!("line {}: missing or bad rating", line)))?;
        triples.push((user, movie, rating));
    }

    let columns: HashMap<u64, usize> = triples
        .iter()
        .map(|&(user, _, _)| user)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(col, user)| (user, col))
        .collect();

    let mut matrix = vec![vec![0.0; columns.len()]; movie_ids.len()];
    let mut skipped = 0usize;
    for (user, movie, rating) in triples {
        match (rows_by_id.get(&movie), columns.get(&user)) {
            (Some(&row), Some(&col)) => matrix[row][col] = rating,
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Ignored ratings for movies outside the catalog");
    }
    Ok(matrix)
}

/// Parses `sentiment.txt` into raw (unstemmed) word labels.
pub fn parse_sentiment(text: &str) -> AppResult<Vec<(String, Polarity)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut words = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record?;
        let (Some(word), Some(label)) = (record.get(0), record.get(1)) else {
            return Err(AppError::InvalidData(format!(
                "{}: line {} needs a word and a label",
                SENTIMENT_FILE,
                n + 1
            )));
        };
        let polarity = label.parse::<Polarity>().map_err(AppError::InvalidData)?;
        words.push((word.trim().to_string(), polarity));
    }

    Ok(words)
}

/// True when all three data files exist in `dir`
pub fn has_data_files(dir: &Path) -> bool {
    [MOVIES_FILE, RATINGS_FILE, SENTIMENT_FILE]
        .iter()
        .all(|file| dir.join(file).is_file())
}
