use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display, str::FromStr};

use crate::services::stemmer::Stemmer;

static YEAR_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.*) \((?P<year>[0-9]{4}|[0-9]{4}-|[0-9]{4}-[0-9]{4})\)$")
        .expect("valid year pattern")
});

static TRAILING_ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.*), (?P<article>The|the|THE|An|an|AN|A|a)$")
        .expect("valid article pattern")
});

/// Splits a trailing `(YYYY)`, `(YYYY-)` or `(YYYY-YYYY)` off a title.
///
/// Returns the title unchanged and `None` when there is no year suffix.
pub fn split_year(title: &str) -> (&str, Option<&str>) {
    match YEAR_SUFFIX.captures(title) {
        Some(caps) => {
            let bare = caps.name("title").map_or(title, |m| m.as_str());
            (bare, caps.name("year").map(|m| m.as_str()))
        }
        None => (title, None),
    }
}

/// Moves a trailing article to the front: "Matrix, The" becomes "The Matrix".
pub fn article_to_front(title: &str) -> String {
    match TRAILING_ARTICLE.captures(title) {
        Some(caps) => format!("{} {}", &caps["article"], &caps["title"]),
        None => title.to_string(),
    }
}

/// One movie in the catalog. Its position in the catalog is its identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Title with any leading article in front and without the year
    pub title: String,
    /// Release year, e.g. "1997" or "2007-2010" for series
    pub year: Option<String>,
    pub genres: Vec<String>,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, year: Option<&str>, genres: Vec<String>) -> Self {
        Self {
            title: title.into(),
            year: year.map(str::to_string),
            genres,
        }
    }

    /// Builds an entry from a raw data-file title such as `"Notebook, The (2004)"`.
    pub fn from_raw(raw_title: &str, raw_genres: &str) -> Self {
        let unquoted = raw_title
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(raw_title);
        let (bare, year) = split_year(unquoted);
        let genres = raw_genres
            .split('|')
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();

        Self::new(article_to_front(&bare.replace('"', "")), year, genres)
    }

    /// The full display form, "Title (Year)", or just the title without a year.
    pub fn full_title(&self) -> String {
        match &self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

impl Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_title())
    }
}

/// The fixed, ordered list of known movies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Full titles for the given indices, skipping any out of range.
    pub fn full_titles(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&i| self.get(i))
            .map(CatalogEntry::full_title)
            .collect()
    }
}

// ============================================================================
// Polarity lexicon
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pos" | "positive" => Ok(Polarity::Positive),
            "neg" | "negative" => Ok(Polarity::Negative),
            other => Err(format!("unknown polarity label '{}'", other)),
        }
    }
}

/// Stemmed word to polarity mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolarityLexicon {
    words: HashMap<String, Polarity>,
}

impl PolarityLexicon {
    /// Builds the lexicon, stemming every key with the analyzer's stemmer.
    pub fn build<I, S>(raw: I, stemmer: &dyn Stemmer) -> Self
    where
        I: IntoIterator<Item = (S, Polarity)>,
        S: AsRef<str>,
    {
        let words = raw
            .into_iter()
            .map(|(word, polarity)| (stemmer.stem(word.as_ref()), polarity))
            .collect();
        Self { words }
    }

    pub fn get(&self, stemmed: &str) -> Option<Polarity> {
        self.words.get(stemmed).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stemmer::{MockStemmer, SuffixStemmer};

    #[test]
    fn test_split_year_variants() {
        assert_eq!(split_year("Titanic (1997)"), ("Titanic", Some("1997")));
        assert_eq!(split_year("Friends (1994-2004)"), ("Friends", Some("1994-2004")));
        assert_eq!(split_year("Lost (2004-)"), ("Lost", Some("2004-")));
        assert_eq!(split_year("Titanic"), ("Titanic", None));
        assert_eq!(split_year("1984"), ("1984", None));
    }

    #[test]
    fn test_article_to_front() {
        assert_eq!(article_to_front("Matrix, The"), "The Matrix");
        assert_eq!(article_to_front("Beautiful Mind, A"), "A Beautiful Mind");
        assert_eq!(article_to_front("Officer and a Gentleman, An"), "An Officer and a Gentleman");
        assert_eq!(article_to_front("Ex Machina"), "Ex Machina");
    }

    #[test]
    fn test_entry_from_raw_title() {
        let entry = CatalogEntry::from_raw("\"Notebook, The (2004)\"", "Drama|Romance");
        assert_eq!(entry.title, "The Notebook");
        assert_eq!(entry.year.as_deref(), Some("2004"));
        assert_eq!(entry.genres, vec!["Drama", "Romance"]);
        assert_eq!(entry.full_title(), "The Notebook (2004)");
    }

    #[test]
    fn test_entry_without_year_displays_bare_title() {
        let entry = CatalogEntry::from_raw("Untitled", "");
        assert_eq!(entry.year, None);
        assert!(entry.genres.is_empty());
        assert_eq!(format!("{}", entry), "Untitled");
    }

    #[test]
    fn test_polarity_labels() {
        assert_eq!("pos".parse::<Polarity>(), Ok(Polarity::Positive));
        assert_eq!("neg".parse::<Polarity>(), Ok(Polarity::Negative));
        assert!("meh".parse::<Polarity>().is_err());
    }

    #[test]
    fn test_lexicon_keys_are_stemmed() {
        let mut stemmer = MockStemmer::new();
        stemmer
            .expect_stem()
            .times(2)
            .returning(|w| format!("<{}>", w));

        let lexicon = PolarityLexicon::build(
            vec![("enjoy", Polarity::Positive), ("awful", Polarity::Negative)],
            &stemmer,
        );
        assert_eq!(lexicon.get("<enjoy>"), Some(Polarity::Positive));
        assert_eq!(lexicon.get("<awful>"), Some(Polarity::Negative));
        assert_eq!(lexicon.get("enjoy"), None);
    }

    #[test]
    fn test_lexicon_inflections_collapse() {
        let lexicon = PolarityLexicon::build(
            vec![("liked", Polarity::Positive), ("like", Polarity::Positive)],
            &SuffixStemmer,
        );
        assert_eq!(lexicon.len(), 1);
        assert_eq!(lexicon.get(&SuffixStemmer.stem("likes")), Some(Polarity::Positive));
    }
}
