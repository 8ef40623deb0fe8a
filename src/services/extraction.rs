use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Catalog;

pub(crate) static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)""#).expect("valid quote pattern"));

/// Where the extracted titles came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Nothing looked like a title
    None,
    /// Double-quoted spans
    Quoted,
    /// Catalog titles spotted in unquoted text
    Quoteless,
}

/// Title mentions found in one line of user text, in order of appearance
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub titles: Vec<String>,
    pub source: ExtractionSource,
}

impl Extraction {
    fn empty() -> Self {
        Self {
            titles: Vec::new(),
            source: ExtractionSource::None,
        }
    }
}

/// Every double-quoted span, verbatim. `""` yields an empty title.
pub fn quoted_titles(text: &str) -> Vec<String> {
    QUOTED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Finds movie-title mentions in free text
#[derive(Debug, Clone, Copy)]
pub struct TitleExtractor<'a> {
    catalog: &'a Catalog,
    quoteless: bool,
}

impl<'a> TitleExtractor<'a> {
    pub fn new(catalog: &'a Catalog, quoteless: bool) -> Self {
        Self { catalog, quoteless }
    }

    /// Quoted spans first; the catalog scan only runs when there are none.
    pub fn extract(&self, text: &str) -> Extraction {
        let quoted = quoted_titles(text);
        if !quoted.is_empty() {
            return Extraction {
                titles: quoted,
                source: ExtractionSource::Quoted,
            };
        }

        if !self.quoteless {
            return Extraction::empty();
        }

        let titles = self.scan_catalog(text);
        if titles.is_empty() {
            Extraction::empty()
        } else {
            Extraction {
                titles,
                source: ExtractionSource::Quoteless,
            }
        }
    }

    fn scan_catalog(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let mut accepted: Vec<String> = Vec::new();

        for entry in self.catalog.entries() {
            if entry.year.is_some() {
                let full = entry.full_title();
                if contains_title_words(&words, &full.to_lowercase()) {
                    // title plus year names exactly one movie
                    return vec![full];
                }
            }

            if contains_title_words(&words, &entry.title.to_lowercase()) {
                insert_subsuming(&mut accepted, &entry.title);
            }
        }

        accepted
    }
}

/// Adds `title` unless an accepted title already contains it, dropping any
/// accepted titles it contains.
fn insert_subsuming(accepted: &mut Vec<String>, title: &str) {
    let lowered = title.to_lowercase();
    accepted.retain(|t| !lowered.contains(&t.to_lowercase()));
    if !accepted.iter().any(|t| t.to_lowercase().contains(&lowered)) {
        accepted.push(title.to_string());
    }
}

fn trim_trailing_punctuation(word: &str) -> &str {
    word.trim_end_matches(|c: char| !c.is_alphanumeric())
}

/// Greedy in-order scan: each title word must appear after the previous one.
///
/// Only the final title word may carry trailing punctuation in the text
/// ("I liked 10, things" names "10", not "10 Things I Hate About You").
fn contains_title_words(text_words: &[&str], title: &str) -> bool {
    let title_words: Vec<&str> = title.split_whitespace().collect();
    let Some(last) = title_words.len().checked_sub(1) else {
        return false;
    };

    let mut matched = 0;
    for word in text_words {
        let target = title_words[matched];
        let hit = *word == target
            || (matched == last
                && trim_trailing_punctuation(word) == trim_trailing_punctuation(target)
                && !trim_trailing_punctuation(target).is_empty());
        if hit {
            matched += 1;
            if matched == title_words.len() {
                return true;
            }
        }
    }

    false
}
