use crate::{
    config::MatchMode,
    models::{article_to_front, split_year, Catalog, CatalogEntry},
};

/// Outcome of looking a title up in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NotFound,
    Unique(usize),
    /// Several catalog entries match, in catalog order
    Ambiguous(Vec<usize>),
}

impl Resolution {
    pub fn from_indices(mut indices: Vec<usize>) -> Self {
        match indices.len() {
            0 => Resolution::NotFound,
            1 => Resolution::Unique(indices[0]),
            _ => {
                indices.sort_unstable();
                indices.dedup();
                Resolution::Ambiguous(indices)
            }
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        match self {
            Resolution::NotFound => Vec::new(),
            Resolution::Unique(index) => vec![*index],
            Resolution::Ambiguous(indices) => indices.clone(),
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Resolution::NotFound)
    }
}

/// Maps raw title mentions onto catalog indices
#[derive(Debug, Clone, Copy)]
pub struct TitleResolver<'a> {
    catalog: &'a Catalog,
    mode: MatchMode,
}

impl<'a> TitleResolver<'a> {
    pub fn new(catalog: &'a Catalog, mode: MatchMode) -> Self {
        Self { catalog, mode }
    }

    /// Same catalog, different exact-match rule
    pub fn with_mode(self, mode: MatchMode) -> Self {
        Self { mode, ..self }
    }

    /// Resolves a raw title such as `"Matrix, The (1999)"`.
    ///
    /// A zero `max_edit_distance` compares exactly under the resolver's match
    /// mode. Anything larger keeps the entries within that distance that tie
    /// for the smallest distance found.
    pub fn resolve(&self, raw_title: &str, max_edit_distance: usize) -> Resolution {
        let (bare, year) = split_year(raw_title);
        let query = article_to_front(bare);

        let eligible = self
            .catalog
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| year.is_none() || entry.year.as_deref() == year);

        let indices = if max_edit_distance == 0 {
            eligible
                .filter(|(_, entry)| self.matches_exactly(&query, entry))
                .map(|(i, _)| i)
                .collect()
        } else {
            closest_matches(&query, eligible, max_edit_distance)
        };

        let resolution = Resolution::from_indices(indices);
        tracing::debug!(
            title = %raw_title,
            max_edit_distance,
            matches = resolution.indices().len(),
            "Resolved title"
        );
        resolution
    }

    fn matches_exactly(&self, query: &str, entry: &CatalogEntry) -> bool {
        match self.mode {
            MatchMode::Strict => query == entry.title,
            MatchMode::Caseless => query.to_lowercase() == entry.title.to_lowercase(),
            MatchMode::Permissive => {
                query.to_lowercase() == entry.title.to_lowercase()
                    || contains_words(&entry.title, query)
            }
        }
    }
}

fn closest_matches<'e>(
    query: &str,
    eligible: impl Iterator<Item = (usize, &'e CatalogEntry)>,
    max_distance: usize,
) -> Vec<usize> {
    let query = query.to_lowercase();
    let scored: Vec<(usize, usize)> = eligible
        .map(|(i, entry)| (edit_distance(&query, &entry.title.to_lowercase()), i))
        .filter(|(dist, _)| *dist <= max_distance)
        .collect();

    let Some(best) = scored.iter().map(|(dist, _)| *dist).min() else {
        return Vec::new();
    };

    scored
        .into_iter()
        .filter(|(dist, _)| *dist == best)
        .map(|(_, i)| i)
        .collect()
}

/// Edit distance with insertion and deletion costing 1 and substitution 2.
///
/// Bottom-up over suffixes: `row[j]` holds the distance between the current
/// suffix of `a` and `b[j..]`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // suffix of a is empty: only insertions remain
    let mut next: Vec<usize> = (0..=b.len()).map(|j| b.len() - j).collect();
    let mut row = vec![0; b.len() + 1];

    for i in (0..a.len()).rev() {
        row[b.len()] = a.len() - i;
        for j in (0..b.len()).rev() {
            let substitute = next[j + 1] + if a[i] == b[j] { 0 } else { 2 };
            let delete = next[j] + 1;
            let insert = row[j + 1] + 1;
            row[j] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut row, &mut next);
    }

    next[0]
}

/// Case-insensitive test for `needle` appearing in `haystack` on word boundaries.
pub fn contains_words(haystack: &str, needle: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(&needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("The American President", Some("1995"), vec![]),
            CatalogEntry::new("Titanic", Some("1997"), vec![]),
            CatalogEntry::new("Scream", Some("1996"), vec![]),
            CatalogEntry::new("Scream 2", Some("1997"), vec![]),
            CatalogEntry::new("Screamers", Some("1995"), vec![]),
            CatalogEntry::new("Titanic", Some("1953"), vec![]),
            CatalogEntry::new("Sleeping Beauty", Some("1959"), vec![]),
            CatalogEntry::new("The Matrix", Some("1999"), vec![]),
        ])
    }

    #[test]
    fn test_edit_distance_costs() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "ab"), 2);
        assert_eq!(edit_distance("cat", "cut"), 2);
        assert_eq!(edit_distance("cat", "cats"), 1);
        assert_eq!(edit_distance("sleeping beaty", "sleeping beauty"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 5);
    }

    #[test]
    fn test_edit_distance_symmetric() {
        assert_eq!(edit_distance("matrix", "matirx"), edit_distance("matirx", "matrix"));
    }

    #[test]
    fn test_contains_words() {
        assert!(contains_words("Scream 2", "scream"));
        assert!(contains_words("Scream 2", "2"));
        assert!(!contains_words("Screamers", "scream"));
        assert!(!contains_words("Scream 3", "2"));
        assert!(contains_words("That Darn Cat!", "darn cat"));
        assert!(!contains_words("Scream", ""));
    }

    #[test]
    fn test_strict_mode_is_case_sensitive() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        assert_eq!(resolver.resolve("The American President", 0), Resolution::Unique(0));
        assert_eq!(resolver.resolve("The AMERICAN President", 0), Resolution::NotFound);
    }

    #[test]
    fn test_caseless_mode() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Caseless);
        assert_eq!(resolver.resolve("The AMERICAN President", 0), Resolution::Unique(0));
        assert_eq!(resolver.resolve("scream", 0), Resolution::Unique(2));
    }

    #[test]
    fn test_title_without_year_matches_all_years() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        assert_eq!(resolver.resolve("Titanic", 0), Resolution::Ambiguous(vec![1, 5]));
    }

    #[test]
    fn test_year_narrows_match() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        assert_eq!(resolver.resolve("Titanic (1997)", 0), Resolution::Unique(1));
        assert_eq!(resolver.resolve("Titanic (2001)", 0), Resolution::NotFound);
    }

    #[test]
    fn test_trailing_article_moved_to_front() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        assert_eq!(resolver.resolve("Matrix, The (1999)", 0), Resolution::Unique(7));
        assert_eq!(resolver.resolve("American President, The", 0), Resolution::Unique(0));
    }

    #[test]
    fn test_permissive_word_containment() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Permissive);
        assert_eq!(resolver.resolve("SCREAM", 0), Resolution::Ambiguous(vec![2, 3]));
        assert_eq!(
            resolver.with_mode(MatchMode::Caseless).resolve("SCREAM", 0),
            Resolution::Unique(2)
        );
    }

    #[test]
    fn test_fuzzy_finds_misspelling() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        assert_eq!(resolver.resolve("Sleeping Beaty", 3), Resolution::Unique(6));
        assert_eq!(resolver.resolve("Sleeping Beaty", 0), Resolution::NotFound);
    }

    #[test]
    fn test_fuzzy_pools_ties_at_minimum() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        // both Titanic entries sit at distance 1, "Titanic (1997)" filters to one
        assert_eq!(resolver.resolve("Titanc", 3), Resolution::Ambiguous(vec![1, 5]));
        assert_eq!(resolver.resolve("Titanc (1997)", 3), Resolution::Unique(1));
    }

    #[test]
    fn test_fuzzy_keeps_only_closest() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        // "scream" is 0 from Scream, 2 from "scream 2": only the closest survives
        assert_eq!(resolver.resolve("Scream", 3), Resolution::Unique(2));
    }

    #[test]
    fn test_fuzzy_respects_budget() {
        let catalog = catalog();
        let resolver = TitleResolver::new(&catalog, MatchMode::Strict);
        assert_eq!(resolver.resolve("Completely Different", 3), Resolution::NotFound);
    }

    #[test]
    fn test_resolution_indices() {
        assert!(Resolution::NotFound.indices().is_empty());
        assert_eq!(Resolution::Unique(4).indices(), vec![4]);
        assert_eq!(Resolution::from_indices(vec![5, 1]), Resolution::Ambiguous(vec![1, 5]));
        assert!(!Resolution::from_indices(vec![]).is_found());
    }
}
