use once_cell::sync::Lazy;
use regex::Regex;

use crate::{models::Catalog, services::title_search::contains_words};

static YEAR_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\(?([12][0-9]{3})\)?\b").expect("valid year token pattern"));

/// Narrows a candidate set using the user's clarification.
///
/// Tries, in order: the full "Title (Year)", a lone year, then a word-bounded
/// piece of the title. The first stage that keeps some but not all candidates
/// wins; if none does, the candidates come back unchanged.
pub fn narrow(catalog: &Catalog, clarification: &str, candidates: &[usize]) -> Vec<usize> {
    let clarification = clarification.trim().to_lowercase();

    let by_full_title = keep(catalog, candidates, |entry| {
        entry.full_title().to_lowercase() == clarification
    });
    if let Some(narrowed) = shrinks(by_full_title, candidates) {
        return narrowed;
    }

    let years: Vec<&str> = YEAR_TOKEN
        .captures_iter(&clarification)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    if let [year] = years.as_slice() {
        let by_year = keep(catalog, candidates, |entry| {
            entry.year.as_deref().is_some_and(|y| contains_words(y, year))
        });
        if let Some(narrowed) = shrinks(by_year, candidates) {
            return narrowed;
        }
    }

    let by_title = keep(catalog, candidates, |entry| {
        contains_words(&entry.title, &clarification)
    });
    if let Some(narrowed) = shrinks(by_title, candidates) {
        return narrowed;
    }

    tracing::debug!(
        candidates = candidates.len(),
        "Clarification did not narrow candidates"
    );
    candidates.to_vec()
}

fn keep<F>(catalog: &Catalog, candidates: &[usize], predicate: F) -> Vec<usize>
where
    F: Fn(&crate::models::CatalogEntry) -> bool,
{
    candidates
        .iter()
        .copied()
        .filter(|&i| catalog.get(i).is_some_and(&predicate))
        .collect()
}

fn shrinks(kept: Vec<usize>, candidates: &[usize]) -> Option<Vec<usize>> {
    (!kept.is_empty() && kept.len() < candidates.len()).then_some(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("Titanic", Some("1953"), vec![]),
            CatalogEntry::new("Titanic", Some("1997"), vec![]),
            CatalogEntry::new("Scream", Some("1996"), vec![]),
            CatalogEntry::new("Scream 2", Some("1997"), vec![]),
            CatalogEntry::new("Scream 3", Some("2000"), vec![]),
            CatalogEntry::new("Harry Potter and the Sorcerer's Stone", Some("2001"), vec![]),
            CatalogEntry::new("Harry Potter and the Chamber of Secrets", Some("2002"), vec![]),
            CatalogEntry::new("That Darn Cat!", Some("1965"), vec![]),
            CatalogEntry::new("That Darn Cat", Some("1997"), vec![]),
        ])
    }

    #[test]
    fn test_narrow_by_year() {
        let catalog = catalog();
        assert_eq!(narrow(&catalog, "1997", &[0, 1]), vec![1]);
        assert_eq!(narrow(&catalog, "the one from (1953) please", &[0, 1]), vec![0]);
    }

    #[test]
    fn test_narrow_by_title_fragment() {
        let catalog = catalog();
        assert_eq!(narrow(&catalog, "2", &[2, 3, 4]), vec![3]);
        assert_eq!(narrow(&catalog, "sorcerer's stone", &[5, 6]), vec![5]);
        assert_eq!(narrow(&catalog, "  Chamber of Secrets ", &[5, 6]), vec![6]);
    }

    #[test]
    fn test_narrow_by_full_title() {
        let catalog = catalog();
        assert_eq!(narrow(&catalog, "That Darn Cat (1997)", &[7, 8]), vec![8]);
        assert_eq!(narrow(&catalog, "that darn cat! (1965)", &[7, 8]), vec![7]);
    }

    #[test]
    fn test_year_stage_skipped_when_it_keeps_everything() {
        let catalog = catalog();
        // 1997 fits both, and no title contains the whole clarification
        assert_eq!(narrow(&catalog, "titanic 1997", &[1, 3]), vec![1, 3]);
        assert_eq!(narrow(&catalog, "scream 1997", &[2, 3]), vec![3]);
    }

    #[test]
    fn test_unhelpful_clarification_keeps_candidates() {
        let catalog = catalog();
        assert_eq!(narrow(&catalog, "the good one", &[0, 1]), vec![0, 1]);
        assert_eq!(narrow(&catalog, "", &[0, 1]), vec![0, 1]);
    }

    #[test]
    fn test_two_years_are_not_a_clarification() {
        let catalog = catalog();
        assert_eq!(narrow(&catalog, "1953 or 1997", &[0, 1]), vec![0, 1]);
    }

    #[test]
    fn test_single_candidate_is_stable() {
        let catalog = catalog();
        for clarification in ["1953", "scream", "anything", ""] {
            assert_eq!(narrow(&catalog, clarification, &[1]), vec![1]);
        }
    }
}
