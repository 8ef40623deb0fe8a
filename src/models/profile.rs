use serde::{Deserialize, Serialize};

/// The user's opinions collected so far, one slot per catalog movie.
///
/// Values are -1 (disliked), 0 (unrated) or +1 (liked).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    ratings: Vec<i8>,
}

impl UserProfile {
    /// Creates an empty profile sized to the catalog
    pub fn new(catalog_len: usize) -> Self {
        Self {
            ratings: vec![0; catalog_len],
        }
    }

    /// Builds a profile from explicit values, clamping each to its sign.
    pub fn from_ratings(ratings: Vec<i8>) -> Self {
        Self {
            ratings: ratings.into_iter().map(i8::signum).collect(),
        }
    }

    /// Records an opinion; only the sign of `sentiment` is kept.
    ///
    /// Returns false when the index is outside the catalog.
    pub fn rate(&mut self, movie_index: usize, sentiment: i8) -> bool {
        match self.ratings.get_mut(movie_index) {
            Some(slot) => {
                *slot = sentiment.signum();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, movie_index: usize) -> i8 {
        self.ratings.get(movie_index).copied().unwrap_or(0)
    }

    /// Number of movies with a nonzero rating
    pub fn rated_count(&self) -> usize {
        self.ratings.iter().filter(|&&r| r != 0).count()
    }

    /// Iterates over (index, rating) for every rated movie
    pub fn rated(&self) -> impl Iterator<Item = (usize, i8)> + '_ {
        self.ratings
            .iter()
            .enumerate()
            .filter(|(_, r)| **r != 0)
            .map(|(i, r)| (i, *r))
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_unrated() {
        let profile = UserProfile::new(4);
        assert_eq!(profile.len(), 4);
        assert_eq!(profile.rated_count(), 0);
        assert_eq!(profile.rated().count(), 0);
    }

    #[test]
    fn test_rate_keeps_sign_only() {
        let mut profile = UserProfile::new(3);
        assert!(profile.rate(0, 2));
        assert!(profile.rate(2, -2));
        assert_eq!(profile.as_slice(), &[1, 0, -1]);
        assert_eq!(profile.rated().collect::<Vec<_>>(), vec![(0, 1), (2, -1)]);
    }

    #[test]
    fn test_rerating_overwrites() {
        let mut profile = UserProfile::new(2);
        profile.rate(1, 1);
        profile.rate(1, -1);
        assert_eq!(profile.get(1), -1);
        assert_eq!(profile.rated_count(), 1);
    }

    #[test]
    fn test_rate_out_of_range_is_ignored() {
        let mut profile = UserProfile::new(2);
        assert!(!profile.rate(5, 1));
        assert_eq!(profile.get(5), 0);
        assert_eq!(profile.rated_count(), 0);
    }

    #[test]
    fn test_from_ratings_clamps() {
        let profile = UserProfile::from_ratings(vec![3, 0, -5]);
        assert_eq!(profile.as_slice(), &[1, 0, -1]);
    }
}
