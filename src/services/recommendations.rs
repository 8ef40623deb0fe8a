use std::cmp::Ordering;

use crate::models::{RatingMatrix, UserProfile};

/// Item-item collaborative filtering over the binarized rating matrix.
///
/// Every unrated movie is scored by summing the user's ratings weighted by
/// cosine similarity to each rated movie. The `k` best come back in
/// descending score order; equal scores put the higher catalog index first.
/// Movies the user already rated are never returned.
pub fn recommend(profile: &UserProfile, ratings: &RatingMatrix, k: usize) -> Vec<usize> {
    let rated: Vec<(usize, i8)> = profile.rated().collect();

    let mut scored: Vec<(f64, usize)> = (0..ratings.movie_count())
        .filter(|&i| profile.get(i) == 0)
        .map(|i| {
            let score: f64 = rated
                .iter()
                .map(|&(j, rating)| f64::from(rating) * ratings.similarity(i, j))
                .sum();
            (score, i)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.1.cmp(&a.1))
    });

    let picks: Vec<usize> = scored.into_iter().take(k).map(|(_, i)| i).collect();
    tracing::info!(
        rated = rated.len(),
        requested = k,
        returned = picks.len(),
        "Computed recommendations"
    );
    picks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> RatingMatrix {
        RatingMatrix::new(vec![
            vec![1.0, 1.0, -1.0, 0.0],
            vec![-1.0, 0.0, 1.0, 1.0],
            vec![1.0, 1.0, 0.0, -1.0],
            vec![0.0, 1.0, -1.0, 0.0],
            vec![-1.0, -1.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ])
    }

    #[test]
    fn test_recommend_orders_by_weighted_similarity() {
        let profile = UserProfile::from_ratings(vec![1, -1, 0, 0, 0, 0]);
        // movie 2 and 3 lean toward the liked movie, 4 toward the disliked one
        assert_eq!(recommend(&profile, &matrix(), 2), vec![2, 3]);
    }

    #[test]
    fn test_recommend_skips_rated_movies() {
        let profile = UserProfile::from_ratings(vec![1, -1, 0, 1, 0, -1]);
        let picks = recommend(&profile, &matrix(), 10);
        assert_eq!(picks.len(), 2);
        assert!(picks.iter().all(|&i| profile.get(i) == 0));
    }

    #[test]
    fn test_empty_profile_breaks_ties_by_descending_index() {
        let profile = UserProfile::new(6);
        assert_eq!(recommend(&profile, &matrix(), 3), vec![5, 4, 3]);
    }

    #[test]
    fn test_equal_scores_from_different_sums_prefer_higher_index() {
        // every row has norm sqrt(7); movie 0 scores -1/7 + -1/7, movie 6 scores -3/7 + 1/7
        let matrix = RatingMatrix::new(vec![
            vec![-1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0],
            vec![1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0],
            vec![1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0],
            vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0],
            vec![1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0],
            vec![-1.0, -1.0, 1.0, 1.0, 1.0, -1.0, 1.0],
            vec![-1.0, 1.0, 1.0, 1.0, 1.0, -1.0, 1.0],
            vec![-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0],
        ]);
        let profile = UserProfile::from_ratings(vec![0, 1, 0, 0, 1, 0, 0, 0]);

        let picks = recommend(&profile, &matrix, 6);
        assert_eq!(picks, vec![3, 6, 5, 2, 0, 7]);
        let pos = |m: usize| picks.iter().position(|&i| i == m);
        assert!(pos(6) < pos(0));
    }

    #[test]
    fn test_zero_norm_row_scores_zero() {
        // movie 5 has no ratings at all, so it can only tie at zero
        let profile = UserProfile::from_ratings(vec![1, 0, 0, 0, -1, 0]);
        let picks = recommend(&profile, &matrix(), 4);
        assert_eq!(picks[0], 2);
        assert_eq!(picks.last(), Some(&1));
    }

    #[test]
    fn test_k_zero_returns_nothing() {
        let profile = UserProfile::from_ratings(vec![1, 0, 0, 0, 0, 0]);
        assert!(recommend(&profile, &matrix(), 0).is_empty());
    }
}
