/// Historical ratings, one row per catalog movie and one column per rater.
///
/// Entries are binarized to -1, 0 (no rating) or +1. Row norms are computed
/// once so similarity lookups stay cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingMatrix {
    rows: Vec<Vec<f64>>,
    norms: Vec<f64>,
}

impl RatingMatrix {
    /// Wraps already-binarized rows
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        let norms = rows.iter().map(|row| norm(row)).collect();
        Self { rows, norms }
    }

    /// Binarizes raw star ratings: 0 stays unrated, `<= threshold` is -1, above is +1.
    pub fn binarize(raw: Vec<Vec<f64>>, threshold: f64) -> Self {
        let rows = raw
            .into_iter()
            .map(|row| row.into_iter().map(|r| binarize_rating(r, threshold)).collect())
            .collect();
        Self::new(rows)
    }

    pub fn movie_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, movie_index: usize) -> Option<&[f64]> {
        self.rows.get(movie_index).map(Vec::as_slice)
    }

    /// Cosine similarity between two movies' rating rows
    pub fn similarity(&self, a: usize, b: usize) -> f64 {
        match (self.rows.get(a), self.rows.get(b)) {
            (Some(u), Some(v)) => {
                let denom = self.norms[a] * self.norms[b];
                if denom == 0.0 {
                    0.0
                } else {
                    dot(u, v) / denom
                }
            }
            _ => 0.0,
        }
    }
}

fn binarize_rating(rating: f64, threshold: f64) -> f64 {
    if rating == 0.0 {
        0.0
    } else if rating <= threshold {
        -1.0
    } else {
        1.0
    }
}

fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter().zip(v).map(|(a, b)| a * b).sum()
}

fn norm(u: &[f64]) -> f64 {
    dot(u, u).sqrt()
}

/// Cosine similarity of two vectors, 0 when either has zero length
pub fn cosine_similarity(u: &[f64], v: &[f64]) -> f64 {
    let denom = norm(u) * norm(v);
    if denom == 0.0 {
        return 0.0;
    }
    dot(u, v) / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binarize_single_row() {
        let matrix = RatingMatrix::binarize(vec![vec![1.0, 2.5, 5.0, 0.0]], 2.5);
        assert_eq!(matrix.row(0), Some(&[-1.0, -1.0, 1.0, 0.0][..]));
    }

    #[test]
    fn test_binarize_grid() {
        let matrix = RatingMatrix::binarize(vec![vec![0.0, 1.0], vec![2.5, 5.0]], 2.5);
        assert_eq!(matrix.row(0), Some(&[0.0, -1.0][..]));
        assert_eq!(matrix.row(1), Some(&[-1.0, 1.0][..]));
    }

    #[test]
    fn test_self_similarity_is_one() {
        let x = [1.0, 1.0, -1.0, 0.0];
        assert!((cosine_similarity(&x, &x) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_similarity_is_zero() {
        let x = [1.0, 1.0, -1.0, 0.0];
        let y = [1.0, 0.0, 1.0, -1.0];
        assert!(cosine_similarity(&x, &y).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        let zero = [0.0, 0.0, 0.0];
        let x = [1.0, -1.0, 1.0];
        assert_eq!(cosine_similarity(&zero, &x), 0.0);

        let matrix = RatingMatrix::new(vec![zero.to_vec(), x.to_vec()]);
        assert_eq!(matrix.similarity(0, 1), 0.0);
        assert_eq!(matrix.similarity(0, 7), 0.0);
    }

    #[test]
    fn test_matrix_similarity_matches_free_function() {
        let rows = vec![vec![1.0, 1.0, 1.0, 0.0], vec![1.0, -1.0, 0.0, -1.0]];
        let matrix = RatingMatrix::new(rows.clone());
        let expected = cosine_similarity(&rows[0], &rows[1]);
        assert!((matrix.similarity(0, 1) - expected).abs() < 1e-6);
    }
}
