use super::RatingMatrix;

/// Symmetric user×user cosine similarity, indexed by rating-matrix row.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes pairwise cosine similarity between every pair of user rows.
    ///
    /// A user whose row is all zeros is similar to nobody, itself included.
    pub fn from_ratings(ratings: &RatingMatrix) -> Self {
        let size = ratings.n_users();
        let norms: Vec<f64> = (0..size).map(|row| norm(ratings.row(row))).collect();
        let mut values = vec![0.0; size * size];

        for u in 0..size {
            for v in u..size {
                let similarity = if norms[u] == 0.0 || norms[v] == 0.0 {
                    0.0
                } else {
                    let cosine = dot(ratings.row(u), ratings.row(v)) / (norms[u] * norms[v]);
                    cosine.clamp(-1.0, 1.0)
                };
                values[u * size + v] = similarity;
                values[v * size + u] = similarity;
            }
        }

        // Rounding can leave a self-similarity a hair off one
        for u in 0..size {
            if norms[u] > 0.0 {
                values[u * size + u] = 1.0;
            }
        }

        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity between the users at rows `u` and `v`
    pub fn get(&self, u: usize, v: usize) -> f64 {
        self.values[u * self.size + v]
    }

    /// All similarities of the user at row `u`
    pub fn row(&self, u: usize) -> &[f64] {
        &self.values[u * self.size..(u + 1) * self.size]
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}
