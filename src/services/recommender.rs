use std::cmp::Ordering;

use crate::{
    error::{AppError, AppResult},
    models::{Neighbor, RatingMatrix, Recommendation, SimilarityMatrix},
};

/// User-based collaborative filtering over a fixed rating matrix.
///
/// Similarities are computed once in [`Recommender::new`]; every query after
/// that only reads the two matrices.
#[derive(Debug, Clone)]
pub struct Recommender {
    ratings: RatingMatrix,
    similarity: SimilarityMatrix,
}

impl Recommender {
    /// Creates a recommender, precomputing user-to-user cosine similarity
    pub fn new(ratings: RatingMatrix) -> Self {
        let similarity = SimilarityMatrix::from_ratings(&ratings);
        tracing::debug!(users = similarity.size(), "Computed user similarity matrix");
        Self {
            ratings,
            similarity,
        }
    }

    #[cfg(test)]
    fn ratings(&self) -> &RatingMatrix {
        &self.ratings
    }

    #[cfg(test)]
    fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Users that can be queried, in matrix order
    pub fn list_users(&self) -> &[String] {
        self.ratings.users()
    }

    /// Every other user, most similar first. Equal similarities keep matrix order.
    pub fn neighbors(&self, user_id: &str) -> AppResult<Vec<Neighbor>> {
        let row = self.row_of(user_id)?;
        Ok(self
            .neighbor_rows(row)
            .into_iter()
            .map(|(other, similarity)| Neighbor {
                user_id: self.ratings.users()[other].clone(),
                similarity,
            })
            .collect())
    }

    /// Up to `top_n` product ids the user has not rated, best first
    pub fn recommend(&self, user_id: &str, top_n: usize) -> AppResult<Vec<String>> {
        Ok(self
            .recommend_scored(user_id, top_n)?
            .into_iter()
            .map(|r| r.product_id)
            .collect())
    }

    /// Same as [`Recommender::recommend`], keeping each product's weighted score.
    ///
    /// A product's score is the sum over all other users of their rating times
    /// their similarity to `user_id`, whatever its sign. Every product the user
    /// has not rated is a candidate. A user with no neighbors, or with zero
    /// similarity to all of them, gets an empty list.
    pub fn recommend_scored(&self, user_id: &str, top_n: usize) -> AppResult<Vec<Recommendation>> {
        let row = self.row_of(user_id)?;

        let neighbors = self.neighbor_rows(row);
        if neighbors.iter().all(|(_, similarity)| *similarity == 0.0) {
            tracing::debug!(user_id, "No similar users to weight by");
            return Ok(Vec::new());
        }

        let mut scores = vec![0.0; self.ratings.n_products()];
        for (other, similarity) in neighbors {
            for (score, rating) in scores.iter_mut().zip(self.ratings.row(other)) {
                *score += rating * similarity;
            }
        }

        let own = self.ratings.row(row);
        let mut candidates: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(col, _)| own[*col] <= 0.0)
            .collect();
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        candidates.truncate(top_n);

        tracing::debug!(
            user_id,
            top_n,
            returned = candidates.len(),
            "Scored recommendations"
        );

        Ok(candidates
            .into_iter()
            .map(|(col, score)| Recommendation {
                product_id: self.ratings.products()[col].clone(),
                score,
            })
            .collect())
    }

    fn row_of(&self, user_id: &str) -> AppResult<usize> {
        self.ratings
            .user_row(user_id)
            .ok_or_else(|| AppError::UnknownUser(user_id.to_string()))
    }

    fn neighbor_rows(&self, row: usize) -> Vec<(usize, f64)> {
        let mut neighbors: Vec<(usize, f64)> = self
            .similarity
            .row(row)
            .iter()
            .copied()
            .enumerate()
            .filter(|(other, _)| *other != row)
            .collect();
        neighbors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn recommender(users: &[&str], products: &[&str], rows: Vec<Vec<f64>>) -> Recommender {
        Recommender::new(RatingMatrix::from_rows(ids(users), ids(products), rows).unwrap())
    }

    /// A, B and C over P1..P3 from the worked example
    fn abc() -> Recommender {
        recommender(
            &["A", "B", "C"],
            &["P1", "P2", "P3"],
            vec![
                vec![5.0, 3.0, 0.0],
                vec![4.0, 5.0, 2.0],
                vec![0.0, 1.0, 5.0],
            ],
        )
    }

    #[test]
    fn test_worked_example() {
        let rec = abc();
        let sim = rec.similarity();
        assert!(sim.get(0, 1) > sim.get(0, 2));

        for n in 1..=5 {
            assert_eq!(rec.recommend("A", n).unwrap(), vec!["P3"]);
        }
    }

    #[test]
    fn test_neighbors_ordered_by_similarity() {
        let rec = abc();
        let neighbors = rec.neighbors("A").unwrap();
        let names: Vec<&str> = neighbors.iter().map(|n| n.user_id.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert!(neighbors[0].similarity >= neighbors[1].similarity);
    }

    #[test]
    fn test_score_is_similarity_weighted_sum() {
        let rec = abc();
        let sim = rec.similarity();
        let expected = 2.0 * sim.get(0, 1) + 5.0 * sim.get(0, 2);
        let scored = rec.recommend_scored("A", 5).unwrap();
        assert_eq!(scored.len(), 1);
        assert!((scored[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ranking_and_truncation() {
        let rec = recommender(
            &["me", "twin", "other"],
            &["a", "b", "c", "d"],
            vec![
                vec![5.0, 0.0, 0.0, 0.0],
                vec![5.0, 4.0, 1.0, 0.0],
                vec![0.0, 0.0, 2.0, 5.0],
            ],
        );
        let all = rec.recommend("me", 10).unwrap();
        // "other" shares nothing with "me", so "d" trails with a zero score
        assert_eq!(all, vec!["b", "c", "d"]);
        assert_eq!(rec.recommend("me", 1).unwrap(), vec!["b"]);
        assert!(rec.recommend("me", 0).unwrap().is_empty());
    }

    #[test]
    fn test_never_recommends_rated_products() {
        let rec = abc();
        for user in ["A", "B", "C"] {
            let rated = rec.ratings().rated_products(user).unwrap();
            let recommended = rec.recommend(user, 10).unwrap();
            assert!(recommended.iter().all(|p| !rated.contains(&p.as_str())));
            assert!(recommended.len() <= rec.ratings().n_products() - rated.len());
        }
    }

    #[test]
    fn test_user_who_rated_everything_gets_nothing() {
        assert!(abc().recommend("B", 5).unwrap().is_empty());
    }

    #[test]
    fn test_single_user_gets_nothing() {
        let rec = recommender(&["solo"], &["P1", "P2"], vec![vec![4.0, 0.0]]);
        assert!(rec.recommend("solo", 5).unwrap().is_empty());
        assert!(rec.neighbors("solo").unwrap().is_empty());
    }

    #[test]
    fn test_all_zero_user_gets_nothing() {
        let rec = recommender(
            &["A", "B", "Z"],
            &["P1", "P2"],
            vec![vec![5.0, 0.0], vec![3.0, 4.0], vec![0.0, 0.0]],
        );
        let neighbors = rec.neighbors("Z").unwrap();
        assert!(neighbors.iter().all(|n| n.similarity == 0.0));
        assert!(rec.recommend("Z", 5).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_user() {
        let rec = abc();
        assert!(matches!(
            rec.recommend("nonexistent_user", 5),
            Err(AppError::UnknownUser(u)) if u == "nonexistent_user"
        ));
        assert!(matches!(rec.neighbors("ghost"), Err(AppError::UnknownUser(_))));
    }

    #[test]
    fn test_deterministic() {
        let rec = abc();
        assert_eq!(rec.recommend("C", 5).unwrap(), rec.recommend("C", 5).unwrap());
    }

    #[test]
    fn test_negative_scores_rank_last() {
        let rec = recommender(
            &["me", "peer", "anti"],
            &["x", "y", "z"],
            vec![
                vec![2.0, 0.0, 0.0],
                vec![2.0, 3.0, 0.0],
                vec![-2.0, 0.0, 5.0],
            ],
        );
        assert!(rec.similarity().get(0, 2) < 0.0);

        let scored = rec.recommend_scored("me", 5).unwrap();
        let names: Vec<&str> = scored.iter().map(|r| r.product_id.as_str()).collect();
        assert_eq!(names, vec!["y", "z"]);
        assert!(scored[0].score > 0.0);
        assert!(scored[1].score < 0.0);
    }

    #[test]
    fn test_ties_keep_column_order() {
        let rec = recommender(
            &["me", "peer"],
            &["x", "y", "z"],
            vec![vec![1.0, 0.0, 0.0], vec![1.0, 2.0, 2.0]],
        );
        assert_eq!(rec.recommend("me", 5).unwrap(), vec!["y", "z"]);
    }
}
