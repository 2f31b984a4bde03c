pub mod matrix;
pub mod rating;
pub mod similarity;

use serde::Serialize;

pub use matrix::RatingMatrix;
pub use rating::{DuplicatePolicy, RatingRecord};
pub use similarity::SimilarityMatrix;

/// A product suggested for a user, with its similarity-weighted score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub product_id: String,
    pub score: f64,
}

/// Another user ranked by how closely their ratings match the queried user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub user_id: String,
    pub similarity: f64,
}
