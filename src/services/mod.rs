pub mod loader;
pub mod matrix_builder;
pub mod recommender;

pub use loader::{load_ratings, read_ratings};
pub use matrix_builder::{build_matrix, BuilderConfig};
pub use recommender::Recommender;
