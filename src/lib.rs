//! User-based collaborative filtering demo: a dense rating matrix, cosine
//! similarity between users, and similarity-weighted product recommendations
//! served as an interactive page and a small JSON API.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
