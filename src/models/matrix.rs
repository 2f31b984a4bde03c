use std::collections::{HashMap, HashSet};

use crate::error::{AppError, AppResult};

/// Dense user×product rating table.
///
/// Rows are users, columns are products, values are stored row-major. A zero
/// cell means the user has no observed rating for that product.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    users: Vec<String>,
    products: Vec<String>,
    values: Vec<f64>,
    user_rows: HashMap<String, usize>,
}

impl RatingMatrix {
    /// Creates a matrix from row/column ids and row-major values
    pub fn new(users: Vec<String>, products: Vec<String>, values: Vec<f64>) -> AppResult<Self> {
        if users.is_empty() || products.is_empty() {
            return Err(AppError::EmptyData(format!(
                "rating matrix needs at least one user and one product, got {} users and {} products",
                users.len(),
                products.len()
            )));
        }
        if values.len() != users.len() * products.len() {
            return Err(AppError::InvalidInput(format!(
                "expected {} ratings for a {}x{} matrix, got {}",
                users.len() * products.len(),
                users.len(),
                products.len(),
                values.len()
            )));
        }

        let mut user_rows = HashMap::with_capacity(users.len());
        for (row, user_id) in users.iter().enumerate() {
            if user_rows.insert(user_id.clone(), row).is_some() {
                return Err(AppError::InvalidInput(format!("duplicate user id '{}'", user_id)));
            }
        }

        let mut seen_products = HashSet::with_capacity(products.len());
        for product_id in &products {
            if !seen_products.insert(product_id.as_str()) {
                return Err(AppError::InvalidInput(format!(
                    "duplicate product id '{}'",
                    product_id
                )));
            }
        }

        Ok(Self {
            users,
            products,
            values,
            user_rows,
        })
    }

    /// Builds a matrix from nested rows, mostly useful for fixtures
    pub fn from_rows(
        users: Vec<String>,
        products: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> AppResult<Self> {
        if rows.len() != users.len() || rows.iter().any(|r| r.len() != products.len()) {
            return Err(AppError::InvalidInput(
                "every row must have one rating per product".to_string(),
            ));
        }
        let values = rows.into_iter().flatten().collect();
        Self::new(users, products, values)
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_products(&self) -> usize {
        self.products.len()
    }

    /// Row index of a user, if present
    pub fn user_row(&self, user_id: &str) -> Option<usize> {
        self.user_rows.get(user_id).copied()
    }

    /// Ratings of the user at `row`, one per product column
    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.products.len();
        &self.values[row * width..(row + 1) * width]
    }

    /// Rating of a (user, product) pair; zero when unrated or unknown
    #[cfg(test)]
    pub fn rating(&self, user_id: &str, product_id: &str) -> f64 {
        let Some(row) = self.user_row(user_id) else {
            return 0.0;
        };
        self.products
            .iter()
            .position(|p| p == product_id)
            .map(|col| self.row(row)[col])
            .unwrap_or(0.0)
    }

    /// Products the user has a positive rating for, in column order
    pub fn rated_products(&self, user_id: &str) -> AppResult<Vec<&str>> {
        let row = self
            .user_row(user_id)
            .ok_or_else(|| AppError::UnknownUser(user_id.to_string()))?;
        Ok(self
            .row(row)
            .iter()
            .zip(&self.products)
            .filter(|(rating, _)| **rating > 0.0)
            .map(|(_, product_id)| product_id.as_str())
            .collect())
    }
}
