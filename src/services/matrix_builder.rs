use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::{
    error::{AppError, AppResult},
    models::{DuplicatePolicy, RatingMatrix, RatingRecord},
};

/// Limits applied while turning raw ratings into a rating matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuilderConfig {
    pub max_users: usize,
    pub max_products: usize,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_users: 10,
            max_products: 20,
            duplicate_policy: DuplicatePolicy::Mean,
        }
    }
}

/// Every rating seen for one (user, product) pair, in input order
#[derive(Debug, Default)]
struct Cell {
    ratings: Vec<f64>,
}

impl Cell {
    fn collapse(&self, policy: DuplicatePolicy) -> f64 {
        match policy {
            DuplicatePolicy::Mean => self.ratings.iter().sum::<f64>() / self.ratings.len() as f64,
            DuplicatePolicy::Last => self.ratings.last().copied().unwrap_or(0.0),
        }
    }
}

/// Builds a dense rating matrix from the most active users and most rated products.
///
/// Users and products are ranked by how many records mention them; equal counts
/// keep the order in which the ids first appear. Rows and columns of the result
/// are sorted by id.
pub fn build_matrix(records: &[RatingRecord], config: &BuilderConfig) -> AppResult<RatingMatrix> {
    let top_users: HashSet<&str> =
        most_frequent(records.iter().map(|r| r.user_id.as_str()), config.max_users)
            .into_iter()
            .collect();
    let top_products: HashSet<&str> = most_frequent(
        records.iter().map(|r| r.product_id.as_str()),
        config.max_products,
    )
    .into_iter()
    .collect();

    let mut cells: BTreeMap<(&str, &str), Cell> = BTreeMap::new();
    for record in records {
        let user_id = record.user_id.as_str();
        let product_id = record.product_id.as_str();
        if top_users.contains(user_id) && top_products.contains(product_id) {
            cells
                .entry((user_id, product_id))
                .or_default()
                .ratings
                .push(record.rating);
        }
    }

    let users: BTreeSet<&str> = cells.keys().map(|(u, _)| *u).collect();
    let products: BTreeSet<&str> = cells.keys().map(|(_, p)| *p).collect();
    if users.is_empty() || products.is_empty() {
        return Err(AppError::EmptyData(format!(
            "{} records left no users or products after keeping the top {} users and top {} products",
            records.len(),
            config.max_users,
            config.max_products
        )));
    }

    let rows: HashMap<&str, usize> = users.iter().enumerate().map(|(i, u)| (*u, i)).collect();
    let columns: HashMap<&str, usize> = products.iter().enumerate().map(|(i, p)| (*p, i)).collect();
    let width = products.len();
    let mut values = vec![0.0; users.len() * width];
    for ((user_id, product_id), cell) in &cells {
        values[rows[user_id] * width + columns[product_id]] = cell.collapse(config.duplicate_policy);
    }

    tracing::info!(
        records = records.len(),
        users = users.len(),
        products = width,
        filled_cells = cells.len(),
        policy = %config.duplicate_policy,
        "Built rating matrix"
    );

    RatingMatrix::new(
        users.into_iter().map(str::to_string).collect(),
        products.into_iter().map(str::to_string).collect(),
        values,
    )
}

/// The `limit` most frequent ids, most frequent first.
///
/// Ties keep first-appearance order.
fn most_frequent<I, T>(ids: I, limit: usize) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Copy,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut first_seen: Vec<T> = Vec::new();
    for id in ids {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            first_seen.push(id);
        }
        *count += 1;
    }

    // sort_by is stable, so equal counts stay in first-seen order
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen.truncate(limit);
    first_seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user: &str, product: &str, rating: f64) -> RatingRecord {
        RatingRecord::new(user, product, rating, "0")
    }

    fn config(max_users: usize, max_products: usize) -> BuilderConfig {
        BuilderConfig {
            max_users,
            max_products,
            ..BuilderConfig::default()
        }
    }

    #[test]
    fn test_most_frequent_breaks_ties_by_first_appearance() {
        let ids = ["b", "a", "c", "a", "c", "d"];
        assert_eq!(most_frequent(ids, 3), vec!["a", "c", "b"]);
        assert_eq!(most_frequent(ids, 10), vec!["a", "c", "b", "d"]);
        assert!(most_frequent(ids, 0).is_empty());
    }

    #[test]
    fn test_dense_sorted_matrix() {
        let records = vec![
            record("B", "P2", 5.0),
            record("A", "P1", 5.0),
            record("A", "P2", 3.0),
            record("B", "P1", 4.0),
            record("B", "P3", 2.0),
        ];
        let matrix = build_matrix(&records, &BuilderConfig::default()).unwrap();

        assert_eq!(matrix.users(), &["A", "B"]);
        assert_eq!(matrix.products(), &["P1", "P2", "P3"]);
        assert_eq!(matrix.row(0), &[5.0, 3.0, 0.0]);
        assert_eq!(matrix.row(1), &[4.0, 5.0, 2.0]);
    }

    #[test]
    fn test_keeps_only_top_users_and_products() {
        let records = vec![
            record("heavy", "popular", 5.0),
            record("heavy", "niche", 4.0),
            record("heavy", "other", 1.0),
            record("medium", "popular", 3.0),
            record("light", "popular", 1.0),
        ];
        let matrix = build_matrix(&records, &config(2, 2)).unwrap();

        // "medium" and "light" tie, as do "niche" and "other"; the earlier id wins
        assert_eq!(matrix.users(), &["heavy", "medium"]);
        assert_eq!(matrix.products(), &["niche", "popular"]);
        assert_eq!(matrix.row(1), &[0.0, 3.0]);
    }

    #[test]
    fn test_selected_user_without_surviving_ratings_is_dropped() {
        let records = vec![
            record("A", "P1", 5.0),
            record("A", "P1", 4.0),
            record("B", "P2", 1.0),
        ];
        let matrix = build_matrix(&records, &config(2, 1)).unwrap();
        assert_eq!(matrix.users(), &["A"]);
        assert_eq!(matrix.products(), &["P1"]);
    }

    #[test]
    fn test_zero_valued_ratings_produce_all_zero_row() {
        let records = vec![
            record("A", "P1", 5.0),
            record("Z", "P1", 0.0),
            record("A", "P2", 2.0),
        ];
        let matrix = build_matrix(&records, &BuilderConfig::default()).unwrap();
        assert_eq!(matrix.users(), &["A", "Z"]);
        assert_eq!(matrix.row(1), &[0.0, 0.0]);
    }

    #[test]
    fn test_duplicates_collapse_to_mean() {
        let records = vec![
            record("A", "P1", 2.0),
            record("A", "P1", 5.0),
            record("A", "P1", 5.0),
        ];
        let matrix = build_matrix(&records, &BuilderConfig::default()).unwrap();
        assert_eq!(matrix.rating("A", "P1"), 4.0);
    }

    #[test]
    fn test_duplicates_collapse_to_last() {
        let records = vec![record("A", "P1", 2.0), record("A", "P1", 5.0), record("A", "P1", 3.0)];
        let config = BuilderConfig {
            duplicate_policy: DuplicatePolicy::Last,
            ..BuilderConfig::default()
        };
        let matrix = build_matrix(&records, &config).unwrap();
        assert_eq!(matrix.rating("A", "P1"), 3.0);
    }

    #[test]
    fn test_empty_input_is_empty_data() {
        assert!(matches!(
            build_matrix(&[], &BuilderConfig::default()),
            Err(AppError::EmptyData(_))
        ));
    }

    #[test]
    fn test_filtering_to_nothing_is_empty_data() {
        // The most active user never rated the most rated product
        let records = vec![
            record("A", "P2", 1.0),
            record("A", "P3", 1.0),
            record("B", "P1", 1.0),
            record("C", "P1", 1.0),
            record("D", "P1", 1.0),
        ];
        assert!(matches!(
            build_matrix(&records, &config(1, 1)),
            Err(AppError::EmptyData(_))
        ));
    }

    #[test]
    fn test_input_is_untouched() {
        let records = vec![record("B", "P1", 1.0), record("A", "P1", 2.0)];
        let before = records.clone();
        build_matrix(&records, &BuilderConfig::default()).unwrap();
        assert_eq!(records, before);
    }
}
