use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One observed rating from the source data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: String,
    pub product_id: String,
    pub rating: f64,
    /// Carried through from the source file; never interpreted
    pub timestamp: String,
}

impl RatingRecord {
    pub fn new(
        user_id: impl Into<String>,
        product_id: impl Into<String>,
        rating: f64,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            product_id: product_id.into(),
            rating,
            timestamp: timestamp.into(),
        }
    }
}

/// How repeated ratings of the same product by the same user collapse into one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Arithmetic mean of every rating seen for the pair
    #[default]
    Mean,
    /// The rating appearing last in the input
    Last,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(DuplicatePolicy::Mean),
            "last" => Ok(DuplicatePolicy::Last),
            other => Err(format!(
                "unknown duplicate policy '{}', expected 'mean' or 'last'",
                other
            )),
        }
    }
}

impl TryFrom<String> for DuplicatePolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::Mean => write!(f, "mean"),
            DuplicatePolicy::Last => write!(f, "last"),
        }
    }
}
