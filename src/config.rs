use std::path::PathBuf;

use serde::Deserialize;

use crate::models::DuplicatePolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the ratings file (user_id, product_id, rating, timestamp)
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of most active users kept in the rating matrix
    #[serde(default = "default_max_users")]
    pub max_users: usize,

    /// Number of most rated products kept in the rating matrix
    #[serde(default = "default_max_products")]
    pub max_products: usize,

    /// Recommendation count used when a query does not ask for one
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// How repeated (user, product) ratings collapse into one cell
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_users() -> usize {
    10
}

fn default_max_products() -> usize {
    20
}

fn default_top_n() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.max_users == 0 {
            anyhow::bail!("MAX_USERS must be at least 1");
        }
        if self.max_products == 0 {
            anyhow::bail!("MAX_PRODUCTS must be at least 1");
        }
        if self.default_top_n == 0 {
            anyhow::bail!("DEFAULT_TOP_N must be at least 1");
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
