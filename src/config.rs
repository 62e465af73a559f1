use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    // Leave source
    pub source_path: Option<String>,
    pub skip_columns: usize,
    pub seed_sample_data: bool,
    pub max_upload_bytes: usize,
    pub source_cache_capacity: u64,
    pub source_cache_ttl_secs: u64,

    // Rate limiting
    pub rate_apply_per_min: u32,
    pub rate_upload_per_min: u32,
    pub rate_read_per_min: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            source_path: None,
            skip_columns: 3,
            seed_sample_data: false,
            max_upload_bytes: 10 * 1024 * 1024,
            source_cache_capacity: 16,
            source_cache_ttl_secs: 3600,
            rate_apply_per_min: 30,
            rate_upload_per_min: 10,
            rate_read_per_min: 1000,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),

            source_path: env::var("LEAVE_SOURCE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            skip_columns: env_or("SKIP_COLUMNS", defaults.skip_columns)?,
            seed_sample_data: env_or("SEED_SAMPLE_DATA", defaults.seed_sample_data)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            source_cache_capacity: env_or("SOURCE_CACHE_CAPACITY", defaults.source_cache_capacity)?,
            source_cache_ttl_secs: env_or("SOURCE_CACHE_TTL_SECS", defaults.source_cache_ttl_secs)?,

            rate_apply_per_min: env_or("RATE_APPLY_PER_MIN", defaults.rate_apply_per_min)?,
            rate_upload_per_min: env_or("RATE_UPLOAD_PER_MIN", defaults.rate_upload_per_min)?,
            rate_read_per_min: env_or("RATE_READ_PER_MIN", defaults.rate_read_per_min)?,
        })
    }
}
