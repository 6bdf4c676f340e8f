use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub check_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists (for development)
        dotenvy::dotenv().ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid PORT value: {}", e))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./page_analyzer.db".to_string());

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid DB_MAX_CONNECTIONS value: {}", e))?;

        let check_timeout_ms: u64 = env::var("CHECK_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid CHECK_TIMEOUT_MS value: {}", e))?;

        Ok(Config {
            port,
            database_url,
            db_max_connections,
            check_timeout: Duration::from_millis(check_timeout_ms),
        })
    }

    /// In-memory sqlite databases live per connection, so the pool must not grow past one.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            check_timeout: Duration::from_millis(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn detects_in_memory_urls() {
        let mut config = Config::for_tests();
        assert!(config.is_in_memory());

        config.database_url = "sqlite:./page_analyzer.db".to_string();
        assert!(!config.is_in_memory());

        config.database_url = "sqlite:file:analyzer?mode=memory&cache=shared".to_string();
        assert!(config.is_in_memory());
    }

    #[test]
    #[serial]
    fn rejects_non_numeric_timeout() {
        let orig = env::var("CHECK_TIMEOUT_MS").ok();

        // SAFETY: env access is serialised across tests by `#[serial]`.
        unsafe { env::set_var("CHECK_TIMEOUT_MS", "abc") };
        let result = Config::from_env();

        unsafe {
            match orig {
                Some(value) => env::set_var("CHECK_TIMEOUT_MS", value),
                None => env::remove_var("CHECK_TIMEOUT_MS"),
            }
        }

        let err = result.unwrap_err();
        assert!(err.to_string().contains("CHECK_TIMEOUT_MS"));
    }
}
