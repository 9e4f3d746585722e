//! Process-wide configuration loaded once at startup

use anyhow::Result;
use std::net::SocketAddr;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Production,
}

impl AppEnvironment {
    /// Read `APP_ENV` (`production` or `development`, default `development`)
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV") {
            Ok(value) if value.eq_ignore_ascii_case("production") => AppEnvironment::Production,
            _ => AppEnvironment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == AppEnvironment::Production
    }
}

/// Which persistence implementation backs the stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub environment: AppEnvironment,
    pub bind_address: SocketAddr,
    pub storage: StorageBackend,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `APP_ENV`: `production` or `development` (default: development)
    /// - `BIND_ADDRESS`: Listener address (default: `default_bind`)
    /// - `STORAGE_BACKEND`: `postgres` or `memory` (default: postgres)
    pub fn from_env(default_bind: &str) -> Result<Self> {
        let environment = AppEnvironment::from_env();

        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| default_bind.to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid BIND_ADDRESS: {}", e))?;

        let storage = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "memory" if environment.is_production() => {
                anyhow::bail!("STORAGE_BACKEND=memory is not allowed in production")
            }
            "memory" => StorageBackend::Memory,
            other => anyhow::bail!("Unknown STORAGE_BACKEND: {}", other),
        };

        Ok(ServerConfig {
            environment,
            bind_address,
            storage,
        })
    }
}

/// Administrator account ensured at startup
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl AdminBootstrap {
    /// Read `ADMIN_EMAIL`, `ADMIN_PASSWORD` and `ADMIN_NAME`
    ///
    /// Returns `None` unless both email and password are set.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_EMAIL").ok()?;
        let password = std::env::var("ADMIN_PASSWORD").ok()?;
        let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());

        Some(AdminBootstrap {
            email,
            password,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        unsafe {
            std::env::remove_var("APP_ENV");
            std::env::remove_var("BIND_ADDRESS");
            std::env::remove_var("STORAGE_BACKEND");
            std::env::remove_var("ADMIN_EMAIL");
            std::env::remove_var("ADMIN_PASSWORD");
            std::env::remove_var("ADMIN_NAME");
        }
    }

    #[test]
    #[serial]
    fn defaults_to_development_and_postgres() {
        clear();

        let config = ServerConfig::from_env("0.0.0.0:3000").unwrap();
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.bind_address.port(), 3000);
    }

    #[test]
    #[serial]
    fn memory_storage_is_refused_in_production() {
        clear();
        unsafe {
            std::env::set_var("APP_ENV", "production");
            std::env::set_var("STORAGE_BACKEND", "memory");
        }

        assert!(ServerConfig::from_env("0.0.0.0:3000").is_err());

        unsafe {
            std::env::set_var("APP_ENV", "development");
        }
        let config = ServerConfig::from_env("0.0.0.0:3000").unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);

        clear();
    }

    #[test]
    #[serial]
    fn admin_bootstrap_requires_email_and_password() {
        clear();
        assert!(AdminBootstrap::from_env().is_none());

        unsafe {
            std::env::set_var("ADMIN_EMAIL", "host@example.com");
        }
        assert!(AdminBootstrap::from_env().is_none());

        unsafe {
            std::env::set_var("ADMIN_PASSWORD", "changeme-please");
        }
        let admin = AdminBootstrap::from_env().unwrap();
        assert_eq!(admin.email, "host@example.com");
        assert_eq!(admin.name, "Administrator");

        clear();
    }
}
