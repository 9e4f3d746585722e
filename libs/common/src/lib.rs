//! Common library for the StayKey application
//!
//! This crate provides shared functionality used across the StayKey
//! services: PostgreSQL connectivity, schema bootstrap and the persistence
//! error taxonomy.
//!
//! ```rust,no_run
//! use staykey_common::database::{DatabaseConfig, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
