//! Authentication core for the staykey property-management service.
//!
//! Holds everything both HTTP services need to agree on: credential hashing,
//! signed session tokens carried in cookies, resolution of the current account,
//! the authenticated/admin gate, and the rules deciding which stays and key
//! codes a guest may see.
//!
//! Persistence sits behind the traits in [`repositories`]; [`repositories::PgStore`]
//! backs them with Postgres and [`repositories::InMemoryStore`] with process
//! memory.

pub mod bootstrap;
pub mod config;
pub mod cookies;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;
pub mod validation;
pub mod visibility;

pub use error::{AuthError, AuthResult};
pub use state::AppState;
