//! Guest and administrator HTTP surface.
//!
//! Every route except `/health` sits behind the authorization gate from
//! `staykey-auth`: guests reach the key-code list and their dashboard, while
//! account, stay and key-code management is admin-only.

pub mod error;
pub mod models;
pub mod routes;

pub use error::{ApiError, ApiResult};
