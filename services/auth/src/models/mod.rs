//! Domain models

pub mod account;
pub mod apartment;
pub mod key_code;
pub mod role;
pub mod stay;

// Re-export for convenience
pub use account::{Account, LoginCredentials, NewAccount, UpdateAccount};
pub use apartment::{Apartment, NewApartment, UpdateApartment};
pub use key_code::{KeyCode, NewKeyCode, UpdateKeyCode};
pub use role::Role;
pub use stay::{NewStay, Stay};
