//! Account role

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account. Exactly two values exist.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Client,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Client => "CLIENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"CLIENT\"");
    }

    #[test]
    fn rejects_unknown_roles() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
        assert!(serde_json::from_str::<Role>("\"OWNER\"").is_err());
        assert_eq!(serde_json::from_str::<Role>("\"CLIENT\"").unwrap(), Role::Client);
    }

    #[test]
    fn only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Client.is_admin());
        assert_eq!(Role::default(), Role::Client);
    }
}
