//! Identity and role resolution

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity reported by the server for a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_staff: bool,
}

/// Coarse authorization tier, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Annotator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Annotator => "annotator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Superuser wins over staff; everyone else annotates.
pub fn resolve_role(identity: &Identity) -> Role {
    if identity.is_superuser {
        Role::Admin
    } else if identity.is_staff {
        Role::Staff
    } else {
        Role::Annotator
    }
}

impl From<&Identity> for Role {
    fn from(identity: &Identity) -> Self {
        resolve_role(identity)
    }
}

/// Payload announced on the identity channel after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationChanged {
    pub authenticated: Role,
}
