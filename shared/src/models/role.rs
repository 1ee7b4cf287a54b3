//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator role (员工角色)
///
/// Unknown role names coming from the backend map to [`Role::Unknown`],
/// which every permission check denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Superadmin,
    Admin,
    Cashier,
    Kitchen,
    Deliveryman,
    Unknown,
}

impl Role {
    /// Parse a role name (case-insensitive)
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "superadmin" => Self::Superadmin,
            "admin" => Self::Admin,
            "cashier" => Self::Cashier,
            "kitchen" => Self::Kitchen,
            "deliveryman" => Self::Deliveryman,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "Superadmin",
            Self::Admin => "Admin",
            Self::Cashier => "Cashier",
            Self::Kitchen => "Kitchen",
            Self::Deliveryman => "Deliveryman",
            Self::Unknown => "Unknown",
        }
    }

    /// Display label for the UI
    pub fn label(&self) -> &'static str {
        match self {
            Self::Superadmin => "Superadministrador",
            Self::Admin => "Administrador",
            Self::Cashier => "Cajero",
            Self::Kitchen => "Cocina",
            Self::Deliveryman => "Domiciliario",
            Self::Unknown => "Desconocido",
        }
    }

    /// Superadmin is exempt from the same-day restriction everywhere
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Self::Superadmin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
