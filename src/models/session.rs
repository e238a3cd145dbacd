use serde::{Deserialize, Serialize};

/// Role resolved from the credential table at login
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Visitor,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Visitor => "visitor",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "visitor" => Ok(UserRole::Visitor),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The signed-in user for this storage profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub display_name: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
