//! User roles and the capabilities attached to them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backend role token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin,
    Office,
    Agent,
    User,
    /// Any token this console does not know about (e.g. `ROLE_SUPER_ADMIN`).
    /// The token is kept so saving a user writes it back unchanged.
    Unknown(String),
}

/// What the console lets a role do or how it presents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Can be granted from the user create/edit forms.
    Assignable,
    /// Rendered as a badge in user listings.
    ShownAsBadge,
}

/// Visual tone of a role badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Error,
    Warning,
    Info,
    Default,
}

impl Role {
    /// Roles offered by the user forms, in display order.
    pub const ASSIGNABLE: [Role; 3] = [Role::Admin, Role::Office, Role::Agent];

    pub fn from_token(token: &str) -> Self {
        match token {
            "ROLE_ADMIN" => Role::Admin,
            "ROLE_OFFICE" => Role::Office,
            "ROLE_AGENT" => Role::Agent,
            "ROLE_USER" => Role::User,
            other => Role::Unknown(other.to_string()),
        }
    }

    /// Wire token.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Office => "ROLE_OFFICE",
            Role::Agent => "ROLE_AGENT",
            Role::User => "ROLE_USER",
            Role::Unknown(token) => token,
        }
    }

    /// Human-readable name. Unknown roles show their raw token.
    pub fn label(&self) -> &str {
        match self {
            Role::Admin => "Administrator",
            Role::Office => "Office",
            Role::Agent => "Agent",
            Role::User => "User",
            Role::Unknown(token) => token,
        }
    }

    pub fn badge_tone(&self) -> BadgeTone {
        match self {
            Role::Admin => BadgeTone::Error,
            Role::Office => BadgeTone::Warning,
            Role::Agent => BadgeTone::Info,
            Role::User | Role::Unknown(_) => BadgeTone::Default,
        }
    }

    /// Capability check used by views instead of comparing role strings.
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Assignable => matches!(self, Role::Admin | Role::Office | Role::Agent),
            Capability::ShownAsBadge => !matches!(self, Role::User),
        }
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(Role::from_token(&token))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles to render as badges, in the order the backend sent them.
pub fn badge_roles(roles: &[Role]) -> Vec<Role> {
    roles
        .iter()
        .filter(|r| r.has(Capability::ShownAsBadge))
        .cloned()
        .collect()
}

/// Toggle `role` in `roles`, preserving the order of the others.
pub fn toggle_role(roles: &mut Vec<Role>, role: Role) {
    if let Some(pos) = roles.iter().position(|r| *r == role) {
        roles.remove(pos);
    } else {
        roles.push(role);
    }
}
