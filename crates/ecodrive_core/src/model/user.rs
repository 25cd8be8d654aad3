//! User accounts.
//!
//! # Invariants
//! - Email uniqueness is case-insensitive and enforced at registration only.
//! - `PublicUser` is the only user shape handed to callers or cached.

use super::{Entity, RecordId};
use crate::store::CollectionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Mechanic,
    #[default]
    User,
}

/// Persisted account record, including the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a `user`-role account with a generated id.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            role: Role::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn email_matches(&self, email: &str) -> bool {
        self.email.trim().to_lowercase() == email.trim().to_lowercase()
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser::from(self)
    }
}

impl Entity for User {
    const COLLECTION: CollectionKey = CollectionKey::Users;
    const NAME: &'static str = "user";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// User without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: RecordId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile fields a caller may change. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::{Role, User};

    #[test]
    fn new_user_defaults_to_user_role() {
        let user = User::new("Amina", "amina@example.com", "hash");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn email_match_ignores_case_and_padding() {
        let user = User::new("Amina", "Amina@Example.com", "hash");
        assert!(user.email_matches("amina@example.COM"));
        assert!(user.email_matches("  amina@example.com "));
        assert!(!user.email_matches("other@example.com"));
    }

    #[test]
    fn email_match_ignores_padding_on_stored_address() {
        let user = User::new("Amina", " amina@example.com\t", "hash");
        assert!(user.email_matches("amina@example.com"));
        assert!(user.email_matches("AMINA@example.com "));
    }

    #[test]
    fn public_user_serialization_has_no_password_hash() {
        let user = User::new("Amina", "amina@example.com", "secret-hash");
        let json = serde_json::to_value(user.to_public()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }
}
