//! User model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::Role;
use surrealdb::RecordId;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub username: String,
    pub display_name: String,
    /// Argon2 hash, never serialized out (persisted via raw query)
    #[serde(skip_serializing)]
    pub hash_pass: String,
    /// Exactly one role from the closed set
    pub role: Role,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Verify a password against the stored argon2 hash
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password with argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    /// The record id in "user:id" string form
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = User::hash_password("hunter2!").unwrap();
        let user = User {
            id: None,
            username: "maria".to_string(),
            display_name: "Maria".to_string(),
            hash_pass: hash,
            role: Role::Server,
            is_active: true,
        };

        assert!(user.verify_password("hunter2!").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_hash_never_serialized() {
        let user = User {
            id: None,
            username: "maria".to_string(),
            display_name: "Maria".to_string(),
            hash_pass: "secret-hash".to_string(),
            role: Role::Server,
            is_active: true,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
