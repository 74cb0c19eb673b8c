//! User repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::User;
use shared::client::UserCreate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All users, without password hashes on the wire
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY username")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find a user by id (with or without the table prefix)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// The password hash is written via a raw query because the model
    /// never serializes it.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    username = $username,
                    displayName = $display_name,
                    hashPass = $hash_pass,
                    role = $role,
                    isActive = true
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("display_name", display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
