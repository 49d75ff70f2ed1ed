//! User and session table access

use crate::core::{User, UserKind};
use crate::error::Result;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

/// Repository for user rows
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user and return their id
    pub async fn create(&self, user: &User) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password_hash, kind, \
             client_id, theme, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.kind)
        .bind(user.client_id)
        .bind(&user.theme)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Load a user if they exist
    pub async fn by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Look a user up by email (login)
    pub async fn by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Every team member, the fan-out audience for client actions
    pub async fn team_members(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE kind = ? ORDER BY first_name, last_name",
        )
        .bind(UserKind::Team)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Users belonging to one client account, the fan-out audience for
    /// team actions
    pub async fn client_users(&self, client_id: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE kind = ? AND client_id = ? \
             ORDER BY first_name, last_name",
        )
        .bind(UserKind::Client)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// All client users, for the create-ticket form's client picker
    pub async fn all_client_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE kind = ? ORDER BY first_name, last_name",
        )
        .bind(UserKind::Client)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Reset every user's theme preference to the given theme
    pub async fn reset_all_themes(&self, theme: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET theme = ?")
            .bind(theme)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Repository for login sessions
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a session for the user and return its token
    pub async fn create(&self, user_id: i64) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(token)
    }

    /// Resolve a session token to its user
    pub async fn user_for_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.* FROM users u JOIN sessions s ON s.user_id = u.id WHERE s.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Delete a session (logout)
    pub async fn delete(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, UserRepository, SessionRepository) {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();
        (
            dir,
            UserRepository::new(db.pool().clone()),
            SessionRepository::new(db.pool().clone()),
        )
    }

    fn sample(email: &str, kind: UserKind, client_id: Option<i64>) -> User {
        User {
            id: 0,
            first_name: "Alex".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            kind,
            client_id,
            theme: "default".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_lookup_by_email() {
        let (_dir, users, _) = setup().await;

        users
            .create(&sample("agent@example.com", UserKind::Team, None))
            .await
            .unwrap();

        let found = users.by_email("agent@example.com").await.unwrap().unwrap();
        assert!(found.is_team());
        assert!(users.by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_audiences_split_by_kind_and_client() {
        let (_dir, users, _) = setup().await;

        users
            .create(&sample("agent@example.com", UserKind::Team, None))
            .await
            .unwrap();
        users
            .create(&sample("one@client.com", UserKind::Client, Some(1)))
            .await
            .unwrap();
        users
            .create(&sample("two@client.com", UserKind::Client, Some(2)))
            .await
            .unwrap();

        assert_eq!(users.team_members().await.unwrap().len(), 1);
        assert_eq!(users.client_users(1).await.unwrap().len(), 1);
        assert_eq!(users.all_client_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_all_themes() {
        let (_dir, users, _) = setup().await;

        let mut user = sample("agent@example.com", UserKind::Team, None);
        user.theme = "midnight".to_string();
        users.create(&user).await.unwrap();

        let changed = users.reset_all_themes("default").await.unwrap();
        assert_eq!(changed, 1);

        let reloaded = users.by_email("agent@example.com").await.unwrap().unwrap();
        assert_eq!(reloaded.theme, "default");
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let (_dir, users, sessions) = setup().await;

        let user_id = users
            .create(&sample("agent@example.com", UserKind::Team, None))
            .await
            .unwrap();

        let token = sessions.create(user_id).await.unwrap();
        let resolved = sessions.user_for_token(&token).await.unwrap().unwrap();
        assert_eq!(resolved.id, user_id);

        sessions.delete(&token).await.unwrap();
        assert!(sessions.user_for_token(&token).await.unwrap().is_none());
    }
}
