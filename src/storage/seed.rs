//! Demo data for a fresh installation

use crate::core::{CustomField, User, UserKind, TICKET_CATEGORY_KIND};
use crate::error::Result;
use crate::storage::{CategoryRepository, CustomFieldRepository, Database, UserRepository};
use chrono::Utc;
use serde::Serialize;

/// Credentials created by [`seed_demo_data`], echoed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct SeededUser {
    pub email: String,
    pub password: String,
    pub kind: UserKind,
}

const ADMIN_EMAIL: &str = "admin@helpdesk.local";
const CLIENT_EMAIL: &str = "client@helpdesk.local";

/// Create a team admin, a demo client user, an email-desk category and a
/// sample custom field
///
/// Safe to run more than once: users already present are left alone and
/// reported with an empty password.
pub async fn seed_demo_data(db: &Database) -> Result<Vec<SeededUser>> {
    let users = UserRepository::new(db.pool().clone());
    let categories = CategoryRepository::new(db.pool().clone());
    let custom_fields = CustomFieldRepository::new(db.pool().clone());

    let mut seeded = Vec::new();
    seeded.push(
        ensure_user(&users, ADMIN_EMAIL, "Admin", "User", UserKind::Team, None).await?,
    );
    seeded.push(
        ensure_user(
            &users,
            CLIENT_EMAIL,
            "Demo",
            "Client",
            UserKind::Client,
            Some(1),
        )
        .await?,
    );

    let has_email_desk = categories
        .of_kind(TICKET_CATEGORY_KIND)
        .await?
        .iter()
        .any(|c| c.name == "Email Desk");
    if !has_email_desk {
        categories
            .create(TICKET_CATEGORY_KIND, "Email Desk", true)
            .await?;
    }

    if custom_fields.enabled().await?.is_empty() {
        custom_fields
            .create(&CustomField {
                id: 0,
                name: "affected_device".to_string(),
                title: "Affected Device".to_string(),
                required: false,
                enabled: true,
                position: 1,
            })
            .await?;
    }

    Ok(seeded)
}

async fn ensure_user(
    users: &UserRepository,
    email: &str,
    first_name: &str,
    last_name: &str,
    kind: UserKind,
    client_id: Option<i64>,
) -> Result<SeededUser> {
    if users.by_email(email).await?.is_some() {
        return Ok(SeededUser {
            email: email.to_string(),
            password: String::new(),
            kind,
        });
    }

    let password = generate_password();
    let user = User {
        id: 0,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password_hash: bcrypt::hash(&password, bcrypt::DEFAULT_COST)?,
        kind,
        client_id,
        theme: "default".to_string(),
        created_at: Utc::now(),
    };
    users.create(&user).await?;

    Ok(SeededUser {
        email: email.to_string(),
        password,
        kind,
    })
}

fn generate_password() -> String {
    // First segment of a v4 uuid: random enough for a first login.
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(12)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_seed_creates_expected_records() {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();

        let seeded = seed_demo_data(&db).await.unwrap();
        assert_eq!(seeded.len(), 2);
        assert!(seeded.iter().all(|u| !u.password.is_empty()));

        let users = UserRepository::new(db.pool().clone());
        let admin = users.by_email(ADMIN_EMAIL).await.unwrap().unwrap();
        assert!(admin.is_team());
        assert!(bcrypt::verify(&seeded[0].password, &admin.password_hash).unwrap());

        let client = users.by_email(CLIENT_EMAIL).await.unwrap().unwrap();
        assert_eq!(client.client_id, Some(1));
    }

    #[tokio::test]
    async fn test_seed_twice_leaves_existing_users() {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();

        seed_demo_data(&db).await.unwrap();
        let second = seed_demo_data(&db).await.unwrap();
        assert!(second.iter().all(|u| u.password.is_empty()));

        let categories = CategoryRepository::new(db.pool().clone());
        let email_desks = categories
            .of_kind(TICKET_CATEGORY_KIND)
            .await
            .unwrap()
            .iter()
            .filter(|c| c.name == "Email Desk")
            .count();
        assert_eq!(email_desks, 1);
    }
}
