//! User administration service

use shared::{UpdateUserInput, User};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// User administration service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

const USER_COLUMNS: &str =
    "id, name, email, role, is_active, last_login_at, created_at, updated_at";

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all accounts, newest first
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    /// Get one account
    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Change role or active flag; `acting_user` cannot demote or disable themself
    pub async fn update(
        &self,
        acting_user: Uuid,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> AppResult<User> {
        check_self_update(acting_user, user_id, &input)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET role = COALESCE($2, role),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.role)
        .bind(input.is_active)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        if input.is_active == Some(false) {
            sqlx::query(
                "UPDATE refresh_tokens SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
            )
            .bind(user_id)
            .execute(&self.db)
            .await?;
        }

        tracing::info!(%user_id, role = %user.role, is_active = user.is_active, "User updated");

        Ok(user)
    }
}

fn check_self_update(acting_user: Uuid, user_id: Uuid, input: &UpdateUserInput) -> AppResult<()> {
    if acting_user != user_id {
        return Ok(());
    }
    if matches!(input.role, Some(role) if !role.is_admin()) {
        return Err(AppError::validation("role", "You cannot change your own role"));
    }
    if input.is_active == Some(false) {
        return Err(AppError::validation(
            "is_active",
            "You cannot deactivate your own account",
        ));
    }
    Ok(())
}
