//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::{RegisterInput, Role, User};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Tokens plus the profile they were issued for
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub user: User,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

/// User info from database, including the password hash
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: Role,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            is_active: row.is_active,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, is_active, last_login_at, created_at, updated_at";

/// Decode and validate an access token
pub fn decode_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

/// Revokes a live refresh token and returns its active owner. The row lock
/// makes a second concurrent claim of the same token see it revoked.
const CLAIM_REFRESH_TOKEN: &str = r#"
    WITH claimed AS (
        UPDATE refresh_tokens
        SET revoked_at = NOW()
        WHERE token_hash = $1
          AND revoked_at IS NULL
          AND expires_at > NOW()
        RETURNING user_id
    )
    SELECT u.id, u.name, u.email, u.password_hash, u.role, u.is_active,
           u.last_login_at, u.created_at, u.updated_at
    FROM claimed
    JOIN users u ON u.id = claimed.user_id
    WHERE u.is_active = true
"#;

/// SHA-256 hex digest of a refresh token, as stored
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new account; the very first account becomes admin
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();

        let existing = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = $1)",
        )
        .bind(&email)
        .fetch_one(&self.db)
        .await?;

        if existing {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES (
                $1, $2, $3,
                CASE WHEN EXISTS(SELECT 1 FROM users) THEN 'user'::user_role ELSE 'admin'::user_role END
            )
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::unique_or(e, "email"))?;

        tracing::info!(user_id = %row.id, role = %row.role, "User registered");

        self.start_session(row).await
    }

    /// Authenticate user with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = $1"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let user = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET last_login_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        self.start_session(user).await
    }

    /// Rotate a refresh token into a fresh token pair
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = hash_token(refresh_token);

        let user = sqlx::query_as::<_, UserRow>(CLAIM_REFRESH_TOKEN)
            .bind(&token_hash)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid or expired refresh token".to_string())
            })?;

        let tokens = self.generate_tokens(user.id, &user.name, user.role)?;
        self.store_refresh_token(user.id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Revoke a refresh token; unknown tokens are ignored
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        self.revoke(&hash_token(refresh_token)).await
    }

    async fn revoke(&self, token_hash: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn start_session(&self, row: UserRow) -> AppResult<AuthSession> {
        let tokens = self.generate_tokens(row.id, &row.name, row.role)?;
        self.store_refresh_token(row.id, &tokens.refresh_token)
            .await?;
        Ok(AuthSession {
            user: row.into(),
            tokens,
        })
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: Uuid, name: &str, role: Role) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let access_claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            role,
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Refresh token (simple random token)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Store refresh token in database
    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let token_hash = hash_token(token);
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
