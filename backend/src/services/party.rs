//! Supplier and customer master service

use serde::Deserialize;
use shared::{CreatePartyInput, Pagination, Party, PartyKind, UpdatePartyInput};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::like_pattern;
use crate::error::{AppError, AppResult};

/// Supplier / customer service; `kind` selects the table
#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
    kind: PartyKind,
}

/// Query filters for listing suppliers or customers
#[derive(Debug, Default, Deserialize)]
pub struct PartyFilter {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

const PARTY_COLUMNS: &str =
    "id, name, contact_person, email, phone, address, is_active, created_at, updated_at";

const PARTY_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR name ILIKE $1 OR contact_person ILIKE $1)
      AND ($2::bool IS NULL OR is_active = $2)
"#;

impl PartyService {
    /// Create a new PartyService instance
    pub fn new(db: PgPool, kind: PartyKind) -> Self {
        Self { db, kind }
    }

    /// List parties ordered by name
    pub async fn list(&self, filter: &PartyFilter) -> AppResult<(Vec<Party>, u64, Pagination)> {
        let pagination = Pagination::from_query(filter.page, filter.limit);
        let search = filter.search.as_deref().and_then(like_pattern);
        let table = self.kind.table();

        let parties = sqlx::query_as::<_, Party>(&format!(
            "SELECT {PARTY_COLUMNS} FROM {table} {PARTY_FILTER} ORDER BY name ASC LIMIT $3 OFFSET $4"
        ))
        .bind(&search)
        .bind(filter.is_active)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {table} {PARTY_FILTER}"
        ))
        .bind(&search)
        .bind(filter.is_active)
        .fetch_one(&self.db)
        .await?;

        Ok((parties, total as u64, pagination))
    }

    /// Get one party
    pub async fn get(&self, party_id: Uuid) -> AppResult<Party> {
        sqlx::query_as::<_, Party>(&format!(
            "SELECT {PARTY_COLUMNS} FROM {} WHERE id = $1",
            self.kind.table()
        ))
        .bind(party_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(self.kind.label().to_string()))
    }

    /// Create a party
    pub async fn create(&self, input: CreatePartyInput) -> AppResult<Party> {
        input.validate()?;

        let party = sqlx::query_as::<_, Party>(&format!(
            r#"
            INSERT INTO {} (name, contact_person, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PARTY_COLUMNS}
            "#,
            self.kind.table()
        ))
        .bind(input.name.trim())
        .bind(&input.contact_person)
        .bind(input.email.as_deref().map(str::to_lowercase))
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::unique_or(e, "name"))?;

        tracing::info!(kind = self.kind.label(), id = %party.id, name = %party.name, "Party created");
        Ok(party)
    }

    /// Update party details
    pub async fn update(&self, party_id: Uuid, input: UpdatePartyInput) -> AppResult<Party> {
        input.validate()?;

        let party = sqlx::query_as::<_, Party>(&format!(
            r#"
            UPDATE {}
            SET name = COALESCE($2, name),
                contact_person = COALESCE($3, contact_person),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PARTY_COLUMNS}
            "#,
            self.kind.table()
        ))
        .bind(party_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.contact_person)
        .bind(input.email.as_deref().map(str::to_lowercase))
        .bind(&input.phone)
        .bind(&input.address)
        .bind(input.is_active)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::unique_or(e, "name"))?
        .ok_or_else(|| AppError::NotFound(self.kind.label().to_string()))?;

        tracing::info!(kind = self.kind.label(), id = %party_id, "Party updated");
        Ok(party)
    }

    /// Delete a party that no stock entry references
    pub async fn delete(&self, party_id: Uuid) -> AppResult<Party> {
        let party = self.get(party_id).await?;
        let (stock_table, column) = self.kind.referencing();

        let referenced = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {stock_table} WHERE {column} = $1)"
        ))
        .bind(party_id)
        .fetch_one(&self.db)
        .await?;

        if referenced {
            return Err(AppError::Conflict {
                resource: self.kind.label().to_lowercase(),
                message: format!(
                    "{} has stock entries and cannot be deleted",
                    self.kind.label()
                ),
            });
        }

        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", self.kind.table()))
            .bind(party_id)
            .execute(&self.db)
            .await?;

        tracing::info!(kind = self.kind.label(), id = %party_id, "Party deleted");
        Ok(party)
    }
}
