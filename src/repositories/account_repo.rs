use async_trait::async_trait;

use crate::{
    auth::rbac::Role,
    database::DatabasePool,
    error::ApiError,
    models::{Account, AccountCredentials, AccountFilter},
};

#[async_trait]
pub trait AccountRepository {
    async fn find_active_by_username(&self, username: &str) -> Result<Option<AccountCredentials>, ApiError>;
    async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<Account, ApiError>;
    async fn list(&self, filter: &AccountFilter) -> Result<(Vec<Account>, i64), ApiError>;
}

const ACCOUNT_FILTER: &str = "($1::text IS NULL OR username ILIKE '%' || $1 || '%' OR role ILIKE '%' || $1 || '%')";

pub struct SqlxAccountRepository {
    pool: DatabasePool,
}

impl SqlxAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqlxAccountRepository {
    async fn find_active_by_username(&self, username: &str) -> Result<Option<AccountCredentials>, ApiError> {
        let credentials = sqlx::query_as::<_, AccountCredentials>(
            r#"
            SELECT id, username, role, password_hash, activo
            FROM usuarios
            WHERE username = $1 AND activo = TRUE
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<Account, ApiError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO usuarios (username, password_hash, role, activo)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, username, role, activo, fecha_registro
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_unique_violation(e, "Username already exists"))
    }

    async fn list(&self, filter: &AccountFilter) -> Result<(Vec<Account>, i64), ApiError> {
        let search = filter.search.as_deref();
        let offset = (filter.page - 1).max(0).saturating_mul(filter.size);

        let rows_sql = format!(
            "SELECT id, username, role, activo, fecha_registro FROM usuarios \
             WHERE {ACCOUNT_FILTER} ORDER BY id LIMIT $2 OFFSET $3"
        );
        let accounts = sqlx::query_as::<_, Account>(&rows_sql)
            .bind(search)
            .bind(filter.size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM usuarios WHERE {ACCOUNT_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(search)
            .fetch_one(&self.pool)
            .await?;

        Ok((accounts, total))
    }
}
