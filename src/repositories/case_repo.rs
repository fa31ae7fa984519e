use async_trait::async_trait;

use crate::{
    database::DatabasePool,
    error::ApiError,
    models::{Case, CaseDraft, CaseFilter, CaseStatus},
};

#[async_trait]
pub trait CaseRepository {
    /// Page of cases matching the filter plus the unpaged match count.
    async fn list(&self, filter: &CaseFilter) -> Result<(Vec<Case>, i64), ApiError>;
    async fn find_active(&self, id: i64) -> Result<Option<Case>, ApiError>;
    async fn create(&self, draft: &CaseDraft, owner_technician_id: i64) -> Result<Case, ApiError>;
    async fn update(&self, id: i64, draft: &CaseDraft) -> Result<Option<Case>, ApiError>;
    async fn set_status(
        &self,
        id: i64,
        status: CaseStatus,
        justification: Option<&str>,
        approver_id: i64,
    ) -> Result<Option<Case>, ApiError>;
    async fn set_active(&self, id: i64, active: bool) -> Result<Option<Case>, ApiError>;
}

const CASE_COLUMNS: &str = "id, codigo, descripcion, fecha_registro, tecnico_id, estado, \
                            justificacion, aprobador_id, fecha_estado, activo";

const CASE_FILTER: &str = "($1::text IS NULL OR estado = $1) \
                           AND ($2::text IS NULL OR codigo ILIKE '%' || $2 || '%') \
                           AND ($3::bigint IS NULL OR tecnico_id = $3) \
                           AND ($4::boolean IS NULL OR activo = $4)";

pub struct SqlxCaseRepository {
    pool: DatabasePool,
}

impl SqlxCaseRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseRepository for SqlxCaseRepository {
    async fn list(&self, filter: &CaseFilter) -> Result<(Vec<Case>, i64), ApiError> {
        let status = filter.status.map(|s| s.as_str());

        let rows_sql = format!(
            "SELECT {CASE_COLUMNS} FROM expedientes WHERE {CASE_FILTER} \
             ORDER BY fecha_registro DESC, id DESC LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, Case>(&rows_sql)
            .bind(status)
            .bind(filter.code.as_deref())
            .bind(filter.owner_technician_id)
            .bind(filter.active)
            .bind(filter.page_size)
            .bind(filter.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM expedientes WHERE {CASE_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(status)
            .bind(filter.code.as_deref())
            .bind(filter.owner_technician_id)
            .bind(filter.active)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn find_active(&self, id: i64) -> Result<Option<Case>, ApiError> {
        let sql = format!("SELECT {CASE_COLUMNS} FROM expedientes WHERE id = $1 AND activo = TRUE");
        let case = sqlx::query_as::<_, Case>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(case)
    }

    async fn create(&self, draft: &CaseDraft, owner_technician_id: i64) -> Result<Case, ApiError> {
        let sql = format!(
            "INSERT INTO expedientes (codigo, descripcion, tecnico_id, estado, activo) \
             VALUES ($1, $2, $3, 'pendiente', TRUE) \
             RETURNING {CASE_COLUMNS}"
        );
        sqlx::query_as::<_, Case>(&sql)
            .bind(&draft.code)
            .bind(&draft.description)
            .bind(owner_technician_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::from_unique_violation(e, "Case code already exists"))
    }

    async fn update(&self, id: i64, draft: &CaseDraft) -> Result<Option<Case>, ApiError> {
        let sql = format!(
            "UPDATE expedientes SET codigo = $2, descripcion = $3 \
             WHERE id = $1 \
             RETURNING {CASE_COLUMNS}"
        );
        sqlx::query_as::<_, Case>(&sql)
            .bind(id)
            .bind(&draft.code)
            .bind(&draft.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::from_unique_violation(e, "Case code already exists"))
    }

    async fn set_status(
        &self,
        id: i64,
        status: CaseStatus,
        justification: Option<&str>,
        approver_id: i64,
    ) -> Result<Option<Case>, ApiError> {
        let sql = format!(
            "UPDATE expedientes \
             SET estado = $2, justificacion = $3, aprobador_id = $4, fecha_estado = NOW() \
             WHERE id = $1 \
             RETURNING {CASE_COLUMNS}"
        );
        let case = sqlx::query_as::<_, Case>(&sql)
            .bind(id)
            .bind(status.as_str())
            .bind(justification)
            .bind(approver_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(case)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<Case>, ApiError> {
        let sql = format!(
            "UPDATE expedientes SET activo = $2 WHERE id = $1 RETURNING {CASE_COLUMNS}"
        );
        let case = sqlx::query_as::<_, Case>(&sql)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?;

        Ok(case)
    }
}
