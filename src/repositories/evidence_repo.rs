use async_trait::async_trait;

use crate::{
    database::DatabasePool,
    error::ApiError,
    models::{EvidenceDraft, EvidenceItem},
};

#[async_trait]
pub trait EvidenceRepository {
    async fn list_by_case(&self, case_id: i64) -> Result<Vec<EvidenceItem>, ApiError>;
    async fn create(
        &self,
        case_id: i64,
        draft: &EvidenceDraft,
        owner_technician_id: i64,
    ) -> Result<EvidenceItem, ApiError>;
    async fn update(&self, id: i64, draft: &EvidenceDraft) -> Result<Option<EvidenceItem>, ApiError>;
    async fn set_active(&self, id: i64, active: bool) -> Result<Option<EvidenceItem>, ApiError>;
}

const EVIDENCE_COLUMNS: &str = "id, expediente_id, descripcion, color, tamano, peso::float8 AS peso, \
                                ubicacion, tecnico_id, fecha_registro, activo";

pub struct SqlxEvidenceRepository {
    pool: DatabasePool,
}

impl SqlxEvidenceRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvidenceRepository for SqlxEvidenceRepository {
    async fn list_by_case(&self, case_id: i64) -> Result<Vec<EvidenceItem>, ApiError> {
        let sql = format!(
            "SELECT {EVIDENCE_COLUMNS} FROM indicios WHERE expediente_id = $1 ORDER BY id"
        );
        let items = sqlx::query_as::<_, EvidenceItem>(&sql)
            .bind(case_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn create(
        &self,
        case_id: i64,
        draft: &EvidenceDraft,
        owner_technician_id: i64,
    ) -> Result<EvidenceItem, ApiError> {
        // The parent must still exist and be active at insert time.
        let sql = format!(
            "INSERT INTO indicios (expediente_id, descripcion, color, tamano, peso, ubicacion, tecnico_id, activo) \
             SELECT e.id, $2, $3, $4, $5, $6, $7, TRUE \
             FROM expedientes e WHERE e.id = $1 AND e.activo = TRUE \
             RETURNING {EVIDENCE_COLUMNS}"
        );
        let item = sqlx::query_as::<_, EvidenceItem>(&sql)
            .bind(case_id)
            .bind(&draft.description)
            .bind(draft.color.as_deref())
            .bind(draft.size.as_deref())
            .bind(draft.weight)
            .bind(draft.location.as_deref())
            .bind(owner_technician_id)
            .fetch_optional(&self.pool)
            .await?;

        item.ok_or_else(|| ApiError::not_found("Case not found"))
    }

    async fn update(&self, id: i64, draft: &EvidenceDraft) -> Result<Option<EvidenceItem>, ApiError> {
        let sql = format!(
            "UPDATE indicios \
             SET descripcion = $2, color = $3, tamano = $4, peso = $5, ubicacion = $6 \
             WHERE id = $1 \
             RETURNING {EVIDENCE_COLUMNS}"
        );
        let item = sqlx::query_as::<_, EvidenceItem>(&sql)
            .bind(id)
            .bind(&draft.description)
            .bind(draft.color.as_deref())
            .bind(draft.size.as_deref())
            .bind(draft.weight)
            .bind(draft.location.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Option<EvidenceItem>, ApiError> {
        let sql = format!(
            "UPDATE indicios SET activo = $2 WHERE id = $1 RETURNING {EVIDENCE_COLUMNS}"
        );
        let item = sqlx::query_as::<_, EvidenceItem>(&sql)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }
}
