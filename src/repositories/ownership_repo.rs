use async_trait::async_trait;
use sqlx::FromRow;

use crate::{database::DatabasePool, error::ApiError};

/// Record types subject to per-record ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Case,
    EvidenceItem,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Case => "Case",
            RecordKind::EvidenceItem => "Evidence item",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct RecordOwner {
    #[sqlx(rename = "tecnico_id")]
    pub owner_id: i64,
    #[sqlx(rename = "activo")]
    pub active: bool,
}

#[async_trait]
pub trait OwnershipRepository {
    /// Owning technician and active flag of an active record, if any.
    async fn fetch_owner(&self, kind: RecordKind, id: i64) -> Result<Option<RecordOwner>, ApiError>;
}

pub struct SqlxOwnershipRepository {
    pool: DatabasePool,
}

impl SqlxOwnershipRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnershipRepository for SqlxOwnershipRepository {
    async fn fetch_owner(&self, kind: RecordKind, id: i64) -> Result<Option<RecordOwner>, ApiError> {
        let sql = match kind {
            RecordKind::Case => "SELECT tecnico_id, activo FROM expedientes WHERE id = $1 AND activo = TRUE",
            RecordKind::EvidenceItem => "SELECT tecnico_id, activo FROM indicios WHERE id = $1 AND activo = TRUE",
        };

        let owner = sqlx::query_as::<_, RecordOwner>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }
}
