use crate::auth::context::IdentityClaim;
use crate::auth::ownership::OwnershipResolver;
use crate::auth::rbac::TECNICO_ONLY;
use crate::error::ApiError;
use crate::models::{EvidenceDraft, EvidenceItem};
use crate::repositories::{EvidenceRepository, RecordKind};
use std::sync::Arc;

const ITEM_NOT_FOUND: &str = "Evidence item not found";

/// Evidence lifecycle. Listing and creation are gated on the parent case;
/// edits and toggles on the item's own owner.
pub struct EvidenceService {
    items: Arc<dyn EvidenceRepository + Send + Sync>,
    ownership: OwnershipResolver,
}

impl EvidenceService {
    pub fn new(items: Arc<dyn EvidenceRepository + Send + Sync>, ownership: OwnershipResolver) -> Self {
        Self { items, ownership }
    }

    pub async fn list_by_case(&self, identity: &IdentityClaim, case_id: i64) -> Result<Vec<EvidenceItem>, ApiError> {
        self.ownership
            .assert_ownership(identity, RecordKind::Case, case_id)
            .await?;

        self.items.list_by_case(case_id).await
    }

    pub async fn create(
        &self,
        identity: &IdentityClaim,
        case_id: i64,
        draft: EvidenceDraft,
    ) -> Result<EvidenceItem, ApiError> {
        identity.require_role(TECNICO_ONLY)?;

        self.ownership
            .assert_ownership(identity, RecordKind::Case, case_id)
            .await?;

        let item = self.items.create(case_id, &draft, identity.id).await?;

        tracing::info!(user_id = identity.id, case_id, item_id = item.id, "evidence item created");
        Ok(item)
    }

    pub async fn update(
        &self,
        identity: &IdentityClaim,
        id: i64,
        draft: EvidenceDraft,
    ) -> Result<EvidenceItem, ApiError> {
        self.ownership
            .assert_ownership(identity, RecordKind::EvidenceItem, id)
            .await?;

        let item = self
            .items
            .update(id, &draft)
            .await?
            .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))?;

        tracing::info!(user_id = identity.id, item_id = id, "evidence item updated");
        Ok(item)
    }

    pub async fn set_active(&self, identity: &IdentityClaim, id: i64, active: bool) -> Result<EvidenceItem, ApiError> {
        self.ownership
            .assert_ownership(identity, RecordKind::EvidenceItem, id)
            .await?;

        let item = self
            .items
            .set_active(id, active)
            .await?
            .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))?;

        tracing::info!(user_id = identity.id, item_id = id, active, "evidence item active flag set");
        Ok(item)
    }
}
