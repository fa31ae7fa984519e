use crate::auth::context::IdentityClaim;
use crate::auth::ownership::OwnershipResolver;
use crate::auth::rbac::{COORDINADOR_ONLY, TECNICO_ONLY};
use crate::error::ApiError;
use crate::models::{Case, CaseDraft, CaseFilter, CasePage, CaseStatus};
use crate::repositories::{CaseRepository, RecordKind};
use std::sync::Arc;

const CASE_NOT_FOUND: &str = "Case not found";

/// Case lifecycle: creation, edits, status finalization and soft delete.
///
/// Status and the active flag are independent axes; neither constrains the
/// other.
pub struct CaseService {
    cases: Arc<dyn CaseRepository + Send + Sync>,
    ownership: OwnershipResolver,
}

impl CaseService {
    pub fn new(cases: Arc<dyn CaseRepository + Send + Sync>, ownership: OwnershipResolver) -> Self {
        Self { cases, ownership }
    }

    pub async fn list(&self, identity: &IdentityClaim, mut filter: CaseFilter) -> Result<CasePage, ApiError> {
        if filter.page < 1 {
            return Err(ApiError::validation("Field 'page' must be at least 1"));
        }
        if filter.page_size < 0 {
            return Err(ApiError::validation("Field 'pageSize' must not be negative"));
        }

        if !identity.role.bypasses_ownership() {
            filter.owner_technician_id = Some(identity.id);
        }

        let (data, total) = self.cases.list(&filter).await?;

        Ok(CasePage {
            data,
            total,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    pub async fn get(&self, identity: &IdentityClaim, id: i64) -> Result<Case, ApiError> {
        let case = self
            .cases
            .find_active(id)
            .await?
            .ok_or_else(|| ApiError::not_found(CASE_NOT_FOUND))?;

        if !identity.role.bypasses_ownership() && case.owner_technician_id != identity.id {
            tracing::warn!(user_id = identity.id, case_id = id, "case read denied");
            return Err(ApiError::forbidden("Not authorized (not the assigned technician)"));
        }

        Ok(case)
    }

    pub async fn create(&self, identity: &IdentityClaim, draft: CaseDraft) -> Result<Case, ApiError> {
        identity.require_role(TECNICO_ONLY)?;

        let case = self.cases.create(&draft, identity.id).await?;

        tracing::info!(user_id = identity.id, case_id = case.id, code = %case.code, "case created");
        Ok(case)
    }

    pub async fn update(&self, identity: &IdentityClaim, id: i64, draft: CaseDraft) -> Result<Case, ApiError> {
        self.ownership
            .assert_ownership(identity, RecordKind::Case, id)
            .await?;

        let case = self
            .cases
            .update(id, &draft)
            .await?
            .ok_or_else(|| ApiError::not_found(CASE_NOT_FOUND))?;

        tracing::info!(user_id = identity.id, case_id = id, "case updated");
        Ok(case)
    }

    /// Finalizes a case. Applied regardless of the current status or active
    /// flag.
    pub async fn change_status(
        &self,
        identity: &IdentityClaim,
        id: i64,
        status: CaseStatus,
        justification: Option<String>,
    ) -> Result<Case, ApiError> {
        identity.require_role(COORDINADOR_ONLY)?;

        if !status.is_final() {
            return Err(ApiError::validation(
                "Field 'estado' must be 'aprobado' or 'rechazado'",
            ));
        }

        let case = self
            .cases
            .set_status(id, status, justification.as_deref(), identity.id)
            .await?
            .ok_or_else(|| ApiError::not_found(CASE_NOT_FOUND))?;

        tracing::info!(user_id = identity.id, case_id = id, status = %status, "case status changed");
        Ok(case)
    }

    pub async fn set_active(&self, identity: &IdentityClaim, id: i64, active: bool) -> Result<Case, ApiError> {
        self.ownership
            .assert_ownership(identity, RecordKind::Case, id)
            .await?;

        let case = self
            .cases
            .set_active(id, active)
            .await?
            .ok_or_else(|| ApiError::not_found(CASE_NOT_FOUND))?;

        tracing::info!(user_id = identity.id, case_id = id, active, "case active flag set");
        Ok(case)
    }
}
