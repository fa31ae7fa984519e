use std::sync::Arc;

use crate::auth::context::IdentityClaim;
use crate::error::ApiError;
use crate::repositories::{OwnershipRepository, RecordKind};

/// Decides whether an identity may act on a specific record.
///
/// Coordinadores always pass. Tecnicos must own an active record; an absent
/// or inactive record is reported as not found before ownership is compared.
#[derive(Clone)]
pub struct OwnershipResolver {
    lookup: Arc<dyn OwnershipRepository + Send + Sync>,
}

impl OwnershipResolver {
    pub fn new(lookup: Arc<dyn OwnershipRepository + Send + Sync>) -> Self {
        Self { lookup }
    }

    pub async fn assert_ownership(
        &self,
        identity: &IdentityClaim,
        kind: RecordKind,
        record_id: i64,
    ) -> Result<(), ApiError> {
        if identity.role.bypasses_ownership() {
            return Ok(());
        }

        let owner = self
            .lookup
            .fetch_owner(kind, record_id)
            .await?
            .filter(|owner| owner.active)
            .ok_or_else(|| ApiError::not_found(format!("{} not found", kind.label())))?;

        if owner.owner_id != identity.id {
            tracing::warn!(
                user_id = identity.id,
                record = kind.label(),
                record_id,
                "ownership check failed"
            );
            return Err(ApiError::forbidden("Not authorized (not the assigned technician)"));
        }

        Ok(())
    }
}
