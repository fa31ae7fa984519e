use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;

use crate::{
    auth::context::IdentityClaim,
    error::ApiError,
    handlers::case_handlers::ActiveRequest,
    handlers::{AppJson, AppPath},
    models::{EvidenceDraft, EvidenceItem},
    utils::validation::{
        max_length, optional_max_length, optional_text, require_text, require_value,
        validate_weight, COLOR_MAX_LEN, DESCRIPTION_MAX_LEN, LOCATION_MAX_LEN, SIZE_MAX_LEN,
    },
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct EvidenceRequest {
    pub descripcion: Option<String>,
    pub color: Option<String>,
    pub tamano: Option<String>,
    pub peso: Option<f64>,
    pub ubicacion: Option<String>,
}

impl EvidenceRequest {
    fn into_draft(self) -> Result<EvidenceDraft, ApiError> {
        Ok(EvidenceDraft {
            description: max_length(
                require_text(self.descripcion, "descripcion")?,
                "descripcion",
                DESCRIPTION_MAX_LEN,
            )?,
            color: optional_max_length(optional_text(self.color), "color", COLOR_MAX_LEN)?,
            size: optional_max_length(optional_text(self.tamano), "tamano", SIZE_MAX_LEN)?,
            weight: validate_weight(require_value(self.peso, "peso")?)?,
            location: optional_max_length(
                optional_text(self.ubicacion),
                "ubicacion",
                LOCATION_MAX_LEN,
            )?,
        })
    }
}

/// GET /api/expedientes/:id/indicios
pub async fn list_case_evidence(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(case_id): AppPath<i64>,
) -> Result<Json<Vec<EvidenceItem>>, ApiError> {
    let items = app_state
        .evidence_service
        .list_by_case(&identity, case_id)
        .await?;
    Ok(Json(items))
}

/// POST /api/expedientes/:id/indicios (tecnico only)
pub async fn create_evidence(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(case_id): AppPath<i64>,
    AppJson(payload): AppJson<EvidenceRequest>,
) -> Result<(StatusCode, Json<EvidenceItem>), ApiError> {
    let draft = payload.into_draft()?;
    let item = app_state
        .evidence_service
        .create(&identity, case_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/indicios/:id
pub async fn update_evidence(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<EvidenceRequest>,
) -> Result<Json<EvidenceItem>, ApiError> {
    let draft = payload.into_draft()?;
    let item = app_state.evidence_service.update(&identity, id, draft).await?;
    Ok(Json(item))
}

/// PATCH /api/indicios/:id/activo
pub async fn set_evidence_active(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ActiveRequest>,
) -> Result<Json<EvidenceItem>, ApiError> {
    let active = require_value(payload.activo, "activo")?;
    let item = app_state
        .evidence_service
        .set_active(&identity, id, active)
        .await?;
    Ok(Json(item))
}
