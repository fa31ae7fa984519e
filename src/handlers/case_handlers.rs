use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;

use crate::{
    auth::context::IdentityClaim,
    error::ApiError,
    handlers::{AppJson, AppPath, AppQuery},
    models::{Case, CaseDraft, CaseFilter, CasePage, CaseStatus},
    utils::validation::{
        max_length, optional_max_length, optional_text, require_text, require_value,
        CODE_MAX_LEN, DESCRIPTION_MAX_LEN, JUSTIFICATION_MAX_LEN,
    },
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct CaseListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size", rename = "pageSize")]
    pub page_size: i64,
    pub estado: Option<String>,
    pub codigo: Option<String>,
    pub activo: Option<bool>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct CaseRequest {
    pub codigo: Option<String>,
    pub descripcion: Option<String>,
}

impl CaseRequest {
    fn into_draft(self) -> Result<CaseDraft, ApiError> {
        Ok(CaseDraft {
            code: max_length(
                require_text(self.codigo, "codigo")?.trim().to_string(),
                "codigo",
                CODE_MAX_LEN,
            )?,
            description: max_length(
                require_text(self.descripcion, "descripcion")?,
                "descripcion",
                DESCRIPTION_MAX_LEN,
            )?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub estado: Option<String>,
    pub justificacion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub activo: Option<bool>,
}

fn parse_status(raw: &str) -> Result<CaseStatus, ApiError> {
    CaseStatus::from_str(raw)
        .ok_or_else(|| ApiError::validation(format!("Unknown value '{}' for field 'estado'", raw)))
}

/// GET /api/expedientes
pub async fn list_cases(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppQuery(params): AppQuery<CaseListQuery>,
) -> Result<Json<CasePage>, ApiError> {
    let status = optional_text(params.estado)
        .map(|raw| parse_status(&raw))
        .transpose()?;

    let filter = CaseFilter {
        status,
        code: optional_text(params.codigo),
        owner_technician_id: None,
        active: params.activo,
        page: params.page,
        page_size: params.page_size,
    };

    let page = app_state.case_service.list(&identity, filter).await?;
    Ok(Json(page))
}

/// GET /api/expedientes/:id
pub async fn get_case(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Case>, ApiError> {
    let case = app_state.case_service.get(&identity, id).await?;
    Ok(Json(case))
}

/// POST /api/expedientes (tecnico only)
pub async fn create_case(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppJson(payload): AppJson<CaseRequest>,
) -> Result<(StatusCode, Json<Case>), ApiError> {
    let draft = payload.into_draft()?;
    let case = app_state.case_service.create(&identity, draft).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

/// PUT /api/expedientes/:id
pub async fn update_case(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<CaseRequest>,
) -> Result<Json<Case>, ApiError> {
    let draft = payload.into_draft()?;
    let case = app_state.case_service.update(&identity, id, draft).await?;
    Ok(Json(case))
}

/// PATCH /api/expedientes/:id/estado (coordinador only)
pub async fn change_case_status(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<StatusRequest>,
) -> Result<Json<Case>, ApiError> {
    let status = parse_status(&require_text(payload.estado, "estado")?)?;
    let justification = optional_max_length(
        optional_text(payload.justificacion),
        "justificacion",
        JUSTIFICATION_MAX_LEN,
    )?;

    let case = app_state
        .case_service
        .change_status(&identity, id, status, justification)
        .await?;
    Ok(Json(case))
}

/// PATCH /api/expedientes/:id/activo
pub async fn set_case_active(
    State(app_state): State<AppState>,
    identity: IdentityClaim,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ActiveRequest>,
) -> Result<Json<Case>, ApiError> {
    let active = require_value(payload.activo, "activo")?;
    let case = app_state.case_service.set_active(&identity, id, active).await?;
    Ok(Json(case))
}
