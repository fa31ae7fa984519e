use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Evidence item (indicio) attached to exactly one case.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct EvidenceItem {
    pub id: i64,
    #[serde(rename = "expediente_id")]
    #[sqlx(rename = "expediente_id")]
    pub case_id: i64,
    #[serde(rename = "descripcion")]
    #[sqlx(rename = "descripcion")]
    pub description: String,
    pub color: Option<String>,
    #[serde(rename = "tamano")]
    #[sqlx(rename = "tamano")]
    pub size: Option<String>,
    #[serde(rename = "peso")]
    #[sqlx(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "ubicacion")]
    #[sqlx(rename = "ubicacion")]
    pub location: Option<String>,
    #[serde(rename = "tecnico_id")]
    #[sqlx(rename = "tecnico_id")]
    pub owner_technician_id: i64,
    #[serde(rename = "fecha_registro")]
    #[sqlx(rename = "fecha_registro")]
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "activo")]
    #[sqlx(rename = "activo")]
    pub active: bool,
}

/// Mutable fields of an evidence item, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceDraft {
    pub description: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub weight: f64,
    pub location: Option<String>,
}
