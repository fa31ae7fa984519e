use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CaseStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "aprobado")]
    Approved,
    #[serde(rename = "rechazado")]
    Rejected,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "pendiente",
            CaseStatus::Approved => "aprobado",
            CaseStatus::Rejected => "rechazado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" => Some(CaseStatus::Pending),
            "aprobado" => Some(CaseStatus::Approved),
            "rechazado" => Some(CaseStatus::Rejected),
            _ => None,
        }
    }

    /// Whether a coordinador may move a case into this status.
    pub fn is_final(&self) -> bool {
        matches!(self, CaseStatus::Approved | CaseStatus::Rejected)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case (expediente) as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha_registro")]
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "tecnico_id")]
    pub owner_technician_id: i64,
    #[serde(rename = "estado")]
    pub status: CaseStatus,
    #[serde(rename = "justificacion")]
    pub justification: Option<String>,
    #[serde(rename = "aprobador_id")]
    pub approver_id: Option<i64>,
    #[serde(rename = "fecha_estado")]
    pub status_date: Option<DateTime<Utc>>,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl<'r> FromRow<'r, PgRow> for Case {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("estado")?;
        let status = CaseStatus::from_str(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "estado".to_string(),
            source: format!("unknown case status '{}'", status).into(),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            code: row.try_get("codigo")?,
            description: row.try_get("descripcion")?,
            registered_at: row.try_get("fecha_registro")?,
            owner_technician_id: row.try_get("tecnico_id")?,
            status,
            justification: row.try_get("justificacion")?,
            approver_id: row.try_get("aprobador_id")?,
            status_date: row.try_get("fecha_estado")?,
            active: row.try_get("activo")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CaseDraft {
    pub code: String,
    pub description: String,
}

/// Listing filter. `owner_technician_id` is forced for tecnico callers.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub code: Option<String>,
    pub owner_technician_id: Option<i64>,
    pub active: Option<bool>,
    pub page: i64,
    pub page_size: i64,
}

impl CaseFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CasePage {
    pub data: Vec<Case>,
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in [CaseStatus::Pending, CaseStatus::Approved, CaseStatus::Rejected] {
            assert_eq!(CaseStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(CaseStatus::from_str("cerrado"), None);
        assert!(!CaseStatus::Pending.is_final());
    }

    #[test]
    fn test_filter_offset() {
        let filter = CaseFilter { page: 3, page_size: 10, ..Default::default() };
        assert_eq!(filter.offset(), 20);

        let filter = CaseFilter { page: 1, page_size: 0, ..Default::default() };
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_case_serializes_with_wire_names() {
        let case = Case {
            id: 1,
            code: "CASE-001".to_string(),
            description: "robbery".to_string(),
            registered_at: Utc::now(),
            owner_technician_id: 4,
            status: CaseStatus::Pending,
            justification: None,
            approver_id: None,
            status_date: None,
            active: true,
        };

        let value = serde_json::to_value(&case).unwrap();
        assert_eq!(value["codigo"], "CASE-001");
        assert_eq!(value["tecnico_id"], 4);
        assert_eq!(value["estado"], "pendiente");
        assert_eq!(value["activo"], true);
    }
}
