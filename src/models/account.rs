use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::auth::rbac::Role;

fn decode_role(row: &PgRow) -> Result<Role, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Role::from_str(&role).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "role".to_string(),
        source: format!("unknown role '{}'", role).into(),
    })
}

/// Account (usuario) as exposed outward. Never carries password material.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "fecha_registro")]
    pub registered_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Account {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            role: decode_role(row)?,
            active: row.try_get("activo")?,
            registered_at: row.try_get("fecha_registro")?,
        })
    }
}

/// Login lookup row, including the stored password verifier.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub password_hash: String,
    pub active: bool,
}

impl<'r> FromRow<'r, PgRow> for AccountCredentials {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            role: decode_role(row)?,
            password_hash: row.try_get("password_hash")?,
            active: row.try_get("activo")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AccountFilter {
    pub search: Option<String>,
    pub page: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountPage {
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub data: Vec<Account>,
}
