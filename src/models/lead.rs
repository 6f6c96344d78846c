// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE lead_status do banco.
// Sem máquina de estados: qualquer status pode ser definido a qualquer momento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Pending,
    Contacted,
    InProcess,
    Closed,
    Rejected,
    #[sqlx(rename = "non-viable")]
    #[serde(rename = "non-viable")]
    NonViable,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::Pending,
        LeadStatus::Contacted,
        LeadStatus::InProcess,
        LeadStatus::Closed,
        LeadStatus::Rejected,
        LeadStatus::NonViable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Contacted => "contacted",
            LeadStatus::InProcess => "in_process",
            LeadStatus::Closed => "closed",
            LeadStatus::Rejected => "rejected",
            LeadStatus::NonViable => "non-viable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "Pending",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::InProcess => "In process",
            LeadStatus::Closed => "Closed",
            LeadStatus::Rejected => "Rejected",
            LeadStatus::NonViable => "Non-viable",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "#f59e0b",
            LeadStatus::Contacted => "#3b82f6",
            LeadStatus::InProcess => "#8b5cf6",
            LeadStatus::Closed => "#10b981",
            LeadStatus::Rejected => "#ef4444",
            LeadStatus::NonViable => "#6b7280",
        }
    }
}

// Lead com o nome do corretor (LEFT JOIN users)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    #[schema(example = "Carlos")]
    pub first_name: String,
    #[schema(example = "Pereira")]
    pub last_name: Option<String>,
    #[schema(example = "carlos@email.com")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "Apartamento de 3 quartos perto do metrô")]
    pub requirements: Option<String>,
    pub category: Option<String>,
    pub label: Option<String>,
    pub status: LeadStatus,
    pub country: Option<String>,
    pub state_province: Option<String>,
    pub city: Option<String>,
    pub internal_note: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub assigned_agent_name: Option<String>,
    #[schema(example = "website")]
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Envio público (site): sem status, sem atribuição, sem nota interna
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmissionPayload {
    #[validate(length(min = 1, message = "required"))]
    pub first_name: String,
    pub last_name: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub requirements: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub state_province: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
}

// Formulário do admin (todos os campos)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    pub first_name: String,
    pub last_name: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub requirements: Option<String>,
    pub category: Option<String>,
    pub label: Option<String>,
    pub status: Option<LeadStatus>,
    pub country: Option<String>,
    pub state_province: Option<String>,
    pub city: Option<String>,
    pub internal_note: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub source: Option<String>,
}

/// Distingue "campo ausente" (None) de "campo null" (Some(None)).
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// Atualização parcial. `assignedTo: null` remove a atribuição.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 2000, message = "too_long"))]
    pub requirements: Option<String>,
    pub category: Option<String>,
    pub label: Option<String>,
    pub status: Option<LeadStatus>,
    pub country: Option<String>,
    pub state_province: Option<String>,
    pub city: Option<String>,
    pub internal_note: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Uuid>)]
    pub assigned_to: Option<Option<Uuid>>,
    pub source: Option<String>,
}

// Filtros de GET /api/leads
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeadQuery {
    pub status: Option<LeadStatus>,
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub unassigned: bool,
    pub search: Option<String>,
}

// Dados mínimos para os gráficos de leads por dia
#[derive(Debug, Clone, FromRow)]
pub struct LeadActivity {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_status_uses_hyphen_for_non_viable() {
        let json = serde_json::to_string(&LeadStatus::NonViable).unwrap();
        assert_eq!(json, "\"non-viable\"");

        let parsed: LeadStatus = serde_json::from_str("\"in_process\"").unwrap();
        assert_eq!(parsed, LeadStatus::InProcess);
    }

    #[test]
    fn update_payload_distinguishes_null_from_missing() {
        let missing: UpdateLeadPayload = serde_json::from_str(r#"{"status":"closed"}"#).unwrap();
        assert_eq!(missing.assigned_to, None);
        assert_eq!(missing.status, Some(LeadStatus::Closed));

        let cleared: UpdateLeadPayload = serde_json::from_str(r#"{"assignedTo":null}"#).unwrap();
        assert_eq!(cleared.assigned_to, Some(None));

        let id = Uuid::new_v4();
        let assigned: UpdateLeadPayload =
            serde_json::from_str(&format!(r#"{{"assignedTo":"{}"}}"#, id)).unwrap();
        assert_eq!(assigned.assigned_to, Some(Some(id)));
    }
}
