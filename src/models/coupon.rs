// src/models/coupon.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: Uuid,
    #[schema(example = "Black Friday Prestige")]
    pub title: String,
    #[schema(example = "Prestige")]
    pub plan_name: String,
    #[schema(example = "199.90")]
    pub price: Decimal,
    #[schema(example = 1440)]
    pub duration_minutes: Option<i32>,
    #[schema(example = "3 months")]
    pub plan_duration: Option<String>,
    pub referral_fee: Option<Decimal>,
    pub payment_link: Option<String>,
    #[schema(example = "K7QH2MZP9X")]
    pub code: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    // Quando presente, tem prioridade sobre created_at + duration_minutes.
    // No JSON sai como `customExpiresAt`; `expiresAt` é a validade calculada.
    #[serde(rename = "customExpiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CouponStatus {
    Available,
    Expired,
    Unknown,
}

// Cupom + validade calculada (nunca gravada)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponView {
    #[serde(flatten)]
    pub coupon: Coupon,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: CouponStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub title: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Priority")]
    pub plan_name: String,
    pub price: Decimal,
    // Até um ano de validade
    #[validate(range(min = 1, max = 525600, message = "out_of_range"))]
    pub duration_minutes: Option<i32>,
    pub plan_duration: Option<String>,
    pub referral_fee: Option<Decimal>,
    #[validate(url(message = "invalid_url"))]
    pub payment_link: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn view_serializes_the_computed_expiry_as_expires_at() {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let view = CouponView {
            coupon: Coupon {
                id: Uuid::new_v4(),
                title: "Lançamento".into(),
                plan_name: "Priority".into(),
                price: Decimal::new(9990, 2),
                duration_minutes: Some(60),
                plan_duration: None,
                referral_fee: None,
                payment_link: None,
                code: "ABCDEFGHJK".into(),
                created_by: None,
                created_at,
                expires_at: None,
            },
            expires_at: Some(created_at + chrono::Duration::minutes(60)),
            status: CouponStatus::Available,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["expiresAt"], "2025-03-01T13:00:00Z");
        assert!(json["customExpiresAt"].is_null());
        assert_eq!(json["status"], "Available");
        assert!(json.get("expiry").is_none());
    }
}
