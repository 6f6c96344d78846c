// src/models/property.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums ---

// Mapeia o CREATE TYPE property_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Pending,
    Published,
    Sold,
    Rented,
    Rejected,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 5] = [
        PropertyStatus::Pending,
        PropertyStatus::Published,
        PropertyStatus::Sold,
        PropertyStatus::Rented,
        PropertyStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Pending => "pending",
            PropertyStatus::Published => "published",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Pending => "Pending review",
            PropertyStatus::Published => "Published",
            PropertyStatus::Sold => "Sold",
            PropertyStatus::Rented => "Rented",
            PropertyStatus::Rejected => "Rejected",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PropertyStatus::Pending => "#f59e0b",
            PropertyStatus::Published => "#10b981",
            PropertyStatus::Sold => "#3b82f6",
            PropertyStatus::Rented => "#8b5cf6",
            PropertyStatus::Rejected => "#ef4444",
        }
    }

    /// Conta para o gráfico de receita (negócio fechado).
    pub fn is_closed_deal(&self) -> bool {
        matches!(self, PropertyStatus::Sold | PropertyStatus::Rented)
    }

    pub fn closed_deals() -> Vec<&'static str> {
        Self::ALL.iter().filter(|s| s.is_closed_deal()).map(|s| s.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "listing_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
}

// Decisão da moderação sobre um anúncio pendente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

// --- Anúncio ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    #[schema(example = "Apartamento com vista para o mar")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "450000.00")]
    pub price: Decimal,
    #[schema(example = "apartment")]
    pub property_type: String,
    pub listing_type: ListingType,
    pub address: String,
    #[schema(example = "Florianópolis")]
    pub city: String,
    pub state_province: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    #[schema(example = 3)]
    pub bedrooms: i32,
    #[schema(example = 2)]
    pub bathrooms: i32,
    pub area_sqft: Option<i32>,
    pub year_built: Option<i32>,
    #[schema(example = json!(["https://cdn.exemplo.com/1.jpg"]))]
    pub images: Vec<String>,
    #[schema(example = json!(["piscina", "garagem"]))]
    pub features: Vec<String>,
    pub status: PropertyStatus,
    pub featured: bool,
    pub views: i64,
    pub owner_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("price_must_be_positive".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyPayload {
    #[validate(length(min = 3, max = 200, message = "title_length"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[schema(example = "450000.00")]
    pub price: Decimal,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "house")]
    pub property_type: String,
    pub listing_type: ListingType,
    #[validate(length(min = 1, message = "required"))]
    pub address: String,
    #[validate(length(min = 1, message = "required"))]
    pub city: String,
    pub state_province: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    #[validate(range(min = 0, max = 100, message = "out_of_range"))]
    #[serde(default)]
    pub bedrooms: i32,
    #[validate(range(min = 0, max = 100, message = "out_of_range"))]
    #[serde(default)]
    pub bathrooms: i32,
    #[validate(range(min = 1, message = "out_of_range"))]
    pub area_sqft: Option<i32>,
    #[validate(range(min = 1800, max = 2100, message = "out_of_range"))]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub agent_id: Option<Uuid>,
}

// Edição genérica (PUT /api/properties/{id}). Só admin pode mudar status/destaque.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyPayload {
    #[validate(length(min = 3, max = 200, message = "title_length"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    pub property_type: Option<String>,
    pub listing_type: Option<ListingType>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    #[validate(range(min = 0, max = 100, message = "out_of_range"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, max = 100, message = "out_of_range"))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 1, message = "out_of_range"))]
    pub area_sqft: Option<i32>,
    #[validate(range(min = 1800, max = 2100, message = "out_of_range"))]
    pub year_built: Option<i32>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub status: Option<PropertyStatus>,
    pub featured: Option<bool>,
    pub agent_id: Option<Uuid>,
}

impl UpdatePropertyPayload {
    /// Campos reservados à moderação.
    pub fn touches_moderation(&self) -> bool {
        self.status.is_some() || self.featured.is_some()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePropertyStatusPayload {
    pub status: PropertyStatus,
}

// --- Busca ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertySort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PropertyQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<ListingType>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub featured: Option<bool>,
    pub sort: Option<PropertySort>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminPropertyQuery {
    pub status: Option<PropertyStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// Paginação normalizada (page >= 1, 1 <= limit <= 100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u32 = 12;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit as i64 - 1) / self.limit as i64
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl PropertyPage {
    pub fn new(items: Vec<Property>, total: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_page_and_limit() {
        let p = Pagination::new(None, None);
        assert_eq!(p, Pagination { page: 1, limit: 12 });
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(Some(0), Some(0));
        assert_eq!(p, Pagination { page: 1, limit: 1 });

        let p = Pagination::new(Some(3), Some(500));
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset(), 200);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::new(Some(1), Some(12));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(12), 1);
        assert_eq!(p.total_pages(13), 2);
    }

    #[test]
    fn price_must_be_positive() {
        assert!(validate_price(&Decimal::new(100, 0)).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_err());
        assert!(validate_price(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn only_sold_and_rented_count_as_closed_deals() {
        let closed: Vec<_> = PropertyStatus::ALL.iter().filter(|s| s.is_closed_deal()).collect();
        assert_eq!(closed, vec![&PropertyStatus::Sold, &PropertyStatus::Rented]);
        assert_eq!(PropertyStatus::closed_deals(), vec!["sold", "rented"]);
    }
}
