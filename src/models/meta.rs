// src/models/meta.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

// Rótulo + cor de cada status (antes duplicado em cada página do frontend)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusMeta {
    #[schema(example = "published")]
    pub value: String,
    #[schema(example = "Published")]
    pub label: String,
    #[schema(example = "#10b981")]
    pub color: String,
}

// --- Calculadora de financiamento ---

// NaN passa por qualquer `range`; infinito passa pelo mínimo
fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    let mut err = ValidationError::new("finite");
    err.message = Some("not_a_number".into());
    Err(err)
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MortgageQuery {
    #[validate(custom(function = "finite"), range(exclusive_min = 0.0, message = "out_of_range"))]
    pub price: f64,
    #[validate(custom(function = "finite"), range(min = 0.0, message = "out_of_range"))]
    #[serde(default)]
    pub down_payment: f64,
    #[validate(custom(function = "finite"), range(min = 0.0, max = 100.0, message = "out_of_range"))]
    pub annual_rate: f64,
    #[validate(range(min = 1, max = 50, message = "out_of_range"))]
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MortgageQuote {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(price: f64, down_payment: f64, annual_rate: f64) -> MortgageQuery {
        MortgageQuery { price, down_payment, annual_rate, years: 30 }
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert!(query(250_000.0, 0.0, 6.0).validate().is_ok());

        let errors = query(f64::NAN, 0.0, 6.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));

        let errors = query(f64::INFINITY, f64::NAN, 6.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
        assert!(errors.field_errors().contains_key("down_payment"));

        assert!(query(100_000.0, 0.0, f64::NAN).validate().is_err());
    }
}
