// src/services/mortgage.rs

use crate::{
    common::error::AppError,
    models::meta::{MortgageQuery, MortgageQuote},
};

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tabela Price: M = P·r·(1+r)^n / ((1+r)^n − 1). Taxa zero divide em parcelas iguais.
pub fn calculate(query: &MortgageQuery) -> Result<MortgageQuote, AppError> {
    if query.down_payment > query.price {
        return Err(AppError::BadRequest("down_payment_exceeds_price".to_string()));
    }

    let principal = query.price - query.down_payment;
    let months = f64::from(query.years * 12);
    let monthly_rate = query.annual_rate / 12.0 / 100.0;

    let monthly_payment = if monthly_rate == 0.0 {
        principal / months
    } else {
        let growth = (1.0 + monthly_rate).powf(months);
        principal * monthly_rate * growth / (growth - 1.0)
    };

    let total_payment = monthly_payment * months;

    Ok(MortgageQuote {
        loan_amount: round_cents(principal),
        monthly_payment: round_cents(monthly_payment),
        total_payment: round_cents(total_payment),
        total_interest: round_cents(total_payment - principal),
    })
}
