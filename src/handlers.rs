// src/handlers.rs

pub mod agents;
pub mod auth;
pub mod coupons;
pub mod dashboard;
pub mod inquiries;
pub mod leads;
pub mod properties;
pub mod tools;
pub mod users;
