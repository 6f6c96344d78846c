pub mod agent;
pub mod auth;
pub mod coupon;
pub mod dashboard;
pub mod inquiry;
pub mod lead;
pub mod meta;
pub mod property;
