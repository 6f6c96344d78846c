pub mod agent_service;
pub mod auth;
pub mod coupon_service;
pub mod dashboard_service;
pub mod email_service;
pub mod inquiry_service;
pub mod lead_service;
pub mod mortgage;
pub mod property_service;
pub mod quota;
pub mod user_service;
