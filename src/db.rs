pub mod user_repo;
pub use user_repo::UserRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod coupon_repo;
pub use coupon_repo::CouponRepository;
pub mod inquiry_repo;
pub use inquiry_repo::InquiryRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
