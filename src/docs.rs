// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::register_admin,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::verify,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,

        // --- Properties ---
        handlers::properties::search_properties,
        handlers::properties::featured_properties,
        handlers::properties::get_property,
        handlers::properties::create_property,
        handlers::properties::my_properties,
        handlers::properties::update_property,
        handlers::properties::delete_property,
        handlers::properties::admin_list_properties,
        handlers::properties::set_property_status,
        handlers::properties::approve_property,
        handlers::properties::reject_property,

        // --- Leads ---
        handlers::leads::submit_lead,
        handlers::leads::list_leads,
        handlers::leads::admin_create_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,

        // --- Agents ---
        handlers::agents::list_agents,
        handlers::agents::agent_quota,
        handlers::agents::update_membership,
        handlers::agents::list_plans,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Coupons ---
        handlers::coupons::create_coupon,
        handlers::coupons::list_coupons,
        handlers::coupons::delete_coupon,
        handlers::coupons::lookup_coupon,

        // --- Inquiries ---
        handlers::inquiries::create_inquiry,
        handlers::inquiries::send_contact,
        handlers::inquiries::list_inquiries,
        handlers::inquiries::update_inquiry_status,
        handlers::inquiries::delete_inquiry,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_leads_week,
        handlers::dashboard::get_leads_month,
        handlers::dashboard::get_properties_status,
        handlers::dashboard::get_revenue,

        // --- Tools / Meta ---
        handlers::tools::mortgage_quote,
        handlers::tools::property_statuses,
        handlers::tools::lead_statuses,
    ),
    components(
        schemas(
            // Auth
            models::auth::UserRole,
            models::auth::User,
            models::auth::UserProfile,
            models::auth::AgentInfo,
            models::auth::RegisterUserPayload,
            models::auth::RegisterAdminPayload,
            models::auth::LoginUserPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,
            models::auth::UpdateUserPayload,

            // Properties
            models::property::PropertyStatus,
            models::property::ListingType,
            models::property::PropertySort,
            models::property::Property,
            models::property::PropertyPage,
            models::property::CreatePropertyPayload,
            models::property::UpdatePropertyPayload,
            models::property::UpdatePropertyStatusPayload,

            // Leads & Agents
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::LeadSubmissionPayload,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,
            models::agent::MembershipPlan,
            models::agent::Membership,
            models::agent::PlanEntry,
            models::agent::QuotaSummary,
            models::agent::AgentSummary,
            models::agent::AgentMembershipInfo,
            models::agent::UpdateMembershipPayload,

            // Coupons
            models::coupon::Coupon,
            models::coupon::CouponStatus,
            models::coupon::CouponView,
            models::coupon::CreateCouponPayload,

            // Inquiries
            models::inquiry::InquiryStatus,
            models::inquiry::Inquiry,
            models::inquiry::CreateInquiryPayload,
            models::inquiry::UpdateInquiryStatusPayload,
            models::inquiry::ContactPayload,

            // Dashboard
            models::dashboard::DashboardStats,
            models::dashboard::DailyLeadCount,
            models::dashboard::StatusCount,
            models::dashboard::RevenueEntry,

            // Meta
            models::meta::StatusMeta,
            models::meta::MortgageQuote,
        )
    ),
    tags(
        (name = "Auth", description = "Registro, login e redefinição de senha"),
        (name = "Properties", description = "Busca pública e gestão de anúncios"),
        (name = "Leads", description = "Captação e distribuição de leads"),
        (name = "Coupons", description = "Consulta pública de cupons"),
        (name = "Inquiries", description = "Contatos do site"),
        (name = "Admin - Properties", description = "Moderação de anúncios"),
        (name = "Admin - Agents", description = "Planos e cotas dos corretores"),
        (name = "Admin - Users", description = "Gestão de usuários"),
        (name = "Admin - Coupons", description = "Emissão de cupons"),
        (name = "Admin - Inquiries", description = "Caixa de contatos"),
        (name = "Admin - Dashboard", description = "Indicadores do painel"),
        (name = "Tools", description = "Calculadora de financiamento"),
        (name = "Meta", description = "Rótulos e cores de status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
