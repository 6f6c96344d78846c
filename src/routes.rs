// src/routes.rs

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{AppState, Settings},
    docs::ApiDoc,
    handlers,
    middleware::auth::{admin_guard, auth_guard},
};

// Sem origens configuradas libera tudo (sem cookies); com lista, envia credenciais
fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Origem CORS inválida ignorada: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
}

pub fn create_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/register-admin", post(handlers::auth::register_admin))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password))
        .merge(
            Router::new()
                .route("/verify", get(handlers::auth::verify))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // Leitura pública; escrita exige token (extrator AuthenticatedUser)
    let property_routes = Router::new()
        .route("/"
               ,get(handlers::properties::search_properties)
               .post(handlers::properties::create_property)
        )
        .route("/featured", get(handlers::properties::featured_properties))
        .route("/{id}"
               ,get(handlers::properties::get_property)
               .put(handlers::properties::update_property)
               .delete(handlers::properties::delete_property)
        )
        .merge(
            Router::new()
                .route("/mine", get(handlers::properties::my_properties))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // POST é o formulário público; o resto exige admin (RequireRole)
    let lead_routes = Router::new()
        .route("/"
               ,get(handlers::leads::list_leads)
               .post(handlers::leads::submit_lead)
        )
        .route("/{id}"
               ,put(handlers::leads::update_lead)
               .delete(handlers::leads::delete_lead)
        );

    let admin_routes = Router::new()
        // Moderação de anúncios
        .route("/properties", get(handlers::properties::admin_list_properties))
        .route("/properties/{id}/status", put(handlers::properties::set_property_status))
        .route("/properties/{id}/approve", put(handlers::properties::approve_property))
        .route("/properties/{id}/reject", put(handlers::properties::reject_property))
        // Leads e corretores
        .route("/leads", post(handlers::leads::admin_create_lead))
        .route("/agents", get(handlers::agents::list_agents))
        .route("/agents/{id}/quota", get(handlers::agents::agent_quota))
        .route("/agents/{id}/membership", put(handlers::agents::update_membership))
        .route("/plans", get(handlers::agents::list_plans))
        // Usuários
        .route("/users", get(handlers::users::list_users))
        .route("/users/{id}"
               ,put(handlers::users::update_user)
               .delete(handlers::users::delete_user)
        )
        // Cupons
        .route("/coupons"
               ,get(handlers::coupons::list_coupons)
               .post(handlers::coupons::create_coupon)
        )
        .route("/coupons/{id}", delete(handlers::coupons::delete_coupon))
        // Contatos
        .route("/inquiries", get(handlers::inquiries::list_inquiries))
        .route("/inquiries/{id}", delete(handlers::inquiries::delete_inquiry))
        .route("/inquiries/{id}/status", put(handlers::inquiries::update_inquiry_status))
        // Painel
        .route("/dashboard/stats", get(handlers::dashboard::get_stats))
        .route("/dashboard/leads-week", get(handlers::dashboard::get_leads_week))
        .route("/dashboard/leads-month", get(handlers::dashboard::get_leads_month))
        .route("/dashboard/properties-status", get(handlers::dashboard::get_properties_status))
        .route("/dashboard/revenue", get(handlers::dashboard::get_revenue))
        // Aplica o guardião de admin em tudo
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            admin_guard,
        ));

    let cors = cors_layer(&app_state.settings);

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/properties", property_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/coupons/{code}", get(handlers::coupons::lookup_coupon))
        .route("/api/inquiries", post(handlers::inquiries::create_inquiry))
        .route("/api/contact", post(handlers::inquiries::send_contact))
        .route("/api/tools/mortgage", get(handlers::tools::mortgage_quote))
        .route("/api/meta/property-statuses", get(handlers::tools::property_statuses))
        .route("/api/meta/lead-statuses", get(handlers::tools::lead_statuses))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
