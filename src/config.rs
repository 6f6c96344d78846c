// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        CouponRepository, DashboardRepository, InquiryRepository, LeadRepository,
        PropertyRepository, UserRepository,
    },
    services::{
        agent_service::AgentService,
        auth::AuthService,
        coupon_service::CouponService,
        dashboard_service::DashboardService,
        email_service::{EmailService, HttpMailTransport, LogMailTransport, MailTransport},
        inquiry_service::InquiryService,
        lead_service::LeadService,
        property_service::PropertyService,
        user_service::UserService,
    },
};

// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // Vazio = qualquer origem
    pub cors_origins: Vec<String>,
    pub frontend_url: String,
    pub admin_registration_key: Option<String>,
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub admin_email: Option<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca (facilita os testes).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Variável presente e não vazia
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let jwt_ttl_days = match get("JWT_TTL_DAYS") {
            Some(v) => v.parse::<i64>().context("JWT_TTL_DAYS deve ser um número")?,
            None => 7,
        };
        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().context("DB_MAX_CONNECTIONS deve ser um número")?,
            None => 5,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_ttl_days,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
            cors_origins,
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string())
                .trim_end_matches('/')
                .to_string(),
            admin_registration_key: get("ADMIN_REGISTRATION_KEY"),
            mail_api_url: get("MAIL_API_URL"),
            mail_api_key: get("MAIL_API_KEY"),
            mail_from: get("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_string()),
            admin_email: get("ADMIN_EMAIL"),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub property_service: PropertyService,
    pub lead_service: LeadService,
    pub agent_service: AgentService,
    pub user_service: UserService,
    pub coupon_service: CouponService,
    pub inquiry_service: InquiryService,
    pub email_service: EmailService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::build(settings, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn build(settings: Settings, db_pool: PgPool) -> Self {
        let settings = Arc::new(settings);

        let transport: Arc<dyn MailTransport> = match &settings.mail_api_url {
            Some(url) => Arc::new(HttpMailTransport::new(
                url.clone(),
                settings.mail_api_key.clone(),
                settings.mail_from.clone(),
            )),
            None => {
                tracing::warn!("MAIL_API_URL não definida: e-mails serão apenas registrados no log");
                Arc::new(LogMailTransport)
            }
        };
        let email_service = EmailService::new(
            transport,
            settings.admin_email.clone(),
            settings.frontend_url.clone(),
        );

        let user_repo = UserRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let coupon_repo = CouponRepository::new(db_pool.clone());
        let inquiry_repo = InquiryRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            email_service.clone(),
            settings.clone(),
            db_pool.clone(),
        );
        let property_service = PropertyService::new(property_repo.clone());
        let lead_service = LeadService::new(lead_repo.clone(), user_repo.clone(), email_service.clone());
        let agent_service = AgentService::new(user_repo.clone(), lead_repo);
        let user_service = UserService::new(user_repo.clone());
        let coupon_service = CouponService::new(coupon_repo.clone());
        let inquiry_service = InquiryService::new(
            inquiry_repo,
            property_repo,
            user_repo,
            email_service.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo, coupon_repo);

        Self {
            db_pool,
            settings,
            i18n_store: I18nStore::new(),
            auth_service,
            property_service,
            lead_service,
            agent_service,
            user_service,
            coupon_service,
            inquiry_service,
            email_service,
            dashboard_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/realty"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:3000");
        assert_eq!(settings.db_max_connections, 5);
        assert_eq!(settings.jwt_ttl_days, 7);
        assert!(settings.cors_origins.is_empty());
        assert_eq!(settings.frontend_url, "http://localhost:5173");
        assert!(settings.admin_registration_key.is_none());
        assert!(settings.mail_api_url.is_none());
    }

    #[test]
    fn requires_database_url_and_secret() {
        assert!(Settings::from_lookup(lookup(&[("JWT_SECRET", "x")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).is_err());
        // Vazio conta como ausente
        assert!(Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn parses_cors_list_and_trims_frontend_url() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("CORS_ORIGINS", "http://a.com, http://b.com ,"),
            ("FRONTEND_URL", "https://imoveis.com/"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(settings.cors_origins, vec!["http://a.com", "http://b.com"]);
        assert_eq!(settings.frontend_url, "https://imoveis.com");
        assert_eq!(settings.db_max_connections, 12);
    }

    #[test]
    fn rejects_non_numeric_values() {
        let result = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("JWT_TTL_DAYS", "sete"),
        ]));
        assert!(result.is_err());
    }
}
