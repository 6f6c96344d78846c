// src/services/lead_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadRepository, UserRepository},
    models::{
        agent::QuotaSummary,
        auth::User,
        lead::{CreateLeadPayload, Lead, LeadQuery, LeadSubmissionPayload, UpdateLeadPayload},
    },
    services::{email_service::EmailService, quota},
};

const DEFAULT_SOURCE: &str = "website";

// Envio público: status e atribuição ficam no padrão
impl From<LeadSubmissionPayload> for CreateLeadPayload {
    fn from(p: LeadSubmissionPayload) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone: p.phone,
            requirements: p.requirements,
            category: p.category,
            label: None,
            status: None,
            country: p.country,
            state_province: p.state_province,
            city: p.city,
            internal_note: None,
            assigned_to: None,
            source: Some(
                p.source
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            ),
        }
    }
}

/// A cota é só sugestão: passar dela gera aviso, nunca erro.
pub fn over_quota(summary: &QuotaSummary) -> bool {
    summary.assigned > summary.suggested
}

// Corretor mudou para alguém novo (não conta remoção nem reatribuição ao mesmo)
fn newly_assigned(previous: Option<Uuid>, current: Option<Uuid>) -> Option<Uuid> {
    match current {
        Some(agent_id) if previous != Some(agent_id) => Some(agent_id),
        _ => None,
    }
}

fn not_found() -> AppError {
    AppError::ResourceNotFound("Lead".to_string())
}

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    user_repo: UserRepository,
    email_service: EmailService,
}

impl LeadService {
    pub fn new(repo: LeadRepository, user_repo: UserRepository, email_service: EmailService) -> Self {
        Self { repo, user_repo, email_service }
    }

    // `assignedTo` precisa apontar para um usuário com papel de corretor
    async fn require_agent(&self, agent_id: Uuid) -> Result<User, AppError> {
        match self.user_repo.find_by_id(agent_id).await? {
            Some(user) if user.is_agent() => Ok(user),
            _ => Err(AppError::InvalidAgent(agent_id)),
        }
    }

    pub async fn submit(&self, payload: LeadSubmissionPayload) -> Result<Lead, AppError> {
        let lead = self.repo.create(&payload.into()).await?;
        tracing::info!("📥 Novo lead {} recebido (origem: {})", lead.id, lead.source);
        Ok(lead)
    }

    pub async fn create(&self, payload: &CreateLeadPayload) -> Result<Lead, AppError> {
        let agent = match payload.assigned_to {
            Some(agent_id) => Some(self.require_agent(agent_id).await?),
            None => None,
        };

        let lead = self.repo.create(payload).await?;
        tracing::info!("📥 Lead {} cadastrado pelo admin", lead.id);

        if let Some(agent) = agent {
            self.after_assignment(&agent, &lead).await?;
        }
        Ok(lead)
    }

    pub async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>, AppError> {
        self.repo.list(query).await
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateLeadPayload) -> Result<Lead, AppError> {
        let current = self.repo.find_by_id(id).await?.ok_or_else(not_found)?;

        let new_agent = match payload.assigned_to {
            Some(Some(agent_id)) => match newly_assigned(current.assigned_to, Some(agent_id)) {
                Some(agent_id) => Some(self.require_agent(agent_id).await?),
                None => None,
            },
            _ => None,
        };

        let lead = self.repo.update(id, payload).await?.ok_or_else(not_found)?;
        if payload.assigned_to == Some(None) && current.assigned_to.is_some() {
            tracing::info!("Lead {} sem corretor agora", id);
        }

        if let Some(agent) = new_agent {
            self.after_assignment(&agent, &lead).await?;
        }
        Ok(lead)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!("🗑️ Lead {} removido", id);
        Ok(())
    }

    // Recalcula a cota (já contando este lead), avisa se passou e notifica o corretor
    async fn after_assignment(&self, agent: &User, lead: &Lead) -> Result<(), AppError> {
        let assignments = self.repo.list_assignments().await?;
        let summary = quota::summarize(&agent.membership_plan, agent.id, &assignments);

        if over_quota(&summary) {
            tracing::warn!(
                "⚠️ Corretor {} passou da cota sugerida: {} atribuídos para {} do plano '{}'",
                agent.id,
                summary.assigned,
                summary.suggested,
                agent.membership_plan
            );
        } else {
            tracing::info!("🤝 Lead {} atribuído a {} ({} restantes)", lead.id, agent.id, summary.remaining);
        }

        if let Err(e) = self.email_service.send_lead_assigned(agent, lead, summary).await {
            tracing::warn!("⚠️ Falha ao avisar o corretor {} sobre o lead {}: {}", agent.id, lead.id, e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(source: Option<&str>) -> LeadSubmissionPayload {
        LeadSubmissionPayload {
            first_name: "Carlos".into(),
            last_name: Some("Pereira".into()),
            email: "carlos@email.com".into(),
            phone: None,
            requirements: Some("3 quartos".into()),
            category: None,
            country: None,
            state_province: None,
            city: Some("Recife".into()),
            source: source.map(String::from),
        }
    }

    #[test]
    fn public_submission_is_pending_and_unassigned() {
        let payload: CreateLeadPayload = submission(None).into();
        assert_eq!(payload.status, None);
        assert_eq!(payload.assigned_to, None);
        assert_eq!(payload.internal_note, None);
        assert_eq!(payload.source.as_deref(), Some("website"));
        assert_eq!(payload.city.as_deref(), Some("Recife"));
    }

    #[test]
    fn submission_keeps_an_explicit_source() {
        let payload: CreateLeadPayload = submission(Some("instagram")).into();
        assert_eq!(payload.source.as_deref(), Some("instagram"));

        let blank: CreateLeadPayload = submission(Some("  ")).into();
        assert_eq!(blank.source.as_deref(), Some("website"));
    }

    #[test]
    fn quota_overflow_is_detected_without_blocking() {
        let agent = Uuid::new_v4();
        let mut assignments = vec![Some(agent), Some(agent), None];

        assignments.push(Some(agent));
        let third = quota::summarize("Priority", agent, &assignments);
        assert_eq!(third.remaining, 0);
        assert!(!over_quota(&third));

        assignments.push(Some(agent));
        let fourth = quota::summarize("Priority", agent, &assignments);
        assert_eq!(fourth.remaining, 0);
        assert!(over_quota(&fourth));
    }

    #[test]
    fn only_a_new_agent_counts_as_assignment() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(newly_assigned(None, Some(a)), Some(a));
        assert_eq!(newly_assigned(Some(a), Some(b)), Some(b));
        assert_eq!(newly_assigned(Some(a), Some(a)), None);
        assert_eq!(newly_assigned(Some(a), None), None);
    }
}
