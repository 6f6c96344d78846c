// src/services/agent_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadRepository, UserRepository},
    models::{
        agent::{AgentMembershipInfo, AgentSummary, Membership, MembershipPlan, PlanEntry, QuotaSummary},
        auth::User,
    },
    services::quota,
};

/// Tabela de planos exposta ao frontend.
pub fn plan_table() -> Vec<PlanEntry> {
    MembershipPlan::ALL
        .iter()
        .map(|plan| PlanEntry {
            name: plan.as_str().to_string(),
            leads_per_month: plan.leads_per_month(),
        })
        .collect()
}

pub fn agent_summary(agent: User, assignments: &[Option<Uuid>]) -> AgentSummary {
    let quota = quota::summarize(&agent.membership_plan, agent.id, assignments);
    AgentSummary {
        agent_info: AgentMembershipInfo {
            membership: Membership::from_plan_name(&agent.membership_plan),
        },
        quota,
        id: agent.id,
        name: agent.name,
        email: agent.email,
        phone: agent.phone,
        address: agent.address,
    }
}

#[derive(Clone)]
pub struct AgentService {
    user_repo: UserRepository,
    lead_repo: LeadRepository,
}

impl AgentService {
    pub fn new(user_repo: UserRepository, lead_repo: LeadRepository) -> Self {
        Self { user_repo, lead_repo }
    }

    async fn find_agent(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .filter(User::is_agent)
            .ok_or_else(|| AppError::ResourceNotFound("Agent".to_string()))
    }

    /// Corretores com plano e cota, recalculada a partir de todos os leads.
    pub async fn list(&self) -> Result<Vec<AgentSummary>, AppError> {
        let agents = self.user_repo.list_agents().await?;
        let assignments = self.lead_repo.list_assignments().await?;

        Ok(agents
            .into_iter()
            .map(|agent| agent_summary(agent, &assignments))
            .collect())
    }

    pub async fn quota(&self, id: Uuid) -> Result<QuotaSummary, AppError> {
        let agent = self.find_agent(id).await?;
        let assignments = self.lead_repo.list_assignments().await?;
        Ok(quota::summarize(&agent.membership_plan, agent.id, &assignments))
    }

    pub async fn set_membership(&self, id: Uuid, plan: MembershipPlan) -> Result<AgentSummary, AppError> {
        let agent = self
            .user_repo
            .set_membership_plan(id, plan.as_str())
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Agent".to_string()))?;
        tracing::info!("📋 Plano do corretor {} agora é '{}'", id, plan.as_str());

        let assignments = self.lead_repo.list_assignments().await?;
        Ok(agent_summary(agent, &assignments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::auth::UserRole;

    fn agent(plan: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Bia".into(),
            email: "bia@imoveis.test".into(),
            password_hash: String::new(),
            role: UserRole::Agent,
            phone: Some("81 99999-0000".into()),
            address: None,
            membership_plan: plan.into(),
            agent_bio: None,
            license_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn plan_table_is_ordered_by_tier() {
        let table = plan_table();
        let names: Vec<&str> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Essential", "Accelerate", "Priority", "Prestige"]);
        assert_eq!(table.iter().map(|p| p.leads_per_month).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn summary_carries_membership_and_quota() {
        let bia = agent("Priority");
        let other = Uuid::new_v4();
        let assignments = vec![Some(bia.id), Some(other), Some(bia.id), None];

        let summary = agent_summary(bia, &assignments);
        assert_eq!(summary.agent_info.membership.plan, "Priority");
        assert_eq!(summary.agent_info.membership.leads_per_month, 3);
        assert_eq!(summary.quota, QuotaSummary { suggested: 3, assigned: 2, remaining: 1 });
    }

    #[test]
    fn agent_without_plan_has_zero_quota() {
        let summary = agent_summary(agent(""), &[]);
        assert_eq!(summary.agent_info.membership.plan, "");
        assert_eq!(summary.quota, QuotaSummary { suggested: 0, assigned: 0, remaining: 0 });
    }
}
