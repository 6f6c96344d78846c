// src/services/quota.rs
//
// Cota sugerida de leads por corretor. Recalculada a cada requisição a partir
// da lista completa de leads; nada aqui é gravado e nada bloqueia atribuições.

use uuid::Uuid;

use crate::models::agent::{MembershipPlan, QuotaSummary};

/// Leads por mês que o plano dá direito (plano desconhecido ou vazio = 0).
pub fn suggested_quota(plan: &str) -> u32 {
    MembershipPlan::from_name(plan).leads_per_month()
}

/// Quantos leads estão atribuídos ao corretor. `assignments` é o `assigned_to` de cada lead.
pub fn assigned_count(agent_id: Uuid, assignments: &[Option<Uuid>]) -> u32 {
    assignments.iter().filter(|a| **a == Some(agent_id)).count() as u32
}

/// Nunca negativo.
pub fn remaining_quota(plan: &str, agent_id: Uuid, assignments: &[Option<Uuid>]) -> u32 {
    suggested_quota(plan).saturating_sub(assigned_count(agent_id, assignments))
}

pub fn summarize(plan: &str, agent_id: Uuid, assignments: &[Option<Uuid>]) -> QuotaSummary {
    let suggested = suggested_quota(plan);
    let assigned = assigned_count(agent_id, assignments);
    QuotaSummary {
        suggested,
        assigned,
        remaining: suggested.saturating_sub(assigned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_quota_table() {
        assert_eq!(suggested_quota("Essential"), 1);
        assert_eq!(suggested_quota("Accelerate"), 2);
        assert_eq!(suggested_quota("Priority"), 3);
        assert_eq!(suggested_quota("Prestige"), 4);
        assert_eq!(suggested_quota(""), 0);
        assert_eq!(suggested_quota("Gold"), 0);
        // Nome exato, sem normalizar caixa
        assert_eq!(suggested_quota("priority"), 0);
    }

    #[test]
    fn counts_only_the_agents_leads() {
        let agent = Uuid::new_v4();
        let other = Uuid::new_v4();
        let assignments = vec![Some(agent), Some(other), None, Some(agent)];
        assert_eq!(assigned_count(agent, &assignments), 2);
        assert_eq!(assigned_count(other, &assignments), 1);
        assert_eq!(assigned_count(Uuid::new_v4(), &assignments), 0);
    }

    #[test]
    fn priority_agent_quota_drains_to_zero_and_stays_there() {
        let agent = Uuid::new_v4();
        let mut assignments = vec![Some(agent), Some(agent), None];
        assert_eq!(remaining_quota("Priority", agent, &assignments), 1);

        assignments.push(Some(agent));
        assert_eq!(remaining_quota("Priority", agent, &assignments), 0);

        // Atribuir além da cota é permitido; o restante não fica negativo
        assignments.push(Some(agent));
        assert_eq!(remaining_quota("Priority", agent, &assignments), 0);
        assert_eq!(
            summarize("Priority", agent, &assignments),
            QuotaSummary { suggested: 3, assigned: 4, remaining: 0 }
        );
    }

    #[test]
    fn agent_without_plan_has_no_quota() {
        let agent = Uuid::new_v4();
        assert_eq!(remaining_quota("", agent, &[]), 0);
        assert_eq!(summarize("", agent, &[Some(agent)]).assigned, 1);
    }
}
