// src/models/agent.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- PLANOS DE ASSINATURA ---
// Tabela única plano -> cota mensal de leads. O frontend consulta /api/admin/plans
// em vez de manter a própria cópia.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MembershipPlan {
    Essential,
    Accelerate,
    Priority,
    Prestige,
    #[serde(rename = "")]
    None,
}

impl MembershipPlan {
    pub const ALL: [MembershipPlan; 4] = [
        MembershipPlan::Essential,
        MembershipPlan::Accelerate,
        MembershipPlan::Priority,
        MembershipPlan::Prestige,
    ];

    /// Nome desconhecido (ou vazio) vira `None`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "Essential" => MembershipPlan::Essential,
            "Accelerate" => MembershipPlan::Accelerate,
            "Priority" => MembershipPlan::Priority,
            "Prestige" => MembershipPlan::Prestige,
            _ => MembershipPlan::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipPlan::Essential => "Essential",
            MembershipPlan::Accelerate => "Accelerate",
            MembershipPlan::Priority => "Priority",
            MembershipPlan::Prestige => "Prestige",
            MembershipPlan::None => "",
        }
    }

    pub fn leads_per_month(&self) -> u32 {
        match self {
            MembershipPlan::Essential => 1,
            MembershipPlan::Accelerate => 2,
            MembershipPlan::Priority => 3,
            MembershipPlan::Prestige => 4,
            MembershipPlan::None => 0,
        }
    }
}

// agentInfo.membership
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[schema(example = "Priority")]
    pub plan: String,
    #[schema(example = 3)]
    pub leads_per_month: u32,
}

impl Membership {
    pub fn from_plan_name(name: &str) -> Self {
        let plan = MembershipPlan::from_name(name);
        Self {
            plan: plan.as_str().to_string(),
            leads_per_month: plan.leads_per_month(),
        }
    }
}

// Linha da tabela de planos (GET /api/admin/plans)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub name: String,
    pub leads_per_month: u32,
}

// Cota calculada na hora (nada é persistido)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotaSummary {
    pub suggested: u32,
    pub assigned: u32,
    pub remaining: u32,
}

// Corretor + plano + cota (GET /api/admin/agents)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub agent_info: AgentMembershipInfo,
    pub quota: QuotaSummary,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentMembershipInfo {
    pub membership: Membership,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMembershipPayload {
    // '' remove o plano
    #[schema(example = "Accelerate")]
    pub plan: MembershipPlan,
}
