// Condition data - the flat snapshot a trigger is evaluated against.
//
// The snapshot is a closed set of named fields computed fresh from the
// tracked entity. Lookups by variable name fail closed: an unrecognized
// variable yields a zero value, never an error.

use helios_shared::{Activity, FLAG_NO, FLAG_YES, Project};

/// Variable names a flow trigger may reference. These are the operator
/// facing keys stored verbatim inside configured triggers.
pub mod variables {
    pub const PROJECT_APPROVED: &str = "projetoAprovado";
    pub const CONTRACT_STATUS: &str = "statusContrato";
    pub const REVENUE_PERCENT_RECEIVED: &str = "percentualRecebido";
    pub const PURCHASE_PLACED: &str = "compraRealizada";
    pub const PURCHASE_DELIVERED: &str = "compraEntregue";
    pub const SERVICE_ORDER_CONCLUDED: &str = "ordemServicoConcluida";
    pub const ACTIVITY_CONCLUDED: &str = "atividadeConcluida";
}

/// A single condition-data value, either textual or numeric. Coercions are
/// total: text that does not parse as a number coerces to `0`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Text(String),
    Number(f64),
}

impl ConditionValue {
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                format!("{}", *n as i64)
            }
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Ephemeral per-evaluation snapshot of a tracked entity's relevant fields.
/// Never persisted; recomputed on every orchestrator pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionData {
    pub projeto_aprovado: String,
    pub status_contrato: String,
    /// Not yet computed upstream; stays at 0 until the cross-entity join
    /// for received revenue lands. See the projector notes below.
    pub percentual_recebido: f64,
    /// Not yet computed upstream; stays at "NÃO".
    pub compra_realizada: String,
    /// Not yet computed upstream; stays at "NÃO".
    pub compra_entregue: String,
    /// Not yet computed upstream; stays at "NÃO".
    pub ordem_servico_concluida: String,
    pub atividade_concluida: String,
}

impl Default for ConditionData {
    fn default() -> Self {
        Self {
            projeto_aprovado: FLAG_NO.to_string(),
            status_contrato: String::new(),
            percentual_recebido: 0.0,
            compra_realizada: FLAG_NO.to_string(),
            compra_entregue: FLAG_NO.to_string(),
            ordem_servico_concluida: FLAG_NO.to_string(),
            atividade_concluida: FLAG_NO.to_string(),
        }
    }
}

fn flag(set: bool) -> String {
    if set { FLAG_YES } else { FLAG_NO }.to_string()
}

impl ConditionData {
    /// Snapshot a project's automation-relevant state. The revenue,
    /// purchase and service-order fields require cross-entity joins that
    /// are not wired up yet; they keep their zero defaults so triggers on
    /// them can never match spuriously.
    pub fn from_project(project: &Project) -> Self {
        Self {
            projeto_aprovado: flag(project.aprovacao.data_aprovacao.is_some()),
            status_contrato: project.contrato.status.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Snapshot an activity: completion is derived from the completion
    /// timestamp being set.
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            atividade_concluida: flag(activity.is_concluded()),
            ..Self::default()
        }
    }

    /// Look up a trigger variable. Unrecognized variables fail closed to
    /// an empty text value, which coerces to `0` numerically and matches
    /// no equality or membership test against real flag values.
    pub fn get(&self, variable: &str) -> ConditionValue {
        match variable {
            variables::PROJECT_APPROVED => ConditionValue::Text(self.projeto_aprovado.clone()),
            variables::CONTRACT_STATUS => ConditionValue::Text(self.status_contrato.clone()),
            variables::REVENUE_PERCENT_RECEIVED => ConditionValue::Number(self.percentual_recebido),
            variables::PURCHASE_PLACED => ConditionValue::Text(self.compra_realizada.clone()),
            variables::PURCHASE_DELIVERED => ConditionValue::Text(self.compra_entregue.clone()),
            variables::SERVICE_ORDER_CONCLUDED => {
                ConditionValue::Text(self.ordem_servico_concluida.clone())
            }
            variables::ACTIVITY_CONCLUDED => ConditionValue::Text(self.atividade_concluida.clone()),
            _ => ConditionValue::Text(String::new()),
        }
    }
}
