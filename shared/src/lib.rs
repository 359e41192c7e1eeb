use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Business entities for the Helios solar CRM. Field names follow the
// persisted document format of the production database (Portuguese wire
// names, camelCase), so every struct carries serde renames accordingly.

/// Sentinel author id stamped on entities created by the automation engine
/// instead of a real user id.
pub const AUTOMATION_AUTHOR_ID: &str = "AUTOMATION";

/// Flag value used by persisted yes/no fields.
pub const FLAG_YES: &str = "SIM";
/// Flag value used by persisted yes/no fields.
pub const FLAG_NO: &str = "NÃO";

/// A user reference embedded in documents (responsible party, author,
/// notification recipient). Ids are external auth-system ids, not UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsible {
    pub id: String,
    pub nome: String,
}

impl Responsible {
    pub fn new(id: &str, nome: &str) -> Self {
        Self {
            id: id.to_string(),
            nome: nome.to_string(),
        }
    }

    /// The sentinel author used when the automation engine creates an entity.
    pub fn automation() -> Self {
        Self::new(AUTOMATION_AUTHOR_ID, "Automação")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectApproval {
    pub data_aprovacao: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContract {
    pub status: Option<String>,
    pub data_assinatura: Option<DateTime<Utc>>,
}

/// One step of the configured payment-fractionation schedule of a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFraction {
    pub percentual: Decimal,
    pub metodo_pagamento: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSale {
    pub valor: Decimal,
    pub fracionamento: Vec<PaymentFraction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProduct {
    pub categoria: String,
    pub descricao: String,
    pub qtde: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub nome: String,
    pub identificador: Option<String>,
    pub id_oportunidade: Option<String>,
    pub id_homologacao: Option<String>,
    pub id_analise_tecnica: Option<String>,
    pub responsaveis: Vec<Responsible>,
    #[serde(default)]
    pub aprovacao: ProjectApproval,
    #[serde(default)]
    pub contrato: ProjectContract,
    #[serde(default)]
    pub venda: ProjectSale,
    #[serde(default)]
    pub produtos: Vec<ProjectProduct>,
    pub data_insercao: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub id_projeto: Option<Uuid>,
    pub titulo: String,
    pub descricao: String,
    pub responsaveis: Vec<Responsible>,
    pub autor: Responsible,
    pub id_oportunidade: Option<String>,
    pub id_homologacao: Option<String>,
    pub id_analise_tecnica: Option<String>,
    pub data_vencimento: Option<DateTime<Utc>>,
    pub data_conclusao: Option<DateTime<Utc>>,
    pub data_insercao: DateTime<Utc>,
}

impl Activity {
    pub fn is_concluded(&self) -> bool {
        self.data_conclusao.is_some()
    }
}

/// One expected receipt of a revenue, derived from the sale fractionation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub percentual: Decimal,
    pub valor: Decimal,
    pub metodo_pagamento: String,
    pub efetivado: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    pub id: Uuid,
    pub id_projeto: Option<Uuid>,
    pub id_oportunidade: Option<String>,
    pub nome: String,
    pub total: Decimal,
    pub recebimentos: Vec<Receipt>,
    pub autor: Responsible,
    pub data_insercao: DateTime<Utc>,
}

/// One line of a purchase composition, mapped from the project's products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub categoria: String,
    pub descricao: String,
    pub qtde: i32,
    pub valor: Decimal,
    pub grandeza: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDelivery {
    pub endereco: Option<String>,
    pub data_entrega: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBilling {
    pub documento: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub id_projeto: Option<Uuid>,
    pub nome: String,
    pub composicao: Vec<PurchaseItem>,
    pub data_liberacao: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entrega: PurchaseDelivery,
    #[serde(default)]
    pub faturamento: PurchaseBilling,
    pub autor: Responsible,
    pub data_insercao: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub destinatarios: Vec<Responsible>,
    pub mensagem: String,
    pub id_oportunidade: Option<String>,
    pub remetente: Responsible,
    pub data_leitura: Option<DateTime<Utc>>,
    pub data_insercao: DateTime<Utc>,
}
