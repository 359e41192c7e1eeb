// Entity materializers - mapping functions from (project snapshot,
// operator customization) to a new downstream entity payload.
//
// Materializers have no awareness of the flow DAG and never touch the
// store. Apart from the freshly assigned id and insertion timestamps,
// every produced field is a deterministic function of its inputs.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use helios_shared::{
    Activity, Notification, Project, Purchase, PurchaseBilling, PurchaseDelivery, PurchaseItem,
    Receipt, Responsible, Revenue,
};

use super::node::EntityKind;
use crate::error::{AutomationError, AutomationResult};

/// Default unit of measure for purchase composition lines.
const UNIT_EACH: &str = "UN";

/// Operator-supplied overrides merged into a materializer's default
/// mapping. All fields optional; missing ones fall back to values derived
/// from the source project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub responsaveis: Option<Vec<Responsible>>,
    pub destinatarios: Option<Vec<Responsible>>,
    pub mensagem: Option<String>,
}

/// A materialized entity, ready for bulk insertion into its collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityPayload {
    Activity(Activity),
    Revenue(Revenue),
    Purchase(Purchase),
    Notification(Notification),
}

impl EntityPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Activity(_) => EntityKind::Activity,
            Self::Revenue(_) => EntityKind::Revenue,
            Self::Purchase(_) => EntityKind::Purchase,
            Self::Notification(_) => EntityKind::Notification,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Activity(a) => a.id,
            Self::Revenue(r) => r.id,
            Self::Purchase(p) => p.id,
            Self::Notification(n) => n.id,
        }
    }

    pub fn project_id(&self) -> Option<Uuid> {
        match self {
            Self::Activity(a) => a.id_projeto,
            Self::Revenue(r) => r.id_projeto,
            Self::Purchase(p) => p.id_projeto,
            Self::Notification(_) => None,
        }
    }
}

/// Materialize the entity a fired node produces. Commission and service
/// order targets are declared by the authoring layer but have no
/// materializer yet; requesting them is an explicit error, never a silent
/// no-op.
pub fn materialize(
    kind: EntityKind,
    project: &Project,
    customization: &Customization,
) -> AutomationResult<EntityPayload> {
    match kind {
        EntityKind::Activity => Ok(EntityPayload::Activity(activity(project, customization))),
        EntityKind::Revenue => Ok(EntityPayload::Revenue(revenue(project, customization))),
        EntityKind::Purchase => Ok(EntityPayload::Purchase(purchase(project, customization))),
        EntityKind::Notification => Ok(EntityPayload::Notification(notification(
            project,
            customization,
        ))),
        EntityKind::Project | EntityKind::Commission | EntityKind::ServiceOrder => {
            Err(AutomationError::UnimplementedTarget(kind))
        }
    }
}

fn activity(project: &Project, customization: &Customization) -> Activity {
    Activity {
        id: Uuid::new_v4(),
        id_projeto: Some(project.id),
        titulo: customization
            .titulo
            .clone()
            .unwrap_or_else(|| format!("Acompanhamento - {}", project.nome)),
        descricao: customization.descricao.clone().unwrap_or_default(),
        responsaveis: customization
            .responsaveis
            .clone()
            .unwrap_or_else(|| project.responsaveis.clone()),
        autor: Responsible::automation(),
        id_oportunidade: project.id_oportunidade.clone(),
        id_homologacao: project.id_homologacao.clone(),
        id_analise_tecnica: project.id_analise_tecnica.clone(),
        data_vencimento: None,
        data_conclusao: None,
        data_insercao: Utc::now(),
    }
}

fn revenue(project: &Project, customization: &Customization) -> Revenue {
    let total = project.venda.valor;
    let recebimentos = project
        .venda
        .fracionamento
        .iter()
        .map(|fraction| Receipt {
            percentual: fraction.percentual,
            valor: (total * fraction.percentual / Decimal::from(100)).round_dp(2),
            metodo_pagamento: fraction.metodo_pagamento.clone(),
            efetivado: false,
        })
        .collect();

    Revenue {
        id: Uuid::new_v4(),
        id_projeto: Some(project.id),
        id_oportunidade: project.id_oportunidade.clone(),
        nome: customization
            .titulo
            .clone()
            .unwrap_or_else(|| format!("Receita - {}", project.nome)),
        total,
        recebimentos,
        autor: Responsible::automation(),
        data_insercao: Utc::now(),
    }
}

fn purchase(project: &Project, customization: &Customization) -> Purchase {
    let composicao = project
        .produtos
        .iter()
        .map(|product| PurchaseItem {
            categoria: product.categoria.clone(),
            descricao: product.descricao.clone(),
            qtde: product.qtde,
            valor: Decimal::ZERO,
            grandeza: UNIT_EACH.to_string(),
        })
        .collect();

    Purchase {
        id: Uuid::new_v4(),
        id_projeto: Some(project.id),
        nome: customization
            .titulo
            .clone()
            .unwrap_or_else(|| format!("Compra - {}", project.nome)),
        composicao,
        data_liberacao: Some(Utc::now()),
        entrega: PurchaseDelivery::default(),
        faturamento: PurchaseBilling::default(),
        autor: Responsible::automation(),
        data_insercao: Utc::now(),
    }
}

fn notification(project: &Project, customization: &Customization) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        destinatarios: customization
            .destinatarios
            .clone()
            .unwrap_or_else(|| project.responsaveis.clone()),
        mensagem: customization
            .mensagem
            .clone()
            .unwrap_or_else(|| format!("Atualização automática do projeto {}", project.nome)),
        id_oportunidade: project.id_oportunidade.clone(),
        remetente: Responsible::automation(),
        data_leitura: None,
        data_insercao: Utc::now(),
    }
}
