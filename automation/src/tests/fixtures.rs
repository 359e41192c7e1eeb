use chrono::Utc;
use fake::{Fake, Faker};
use rust_decimal::Decimal;
use uuid::Uuid;

use helios_shared::{
    Activity, FLAG_YES, PaymentFraction, Project, ProjectApproval, ProjectContract,
    ProjectProduct, ProjectSale, Responsible,
};

use crate::flows::conditions::variables;
use crate::flows::{
    Activation, Canvas, Customization, EntityKind, FlowNode, Production, Trigger,
};

// Test fixtures for creating sample data

pub struct ProjectFixture {
    project: Project,
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self {
            project: Project {
                id: Uuid::new_v4(),
                nome: Faker.fake(),
                identificador: Some(format!("{:04}", (1000..9999).fake::<u32>())),
                id_oportunidade: Some(Uuid::new_v4().to_string()),
                id_homologacao: None,
                id_analise_tecnica: None,
                responsaveis: Vec::new(),
                aprovacao: ProjectApproval::default(),
                contrato: ProjectContract::default(),
                venda: ProjectSale::default(),
                produtos: Vec::new(),
                data_insercao: Utc::now(),
            },
        }
    }
}

impl ProjectFixture {
    pub fn approved() -> Self {
        let mut fixture = Self::default();
        fixture.project.aprovacao.data_aprovacao = Some(Utc::now());
        fixture
    }

    pub fn with_responsible(mut self, id: &str, nome: &str) -> Self {
        self.project.responsaveis.push(Responsible::new(id, nome));
        self
    }

    pub fn with_sale(mut self, valor: Decimal, fracionamento: Vec<PaymentFraction>) -> Self {
        self.project.venda = ProjectSale {
            valor,
            fracionamento,
        };
        self
    }

    pub fn with_product(mut self, categoria: &str, descricao: &str, qtde: i32) -> Self {
        self.project.produtos.push(ProjectProduct {
            categoria: categoria.to_string(),
            descricao: descricao.to_string(),
            qtde,
        });
        self
    }

    pub fn build(self) -> Project {
        self.project
    }
}

pub struct ActivityFixture {
    activity: Activity,
}

impl ActivityFixture {
    pub fn for_project(project_id: Uuid) -> Self {
        Self {
            activity: Activity {
                id: Uuid::new_v4(),
                id_projeto: Some(project_id),
                titulo: Faker.fake(),
                descricao: Faker.fake(),
                responsaveis: Vec::new(),
                autor: Responsible::new("u0", "Gestor"),
                id_oportunidade: None,
                id_homologacao: None,
                id_analise_tecnica: None,
                data_vencimento: None,
                data_conclusao: None,
                data_insercao: Utc::now(),
            },
        }
    }

    pub fn completed(mut self) -> Self {
        self.activity.data_conclusao = Some(Utc::now());
        self
    }

    pub fn build(self) -> Activity {
        self.activity
    }
}

pub struct FlowNodeFixture {
    node: FlowNode,
}

impl FlowNodeFixture {
    fn base(project_id: Uuid, activation: Activation, produces: EntityKind) -> Self {
        Self {
            node: FlowNode {
                id: Uuid::new_v4(),
                project_id,
                parent_flow_id: None,
                activation,
                produces: Production {
                    entity_kind: produces,
                    customization: Customization::default(),
                },
                canvas: Canvas::default(),
                executed_at: None,
                inserted_at: Utc::now(),
            },
        }
    }

    /// Node watching its own project for approval, producing a revenue.
    pub fn project_approved(project_id: Uuid) -> Self {
        Self::base(
            project_id,
            Activation {
                entity_kind: EntityKind::Project,
                entity_id: Some(project_id),
                trigger: Trigger::EqualsText {
                    variable: variables::PROJECT_APPROVED.to_string(),
                    equals: FLAG_YES.to_string(),
                },
            },
            EntityKind::Revenue,
        )
    }

    /// Node watching an activity for completion, producing a notification.
    /// `activity_id` is `None` for nodes whose activating activity does
    /// not exist yet.
    pub fn activity_concluded(project_id: Uuid, activity_id: Option<Uuid>) -> Self {
        Self::base(
            project_id,
            Activation {
                entity_kind: EntityKind::Activity,
                entity_id: activity_id,
                trigger: Trigger::EqualsText {
                    variable: variables::ACTIVITY_CONCLUDED.to_string(),
                    equals: FLAG_YES.to_string(),
                },
            },
            EntityKind::Notification,
        )
    }

    /// Unlinked node waiting for a revenue its parent will produce.
    pub fn waiting_for_revenue(project_id: Uuid, parent_id: Uuid) -> Self {
        Self::base(
            project_id,
            Activation {
                entity_kind: EntityKind::Revenue,
                entity_id: None,
                trigger: Trigger::GreaterThan {
                    variable: variables::REVENUE_PERCENT_RECEIVED.to_string(),
                    greater_than: 99.0,
                },
            },
            EntityKind::Notification,
        )
        .with_parent(parent_id)
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.node.parent_flow_id = Some(parent_id);
        self
    }

    pub fn producing(mut self, kind: EntityKind) -> Self {
        self.node.produces.entity_kind = kind;
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.node.activation.trigger = trigger;
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.node.produces.customization = customization;
        self
    }

    pub fn build(self) -> FlowNode {
        self.node
    }
}
