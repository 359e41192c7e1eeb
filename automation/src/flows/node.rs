// Flow nodes - persisted automation instances, one per configured
// automation attached to a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::materializers::Customization;
use super::triggers::Trigger;

/// The closed set of business-entity kinds the engine knows. Used both for
/// what a node watches (activation) and for what it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Project,
    Activity,
    Revenue,
    Purchase,
    Notification,
    Commission,
    ServiceOrder,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Project => "Project",
            Self::Activity => "Activity",
            Self::Revenue => "Revenue",
            Self::Purchase => "Purchase",
            Self::Notification => "Notification",
            Self::Commission => "Commission",
            Self::ServiceOrder => "ServiceOrder",
        };
        f.write_str(name)
    }
}

/// What a node watches: an entity kind plus, once known, the specific
/// instance id. `entity_id` starts out unset for nodes whose activating
/// entity does not exist yet; the dependency linker fills it in when the
/// parent node fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    pub entity_kind: EntityKind,
    pub entity_id: Option<Uuid>,
    pub trigger: Trigger,
}

/// What a node creates when it fires, plus operator overrides merged into
/// the materializer's default mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub entity_kind: EntityKind,
    #[serde(default)]
    pub customization: Customization,
}

/// Authoring-canvas coordinates. Carried opaquely; irrelevant to runtime
/// semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub x: f64,
    pub y: f64,
}

/// One persisted automation instance scoped to a project ("process flow
/// reference"). `executed_at` is the sole idempotency guard: once set, the
/// node is terminal and must never be evaluated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: Uuid,
    pub project_id: Uuid,
    /// The node whose firing is expected to produce the entity that
    /// activates this node. Edges form a DAG per project.
    pub parent_flow_id: Option<Uuid>,
    pub activation: Activation,
    pub produces: Production,
    #[serde(default)]
    pub canvas: Canvas,
    pub executed_at: Option<DateTime<Utc>>,
    pub inserted_at: DateTime<Utc>,
}

impl FlowNode {
    pub fn is_pending(&self) -> bool {
        self.executed_at.is_none()
    }

    /// Whether this node is eligible for evaluation in a pass triggered by
    /// the given entity: pending, same kind, and linked to that instance.
    pub fn is_activated_by(&self, kind: EntityKind, entity_id: Uuid) -> bool {
        self.is_pending()
            && self.activation.entity_kind == kind
            && self.activation.entity_id == Some(entity_id)
    }
}
