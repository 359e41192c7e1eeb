// Store seams for the automation engine.
//
// All mutation of the pending-node set goes through this trait; the engine
// never caches node state across invocations. The Postgres implementation
// lives in `postgres`; tests run against an in-memory implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use helios_shared::{Activity, Project};

use crate::error::AutomationResult;
use crate::flows::{ActivationLink, EntityKind, EntityPayload, FlowNode};

pub mod postgres;

pub use postgres::PgAutomationStore;

/// One planned node firing: the node that matched and the payload it will
/// insert into its target collection.
#[derive(Debug, Clone)]
pub struct PlannedFiring {
    pub node_id: Uuid,
    pub payload: EntityPayload,
}

/// Everything one orchestrator pass wants to commit: the entity inserts,
/// the executed-mark for the fired nodes, and the activation rewrites for
/// their children.
#[derive(Debug, Clone)]
pub struct FiringBatch {
    pub project_id: Uuid,
    pub firings: Vec<PlannedFiring>,
    pub links: Vec<ActivationLink>,
    pub executed_at: DateTime<Utc>,
}

impl FiringBatch {
    pub fn node_ids(&self) -> Vec<Uuid> {
        self.firings.iter().map(|f| f.node_id).collect()
    }

    /// Payloads grouped by produced entity kind, preserving first-seen
    /// kind order, so each group maps to one bulk insert.
    pub fn grouped(&self) -> Vec<(EntityKind, Vec<EntityPayload>)> {
        let mut groups: Vec<(EntityKind, Vec<EntityPayload>)> = Vec::new();
        for firing in &self.firings {
            let kind = firing.payload.kind();
            match groups.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, payloads)) => payloads.push(firing.payload.clone()),
                None => groups.push((kind, vec![firing.payload.clone()])),
            }
        }
        groups
    }
}

/// What a committed firing actually wrote, for audit logging.
#[derive(Debug, Clone, Default)]
pub struct FiringReceipt {
    pub inserted: Vec<(EntityKind, Uuid)>,
    pub marked: Vec<Uuid>,
    pub linked: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AutomationStore: Send + Sync {
    /// Read-only lookup of a tracked project.
    async fn find_project(&self, id: Uuid) -> AutomationResult<Option<Project>>;

    /// Read-only lookup of a tracked activity.
    async fn find_activity(&self, id: Uuid) -> AutomationResult<Option<Activity>>;

    /// All flow nodes for a project with `executed_at` unset.
    async fn find_pending(&self, project_id: Uuid) -> AutomationResult<Vec<FlowNode>>;

    /// Stamp `executed_at` on exactly the given nodes as one multi-row
    /// update. Already-executed nodes are left untouched.
    async fn mark_executed(&self, node_ids: &[Uuid], at: DateTime<Utc>) -> AutomationResult<()>;

    /// Rewrite a node's activation reference to a newly created entity.
    async fn link_activation(&self, node_id: Uuid, entity_id: Uuid) -> AutomationResult<()>;

    /// Bulk-insert one kind group into its target collection, returning
    /// the inserted ids.
    async fn insert_entities(
        &self,
        kind: EntityKind,
        payloads: &[EntityPayload],
    ) -> AutomationResult<Vec<Uuid>>;

    /// Commit one firing pass. The default implementation applies the
    /// legs sequentially in materialize-then-mark order (inserts first,
    /// executed-mark second, links last), so a crash leaves re-driveable
    /// unmarked nodes rather than marked-but-unmaterialized ones. Stores
    /// with transactions override this with an atomic version.
    async fn commit_firing(&self, batch: &FiringBatch) -> AutomationResult<FiringReceipt> {
        let mut receipt = FiringReceipt::default();

        for (kind, payloads) in batch.grouped() {
            let ids = self.insert_entities(kind, &payloads).await?;
            receipt.inserted.extend(ids.into_iter().map(|id| (kind, id)));
        }

        let node_ids = batch.node_ids();
        self.mark_executed(&node_ids, batch.executed_at).await?;
        receipt.marked = node_ids;

        for link in &batch.links {
            self.link_activation(link.node_id, link.entity_id).await?;
        }
        receipt.linked = batch.links.len();

        Ok(receipt)
    }
}
