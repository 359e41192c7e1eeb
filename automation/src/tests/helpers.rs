use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use helios_shared::{Activity, Notification, Project, Purchase, Revenue};

use crate::error::AutomationResult;
use crate::flows::{EntityKind, EntityPayload, FlowNode};
use crate::store::AutomationStore;

/// Snapshot of everything the in-memory store holds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryState {
    pub projects: HashMap<Uuid, Project>,
    pub activities: HashMap<Uuid, Activity>,
    pub nodes: Vec<FlowNode>,
    pub revenues: Vec<Revenue>,
    pub purchases: Vec<Purchase>,
    pub notifications: Vec<Notification>,
}

/// In-memory automation store used by scenario tests. Relies on the
/// trait's default `commit_firing`, so the sequential
/// materialize-then-mark path gets exercised too.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_project(&self, project: Project) {
        self.state.lock().await.projects.insert(project.id, project);
    }

    pub async fn seed_activity(&self, activity: Activity) {
        self.state
            .lock()
            .await
            .activities
            .insert(activity.id, activity);
    }

    pub async fn seed_node(&self, node: FlowNode) {
        self.state.lock().await.nodes.push(node);
    }

    pub async fn snapshot(&self) -> InMemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl AutomationStore for InMemoryStore {
    async fn find_project(&self, id: Uuid) -> AutomationResult<Option<Project>> {
        Ok(self.state.lock().await.projects.get(&id).cloned())
    }

    async fn find_activity(&self, id: Uuid) -> AutomationResult<Option<Activity>> {
        Ok(self.state.lock().await.activities.get(&id).cloned())
    }

    async fn find_pending(&self, project_id: Uuid) -> AutomationResult<Vec<FlowNode>> {
        Ok(self
            .state
            .lock()
            .await
            .nodes
            .iter()
            .filter(|node| node.project_id == project_id && node.is_pending())
            .cloned()
            .collect())
    }

    async fn mark_executed(&self, node_ids: &[Uuid], at: DateTime<Utc>) -> AutomationResult<()> {
        let mut state = self.state.lock().await;
        for node in state.nodes.iter_mut() {
            if node_ids.contains(&node.id) && node.is_pending() {
                node.executed_at = Some(at);
            }
        }
        Ok(())
    }

    async fn link_activation(&self, node_id: Uuid, entity_id: Uuid) -> AutomationResult<()> {
        let mut state = self.state.lock().await;
        if let Some(node) = state.nodes.iter_mut().find(|node| node.id == node_id) {
            node.activation.entity_id = Some(entity_id);
        }
        Ok(())
    }

    async fn insert_entities(
        &self,
        _kind: EntityKind,
        payloads: &[EntityPayload],
    ) -> AutomationResult<Vec<Uuid>> {
        let mut state = self.state.lock().await;
        let mut ids = Vec::with_capacity(payloads.len());
        for payload in payloads {
            ids.push(payload.id());
            match payload {
                EntityPayload::Activity(a) => {
                    state.activities.insert(a.id, a.clone());
                }
                EntityPayload::Revenue(r) => state.revenues.push(r.clone()),
                EntityPayload::Purchase(p) => state.purchases.push(p.clone()),
                EntityPayload::Notification(n) => state.notifications.push(n.clone()),
            }
        }
        Ok(ids)
    }
}

/// Wrapper that injects latency into the pending-node query, for timeout
/// tests.
pub struct SlowStore {
    pub inner: InMemoryStore,
    pub delay: Duration,
}

#[async_trait]
impl AutomationStore for SlowStore {
    async fn find_project(&self, id: Uuid) -> AutomationResult<Option<Project>> {
        self.inner.find_project(id).await
    }

    async fn find_activity(&self, id: Uuid) -> AutomationResult<Option<Activity>> {
        self.inner.find_activity(id).await
    }

    async fn find_pending(&self, project_id: Uuid) -> AutomationResult<Vec<FlowNode>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_pending(project_id).await
    }

    async fn mark_executed(&self, node_ids: &[Uuid], at: DateTime<Utc>) -> AutomationResult<()> {
        self.inner.mark_executed(node_ids, at).await
    }

    async fn link_activation(&self, node_id: Uuid, entity_id: Uuid) -> AutomationResult<()> {
        self.inner.link_activation(node_id, entity_id).await
    }

    async fn insert_entities(
        &self,
        kind: EntityKind,
        payloads: &[EntityPayload],
    ) -> AutomationResult<Vec<Uuid>> {
        self.inner.insert_entities(kind, payloads).await
    }
}
