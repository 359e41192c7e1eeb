// Tracking orchestrators - the entry points the rest of the application
// calls whenever a tracked entity changes.
//
// One invocation is one pass over one project's pending flow nodes:
// load entity -> fetch pending -> filter by activation identity ->
// project condition data -> evaluate -> materialize -> commit
// (insert + executed-mark + dependency links). A node is never marked
// executed before its produced entity has been staged in the same commit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{error, info};
use uuid::Uuid;

use helios_shared::Project;

use crate::config::EngineConfig;
use crate::error::{AutomationError, AutomationResult};
use crate::store::{AutomationStore, FiringBatch, PlannedFiring};

use super::conditions::ConditionData;
use super::linker::link_dependents;
use super::materializers::materialize;
use super::node::EntityKind;

pub struct AutomationEngine<S> {
    store: Arc<S>,
    config: EngineConfig,
    // Serialization point per project: two near-simultaneous events for
    // the same project must not both observe a node as pending.
    project_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<S: AutomationStore> AutomationEngine<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            project_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Run one automation pass for a project whose automation-relevant
    /// fields changed. A missing project is a no-op, not an error.
    pub async fn track_project(&self, project_id: Uuid) -> AutomationResult<()> {
        let Some(project) = self.store.find_project(project_id).await? else {
            info!(%project_id, "tracked project not found; nothing to do");
            return Ok(());
        };

        let data = ConditionData::from_project(&project);
        self.run(&project, EntityKind::Project, project.id, data)
            .await
    }

    /// Run one automation pass for an activity that was created or
    /// updated, particularly on completion.
    pub async fn track_activity(&self, activity_id: Uuid) -> AutomationResult<()> {
        let Some(activity) = self.store.find_activity(activity_id).await? else {
            info!(%activity_id, "tracked activity not found; nothing to do");
            return Ok(());
        };
        let Some(project_id) = activity.id_projeto else {
            info!(%activity_id, "activity is not scoped to a project; nothing to do");
            return Ok(());
        };
        let Some(project) = self.store.find_project(project_id).await? else {
            info!(%project_id, "activity's project not found; nothing to do");
            return Ok(());
        };

        let data = ConditionData::from_activity(&activity);
        self.run(&project, EntityKind::Activity, activity.id, data)
            .await
    }

    async fn run(
        &self,
        project: &Project,
        kind: EntityKind,
        entity_id: Uuid,
        data: ConditionData,
    ) -> AutomationResult<()> {
        let lock = self.project_lock(project.id).await;
        let _guard = lock.lock().await;

        let deadline = self.config.orchestrator_timeout;
        timeout(deadline, self.fire_matching(project, kind, entity_id, data))
            .await
            .map_err(|_| AutomationError::Timeout(deadline))?
    }

    async fn project_lock(&self, project_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.project_locks.lock().await;
        locks
            .entry(project_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn fire_matching(
        &self,
        project: &Project,
        kind: EntityKind,
        entity_id: Uuid,
        data: ConditionData,
    ) -> AutomationResult<()> {
        let pending = self.store.find_pending(project.id).await?;
        if pending.is_empty() {
            return Ok(());
        }

        let matched: Vec<_> = pending
            .iter()
            .filter(|node| node.is_activated_by(kind, entity_id))
            .filter(|node| node.activation.trigger.matches(&data))
            .collect();

        if matched.is_empty() {
            info!(
                project_id = %project.id,
                pending = pending.len(),
                "no flow nodes matched this pass"
            );
            return Ok(());
        }

        let mut firings = Vec::with_capacity(matched.len());
        for node in &matched {
            let payload = materialize(
                node.produces.entity_kind,
                project,
                &node.produces.customization,
            )?;
            firings.push(PlannedFiring {
                node_id: node.id,
                payload,
            });
        }

        let produced: Vec<(Uuid, Uuid)> = firings
            .iter()
            .map(|firing| (firing.node_id, firing.payload.id()))
            .collect();
        let links = link_dependents(&produced, &pending);

        let batch = FiringBatch {
            project_id: project.id,
            firings,
            links,
            executed_at: Utc::now(),
        };
        let node_ids = batch.node_ids();

        info!(
            project_id = %project.id,
            nodes = node_ids.len(),
            links = batch.links.len(),
            "firing matched flow nodes"
        );

        match self.store.commit_firing(&batch).await {
            Ok(receipt) => {
                info!(
                    project_id = %project.id,
                    inserted = receipt.inserted.len(),
                    marked = receipt.marked.len(),
                    linked = receipt.linked,
                    "automation pass committed"
                );
                Ok(())
            }
            Err(err) => {
                // Audit trail: exactly which nodes this pass had staged
                // when the commit failed.
                error!(
                    project_id = %project.id,
                    node_ids = ?node_ids,
                    error = %err,
                    "automation firing failed"
                );
                Err(err)
            }
        }
    }
}
