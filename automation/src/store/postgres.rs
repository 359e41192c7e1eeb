// Postgres-backed automation store.
//
// Entities are stored document-style: a primary-key column plus a JSONB
// `doc` column holding the wire representation. Flow nodes get
// first-class columns for everything the pending-node queries partition
// on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use helios_shared::{Activity, Project};

use crate::error::{AutomationError, AutomationResult};
use crate::flows::{EntityKind, EntityPayload, FlowNode};

use super::{AutomationStore, FiringBatch, FiringReceipt};

#[derive(Clone)]
pub struct PgAutomationStore {
    pool: PgPool,
}

impl PgAutomationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> AutomationResult<T> {
    serde_json::from_value(value).map_err(AutomationError::Decode)
}

fn target_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Activity => "activities",
        EntityKind::Revenue => "revenues",
        EntityKind::Purchase => "purchases",
        EntityKind::Notification => "notifications",
        // Materialization rejects these kinds before any insert runs.
        EntityKind::Project | EntityKind::Commission | EntityKind::ServiceOrder => {
            unreachable!("no target collection for {kind}")
        }
    }
}

async fn insert_payload(conn: &mut PgConnection, payload: &EntityPayload) -> AutomationResult<Uuid> {
    let doc = match payload {
        EntityPayload::Activity(a) => serde_json::to_value(a),
        EntityPayload::Revenue(r) => serde_json::to_value(r),
        EntityPayload::Purchase(p) => serde_json::to_value(p),
        EntityPayload::Notification(n) => serde_json::to_value(n),
    }
    .map_err(AutomationError::Decode)?;

    let sql = format!(
        "INSERT INTO {} (id, project_id, doc) VALUES ($1, $2, $3)",
        target_table(payload.kind())
    );
    sqlx::query(&sql)
        .bind(payload.id())
        .bind(payload.project_id())
        .bind(doc)
        .execute(conn)
        .await?;

    Ok(payload.id())
}

async fn mark_executed_rows(
    conn: &mut PgConnection,
    node_ids: &[Uuid],
    at: DateTime<Utc>,
) -> AutomationResult<()> {
    sqlx::query("UPDATE flow_nodes SET executed_at = $2 WHERE id = ANY($1) AND executed_at IS NULL")
        .bind(node_ids.to_vec())
        .bind(at)
        .execute(conn)
        .await?;
    Ok(())
}

async fn link_activation_row(
    conn: &mut PgConnection,
    node_id: Uuid,
    entity_id: Uuid,
) -> AutomationResult<()> {
    sqlx::query(
        "UPDATE flow_nodes SET activation = jsonb_set(activation, '{entityId}', to_jsonb($2::uuid)) WHERE id = $1",
    )
    .bind(node_id)
    .bind(entity_id)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl AutomationStore for PgAutomationStore {
    async fn find_project(&self, id: Uuid) -> AutomationResult<Option<Project>> {
        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT doc FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(doc,)| decode(doc)).transpose()
    }

    async fn find_activity(&self, id: Uuid) -> AutomationResult<Option<Activity>> {
        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT doc FROM activities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(doc,)| decode(doc)).transpose()
    }

    async fn find_pending(&self, project_id: Uuid) -> AutomationResult<Vec<FlowNode>> {
        let rows = sqlx::query_as::<
            _,
            (
                Uuid,
                Uuid,
                Option<Uuid>,
                serde_json::Value,
                serde_json::Value,
                serde_json::Value,
                Option<DateTime<Utc>>,
                DateTime<Utc>,
            ),
        >(
            r#"
            SELECT id, project_id, parent_flow_id, activation, produces, canvas,
                   executed_at, inserted_at
            FROM flow_nodes
            WHERE project_id = $1 AND executed_at IS NULL
            ORDER BY inserted_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(FlowNode {
                    id: row.0,
                    project_id: row.1,
                    parent_flow_id: row.2,
                    activation: decode(row.3)?,
                    produces: decode(row.4)?,
                    canvas: serde_json::from_value(row.5).unwrap_or_default(),
                    executed_at: row.6,
                    inserted_at: row.7,
                })
            })
            .collect()
    }

    async fn mark_executed(&self, node_ids: &[Uuid], at: DateTime<Utc>) -> AutomationResult<()> {
        let mut conn = self.pool.acquire().await?;
        mark_executed_rows(&mut conn, node_ids, at).await
    }

    async fn link_activation(&self, node_id: Uuid, entity_id: Uuid) -> AutomationResult<()> {
        let mut conn = self.pool.acquire().await?;
        link_activation_row(&mut conn, node_id, entity_id).await
    }

    async fn insert_entities(
        &self,
        _kind: EntityKind,
        payloads: &[EntityPayload],
    ) -> AutomationResult<Vec<Uuid>> {
        let mut conn = self.pool.acquire().await?;
        let mut ids = Vec::with_capacity(payloads.len());
        for payload in payloads {
            ids.push(insert_payload(&mut conn, payload).await?);
        }
        Ok(ids)
    }

    /// Atomic override: inserts, executed-marks and activation links all
    /// commit in one transaction, so a fired node can never be observed
    /// marked without its produced entity or vice versa.
    async fn commit_firing(&self, batch: &FiringBatch) -> AutomationResult<FiringReceipt> {
        let mut tx = self.pool.begin().await?;
        let mut receipt = FiringReceipt::default();

        for firing in &batch.firings {
            let id = insert_payload(&mut tx, &firing.payload).await?;
            receipt.inserted.push((firing.payload.kind(), id));
        }

        let node_ids = batch.node_ids();
        mark_executed_rows(&mut tx, &node_ids, batch.executed_at).await?;
        receipt.marked = node_ids;

        for link in &batch.links {
            link_activation_row(&mut tx, link.node_id, link.entity_id).await?;
        }
        receipt.linked = batch.links.len();

        tx.commit().await?;
        Ok(receipt)
    }
}
