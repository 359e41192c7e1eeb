// Dependency linker - propagates freshly created entity ids into child
// nodes that were waiting on them.
//
// Pure: operates on the pending-node set already loaded by the
// orchestrator and produces update operations; it performs no I/O itself.

use uuid::Uuid;

use super::node::FlowNode;

/// One activation-reference rewrite: set `activation.entityId` of the
/// given node to the newly created entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationLink {
    pub node_id: Uuid,
    pub entity_id: Uuid,
}

/// For each fired node (paired with the id of the entity it produced),
/// find the pending nodes whose `parent_flow_id` points at it and produce
/// the activation rewrites. Fired nodes themselves are excluded by the
/// pending filter once marked executed.
pub fn link_dependents(fired: &[(Uuid, Uuid)], pending: &[FlowNode]) -> Vec<ActivationLink> {
    fired
        .iter()
        .flat_map(|&(parent_id, entity_id)| {
            pending
                .iter()
                .filter(move |node| node.is_pending() && node.parent_flow_id == Some(parent_id))
                .map(move |node| ActivationLink {
                    node_id: node.id,
                    entity_id,
                })
        })
        .collect()
}
