// Process Automation Engine
//
// Runtime evaluation and execution of configured per-project flow graphs:
// trigger-driven nodes that watch business-entity state and materialize
// downstream entities when their conditions become true.

pub mod conditions;
pub mod engine;
pub mod linker;
pub mod materializers;
pub mod node;
pub mod triggers;

pub use conditions::{ConditionData, ConditionValue};
pub use engine::AutomationEngine;
pub use linker::{ActivationLink, link_dependents};
pub use materializers::{Customization, EntityPayload, materialize};
pub use node::{Activation, Canvas, EntityKind, FlowNode, Production};
pub use triggers::Trigger;
