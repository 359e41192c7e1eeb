//! Process automation engine for the Helios solar CRM.
//!
//! A per-project, trigger-driven workflow executor: flow nodes watch
//! business-entity state (projects, activities) and, when their configured
//! conditions become true, materialize downstream entities (activities,
//! revenues, purchases, notifications) and chain further automations to
//! them. Invoked synchronously by request handlers via
//! [`AutomationEngine::track_project`] and
//! [`AutomationEngine::track_activity`].

pub mod config;
pub mod database;
pub mod error;
pub mod flows;
pub mod store;

pub use config::{Config, EngineConfig};
pub use error::{AutomationError, AutomationResult};
pub use flows::{AutomationEngine, EntityKind, FlowNode, Trigger};
pub use store::{AutomationStore, PgAutomationStore};

#[cfg(test)]
mod tests;
