// Test support and scenario tests for the automation engine.

pub mod fixtures;
pub mod helpers;
