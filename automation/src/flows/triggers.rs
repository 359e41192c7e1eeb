// Flow triggers - the condition a node's activation watches for.
//
// Evaluation is pure and total: no trigger ever errors, and a trigger
// whose kind is unknown to this build evaluates false (fail closed).

use serde::{Deserialize, Serialize};

use super::conditions::ConditionData;

/// The condition attached to a flow node. `variable` names a field of the
/// condition-data snapshot; the comparator payload varies by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Trigger {
    #[serde(rename_all = "camelCase")]
    EqualsText { variable: String, equals: String },
    #[serde(rename_all = "camelCase")]
    EqualsNumber { variable: String, equals: f64 },
    #[serde(rename_all = "camelCase")]
    GreaterThan { variable: String, greater_than: f64 },
    #[serde(rename_all = "camelCase")]
    LessThan { variable: String, less_than: f64 },
    #[serde(rename_all = "camelCase")]
    InRange { variable: String, min: f64, max: f64 },
    #[serde(rename_all = "camelCase")]
    InList { variable: String, values: Vec<String> },
    /// Any trigger kind this build does not know. Persisted nodes written
    /// by a newer authoring layer deserialize here and never match.
    #[serde(other)]
    Unknown,
}

impl Trigger {
    pub fn variable(&self) -> Option<&str> {
        match self {
            Self::EqualsText { variable, .. }
            | Self::EqualsNumber { variable, .. }
            | Self::GreaterThan { variable, .. }
            | Self::LessThan { variable, .. }
            | Self::InRange { variable, .. }
            | Self::InList { variable, .. } => Some(variable),
            Self::Unknown => None,
        }
    }

    /// Evaluate this trigger against a condition-data snapshot.
    pub fn matches(&self, data: &ConditionData) -> bool {
        match self {
            Self::EqualsText { variable, equals } => data.get(variable).as_text() == *equals,
            Self::EqualsNumber { variable, equals } => data.get(variable).as_number() == *equals,
            Self::GreaterThan {
                variable,
                greater_than,
            } => data.get(variable).as_number() > *greater_than,
            Self::LessThan { variable, less_than } => data.get(variable).as_number() < *less_than,
            // Inclusive on both ends.
            Self::InRange { variable, min, max } => {
                let value = data.get(variable).as_number();
                *min <= value && value <= *max
            }
            Self::InList { variable, values } => {
                let value = data.get(variable).as_text();
                values.iter().any(|v| *v == value)
            }
            Self::Unknown => false,
        }
    }
}
