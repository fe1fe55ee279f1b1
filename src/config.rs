//! JSON loading for rule configuration and evaluator settings.
//!
//! Rules use the form-configuration schema:
//!
//! ```json
//! {
//!   "data": {
//!     "conditionalRendering": {
//!       "hideSpouse": {
//!         "selectedFunction": "isMarried",
//!         "inputParams": { "status": "person.maritalStatus" },
//!         "selectedAction": "Show",
//!         "selectedFields": { "a": "spouse-name" },
//!         "repeatingGroup": { "groupId": "people", "childGroupId": "kids" }
//!       }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::compile::Validation;
use crate::types::{Action, RuleBuilder, RuleSet};
use crate::{ConfigError, FormDynamicsError};

/// Default cap for [`converge`](crate::converge).
pub const DEFAULT_MAX_ITERATIONS: usize = 32;

/// Settings for evaluating a form's rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluatorConfig {
    /// Data type that rule input paths are resolved against.
    pub default_data_type: String,
    /// Passes allowed before the fixed-point loop gives up.
    pub max_iterations: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            default_data_type: String::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl EvaluatorConfig {
    /// # Errors
    ///
    /// Returns [`FormDynamicsError::Json`] on malformed input.
    pub fn from_json(input: &str) -> Result<Self, FormDynamicsError> {
        Ok(serde_json::from_str(input)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    selected_function: Option<String>,
    #[serde(default)]
    input_params: Option<BTreeMap<String, String>>,
    selected_action: Option<String>,
    #[serde(default)]
    selected_fields: Option<BTreeMap<String, String>>,
    #[serde(default)]
    repeating_group: Option<RawScope>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScope {
    #[serde(default)]
    group_id: String,
    #[serde(default)]
    child_group_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfiguration {
    #[serde(default)]
    data: RawData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawData {
    #[serde(default)]
    conditional_rendering: Option<BTreeMap<String, RawRule>>,
}

pub(crate) fn rules_from_json(input: &str) -> Result<RuleSet, FormDynamicsError> {
    let raw: BTreeMap<String, RawRule> = serde_json::from_str(input)?;
    Ok(rules_from_raw(raw)?)
}

pub(crate) fn rules_from_configuration(input: &str) -> Result<RuleSet, FormDynamicsError> {
    let raw: RawConfiguration = serde_json::from_str(input)?;
    let rules = raw.data.conditional_rendering.unwrap_or_default();
    tracing::debug!(rules = rules.len(), "loaded conditional rendering rules");
    Ok(rules_from_raw(rules)?)
}

fn rules_from_raw(raw: BTreeMap<String, RawRule>) -> Result<RuleSet, ConfigError> {
    let drafts = raw
        .into_iter()
        .map(|(key, rule)| (key, to_draft(rule)))
        .collect();
    crate::compile::compile(drafts, Validation::Lenient)
}

fn to_draft(raw: RawRule) -> RuleBuilder {
    let (action, unknown_action) = match raw.selected_action.map(|a| a.parse::<Action>()) {
        Some(Ok(action)) => (Some(action), None),
        Some(Err(name)) => (None, Some(name)),
        None => (None, None),
    };

    let (group_id, child_group_id) = match raw.repeating_group {
        Some(scope) => (Some(scope.group_id), scope.child_group_id),
        None => (None, None),
    };

    RuleBuilder {
        function: raw.selected_function,
        action,
        unknown_action,
        inputs: raw.input_params.unwrap_or_default().into_iter().collect(),
        outputs: raw.selected_fields.unwrap_or_default().into_iter().collect(),
        group_id,
        child_group_id,
    }
}
