//! Typed values for workflow, job, step and composite action YAML.
//!
//! Known keys are typed fields; everything else lands in an ordered `extra`
//! map so no declared key is lost. Declaration order of `jobs` is preserved,
//! which the domain model relies on when pairing values with AST nodes.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

pub type ExtraFields = IndexMap<String, Value>;

// =============================================================================
// WORKFLOW
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowValue {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    /// Trigger declaration (`on:`) in any of its shapes.
    #[serde(default)]
    pub on: Option<Value>,
    pub jobs: IndexMap<String, JobValue>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl WorkflowValue {
    /// True when the workflow can be called from other workflows.
    pub fn is_workflow_call(&self) -> bool {
        match &self.on {
            Some(Value::String(s)) => s == "workflow_call",
            Some(Value::Sequence(seq)) => seq.iter().any(|v| v.as_str() == Some("workflow_call")),
            Some(Value::Mapping(map)) => map.contains_key("workflow_call"),
            _ => false,
        }
    }
}

/// A workflow whose trigger includes `workflow_call`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ReusableWorkflowValue(pub WorkflowValue);

impl ReusableWorkflowValue {
    pub fn workflow(&self) -> &WorkflowValue {
        &self.0
    }

    /// Input names declared under `on.workflow_call.inputs`, in order.
    pub fn input_names(&self) -> Vec<String> {
        self.0
            .on
            .as_ref()
            .and_then(|on| on.get("workflow_call"))
            .and_then(|call| call.get("inputs"))
            .and_then(Value::as_mapping)
            .map(|inputs| {
                inputs
                    .keys()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// JOB
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobValue {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(rename = "runs-on", default)]
    pub runs_on: Option<Value>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub uses: Option<String>,
    #[serde(default)]
    pub needs: Option<Value>,
    #[serde(default)]
    pub steps: Option<Vec<StepValue>>,
    #[serde(default)]
    pub strategy: Option<StrategyValue>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl JobValue {
    /// Runner labels from `runs-on` as a string, a sequence, or `{ labels: … }`.
    pub fn runs_on_labels(&self) -> Vec<String> {
        match &self.runs_on {
            Some(Value::Mapping(group)) => group
                .get("labels")
                .map(scalar_list)
                .unwrap_or_default(),
            Some(v) => scalar_list(v),
            None => Vec::new(),
        }
    }

    /// Job ids listed under `needs`.
    pub fn needs(&self) -> Vec<String> {
        self.needs.as_ref().map(scalar_list).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StrategyValue {
    /// Matrix in any shape: a mapping, or an expression string.
    #[serde(default)]
    pub matrix: Option<Value>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// =============================================================================
// STEP
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepValue {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub uses: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub run: Option<String>,
    #[serde(default)]
    pub with: Option<IndexMap<String, Value>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// =============================================================================
// COMPOSITE ACTION
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeActionValue {
    #[serde(deserialize_with = "required_scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,
    pub runs: CompositeRuns,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeRuns {
    pub using: String,
    pub steps: Vec<StepValue>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// =============================================================================
// SCALAR HELPERS
// =============================================================================

/// Render a YAML scalar as text. `None` for null and for collections.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

fn scalar_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(seq) => seq.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Sequence(_) | Value::Mapping(_) => Err(serde::de::Error::custom(
            "expected a scalar, found a collection",
        )),
        other => Ok(scalar_text(&other)),
    }
}

fn required_scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_string(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected a scalar, found null"))
}
