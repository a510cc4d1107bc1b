//! Value view: YAML text → typed workflow/job/step values via serde_yaml.
//!
//! Independent of position tracking; see `crate::ast` for line numbers.

pub mod types;

pub use types::*;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::ParseError;

/// Decode a workflow file. Requires a non-empty `jobs` mapping.
pub fn parse_workflow(yaml: &str) -> Result<WorkflowValue, ParseError> {
    let root = parse_root(yaml)?;
    match root.get("jobs") {
        None => return Err(ParseError::value("P003", "Missing top-level `jobs` key")),
        Some(Value::Mapping(jobs)) if jobs.is_empty() => {
            return Err(ParseError::value("P004", "Workflow declares no jobs"));
        }
        Some(_) => {}
    }
    decode(root)
}

/// Decode a workflow that must be triggered by `workflow_call`.
pub fn parse_reusable_workflow(yaml: &str) -> Result<ReusableWorkflowValue, ParseError> {
    let workflow = parse_workflow(yaml)?;
    if !workflow.is_workflow_call() {
        return Err(ParseError::value(
            "P005",
            "Workflow is not reusable: no `workflow_call` trigger",
        ));
    }
    Ok(ReusableWorkflowValue(workflow))
}

/// Decode an `action.yml` whose `runs.using` is `composite`.
pub fn parse_composite_action(yaml: &str) -> Result<CompositeActionValue, ParseError> {
    let root = parse_root(yaml)?;
    let runs = root
        .get("runs")
        .ok_or_else(|| ParseError::value("P003", "Missing top-level `runs` key"))?;
    if runs.get("steps").is_none() {
        return Err(ParseError::value("P003", "Missing `runs.steps` key"));
    }
    let action: CompositeActionValue = decode(root)?;
    if action.runs.using != "composite" {
        return Err(ParseError::value(
            "P005",
            format!("Action runs with `{}`, not `composite`", action.runs.using),
        ));
    }
    Ok(action)
}

fn parse_root(yaml: &str) -> Result<Mapping, ParseError> {
    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|e| ParseError::yaml("P001", format!("Failed to parse YAML: {}", e)))?;
    match value {
        Value::Mapping(map) => Ok(map),
        _ => Err(ParseError::value("P002", "Root of the file is not a mapping")),
    }
}

fn decode<T: DeserializeOwned>(root: Mapping) -> Result<T, ParseError> {
    serde_yaml::from_value(Value::Mapping(root))
        .map_err(|e| ParseError::value("P001", format!("Failed to decode YAML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jobs_keep_declaration_order() {
        let wf = parse_workflow(
            "jobs:\n  zeta:\n    runs-on: a\n  alpha:\n    runs-on: b\n  mid:\n    runs-on: c\n",
        )
        .unwrap();
        let ids: Vec<&str> = wf.jobs.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn invalid_yaml() {
        let err = parse_workflow("jobs: [").unwrap_err();
        assert_eq!(err.code, "P001");
    }

    #[test]
    fn root_must_be_mapping() {
        assert_eq!(parse_workflow("- a\n- b\n").unwrap_err().code, "P002");
        assert_eq!(parse_workflow("hello").unwrap_err().code, "P002");
    }

    #[test]
    fn jobs_required_and_non_empty() {
        assert_eq!(parse_workflow("name: x\n").unwrap_err().code, "P003");
        assert_eq!(parse_workflow("jobs: {}\n").unwrap_err().code, "P004");
    }

    #[test]
    fn reusable_requires_workflow_call() {
        let err = parse_reusable_workflow("on: push\njobs:\n  a:\n    runs-on: x\n").unwrap_err();
        assert_eq!(err.code, "P005");
        assert!(parse_reusable_workflow("on: workflow_call\njobs:\n  a:\n    runs-on: x\n").is_ok());
    }

    #[test]
    fn composite_action() {
        let action = parse_composite_action(
            "name: Setup\ndescription: Prepare\nruns:\n  using: composite\n  steps:\n    - run: echo hi\n      shell: bash\n",
        )
        .unwrap();
        assert_eq!(action.name, "Setup");
        assert_eq!(action.description.as_deref(), Some("Prepare"));
        assert_eq!(action.runs.steps.len(), 1);
        assert_eq!(action.runs.steps[0].extra.get("shell").and_then(Value::as_str), Some("bash"));
    }

    #[test]
    fn non_composite_action_rejected() {
        let err = parse_composite_action("name: Node\nruns:\n  using: node20\n  steps: []\n").unwrap_err();
        assert_eq!(err.code, "P005");
        let err = parse_composite_action("name: Node\nruns:\n  using: node20\n  main: index.js\n").unwrap_err();
        assert_eq!(err.code, "P003");
    }
}
