//! WASM entry points for browser dashboards.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::error::ParseError;
use crate::model::{FileContent, JobModel, StepModel, WorkflowJobRecord, WorkflowModel, reconcile_job};

/// Parse a workflow file and describe its jobs and steps with line numbers.
/// Returns `{status: "success", workflow}` or `{status: "errors", errors}`.
#[wasm_bindgen]
pub fn inspect_workflow(content: &str, path: &str, html_url: Option<String>) -> JsValue {
    let result = inspect_workflow_inner(content, path, html_url);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn inspect_workflow_inner(content: &str, path: &str, html_url: Option<String>) -> InspectResult {
    match build(content, path, html_url) {
        Ok(workflow) => InspectResult::Success {
            workflow: WorkflowDto::from(&workflow),
        },
        Err(e) => InspectResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

/// Resolve a run-time job name. Returns the job or `null`.
#[wasm_bindgen]
pub fn match_job(content: &str, path: &str, raw_job_name: &str) -> JsValue {
    let result = match_job_inner(content, path, raw_job_name);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn match_job_inner(content: &str, path: &str, raw_job_name: &str) -> Option<JobDto> {
    let workflow = build(content, path, None).ok()?;
    workflow.match_job(raw_job_name).map(JobDto::from)
}

/// Resolve a run-time step name inside a run-time job name. Returns the step or `null`.
#[wasm_bindgen]
pub fn match_step(content: &str, path: &str, raw_job_name: &str, raw_step_name: &str) -> JsValue {
    let result = match_step_inner(content, path, raw_job_name, raw_step_name);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn match_step_inner(
    content: &str,
    path: &str,
    raw_job_name: &str,
    raw_step_name: &str,
) -> Option<StepDto> {
    let workflow = build(content, path, None).ok()?;
    let job = workflow.match_job(raw_job_name)?;
    job.match_step(raw_step_name).map(StepDto::from)
}

/// Resolve a job record JSON (as returned by the jobs API) and each of its steps.
/// Returns `{status: "success", job, steps}` or `{status: "errors", errors}`;
/// `job` is `null` when no job matches.
#[wasm_bindgen]
pub fn reconcile_job_record(content: &str, path: &str, job_json: &str) -> JsValue {
    let result = reconcile_job_record_inner(content, path, job_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn reconcile_job_record_inner(content: &str, path: &str, job_json: &str) -> ReconcileResult {
    let record = match serde_json::from_str::<WorkflowJobRecord>(job_json) {
        Ok(r) => r,
        Err(e) => {
            return ReconcileResult::Errors {
                errors: vec![ErrorDto {
                    code: "P001".into(),
                    phase: "Value".into(),
                    message: format!("Failed to parse job record JSON: {}", e),
                    path: None,
                }],
            };
        }
    };

    let workflow = match build(content, path, None) {
        Ok(w) => w,
        Err(e) => {
            return ReconcileResult::Errors {
                errors: vec![ErrorDto::from(e)],
            };
        }
    };

    match reconcile_job(&workflow, &record) {
        Some(reconciled) => ReconcileResult::Success {
            job: Some(JobDto::from(reconciled.job)),
            steps: reconciled
                .steps
                .iter()
                .map(|s| StepRecordDto {
                    name: s.record.name.clone(),
                    number: s.record.number,
                    start_line: s.step.map(StepModel::start_line),
                })
                .collect(),
        },
        None => ReconcileResult::Success {
            job: None,
            steps: Vec::new(),
        },
    }
}

fn build(content: &str, path: &str, html_url: Option<String>) -> Result<WorkflowModel, ParseError> {
    let mut file = FileContent::new(content, path);
    file.raw.html_url = html_url;
    WorkflowModel::new(Arc::new(file))
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    path: Option<String>,
}

impl From<ParseError> for ErrorDto {
    fn from(e: ParseError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            path: e.path,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct WorkflowDto {
    name: String,
    path: String,
    jobs: Vec<JobDto>,
}

impl From<&WorkflowModel> for WorkflowDto {
    fn from(w: &WorkflowModel) -> Self {
        WorkflowDto {
            name: w.name().to_string(),
            path: w.file().path().to_string(),
            jobs: w.jobs().iter().map(JobDto::from).collect(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct JobDto {
    id: String,
    name: Option<String>,
    start_line: usize,
    html_url: Option<String>,
    is_matrix: bool,
    is_reusable: bool,
    steps: Vec<StepDto>,
}

impl From<&JobModel> for JobDto {
    fn from(j: &JobModel) -> Self {
        JobDto {
            id: j.id().to_string(),
            name: j.name().map(str::to_string),
            start_line: j.start_line(),
            html_url: j.html_url_with_line(),
            is_matrix: j.is_matrix(),
            is_reusable: j.is_reusable(),
            steps: j.steps().iter().map(StepDto::from).collect(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct StepDto {
    name: String,
    showable: String,
    start_line: usize,
    html_url: Option<String>,
    uses: Option<String>,
    is_composite: bool,
}

impl From<&StepModel> for StepDto {
    fn from(s: &StepModel) -> Self {
        StepDto {
            name: s.name().to_string(),
            showable: s.showable().to_string(),
            start_line: s.start_line(),
            html_url: s.html_url_with_line(),
            uses: s.value().uses.clone(),
            is_composite: s.is_composite(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum InspectResult {
    #[serde(rename = "success")]
    Success { workflow: WorkflowDto },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct StepRecordDto {
    name: String,
    number: u32,
    start_line: Option<usize>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum ReconcileResult {
    #[serde(rename = "success")]
    Success {
        job: Option<JobDto>,
        steps: Vec<StepRecordDto>,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[cfg(test)]
mod tests {
    use super::*;

    const CI: &str = "\
name: CI
on: push
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo test
";

    #[test]
    fn inspect_success() {
        let result =
            inspect_workflow_inner(CI, ".github/workflows/ci.yml", Some("https://x/ci.yml".into()));
        let workflow = match result {
            InspectResult::Success { workflow } => workflow,
            other => panic!("expected success, got {:?}", other),
        };
        assert_eq!(workflow.name, "CI");
        assert_eq!(workflow.jobs.len(), 1);
        assert_eq!(workflow.jobs[0].start_line, 4);
        assert_eq!(workflow.jobs[0].html_url.as_deref(), Some("https://x/ci.yml#L4"));
        assert_eq!(workflow.jobs[0].steps[1].name, "cargo test");
        assert_eq!(workflow.jobs[0].steps[1].start_line, 8);
    }

    #[test]
    fn inspect_reports_errors() {
        let result = inspect_workflow_inner("- not\n- a mapping\n", "bad.yml", None);
        let errors = match result {
            InspectResult::Errors { errors } => errors,
            other => panic!("expected errors, got {:?}", other),
        };
        assert_eq!(errors[0].code, "P002");
        assert_eq!(errors[0].path.as_deref(), Some("bad.yml"));
    }

    #[test]
    fn match_job_and_step() {
        let job = match_job_inner(CI, "ci.yml", "test").unwrap();
        assert_eq!(job.id, "test");
        let step = match_step_inner(CI, "ci.yml", "test", "Run cargo test").unwrap();
        assert_eq!(step.start_line, 8);
        assert!(match_step_inner(CI, "ci.yml", "test", "Set up job").is_none());
        assert!(match_job_inner(CI, "ci.yml", "deploy").is_none());
    }

    #[test]
    fn reconcile_job_record_json() {
        let json = r#"{"name": "test", "steps": [
            {"name": "Set up job", "number": 1},
            {"name": "Run actions/checkout@v4", "number": 2},
            {"name": "Run cargo test", "number": 3}
        ]}"#;
        let (job, steps) = match reconcile_job_record_inner(CI, "ci.yml", json) {
            ReconcileResult::Success { job, steps } => (job, steps),
            other => panic!("expected success, got {:?}", other),
        };
        assert_eq!(job.unwrap().start_line, 4);
        let lines: Vec<Option<usize>> = steps.iter().map(|s| s.start_line).collect();
        assert_eq!(lines, vec![None, Some(7), Some(8)]);
    }

    #[test]
    fn reconcile_rejects_bad_record_json() {
        match reconcile_job_record_inner(CI, "ci.yml", "{not json") {
            ReconcileResult::Errors { errors } => assert_eq!(errors[0].code, "P001"),
            other => panic!("expected errors, got {:?}", other),
        }
    }
}
