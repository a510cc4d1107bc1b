//! Reconciling live run/job records from the API with workflow definitions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{JobModel, StepModel, WorkflowModel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub full_name: String,
}

/// The fields of a workflow run this crate reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRunRecord {
    pub repository: RepositoryRecord,
    /// Workflow file path, sometimes suffixed with `@ref`.
    pub path: String,
    pub head_sha: String,
    #[serde(default = "first_attempt")]
    pub run_attempt: u32,
}

fn first_attempt() -> u32 {
    1
}

impl WorkflowRunRecord {
    /// `path` without a trailing `@ref`.
    pub fn source_path(&self) -> &str {
        match self.path.split_once('@') {
            Some((path, _)) => path,
            None => &self.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowJobRecord {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<WorkflowJobStepRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowJobStepRecord {
    pub name: String,
    pub number: u32,
    #[serde(default)]
    pub conclusion: Option<String>,
}

/// A run-time job resolved to its definition.
#[derive(Debug, Clone)]
pub struct ReconciledJob<'a> {
    pub job: &'a JobModel,
    /// One entry per reported step, in reported order.
    pub steps: Vec<ReconciledStep<'a>>,
}

#[derive(Debug, Clone)]
pub struct ReconciledStep<'a> {
    pub record: &'a WorkflowJobStepRecord,
    /// `None` for pseudo-steps and for names no step produces.
    pub step: Option<&'a StepModel>,
}

/// Resolve a job record (and each of its steps) against a workflow.
pub fn reconcile_job<'a>(
    workflow: &'a WorkflowModel,
    record: &'a WorkflowJobRecord,
) -> Option<ReconciledJob<'a>> {
    let Some(job) = workflow.match_job(&record.name) else {
        warn!(
            workflow = workflow.name(),
            job = record.name.as_str(),
            "job not defined in workflow"
        );
        return None;
    };

    let steps = record
        .steps
        .iter()
        .map(|step| ReconciledStep {
            record: step,
            step: job.match_step(&step.name),
        })
        .collect();

    Some(ReconciledJob { job, steps })
}
