use std::sync::Arc;

use workflow_ast::model::{CompositeStepModel, FileContent, ReusableWorkflowModel, WorkflowModel};

pub const CI_YML: &str = include_str!("../fixtures/ci.yml");
pub const RELEASE_YML: &str = include_str!("../fixtures/release.yml");
pub const ACTION_YML: &str = include_str!("../fixtures/action.yml");

pub const CI_PATH: &str = ".github/workflows/ci.yml";
pub const CI_URL: &str = "https://github.com/octo/repo/blob/abc123/.github/workflows/ci.yml";

// =============================================================================
// File builders
// =============================================================================

pub fn ci_file() -> FileContent {
    FileContent::new(CI_YML, CI_PATH).with_html_url(CI_URL)
}

pub fn ci_workflow() -> WorkflowModel {
    WorkflowModel::from_file(ci_file()).expect("ci.yml should build")
}

pub fn release_workflow() -> ReusableWorkflowModel {
    ReusableWorkflowModel::from_file(FileContent::new(
        RELEASE_YML,
        ".github/workflows/release.yml",
    ))
    .expect("release.yml should build")
}

pub fn setup_cache_action() -> CompositeStepModel {
    CompositeStepModel::from_file(FileContent::new(
        ACTION_YML,
        ".github/actions/setup-cache/action.yml",
    ))
    .expect("action.yml should build")
}

/// Build a workflow model from inline YAML.
pub fn workflow(yaml: &str, path: &str) -> WorkflowModel {
    WorkflowModel::new(Arc::new(FileContent::new(yaml, path))).expect("workflow should build")
}

/// `id line` per job and `id[i] line name` per step, one per line.
pub fn line_table(workflow: &WorkflowModel) -> String {
    let mut lines = Vec::new();
    for job in workflow.jobs() {
        lines.push(format!("{} {}", job.id(), job.start_line()));
        for (i, step) in job.steps().iter().enumerate() {
            lines.push(format!("{}[{}] {} {}", job.id(), i, step.start_line(), step.name()));
        }
    }
    lines.join("\n")
}
