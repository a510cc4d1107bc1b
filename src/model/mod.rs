//! Domain model: value view + position view of one file, paired element by element.
//!
//! Each model is built once from an immutable [`FileContent`] snapshot and never
//! mutated afterwards, so a built graph can be shared across threads freely.

pub mod composite;
pub mod job;
pub mod run;
pub mod step;
pub mod workflow;

pub use composite::CompositeStepModel;
pub use job::JobModel;
pub use run::{
    ReconciledJob, ReconciledStep, RepositoryRecord, WorkflowJobRecord, WorkflowJobStepRecord,
    WorkflowRunRecord, reconcile_job,
};
pub use step::{StepModel, Uses};
pub use workflow::{ReusableWorkflowModel, WorkflowModel, create_workflow_name_map};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{JobAst, StepAst};
use crate::error::ParseError;
use crate::parse::StepValue;

/// A file fetched from the code-hosting API at a specific ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Decoded text of the file.
    pub content: String,
    pub raw: RawFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFile {
    #[serde(default, alias = "htmlUrl")]
    pub html_url: Option<String>,
    pub path: String,
}

impl FileContent {
    pub fn new(content: impl Into<String>, path: impl Into<String>) -> Self {
        FileContent {
            content: content.into(),
            raw: RawFile {
                html_url: None,
                path: path.into(),
            },
        }
    }

    pub fn with_html_url(mut self, html_url: impl Into<String>) -> Self {
        self.raw.html_url = Some(html_url.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.raw.path
    }

    /// `content` without a leading byte-order mark.
    ///
    /// Both parse views read this text, so their positions agree.
    pub fn text(&self) -> &str {
        self.content
            .strip_prefix('\u{feff}')
            .unwrap_or(&self.content)
    }

    /// `{html_url}#L{line}`, GitHub's line-anchor convention.
    pub fn html_url_with_line(&self, line: usize) -> Option<String> {
        self.raw
            .html_url
            .as_ref()
            .map(|url| format!("{url}#L{line}"))
    }
}

/// Pair step values with step nodes by position.
///
/// A job without `steps` pairs to an empty list.
pub(crate) fn pair_steps(
    values: Option<&[StepValue]>,
    ast: &JobAst,
    file: &Arc<FileContent>,
) -> Result<Vec<StepModel>, ParseError> {
    let values = values.unwrap_or_default();
    let asts: Vec<StepAst> = ast.step_asts().unwrap_or_default();

    if values.len() != asts.len() {
        return Err(ParseError::pairing(format!(
            "Job '{}' has {} step values but {} step nodes",
            ast.id(),
            values.len(),
            asts.len()
        )));
    }

    Ok(values
        .iter()
        .zip(asts)
        .map(|(value, ast)| StepModel::new(value.clone(), ast, Arc::clone(file)))
        .collect())
}
