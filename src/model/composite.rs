//! Local composite actions (`action.yml` with `runs.using: composite`).

use std::sync::Arc;

use tracing::debug;

use super::{FileContent, StepModel, pair_steps};
use crate::ast::{JobAst, WorkflowAst};
use crate::error::ParseError;
use crate::parse::{self, CompositeActionValue};

/// Steps of a composite action, paired through a synthetic job node.
#[derive(Debug, Clone)]
pub struct CompositeStepModel {
    value: CompositeActionValue,
    ast: JobAst,
    file: Arc<FileContent>,
    steps: Vec<StepModel>,
}

impl CompositeStepModel {
    pub fn new(file: Arc<FileContent>) -> Result<Self, ParseError> {
        let model = Self::build(&file).map_err(|e| e.with_path(file.path()))?;
        debug!(
            path = model.file.path(),
            steps = model.steps.len(),
            "built composite action model"
        );
        Ok(model)
    }

    pub fn from_file(file: FileContent) -> Result<Self, ParseError> {
        Self::new(Arc::new(file))
    }

    fn build(file: &Arc<FileContent>) -> Result<Self, ParseError> {
        let value = parse::parse_composite_action(file.text())?;
        let ast = WorkflowAst::parse(file.text())?.composite_job_ast()?;
        let steps = pair_steps(Some(value.runs.steps.as_slice()), &ast, file)?;
        Ok(CompositeStepModel {
            value,
            ast,
            file: Arc::clone(file),
            steps,
        })
    }

    pub fn name(&self) -> &str {
        &self.value.name
    }

    pub fn description(&self) -> Option<&str> {
        self.value.description.as_deref()
    }

    pub fn value(&self) -> &CompositeActionValue {
        &self.value
    }

    /// Line of the `runs:` key.
    pub fn start_line(&self) -> usize {
        self.ast.start_line()
    }

    pub fn html_url_with_line(&self) -> Option<String> {
        self.file.html_url_with_line(self.start_line())
    }

    pub fn steps(&self) -> &[StepModel] {
        &self.steps
    }

    pub fn match_step(&self, raw_name: &str) -> Option<&StepModel> {
        StepModel::match_name(&self.steps, raw_name)
    }
}
