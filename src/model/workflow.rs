//! Workflow and reusable-workflow models.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::{FileContent, JobModel};
use crate::ast::WorkflowAst;
use crate::error::ParseError;
use crate::parse::{self, JobValue, ReusableWorkflowValue, WorkflowValue};

#[derive(Debug, Clone)]
pub struct WorkflowModel {
    value: WorkflowValue,
    ast: WorkflowAst,
    file: Arc<FileContent>,
    jobs: Vec<JobModel>,
}

impl WorkflowModel {
    /// Parse the file twice (values and positions) and pair the results.
    pub fn new(file: Arc<FileContent>) -> Result<Self, ParseError> {
        let model = Self::build(&file).map_err(|e| e.with_path(file.path()))?;
        debug!(
            path = model.file.path(),
            jobs = model.jobs.len(),
            "built workflow model"
        );
        Ok(model)
    }

    pub fn from_file(file: FileContent) -> Result<Self, ParseError> {
        Self::new(Arc::new(file))
    }

    fn build(file: &Arc<FileContent>) -> Result<Self, ParseError> {
        let value = parse::parse_workflow(file.text())?;
        let ast = WorkflowAst::parse(file.text())?;
        let jobs = pair_jobs(&value.jobs, &ast, file)?;
        Ok(WorkflowModel {
            value,
            ast,
            file: Arc::clone(file),
            jobs,
        })
    }

    /// Declared name, or the file path when the workflow has none.
    pub fn name(&self) -> &str {
        self.value.name.as_deref().unwrap_or(self.file.path())
    }

    pub fn value(&self) -> &WorkflowValue {
        &self.value
    }

    pub fn file(&self) -> &FileContent {
        &self.file
    }

    pub fn start_line(&self) -> usize {
        self.ast.start_line()
    }

    /// Jobs in declaration order.
    pub fn jobs(&self) -> &[JobModel] {
        &self.jobs
    }

    pub fn job(&self, id: &str) -> Option<&JobModel> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    pub fn match_job(&self, raw_name: &str) -> Option<&JobModel> {
        JobModel::match_name(&self.jobs, raw_name)
    }
}

/// A workflow that other workflows call through `uses:`.
#[derive(Debug, Clone)]
pub struct ReusableWorkflowModel {
    value: ReusableWorkflowValue,
    ast: WorkflowAst,
    file: Arc<FileContent>,
    jobs: Vec<JobModel>,
}

impl ReusableWorkflowModel {
    pub fn new(file: Arc<FileContent>) -> Result<Self, ParseError> {
        let model = Self::build(&file).map_err(|e| e.with_path(file.path()))?;
        debug!(
            path = model.file.path(),
            jobs = model.jobs.len(),
            "built reusable workflow model"
        );
        Ok(model)
    }

    pub fn from_file(file: FileContent) -> Result<Self, ParseError> {
        Self::new(Arc::new(file))
    }

    fn build(file: &Arc<FileContent>) -> Result<Self, ParseError> {
        let value = parse::parse_reusable_workflow(file.text())?;
        let ast = WorkflowAst::parse(file.text())?;
        let jobs = pair_jobs(&value.workflow().jobs, &ast, file)?;
        Ok(ReusableWorkflowModel {
            value,
            ast,
            file: Arc::clone(file),
            jobs,
        })
    }

    pub fn name(&self) -> &str {
        self.value
            .workflow()
            .name
            .as_deref()
            .unwrap_or(self.file.path())
    }

    pub fn value(&self) -> &ReusableWorkflowValue {
        &self.value
    }

    pub fn file(&self) -> &FileContent {
        &self.file
    }

    pub fn start_line(&self) -> usize {
        self.ast.start_line()
    }

    pub fn input_names(&self) -> Vec<String> {
        self.value.input_names()
    }

    pub fn jobs(&self) -> &[JobModel] {
        &self.jobs
    }

    pub fn job(&self, id: &str) -> Option<&JobModel> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    pub fn match_job(&self, raw_name: &str) -> Option<&JobModel> {
        JobModel::match_name(&self.jobs, raw_name)
    }
}

/// Index workflows by display name. A later duplicate replaces an earlier one.
pub fn create_workflow_name_map<'a, I>(models: I) -> HashMap<&'a str, &'a WorkflowModel>
where
    I: IntoIterator<Item = &'a WorkflowModel>,
{
    let mut map = HashMap::new();
    for model in models {
        map.insert(model.name(), model);
    }
    map
}

/// Pair the i-th job value with the i-th `jobs` entry of the AST.
fn pair_jobs(
    values: &IndexMap<String, JobValue>,
    ast: &WorkflowAst,
    file: &Arc<FileContent>,
) -> Result<Vec<JobModel>, ParseError> {
    let job_asts = ast.job_asts()?;
    if values.len() != job_asts.len() {
        return Err(ParseError::pairing(format!(
            "{} job values but {} job nodes",
            values.len(),
            job_asts.len()
        )));
    }

    values
        .iter()
        .zip(job_asts)
        .map(|((id, value), job_ast)| {
            if id != job_ast.id() {
                return Err(ParseError::pairing(format!(
                    "Job value '{}' is paired with job node '{}'",
                    id,
                    job_ast.id()
                )));
            }
            JobModel::new(id.clone(), value.clone(), job_ast, Arc::clone(file))
        })
        .collect()
}
