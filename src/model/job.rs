//! Jobs and the job-name reconciliation heuristics.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{FileContent, StepModel, pair_steps};
use crate::ast::JobAst;
use crate::error::ParseError;
use crate::parse::JobValue;

/// `${{ ... }}` expression placeholders.
static EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\$\{\{.*?\}\}").expect("expression pattern is valid")
});

#[derive(Debug, Clone)]
pub struct JobModel {
    id: String,
    value: JobValue,
    ast: JobAst,
    file: Arc<FileContent>,
    steps: Vec<StepModel>,
}

impl JobModel {
    pub(crate) fn new(
        id: String,
        value: JobValue,
        ast: JobAst,
        file: Arc<FileContent>,
    ) -> Result<Self, ParseError> {
        let steps = pair_steps(value.steps.as_deref(), &ast, &file)?;
        Ok(JobModel {
            id,
            value,
            ast,
            file,
            steps,
        })
    }

    /// Key of the job under `jobs`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.value.name.as_deref()
    }

    pub fn value(&self) -> &JobValue {
        &self.value
    }

    pub fn start_line(&self) -> usize {
        self.ast.start_line()
    }

    pub fn html_url_with_line(&self) -> Option<String> {
        self.file.html_url_with_line(self.start_line())
    }

    /// Steps in declaration order; empty for call jobs.
    pub fn steps(&self) -> &[StepModel] {
        &self.steps
    }

    pub fn is_matrix(&self) -> bool {
        self.value
            .strategy
            .as_ref()
            .is_some_and(|s| s.matrix.is_some())
    }

    /// True when `uses` names a local reusable workflow (`./…`).
    ///
    /// Remote references (`org/repo/.github/workflows/x.yml@ref`) are not
    /// detected.
    pub fn is_reusable(&self) -> bool {
        self.value
            .uses
            .as_deref()
            .is_some_and(|u| u.starts_with("./"))
    }

    /// Repository-relative path of the local reusable workflow this job calls.
    pub fn reusable_workflow_path(&self) -> Option<&str> {
        if !self.is_reusable() {
            return None;
        }
        self.value.uses.as_deref().map(|u| u.trim_start_matches("./"))
    }

    pub fn match_step(&self, raw_name: &str) -> Option<&StepModel> {
        StepModel::match_name(&self.steps, raw_name)
    }

    /// Find the job a run-time job name refers to.
    ///
    /// Rules are tried in order over all jobs, the first hit wins: exact id,
    /// exact declared name, then the matrix heuristics. An unnamed matrix job
    /// matches names starting with its id (`build (ubuntu, stable)`). A named
    /// one matches names containing its name with every `${{ }}` removed; with
    /// several matrix keys that can be ambiguous.
    pub fn match_name<'a>(jobs: &'a [JobModel], raw_name: &str) -> Option<&'a JobModel> {
        if let Some(job) = jobs.iter().find(|j| j.id == raw_name) {
            trace!(raw_name, job = job.id.as_str(), "job matched by id");
            return Some(job);
        }
        if let Some(job) = jobs.iter().find(|j| j.name() == Some(raw_name)) {
            trace!(raw_name, job = job.id.as_str(), "job matched by name");
            return Some(job);
        }
        let found = jobs
            .iter()
            .filter(|j| j.is_matrix())
            .find(|j| match j.name() {
                None => raw_name.starts_with(j.id.as_str()),
                Some(name) => {
                    let literal = EXPRESSION.replace_all(name, "");
                    raw_name.contains(literal.trim())
                }
            });
        match found {
            Some(job) => trace!(raw_name, job = job.id.as_str(), "job matched by matrix name"),
            None => trace!(raw_name, "no job matched"),
        }
        found
    }
}
