//! Steps and the step-name reconciliation heuristics.

use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use super::FileContent;
use crate::ast::StepAst;
use crate::parse::StepValue;

/// Steps GitHub adds to every job run. They have no YAML counterpart.
const PSEUDO_STEPS: [&str; 2] = ["Set up job", "Complete job"];

/// Run-time decorations GitHub puts in front of step names, checked in order.
const RUN_PREFIXES: [&str; 5] = ["Pre Run ", "Post Run ", "Pre ", "Run ", "Post "];

const NOT_SHOWABLE: &str = "Error: Not showable step";

/// A `uses:` reference split at its last `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uses {
    pub action: String,
    /// Text after the last `@`; `None` when the reference has no `@`.
    pub git_ref: Option<String>,
}

impl Uses {
    pub fn parse(reference: &str) -> Self {
        match reference.rsplit_once('@') {
            Some((action, git_ref)) => Uses {
                action: action.to_string(),
                git_ref: Some(git_ref.to_string()),
            },
            None => Uses {
                action: reference.to_string(),
                git_ref: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepModel {
    value: StepValue,
    ast: StepAst,
    file: Arc<FileContent>,
    uses: Option<Uses>,
    name: String,
}

impl StepModel {
    pub(crate) fn new(value: StepValue, ast: StepAst, file: Arc<FileContent>) -> Self {
        let uses = value.uses.as_deref().map(Uses::parse);
        let name = value
            .name
            .clone()
            .or_else(|| value.run.clone())
            .or_else(|| uses.as_ref().map(|u| u.action.clone()))
            .unwrap_or_default();
        StepModel {
            value,
            ast,
            file,
            uses,
            name,
        }
    }

    pub fn value(&self) -> &StepValue {
        &self.value
    }

    pub fn id(&self) -> Option<&str> {
        self.value.id.as_deref()
    }

    pub fn uses(&self) -> Option<&Uses> {
        self.uses.as_ref()
    }

    /// Declared name, else the `run` text, else the action of `uses`, else `""`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared name, else raw `uses`, else raw `run`, else a fixed error label.
    pub fn showable(&self) -> &str {
        self.value
            .name
            .as_deref()
            .or(self.value.uses.as_deref())
            .or(self.value.run.as_deref())
            .unwrap_or(NOT_SHOWABLE)
    }

    pub fn start_line(&self) -> usize {
        self.ast.start_line()
    }

    pub fn html_url_with_line(&self) -> Option<String> {
        self.file.html_url_with_line(self.start_line())
    }

    /// True for a local action other than the repository root (`./`).
    pub fn is_composite(&self) -> bool {
        self.value
            .uses
            .as_deref()
            .is_some_and(|u| u.starts_with("./") && u != "./")
    }

    /// Repository-relative directory of a local composite action.
    pub fn composite_action_dir(&self) -> Option<&str> {
        if !self.is_composite() {
            return None;
        }
        self.value
            .uses
            .as_deref()
            .map(|u| u.trim_start_matches("./").trim_end_matches('/'))
    }

    /// Files that may hold the composite action's definition.
    pub fn composite_action_paths(&self) -> Vec<String> {
        self.composite_action_dir()
            .map(|dir| vec![format!("{dir}/action.yml"), format!("{dir}/action.yaml")])
            .unwrap_or_default()
    }

    /// Find the step a run-time step name refers to.
    ///
    /// GitHub's pseudo-steps never match. One run-time prefix is stripped, then a
    /// step matches when the stripped name equals its resolved name, or when the
    /// text before the first `@` equals its action.
    pub fn match_name<'a>(steps: &'a [StepModel], raw_name: &str) -> Option<&'a StepModel> {
        if PSEUDO_STEPS.contains(&raw_name) {
            trace!(raw_name, "pseudo-step has no definition");
            return None;
        }

        let stripped = strip_run_prefix(raw_name);
        let action = stripped.split('@').next().unwrap_or(stripped);

        let found = steps.iter().find(|step| {
            step.name() == stripped || step.uses().is_some_and(|u| u.action == action)
        });
        match found {
            Some(step) => trace!(raw_name, line = step.start_line(), "step matched"),
            None => trace!(raw_name, "no step matched"),
        }
        found
    }
}

fn strip_run_prefix(raw_name: &str) -> &str {
    RUN_PREFIXES
        .iter()
        .find_map(|prefix| raw_name.strip_prefix(prefix))
        .unwrap_or(raw_name)
}
