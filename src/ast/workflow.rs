//! Workflow-shaped views over the structural tree.
//!
//! `WorkflowAst` finds the `jobs` mapping, `JobAst` finds the `steps`
//! sequence. Every view shares the file's [`PositionIndex`] so it can answer
//! `start_line()` without rescanning the text.

use std::sync::Arc;

use super::position::PositionIndex;
use super::tree::{self, Node};
use crate::error::ParseError;

#[derive(Debug, Clone)]
pub struct WorkflowAst {
    root: Node,
    index: Arc<PositionIndex>,
}

impl WorkflowAst {
    /// Parse `source` and index its lines.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let index = PositionIndex::new(source);
        let root = tree::parse(source, &index)?;
        if !root.is_mapping() {
            return Err(ParseError::ast("P002", "Root of the file is not a mapping"));
        }
        Ok(WorkflowAst {
            root,
            index: Arc::new(index),
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn index(&self) -> &Arc<PositionIndex> {
        &self.index
    }

    pub fn start_line(&self) -> usize {
        self.index.index_to_line(self.root.offset)
    }

    /// One view per entry of the top-level `jobs` mapping, in declaration order.
    pub fn job_asts(&self) -> Result<Vec<JobAst>, ParseError> {
        let jobs = self
            .root
            .get("jobs")
            .ok_or_else(|| ParseError::ast("P003", "Missing top-level `jobs` key"))?;

        Ok(jobs
            .entries()
            .iter()
            .map(|entry| JobAst {
                id: entry.key.as_scalar().unwrap_or_default().to_string(),
                key_offset: entry.key.offset,
                node: entry.value.clone(),
                index: Arc::clone(&self.index),
            })
            .collect())
    }

    /// Synthetic job wrapping a composite action's `runs.steps` sequence.
    ///
    /// Composite actions have no `jobs`; their steps are presented through a
    /// single job view so step pairing works the same way as for workflows.
    pub fn composite_job_ast(&self) -> Result<JobAst, ParseError> {
        let runs = self
            .root
            .entry("runs")
            .ok_or_else(|| ParseError::ast("P003", "Missing top-level `runs` key"))?;
        if runs.value.get("steps").is_none() {
            return Err(ParseError::ast("P003", "Missing `runs.steps` key"));
        }
        Ok(JobAst::synthetic(
            runs.key.offset,
            runs.value.clone(),
            Arc::clone(&self.index),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct JobAst {
    /// Mapping key of the job; empty for a synthetic job.
    id: String,
    key_offset: usize,
    node: Node,
    index: Arc<PositionIndex>,
}

impl JobAst {
    /// Build a job view that does not come from a `jobs` entry.
    ///
    /// `node` must be a mapping that may carry a `steps` sequence, and
    /// `offset` is reported as the job's start.
    pub fn synthetic(offset: usize, node: Node, index: Arc<PositionIndex>) -> Self {
        JobAst {
            id: String::new(),
            key_offset: offset,
            node,
            index,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Line of the job's key.
    pub fn start_line(&self) -> usize {
        self.index.index_to_line(self.key_offset)
    }

    /// `None` when the job has no `steps` key (call jobs).
    pub fn step_asts(&self) -> Option<Vec<StepAst>> {
        let steps = self.node.get("steps")?;
        Some(
            steps
                .items()
                .iter()
                .map(|item| StepAst {
                    node: item.clone(),
                    index: Arc::clone(&self.index),
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct StepAst {
    node: Node,
    index: Arc<PositionIndex>,
}

impl StepAst {
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Line of the step's first key (the line carrying its `-`).
    pub fn start_line(&self) -> usize {
        self.index.index_to_line(self.node.offset)
    }
}
