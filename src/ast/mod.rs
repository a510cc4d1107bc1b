//! Position view: YAML text → structural tree → workflow/job/step nodes with lines.

pub mod position;
pub mod tree;
pub mod workflow;

pub use position::PositionIndex;
pub use tree::{Entry, Node, NodeKind};
pub use workflow::{JobAst, StepAst, WorkflowAst};
