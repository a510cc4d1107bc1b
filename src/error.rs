//! Parse-time error type shared by the value model, the AST and the domain model.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Yaml,
    Value,
    Ast,
    Pairing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Yaml => write!(f, "YAML"),
            Phase::Value => write!(f, "Value"),
            Phase::Ast => write!(f, "AST"),
            Phase::Pairing => write!(f, "Pairing"),
        }
    }
}

/// A file could not be turned into a workflow, reusable workflow or action model.
///
/// Never recovered inside this crate: the caller decides whether to skip the
/// file or abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "[{phase}:{code}] {message}{}",
    .path.as_ref().map(|p| format!(" (file '{p}')")).unwrap_or_default()
)]
pub struct ParseError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub path: Option<String>,
}

impl ParseError {
    pub fn yaml(code: &str, message: impl Into<String>) -> Self {
        ParseError {
            code: code.into(),
            phase: Phase::Yaml,
            message: message.into(),
            path: None,
        }
    }

    pub fn value(code: &str, message: impl Into<String>) -> Self {
        ParseError {
            code: code.into(),
            phase: Phase::Value,
            message: message.into(),
            path: None,
        }
    }

    pub fn ast(code: &str, message: impl Into<String>) -> Self {
        ParseError {
            code: code.into(),
            phase: Phase::Ast,
            message: message.into(),
            path: None,
        }
    }

    pub fn pairing(message: impl Into<String>) -> Self {
        ParseError {
            code: "M001".into(),
            phase: Phase::Pairing,
            message: message.into(),
            path: None,
        }
    }

    /// Attach the repository path of the file that failed.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}
