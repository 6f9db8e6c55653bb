//! Errors that abort a generation run

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The schema is malformed. No output is produced.
    Schema {
        interface: Option<String>,
        method: Option<String>,
        problem: String,
    },
    /// An internal invariant of the engine was violated. This is a bug in
    /// the generator, not in its input.
    Rendering { problem: String },
    /// A fixed template failed to compile or render.
    Template { problem: String },
    /// The emitted text could not be canonicalized. The raw text is kept so
    /// the caller can inspect what went wrong.
    Canonicalization { problem: String, raw: String },
}

impl GenerationError {
    pub fn schema(problem: impl Into<String>) -> Self {
        GenerationError::Schema {
            interface: None,
            method: None,
            problem: problem.into(),
        }
    }

    pub fn in_interface(interface: &str, problem: impl Into<String>) -> Self {
        GenerationError::Schema {
            interface: Some(interface.to_string()),
            method: None,
            problem: problem.into(),
        }
    }

    pub fn in_method(interface: &str, method: &str, problem: impl Into<String>) -> Self {
        GenerationError::Schema {
            interface: Some(interface.to_string()),
            method: Some(method.to_string()),
            problem: problem.into(),
        }
    }

    pub fn rendering(problem: impl Into<String>) -> Self {
        GenerationError::Rendering {
            problem: problem.into(),
        }
    }

    /// The uncanonicalized output, if generation got that far.
    pub fn raw(&self) -> Option<&str> {
        match self {
            GenerationError::Canonicalization { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn problem(&self) -> &str {
        match self {
            GenerationError::Schema { problem, .. } => problem,
            GenerationError::Rendering { problem } => problem,
            GenerationError::Template { problem } => problem,
            GenerationError::Canonicalization { problem, .. } => problem,
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Schema {
                interface,
                method,
                problem,
            } => match (interface, method) {
                (Some(interface), Some(method)) => {
                    write!(f, "invalid schema: {}.{}: {}", interface, method, problem)
                }
                (Some(interface), None) => write!(f, "invalid schema: {}: {}", interface, problem),
                _ => write!(f, "invalid schema: {}", problem),
            },
            GenerationError::Rendering { problem } => {
                write!(f, "internal error: {}", problem)
            }
            GenerationError::Template { problem } => {
                write!(f, "internal error: template failed: {}", problem)
            }
            GenerationError::Canonicalization { problem, .. } => {
                write!(f, "internal error: invalid code generated: {}", problem)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<tinytemplate::error::Error> for GenerationError {
    fn from(error: tinytemplate::error::Error) -> Self {
        GenerationError::Template {
            problem: error.to_string(),
        }
    }
}
