use thiserror::Error;

/// Domain-level failures shared across the workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A request payload or parameter failed validation. The first field
    /// names what was wrong, the second explains why.
    #[error("Invalid {0}: {1}")]
    InvalidInput(String, String),
}
