//! Template rendering error types.

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// The rendered branch name is not a valid git reference.
    #[error("Invalid branch name '{name}': {message}")]
    InvalidBranchName { name: String, message: String },

    /// There is nothing to describe.
    #[error("No updated dependencies to describe")]
    NoDependencies,
}
