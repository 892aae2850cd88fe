//! Ecosystem error types.

use thiserror::Error;

/// Errors raised by fetch, parse, check or update helpers.
#[derive(Debug, Error)]
pub enum EcosystemError {
    /// No ecosystem is registered for the package manager.
    #[error("No ecosystem registered for package manager '{package_manager}'")]
    UnsupportedPackageManager { package_manager: String },

    /// The helper process could not be started or talked to.
    #[error("Failed to run helper '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The helper process exited unsuccessfully.
    #[error("Helper '{command}' exited with {status}: {stderr}")]
    HelperFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The helper reported an error for the requested function.
    #[error("Helper function '{function}' failed: {message}")]
    FunctionFailed { function: String, message: String },

    /// Request or reply could not be (de)serialized.
    #[error("Invalid helper payload for '{function}': {source}")]
    Payload {
        function: String,
        #[source]
        source: serde_json::Error,
    },
}
