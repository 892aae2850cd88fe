//! Ecosystem capabilities backed by an external helper executable.
//!
//! Every call starts the helper once. The request is written to stdin as
//! `{"function": "...", "args": {...}}` and the helper answers on stdout with
//! `{"result": ...}` or `{"error": "..."}`.

use super::{
    Dependency, DependencyFile, EcosystemError, FetchedFiles, FileFetcher, FileParser,
    FileUpdater, PackageManager, RequirementsToUnlock, UpdateChecker,
};
use crate::config::HelperSettings;
use crate::context::{Credential, RequestContext};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

/// Reply envelope written by helpers.
#[derive(Debug, Deserialize)]
struct HelperReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Runs an external helper for each capability call.
#[derive(Debug, Clone)]
pub struct HelperProcess {
    package_manager: PackageManager,
    command: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl HelperProcess {
    pub fn new(package_manager: PackageManager, command: &str, args: Vec<String>) -> Self {
        Self {
            package_manager,
            command: command.to_string(),
            args,
            env: BTreeMap::new(),
        }
    }

    pub fn from_settings(package_manager: PackageManager, settings: &HelperSettings) -> Self {
        Self {
            package_manager,
            command: settings.command.clone(),
            args: settings.args.clone(),
            env: settings.env.clone(),
        }
    }

    /// Invokes `function` and decodes its result.
    async fn call<R: DeserializeOwned>(
        &self,
        function: &str,
        args: Value,
    ) -> Result<R, EcosystemError> {
        debug!(
            package_manager = %self.package_manager,
            function,
            command = %self.command,
            "Calling helper"
        );

        let request = serde_json::to_vec(&json!({ "function": function, "args": args }))
            .map_err(|e| EcosystemError::Payload {
                function: function.to_string(),
                source: e,
            })?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Write stdin while stdout and stderr are drained
        let stdin = child.stdin.take();
        let write = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&request).await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(|e| self.spawn_error(e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            trace!(function, stderr = %stderr.trim(), "Helper stderr");
        }

        if !output.status.success() {
            return Err(EcosystemError::HelperFailed {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        match written {
            Ok(()) => {}
            // The helper answered without reading the whole request
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!(function, "Helper closed stdin early");
            }
            Err(e) => return Err(self.spawn_error(e)),
        }

        let reply: HelperReply =
            serde_json::from_slice(&output.stdout).map_err(|e| EcosystemError::Payload {
                function: function.to_string(),
                source: e,
            })?;

        if let Some(message) = reply.error {
            return Err(EcosystemError::FunctionFailed {
                function: function.to_string(),
                message,
            });
        }

        serde_json::from_value(reply.result.unwrap_or(Value::Null)).map_err(|e| {
            EcosystemError::Payload {
                function: function.to_string(),
                source: e,
            }
        })
    }

    fn spawn_error(&self, source: std::io::Error) -> EcosystemError {
        EcosystemError::Spawn {
            command: self.command.clone(),
            source,
        }
    }
}

#[async_trait]
impl FileFetcher for HelperProcess {
    async fn fetch_files(
        &self,
        context: &RequestContext,
        target_branch: Option<&str>,
    ) -> Result<FetchedFiles, EcosystemError> {
        self.call(
            "fetch_files",
            json!({
                "source": context.source(),
                "credentials": context.credentials(),
                "target_branch": target_branch,
            }),
        )
        .await
    }
}

#[async_trait]
impl FileParser for HelperProcess {
    async fn parse(
        &self,
        files: &[DependencyFile],
        context: &RequestContext,
    ) -> Result<Vec<Dependency>, EcosystemError> {
        self.call(
            "parse",
            json!({
                "dependency_files": files,
                "source": context.source(),
                "credentials": context.credentials(),
            }),
        )
        .await
    }
}

#[async_trait]
impl UpdateChecker for HelperProcess {
    async fn up_to_date(
        &self,
        dependency: &Dependency,
        files: &[DependencyFile],
        credentials: &[Credential],
    ) -> Result<bool, EcosystemError> {
        self.call(
            "up_to_date",
            json!({
                "dependency": dependency,
                "dependency_files": files,
                "credentials": credentials,
            }),
        )
        .await
    }

    async fn can_update(
        &self,
        dependency: &Dependency,
        files: &[DependencyFile],
        credentials: &[Credential],
        unlock: RequirementsToUnlock,
    ) -> Result<bool, EcosystemError> {
        self.call(
            "can_update",
            json!({
                "dependency": dependency,
                "dependency_files": files,
                "credentials": credentials,
                "requirements_to_unlock": unlock,
            }),
        )
        .await
    }

    async fn updated_dependencies(
        &self,
        dependency: &Dependency,
        files: &[DependencyFile],
        credentials: &[Credential],
        unlock: RequirementsToUnlock,
    ) -> Result<Vec<Dependency>, EcosystemError> {
        self.call(
            "updated_dependencies",
            json!({
                "dependency": dependency,
                "dependency_files": files,
                "credentials": credentials,
                "requirements_to_unlock": unlock,
            }),
        )
        .await
    }
}

#[async_trait]
impl FileUpdater for HelperProcess {
    async fn updated_files(
        &self,
        dependencies: &[Dependency],
        files: &[DependencyFile],
        credentials: &[Credential],
    ) -> Result<Vec<DependencyFile>, EcosystemError> {
        self.call(
            "updated_files",
            json!({
                "dependencies": dependencies,
                "dependency_files": files,
                "credentials": credentials,
            }),
        )
        .await
    }
}
