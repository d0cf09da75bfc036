//! Operation dispatch: resolve the target, validate inputs, hand off to a
//! producer.
//!
//! Resolution happens first, so an unknown address is reported as
//! `TargetNotFound` no matter what else is wrong with the request. Every
//! required input is checked before the producer is called, and the
//! producer's payload is returned untouched.

use std::sync::Arc;

use hostgate_common::{
    CommandResult, ContainerListing, ContainerLogs, DatabaseListing, DirectoryListing, Field,
    ImageListing, InstallTicket, Message, QueryResult, StatusReport, TableListing, Target,
    required, simulated,
};
use serde::Serialize;

use crate::error::OperationError;
use crate::producers::OperationProducer;
use crate::registry::ServerRegistry;

/// One request against a managed server.
///
/// Inputs are carried exactly as received; `None` and `Some("")` both
/// count as missing where the input is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Status,
    Upload {
        file: Option<String>,
    },
    Download {
        filename: Option<String>,
    },
    ListFiles {
        directory_path: Option<String>,
    },
    ListDatabases,
    ListTables {
        database_name: Option<String>,
    },
    ExecuteQuery {
        database_name: Option<String>,
        query: Option<String>,
    },
    ExecuteCommand {
        command: Option<String>,
    },
    DockerImages,
    DockerContainers,
    DockerPull {
        image_name: Option<String>,
    },
    DockerLogs {
        container_id: Option<String>,
    },
    InstallSoftware {
        package_name: Option<String>,
        version: Option<String>,
    },
}

impl OperationRequest {
    /// Stable snake_case name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationRequest::Status => "status",
            OperationRequest::Upload { .. } => "upload",
            OperationRequest::Download { .. } => "download",
            OperationRequest::ListFiles { .. } => "list_files",
            OperationRequest::ListDatabases => "list_databases",
            OperationRequest::ListTables { .. } => "list_tables",
            OperationRequest::ExecuteQuery { .. } => "execute_query",
            OperationRequest::ExecuteCommand { .. } => "execute_command",
            OperationRequest::DockerImages => "docker_images",
            OperationRequest::DockerContainers => "docker_containers",
            OperationRequest::DockerPull { .. } => "docker_pull",
            OperationRequest::DockerLogs { .. } => "docker_logs",
            OperationRequest::InstallSoftware { .. } => "install_software",
        }
    }
}

/// Successful payload of an operation, serialized as the bare inner value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Status(StatusReport),
    Upload(Message),
    Download(Message),
    ListFiles(DirectoryListing),
    ListDatabases(DatabaseListing),
    ListTables(TableListing),
    ExecuteQuery(QueryResult),
    ExecuteCommand(CommandResult),
    DockerImages(ImageListing),
    DockerContainers(ContainerListing),
    DockerPull(Message),
    DockerLogs(ContainerLogs),
    InstallSoftware(InstallTicket),
}

/// Routes validated requests to an [`OperationProducer`].
///
/// Holds no state of its own beyond the shared registry and producer.
#[derive(Clone)]
pub struct OperationDispatcher {
    registry: Arc<ServerRegistry>,
    producer: Arc<dyn OperationProducer>,
}

impl std::fmt::Debug for OperationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDispatcher")
            .field("registry", &self.registry)
            .field("producer", &"<OperationProducer>")
            .finish()
    }
}

impl OperationDispatcher {
    pub fn new(registry: Arc<ServerRegistry>, producer: Arc<dyn OperationProducer>) -> Self {
        Self { registry, producer }
    }

    /// Run `request` against the server registered under `address`.
    pub fn invoke(
        &self,
        address: &str,
        request: &OperationRequest,
    ) -> Result<OperationOutput, OperationError> {
        let Some(target) = self.registry.resolve(address) else {
            tracing::info!(address = %address, kind = request.kind(), "target not found");
            return Err(OperationError::TargetNotFound(address.to_string()));
        };

        match self.produce(&target, request) {
            Ok(output) => {
                tracing::debug!(
                    address = %address,
                    name = %target.name,
                    kind = request.kind(),
                    "operation completed",
                );
                Ok(output)
            }
            Err(field) => {
                tracing::info!(
                    address = %address,
                    kind = request.kind(),
                    field = %field,
                    "operation rejected: missing field",
                );
                Err(OperationError::MissingField(field))
            }
        }
    }

    fn produce(&self, target: &Target, request: &OperationRequest) -> Result<OperationOutput, Field> {
        let p = self.producer.as_ref();
        let output = match request {
            OperationRequest::Status => OperationOutput::Status(p.status(target)),
            OperationRequest::Upload { file } => {
                let file = required(Field::File, file.as_deref())?;
                OperationOutput::Upload(p.upload(target, file))
            }
            OperationRequest::Download { filename } => {
                let filename = required(Field::Filename, filename.as_deref())?;
                OperationOutput::Download(p.download(target, filename))
            }
            OperationRequest::ListFiles { directory_path } => {
                let path = required(Field::DirectoryPath, directory_path.as_deref())?;
                OperationOutput::ListFiles(p.list_files(target, path))
            }
            OperationRequest::ListDatabases => {
                OperationOutput::ListDatabases(p.list_databases(target))
            }
            OperationRequest::ListTables { database_name } => {
                let database = required(Field::DatabaseName, database_name.as_deref())?;
                OperationOutput::ListTables(p.list_tables(target, database))
            }
            OperationRequest::ExecuteQuery {
                database_name,
                query,
            } => {
                let database = required(Field::DatabaseName, database_name.as_deref())?;
                let query = required(Field::Query, query.as_deref())?;
                OperationOutput::ExecuteQuery(p.execute_query(target, database, query))
            }
            OperationRequest::ExecuteCommand { command } => {
                let command = required(Field::Command, command.as_deref())?;
                OperationOutput::ExecuteCommand(p.execute(target, command))
            }
            OperationRequest::DockerImages => OperationOutput::DockerImages(p.images(target)),
            OperationRequest::DockerContainers => {
                OperationOutput::DockerContainers(p.containers(target))
            }
            OperationRequest::DockerPull { image_name } => {
                let image = required(Field::ImageName, image_name.as_deref())?;
                OperationOutput::DockerPull(p.pull_image(target, image))
            }
            OperationRequest::DockerLogs { container_id } => {
                let id = required(Field::ContainerId, container_id.as_deref())?;
                OperationOutput::DockerLogs(p.container_logs(target, id))
            }
            OperationRequest::InstallSoftware {
                package_name,
                version,
            } => {
                let package = required(Field::PackageName, package_name.as_deref())?;
                let version = version
                    .as_deref()
                    .unwrap_or(simulated::DEFAULT_PACKAGE_VERSION);
                OperationOutput::InstallSoftware(p.install(target, package, version))
            }
        };
        Ok(output)
    }
}
