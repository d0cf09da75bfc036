//! Producer traits: the seam between the dispatcher and whatever actually
//! talks to a managed server.
//!
//! Each trait covers one feature area. The dispatcher has already resolved
//! the target and validated every required input by the time a producer
//! method runs, so producers never fail; they only build payloads.

pub mod simulated;

use hostgate_common::{
    CommandResult, ContainerListing, ContainerLogs, DatabaseListing, DirectoryListing,
    ImageListing, InstallTicket, Message, QueryResult, StatusReport, TableListing, Target,
};

pub use simulated::SimulatedHost;

/// Resource usage of a target.
pub trait StatusProbe {
    fn status(&self, target: &Target) -> StatusReport;
}

/// File movement and directory listing on a target.
pub trait FileTransfer {
    /// Accept an uploaded file. Only the file name is passed through.
    fn upload(&self, target: &Target, file_name: &str) -> Message;
    fn download(&self, target: &Target, file_name: &str) -> Message;
    fn list_files(&self, target: &Target, directory: &str) -> DirectoryListing;
}

/// Database inspection and query execution on a target.
pub trait DatabaseClient {
    fn list_databases(&self, target: &Target) -> DatabaseListing;
    fn list_tables(&self, target: &Target, database: &str) -> TableListing;
    fn execute_query(&self, target: &Target, database: &str, query: &str) -> QueryResult;
}

/// Command execution on a target.
pub trait ShellExecutor {
    fn execute(&self, target: &Target, command: &str) -> CommandResult;
}

/// Container engine operations on a target.
pub trait ContainerRuntime {
    fn images(&self, target: &Target) -> ImageListing;
    fn containers(&self, target: &Target) -> ContainerListing;
    fn pull_image(&self, target: &Target, image: &str) -> Message;
    fn container_logs(&self, target: &Target, container_id: &str) -> ContainerLogs;
}

/// Package installation on a target.
pub trait PackageInstaller {
    fn install(&self, target: &Target, package: &str, version: &str) -> InstallTicket;
}

/// Composite trait: any type implementing every feature trait can serve the dispatcher.
pub trait OperationProducer:
    StatusProbe
    + FileTransfer
    + DatabaseClient
    + ShellExecutor
    + ContainerRuntime
    + PackageInstaller
    + Send
    + Sync
{
}

/// Blanket implementation: any type implementing all feature traits is an `OperationProducer`.
impl<T> OperationProducer for T where
    T: StatusProbe
        + FileTransfer
        + DatabaseClient
        + ShellExecutor
        + ContainerRuntime
        + PackageInstaller
        + Send
        + Sync
{
}
