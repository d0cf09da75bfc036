use serde::{Deserialize, Serialize};

/// A registered remote machine.
///
/// The address is the lookup key for every operation; it travels as `ip`
/// on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    #[serde(rename = "ip")]
    pub address: String,
}

impl Target {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Every input the gateway validates for presence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Username,
    Password,
    Name,
    #[serde(rename = "ip")]
    Address,
    File,
    Filename,
    DirectoryPath,
    DatabaseName,
    Query,
    Command,
    ImageName,
    ContainerId,
    PackageName,
}

impl Field {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::Name => "name",
            Field::Address => "ip",
            Field::File => "file",
            Field::Filename => "filename",
            Field::DirectoryPath => "directory_path",
            Field::DatabaseName => "database_name",
            Field::Query => "query",
            Field::Command => "command",
            Field::ImageName => "image_name",
            Field::ContainerId => "container_id",
            Field::PackageName => "package_name",
        }
    }

    /// Message shown to the client when the field is absent or empty.
    pub fn missing_message(self) -> &'static str {
        match self {
            Field::Username | Field::Password => "Username and password are required",
            Field::Name | Field::Address => "Server name and IP are required",
            Field::File => "No selected file",
            Field::Filename => "Filename is required",
            Field::DirectoryPath => "Directory path is required",
            Field::DatabaseName => "Database name is required",
            Field::Query => "Query is required",
            Field::Command => "Command is required",
            Field::ImageName => "Image name is required",
            Field::ContainerId => "Container id is required",
            Field::PackageName => "Package name is required",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===================================================================
// Request bodies
// ===================================================================

/// Body of `/register` and `/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `/add_server`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddServerBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandBody {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullImageBody {
    #[serde(default)]
    pub image_name: Option<String>,
}

/// Body of `/install_software`. A missing `version` means "latest".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallBody {
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

// ===================================================================
// Response payloads
// ===================================================================

/// Plain acknowledgement, also used for validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned when an address does not resolve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Resource usage snapshot for a target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    pub ip: String,
    pub cpu_usage: String,
    pub memory_usage: String,
    pub disk_usage: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryListing {
    pub path: String,
    pub files: Vec<FileEntry>,
    pub directories: Vec<FileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub engine: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseListing {
    pub server_ip: String,
    pub databases: Vec<DatabaseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableListing {
    pub server_ip: String,
    pub database_name: String,
    pub tables: Vec<String>,
}

/// A single value in a query result row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Text(String),
}

/// What a query produced: a result set for reads, a count for writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum QueryOutcome {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
    },
    Affected {
        rows_affected: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResult {
    pub server_ip: String,
    pub database_name: String,
    pub query: String,
    #[serde(flatten)]
    pub outcome: QueryOutcome,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandResult {
    pub server_ip: String,
    pub command: String,
    pub output: String,
    pub error: String,
    pub exit_code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageEntry {
    pub id: String,
    pub repository: String,
    pub tag: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageListing {
    pub server_ip: String,
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerEntry {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: String,
    pub ports: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerListing {
    pub server_ip: String,
    pub containers: Vec<ContainerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerLogs {
    pub server_ip: String,
    pub container_id: String,
    pub logs: String,
}

/// State of a background task started on a target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallTicket {
    pub server_ip: String,
    pub package_name: String,
    pub version: String,
    pub message: String,
    pub status: TaskStatus,
    pub task_id: String,
}
