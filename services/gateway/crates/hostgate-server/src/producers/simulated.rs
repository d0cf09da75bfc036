//! Canned responses standing in for real remote integrations.
//!
//! Every method is a pure function of its inputs: the same target and
//! parameters always produce the same payload.

use hostgate_common::{
    Cell, CommandResult, ContainerEntry, ContainerListing, ContainerLogs, DatabaseEntry,
    DatabaseListing, DirectoryListing, EntryKind, FileEntry, ImageEntry, ImageListing,
    InstallTicket, Message, QueryOutcome, QueryResult, StatusReport, TableListing, Target,
    TaskStatus, first_token, is_select_query, simulated,
};

use super::{
    ContainerRuntime, DatabaseClient, FileTransfer, PackageInstaller, ShellExecutor, StatusProbe,
};

const LS_TMP_OUTPUT: &str = "total 0\n\
    drwxrwxrwt 2 root root 40 Oct 26 10:00 some_dir\n\
    -rw-r--r-- 1 user user 0 Oct 26 10:00 some_file.txt";

const NGINX_LOGS: &str = "[INFO] Starting up Nginx server...\n\
    [INFO] Listening on port 80.\n\
    [ACCESS] 192.168.1.10 - GET /index.html\n\
    [ACCESS] 192.168.1.12 - GET /styles.css";

const TABLES: [&str; 4] = ["users", "products", "orders", "inventory_items"];

/// Producer that answers every operation from fixed data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedHost;

impl StatusProbe for SimulatedHost {
    fn status(&self, target: &Target) -> StatusReport {
        StatusReport {
            ip: target.address.clone(),
            cpu_usage: "15%".to_string(),
            memory_usage: "45%".to_string(),
            disk_usage: "60%".to_string(),
        }
    }
}

impl FileTransfer for SimulatedHost {
    fn upload(&self, target: &Target, file_name: &str) -> Message {
        Message::new(format!(
            "File '{file_name}' successfully uploaded to {} (simulated)",
            target.address
        ))
    }

    fn download(&self, target: &Target, file_name: &str) -> Message {
        Message::new(format!(
            "File '{file_name}' successfully downloaded from {} (simulated)",
            target.address
        ))
    }

    fn list_files(&self, _target: &Target, directory: &str) -> DirectoryListing {
        let file = |name: &str, size: &str| FileEntry {
            name: name.to_string(),
            kind: EntryKind::File,
            size: Some(size.to_string()),
        };
        let dir = |name: &str| FileEntry {
            name: name.to_string(),
            kind: EntryKind::Directory,
            size: None,
        };
        DirectoryListing {
            path: directory.to_string(),
            files: vec![file("file1.txt", "1KB"), file("report.docx", "120KB")],
            directories: vec![dir("subdir1"), dir("another_dir")],
        }
    }
}

impl DatabaseClient for SimulatedHost {
    fn list_databases(&self, target: &Target) -> DatabaseListing {
        let db = |name: &str, engine: &str, size: &str| DatabaseEntry {
            name: name.to_string(),
            engine: engine.to_string(),
            size: size.to_string(),
        };
        DatabaseListing {
            server_ip: target.address.clone(),
            databases: vec![
                db("mysql_db1", "MySQL", "150MB"),
                db("postgres_db1", "PostgreSQL", "200MB"),
            ],
        }
    }

    fn list_tables(&self, target: &Target, database: &str) -> TableListing {
        TableListing {
            server_ip: target.address.clone(),
            database_name: database.to_string(),
            tables: TABLES.iter().map(ToString::to_string).collect(),
        }
    }

    fn execute_query(&self, target: &Target, database: &str, query: &str) -> QueryResult {
        let (outcome, message) = if is_select_query(query) {
            let row = |id: i64, name: &str, email: &str| {
                vec![
                    Cell::Int(id),
                    Cell::Text(name.to_string()),
                    Cell::Text(email.to_string()),
                ]
            };
            (
                QueryOutcome::Rows {
                    columns: vec!["id".to_string(), "name".to_string(), "email".to_string()],
                    rows: vec![
                        row(1, "Alice Wonderland", "alice@example.com"),
                        row(2, "Bob The Builder", "bob@example.com"),
                    ],
                },
                "SELECT query executed successfully (simulated).",
            )
        } else {
            (
                QueryOutcome::Affected {
                    rows_affected: simulated::ROWS_AFFECTED,
                },
                "Query executed successfully (simulated).",
            )
        };

        QueryResult {
            server_ip: target.address.clone(),
            database_name: database.to_string(),
            query: query.to_string(),
            outcome,
            message: message.to_string(),
        }
    }
}

impl ShellExecutor for SimulatedHost {
    fn execute(&self, target: &Target, command: &str) -> CommandResult {
        let known = match command {
            "ls -l /tmp" => Some(LS_TMP_OUTPUT),
            "whoami" => Some("mock_user"),
            "pwd" => Some("/home/mock_user"),
            _ => None,
        };

        let (output, error, exit_code) = match known {
            Some(stdout) => (stdout.to_string(), String::new(), 0),
            None => (
                String::new(),
                format!("command not found: {}", first_token(command)),
                simulated::COMMAND_NOT_FOUND_EXIT,
            ),
        };

        CommandResult {
            server_ip: target.address.clone(),
            command: command.to_string(),
            output,
            error,
            exit_code,
        }
    }
}

impl ContainerRuntime for SimulatedHost {
    fn images(&self, target: &Target) -> ImageListing {
        let image = |id: &str, repository: &str, tag: &str, size: &str| ImageEntry {
            id: format!("sha256:{id}"),
            repository: repository.to_string(),
            tag: tag.to_string(),
            size: size.to_string(),
        };
        ImageListing {
            server_ip: target.address.clone(),
            images: vec![
                image(
                    "f707a09c95418991968b54a55c513ac29da628f063e095858841914b89a89f60",
                    "ubuntu",
                    "latest",
                    "72.8MB",
                ),
                image(
                    "0d17b0b84fd67817692764c1e8260502682900931afe0008b93f2969eba74747",
                    "nginx",
                    "stable",
                    "133MB",
                ),
                image(
                    "e9bbb59c3673f9f0f018a968934265108d86305db899946f02a5b895f056349a",
                    "alpine",
                    "latest",
                    "5.53MB",
                ),
            ],
        }
    }

    fn containers(&self, target: &Target) -> ContainerListing {
        let container =
            |id: &str, name: &str, image: &str, status: &str, ports: &str| ContainerEntry {
                id: id.to_string(),
                name: name.to_string(),
                image: image.to_string(),
                status: status.to_string(),
                ports: ports.to_string(),
            };
        ContainerListing {
            server_ip: target.address.clone(),
            containers: vec![
                container(
                    "c1a2b3c4d5e6",
                    "web_server_1",
                    "nginx:stable",
                    "Up 2 hours",
                    "0.0.0.0:80->80/tcp",
                ),
                container(
                    "d4e5f6g7h8i9",
                    "app_db_1",
                    "postgres:13",
                    "Exited (0) 5 minutes ago",
                    "",
                ),
                container(
                    "j0k1l2m3n4p5",
                    "my_redis",
                    "redis:alpine",
                    "Up 1 day",
                    "0.0.0.0:6379->6379/tcp",
                ),
            ],
        }
    }

    fn pull_image(&self, target: &Target, image: &str) -> Message {
        Message::new(format!(
            "Image '{image}' is being pulled on {} (simulated).",
            target.address
        ))
    }

    fn container_logs(&self, target: &Target, container_id: &str) -> ContainerLogs {
        ContainerLogs {
            server_ip: target.address.clone(),
            container_id: container_id.to_string(),
            logs: NGINX_LOGS.to_string(),
        }
    }
}

impl PackageInstaller for SimulatedHost {
    fn install(&self, target: &Target, package: &str, version: &str) -> InstallTicket {
        let task_id = simulated::INSTALL_TASK_ID;
        InstallTicket {
            server_ip: target.address.clone(),
            package_name: package.to_string(),
            version: version.to_string(),
            message: format!(
                "Installation of {package} (version: {version}) initiated on {} (simulated). \
                 Check status using task ID '{task_id}'.",
                target.address
            ),
            status: TaskStatus::Pending,
            task_id: task_id.to_string(),
        }
    }
}
