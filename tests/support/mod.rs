use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

pub struct FixtureWorkspace<'a> {
    pub id: i64,
    pub path: &'a str,
    pub ssh: Option<(&'a str, Option<&'a str>, Option<i64>)>,
}

pub fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("{prefix}-{}-{nanos}", process::id()));
    fs::create_dir_all(&path).expect("test directory should be created");
    path
}

pub fn write_zed_database(path: &Path, workspaces: &[FixtureWorkspace<'_>]) {
    let connection = Connection::open(path).expect("database should open");
    connection
        .execute_batch(
            "CREATE TABLE remote_connections (
               id INTEGER PRIMARY KEY,
               kind TEXT NOT NULL,
               host TEXT,
               port INTEGER,
               user TEXT
             );
             CREATE TABLE workspaces (
               workspace_id INTEGER PRIMARY KEY,
               paths TEXT,
               remote_connection_id INTEGER
             );",
        )
        .expect("schema should be created");

    for workspace in workspaces {
        let remote_connection_id = workspace.ssh.map(|(host, user, port)| {
            connection
                .execute(
                    "INSERT INTO remote_connections (kind, host, port, user) VALUES ('ssh', ?1, ?2, ?3)",
                    (host, port, user),
                )
                .expect("remote connection should be inserted");
            connection.last_insert_rowid()
        });
        connection
            .execute(
                "INSERT INTO workspaces (workspace_id, paths, remote_connection_id) VALUES (?1, ?2, ?3)",
                (workspace.id, workspace.path, remote_connection_id),
            )
            .expect("workspace should be inserted");
    }
}

pub fn write_config(root: &Path, entries: &str) -> PathBuf {
    let path = root.join("config.toml");
    fs::write(&path, entries).expect("config should write");
    path
}

pub fn run_plugin(config_path: &Path, request: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_zed-workspaces"))
        .arg("--config")
        .arg(config_path)
        .arg(request)
        .output()
        .expect("zed-workspaces binary should run");

    assert!(output.status.success(), "binary exited non-zero");
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

pub fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
