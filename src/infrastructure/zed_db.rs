use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};

use crate::domain::WorkspaceRow;

#[cfg(target_os = "linux")]
const ZED_DATA_DIR_NAME: &str = "zed";
#[cfg(not(target_os = "linux"))]
const ZED_DATA_DIR_NAME: &str = "Zed";

const WORKSPACE_ROWS_QUERY: &str = "SELECT w.workspace_id, w.paths, rc.kind, rc.host, rc.port, rc.user \
     FROM workspaces w \
     LEFT JOIN remote_connections rc ON w.remote_connection_id = rc.id";

pub trait WorkspaceSource {
    fn location(&self) -> &Path;
    fn load_rows(&self) -> Result<Vec<WorkspaceRow>, WorkspaceSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceSourceError {
    Open(String),
    Query(String),
}

impl WorkspaceSourceError {
    pub fn message(&self) -> String {
        match self {
            Self::Open(message) => format!("workspace database open failed: {message}"),
            Self::Query(message) => format!("workspace database query failed: {message}"),
        }
    }
}

/// Stable-channel database location under the platform's local data directory.
pub fn default_database_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|data_dir| {
        data_dir
            .join(ZED_DATA_DIR_NAME)
            .join("db")
            .join("0-stable")
            .join("db.sqlite")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteWorkspaceSource {
    database_path: PathBuf,
}

impl SqliteWorkspaceSource {
    pub fn new(database_path: PathBuf) -> Self {
        Self { database_path }
    }
}

impl WorkspaceSource for SqliteWorkspaceSource {
    fn location(&self) -> &Path {
        &self.database_path
    }

    fn load_rows(&self) -> Result<Vec<WorkspaceRow>, WorkspaceSourceError> {
        if !self.database_path.exists() {
            return Ok(Vec::new());
        }

        let connection = open_database(&self.database_path)?;
        let mut statement = connection
            .prepare(WORKSPACE_ROWS_QUERY)
            .map_err(|error| WorkspaceSourceError::Query(error.to_string()))?;
        let rows = statement
            .query_map([], workspace_row)
            .map_err(|error| WorkspaceSourceError::Query(error.to_string()))?;

        let mut workspace_rows = Vec::new();
        for row in rows {
            let row = row.map_err(|error| WorkspaceSourceError::Query(error.to_string()))?;
            workspace_rows.push(row);
        }

        Ok(workspace_rows)
    }
}

fn open_database(path: &Path) -> Result<Connection, WorkspaceSourceError> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|error| WorkspaceSourceError::Open(error.to_string()))
}

// Column types are owned by the editor, so every column is read leniently.
fn workspace_row(row: &Row<'_>) -> rusqlite::Result<WorkspaceRow> {
    Ok(WorkspaceRow {
        id: integer_value(row.get_ref(0)?),
        path: text_value(row.get_ref(1)?),
        remote_kind: text_value(row.get_ref(2)?),
        remote_host: text_value(row.get_ref(3)?),
        remote_port: integer_value(row.get_ref(4)?),
        remote_user: text_value(row.get_ref(5)?),
    })
}

fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().map(ToOwned::to_owned),
        _ => None,
    }
}

fn integer_value(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(value) => Some(value),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse().ok()),
        _ => None,
    }
}
