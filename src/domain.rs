pub const SSH_REMOTE_KIND: &str = "ssh";
pub const WSL_PATH_PREFIXES: [&str; 2] = ["/home/", "/mnt/"];

/// One row of the editor's workspace history, exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkspaceRow {
    pub id: Option<i64>,
    pub path: Option<String>,
    pub remote_kind: Option<String>,
    pub remote_host: Option<String>,
    pub remote_port: Option<i64>,
    pub remote_user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: String,
    pub user: Option<String>,
    pub port: Option<u16>,
}

impl SshTarget {
    /// Returns `None` when the host is empty; user and port are dropped when empty or zero.
    pub fn new(host: &str, user: Option<&str>, port: Option<u16>) -> Option<Self> {
        if host.is_empty() {
            return None;
        }

        Some(Self {
            host: host.to_string(),
            user: user.filter(|user| !user.is_empty()).map(ToOwned::to_owned),
            port: port.filter(|port| *port != 0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Local,
    Wsl,
    Ssh(SshTarget),
}

impl Connection {
    pub fn ssh_target(&self) -> Option<&SshTarget> {
        match self {
            Self::Ssh(target) => Some(target),
            Self::Local | Self::Wsl => None,
        }
    }

    pub fn is_ssh(&self) -> bool {
        matches!(self, Self::Ssh(_))
    }

    pub fn label(&self) -> String {
        match self {
            Self::Local => "Local".to_string(),
            Self::Wsl => "WSL".to_string(),
            Self::Ssh(target) => format!("SSH: {}", target.host),
        }
    }

    pub fn title_suffix(&self) -> Option<String> {
        match self {
            Self::Local => None,
            Self::Wsl | Self::Ssh(_) => Some(format!(" ({})", self.label())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRecord {
    pub id: Option<i64>,
    pub path: String,
    pub normalized_key: String,
    pub connection: Connection,
}

impl WorkspaceRecord {
    /// Rows without a usable path are skipped rather than failing the batch.
    pub fn from_row(row: WorkspaceRow) -> Option<Self> {
        let path = row.path.filter(|path| !path.is_empty())?;
        let connection = classify_connection(
            &path,
            row.remote_kind.as_deref(),
            row.remote_host.as_deref(),
            row.remote_user.as_deref(),
            row.remote_port,
        );

        Some(Self {
            id: row.id,
            normalized_key: normalize_path(&path),
            path,
            connection,
        })
    }

    pub fn sort_key(&self) -> String {
        final_segment(&self.path).unwrap_or_default().to_lowercase()
    }
}

pub fn classify_connection(
    path: &str,
    remote_kind: Option<&str>,
    remote_host: Option<&str>,
    remote_user: Option<&str>,
    remote_port: Option<i64>,
) -> Connection {
    if remote_kind == Some(SSH_REMOTE_KIND)
        && let Some(target) = remote_host.and_then(|host| {
            SshTarget::new(host, remote_user, remote_port.and_then(port_from_raw))
        })
    {
        return Connection::Ssh(target);
    }

    if is_wsl_path(path) {
        Connection::Wsl
    } else {
        Connection::Local
    }
}

pub fn is_wsl_path(path: &str) -> bool {
    WSL_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

pub fn port_from_raw(raw: i64) -> Option<u16> {
    u16::try_from(raw).ok().filter(|port| *port != 0)
}

/// Comparison key only. Never use it to address a filesystem or remote host.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized.to_lowercase()
}

/// Last component of a local, WSL, or remote path. Either separator style is accepted.
pub fn final_segment(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches(['/', '\\']);
    let segment = trimmed.rsplit(['/', '\\']).next()?;
    if segment.is_empty() {
        return None;
    }
    // A bare drive such as `C:` has no name of its own.
    if segment.len() == trimmed.len() && segment.ends_with(':') {
        return None;
    }

    Some(segment)
}

pub fn display_name(path: &str) -> String {
    let name = final_segment(path).unwrap_or(path);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
