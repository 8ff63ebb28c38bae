use std::path::Path;

use serde_json::Value;

use crate::domain::{Connection, SshTarget, WorkspaceRecord, is_wsl_path};
use crate::infrastructure::config::PluginConfig;
use crate::infrastructure::event_log::{Event, EventLogger};
use crate::infrastructure::process::spawn_detached;

pub const FILE_BROWSER_ROOT: &str = "file:///";

#[cfg(windows)]
const PLATFORM_OPENER: &str = "explorer";
#[cfg(target_os = "macos")]
const PLATFORM_OPENER: &str = "open";
#[cfg(not(any(windows, target_os = "macos")))]
const PLATFORM_OPENER: &str = "xdg-open";

/// What a selected result points at, rebuilt from the host's action parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    pub path: String,
    pub connection: Connection,
}

impl LaunchTarget {
    pub fn from_record(record: &WorkspaceRecord) -> Self {
        Self {
            path: record.path.clone(),
            connection: record.connection.clone(),
        }
    }

    pub fn from_selection(
        path: &str,
        is_ssh: bool,
        ssh_host: Option<&str>,
        ssh_user: Option<&str>,
        ssh_port: Option<u16>,
    ) -> Self {
        let ssh_target = if is_ssh {
            ssh_host.and_then(|host| SshTarget::new(host, ssh_user, ssh_port))
        } else {
            None
        };
        let connection = match ssh_target {
            Some(target) => Connection::Ssh(target),
            None if is_wsl_path(path) => Connection::Wsl,
            None => Connection::Local,
        };

        Self {
            path: path.to_string(),
            connection,
        }
    }

    /// `[path, is_ssh, ssh_host, ssh_user, ssh_port]`, the tuple the host replays on selection.
    pub fn action_parameters(&self) -> Vec<Value> {
        let ssh_target = self.connection.ssh_target();
        vec![
            Value::from(self.path.clone()),
            Value::from(self.connection.is_ssh()),
            ssh_target.map_or(Value::Null, |target| Value::from(target.host.clone())),
            ssh_target
                .and_then(|target| target.user.clone())
                .map_or(Value::Null, Value::from),
            ssh_target
                .and_then(|target| target.port)
                .map_or(Value::Null, Value::from),
        ]
    }

    /// Missing trailing elements default to `false`/absent. Returns `None` without a text path.
    pub fn from_action_parameters(parameters: &[Value]) -> Option<Self> {
        let path = parameters.first()?.as_str()?;
        let is_ssh = parameters
            .get(1)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let text_at = |index: usize| parameters.get(index).and_then(Value::as_str);
        let ssh_port = parameters
            .get(4)
            .and_then(Value::as_u64)
            .and_then(|port| u16::try_from(port).ok());

        Some(Self::from_selection(
            path,
            is_ssh,
            text_at(2),
            text_at(3),
            ssh_port,
        ))
    }
}

pub fn build_ssh_uri(target: &SshTarget, path: &str) -> String {
    let mut uri = String::from("ssh://");
    if let Some(user) = target.user.as_deref() {
        uri.push_str(user);
        uri.push('@');
    }
    uri.push_str(&target.host);
    if let Some(port) = target.port {
        uri.push(':');
        uri.push_str(&port.to_string());
    }
    uri.push_str(path);
    uri
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    fn new(program: &str, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.to_string(),
            args: args.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommands {
    pub editor: String,
    pub wsl: String,
}

impl EditorCommands {
    pub fn from_config(config: &PluginConfig) -> Self {
        Self {
            editor: config.editor_command.clone(),
            wsl: config.wsl_command.clone(),
        }
    }

    fn remote_or_wsl(&self, target: &LaunchTarget) -> Option<LaunchCommand> {
        match &target.connection {
            Connection::Ssh(ssh_target) => Some(LaunchCommand::new(
                &self.editor,
                [build_ssh_uri(ssh_target, &target.path)],
            )),
            Connection::Wsl => Some(LaunchCommand::new(
                &self.wsl,
                [self.editor.clone(), target.path.clone()],
            )),
            Connection::Local => None,
        }
    }

    fn local(&self, target: &LaunchTarget) -> LaunchCommand {
        LaunchCommand::new(&self.editor, [target.path.clone()])
    }
}

pub fn file_browser_root_command() -> LaunchCommand {
    LaunchCommand::new(PLATFORM_OPENER, [FILE_BROWSER_ROOT.to_string()])
}

/// Primary selection. A local path that no longer exists opens the file browser root instead.
pub fn open_workspace_command(
    target: &LaunchTarget,
    commands: &EditorCommands,
    path_exists: impl Fn(&Path) -> bool,
) -> LaunchCommand {
    if let Some(command) = commands.remote_or_wsl(target) {
        return command;
    }

    if path_exists(Path::new(&target.path)) {
        commands.local(target)
    } else {
        file_browser_root_command()
    }
}

/// Context-menu variant. Local paths are handed to the editor without an existence check.
pub fn open_in_zed_command(target: &LaunchTarget, commands: &EditorCommands) -> LaunchCommand {
    commands
        .remote_or_wsl(target)
        .unwrap_or_else(|| commands.local(target))
}

pub trait CommandSpawner {
    fn spawn(&mut self, command: &LaunchCommand) -> std::io::Result<()>;

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub struct ProcessCommandSpawner;

impl CommandSpawner for ProcessCommandSpawner {
    fn spawn(&mut self, command: &LaunchCommand) -> std::io::Result<()> {
        spawn_detached(&command.program, &command.args)
    }
}

pub fn open_workspace(
    target: &LaunchTarget,
    commands: &EditorCommands,
    spawner: &mut impl CommandSpawner,
    logger: &dyn EventLogger,
) {
    let command = open_workspace_command(target, commands, |path| spawner.path_exists(path));
    if command == file_browser_root_command() {
        logger.log(
            Event::new("launch", "local_path_missing").with_data("path", target.path.clone()),
        );
    }
    spawn_and_log(&command, spawner, logger);
}

pub fn open_in_zed(
    target: &LaunchTarget,
    commands: &EditorCommands,
    spawner: &mut impl CommandSpawner,
    logger: &dyn EventLogger,
) {
    let command = open_in_zed_command(target, commands);
    spawn_and_log(&command, spawner, logger);
}

// Fire and forget: failures are recorded, never returned.
fn spawn_and_log(
    command: &LaunchCommand,
    spawner: &mut impl CommandSpawner,
    logger: &dyn EventLogger,
) {
    match spawner.spawn(command) {
        Ok(()) => logger.log(
            Event::new("launch", "spawned")
                .with_data("program", command.program.clone())
                .with_data("args", command.args.clone()),
        ),
        Err(error) => logger.log(
            Event::new("launch", "spawn_failed")
                .with_data("program", command.program.clone())
                .with_data("error", error.to_string()),
        ),
    }
}
