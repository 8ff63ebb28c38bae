use std::path::{Path, PathBuf};

use zed_workspaces::infrastructure::config::{self, PluginConfig};
use zed_workspaces::infrastructure::event_log::{Event, logger_for_path};
use zed_workspaces::infrastructure::zed_db::SqliteWorkspaceSource;
use zed_workspaces::launch::ProcessCommandSpawner;
use zed_workspaces::plugin::{PluginHost, RpcResponse, parse_request};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    event_log_path: Option<PathBuf>,
    request: Option<String>,
}

fn parse_cli_args(args: impl IntoIterator<Item = String>) -> std::io::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(argument) = args.next() {
        match argument.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--config requires a file path",
                    ));
                };
                cli.config_path = Some(PathBuf::from(path));
            }
            "--event-log" => {
                let Some(path) = args.next() else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "--event-log requires a file path",
                    ));
                };
                cli.event_log_path = Some(PathBuf::from(path));
            }
            _ => {
                if cli.request.is_none() {
                    cli.request = Some(argument);
                }
            }
        }
    }

    Ok(cli)
}

fn load_config(path: Option<&Path>) -> PluginConfig {
    let loaded = match path {
        Some(path) => config::load_from_path(path),
        None => config::load().map(|loaded| loaded.config),
    };

    loaded.unwrap_or_else(|error| {
        eprintln!("zed-workspaces: {error}; using defaults");
        PluginConfig::default()
    })
}

fn main() -> std::io::Result<()> {
    let cli = parse_cli_args(std::env::args().skip(1))?;
    let config = load_config(cli.config_path.as_deref());
    let event_log_path = cli.event_log_path.or_else(|| config.event_log.clone());
    let logger = logger_for_path(event_log_path.as_deref());

    let response = match parse_request(cli.request.as_deref()) {
        Ok(request) => {
            let source = SqliteWorkspaceSource::new(config.database_path());
            let mut spawner = ProcessCommandSpawner;
            PluginHost::new(&config, &source, &mut spawner, logger.as_ref()).handle(&request)
        }
        Err(error) => {
            logger.log(Event::new("rpc", "invalid_request").with_data("error", error));
            Some(RpcResponse { result: Vec::new() })
        }
    };

    if let Some(response) = response {
        let encoded = serde_json::to_string(&response).map_err(std::io::Error::other)?;
        println!("{encoded}");
    }

    Ok(())
}
