use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::infrastructure::config::PluginConfig;
use crate::infrastructure::event_log::{Event, EventLogger};
use crate::infrastructure::zed_db::WorkspaceSource;
use crate::launch::{self, CommandSpawner, EditorCommands, LaunchTarget};
use crate::presentation::{
    OPEN_IN_ZED_METHOD, OPEN_WORKSPACE_METHOD, ResultItem, context_menu_items, not_found_item,
    present_workspaces, source_error_item,
};
use crate::resolver::{WorkspaceDiscovery, discover_workspaces};

pub const QUERY_METHOD: &str = "query";
pub const CONTEXT_MENU_METHOD: &str = "context_menu";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

impl RpcRequest {
    pub fn query(text: &str) -> Self {
        Self {
            method: QUERY_METHOD.to_string(),
            parameters: vec![Value::from(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub result: Vec<ResultItem>,
}

/// A missing request is an empty query, which lists every workspace.
pub fn parse_request(raw: Option<&str>) -> Result<RpcRequest, String> {
    let Some(raw) = raw else {
        return Ok(RpcRequest::query(""));
    };

    serde_json::from_str(raw).map_err(|error| format!("request parse failed: {error}"))
}

pub struct PluginHost<'a, S, L> {
    pub source: &'a S,
    pub spawner: &'a mut L,
    pub logger: &'a dyn EventLogger,
    pub commands: EditorCommands,
    pub icon_path: String,
}

impl<'a, S: WorkspaceSource, L: CommandSpawner> PluginHost<'a, S, L> {
    pub fn new(
        config: &PluginConfig,
        source: &'a S,
        spawner: &'a mut L,
        logger: &'a dyn EventLogger,
    ) -> Self {
        Self {
            source,
            spawner,
            logger,
            commands: EditorCommands::from_config(config),
            icon_path: config.icon_path.clone(),
        }
    }

    /// Result-returning methods answer with `Some`; launch methods and unknown methods with `None`.
    pub fn handle(&mut self, request: &RpcRequest) -> Option<RpcResponse> {
        match request.method.as_str() {
            QUERY_METHOD => {
                let text = request
                    .parameters
                    .first()
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(RpcResponse {
                    result: self.query(text),
                })
            }
            CONTEXT_MENU_METHOD => Some(RpcResponse {
                result: self.context_menu(&request.parameters),
            }),
            OPEN_WORKSPACE_METHOD => {
                if let Some(target) = self.selection_target(&request.parameters) {
                    launch::open_workspace(
                        &target,
                        &self.commands,
                        &mut *self.spawner,
                        self.logger,
                    );
                }
                None
            }
            OPEN_IN_ZED_METHOD => {
                if let Some(target) = self.selection_target(&request.parameters) {
                    launch::open_in_zed(
                        &target,
                        &self.commands,
                        &mut *self.spawner,
                        self.logger,
                    );
                }
                None
            }
            method => {
                self.logger
                    .log(Event::new("rpc", "unknown_method").with_data("method", method));
                None
            }
        }
    }

    pub fn query(&self, raw_query: &str) -> Vec<ResultItem> {
        let query = raw_query.trim().to_lowercase();
        self.logger
            .log(Event::new("query", "started").with_data("query", query.clone()));

        let items = match discover_workspaces(self.source) {
            WorkspaceDiscovery::Ready(workspaces) => {
                present_workspaces(&workspaces, &query, &self.icon_path)
            }
            WorkspaceDiscovery::Empty => {
                vec![not_found_item(self.source.location(), &self.icon_path)]
            }
            WorkspaceDiscovery::Error(message) => {
                self.logger.log(
                    Event::new("query", "source_error").with_data("message", message.clone()),
                );
                vec![source_error_item(&message, &self.icon_path)]
            }
        };

        self.logger
            .log(Event::new("query", "completed").with_data("count", items.len()));
        items
    }

    pub fn context_menu(&self, parameters: &[Value]) -> Vec<ResultItem> {
        self.selection_target(parameters)
            .map(|target| context_menu_items(&target, &self.icon_path))
            .unwrap_or_default()
    }

    // The host wraps context data in an outer array; action replays pass it flat.
    fn selection_target(&self, parameters: &[Value]) -> Option<LaunchTarget> {
        let tuple = match parameters.first() {
            Some(Value::Array(inner)) => inner.as_slice(),
            _ => parameters,
        };
        let target = LaunchTarget::from_action_parameters(tuple);
        if target.is_none() {
            self.logger.log(
                Event::new("rpc", "invalid_request")
                    .with_data("error", "selection parameters missing path"),
            );
        }
        target
    }
}
