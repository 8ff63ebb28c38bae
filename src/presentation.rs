use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{WorkspaceRecord, display_name};
use crate::launch::LaunchTarget;

pub const OPEN_WORKSPACE_METHOD: &str = "open_workspace";
pub const OPEN_IN_ZED_METHOD: &str = "open_in_zed";
pub const NOT_FOUND_TITLE: &str = "No Zed workspaces found";
pub const SOURCE_ERROR_TITLE: &str = "Error reading Zed workspaces";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcAction {
    pub method: String,
    pub parameters: Vec<Value>,
}

/// One row of the host's result list. Field names follow the host's JSON casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SubTitle")]
    pub subtitle: String,
    #[serde(rename = "IcoPath")]
    pub icon_path: String,
    #[serde(
        rename = "JsonRPCAction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<RpcAction>,
    #[serde(rename = "ContextData", default, skip_serializing_if = "Option::is_none")]
    pub context_data: Option<Vec<Value>>,
}

impl ResultItem {
    fn informational(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        icon_path: &str,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon_path: icon_path.to_string(),
            action: None,
            context_data: None,
        }
    }
}

pub fn workspace_title(record: &WorkspaceRecord) -> String {
    let name = display_name(&record.path);
    match record.connection.title_suffix() {
        Some(suffix) => format!("{name}{suffix}"),
        None => name,
    }
}

/// Case-insensitive substring match on the raw path. An empty query keeps everything.
pub fn filter_workspaces<'a>(
    records: &'a [WorkspaceRecord],
    query: &str,
) -> Vec<&'a WorkspaceRecord> {
    if query.is_empty() {
        return records.iter().collect();
    }

    let query = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.path.to_lowercase().contains(&query))
        .collect()
}

pub fn workspace_item(record: &WorkspaceRecord, icon_path: &str) -> ResultItem {
    let parameters = LaunchTarget::from_record(record).action_parameters();
    ResultItem {
        title: workspace_title(record),
        subtitle: record.path.clone(),
        icon_path: icon_path.to_string(),
        action: Some(RpcAction {
            method: OPEN_WORKSPACE_METHOD.to_string(),
            parameters: parameters.clone(),
        }),
        context_data: Some(parameters),
    }
}

pub fn present_workspaces(
    records: &[WorkspaceRecord],
    query: &str,
    icon_path: &str,
) -> Vec<ResultItem> {
    let items = filter_workspaces(records, query)
        .into_iter()
        .map(|record| workspace_item(record, icon_path))
        .collect();
    dedupe_items(items)
}

/// Drops items whose trimmed, lower-cased (title, subtitle) pair was already emitted.
pub fn dedupe_items(items: Vec<ResultItem>) -> Vec<ResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            seen.insert((
                item.title.trim().to_lowercase(),
                item.subtitle.trim().to_lowercase(),
            ))
        })
        .collect()
}

pub fn not_found_item(database_path: &Path, icon_path: &str) -> ResultItem {
    ResultItem::informational(NOT_FOUND_TITLE, database_path.display().to_string(), icon_path)
}

pub fn source_error_item(message: &str, icon_path: &str) -> ResultItem {
    ResultItem::informational(SOURCE_ERROR_TITLE, format!("<{message}>"), icon_path)
}

pub fn context_menu_items(target: &LaunchTarget, icon_path: &str) -> Vec<ResultItem> {
    vec![ResultItem {
        title: format!("Open in Zed ({})", target.connection.label()),
        subtitle: target.path.clone(),
        icon_path: icon_path.to_string(),
        action: Some(RpcAction {
            method: OPEN_IN_ZED_METHOD.to_string(),
            parameters: target.action_parameters(),
        }),
        context_data: None,
    }]
}
