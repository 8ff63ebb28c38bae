use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::{WorkspaceRecord, WorkspaceRow};
use crate::infrastructure::zed_db::WorkspaceSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceDiscovery {
    Ready(Vec<WorkspaceRecord>),
    Empty,
    Error(String),
}

/// Reads the whole history and rebuilds the canonical list from scratch on every call.
pub fn discover_workspaces(source: &impl WorkspaceSource) -> WorkspaceDiscovery {
    match source.load_rows() {
        Ok(rows) => {
            let workspaces = resolve_workspaces(rows);
            if workspaces.is_empty() {
                WorkspaceDiscovery::Empty
            } else {
                WorkspaceDiscovery::Ready(workspaces)
            }
        }
        Err(error) => WorkspaceDiscovery::Error(error.message()),
    }
}

pub fn resolve_workspaces(rows: impl IntoIterator<Item = WorkspaceRow>) -> Vec<WorkspaceRecord> {
    let records = rows.into_iter().filter_map(WorkspaceRecord::from_row);
    let mut workspaces = dedupe_workspaces(records);
    sort_for_display(&mut workspaces);
    workspaces
}

/// One record per normalized key, or per raw id when no record has a usable key.
pub fn dedupe_workspaces(
    records: impl IntoIterator<Item = WorkspaceRecord>,
) -> Vec<WorkspaceRecord> {
    let mut by_key = ShortestPathGroups::new();
    let mut by_id = ShortestPathGroups::new();

    for record in records {
        if !record.normalized_key.is_empty() {
            by_key.offer(record.normalized_key.clone(), record.clone());
        }
        by_id.offer(record.id, record);
    }

    if by_key.is_empty() {
        by_id.into_records()
    } else {
        by_key.into_records()
    }
}

pub fn sort_for_display(workspaces: &mut [WorkspaceRecord]) {
    workspaces.sort_by_cached_key(WorkspaceRecord::sort_key);
}

struct ShortestPathGroups<K> {
    slots: HashMap<K, usize>,
    records: Vec<WorkspaceRecord>,
}

impl<K: Eq + Hash> ShortestPathGroups<K> {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            records: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Ties keep the record seen first.
    fn offer(&mut self, key: K, record: WorkspaceRecord) {
        match self.slots.get(&key) {
            Some(&slot) => {
                if path_length(&record) < path_length(&self.records[slot]) {
                    self.records[slot] = record;
                }
            }
            None => {
                self.slots.insert(key, self.records.len());
                self.records.push(record);
            }
        }
    }

    fn into_records(self) -> Vec<WorkspaceRecord> {
        self.records
    }
}

fn path_length(record: &WorkspaceRecord) -> usize {
    record.path.chars().count()
}
