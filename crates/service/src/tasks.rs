use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use models::task::{Task, TaskUpdate};

use crate::errors::ServiceError;
use crate::query::{parse_query, record_matches};
use crate::storage::mem_table::MemTable;

/// In-memory task table keyed by `sys_id`.
///
/// Tasks are seeded at store construction and never created through the
/// API. `sys_id` is immutable; `work_notes` is append-only.
#[derive(Clone)]
pub struct TaskStore {
    table: Arc<MemTable<Task>>,
}

fn seed_task(
    number: &str,
    sys_id: &str,
    state: &str,
    assigned_to: &str,
    assignment_group: &str,
    host: &str,
    backup_server: &str,
    backup_tag: &str,
    client_id: &str,
) -> Task {
    Task {
        number: number.into(),
        sys_id: sys_id.into(),
        state: state.into(),
        assigned_to: assigned_to.into(),
        assignment_group: assignment_group.into(),
        work_notes: String::new(),
        short_description: format!("Provision New Backup: {host}"),
        u_backup_server: backup_server.into(),
        u_backup_tag: backup_tag.into(),
        ci_fqdn: host.into(),
        client_id_from_networker: client_id.into(),
        close_notes: None,
    }
}

impl TaskStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { table: MemTable::new() })
    }

    /// Store pre-populated with the standing ticket set of the test bed,
    /// including the edge-case task whose backup server does not resolve.
    pub fn with_seed_data() -> Arc<Self> {
        let seeds = [
            seed_task(
                "SCTASK001000",
                "ffffffffffffffffffffffffffffffff",
                "new",
                "",
                "backup team",
                "badhost.f3.lan",
                "networker-prod-1.f3.lan",
                "mssql",
                "",
            ),
            seed_task(
                "SCTASK001001",
                "a1a2a3a4b5b6c7d8e9f0a1b2c3d4e5f6",
                "new",
                "",
                "backup team",
                "db01.f3.lan",
                "networker-prod.f3.lan",
                "mssql",
                "d5b545cb000000045bc834515bc83450",
            ),
            seed_task(
                "SCTASK001002",
                "c1c2c3c4d5d6e7f8a9b0c1d2e3f4a5b6",
                "new",
                "",
                "storage team",
                "web03.f3.lan",
                "networker-prod.f3.lan",
                "filesystem-win",
                "a1b2c3d4000000045bc834515bc83450",
            ),
            seed_task(
                "SCTASK001003",
                "e1e2e3e4f5f6a7b8c9d0e1f2a3b4c5d6",
                "work in progress",
                "Some Guy",
                "backup team",
                "syb-prod01.f3.lan",
                "networker-prod.f3.lan",
                "sybase",
                "b2c3d4e5000000045bc834515bc83450",
            ),
            seed_task(
                "SCTASK001004",
                "g1g2g3g4h5h6i7j8k9l0a1b2c3d4e5f6",
                "new",
                "",
                "backup team",
                "app-lnx01.f3.lan",
                "networker-prod.f3.lan",
                "filesystem-unix",
                "c3d4e5f6000000045bc834515bc83450",
            ),
        ];
        let table = MemTable::with_entries(seeds.into_iter().map(|t| (t.sys_id.clone(), t)));
        Arc::new(Self { table })
    }

    /// All tasks in insertion order, filtered by the `^`-joined condition
    /// grammar when a non-empty query is given.
    pub async fn list(&self, query: Option<&str>) -> Vec<Task> {
        let tasks = self.table.values().await;
        match query {
            Some(q) if !q.is_empty() => {
                let conditions = parse_query(q);
                tasks
                    .into_iter()
                    .filter(|task| {
                        let record = serde_json::to_value(task).expect("task serializes");
                        record_matches(&record, &conditions)
                    })
                    .collect()
            }
            _ => tasks,
        }
    }

    pub async fn get(&self, sys_id: &str) -> Result<Task, ServiceError> {
        self.table
            .get(sys_id)
            .await
            .ok_or_else(|| ServiceError::not_found("Task"))
    }

    /// Partial update. `work_notes` is append-only: new text is concatenated
    /// after the prior content with a line break and the result is trimmed.
    /// Other present fields are overwritten verbatim.
    pub async fn update(&self, sys_id: &str, payload: TaskUpdate) -> Result<Task, ServiceError> {
        let mut updated: Option<Task> = None;
        self.table
            .update_map(|map| {
                let task = map
                    .get_mut(sys_id)
                    .ok_or_else(|| ServiceError::not_found("Task"))?;
                if let Some(notes) = payload.work_notes {
                    task.work_notes =
                        format!("{}\n{}", task.work_notes, notes).trim().to_string();
                }
                if let Some(assigned_to) = payload.assigned_to {
                    task.assigned_to = assigned_to;
                }
                if let Some(state) = payload.state {
                    task.state = state;
                }
                if let Some(close_notes) = payload.close_notes {
                    task.close_notes = Some(close_notes);
                }
                updated = Some(task.clone());
                Ok(())
            })
            .await?;

        let task = updated.expect("updated set");
        info!(sys_id = %sys_id, state = %task.state, "updated task");
        Ok(task)
    }

    /// Full store contents keyed by `sys_id`, for test introspection. Does
    /// not mutate state.
    pub async fn dump(&self) -> IndexMap<String, Task> {
        self.table.dump().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn list_without_query_returns_seed_order() {
        let store = TaskStore::with_seed_data();
        let numbers: Vec<String> =
            store.list(None).await.into_iter().map(|t| t.number).collect();
        assert_eq!(
            numbers,
            vec![
                "SCTASK001000",
                "SCTASK001001",
                "SCTASK001002",
                "SCTASK001003",
                "SCTASK001004"
            ]
        );
    }

    #[tokio::test]
    async fn filter_pins_down_single_seeded_task() {
        let store = TaskStore::with_seed_data();
        let hits = store
            .list(Some("ci_fqdn=db01.f3.lan^u_backup_tag=mssql"))
            .await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sys_id, "a1a2a3a4b5b6c7d8e9f0a1b2c3d4e5f6");
    }

    #[tokio::test]
    async fn isempty_filter_is_idempotent_and_order_stable() {
        let store = TaskStore::with_seed_data();
        let first = store.list(Some("ISEMPTYassigned_to")).await;
        let second = store.list(Some("ISEMPTYassigned_to")).await;
        assert_eq!(first, second);
        // The one in-progress task has an assignee and drops out.
        assert_eq!(first.len(), 4);
        assert!(first.iter().all(|t| t.assigned_to.trim().is_empty()));
    }

    #[tokio::test]
    async fn empty_query_string_returns_everything() {
        let store = TaskStore::with_seed_data();
        assert_eq!(store.list(Some("")).await.len(), 5);
    }

    #[tokio::test]
    async fn work_notes_append_and_trim() -> Result<(), ServiceError> {
        let store = TaskStore::with_seed_data();
        let sys_id = "a1a2a3a4b5b6c7d8e9f0a1b2c3d4e5f6";

        let upd: TaskUpdate = serde_json::from_value(json!({ "work_notes": "a" })).unwrap();
        let task = store.update(sys_id, upd).await?;
        assert_eq!(task.work_notes, "a");

        let upd: TaskUpdate = serde_json::from_value(json!({ "work_notes": "b" })).unwrap();
        let task = store.update(sys_id, upd).await?;
        assert_eq!(task.work_notes, "a\nb");
        Ok(())
    }

    #[tokio::test]
    async fn update_leaves_absent_fields_alone() -> Result<(), ServiceError> {
        let store = TaskStore::with_seed_data();
        let sys_id = "e1e2e3e4f5f6a7b8c9d0e1f2a3b4c5d6";
        let before = store.get(sys_id).await?;

        let upd: TaskUpdate =
            serde_json::from_value(json!({ "state": "closed complete" })).unwrap();
        let after = store.update(sys_id, upd).await?;

        assert_eq!(after.state, "closed complete");
        assert_eq!(after.assigned_to, before.assigned_to);
        assert_eq!(after.assignment_group, before.assignment_group);
        assert_eq!(after.short_description, before.short_description);
        Ok(())
    }

    #[tokio::test]
    async fn get_and_update_unknown_sys_id_are_not_found() {
        let store = TaskStore::with_seed_data();
        assert!(matches!(
            store.get("0000").await,
            Err(ServiceError::NotFound(_))
        ));
        let res = store.update("0000", TaskUpdate::default()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }
}
