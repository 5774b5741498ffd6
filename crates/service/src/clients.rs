use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Map;
use tracing::info;
use uuid::Uuid;

use models::client::{resource_url, Client, ClientUpdate, Link, NewClient, ResourceId};

use crate::errors::ServiceError;
use crate::storage::mem_table::MemTable;

/// In-memory client table keyed by lowercased hostname.
///
/// Hostname lookups and inserts are case-insensitive. `resourceId.id` is
/// assigned at create time and never changes afterwards.
#[derive(Clone)]
pub struct ClientStore {
    table: Arc<MemTable<Client>>,
}

impl ClientStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { table: MemTable::new() })
    }

    /// Store pre-populated with the two standing clients of the test bed.
    pub fn with_seed_data() -> Arc<Self> {
        let seeds = [
            Client {
                hostname: "dc01.f3.lan".into(),
                tags: vec!["filesystem-win".into()],
                scheduled_backup: true,
                client_direct_enabled: true,
                state: Some("active".into()),
                client_id: "a8f8e1d2-c3b4-a596-a7b8-c9d0e1f2a3b4".into(),
                resource_id: ResourceId {
                    id: "161.0.120.52.0.0.0.0.210.51.200.91.10.207.81.176".into(),
                    sequence: 1,
                },
                links: Vec::new(),
                extra: Map::new(),
            },
            Client {
                hostname: "sql-prod01.f3.lan".into(),
                tags: vec!["mssql".into()],
                scheduled_backup: true,
                client_direct_enabled: true,
                state: Some("active".into()),
                client_id: "b9e7d6c5-b4a3-9876-5432-10fedcba9876".into(),
                resource_id: ResourceId {
                    id: "162.0.120.52.0.0.0.0.210.51.200.91.10.207.81.177".into(),
                    sequence: 1,
                },
                links: Vec::new(),
                extra: Map::new(),
            },
        ];
        let table =
            MemTable::with_entries(seeds.into_iter().map(|c| (c.hostname.clone(), c)));
        Arc::new(Self { table })
    }

    /// All clients in insertion order, or the zero-or-one exact hostname
    /// match (case-insensitive) when a non-empty filter is given.
    pub async fn find(&self, hostname: Option<&str>) -> Vec<Client> {
        match hostname {
            Some(h) if !h.is_empty() => {
                self.table.get(&h.to_lowercase()).await.into_iter().collect()
            }
            _ => self.table.values().await,
        }
    }

    /// Create a client with generated identifiers.
    ///
    /// One random UUID yields both identifiers: its 32-char lowercase hex
    /// form becomes `clientId`, its 16 raw bytes joined with `.` become
    /// `resourceId.id` (sequence fixed at 1). Fails with Conflict when the
    /// lowercased hostname is already taken; the existing record is left
    /// untouched.
    pub async fn create(&self, payload: NewClient) -> Result<Client, ServiceError> {
        payload.validate()?;
        let key = payload.hostname.to_lowercase();

        let raw = Uuid::new_v4();
        let client_id = raw.simple().to_string();
        let resource_id = raw
            .as_bytes()
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(".");

        let mut record = Client {
            hostname: key.clone(),
            tags: payload.tags,
            scheduled_backup: payload.scheduled_backup,
            client_direct_enabled: payload.client_direct_enabled,
            state: None,
            client_id,
            resource_id: ResourceId { id: resource_id.clone(), sequence: 1 },
            links: vec![Link { href: resource_url(&resource_id), rel: "item".into() }],
            extra: Map::new(),
        };
        record.merge_extra(payload.extra);

        self.table
            .update_map(|map| {
                if map.contains_key(&key) {
                    return Err(ServiceError::Conflict(
                        "Client with that hostname already exists".into(),
                    ));
                }
                map.insert(key.clone(), record.clone());
                Ok(())
            })
            .await?;

        info!(hostname = %record.hostname, client_id = %record.client_id, "created client");
        Ok(record)
    }

    /// Partial update addressed by `resourceId.id`. Only fields present in
    /// the payload are applied; passthrough fields merge into the record's
    /// extras.
    pub async fn update(
        &self,
        resource_id: &str,
        payload: ClientUpdate,
    ) -> Result<Client, ServiceError> {
        let mut updated: Option<Client> = None;
        self.table
            .update_map(|map| {
                let record = map
                    .values_mut()
                    .find(|c| c.resource_id.id == resource_id)
                    .ok_or_else(|| ServiceError::not_found("Client"))?;
                if let Some(tags) = payload.tags {
                    record.tags = tags;
                }
                if let Some(scheduled) = payload.scheduled_backup {
                    record.scheduled_backup = scheduled;
                }
                if let Some(state) = payload.state {
                    record.state = Some(state);
                }
                record.merge_extra(payload.extra);
                updated = Some(record.clone());
                Ok(())
            })
            .await?;

        let record = updated.expect("updated set");
        info!(hostname = %record.hostname, resource_id = %resource_id, "patched client");
        Ok(record)
    }

    /// Full store contents keyed by lowercased hostname, for test
    /// introspection. Does not mutate state.
    pub async fn dump(&self) -> IndexMap<String, Client> {
        self.table.dump().await
    }
}
