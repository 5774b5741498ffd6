use serde::{Deserialize, Serialize};

/// A service-catalog task record in vendor response shape. Field order
/// follows the vendor's rendering; `close_notes` only appears once set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub number: String,
    pub sys_id: String,
    pub state: String,
    pub assigned_to: String,
    pub assignment_group: String,
    pub work_notes: String,
    pub short_description: String,
    pub u_backup_server: String,
    pub u_backup_tag: String,
    pub ci_fqdn: String,
    pub client_id_from_networker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_notes: Option<String>,
}

/// Partial update for a task. The ticketing emulation recognizes exactly
/// these fields; anything else in the inbound payload is dropped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub assigned_to: Option<String>,
    pub work_notes: Option<String>,
    pub state: Option<String>,
    pub close_notes: Option<String>,
}
