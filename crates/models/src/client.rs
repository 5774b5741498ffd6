use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Vendor collection path for client resources.
pub const CLIENTS_PATH: &str = "/nwrestapi/v3/global/clients";

/// Canonical location of one client resource, used for the `Location`
/// header and the record's `links` entry.
pub fn resource_url(resource_id: &str) -> String {
    format!("{CLIENTS_PATH}/{resource_id}")
}

/// Composite resource identifier: a dotted byte string plus a revision
/// sequence, as the backup vendor's API renders it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResourceId {
    pub id: String,
    pub sequence: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

/// A backup client record in vendor response shape.
///
/// Recognized fields are typed; anything else a caller sent at create or
/// patch time lives in `extra` and is serialized back verbatim. `state` and
/// `links` are absent on freshly created records until set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub hostname: String,
    pub tags: Vec<String>,
    pub scheduled_backup: bool,
    pub client_direct_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub client_id: String,
    pub resource_id: ResourceId,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Client {
    /// Fold passthrough fields into the record.
    ///
    /// Names owned by the typed portion never enter `extra` (serializing a
    /// record must not emit duplicate keys): recognized names with a value
    /// of the right shape update the typed field, identifier fields stay
    /// untouched, and everything else is stored verbatim.
    pub fn merge_extra(&mut self, extra: Map<String, Value>) {
        for (key, value) in extra {
            match key.as_str() {
                "scheduledBackup" => {
                    if let Value::Bool(b) = value {
                        self.scheduled_backup = b;
                    }
                }
                "clientDirectEnabled" => {
                    if let Value::Bool(b) = value {
                        self.client_direct_enabled = b;
                    }
                }
                "state" => {
                    if let Value::String(s) = value {
                        self.state = Some(s);
                    }
                }
                "tags" => {
                    if let Ok(tags) = serde_json::from_value(value) {
                        self.tags = tags;
                    }
                }
                // Generated or key-bearing fields are immutable.
                "hostname" | "clientId" | "resourceId" | "links" => {}
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }
}

/// Create payload. Unrecognized fields are kept in `extra` and stored
/// verbatim on the created record.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub hostname: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub scheduled_backup: bool,
    #[serde(default)]
    pub client_direct_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl NewClient {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.hostname.trim().is_empty() {
            return Err(ModelError::Validation("hostname must not be empty".into()));
        }
        Ok(())
    }
}

/// Partial update payload. Absent fields leave the stored record untouched;
/// unrecognized fields pass through into the record's `extra` map.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    pub tags: Option<Vec<String>>,
    pub scheduled_backup: Option<bool>,
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
