use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, instrument};

use crate::config::InventoryConfig;
use crate::inventory::metadata::{json_type_name, MetadataClient, MetadataDocument};
use crate::Error;

pub mod format;
pub mod metadata;

pub use format::json_format_dict;

/// Inventory groups which can be populated from instance metadata.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupName {
    AppServers,
    BackendServers,
}

impl GroupName {
    pub const ALL: [GroupName; 2] = [GroupName::AppServers, GroupName::BackendServers];

    /// Key of the group in the instance `meta` mapping and in the inventory output
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupName::AppServers => "app_servers",
            GroupName::BackendServers => "backend_servers",
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type GroupMembership = Vec<String>;
pub type InventoryResult = BTreeMap<GroupName, GroupMembership>;
pub type HostVars = BTreeMap<String, Value>;

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Decode the JSON encoded member list stored in a `meta` value.
/// Returns `None` for values that mark the group as unset.
fn decode_group(group: GroupName, value: &Value) -> Result<Option<GroupMembership>, Error> {
    if !is_truthy(value) {
        return Ok(None);
    }

    let malformed = |reason: String| Error::MalformedGroupEncoding { group, reason };

    let encoded = value.as_str().ok_or_else(|| {
        malformed(format!(
            "expected a JSON encoded string, got {}",
            json_type_name(value)
        ))
    })?;

    let decoded: Value = serde_json::from_str(encoded)
        .map_err(|e| malformed(format!("value is not valid JSON: {e}")))?;

    let items = decoded.as_array().ok_or_else(|| {
        malformed(format!(
            "expected a list of hosts, got {}",
            json_type_name(&decoded)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str().map(str::to_owned).ok_or_else(|| {
                malformed(format!(
                    "member {i} should be a string, got {}",
                    json_type_name(item)
                ))
            })
        })
        .collect::<Result<GroupMembership, Error>>()
        .map(Some)
}

/// Build the group mapping from an already fetched metadata document.
pub fn groups_from_metadata(document: &MetadataDocument) -> Result<InventoryResult, Error> {
    let meta = document.meta();
    let mut groups = InventoryResult::new();

    for group in GroupName::ALL {
        match meta.get(group.as_str()) {
            Some(value) => {
                if let Some(members) = decode_group(group, value)? {
                    debug!("inventory: {} has {} members", group, members.len());
                    groups.insert(group, members);
                } else {
                    debug!("inventory: {} is empty, skipping", group);
                }
            }
            None => debug!("inventory: {} not present in metadata", group),
        }
    }

    Ok(groups)
}

/// Fetch instance metadata and render the inventory groups.
#[instrument(skip(config), fields(url = %config.metadata_url))]
pub async fn list_groups(config: &InventoryConfig) -> Result<String, Error> {
    let client = MetadataClient::new(config)?;
    let document = client.fetch().await?;
    let groups = groups_from_metadata(&document)?;
    info!("inventory: resolved {} groups", groups.len());
    json_format_dict(&groups)
}

/// Render host variables. No per-host variables are published, so this is always empty.
#[instrument]
pub fn get_host(hostname: &str) -> Result<String, Error> {
    let hostvars = HostVars::new();
    json_format_dict(&hostvars)
}
