//! JSON documents of the etcd v2 keys API.
//!
//! ```text
//! GET <base>?recursive=true
//!   {"action":"get","node":{"dir":true,"key":"/foo","nodes":[...]}}
//! GET <base>?wait=true&recursive=true&waitIndex=<n>
//!   {"action":"set","node":{"key":"/foo/a","value":"1","modifiedIndex":7}}
//!   {"errorCode":401,"message":"The event in requested index is outdated and cleared","index":2009}
//! ```

use serde::{Deserialize, Serialize};

/// etcd error code for a key (or namespace) that does not exist.
pub const KEY_NOT_FOUND: u64 = 100;

/// A key or directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub dir: bool,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub modified_index: u64,
}

impl Node {
    /// Visit every leaf (non-directory node with a key) depth-first.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        if self.dir {
            for child in &self.nodes {
                child.for_each_leaf(visit);
            }
        } else if self.key.is_some() {
            visit(self);
        }
    }

    /// Highest `modifiedIndex` among the leaves; `None` if there are none.
    pub fn max_leaf_index(&self) -> Option<u64> {
        let mut max = None;
        self.for_each_leaf(&mut |leaf| {
            max = Some(max.map_or(leaf.modified_index, |m: u64| m.max(leaf.modified_index)));
        });
        max
    }
}

/// A successful listing or change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub action: String,
    pub node: Node,
}

/// An error document returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error_code: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub index: u64,
}

/// Either document shape; distinguished by which fields are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreResponse {
    Error(ApiError),
    Change(ChangeEvent),
}
