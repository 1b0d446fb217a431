//! Group roster: members and the public keys they publish
//!
//! Decoding is lenient per entry: a key entry with an odd `id`, an unknown
//! `type` label or a missing `key` still decodes, and the set builder decides
//! whether it is usable. Only a document that is not a member map at all fails.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::ssh::key::KeyType;

/// Top-level keys a member map may be wrapped in (scraper and helper-page output)
const WRAPPER_KEYS: [&str; 2] = ["group_members", "contributors"];

/// One published key of a member
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RosterKey {
    /// Identifier assigned by the key host
    pub id: Option<u64>,
    /// Full OpenSSH key line; empty when the entry carried none
    pub key: String,
    /// Human label of the key
    pub title: Option<String>,
    /// Type label; derived from `key` when absent or unrecognised
    #[serde(rename = "type")]
    pub key_type: Option<KeyType>,
}

impl From<Value> for RosterKey {
    fn from(entry: Value) -> Self {
        let id: Option<u64> = entry.get("id").and_then(|id| {
            id.as_u64()
                .or_else(|| id.as_str().and_then(|s| s.trim().parse().ok()))
        });
        RosterKey {
            id,
            key: entry
                .get("key")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            title: entry.get("title").and_then(Value::as_str).map(str::to_string),
            key_type: entry
                .get("type")
                .and_then(Value::as_str)
                .and_then(KeyType::from_label),
        }
    }
}

impl RosterKey {
    /// Key built from a bare key line
    pub fn from_line(key: &str) -> Self {
        RosterKey {
            id: None,
            key: key.to_string(),
            title: None,
            key_type: Some(KeyType::classify(key)),
        }
    }

    /// The labelled type, falling back to classifying the key line
    pub fn key_type(&self) -> KeyType {
        self.key_type.unwrap_or_else(|| KeyType::classify(&self.key))
    }
}

/// Keys of one member
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Member {
    /// Published keys in host order
    #[serde(rename = "publicKeys")]
    pub public_keys: Vec<RosterKey>,
}

impl From<Value> for Member {
    fn from(member: Value) -> Self {
        let public_keys: Vec<RosterKey> = match member {
            Value::Object(mut fields) => match fields.remove("publicKeys") {
                Some(Value::Array(entries)) => entries.into_iter().map(RosterKey::from).collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Member { public_keys }
    }
}

/// All members of the group, iterated in sorted member-id order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    /// Members keyed by their identifier
    pub group_members: BTreeMap<String, Member>,
}

impl Roster {
    /// Decode `{"group_members": {..}}`, `{"contributors": {..}}` or the bare member map
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        let members: Value = match document {
            Value::Object(mut fields) => {
                match WRAPPER_KEYS.iter().find(|wrapper| fields.contains_key(**wrapper)) {
                    Some(wrapper) => fields.remove(*wrapper).unwrap_or_default(),
                    None => Value::Object(fields),
                }
            }
            other => other,
        };
        let group_members: BTreeMap<String, Member> = serde_json::from_value(members)?;
        Ok(Roster { group_members })
    }

    /// Add a key line for `member`
    pub fn push_key(&mut self, member: &str, key_line: &str) {
        self.group_members
            .entry(member.to_string())
            .or_default()
            .public_keys
            .push(RosterKey::from_line(key_line));
    }

    /// Member identifiers in canonical order
    pub fn member_ids(&self) -> Vec<&str> {
        self.group_members.keys().map(String::as_str).collect()
    }

    /// `(member id, key index within member, key)` for every key of `key_type`, in canonical order
    pub fn keys_of_type(&self, key_type: KeyType) -> Vec<(&str, usize, &RosterKey)> {
        self.group_members
            .iter()
            .flat_map(|(member, info)| {
                info.public_keys
                    .iter()
                    .enumerate()
                    .filter(move |(_, key)| key.key_type() == key_type)
                    .map(move |(index, key)| (member.as_str(), index, key))
            })
            .collect()
    }
}
