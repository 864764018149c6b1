//! Clause-type id ↔ name mapping.
//!
//! Datasets exported from the document store label clauses with opaque ids.
//! The mapping file is a JSON array of `{ "_id": ..., "name": ... }` where
//! `_id` is either a plain string or an object id `{ "$oid": "..." }`.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::ObjectId { oid } => oid,
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "_id")]
    id: Option<RawId>,
    #[serde(default)]
    name: String,
}

/// Bidirectional lookup between clause-type ids and names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMapping {
    id_to_name: IndexMap<String, String>,
    name_to_id: HashMap<String, String>,
}

impl LabelMapping {
    /// Parse a mapping document. Entries without an id or a name are skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<RawEntry> = serde_json::from_str(json)?;
        let mut mapping = Self::default();
        for entry in entries {
            let id = entry.id.map(RawId::into_string).unwrap_or_default();
            if !id.is_empty() && !entry.name.is_empty() {
                mapping.insert(id, entry.name);
            }
        }
        Ok(mapping)
    }

    /// Read a mapping file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = name.into();
        self.name_to_id.insert(normalize_name(&name), id.clone());
        self.id_to_name.insert(id, name);
    }

    /// Name for an id.
    pub fn get_name(&self, id: &str) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    /// Id for a name, matched after normalization.
    pub fn get_id(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(&normalize_name(name)).map(String::as_str)
    }

    /// Map ids to names; unknown ids are kept as they are.
    pub fn map_label(&self, label: &str) -> String {
        self.get_name(label).unwrap_or(label).to_string()
    }

    /// Map a list of ids to names.
    pub fn map_labels<S: AsRef<str>>(&self, labels: &[S]) -> Vec<String> {
        labels.iter().map(|l| self.map_label(l.as_ref())).collect()
    }

    /// Whether `id` is a known id.
    pub fn contains(&self, id: &str) -> bool {
        self.id_to_name.contains_key(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }

    /// All names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.id_to_name.values().map(String::as_str).collect()
    }

    /// All ids in file order.
    pub fn ids(&self) -> Vec<&str> {
        self.id_to_name.keys().map(String::as_str).collect()
    }

    /// All `id → name` entries in file order.
    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.id_to_name
    }
}

/// Lowercase, trim, and turn spaces and dashes into underscores.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().trim().replace([' ', '-'], "_")
}
