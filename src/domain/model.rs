use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Metadata JSON object as Zenodo stores it under `"metadata"`.
pub type MetadataMap = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: None,
            orcid: None,
            email: None,
        }
    }

    /// Last whitespace-separated token of the name.
    pub fn surname(&self) -> Option<&str> {
        self.name.split_whitespace().last()
    }
}

/// Fixed facts about a known author, keyed by surname, applied after
/// extraction regardless of what the source text says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorOverride {
    pub surname: String,
    #[serde(default)]
    pub orcid: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    /// Keep only the part of the affiliation before a standalone "and".
    #[serde(default)]
    pub split_affiliation_on_and: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedIdentifier {
    pub identifier: String,
    pub relation: String,
    pub resource_type: String,
    pub scheme: String,
}

/// Fields pulled from a LaTeX title page. Missing sections stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePage {
    pub title: String,
    pub abstract_text: String,
    pub authors: Vec<Author>,
    pub keywords: Vec<String>,
    pub classification_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    pub abstract_text: String,
    pub description: String,
    pub authors: Vec<Author>,
    pub keywords: BTreeSet<String>,
    pub classification_codes: BTreeSet<String>,
    pub related_identifiers: Vec<RelatedIdentifier>,
    pub version: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub resource_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositionState {
    Draft,
    Published,
}

/// Snapshot of a Zenodo record or deposition. Only the fields the workflows
/// read are typed; everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub metadata: MetadataMap,
    #[serde(flatten)]
    pub extra: MetadataMap,
}

impl RemoteRecord {
    /// Zenodo returns numeric ids; string ids are accepted as-is.
    pub fn record_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn deposition_state(&self) -> DepositionState {
        match self.state.as_deref() {
            Some("done") => DepositionState::Published,
            _ => DepositionState::Draft,
        }
    }

    pub fn community_ids(&self) -> Vec<String> {
        self.metadata
            .get("communities")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|c| c.get("identifier").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_community(&self, community_id: &str) -> bool {
        self.community_ids().iter().any(|id| id == community_id)
    }
}
