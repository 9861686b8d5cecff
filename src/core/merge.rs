//! Combining freshly assembled metadata with a remote snapshot.
//!
//! Caller-owned fields are overwritten, list fields are unioned, and every
//! field not named here is carried over from the remote record untouched.

use crate::domain::model::{Author, MetadataMap, MetadataRecord, RelatedIdentifier};
use serde_json::{json, Value};
use std::collections::BTreeSet;

pub fn merge_metadata(current: &MetadataMap, fresh: &MetadataRecord) -> MetadataMap {
    let mut merged = current.clone();

    merged.insert("title".to_string(), Value::String(fresh.title.clone()));
    merged.insert(
        "description".to_string(),
        Value::String(fresh.description.clone()),
    );
    merged.insert(
        "creators".to_string(),
        Value::Array(fresh.authors.iter().map(creator).collect()),
    );
    merged.insert(
        "keywords".to_string(),
        Value::Array(
            merge_keywords(current.get("keywords"), &fresh.keywords)
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
    );
    merged.insert(
        "related_identifiers".to_string(),
        Value::Array(merge_related_identifiers(
            current.get("related_identifiers"),
            &fresh.related_identifiers,
        )),
    );

    if let Some(version) = &fresh.version {
        merged.insert("version".to_string(), Value::String(version.clone()));
    }

    if let Some(date) = fresh.publication_date {
        if !has_publication_date(current) {
            merged.insert(
                "publication_date".to_string(),
                Value::String(date.format("%Y-%m-%d").to_string()),
            );
        }
    }

    merged.insert(
        "resource_type".to_string(),
        Value::String(fresh.resource_type.clone()),
    );

    merged
}

/// Sorted union of the remote keywords and the new ones.
pub fn merge_keywords(existing: Option<&Value>, fresh: &BTreeSet<String>) -> Vec<String> {
    let mut keywords: BTreeSet<String> = existing
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    keywords.extend(fresh.iter().cloned());
    keywords.into_iter().collect()
}

/// Keyed by identifier: the first new entry for an identifier replaces the
/// remote one in place, further relations for it follow directly after.
/// Remote-only entries stay, unseen identifiers are appended.
pub fn merge_related_identifiers(existing: Option<&Value>, fresh: &[RelatedIdentifier]) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::new();

    for entry in existing.and_then(Value::as_array).into_iter().flatten() {
        let key = entry.get("identifier").cloned().unwrap_or(Value::Null);
        match merged.iter_mut().find(|e| e.get("identifier") == Some(&key)) {
            Some(slot) => *slot = entry.clone(),
            None => merged.push(entry.clone()),
        }
    }

    let mut claimed: Vec<&str> = Vec::new();
    for related in fresh {
        let entry = json!({
            "identifier": related.identifier,
            "relation": related.relation,
            "resource_type": related.resource_type,
            "scheme": related.scheme,
        });
        let id = related.identifier.as_str();
        let same_id = |e: &Value| e.get("identifier").and_then(Value::as_str) == Some(id);

        if claimed.contains(&id) {
            let same_relation = merged.iter().position(|e| {
                same_id(e) && e.get("relation").and_then(Value::as_str) == Some(related.relation.as_str())
            });
            match same_relation {
                Some(i) => merged[i] = entry,
                None => {
                    let after = merged
                        .iter()
                        .rposition(|e| same_id(e))
                        .map_or(merged.len(), |i| i + 1);
                    merged.insert(after, entry);
                }
            }
        } else {
            claimed.push(id);
            match merged.iter().position(|e| same_id(e)) {
                Some(i) => merged[i] = entry,
                None => merged.push(entry),
            }
        }
    }

    merged
}

/// Appends `{"identifier": id}` for every community not already present.
pub fn add_communities(current: &MetadataMap, community_ids: &[&str]) -> MetadataMap {
    let mut merged = current.clone();
    let mut communities: Vec<Value> = current
        .get("communities")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    for id in community_ids {
        let present = communities
            .iter()
            .any(|c| c.get("identifier").and_then(Value::as_str) == Some(*id));
        if !present {
            communities.push(json!({ "identifier": id }));
        }
    }

    merged.insert("communities".to_string(), Value::Array(communities));
    merged
}

fn has_publication_date(metadata: &MetadataMap) -> bool {
    match metadata.get("publication_date") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

fn creator(author: &Author) -> Value {
    let mut entry = json!({
        "name": author.name,
        "affiliation": author.affiliation,
    });
    if let Some(orcid) = &author.orcid {
        entry["orcid"] = Value::String(orcid.clone());
    }
    entry
}
