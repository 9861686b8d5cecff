use crate::core::description::{build_description, Boilerplate};
use crate::domain::model::{MetadataRecord, RelatedIdentifier, TitlePage};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref REPOSITORY_VERSION: Regex =
        Regex::new(r"(?:\*\*)?Repository Version(?:\*\*)?:\s*(\S+)").unwrap();
}

pub const RESOURCE_TYPE: &str = "dataset";

/// Everything the assembled record needs besides the title page.
#[derive(Debug, Clone)]
pub struct AssemblyInputs<'a> {
    pub readme: Option<&'a str>,
    pub repository_url: &'a str,
    pub boilerplate: &'a Boilerplate,
    pub today: NaiveDate,
}

pub fn assemble(page: TitlePage, inputs: &AssemblyInputs<'_>) -> MetadataRecord {
    let description = build_description(&page.title, &page.abstract_text, inputs.boilerplate);

    let mut keywords: BTreeSet<String> = page.keywords.into_iter().collect();
    keywords.extend(
        page.classification_codes
            .iter()
            .map(|code| format!("JEL: {}", code)),
    );

    MetadataRecord {
        title: page.title,
        abstract_text: page.abstract_text,
        description,
        authors: page.authors,
        keywords,
        classification_codes: page.classification_codes.into_iter().collect(),
        related_identifiers: repository_links(inputs.repository_url),
        version: inputs.readme.and_then(extract_version),
        publication_date: Some(inputs.today),
        resource_type: RESOURCE_TYPE.to_string(),
    }
}

/// The companion software repository, linked both as supplement and mirror.
pub fn repository_links(repository_url: &str) -> Vec<RelatedIdentifier> {
    ["isSupplementTo", "isIdenticalTo"]
        .into_iter()
        .map(|relation| RelatedIdentifier {
            identifier: repository_url.to_string(),
            relation: relation.to_string(),
            resource_type: "software".to_string(),
            scheme: "url".to_string(),
        })
        .collect()
}

/// `Repository Version: <token>`, also in Markdown bold form.
pub fn extract_version(readme: &str) -> Option<String> {
    REPOSITORY_VERSION
        .captures(readme)
        .map(|caps| caps[1].to_string())
}
