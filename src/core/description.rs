use serde::{Deserialize, Serialize};

/// Fixed text surrounding the extracted title and abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boilerplate {
    pub journal: String,
    pub paper_source: String,
    pub included: Vec<String>,
    pub reproduction_time: String,
    pub citation_doi: String,
    pub license: String,
}

impl Default for Boilerplate {
    fn default() -> Self {
        Self {
            journal: "Quantitative Economics".to_string(),
            paper_source: "HAFiscal.tex".to_string(),
            included: vec![
                "All code for computational results (Python, HARK framework)".to_string(),
                "Data files and download scripts".to_string(),
                "Complete reproduction workflow".to_string(),
                "Computational environment specifications".to_string(),
            ],
            reproduction_time: "4-5 days (full replication), ~1 hour (minimal verification)"
                .to_string(),
            citation_doi: "10.5281/zenodo.17861977".to_string(),
            license: "Apache License 2.0 - See LICENSE file in repository".to_string(),
        }
    }
}

/// Renders the HTML description shown on the record page.
pub fn build_description(title: &str, abstract_text: &str, boilerplate: &Boilerplate) -> String {
    let mut included = format!(
        "<li>LaTeX source for the paper ({})</li>\n",
        boilerplate.paper_source
    );
    for item in &boilerplate.included {
        included.push_str(&format!("<li>{}</li>\n", item));
    }

    format!(
        r#"<h1>{title}</h1>

<h2>Abstract</h2>
<p>{abstract_text}</p>

<h2>Replication Package</h2>
<p>This repository contains the complete replication package for "{title}", submitted to <strong>{journal}</strong>.</p>

<h2>What's Included</h2>
<ul>
{included}</ul>

<h2>Reproduction</h2>
<p>To reproduce all results, see the README.md file in the repository for detailed instructions.</p>
<p><strong>Estimated time to reproduce</strong>: {time}</p>

<h2>Citation</h2>
<p>If you use this replication package, please cite it using the DOI: {doi}</p>

<h2>License</h2>
<p>{license}</p>
"#,
        title = title,
        abstract_text = abstract_text,
        journal = boilerplate.journal,
        included = included,
        time = boilerplate.reproduction_time,
        doi = boilerplate.citation_doi,
        license = boilerplate.license,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_contains_inputs_and_boilerplate() {
        let html = build_description("Example Paper", "Short text.", &Boilerplate::default());

        assert!(html.starts_with("<h1>Example Paper</h1>"));
        assert!(html.contains("<p>Short text.</p>"));
        assert!(html.contains("replication package for \"Example Paper\""));
        assert!(html.contains("<strong>Quantitative Economics</strong>"));
        assert!(html.contains("<li>LaTeX source for the paper (HAFiscal.tex)</li>"));
        assert!(html.contains("DOI: 10.5281/zenodo.17861977"));
        assert!(html.contains("<p>Apache License 2.0 - See LICENSE file in repository</p>"));
    }

    #[test]
    fn test_description_is_deterministic() {
        let boilerplate = Boilerplate {
            included: vec![],
            ..Boilerplate::default()
        };
        let a = build_description("T", "A", &boilerplate);
        let b = build_description("T", "A", &boilerplate);
        assert_eq!(a, b);
        assert!(a.contains("<ul>\n<li>LaTeX source for the paper (HAFiscal.tex)</li>\n</ul>"));
    }
}
