//! Field extraction from a LaTeX title page.
//!
//! Every extractor degrades to an empty value when its pattern does not
//! match; nothing in here returns an error.

use crate::domain::model::{Author, AuthorOverride, TitlePage};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\\\\(?:\[[^\]]*\])?").unwrap();
    static ref THIN_SPACE: Regex = Regex::new(r"\\[,;:! ]").unwrap();
    static ref HREF: Regex = Regex::new(r"\\href\{[^{}]*\}\{([^{}]*)\}").unwrap();
    static ref FORMAT_COMMAND: Regex = Regex::new(r"\\[a-zA-Z]+\*?\{([^{}]*)\}").unwrap();
    static ref BARE_COMMAND: Regex = Regex::new(r"\\[a-zA-Z]+\*?").unwrap();
    static ref BRACED: Regex = Regex::new(r"\{([^{}]*)\}").unwrap();
    static ref ESCAPED: Regex = Regex::new(r"\\([%&$#_{}])").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref BRACED_LETTER: Regex = Regex::new(r"\{\\(aa|AA|ae|AE|ss|o|O)\}").unwrap();
    static ref BARE_LETTER: Regex = Regex::new(r"\\(aa|AA|ae|AE|ss|o|O)\b ?").unwrap();
    static ref ACCENT: Regex =
        Regex::new(r#"\\(["'`^~])\s*(?:\{\s*)?\\?([a-zA-Z])(?:\s*\})?"#).unwrap();
    static ref VERBATIM_WRITE: Regex = Regex::new(
        r"(?s)\\begin\{verbatimwrite\}\{([^}]*)\}\s*(.*?)\\end\{verbatimwrite\}"
    )
    .unwrap();
    static ref ABSTRACT_ENV: Regex =
        Regex::new(r"(?s)\\begin\{abstract\}\s*(.*?)\\end\{abstract\}").unwrap();
    static ref INPUT_DIRECTIVE: Regex = Regex::new(r"\\(?:input|include)\{[^}]*\}").unwrap();
    static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"\\and\b").unwrap();
    static ref AUTHORS_INFO: Regex =
        Regex::new(r"(?s)\\begin\{authorsinfo\}(.*?)\\end\{authorsinfo\}").unwrap();
    static ref MAILTO: Regex = Regex::new(r"mailto:([^\s}]+)").unwrap();
    static ref ORCID_URL: Regex = Regex::new(r"orcid\.org/(\d{4}-\d{4}-\d{4}-\d{3}[\dX])").unwrap();
    static ref AND_WORD: Regex = Regex::new(r"\band\b").unwrap();
    static ref CLASSIFICATION_CODE: Regex = Regex::new(r"[A-Z][0-9]{2}").unwrap();
}

const NOTE_COMMANDS: &[&str] = &["thanks", "footnote"];

pub fn extract_title_page(text: &str, overrides: &[AuthorOverride]) -> TitlePage {
    let source = strip_comments(text);

    TitlePage {
        title: extract_title(&source),
        // verbatim blocks keep literal '%', so read them from the raw text
        abstract_text: extract_abstract(text),
        authors: extract_authors(&source, overrides),
        keywords: extract_keywords(&source),
        classification_codes: extract_classification_codes(&source),
    }
}

pub fn extract_title(text: &str) -> String {
    command_argument(text, "title")
        .map(|raw| clean_latex_text(&drop_commands(raw, NOTE_COMMANDS)))
        .unwrap_or_default()
}

/// Prefers a `verbatimwrite` block targeting an abstract file, falling back
/// to the `abstract` environment with file inclusions removed.
pub fn extract_abstract(text: &str) -> String {
    let verbatim = VERBATIM_WRITE
        .captures_iter(text)
        .find(|caps| caps[1].to_lowercase().contains("abstract"))
        .map(|caps| caps[2].trim().to_string());

    if let Some(body) = verbatim {
        return unescape(&body);
    }

    ABSTRACT_ENV
        .captures(text)
        .map(|caps| {
            let body = strip_comments(&caps[1]);
            let body = INPUT_DIRECTIVE.replace_all(&body, "");
            unescape(body.trim())
        })
        .unwrap_or_default()
}

pub fn extract_authors(text: &str, overrides: &[AuthorOverride]) -> Vec<Author> {
    let Some(author_line) = command_argument(text, "author") else {
        return Vec::new();
    };
    let info = AUTHORS_INFO
        .captures(text)
        .map(|caps| decode_accents(&caps[1]));

    AUTHOR_SEPARATOR
        .split(author_line)
        .map(clean_author_name)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let mut author = Author::new(name);
            if let Some(info) = info.as_deref() {
                attach_author_info(&mut author, info);
            }
            if let Some(known) = find_override(&author, overrides) {
                apply_override(&mut author, known);
            }
            author
        })
        .collect()
}

pub fn extract_keywords(text: &str) -> Vec<String> {
    command_argument(text, "keywords")
        .map(|raw| {
            raw.split(',')
                .map(clean_latex_text)
                .filter(|k| !k.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// JEL-style codes: one uppercase letter followed by two digits.
pub fn extract_classification_codes(text: &str) -> Vec<String> {
    let Some(raw) = command_argument(text, "jelclass") else {
        return Vec::new();
    };

    let mut codes: Vec<String> = Vec::new();
    for m in CLASSIFICATION_CODE.find_iter(raw) {
        if !codes.iter().any(|c| c == m.as_str()) {
            codes.push(m.as_str().to_string());
        }
    }
    codes
}

/// Reduces a LaTeX fragment to plain text: line breaks become spaces,
/// formatting commands collapse to their argument, accents are decoded.
pub fn clean_latex_text(raw: &str) -> String {
    let text = LINE_BREAK.replace_all(raw, " ");
    let text = THIN_SPACE.replace_all(&text, " ");
    let text = HREF.replace_all(&text, "$1");
    let text = decode_accents(&text);
    let text = replace_until_stable(&FORMAT_COMMAND, text);
    let text = BARE_COMMAND.replace_all(&text, "").into_owned();
    let text = replace_until_stable(&BRACED, text);
    let text = text.replace(['{', '}'], "");
    let text = unescape(&text).replace('~', " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

pub fn decode_accents(text: &str) -> String {
    let text = BRACED_LETTER.replace_all(text, |caps: &Captures| letter_command(&caps[1]));
    let text = BARE_LETTER.replace_all(&text, |caps: &Captures| letter_command(&caps[1]));
    ACCENT
        .replace_all(&text, |caps: &Captures| {
            accented(&caps[1], &caps[2])
                .map(str::to_string)
                .unwrap_or_else(|| caps[2].to_string())
        })
        .into_owned()
}

fn letter_command(name: &str) -> String {
    match name {
        "aa" => "å",
        "AA" => "Å",
        "ae" => "æ",
        "AE" => "Æ",
        "ss" => "ß",
        "o" => "ø",
        "O" => "Ø",
        other => other,
    }
    .to_string()
}

fn accented(mark: &str, letter: &str) -> Option<&'static str> {
    Some(match (mark, letter) {
        ("\"", "a") => "ä",
        ("\"", "e") => "ë",
        ("\"", "i") => "ï",
        ("\"", "o") => "ö",
        ("\"", "u") => "ü",
        ("\"", "A") => "Ä",
        ("\"", "O") => "Ö",
        ("\"", "U") => "Ü",
        ("'", "a") => "á",
        ("'", "e") => "é",
        ("'", "i") => "í",
        ("'", "o") => "ó",
        ("'", "u") => "ú",
        ("'", "E") => "É",
        ("`", "a") => "à",
        ("`", "e") => "è",
        ("`", "o") => "ò",
        ("^", "a") => "â",
        ("^", "e") => "ê",
        ("^", "o") => "ô",
        ("~", "a") => "ã",
        ("~", "n") => "ñ",
        ("~", "o") => "õ",
        ("~", "N") => "Ñ",
        _ => return None,
    })
}

fn clean_author_name(raw: &str) -> String {
    clean_latex_text(&drop_commands(raw, NOTE_COMMANDS))
}

/// Looks up `\name{... Surname: Affiliation, ...}` in the author-info block.
fn attach_author_info(author: &mut Author, info: &str) {
    let Some(surname) = author.surname().map(str::to_string) else {
        return;
    };
    let pattern = format!(r"\\name\{{[^}}]*{}:\s*([^,}}]+)", regex::escape(&surname));
    let Ok(entry) = Regex::new(&pattern) else {
        return;
    };
    let Some(caps) = entry.captures(info) else {
        return;
    };

    let affiliation = clean_latex_text(&caps[1]);
    if !affiliation.is_empty() {
        author.affiliation = Some(affiliation);
    }

    let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
    let span = entry_span(info, start);
    author.email = MAILTO.captures(span).map(|c| c[1].to_string());
    author.orcid = ORCID_URL.captures(span).map(|c| c[1].to_string());
}

/// From a `\name{` entry up to the next one, or the end of the block.
fn entry_span(info: &str, start: usize) -> &str {
    let rest = &info[start..];
    let end = rest
        .get(1..)
        .and_then(|tail| tail.find("\\name{"))
        .map(|i| i + 1)
        .unwrap_or(rest.len());
    &rest[..end]
}

fn find_override<'a>(author: &Author, overrides: &'a [AuthorOverride]) -> Option<&'a AuthorOverride> {
    let surname = author.surname()?;
    overrides.iter().find(|o| o.surname == surname)
}

fn apply_override(author: &mut Author, known: &AuthorOverride) {
    if let Some(orcid) = &known.orcid {
        author.orcid = Some(orcid.clone());
    }

    if let Some(affiliation) = &known.affiliation {
        author.affiliation = Some(affiliation.clone());
    } else if known.split_affiliation_on_and {
        author.affiliation = author.affiliation.take().map(|a| truncate_at_and(&a));
    }
}

fn truncate_at_and(affiliation: &str) -> String {
    match AND_WORD.find(affiliation) {
        Some(m) if !affiliation[..m.start()].trim().is_empty() => {
            affiliation[..m.start()].trim().to_string()
        }
        _ => affiliation.to_string(),
    }
}

/// Argument of the first `\command{...}` (an optional `[...]` is skipped),
/// read up to its balancing brace.
fn command_argument<'a>(text: &'a str, command: &str) -> Option<&'a str> {
    let pattern = format!(r"\\{}\s*(?:\[[^\]]*\])?\s*\{{", regex::escape(command));
    let opener = Regex::new(&pattern).ok()?;
    let m = opener.find(text)?;
    balanced_group(&text[m.end()..])
}

/// Content of a group whose opening brace was already consumed.
fn balanced_group(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    let mut escaped = false;

    for (i, ch) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn drop_commands(text: &str, commands: &[&str]) -> String {
    let mut out = text.to_string();
    for command in commands {
        let needle = format!("\\{}{{", command);
        while let Some(start) = out.find(&needle) {
            let open = start + needle.len();
            let end = balanced_group(&out[open..])
                .map(|body| open + body.len() + 1)
                .unwrap_or(out.len());
            out.replace_range(start..end, "");
        }
    }
    out
}

fn replace_until_stable(re: &Regex, mut text: String) -> String {
    loop {
        let next = re.replace_all(&text, "$1").into_owned();
        if next == text {
            return text;
        }
        text = next;
    }
}

fn unescape(text: &str) -> String {
    ESCAPED.replace_all(text, "$1").into_owned()
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| {
            let mut backslash = false;
            for (i, ch) in line.char_indices() {
                if ch == '%' && !backslash {
                    return &line[..i];
                }
                backslash = ch == '\\' && !backslash;
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLEPAGE: &str = r#"
\title{Welfare and Spending Effects of \\ Consumption \textbf{Stimulus} Policies}
% \title{An older working title}
\author{Christopher D. Carroll\authNum \and Edmund Crawley\authNum \and William Du\authNum
  \and H{\aa}kon Tretvoll\authNum}
\keywords{stimulus checks, unemployment insurance,  tax cut ,}
\jelclass{E21, E62, H31, E21}

\begin{authorsinfo}
\name{Christopher D. Carroll: Johns Hopkins University and NBER, \href{mailto:ccarroll@jhu.edu}{\texttt{ccarroll@jhu.edu}}}
\name{Edmund Crawley: Federal Reserve Board, \href{mailto:edmund.s.crawley@frb.gov}{\texttt{edmund.s.crawley@frb.gov}}, \url{https://orcid.org/0000-0002-1234-567X}}
\name{H{\aa}kon Tretvoll: Statistics Norway, \href{mailto:hakon.tretvoll@ssb.no}{\texttt{hakon.tretvoll@ssb.no}}}
\end{authorsinfo}

\begin{verbatimwrite}{HAFiscal-Abstract.txt}
Using a heterogeneous agent model, we compare stimulus checks, 50\% UI extensions, and tax cuts.
\end{verbatimwrite}

\begin{abstract}
\input{HAFiscal-Abstract.txt}
\end{abstract}
"#;

    fn carroll() -> AuthorOverride {
        AuthorOverride {
            surname: "Carroll".to_string(),
            orcid: Some("0000-0003-3732-9312".to_string()),
            affiliation: None,
            split_affiliation_on_and: true,
        }
    }

    #[test]
    fn test_title_is_flattened() {
        let page = extract_title_page(TITLEPAGE, &[]);
        assert_eq!(
            page.title,
            "Welfare and Spending Effects of Consumption Stimulus Policies"
        );
    }

    #[test]
    fn test_title_with_optional_argument_and_nesting() {
        let text = r"\title[Short]{A \emph{Nested \textsc{Title}}}";
        assert_eq!(extract_title(text), "A Nested Title");
        assert_eq!(extract_title(r"\titlepage{nope}"), "");
    }

    #[test]
    fn test_abstract_prefers_verbatim_block() {
        let page = extract_title_page(TITLEPAGE, &[]);
        assert_eq!(
            page.abstract_text,
            "Using a heterogeneous agent model, we compare stimulus checks, 50% UI extensions, and tax cuts."
        );
    }

    #[test]
    fn test_abstract_environment_drops_inputs() {
        let text = "\\begin{abstract}\n\\input{extra.tex}\nShort text.\n\\end{abstract}";
        assert_eq!(extract_abstract(text), "Short text.");
    }

    #[test]
    fn test_abstract_environment_drops_comments() {
        let text = "\\begin{abstract}\nA 50\\% rise. % draft note\n\\end{abstract}";
        assert_eq!(extract_abstract(text), "A 50% rise.");
    }

    #[test]
    fn test_authors_with_info_and_overrides() {
        let authors = extract_authors(TITLEPAGE, &[carroll()]);
        let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Christopher D. Carroll", "Edmund Crawley", "William Du", "Håkon Tretvoll"]
        );

        let carroll = &authors[0];
        assert_eq!(carroll.affiliation.as_deref(), Some("Johns Hopkins University"));
        assert_eq!(carroll.orcid.as_deref(), Some("0000-0003-3732-9312"));
        assert_eq!(carroll.email.as_deref(), Some("ccarroll@jhu.edu"));

        let crawley = &authors[1];
        assert_eq!(crawley.affiliation.as_deref(), Some("Federal Reserve Board"));
        assert_eq!(crawley.email.as_deref(), Some("edmund.s.crawley@frb.gov"));
        assert_eq!(crawley.orcid.as_deref(), Some("0000-0002-1234-567X"));

        let du = &authors[2];
        assert_eq!(du.affiliation, None);
        assert_eq!(du.email, None);

        assert_eq!(authors[3].affiliation.as_deref(), Some("Statistics Norway"));
    }

    #[test]
    fn test_affiliation_kept_whole_without_override() {
        let authors = extract_authors(TITLEPAGE, &[]);
        assert_eq!(
            authors[0].affiliation.as_deref(),
            Some("Johns Hopkins University and NBER")
        );
        assert_eq!(authors[0].orcid, None);
    }

    #[test]
    fn test_override_replaces_affiliation() {
        let known = AuthorOverride {
            surname: "Du".to_string(),
            orcid: None,
            affiliation: Some("Johns Hopkins University".to_string()),
            split_affiliation_on_and: false,
        };
        let authors = extract_authors(TITLEPAGE, &[known]);
        assert_eq!(authors[2].affiliation.as_deref(), Some("Johns Hopkins University"));
    }

    #[test]
    fn test_split_on_and_needs_a_whole_word() {
        assert_eq!(truncate_at_and("University of Maryland"), "University of Maryland");
        assert_eq!(truncate_at_and("JHU and NBER"), "JHU");
    }

    #[test]
    fn test_names_drop_notes_and_decode_accents() {
        let text = r#"\author{Bj\o rn M\"uller\thanks{We thank \emph{everyone}.} \and Jos\'{e} Pe\~na}"#;
        let authors = extract_authors(text, &[]);
        let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Bjørn Müller", "José Peña"]);
    }

    #[test]
    fn test_keywords_are_trimmed() {
        let page = extract_title_page(TITLEPAGE, &[]);
        assert_eq!(
            page.keywords,
            vec!["stimulus checks", "unemployment insurance", "tax cut"]
        );
    }

    #[test]
    fn test_classification_codes_deduplicated() {
        let page = extract_title_page(TITLEPAGE, &[]);
        assert_eq!(page.classification_codes, vec!["E21", "E62", "H31"]);
        assert_eq!(extract_classification_codes(r"\jelclass{h31 C6}"), Vec::<String>::new());
    }

    #[test]
    fn test_classification_codes_without_separators() {
        assert_eq!(
            extract_classification_codes(r"\jelclass{E21H31, D14}"),
            vec!["E21", "H31", "D14"]
        );
        assert_eq!(extract_classification_codes(r"\jelclass{E211}"), vec!["E21"]);
    }

    #[test]
    fn test_title_drops_notes() {
        assert_eq!(
            extract_title(r"\title{Stimulus Policies\thanks{Funded by the NSF.}}"),
            "Stimulus Policies"
        );
    }

    #[test]
    fn test_title_without_authors_degrades() {
        let page = extract_title_page(r"\title{Only a Title}", &[carroll()]);
        assert_eq!(page.title, "Only a Title");
        assert!(page.authors.is_empty());
        assert!(page.keywords.is_empty());
        assert!(page.abstract_text.is_empty());
    }

    #[test]
    fn test_malformed_input_yields_empty_page() {
        let page = extract_title_page(r"\title{unterminated \author{x", &[]);
        assert_eq!(page, TitlePage::default());
    }

    #[test]
    fn test_commented_lines_are_ignored() {
        let text = "% \\title{Old}\n\\title{New 50\\% Title}";
        assert_eq!(extract_title(&strip_comments(text)), "New 50% Title");
    }
}
