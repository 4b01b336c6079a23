//! Static checks for the Mermaid flowchart produced during extraction.
//!
//! The checks are advisory. Mermaid tolerates some of what is reported here,
//! so callers log the report and still attempt to render the diagram.

use log::warn;
use std::fmt;

/// Every diagram must start with this direction preamble
pub const PREAMBLE: &str = "graph TD";

/// Link operators; longer forms come first so `-.->` is not read as `-.-`
const LINKS: &[&str] = &["-.->", "-.-", "==>", "===", "-->", "---"];
const CLASS_DEF: &str = "classDef";
const CLASS_APPLY: &str = "class ";
const COMMENT: &str = "%%";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramIssue {
    MissingPreamble,
    MissingClassDef,
    MissingClassApplication,
    /// 1-based line number and the trimmed line
    MissingSemicolon { line: usize, text: String },
    /// Node identifier with characters Mermaid treats as separators
    InvalidNodeId { line: usize, id: String },
}

impl DiagramIssue {
    /// Structural issues mean the styling contract is broken; the rest are
    /// syntax hints that Mermaid sometimes forgives
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DiagramIssue::MissingPreamble
                | DiagramIssue::MissingClassDef
                | DiagramIssue::MissingClassApplication
        )
    }
}

impl fmt::Display for DiagramIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramIssue::MissingPreamble => write!(f, "Diagram must start with '{PREAMBLE}'"),
            DiagramIssue::MissingClassDef => write!(f, "Missing classDef statements for styling"),
            DiagramIssue::MissingClassApplication => {
                write!(f, "Missing class statements to apply styles")
            }
            DiagramIssue::MissingSemicolon { line, text } => {
                write!(f, "Line {line} may be missing semicolon: \"{text}\"")
            }
            DiagramIssue::InvalidNodeId { line, id } => write!(
                f,
                "Line {line}: invalid node ID \"{id}\". Use only lowercase letters, digits and underscores."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramReport {
    pub valid: bool,
    pub issues: Vec<DiagramIssue>,
}

impl DiagramReport {
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Emit one warning per issue
    pub fn log(&self) {
        for issue in &self.issues {
            warn!("Mermaid diagram issue: {}", issue);
        }
    }
}

/// Check `diagram` against the preamble, styling and identifier rules
pub fn validate(diagram: &str) -> DiagramReport {
    let code = diagram.trim();
    let mut issues = Vec::new();

    if !code.starts_with(PREAMBLE) {
        issues.push(DiagramIssue::MissingPreamble);
    }

    let lines: Vec<&str> = code.lines().map(str::trim).collect();

    if !lines.iter().any(|l| l.starts_with(CLASS_DEF)) {
        issues.push(DiagramIssue::MissingClassDef);
    }
    if !lines.iter().any(|l| l.starts_with(CLASS_APPLY)) {
        issues.push(DiagramIssue::MissingClassApplication);
    }

    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }

        let exempt = is_edge(line)
            || line.starts_with(CLASS_DEF)
            || line.starts_with(CLASS_APPLY)
            || line.starts_with(PREAMBLE);
        if !exempt && !line.ends_with(';') {
            issues.push(DiagramIssue::MissingSemicolon {
                line: index + 1,
                text: line.to_string(),
            });
        }

        if line.starts_with(CLASS_DEF) || line.starts_with(CLASS_APPLY) {
            continue;
        }
        for id in node_ids(line) {
            if !is_valid_node_id(&id) {
                issues.push(DiagramIssue::InvalidNodeId {
                    line: index + 1,
                    id,
                });
            }
        }
    }

    DiagramReport {
        valid: issues.is_empty(),
        issues,
    }
}

fn is_edge(line: &str) -> bool {
    LINKS.iter().any(|link| line.contains(link))
}

/// Identifiers written immediately before a shape opener in each edge segment
fn node_ids(line: &str) -> Vec<String> {
    let line = line.strip_prefix(PREAMBLE).unwrap_or(line);

    split_links(line)
        .into_iter()
        .filter_map(|segment| {
            // Leftovers of longer links such as `--->` stay on the segment start
            let segment = segment.trim_start_matches(|c: char| {
                c.is_whitespace() || matches!(c, ';' | '-' | '=' | '.' | '>')
            });
            let segment = strip_edge_label(segment);
            let open = segment.find(['[', '(', '{'])?;
            let id = segment[..open].trim();
            (!id.is_empty()).then(|| id.to_string())
        })
        .collect()
}

/// Split a statement on every link operator
fn split_links(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = line;
    while let Some((start, link)) = LINKS
        .iter()
        .filter_map(|link| rest.find(link).map(|start| (start, *link)))
        .min_by_key(|&(start, link)| (start, std::cmp::Reverse(link.len())))
    {
        segments.push(&rest[..start]);
        rest = &rest[start + link.len()..];
    }
    segments.push(rest);
    segments
}

/// `|label| node[...]` -> `node[...]`
fn strip_edge_label(segment: &str) -> &str {
    if let Some(rest) = segment.strip_prefix('|') {
        if let Some(end) = rest.find('|') {
            return rest[end + 1..].trim_start();
        }
    }
    segment
}

fn is_valid_node_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
