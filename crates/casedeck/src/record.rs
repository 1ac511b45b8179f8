use crate::fields::{DATE_FORMAT, Field};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One tabular row — the in-memory representation of a single test case.
///
/// Rows are transient: constructed per file (export) or per table row
/// (import) and consumed immediately. Recognized columns get typed fields;
/// anything else lands in [`Row::extra`], which is carried through parsing
/// but never written to output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub title: String,
    pub section: Option<String>,
    pub section_hierarchy: Option<String>,
    pub section_depth: Option<u32>,
    pub section_description: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub priority: Option<String>,
    pub case_type: Option<String>,
    pub references: Option<String>,
    pub suite: Option<String>,
    pub suite_id: Option<String>,
    pub created_by: Option<String>,
    pub created_on: Option<String>,
    pub updated_by: Option<String>,
    pub updated_on: Option<String>,

    /// Unrecognized columns from the tabular source.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl Row {
    pub fn new(title: impl Into<String>) -> Self {
        Row {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Build a row from parallel column-name / value sequences, as read
    /// from a tabular source. Recognized names populate the typed fields;
    /// the rest go to `extra`. Empty cells become `None`.
    pub fn from_columns<'a, I>(columns: I) -> Row
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut row = Row::default();
        for (name, value) in columns {
            match Field::from_name(name) {
                Some(field) => row.set(field, value),
                None => {
                    row.extra.insert(name.trim().to_string(), value.to_string());
                }
            }
        }
        row
    }

    /// The row's value for a field, as a string.
    pub fn get(&self, field: Field) -> Option<String> {
        match field {
            Field::Title => Some(self.title.clone()),
            Field::Section => self.section.clone(),
            Field::SectionHierarchy => self.section_hierarchy.clone(),
            Field::SectionDepth => self.section_depth.map(|d| d.to_string()),
            Field::SectionDescription => self.section_description.clone(),
            Field::Steps => self.steps.clone(),
            Field::ExpectedResult => self.expected_result.clone(),
            Field::Priority => self.priority.clone(),
            Field::Type => self.case_type.clone(),
            Field::References => self.references.clone(),
            Field::Suite => self.suite.clone(),
            Field::SuiteId => self.suite_id.clone(),
            Field::CreatedBy => self.created_by.clone(),
            Field::CreatedOn => self.created_on.clone(),
            Field::UpdatedBy => self.updated_by.clone(),
            Field::UpdatedOn => self.updated_on.clone(),
        }
    }

    /// Set the row's value for a field from a string. An empty value
    /// clears the field (except the title, which is stored verbatim).
    pub fn set(&mut self, field: Field, value: &str) {
        let opt = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        match field {
            Field::Title => self.title = value.to_string(),
            Field::Section => self.section = opt,
            Field::SectionHierarchy => self.section_hierarchy = opt,
            Field::SectionDepth => self.section_depth = parse_depth(value),
            Field::SectionDescription => self.section_description = opt,
            Field::Steps => self.steps = opt,
            Field::ExpectedResult => self.expected_result = opt,
            Field::Priority => self.priority = opt,
            Field::Type => self.case_type = opt,
            Field::References => self.references = opt,
            Field::Suite => self.suite = opt,
            Field::SuiteId => self.suite_id = opt,
            Field::CreatedBy => self.created_by = opt,
            Field::CreatedOn => self.created_on = opt,
            Field::UpdatedBy => self.updated_by = opt,
            Field::UpdatedOn => self.updated_on = opt,
        }
    }
}

// Tabular sources sometimes carry depths as "2.0".
fn parse_depth(value: &str) -> Option<u32> {
    value.trim().parse::<f64>().ok().map(|n| n.trunc() as u32)
}

/// Section placement derived from a file's position under the test root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    /// Immediate parent directory name; empty at the root.
    pub section: String,
    /// Full ancestor chain joined with `" > "`; empty at the root.
    pub hierarchy: String,
    /// Number of hierarchy levels; 0 at the root.
    pub depth: u32,
}

/// One side of a file's git history (author + timestamp of a commit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSig {
    pub name: String,
    pub email: String,
    pub when: DateTime<Utc>,
}

impl CommitSig {
    /// `Name <email>` form used for the `Created By` / `Updated By` columns.
    pub fn display_author(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

/// Version-control metadata for a test file. Present only when the file
/// lives in a repository and has history; never fabricated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitInfo {
    /// The commit that first added the file.
    pub created: CommitSig,
    /// The most recent commit that changed the file.
    pub updated: CommitSig,
}

impl GitInfo {
    /// Human-readable modification block appended to steps text on export
    /// when git footers are enabled. Export-only decoration, not a
    /// round-trippable field.
    pub fn footer(&self) -> String {
        format!(
            "Last updated by {} on {}",
            self.updated.display_author(),
            self.updated.when.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_columns_typed_fields() {
        let row = Row::from_columns([
            ("Title", "Login works"),
            ("Priority", "High"),
            ("Section Depth", "2"),
        ]);
        assert_eq!(row.title, "Login works");
        assert_eq!(row.priority.as_deref(), Some("High"));
        assert_eq!(row.section_depth, Some(2));
        assert!(row.extra.is_empty());
    }

    #[test]
    fn test_from_columns_unrecognized_goes_to_extra() {
        let row = Row::from_columns([("Title", "T"), ("Severity", "S1")]);
        assert_eq!(row.extra.get("Severity").map(String::as_str), Some("S1"));
    }

    #[test]
    fn test_from_columns_case_insensitive_names() {
        let row = Row::from_columns([("title", "T"), ("SUITE ID", "42")]);
        assert_eq!(row.title, "T");
        assert_eq!(row.suite_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_from_columns_empty_cell_is_none() {
        let row = Row::from_columns([("Title", "T"), ("Priority", "")]);
        assert!(row.priority.is_none());
    }

    #[test]
    fn test_depth_parses_float_form() {
        let row = Row::from_columns([("Section Depth", "3.0")]);
        assert_eq!(row.section_depth, Some(3));
    }

    #[test]
    fn test_depth_unparseable_is_none() {
        let row = Row::from_columns([("Section Depth", "deep")]);
        assert!(row.section_depth.is_none());
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut row = Row::new("T");
        row.set(Field::References, "JIRA-1, JIRA-2");
        assert_eq!(
            row.get(Field::References).as_deref(),
            Some("JIRA-1, JIRA-2")
        );
        assert_eq!(row.get(Field::Title).as_deref(), Some("T"));
        assert!(row.get(Field::Suite).is_none());
    }

    #[test]
    fn test_set_empty_clears() {
        let mut row = Row::new("T");
        row.set(Field::Priority, "High");
        row.set(Field::Priority, "");
        assert!(row.priority.is_none());
    }

    #[test]
    fn test_row_serde_roundtrip() {
        let mut row = Row::new("Login works");
        row.section_hierarchy = Some("auth > login".into());
        row.extra.insert("Severity".into(), "S1".into());

        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    fn sig(name: &str, email: &str) -> CommitSig {
        CommitSig {
            name: name.into(),
            email: email.into(),
            when: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn test_display_author() {
        assert_eq!(
            sig("Jane Doe", "jane@example.com").display_author(),
            "Jane Doe <jane@example.com>"
        );
    }

    #[test]
    fn test_git_footer() {
        let info = GitInfo {
            created: sig("Jane Doe", "jane@example.com"),
            updated: sig("Sam Roe", "sam@example.com"),
        };
        assert_eq!(
            info.footer(),
            "Last updated by Sam Roe <sam@example.com> on 2026-01-02 03:04:05"
        );
    }
}
