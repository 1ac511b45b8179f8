use chrono::{DateTime, Utc};

/// Date-time pattern used for the `Created On` / `Updated On` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A recognized column in the tabular format.
///
/// The declaration order of [`Field::ALL`] is the column order of the
/// tabular export header. [`Field::PERSISTED`] is the strictly smaller
/// subset that survives an import → text round trip; everything else is
/// export-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Section,
    SectionHierarchy,
    SectionDepth,
    SectionDescription,
    Steps,
    ExpectedResult,
    Priority,
    Type,
    References,
    Suite,
    SuiteId,
    CreatedBy,
    CreatedOn,
    UpdatedBy,
    UpdatedOn,
}

impl Field {
    /// Every recognized field, in tabular column order.
    pub const ALL: [Field; 16] = [
        Field::Title,
        Field::Section,
        Field::SectionHierarchy,
        Field::SectionDepth,
        Field::SectionDescription,
        Field::Steps,
        Field::ExpectedResult,
        Field::Priority,
        Field::Type,
        Field::References,
        Field::Suite,
        Field::SuiteId,
        Field::CreatedBy,
        Field::CreatedOn,
        Field::UpdatedBy,
        Field::UpdatedOn,
    ];

    /// Fields written back into serialized text on import, in output order.
    ///
    /// Modification metadata (`Updated By` / `Updated On`) is intentionally
    /// absent: it is re-derived from version control on the next export.
    /// The title is encoded in the file name, never in the text.
    pub const PERSISTED: [Field; 7] = [
        Field::CreatedBy,
        Field::CreatedOn,
        Field::Priority,
        Field::Type,
        Field::References,
        Field::Suite,
        Field::SuiteId,
    ];

    /// The column/annotation name as it appears in headers and text.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Section => "Section",
            Field::SectionHierarchy => "Section Hierarchy",
            Field::SectionDepth => "Section Depth",
            Field::SectionDescription => "Section Description",
            Field::Steps => "Steps",
            Field::ExpectedResult => "Expected Result",
            Field::Priority => "Priority",
            Field::Type => "Type",
            Field::References => "References",
            Field::Suite => "Suite",
            Field::SuiteId => "Suite ID",
            Field::CreatedBy => "Created By",
            Field::CreatedOn => "Created On",
            Field::UpdatedBy => "Updated By",
            Field::UpdatedOn => "Updated On",
        }
    }

    /// Look up a field by name, case-insensitively and ignoring
    /// surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Field> {
        let name = name.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Whether a `Name: value` line in test text is recognized as an
    /// annotation. The title is never an inline field — it lives in the
    /// file name — so a literal `Title: ...` line stays in the prose.
    pub fn is_inline(self) -> bool {
        !matches!(self, Field::Title)
    }

    /// Apply this field's value transform for tabular output.
    ///
    /// Date-valued fields are reformatted to [`DATE_FORMAT`]; the depth
    /// field is coerced to its decimal string form; everything else passes
    /// through unchanged.
    pub fn format_value(self, raw: &str) -> String {
        match self {
            Field::CreatedOn | Field::UpdatedOn => format_date(raw),
            Field::SectionDepth => format_depth(raw),
            _ => raw.to_string(),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reformat a date value to [`DATE_FORMAT`].
///
/// Accepts RFC 3339 timestamps and unix epoch seconds; anything else
/// passes through unchanged, so already-formatted values are stable.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return dt.format(DATE_FORMAT).to_string();
    }

    if let Ok(secs) = raw.parse::<i64>()
        && let Some(dt) = DateTime::<Utc>::from_timestamp(secs, 0)
    {
        return dt.format(DATE_FORMAT).to_string();
    }

    raw.to_string()
}

fn format_depth(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(n) => format!("{}", n.trunc() as i64),
        Err(_) => raw.to_string(),
    }
}
