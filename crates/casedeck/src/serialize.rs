use crate::error::{DeckError, Result};
use crate::fields::Field;
use crate::record::Row;
use crate::section::{TEST_FILE_SUFFIX, section_to_path};

/// Serialized form of one row: where the file goes and what it contains.
/// No I/O happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTest {
    /// Path relative to the test root, `/`-separated, suffix included.
    pub rel_path: String,
    /// Full text content of the test file.
    pub content: String,
}

/// Serialize a tabular row into file path + text content.
///
/// The target section prefers the full hierarchy column over the
/// single-level section (fallback for legacy/partial data). Steps and
/// expected result get runs of horizontal whitespace collapsed to a single
/// space — tabular sources carry presentation whitespace the text format
/// must not preserve. Only the persisted field subset is written back,
/// one `Name: value` line each, in registry order.
pub fn render_row(row: &Row) -> Result<RenderedTest> {
    if row.title.trim().is_empty() {
        return Err(DeckError::MissingTitle);
    }

    let section = row
        .section_hierarchy
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(row.section.as_deref())
        .unwrap_or("");

    let rel_path = format!("{}{}", section_to_path(section, &row.title), TEST_FILE_SUFFIX);

    let mut content = String::new();

    let steps = collapse_ws(row.steps.as_deref().unwrap_or(""));
    content.push_str(steps.trim());
    content.push_str("\n\n");

    if let Some(expected) = row.expected_result.as_deref() {
        let expected = collapse_ws(expected);
        let expected = expected.trim();
        if !expected.is_empty() {
            content.push_str("Expected Result:\n");
            content.push_str(expected);
            content.push_str("\n\n");
        }
    }

    for field in Field::PERSISTED {
        if let Some(value) = row.get(field)
            && !value.is_empty()
        {
            content.push_str(field.name());
            content.push_str(": ");
            content.push_str(&value);
            content.push('\n');
        }
    }

    Ok(RenderedTest { rel_path, content })
}

/// Collapse runs of spaces and tabs to a single space, preserving line
/// structure.
pub fn collapse_ws(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        let mut in_run = false;
        for c in line.chars() {
            if c == ' ' || c == '\t' {
                if !in_run {
                    out.push(' ');
                }
                in_run = true;
            } else {
                out.push(c);
                in_run = false;
            }
        }
        if lines.peek().is_some() {
            out.push('\n');
        }
    }
    out
}
