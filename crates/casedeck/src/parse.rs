use crate::fields::Field;
use std::collections::HashMap;

/// Structured result of parsing one test file's raw text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTest {
    /// Ordered step text, joined and trimmed. May be empty.
    pub steps: String,
    /// Ordered expected-result text, joined and trimmed. Empty when the
    /// text carries no `Expected Result:` marker.
    pub expected_result: String,
    /// Inline field annotations consumed from the text.
    pub fields: HashMap<Field, String>,
}

/// Which buffer unmatched lines are currently appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Steps,
    Result,
}

/// Classification outcome for a single line.
#[derive(Debug, PartialEq)]
enum LineClass<'a> {
    /// A `Steps:` or `Expected Result:` marker; switches mode, trailing
    /// content belongs to the new mode's buffer.
    Marker(Mode, &'a str),
    /// A recognized field annotation; consumed, mode unchanged.
    Annotation(Field, &'a str),
    /// Free-form prose belonging to the current mode.
    Text,
}

fn classify(line: &str) -> LineClass<'_> {
    if let Some((head, rest)) = line.split_once(':')
        && let Some(field) = Field::from_name(head)
        && field.is_inline()
    {
        let rest = rest.trim();
        return match field {
            Field::ExpectedResult => LineClass::Marker(Mode::Result, rest),
            Field::Steps => LineClass::Marker(Mode::Steps, rest),
            _ => LineClass::Annotation(field, rest),
        };
    }
    LineClass::Text
}

/// Parse one test file's raw text into steps, expected result, and field
/// annotations.
///
/// A line-oriented state machine starting in step mode. Field names match
/// case-insensitively with flexible surrounding whitespace; a matching line
/// is consumed and never appears in the prose. An annotation holds field
/// state for its own line only — the step/result mode is unchanged for
/// subsequent lines. Once the `Expected Result:` marker is seen, all later
/// non-annotation lines belong to the result (no reverting to steps at end
/// of input). There is no escaping mechanism: prose that looks like a
/// recognized annotation is always consumed.
///
/// The title is not parsed here — it lives in the file name.
pub fn parse_test(text: &str) -> ParsedTest {
    let mut mode = Mode::Steps;
    let mut steps: Vec<&str> = Vec::new();
    let mut result: Vec<&str> = Vec::new();
    let mut fields: HashMap<Field, String> = HashMap::new();

    for line in text.lines() {
        match classify(line) {
            LineClass::Marker(next, rest) => {
                mode = next;
                if !rest.is_empty() {
                    match mode {
                        Mode::Steps => steps.push(rest),
                        Mode::Result => result.push(rest),
                    }
                }
            }
            LineClass::Annotation(field, value) => {
                fields.insert(field, value.to_string());
            }
            LineClass::Text => match mode {
                Mode::Steps => steps.push(line),
                Mode::Result => result.push(line),
            },
        }
    }

    ParsedTest {
        steps: steps.join("\n").trim().to_string(),
        expected_result: result.join("\n").trim().to_string(),
        fields,
    }
}
