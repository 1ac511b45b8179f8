use crate::error::{DeckError, Result};
use crate::record::SectionInfo;
use std::path::{Component, Path};

/// Suffix identifying a test file.
pub const TEST_FILE_SUFFIX: &str = ".test.txt";

/// Separator between section levels in a hierarchy label.
pub const SECTION_SEPARATOR: &str = " > ";

/// Per-directory metadata file carrying the section description.
pub const SECTION_FILE_NAME: &str = ".section.txt";

/// Titles are truncated to this many characters before sanitization.
pub const MAX_TITLE_LEN: usize = 200;

/// Derive section placement for a test file under `test_root`.
///
/// The section is the immediate parent directory name, the hierarchy is
/// the full ancestor chain joined with [`SECTION_SEPARATOR`], and the
/// depth counts hierarchy levels. A file directly at the root yields empty
/// strings and depth 0.
pub fn path_to_section(file_path: &Path, test_root: &Path) -> Result<SectionInfo> {
    let rel = file_path
        .strip_prefix(test_root)
        .map_err(|_| DeckError::OutsideRoot {
            path: file_path.to_path_buf(),
            root: test_root.to_path_buf(),
        })?;

    let parent = rel.parent().unwrap_or_else(|| Path::new(""));
    let segments: Vec<String> = parent
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    Ok(SectionInfo {
        section: segments.last().cloned().unwrap_or_default(),
        hierarchy: segments.join(SECTION_SEPARATOR),
        depth: segments.len() as u32,
    })
}

/// Sanitize a section label (single-level or full hierarchy) plus title
/// into a safe relative path, without the test-file suffix.
///
/// Raw path separators embedded in the section text are neutralized before
/// the canonical `" > "` separator is expanded back into real separators,
/// so free-text data cannot inject spurious path segments. The final pass
/// maps every character outside `[A-Za-z0-9]` and `/` to an underscore:
/// spaces, punctuation, and all non-ASCII become `_`. Distinct inputs may
/// collide after sanitization; the last write wins.
pub fn section_to_path(section: &str, title: &str) -> String {
    let section = section.replace(['/', '\\'], "_");
    let section = section.replace(SECTION_SEPARATOR, "/");

    let title: String = title.chars().take(MAX_TITLE_LEN).collect();
    let title = title.replace(['/', '\\'], "_");

    let joined = if section.is_empty() {
        title
    } else {
        format!("{section}/{title}")
    };

    joined
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '/' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Title of a test file, i.e. its name with the suffix stripped.
/// `None` when the name does not carry [`TEST_FILE_SUFFIX`].
pub fn title_from_file_name(name: &str) -> Option<&str> {
    name.strip_suffix(TEST_FILE_SUFFIX)
}
