use anyhow::{Context, Result};
use casedeck::{Field, Row, SECTION_FILE_NAME, TEST_FILE_SUFFIX};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Export a directory of test files to a tabular file.
///
/// Reads every `*.test.txt` file under the root concurrently (content plus
/// optional git metadata per file), parses each into a row, sorts rows by
/// relative path for deterministic output, and writes the table. Any
/// failure in any file aborts the whole export.
pub async fn run(dir: PathBuf, output: PathBuf, git_footer: bool) -> Result<()> {
    let root = if dir.is_absolute() {
        dir
    } else {
        std::env::current_dir()?.join(dir)
    };

    let files = collect_test_files(&root)?;
    info!("found {} test files under {}", files.len(), root.display());

    let mut set = JoinSet::new();
    for path in files {
        let root = root.clone();
        set.spawn_blocking(move || build_row(&root, &path, git_footer));
    }

    let mut keyed: Vec<(String, Row)> = Vec::new();
    while let Some(joined) = set.join_next().await {
        keyed.push(joined??);
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let rows: Vec<Row> = keyed.into_iter().map(|(_, row)| row).collect();
    crate::table::write_rows(&output, &rows)?;
    info!("wrote {} rows to {}", rows.len(), output.display());

    Ok(())
}

/// Every file under `root` (recursively) whose name ends in the test-file
/// suffix. Standard walk filters are off: hidden and gitignored test files
/// are still tests.
fn collect_test_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = entry?;
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(TEST_FILE_SUFFIX))
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read, parse, and enrich one test file. Returns the relative path (the
/// sort key) together with the assembled row.
fn build_row(root: &Path, path: &Path, git_footer: bool) -> Result<(String, Row)> {
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    debug!("reading {rel}");

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let title = casedeck::title_from_file_name(file_name)
        .ok_or_else(|| anyhow::anyhow!("not a test file: {}", path.display()))?;

    let parsed = casedeck::parse_test(&text);
    let section = casedeck::path_to_section(path, root)?;
    let git = casedeck_git::file_history(path)?;

    let mut row = Row::new(title);
    for (field, value) in &parsed.fields {
        row.set(*field, value);
    }

    let mut steps = parsed.steps;
    if git_footer && let Some(git) = &git {
        if steps.is_empty() {
            steps = git.footer();
        } else {
            steps = format!("{steps}\n\n{}", git.footer());
        }
    }
    row.steps = (!steps.is_empty()).then_some(steps);
    row.expected_result = (!parsed.expected_result.is_empty()).then_some(parsed.expected_result);

    // Section columns come from the codec, never from text annotations.
    row.set(Field::Section, &section.section);
    row.set(Field::SectionHierarchy, &section.hierarchy);
    row.section_depth = Some(section.depth);
    row.section_description = read_section_description(path.parent());

    if let Some(git) = &git {
        // Creation annotations persisted through an earlier import win over
        // git, which would only see the import commit. Modification
        // metadata is always re-derived.
        if row.created_by.is_none() {
            row.created_by = Some(git.created.display_author());
        }
        if row.created_on.is_none() {
            row.created_on = Some(git.created.when.to_rfc3339());
        }
        row.updated_by = Some(git.updated.display_author());
        row.updated_on = Some(git.updated.when.to_rfc3339());
    }

    Ok((rel, row))
}

fn read_section_description(dir: Option<&Path>) -> Option<String> {
    let text = std::fs::read_to_string(dir?.join(SECTION_FILE_NAME)).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
