use anyhow::{Context, Result};
use casedeck::{Row, SECTION_FILE_NAME, render_row};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Files destined for one target directory.
#[derive(Debug, Default)]
struct DirGroup {
    /// Section description from the first row mapped here that has one.
    description: Option<String>,
    /// (file name, content) pairs. Sanitization collisions are not
    /// detected; the last write wins.
    files: Vec<(String, String)>,
}

/// Import a tabular file into a directory of test files.
///
/// Rows are rendered to path + content, grouped by target directory, and
/// written one directory at a time in lexicographically sorted order: the
/// directory is created, its section-description file is written, then its
/// test files are written concurrently and joined before the next
/// directory starts. The sequential ordering keeps output deterministic
/// and debuggable; it is not needed for filesystem correctness.
pub async fn run(input: PathBuf, dir: PathBuf) -> Result<()> {
    let rows = crate::table::read_rows(&input)?;
    info!("read {} rows from {}", rows.len(), input.display());

    let groups = group_by_directory(&rows)?;

    let mut written = 0usize;
    for (rel_dir, group) in &groups {
        let abs_dir = dir.join(rel_dir);
        tokio::fs::create_dir_all(&abs_dir)
            .await
            .with_context(|| format!("failed to create {}", abs_dir.display()))?;
        debug!("created {}", abs_dir.display());

        if let Some(description) = &group.description {
            tokio::fs::write(abs_dir.join(SECTION_FILE_NAME), description)
                .await
                .with_context(|| format!("failed to write section file in {}", abs_dir.display()))?;
        }

        let mut set = JoinSet::new();
        for (name, content) in group.files.clone() {
            let target = abs_dir.join(&name);
            set.spawn(async move {
                tokio::fs::write(&target, content)
                    .await
                    .with_context(|| format!("failed to write {}", target.display()))
            });
        }
        while let Some(joined) = set.join_next().await {
            joined??;
            written += 1;
        }
    }

    info!(
        "wrote {} test files across {} directories under {}",
        written,
        groups.len(),
        dir.display()
    );
    Ok(())
}

fn group_by_directory(rows: &[Row]) -> Result<BTreeMap<String, DirGroup>> {
    let mut groups: BTreeMap<String, DirGroup> = BTreeMap::new();

    for row in rows {
        let rendered = render_row(row)?;
        let (rel_dir, name) = match rendered.rel_path.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (String::new(), rendered.rel_path),
        };

        let group = groups.entry(rel_dir).or_default();
        if group.description.is_none()
            && let Some(description) = &row.section_description
        {
            group.description = Some(description.clone());
        }
        group.files.push((name, rendered.content));
    }

    Ok(groups)
}
