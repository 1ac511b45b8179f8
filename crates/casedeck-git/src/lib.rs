#![doc = include_str!("../README.md")]

use anyhow::Result;
use casedeck::{CommitSig, GitInfo};
use chrono::{DateTime, Utc};
use git2::{Commit, Oid, Repository, Sort, Tree};
use std::path::Path;

/// Look up creation and last-modification metadata for a file.
///
/// Discovers the enclosing repository from the file's parent directory.
/// Returns `Ok(None)` when the path is not inside a git working tree, is
/// not tracked, or the repository has no history — none of these are
/// errors. Actual repository access failures (corrupt odb etc.) propagate.
pub fn file_history(file_path: &Path) -> Result<Option<GitInfo>> {
    let start = file_path.parent().unwrap_or(file_path);
    let repo = match Repository::discover(start) {
        Ok(repo) => repo,
        Err(_) => return Ok(None),
    };

    let Some(workdir) = repo.workdir() else {
        return Ok(None);
    };

    // Canonicalize both sides so symlinked temp dirs still line up.
    let abs = file_path
        .canonicalize()
        .unwrap_or_else(|_| file_path.to_path_buf());
    let workdir = workdir
        .canonicalize()
        .unwrap_or_else(|_| workdir.to_path_buf());

    let rel = match abs.strip_prefix(&workdir) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => return Ok(None),
    };

    history_in_repo(&repo, &rel)
}

/// Walk history newest-first and record the newest and oldest commits
/// touching `rel`.
fn history_in_repo(repo: &Repository, rel: &Path) -> Result<Option<GitInfo>> {
    let mut walker = repo.revwalk()?;
    if walker.push_head().is_err() {
        // Unborn branch: no history yet.
        return Ok(None);
    }
    walker.set_sorting(Sort::TIME)?;

    let mut updated: Option<CommitSig> = None;
    let mut created: Option<CommitSig> = None;

    for oid in walker {
        let commit = repo.find_commit(oid?)?;
        if commit_touches(&commit, rel)? {
            let sig = commit_sig(&commit);
            if updated.is_none() {
                updated = Some(sig.clone());
            }
            created = Some(sig);
        }
    }

    match (created, updated) {
        (Some(created), Some(updated)) => Ok(Some(GitInfo { created, updated })),
        _ => Ok(None),
    }
}

/// A commit touches a path when the blob at that path differs from every
/// parent (or exists at all in a root commit). Merge commits that carry a
/// side unchanged from one parent are not counted, matching `git log`.
fn commit_touches(commit: &Commit, rel: &Path) -> Result<bool> {
    let id = blob_at(&commit.tree()?, rel);

    if commit.parent_count() == 0 {
        return Ok(id.is_some());
    }

    for parent in commit.parents() {
        if blob_at(&parent.tree()?, rel) == id {
            return Ok(false);
        }
    }
    Ok(true)
}

fn blob_at(tree: &Tree<'_>, rel: &Path) -> Option<Oid> {
    tree.get_path(rel).ok().map(|entry| entry.id())
}

fn commit_sig(commit: &Commit) -> CommitSig {
    let author = commit.author();
    let when = DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0)
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH);

    CommitSig {
        name: author.name().unwrap_or("unknown").to_string(),
        email: author.email().unwrap_or("unknown").to_string(),
        when,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};

    fn init_temp_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();

        (dir, repo)
    }

    /// Commit one file with an explicit author and timestamp. Commits in a
    /// test run land in the same second otherwise, which would make
    /// created/updated indistinguishable.
    fn create_commit(
        repo: &Repository,
        file_name: &str,
        content: &str,
        author: (&str, &str),
        epoch_secs: i64,
    ) -> Oid {
        let mut index = repo.index().unwrap();
        let file_path = repo.workdir().unwrap().join(file_name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&file_path, content).unwrap();
        index.add_path(std::path::Path::new(file_name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let sig = Signature::new(author.0, author.1, &Time::new(epoch_secs, 0)).unwrap();
        let head = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&Commit> = head.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, "commit", &tree, &parents)
            .unwrap()
    }

    const JANE: (&str, &str) = ("Jane Doe", "jane@example.com");
    const SAM: (&str, &str) = ("Sam Roe", "sam@example.com");

    #[test]
    fn test_single_commit_created_equals_updated() {
        let (dir, repo) = init_temp_repo();
        create_commit(&repo, "login.test.txt", "v1", JANE, 1_000);

        let info = file_history(&dir.path().join("login.test.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(info.created, info.updated);
        assert_eq!(info.created.name, "Jane Doe");
        assert_eq!(info.created.email, "jane@example.com");
        assert_eq!(info.created.when.timestamp(), 1_000);
    }

    #[test]
    fn test_creation_and_modification_separate() {
        let (dir, repo) = init_temp_repo();
        create_commit(&repo, "login.test.txt", "v1", JANE, 1_000);
        create_commit(&repo, "login.test.txt", "v2", SAM, 2_000);

        let info = file_history(&dir.path().join("login.test.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(info.created.name, "Jane Doe");
        assert_eq!(info.created.when.timestamp(), 1_000);
        assert_eq!(info.updated.name, "Sam Roe");
        assert_eq!(info.updated.when.timestamp(), 2_000);
    }

    #[test]
    fn test_commits_to_other_files_ignored() {
        let (dir, repo) = init_temp_repo();
        create_commit(&repo, "a.test.txt", "v1", JANE, 1_000);
        create_commit(&repo, "b.test.txt", "v1", SAM, 2_000);
        create_commit(&repo, "a.test.txt", "v2", SAM, 3_000);

        let info = file_history(&dir.path().join("a.test.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(info.created.when.timestamp(), 1_000);
        assert_eq!(info.updated.when.timestamp(), 3_000);
    }

    #[test]
    fn test_nested_path() {
        let (dir, repo) = init_temp_repo();
        create_commit(&repo, "auth/login/case.test.txt", "v1", JANE, 1_000);

        let info = file_history(&dir.path().join("auth/login/case.test.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(info.created.name, "Jane Doe");
    }

    #[test]
    fn test_outside_repository_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("case.test.txt");
        std::fs::write(&file, "steps").unwrap();

        assert!(file_history(&file).unwrap().is_none());
    }

    #[test]
    fn test_untracked_file_is_none() {
        let (dir, repo) = init_temp_repo();
        create_commit(&repo, "tracked.test.txt", "v1", JANE, 1_000);

        let untracked = dir.path().join("untracked.test.txt");
        std::fs::write(&untracked, "steps").unwrap();

        assert!(file_history(&untracked).unwrap().is_none());
    }

    #[test]
    fn test_empty_repository_is_none() {
        let (dir, _repo) = init_temp_repo();
        let file = dir.path().join("case.test.txt");
        std::fs::write(&file, "steps").unwrap();

        assert!(file_history(&file).unwrap().is_none());
    }
}
