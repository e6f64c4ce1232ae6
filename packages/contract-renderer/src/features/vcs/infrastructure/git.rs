//! git2-backed revision lookup

use crate::config::HashAlgorithm;
use crate::features::vcs::error::{VcsError, VcsResult};
use crate::features::vcs::ports::RevisionLookup;
use git2::{Oid, Repository, Sort};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRevisionLookup {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRevisionLookup {
    /// Open `root` when given, otherwise discover the repository upward from `start`
    pub fn open(root: Option<&Path>, start: &Path) -> VcsResult<Self> {
        let opened = match root {
            Some(root) => Repository::open(root),
            None => Repository::discover(start),
        };
        let repo = opened.map_err(|e| VcsError::RepositoryNotFound {
            path: root.unwrap_or(start).to_path_buf(),
            reason: e.message().to_string(),
        })?;
        let workdir = repo
            .workdir()
            .ok_or(VcsError::BareRepository)?
            .canonicalize()
            .map_err(|e| VcsError::Git(e.to_string()))?;
        debug!(workdir = %workdir.display(), "opened git repository");
        Ok(Self { repo, workdir })
    }

    fn relative(&self, path: &Path) -> VcsResult<PathBuf> {
        let canonical = path
            .canonicalize()
            .map_err(|e| VcsError::Git(e.to_string()))?;
        canonical
            .strip_prefix(&self.workdir)
            .map(Path::to_path_buf)
            .map_err(|_| VcsError::OutsideRepository {
                path: path.to_path_buf(),
            })
    }

    /// Blob id of `relative` in the tree of `commit`, if present
    fn entry_at(&self, commit: &git2::Commit<'_>, relative: &Path) -> VcsResult<Option<Oid>> {
        let tree = commit.tree()?;
        Ok(tree.get_path(relative).ok().map(|entry| entry.id()))
    }

    /// Newest commit on HEAD whose version of `relative` differs from its first parent's
    fn last_commit_touching(&self, relative: &Path) -> VcsResult<Option<(Oid, Oid)>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let Some(blob) = self.entry_at(&commit, relative)? else {
                continue;
            };
            let parent_blob = match commit.parent(0) {
                Ok(parent) => self.entry_at(&parent, relative)?,
                Err(_) => None,
            };
            if parent_blob != Some(blob) {
                return Ok(Some((commit.id(), blob)));
            }
        }
        Ok(None)
    }
}

impl RevisionLookup for GitRevisionLookup {
    fn validated_revision(
        &self,
        path: &Path,
        checksum: &str,
        algorithm: HashAlgorithm,
    ) -> VcsResult<String> {
        let relative = self.relative(path)?;
        let (commit, blob) =
            self.last_commit_touching(&relative)?
                .ok_or_else(|| VcsError::NotCommitted {
                    path: relative.clone(),
                })?;
        let blob = self.repo.find_blob(blob)?;
        if algorithm.digest(blob.content()) != checksum {
            return Err(VcsError::UncommittedChanges { path: relative });
        }
        Ok(commit.to_string())
    }

    fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        self.relative(path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use std::fs;
    use tempfile::TempDir;

    fn commit_file(repo: &Repository, relative: &str, content: &str, message: &str) -> Oid {
        let workdir = repo.workdir().unwrap().to_path_buf();
        let path = workdir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(relative)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("Test", "test@example.com").unwrap();
        let parents: Vec<git2::Commit<'_>> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parents: Vec<&git2::Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
    }

    fn digest(content: &str) -> String {
        HashAlgorithm::Sha256.digest(content.as_bytes())
    }

    #[test]
    fn test_revision_of_last_commit_touching_file() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let first = commit_file(&repo, "lib/a.py", "X = 1\n", "add a");
        let _other = commit_file(&repo, "lib/b.py", "Y = 1\n", "add b");

        let lookup = GitRevisionLookup::open(Some(dir.path()), dir.path()).unwrap();
        let path = dir.path().join("lib/a.py");
        let revision = lookup
            .validated_revision(&path, &digest("X = 1\n"), HashAlgorithm::Sha256)
            .unwrap();
        assert_eq!(revision, first.to_string());
        assert_eq!(lookup.relative_path(&path), Some(PathBuf::from("lib/a.py")));
    }

    #[test]
    fn test_uncommitted_changes_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, "a.py", "X = 1\n", "add a");
        fs::write(dir.path().join("a.py"), "X = 2\n").unwrap();

        let lookup = GitRevisionLookup::open(None, dir.path()).unwrap();
        let err = lookup
            .validated_revision(&dir.path().join("a.py"), &digest("X = 2\n"), HashAlgorithm::Sha256)
            .unwrap_err();
        assert!(matches!(err, VcsError::UncommittedChanges { .. }));
        assert!(err.to_string().contains("Ensure that all changes are committed"));
    }

    #[test]
    fn test_untracked_file_not_committed() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, "a.py", "X = 1\n", "add a");
        fs::write(dir.path().join("new.py"), "Z = 1\n").unwrap();

        let lookup = GitRevisionLookup::open(None, dir.path()).unwrap();
        let err = lookup
            .validated_revision(&dir.path().join("new.py"), &digest("Z = 1\n"), HashAlgorithm::Sha256)
            .unwrap_err();
        assert!(matches!(err, VcsError::NotCommitted { .. }));
    }
}
