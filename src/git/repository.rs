use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use crate::error::{AppError, Result};
use crate::git::query::{LineRange, VersionControl};
use crate::models::RepositoryInfo;

/// User settings that change the shape of the text the parsers read.
const CONFIG_OVERRIDES: &[&str] = &[
    "diff.noprefix=false",
    "diff.mnemonicPrefix=false",
    "log.abbrevCommit=false",
    "log.showSignature=false",
    "blame.showEmail=false",
];

/// A git work tree. Commit lookups go through libgit2; the text queries the
/// parsers consume come from the `git` binary run inside the work tree.
pub struct GitRepository {
    pub repo: Mutex<Repository>,
    pub path: PathBuf,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| AppError::RepoNotFound(path_str.clone()))?;
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::RepoNotFound(format!("{} (bare repositories are not supported)", path_str)))?;

        Ok(Self {
            repo: Mutex::new(repo),
            path: workdir,
        })
    }

    pub fn info(&self) -> Result<RepositoryInfo> {
        self.with_repo(|repo| {
            let name = self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            let head = repo.head().ok();
            let head_branch = head
                .as_ref()
                .filter(|h| h.is_branch())
                .and_then(|h| h.shorthand().map(|s| s.to_string()));
            let head_commit = head
                .and_then(|h| h.peel_to_commit().ok())
                .map(|c| c.id().to_string());

            Ok(RepositoryInfo {
                name,
                path: self.path.to_string_lossy().to_string(),
                head_branch,
                head_commit,
            })
        })
    }

    pub fn with_repo<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Repository) -> Result<T>,
    {
        let repo = self.repo.lock().map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        f(&repo)
    }

    fn run_git(&self, args: &[String]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!("Running {}", command);

        let output = Command::new("git")
            .args(CONFIG_OVERRIDES.iter().flat_map(|setting| ["-c", *setting]))
            .args(args)
            .current_dir(&self.path)
            .env("GIT_PAGER", "cat")
            .output()?;

        if !output.status.success() {
            return Err(AppError::Command {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl VersionControl for GitRepository {
    fn log_grep(&self, pattern: &str) -> Result<String> {
        self.run_git(&[
            "log".to_string(),
            "--no-merges".to_string(),
            "--pretty=oneline".to_string(),
            "--no-abbrev-commit".to_string(),
            "--no-decorate".to_string(),
            "--no-color".to_string(),
            "--fixed-strings".to_string(),
            format!("--grep={}", pattern),
        ])
    }

    fn show_commit(&self, commit: &str) -> Result<String> {
        self.run_git(&[
            "log".to_string(),
            "-1".to_string(),
            "--no-abbrev-commit".to_string(),
            "--no-decorate".to_string(),
            "--no-color".to_string(),
            "--date=iso-strict".to_string(),
            format!("{}^!", commit),
        ])
    }

    fn predecessor(&self, commit: &str) -> Result<Option<String>> {
        self.with_repo(|repo| {
            let found = repo
                .revparse_single(commit)
                .and_then(|obj| obj.peel_to_commit())
                .map_err(|_| AppError::CommitNotFound(commit.to_string()))?;

            if found.parent_count() == 0 {
                return Ok(None);
            }
            Ok(Some(found.parent_id(0)?.to_string()))
        })
    }

    fn diff(&self, commit: &str, predecessor: &str) -> Result<String> {
        self.run_git(&[
            "diff".to_string(),
            "--no-color".to_string(),
            "--no-ext-diff".to_string(),
            "--ignore-all-space".to_string(),
            "--ignore-blank-lines".to_string(),
            "--src-prefix=a/".to_string(),
            "--dst-prefix=b/".to_string(),
            commit.to_string(),
            predecessor.to_string(),
        ])
    }

    fn blame(&self, revision: &str, path: &str, ranges: &[LineRange]) -> Result<String> {
        let mut args = vec![
            "blame".to_string(),
            "-l".to_string(),
            "--root".to_string(),
            "--date=iso".to_string(),
        ];
        for range in ranges {
            args.push(format!("-L{},{}", range.start, range.end));
        }
        args.push(revision.to_string());
        args.push("--".to_string());
        args.push(path.to_string());

        self.run_git(&args)
    }
}

pub type SharedRepo = Arc<GitRepository>;
