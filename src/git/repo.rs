use crate::error::{GitError, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::command::git_command;

/// Format git accepts for `GIT_AUTHOR_DATE` / `GIT_COMMITTER_DATE`.
pub const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Use `path` as the work tree, or the current dir if `None`.
    /// Nothing on disk is touched.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };
        Ok(Self { path })
    }

    pub fn create_workdir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.path.join(".git").exists()
    }

    fn git<I, S>(&self, args: I) -> std::result::Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        git_command(args, &self.path, &[])
    }

    /// `git init` plus identity config, only when no `.git` exists yet.
    /// Returns whether a new repository was created.
    pub fn init_if_missing(
        &self,
        author_name: &str,
        author_email: Option<&str>,
    ) -> Result<bool> {
        if self.is_initialized() {
            debug!(path = %self.path.display(), "repository already initialized");
            return Ok(false);
        }
        self.git(["init"])?;
        info!(path = %self.path.display(), "initialized repository");
        self.git(["config", "user.name", author_name])?;
        if let Some(email) = author_email {
            self.git(["config", "user.email", email])?;
        }
        Ok(true)
    }

    pub fn stage(&self, file: &Path) -> Result<()> {
        let rel = file.strip_prefix(&self.path).unwrap_or(file);
        self.git([std::ffi::OsStr::new("add"), rel.as_os_str()])?;
        Ok(())
    }

    /// Commit the index with author and committer dates pinned to `timestamp`.
    pub fn commit_at(&self, message: &str, timestamp: NaiveDateTime) -> Result<()> {
        let date = timestamp.format(GIT_DATE_FORMAT).to_string();
        let envs = [
            ("GIT_AUTHOR_DATE", date.clone()),
            ("GIT_COMMITTER_DATE", date),
        ];
        git_command(["commit", "-m", message], &self.path, &envs)?;
        Ok(())
    }

    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.git(["remote", "add", name, url])?;
        Ok(())
    }

    pub fn rename_branch(&self, branch: &str) -> Result<()> {
        self.git(["branch", "-M", branch])?;
        Ok(())
    }

    pub fn push_upstream(&self, remote: &str, branch: &str) -> Result<()> {
        self.git(["push", "-u", remote, branch])?;
        Ok(())
    }
}
