use crate::error::GitError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Run `git` with an argument vector in `cwd`, adding `envs` to the child
/// environment only. Returns trimmed stdout.
pub fn git_command<I, S>(
    args: I,
    cwd: &Path,
    envs: &[(&str, String)],
) -> Result<String, GitError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let rendered = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    debug!(cwd = %cwd.display(), "git {rendered}");

    let mut cmd = Command::new("git");
    cmd.args(&args).current_dir(cwd);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    let output = cmd.output().map_err(GitError::Spawn)?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: rendered,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
pub(crate) fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}
