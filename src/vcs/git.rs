use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use std::process::Command;

use super::{Revision, RevisionSource};

/// A file tracked in a git repository
pub struct GitSource {
    repo_root: String,
    /// Path relative to the repo root, `/`-separated as git expects
    rel_path: String,
}

impl GitSource {
    pub fn new(file: &Path) -> Result<Self> {
        let canonical = std::fs::canonicalize(file)
            .with_context(|| format!("Path not found: {}", file.display()))?;
        let dir = canonical
            .parent()
            .ok_or_else(|| anyhow::anyhow!("No parent directory: {}", canonical.display()))?;

        let repo_root = get_repo_root_in(&dir.to_string_lossy())?;
        let rel = canonical
            .strip_prefix(std::fs::canonicalize(&repo_root)?)
            .with_context(|| format!("{} is outside {}", canonical.display(), repo_root))?;
        let rel_path = rel.to_string_lossy().replace('\\', "/");

        Ok(Self {
            repo_root,
            rel_path,
        })
    }
}

impl RevisionSource for GitSource {
    fn list_revisions(&self, limit: usize) -> Result<Vec<Revision>> {
        let limit = limit.to_string();
        let output = Command::new("git")
            .args(["log", "-n", &limit, "--format=%H%x09%an", "--", &self.rel_path])
            .current_dir(&self.repo_root)
            .output()
            .context("Failed to run git log")?;
        debug!("git log -n {} -- {}: {:?}", limit, self.rel_path, output.status.code());

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git log failed: {}", stderr.trim());
        }

        Ok(parse_git_log(&String::from_utf8_lossy(&output.stdout)))
    }

    fn export(&self, revision: &Revision, dest: &Path) -> Result<()> {
        let spec = format!("{}:{}", revision.id, self.rel_path);
        let output = Command::new("git")
            .args(["show", &spec])
            .current_dir(&self.repo_root)
            .output()
            .context("Failed to run git show")?;
        debug!("git show {} -> {}: {:?}", spec, dest.display(), output.status.code());

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git show {} failed: {}", spec, stderr.trim());
        }

        // Binary content, so the raw stdout bytes are written untouched
        std::fs::write(dest, &output.stdout)
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "git"
    }
}

/// Get the repository root directory for a specific path
fn get_repo_root_in(dir: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .context(format!("Failed to run git in '{}'", dir))?;

    if !output.status.success() {
        anyhow::bail!("Not a git repository: {}", dir);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Parse `git log --format=%H%x09%an` output
fn parse_git_log(raw: &str) -> Vec<Revision> {
    raw.lines()
        .filter_map(|line| {
            let (hash, author) = line.split_once('\t')?;
            let hash = hash.trim();
            if hash.is_empty() {
                return None;
            }
            Some(Revision::new(hash, author.trim()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_git_log_tab_separated() {
        let raw = "a1b2c3d4e5\tAlice Smith\n0f9e8d7c6b\tBob\n";
        let revs = parse_git_log(raw);
        assert_eq!(
            revs,
            vec![
                Revision::new("a1b2c3d4e5", "Alice Smith"),
                Revision::new("0f9e8d7c6b", "Bob"),
            ]
        );
    }

    #[test]
    fn parse_git_log_skips_malformed_lines() {
        let raw = "no-tab-here\n\tmissing hash\nabc\tcarol\n";
        assert_eq!(parse_git_log(raw), vec![Revision::new("abc", "carol")]);
    }

    #[test]
    fn parse_git_log_empty() {
        assert!(parse_git_log("").is_empty());
    }
}
