use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{Revision, RevisionSource};

/// Subversion working-copy file
pub struct SvnSource {
    file: PathBuf,
}

impl SvnSource {
    pub fn new(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
        }
    }
}

impl RevisionSource for SvnSource {
    fn list_revisions(&self, limit: usize) -> Result<Vec<Revision>> {
        let limit = limit.to_string();
        let output = Command::new("svn")
            .args(["log", "-q", "-l", &limit])
            .arg(&self.file)
            .output()
            .context("Failed to run svn")?;
        debug!("svn log -q -l {} {}: {:?}", limit, self.file.display(), output.status.code());

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("svn log failed: {}", stderr.trim());
        }

        Ok(parse_svn_log(&String::from_utf8_lossy(&output.stdout)))
    }

    fn export(&self, revision: &Revision, dest: &Path) -> Result<()> {
        let output = Command::new("svn")
            .args(["export", "-q", "-r", &revision.id])
            .arg(&self.file)
            .arg(dest)
            .output()
            .context("Failed to run svn export")?;
        debug!(
            "svn export -r {} -> {}: {:?}",
            revision.id,
            dest.display(),
            output.status.code()
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("svn export -r {} failed: {}", revision.id, stderr.trim());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "svn"
    }
}

/// Parse `svn log -q` output. Entry lines look like
/// `r1234 | author | 2024-01-01 10:00:00 +0800 (Mon, 01 Jan 2024)`;
/// separator lines of dashes are skipped.
fn parse_svn_log(raw: &str) -> Vec<Revision> {
    raw.lines().filter_map(parse_svn_log_line).collect()
}

fn parse_svn_log_line(line: &str) -> Option<Revision> {
    let rest = line.strip_prefix('r')?;
    let (number, rest) = rest.split_once(char::is_whitespace)?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('|')?;
    let author = rest.split_whitespace().next()?;
    Some(Revision::new(number, author))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_svn_log_quiet_output() {
        let raw = "\
------------------------------------------------------------------------
r1520 | alice | 2024-03-02 11:20:01 +0800 (Sat, 02 Mar 2024)
------------------------------------------------------------------------
r1499 | bob | 2024-02-27 09:02:44 +0800 (Tue, 27 Feb 2024)
------------------------------------------------------------------------
";
        let revs = parse_svn_log(raw);
        assert_eq!(
            revs,
            vec![Revision::new("1520", "alice"), Revision::new("1499", "bob")]
        );
    }

    #[test]
    fn parse_svn_log_empty_output() {
        assert!(parse_svn_log("").is_empty());
    }

    #[test]
    fn parse_svn_log_line_rejects_non_entries() {
        assert_eq!(parse_svn_log_line("------------"), None);
        assert_eq!(parse_svn_log_line("random text"), None);
        assert_eq!(parse_svn_log_line("rabc | alice | date"), None);
        assert_eq!(parse_svn_log_line("r12"), None);
    }

    #[test]
    fn parse_svn_log_line_author_with_domain() {
        let rev = parse_svn_log_line("r7 | DOMAIN\\carol | 2024-01-01").unwrap();
        assert_eq!(rev.id, "7");
        assert_eq!(rev.author, "DOMAIN\\carol");
    }
}
