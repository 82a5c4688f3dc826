mod git;
mod svn;

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use git::GitSource;
pub use svn::SvnSource;

/// One historical revision of the reviewed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: String,
    pub author: String,
}

impl Revision {
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
        }
    }

    /// Short human label: `r42` for numbered revisions, abbreviated hash otherwise
    pub fn label(&self) -> String {
        if !self.id.is_empty() && self.id.chars().all(|c| c.is_ascii_digit()) {
            format!("r{}", self.id)
        } else {
            self.id.chars().take(7).collect()
        }
    }
}

/// Revision history and historical content of a single file
pub trait RevisionSource {
    /// Up to `limit` revisions, newest first. May return fewer.
    fn list_revisions(&self, limit: usize) -> Result<Vec<Revision>>;

    /// Write the file's content as of `revision` to `dest`
    fn export(&self, revision: &Revision, dest: &Path) -> Result<()>;

    /// Backend name for status messages and logs
    fn name(&self) -> &'static str;
}

/// Which version control system to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VcsBackend {
    /// git when the file is inside a git work tree, svn otherwise
    #[default]
    Auto,
    Git,
    Svn,
}

/// Build the revision source for `file`
pub fn open_source(file: &Path, backend: VcsBackend) -> Result<Box<dyn RevisionSource>> {
    let source: Box<dyn RevisionSource> = match backend {
        VcsBackend::Git => Box::new(GitSource::new(file)?),
        VcsBackend::Svn => Box::new(SvnSource::new(file)),
        VcsBackend::Auto => match GitSource::new(file) {
            Ok(git) => Box::new(git),
            Err(_) => Box::new(SvnSource::new(file)),
        },
    };
    info!("using {} backend for {}", source.name(), file.display());
    Ok(source)
}
