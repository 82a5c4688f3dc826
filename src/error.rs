use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the comparison session.
///
/// None of these are fatal once a comparison is on screen: the previous
/// comparison stays active and the message is shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Revision history too short, export failed, or exported file unreadable
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// A snapshot could not be opened or understood as a workbook
    #[error("Cannot parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// Revision offsets out of range or not newer-before-older
    #[error("Invalid revision selection: {0}")]
    Input(String),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let e = SessionError::Parse {
            path: PathBuf::from("/tmp/r12-book.xlsx"),
            reason: "not a zip".into(),
        };
        assert_eq!(e.to_string(), "Cannot parse /tmp/r12-book.xlsx: not a zip");
        assert_eq!(
            SessionError::Input("3 >= 2".into()).to_string(),
            "Invalid revision selection: 3 >= 2"
        );
    }
}
