//! Error type shared by the bfm core.
//!
//! Everything below the application state returns [Result]. The app layer turns the
//! recoverable variants into status messages, only terminal setup errors reach `main`.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BfmError {
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The entry vanished between the scan and the operation.
    #[error("'{}': No such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("'{}': File exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}': could not move to trash: {message}", path.display())]
    Trash { path: PathBuf, message: String },

    #[error("empty destination")]
    EmptyDestination,

    #[error("line {line} out of range ({len} entries)")]
    LineOutOfRange { line: usize, len: usize },

    #[error("config error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, BfmError>;

impl BfmError {
    /// True for errors caused by the filesystem changing under us.
    pub fn is_stale(&self) -> bool {
        matches!(self, BfmError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_matches_shell_wording() {
        let err = BfmError::NotFound(PathBuf::from("/tmp/gone.txt"));
        assert_eq!(err.to_string(), "'/tmp/gone.txt': No such file or directory");
        assert!(err.is_stale());
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<()> {
            std::fs::read_dir("/definitely/not/here")?;
            Ok(())
        }
        let err = fails().err();
        assert!(matches!(err, Some(BfmError::Io(_))));
    }
}
