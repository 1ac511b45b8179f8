use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeckError>;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("path {path:?} is not under test root {root:?}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("file name {0:?} does not end with the test-file suffix")]
    NotATestFile(String),

    #[error("row has no title")]
    MissingTitle,
}
