use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // --- Configuration ---
    ConfigInvalid,

    // --- File I/O ---
    FileReadFailed,
    FileWriteFailed,
    StaleDocument,

    // --- Collaborator ---
    CollaboratorUnreachable,
    CollaboratorRejected,
    ReplyStreamCorrupt,

    // --- Validation ---
    ValidationFailed,
    BoundsExceeded,
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Config Error: {field} = {value} ({reason})")]
    Config { field: String, value: String, reason: String },

    #[error("File Error: {message} (path: {path:?})")]
    File { code: ErrorCode, message: String, path: PathBuf },

    #[error("Collaborator Error: {message} (context: {context})")]
    Collaborator { code: ErrorCode, message: String, context: String },

    #[error("Validation Error: {message} (context: {context})")]
    Validation { code: ErrorCode, message: String, context: String },
}

impl EditError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EditError::Config { .. } => ErrorCode::ConfigInvalid,
            EditError::File { code, .. }
            | EditError::Collaborator { code, .. }
            | EditError::Validation { code, .. } => code.clone(),
        }
    }
}
