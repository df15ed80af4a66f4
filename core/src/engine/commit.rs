use crate::document::{digest_of, Document};
use crate::error::{EditError, ErrorCode, Result};
use std::fs;

/// Overwrites the document's file with `proposed`.
///
/// Refuses when the file changed on disk since `document` was read.
pub fn commit(document: &Document, proposed: &str) -> Result<Document> {
    let path = document.path();
    let on_disk = fs::read_to_string(path).map_err(|e| EditError::File {
        code: ErrorCode::FileReadFailed,
        message: format!("Failed to re-read file before writing: {}", e),
        path: path.to_path_buf(),
    })?;
    if digest_of(&on_disk) != document.digest() {
        return Err(EditError::File {
            code: ErrorCode::StaleDocument,
            message: "File changed on disk since it was read".to_string(),
            path: path.to_path_buf(),
        });
    }

    fs::write(path, proposed).map_err(|e| EditError::File {
        code: ErrorCode::FileWriteFailed,
        message: format!("Failed to write to file: {}", e),
        path: path.to_path_buf(),
    })?;
    Ok(Document::new(path, proposed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn writes_and_returns_the_new_document() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "a.py", "x = 1\n");
        let document = Document::read(&path).unwrap();

        let committed = commit(&document, "x = 2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 2\n");
        assert_eq!(committed.text(), "x = 2\n");
        assert_ne!(committed.digest(), document.digest());
    }

    #[test]
    fn refuses_to_overwrite_a_changed_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "a.py", "x = 1\n");
        let document = Document::read(&path).unwrap();
        fs::write(&path, "x = 99\n").unwrap();

        let err = commit(&document, "x = 2\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::StaleDocument);
        assert_eq!(fs::read_to_string(&path).unwrap(), "x = 99\n");
    }

    #[test]
    fn missing_file_is_a_read_failure() {
        let tmp = TempDir::new().unwrap();
        let document = Document::new(tmp.path().join("gone.py"), "x\n");
        assert_eq!(commit(&document, "y\n").unwrap_err().code(), ErrorCode::FileReadFailed);
    }
}
