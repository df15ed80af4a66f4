use crate::error::{EditError, ErrorCode, Result};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_DOCUMENT_SIZE: u64 = 10_000_000; // 10 MB limit

/// A source file as read from disk, kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    text: String,
    digest: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let digest = digest_of(&text);
        Self { path: path.into(), text, digest }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| EditError::File {
            code: ErrorCode::FileReadFailed,
            message: format!("Could not read file metadata: {}", e),
            path: path.to_path_buf(),
        })?;
        if metadata.len() > MAX_DOCUMENT_SIZE {
            return Err(EditError::File {
                code: ErrorCode::BoundsExceeded,
                message: format!("File exceeds max size {}", MAX_DOCUMENT_SIZE),
                path: path.to_path_buf(),
            });
        }

        let text = fs::read_to_string(path).map_err(|e| EditError::File {
            code: ErrorCode::FileReadFailed,
            message: format!("Failed to read file: {}", e),
            path: path.to_path_buf(),
        })?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// MD5 of the text as it was read.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Lines with their terminators; concatenating them yields `text()`.
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.text)
    }
}

pub fn digest_of(text: &str) -> String {
    format!("{:x}", md5::compute(text))
}

pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// The line without its `\n` or `\r\n` terminator.
pub fn content_of(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

pub fn has_terminator(line: &str) -> bool {
    line.ends_with('\n')
}

/// A line holding nothing but its terminator.
pub fn is_empty_line(line: &str) -> bool {
    has_terminator(line) && content_of(line).is_empty()
}

pub fn terminator_of(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

pub fn leading_whitespace(line: &str) -> &str {
    let content = content_of(line);
    let end = content
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(content.len());
    &content[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_concatenate_back_to_text() {
        let text = "a\r\n  b\n\nc";
        let doc = Document::new("x.py", text);
        assert_eq!(doc.lines(), vec!["a\r\n", "  b\n", "\n", "c"]);
        assert_eq!(doc.lines().concat(), text);
    }

    #[test]
    fn content_strips_either_terminator() {
        assert_eq!(content_of("abc\r\n"), "abc");
        assert_eq!(content_of("abc\n"), "abc");
        assert_eq!(content_of("abc"), "abc");
        assert!(is_empty_line("\r\n"));
        assert!(!is_empty_line(""));
        assert!(!is_empty_line("  \n"));
    }

    #[test]
    fn leading_whitespace_stops_at_content() {
        assert_eq!(leading_whitespace("    x = 1\n"), "    ");
        assert_eq!(leading_whitespace("\tx\n"), "\t");
        assert_eq!(leading_whitespace("x\n"), "");
    }

    #[test]
    fn digest_tracks_text() {
        let a = Document::new("a", "one\n");
        let b = Document::new("a", "two\n");
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.digest(), digest_of("one\n"));
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = Document::read(&tmp.path().join("nope.py")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileReadFailed);
    }
}
