//! Explicit state for one interactive editing session.
//!
//! A session owns the document read at the start and replaces it only when a
//! proposal is accepted. Rejecting a proposal drops it; the next round starts
//! from the same document.

use crate::collab::Collaborator;
use crate::document::Document;
use crate::engine::{commit, process_round, Proposal};
use crate::error::Result;
use crate::logger::Logger;
use crate::tag::{IdentifierSource, RandomIds};
use std::path::Path;

pub mod state;

pub use state::{RoundOutcome, RoundRecord, SessionState};

pub struct Session {
    document: Document,
    state: SessionState,
    ids: Box<dyn IdentifierSource>,
    logger: Logger,
}

impl Session {
    pub fn open(path: &Path, logger: Logger) -> Result<Self> {
        let document = Document::read(path)?;
        logger.info(
            "session",
            "open",
            &format!("{} ({} bytes)", path.display(), document.text().len()),
        );
        Ok(Self::from_document(document, logger))
    }

    pub fn from_document(document: Document, logger: Logger) -> Self {
        Self {
            document,
            state: SessionState::new(),
            ids: Box::new(RandomIds),
            logger,
        }
    }

    #[must_use]
    pub fn with_ids(mut self, ids: Box<dyn IdentifierSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn propose(
        &mut self,
        collaborator: &dyn Collaborator,
        instruction: &str,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<Proposal> {
        let result = process_round(
            &self.document,
            instruction,
            collaborator,
            self.ids.as_mut(),
            &self.logger,
            on_fragment,
        );
        if let Err(e) = &result {
            self.logger.error("session", "propose", &e.to_string());
            self.state.record(instruction, RoundOutcome::Failed, 0, 0);
        }
        result
    }

    /// Writes the proposal to disk and makes it the session's document.
    pub fn accept(&mut self, proposal: Proposal) -> Result<()> {
        let applied = proposal.report.applied.len();
        let unresolved = proposal.report.unresolved.len();
        match commit(&self.document, &proposal.text) {
            Ok(document) => {
                self.logger.info("session", "commit", &document.path().display().to_string());
                self.document = document;
                self.state.record(&proposal.instruction, RoundOutcome::Accepted, applied, unresolved);
                Ok(())
            }
            Err(e) => {
                self.logger.error("session", "commit", &e.to_string());
                self.state.record(&proposal.instruction, RoundOutcome::Failed, applied, unresolved);
                Err(e)
            }
        }
    }

    pub fn reject(&mut self, proposal: Proposal) {
        self.logger.info("session", "reject", &proposal.instruction);
        self.state.record(
            &proposal.instruction,
            RoundOutcome::Rejected,
            proposal.report.applied.len(),
            proposal.report.unresolved.len(),
        );
    }

    pub fn close(self) -> SessionState {
        self.logger.info("session", "close", &self.state.summary());
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::ScriptedCollaborator;
    use crate::error::ErrorCode;
    use crate::tag::SequentialIds;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    const SOURCE: &str = "def double(x):\n    return x + x\n";
    const REPLY: &str = "# EDIT_START: u1\ndef double(x):\n    return 2 * x\n# EDIT_END: u1\n";

    fn open(tmp: &TempDir) -> Session {
        let path = write(tmp, "double.py", SOURCE);
        Session::open(&path, Logger::new(3).verbose(false))
            .unwrap()
            .with_ids(Box::new(SequentialIds::default()))
    }

    #[test]
    fn accept_writes_the_file() {
        let tmp = TempDir::new().unwrap();
        let mut session = open(&tmp);
        let proposal = session
            .propose(&ScriptedCollaborator::whole(REPLY), "multiply", &mut |_: &str| {})
            .unwrap();
        session.accept(proposal).unwrap();

        let on_disk = fs::read_to_string(tmp.path().join("double.py")).unwrap();
        assert_eq!(on_disk, "def double(x):\n    return 2 * x\n");
        assert_eq!(session.document().text(), on_disk);
        assert_eq!(session.state().accepted, 1);
    }

    #[test]
    fn reject_leaves_file_and_document_alone() {
        let tmp = TempDir::new().unwrap();
        let mut session = open(&tmp);
        let proposal = session
            .propose(&ScriptedCollaborator::whole(REPLY), "multiply", &mut |_: &str| {})
            .unwrap();
        session.reject(proposal);

        let on_disk = fs::read_to_string(tmp.path().join("double.py")).unwrap();
        assert_eq!(on_disk, SOURCE);
        assert_eq!(session.document().text(), SOURCE);

        let state = session.close();
        assert_eq!(state.rejected, 1);
        assert_eq!(state.history[0].instruction, "multiply");
        assert_eq!(state.history[0].outcome, RoundOutcome::Rejected);
    }

    #[test]
    fn failed_round_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let mut session = open(&tmp);
        let err = session
            .propose(&ScriptedCollaborator::whole(REPLY), "", &mut |_: &str| {})
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(session.state().failed, 1);
    }

    #[test]
    fn stale_file_blocks_accept() {
        let tmp = TempDir::new().unwrap();
        let mut session = open(&tmp);
        let proposal = session
            .propose(&ScriptedCollaborator::whole(REPLY), "multiply", &mut |_: &str| {})
            .unwrap();
        write(&tmp, "double.py", "# edited elsewhere\n");

        let err = session.accept(proposal).unwrap_err();
        assert_eq!(err.code(), ErrorCode::StaleDocument);
        assert_eq!(session.document().text(), SOURCE);
    }
}
